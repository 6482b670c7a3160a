//! Target expansion.
//!
//! Expands an [`AxisSet`] into the cartesian product of its values. The first
//! declared axis varies slowest and values keep their declaration order, so
//! `{win64} x {vs2017, vs2022} x {debug, release}` yields
//! `win64_vs2017_debug, win64_vs2017_release, win64_vs2022_debug, win64_vs2022_release`.

use crate::builder::errors::PlanError;
use crate::core::{AxisSet, Target};

/// Expand `axes` into every target, failing on an empty axis rather than
/// silently producing an empty matrix.
pub fn expand(axes: &AxisSet) -> Result<Vec<Target>, PlanError> {
    axes.validate()?;

    let mut combos: Vec<Vec<(&str, &str)>> = vec![Vec::new()];
    for axis in axes.axes() {
        let mut next = Vec::with_capacity(combos.len() * axis.len());
        for prefix in &combos {
            for value in &axis.values {
                let mut combo = prefix.clone();
                combo.push((axis.name.as_str(), value.as_str()));
                next.push(combo);
            }
        }
        combos = next;
    }

    let targets: Vec<Target> = combos.into_iter().map(Target::from_pairs).collect();
    tracing::debug!(
        "expanded {} axes into {} targets",
        axes.axes().len(),
        targets.len()
    );
    Ok(targets)
}
