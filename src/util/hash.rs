//! Hashing utilities for content hashes and stable identifiers.

use sha2::{Digest, Sha256};

/// Compute SHA256 hash of a byte slice.
pub fn sha256_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Compute SHA256 hash of a string.
pub fn sha256_str(s: &str) -> String {
    sha256_bytes(s.as_bytes())
}

/// Derive a stable, GUID-shaped identifier from a set of components.
///
/// IDE solution files reference projects by GUID; deriving it from the
/// project name keeps regenerated files byte-identical across runs.
pub fn stable_guid<'a>(components: impl IntoIterator<Item = &'a str>) -> String {
    let mut hasher = Sha256::new();
    for component in components {
        hasher.update(component.as_bytes());
        hasher.update(b"\0");
    }
    let hex = hex::encode_upper(&hasher.finalize()[..16]);

    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}
