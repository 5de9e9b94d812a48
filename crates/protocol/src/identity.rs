use sha2::{Digest, Sha256};

/// Deterministic record identity: hex SHA-256 digest of `apply_link + title`.
///
/// Stable across runs so the same listing scraped twice maps to the same
/// store row, vector-index key, and dedup signature.
pub fn job_identity(apply_link: &str, title: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(apply_link.as_bytes());
    hasher.update(title.as_bytes());
    let digest = hasher.finalize();
    format!("{digest:x}")
}
