//! Content fingerprints for change detection.

use sha2::{Digest, Sha256};

/// Compute an order-sensitive SHA-256 fingerprint over a list of fields.
///
/// Fields are newline-separated so that `["ab", "c"]` and `["a", "bc"]`
/// produce different digests.
pub fn compute_fingerprint(fields: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            hasher.update(b"\n");
        }
        hasher.update(field.as_bytes());
    }
    hex::encode(hasher.finalize())
}
