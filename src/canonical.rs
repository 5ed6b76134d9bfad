//! Canonical serialization for fingerprints.
//!
//! Two consumers:
//!
//! - `ProgressDocument::fingerprint`, which `Session::save` compares against
//!   the last written document to skip redundant writes
//! - `RenderAttributes::fingerprint`, a cheap equality key for renders
//!
//! ## Determinism Guarantees
//!
//! - Struct fields serialize in declaration order
//! - Maps in fingerprinted data are BTreeMaps (ordered keys)
//! - Node and edge records keep graph order

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Serialize a progress document or render to JSON bytes for hashing.
///
/// Both have string or integer map keys and finite coordinates, so
/// serialization cannot fail.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).expect("Canonical serialization failed")
}

/// xxh64 of the canonical bytes, seed 0.
pub fn canonical_hash<T: Serialize>(value: &T) -> u64 {
    xxh64(&to_canonical_bytes(value), 0)
}

/// Fingerprint as 16 lowercase hex digits.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> String {
    format!("{:016x}", canonical_hash(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_determinism() {
        let mut statuses = BTreeMap::new();
        statuses.insert("35", "complete");
        statuses.insert("27", "attempted");

        let h1 = canonical_hash(&statuses);
        let h2 = canonical_hash(&statuses.clone());
        assert_eq!(h1, h2);
    }

    #[test]
    fn test_insertion_order_irrelevant_for_ordered_maps() {
        let mut a = BTreeMap::new();
        a.insert("1", true);
        a.insert("2", false);
        let mut b = BTreeMap::new();
        b.insert("2", false);
        b.insert("1", true);
        assert_eq!(canonical_hash_hex(&a), canonical_hash_hex(&b));
        assert_eq!(canonical_hash_hex(&a).len(), 16);
    }
}
