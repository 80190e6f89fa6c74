//! Canonical serialization for failure and policy fingerprints.
//!
//! ## Determinism Guarantees
//!
//! - Struct fields serialize in declaration order
//! - Failure lists are sorted by element path before hashing
//! - No HashMap in hashed data: use BTreeMap

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Serialize a value to canonical JSON bytes for hashing.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    // Only called on crate types whose Serialize impls are derived and
    // contain no maps with non-string keys.
    serde_json::to_vec(value).expect("Canonical serialization failed")
}

/// Compute canonical hash of a serializable value.
pub fn canonical_hash<T: Serialize>(value: &T) -> u64 {
    xxh64(&to_canonical_bytes(value), 0)
}

/// Compute canonical hash and return as hex string.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> String {
    format!("{:016x}", canonical_hash(value))
}
