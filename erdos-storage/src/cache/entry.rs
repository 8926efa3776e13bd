//! On-disk entry format.
//!
//! JSON object carrying the kind, the bound and the ascending values:
//!
//! ```text
//! {"kind":"primes","bound":30,"values":[2,3,5,7,11,13,17,19,23,29]}
//! ```
//!
//! The kind and bound are repeated inside the payload so a renamed file is
//! detected on load instead of being served under the wrong key. The
//! endpoints of the value list are checked too, which catches a file cut
//! short at a value boundary. Interior values are not re-verified.

use erdos_core::{largest_prime_at_most, CacheError, SetKind};
use serde::{Deserialize, Serialize};

use super::key::CacheKey;

/// Serialized form of one cached set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheEntry {
    pub kind: SetKind,
    pub bound: u64,
    pub values: Vec<u64>,
}

impl CacheEntry {
    pub fn new(kind: SetKind, bound: impl Into<u64>, values: Vec<u64>) -> Self {
        Self {
            kind,
            bound: bound.into(),
            values,
        }
    }

    pub fn encode(&self, key: &CacheKey) -> Result<Vec<u8>, CacheError> {
        serde_json::to_vec(self).map_err(|e| CacheError::Encode {
            key: key.stem(),
            reason: e.to_string(),
        })
    }

    /// Decode bytes read under `key` and check they belong there.
    ///
    /// Fails if:
    /// - The bytes are not a well-formed entry
    /// - The entry's kind or bound differs from the key
    /// - Any value lies outside `[smallest member of kind, bound]`
    /// - The values are not strictly ascending
    /// - The first value is not the smallest member of the kind, or a prime
    ///   list does not end at the largest prime `<= bound`
    pub fn decode(key: &CacheKey, bytes: &[u8]) -> Result<Self, CacheError> {
        let entry: CacheEntry = serde_json::from_slice(bytes).map_err(|e| CacheError::Decode {
            key: key.stem(),
            reason: e.to_string(),
        })?;

        if entry.kind != key.kind() || entry.bound != key.bound().get() {
            return Err(CacheError::KeyMismatch {
                key: key.stem(),
                found_kind: entry.kind,
                found_bound: entry.bound,
            });
        }

        let floor = entry.kind.smallest_member();
        if let Some(&value) = entry
            .values
            .iter()
            .find(|&&v| v < floor || v > entry.bound)
        {
            return Err(CacheError::Decode {
                key: key.stem(),
                reason: format!("value {value} outside [{floor}, {}]", entry.bound),
            });
        }

        if entry.values.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(CacheError::Decode {
                key: key.stem(),
                reason: "values are not strictly ascending".to_string(),
            });
        }

        if let Some(reason) = entry.endpoint_mismatch() {
            return Err(CacheError::Decode {
                key: key.stem(),
                reason,
            });
        }

        Ok(entry)
    }

    fn endpoint_mismatch(&self) -> Option<String> {
        let floor = self.kind.smallest_member();
        let first = self.values.first().copied();
        if self.bound >= floor && first != Some(floor) {
            return Some(format!("expected first value {floor}, found {first:?}"));
        }

        if self.kind == SetKind::Primes {
            let expected = largest_prime_at_most(self.bound);
            let last = self.values.last().copied();
            if last != expected {
                return Some(format!("expected last prime {expected:?}, found {last:?}"));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use erdos_core::Bound;

    fn key(kind: SetKind, n: u64) -> CacheKey {
        CacheKey::new(kind, Bound::new(n).expect("valid bound"))
    }

    #[test]
    fn test_encode_decode() {
        let k = key(SetKind::Primes, 10);
        let entry = CacheEntry::new(SetKind::Primes, 10u64, vec![2, 3, 5, 7]);
        let bytes = entry.encode(&k).expect("encode should succeed");
        assert_eq!(
            std::str::from_utf8(&bytes).expect("utf8"),
            r#"{"kind":"primes","bound":10,"values":[2,3,5,7]}"#
        );
        assert_eq!(CacheEntry::decode(&k, &bytes), Ok(entry));
    }

    #[test]
    fn test_empty_entry_decodes() {
        let k = key(SetKind::Semiprimes, 5);
        let bytes = br#"{"kind":"semiprimes","bound":5,"values":[]}"#;
        let entry = CacheEntry::decode(&k, bytes).expect("decode should succeed");
        assert!(entry.values.is_empty());
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let k = key(SetKind::Primes, 10);
        for bytes in [&b""[..], b"not json", b"{\"kind\":\"primes\"", b"\x80\x04\x95"] {
            let err = CacheEntry::decode(&k, bytes).unwrap_err();
            assert!(matches!(err, CacheError::Decode { .. }), "{err:?}");
        }
    }

    #[test]
    fn test_mismatched_key_is_rejected() {
        let bytes = br#"{"kind":"primes","bound":10,"values":[2,3,5,7]}"#;

        let err = CacheEntry::decode(&key(SetKind::Primes, 11), bytes).unwrap_err();
        assert!(matches!(err, CacheError::KeyMismatch { found_bound: 10, .. }));

        let err = CacheEntry::decode(&key(SetKind::Semiprimes, 10), bytes).unwrap_err();
        assert!(matches!(
            err,
            CacheError::KeyMismatch {
                found_kind: SetKind::Primes,
                ..
            }
        ));
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        let k = key(SetKind::Primes, 10);
        let bytes = br#"{"kind":"primes","bound":10,"values":[2,3,5,7,11]}"#;
        assert!(matches!(
            CacheEntry::decode(&k, bytes),
            Err(CacheError::Decode { .. })
        ));

        let k = key(SetKind::Semiprimes, 10);
        let bytes = br#"{"kind":"semiprimes","bound":10,"values":[4,6,10]}"#;
        assert!(matches!(
            CacheEntry::decode(&k, bytes),
            Err(CacheError::Decode { .. })
        ));
    }

    #[test]
    fn test_truncated_value_list_is_rejected() {
        let k = key(SetKind::Primes, 100);
        for bytes in [
            &br#"{"kind":"primes","bound":100,"values":[2,3,9]}"#[..],
            br#"{"kind":"primes","bound":100,"values":[]}"#,
            br#"{"kind":"primes","bound":100,"values":[3,5,97]}"#,
        ] {
            let err = CacheEntry::decode(&k, bytes).unwrap_err();
            assert!(matches!(err, CacheError::Decode { .. }), "{err:?}");
        }

        let k = key(SetKind::Semiprimes, 30);
        let bytes = br#"{"kind":"semiprimes","bound":30,"values":[10,14,15]}"#;
        assert!(matches!(
            CacheEntry::decode(&k, bytes),
            Err(CacheError::Decode { .. })
        ));
    }

    #[test]
    fn test_unsorted_or_duplicate_values_are_rejected() {
        let k = key(SetKind::Primes, 10);
        for bytes in [
            &br#"{"kind":"primes","bound":10,"values":[3,2,5,7]}"#[..],
            br#"{"kind":"primes","bound":10,"values":[2,3,3,5,7]}"#,
        ] {
            assert!(matches!(
                CacheEntry::decode(&k, bytes),
                Err(CacheError::Decode { .. })
            ));
        }
    }
}
