//! Content hashing for verification records

use sha2::{Digest, Sha256};

/// Hex SHA-256 of `bytes`, "0x"-prefixed (66 characters total)
pub fn document_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("0x{}", hex::encode(hasher.finalize()))
}

/// Whether `value` has the shape produced by [`document_hash`]
pub fn is_document_hash(value: &str) -> bool {
    value
        .strip_prefix("0x")
        .is_some_and(|hex| hex.len() == 64 && hex.bytes().all(|b| b.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        assert_eq!(
            document_hash(b""),
            "0xe3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            document_hash(b"abc"),
            "0xba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_hash_is_stable_and_well_formed() {
        let a = document_hash(b"Sale deed between seller and buyer");
        let b = document_hash(b"Sale deed between seller and buyer");
        assert_eq!(a, b);
        assert_eq!(a.len(), 66);
        assert!(is_document_hash(&a));
        assert_ne!(a, document_hash(b"Sale deed between seller and buyer."));
    }

    #[test]
    fn test_is_document_hash_rejects_malformed() {
        assert!(!is_document_hash("abc"));
        assert!(!is_document_hash(&"0".repeat(66)));
        assert!(!is_document_hash(&format!("0x{}", "zz".repeat(32))));
    }
}
