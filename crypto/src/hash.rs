//! Keccak-256 and RIPEMD-160 digests.
//!
//! The ledger's addressing scheme predates the NIST SHA-3 padding change, so
//! its "SHA3-256" is the original Keccak-256. Using the NIST variant here
//! would derive addresses that disagree with every account on chain.

use ripemd::Ripemd160;
use sha3::{Digest, Keccak256};

/// Compute the 256-bit Keccak digest of arbitrary data.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Compute the RIPEMD-160 digest of arbitrary data.
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    let mut hasher = Ripemd160::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 20];
    output.copy_from_slice(&result);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keccak256_empty_vector() {
        // Keccak-256(""), not SHA3-256("") — the two differ in padding.
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn keccak256_abc_vector() {
        assert_eq!(
            hex::encode(keccak256(b"abc")),
            "4e03657aea45a94fc7d47ba826c8d667c0d1e6e33a64a036ec44f58fa12d6c45"
        );
    }

    #[test]
    fn ripemd160_vectors() {
        assert_eq!(
            hex::encode(ripemd160(b"")),
            "9c1185a5c5e9fc54612808977ee8f548b2258d31"
        );
        assert_eq!(
            hex::encode(ripemd160(b"abc")),
            "8eb208f7e05d987a9b044a8e98c6b087f15a0bfc"
        );
    }

    #[test]
    fn keccak256_deterministic() {
        assert_eq!(keccak256(b"pollscan"), keccak256(b"pollscan"));
        assert_ne!(keccak256(b"pollscan"), keccak256(b"pollscan!"));
    }
}
