//! Account address derivation from signer public keys.
//!
//! Address = base32( version ‖ RIPEMD-160(Keccak-256(pubkey)) ‖ checksum )
//! where checksum is the first 4 bytes of Keccak-256 over the version-prefixed
//! digest. 25 payload bytes encode to exactly 40 base-32 characters.
//!
//! This must agree bit-for-bit with the ledger's own derivation: the derived
//! string is the equality key used to deduplicate voters.

use crate::base32::b32encode;
use crate::hash::{keccak256, ripemd160};
use pollscan_types::{Address, NetworkId, PublicKey};

/// Length of the checksum appended to the version-prefixed digest.
const CHECKSUM_LEN: usize = 4;

/// Derive the canonical account address for a public key on a network.
pub fn derive_address(public_key: &PublicKey, network: NetworkId) -> Address {
    let key_digest = keccak256(public_key.as_bytes());
    let short_digest = ripemd160(&key_digest);

    let mut prefixed = [0u8; 21];
    prefixed[0] = network.version_prefix();
    prefixed[1..].copy_from_slice(&short_digest);

    let checksum = keccak256(&prefixed);

    let mut payload = [0u8; 21 + CHECKSUM_LEN];
    payload[..21].copy_from_slice(&prefixed);
    payload[21..].copy_from_slice(&checksum[..CHECKSUM_LEN]);

    Address::new(b32encode(&payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(fill: u8) -> PublicKey {
        PublicKey::new([fill; 32])
    }

    #[test]
    fn derivation_is_deterministic() {
        let a1 = derive_address(&key(7), NetworkId::Mainnet);
        let a2 = derive_address(&key(7), NetworkId::Mainnet);
        assert_eq!(a1, a2);
    }

    #[test]
    fn distinct_keys_do_not_collide() {
        let keys = [key(0), key(1), key(2), key(0xFF)];
        let mut addresses: Vec<_> = keys
            .iter()
            .map(|k| derive_address(k, NetworkId::Mainnet))
            .collect();
        addresses.sort();
        addresses.dedup();
        assert_eq!(addresses.len(), keys.len());
    }

    #[test]
    fn addresses_are_40_chars_unpadded() {
        let addr = derive_address(&key(42), NetworkId::Testnet);
        assert_eq!(addr.as_str().len(), 40);
        assert!(!addr.as_str().contains('='));
        assert!(addr.is_well_formed());
    }

    #[test]
    fn network_prefix_fixes_first_char() {
        // The version byte occupies the top bits of the first base-32 group:
        // 0x68 → 'N', 0x98 → 'T', 0x60 → 'M'.
        let k = key(9);
        assert!(derive_address(&k, NetworkId::Mainnet).as_str().starts_with('N'));
        assert!(derive_address(&k, NetworkId::Testnet).as_str().starts_with('T'));
        assert!(derive_address(&k, NetworkId::Mijin).as_str().starts_with('M'));
    }

    #[test]
    fn network_changes_whole_address() {
        let k = key(9);
        assert_ne!(
            derive_address(&k, NetworkId::Mainnet),
            derive_address(&k, NetworkId::Testnet)
        );
    }
}
