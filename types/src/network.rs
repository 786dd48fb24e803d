//! Network identifier.

use crate::Address;
use serde::{Deserialize, Serialize};

/// Identifies which ledger network an account lives on.
///
/// The network determines the version byte prepended during address
/// derivation, and therefore the first character of every address on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkId {
    /// The production network. Addresses start with `N`.
    Mainnet,
    /// The public test network. Addresses start with `T`.
    Testnet,
    /// The permissioned network. Addresses start with `M`.
    Mijin,
}

impl NetworkId {
    /// Version byte prepended to the RIPEMD-160 digest during address
    /// derivation.
    pub fn version_prefix(&self) -> u8 {
        match self {
            Self::Mainnet => 0x68,
            Self::Testnet => 0x98,
            Self::Mijin => 0x60,
        }
    }

    /// Default REST port exposed by ledger nodes on every network.
    pub fn default_port(&self) -> u16 {
        7890
    }

    /// A well-known public node for this network.
    pub fn default_host(&self) -> &'static str {
        match self {
            Self::Mainnet => "88.99.192.82",
            Self::Testnet => "104.128.226.60",
            Self::Mijin => "127.0.0.1",
        }
    }

    /// Select the network an address belongs to from its first character.
    pub fn from_address(address: &Address) -> Self {
        match address.as_str().chars().next() {
            Some('T') => Self::Testnet,
            Some('M') => Self::Mijin,
            _ => Self::Mainnet,
        }
    }

    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Mijin => "mijin",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_prefixes() {
        assert_eq!(NetworkId::Mainnet.version_prefix(), 0x68);
        assert_eq!(NetworkId::Testnet.version_prefix(), 0x98);
        assert_eq!(NetworkId::Mijin.version_prefix(), 0x60);
    }

    #[test]
    fn network_from_address_first_char() {
        let t = Address::new("TALICE5VF6J5FYMTCB7A3QG6OIRDRUXDWJGFVXNW");
        let n = Address::new("NALICE5VF6J5FYMTCB7A3QG6OIRDRUXDWJGFVXNW");
        let m = Address::new("MALICE5VF6J5FYMTCB7A3QG6OIRDRUXDWJGFVXNW");
        assert_eq!(NetworkId::from_address(&t), NetworkId::Testnet);
        assert_eq!(NetworkId::from_address(&n), NetworkId::Mainnet);
        assert_eq!(NetworkId::from_address(&m), NetworkId::Mijin);
    }
}
