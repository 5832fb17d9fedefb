//! Extended-key version bytes for the supported networks.
//!
//! Kaspa serializes extended keys with its own 4-byte version prefixes,
//! chosen so the Base58Check output begins with a recognizable tag:
//! `kprv`/`kpub` on mainnet and `ktrv`/`ktub` on testnet.

use std::fmt;

/// Version bytes for a mainnet extended private key (`kprv...`).
const KPRV: [u8; 4] = [0x03, 0x8f, 0x2e, 0xf4];
/// Version bytes for a mainnet extended public key (`kpub...`).
const KPUB: [u8; 4] = [0x03, 0x8f, 0x33, 0x2e];
/// Version bytes for a testnet extended private key (`ktrv...`).
const KTRV: [u8; 4] = [0x03, 0x90, 0x9e, 0x07];
/// Version bytes for a testnet extended public key (`ktub...`).
const KTUB: [u8; 4] = [0x03, 0x90, 0xa2, 0x41];

/// The network an extended key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    /// Kaspa mainnet.
    Mainnet,
    /// Kaspa testnet.
    Testnet,
}

/// The four recognized extended-key version prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyVersion {
    /// Mainnet private key (`kprv`).
    MainnetPrivate,
    /// Mainnet public key (`kpub`).
    MainnetPublic,
    /// Testnet private key (`ktrv`).
    TestnetPrivate,
    /// Testnet public key (`ktub`).
    TestnetPublic,
}

impl KeyVersion {
    /// The version bytes serialized at the head of an extended key.
    pub fn to_bytes(self) -> [u8; 4] {
        match self {
            KeyVersion::MainnetPrivate => KPRV,
            KeyVersion::MainnetPublic => KPUB,
            KeyVersion::TestnetPrivate => KTRV,
            KeyVersion::TestnetPublic => KTUB,
        }
    }

    /// Parse version bytes; `None` for unrecognized prefixes.
    pub fn from_bytes(bytes: [u8; 4]) -> Option<Self> {
        match bytes {
            KPRV => Some(KeyVersion::MainnetPrivate),
            KPUB => Some(KeyVersion::MainnetPublic),
            KTRV => Some(KeyVersion::TestnetPrivate),
            KTUB => Some(KeyVersion::TestnetPublic),
            _ => None,
        }
    }

    /// Whether this version marks private key material.
    pub fn is_private(self) -> bool {
        matches!(self, KeyVersion::MainnetPrivate | KeyVersion::TestnetPrivate)
    }

    /// The network this version belongs to.
    pub fn network(self) -> Network {
        match self {
            KeyVersion::MainnetPrivate | KeyVersion::MainnetPublic => Network::Mainnet,
            KeyVersion::TestnetPrivate | KeyVersion::TestnetPublic => Network::Testnet,
        }
    }

    /// The private-key version for a network.
    pub fn private_for(network: Network) -> Self {
        match network {
            Network::Mainnet => KeyVersion::MainnetPrivate,
            Network::Testnet => KeyVersion::TestnetPrivate,
        }
    }

    /// The public-key version for a network.
    pub fn public_for(network: Network) -> Self {
        match network {
            Network::Mainnet => KeyVersion::MainnetPublic,
            Network::Testnet => KeyVersion::TestnetPublic,
        }
    }
}

impl fmt::Display for KeyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            KeyVersion::MainnetPrivate => "kprv",
            KeyVersion::MainnetPublic => "kpub",
            KeyVersion::TestnetPrivate => "ktrv",
            KeyVersion::TestnetPublic => "ktub",
        };
        f.write_str(tag)
    }
}
