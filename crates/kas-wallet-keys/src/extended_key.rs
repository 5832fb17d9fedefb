//! Extended private/public keys and their Base58Check string codec.
//!
//! An extended key couples key material with a 32-byte chain code plus the
//! metadata needed to place it in a derivation tree: network, depth, parent
//! fingerprint, and the child number it was derived at. Values are immutable;
//! derivation always returns a new key.
//!
//! Serialized layout (78 bytes under Base58Check):
//! version (4) | depth (1) | parent fingerprint (4) | child number (4) |
//! chain code (32) | key material (33).

use kas_primitives::base58;
use kas_primitives::ec::{PrivateKey, PublicKey};
use kas_primitives::hash::{hash160, sha512_hmac};

use crate::derivation_path::ChildNumber;
use crate::error::KeyError;
use crate::prefix::{KeyVersion, Network};

/// Length of a serialized extended key before the checksum.
pub(crate) const SERIALIZED_LEN: usize = 78;

/// HMAC key used to stretch a seed into the master key. Kaspa retains the
/// BIP32 salt for derivation compatibility.
const MASTER_SEED_KEY: &[u8] = b"Bitcoin seed";

/// Compute the 4-byte fingerprint of a public key:
/// the first four bytes of hash160 over the compressed encoding.
pub(crate) fn key_fingerprint(key: &PublicKey) -> [u8; 4] {
    let digest = hash160(&key.to_compressed());
    let mut fingerprint = [0u8; 4];
    fingerprint.copy_from_slice(&digest[..4]);
    fingerprint
}

/// An extended private key (`kprv`/`ktrv`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtendedPrivateKey {
    network: Network,
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_number: ChildNumber,
    chain_code: [u8; 32],
    private_key: PrivateKey,
}

impl ExtendedPrivateKey {
    /// Build the master extended private key from a seed.
    ///
    /// The seed must be 16 to 64 bytes; it is stretched with HMAC-SHA512
    /// into the master scalar and chain code.
    pub fn new_master(seed: &[u8], network: Network) -> Result<Self, KeyError> {
        if seed.len() < 16 || seed.len() > 64 {
            return Err(KeyError::InvalidSeedLength(seed.len()));
        }
        let stretched = sha512_hmac(MASTER_SEED_KEY, seed);
        let (scalar, chain) = stretched.split_at(32);
        let private_key = PrivateKey::from_bytes(scalar)?;
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(chain);
        Ok(ExtendedPrivateKey {
            network,
            depth: 0,
            parent_fingerprint: [0u8; 4],
            child_number: ChildNumber::from_raw(0),
            chain_code,
            private_key,
        })
    }

    /// Decode an extended private key from its Base58Check string.
    pub fn from_base58(s: &str) -> Result<Self, KeyError> {
        let data = base58::check_decode(s)
            .map_err(|e| KeyError::InvalidFormat(e.to_string()))?;
        let (version, depth, parent_fingerprint, child_number, chain_code) =
            decode_common(&data)?;
        if !version.is_private() {
            return Err(KeyError::ExpectedPrivate);
        }
        if data[45] != 0 {
            return Err(KeyError::InvalidFormat(
                "private key material must begin with 0x00".to_string(),
            ));
        }
        let private_key = PrivateKey::from_bytes(&data[46..SERIALIZED_LEN])
            .map_err(|e| KeyError::InvalidFormat(e.to_string()))?;
        Ok(ExtendedPrivateKey {
            network: version.network(),
            depth,
            parent_fingerprint,
            child_number,
            chain_code,
            private_key,
        })
    }

    /// Encode this key as its Base58Check string (`kprv...`/`ktrv...`).
    pub fn to_base58(&self) -> String {
        let mut payload = Vec::with_capacity(SERIALIZED_LEN);
        payload.extend_from_slice(&KeyVersion::private_for(self.network).to_bytes());
        payload.push(self.depth);
        payload.extend_from_slice(&self.parent_fingerprint);
        payload.extend_from_slice(&self.child_number.raw().to_be_bytes());
        payload.extend_from_slice(&self.chain_code);
        payload.push(0);
        payload.extend_from_slice(&self.private_key.to_bytes());
        base58::check_encode(&payload)
    }

    /// Project this key onto its extended public counterpart.
    pub fn to_public(&self) -> ExtendedPublicKey {
        ExtendedPublicKey {
            network: self.network,
            depth: self.depth,
            parent_fingerprint: self.parent_fingerprint,
            child_number: self.child_number,
            chain_code: self.chain_code,
            public_key: self.private_key.pub_key(),
        }
    }

    /// Fingerprint of this key, used as the parent fingerprint of its
    /// children.
    pub fn fingerprint(&self) -> [u8; 4] {
        key_fingerprint(&self.private_key.pub_key())
    }

    /// The network this key belongs to.
    pub fn network(&self) -> Network {
        self.network
    }

    /// Depth in the derivation tree (0 for the master key).
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Fingerprint of the parent key (zero for the master key).
    pub fn parent_fingerprint(&self) -> [u8; 4] {
        self.parent_fingerprint
    }

    /// The child number this key was derived at (zero for the master key).
    pub fn child_number(&self) -> ChildNumber {
        self.child_number
    }

    /// The 32-byte chain code.
    pub fn chain_code(&self) -> [u8; 32] {
        self.chain_code
    }

    /// The raw signing key.
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Assemble a derived child. Only derivation code constructs non-master
    /// keys.
    pub(crate) fn from_parts(
        network: Network,
        depth: u8,
        parent_fingerprint: [u8; 4],
        child_number: ChildNumber,
        chain_code: [u8; 32],
        private_key: PrivateKey,
    ) -> Self {
        ExtendedPrivateKey {
            network,
            depth,
            parent_fingerprint,
            child_number,
            chain_code,
            private_key,
        }
    }
}

/// An extended public key (`kpub`/`ktub`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtendedPublicKey {
    network: Network,
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_number: ChildNumber,
    chain_code: [u8; 32],
    public_key: PublicKey,
}

impl ExtendedPublicKey {
    /// Decode an extended public key from its Base58Check string.
    pub fn from_base58(s: &str) -> Result<Self, KeyError> {
        let data = base58::check_decode(s)
            .map_err(|e| KeyError::InvalidFormat(e.to_string()))?;
        let (version, depth, parent_fingerprint, child_number, chain_code) =
            decode_common(&data)?;
        if version.is_private() {
            return Err(KeyError::ExpectedPublic);
        }
        let public_key = PublicKey::from_bytes(&data[45..SERIALIZED_LEN])
            .map_err(|e| KeyError::InvalidFormat(e.to_string()))?;
        Ok(ExtendedPublicKey {
            network: version.network(),
            depth,
            parent_fingerprint,
            child_number,
            chain_code,
            public_key,
        })
    }

    /// Encode this key as its Base58Check string (`kpub...`/`ktub...`).
    pub fn to_base58(&self) -> String {
        let mut payload = Vec::with_capacity(SERIALIZED_LEN);
        payload.extend_from_slice(&KeyVersion::public_for(self.network).to_bytes());
        payload.push(self.depth);
        payload.extend_from_slice(&self.parent_fingerprint);
        payload.extend_from_slice(&self.child_number.raw().to_be_bytes());
        payload.extend_from_slice(&self.chain_code);
        payload.extend_from_slice(&self.public_key.to_compressed());
        base58::check_encode(&payload)
    }

    /// Fingerprint of this key, used as the parent fingerprint of its
    /// children.
    pub fn fingerprint(&self) -> [u8; 4] {
        key_fingerprint(&self.public_key)
    }

    /// The network this key belongs to.
    pub fn network(&self) -> Network {
        self.network
    }

    /// Depth in the derivation tree (0 for the master key).
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Fingerprint of the parent key (zero for the master key).
    pub fn parent_fingerprint(&self) -> [u8; 4] {
        self.parent_fingerprint
    }

    /// The child number this key was derived at (zero for the master key).
    pub fn child_number(&self) -> ChildNumber {
        self.child_number
    }

    /// The 32-byte chain code.
    pub fn chain_code(&self) -> [u8; 32] {
        self.chain_code
    }

    /// The raw public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Assemble a derived child. Only derivation code constructs non-master
    /// keys.
    pub(crate) fn from_parts(
        network: Network,
        depth: u8,
        parent_fingerprint: [u8; 4],
        child_number: ChildNumber,
        chain_code: [u8; 32],
        public_key: PublicKey,
    ) -> Self {
        ExtendedPublicKey {
            network,
            depth,
            parent_fingerprint,
            child_number,
            chain_code,
            public_key,
        }
    }
}

/// Parse the fields shared by both key kinds from a decoded payload.
fn decode_common(
    data: &[u8],
) -> Result<(KeyVersion, u8, [u8; 4], ChildNumber, [u8; 32]), KeyError> {
    if data.len() != SERIALIZED_LEN {
        return Err(KeyError::InvalidFormat(format!(
            "expected {SERIALIZED_LEN} payload bytes, got {}",
            data.len()
        )));
    }
    let mut version_bytes = [0u8; 4];
    version_bytes.copy_from_slice(&data[0..4]);
    let version = KeyVersion::from_bytes(version_bytes).ok_or(KeyError::UnknownVersion)?;

    let depth = data[4];
    let mut parent_fingerprint = [0u8; 4];
    parent_fingerprint.copy_from_slice(&data[5..9]);
    let mut child_bytes = [0u8; 4];
    child_bytes.copy_from_slice(&data[9..13]);
    let child_number = ChildNumber::from_raw(u32::from_be_bytes(child_bytes));

    // Master keys carry no parent metadata.
    if depth == 0 && (parent_fingerprint != [0u8; 4] || child_number.raw() != 0) {
        return Err(KeyError::InvalidFormat(
            "zero-depth key with parent metadata".to_string(),
        ));
    }

    let mut chain_code = [0u8; 32];
    chain_code.copy_from_slice(&data[13..45]);
    Ok((version, depth, parent_fingerprint, child_number, chain_code))
}
