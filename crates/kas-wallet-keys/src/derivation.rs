//! Hierarchical child-key derivation.
//!
//! Implements the standard HMAC-SHA512 construction over secp256k1 for both
//! key kinds: extended private keys support hardened and non-hardened steps,
//! extended public keys support non-hardened steps only. Paths fold
//! left-to-right; deriving through a hardened step from public material is
//! rejected before any work is done.

use kas_primitives::hash::sha512_hmac;

use crate::derivation_path::{ChildNumber, DerivationPath};
use crate::error::KeyError;
use crate::extended_key::{ExtendedPrivateKey, ExtendedPublicKey};

/// BIP44 purpose level.
pub const PURPOSE: u32 = 44;

/// Kaspa's registered coin type.
pub const COIN_TYPE: u32 = 111_111;

/// Chain index for receive (external) addresses.
pub(crate) const RECEIVE_CHAIN: u32 = 0;

/// Chain index for change (internal) addresses.
pub(crate) const CHANGE_CHAIN: u32 = 1;

/// The hardened account prefix `m/44'/111111'/account'`.
pub fn account_path(account_index: u32) -> Result<DerivationPath, KeyError> {
    Ok(DerivationPath::new(vec![
        ChildNumber::new(PURPOSE, true)?,
        ChildNumber::new(COIN_TYPE, true)?,
        ChildNumber::new(account_index, true)?,
    ]))
}

impl ExtendedPrivateKey {
    /// Derive one child, hardened or not.
    ///
    /// Fails with `InvalidChildKey` when the HMAC output is not a usable
    /// scalar (out of range, or a zero child key); callers deriving leaf
    /// indices skip to the next index on that error.
    pub fn derive_child(&self, child: ChildNumber) -> Result<Self, KeyError> {
        let depth = self
            .depth()
            .checked_add(1)
            .ok_or(KeyError::DepthExceeded)?;

        let mut data = Vec::with_capacity(37);
        if child.is_hardened() {
            data.push(0);
            data.extend_from_slice(&self.private_key().to_bytes());
        } else {
            data.extend_from_slice(&self.private_key().pub_key().to_compressed());
        }
        data.extend_from_slice(&child.raw().to_be_bytes());

        let stretched = sha512_hmac(&self.chain_code(), &data);
        let (tweak, chain) = stretched.split_at(32);
        let mut tweak_bytes = [0u8; 32];
        tweak_bytes.copy_from_slice(tweak);

        let child_key = self
            .private_key()
            .add_tweak(&tweak_bytes)
            .map_err(|_| KeyError::InvalidChildKey)?;

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(chain);

        Ok(ExtendedPrivateKey::from_parts(
            self.network(),
            depth,
            self.fingerprint(),
            child,
            chain_code,
            child_key,
        ))
    }

    /// Fold a path left-to-right from this key.
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self, KeyError> {
        let mut key = self.clone();
        for child in path.iter() {
            key = key.derive_child(*child)?;
        }
        Ok(key)
    }
}

impl ExtendedPublicKey {
    /// Derive one non-hardened child.
    ///
    /// Hardened steps need private material and fail with
    /// `HardenedDerivationUnsupported`. `InvalidChildKey` marks an unusable
    /// HMAC output, exactly as in the private-key case.
    pub fn derive_child(&self, child: ChildNumber) -> Result<Self, KeyError> {
        if child.is_hardened() {
            return Err(KeyError::HardenedDerivationUnsupported);
        }
        let depth = self
            .depth()
            .checked_add(1)
            .ok_or(KeyError::DepthExceeded)?;

        let mut data = Vec::with_capacity(37);
        data.extend_from_slice(&self.public_key().to_compressed());
        data.extend_from_slice(&child.raw().to_be_bytes());

        let stretched = sha512_hmac(&self.chain_code(), &data);
        let (tweak, chain) = stretched.split_at(32);
        let mut tweak_bytes = [0u8; 32];
        tweak_bytes.copy_from_slice(tweak);

        let child_key = self
            .public_key()
            .add_tweak(&tweak_bytes)
            .map_err(|_| KeyError::InvalidChildKey)?;

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(chain);

        Ok(ExtendedPublicKey::from_parts(
            self.network(),
            depth,
            self.fingerprint(),
            child,
            chain_code,
            child_key,
        ))
    }

    /// Fold a path left-to-right from this key.
    ///
    /// A path containing any hardened step is rejected up front, producing
    /// no partial derivation.
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self, KeyError> {
        if path.has_hardened() {
            return Err(KeyError::HardenedDerivationUnsupported);
        }
        let mut key = self.clone();
        for child in path.iter() {
            key = key.derive_child(*child)?;
        }
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefix::Network;

    /// Published BIP32 derivation vectors: seed, path, and the expected
    /// private scalar / chain code (and public key where listed).
    const VECTORS_JSON: &str = include_str!("testdata/derivation.vectors.json");

    #[test]
    fn test_derivation_vectors() {
        let vectors: Vec<serde_json::Value> = serde_json::from_str(VECTORS_JSON).unwrap();
        for (i, v) in vectors.iter().enumerate() {
            let seed = hex::decode(v["seed"].as_str().unwrap()).unwrap();
            let path: DerivationPath = v["path"].as_str().unwrap().parse().unwrap();
            let master = ExtendedPrivateKey::new_master(&seed, Network::Mainnet).unwrap();
            let derived = master.derive_path(&path).unwrap();

            assert_eq!(
                derived.private_key().to_hex(),
                v["privateKey"].as_str().unwrap(),
                "vector #{}: private key mismatch",
                i + 1
            );
            assert_eq!(
                hex::encode(derived.chain_code()),
                v["chainCode"].as_str().unwrap(),
                "vector #{}: chain code mismatch",
                i + 1
            );
            if let Some(public_key) = v["publicKey"].as_str() {
                assert_eq!(
                    derived.to_public().public_key().to_hex(),
                    public_key,
                    "vector #{}: public key mismatch",
                    i + 1
                );
            }
            assert_eq!(derived.depth() as usize, path.len());
        }
    }

    #[test]
    fn test_depth_increments_per_step() {
        let master =
            ExtendedPrivateKey::new_master(&[0xab; 32], Network::Mainnet).unwrap();
        let child = master
            .derive_child(ChildNumber::new(0, true).unwrap())
            .unwrap();
        assert_eq!(child.depth(), 1);
        assert_eq!(child.parent_fingerprint(), master.fingerprint());
        let grandchild = child
            .derive_child(ChildNumber::new(1, false).unwrap())
            .unwrap();
        assert_eq!(grandchild.depth(), 2);
    }

    #[test]
    fn test_public_derivation_commutes() {
        let master =
            ExtendedPrivateKey::new_master(&[0x42; 32], Network::Mainnet).unwrap();
        let path: DerivationPath = "m/0/1/2".parse().unwrap();

        let via_private = master.derive_path(&path).unwrap().to_public();
        let via_public = master.to_public().derive_path(&path).unwrap();
        assert_eq!(via_private, via_public);
    }

    #[test]
    fn test_hardened_from_public_fails() {
        let xpub = ExtendedPrivateKey::new_master(&[0x42; 32], Network::Mainnet)
            .unwrap()
            .to_public();

        assert!(matches!(
            xpub.derive_child(ChildNumber::new(0, true).unwrap()),
            Err(KeyError::HardenedDerivationUnsupported)
        ));

        // The whole path is rejected even when the hardened step comes last.
        let path: DerivationPath = "m/0/1/2'".parse().unwrap();
        assert!(matches!(
            xpub.derive_path(&path),
            Err(KeyError::HardenedDerivationUnsupported)
        ));
    }

    #[test]
    fn test_empty_path_is_identity() {
        let master =
            ExtendedPrivateKey::new_master(&[0x42; 32], Network::Mainnet).unwrap();
        let path: DerivationPath = "m".parse().unwrap();
        assert_eq!(master.derive_path(&path).unwrap(), master);
    }

    #[test]
    fn test_account_path_shape() {
        let path = account_path(7).unwrap();
        assert_eq!(path.to_string(), "m/44'/111111'/7'");
        assert!(account_path(ChildNumber::HARDENED_OFFSET).is_err());
    }

    #[test]
    fn test_testnet_derivation_keeps_network() {
        let master =
            ExtendedPrivateKey::new_master(&[0x42; 32], Network::Testnet).unwrap();
        let child = master
            .derive_child(ChildNumber::new(0, false).unwrap())
            .unwrap();
        assert_eq!(child.network(), Network::Testnet);
        assert!(child.to_base58().starts_with("ktrv"));
    }
}
