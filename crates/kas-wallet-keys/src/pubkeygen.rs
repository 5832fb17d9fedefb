//! Watch-only public key generation, single-signer and multisig.

use crate::derivation::{CHANGE_CHAIN, RECEIVE_CHAIN};
use crate::derivation_path::ChildNumber;
use crate::error::KeyError;
use crate::extended_key::ExtendedPublicKey;
use crate::types::DerivedPublicKey;

/// An ordered set of cosigner account keys for a threshold-of-N policy.
///
/// The keys are account-level extended public keys in their agreed order;
/// `local_index` names the slot belonging to the local signer. All members
/// must sit at the same depth of their respective trees.
#[derive(Clone, Debug)]
pub struct CosignerSet {
    keys: Vec<ExtendedPublicKey>,
    local_index: u32,
    threshold: usize,
}

impl CosignerSet {
    /// Validate and build a cosigner set.
    pub fn new(
        keys: Vec<ExtendedPublicKey>,
        local_index: u32,
        threshold: usize,
    ) -> Result<Self, KeyError> {
        if threshold == 0 {
            return Err(KeyError::InvalidThreshold(
                "threshold must be at least 1".to_string(),
            ));
        }
        if keys.len() < threshold {
            return Err(KeyError::InsufficientCosigners {
                threshold,
                got: keys.len(),
            });
        }
        if local_index as usize >= keys.len() {
            return Err(KeyError::CosignerIndexOutOfRange {
                index: local_index,
                len: keys.len(),
            });
        }
        if keys.iter().any(|k| k.depth() != keys[0].depth()) {
            return Err(KeyError::CosignerDepthMismatch);
        }
        Ok(CosignerSet {
            keys,
            local_index,
            threshold,
        })
    }

    /// The ordered cosigner keys.
    pub fn keys(&self) -> &[ExtendedPublicKey] {
        &self.keys
    }

    /// The local signer's slot.
    pub fn local_index(&self) -> u32 {
        self.local_index
    }

    /// Number of signatures the policy requires.
    pub fn threshold(&self) -> usize {
        self.threshold
    }
}

/// The full key set of a threshold policy at one address index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultisigOutput {
    /// Number of signatures required to spend.
    pub required: usize,
    /// Member public keys, sorted by compressed encoding.
    pub keys: Vec<DerivedPublicKey>,
}

/// What a [`PublicKeyGenerator`] hands back per index: a single key, or the
/// combined key set of a multisig policy, depending on how the generator was
/// configured.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GeneratedPublicKey {
    /// One public key: solo mode, or the local cosigner's key.
    Single(DerivedPublicKey),
    /// The combined sorted key set of the policy.
    Multisig(MultisigOutput),
}

impl GeneratedPublicKey {
    /// The single key, if this output carries one.
    pub fn single(&self) -> Option<&DerivedPublicKey> {
        match self {
            GeneratedPublicKey::Single(key) => Some(key),
            GeneratedPublicKey::Multisig(_) => None,
        }
    }

    /// The combined key set, if this output carries one.
    pub fn multisig(&self) -> Option<&MultisigOutput> {
        match self {
            GeneratedPublicKey::Single(_) => None,
            GeneratedPublicKey::Multisig(output) => Some(output),
        }
    }
}

/// Receive and change chains of one cosigner (or of a solo account).
#[derive(Clone, Debug)]
struct RoleChains {
    receive: ExtendedPublicKey,
    change: ExtendedPublicKey,
}

impl RoleChains {
    fn from_branch(branch: &ExtendedPublicKey) -> Result<Self, KeyError> {
        Ok(RoleChains {
            receive: branch.derive_child(ChildNumber::new(RECEIVE_CHAIN, false)?)?,
            change: branch.derive_child(ChildNumber::new(CHANGE_CHAIN, false)?)?,
        })
    }

    fn chain(&self, chain_index: u32) -> &ExtendedPublicKey {
        if chain_index == RECEIVE_CHAIN {
            &self.receive
        } else {
            &self.change
        }
    }
}

#[derive(Clone, Debug)]
enum Mode {
    Solo(RoleChains),
    Multisig {
        cosigners: Vec<RoleChains>,
        local: usize,
        threshold: usize,
        combine: bool,
    },
}

/// Derives receive and change public keys without ever holding private
/// material.
///
/// The generator starts from account-level extended public keys: the
/// hardened account prefix cannot be walked from public material, so the
/// caller supplies keys already sitting at the account level. Role chains
/// are derived once at construction and cached.
#[derive(Clone, Debug)]
pub struct PublicKeyGenerator {
    mode: Mode,
}

impl PublicKeyGenerator {
    /// Build a solo watch-only generator from an account-level extended
    /// public key string.
    ///
    /// For a multisig cosigner's solo view, `cosigner_index` selects the
    /// local slot; `None` means a plain single-signer account.
    pub fn from_xpub(
        account_xpub: &str,
        cosigner_index: Option<u32>,
    ) -> Result<Self, KeyError> {
        let account = ExtendedPublicKey::from_base58(account_xpub)?;
        let branch = match cosigner_index {
            Some(slot) => account.derive_child(ChildNumber::new(slot, false)?)?,
            None => account,
        };
        Ok(PublicKeyGenerator {
            mode: Mode::Solo(RoleChains::from_branch(&branch)?),
        })
    }

    /// Build a multisig generator from a full cosigner set.
    ///
    /// Each cosigner's chains are derived under that cosigner's slot of its
    /// own account key, so every holder of the ordered set reconstructs the
    /// same chains. With `combine_outputs` the per-index output is the
    /// sorted key set of the whole policy; without it, only the local
    /// cosigner's key.
    pub fn from_cosigner_set(
        set: CosignerSet,
        combine_outputs: bool,
    ) -> Result<Self, KeyError> {
        let local = set.local_index() as usize;
        let threshold = set.threshold();
        let mut cosigners = Vec::with_capacity(set.keys().len());
        for (slot, key) in set.keys().iter().enumerate() {
            let branch = key.derive_child(ChildNumber::new(slot as u32, false)?)?;
            cosigners.push(RoleChains::from_branch(&branch)?);
        }
        Ok(PublicKeyGenerator {
            mode: Mode::Multisig {
                cosigners,
                local,
                threshold,
                combine: combine_outputs,
            },
        })
    }

    /// The public key output at `index` on the receive chain.
    pub fn receive_pubkey(&self, index: u32) -> Result<GeneratedPublicKey, KeyError> {
        self.generate(RECEIVE_CHAIN, index)
    }

    /// The public key output at `index` on the change chain.
    pub fn change_pubkey(&self, index: u32) -> Result<GeneratedPublicKey, KeyError> {
        self.generate(CHANGE_CHAIN, index)
    }

    fn generate(&self, chain_index: u32, index: u32) -> Result<GeneratedPublicKey, KeyError> {
        match &self.mode {
            Mode::Solo(chains) => Ok(GeneratedPublicKey::Single(index_pubkey(
                chains.chain(chain_index),
                index,
            )?)),
            Mode::Multisig {
                cosigners,
                local,
                threshold,
                combine,
            } => {
                if !combine {
                    return Ok(GeneratedPublicKey::Single(index_pubkey(
                        cosigners[*local].chain(chain_index),
                        index,
                    )?));
                }
                let mut keys = Vec::with_capacity(cosigners.len());
                for chains in cosigners {
                    keys.push(index_pubkey(chains.chain(chain_index), index)?);
                }
                keys.sort_by(|a, b| a.key.to_compressed().cmp(&b.key.to_compressed()));
                Ok(GeneratedPublicKey::Multisig(MultisigOutput {
                    required: *threshold,
                    keys,
                }))
            }
        }
    }
}

/// Derive the first usable public key at or after `index` on a chain.
fn index_pubkey(
    chain: &ExtendedPublicKey,
    index: u32,
) -> Result<DerivedPublicKey, KeyError> {
    let mut candidate = index;
    loop {
        match chain.derive_child(ChildNumber::new(candidate, false)?) {
            Ok(child) => {
                return Ok(DerivedPublicKey {
                    key: child.public_key().clone(),
                    index: candidate,
                });
            }
            Err(KeyError::InvalidChildKey) => {
                candidate = candidate
                    .checked_add(1)
                    .ok_or(KeyError::IndexOutOfRange(index))?;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derivation::account_path;
    use crate::extended_key::ExtendedPrivateKey;
    use crate::prefix::Network;
    use crate::privkeygen::PrivateKeyGenerator;
    use crate::types::AccountKind;

    fn root() -> ExtendedPrivateKey {
        ExtendedPrivateKey::new_master(&[0x5a; 32], Network::Mainnet).unwrap()
    }

    fn account_xpub(root: &ExtendedPrivateKey, account_index: u32) -> ExtendedPublicKey {
        root.derive_path(&account_path(account_index).unwrap())
            .unwrap()
            .to_public()
    }

    fn cosigner_roots() -> Vec<ExtendedPrivateKey> {
        [[0x11u8; 32], [0x22; 32], [0x33; 32]]
            .iter()
            .map(|seed| ExtendedPrivateKey::new_master(seed, Network::Mainnet).unwrap())
            .collect()
    }

    #[test]
    fn test_solo_commutes_with_private_generator() {
        let root = root();
        let private_generator = PrivateKeyGenerator::new(
            &root.to_base58(),
            AccountKind::SingleSigner,
            0,
        )
        .unwrap();
        let public_generator =
            PublicKeyGenerator::from_xpub(&account_xpub(&root, 0).to_base58(), None)
                .unwrap();

        for index in [0u32, 1, 7] {
            let private = private_generator.receive_key(index).unwrap();
            let output = public_generator.receive_pubkey(index).unwrap();
            let public = output.single().unwrap();
            assert_eq!(public.key, private.key.pub_key());
            assert_eq!(public.index, private.index);

            let private_change = private_generator.change_key(index).unwrap();
            let public_change = public_generator.change_pubkey(index).unwrap();
            assert_eq!(
                public_change.single().unwrap().key,
                private_change.key.pub_key()
            );
        }
    }

    #[test]
    fn test_solo_determinism() {
        let root = root();
        let generator =
            PublicKeyGenerator::from_xpub(&account_xpub(&root, 0).to_base58(), None)
                .unwrap();
        assert_eq!(
            generator.receive_pubkey(4).unwrap(),
            generator.receive_pubkey(4).unwrap()
        );
        assert_ne!(
            generator.receive_pubkey(0).unwrap(),
            generator.change_pubkey(0).unwrap()
        );
    }

    #[test]
    fn test_cosigner_set_validation() {
        let accounts: Vec<ExtendedPublicKey> = cosigner_roots()
            .iter()
            .map(|r| account_xpub(r, 0))
            .collect();

        assert!(CosignerSet::new(accounts.clone(), 1, 2).is_ok());

        assert!(matches!(
            CosignerSet::new(accounts[..1].to_vec(), 0, 2),
            Err(KeyError::InsufficientCosigners { threshold: 2, got: 1 })
        ));
        assert!(matches!(
            CosignerSet::new(accounts.clone(), 3, 2),
            Err(KeyError::CosignerIndexOutOfRange { index: 3, len: 3 })
        ));
        assert!(matches!(
            CosignerSet::new(accounts.clone(), 0, 0),
            Err(KeyError::InvalidThreshold(_))
        ));

        // One member sitting at a different depth.
        let mut mismatched = accounts;
        mismatched[2] = cosigner_roots()[2].to_public();
        assert!(matches!(
            CosignerSet::new(mismatched, 0, 2),
            Err(KeyError::CosignerDepthMismatch)
        ));
    }

    #[test]
    fn test_combined_output_is_sorted_and_complete() {
        let accounts: Vec<ExtendedPublicKey> = cosigner_roots()
            .iter()
            .map(|r| account_xpub(r, 0))
            .collect();
        let set = CosignerSet::new(accounts, 1, 2).unwrap();
        let generator = PublicKeyGenerator::from_cosigner_set(set, true).unwrap();

        let output = generator.receive_pubkey(0).unwrap();
        let multisig = output.multisig().unwrap();
        assert_eq!(multisig.required, 2);
        assert_eq!(multisig.keys.len(), 3);
        for window in multisig.keys.windows(2) {
            assert!(window[0].key.to_compressed() <= window[1].key.to_compressed());
        }
    }

    #[test]
    fn test_local_output_matches_private_cosigner() {
        let roots = cosigner_roots();
        let accounts: Vec<ExtendedPublicKey> =
            roots.iter().map(|r| account_xpub(r, 0)).collect();

        let set = CosignerSet::new(accounts, 1, 2).unwrap();
        let generator = PublicKeyGenerator::from_cosigner_set(set, false).unwrap();

        let private_generator = PrivateKeyGenerator::new(
            &roots[1].to_base58(),
            AccountKind::Multisig { cosigner_index: 1 },
            0,
        )
        .unwrap();

        let public = generator.receive_pubkey(5).unwrap();
        let private = private_generator.receive_key(5).unwrap();
        assert_eq!(public.single().unwrap().key, private.key.pub_key());
    }

    #[test]
    fn test_combined_contains_every_cosigner() {
        let roots = cosigner_roots();
        let accounts: Vec<ExtendedPublicKey> =
            roots.iter().map(|r| account_xpub(r, 0)).collect();
        let set = CosignerSet::new(accounts, 0, 2).unwrap();
        let generator = PublicKeyGenerator::from_cosigner_set(set, true).unwrap();
        let output = generator.receive_pubkey(0).unwrap();
        let combined = output.multisig().unwrap();

        for (slot, root) in roots.iter().enumerate() {
            let private_generator = PrivateKeyGenerator::new(
                &root.to_base58(),
                AccountKind::Multisig {
                    cosigner_index: slot as u32,
                },
                0,
            )
            .unwrap();
            let expected = private_generator.receive_key(0).unwrap().key.pub_key();
            assert!(combined.keys.iter().any(|k| k.key == expected));
        }
    }

    #[test]
    fn test_solo_view_of_cosigner_slot() {
        let roots = cosigner_roots();
        let accounts: Vec<ExtendedPublicKey> =
            roots.iter().map(|r| account_xpub(r, 0)).collect();

        // Watch slot 1 through from_xpub and through the full set.
        let solo =
            PublicKeyGenerator::from_xpub(&accounts[1].to_base58(), Some(1)).unwrap();
        let set = CosignerSet::new(accounts, 1, 2).unwrap();
        let full = PublicKeyGenerator::from_cosigner_set(set, false).unwrap();

        assert_eq!(
            solo.receive_pubkey(3).unwrap(),
            full.receive_pubkey(3).unwrap()
        );
    }

    #[test]
    fn test_malformed_xpub_rejected() {
        assert!(PublicKeyGenerator::from_xpub("kpub1nonsense", None).is_err());
    }
}
