//! Account-level private key generation.

use crate::derivation::{account_path, CHANGE_CHAIN, RECEIVE_CHAIN};
use crate::derivation_path::ChildNumber;
use crate::error::KeyError;
use crate::extended_key::ExtendedPrivateKey;
use crate::types::{AccountKind, DerivedPrivateKey};

/// Derives receive and change private keys for one wallet account.
///
/// Construction resolves the hardened account prefix
/// (`m/44'/111111'/account'`), inserts the cosigner slot for multisig
/// accounts, and caches the two chain-level extended keys; each
/// `receive_key`/`change_key` call then costs a single child derivation.
///
/// When an index yields an unusable child key, the generator skips forward
/// and returns the first valid key at or after the requested index; the
/// returned record carries the index actually used.
#[derive(Clone, Debug)]
pub struct PrivateKeyGenerator {
    receive: ExtendedPrivateKey,
    change: ExtendedPrivateKey,
}

impl PrivateKeyGenerator {
    /// Build a generator from a root extended private key string.
    ///
    /// Fails with `IndexOutOfRange` when `account_index` is not below 2^31,
    /// and with any codec error the root string carries. No generator is
    /// returned on failure.
    pub fn new(
        root_xprv: &str,
        kind: AccountKind,
        account_index: u32,
    ) -> Result<Self, KeyError> {
        let root = ExtendedPrivateKey::from_base58(root_xprv)?;
        let account = root.derive_path(&account_path(account_index)?)?;
        let branch = match kind {
            AccountKind::SingleSigner => account,
            AccountKind::Multisig { cosigner_index } => {
                account.derive_child(ChildNumber::new(cosigner_index, false)?)?
            }
        };
        let receive = branch.derive_child(ChildNumber::new(RECEIVE_CHAIN, false)?)?;
        let change = branch.derive_child(ChildNumber::new(CHANGE_CHAIN, false)?)?;
        Ok(PrivateKeyGenerator { receive, change })
    }

    /// The private key at `index` on the receive chain.
    pub fn receive_key(&self, index: u32) -> Result<DerivedPrivateKey, KeyError> {
        index_key(&self.receive, index)
    }

    /// The private key at `index` on the change chain.
    pub fn change_key(&self, index: u32) -> Result<DerivedPrivateKey, KeyError> {
        index_key(&self.change, index)
    }
}

/// Derive the first usable key at or after `index` on a chain.
fn index_key(
    chain: &ExtendedPrivateKey,
    index: u32,
) -> Result<DerivedPrivateKey, KeyError> {
    let mut candidate = index;
    loop {
        match chain.derive_child(ChildNumber::new(candidate, false)?) {
            Ok(child) => {
                return Ok(DerivedPrivateKey {
                    key: child.private_key().clone(),
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
