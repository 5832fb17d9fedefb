//! Shared types for the key generators.

use kas_primitives::ec::{PrivateKey, PublicKey};

use crate::error::KeyError;

/// Signing arrangement of an account.
///
/// The cosigner index is part of the variant rather than a free-standing
/// optional parameter, so a multisig account without a cosigner slot cannot
/// be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    /// A single-signer account.
    SingleSigner,
    /// A multisig account, identified by the local signer's slot in the
    /// ordered cosigner set.
    Multisig {
        /// The local signer's slot.
        cosigner_index: u32,
    },
}

impl AccountKind {
    /// Map the flag-plus-optional calling convention onto the explicit
    /// variants. Fails with `CosignerIndexRequired` when multisig is
    /// requested without a cosigner index.
    pub fn from_options(
        is_multisig: bool,
        cosigner_index: Option<u32>,
    ) -> Result<Self, KeyError> {
        match (is_multisig, cosigner_index) {
            (false, _) => Ok(AccountKind::SingleSigner),
            (true, Some(cosigner_index)) => Ok(AccountKind::Multisig { cosigner_index }),
            (true, None) => Err(KeyError::CosignerIndexRequired),
        }
    }
}

/// A private key produced by a generator, together with the index it was
/// actually derived at.
///
/// The recorded index normally equals the requested one; it is greater when
/// the requested slot produced an unusable child key and the generator
/// skipped forward. Comparing the two detects the skip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedPrivateKey {
    /// The raw signing key.
    pub key: PrivateKey,
    /// The index the key was derived at.
    pub index: u32,
}

/// A public key produced by a generator, together with the index it was
/// actually derived at. See [`DerivedPrivateKey`] for the skip semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedPublicKey {
    /// The raw public key.
    pub key: PublicKey,
    /// The index the key was derived at.
    pub index: u32,
}
