/// Kaspa SDK - Extended keys and hierarchical-deterministic key generation.
///
/// Provides the `kprv`/`kpub` extended-key codec, hardened and watch-only
/// child derivation, derivation-path handling, and the account-level
/// receive/change key generators for single-signer and multisig wallets.

mod error;
pub use error::KeyError;

pub mod prefix;
pub mod extended_key;
pub mod derivation_path;
pub mod derivation;
pub mod types;
pub mod privkeygen;
pub mod pubkeygen;

pub use derivation_path::{ChildNumber, DerivationPath};
pub use extended_key::{ExtendedPrivateKey, ExtendedPublicKey};
pub use prefix::{KeyVersion, Network};
pub use privkeygen::PrivateKeyGenerator;
pub use pubkeygen::{CosignerSet, GeneratedPublicKey, MultisigOutput, PublicKeyGenerator};
pub use types::{AccountKind, DerivedPrivateKey, DerivedPublicKey};
