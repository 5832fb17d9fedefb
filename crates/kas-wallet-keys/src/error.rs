/// Error types for extended-key and derivation operations.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("malformed extended key: {0}")]
    InvalidFormat(String),
    #[error("invalid derivation path: {0}")]
    InvalidPath(String),
    #[error("unrecognized extended key version bytes")]
    UnknownVersion,
    #[error("expected a private extended key")]
    ExpectedPrivate,
    #[error("expected a public extended key")]
    ExpectedPublic,
    #[error("seed length {0} outside the supported 16..=64 byte range")]
    InvalidSeedLength(usize),
    #[error("index {0} exceeds the non-hardened range")]
    IndexOutOfRange(u32),
    #[error("derivation produced an out-of-range child key")]
    InvalidChildKey,
    #[error("maximum derivation depth reached")]
    DepthExceeded,
    #[error("hardened derivation requires private key material")]
    HardenedDerivationUnsupported,
    #[error("multisig accounts require a cosigner index")]
    CosignerIndexRequired,
    #[error("cosigner index {index} out of range for a set of {len}")]
    CosignerIndexOutOfRange { index: u32, len: usize },
    #[error("insufficient cosigners: threshold {threshold} but only {got} keys")]
    InsufficientCosigners { threshold: usize, got: usize },
    #[error("cosigner keys must share a common depth")]
    CosignerDepthMismatch,
    #[error("invalid threshold: {0}")]
    InvalidThreshold(String),
    #[error("primitives error: {0}")]
    Primitives(#[from] kas_primitives::PrimitivesError),
}
