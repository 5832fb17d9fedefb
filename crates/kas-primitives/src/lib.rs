/// Kaspa SDK - Cryptographic primitives, hashing, and encodings.
///
/// This crate provides the foundational building blocks for the Kaspa
/// wallet-key SDK:
/// - Hash functions (SHA-256, SHA-256d, RIPEMD-160, HMAC-SHA512)
/// - Base58 and Base58Check encoding/decoding
/// - Elliptic curve cryptography (secp256k1 key types and tweak arithmetic)

pub mod hash;
pub mod base58;
pub mod ec;

mod error;
pub use error::PrimitivesError;
