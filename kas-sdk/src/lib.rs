#![deny(missing_docs)]

//! Kaspa wallet-key SDK - Complete SDK.
//!
//! Re-exports all wallet-key SDK components for convenient single-crate
//! usage.

pub use kas_primitives as primitives;
pub use kas_wallet_keys as wallet_keys;
