//! Hashing, HMAC and Base58 primitives consumed by the HD key crate.

pub mod base58;
pub mod hash;
pub mod hmac;
