use crypto_utils::base58::Base58Error;
use std::fmt;
use thiserror::Error;

/// Which half of a network's version pair failed to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionKind {
    Private,
    Public,
}

impl fmt::Display for VersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionKind::Private => f.write_str("private"),
            VersionKind::Public => f.write_str("public"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Bip32Error {
    #[error("Cannot derive a hardened key from a public key")]
    InvalidDerivation,

    #[error("{0}")]
    BadSerialization(String),

    #[error("Checksum error")]
    Checksum,

    #[error("Can't find network that matches {kind} version {version:#x}")]
    UnknownNetwork { kind: VersionKind, version: u32 },

    #[error("Invalid derivation path: {0}")]
    InvalidPath(String),

    #[error("Seed must be 16 to 64 bytes and produce a valid master key")]
    InvalidSeed,

    #[error("Maximum derivation depth of 255 exceeded")]
    DepthOverflow,

    #[error("No valid child key at or after index {0:#x}")]
    IndexOverflow(u32),

    #[error(transparent)]
    Base58(#[from] Base58Error),
}

impl Bip32Error {
    pub(crate) fn bad_serialization(msg: impl Into<String>) -> Self {
        Bip32Error::BadSerialization(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Bip32Error>;
