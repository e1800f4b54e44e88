pub mod address;
pub mod backend;
pub mod cache;
pub mod ckd;
pub mod codec;
pub mod derivation;
pub mod error;
pub mod network;
pub mod node;
pub mod serializer;

pub use cache::DerivationCache;
pub use derivation::{CkdFunction, DerivationPath, Deriver, PrivateCkd, PublicCkd};
pub use error::{Bip32Error, Result};
pub use network::{
    BITCOIN_MAINNET, BITCOIN_TESTNET, DEFAULT_NETWORKS, LITECOIN_MAINNET, Network, Networks,
};
pub use node::{
    ExtendedKey, HARDENED_OFFSET, KeyParams, PrivateNode, PublicNode, hardened, is_hardened,
};
pub use serializer::Deserializer;
