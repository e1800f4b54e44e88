//! Extended private and public keys.

use crate::{
    address,
    backend::{Secp256k1Backend, public_key_of},
    cache::DerivationCache,
    ckd,
    derivation::{DerivationPath, Deriver, PrivateCkd, PublicCkd},
    error::{Bip32Error, Result},
    network::Network,
    serializer::{self, KeyField, KeyFields, SERIALIZED_LEN},
};
use crypto_utils::{base58, hash::hash160, hmac::hmac_sha512};
use secp256k1::{PublicKey, SecretKey};
use std::{borrow::Cow, fmt, str::FromStr};
use zeroize::{Zeroize, Zeroizing};

/// Index offset for hardened children (index >= 0x80000000) i.e., 0x80000000 = 2³¹
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

const BITCOIN_SEED: &[u8] = b"Bitcoin seed";

pub fn is_hardened(index: u32) -> bool {
    index & HARDENED_OFFSET != 0
}

pub fn hardened(index: u32) -> u32 {
    index | HARDENED_OFFSET
}

/// Big-endian `u32` of the first four bytes of `hash160(point)`.
pub fn fingerprint(point: &PublicKey) -> u32 {
    let digest = hash160(&point.serialize());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Every field of an extended key, as raw bytes, for [`PrivateNode::new`] and
/// [`PublicNode::new`]. Lengths and key validity are checked on construction.
#[derive(Clone, Copy)]
pub struct KeyParams<'a> {
    pub network: Network,
    pub depth: u8,
    pub parent_fingerprint: u32,
    pub child_number: u32,
    pub chain_code: &'a [u8],
    /// 32-byte scalar for a private key, 33-byte compressed point for a public key.
    pub key: &'a [u8],
}

impl KeyParams<'_> {
    fn chain_code(&self) -> Result<[u8; 32]> {
        self.chain_code
            .try_into()
            .map_err(|_| Bip32Error::bad_serialization("Chain code must be 32 bytes"))
    }
}

impl fmt::Debug for KeyParams<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyParams")
            .field("network", &self.network.name)
            .field("depth", &self.depth)
            .field("parent_fingerprint", &self.parent_fingerprint)
            .field("child_number", &self.child_number)
            .field("key", &"...")
            .finish_non_exhaustive()
    }
}

/// Extended private key (xprv)
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateNode {
    pub(crate) network: Network,
    pub(crate) depth: u8,
    pub(crate) parent_fingerprint: u32,
    pub(crate) child_number: u32,
    pub(crate) chain_code: [u8; 32],
    pub(crate) secret: SecretKey,
    pub(crate) public_key: PublicKey,
}

/// Extended public key (xpub)
#[derive(Clone, PartialEq, Eq)]
pub struct PublicNode {
    pub(crate) network: Network,
    pub(crate) depth: u8,
    pub(crate) parent_fingerprint: u32,
    pub(crate) child_number: u32,
    pub(crate) chain_code: [u8; 32],
    pub(crate) public_key: PublicKey,
}

impl PrivateNode {
    pub fn new(params: KeyParams<'_>) -> Result<Self> {
        let chain_code = params.chain_code()?;
        if params.key.len() != 32 {
            return Err(Bip32Error::bad_serialization(
                "Key must be 32 bytes for non neutered serialization",
            ));
        }
        let secret = SecretKey::from_slice(params.key)
            .map_err(|_| Bip32Error::bad_serialization("Invalid private key"))?;
        Ok(Self::from_parts(
            params.network,
            params.depth,
            params.parent_fingerprint,
            params.child_number,
            chain_code,
            secret,
        ))
    }

    pub(crate) fn from_parts(
        network: Network,
        depth: u8,
        parent_fingerprint: u32,
        child_number: u32,
        chain_code: [u8; 32],
        secret: SecretKey,
    ) -> Self {
        PrivateNode {
            network,
            depth,
            parent_fingerprint,
            child_number,
            chain_code,
            public_key: public_key_of(&secret),
            secret,
        }
    }

    /// Master extended private key from a seed
    pub fn from_seed(seed: &[u8], network: Network) -> Result<Self> {
        if !(16..=64).contains(&seed.len()) {
            return Err(Bip32Error::InvalidSeed);
        }
        let i = hmac_sha512(BITCOIN_SEED, seed);
        let (il, ir) = i.split_at(32);
        let secret = SecretKey::from_slice(il).map_err(|_| Bip32Error::InvalidSeed)?;
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(ir);
        Ok(Self::from_parts(network, 0, 0, 0, chain_code, secret))
    }

    /// Child key derivation for private keys (CKDpriv).
    pub fn ckd_priv(&self, index: u32) -> Result<PrivateNode> {
        ckd::ckd_priv(&Secp256k1Backend, self, index)
    }

    /// Public child by private derivation followed by neutering, so hardened
    /// indices are allowed.
    pub fn ckd_pub(&self, index: u32) -> Result<PublicNode> {
        Ok(self.ckd_priv(index)?.neuter())
    }

    /// Walks `path` from this node. The root path `m` borrows `self`. Use a
    /// [`Deriver`](crate::Deriver) to share intermediate nodes between walks.
    pub fn derive(&self, path: &str) -> Result<Cow<'_, PrivateNode>> {
        let path: DerivationPath = path.parse()?;
        let mut node = Cow::Borrowed(self);
        for index in path.iter() {
            node = Cow::Owned(node.ckd_priv(index)?);
        }
        Ok(node)
    }

    /// Takes ownership of this node as the root of a [`Deriver`].
    pub fn deriver(self) -> Deriver<PrivateNode, PrivateCkd> {
        Deriver::new(self, PrivateCkd::new())
    }

    /// As [`deriver`](Self::deriver), with every step memoized.
    pub fn deriver_with_cache(
        self,
    ) -> Deriver<PrivateNode, DerivationCache<PrivateNode, PrivateCkd>> {
        Deriver::new(self, DerivationCache::new(PrivateCkd::new()))
    }

    /// The public-only counterpart with the same chain code and metadata.
    pub fn neuter(&self) -> PublicNode {
        PublicNode {
            network: self.network,
            depth: self.depth,
            parent_fingerprint: self.parent_fingerprint,
            child_number: self.child_number,
            chain_code: self.chain_code,
            public_key: self.public_key,
        }
    }

    /// Same key under another network's version bytes.
    pub fn to_network(&self, network: Network) -> Cow<'_, PrivateNode> {
        if self.network == network {
            return Cow::Borrowed(self);
        }
        let mut node = self.clone();
        node.network = network;
        Cow::Owned(node)
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn parent_fingerprint(&self) -> u32 {
        self.parent_fingerprint
    }

    pub fn child_number(&self) -> u32 {
        self.child_number
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    pub fn fingerprint(&self) -> u32 {
        fingerprint(&self.public_key)
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn public_key_bytes(&self) -> [u8; 33] {
        self.public_key.serialize()
    }

    pub fn secret_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.secret.secret_bytes())
    }

    /// The 82-byte layout: version, depth, parent fingerprint, child number,
    /// chain code, `0x00 ‖ scalar`, checksum.
    pub fn serialize(&self) -> Zeroizing<[u8; SERIALIZED_LEN]> {
        let scalar = self.secret_bytes();
        serializer::serialize(&KeyFields {
            version: self.network.private_version,
            depth: self.depth,
            parent_fingerprint: self.parent_fingerprint,
            child_number: self.child_number,
            chain_code: &self.chain_code,
            key: KeyField::Private(&scalar),
        })
    }

    pub fn to_base58(&self) -> Zeroizing<String> {
        Zeroizing::new(base58::encode(&*self.serialize()))
    }
}

impl Drop for PrivateNode {
    fn drop(&mut self) {
        self.secret.non_secure_erase();
        self.chain_code.zeroize();
    }
}

impl fmt::Debug for PrivateNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parent_fingerprint = format!("{:08x}", self.parent_fingerprint);
        f.debug_struct("PrivateNode")
            .field("network", &self.network.name)
            .field("depth", &self.depth)
            .field("parent_fingerprint", &parent_fingerprint)
            .field("child_number", &self.child_number)
            .field("private_key", &"...")
            .finish()
    }
}

impl FromStr for PrivateNode {
    type Err = Bip32Error;

    fn from_str(xprv: &str) -> Result<Self> {
        serializer::Deserializer::default().deserialize_private_base58(xprv)
    }
}

impl PublicNode {
    pub fn new(params: KeyParams<'_>) -> Result<Self> {
        let chain_code = params.chain_code()?;
        if params.key.len() != 33 {
            return Err(Bip32Error::bad_serialization(
                "Key must be 33 bytes for neutered serialization",
            ));
        }
        let public_key = PublicKey::from_slice(params.key)
            .map_err(|_| Bip32Error::bad_serialization("Invalid public key"))?;
        Ok(PublicNode {
            network: params.network,
            depth: params.depth,
            parent_fingerprint: params.parent_fingerprint,
            child_number: params.child_number,
            chain_code,
            public_key,
        })
    }

    /// Child key derivation for public keys (CKDpub). Hardened indices fail
    /// with [`Bip32Error::InvalidDerivation`].
    pub fn ckd_pub(&self, index: u32) -> Result<PublicNode> {
        ckd::ckd_pub(&Secp256k1Backend, self, index)
    }

    /// As [`PrivateNode::derive`], rejecting hardened steps.
    pub fn derive(&self, path: &str) -> Result<Cow<'_, PublicNode>> {
        let path: DerivationPath = path.parse()?;
        let mut node = Cow::Borrowed(self);
        for index in path.iter() {
            node = Cow::Owned(node.ckd_pub(index)?);
        }
        Ok(node)
    }

    pub fn deriver(self) -> Deriver<PublicNode, PublicCkd> {
        Deriver::new(self, PublicCkd::new())
    }

    pub fn deriver_with_cache(self) -> Deriver<PublicNode, DerivationCache<PublicNode, PublicCkd>> {
        Deriver::new(self, DerivationCache::new(PublicCkd::new()))
    }

    pub fn to_network(&self, network: Network) -> Cow<'_, PublicNode> {
        if self.network == network {
            return Cow::Borrowed(self);
        }
        let mut node = self.clone();
        node.network = network;
        Cow::Owned(node)
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn parent_fingerprint(&self) -> u32 {
        self.parent_fingerprint
    }

    pub fn child_number(&self) -> u32 {
        self.child_number
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    pub fn fingerprint(&self) -> u32 {
        fingerprint(&self.public_key)
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn public_key_bytes(&self) -> [u8; 33] {
        self.public_key.serialize()
    }

    pub fn serialize(&self) -> Zeroizing<[u8; SERIALIZED_LEN]> {
        let point = self.public_key.serialize();
        serializer::serialize(&KeyFields {
            version: self.network.public_version,
            depth: self.depth,
            parent_fingerprint: self.parent_fingerprint,
            child_number: self.child_number,
            chain_code: &self.chain_code,
            key: KeyField::Public(&point),
        })
    }

    pub fn to_base58(&self) -> String {
        base58::encode(&*self.serialize())
    }

    pub fn p2pkh_address(&self) -> String {
        address::p2pkh_address(self)
    }

    pub fn p2sh_address(&self) -> String {
        address::p2sh_address(self)
    }
}

impl fmt::Debug for PublicNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parent_fingerprint = format!("{:08x}", self.parent_fingerprint);
        f.debug_struct("PublicNode")
            .field("network", &self.network.name)
            .field("depth", &self.depth)
            .field("parent_fingerprint", &parent_fingerprint)
            .field("child_number", &self.child_number)
            .field("public_key", &self.public_key)
            .finish()
    }
}

impl fmt::Display for PublicNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl FromStr for PublicNode {
    type Err = Bip32Error;

    fn from_str(xpub: &str) -> Result<Self> {
        serializer::Deserializer::default().deserialize_public_base58(xpub)
    }
}

/// Either kind of extended key, for callers that do not know ahead of time
/// whether they hold a private or a public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExtendedKey {
    Private(PrivateNode),
    Public(PublicNode),
}

impl ExtendedKey {
    pub fn is_private(&self) -> bool {
        matches!(self, ExtendedKey::Private(_))
    }

    pub fn network(&self) -> Network {
        match self {
            ExtendedKey::Private(k) => k.network(),
            ExtendedKey::Public(k) => k.network(),
        }
    }

    pub fn depth(&self) -> u8 {
        match self {
            ExtendedKey::Private(k) => k.depth(),
            ExtendedKey::Public(k) => k.depth(),
        }
    }

    pub fn parent_fingerprint(&self) -> u32 {
        match self {
            ExtendedKey::Private(k) => k.parent_fingerprint(),
            ExtendedKey::Public(k) => k.parent_fingerprint(),
        }
    }

    pub fn child_number(&self) -> u32 {
        match self {
            ExtendedKey::Private(k) => k.child_number(),
            ExtendedKey::Public(k) => k.child_number(),
        }
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        match self {
            ExtendedKey::Private(k) => k.chain_code(),
            ExtendedKey::Public(k) => k.chain_code(),
        }
    }

    pub fn serialize(&self) -> Zeroizing<[u8; SERIALIZED_LEN]> {
        match self {
            ExtendedKey::Private(k) => k.serialize(),
            ExtendedKey::Public(k) => k.serialize(),
        }
    }

    pub fn to_base58(&self) -> Zeroizing<String> {
        match self {
            ExtendedKey::Private(k) => k.to_base58(),
            ExtendedKey::Public(k) => Zeroizing::new(k.to_base58()),
        }
    }

    pub fn neuter(&self) -> PublicNode {
        match self {
            ExtendedKey::Private(k) => k.neuter(),
            ExtendedKey::Public(k) => k.clone(),
        }
    }

    pub fn to_network(&self, network: Network) -> Cow<'_, ExtendedKey> {
        if self.network() == network {
            return Cow::Borrowed(self);
        }
        Cow::Owned(match self {
            ExtendedKey::Private(k) => ExtendedKey::Private(k.to_network(network).into_owned()),
            ExtendedKey::Public(k) => ExtendedKey::Public(k.to_network(network).into_owned()),
        })
    }
}

impl From<PrivateNode> for ExtendedKey {
    fn from(node: PrivateNode) -> Self {
        ExtendedKey::Private(node)
    }
}

impl From<PublicNode> for ExtendedKey {
    fn from(node: PublicNode) -> Self {
        ExtendedKey::Public(node)
    }
}

impl FromStr for ExtendedKey {
    type Err = Bip32Error;

    fn from_str(s: &str) -> Result<Self> {
        serializer::Deserializer::default().deserialize_base58(s)
    }
}
