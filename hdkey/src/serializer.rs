//! The fixed extended-key layout.
//!
//! ```text
//! offset  len  field
//!      0    4  version
//!      4    1  depth
//!      5    4  parent fingerprint
//!      9    4  child number
//!     13   32  chain code
//!     45   33  0x00 ‖ scalar (private) or compressed point (public)
//!     78    4  first four bytes of sha256d(bytes[0..78])
//! ```

use crate::{
    codec::{ByteReader, ByteWriter},
    error::{Bip32Error, Result},
    network::{DEFAULT_NETWORKS, Network, Networks},
    node::{ExtendedKey, KeyParams, PrivateNode, PublicNode},
};
use crypto_utils::{base58, hash::checksum4};
use log::debug;
use zeroize::Zeroizing;

/// Bytes covered by the checksum.
pub const PAYLOAD_LEN: usize = 78;
/// Payload plus checksum.
pub const SERIALIZED_LEN: usize = PAYLOAD_LEN + 4;

const KEY_OFFSET: usize = 45;

pub(crate) enum KeyField<'a> {
    Private(&'a [u8; 32]),
    Public(&'a [u8; 33]),
}

pub(crate) struct KeyFields<'a> {
    pub version: u32,
    pub depth: u8,
    pub parent_fingerprint: u32,
    pub child_number: u32,
    pub chain_code: &'a [u8; 32],
    pub key: KeyField<'a>,
}

pub(crate) fn serialize(fields: &KeyFields<'_>) -> Zeroizing<[u8; SERIALIZED_LEN]> {
    let mut out = Zeroizing::new([0u8; SERIALIZED_LEN]);
    let mut writer = ByteWriter::new(&mut out[..]);
    writer.write_u32_be(fields.version);
    writer.write_u8(fields.depth);
    writer.write_u32_be(fields.parent_fingerprint);
    writer.write_u32_be(fields.child_number);
    writer.write_bytes(fields.chain_code);
    match fields.key {
        KeyField::Private(scalar) => {
            writer.write_u8(0);
            writer.write_bytes(scalar);
        }
        KeyField::Public(point) => writer.write_bytes(point),
    }
    debug_assert_eq!(writer.position(), PAYLOAD_LEN);
    let checksum = checksum4(&out[..PAYLOAD_LEN]);
    out[PAYLOAD_LEN..].copy_from_slice(&checksum);
    out
}

/// Header fields shared by both key kinds, read after length and checksum
/// have been verified.
struct Header<'b> {
    version: u32,
    depth: u8,
    parent_fingerprint: u32,
    child_number: u32,
    chain_code: &'b [u8],
    key: &'b [u8],
}

fn read_header(bytes: &[u8]) -> Result<Header<'_>> {
    if bytes.len() != SERIALIZED_LEN {
        let msg = format!("Expected {SERIALIZED_LEN} bytes, got {}", bytes.len());
        return Err(Bip32Error::bad_serialization(msg));
    }
    let (payload, checksum) = bytes.split_at(PAYLOAD_LEN);
    if checksum4(payload) != checksum {
        return Err(Bip32Error::Checksum);
    }

    let truncated = || Bip32Error::bad_serialization("Truncated extended key");
    let mut reader = ByteReader::new(payload);
    let version = reader.read_u32_be().ok_or_else(truncated)?;
    let depth = reader.read_u8().ok_or_else(truncated)?;
    let parent_fingerprint = reader.read_u32_be().ok_or_else(truncated)?;
    let child_number = reader.read_u32_be().ok_or_else(truncated)?;
    let chain_code = reader.read_slice(32).ok_or_else(truncated)?;
    debug_assert_eq!(reader.position(), KEY_OFFSET);
    let key = reader.read_slice(33).ok_or_else(truncated)?;
    debug_assert_eq!(reader.remaining(), 0);

    if depth == 0 && parent_fingerprint != 0 {
        return Err(Bip32Error::bad_serialization("Zero depth with non-zero parent fingerprint"));
    }
    if depth == 0 && child_number != 0 {
        return Err(Bip32Error::bad_serialization("Zero depth with non-zero child number"));
    }

    Ok(Header {
        version,
        depth,
        parent_fingerprint,
        child_number,
        chain_code,
        key,
    })
}

impl Header<'_> {
    fn into_private(self, network: Network) -> Result<PrivateNode> {
        if self.key[0] != 0 {
            let msg = format!("Expected 0 padding at position {KEY_OFFSET}");
            return Err(Bip32Error::bad_serialization(msg));
        }
        PrivateNode::new(KeyParams {
            network,
            depth: self.depth,
            parent_fingerprint: self.parent_fingerprint,
            child_number: self.child_number,
            chain_code: self.chain_code,
            key: &self.key[1..],
        })
    }

    fn into_public(self, network: Network) -> Result<PublicNode> {
        PublicNode::new(KeyParams {
            network,
            depth: self.depth,
            parent_fingerprint: self.parent_fingerprint,
            child_number: self.child_number,
            chain_code: self.chain_code,
            key: self.key,
        })
    }
}

/// Parses serialized extended keys, resolving version bytes through a
/// [`Networks`] table.
#[derive(Copy, Clone, Debug)]
pub struct Deserializer<'a> {
    networks: Networks<'a>,
}

impl Default for Deserializer<'static> {
    fn default() -> Self {
        Deserializer::new(DEFAULT_NETWORKS)
    }
}

impl<'a> Deserializer<'a> {
    pub const fn new(networks: Networks<'a>) -> Self {
        Deserializer { networks }
    }

    pub fn deserialize_private(&self, bytes: &[u8]) -> Result<PrivateNode> {
        let header = read_header(bytes)?;
        let network = *self.networks.find_by_private_version(header.version)?;
        debug!("{} private key at depth {}", network.name, header.depth);
        header.into_private(network)
    }

    pub fn deserialize_public(&self, bytes: &[u8]) -> Result<PublicNode> {
        let header = read_header(bytes)?;
        let network = *self.networks.find_by_public_version(header.version)?;
        debug!("{} public key at depth {}", network.name, header.depth);
        header.into_public(network)
    }

    /// Private or public, whichever the version bytes name.
    pub fn deserialize(&self, bytes: &[u8]) -> Result<ExtendedKey> {
        let header = read_header(bytes)?;
        match self.networks.find_by_private_version(header.version) {
            Ok(network) => header.into_private(*network).map(ExtendedKey::Private),
            Err(_) => {
                let network = *self.networks.find_by_public_version(header.version)?;
                header.into_public(network).map(ExtendedKey::Public)
            }
        }
    }

    pub fn deserialize_private_base58(&self, s: &str) -> Result<PrivateNode> {
        let bytes = Zeroizing::new(base58::decode(s)?);
        self.deserialize_private(&bytes)
    }

    pub fn deserialize_public_base58(&self, s: &str) -> Result<PublicNode> {
        self.deserialize_public(&base58::decode(s)?)
    }

    pub fn deserialize_base58(&self, s: &str) -> Result<ExtendedKey> {
        let bytes = Zeroizing::new(base58::decode(s)?);
        self.deserialize(&bytes)
    }
}
