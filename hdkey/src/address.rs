//! Legacy (Base58) P2PKH and P2SH-wrapped witness addresses.

use crate::{codec::ByteWriter, node::PublicNode};
use crypto_utils::{
    base58,
    hash::{checksum4, hash160},
};

/// Version byte, 20-byte hash, 4-byte checksum.
pub const ADDRESS_LEN: usize = 25;

/// `OP_0 PUSH20 hash160(pubkey)`: the P2WPKH program wrapped by P2SH.
const WITNESS_V0_PREFIX: [u8; 2] = [0x00, 0x14];

fn encode(version: u8, data: &[u8]) -> [u8; ADDRESS_LEN] {
    let mut out = [0u8; ADDRESS_LEN];
    let mut writer = ByteWriter::new(&mut out);
    writer.write_u8(version);
    writer.write_bytes(&hash160(data));
    let checksum = checksum4(&out[..21]);
    out[21..].copy_from_slice(&checksum);
    out
}

/// The script hashed into a P2SH-P2WPKH address.
pub fn p2sh_redeem_script(node: &PublicNode) -> [u8; 22] {
    let mut script = [0u8; 22];
    let mut writer = ByteWriter::new(&mut script);
    writer.write_bytes(&WITNESS_V0_PREFIX);
    writer.write_bytes(&hash160(&node.public_key_bytes()));
    script
}

pub fn p2pkh_address_bytes(node: &PublicNode) -> [u8; ADDRESS_LEN] {
    encode(node.network().p2pkh_version, &node.public_key_bytes())
}

pub fn p2sh_address_bytes(node: &PublicNode) -> [u8; ADDRESS_LEN] {
    encode(node.network().p2sh_version, &p2sh_redeem_script(node))
}

pub fn p2pkh_address(node: &PublicNode) -> String {
    base58::encode(&p2pkh_address_bytes(node))
}

pub fn p2sh_address(node: &PublicNode) -> String {
    base58::encode(&p2sh_address_bytes(node))
}
