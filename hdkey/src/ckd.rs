//! Child key derivation (CKDpriv and CKDpub).
//!
//! When `parse256(IL) >= n`, or the child scalar is zero, or the child point is
//! the point at infinity, the index yields no valid key and derivation moves on
//! to the next index. The returned node records the index actually used.

use crate::{
    backend::Backend,
    codec::ByteWriter,
    error::{Bip32Error, Result},
    node::{PrivateNode, PublicNode, is_hardened},
};
use log::warn;
use secp256k1::{Scalar, constants::CURVE_ORDER};
use zeroize::Zeroizing;

const DATA_LEN: usize = 37;

/// `IL` as a scalar tweak, erased on drop.
struct Tweak(Scalar);

impl Tweak {
    fn erase(&mut self) {
        self.0.non_secure_erase();
    }
}

impl Drop for Tweak {
    fn drop(&mut self) {
        self.erase();
    }
}

/// `IL` as a tweak, or `None` when it is not below the curve order.
fn parse256(il: &[u8]) -> Option<Tweak> {
    if il >= &CURVE_ORDER[..] {
        return None;
    }
    let mut bytes = Zeroizing::new([0u8; 32]);
    bytes.copy_from_slice(il);
    Scalar::from_be_bytes(*bytes).ok().map(Tweak)
}

fn split_chain_code(ir: &[u8]) -> [u8; 32] {
    let mut chain_code = [0u8; 32];
    chain_code.copy_from_slice(ir);
    chain_code
}

fn child_depth(depth: u8) -> Result<u8> {
    depth.checked_add(1).ok_or(Bip32Error::DepthOverflow)
}

fn next_index(index: u32) -> Result<u32> {
    let Some(next) = index.checked_add(1) else {
        return Err(Bip32Error::IndexOverflow(index));
    };
    warn!("index {index:#x} gives an invalid key, trying {next:#x}");
    Ok(next)
}

pub fn ckd_priv<B: Backend + ?Sized>(
    backend: &B,
    parent: &PrivateNode,
    index: u32,
) -> Result<PrivateNode> {
    let depth = child_depth(parent.depth)?;
    let parent_point = parent.public_key.serialize();
    let mut index = index;
    loop {
        let mut data = Zeroizing::new([0u8; DATA_LEN]);
        {
            let mut writer = ByteWriter::new(&mut data[..]);
            if is_hardened(index) {
                writer.write_u8(0);
                writer.write_bytes(&*parent.secret_bytes());
            } else {
                writer.write_bytes(&parent_point);
            }
            writer.write_u32_be(index);
        }

        let i = backend.hmac_sha512(&parent.chain_code, &data[..]);
        let (il, ir) = i.split_at(32);

        // child = (IL + k_par) mod n
        let child = parse256(il).and_then(|tweak| backend.add_scalar(&parent.secret, &tweak.0));
        if let Some(secret) = child {
            return Ok(PrivateNode::from_parts(
                parent.network,
                depth,
                parent.fingerprint(),
                index,
                split_chain_code(ir),
                secret,
            ));
        }
        index = next_index(index)?;
    }
}

pub fn ckd_pub<B: Backend + ?Sized>(
    backend: &B,
    parent: &PublicNode,
    index: u32,
) -> Result<PublicNode> {
    if is_hardened(index) {
        return Err(Bip32Error::InvalidDerivation);
    }
    let depth = child_depth(parent.depth)?;
    let parent_point = parent.public_key.serialize();
    let mut index = index;
    loop {
        let mut data = [0u8; DATA_LEN];
        {
            let mut writer = ByteWriter::new(&mut data);
            writer.write_bytes(&parent_point);
            writer.write_u32_be(index);
        }

        let i = backend.hmac_sha512(&parent.chain_code, &data);
        let (il, ir) = i.split_at(32);

        // child = IL·G + K_par
        let child = parse256(il).and_then(|tweak| backend.add_point(&parent.public_key, &tweak.0));
        if let Some(public_key) = child {
            return Ok(PublicNode {
                network: parent.network,
                depth,
                parent_fingerprint: parent.fingerprint(),
                child_number: index,
                chain_code: split_chain_code(ir),
                public_key,
            });
        }
        index = next_index(index)?;
        if is_hardened(index) {
            return Err(Bip32Error::InvalidDerivation);
        }
    }
}
