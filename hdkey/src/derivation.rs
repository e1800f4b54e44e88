use crate::{
    backend::{Backend, Secp256k1Backend},
    ckd,
    error::{Bip32Error, Result},
    node::{HARDENED_OFFSET, PrivateNode, PublicNode, is_hardened},
};
use log::trace;
use std::{fmt, str::FromStr, sync::Arc};

/// A BIP-32 derivation path (e.g., "m/44'/0'/0'/0/1").
///
/// Indices are stored pre-encoded: hardened steps carry the top bit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DerivationPath(Vec<u32>);

impl DerivationPath {
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u32>> for DerivationPath {
    fn from(indices: Vec<u32>) -> Self {
        DerivationPath(indices)
    }
}

impl From<&[u32]> for DerivationPath {
    fn from(indices: &[u32]) -> Self {
        DerivationPath(indices.to_vec())
    }
}

fn invalid_path(path: &str, reason: impl fmt::Display) -> Bip32Error {
    Bip32Error::InvalidPath(format!("{reason} in {path:?}"))
}

fn commit(path: &str, digits: Option<u32>, hardened: bool) -> Result<u32> {
    let index = digits.ok_or_else(|| invalid_path(path, "empty segment"))?;
    if !hardened {
        return Ok(index);
    }
    if index >= HARDENED_OFFSET {
        return Err(invalid_path(path, format_args!("hardened index {index} out of range")));
    }
    Ok(index | HARDENED_OFFSET)
}

impl FromStr for DerivationPath {
    type Err = Bip32Error;

    /// Parses `m`, `m/0`, `m/44'/0'/0` and so on. `h` and `H` are accepted in
    /// place of `'`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let Some(rest) = s.strip_prefix(['m', 'M']) else {
            return Err(invalid_path(s, "missing leading 'm'"));
        };
        if rest.is_empty() {
            return Ok(DerivationPath::default());
        }
        let Some(body) = rest.strip_prefix('/') else {
            return Err(invalid_path(s, "expected '/' after 'm'"));
        };

        let mut indices = Vec::new();
        let mut digits: Option<u32> = None;
        let mut hardened = false;
        for c in body.chars() {
            match c {
                '0'..='9' if !hardened => {
                    let digit = u32::from(c as u8 - b'0');
                    let acc = digits
                        .unwrap_or(0)
                        .checked_mul(10)
                        .and_then(|acc| acc.checked_add(digit))
                        .ok_or_else(|| invalid_path(s, "index overflows u32"))?;
                    digits = Some(acc);
                }
                '\'' | 'h' | 'H' if digits.is_some() && !hardened => hardened = true,
                '/' => {
                    indices.push(commit(s, digits.take(), hardened)?);
                    hardened = false;
                }
                _ => return Err(invalid_path(s, format_args!("unexpected character {c:?}"))),
            }
        }
        indices.push(commit(s, digits, hardened)?);
        Ok(DerivationPath(indices))
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for index in self.iter() {
            if is_hardened(index) {
                write!(f, "/{}'", index & !HARDENED_OFFSET)?;
            } else {
                write!(f, "/{index}")?;
            }
        }
        Ok(())
    }
}

/// One derivation step from a shared parent node.
pub trait CkdFunction<N> {
    fn derive_child(&self, parent: &Arc<N>, index: u32) -> Result<Arc<N>>;
}

/// CKDpriv as a derivation step.
#[derive(Copy, Clone, Debug, Default)]
pub struct PrivateCkd<B = Secp256k1Backend> {
    backend: B,
}

impl PrivateCkd {
    pub fn new() -> Self {
        Self::with_backend(Secp256k1Backend)
    }
}

impl<B: Backend> PrivateCkd<B> {
    pub fn with_backend(backend: B) -> Self {
        PrivateCkd { backend }
    }
}

impl<B: Backend> CkdFunction<PrivateNode> for PrivateCkd<B> {
    fn derive_child(&self, parent: &Arc<PrivateNode>, index: u32) -> Result<Arc<PrivateNode>> {
        ckd::ckd_priv(&self.backend, parent, index).map(Arc::new)
    }
}

/// CKDpub as a derivation step.
#[derive(Copy, Clone, Debug, Default)]
pub struct PublicCkd<B = Secp256k1Backend> {
    backend: B,
}

impl PublicCkd {
    pub fn new() -> Self {
        Self::with_backend(Secp256k1Backend)
    }
}

impl<B: Backend> PublicCkd<B> {
    pub fn with_backend(backend: B) -> Self {
        PublicCkd { backend }
    }
}

impl<B: Backend> CkdFunction<PublicNode> for PublicCkd<B> {
    fn derive_child(&self, parent: &Arc<PublicNode>, index: u32) -> Result<Arc<PublicNode>> {
        ckd::ckd_pub(&self.backend, parent, index).map(Arc::new)
    }
}

/// Walks derivation paths from a fixed root, one [`CkdFunction`] call per
/// step. An empty path yields the root itself.
pub struct Deriver<N, F> {
    root: Arc<N>,
    ckd: F,
}

impl<N, F: CkdFunction<N>> Deriver<N, F> {
    pub fn new(root: N, ckd: F) -> Self {
        Self::with_root(Arc::new(root), ckd)
    }

    /// Starts from an already shared node, e.g. one returned by another walk.
    pub fn with_root(root: Arc<N>, ckd: F) -> Self {
        Deriver { root, ckd }
    }

    pub fn root(&self) -> &Arc<N> {
        &self.root
    }

    pub fn ckd(&self) -> &F {
        &self.ckd
    }

    /// Derives along a textual path such as `m/44'/0'/0`.
    pub fn derive(&self, path: &str) -> Result<Arc<N>> {
        let path: DerivationPath = path.parse()?;
        self.derive_path(&path)
    }

    /// Derives along pre-encoded indices, hardened ones with the top bit set.
    pub fn derive_indices(&self, indices: &[u32]) -> Result<Arc<N>> {
        trace!("deriving {} steps", indices.len());
        let mut node = Arc::clone(&self.root);
        for &index in indices {
            node = self.ckd.derive_child(&node, index)?;
        }
        Ok(node)
    }

    pub fn derive_path(&self, path: &DerivationPath) -> Result<Arc<N>> {
        trace!("deriving {path}");
        self.derive_indices(path.as_slice())
    }
}
