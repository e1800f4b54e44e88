//! Version bytes per coin and network.

use crate::error::{Bip32Error, Result, VersionKind};

/// Version bytes used when serializing keys and encoding addresses.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Network {
    pub name: &'static str,
    /// Prefix of serialized private keys (`xprv`, `tprv`, ...)
    pub private_version: u32,
    /// Prefix of serialized public keys (`xpub`, `tpub`, ...)
    pub public_version: u32,
    pub p2pkh_version: u8,
    pub p2sh_version: u8,
}

pub const BITCOIN_MAINNET: Network = Network {
    name: "bitcoin",
    private_version: 0x0488_ade4,
    public_version: 0x0488_b21e,
    p2pkh_version: 0x00,
    p2sh_version: 0x05,
};

pub const BITCOIN_TESTNET: Network = Network {
    name: "bitcoin-testnet",
    private_version: 0x0435_8394,
    public_version: 0x0435_87cf,
    p2pkh_version: 0x6f,
    p2sh_version: 0xc4,
};

pub const LITECOIN_MAINNET: Network = Network {
    name: "litecoin",
    private_version: 0x019d_9cfe,
    public_version: 0x019d_a462,
    p2pkh_version: 0x30,
    p2sh_version: 0x32,
};

/// Networks recognised when deserializing without an explicit table.
pub const DEFAULT_NETWORKS: Networks<'static> =
    Networks::new(&[BITCOIN_MAINNET, BITCOIN_TESTNET, LITECOIN_MAINNET]);

/// Immutable lookup table from version bytes to [`Network`].
#[derive(Copy, Clone, Debug)]
pub struct Networks<'a> {
    networks: &'a [Network],
}

impl<'a> Networks<'a> {
    pub const fn new(networks: &'a [Network]) -> Self {
        Networks { networks }
    }

    pub fn find_by_private_version(&self, version: u32) -> Result<&'a Network> {
        self.networks
            .iter()
            .find(|n| n.private_version == version)
            .ok_or(Bip32Error::UnknownNetwork {
                kind: VersionKind::Private,
                version,
            })
    }

    pub fn find_by_public_version(&self, version: u32) -> Result<&'a Network> {
        self.networks
            .iter()
            .find(|n| n.public_version == version)
            .ok_or(Bip32Error::UnknownNetwork {
                kind: VersionKind::Public,
                version,
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Network> {
        self.networks.iter()
    }
}

impl Default for Networks<'static> {
    fn default() -> Self {
        DEFAULT_NETWORKS
    }
}
