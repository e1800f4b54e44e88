use hdkey::{
    BITCOIN_MAINNET, Bip32Error, DerivationPath, ExtendedKey, HARDENED_OFFSET, PrivateNode,
    PublicNode,
};
use proptest::prelude::*;

fn seed() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 16..=64)
}

fn normal_path() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0..HARDENED_OFFSET, 0..5)
}

fn any_path() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(any::<u32>(), 0..4)
}

fn root(seed: &[u8]) -> PrivateNode {
    PrivateNode::from_seed(seed, BITCOIN_MAINNET).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn serialized_keys_read_back(seed in seed(), path in any_path()) {
        let node = root(&seed).deriver().derive_indices(&path).unwrap();
        let xprv = node.to_base58();
        let xpub = node.neuter().to_base58();

        prop_assert_eq!(xprv.parse::<PrivateNode>().unwrap(), (*node).clone());
        prop_assert_eq!(xpub.parse::<PublicNode>().unwrap(), node.neuter());
        prop_assert_eq!(xprv.parse::<ExtendedKey>().unwrap().to_base58(), xprv);
    }

    #[test]
    fn public_derivation_matches_private_then_neuter(seed in seed(), path in normal_path()) {
        let master = root(&seed);
        let via_private = master.clone().deriver().derive_indices(&path).unwrap().neuter();
        let via_public = master.neuter().deriver().derive_indices(&path).unwrap();
        prop_assert_eq!(*via_private.serialize(), *via_public.serialize());
    }

    #[test]
    fn derivation_is_deterministic(seed in seed(), path in any_path()) {
        let text = DerivationPath::from(path.clone()).to_string();
        let master = root(&seed);
        let first = master.derive(&text).unwrap();
        let second = master.clone().deriver().derive_indices(&path).unwrap();
        prop_assert_eq!(*first.serialize(), *second.serialize());
    }

    #[test]
    fn hardened_index_from_public_key_fails(seed in seed(), index in HARDENED_OFFSET..=u32::MAX) {
        let public = root(&seed).neuter();
        let err = public.ckd_pub(index).unwrap_err();
        prop_assert_eq!(err, Bip32Error::InvalidDerivation);
    }

    #[test]
    fn path_text_round_trips(path in any_path()) {
        let path = DerivationPath::from(path);
        prop_assert_eq!(path.to_string().parse::<DerivationPath>().unwrap(), path);
    }
}
