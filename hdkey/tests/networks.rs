use hdkey::{
    BITCOIN_MAINNET, BITCOIN_TESTNET, Bip32Error, Deserializer, ExtendedKey, LITECOIN_MAINNET,
    Network, Networks, PrivateNode, PublicNode,
};
use std::borrow::Cow;

const XPRV: &str = "xprv9vY6fgoGUnMv3Hkci9aPs6SbcV3dBkErDL4oiYsEwkTMXtdDVy6Ng3m4FFWjjLVkrQ8ZcDnCsQZuVbyXbHDVzbG9aMK5oD7kUM76SpiNxuT";
const XPUB: &str = "xpub69XT5CLAK9vDFmq5pB7QEEPLAWt7bCxhaYzQWwGrW5zLQgxN3WQdDr5Y6WTX3bd2zTFv3zHvEBvHGkTRt4VBpDxYo6vxunzEoXGN5RWbveB";

const TPRV: &str = "tprv8h32u4uFFpteVm9KA3TJ1QGypPx3AnzQzgp94ViSwtfhBS3vJ8QyxZHXiPi55QpK6fhyB2P8GZJsuersFDEQCABbqLewrA7obiz5jKURc6F";
const TPUB: &str = "tpubDDj53UwVQCaKPEB73h7tQow6PRTyL8BKZzQvM1kkNAU61vJgvXEa93uPtWpsvaMNenwzJztGA9owTgD6rin6PASKDiZHMJCefsEChkEeVWe";

#[test]
fn coerce_private_to_litecoin() {
    let key: PrivateNode = XPRV.parse().unwrap();
    let ltc = key.to_network(LITECOIN_MAINNET);
    assert_eq!(
        ltc.to_base58().as_str(),
        "Ltpv74nDw47exShFtGQCA3d21WfLokWVGjvBdK6Mg3FfwQ3SYhQ6Nbrw2tTiD23kc48wmWhqgjRj2VGZV76bzQCUdhdVXvGG7AAnGjizWFc1cic"
    );
    assert_eq!(ltc.to_network(BITCOIN_MAINNET).to_base58().as_str(), XPRV);
}

#[test]
fn coerce_public_to_litecoin() {
    let key: PublicNode = XPUB.parse().unwrap();
    let ltc = key.to_network(LITECOIN_MAINNET);
    assert_eq!(
        ltc.to_base58(),
        "Ltub2VxZXqYCCbEDW972Qf7Q66VZFKCgLzUqhqCPM21xsaq394bAhWuN3VZyTNyYi12HaffVe7gU5DZfNqpYnxadf9jy6EpRaUkHJ22hywhADZM"
    );
    assert_eq!(ltc.to_network(BITCOIN_MAINNET).to_base58(), XPUB);
}

#[test]
fn coercing_to_same_network_borrows() {
    let key: ExtendedKey = XPRV.parse().unwrap();
    assert!(matches!(key.to_network(BITCOIN_MAINNET), Cow::Borrowed(_)));
    assert!(matches!(key.to_network(BITCOIN_TESTNET), Cow::Owned(_)));
}

#[test]
fn serialization_round_trip_keeps_every_field() {
    for s in [
        "xprv9uV9es6LEpAQpJbAQgwFC28T2d8hvMmrtT2oo2w39LkBbuESTfH1E6NqyShMVoUqkGW6gqYZGBBuA5i9oSLEiVNTZL9HTqee2ddm4LnQLVP",
        "xpub68UW4NdE5Bii2nfdWiUFZA5BaeyCKpViFfxQbRLehgHAUhZb1CbFmthKphmWQQ2QecqhLdwtbNbFUXhGWCk4EfDRCcVSuoNs71xmzRCkoFz",
        TPRV,
        TPUB,
    ] {
        let key: ExtendedKey = s.parse().unwrap();
        assert_eq!(key.to_base58().as_str(), s);
    }

    let key: ExtendedKey = TPRV.parse().unwrap();
    assert!(key.is_private());
    assert_eq!(key.network(), BITCOIN_TESTNET);
    assert_eq!(key.depth(), 3);
    assert_eq!(key.parent_fingerprint(), 0xe774_a5b6);
    assert_eq!(key.child_number(), 0x8000_0000);
    assert_eq!(key.neuter().to_base58(), TPUB);
}

#[test]
fn unknown_network_is_reported_per_kind() {
    const MAINNET_ONLY: &[Network] = &[BITCOIN_MAINNET];
    let deserializer = Deserializer::new(Networks::new(MAINNET_ONLY));

    let err = deserializer.deserialize_private_base58(TPRV).unwrap_err();
    let expected = "Can't find network that matches private version 0x4358394";
    assert_eq!(err.to_string(), expected);
    let err = deserializer.deserialize_public_base58(TPUB).unwrap_err();
    let expected = "Can't find network that matches public version 0x43587cf";
    assert_eq!(err.to_string(), expected);
    let err = deserializer.deserialize_base58(TPUB).unwrap_err();
    assert!(matches!(err, Bip32Error::UnknownNetwork { .. }));

    // the default table knows testnet
    let deserializer = Deserializer::default();
    assert!(deserializer.deserialize_private_base58(TPRV).is_ok());
}

#[test]
fn custom_network_table() {
    const DOGE: Network = Network {
        name: "dogecoin",
        private_version: 0x02fa_c398,
        public_version: 0x02fa_cafd,
        p2pkh_version: 0x1e,
        p2sh_version: 0x16,
    };
    const TABLE: &[Network] = &[BITCOIN_MAINNET, DOGE];

    let xprv: PrivateNode = XPRV.parse().unwrap();
    let doge = xprv.to_network(DOGE);
    let encoded = doge.to_base58();
    assert!(encoded.starts_with("dgpv"));

    let deserializer = Deserializer::new(Networks::new(TABLE));
    let parsed = deserializer.deserialize_private_base58(&encoded).unwrap();
    assert_eq!(parsed.network(), DOGE);
    assert_eq!(parsed.secret_bytes(), xprv.secret_bytes());
    let err = encoded.parse::<PrivateNode>().unwrap_err();
    assert!(matches!(err, Bip32Error::UnknownNetwork { .. }));
}
