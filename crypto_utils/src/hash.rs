use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

pub fn sha256(input: &[u8]) -> [u8; 32] {
    Sha256::digest(input).into()
}

/// SHA-256 applied twice.
pub fn sha256d(input: &[u8]) -> [u8; 32] {
    sha256(&sha256(input))
}

pub fn ripemd160(input: &[u8]) -> [u8; 20] {
    Ripemd160::digest(input).into()
}

/// RIPEMD-160 of SHA-256, the identifier hash used for fingerprints and addresses.
pub fn hash160(input: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(input))
}

/// First four bytes of the double SHA-256 of `input`.
pub fn checksum4(input: &[u8]) -> [u8; 4] {
    let digest = sha256d(input);
    [digest[0], digest[1], digest[2], digest[3]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn sha256_abc() {
        let expected = hex!("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
        assert_eq!(sha256(b"abc"), expected);
    }

    #[test]
    fn sha256d_hello() {
        let expected = hex!("9595c9df90075148eb06860365df33584b75bff782a510c6cd4883a419833d50");
        assert_eq!(sha256d(b"hello"), expected);
    }

    #[test]
    fn ripemd160_abc() {
        let expected = hex!("8eb208f7e05d987a9b044a8e98c6b087f15a0bfc");
        assert_eq!(ripemd160(b"abc"), expected);
    }

    #[test]
    fn hash160_of_bip32_vector1_master_point() {
        // compressed public key of the master node of BIP32 test vector 1
        let point = hex!("0339a36013301597daef41fbe593a02cc513d0b55527ec2df1050e2e8ff49c85c2");
        assert_eq!(
            hash160(&point),
            hex!("3442193e1bb70916e914552172cd4e2dbc9df811")
        );
    }

    #[test]
    fn checksum_is_prefix_of_double_sha() {
        let digest = sha256d(b"hello");
        assert_eq!(checksum4(b"hello"), digest[..4]);
        assert_eq!(checksum4(b"hello"), hex!("9595c9df"));
    }
}
