//! The elliptic-curve and HMAC operations child key derivation relies on.
//!
//! Derivation is written against [`Backend`] so the rare failure branches of
//! CKD (tweak out of range, zero scalar, point at infinity) can be driven
//! deterministically in tests.

use crypto_utils::hmac::hmac_sha512;
use secp256k1::{PublicKey, Scalar, SecretKey, global::SECP256K1};
use zeroize::Zeroizing;

pub trait Backend: Send + Sync {
    fn hmac_sha512(&self, key: &[u8], data: &[u8]) -> Zeroizing<[u8; 64]>;

    /// `(secret + tweak) mod n`, or `None` if the sum is zero.
    fn add_scalar(&self, secret: &SecretKey, tweak: &Scalar) -> Option<SecretKey>;

    /// `tweak·G + point`, or `None` for the point at infinity.
    fn add_point(&self, point: &PublicKey, tweak: &Scalar) -> Option<PublicKey>;
}

/// libsecp256k1 through the process-wide context.
#[derive(Copy, Clone, Debug, Default)]
pub struct Secp256k1Backend;

impl Backend for Secp256k1Backend {
    fn hmac_sha512(&self, key: &[u8], data: &[u8]) -> Zeroizing<[u8; 64]> {
        hmac_sha512(key, data)
    }

    fn add_scalar(&self, secret: &SecretKey, tweak: &Scalar) -> Option<SecretKey> {
        secret.add_tweak(tweak).ok()
    }

    fn add_point(&self, point: &PublicKey, tweak: &Scalar) -> Option<PublicKey> {
        point.add_exp_tweak(SECP256K1, tweak).ok()
    }
}

impl<B: Backend + ?Sized> Backend for &B {
    fn hmac_sha512(&self, key: &[u8], data: &[u8]) -> Zeroizing<[u8; 64]> {
        (**self).hmac_sha512(key, data)
    }

    fn add_scalar(&self, secret: &SecretKey, tweak: &Scalar) -> Option<SecretKey> {
        (**self).add_scalar(secret, tweak)
    }

    fn add_point(&self, point: &PublicKey, tweak: &Scalar) -> Option<PublicKey> {
        (**self).add_point(point, tweak)
    }
}

/// Public point of a secret scalar.
pub(crate) fn public_key_of(secret: &SecretKey) -> PublicKey {
    PublicKey::from_secret_key(SECP256K1, secret)
}

#[cfg(test)]
pub(crate) mod fake {
    //! Scripted backend for the improbable branches of CKD.

    use super::*;
    use parking_lot::Mutex;
    use std::collections::VecDeque;

    /// Replays queued HMAC outputs before falling back to the real HMAC, and
    /// can report the next point addition as the point at infinity.
    #[derive(Default)]
    pub struct FakeBackend {
        hmac_responses: Mutex<VecDeque<[u8; 64]>>,
        infinities: Mutex<usize>,
    }

    impl FakeBackend {
        pub fn with_hmac_responses(il_values: &[[u8; 32]]) -> Self {
            let mut queue = VecDeque::new();
            for il in il_values {
                let mut i = [0u8; 64];
                i[..32].copy_from_slice(il);
                queue.push_back(i);
            }
            FakeBackend {
                hmac_responses: Mutex::new(queue),
                ..Default::default()
            }
        }

        pub fn with_infinities(count: usize) -> Self {
            let fake = FakeBackend::default();
            *fake.infinities.lock() = count;
            fake
        }
    }

    impl Backend for FakeBackend {
        fn hmac_sha512(&self, key: &[u8], data: &[u8]) -> Zeroizing<[u8; 64]> {
            match self.hmac_responses.lock().pop_front() {
                Some(i) => Zeroizing::new(i),
                None => Secp256k1Backend.hmac_sha512(key, data),
            }
        }

        fn add_scalar(&self, secret: &SecretKey, tweak: &Scalar) -> Option<SecretKey> {
            Secp256k1Backend.add_scalar(secret, tweak)
        }

        fn add_point(&self, point: &PublicKey, tweak: &Scalar) -> Option<PublicKey> {
            let mut infinities = self.infinities.lock();
            if *infinities > 0 {
                *infinities -= 1;
                return None;
            }
            Secp256k1Backend.add_point(point, tweak)
        }
    }
}
