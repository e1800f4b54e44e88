//! Plain Base58 text codec (Bitcoin alphabet).
//!
//! No checksum is appended here: extended keys and addresses already carry
//! their own four checksum bytes, which their owners write and verify.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Base58Error {
    #[error("invalid base58 character {0:?}")]
    InvalidCharacter(char),
    #[error("empty base58 input")]
    InvalidLength,
    #[error("base58 decoding failed: {0}")]
    Decode(String),
}

pub fn encode(data: &[u8]) -> String {
    bs58::encode(data).into_string()
}

pub fn decode(s: &str) -> Result<Vec<u8>, Base58Error> {
    if s.is_empty() {
        return Err(Base58Error::InvalidLength);
    }
    bs58::decode(s).into_vec().map_err(|e| match e {
        bs58::decode::Error::InvalidCharacter { character, .. } => {
            Base58Error::InvalidCharacter(character)
        }
        bs58::decode::Error::NonAsciiCharacter { index } => {
            let c = s[index..]
                .chars()
                .next()
                .unwrap_or(char::REPLACEMENT_CHARACTER);
            Base58Error::InvalidCharacter(c)
        }
        other => Base58Error::Decode(other.to_string()),
    })
}
