//! Access token derivation
//!
//! Write requests carry an access token: the hub's nonce encrypted with the
//! 16-character connector key using AES-128 in ECB mode, without padding or
//! IV, rendered as upper-case hex. The hub performs the same computation and
//! compares.

use std::fmt;

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockEncrypt, KeyInit};
use aes::Aes128;
use serde::Serialize;

use crate::error::{ApiError, Result};

/// AES-128 key size, which is also the block size
pub const KEY_LEN: usize = 16;

const BLOCK_LEN: usize = 16;

/// Per-hub authentication value for write requests
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the access token for `hub_nonce` under `shared_secret`.
///
/// # Errors
///
/// - [`ApiError::InvalidKeyLength`] if the secret is not 16 bytes of UTF-8
/// - [`ApiError::InvalidNonceLength`] if the nonce is empty or not a whole
///   number of 16-byte blocks
pub fn compute_access_token(shared_secret: &str, hub_nonce: &str) -> Result<AccessToken> {
    let ciphertext = ecb_encrypt(shared_secret.as_bytes(), hub_nonce.as_bytes())?;
    Ok(AccessToken(hex::encode_upper(ciphertext)))
}

/// Check a connector key without needing a nonce
pub fn validate_shared_secret(shared_secret: &str) -> Result<()> {
    let actual = shared_secret.len();
    if actual != KEY_LEN {
        return Err(ApiError::InvalidKeyLength { expected: KEY_LEN, actual });
    }
    Ok(())
}

fn ecb_encrypt(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes128::new_from_slice(key).map_err(|_| ApiError::InvalidKeyLength {
        expected: KEY_LEN,
        actual: key.len(),
    })?;

    if plaintext.is_empty() || plaintext.len() % BLOCK_LEN != 0 {
        return Err(ApiError::InvalidNonceLength {
            block: BLOCK_LEN,
            actual: plaintext.len(),
        });
    }

    let mut output = plaintext.to_vec();
    for block in output.chunks_exact_mut(BLOCK_LEN) {
        cipher.encrypt_block(GenericArray::from_mut_slice(block));
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    const KEY: &str = "12345678-1234-12";
    const NONCE: &str = "A1B2C3D4E5F6A7B8";

    #[test]
    fn test_fips_197_vector() {
        // FIPS-197 appendix C.1
        let key: Vec<u8> = (0u8..16).collect();
        let plaintext = hex::decode("00112233445566778899aabbccddeeff").unwrap();

        let ciphertext = ecb_encrypt(&key, &plaintext).unwrap();

        assert_eq!(hex::encode(ciphertext), "69c4e0d86a7b0430d8cdb78070b4c55a");
    }

    #[test]
    fn test_blocks_are_independent() {
        let key: Vec<u8> = (0u8..16).collect();
        let block = hex::decode("00112233445566778899aabbccddeeff").unwrap();
        let doubled = [block.clone(), block].concat();

        let ciphertext = ecb_encrypt(&key, &doubled).unwrap();

        assert_eq!(ciphertext[..16], ciphertext[16..]);
    }

    #[test]
    fn test_token_is_uppercase_hex() {
        let token = compute_access_token(KEY, NONCE).unwrap();

        assert_eq!(token.as_str().len(), 32);
        assert!(token
            .as_str()
            .chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
        assert_eq!(token.to_string(), token.as_str());
    }

    #[rstest]
    #[case::short("short-key", 9)]
    #[case::empty("", 0)]
    #[case::long("12345678-1234-1234", 18)]
    #[case::multibyte("ключ-ключ-ключ", 26)]
    fn test_invalid_key_length(#[case] key: &str, #[case] actual: usize) {
        match compute_access_token(key, NONCE) {
            Err(ApiError::InvalidKeyLength { expected, actual: got }) => {
                assert_eq!(expected, 16);
                assert_eq!(got, actual);
            }
            other => panic!("expected InvalidKeyLength, got {:?}", other),
        }
        assert!(validate_shared_secret(key).is_err());
    }

    #[rstest]
    #[case::empty("")]
    #[case::partial_block("0123456789")]
    #[case::block_and_a_half("0123456789ABCDEF01234567")]
    fn test_invalid_nonce_length(#[case] nonce: &str) {
        assert!(matches!(
            compute_access_token(KEY, nonce),
            Err(ApiError::InvalidNonceLength { block: 16, .. })
        ));
    }

    #[test]
    fn test_valid_key_passes_validation() {
        assert!(validate_shared_secret(KEY).is_ok());
    }

    proptest! {
        #[test]
        fn prop_token_is_deterministic(
            key in "[a-zA-Z0-9-]{16}",
            nonce in "[A-F0-9]{16}",
        ) {
            let first = compute_access_token(&key, &nonce).unwrap();
            let second = compute_access_token(&key, &nonce).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_distinct_nonces_give_distinct_tokens(
            key in "[a-zA-Z0-9-]{16}",
            a in "[A-F0-9]{16}",
            b in "[A-F0-9]{16}",
        ) {
            prop_assume!(a != b);
            // AES is a permutation per key, so distinct blocks never collide
            prop_assert_ne!(
                compute_access_token(&key, &a).unwrap(),
                compute_access_token(&key, &b).unwrap()
            );
        }
    }
}
