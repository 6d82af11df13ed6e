//! The stream cipher and keyed hash used for persisted solutions.
//!
//! The cipher key is the SHA-256 hash of the UTF-8 passphrase; an empty
//! passphrase is a valid key, so an unencrypted solution is simply one
//! enciphered under the empty-passphrase keystream. The keyed hash is
//! HMAC-SHA-256 under the same key and is always computed over the
//! *plaintext* solution bytes, so decoding can verify the passphrase (and
//! detect corruption) before the solution is accepted.

use hmac::{Hmac, Mac};
use rand::Rng;
use salsa20::{
    Salsa20,
    cipher::{KeyIvInit, StreamCipher},
};
use sha2::{Digest, Sha256};

/// Size in bytes of the cipher nonce.
pub const NONCE_SIZE: usize = 8;

/// Size in bytes of the keyed-hash digest.
pub const DIGEST_SIZE: usize = 32;

type HmacSha256 = Hmac<Sha256>;

/// A Salsa20/20 keystream bound to a passphrase and nonce, plus the keyed
/// hash derived from the same key.
pub struct SolutionCipher {
    cipher: Salsa20,
    key: [u8; 32],
}

impl SolutionCipher {
    /// Creates a cipher for the given passphrase and nonce.
    #[must_use]
    pub fn new(passphrase: &str, nonce: &[u8; NONCE_SIZE]) -> Self {
        let key = derive_key(passphrase);
        let cipher = Salsa20::new(&key.into(), nonce.into());
        Self { cipher, key }
    }

    /// XORs the next bytes of the keystream into `data`. Applying the same
    /// keystream twice restores the original bytes.
    pub fn combine(&mut self, data: &mut [u8]) {
        self.cipher.apply_keystream(data);
    }

    /// Computes the keyed-hash digest of `data`.
    #[must_use]
    pub fn digest(&self, data: &[u8]) -> [u8; DIGEST_SIZE] {
        let mut mac = HmacSha256::new_from_slice(&self.key).expect("HMAC accepts any key length");
        mac.update(data);
        mac.finalize().into_bytes().into()
    }

    /// Verifies a keyed-hash digest of `data` in constant time.
    #[must_use]
    pub fn verify_digest(&self, data: &[u8], expected: &[u8; DIGEST_SIZE]) -> bool {
        let mut mac = HmacSha256::new_from_slice(&self.key).expect("HMAC accepts any key length");
        mac.update(data);
        mac.verify_slice(expected).is_ok()
    }
}

/// Derives the 32-byte cipher key from a passphrase: the SHA-256 hash of
/// its UTF-8 encoding.
#[must_use]
pub fn derive_key(passphrase: &str) -> [u8; 32] {
    Sha256::digest(passphrase.as_bytes()).into()
}

/// Generates a fresh random nonce.
#[must_use]
pub fn random_nonce() -> [u8; NONCE_SIZE] {
    let mut nonce = [0; NONCE_SIZE];
    rand::rng().fill_bytes(&mut nonce);
    nonce
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_is_an_involution() {
        let nonce = [7; NONCE_SIZE];
        let mut data = b"TOPHOLE".to_vec();

        let mut cipher = SolutionCipher::new("passphrase", &nonce);
        cipher.combine(&mut data);
        assert_ne!(data, b"TOPHOLE");

        let mut cipher = SolutionCipher::new("passphrase", &nonce);
        cipher.combine(&mut data);
        assert_eq!(data, b"TOPHOLE");
    }

    #[test]
    fn different_passphrases_give_different_keystreams() {
        let nonce = [0; NONCE_SIZE];
        let mut a = vec![0_u8; 16];
        let mut b = vec![0_u8; 16];
        SolutionCipher::new("alpha", &nonce).combine(&mut a);
        SolutionCipher::new("beta", &nonce).combine(&mut b);
        assert_ne!(a, b);
    }

    #[test]
    fn digest_is_keyed_and_verifiable() {
        let nonce = [0; NONCE_SIZE];
        let cipher = SolutionCipher::new("alpha", &nonce);
        let digest = cipher.digest(b"data");

        assert!(cipher.verify_digest(b"data", &digest));
        assert!(!cipher.verify_digest(b"date", &digest));
        assert!(!SolutionCipher::new("beta", &nonce).verify_digest(b"data", &digest));
    }

    #[test]
    fn digest_ignores_keystream_position() {
        // Encrypting first must not change the digest key.
        let nonce = [1; NONCE_SIZE];
        let mut cipher = SolutionCipher::new("p", &nonce);
        let before = cipher.digest(b"data");
        let mut scratch = vec![0_u8; 64];
        cipher.combine(&mut scratch);
        assert_eq!(cipher.digest(b"data"), before);
    }

    #[test]
    fn empty_passphrase_is_a_valid_key() {
        let nonce = [2; NONCE_SIZE];
        let mut data = b"ANSWER".to_vec();
        let mut cipher = SolutionCipher::new("", &nonce);
        cipher.combine(&mut data);
        assert_ne!(data, b"ANSWER");

        let mut cipher = SolutionCipher::new("", &nonce);
        cipher.combine(&mut data);
        assert_eq!(data, b"ANSWER");
    }
}
