//! Persisted solution records.
//!
//! A record is the container-independent form of a persisted solution: the
//! attribute values (encryption kind, nonce, digest) and the Base64 body, or
//! a location/digest pair pointing at a solution kept elsewhere. Document
//! readers and writers move these records in and out of their container
//! syntax; this module converts between records and the binary
//! [`EncodedSolution`].

use std::fmt;

use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::{
    SolutionError,
    cipher::{DIGEST_SIZE, NONCE_SIZE},
};

/// Number of Base64 characters per line of a persisted solution body.
pub const SOLUTION_LINE_LENGTH: usize = 72;

/// The encryption scheme named by a persisted solution record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncryptionKind {
    /// No passphrase was chosen; the body is enciphered under the
    /// empty-passphrase keystream.
    None,
    /// The body is enciphered with Salsa20 under a passphrase-derived key.
    Salsa20,
}

impl EncryptionKind {
    /// Both encryption kinds.
    pub const ALL: [Self; 2] = [Self::None, Self::Salsa20];

    /// Returns the key used in persisted documents.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Salsa20 => "salsa20",
        }
    }

    /// Returns the encryption kind for a persisted key.
    ///
    /// # Errors
    ///
    /// Returns [`SolutionError::UnsupportedEncryption`] for an unrecognised
    /// key.
    pub fn for_key(key: &str) -> Result<Self, SolutionError> {
        Self::ALL
            .into_iter()
            .find(|value| value.key() == key)
            .ok_or_else(|| SolutionError::UnsupportedEncryption {
                kind: key.to_owned(),
            })
    }
}

impl fmt::Display for EncryptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Salsa20 => f.write_str("Salsa20"),
        }
    }
}

/// The binary form of an encrypted solution: nonce, plaintext digest and
/// encrypted payload.
///
/// This value exists only on the way to or from a persisted record; the
/// grid never retains it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedSolution {
    /// The encryption kind to record.
    pub encryption: EncryptionKind,
    /// The cipher nonce.
    pub nonce: [u8; NONCE_SIZE],
    /// The keyed-hash digest of the plaintext solution bytes.
    pub hash: [u8; DIGEST_SIZE],
    /// The encrypted solution bytes.
    pub data: Vec<u8>,
}

impl EncodedSolution {
    /// Returns the Base64 body, wrapped at [`SOLUTION_LINE_LENGTH`]
    /// characters per line.
    #[must_use]
    pub fn body_lines(&self) -> Vec<String> {
        let encoded = STANDARD.encode(&self.data);
        encoded
            .as_bytes()
            .chunks(SOLUTION_LINE_LENGTH)
            .map(|chunk| String::from_utf8(chunk.to_vec()).expect("Base64 output is ASCII"))
            .collect()
    }

    /// Converts this value into its record form, hex-encoding the
    /// attributes and wrapping the body.
    #[must_use]
    pub fn to_record(&self) -> SolutionRecord {
        SolutionRecord::Inline {
            encryption: self.encryption,
            nonce: hex::encode(self.nonce),
            hash: hex::encode(self.hash),
            body: self.body_lines().join("\n"),
        }
    }
}

/// A persisted solution record, independent of container syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolutionRecord {
    /// The solution body is stored in the document itself.
    Inline {
        /// The encryption kind attribute.
        encryption: EncryptionKind,
        /// The nonce attribute (hex, [`NONCE_SIZE`] bytes).
        nonce: String,
        /// The digest attribute (hex, [`DIGEST_SIZE`] bytes).
        hash: String,
        /// The Base64 body, possibly wrapped over several lines.
        body: String,
    },
    /// The solution lives at a remote location; only its digest is stored.
    Remote {
        /// The location to fetch the solution document from.
        location: String,
        /// The digest attribute (hex, [`DIGEST_SIZE`] bytes).
        hash: String,
    },
}

impl SolutionRecord {
    /// Decodes the record's digest attribute.
    ///
    /// # Errors
    ///
    /// Returns [`SolutionError::InvalidDigest`] if the attribute is not a
    /// hex string of the digest size.
    pub fn hash_bytes(&self) -> Result<[u8; DIGEST_SIZE], SolutionError> {
        let text = match self {
            Self::Inline { hash, .. } | Self::Remote { hash, .. } => hash,
        };
        decode_hex(text).ok_or_else(|| SolutionError::InvalidDigest { text: text.clone() })
    }

    /// Converts an inline record back into its binary form.
    ///
    /// # Errors
    ///
    /// Returns [`SolutionError::InvalidNonce`] or
    /// [`SolutionError::InvalidDigest`] for malformed attributes,
    /// [`SolutionError::IllegalCharacterInSolutionEncoding`] for a body
    /// character outside the Base64 alphabet, and
    /// [`SolutionError::MalformedSolutionEncoding`] for a structurally
    /// invalid body. Remote records have no body and also report
    /// [`SolutionError::MalformedSolutionEncoding`].
    pub fn to_encoded(&self) -> Result<EncodedSolution, SolutionError> {
        let Self::Inline {
            encryption,
            nonce,
            hash,
            body,
        } = self
        else {
            return Err(SolutionError::MalformedSolutionEncoding);
        };

        let nonce_bytes: [u8; NONCE_SIZE] =
            decode_hex(nonce).ok_or_else(|| SolutionError::InvalidNonce {
                text: nonce.clone(),
            })?;
        let hash_bytes: [u8; DIGEST_SIZE] =
            decode_hex(hash).ok_or_else(|| SolutionError::InvalidDigest { text: hash.clone() })?;

        let compact: String = body.chars().filter(|ch| !ch.is_whitespace()).collect();
        let data = STANDARD.decode(compact).map_err(|error| match error {
            base64::DecodeError::InvalidByte(..) => {
                SolutionError::IllegalCharacterInSolutionEncoding
            }
            _ => SolutionError::MalformedSolutionEncoding,
        })?;

        Ok(EncodedSolution {
            encryption: *encryption,
            nonce: nonce_bytes,
            hash: hash_bytes,
            data,
        })
    }
}

fn decode_hex<const N: usize>(text: &str) -> Option<[u8; N]> {
    let bytes = hex::decode(text).ok()?;
    bytes.try_into().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(len: usize) -> EncodedSolution {
        EncodedSolution {
            encryption: EncryptionKind::Salsa20,
            nonce: [0xab; NONCE_SIZE],
            hash: [0xcd; DIGEST_SIZE],
            data: (0..len).map(|i| u8::try_from(i % 251).unwrap()).collect(),
        }
    }

    #[test]
    fn encryption_keys_round_trip() {
        for kind in EncryptionKind::ALL {
            assert_eq!(EncryptionKind::for_key(kind.key()).unwrap(), kind);
        }
        assert_eq!(
            EncryptionKind::for_key("rot13").unwrap_err(),
            SolutionError::UnsupportedEncryption {
                kind: "rot13".to_owned(),
            }
        );
    }

    #[test]
    fn body_lines_wrap_at_the_line_length() {
        let lines = encoded(100).body_lines();
        // 100 bytes encode to 136 Base64 characters: one full line plus 64.
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), SOLUTION_LINE_LENGTH);
        assert_eq!(lines[1].len(), 64);
    }

    #[test]
    fn record_round_trip() {
        let original = encoded(100);
        let record = original.to_record();

        if let SolutionRecord::Inline { nonce, hash, .. } = &record {
            assert_eq!(nonce, &"ab".repeat(NONCE_SIZE));
            assert_eq!(hash, &"cd".repeat(DIGEST_SIZE));
        } else {
            panic!("expected inline record");
        }

        assert_eq!(record.to_encoded().unwrap(), original);
    }

    #[test]
    fn malformed_attributes_are_rejected() {
        let record = SolutionRecord::Inline {
            encryption: EncryptionKind::None,
            nonce: "xyz".to_owned(),
            hash: "cd".repeat(DIGEST_SIZE),
            body: String::new(),
        };
        assert!(matches!(
            record.to_encoded().unwrap_err(),
            SolutionError::InvalidNonce { .. }
        ));

        let record = SolutionRecord::Inline {
            encryption: EncryptionKind::None,
            nonce: "ab".repeat(NONCE_SIZE),
            hash: "cd".to_owned(),
            body: String::new(),
        };
        assert!(matches!(
            record.to_encoded().unwrap_err(),
            SolutionError::InvalidDigest { .. }
        ));
    }

    #[test]
    fn malformed_bodies_are_rejected() {
        let base = |body: &str| SolutionRecord::Inline {
            encryption: EncryptionKind::None,
            nonce: "ab".repeat(NONCE_SIZE),
            hash: "cd".repeat(DIGEST_SIZE),
            body: body.to_owned(),
        };

        assert_eq!(
            base("QUJ*").to_encoded().unwrap_err(),
            SolutionError::IllegalCharacterInSolutionEncoding,
        );
        assert_eq!(
            base("QQQQQ").to_encoded().unwrap_err(),
            SolutionError::MalformedSolutionEncoding,
        );
    }
}
