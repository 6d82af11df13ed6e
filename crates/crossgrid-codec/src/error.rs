//! Error kinds reported by the solution codec.

use derive_more::{Display, Error, From};

use crossgrid_core::GridError;

/// An error reported by solution encoding, decoding or remote resolution.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum SolutionError {
    /// The Base64 body contained a character outside the Base64 alphabet.
    #[display("the Base64 encoding of the solution contains an illegal character")]
    IllegalCharacterInSolutionEncoding,

    /// The Base64 body or the decrypted text was structurally invalid.
    #[display("the Base64 encoding of the solution is malformed")]
    MalformedSolutionEncoding,

    /// The digest of the decrypted solution did not match the record.
    #[display("the passphrase does not match the one that was used to encrypt the solution")]
    IncorrectPassphrase,

    /// The decrypted solution did not partition into the grid's fields.
    #[display("the length of the solution is not consistent with the grid")]
    LengthNotConsistentWithGrid,

    /// The record named an encryption kind this crate does not support.
    #[display("the kind of encryption ({kind:?}) is not supported")]
    UnsupportedEncryption {
        /// The unrecognised encryption key.
        kind: String,
    },

    /// The record's nonce attribute was not a hex string of the nonce size.
    #[display("the solution nonce ({text:?}) is invalid")]
    InvalidNonce {
        /// The rejected attribute value.
        text: String,
    },

    /// The record's hash attribute was not a hex string of the digest size.
    #[display("the solution hash ({text:?}) is invalid")]
    InvalidDigest {
        /// The rejected attribute value.
        text: String,
    },

    /// A fetched remote solution did not carry the expected digest.
    #[display("the remote solution at {location} has an incorrect hash")]
    RemoteSolutionHashMismatch {
        /// The location the solution was fetched from.
        location: String,
    },

    /// The decoded answers were rejected by the grid.
    #[display("{_0}")]
    #[from]
    Grid(#[error(source)] GridError),
}
