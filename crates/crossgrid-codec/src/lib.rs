//! Persistence codec for crossword solutions.
//!
//! A grid's solution is persisted as an encrypted, integrity-checked
//! record: the solution letters are concatenated in field-enumeration
//! order, enciphered with a Salsa20 keystream derived from a passphrase and
//! a random nonce, protected by an HMAC-SHA-256 digest of the plaintext,
//! and carried as a line-wrapped Base64 body. A record can instead point at
//! a remote document holding the solution, verified against the same
//! digest.
//!
//! # Overview
//!
//! - [`cipher`] - the keystream and keyed hash ([`SolutionCipher`]).
//! - [`record`] - the persisted forms: [`EncodedSolution`] (binary) and
//!   [`SolutionRecord`] (transport attributes and body).
//! - [`solution`] - [`encode_solution`] and [`decode_solution`] against a
//!   grid.
//! - [`resolve`] - interactive resolution with explicit cancellation
//!   ([`Outcome`], [`Stop`]), passphrase prompting and remote loading.
//!
//! # Examples
//!
//! ```
//! use crossgrid_codec::{decode_solution, encode_solution};
//! use crossgrid_core::{BlockGrid, GridConfig, Symmetry};
//!
//! let mut grid = BlockGrid::new(4, 4, Symmetry::None, GridConfig::default()).unwrap();
//! // Across answers for rows 0-3, then the down answers they imply.
//! let answers: Vec<String> = [
//!     "ABCD", "BBBB", "CCCC", "DDDD", // across
//!     "ABCD", "BBCD", "CBCD", "DBCD", // down
//! ]
//! .iter()
//! .map(|s| (*s).to_owned())
//! .collect();
//! grid.model_mut().set_solution(&answers).unwrap();
//!
//! let encoded = encode_solution(grid.model(), "passphrase");
//! let expected = grid.model().solution_string(None);
//!
//! grid.model_mut().clear_solution();
//! decode_solution(grid.model_mut(), &encoded, "passphrase").unwrap();
//! assert_eq!(grid.model().solution_string(None), expected);
//! ```

pub mod cipher;
pub mod error;
pub mod record;
pub mod resolve;
pub mod solution;

pub use self::{
    cipher::{DIGEST_SIZE, NONCE_SIZE, SolutionCipher},
    error::SolutionError,
    record::{EncodedSolution, EncryptionKind, SOLUTION_LINE_LENGTH, SolutionRecord},
    resolve::{
        Outcome, RemoteSolution, SolutionProperties, Stop, apply_solution_record,
        load_remote_solution,
    },
    solution::{decode_solution, encode_solution, encode_solution_with_nonce},
};
