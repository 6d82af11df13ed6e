//! Encoding and decoding a grid's solution.

use crossgrid_core::GridModel;

use crate::{
    EncodedSolution, EncryptionKind, SolutionError,
    cipher::{self, NONCE_SIZE, SolutionCipher},
};

/// Encodes the grid's solution for persistence under a freshly generated
/// nonce.
///
/// The solution letters are concatenated in field-enumeration order and
/// encoded as UTF-8; the digest is computed over those plaintext bytes and
/// the bytes are then enciphered. An empty passphrase records the
/// encryption kind as [`EncryptionKind::None`], but the empty-passphrase
/// keystream is still applied, so the persisted bytes are never the raw
/// solution.
#[must_use]
pub fn encode_solution(model: &GridModel, passphrase: &str) -> EncodedSolution {
    encode_solution_with_nonce(model, passphrase, cipher::random_nonce())
}

/// Encodes the grid's solution under a caller-supplied nonce.
#[must_use]
pub fn encode_solution_with_nonce(
    model: &GridModel,
    passphrase: &str,
    nonce: [u8; NONCE_SIZE],
) -> EncodedSolution {
    let mut data = model.solution_string(None).into_bytes();

    let mut cipher = SolutionCipher::new(passphrase, &nonce);
    let hash = cipher.digest(&data);
    cipher.combine(&mut data);

    let encryption = if passphrase.is_empty() {
        EncryptionKind::None
    } else {
        EncryptionKind::Salsa20
    };
    EncodedSolution {
        encryption,
        nonce,
        hash,
        data,
    }
}

/// Decrypts an encoded solution and applies it to the grid.
///
/// The keystream is re-derived from the passphrase and the recorded nonce,
/// the digest is recomputed over the decrypted bytes and compared to the
/// recorded digest, and the decrypted text is split back into per-field
/// answers in field-enumeration order. The grid's existing solution is
/// untouched on any failure.
///
/// # Errors
///
/// Returns [`SolutionError::IncorrectPassphrase`] on a digest mismatch,
/// [`SolutionError::MalformedSolutionEncoding`] if the decrypted bytes are
/// not valid UTF-8, [`SolutionError::LengthNotConsistentWithGrid`] if the
/// text does not partition exactly into the grid's field lengths, and
/// [`SolutionError::Grid`] if the grid rejects the answers.
pub fn decode_solution(
    model: &mut GridModel,
    encoded: &EncodedSolution,
    passphrase: &str,
) -> Result<(), SolutionError> {
    let mut data = encoded.data.clone();
    let mut cipher = SolutionCipher::new(passphrase, &encoded.nonce);
    cipher.combine(&mut data);

    if !cipher.verify_digest(&data, &encoded.hash) {
        return Err(SolutionError::IncorrectPassphrase);
    }

    let text = String::from_utf8(data).map_err(|_| SolutionError::MalformedSolutionEncoding)?;

    let lengths: Vec<usize> = model.fields().map(|field| field.length()).collect();
    let mut chars = text.chars();
    let mut answers = Vec::with_capacity(lengths.len());
    for length in lengths {
        let answer: String = chars.by_ref().take(length).collect();
        if answer.chars().count() != length {
            return Err(SolutionError::LengthNotConsistentWithGrid);
        }
        answers.push(answer);
    }
    if chars.next().is_some() {
        return Err(SolutionError::LengthNotConsistentWithGrid);
    }

    model.set_solution(&answers)?;
    log::debug!("decoded solution of {} answers", answers.len());
    Ok(())
}
