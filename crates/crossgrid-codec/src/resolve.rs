//! Interactive resolution of persisted solution records.
//!
//! Reading a solution can require input the codec cannot supply itself: a
//! passphrase typed by the user, or a document fetched from a remote
//! location. Both are modelled as closures, and both can be cancelled;
//! cancellation is a distinct [`Stop::Cancelled`] outcome, not an error, and
//! always leaves the grid's existing solution untouched.

use derive_more::IsVariant;

use crossgrid_core::GridModel;

use crate::{
    SolutionError, SolutionRecord,
    cipher::DIGEST_SIZE,
    solution::decode_solution,
};

/// Why a resolution stopped short of completing.
#[derive(Debug, Clone, PartialEq, Eq, IsVariant)]
pub enum Stop {
    /// The user cancelled; the operation must leave no trace.
    Cancelled,
    /// The operation failed.
    Error(SolutionError),
}

impl From<SolutionError> for Stop {
    fn from(error: SolutionError) -> Self {
        Self::Error(error)
    }
}

impl From<crossgrid_core::GridError> for Stop {
    fn from(error: crossgrid_core::GridError) -> Self {
        Self::Error(error.into())
    }
}

/// The result of an operation that can be cancelled.
pub type Outcome<T> = Result<T, Stop>;

/// The solution-related properties a document keeps after a record has been
/// resolved.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SolutionProperties {
    /// The remote location of the solution, if it is not stored inline.
    pub location: Option<String>,
    /// The passphrase the user supplied, kept for re-encoding on save.
    pub passphrase: String,
    /// The digest recorded for the solution.
    pub hash: Option<[u8; DIGEST_SIZE]>,
}

/// A solution obtained from a remote document: the digest its record
/// carried and its decoded per-field answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSolution {
    /// The digest recorded in the remote document.
    pub hash: [u8; DIGEST_SIZE],
    /// The remote document's answers in field-enumeration order.
    pub answers: Vec<String>,
}

/// Resolves a persisted solution record against a grid.
///
/// Inline records are decoded immediately. A record encrypted under a
/// passphrase consults `prompt`: returning `None` cancels, and returning an
/// empty passphrase skips decoding (the solution stays absent until the
/// user supplies the passphrase later); both leave the grid untouched.
/// Remote records are not fetched here - the returned properties carry the
/// location and digest for a later [`load_remote_solution`] call.
///
/// # Errors
///
/// Returns [`Stop::Cancelled`] when the prompt is dismissed, or
/// [`Stop::Error`] wrapping the decode failure.
pub fn apply_solution_record(
    model: &mut GridModel,
    record: &SolutionRecord,
    prompt: impl FnOnce() -> Option<String>,
) -> Outcome<SolutionProperties> {
    let hash = record.hash_bytes()?;
    match record {
        SolutionRecord::Remote { location, .. } => Ok(SolutionProperties {
            location: Some(location.clone()),
            passphrase: String::new(),
            hash: Some(hash),
        }),
        SolutionRecord::Inline { encryption, .. } => {
            let passphrase = if *encryption == crate::EncryptionKind::None {
                String::new()
            } else {
                let Some(passphrase) = prompt() else {
                    return Err(Stop::Cancelled);
                };
                if passphrase.is_empty() {
                    return Ok(SolutionProperties::default());
                }
                passphrase
            };

            let encoded = record.to_encoded()?;
            decode_solution(model, &encoded, &passphrase)?;
            Ok(SolutionProperties {
                location: None,
                passphrase,
                hash: Some(hash),
            })
        }
    }
}

/// Loads a remotely stored solution into the grid.
///
/// `fetch` retrieves and decodes the remote document's solution; it may be
/// cancelled, in which case the grid is untouched. The fetched solution's
/// digest must equal the digest recorded locally.
///
/// # Errors
///
/// Returns [`Stop::Cancelled`] when the fetch is cancelled, or
/// [`Stop::Error`] wrapping
/// [`SolutionError::RemoteSolutionHashMismatch`] or the grid's rejection of
/// the answers.
pub fn load_remote_solution(
    model: &mut GridModel,
    location: &str,
    expected_hash: &[u8; DIGEST_SIZE],
    fetch: impl FnOnce() -> Outcome<RemoteSolution>,
) -> Outcome<()> {
    let remote = fetch()?;
    if remote.hash != *expected_hash {
        return Err(SolutionError::RemoteSolutionHashMismatch {
            location: location.to_owned(),
        }
        .into());
    }
    model
        .set_solution(&remote.answers)
        .map_err(SolutionError::from)?;
    log::debug!("loaded remote solution from {location}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use crossgrid_core::{BlockGrid, GridConfig, Symmetry};

    use super::*;
    use crate::solution::encode_solution_with_nonce;

    fn solved_grid() -> BlockGrid {
        let mut grid = BlockGrid::new(5, 5, Symmetry::None, GridConfig::default()).unwrap();
        grid.model_mut().set_solution(&answers()).unwrap();
        grid
    }

    fn answers() -> Vec<String> {
        let mut answers = Vec::new();
        for row in 0..5_u8 {
            answers.push(char::from(b'A' + row).to_string().repeat(5));
        }
        for _column in 0..5 {
            answers.push("ABCDE".to_owned());
        }
        answers
    }

    #[test]
    fn inline_record_with_passphrase_prompts_and_decodes() {
        let mut grid = solved_grid();
        let record = encode_solution_with_nonce(grid.model(), "sesame", [3; 8]).to_record();
        let expected = grid.model().solution_string(None);
        grid.model_mut().clear_solution();

        let properties =
            apply_solution_record(grid.model_mut(), &record, || Some("sesame".to_owned()))
                .unwrap();

        assert_eq!(grid.model().solution_string(None), expected);
        assert_eq!(properties.passphrase, "sesame");
        assert!(properties.location.is_none());
        assert!(properties.hash.is_some());
    }

    #[test]
    fn unencrypted_record_needs_no_prompt() {
        let mut grid = solved_grid();
        let record = encode_solution_with_nonce(grid.model(), "", [4; 8]).to_record();
        grid.model_mut().clear_solution();

        let properties = apply_solution_record(grid.model_mut(), &record, || {
            panic!("prompt must not be consulted")
        })
        .unwrap();

        assert!(grid.model().has_solution());
        assert_eq!(properties.passphrase, "");
    }

    #[test]
    fn cancelled_prompt_preserves_prior_state() {
        let mut grid = solved_grid();
        let record = encode_solution_with_nonce(grid.model(), "sesame", [5; 8]).to_record();
        let expected = grid.model().solution_string(None);

        let stop = apply_solution_record(grid.model_mut(), &record, || None).unwrap_err();
        assert!(stop.is_cancelled());
        assert_eq!(grid.model().solution_string(None), expected);
    }

    #[test]
    fn empty_passphrase_skips_decoding() {
        let mut grid = solved_grid();
        let record = encode_solution_with_nonce(grid.model(), "sesame", [6; 8]).to_record();
        grid.model_mut().clear_solution();

        let properties =
            apply_solution_record(grid.model_mut(), &record, || Some(String::new())).unwrap();

        assert!(!grid.model().has_solution());
        assert_eq!(properties, SolutionProperties::default());
    }

    #[test]
    fn wrong_passphrase_is_an_error_not_a_cancellation() {
        let mut grid = solved_grid();
        let record = encode_solution_with_nonce(grid.model(), "sesame", [7; 8]).to_record();
        grid.model_mut().clear_solution();

        let stop = apply_solution_record(grid.model_mut(), &record, || Some("nope".to_owned()))
            .unwrap_err();
        assert_eq!(stop, Stop::Error(SolutionError::IncorrectPassphrase));
        assert!(!grid.model().has_solution());
    }

    #[test]
    fn remote_record_returns_properties_without_fetching() {
        let mut grid = solved_grid();
        let record = SolutionRecord::Remote {
            location: "https://example.org/puzzle.xml".to_owned(),
            hash: "ab".repeat(DIGEST_SIZE),
        };

        let properties = apply_solution_record(grid.model_mut(), &record, || {
            panic!("prompt must not be consulted")
        })
        .unwrap();

        assert_eq!(
            properties.location.as_deref(),
            Some("https://example.org/puzzle.xml")
        );
        assert_eq!(properties.hash, Some([0xab; DIGEST_SIZE]));
    }

    #[test]
    fn remote_solution_verifies_the_digest() {
        let mut grid = solved_grid();
        grid.model_mut().clear_solution();
        let hash = [0x11; DIGEST_SIZE];

        load_remote_solution(grid.model_mut(), "https://example.org", &hash, || {
            Ok(RemoteSolution {
                hash,
                answers: answers(),
            })
        })
        .unwrap();
        assert!(grid.model().has_solution());

        grid.model_mut().clear_solution();
        let stop = load_remote_solution(grid.model_mut(), "https://example.org", &hash, || {
            Ok(RemoteSolution {
                hash: [0x22; DIGEST_SIZE],
                answers: answers(),
            })
        })
        .unwrap_err();
        assert!(matches!(
            stop,
            Stop::Error(SolutionError::RemoteSolutionHashMismatch { .. })
        ));
        assert!(!grid.model().has_solution());
    }

    #[test]
    fn cancelled_fetch_preserves_prior_state() {
        let mut grid = solved_grid();
        let expected = grid.model().solution_string(None);
        let hash = [0x11; DIGEST_SIZE];

        let stop =
            load_remote_solution(grid.model_mut(), "https://example.org", &hash, || {
                Err(Stop::Cancelled)
            })
            .unwrap_err();

        assert!(stop.is_cancelled());
        assert_eq!(grid.model().solution_string(None), expected);
    }
}
