//! Error kinds reported by the grid model.

use derive_more::{Display, Error};

use crate::FieldId;

/// An error reported by a fallible grid operation.
///
/// Every variant carries the context needed to render a message; the model
/// itself never formats user-facing text beyond the `Display`
/// implementation.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum GridError {
    /// The requested symmetry cannot apply to the grid's dimensions.
    #[display("the symmetry of the grid is not compatible with the dimensions of the grid")]
    IncompatibleSymmetryAndDimensions,

    /// A grid definition did not cover the principal region exactly.
    #[display("the grid definition is malformed")]
    MalformedGridDefinition,

    /// A grid definition contained a character outside its alphabet.
    #[display("the grid definition contains an illegal character: {ch:?}")]
    IllegalCharacterInGridDefinition {
        /// The offending character.
        ch: char,
    },

    /// The number of entry strings did not match the number of fields.
    #[display("the number of entries does not match the number of fields")]
    IncorrectNumberOfEntries,

    /// An entry string's length did not match its field's length.
    #[display("the length of the entry for {id} is incorrect")]
    IncorrectEntryLength {
        /// The field the entry was for.
        id: FieldId,
    },

    /// An entry contained a character that is not a letter or digit.
    #[display("the entry for {id} contains an illegal character: {ch:?}")]
    IllegalCharacterInEntry {
        /// The field the entry was for.
        id: FieldId,
        /// The offending character.
        ch: char,
    },

    /// Two entries disagreed about the letter in a shared cell.
    #[display("the entry for {id} conflicts with an intersecting entry at index {index}")]
    ConflictingEntry {
        /// The field whose entry hit the conflict.
        id: FieldId,
        /// The offset of the conflicting cell within that field.
        index: usize,
    },

    /// The number of answers did not match the number of fields.
    #[display("the number of answers does not match the number of fields")]
    IncorrectNumberOfAnswers,

    /// An answer's length did not match its field's length.
    #[display("the length of the answer for {id} is incorrect")]
    IncorrectAnswerLength {
        /// The field the answer was for.
        id: FieldId,
    },

    /// An answer contained a character that is not a letter or digit.
    #[display("the answer for {id} contains an illegal character: {ch:?}")]
    IllegalCharacterInAnswer {
        /// The field the answer was for.
        id: FieldId,
        /// The offending character.
        ch: char,
    },

    /// Two answers disagreed about the letter in a shared cell.
    #[display("the answer for {id} conflicts with an intersecting answer at index {index}")]
    ConflictingAnswer {
        /// The field whose answer hit the conflict.
        id: FieldId,
        /// The offset of the conflicting cell within that field.
        index: usize,
    },
}
