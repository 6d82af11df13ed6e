//! Error kinds reported by grid capture.

use std::fmt;

use derive_more::{Display, Error};

/// The orientation of a detected line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// A left-to-right line.
    Horizontal,
    /// A top-to-bottom line.
    Vertical,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => f.write_str("horizontal"),
            Self::Vertical => f.write_str("vertical"),
        }
    }
}

/// An error reported by grid detection or sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum CaptureError {
    /// Fewer than three sufficiently long lines were found in one
    /// orientation.
    #[display("there are fewer than 3 {_0} lines of sufficient length in the image")]
    TooFewLines(#[error(not(source))] Orientation),

    /// No coincident horizontal/vertical line sets large enough to form a
    /// grid were found.
    #[display(
        "the largest coincident sets of horizontal and vertical lines are too small to form a grid"
    )]
    TooFewCoincidentLines,

    /// A sampled run between cell centres was not light-dark-light.
    #[display("the grid image is malformed")]
    MalformedGridImage,
}
