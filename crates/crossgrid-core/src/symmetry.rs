//! Grid symmetry classes.
//!
//! A symmetry determines how a structural edit to one cell is mirrored to
//! other cells, and which sub-rectangle of the grid (the *principal region*)
//! is sufficient to describe the whole grid in a persisted definition.

use std::fmt;

/// A geometric symmetry imposed on the separators of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symmetry {
    /// No symmetry; edits affect a single cell.
    None,
    /// Rotation by a half-turn about the centre of the grid.
    RotationHalf,
    /// Rotation by a quarter-turn; requires a square grid.
    RotationQuarter,
    /// Reflection in the vertical axis.
    ReflectVerticalAxis,
    /// Reflection in the horizontal axis.
    ReflectHorizontalAxis,
    /// Reflection in both the vertical and horizontal axes.
    ReflectBothAxes,
}

impl Symmetry {
    /// Every symmetry class.
    pub const ALL: [Self; 6] = [
        Self::None,
        Self::RotationHalf,
        Self::RotationQuarter,
        Self::ReflectVerticalAxis,
        Self::ReflectHorizontalAxis,
        Self::ReflectBothAxes,
    ];

    /// The order in which symmetries are tested when classifying a captured
    /// grid. The first symmetry whose mirror check holds wins; if none does,
    /// the grid is [`Symmetry::None`].
    pub const DETECTION_ORDER: [Self; 5] = [
        Self::RotationQuarter,
        Self::ReflectBothAxes,
        Self::RotationHalf,
        Self::ReflectVerticalAxis,
        Self::ReflectHorizontalAxis,
    ];

    /// Returns the dimensions `(columns, rows)` of the principal region: the
    /// smallest top-left sub-rectangle whose state determines the whole grid
    /// under this symmetry. Odd dimensions round up so that the middle
    /// row/column is included.
    #[must_use]
    pub fn principal_dimensions(self, num_columns: usize, num_rows: usize) -> (usize, usize) {
        match self {
            Self::None => (num_columns, num_rows),
            Self::RotationHalf | Self::ReflectHorizontalAxis => {
                (num_columns, num_rows.div_ceil(2))
            }
            Self::ReflectVerticalAxis => (num_columns.div_ceil(2), num_rows),
            Self::RotationQuarter | Self::ReflectBothAxes => {
                (num_columns.div_ceil(2), num_rows.div_ceil(2))
            }
        }
    }

    /// Returns whether this symmetry can apply to a grid of the given
    /// dimensions. Quarter-turn rotation requires a square grid.
    #[must_use]
    pub fn supports_dimensions(self, num_columns: usize, num_rows: usize) -> bool {
        match self {
            Self::RotationQuarter => num_columns == num_rows,
            _ => true,
        }
    }

    /// Returns the key used in persisted documents.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::RotationHalf => "rotate2",
            Self::RotationQuarter => "rotate4",
            Self::ReflectVerticalAxis => "reflectVAxis",
            Self::ReflectHorizontalAxis => "reflectHAxis",
            Self::ReflectBothAxes => "reflectVHAxes",
        }
    }

    /// Returns the symmetry for a persisted key.
    #[must_use]
    pub fn for_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|value| value.key() == key)
    }
}

impl fmt::Display for Symmetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::None => "None",
            Self::RotationHalf => "Rotation by a half-turn",
            Self::RotationQuarter => "Rotation by a quarter-turn",
            Self::ReflectVerticalAxis => "Reflection in vertical axis",
            Self::ReflectHorizontalAxis => "Reflection in horizontal axis",
            Self::ReflectBothAxes => "Reflection in V and H axes",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn principal_dimensions_round_up() {
        assert_eq!(Symmetry::None.principal_dimensions(15, 15), (15, 15));
        assert_eq!(Symmetry::RotationHalf.principal_dimensions(15, 15), (15, 8));
        assert_eq!(
            Symmetry::RotationQuarter.principal_dimensions(15, 15),
            (8, 8)
        );
        assert_eq!(
            Symmetry::ReflectVerticalAxis.principal_dimensions(14, 9),
            (7, 9)
        );
        assert_eq!(
            Symmetry::ReflectHorizontalAxis.principal_dimensions(14, 9),
            (14, 5)
        );
        assert_eq!(Symmetry::ReflectBothAxes.principal_dimensions(14, 9), (7, 5));
    }

    #[test]
    fn quarter_rotation_requires_square_grid() {
        assert!(Symmetry::RotationQuarter.supports_dimensions(13, 13));
        assert!(!Symmetry::RotationQuarter.supports_dimensions(13, 15));
        for symmetry in Symmetry::ALL {
            if symmetry != Symmetry::RotationQuarter {
                assert!(symmetry.supports_dimensions(13, 15));
            }
        }
    }

    #[test]
    fn keys_round_trip() {
        for symmetry in Symmetry::ALL {
            assert_eq!(Symmetry::for_key(symmetry.key()), Some(symmetry));
        }
        assert_eq!(Symmetry::for_key("rotate8"), None);
    }
}
