//! Answer fields and field identifiers.

use std::{fmt, str::FromStr};

use derive_more::{Display, Error};

use crate::{Direction, Position};

/// A maximal run of at least two connected cells in one direction, holding
/// one answer.
///
/// Fields are derived from the cell geometry and are immutable once created;
/// every structural edit discards and re-derives the full field list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    row: usize,
    column: usize,
    direction: Direction,
    length: usize,
    number: u32,
}

impl Field {
    pub(crate) fn new(
        row: usize,
        column: usize,
        direction: Direction,
        length: usize,
        number: u32,
    ) -> Self {
        debug_assert!(length >= 2);
        Self {
            row,
            column,
            direction,
            length,
            number,
        }
    }

    /// Returns the row of the first cell.
    #[must_use]
    pub fn row(&self) -> usize {
        self.row
    }

    /// Returns the column of the first cell.
    #[must_use]
    pub fn column(&self) -> usize {
        self.column
    }

    /// Returns the direction the field runs in.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the number of cells in the field (always at least 2).
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Returns the 1-based field number shared by both directions at an
    /// origin cell.
    #[must_use]
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Returns the identifier of this field.
    #[must_use]
    pub fn id(&self) -> FieldId {
        FieldId::new(self.number, Some(self.direction))
    }

    /// Returns the position of the first cell.
    #[must_use]
    pub fn start(&self) -> Position {
        Position::new(self.row, self.column)
    }

    /// Returns the position of the last cell.
    #[must_use]
    pub fn end(&self) -> Position {
        match self.direction {
            Direction::Across => Position::new(self.row, self.column + self.length - 1),
            Direction::Down => Position::new(self.row + self.length - 1, self.column),
        }
    }

    /// Returns the position of the cell at `offset` within the field.
    ///
    /// # Panics
    ///
    /// Panics if `offset >= self.length()`.
    #[must_use]
    pub fn position_at(&self, offset: usize) -> Position {
        assert!(offset < self.length);
        match self.direction {
            Direction::Across => Position::new(self.row, self.column + offset),
            Direction::Down => Position::new(self.row + offset, self.column),
        }
    }

    /// Returns an iterator over the positions of the field's cells.
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let (row, column, direction) = (self.row, self.column, self.direction);
        (0..self.length).map(move |offset| match direction {
            Direction::Across => Position::new(row, column + offset),
            Direction::Down => Position::new(row + offset, column),
        })
    }

    /// Returns whether the field covers the given cell.
    #[must_use]
    pub fn contains_cell(&self, pos: Position) -> bool {
        match self.direction {
            Direction::Across => {
                pos.row == self.row
                    && pos.column >= self.column
                    && pos.column < self.column + self.length
            }
            Direction::Down => {
                pos.column == self.column
                    && pos.row >= self.row
                    && pos.row < self.row + self.length
            }
        }
    }
}

/// A stable external reference to a field: its number plus an optional
/// direction.
///
/// The direction may be omitted when the number alone identifies a field
/// unambiguously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldId {
    /// The 1-based field number.
    pub number: u32,
    /// The direction, or `None` when unspecified.
    pub direction: Option<Direction>,
}

impl FieldId {
    /// Creates a field id.
    #[must_use]
    pub fn new(number: u32, direction: Option<Direction>) -> Self {
        Self { number, direction }
    }

    /// Returns this id with the direction removed.
    #[must_use]
    pub fn undirected(self) -> Self {
        Self::new(self.number, None)
    }

    /// Returns whether two ids refer to the same field, treating an
    /// unspecified direction as a wildcard.
    #[must_use]
    pub fn matches(self, other: Self) -> bool {
        self.number == other.number
            && (self.direction.is_none()
                || other.direction.is_none()
                || self.direction == other.direction)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number)?;
        if let Some(direction) = self.direction {
            f.write_str(direction.suffix())?;
        }
        Ok(())
    }
}

/// Error produced when a field id string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("invalid field id: {text:?}")]
pub struct ParseFieldIdError {
    /// The rejected input.
    pub text: String,
}

impl FromStr for FieldId {
    type Err = ParseFieldIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || ParseFieldIdError { text: s.to_owned() };

        let digits_end = s
            .char_indices()
            .find(|(_, ch)| !ch.is_ascii_digit())
            .map_or(s.len(), |(i, _)| i);
        let number: u32 = s[..digits_end].parse().map_err(|_| error())?;
        let direction = match &s[digits_end..] {
            "" => None,
            suffix => Some(
                Direction::ALL
                    .into_iter()
                    .find(|d| d.suffix() == suffix)
                    .ok_or_else(error)?,
            ),
        };
        Ok(Self::new(number, direction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_geometry() {
        let field = Field::new(2, 3, Direction::Across, 4, 7);
        assert_eq!(field.start(), Position::new(2, 3));
        assert_eq!(field.end(), Position::new(2, 6));
        assert!(field.contains_cell(Position::new(2, 5)));
        assert!(!field.contains_cell(Position::new(2, 7)));
        assert!(!field.contains_cell(Position::new(3, 3)));
        assert_eq!(
            field.positions().collect::<Vec<_>>(),
            vec![
                Position::new(2, 3),
                Position::new(2, 4),
                Position::new(2, 5),
                Position::new(2, 6),
            ]
        );

        let field = Field::new(1, 0, Direction::Down, 3, 2);
        assert_eq!(field.end(), Position::new(3, 0));
        assert_eq!(field.position_at(2), Position::new(3, 0));
        assert!(field.contains_cell(Position::new(3, 0)));
        assert!(!field.contains_cell(Position::new(4, 0)));
    }

    #[test]
    fn id_display_and_parse() {
        assert_eq!(FieldId::new(3, Some(Direction::Across)).to_string(), "3a");
        assert_eq!(FieldId::new(12, Some(Direction::Down)).to_string(), "12d");
        assert_eq!(FieldId::new(5, None).to_string(), "5");

        assert_eq!(
            "3a".parse::<FieldId>().unwrap(),
            FieldId::new(3, Some(Direction::Across))
        );
        assert_eq!(
            "12d".parse::<FieldId>().unwrap(),
            FieldId::new(12, Some(Direction::Down))
        );
        assert_eq!("5".parse::<FieldId>().unwrap(), FieldId::new(5, None));

        assert!("a3".parse::<FieldId>().is_err());
        assert!("3x".parse::<FieldId>().is_err());
        assert!("".parse::<FieldId>().is_err());
    }

    #[test]
    fn id_matching_treats_missing_direction_as_wildcard() {
        let across = FieldId::new(4, Some(Direction::Across));
        let down = FieldId::new(4, Some(Direction::Down));
        let bare = FieldId::new(4, None);

        assert!(across.matches(across));
        assert!(!across.matches(down));
        assert!(across.matches(bare));
        assert!(bare.matches(down));
        assert!(!bare.matches(FieldId::new(5, None)));
    }
}
