//! Grid construction and the separator-kind dispatch.

use std::num::NonZero;

use crate::{
    Board, Entries, EntryValue, Field, FieldId, GridError, GridModel, Position, Symmetry,
    bar::BarGrid, block::BlockGrid,
};

/// Smallest supported grid dimension.
pub const MIN_DIMENSION: usize = 2;
/// Largest supported grid dimension.
pub const MAX_DIMENSION: usize = 99;
/// Default grid dimension for new documents.
pub const DEFAULT_DIMENSION: usize = 15;
/// Default separator kind for new documents.
pub const DEFAULT_SEPARATOR: Separator = Separator::Block;
/// Default symmetry for new documents.
pub const DEFAULT_SYMMETRY: Symmetry = Symmetry::RotationHalf;

/// Configuration copied into a grid at construction.
///
/// There is no ambient configuration: callers that want a different edit
/// history bound pass it here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    /// Maximum number of structural edits retained for undo/redo.
    pub max_edit_history: NonZero<usize>,
}

impl GridConfig {
    /// The default edit-history bound.
    pub const DEFAULT_MAX_EDIT_HISTORY: NonZero<usize> = NonZero::new(100).unwrap();
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            max_edit_history: Self::DEFAULT_MAX_EDIT_HISTORY,
        }
    }
}

/// A structural edit retained by the history.
///
/// Toggles snapshot the full cell board on both sides; symmetry changes
/// carry the old and new symmetry with the matching grid definitions and are
/// replayed through the definition parser. Undo and redo restore raw cell
/// state and re-derive the fields; they never patch field lists in place.
#[derive(Debug, Clone)]
pub(crate) enum EditRecord<C> {
    Cells {
        old: Board<C>,
        new: Board<C>,
    },
    Symmetry {
        old_symmetry: Symmetry,
        old_definition: Vec<String>,
        new_symmetry: Symmetry,
        new_definition: Vec<String>,
    },
}

/// The kind of separator a grid uses between answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// Answers are separated by fully blocked cells.
    Block,
    /// Answers are separated by bars on cell edges.
    Bar,
}

impl Separator {
    /// Both separator kinds.
    pub const ALL: [Self; 2] = [Self::Block, Self::Bar];

    /// Returns the key used in persisted documents.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Bar => "bar",
        }
    }

    /// Returns the separator for a persisted key.
    #[must_use]
    pub fn for_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|value| value.key() == key)
    }

    /// Creates an empty grid of this separator kind.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::IncompatibleSymmetryAndDimensions`] if the
    /// symmetry cannot apply to the dimensions.
    pub fn new_grid(
        self,
        num_columns: usize,
        num_rows: usize,
        symmetry: Symmetry,
        config: GridConfig,
    ) -> Result<Grid, GridError> {
        Ok(match self {
            Self::Block => Grid::Block(BlockGrid::new(num_columns, num_rows, symmetry, config)?),
            Self::Bar => Grid::Bar(BarGrid::new(num_columns, num_rows, symmetry, config)?),
        })
    }

    /// Creates a grid of this separator kind from a persisted definition
    /// string covering the symmetry's principal region.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::IncompatibleSymmetryAndDimensions`],
    /// [`GridError::IllegalCharacterInGridDefinition`] or
    /// [`GridError::MalformedGridDefinition`].
    pub fn parse_grid(
        self,
        num_columns: usize,
        num_rows: usize,
        symmetry: Symmetry,
        definition: &str,
        config: GridConfig,
    ) -> Result<Grid, GridError> {
        Ok(match self {
            Self::Block => Grid::Block(BlockGrid::from_definition(
                num_columns,
                num_rows,
                symmetry,
                definition,
                config,
            )?),
            Self::Bar => Grid::Bar(BarGrid::from_definition(
                num_columns,
                num_rows,
                symmetry,
                definition,
                config,
            )?),
        })
    }
}

impl std::fmt::Display for Separator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Block => f.write_str("Block"),
            Self::Bar => f.write_str("Bar"),
        }
    }
}

/// A crossword grid of either separator kind.
///
/// Structural edit operations live on the concrete [`BlockGrid`] and
/// [`BarGrid`] types; everything separator-independent is reachable through
/// this enum.
#[derive(Debug, Clone)]
pub enum Grid {
    /// A block-separated grid.
    Block(BlockGrid),
    /// A bar-separated grid.
    Bar(BarGrid),
}

impl Grid {
    /// Returns the grid's separator kind.
    #[must_use]
    pub fn separator(&self) -> Separator {
        match self {
            Self::Block(_) => Separator::Block,
            Self::Bar(_) => Separator::Bar,
        }
    }

    /// Returns the separator-independent model.
    #[must_use]
    pub fn model(&self) -> &GridModel {
        match self {
            Self::Block(grid) => grid.model(),
            Self::Bar(grid) => grid.model(),
        }
    }

    /// Returns the separator-independent model mutably.
    pub fn model_mut(&mut self) -> &mut GridModel {
        match self {
            Self::Block(grid) => grid.model_mut(),
            Self::Bar(grid) => grid.model_mut(),
        }
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.model().num_columns()
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.model().num_rows()
    }

    /// Returns the grid's symmetry.
    #[must_use]
    pub fn symmetry(&self) -> Symmetry {
        self.model().symmetry()
    }

    /// Returns all fields in enumeration order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.model().fields()
    }

    /// Looks up a field by id.
    #[must_use]
    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.model().field(id)
    }

    /// Returns the per-row definition strings of the principal region.
    #[must_use]
    pub fn definition(&self) -> Vec<String> {
        match self {
            Self::Block(grid) => grid.definition(),
            Self::Bar(grid) => grid.definition(),
        }
    }

    /// Changes the grid's symmetry, re-mirroring the principal region.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::IncompatibleSymmetryAndDimensions`] if the
    /// symmetry cannot apply to the dimensions.
    pub fn set_symmetry(&mut self, symmetry: Symmetry) -> Result<(), GridError> {
        match self {
            Self::Block(grid) => grid.set_symmetry(symmetry),
            Self::Bar(grid) => grid.set_symmetry(symmetry),
        }
    }

    /// Returns whether the grid's separators are symmetric under the
    /// candidate symmetry.
    #[must_use]
    pub fn is_symmetry(&self, candidate: Symmetry) -> bool {
        match self {
            Self::Block(grid) => grid.is_symmetry(candidate),
            Self::Bar(grid) => grid.is_symmetry(candidate),
        }
    }

    /// Returns whether an edit can be undone.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        match self {
            Self::Block(grid) => grid.can_undo(),
            Self::Bar(grid) => grid.can_undo(),
        }
    }

    /// Undoes the most recent structural edit, if any.
    pub fn undo(&mut self) {
        match self {
            Self::Block(grid) => grid.undo(),
            Self::Bar(grid) => grid.undo(),
        }
    }

    /// Returns whether an undone edit can be reapplied.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        match self {
            Self::Block(grid) => grid.can_redo(),
            Self::Bar(grid) => grid.can_redo(),
        }
    }

    /// Reapplies the most recently undone structural edit, if any.
    pub fn redo(&mut self) {
        match self {
            Self::Block(grid) => grid.redo(),
            Self::Bar(grid) => grid.redo(),
        }
    }

    /// Returns the cells enclosed by separators or grid edges on all four
    /// sides.
    #[must_use]
    pub fn isolated_cells(&self) -> Vec<Position> {
        match self {
            Self::Block(grid) => grid.isolated_cells(),
            Self::Bar(grid) => grid.isolated_cells(),
        }
    }

    /// Sets all entries from per-field strings; see
    /// [`GridModel::set_entries`].
    ///
    /// # Errors
    ///
    /// See [`GridModel::set_entries`].
    pub fn set_entries(&mut self, entries: &[String]) -> Result<(), GridError> {
        self.model_mut().set_entries(entries)
    }

    /// Sets the solution from per-field answers; see
    /// [`GridModel::set_solution`].
    ///
    /// # Errors
    ///
    /// See [`GridModel::set_solution`].
    pub fn set_solution(&mut self, answers: &[String]) -> Result<(), GridError> {
        self.model_mut().set_solution(answers)
    }

    /// Returns whether a solution is set.
    #[must_use]
    pub fn has_solution(&self) -> bool {
        self.model().has_solution()
    }

    /// Returns the solution buffer, if set.
    #[must_use]
    pub fn solution(&self) -> Option<&Entries> {
        self.model().solution()
    }

    /// Concatenates the solution answers in field-enumeration order.
    #[must_use]
    pub fn solution_string(&self, separator: Option<&str>) -> String {
        self.model().solution_string(separator)
    }

    /// Returns the entry value at a cell.
    #[must_use]
    pub fn entry_value(&self, pos: Position) -> EntryValue {
        self.model().entry_value(pos)
    }

    /// Sets the entry value at a single cell.
    pub fn set_entry_value(&mut self, pos: Position, value: EntryValue) {
        self.model_mut().set_entry_value(pos, value);
    }

    /// Recomputes the incorrect-entry cache; see
    /// [`GridModel::check_entries`].
    pub fn check_entries(&mut self) {
        self.model_mut().check_entries();
    }
}

/// The geometric transform carrying a cell onto one of its mirror images.
///
/// Block grids only need the image position; bar grids additionally map each
/// cell's edge set through the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CellTransform {
    ReflectVAxis,
    ReflectHAxis,
    RotateQuarter(u8),
}

impl CellTransform {
    pub(crate) fn apply(self, edges: crate::EdgeSet) -> crate::EdgeSet {
        match self {
            Self::ReflectVAxis => edges.reflect_v_axis(),
            Self::ReflectHAxis => edges.reflect_h_axis(),
            Self::RotateQuarter(quarters) => edges.rotate_quarter(quarters),
        }
    }
}

/// Computes the mirror images of a cell under a symmetry, excluding the cell
/// itself, together with the transform carrying the cell onto each image.
///
/// Half-turn rotation and single-axis reflections produce one image;
/// quarter-turn rotation and both-axis reflection produce three.
pub(crate) fn symmetry_images(
    symmetry: Symmetry,
    pos: Position,
    num_columns: usize,
    num_rows: usize,
) -> Vec<(Position, CellTransform)> {
    let r1 = pos.row;
    let c1 = pos.column;
    let r2 = num_rows - 1 - r1;
    let c2 = num_columns - 1 - c1;
    match symmetry {
        Symmetry::None => vec![],
        Symmetry::RotationHalf => vec![(Position::new(r2, c2), CellTransform::RotateQuarter(2))],
        Symmetry::RotationQuarter => vec![
            (Position::new(c1, r2), CellTransform::RotateQuarter(1)),
            (Position::new(r2, c2), CellTransform::RotateQuarter(2)),
            (Position::new(c2, r1), CellTransform::RotateQuarter(3)),
        ],
        Symmetry::ReflectVerticalAxis => {
            vec![(Position::new(r1, c2), CellTransform::ReflectVAxis)]
        }
        Symmetry::ReflectHorizontalAxis => {
            vec![(Position::new(r2, c1), CellTransform::ReflectHAxis)]
        }
        Symmetry::ReflectBothAxes => vec![
            (Position::new(r1, c2), CellTransform::ReflectVAxis),
            (Position::new(r2, c1), CellTransform::ReflectHAxis),
            (Position::new(r2, c2), CellTransform::RotateQuarter(2)),
        ],
    }
}

/// Iterates the positions of the principal region of a symmetry.
pub(crate) fn principal_positions(
    symmetry: Symmetry,
    num_columns: usize,
    num_rows: usize,
) -> impl Iterator<Item = Position> {
    let (width, height) = symmetry.principal_dimensions(num_columns, num_rows);
    (0..height).flat_map(move |row| (0..width).map(move |column| Position::new(row, column)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separator_keys_round_trip() {
        for separator in Separator::ALL {
            assert_eq!(Separator::for_key(separator.key()), Some(separator));
        }
        assert_eq!(Separator::for_key("wall"), None);
    }

    #[test]
    fn factory_rejects_incompatible_symmetry() {
        let result = Separator::Block.new_grid(4, 6, Symmetry::RotationQuarter, GridConfig::default());
        assert_eq!(
            result.unwrap_err(),
            GridError::IncompatibleSymmetryAndDimensions
        );
    }

    #[test]
    fn symmetry_images_cover_the_expected_cells() {
        let images = |symmetry| -> Vec<Position> {
            symmetry_images(symmetry, Position::new(0, 1), 5, 5)
                .into_iter()
                .map(|(pos, _)| pos)
                .collect()
        };
        assert!(images(Symmetry::None).is_empty());
        assert_eq!(images(Symmetry::RotationHalf), vec![Position::new(4, 3)]);
        assert_eq!(
            images(Symmetry::RotationQuarter),
            vec![
                Position::new(0, 4),
                Position::new(4, 3),
                Position::new(3, 0),
            ]
        );
        assert_eq!(
            images(Symmetry::ReflectBothAxes),
            vec![
                Position::new(0, 3),
                Position::new(4, 1),
                Position::new(4, 3),
            ]
        );
    }
}
