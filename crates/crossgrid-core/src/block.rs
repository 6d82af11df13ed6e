//! Block-separated grids.

use crate::{
    Board, GridConfig, GridError, GridModel, Position, Symmetry,
    derive,
    edit_list::EditList,
    grid::{EditRecord, principal_positions, symmetry_images},
};

const GRID_DEF_CHARS: [char; 2] = ['0', '1'];

/// A grid whose answers are separated by fully blocked cells.
#[derive(Debug, Clone)]
pub struct BlockGrid {
    model: GridModel,
    cells: Board<bool>,
    edits: EditList<EditRecord<bool>>,
}

impl BlockGrid {
    /// Creates an open grid with the given dimensions and symmetry.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::IncompatibleSymmetryAndDimensions`] if the
    /// symmetry cannot apply to the dimensions.
    pub fn new(
        num_columns: usize,
        num_rows: usize,
        symmetry: Symmetry,
        config: GridConfig,
    ) -> Result<Self, GridError> {
        if !symmetry.supports_dimensions(num_columns, num_rows) {
            return Err(GridError::IncompatibleSymmetryAndDimensions);
        }
        let mut grid = Self::bare(num_columns, num_rows, symmetry, config);
        grid.rebuild();
        Ok(grid)
    }

    /// Creates a grid from a persisted definition string covering the
    /// symmetry's principal region, one character per cell in row-major
    /// order (`'0'` open, `'1'` blocked). Whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::IncompatibleSymmetryAndDimensions`],
    /// [`GridError::IllegalCharacterInGridDefinition`] or, when the
    /// definition does not cover the principal region exactly,
    /// [`GridError::MalformedGridDefinition`].
    pub fn from_definition(
        num_columns: usize,
        num_rows: usize,
        symmetry: Symmetry,
        definition: &str,
        config: GridConfig,
    ) -> Result<Self, GridError> {
        if !symmetry.supports_dimensions(num_columns, num_rows) {
            return Err(GridError::IncompatibleSymmetryAndDimensions);
        }

        let blocked = parse_definition(definition)?;
        let (width, height) = symmetry.principal_dimensions(num_columns, num_rows);
        if blocked.len() != width * height {
            return Err(GridError::MalformedGridDefinition);
        }

        let mut grid = Self::bare(num_columns, num_rows, symmetry, config);
        for (i, blocked) in blocked.into_iter().enumerate() {
            if blocked {
                grid.set_cell_blocked(Position::new(i / width, i % width), true);
            }
        }
        grid.rebuild();
        Ok(grid)
    }

    /// Creates a grid from a raw board of blocked flags, classifying the
    /// symmetry automatically. Used when capturing a grid from an image.
    #[must_use]
    pub fn from_cells(cells: Board<bool>, config: GridConfig) -> Self {
        let mut grid = Self {
            model: GridModel::new(cells.num_columns(), cells.num_rows(), Symmetry::None),
            cells,
            edits: EditList::new(config.max_edit_history),
        };
        grid.rebuild();
        grid.update_symmetry();
        grid
    }

    fn bare(num_columns: usize, num_rows: usize, symmetry: Symmetry, config: GridConfig) -> Self {
        Self {
            model: GridModel::new(num_columns, num_rows, symmetry),
            cells: Board::filled(num_columns, num_rows, false),
            edits: EditList::new(config.max_edit_history),
        }
    }

    /// Returns the separator-independent model.
    #[must_use]
    pub fn model(&self) -> &GridModel {
        &self.model
    }

    /// Returns the separator-independent model mutably.
    pub fn model_mut(&mut self) -> &mut GridModel {
        &mut self.model
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.model.num_columns()
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.model.num_rows()
    }

    /// Returns the grid's symmetry.
    #[must_use]
    pub fn symmetry(&self) -> Symmetry {
        self.model.symmetry()
    }

    /// Returns whether the cell is blocked.
    #[must_use]
    pub fn is_blocked(&self, pos: Position) -> bool {
        self.cells[pos]
    }

    /// Toggles the blocked state of a cell and of its mirror images under
    /// the grid's symmetry, re-derives the fields and records an undoable
    /// edit.
    pub fn toggle_block(&mut self, pos: Position) {
        let old = self.cells.clone();
        let blocked = !self.cells[pos];
        self.set_cell_blocked(pos, blocked);
        self.rebuild();
        self.edits.push(EditRecord::Cells {
            old,
            new: self.cells.clone(),
        });
        log::debug!("toggled block at ({pos}) to {blocked}");
    }

    /// Sets the blocked state of a cell and of its mirror images. Does not
    /// re-derive fields.
    fn set_cell_blocked(&mut self, pos: Position, blocked: bool) {
        self.cells[pos] = blocked;
        for (image, _) in
            symmetry_images(self.symmetry(), pos, self.num_columns(), self.num_rows())
        {
            self.cells[image] = blocked;
        }
    }

    /// Changes the grid's symmetry.
    ///
    /// The blocked pattern of the new symmetry's principal region is kept
    /// and mirrored over the rest of the grid; fields are re-derived and an
    /// undoable edit carrying the old and new definitions is recorded.
    /// Changing to the current symmetry is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::IncompatibleSymmetryAndDimensions`] if the
    /// symmetry cannot apply to the dimensions.
    pub fn set_symmetry(&mut self, symmetry: Symmetry) -> Result<(), GridError> {
        if symmetry == self.symmetry() {
            return Ok(());
        }
        if !symmetry.supports_dimensions(self.num_columns(), self.num_rows()) {
            return Err(GridError::IncompatibleSymmetryAndDimensions);
        }

        let old_symmetry = self.symmetry();
        let old_definition = self.definition();
        self.model.set_symmetry_value(symmetry);

        let pattern: Vec<(Position, bool)> =
            principal_positions(symmetry, self.num_columns(), self.num_rows())
                .map(|pos| (pos, self.cells[pos]))
                .collect();
        for pos in self.cells.positions() {
            self.cells[pos] = false;
        }
        for (pos, blocked) in pattern {
            if blocked {
                self.set_cell_blocked(pos, true);
            }
        }
        self.rebuild();

        self.edits.push(EditRecord::Symmetry {
            old_symmetry,
            old_definition,
            new_symmetry: symmetry,
            new_definition: self.definition(),
        });
        log::debug!("changed symmetry from {old_symmetry:?} to {symmetry:?}");
        Ok(())
    }

    /// Returns whether the blocked pattern is symmetric under the candidate
    /// symmetry.
    #[must_use]
    pub fn is_symmetry(&self, candidate: Symmetry) -> bool {
        principal_positions(candidate, self.num_columns(), self.num_rows()).all(|pos| {
            let blocked = self.cells[pos];
            symmetry_images(candidate, pos, self.num_columns(), self.num_rows())
                .into_iter()
                .all(|(image, _)| self.cells[image] == blocked)
        })
    }

    fn update_symmetry(&mut self) {
        for symmetry in Symmetry::DETECTION_ORDER {
            if symmetry.supports_dimensions(self.num_columns(), self.num_rows())
                && self.is_symmetry(symmetry)
            {
                self.model.set_symmetry_value(symmetry);
                return;
            }
        }
    }

    /// Returns whether an edit can be undone.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.edits.can_undo()
    }

    /// Undoes the most recent structural edit, if any.
    pub fn undo(&mut self) {
        if let Some(edit) = self.edits.undo() {
            self.apply_edit(&edit, true);
        }
    }

    /// Returns whether an undone edit can be reapplied.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.edits.can_redo()
    }

    /// Reapplies the most recently undone structural edit, if any.
    pub fn redo(&mut self) {
        if let Some(edit) = self.edits.redo() {
            self.apply_edit(&edit, false);
        }
    }

    fn apply_edit(&mut self, edit: &EditRecord<bool>, backwards: bool) {
        match edit {
            EditRecord::Cells { old, new } => {
                self.cells = if backwards { old.clone() } else { new.clone() };
            }
            EditRecord::Symmetry {
                old_symmetry,
                old_definition,
                new_symmetry,
                new_definition,
            } => {
                let (symmetry, definition) = if backwards {
                    (*old_symmetry, old_definition)
                } else {
                    (*new_symmetry, new_definition)
                };
                self.model.set_symmetry_value(symmetry);
                self.restore_definition(definition);
            }
        }
        self.rebuild();
    }

    /// Replays a definition recorded by an edit. The definition was produced
    /// by this grid, so parsing it cannot fail.
    fn restore_definition(&mut self, definition: &[String]) {
        for pos in self.cells.positions() {
            self.cells[pos] = false;
        }
        let (width, _) = self
            .symmetry()
            .principal_dimensions(self.num_columns(), self.num_rows());
        for (row, line) in definition.iter().enumerate() {
            for (column, ch) in line.chars().enumerate() {
                debug_assert!(column < width);
                if ch == GRID_DEF_CHARS[1] {
                    self.set_cell_blocked(Position::new(row, column), true);
                }
            }
        }
    }

    /// Returns the per-row definition strings of the principal region.
    #[must_use]
    pub fn definition(&self) -> Vec<String> {
        let (width, height) = self
            .symmetry()
            .principal_dimensions(self.num_columns(), self.num_rows());
        (0..height)
            .map(|row| {
                (0..width)
                    .map(|column| GRID_DEF_CHARS[usize::from(self.cells[Position::new(row, column)])])
                    .collect()
            })
            .collect()
    }

    /// Returns the open cells enclosed by blocks or grid edges on all four
    /// sides.
    #[must_use]
    pub fn isolated_cells(&self) -> Vec<Position> {
        derive::isolated_cells(&self.cells)
    }

    fn rebuild(&mut self) {
        self.model.rebuild_fields(&self.cells);
    }
}

fn parse_definition(definition: &str) -> Result<Vec<bool>, GridError> {
    definition
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .map(|ch| {
            GRID_DEF_CHARS
                .iter()
                .position(|&def| def == ch)
                .map(|index| index != 0)
                .ok_or(GridError::IllegalCharacterInGridDefinition { ch })
        })
        .collect()
}
