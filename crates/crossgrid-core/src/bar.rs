//! Bar-separated grids.

use crate::{
    Board, Edge, EdgeSet, GridConfig, GridError, GridModel, Position, Symmetry,
    derive,
    edit_list::EditList,
    grid::{EditRecord, principal_positions, symmetry_images},
};

const GRID_DEF_CHARS: [char; 4] = ['0', '1', '2', '3'];

/// A grid whose answers are separated by bars on cell edges.
///
/// Every cell stays fillable; a bar on an edge separates the runs on either
/// side of it. A bar is always recorded on both cells that share the edge,
/// and every mutation maintains that invariant.
#[derive(Debug, Clone)]
pub struct BarGrid {
    model: GridModel,
    cells: Board<EdgeSet>,
    edits: EditList<EditRecord<EdgeSet>>,
}

impl BarGrid {
    /// Creates a bar-free grid with the given dimensions and symmetry.
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
    /// order. Each character is a 2-bit code combining has-bottom-bar (bit
    /// 0) and has-right-bar (bit 1): `'0'` to `'3'`. Whitespace is ignored.
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

        let bar_sets = parse_definition(definition)?;
        let (width, height) = symmetry.principal_dimensions(num_columns, num_rows);
        if bar_sets.len() != width * height {
            return Err(GridError::MalformedGridDefinition);
        }

        let mut grid = Self::bare(num_columns, num_rows, symmetry, config);
        for (i, bars) in bar_sets.into_iter().enumerate() {
            grid.mirror_bars(Position::new(i / width, i % width), EdgeSet::SECONDARY, bars);
        }
        grid.rebuild();
        Ok(grid)
    }

    /// Creates a grid from a raw board of edge sets, classifying the
    /// symmetry automatically. Used when capturing a grid from an image.
    /// The board must already record each bar on both cells sharing the
    /// edge.
    #[must_use]
    pub fn from_bars(cells: Board<EdgeSet>, config: GridConfig) -> Self {
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
            cells: Board::filled(num_columns, num_rows, EdgeSet::empty()),
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

    /// Returns the bars on the cell's edges.
    #[must_use]
    pub fn bars(&self, pos: Position) -> EdgeSet {
        self.cells[pos]
    }

    /// Returns whether the cell has a bar on the given edge.
    #[must_use]
    pub fn has_bar(&self, pos: Position, edge: Edge) -> bool {
        self.cells[pos].contains(edge.bit())
    }

    /// Toggles the bar on one edge of a cell and on the mirrored edges of
    /// the cell's symmetry images, re-derives the fields and records an
    /// undoable edit.
    pub fn toggle_bar(&mut self, pos: Position, edge: Edge) {
        let add = if self.has_bar(pos, edge) {
            EdgeSet::empty()
        } else {
            edge.bit()
        };
        self.set_cell_bars(pos, edge.bit(), add);
        log::debug!("toggled {edge:?} bar at ({pos})");
    }

    /// Removes and adds bars on a cell and on its symmetry images, mapping
    /// the edges through each image's transform, then re-derives the fields
    /// and records an undoable edit.
    pub fn set_cell_bars(&mut self, pos: Position, remove: EdgeSet, add: EdgeSet) {
        let old = self.cells.clone();
        self.mirror_bars(pos, remove, add);
        self.rebuild();
        self.edits.push(EditRecord::Cells {
            old,
            new: self.cells.clone(),
        });
    }

    /// Applies a bar change to a cell and its symmetry images without
    /// re-deriving fields or touching the history.
    fn mirror_bars(&mut self, pos: Position, remove: EdgeSet, add: EdgeSet) {
        self.apply_bars(pos, remove, add);
        for (image, transform) in
            symmetry_images(self.symmetry(), pos, self.num_columns(), self.num_rows())
        {
            self.apply_bars(image, transform.apply(remove), transform.apply(add));
        }
    }

    /// Removes and adds bars on one cell, keeping the shared-edge invariant
    /// with the adjacent cells.
    fn apply_bars(&mut self, pos: Position, remove: EdgeSet, add: EdgeSet) {
        self.cells[pos].remove(remove);
        self.cells[pos].insert(add);

        for edge in remove.edges() {
            if let Some(neighbour) = self.neighbour(pos, edge) {
                self.cells[neighbour].remove(edge.opposite().bit());
            }
        }
        for edge in add.edges() {
            if let Some(neighbour) = self.neighbour(pos, edge) {
                self.cells[neighbour].insert(edge.opposite().bit());
            }
        }
    }

    fn neighbour(&self, pos: Position, edge: Edge) -> Option<Position> {
        match edge {
            Edge::Top => (pos.row > 0).then(|| Position::new(pos.row - 1, pos.column)),
            Edge::Right => (pos.column < self.num_columns() - 1)
                .then(|| Position::new(pos.row, pos.column + 1)),
            Edge::Bottom => {
                (pos.row < self.num_rows() - 1).then(|| Position::new(pos.row + 1, pos.column))
            }
            Edge::Left => (pos.column > 0).then(|| Position::new(pos.row, pos.column - 1)),
        }
    }

    /// Changes the grid's symmetry.
    ///
    /// The secondary bars of the new symmetry's principal region are kept
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

        let pattern: Vec<(Position, EdgeSet)> =
            principal_positions(symmetry, self.num_columns(), self.num_rows())
                .map(|pos| (pos, self.cells[pos] & EdgeSet::SECONDARY))
                .collect();
        for pos in self.cells.positions() {
            self.cells[pos] = EdgeSet::empty();
        }
        for (pos, bars) in pattern {
            self.mirror_bars(pos, EdgeSet::SECONDARY, bars);
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

    /// Returns whether the bar pattern is symmetric under the candidate
    /// symmetry.
    #[must_use]
    pub fn is_symmetry(&self, candidate: Symmetry) -> bool {
        principal_positions(candidate, self.num_columns(), self.num_rows()).all(|pos| {
            let bars = self.cells[pos];
            symmetry_images(candidate, pos, self.num_columns(), self.num_rows())
                .into_iter()
                .all(|(image, transform)| self.cells[image] == transform.apply(bars))
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

    fn apply_edit(&mut self, edit: &EditRecord<EdgeSet>, backwards: bool) {
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
            self.cells[pos] = EdgeSet::empty();
        }
        for (row, line) in definition.iter().enumerate() {
            for (column, ch) in line.chars().enumerate() {
                let code = GRID_DEF_CHARS
                    .iter()
                    .position(|&def| def == ch)
                    .unwrap_or(0);
                self.mirror_bars(
                    Position::new(row, column),
                    EdgeSet::SECONDARY,
                    EdgeSet::SECONDARY_SETS[code],
                );
            }
        }
    }

    /// Returns the per-row definition strings of the principal region: the
    /// 2-bit bottom/right bar code of each cell.
    #[must_use]
    pub fn definition(&self) -> Vec<String> {
        let (width, height) = self
            .symmetry()
            .principal_dimensions(self.num_columns(), self.num_rows());
        (0..height)
            .map(|row| {
                (0..width)
                    .map(|column| {
                        GRID_DEF_CHARS[self.cells[Position::new(row, column)].secondary_code()]
                    })
                    .collect()
            })
            .collect()
    }

    /// Returns the cells enclosed by bars or grid edges on all four sides.
    #[must_use]
    pub fn isolated_cells(&self) -> Vec<Position> {
        derive::isolated_cells(&self.cells)
    }

    fn rebuild(&mut self) {
        self.model.rebuild_fields(&self.cells);
    }
}

fn parse_definition(definition: &str) -> Result<Vec<EdgeSet>, GridError> {
    definition
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .map(|ch| {
            GRID_DEF_CHARS
                .iter()
                .position(|&def| def == ch.to_ascii_uppercase())
                .map(|code| EdgeSet::SECONDARY_SETS[code])
                .ok_or(GridError::IllegalCharacterInGridDefinition { ch })
        })
        .collect()
}
