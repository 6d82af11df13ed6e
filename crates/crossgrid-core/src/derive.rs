//! Field derivation from cell geometry.
//!
//! Both grid variants share one derivation pass, parameterised over a
//! [`SeparatorLayout`] view of their cell boards. Derivation is a pure
//! function of cell state: it rebuilds the full field lists, the cell→field
//! index links and the answerable-cell marks of the entries buffer, and is
//! re-run after every structural change.

use crate::{Board, Direction, Entries, Field, Position};

/// A read-only view of where a cell board separates runs.
///
/// Block grids separate runs with opaque cells (`is_open` is false there and
/// the edge separators are always absent); bar grids keep every cell open and
/// separate runs with bars on cell edges.
pub(crate) trait SeparatorLayout {
    fn num_columns(&self) -> usize;
    fn num_rows(&self) -> usize;
    /// Whether the cell can hold a letter at all.
    fn is_open(&self, pos: Position) -> bool;
    /// Whether a bar separates this cell from its left neighbour.
    fn has_left_separator(&self, pos: Position) -> bool;
    /// Whether a bar separates this cell from its upper neighbour.
    fn has_top_separator(&self, pos: Position) -> bool;
}

impl SeparatorLayout for Board<bool> {
    fn num_columns(&self) -> usize {
        Board::num_columns(self)
    }

    fn num_rows(&self) -> usize {
        Board::num_rows(self)
    }

    fn is_open(&self, pos: Position) -> bool {
        !self[pos]
    }

    fn has_left_separator(&self, _pos: Position) -> bool {
        false
    }

    fn has_top_separator(&self, _pos: Position) -> bool {
        false
    }
}

impl SeparatorLayout for Board<crate::EdgeSet> {
    fn num_columns(&self) -> usize {
        Board::num_columns(self)
    }

    fn num_rows(&self) -> usize {
        Board::num_rows(self)
    }

    fn is_open(&self, _pos: Position) -> bool {
        true
    }

    fn has_left_separator(&self, pos: Position) -> bool {
        self[pos].contains(crate::EdgeSet::LEFT)
    }

    fn has_top_separator(&self, pos: Position) -> bool {
        self[pos].contains(crate::EdgeSet::TOP)
    }
}

/// Per-cell links into the derived field lists.
///
/// Links are indices into the owning grid's field vectors, never references;
/// they are discarded and rebuilt together with the field lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct CellFields {
    pub(crate) across: Option<usize>,
    pub(crate) down: Option<usize>,
    pub(crate) origin_across: bool,
    pub(crate) origin_down: bool,
}

impl CellFields {
    pub(crate) fn link(&self, direction: Direction) -> Option<usize> {
        match direction {
            Direction::Across => self.across,
            Direction::Down => self.down,
        }
    }

    pub(crate) fn is_origin(&self) -> bool {
        self.origin_across || self.origin_down
    }
}

#[derive(Debug)]
pub(crate) struct DerivedFields {
    pub(crate) across: Vec<Field>,
    pub(crate) down: Vec<Field>,
    pub(crate) links: Board<CellFields>,
}

/// Scans the cell board in row-major order and derives the field lists.
///
/// A cell that starts an across run scans rightward to the next separator;
/// runs shorter than two cells never form fields. One number counter is
/// shared by both directions and advances once per cell that originates
/// *any* field, so a cell starting both an across and a down field consumes
/// a single number. The entries buffer is reset and every cell covered by a
/// field is marked answerable.
pub(crate) fn derive_fields(
    layout: &impl SeparatorLayout,
    entries: &mut Entries,
) -> DerivedFields {
    let num_columns = layout.num_columns();
    let num_rows = layout.num_rows();

    entries.reset();
    let mut across = Vec::new();
    let mut down = Vec::new();
    let mut links = Board::filled(num_columns, num_rows, CellFields::default());

    let mut field_number = 1_u32;
    for row in 0..num_rows {
        for column in 0..num_columns {
            let pos = Position::new(row, column);
            if !layout.is_open(pos) {
                continue;
            }
            let mut originated = false;

            let starts_across = column == 0
                || !layout.is_open(Position::new(row, column - 1))
                || layout.has_left_separator(pos);
            if starts_across {
                let mut c = column + 1;
                while c < num_columns {
                    let next = Position::new(row, c);
                    if !layout.is_open(next) || layout.has_left_separator(next) {
                        break;
                    }
                    c += 1;
                }
                let length = c - column;
                if length > 1 {
                    let index = across.len();
                    across.push(Field::new(row, column, Direction::Across, length, field_number));
                    links[pos].origin_across = true;
                    for i in 0..length {
                        let cell = Position::new(row, column + i);
                        links[cell].across = Some(index);
                        entries.init_cell(cell);
                    }
                    originated = true;
                }
            }

            let starts_down = row == 0
                || !layout.is_open(Position::new(row - 1, column))
                || layout.has_top_separator(pos);
            if starts_down {
                let mut r = row + 1;
                while r < num_rows {
                    let next = Position::new(r, column);
                    if !layout.is_open(next) || layout.has_top_separator(next) {
                        break;
                    }
                    r += 1;
                }
                let length = r - row;
                if length > 1 {
                    let index = down.len();
                    down.push(Field::new(row, column, Direction::Down, length, field_number));
                    links[pos].origin_down = true;
                    for i in 0..length {
                        let cell = Position::new(row + i, column);
                        links[cell].down = Some(index);
                        entries.init_cell(cell);
                    }
                    originated = true;
                }
            }

            if originated {
                field_number += 1;
            }
        }
    }

    log::trace!(
        "derived {} across and {} down fields on {num_columns}x{num_rows} grid",
        across.len(),
        down.len()
    );

    DerivedFields {
        across,
        down,
        links,
    }
}

/// Returns the cells enclosed by separators or grid edges on all four sides.
///
/// An isolated cell is unusable by the solver. This is not the same as "not
/// part of a field": a cell can be missing from one direction without being
/// isolated.
pub(crate) fn isolated_cells(layout: &impl SeparatorLayout) -> Vec<Position> {
    let num_columns = layout.num_columns();
    let num_rows = layout.num_rows();
    let mut isolated = Vec::new();
    for row in 0..num_rows {
        for column in 0..num_columns {
            let pos = Position::new(row, column);
            if !layout.is_open(pos) {
                continue;
            }
            let left_closed = column == 0
                || !layout.is_open(Position::new(row, column - 1))
                || layout.has_left_separator(pos);
            let right_closed = column == num_columns - 1
                || !layout.is_open(Position::new(row, column + 1))
                || layout.has_left_separator(Position::new(row, column + 1));
            let top_closed = row == 0
                || !layout.is_open(Position::new(row - 1, column))
                || layout.has_top_separator(pos);
            let bottom_closed = row == num_rows - 1
                || !layout.is_open(Position::new(row + 1, column))
                || layout.has_top_separator(Position::new(row + 1, column));
            if left_closed && right_closed && top_closed && bottom_closed {
                isolated.push(pos);
            }
        }
    }
    isolated
}
