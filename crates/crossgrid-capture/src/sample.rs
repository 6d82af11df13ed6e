//! Building grids by sampling a captured grid image.
//!
//! Once the grid rectangle and cell counts are known, the caller crops the
//! image to the rectangle and the routines here sample it cell by cell: a
//! block grid by the average brightness around each cell centre, a bar grid
//! by the run profile between adjacent cell centres. The x/y offsets nudge
//! the sampling points by a percentage of a cell, for images whose lines
//! are not perfectly centred.

use crossgrid_core::{BarGrid, BlockGrid, Board, EdgeSet, GridConfig, Position};

use crate::{Bitmap, CaptureError};

/// One percent of a cell, the unit of the sampling offsets.
const OFFSET_FACTOR: f64 = 0.01;

/// Builds a block grid by sampling cell brightness.
///
/// A square of `2 * sample_size - 1` pixels around each cell centre is
/// averaged; cells darker than the threshold become blocks. The offsets are
/// percent-of-cell nudges applied to every sampling point. The grid's
/// symmetry is classified automatically.
#[must_use]
pub fn block_grid_from_image(
    bitmap: &impl Bitmap,
    num_columns: usize,
    num_rows: usize,
    x_offset: i32,
    y_offset: i32,
    sample_size: u32,
    brightness_threshold: f32,
    config: GridConfig,
) -> BlockGrid {
    let geometry = CellGeometry::new(bitmap, num_columns, num_rows, x_offset, y_offset);
    let mut cells = Board::filled(num_columns, num_rows, false);

    for row in 0..num_rows {
        let image_y = geometry.row_centre(row);
        for column in 0..num_columns {
            let image_x = geometry.column_centre(column);

            let mut sum = 0.0_f64;
            let mut samples = 0_u32;
            let reach = i64::from(sample_size) - 1;
            for dy in -reach..=reach {
                for dx in -reach..=reach {
                    let x = image_x + dx;
                    let y = image_y + dy;
                    if x >= 0
                        && x < i64::from(bitmap.width())
                        && y >= 0
                        && y < i64::from(bitmap.height())
                    {
                        sum += f64::from(bitmap.brightness(
                            u32::try_from(x).unwrap_or(0),
                            u32::try_from(y).unwrap_or(0),
                        ));
                        samples += 1;
                    }
                }
            }
            if samples == 0 || sum / f64::from(samples) < f64::from(brightness_threshold) {
                cells[Position::new(row, column)] = true;
            }
        }
    }

    BlockGrid::from_cells(cells, config)
}

/// Builds a bar grid by classifying the runs between adjacent cell centres.
///
/// Every run must be light, then dark (the grid line), then light again; a
/// dark run at least `bar_width_threshold` pixels long is a bar. Detected
/// bars are recorded on both cells of their edge, and the grid's symmetry
/// is classified automatically.
///
/// # Errors
///
/// Returns [`CaptureError::MalformedGridImage`] if any sampled run does not
/// match the light-dark-light profile.
pub fn bar_grid_from_image(
    bitmap: &impl Bitmap,
    num_columns: usize,
    num_rows: usize,
    x_offset: i32,
    y_offset: i32,
    brightness_threshold: f32,
    bar_width_threshold: u32,
    config: GridConfig,
) -> Result<BarGrid, CaptureError> {
    let geometry = CellGeometry::new(bitmap, num_columns, num_rows, x_offset, y_offset);
    let mut cells = Board::filled(num_columns, num_rows, EdgeSet::empty());

    // Vertical bars: sample between horizontally adjacent cell centres.
    for row in 0..num_rows {
        let image_y = geometry.row_centre(row);
        for column in 1..num_columns {
            let start = geometry.column_centre(column - 1);
            let end = geometry.column_centre(column);
            if is_bar(
                bitmap,
                start,
                end,
                image_y,
                true,
                brightness_threshold,
                bar_width_threshold,
            )? {
                cells[Position::new(row, column)] |= EdgeSet::LEFT;
            }
        }
    }

    // Horizontal bars: sample between vertically adjacent cell centres.
    for column in 0..num_columns {
        let image_x = geometry.column_centre(column);
        for row in 1..num_rows {
            let start = geometry.row_centre(row - 1);
            let end = geometry.row_centre(row);
            if is_bar(
                bitmap,
                start,
                end,
                image_x,
                false,
                brightness_threshold,
                bar_width_threshold,
            )? {
                cells[Position::new(row, column)] |= EdgeSet::TOP;
            }
        }
    }

    // Record each bar on the facing edge of the adjacent cell as well.
    for row in 0..num_rows {
        for column in 0..num_columns {
            let pos = Position::new(row, column);
            if row + 1 < num_rows && cells[Position::new(row + 1, column)].contains(EdgeSet::TOP) {
                cells[pos] |= EdgeSet::BOTTOM;
            }
            if column + 1 < num_columns
                && cells[Position::new(row, column + 1)].contains(EdgeSet::LEFT)
            {
                cells[pos] |= EdgeSet::RIGHT;
            }
            if row > 0 && cells[Position::new(row - 1, column)].contains(EdgeSet::BOTTOM) {
                cells[pos] |= EdgeSet::TOP;
            }
            if column > 0 && cells[Position::new(row, column - 1)].contains(EdgeSet::RIGHT) {
                cells[pos] |= EdgeSet::LEFT;
            }
        }
    }

    Ok(BarGrid::from_bars(cells, config))
}

/// Maps cell rows and columns to image coordinates of their centres.
struct CellGeometry {
    cell_width: f64,
    cell_height: f64,
    dx: f64,
    dy: f64,
}

impl CellGeometry {
    fn new(
        bitmap: &impl Bitmap,
        num_columns: usize,
        num_rows: usize,
        x_offset: i32,
        y_offset: i32,
    ) -> Self {
        let cell_width = f64::from(bitmap.width()) / num_columns as f64;
        let cell_height = f64::from(bitmap.height()) / num_rows as f64;
        Self {
            cell_width,
            cell_height,
            dx: f64::from(x_offset) * OFFSET_FACTOR * cell_width,
            dy: f64::from(y_offset) * OFFSET_FACTOR * cell_height,
        }
    }

    fn column_centre(&self, column: usize) -> i64 {
        ((column as f64 + 0.5) * self.cell_width + self.dx).round() as i64
    }

    fn row_centre(&self, row: usize) -> i64 {
        ((row as f64 + 0.5) * self.cell_height + self.dy).round() as i64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Start,
    LeadingLight,
    Dark,
    TrailingLight,
}

/// Classifies the straight run between two sampling points as bar or grid
/// line.
///
/// `vertical` selects whether the run varies in x (sampling a vertical
/// line) or in y. The run must begin light, cross exactly one dark run and
/// end light.
fn is_bar(
    bitmap: &impl Bitmap,
    start: i64,
    end: i64,
    fixed: i64,
    vertical: bool,
    brightness_threshold: f32,
    bar_width_threshold: u32,
) -> Result<bool, CaptureError> {
    let mut line_width = 0_u32;
    let mut state = RunState::Start;
    for i in start..=end {
        let (x, y) = if vertical { (i, fixed) } else { (fixed, i) };
        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            return Err(CaptureError::MalformedGridImage);
        };
        if x >= bitmap.width() || y >= bitmap.height() {
            return Err(CaptureError::MalformedGridImage);
        }
        let dark = bitmap.brightness(x, y) < brightness_threshold;

        state = match state {
            RunState::Start => {
                if dark {
                    return Err(CaptureError::MalformedGridImage);
                }
                RunState::LeadingLight
            }
            RunState::LeadingLight => {
                if dark {
                    line_width += 1;
                    RunState::Dark
                } else {
                    RunState::LeadingLight
                }
            }
            RunState::Dark => {
                if dark {
                    line_width += 1;
                    RunState::Dark
                } else {
                    RunState::TrailingLight
                }
            }
            RunState::TrailingLight => {
                if dark {
                    return Err(CaptureError::MalformedGridImage);
                }
                RunState::TrailingLight
            }
        };
    }
    if state != RunState::TrailingLight {
        return Err(CaptureError::MalformedGridImage);
    }

    Ok(line_width >= bar_width_threshold)
}

#[cfg(test)]
mod tests {
    use crossgrid_core::{Edge, Symmetry};

    use super::*;
    use crate::GrayImage;

    #[test]
    fn block_sampling_marks_dark_cells() {
        let mut image = GrayImage::filled(100, 100, 1.0);
        // Darken the top-left cell of a 2x2 grid.
        image.fill_rect(0, 0, 50, 50, 0.0);

        let grid = block_grid_from_image(&image, 2, 2, 0, 0, 3, 0.5, GridConfig::default());
        assert!(grid.is_blocked(Position::new(0, 0)));
        assert!(!grid.is_blocked(Position::new(0, 1)));
        assert!(!grid.is_blocked(Position::new(1, 0)));
        assert!(!grid.is_blocked(Position::new(1, 1)));
        assert_eq!(grid.symmetry(), Symmetry::None);
    }

    #[test]
    fn block_sampling_classifies_symmetry() {
        let mut image = GrayImage::filled(100, 100, 1.0);
        image.fill_rect(0, 0, 50, 50, 0.0);
        image.fill_rect(50, 50, 50, 50, 0.0);

        let grid = block_grid_from_image(&image, 2, 2, 0, 0, 3, 0.5, GridConfig::default());
        assert!(grid.is_blocked(Position::new(0, 0)));
        assert!(grid.is_blocked(Position::new(1, 1)));
        assert_eq!(grid.symmetry(), Symmetry::RotationHalf);
    }

    /// A 2x2 grid image with thin grid lines at the cell boundaries and one
    /// thick bar segment between the top two cells.
    fn barred_image() -> GrayImage {
        let mut image = GrayImage::filled(100, 100, 1.0);
        // Thin grid lines through the middle, both directions.
        image.fill_rect(50, 0, 1, 100, 0.0);
        image.fill_rect(0, 50, 100, 1, 0.0);
        // Thicken the vertical line into a bar in the top half.
        image.fill_rect(48, 0, 5, 50, 0.0);
        image
    }

    #[test]
    fn bar_sampling_detects_thick_segments() {
        let grid =
            bar_grid_from_image(&barred_image(), 2, 2, 0, 0, 0.5, 3, GridConfig::default())
                .unwrap();

        assert!(grid.has_bar(Position::new(0, 1), Edge::Left));
        assert!(grid.has_bar(Position::new(0, 0), Edge::Right));
        assert!(!grid.has_bar(Position::new(1, 1), Edge::Left));
        assert!(!grid.has_bar(Position::new(0, 1), Edge::Bottom));
        assert_eq!(grid.symmetry(), Symmetry::ReflectVerticalAxis);
    }

    #[test]
    fn image_without_grid_lines_is_malformed() {
        let image = GrayImage::filled(100, 100, 1.0);
        assert_eq!(
            bar_grid_from_image(&image, 2, 2, 0, 0, 0.5, 3, GridConfig::default()).unwrap_err(),
            CaptureError::MalformedGridImage,
        );
    }

    #[test]
    fn dark_cell_centre_is_malformed_for_bar_grids() {
        let mut image = barred_image();
        // A dark blot on a cell centre breaks the light-dark-light profile.
        image.fill_rect(20, 20, 12, 12, 0.0);
        assert_eq!(
            bar_grid_from_image(&image, 2, 2, 0, 0, 0.5, 3, GridConfig::default()).unwrap_err(),
            CaptureError::MalformedGridImage,
        );
    }

    #[test]
    fn offsets_shift_the_sampling_points() {
        let mut image = GrayImage::filled(100, 100, 1.0);
        // Dark region covering the top-left cell, shifted right by a
        // quarter cell.
        image.fill_rect(12, 0, 50, 50, 0.0);

        // Without an offset the centre of cell (0,0) is dark.
        let grid = block_grid_from_image(&image, 2, 2, 0, 0, 3, 0.5, GridConfig::default());
        assert!(grid.is_blocked(Position::new(0, 0)));

        // Nudging the sampling 25% of a cell to the right keeps (0,0) dark
        // and (0,1) light (the dark region ends at x=61, the shifted centre
        // of column 1 is 87).
        let grid = block_grid_from_image(&image, 2, 2, 25, 0, 3, 0.5, GridConfig::default());
        assert!(grid.is_blocked(Position::new(0, 0)));
        assert!(!grid.is_blocked(Position::new(0, 1)));
    }
}
