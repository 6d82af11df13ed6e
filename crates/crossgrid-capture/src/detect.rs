//! Grid detection by coincident-line clustering.
//!
//! Detection scans the bitmap for maximal dark runs (candidate grid lines),
//! then searches for the largest sets of horizontal and vertical lines whose
//! endpoints coincide within a tolerance and which are mutually separated by
//! at least the minimum line separation. The winning combination maximises
//! the horizontal line count, then the vertical line count, then the area of
//! the combined bounding rectangle.

use crate::{Bitmap, CaptureError, Orientation};

/// Minimum number of coincident lines per orientation for a grid.
const MIN_LINES_PER_DIMENSION: usize = 3;

/// Tuning parameters for grid detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureParams {
    /// Pixels darker than this brightness count as line pixels (`0.0` to
    /// `1.0`).
    pub brightness_threshold: f32,
    /// Minimum length in pixels of a candidate line.
    pub min_line_length: u32,
    /// Minimum separation in pixels between distinct grid lines.
    pub min_line_separation: u32,
    /// Tolerance in pixels when matching line endpoints.
    pub endpoint_tolerance: u32,
}

/// The detected grid: its bounding rectangle and cell counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBounds {
    /// Left edge of the outermost grid lines.
    pub x: i32,
    /// Top edge of the outermost grid lines.
    pub y: i32,
    /// Width of the bounding rectangle.
    pub width: u32,
    /// Height of the bounding rectangle.
    pub height: u32,
    /// Number of grid columns (vertical lines minus one).
    pub num_columns: usize,
    /// Number of grid rows (horizontal lines minus one).
    pub num_rows: usize,
}

#[derive(Debug, Clone, Copy)]
struct Line {
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
}

#[derive(Debug, Clone, Copy)]
struct Bounds {
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
}

#[derive(Debug, Clone, Copy)]
struct Rect {
    x: i32,
    y: i32,
    width: i64,
    height: i64,
}

/// Finds the grid in a bitmap.
///
/// # Errors
///
/// Returns [`CaptureError::TooFewLines`] when either orientation yields
/// fewer than three candidate lines, and
/// [`CaptureError::TooFewCoincidentLines`] when no sufficiently large
/// coincident combination exists.
pub fn find_grid(bitmap: &impl Bitmap, params: &CaptureParams) -> Result<GridBounds, CaptureError> {
    let horizontal = scan_lines(bitmap, params, Orientation::Horizontal);
    if horizontal.len() < MIN_LINES_PER_DIMENSION {
        return Err(CaptureError::TooFewLines(Orientation::Horizontal));
    }
    let vertical = scan_lines(bitmap, params, Orientation::Vertical);
    if vertical.len() < MIN_LINES_PER_DIMENSION {
        return Err(CaptureError::TooFewLines(Orientation::Vertical));
    }
    log::debug!(
        "found {} horizontal and {} vertical candidate lines",
        horizontal.len(),
        vertical.len()
    );

    let tolerance = i32::try_from(params.endpoint_tolerance).unwrap_or(i32::MAX);
    let separation = i32::try_from(params.min_line_separation).unwrap_or(i32::MAX);

    let mut best_horizontal: Vec<usize> = Vec::new();
    let mut best_vertical: Vec<usize> = Vec::new();
    let mut best_area: i64 = 0;

    for datum in &horizontal {
        // The subset of horizontal lines whose endpoints coincide with the
        // datum's, collapsing runs of adjacent lines to their middle line.
        let mut h_indices = coincident_subset(
            &horizontal,
            |line| (line.x1, line.x2, line.y1),
            (datum.x1, datum.x2),
            tolerance,
            separation,
        );
        if h_indices.len() < MIN_LINES_PER_DIMENSION || h_indices.len() < best_horizontal.len() {
            continue;
        }

        let h_bounds = horizontal_bounds(&horizontal, &h_indices);
        let hx1 = h_bounds.x1 - tolerance;
        let hy1 = h_bounds.y1 - tolerance;
        let hx2 = h_bounds.x2 + tolerance;
        let hy2 = h_bounds.y2 + tolerance;

        for datum in &vertical {
            // The datum must lie within the relaxed bounding rectangle of
            // the horizontal subset.
            if datum.x1 < hx1 || datum.y1 < hy1 || datum.x2 > hx2 || datum.y2 > hy2 {
                continue;
            }

            let v_indices = coincident_subset(
                &vertical,
                |line| (line.y1, line.y2, line.x1),
                (datum.y1, datum.y2),
                tolerance,
                separation,
            );
            if v_indices.len() < MIN_LINES_PER_DIMENSION || v_indices.len() < best_vertical.len() {
                continue;
            }

            let v_bounds = vertical_bounds(&vertical, &v_indices);
            let vy1 = v_bounds.y1 - tolerance;
            let vy2 = v_bounds.y2 + tolerance;

            // Drop horizontal lines outside the relaxed vertical extent.
            h_indices.retain(|&i| {
                let line = &horizontal[i];
                line.y1 >= vy1 && line.y2 <= vy2
            });
            if h_indices.len() < best_horizontal.len() {
                continue;
            }

            let rect = outer_rectangle(horizontal_bounds(&horizontal, &h_indices), v_bounds);
            let area = rect.width * rect.height;

            if h_indices.len() > best_horizontal.len()
                || v_indices.len() > best_vertical.len()
                || area > best_area
            {
                best_horizontal = h_indices.clone();
                best_vertical = v_indices;
                best_area = area;
            }
        }
    }

    if best_horizontal.len() < MIN_LINES_PER_DIMENSION
        || best_vertical.len() < MIN_LINES_PER_DIMENSION
    {
        return Err(CaptureError::TooFewCoincidentLines);
    }

    let rect = outer_rectangle(
        horizontal_bounds(&horizontal, &best_horizontal),
        vertical_bounds(&vertical, &best_vertical),
    );
    Ok(GridBounds {
        x: rect.x,
        y: rect.y,
        width: u32::try_from(rect.width).unwrap_or(u32::MAX),
        height: u32::try_from(rect.height).unwrap_or(u32::MAX),
        num_columns: best_vertical.len() - 1,
        num_rows: best_horizontal.len() - 1,
    })
}

/// Scans every row (or column) for maximal dark runs of at least the
/// minimum line length.
fn scan_lines(bitmap: &impl Bitmap, params: &CaptureParams, orientation: Orientation) -> Vec<Line> {
    let (outer, inner) = match orientation {
        Orientation::Horizontal => (bitmap.height(), bitmap.width()),
        Orientation::Vertical => (bitmap.width(), bitmap.height()),
    };
    let min_length = params.min_line_length;

    let mut lines = Vec::new();
    for o in 0..outer {
        let mut start: Option<u32> = None;
        for i in 0..=inner {
            let dark = i < inner && {
                let (x, y) = match orientation {
                    Orientation::Horizontal => (i, o),
                    Orientation::Vertical => (o, i),
                };
                bitmap.brightness(x, y) < params.brightness_threshold
            };
            if dark {
                start.get_or_insert(i);
            } else if let Some(run_start) = start.take()
                && i - run_start >= min_length
            {
                lines.push(make_line(orientation, o, run_start, i - 1));
            }
        }
    }
    lines
}

fn make_line(orientation: Orientation, fixed: u32, start: u32, end: u32) -> Line {
    let (fixed, start, end) = (cast(fixed), cast(start), cast(end));
    match orientation {
        Orientation::Horizontal => Line {
            x1: start,
            y1: fixed,
            x2: end,
            y2: fixed,
        },
        Orientation::Vertical => Line {
            x1: fixed,
            y1: start,
            x2: fixed,
            y2: end,
        },
    }
}

fn cast(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Selects the lines whose endpoints along the line axis fall within the
/// datum's endpoints ± tolerance, keeping only lines separated from their
/// predecessor by more than the minimum separation and collapsing runs of
/// adjacent lines to the middle line of the run.
///
/// `project` maps a line to `(start, end, position)`: its endpoints along
/// the line axis and its coordinate across it.
fn coincident_subset(
    lines: &[Line],
    project: impl Fn(&Line) -> (i32, i32, i32),
    datum_endpoints: (i32, i32),
    tolerance: i32,
    separation: i32,
) -> Vec<usize> {
    let min_start = datum_endpoints.0 - tolerance;
    let max_start = datum_endpoints.0 + tolerance;
    let min_end = datum_endpoints.1 - tolerance;
    let max_end = datum_endpoints.1 + tolerance;

    let mut indices = Vec::new();
    let mut prev_position = i32::MIN;
    let mut run_start: Option<usize> = None;
    for (i, line) in lines.iter().enumerate() {
        let (start, end, position) = project(line);
        if start >= min_start && start <= max_start && end >= min_end && end <= max_end {
            if let Some(run) = run_start
                && position > prev_position + 1
            {
                collapse_run(&mut indices, run);
                run_start = None;
            }
            if run_start.is_none() && position > prev_position.saturating_add(separation) {
                run_start = Some(indices.len());
            }
            if run_start.is_some() {
                indices.push(i);
            }
            prev_position = position;
        }
    }
    if let Some(run) = run_start {
        collapse_run(&mut indices, run);
    }
    indices
}

/// Replaces the run of adjacent lines starting at `run` with its middle
/// line.
fn collapse_run(indices: &mut Vec<usize>, run: usize) {
    let middle = (run + indices.len() - 1) / 2;
    indices[run] = indices[middle];
    indices.truncate(run + 1);
}

fn horizontal_bounds(lines: &[Line], indices: &[usize]) -> Bounds {
    let x1 = indices.iter().map(|&i| lines[i].x1).min().unwrap_or(0);
    let x2 = indices.iter().map(|&i| lines[i].x2).max().unwrap_or(0);
    let y1 = lines[indices[0]].y1;
    let y2 = lines[indices[indices.len() - 1]].y1;
    Bounds { x1, y1, x2, y2 }
}

fn vertical_bounds(lines: &[Line], indices: &[usize]) -> Bounds {
    let y1 = indices.iter().map(|&i| lines[i].y1).min().unwrap_or(0);
    let y2 = indices.iter().map(|&i| lines[i].y2).max().unwrap_or(0);
    let x1 = lines[indices[0]].x1;
    let x2 = lines[indices[indices.len() - 1]].x1;
    Bounds { x1, y1, x2, y2 }
}

fn outer_rectangle(h_bounds: Bounds, v_bounds: Bounds) -> Rect {
    let x = h_bounds.x1.min(v_bounds.x1);
    let y = h_bounds.y1.min(v_bounds.y1);
    let width = i64::from(h_bounds.x2.max(v_bounds.x2)) - i64::from(x) + 1;
    let height = i64::from(h_bounds.y2.max(v_bounds.y2)) - i64::from(y) + 1;
    Rect {
        x,
        y,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GrayImage;

    fn params() -> CaptureParams {
        CaptureParams {
            brightness_threshold: 0.5,
            min_line_length: 50,
            min_line_separation: 10,
            endpoint_tolerance: 3,
        }
    }

    /// Draws a 4x4 lattice of 1-pixel grid lines spanning (10,10)-(85,85).
    fn lattice() -> GrayImage {
        let mut image = GrayImage::filled(100, 100, 1.0);
        for offset in [10, 35, 60, 85] {
            image.fill_rect(10, offset, 76, 1, 0.0);
            image.fill_rect(offset, 10, 1, 76, 0.0);
        }
        image
    }

    #[test]
    fn detects_an_evenly_spaced_lattice() {
        let bounds = find_grid(&lattice(), &params()).unwrap();

        assert_eq!(bounds.num_columns, 3);
        assert_eq!(bounds.num_rows, 3);
        assert_eq!(bounds.x, 10);
        assert_eq!(bounds.y, 10);
        assert_eq!(bounds.width, 76);
        assert_eq!(bounds.height, 76);
    }

    #[test]
    fn blank_image_has_too_few_lines() {
        let image = GrayImage::filled(100, 100, 1.0);
        assert_eq!(
            find_grid(&image, &params()).unwrap_err(),
            CaptureError::TooFewLines(Orientation::Horizontal),
        );
    }

    #[test]
    fn horizontal_lines_alone_are_not_a_grid() {
        let mut image = GrayImage::filled(100, 100, 1.0);
        for offset in [10, 35, 60, 85] {
            image.fill_rect(10, offset, 76, 1, 0.0);
        }
        assert_eq!(
            find_grid(&image, &params()).unwrap_err(),
            CaptureError::TooFewLines(Orientation::Vertical),
        );
    }

    #[test]
    fn distant_vertical_lines_are_not_coincident() {
        let mut image = GrayImage::filled(200, 100, 1.0);
        for offset in [10, 35, 60] {
            image.fill_rect(10, offset, 61, 1, 0.0);
        }
        // Vertical lines far to the right of the horizontal bounding box.
        for offset in [150, 165, 180] {
            image.fill_rect(offset, 10, 1, 61, 0.0);
        }
        assert_eq!(
            find_grid(&image, &params()).unwrap_err(),
            CaptureError::TooFewCoincidentLines,
        );
    }

    #[test]
    fn thick_lines_collapse_to_one_candidate() {
        let mut image = GrayImage::filled(100, 100, 1.0);
        // 3-pixel-thick lines still count once each.
        for offset in [10, 35, 60, 85] {
            image.fill_rect(10, offset, 76, 3, 0.0);
            image.fill_rect(offset, 10, 3, 76, 0.0);
        }
        let bounds = find_grid(&image, &params()).unwrap();
        assert_eq!(bounds.num_columns, 3);
        assert_eq!(bounds.num_rows, 3);
    }

    #[test]
    fn short_marks_are_ignored() {
        let mut image = lattice();
        // A stray short dark mark must not become a grid line.
        image.fill_rect(20, 50, 10, 1, 0.0);
        let bounds = find_grid(&image, &params()).unwrap();
        assert_eq!(bounds.num_rows, 3);
        assert_eq!(bounds.num_columns, 3);
    }
}
