//! Image-based crossword grid capture.
//!
//! Given a scanned or photographed grid, this crate finds the grid's
//! bounding rectangle and cell counts by clustering dark line segments, and
//! then builds a [`BlockGrid`] or [`BarGrid`] by sampling the image cell by
//! cell.
//!
//! # Overview
//!
//! - [`bitmap`] - the [`Bitmap`] trait capture reads pixels through, and
//!   [`GrayImage`], a simple owned implementation.
//! - [`detect`] - [`find_grid`]: dark-run scanning and coincident-line
//!   clustering under a [`CaptureParams`] tuning tuple.
//! - [`sample`] - [`block_grid_from_image`] and [`bar_grid_from_image`]:
//!   per-cell brightness and bar-profile sampling of the cropped grid
//!   rectangle.
//!
//! Detection and sampling are deliberately split: callers usually show the
//! detected rectangle to the user for confirmation or adjustment before the
//! cells are sampled.
//!
//! [`BlockGrid`]: crossgrid_core::BlockGrid
//! [`BarGrid`]: crossgrid_core::BarGrid

pub mod bitmap;
pub mod detect;
pub mod error;
pub mod sample;

pub use self::{
    bitmap::{Bitmap, GrayImage},
    detect::{CaptureParams, GridBounds, find_grid},
    error::{CaptureError, Orientation},
    sample::{bar_grid_from_image, block_grid_from_image},
};
