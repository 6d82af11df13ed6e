//! Core data model for crossword grid editing.
//!
//! This crate represents rectangular crossword grids of both traditional
//! kinds - block-separated and bar-separated - and keeps their derived state
//! consistent while they are edited.
//!
//! # Overview
//!
//! The crate is organised around a few concepts:
//!
//! 1. **Geometry** - [`Position`] and [`Board`], small value types for cell
//!    coordinates and rectangular cell storage.
//! 2. **Symmetry** - [`Symmetry`] enumerates the supported grid symmetries
//!    and knows each one's principal region; structural edits are mirrored
//!    across the symmetry automatically.
//! 3. **Cells and fields** - block cells are plain blocked flags, bar cells
//!    carry an [`EdgeSet`] of bars; [`Field`]s are the answer runs derived
//!    from the cells, numbered in scan order with one number shared by both
//!    directions at a common origin.
//! 4. **Grids** - [`BlockGrid`] and [`BarGrid`] own the cells, the derived
//!    fields, the player [`Entries`], an optional solution and a bounded
//!    undo/redo history; [`Grid`] abstracts over the two kinds and
//!    [`Separator`] constructs them.
//!
//! # Examples
//!
//! ```
//! use crossgrid_core::{BlockGrid, GridConfig, Position, Symmetry};
//!
//! let mut grid =
//!     BlockGrid::new(5, 5, Symmetry::RotationHalf, GridConfig::default()).unwrap();
//!
//! // Blocking a cell also blocks its half-turn image and renumbers the
//! // fields.
//! grid.toggle_block(Position::new(0, 0));
//! assert!(grid.is_blocked(Position::new(4, 4)));
//!
//! // The edit history restores the exact prior state.
//! grid.undo();
//! assert!(!grid.is_blocked(Position::new(4, 4)));
//! ```

pub mod bar;
pub mod block;
pub mod board;
mod derive;
pub mod direction;
pub mod edge;
mod edit_list;
pub mod entries;
pub mod error;
pub mod field;
pub mod grid;
pub mod model;
pub mod symmetry;

pub use self::{
    bar::BarGrid,
    block::BlockGrid,
    board::{Board, Position, Positions},
    direction::Direction,
    edge::{Edge, EdgeSet},
    entries::{Entries, EntryValue, UNDEFINED_MARKER},
    error::GridError,
    field::{Field, FieldId, ParseFieldIdError},
    grid::{
        DEFAULT_DIMENSION, DEFAULT_SEPARATOR, DEFAULT_SYMMETRY, Grid, GridConfig, MAX_DIMENSION,
        MIN_DIMENSION, Separator,
    },
    model::GridModel,
    symmetry::Symmetry,
};
