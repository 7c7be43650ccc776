//! Coordinate transformations between geographic and slippy-map tile space.
//!
//! Implements the spherical Mercator tile formula from scratch without
//! external dependencies.

pub mod mercator;

pub use mercator::{extent_for, project, project_many, unproject};
