//! Input groups: which files make up each heatmap layer.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{HeatmapError, HeatmapResult};

/// The files behind one layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputGroup {
    /// One file, one layer.
    Single(PathBuf),
    /// Several files concatenated into one layer.
    Merged(Vec<PathBuf>),
}

/// Discriminant of an [`InputGroup`], used for the homogeneity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputShape {
    Single,
    Merged,
}

impl InputGroup {
    pub fn shape(&self) -> InputShape {
        match self {
            InputGroup::Single(_) => InputShape::Single,
            InputGroup::Merged(_) => InputShape::Merged,
        }
    }

    /// Files of this group in load order.
    pub fn paths(&self) -> &[PathBuf] {
        match self {
            InputGroup::Single(path) => std::slice::from_ref(path),
            InputGroup::Merged(paths) => paths,
        }
    }
}

/// Check that a run's inputs are non-empty, all of the same shape, and that no
/// merged group is empty.
pub fn validate_homogeneous(groups: &[InputGroup]) -> HeatmapResult<InputShape> {
    let first = groups.first().ok_or(HeatmapError::NoInputs)?.shape();
    if groups.iter().any(|g| g.shape() != first) {
        return Err(HeatmapError::MixedInputShapes);
    }
    if let Some(index) = groups.iter().position(|g| g.paths().is_empty()) {
        return Err(HeatmapError::invalid_option(
            "input",
            format!("input group {} names no files", index),
        ));
    }
    Ok(first)
}
