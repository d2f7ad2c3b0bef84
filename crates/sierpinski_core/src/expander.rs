//! Fractal expander
//!
//! Recursive Sierpinski subdivision of a seed tetrahedron. Depth `D` yields
//! `4^D` leaf tetrahedra and `4^(D+1)` triangles. Faces shared by touching
//! leaves are emitted by both, since the renderer draws solids rather than a
//! surface mesh.
//!
//! Output order is fixed: children are visited `v0, v1, v2, v3` at every
//! level and each leaf emits its faces in [`Tetrahedron::faces`] order, so a
//! given seed and depth always produce the same stream.

use std::fmt;

use crate::tetrahedron::{Tetrahedron, Triangle};

/// Deepest level a direct caller may request
///
/// `4^11` triangles is already a few hundred megabytes of vertex data.
pub const MAX_EXPAND_DEPTH: u32 = 10;

/// Error type for expansion requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpandError {
    /// Depth was negative
    InvalidDepth(i32),
    /// Depth exceeds [`MAX_EXPAND_DEPTH`]
    TooDeep { depth: i32, max: u32 },
}

impl fmt::Display for ExpandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpandError::InvalidDepth(depth) => {
                write!(f, "Invalid expansion depth {}: depth must be >= 0", depth)
            }
            ExpandError::TooDeep { depth, max } => {
                write!(f, "Expansion depth {} exceeds the maximum of {}", depth, max)
            }
        }
    }
}

impl std::error::Error for ExpandError {}

/// Number of leaf tetrahedra at `depth`
#[inline]
pub fn leaf_count(depth: u32) -> usize {
    4usize.pow(depth)
}

/// Number of triangles emitted at `depth`
#[inline]
pub fn triangle_count(depth: u32) -> usize {
    4 * leaf_count(depth)
}

fn checked_depth(depth: i32) -> Result<u32, ExpandError> {
    if depth < 0 {
        return Err(ExpandError::InvalidDepth(depth));
    }
    let depth = depth as u32;
    if depth > MAX_EXPAND_DEPTH {
        return Err(ExpandError::TooDeep { depth: depth as i32, max: MAX_EXPAND_DEPTH });
    }
    Ok(depth)
}

/// Expand `seed` to the full triangle stream at `depth`
pub fn expand(seed: Tetrahedron, depth: i32) -> Result<Vec<Triangle>, ExpandError> {
    let depth = checked_depth(depth)?;
    let mut triangles = Vec::with_capacity(triangle_count(depth));
    visit_leaves(seed, depth, &mut |leaf| triangles.extend_from_slice(&leaf.faces()));
    Ok(triangles)
}

/// The leaf tetrahedra at `depth`, in output order
pub fn leaves(seed: Tetrahedron, depth: i32) -> Result<Vec<Tetrahedron>, ExpandError> {
    let depth = checked_depth(depth)?;
    let mut out = Vec::with_capacity(leaf_count(depth));
    visit_leaves(seed, depth, &mut |leaf| out.push(leaf));
    Ok(out)
}

fn visit_leaves(tet: Tetrahedron, depth: u32, emit: &mut dyn FnMut(Tetrahedron)) {
    if depth == 0 {
        emit(tet);
        return;
    }
    for child in tet.children() {
        visit_leaves(child, depth - 1, emit);
    }
}
