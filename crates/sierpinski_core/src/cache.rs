//! Expansion cache keyed by depth
//!
//! The triangle stream only changes when depth (or the seed) changes, so the
//! cache keeps the last stream and re-expands only on a miss.

use crate::expander::{expand, ExpandError};
use crate::tetrahedron::{Tetrahedron, Triangle};

/// Holds the triangle stream of the most recently requested depth
pub struct ExpansionCache {
    seed: Tetrahedron,
    depth: Option<u32>,
    triangles: Vec<Triangle>,
    expansions: usize,
}

impl ExpansionCache {
    /// Create an empty cache for `seed`
    pub fn new(seed: Tetrahedron) -> Self {
        Self {
            seed,
            depth: None,
            triangles: Vec::new(),
            expansions: 0,
        }
    }

    /// The seed tetrahedron being expanded
    pub fn seed(&self) -> Tetrahedron {
        self.seed
    }

    /// Replace the seed, dropping the cached stream if it differs
    pub fn set_seed(&mut self, seed: Tetrahedron) {
        if seed != self.seed {
            self.seed = seed;
            self.depth = None;
            self.triangles.clear();
        }
    }

    /// Depth of the cached stream, if any
    pub fn cached_depth(&self) -> Option<u32> {
        self.depth
    }

    /// Number of expansions actually performed (cache misses)
    pub fn expansions(&self) -> usize {
        self.expansions
    }

    /// Get the triangle stream for `depth`, expanding only on a miss
    pub fn triangles(&mut self, depth: u32) -> Result<&[Triangle], ExpandError> {
        if self.depth != Some(depth) {
            let depth_arg = i32::try_from(depth).unwrap_or(i32::MAX);
            self.triangles = expand(self.seed, depth_arg)?;
            self.depth = Some(depth);
            self.expansions += 1;
            log::debug!("Expanded depth {} into {} triangles", depth, self.triangles.len());
        }
        Ok(&self.triangles)
    }
}
