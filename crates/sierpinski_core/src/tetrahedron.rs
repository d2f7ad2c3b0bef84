//! Tetrahedron and triangle value types
//!
//! Tetrahedra are immutable `Copy` values: subdivision builds new ones and
//! never mutates a parent.

use sierpinski_math::Vec3;

/// Corners of the canonical seed tetrahedron: the regular tetrahedron
/// inscribed in the cube `[-1, 1]^3`, centered at the origin.
///
/// `expand.wgsl` hardcodes the same corners; keep them in sync.
pub const SEED_CORNERS: [Vec3; 4] = [
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(-1.0, -1.0, 1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(1.0, -1.0, -1.0),
];

/// Faces as (a, b, c, opposite) vertex indices, in emission order
const FACES: [[usize; 4]; 4] = [
    [0, 1, 2, 3],
    [0, 1, 3, 2],
    [0, 2, 3, 1],
    [1, 2, 3, 0],
];

/// A triangle with counter-clockwise winding when seen from its front side
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub vertices: [Vec3; 3],
}

impl Triangle {
    /// Create a triangle from three vertices
    #[inline]
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { vertices: [a, b, c] }
    }

    /// Unnormalized face normal, `(b - a) x (c - a)`
    #[inline]
    pub fn cross_normal(&self) -> Vec3 {
        let [a, b, c] = self.vertices;
        (b - a).cross(c - a)
    }

    /// Unit face normal (front side)
    #[inline]
    pub fn normal(&self) -> Vec3 {
        self.cross_normal().normalized()
    }

    /// Centroid of the three vertices
    #[inline]
    pub fn centroid(&self) -> Vec3 {
        let [a, b, c] = self.vertices;
        (a + b + c) / 3.0
    }
}

/// A tetrahedron given by its four corners `v0..v3`
///
/// The corner order is the reference ordering used for child construction
/// and face emission order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tetrahedron {
    pub vertices: [Vec3; 4],
}

impl Tetrahedron {
    /// Create a tetrahedron from four corners
    #[inline]
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, v3: Vec3) -> Self {
        Self { vertices: [v0, v1, v2, v3] }
    }

    /// The canonical tetrahedron of the seed primitive: [`SEED_CORNERS`]
    /// scaled by `scale` and centered on `seed`
    pub fn from_seed(seed: Vec3, scale: f32) -> Self {
        let [a, b, c, d] = SEED_CORNERS;
        Self::new(seed + a * scale, seed + b * scale, seed + c * scale, seed + d * scale)
    }

    /// Centroid of the four corners
    #[inline]
    pub fn centroid(&self) -> Vec3 {
        let [a, b, c, d] = self.vertices;
        (a + b + c + d) / 4.0
    }

    /// Signed volume; positive when `v3` lies on the side `(v1-v0) x (v2-v0)` points to
    pub fn signed_volume(&self) -> f32 {
        let [a, b, c, d] = self.vertices;
        (b - a).cross(c - a).dot(d - a) / 6.0
    }

    /// The four faces, each wound counter-clockwise as seen from outside
    ///
    /// Orientation is decided against the opposite corner, so it holds for
    /// any corner ordering.
    pub fn faces(&self) -> [Triangle; 4] {
        FACES.map(|[a, b, c, opposite]| {
            let (va, vb, vc) = (self.vertices[a], self.vertices[b], self.vertices[c]);
            let inward = (vb - va).cross(vc - va).dot(self.vertices[opposite] - va) > 0.0;
            if inward {
                Triangle::new(va, vc, vb)
            } else {
                Triangle::new(va, vb, vc)
            }
        })
    }

    /// The four half-size corner children, in order `child(v0)..child(v3)`
    ///
    /// The central octahedron bounded by the six edge midpoints is dropped.
    pub fn children(&self) -> [Tetrahedron; 4] {
        let [v0, v1, v2, v3] = self.vertices;
        let m01 = v0.midpoint(v1);
        let m02 = v0.midpoint(v2);
        let m03 = v0.midpoint(v3);
        let m12 = v1.midpoint(v2);
        let m13 = v1.midpoint(v3);
        let m23 = v2.midpoint(v3);

        [
            Tetrahedron::new(v0, m01, m02, m03),
            Tetrahedron::new(v1, m01, m12, m13),
            Tetrahedron::new(v2, m02, m12, m23),
            Tetrahedron::new(v3, m03, m13, m23),
        ]
    }

    /// Barycentric coordinates of `p` with respect to the four corners
    ///
    /// Returns `None` for a degenerate (flat) tetrahedron.
    pub fn barycentric(&self, p: Vec3) -> Option<[f32; 4]> {
        let volume = self.signed_volume();
        if volume.abs() <= f32::EPSILON {
            return None;
        }
        let [a, b, c, d] = self.vertices;
        let sub = |w: [Vec3; 4]| Tetrahedron { vertices: w }.signed_volume() / volume;
        Some([
            sub([p, b, c, d]),
            sub([a, p, c, d]),
            sub([a, b, p, d]),
            sub([a, b, c, p]),
        ])
    }

    /// Whether `p` lies inside or on the boundary (within `tolerance` in
    /// barycentric units)
    pub fn contains(&self, p: Vec3, tolerance: f32) -> bool {
        self.barycentric(p)
            .map(|weights| weights.iter().all(|&w| w >= -tolerance))
            .unwrap_or(false)
    }
}
