/// Planar perspective projection through an arbitrary viewpoint
use log::trace;
use nalgebra::{Matrix4, Vector4};
use thiserror::Error;

use crate::vector::Vec3;

/// Collinearity threshold, relative to the lengths of the two plane edges
const DEGENERACY_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    #[error("plane points {p1}, {p2}, {p3} are collinear and do not define a plane")]
    DegeneratePlane { p1: Vec3, p2: Vec3, p3: Vec3 },
    #[error("non-finite coordinate in projection input {0}")]
    NonFinite(Vec3),
}

/// Projection of points through a viewpoint `C` onto the plane through `P1, P2, P3`.
///
/// All coefficients are derived once in [`ProjectionSystem::new`]. There are
/// no setters: a different viewpoint or plane means building a new system.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionSystem {
    viewpoint: Vec3,
    plane: [Vec3; 3],
    raw_normal: Vec3,
    normal: Vec3,
    d0: f64,
    d1: f64,
    d: f64,
    matrix: Matrix4<f64>,
}

impl ProjectionSystem {
    /// Derive the projection for viewpoint `c` and the plane through `p1`, `p2`, `p3`.
    ///
    /// Fails if the three plane points are (nearly) collinear, since the plane
    /// normal would be zero and every projection meaningless.
    pub fn new(c: Vec3, p1: Vec3, p2: Vec3, p3: Vec3) -> Result<Self, ProjectionError> {
        for v in [c, p1, p2, p3] {
            if !v.is_finite() {
                return Err(ProjectionError::NonFinite(v));
            }
        }

        let e1 = p1 - p2;
        let e2 = p3 - p2;
        let raw_normal = e1.cross(e2);
        let magnitude = raw_normal.magnitude();
        if magnitude <= DEGENERACY_TOLERANCE * e1.magnitude() * e2.magnitude() {
            return Err(ProjectionError::DegeneratePlane { p1, p2, p3 });
        }
        let normal = raw_normal.normalize();

        let d0 = c.dot(normal);
        let d1 = p1.dot(normal);
        let d = d1 - d0;

        let (a, b, cz) = (c.x, c.y, c.z);
        let (nx, ny, nz) = (normal.x, normal.y, normal.z);
        #[rustfmt::skip]
        let matrix = Matrix4::new(
            d + a * nx, a * ny,      a * nz,      -a * d1,
            b * nx,     d + b * ny,  b * nz,      -b * d1,
            cz * nx,    cz * ny,     d + cz * nz, -cz * d1,
            nx,         ny,          nz,          -d0,
        );

        Ok(Self {
            viewpoint: c,
            plane: [p1, p2, p3],
            raw_normal,
            normal,
            d0,
            d1,
            d,
            matrix,
        })
    }

    /// Build a new system that keeps this plane but looks from `c`
    pub fn with_viewpoint(&self, c: Vec3) -> Result<Self, ProjectionError> {
        let [p1, p2, p3] = self.plane;
        Self::new(c, p1, p2, p3)
    }

    pub fn viewpoint(&self) -> Vec3 {
        self.viewpoint
    }

    pub fn plane_points(&self) -> [Vec3; 3] {
        self.plane
    }

    /// Unnormalized normal `(P1 - P2) x (P3 - P2)`
    pub fn raw_normal(&self) -> Vec3 {
        self.raw_normal
    }

    /// Unit plane normal
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// `C . n`
    pub fn d0(&self) -> f64 {
        self.d0
    }

    /// `P1 . n`
    pub fn d1(&self) -> f64 {
        self.d1
    }

    /// `d1 - d0`, the signed distance from the viewpoint to the plane
    pub fn d(&self) -> f64 {
        self.d
    }

    /// The homogeneous 4x4 matrix this system applies
    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    /// True when the viewpoint lies on the target plane, which collapses
    /// every projected point onto the viewpoint itself.
    pub fn is_viewpoint_on_plane(&self) -> bool {
        self.d == 0.0
    }

    /// Apply the matrix to `(x, y, z, 1)` without the perspective divide
    pub fn project_homogeneous(&self, point: Vec3) -> Vector4<f64> {
        self.matrix * Vector4::new(point.x, point.y, point.z, 1.0)
    }

    /// Project a point onto the plane.
    ///
    /// Returns `None` when `w' == 0` exactly: the line from the viewpoint
    /// through `point` is parallel to the plane, so the image is at infinity.
    /// Points close to that locus produce very large but finite results.
    pub fn project(&self, point: Vec3) -> Option<Vec3> {
        let h = self.project_homogeneous(point);
        if h.w == 0.0 {
            trace!("singular projection for {point}");
            return None;
        }
        Some(Vec3::new(h.x / h.w, h.y / h.w, h.z / h.w))
    }

    /// Project every point independently, in order
    pub fn project_all(&self, points: &[Vec3]) -> Vec<Option<Vec3>> {
        points.iter().map(|&p| self.project(p)).collect()
    }
}
