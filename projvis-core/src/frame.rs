/// One projected frame of a wireframe model
use log::debug;
use nalgebra::Point2;

use crate::model::WireframeModel;
use crate::projection::ProjectionSystem;
use crate::vector::Vec3;
use crate::viewport;

/// A line segment in viewport coordinates
pub type Segment = (Point2<f64>, Point2<f64>);

/// Screen-space result of projecting every vertex of a model.
///
/// Vertices whose projection is singular or overflows are left out of the fit; `remap`
/// records where each original vertex ended up, if anywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    projected: Vec<Vec3>,
    screen: Vec<Point2<f64>>,
    remap: Vec<Option<usize>>,
}

impl Frame {
    pub fn build(
        system: &ProjectionSystem,
        model: &WireframeModel,
        width: f64,
        height: f64,
    ) -> Self {
        let mut projected = Vec::with_capacity(model.vertices.len());
        let mut remap = Vec::with_capacity(model.vertices.len());
        for &vertex in &model.vertices {
            // Overflowed projections are dropped like singular ones
            match system.project(vertex).filter(|p| p.is_finite()) {
                Some(p) => {
                    remap.push(Some(projected.len()));
                    projected.push(p);
                }
                None => remap.push(None),
            }
        }

        let skipped = remap.len() - projected.len();
        if skipped > 0 {
            debug!("{skipped} of {} vertices have no projection", remap.len());
        }

        let screen = viewport::fit(&projected, width, height);

        Self {
            projected,
            screen,
            remap,
        }
    }

    /// Projected plane coordinates of the vertices that survived, in model order
    pub fn projected(&self) -> &[Vec3] {
        &self.projected
    }

    /// Viewport coordinates, 1:1 with [`Frame::projected`]
    pub fn screen_points(&self) -> &[Point2<f64>] {
        &self.screen
    }

    /// For each model vertex, its position in [`Frame::screen_points`]
    pub fn remap(&self) -> &[Option<usize>] {
        &self.remap
    }

    pub fn skipped_count(&self) -> usize {
        self.remap.len() - self.projected.len()
    }

    /// Screen position of model vertex `index`, if it projected
    pub fn screen_point(&self, index: usize) -> Option<Point2<f64>> {
        let slot = (*self.remap.get(index)?)?;
        self.screen.get(slot).copied()
    }

    /// Face edges whose two endpoints both projected.
    ///
    /// An edge touching an unprojectable vertex is dropped, never interpolated.
    pub fn edges(&self, model: &WireframeModel) -> Vec<Segment> {
        model
            .faces
            .iter()
            .flat_map(|face| face.edges())
            .filter_map(|(a, b)| Some((self.screen_point(a)?, self.screen_point(b)?)))
            .collect()
    }
}
