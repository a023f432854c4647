/// Auto-fitting of projected points into a 2D drawing area
use nalgebra::Point2;

use crate::vector::Vec3;

/// Share of the viewport the fitted points may span (10% margin per side)
pub const FIT_FRACTION: f64 = 0.8;

/// Uniform scale and centering that fits a point set into a `width` x `height` area.
///
/// Only the `x` and `y` components of the projected points take part; the
/// projected `z` has no role in screen placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub center: Point2<f64>,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Compute the framing for `points`. Returns `None` for an empty set.
    ///
    /// Points with a non-finite `x` or `y` are left out of the bounding box,
    /// so one overflowed projection cannot spoil the framing of the rest.
    pub fn fit_to(points: &[Vec3], width: f64, height: f64) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let bounds = points
            .iter()
            .filter(|p| p.x.is_finite() && p.y.is_finite())
            .fold(None, |acc: Option<(f64, f64, f64, f64)>, p| {
                Some(match acc {
                    None => (p.x, p.x, p.y, p.y),
                    Some((min_x, max_x, min_y, max_y)) => {
                        (min_x.min(p.x), max_x.max(p.x), min_y.min(p.y), max_y.max(p.y))
                    }
                })
            });
        let (min_x, max_x, min_y, max_y) = bounds.unwrap_or((0.0, 0.0, 0.0, 0.0));

        let mut range_x = max_x - min_x;
        let mut range_y = max_y - min_y;
        if range_x == 0.0 {
            range_x = 1.0;
        }
        if range_y == 0.0 {
            range_y = 1.0;
        }

        let scale_x = width * FIT_FRACTION / range_x;
        let scale_y = height * FIT_FRACTION / range_y;

        Some(Self {
            scale: scale_x.min(scale_y),
            // Halve before adding so extreme bounds cannot overflow
            center: Point2::new(min_x / 2.0 + max_x / 2.0, min_y / 2.0 + max_y / 2.0),
            width,
            height,
        })
    }

    /// Map one projected point into viewport coordinates
    pub fn map(&self, point: Vec3) -> Point2<f64> {
        Point2::new(
            (point.x - self.center.x) * self.scale + self.width / 2.0,
            (point.y - self.center.y) * self.scale + self.height / 2.0,
        )
    }
}

/// Scale and center `points` into a `width` x `height` viewport.
///
/// The output is 1:1 with the input, in the same order. The framing is
/// recomputed from scratch on every call.
pub fn fit(points: &[Vec3], width: f64, height: f64) -> Vec<Point2<f64>> {
    match Viewport::fit_to(points, width, height) {
        Some(viewport) => points.iter().map(|&p| viewport.map(p)).collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty() {
        assert!(fit(&[], 800.0, 600.0).is_empty());
        assert_eq!(Viewport::fit_to(&[], 800.0, 600.0), None);
    }

    #[test]
    fn test_unit_square() {
        let points = [
            Vec3::new(0.0, 0.0, 7.0),
            Vec3::new(1.0, 0.0, -3.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 100.0),
        ];
        let screen = fit(&points, 800.0, 600.0);
        let expected = [(160.0, 60.0), (640.0, 60.0), (640.0, 540.0), (160.0, 540.0)];
        assert_eq!(screen.len(), expected.len());
        for (s, (x, y)) in screen.iter().zip(expected) {
            assert_relative_eq!(s.x, x);
            assert_relative_eq!(s.y, y);
        }
    }

    #[test]
    fn test_single_point_is_centered() {
        let screen = fit(&[Vec3::new(42.0, -7.0, 0.0)], 800.0, 600.0);
        assert_eq!(screen, vec![Point2::new(400.0, 300.0)]);
    }

    #[test]
    fn test_uniform_scale_preserves_aspect() {
        // A 4 x 1 rectangle is limited by width
        let points = [Vec3::new(0.0, 0.0, 0.0), Vec3::new(4.0, 1.0, 0.0)];
        let viewport = Viewport::fit_to(&points, 800.0, 600.0).unwrap();
        assert_relative_eq!(viewport.scale, 160.0);
        let screen = fit(&points, 800.0, 600.0);
        assert_relative_eq!(screen[1].x - screen[0].x, 640.0);
        assert_relative_eq!(screen[1].y - screen[0].y, 160.0);
    }

    #[test]
    fn test_collinear_in_x() {
        let points = [Vec3::new(2.0, 0.0, 0.0), Vec3::new(2.0, 10.0, 0.0)];
        let screen = fit(&points, 100.0, 100.0);
        assert_relative_eq!(screen[0].x, 50.0);
        assert_relative_eq!(screen[1].x, 50.0);
        assert_relative_eq!(screen[0].y, 10.0);
        assert_relative_eq!(screen[1].y, 90.0);
    }

    #[test]
    fn test_extreme_magnitudes_do_not_panic() {
        let points = [
            Vec3::new(f64::MAX, 0.0, 0.0),
            Vec3::new(-f64::MAX, 1.0, 0.0),
            Vec3::new(1e300, -1e300, 0.0),
        ];
        let screen = fit(&points, 800.0, 600.0);
        assert_eq!(screen.len(), 3);
    }

    #[test]
    fn test_infinite_point_does_not_spoil_the_rest() {
        let points = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(f64::INFINITY, 0.0, 0.0),
        ];
        let screen = fit(&points, 800.0, 600.0);
        assert_eq!(screen.len(), 3);
        assert_relative_eq!(screen[0].x, 160.0);
        assert_relative_eq!(screen[0].y, 60.0);
        assert_relative_eq!(screen[1].x, 640.0);
        assert_relative_eq!(screen[1].y, 540.0);
    }

    #[test]
    fn test_no_finite_points_still_maps_one_to_one() {
        let points = [Vec3::new(f64::NAN, 0.0, 0.0), Vec3::new(0.0, f64::INFINITY, 0.0)];
        let viewport = Viewport::fit_to(&points, 800.0, 600.0).unwrap();
        assert_eq!(viewport.center, Point2::new(0.0, 0.0));
        assert_eq!(fit(&points, 800.0, 600.0).len(), 2);
    }
}
