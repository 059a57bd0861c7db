//! Geometric snapshots of a pointer set
//!
//! A [`TransformData`] summarises the positions of a set of pointers at one
//! instant:
//!
//! - **centroid**: the mean position
//! - **spread**: the mean distance of the pointers to the centroid
//! - **anchors**: the angle of each pointer around the centroid, keyed by
//!   pointer key
//!
//! Two snapshots of the same contacts give the [`Transform`] between them:
//! the spread ratio is the scale, the circular mean angle change of the pointers
//! present in both is the rotation, and the translation moves the origin
//! centroid onto the target centroid.

use std::rc::Rc;

use smallvec::SmallVec;

use crate::geometry::{wrap_angle, Point, Transform};
use crate::pointer::{Pointer, PointerKey};

/// Below this spread a pointer set has no usable scale or rotation
const MIN_SPREAD: f32 = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Anchor {
    key: PointerKey,
    angle: f32,
}

/// Immutable snapshot of a pointer set
#[derive(Clone, Debug, PartialEq)]
pub struct TransformData {
    centroid: Point,
    spread: f32,
    anchors: SmallVec<[Anchor; 4]>,
}

impl Default for TransformData {
    fn default() -> Self {
        Self {
            centroid: Point::ZERO,
            spread: 0.0,
            anchors: SmallVec::new(),
        }
    }
}

impl TransformData {
    /// Build a snapshot from keyed positions
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (PointerKey, Point)>,
    {
        let points: SmallVec<[(PointerKey, Point); 4]> = points.into_iter().collect();
        if points.is_empty() {
            return Self::default();
        }

        let n = points.len() as f32;
        let (sum_x, sum_y) = points
            .iter()
            .fold((0.0, 0.0), |(x, y), (_, p)| (x + p.x, y + p.y));
        let centroid = Point::new(sum_x / n, sum_y / n);

        let spread = points.iter().map(|(_, p)| p.distance(centroid)).sum::<f32>() / n;
        let anchors = points
            .iter()
            .map(|(key, p)| Anchor {
                key: *key,
                angle: (*p - centroid).angle(),
            })
            .collect();

        Self {
            centroid,
            spread,
            anchors,
        }
    }

    /// Build a snapshot from the current positions of `pointers`
    pub fn from_pointers<ID>(pointers: &[Rc<Pointer<ID>>]) -> Self {
        Self::from_points(pointers.iter().map(|p| (p.key(), p.position())))
    }

    pub fn centroid(&self) -> Point {
        self.centroid
    }

    pub fn spread(&self) -> f32 {
        self.spread
    }

    pub fn pointer_count(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// The transform that carries this snapshot onto `target`
    pub fn transform_to(&self, target: &TransformData) -> Transform {
        let spread_usable = self.spread > MIN_SPREAD && target.spread > MIN_SPREAD;
        let (scale, rotation) = if spread_usable {
            (target.spread / self.spread, self.rotation_to(target))
        } else {
            (1.0, 0.0)
        };
        Transform::about(self.centroid, target.centroid, scale, rotation)
    }

    fn rotation_to(&self, target: &TransformData) -> f32 {
        let deltas: SmallVec<[f32; 4]> = self
            .anchors
            .iter()
            .filter_map(|from| {
                target
                    .anchors
                    .iter()
                    .find(|to| to.key == from.key)
                    .map(|to| wrap_angle(to.angle - from.angle))
            })
            .collect();

        if deltas.len() < 2 {
            return 0.0;
        }
        // Circular mean of the deltas
        let (sin, cos) = deltas
            .iter()
            .fold((0.0f32, 0.0f32), |(s, c), d| (s + d.sin(), c + d.cos()));
        sin.atan2(cos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() <= EPSILON
    }

    fn snapshot(points: &[(u64, f32, f32)]) -> TransformData {
        TransformData::from_points(
            points
                .iter()
                .map(|(id, x, y)| (PointerKey::Touch(*id), Point::new(*x, *y))),
        )
    }

    #[test]
    fn test_empty_snapshot() {
        let empty = TransformData::from_points(std::iter::empty());
        assert!(empty.is_empty());
        assert_eq!(empty.centroid(), Point::ZERO);
        assert!(empty.transform_to(&empty).is_identity(0.0));
    }

    #[test]
    fn test_centroid_and_spread() {
        let data = snapshot(&[(1, 0.0, 0.0), (2, 4.0, 0.0)]);
        assert_eq!(data.centroid(), Point::new(2.0, 0.0));
        assert!(approx_eq(data.spread(), 2.0));
        assert_eq!(data.pointer_count(), 2);
    }

    #[test]
    fn test_identical_pointers_give_identity() {
        let origin = snapshot(&[(1, 10.0, 10.0), (2, 10.0, 10.0)]);
        let target = snapshot(&[(1, 10.0, 10.0), (2, 10.0, 10.0)]);
        let transform = origin.transform_to(&target);

        assert!(transform.is_identity(EPSILON));
        assert!(approx_eq(transform.scale, 1.0));
        assert!(approx_eq(transform.rotation, 0.0));
    }

    #[test]
    fn test_single_pointer_translates() {
        let origin = snapshot(&[(1, 5.0, 5.0)]);
        let target = snapshot(&[(1, 8.0, 1.0)]);
        let transform = origin.transform_to(&target);

        assert!(approx_eq(transform.scale, 1.0));
        assert!(approx_eq(transform.rotation, 0.0));
        assert!(approx_eq(transform.translation.x, 3.0));
        assert!(approx_eq(transform.translation.y, -4.0));
    }

    #[test]
    fn test_pinch_scales_about_centroid() {
        let origin = snapshot(&[(1, -1.0, 0.0), (2, 1.0, 0.0)]);
        let target = snapshot(&[(1, -2.0, 0.0), (2, 2.0, 0.0)]);
        let transform = origin.transform_to(&target);

        assert!(approx_eq(transform.scale, 2.0));
        assert!(approx_eq(transform.rotation, 0.0));
        let moved = transform.apply(Point::new(1.0, 0.0));
        assert!(approx_eq(moved.x, 2.0) && approx_eq(moved.y, 0.0));
    }

    #[test]
    fn test_twist_rotates() {
        let origin = snapshot(&[(1, -1.0, 0.0), (2, 1.0, 0.0)]);
        let target = snapshot(&[(1, 0.0, -1.0), (2, 0.0, 1.0)]);
        let transform = origin.transform_to(&target);

        assert!(approx_eq(transform.scale, 1.0));
        assert!(approx_eq(transform.rotation, FRAC_PI_2));
    }

    #[test]
    fn test_pointer_order_does_not_matter() {
        let origin = snapshot(&[(1, -1.0, 0.0), (2, 1.0, 0.0)]);
        let target = snapshot(&[(2, 0.0, 1.0), (1, 0.0, -1.0)]);
        assert!(approx_eq(origin.transform_to(&target).rotation, FRAC_PI_2));
    }

    #[test]
    fn test_unmatched_pointers_do_not_rotate() {
        let origin = snapshot(&[(1, -1.0, 0.0), (2, 1.0, 0.0)]);
        let target = snapshot(&[(3, 0.0, -1.0), (4, 0.0, 1.0)]);
        assert!(approx_eq(origin.transform_to(&target).rotation, 0.0));
    }

    #[test]
    fn test_half_turn_straddling_pi() {
        let around = |turns: [f32; 4]| -> Vec<(u64, f32, f32)> {
            turns
                .iter()
                .enumerate()
                .map(|(i, turn)| {
                    let angle = i as f32 * FRAC_PI_2 + turn;
                    (i as u64, angle.cos(), angle.sin())
                })
                .collect()
        };
        let origin = snapshot(&around([0.0; 4]));
        // One contact just short of a half turn, the rest just past it
        let target = snapshot(&around([3.12, 3.16, 3.16, 3.16]));
        let transform = origin.transform_to(&target);

        assert!((transform.rotation.abs() - PI).abs() < 0.05);
        assert!((transform.scale - 1.0).abs() < 0.01);
    }
}
