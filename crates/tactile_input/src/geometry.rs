//! 2D geometry for pointer positions and gesture transforms

use std::f32::consts::{PI, TAU};
use std::ops::{Add, Sub};

/// 2D point
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f32 {
        (*self - other).length()
    }
}

impl Sub for Point {
    type Output = Vec2;

    fn sub(self, rhs: Point) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add<Vec2> for Point {
    type Output = Point;

    fn add(self, rhs: Vec2) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// 2D vector
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Angle from the positive x axis, in radians
    pub fn angle(&self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Rotate by `angle` radians and scale by `scale`
    pub fn rotate_scale(&self, angle: f32, scale: f32) -> Vec2 {
        let (s, c) = angle.sin_cos();
        Vec2::new(
            scale * (c * self.x - s * self.y),
            scale * (s * self.x + c * self.y),
        )
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Wrap an angle into `(-PI, PI]`
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// 2D affine transformation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine2D {
    /// Matrix elements [a, b, c, d, tx, ty]
    /// | a  c  tx |
    /// | b  d  ty |
    /// | 0  0   1 |
    pub elements: [f32; 6],
}

impl Default for Affine2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine2D {
    pub const IDENTITY: Affine2D = Affine2D {
        elements: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
    };

    pub fn transform_point(&self, point: Point) -> Point {
        let [a, b, c, d, tx, ty] = self.elements;
        Point::new(
            a * point.x + c * point.y + tx,
            b * point.x + d * point.y + ty,
        )
    }

    /// Concatenate this transform with another (self * other)
    /// The resulting transform first applies `other`, then `self`.
    pub fn then(&self, other: &Affine2D) -> Affine2D {
        let [a1, b1, c1, d1, tx1, ty1] = self.elements;
        let [a2, b2, c2, d2, tx2, ty2] = other.elements;

        Affine2D {
            elements: [
                a1 * a2 + c1 * b2,
                b1 * a2 + d1 * b2,
                a1 * c2 + c1 * d2,
                b1 * c2 + d1 * d2,
                a1 * tx2 + c1 * ty2 + tx1,
                b1 * tx2 + d1 * ty2 + ty1,
            ],
        }
    }
}

/// Similarity transform: uniform scale and rotation about the coordinate
/// origin, followed by a translation
///
/// `p' = scale * R(rotation) * p + translation`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub scale: f32,
    /// Rotation in radians, counter-clockwise in a y-up frame
    pub rotation: f32,
    pub translation: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        scale: 1.0,
        rotation: 0.0,
        translation: Vec2::ZERO,
    };

    /// A transform that scales and rotates around `pivot`, then moves
    /// `pivot` onto `target`
    pub fn about(pivot: Point, target: Point, scale: f32, rotation: f32) -> Self {
        let pivot = pivot - Point::ZERO;
        let moved = pivot.rotate_scale(rotation, scale);
        Self {
            scale,
            rotation,
            translation: (target - Point::ZERO) + Vec2::new(-moved.x, -moved.y),
        }
    }

    pub fn apply(&self, point: Point) -> Point {
        Point::ZERO + (point - Point::ZERO).rotate_scale(self.rotation, self.scale) + self.translation
    }

    /// Compose two transforms: the result applies `self` first, then `next`
    pub fn then(&self, next: &Transform) -> Transform {
        Transform {
            scale: self.scale * next.scale,
            rotation: wrap_angle(self.rotation + next.rotation),
            translation: self.translation.rotate_scale(next.rotation, next.scale) + next.translation,
        }
    }

    pub fn to_affine(&self) -> Affine2D {
        let (s, c) = self.rotation.sin_cos();
        Affine2D {
            elements: [
                self.scale * c,
                self.scale * s,
                -self.scale * s,
                self.scale * c,
                self.translation.x,
                self.translation.y,
            ],
        }
    }

    /// Whether this is the identity within `epsilon`
    pub fn is_identity(&self, epsilon: f32) -> bool {
        (self.scale - 1.0).abs() <= epsilon
            && wrap_angle(self.rotation).abs() <= epsilon
            && self.translation.length() <= epsilon
    }
}
