use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use nalgebra::Vector2;
use vello::kurbo::{self, Affine};

/// A 2D vector or position in pixels. Y grows downwards.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl Point {
    /// `(0, 0)`.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Exchange the axes.
    ///
    /// Controls that exist in a horizontal and a vertical flavour are written
    /// once and swap their inputs and outputs.
    pub const fn swap(self) -> Self {
        Self {
            x: self.y,
            y: self.x,
        }
    }

    /// Euclidean length.
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Rotate about the origin.
    pub fn rotate(self, rotation: Rotation) -> Self {
        match rotation {
            Rotation::None => self,
            Rotation::Clockwise => Self::new(-self.y, self.x),
            Rotation::Half => Self::new(-self.x, -self.y),
            Rotation::CounterClockwise => Self::new(self.y, -self.x),
        }
    }

    /// Rotate about `pivot`.
    pub fn rotate_about(self, pivot: Point, rotation: Rotation) -> Self {
        (self - pivot).rotate(rotation) + pivot
    }

    /// Component-wise minimum.
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y))
    }

    /// Component-wise maximum.
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<Vector2<f64>> for Point {
    fn from(v: Vector2<f64>) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Point> for Vector2<f64> {
    fn from(p: Point) -> Self {
        Vector2::new(p.x, p.y)
    }
}

impl From<kurbo::Point> for Point {
    fn from(p: kurbo::Point) -> Self {
        Self::new(p.x, p.y)
    }
}

impl From<Point> for kurbo::Point {
    fn from(p: Point) -> Self {
        kurbo::Point::new(p.x, p.y)
    }
}

impl From<Point> for kurbo::Vec2 {
    fn from(p: Point) -> Self {
        kurbo::Vec2::new(p.x, p.y)
    }
}

impl From<Point> for kurbo::Size {
    fn from(p: Point) -> Self {
        kurbo::Size::new(p.x, p.y)
    }
}

/// A quarter-turn rotation, clockwise on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Rotation {
    /// 0 degrees.
    #[default]
    None,
    /// 90 degrees clockwise.
    Clockwise,
    /// 180 degrees.
    Half,
    /// 270 degrees clockwise, i.e. 90 degrees counter-clockwise.
    CounterClockwise,
}

impl Rotation {
    /// Build from a count of clockwise quarter turns (any integer).
    pub fn from_quarter_turns(turns: i32) -> Self {
        match turns.rem_euclid(4) {
            0 => Self::None,
            1 => Self::Clockwise,
            2 => Self::Half,
            _ => Self::CounterClockwise,
        }
    }

    /// Clockwise quarter turns in `0..4`.
    pub fn quarter_turns(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Clockwise => 1,
            Self::Half => 2,
            Self::CounterClockwise => 3,
        }
    }

    /// The rotation that undoes this one.
    pub fn inverse(self) -> Self {
        Self::from_quarter_turns(-self.quarter_turns())
    }

    /// This rotation followed by `other`.
    pub fn then(self, other: Self) -> Self {
        Self::from_quarter_turns(self.quarter_turns() + other.quarter_turns())
    }

    /// Whether width and height trade places.
    pub fn swaps_axes(self) -> bool {
        self.quarter_turns() % 2 == 1
    }

    /// The rotation about `pivot` as an exact affine transform.
    pub fn affine_about(self, pivot: Point) -> Affine {
        let (cos, sin) = match self {
            Self::None => (1.0, 0.0),
            Self::Clockwise => (0.0, 1.0),
            Self::Half => (-1.0, 0.0),
            Self::CounterClockwise => (0.0, -1.0),
        };
        let moved = pivot - pivot.rotate(self);
        Affine::new([cos, sin, -sin, cos, moved.x, moved.y])
    }
}

/// An axis-aligned rectangle.
///
/// A well formed rectangle has a non-negative size. Operations that could
/// produce a negative size ([Rectangle::rotate_about]) normalize the result.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rectangle {
    /// Top-left corner.
    pub location: Point,
    /// Width and height.
    pub size: Point,
}

impl Rectangle {
    /// Create a new rectangle.
    pub const fn new(location: Point, size: Point) -> Self {
        Self { location, size }
    }

    /// Create a rectangle from raw components.
    pub const fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(Point::new(x, y), Point::new(width, height))
    }

    /// A rectangle at the origin.
    pub const fn from_size(size: Point) -> Self {
        Self::new(Point::ZERO, size)
    }

    /// The rectangle spanned by two opposite corners, in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let min = a.min(b);
        Self::new(min, a.max(b) - min)
    }

    /// Left edge.
    pub fn left(&self) -> f64 {
        self.location.x
    }

    /// Top edge.
    pub fn top(&self) -> f64 {
        self.location.y
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.location.x + self.size.x
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.location.y + self.size.y
    }

    /// Bottom-right corner.
    pub fn end(&self) -> Point {
        self.location + self.size
    }

    /// Centre point.
    pub fn center(&self) -> Point {
        self.location + self.size * 0.5
    }

    /// Whether the rectangle covers no area.
    pub fn is_empty(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Point containment. Left and top edges are inside, right and bottom are not.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.y >= self.top()
            && point.x < self.right()
            && point.y < self.bottom()
    }

    /// The overlapping area. Disjoint rectangles give a zero-sized result.
    pub fn intersect(&self, other: &Rectangle) -> Rectangle {
        let location = self.location.max(other.location);
        let end = self.end().min(other.end());
        Rectangle::new(location, (end - location).max(Point::ZERO))
    }

    /// Grow outwards by `amount` on every side.
    pub fn margin(&self, amount: f64) -> Rectangle {
        Rectangle::new(
            self.location - Point::new(amount, amount),
            self.size + Point::new(amount * 2.0, amount * 2.0),
        )
        .clamped()
    }

    /// Shrink inwards by `amount` on every side. Never yields a negative size.
    pub fn pad(&self, amount: f64) -> Rectangle {
        self.margin(-amount)
    }

    /// Move by `offset`.
    pub fn translate(&self, offset: Point) -> Rectangle {
        Rectangle::new(self.location + offset, self.size)
    }

    /// Rotate about `pivot` and normalize, so the size stays non-negative.
    pub fn rotate_about(&self, pivot: Point, rotation: Rotation) -> Rectangle {
        let a = self.location.rotate_about(pivot, rotation);
        let b = self.end().rotate_about(pivot, rotation);
        Rectangle::from_corners(a, b)
    }

    /// Move the origin so that negative extents become positive.
    pub fn normalized(&self) -> Rectangle {
        Rectangle::from_corners(self.location, self.end())
    }

    /// Clamp a negative size to zero, keeping the location.
    pub fn clamped(&self) -> Rectangle {
        Rectangle::new(self.location, self.size.max(Point::ZERO))
    }
}

impl From<Rectangle> for kurbo::Rect {
    fn from(r: Rectangle) -> Self {
        kurbo::Rect::new(r.left(), r.top(), r.right(), r.bottom())
    }
}

impl From<kurbo::Rect> for Rectangle {
    fn from(r: kurbo::Rect) -> Self {
        Rectangle::from_corners(Point::new(r.x0, r.y0), Point::new(r.x1, r.y1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Rotation; 4] = [
        Rotation::None,
        Rotation::Clockwise,
        Rotation::Half,
        Rotation::CounterClockwise,
    ];

    #[test]
    fn clockwise_is_screen_clockwise() {
        // right becomes down on a Y-down screen
        assert_eq!(Point::new(1.0, 0.0).rotate(Rotation::Clockwise), Point::new(0.0, 1.0));
        assert_eq!(Point::new(0.0, 1.0).rotate(Rotation::Clockwise), Point::new(-1.0, 0.0));
    }

    #[test]
    fn rotation_round_trip_restores_rectangle() {
        let rect = Rectangle::from_xywh(3.0, -7.5, 20.0, 4.25);
        let pivot = Point::new(11.0, 2.0);
        for rotation in ALL {
            let rotated = rect.rotate_about(pivot, rotation);
            assert!(rotated.size.x >= 0.0 && rotated.size.y >= 0.0);
            assert_eq!(rotated.rotate_about(pivot, rotation.inverse()), rect);
        }
    }

    #[test]
    fn quarter_turn_swaps_size() {
        let rect = Rectangle::from_xywh(0.0, 0.0, 10.0, 4.0);
        let rotated = rect.rotate_about(Point::ZERO, Rotation::Clockwise);
        assert_eq!(rotated, Rectangle::from_xywh(-4.0, 0.0, 4.0, 10.0));
    }

    #[test]
    fn affine_matches_point_rotation() {
        let pivot = Point::new(5.0, -3.0);
        let p = Point::new(2.0, 9.0);
        for rotation in ALL {
            let mapped: Point = (rotation.affine_about(pivot) * kurbo::Point::from(p)).into();
            assert_eq!(mapped, p.rotate_about(pivot, rotation));
        }
    }

    #[test]
    fn composition_and_inverse() {
        assert_eq!(Rotation::Clockwise.then(Rotation::Half), Rotation::CounterClockwise);
        assert_eq!(Rotation::CounterClockwise.inverse(), Rotation::Clockwise);
        assert_eq!(Rotation::from_quarter_turns(-5), Rotation::CounterClockwise);
    }

    #[test]
    fn containment_is_half_open() {
        let rect = Rectangle::from_xywh(10.0, 10.0, 5.0, 5.0);
        assert!(rect.contains(Point::new(10.0, 10.0)));
        assert!(rect.contains(Point::new(14.999, 14.999)));
        assert!(!rect.contains(Point::new(15.0, 12.0)));
        assert!(!rect.contains(Point::new(12.0, 15.0)));
    }

    #[test]
    fn intersection_and_disjoint() {
        let a = Rectangle::from_xywh(0.0, 0.0, 10.0, 10.0);
        let b = Rectangle::from_xywh(5.0, 6.0, 10.0, 10.0);
        assert_eq!(a.intersect(&b), Rectangle::from_xywh(5.0, 6.0, 5.0, 4.0));

        let far = Rectangle::from_xywh(50.0, 50.0, 1.0, 1.0);
        assert!(a.intersect(&far).is_empty());
    }

    #[test]
    fn pad_never_goes_negative() {
        let rect = Rectangle::from_xywh(0.0, 0.0, 4.0, 10.0);
        let padded = rect.pad(3.0);
        assert_eq!(padded.location, Point::new(3.0, 3.0));
        assert_eq!(padded.size, Point::new(0.0, 4.0));
        assert_eq!(rect.margin(1.0), Rectangle::from_xywh(-1.0, -1.0, 6.0, 12.0));
    }

    #[test]
    fn swap_and_length() {
        assert_eq!(Point::new(1.0, 2.0).swap(), Point::new(2.0, 1.0));
        assert_eq!(Point::new(3.0, 4.0).length(), 5.0);
    }
}
