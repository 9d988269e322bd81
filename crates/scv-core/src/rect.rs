//! Axis-aligned rectangle algebra.
//!
//! [`Rect`] is a plain value type with floating-point fields. Every
//! transform (scale, move, intersect, union) returns a new rectangle and
//! leaves the receiver untouched.
//!
//! # Coordinate System
//!
//! All coordinates use the standard image convention:
//! - Origin (0, 0) is at the **top-left** corner
//! - X increases to the right
//! - Y increases downward
//!
//! ```text
//! (0,0) ────────► X
//!   │
//!   │   ┌──────────┐
//!   │   │   Rect   │
//!   │   └──────────┘
//!   ▼
//!   Y
//! ```
//!
//! # Usage
//!
//! ```rust
//! use scv_core::Rect;
//!
//! let a = Rect::new(0.0, 0.0, 4.0, 4.0);
//! let b = Rect::new(2.0, 2.0, 4.0, 4.0);
//!
//! assert_eq!(a.intersection(&b), Rect::new(2.0, 2.0, 2.0, 2.0));
//! assert_eq!(a.union(&b), Rect::new(0.0, 0.0, 6.0, 6.0));
//! assert_eq!(a.multiplied_by(0.5), Rect::new(0.0, 0.0, 2.0, 2.0));
//! ```
//!
//! # Used By
//!
//! - `scv-ops` region operations (crop) and drawing
//! - `scv-cli` crop command

use serde::{Deserialize, Serialize};

/// A 2D point, used as the top-left anchor for `set` and as a rotation center.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A rectangle defined by origin (x, y) and dimensions (width, height).
///
/// # Example
///
/// ```rust
/// use scv_core::Rect;
///
/// let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
/// assert_eq!(rect.right(), 110.0);
/// assert_eq!(rect.bottom(), 70.0);
/// assert_eq!(rect.area(), 5000.0);
/// assert!(!rect.is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// X coordinate of the left edge
    pub x: f64,
    /// Y coordinate of the top edge
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Rect {
    /// Creates a new rectangle with the given origin and dimensions.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The zero rectangle `{0, 0, 0, 0}`.
    #[inline]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Right edge, `x + width`.
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge, `y + height`.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// `width * height`.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Returns `true` when the area is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.area() == 0.0
    }

    /// Returns `true` if the point lies inside the half-open rectangle.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Returns the overlapping region of two rectangles.
    ///
    /// Rectangles that do not overlap produce [`Rect::zero`]. Rectangles that
    /// merely touch produce a degenerate rectangle of zero width or height.
    ///
    /// # Example
    ///
    /// ```rust
    /// use scv_core::Rect;
    ///
    /// let a = Rect::new(0.0, 0.0, 1.0, 1.0);
    /// let b = Rect::new(5.0, 5.0, 1.0, 1.0);
    /// assert_eq!(a.intersection(&b), Rect::zero());
    /// ```
    pub fn intersection(&self, other: &Rect) -> Rect {
        if other.x > self.right()
            || other.right() < self.x
            || other.y > self.bottom()
            || other.bottom() < self.y
        {
            return Rect::zero();
        }

        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        Rect::new(
            x,
            y,
            self.right().min(other.right()) - x,
            self.bottom().min(other.bottom()) - y,
        )
    }

    /// Returns the smallest rectangle containing both inputs.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }

    /// Scales all four fields by `factor`.
    #[inline]
    pub fn multiplied_by(&self, factor: f64) -> Rect {
        self.multiplied_by_xy(factor, factor)
    }

    /// Scales `x`/`width` by `x_factor` and `y`/`height` by `y_factor`.
    pub fn multiplied_by_xy(&self, x_factor: f64, y_factor: f64) -> Rect {
        Rect::new(
            self.x * x_factor,
            self.y * y_factor,
            self.width * x_factor,
            self.height * y_factor,
        )
    }

    /// Scales width and height by `factor`, keeping the origin.
    #[inline]
    pub fn scaled_by(&self, factor: f64) -> Rect {
        self.scaled_by_xy(factor, factor)
    }

    /// Scales width by `x_factor` and height by `y_factor`, keeping the origin.
    pub fn scaled_by_xy(&self, x_factor: f64, y_factor: f64) -> Rect {
        Rect::new(self.x, self.y, self.width * x_factor, self.height * y_factor)
    }

    /// Translates the origin by `(dx, dy)`.
    pub fn moved_by(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Applies `f` to each of the four fields.
    ///
    /// ```rust
    /// use scv_core::Rect;
    ///
    /// let r = Rect::new(0.4, 1.6, 2.5, 3.5).map_values(f64::round);
    /// assert_eq!(r, Rect::new(0.0, 2.0, 3.0, 4.0));
    /// ```
    pub fn map_values(&self, f: impl Fn(f64) -> f64) -> Rect {
        Rect::new(f(self.x), f(self.y), f(self.width), f(self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_rect_eq(actual: Rect, expected: Rect) {
        assert_abs_diff_eq!(actual.x, expected.x, epsilon = 1e-12);
        assert_abs_diff_eq!(actual.y, expected.y, epsilon = 1e-12);
        assert_abs_diff_eq!(actual.width, expected.width, epsilon = 1e-12);
        assert_abs_diff_eq!(actual.height, expected.height, epsilon = 1e-12);
    }

    #[test]
    fn test_derived_fields() {
        let r = Rect::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(r.right(), 4.0);
        assert_eq!(r.bottom(), 6.0);
        assert_eq!(r.area(), 12.0);
        assert!(!r.is_empty());
        assert!(Rect::new(1.0, 1.0, 0.0, 5.0).is_empty());
    }

    #[test]
    fn test_intersection() {
        let a = Rect::new(0.2, 0.3, 1.0, 1.0);
        let b = Rect::new(0.5, 0.4, 1.0, 1.0);
        assert_rect_eq(a.intersection(&b), Rect::new(0.5, 0.4, 0.7, 0.9));
        assert_rect_eq(b.intersection(&a), Rect::new(0.5, 0.4, 0.7, 0.9));
    }

    #[test]
    fn test_intersection_contained() {
        let outer = Rect::new(0.0, 0.0, 10.0, 10.0);
        let inner = Rect::new(2.0, 3.0, 4.0, 5.0);
        assert_eq!(outer.intersection(&inner), inner);
    }

    #[test]
    fn test_intersection_disjoint() {
        let a = Rect::new(0.0, 0.0, 1.0, 1.0);
        let b = Rect::new(1.5, 0.0, 1.0, 1.0);
        assert_eq!(a.intersection(&b), Rect::zero());
        let c = Rect::new(0.0, -3.0, 1.0, 1.0);
        assert_eq!(a.intersection(&c), Rect::zero());
    }

    #[test]
    fn test_union() {
        let a = Rect::new(-0.1, 0.1, 1.0, 1.0);
        let b = Rect::new(0.5, 0.5, 1.0, 1.0);
        assert_rect_eq(a.union(&b), Rect::new(-0.1, 0.1, 1.6, 1.4));
    }

    #[test]
    fn test_multiplied_by() {
        let r = Rect::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(r.multiplied_by(2.0), Rect::new(2.0, 4.0, 6.0, 8.0));
        assert_eq!(r.multiplied_by_xy(2.0, 0.5), Rect::new(2.0, 1.0, 6.0, 2.0));
    }

    #[test]
    fn test_scaled_by() {
        let r = Rect::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(r.scaled_by(2.0), Rect::new(1.0, 2.0, 6.0, 8.0));
        assert_eq!(r.scaled_by_xy(1.0, 3.0), Rect::new(1.0, 2.0, 3.0, 12.0));
    }

    #[test]
    fn test_moved_by_is_pure() {
        let r = Rect::new(1.0, 2.0, 3.0, 4.0);
        let moved = r.moved_by(-1.0, 5.0);
        assert_eq!(moved, Rect::new(0.0, 7.0, 3.0, 4.0));
        assert_eq!(r, Rect::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn test_contains() {
        let r = Rect::new(0.0, 0.0, 2.0, 2.0);
        assert!(r.contains(Point::new(0.0, 1.9)));
        assert!(!r.contains(Point::new(2.0, 0.0)));
    }

    #[test]
    fn test_serde() {
        let r: Rect = serde_json::from_str(r#"{"x":1,"y":2,"width":3,"height":4}"#).unwrap();
        assert_eq!(r, Rect::new(1.0, 2.0, 3.0, 4.0));
    }
}
