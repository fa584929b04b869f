#![forbid(unsafe_code)]

//! Geometric primitives in CSS pixel space.

/// One of the two layout axes.
///
/// Ring layouts travel along a primary axis and center cards on the other
/// (cross) axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Axis {
    /// Left to right.
    #[default]
    Horizontal,
    /// Top to bottom.
    Vertical,
}

impl Axis {
    /// The perpendicular axis.
    #[inline]
    #[must_use]
    pub const fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// Stable lowercase name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

/// A point in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Build a point from a primary-axis component and a cross-axis component.
    #[inline]
    #[must_use]
    pub const fn from_axes(axis: Axis, primary: f32, cross: f32) -> Self {
        match axis {
            Axis::Horizontal => Self::new(primary, cross),
            Axis::Vertical => Self::new(cross, primary),
        }
    }

    /// Component along `axis`.
    #[inline]
    #[must_use]
    pub const fn along(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }
}

/// An axis-aligned bounding rectangle, as reported by the host layout engine.
///
/// Coordinates are viewport-relative pixels; width and height are never
/// negative once constructed through [`Rect::new`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle. Negative or non-finite extents collapse to zero.
    #[inline]
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: sanitize_extent(width),
            height: sanitize_extent(height),
        }
    }

    /// Create a rectangle at the origin with the given size.
    #[inline]
    #[must_use]
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Whether the rectangle has zero area.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Leading edge along `axis` (left or top).
    #[inline]
    #[must_use]
    pub fn origin_along(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Extent along `axis` (width or height).
    #[inline]
    #[must_use]
    pub fn extent_along(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Center point.
    #[inline]
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }
}

#[inline]
fn sanitize_extent(v: f32) -> f32 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

/// Linear interpolation between `a` and `b`. `t` is not clamped, so eased
/// progress that overshoots 1.0 overshoots the target too.
#[inline]
#[must_use]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_axis_swaps() {
        assert_eq!(Axis::Horizontal.cross(), Axis::Vertical);
        assert_eq!(Axis::Vertical.cross(), Axis::Horizontal);
    }

    #[test]
    fn point_from_axes_round_trips_components() {
        let p = Point::from_axes(Axis::Vertical, 40.0, 7.0);
        assert_eq!(p, Point::new(7.0, 40.0));
        assert_eq!(p.along(Axis::Vertical), 40.0);
        assert_eq!(p.along(Axis::Horizontal), 7.0);
    }

    #[test]
    fn rect_axis_accessors() {
        let r = Rect::new(10.0, 20.0, 300.0, 120.0);
        assert_eq!(r.origin_along(Axis::Horizontal), 10.0);
        assert_eq!(r.origin_along(Axis::Vertical), 20.0);
        assert_eq!(r.extent_along(Axis::Horizontal), 300.0);
        assert_eq!(r.extent_along(Axis::Vertical), 120.0);
        assert_eq!(r.right(), 310.0);
        assert_eq!(r.bottom(), 140.0);
    }

    #[test]
    fn negative_extent_collapses() {
        let r = Rect::new(0.0, 0.0, -5.0, f32::NAN);
        assert_eq!(r.width, 0.0);
        assert_eq!(r.height, 0.0);
        assert!(r.is_empty());
    }

    #[test]
    fn contains_is_half_open() {
        let r = Rect::from_size(10.0, 10.0);
        assert!(r.contains(Point::new(0.0, 0.0)));
        assert!(!r.contains(Point::new(10.0, 5.0)));
    }

    #[test]
    fn lerp_allows_overshoot() {
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert!((lerp(0.0, 10.0, 1.1) - 11.0).abs() < 1e-5);
    }
}
