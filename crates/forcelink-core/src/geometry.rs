//! Geometric primitives shared by hosts and simulations.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in layout space
//! - [`Bounds`] - An axis-aligned bounding box, used for viewport fitting
//!
//! # Coordinate System
//!
//! Layout space follows screen conventions:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! Simulations are free to produce negative coordinates; hosts fit the
//! viewport to whatever [`Bounds`] the positioned nodes occupy.

/// A 2D point in layout coordinate space.
///
/// # Examples
///
/// ```
/// # use forcelink_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Returns `true` when neither coordinate is NaN or infinite.
    ///
    /// Engines occasionally blow up numerically; hosts should not be handed
    /// such coordinates.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned rectangle defined by its minimum and maximum corners
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a zero-sized bounds at `point`
    pub fn from_point(point: Point) -> Self {
        Self {
            min_x: point.x,
            min_y: point.y,
            max_x: point.x,
            max_y: point.y,
        }
    }

    /// Smallest bounds containing every point, or `None` for an empty iterator.
    ///
    /// # Examples
    ///
    /// ```
    /// # use forcelink_core::geometry::{Bounds, Point};
    /// let bounds = Bounds::from_points([
    ///     Point::new(-10.0, 5.0),
    ///     Point::new(30.0, -5.0),
    /// ])
    /// .unwrap();
    ///
    /// assert_eq!(bounds.min_x(), -10.0);
    /// assert_eq!(bounds.max_y(), 5.0);
    /// assert!(Bounds::from_points([]).is_none());
    /// ```
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        points
            .into_iter()
            .map(Self::from_point)
            .reduce(|acc, bounds| acc.merge(&bounds))
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Merges two bounds into the smallest bounds containing both
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Grows the bounds by `padding` on every side
    pub fn add_padding(&self, padding: f32) -> Self {
        Self {
            min_x: self.min_x - padding,
            min_y: self.min_y - padding,
            max_x: self.max_x + padding,
            max_y: self.max_y + padding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_add() {
        let p = Point::new(3.0, 4.0);

        assert_eq!(p.add_point(Point::new(1.0, -1.0)), Point::new(4.0, 3.0));
        assert_eq!(p.add_point(Point::default()), p);
    }

    #[test]
    fn test_point_is_finite() {
        assert!(Point::new(1.0, -1.0).is_finite());
        assert!(!Point::new(f32::NAN, 0.0).is_finite());
        assert!(!Point::new(0.0, f32::INFINITY).is_finite());
    }

    #[test]
    fn test_bounds_single_point() {
        let bounds = Bounds::from_points([Point::new(7.0, 8.0)]).unwrap();

        assert_eq!(bounds, Bounds::from_point(Point::new(7.0, 8.0)));
        assert_eq!((bounds.min_x(), bounds.max_x()), (7.0, 7.0));
        assert_eq!((bounds.min_y(), bounds.max_y()), (8.0, 8.0));
    }

    #[test]
    fn test_bounds_padding() {
        let bounds = Bounds::from_points([Point::new(0.0, 0.0), Point::new(10.0, 20.0)])
            .unwrap()
            .add_padding(5.0);

        assert_eq!(bounds.min_x(), -5.0);
        assert_eq!(bounds.min_y(), -5.0);
        assert_eq!(bounds.max_x(), 15.0);
        assert_eq!(bounds.max_y(), 25.0);
    }
}

#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f32..1000.0, -1000.0f32..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    /// Bounds built from a set of points must contain each of them.
    fn check_bounds_contain_points(points: Vec<Point>) -> Result<(), TestCaseError> {
        let bounds = Bounds::from_points(points.iter().copied()).expect("non-empty points");
        for point in points {
            prop_assert!(bounds.min_x() <= point.x() && point.x() <= bounds.max_x());
            prop_assert!(bounds.min_y() <= point.y() && point.y() <= bounds.max_y());
        }
        Ok(())
    }

    /// Padding moves every side outwards by exactly the padding.
    fn check_padding_grows_each_side(
        points: Vec<Point>,
        padding: f32,
    ) -> Result<(), TestCaseError> {
        let bounds = Bounds::from_points(points).expect("non-empty points");
        let padded = bounds.add_padding(padding);

        prop_assert!(approx_eq!(f32, bounds.min_x() - padded.min_x(), padding, epsilon = 1e-3));
        prop_assert!(approx_eq!(f32, padded.max_x() - bounds.max_x(), padding, epsilon = 1e-3));
        prop_assert!(approx_eq!(f32, bounds.min_y() - padded.min_y(), padding, epsilon = 1e-3));
        prop_assert!(approx_eq!(f32, padded.max_y() - bounds.max_y(), padding, epsilon = 1e-3));
        Ok(())
    }

    proptest! {
        #[test]
        fn bounds_contain_points(points in prop::collection::vec(point_strategy(), 1..32)) {
            check_bounds_contain_points(points)?;
        }

        #[test]
        fn padding_grows_each_side(
            points in prop::collection::vec(point_strategy(), 1..16),
            padding in 0.0f32..100.0,
        ) {
            check_padding_grows_each_side(points, padding)?;
        }
    }
}
