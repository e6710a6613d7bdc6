//! Geometry kernel: axis-aligned bounding boxes in page space.
//!
//! Coordinates use a top-left origin with `y` growing downward, the layout
//! every decoder in front of the segmenter is expected to produce.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An axis-aligned rectangle `(x, y, width, height)`.
///
/// The fields are public so data coming from an external decoder can be
/// represented as-is; every processing step calls [`Bounds::validate`]
/// before trusting a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// X coordinate of the left edge
    pub x: f64,
    /// Y coordinate of the top edge
    pub y: f64,
    /// Width of the rectangle
    pub width: f64,
    /// Height of the rectangle
    pub height: f64,
}

impl Bounds {
    /// Create bounds without validation.
    ///
    /// # Examples
    ///
    /// ```
    /// use docstrum::Bounds;
    ///
    /// let b = Bounds::new(10.0, 20.0, 30.0, 40.0);
    /// assert_eq!(b.right(), 40.0);
    /// assert_eq!(b.bottom(), 60.0);
    /// ```
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create bounds, rejecting non-finite components and negative extent.
    pub fn try_new(x: f64, y: f64, width: f64, height: f64) -> Result<Self> {
        let bounds = Self::new(x, y, width, height);
        bounds.validate()?;
        Ok(bounds)
    }

    /// Get the left edge x-coordinate.
    pub fn left(&self) -> f64 {
        self.x
    }

    /// Get the right edge x-coordinate.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Get the top edge y-coordinate.
    pub fn top(&self) -> f64 {
        self.y
    }

    /// Get the bottom edge y-coordinate.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center point as `(x, y)`.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check that every component is finite and the extent is non-negative.
    pub fn validate(&self) -> Result<()> {
        let components = [
            ("x", self.x),
            ("y", self.y),
            ("width", self.width),
            ("height", self.height),
        ];
        for (name, value) in components {
            if !value.is_finite() {
                return Err(Error::InvalidGeometry(format!(
                    "{} must be finite, got {}",
                    name, value
                )));
            }
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "extent must be non-negative, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Smallest bounds containing both `self` and `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use docstrum::Bounds;
    ///
    /// let a = Bounds::new(0.0, 0.0, 50.0, 50.0);
    /// let b = Bounds::new(25.0, 25.0, 50.0, 50.0);
    /// let u = a.expand(&b);
    /// assert_eq!(u, Bounds::new(0.0, 0.0, 75.0, 75.0));
    /// ```
    pub fn expand(&self, other: &Bounds) -> Bounds {
        let x0 = self.left().min(other.left());
        let y0 = self.top().min(other.top());
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        Bounds::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// True iff `small` lies entirely within this rectangle (edges included).
    pub fn contains(&self, small: &Bounds) -> bool {
        self.contains_with_tolerance(small, 0.0)
    }

    /// Like [`Bounds::contains`], with every edge of `self` pushed outward by `tolerance`.
    pub fn contains_with_tolerance(&self, small: &Bounds, tolerance: f64) -> bool {
        self.left() - tolerance <= small.left()
            && self.top() - tolerance <= small.top()
            && self.right() + tolerance >= small.right()
            && self.bottom() + tolerance >= small.bottom()
    }

    /// Euclidean distance between the rectangle centers.
    pub fn distance(&self, other: &Bounds) -> f64 {
        let (ax, ay) = self.center();
        let (bx, by) = other.center();
        ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
    }

    /// Horizontal gap to `other`; negative when the x-projections overlap.
    pub fn horizontal_gap(&self, other: &Bounds) -> f64 {
        (self.left().max(other.left())) - (self.right().min(other.right()))
    }

    /// Vertical gap to `other`; negative when the y-projections overlap.
    pub fn vertical_gap(&self, other: &Bounds) -> f64 {
        (self.top().max(other.top())) - (self.bottom().min(other.bottom()))
    }
}

/// Incrementally accumulates the union of several bounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundsBuilder {
    bounds: Option<Bounds>,
}

impl BoundsBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grow the accumulated union by `bounds`.
    pub fn expand(&mut self, bounds: &Bounds) -> &mut Self {
        self.bounds = Some(match self.bounds {
            Some(current) => current.expand(bounds),
            None => *bounds,
        });
        self
    }

    /// Grow by `bounds` if present.
    pub fn expand_opt(&mut self, bounds: Option<&Bounds>) -> &mut Self {
        if let Some(bounds) = bounds {
            self.expand(bounds);
        }
        self
    }

    /// The union so far, or `None` if nothing was added.
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }
}

impl<'a> FromIterator<&'a Bounds> for BoundsBuilder {
    fn from_iter<I: IntoIterator<Item = &'a Bounds>>(iter: I) -> Self {
        let mut builder = BoundsBuilder::new();
        for bounds in iter {
            builder.expand(bounds);
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_non_finite() {
        assert!(Bounds::new(f64::NAN, 0.0, 0.0, 0.0).validate().is_err());
        assert!(Bounds::new(0.0, f64::NAN, 0.0, 0.0).validate().is_err());
        assert!(Bounds::new(0.0, 0.0, f64::INFINITY, 0.0).validate().is_err());
        assert!(Bounds::new(0.0, 0.0, 0.0, f64::NEG_INFINITY)
            .validate()
            .is_err());
        assert!(Bounds::new(0.0, 0.0, 0.0, 0.0).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_extent() {
        let err = Bounds::try_new(0.0, 0.0, -1.0, 5.0).unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry(_)));
    }

    #[test]
    fn test_contains() {
        let big = Bounds::new(0.0, 0.0, 100.0, 100.0);
        assert!(big.contains(&Bounds::new(10.0, 10.0, 20.0, 20.0)));
        assert!(big.contains(&big));
        assert!(!big.contains(&Bounds::new(90.0, 90.0, 20.0, 20.0)));
        assert!(big.contains_with_tolerance(&Bounds::new(90.0, 90.0, 11.0, 11.0), 1.0));
    }

    #[test]
    fn test_distance_between_centers() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(30.0, 40.0, 10.0, 10.0);
        assert!((a.distance(&b) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_gaps() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(15.0, 5.0, 10.0, 10.0);
        assert_eq!(a.horizontal_gap(&b), 5.0);
        assert_eq!(a.vertical_gap(&b), -5.0);
    }

    #[test]
    fn test_builder() {
        let mut builder = BoundsBuilder::new();
        assert!(builder.bounds().is_none());
        builder
            .expand(&Bounds::new(10.0, 10.0, 5.0, 5.0))
            .expand(&Bounds::new(0.0, 20.0, 5.0, 5.0));
        assert_eq!(builder.bounds(), Some(Bounds::new(0.0, 10.0, 15.0, 15.0)));
    }
}
