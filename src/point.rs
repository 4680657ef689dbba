use std::ops::{ Add, Sub, Neg, Mul };

use serde::{ Serialize, Deserialize };

use crate::feq;
use crate::consts::SNAP_EPSILON;

/// A point (or vector) on the screen plane.
///
/// Screen space grows right along X and down along Y, so a positive rotation
/// turns clockwise on screen.
#[derive(Debug, Default, Copy, Clone, PartialOrd, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl PartialEq for Point2D {
    fn eq(&self, other: &Point2D) -> bool {
        feq(self.x, other.x) && feq(self.y, other.y)
    }
}

impl From<(f64, f64)> for Point2D {
    fn from(xy: (f64, f64)) -> Point2D {
        Point2D { x: xy.0, y: xy.1 }
    }
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Point2D {
        Point2D { x, y }
    }

    pub fn zero() -> Point2D {
        Point2D { x: 0.0, y: 0.0 }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn magnitude(&self) -> f64 {
        f64::sqrt(self.x.powi(2) + self.y.powi(2))
    }

    /// Normalizes a vector to unit length.
    ///
    /// A zero vector has no direction; `None` is returned for it (and for
    /// non-finite vectors).
    pub fn normalize(&self) -> Option<Point2D> {
        let mag = self.magnitude();
        if mag == 0.0 || !mag.is_finite() {
            return None;
        }

        Some(Point2D {
            x: self.x * (1.0 / mag),
            y: self.y * (1.0 / mag),
        })
    }

    pub fn dot(&self, other: &Point2D) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// The Z component of the 3D cross product of two planar vectors.
    pub fn cross(&self, other: &Point2D) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn distance_squared(&self, other: &Point2D) -> f64 {
        (self.x - other.x).powi(2) + (self.y - other.y).powi(2)
    }

    /// Rotates a vector by `degrees` around the origin.
    pub fn rotate(&self, degrees: f64) -> Point2D {
        let (sin, cos) = degrees.to_radians().sin_cos();

        Point2D {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    /// The bearing from this point to `other`, in degrees within [0, 360).
    pub fn bearing_to(&self, other: &Point2D) -> f64 {
        let angle = (other.y - self.y).atan2(other.x - self.x).to_degrees();
        if angle < 0.0 {
            angle + 360.0
        } else {
            angle
        }
    }

    /// Snaps each coordinate with a magnitude below the snap threshold to
    /// exactly zero.
    pub fn snap(&self) -> Point2D {
        let snap = |c: f64| if c.abs() < SNAP_EPSILON { 0.0 } else { c };
        Point2D { x: snap(self.x), y: snap(self.y) }
    }
}

impl Add for Point2D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Sub for Point2D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl Neg for Point2D {
    type Output = Self;

    fn neg(self) -> Self {
        Self { x: -self.x, y: -self.y }
    }
}

/// Implements scalar right-multiplication for a point.
///
/// ```
/// use portal_cone::point::Point2D;
///
/// let p = Point2D::new(1.0, -2.0);
/// assert_eq!(p * 3.0, Point2D::new(3.0, -6.0));
/// ```
impl Mul<f64> for Point2D {
    type Output = Self;

    fn mul(self, other: f64) -> Self {
        Self {
            x: self.x * other,
            y: self.y * other,
        }
    }
}

impl Mul<Point2D> for f64 {
    type Output = Point2D;

    fn mul(self, other: Point2D) -> Point2D {
        Point2D {
            x: self * other.x,
            y: self * other.y,
        }
    }
}

/* Tests */

#[test]
fn add_points() {
    let a = Point2D::new(3.0, -2.0);
    let b = Point2D::new(-2.0, 3.0);

    assert_eq!(a + b, Point2D::new(1.0, 1.0));
}

#[test]
fn sub_points() {
    let a = Point2D::new(3.0, 2.0);
    let b = Point2D::new(5.0, 6.0);

    assert_eq!(a - b, Point2D::new(-2.0, -4.0));
}

#[test]
fn scale_both_sides() {
    let p = Point2D::new(1.0, -2.0);

    assert_eq!(p * 0.5, Point2D::new(0.5, -1.0));
    assert_eq!(2.0 * p, Point2D::new(2.0, -4.0));
    assert_eq!(-p, Point2D::new(-1.0, 2.0));
}

#[test]
fn normalize_clean() {
    let v = Point2D::new(4.0, 0.0);

    assert_eq!(v.normalize(), Some(Point2D::new(1.0, 0.0)));
}

#[test]
fn normalize_dirty() {
    let v = Point2D::new(3.0, 4.0);

    assert_eq!(v.normalize(), Some(Point2D::new(0.6, 0.8)));
}

#[test]
fn normalize_zero_has_no_direction() {
    assert_eq!(Point2D::zero().normalize(), None);
    assert_eq!(Point2D::new(f64::NAN, 1.0).normalize(), None);
}

#[test]
fn cross_is_signed_area() {
    let a = Point2D::new(1.0, 0.0);
    let b = Point2D::new(0.0, 1.0);

    assert_eq!(a.cross(&b), 1.0);
    assert_eq!(b.cross(&a), -1.0);
    assert_eq!(a.dot(&b), 0.0);
}

#[test]
fn rotate_quarter_turn() {
    let v = Point2D::new(10.0, 0.0);

    assert_eq!(v.rotate(90.0), Point2D::new(0.0, 10.0));
    assert_eq!(v.rotate(180.0), Point2D::new(-10.0, 0.0));
}

#[test]
fn bearing_is_in_degrees() {
    let o = Point2D::zero();

    assert!(feq(o.bearing_to(&Point2D::new(1.0, 0.0)), 0.0));
    assert!(feq(o.bearing_to(&Point2D::new(0.0, 1.0)), 90.0));
    assert!(feq(o.bearing_to(&Point2D::new(0.0, -1.0)), 270.0));
}

#[test]
fn snap_only_touches_tiny_coordinates() {
    let p = Point2D { x: 0.004, y: -0.009 }.snap();
    assert_eq!(p.x, 0.0);
    assert_eq!(p.y, 0.0);

    let q = Point2D { x: 0.02, y: 768.0 }.snap();
    assert_eq!(q.x, 0.02);
    assert_eq!(q.y, 768.0);
}

#[test]
fn squared_distance() {
    let a = Point2D::new(1.0, 1.0);
    let b = Point2D::new(4.0, 5.0);

    assert_eq!(a.distance_squared(&b), 25.0);
}
