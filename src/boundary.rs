use serde::{ Serialize, Deserialize };

use crate::consts::{ AXIS_EPSILON, EXTENSION_SCALE, SEGMENT_EPSILON,
    SCREEN_WIDTH, SCREEN_HEIGHT };
use crate::error::PortalError;
use crate::point::Point2D;
use crate::ray::Ray2D;

/// One of the four edges of a `Boundary`.
///
/// The declaration order is also the order edges are tested in when a ray
/// crosses a corner; the first edge wins.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    /// The side across the rectangle from this one.
    pub fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
        }
    }

    /// Whether two sides share a corner.
    pub fn is_adjacent(self, other: Side) -> bool {
        self != other && self.opposite() != other
    }
}

/// One of the four corners of a `Boundary`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

/// Where a ray leaves the boundary.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Exit {
    pub side: Side,
    pub point: Point2D,
}

/// An axis-aligned screen rectangle spanning `(0, 0)` to `(width, height)`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    pub width: f64,
    pub height: f64,
}

impl Default for Boundary {
    fn default() -> Boundary {
        Boundary { width: SCREEN_WIDTH, height: SCREEN_HEIGHT }
    }
}

impl Boundary {
    pub fn new(width: f64, height: f64) -> Boundary {
        Boundary { width, height }
    }

    /// A boundary with a positive, finite width and height.
    pub fn checked(width: f64, height: f64) -> Result<Boundary, PortalError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if valid(width) && valid(height) {
            Ok(Boundary { width, height })
        } else {
            Err(PortalError::InvalidBoundary { width, height })
        }
    }

    pub fn corner(&self, corner: Corner) -> Point2D {
        match corner {
            Corner::TopLeft => Point2D::new(0.0, 0.0),
            Corner::TopRight => Point2D::new(self.width, 0.0),
            Corner::BottomRight => Point2D::new(self.width, self.height),
            Corner::BottomLeft => Point2D::new(0.0, self.height),
        }
    }

    /// The two end points of an edge of the rectangle.
    pub fn edge(&self, side: Side) -> (Point2D, Point2D) {
        match side {
            Side::Top =>
                (self.corner(Corner::TopLeft), self.corner(Corner::TopRight)),
            Side::Right =>
                (self.corner(Corner::TopRight), self.corner(Corner::BottomRight)),
            Side::Bottom =>
                (self.corner(Corner::BottomLeft), self.corner(Corner::BottomRight)),
            Side::Left =>
                (self.corner(Corner::TopLeft), self.corner(Corner::BottomLeft)),
        }
    }

    /// Whether a point lies strictly inside the rectangle.
    pub fn contains(&self, p: Point2D) -> bool {
        p.x > 0.0 && p.x < self.width && p.y > 0.0 && p.y < self.height
    }

    /// A length that takes a unit ray from `origin` past every point of the
    /// rectangle.
    ///
    /// No point of the rectangle is farther from `origin` than
    /// `|x| + |y| + width + height`.
    pub fn reach(&self, origin: Point2D) -> f64 {
        let span = origin.x.abs() + origin.y.abs() + self.width + self.height;
        EXTENSION_SCALE.max(2.0 * span)
    }

    /// Finds which edge a ray leaves the rectangle through, and where.
    ///
    /// The direction does not need to be normalized. Directions which are
    /// (nearly) parallel to an axis are resolved directly from the origin's
    /// coordinates. Any other ray is normalized, extended past the far side
    /// of the rectangle (see `reach`) and tested against each edge in
    /// `Side::ALL` order; the first hit wins, so a ray through a corner
    /// resolves to the earlier edge.
    pub fn find_exit(&self, ray: Ray2D) -> Result<Exit, PortalError> {
        let Ray2D { origin, direction } = ray;

        if !direction.is_finite() || (direction.x == 0.0 && direction.y == 0.0) {
            return Err(PortalError::DegenerateRay { origin });
        }

        // Vertical rays
        if direction.x.abs() < AXIS_EPSILON {
            if direction.y < 0.0 {
                return Ok(Exit {
                    side: Side::Top,
                    point: Point2D::new(origin.x, 0.0),
                });
            } else if direction.y > 0.0 {
                return Ok(Exit {
                    side: Side::Bottom,
                    point: Point2D::new(origin.x, self.height),
                });
            }
        }

        // Horizontal rays
        if direction.y.abs() < AXIS_EPSILON {
            if direction.x < 0.0 {
                return Ok(Exit {
                    side: Side::Left,
                    point: Point2D::new(0.0, origin.y),
                });
            } else if direction.x > 0.0 {
                return Ok(Exit {
                    side: Side::Right,
                    point: Point2D::new(self.width, origin.y),
                });
            }
        }

        let unit = match direction.normalize() {
            Some(unit) => unit,
            None => return Err(PortalError::DegenerateRay { origin }),
        };
        let end = Ray2D::new(origin, unit).extended(self.reach(origin));
        for side in Side::ALL.iter() {
            let (start, stop) = self.edge(*side);
            if let Some(point) = segment_intersection(origin, end, start, stop) {
                return Ok(Exit { side: *side, point });
            }
        }

        Err(PortalError::NoExit { origin, direction })
    }
}

/// Intersects segment `p1 -> p2` with segment `q1 -> q2`.
///
/// Solves `p1 + t * (p2 - p1) = q1 + u * (q2 - q1)` through cross products.
/// Parallel segments never intersect; otherwise a hit requires both `t` and
/// `u` to fall within [0, 1].
pub fn segment_intersection(p1: Point2D, p2: Point2D, q1: Point2D, q2: Point2D)
    -> Option<Point2D> {
    let r = p2 - p1;
    let s = q2 - q1;

    let denom = r.cross(&s);
    if denom == 0.0 {
        return None;
    }

    let qp = q1 - p1;
    let t = qp.cross(&s) / denom;
    let u = qp.cross(&r) / denom;

    let in_range = |v: f64| v >= -SEGMENT_EPSILON && v <= 1.0 + SEGMENT_EPSILON;
    if in_range(t) && in_range(u) {
        Some(p1 + r * t)
    } else {
        None
    }
}

#[test]
fn vertical_ray_exits_top() {
    let b = Boundary::new(1024.0, 768.0);
    for dx in [0.0, 0.01, -0.019].iter() {
        let r = Ray2D::new(Point2D::new(300.0, 200.0), Point2D::new(*dx, -1.0));
        let exit = b.find_exit(r).unwrap();

        assert_eq!(exit.side, Side::Top);
        assert_eq!(exit.point.x, 300.0);
        assert_eq!(exit.point.y, 0.0);
    }
}

#[test]
fn vertical_ray_exits_bottom() {
    let b = Boundary::new(1024.0, 768.0);
    let r = Ray2D::new(Point2D::new(300.0, 200.0), Point2D::new(0.0, 3.0));

    assert_eq!(b.find_exit(r).unwrap(),
        Exit { side: Side::Bottom, point: Point2D::new(300.0, 768.0) });
}

#[test]
fn horizontal_rays_exit_left_and_right() {
    let b = Boundary::new(1024.0, 768.0);
    let left = Ray2D::new(Point2D::new(500.0, 384.0), Point2D::new(-1.0, 0.0));
    let right = Ray2D::new(Point2D::new(524.0, 384.0), Point2D::new(1.0, 0.01));

    assert_eq!(b.find_exit(left).unwrap(),
        Exit { side: Side::Left, point: Point2D::new(0.0, 384.0) });
    assert_eq!(b.find_exit(right).unwrap(),
        Exit { side: Side::Right, point: Point2D::new(1024.0, 384.0) });
}

#[test]
fn general_ray_exits_right() {
    let b = Boundary::new(1024.0, 768.0);
    let r = Ray2D::new(Point2D::new(512.0, 384.0), Point2D::new(1.0, -0.5));
    let exit = b.find_exit(r).unwrap();

    assert_eq!(exit.side, Side::Right);
    assert_eq!(exit.point, Point2D::new(1024.0, 128.0));
}

#[test]
fn general_ray_exits_each_side() {
    let b = Boundary::new(1024.0, 768.0);
    let o = Point2D::new(512.0, 384.0);

    let top = b.find_exit(Ray2D::new(o, Point2D::new(0.3, -1.0))).unwrap();
    assert_eq!(top, Exit { side: Side::Top, point: Point2D::new(627.2, 0.0) });

    let bottom = b.find_exit(Ray2D::new(o, Point2D::new(-0.5, 1.0))).unwrap();
    assert_eq!(bottom,
        Exit { side: Side::Bottom, point: Point2D::new(320.0, 768.0) });

    let left = b.find_exit(Ray2D::new(o, Point2D::new(-2.0, -0.5))).unwrap();
    assert_eq!(left, Exit { side: Side::Left, point: Point2D::new(0.0, 256.0) });
}

#[test]
fn exit_point_lies_on_the_ray() {
    let b = Boundary::new(1024.0, 768.0);
    let r = Ray2D::new(Point2D::new(100.0, 600.0), Point2D::new(0.7, 0.4));
    let exit = b.find_exit(r).unwrap();
    let offset = exit.point - r.origin;

    assert_eq!(exit.side, Side::Bottom);
    assert_eq!(exit.point.y, 768.0);
    assert!(offset.cross(&r.direction).abs() < 1e-6);
    assert!(offset.dot(&r.direction) > 0.0);
}

#[test]
fn corner_ray_resolves_to_top() {
    let b = Boundary::new(1024.0, 768.0);
    let r = Ray2D::new(Point2D::new(100.0, 100.0), Point2D::new(-1.0, -1.0));
    let exit = b.find_exit(r).unwrap();

    assert_eq!(exit.side, Side::Top);
    assert_eq!(exit.point, Point2D::new(0.0, 0.0));
}

#[test]
fn zero_direction_is_degenerate() {
    let b = Boundary::new(1024.0, 768.0);
    let o = Point2D::new(10.0, 10.0);

    assert_eq!(b.find_exit(Ray2D::new(o, Point2D::zero())),
        Err(PortalError::DegenerateRay { origin: o }));
    assert_eq!(b.find_exit(Ray2D::new(o, Point2D::new(f64::NAN, 1.0))),
        Err(PortalError::DegenerateRay { origin: o }));
}

#[test]
fn ray_outside_pointing_away_has_no_exit() {
    let b = Boundary::new(1024.0, 768.0);
    let r = Ray2D::new(Point2D::new(-50.0, -50.0), Point2D::new(-1.0, -0.5));

    assert!(matches!(b.find_exit(r), Err(PortalError::NoExit { .. })));
}

#[test]
fn short_direction_still_reaches_the_boundary() {
    let b = Boundary::new(1024.0, 768.0);
    let r = Ray2D::new(Point2D::new(512.0, 384.0), Point2D::new(0.03, 0.04));
    let exit = b.find_exit(r).unwrap();

    assert_eq!(exit.side, Side::Bottom);
    assert_eq!(exit.point, Point2D::new(800.0, 768.0));
}

#[test]
fn large_boundary_is_crossed() {
    let b = Boundary::new(12000.0, 9000.0);
    let r = Ray2D::new(Point2D::new(6000.0, 4500.0), Point2D::new(0.6, 0.8));
    let exit = b.find_exit(r).unwrap();

    assert_eq!(exit.side, Side::Bottom);
    assert_eq!(exit.point, Point2D::new(9375.0, 9000.0));

    let r = Ray2D::new(Point2D::new(11000.0, 1000.0), Point2D::new(-0.8, 0.4));
    let exit = b.find_exit(r).unwrap();
    assert_eq!(exit.side, Side::Left);
    assert_eq!(exit.point, Point2D::new(0.0, 6500.0));
}

#[test]
fn reach_covers_the_far_corner() {
    let b = Boundary::new(12000.0, 9000.0);
    let o = Point2D::new(-300.0, 20000.0);
    let far = o.distance_squared(&b.corner(Corner::TopRight)).sqrt();

    assert!(b.reach(o) > far);
    assert_eq!(Boundary::new(10.0, 10.0).reach(Point2D::zero()), EXTENSION_SCALE);
}

#[test]
fn checked_boundary_rejects_empty_sizes() {
    assert_eq!(Boundary::checked(640.0, 480.0), Ok(Boundary::new(640.0, 480.0)));
    for (w, h) in [(0.0, 480.0), (640.0, -1.0), (f64::INFINITY, 480.0)].iter() {
        assert!(matches!(Boundary::checked(*w, *h),
            Err(PortalError::InvalidBoundary { .. })));
    }
    assert!(Boundary::checked(f64::NAN, 480.0).is_err());
}

#[test]
fn parallel_segments_do_not_intersect() {
    let hit = segment_intersection(
        Point2D::new(0.0, 1.0), Point2D::new(10.0, 1.0),
        Point2D::new(0.0, 0.0), Point2D::new(10.0, 0.0));

    assert_eq!(hit, None);
}

#[test]
fn sides_know_their_neighbours() {
    assert!(Side::Top.is_adjacent(Side::Right));
    assert!(Side::Left.is_adjacent(Side::Top));
    assert!(!Side::Top.is_adjacent(Side::Bottom));
    assert!(!Side::Left.is_adjacent(Side::Left));
    assert_eq!(Side::Right.opposite(), Side::Left);
}
