use crate::point::Point2D;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Ray2D {
    pub origin: Point2D,
    pub direction: Point2D,
}

impl Ray2D {
    pub fn new(origin: Point2D, direction: Point2D) -> Ray2D {
        Ray2D { origin, direction }
    }

    /// Creates a ray leaving `from` along the line from `through` to `from`.
    ///
    /// Used to cast rays from a portal's edge point directly away from the
    /// viewer. Returns `None` if both points coincide.
    pub fn away_from(through: Point2D, from: Point2D) -> Option<Ray2D> {
        let direction = (from - through).normalize()?;
        Some(Ray2D { origin: from, direction })
    }

    pub fn position(&self, t: f64) -> Point2D {
        self.origin + (t * self.direction)
    }

    /// The end point of the ray once extended by `scale` direction lengths.
    pub fn extended(&self, scale: f64) -> Point2D {
        self.position(scale)
    }
}

#[test]
fn ray_position() {
    let r = Ray2D::new(Point2D::new(2.0, 3.0), Point2D::new(1.0, 0.0));

    assert_eq!(r.position(0.0), Point2D::new(2.0, 3.0));
    assert_eq!(r.position(1.0), Point2D::new(3.0, 3.0));
    assert_eq!(r.position(-1.0), Point2D::new(1.0, 3.0));
    assert_eq!(r.position(2.5), Point2D::new(4.5, 3.0));
}

#[test]
fn ray_away_from_viewer() {
    let viewer = Point2D::new(10.0, 10.0);
    let edge = Point2D::new(10.0, 4.0);
    let r = Ray2D::away_from(viewer, edge).unwrap();

    assert_eq!(r.origin, edge);
    assert_eq!(r.direction, Point2D::new(0.0, -1.0));
    assert_eq!(r.extended(4.0), Point2D::new(10.0, 0.0));
}

#[test]
fn ray_away_from_itself_is_none() {
    let p = Point2D::new(1.0, 1.0);
    assert_eq!(Ray2D::away_from(p, p), None);
}
