use std::fmt;

use crate::point::Point2D;

/// Identifies a portal by its position in a `PortalRegistry`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortalId(pub usize);

impl fmt::Display for PortalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The two end points of a portal opening, as seen from one viewer position.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PortalEdges {
    pub a: Point2D,
    pub b: Point2D,
}

impl PortalEdges {
    pub fn midpoint(&self) -> Point2D {
        (self.a + self.b) * 0.5
    }
}

/// A portal opening.
///
/// Only the anchor and size are stored. The opening always faces the viewer,
/// so its end points are derived from the viewer position every frame with
/// `Portal::edges`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Portal {
    pub center: Point2D,
    pub size: f64,

    /// The partner of this portal, if it has been linked. Links are always
    /// mutual and are owned by the registry.
    pub(crate) linked: Option<PortalId>,
}

impl Portal {
    pub fn new(center: Point2D, size: f64) -> Portal {
        Portal { center, size, linked: None }
    }

    pub fn linked(&self) -> Option<PortalId> {
        self.linked
    }

    /// The end points of this portal when seen from `viewer`.
    pub fn edges(&self, viewer: Point2D) -> PortalEdges {
        facing_edges(self.center, self.size, viewer)
    }
}

/// Computes the end points of an opening of width `size` anchored at
/// `center`, turned so that it lies perpendicular to the line from `viewer`
/// to `center`.
///
/// The opening is laid along the X axis and rotated by the viewer's bearing
/// to the center plus a quarter turn. Point `a` starts on the negative half
/// of the X axis, point `b` on the positive half.
pub fn facing_edges(center: Point2D, size: f64, viewer: Point2D) -> PortalEdges {
    let angle = viewer.bearing_to(&center) + 90.0;
    let half = size * 0.5;

    PortalEdges {
        a: center + Point2D::new(-half, 0.0).rotate(angle),
        b: center + Point2D::new(half, 0.0).rotate(angle),
    }
}

#[test]
fn edges_face_a_viewer_below() {
    let p = Portal::new(Point2D::new(512.0, 384.0), 100.0);
    let e = p.edges(Point2D::new(512.0, 600.0));

    assert_eq!(e.a, Point2D::new(462.0, 384.0));
    assert_eq!(e.b, Point2D::new(562.0, 384.0));
}

#[test]
fn edges_face_a_viewer_to_the_left() {
    let p = Portal::new(Point2D::new(512.0, 384.0), 100.0);
    let e = p.edges(Point2D::new(100.0, 384.0));

    assert_eq!(e.a, Point2D::new(512.0, 334.0));
    assert_eq!(e.b, Point2D::new(512.0, 434.0));
}

#[test]
fn edges_stay_perpendicular_and_centered() {
    let center = Point2D::new(300.0, 250.0);
    let viewer = Point2D::new(120.0, 610.0);
    let e = facing_edges(center, 80.0, viewer);

    assert_eq!(e.midpoint(), center);
    assert!((e.b - e.a).dot(&(center - viewer)).abs() < 1e-6);
    assert!(((e.b - e.a).magnitude() - 80.0).abs() < 1e-9);
}

#[test]
fn edges_follow_the_viewer() {
    let p = Portal::new(Point2D::new(400.0, 400.0), 50.0);
    let first = p.edges(Point2D::new(400.0, 700.0));
    let second = p.edges(Point2D::new(700.0, 400.0));

    assert_ne!(first, second);
}

#[test]
fn new_portal_is_unlinked() {
    assert_eq!(Portal::new(Point2D::zero(), 10.0).linked(), None);
}
