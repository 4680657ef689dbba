use crate::boundary::{ Boundary, Corner, Exit, Side };
use crate::error::PortalError;
use crate::point::Point2D;
use crate::portal::{ Portal, PortalEdges };
use crate::ray::Ray2D;

/// The corners passed when walking the boundary from the exit of ray B to the
/// exit of ray A.
///
/// Rays leaving through the same side need no corner. Adjacent sides share
/// exactly one corner regardless of order. Opposite sides pass two corners,
/// on the side of the rectangle the cone opens towards, listed in walking
/// order starting next to `side_b`.
pub fn corners_between(side_a: Side, side_b: Side) -> &'static [Corner] {
    use Corner::*;
    use Side::*;

    match (side_a, side_b) {
        (Top, Top) | (Right, Right) | (Bottom, Bottom) | (Left, Left) => &[],

        (Top, Right) | (Right, Top) => &[TopRight],
        (Right, Bottom) | (Bottom, Right) => &[BottomRight],
        (Bottom, Left) | (Left, Bottom) => &[BottomLeft],
        (Left, Top) | (Top, Left) => &[TopLeft],

        (Top, Bottom) => &[BottomRight, TopRight],
        (Right, Left) => &[BottomLeft, BottomRight],
        (Bottom, Top) => &[TopLeft, BottomLeft],
        (Left, Right) => &[TopRight, TopLeft],
    }
}

/// An axis-aligned box around a set of points.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BoundingBox {
    pub min: Point2D,
    pub max: Point2D,
}

impl BoundingBox {
    /// Scans the points for their extreme coordinates. An empty slice yields
    /// a zero-sized box at the origin.
    pub fn of(points: &[Point2D]) -> BoundingBox {
        let first = match points.first() {
            Some(p) => *p,
            None => return Default::default(),
        };

        points.iter().fold(
            BoundingBox { min: first, max: first },
            |bb, p| BoundingBox {
                min: Point2D::new(bb.min.x.min(p.x), bb.min.y.min(p.y)),
                max: Point2D::new(bb.max.x.max(p.x), bb.max.y.max(p.y)),
            }
        )
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point2D {
        (self.min + self.max) * 0.5
    }

    /// Translates a point into a frame centered on this box.
    pub fn to_local(&self, p: Point2D) -> Point2D {
        p - self.center()
    }

    /// Inverse of `to_local`.
    pub fn to_world(&self, p: Point2D) -> Point2D {
        p + self.center()
    }
}

/// The screen region behind a portal, bounded by the two rays cast through
/// the portal's edges and by the boundary.
///
/// Vertices start with edge `b`, edge `a`, then the exit of ray `b`, any
/// boundary corners, and finally the exit of ray `a`. The polygon is closed;
/// the first vertex is not repeated.
#[derive(Clone, Debug, PartialEq)]
pub struct Cone {
    pub vertices: Vec<Point2D>,
    pub exit_a: Exit,
    pub exit_b: Exit,
    pub bounds: BoundingBox,
}

impl Cone {
    /// The region of the background each vertex samples, as normalized
    /// coordinates over the whole boundary.
    pub fn tex_coords(&self, boundary: &Boundary) -> Vec<Point2D> {
        self.vertices.iter()
            .map(|v| Point2D::new(v.x / boundary.width, v.y / boundary.height))
            .collect()
    }

    /// The vertices relative to the center of the bounding box.
    pub fn local_vertices(&self) -> Vec<Point2D> {
        self.vertices.iter().map(|v| self.bounds.to_local(*v)).collect()
    }

    /// The size of an offscreen region able to hold the whole cone.
    pub fn capture_size(&self) -> (f64, f64) {
        (self.bounds.width(), self.bounds.height())
    }

    /// Splits the polygon into a fan of triangles around its first vertex.
    pub fn triangles(&self) -> Vec<[Point2D; 3]> {
        if self.vertices.len() < 3 {
            return Vec::new();
        }

        let hub = self.vertices[0];
        self.vertices[1..].windows(2)
            .map(|w| [hub, w[0], w[1]])
            .collect()
    }
}

/// Builds the cone behind `portal` as seen from `viewer`.
pub fn build_cone(portal: &Portal, viewer: Point2D, boundary: &Boundary)
    -> Result<Cone, PortalError> {
    build_cone_from_edges(portal.edges(viewer), viewer, boundary)
}

/// Builds the cone behind an opening with already computed end points.
///
/// A ray is cast from each end point directly away from the viewer. Exit
/// coordinates within the snap threshold of zero are snapped to zero.
pub fn build_cone_from_edges(edges: PortalEdges, viewer: Point2D,
    boundary: &Boundary) -> Result<Cone, PortalError> {
    let exit_a = cast_exit(edges.a, viewer, boundary)?;
    let exit_b = cast_exit(edges.b, viewer, boundary)?;

    let corners = corners_between(exit_a.side, exit_b.side);

    let mut vertices = Vec::with_capacity(4 + corners.len());
    vertices.push(edges.b);
    vertices.push(edges.a);
    vertices.push(exit_b.point);
    vertices.extend(corners.iter().map(|c| boundary.corner(*c)));
    vertices.push(exit_a.point);

    let bounds = BoundingBox::of(&vertices);

    Ok(Cone { vertices, exit_a, exit_b, bounds })
}

fn cast_exit(edge: Point2D, viewer: Point2D, boundary: &Boundary)
    -> Result<Exit, PortalError> {
    let ray = Ray2D::away_from(viewer, edge)
        .ok_or(PortalError::DegenerateRay { origin: edge })?;
    let exit = boundary.find_exit(ray)?;

    Ok(Exit { side: exit.side, point: exit.point.snap() })
}

#[cfg(test)]
fn screen() -> Boundary {
    Boundary::new(1024.0, 768.0)
}

#[test]
fn corner_table_is_complete() {
    use Corner::*;
    use Side::*;

    for side in Side::ALL.iter() {
        assert!(corners_between(*side, *side).is_empty());
    }

    assert_eq!(corners_between(Top, Right), &[TopRight]);
    assert_eq!(corners_between(Right, Top), &[TopRight]);
    assert_eq!(corners_between(Right, Bottom), &[BottomRight]);
    assert_eq!(corners_between(Bottom, Right), &[BottomRight]);
    assert_eq!(corners_between(Bottom, Left), &[BottomLeft]);
    assert_eq!(corners_between(Left, Bottom), &[BottomLeft]);
    assert_eq!(corners_between(Left, Top), &[TopLeft]);
    assert_eq!(corners_between(Top, Left), &[TopLeft]);

    assert_eq!(corners_between(Top, Bottom), &[BottomRight, TopRight]);
    assert_eq!(corners_between(Right, Left), &[BottomLeft, BottomRight]);
    assert_eq!(corners_between(Bottom, Top), &[TopLeft, BottomLeft]);
    assert_eq!(corners_between(Left, Right), &[TopRight, TopLeft]);
}

#[test]
fn corner_count_follows_adjacency() {
    for a in Side::ALL.iter() {
        for b in Side::ALL.iter() {
            let expected = if a == b {
                0
            } else if a.is_adjacent(*b) {
                1
            } else {
                2
            };

            assert_eq!(corners_between(*a, *b).len(), expected);
        }
    }
}

#[test]
fn corner_walk_starts_next_to_side_b() {
    // The first corner passed must touch side b, the last must touch side a.
    let b = screen();
    for side_a in Side::ALL.iter() {
        let side_b = side_a.opposite();
        let corners = corners_between(*side_a, side_b);
        let (b0, b1) = b.edge(side_b);
        let (a0, a1) = b.edge(*side_a);
        let first = b.corner(corners[0]);
        let last = b.corner(corners[1]);

        assert!(first == b0 || first == b1);
        assert!(last == a0 || last == a1);
    }
}

#[test]
fn opposite_sides_make_six_vertices() {
    let edges = PortalEdges {
        a: Point2D::new(500.0, 384.0),
        b: Point2D::new(524.0, 384.0),
    };
    let cone = build_cone_from_edges(edges, Point2D::new(512.0, 384.0),
        &screen()).unwrap();

    assert_eq!(cone.exit_a.side, Side::Left);
    assert_eq!(cone.exit_b.side, Side::Right);
    assert_eq!(cone.vertices, vec![
        Point2D::new(524.0, 384.0),
        Point2D::new(500.0, 384.0),
        Point2D::new(1024.0, 384.0),
        Point2D::new(1024.0, 0.0),
        Point2D::new(0.0, 0.0),
        Point2D::new(0.0, 384.0),
    ]);
}

#[test]
fn same_side_makes_a_quad() {
    let portal = Portal::new(Point2D::new(512.0, 384.0), 100.0);
    let cone = build_cone(&portal, Point2D::new(512.0, 600.0), &screen())
        .unwrap();

    assert_eq!(cone.exit_a.side, Side::Top);
    assert_eq!(cone.exit_b.side, Side::Top);
    assert_eq!(cone.vertices.len(), 4);
    assert_eq!(cone.vertices[0], Point2D::new(562.0, 384.0));
    assert_eq!(cone.vertices[1], Point2D::new(462.0, 384.0));
    assert_eq!(cone.vertices[2].y, 0.0);
    assert_eq!(cone.vertices[3].y, 0.0);
    assert!(cone.vertices[2].x > 562.0);
    assert!(cone.vertices[3].x < 462.0);
}

#[test]
fn adjacent_sides_insert_the_shared_corner() {
    // Looking up and to the right from the lower left.
    let portal = Portal::new(Point2D::new(900.0, 100.0), 100.0);
    let cone = build_cone(&portal, Point2D::new(700.0, 300.0), &screen())
        .unwrap();

    assert_eq!(cone.vertices.len(), 5);
    assert!(cone.exit_a.side.is_adjacent(cone.exit_b.side));
    assert_eq!(cone.vertices[3], Point2D::new(1024.0, 0.0));
}

#[test]
fn near_zero_exits_are_snapped() {
    // Ray a leaves straight up the screen at x = 0.004.
    let edges = PortalEdges {
        a: Point2D::new(0.004, 300.0),
        b: Point2D::new(40.0, 300.0),
    };
    let cone = build_cone_from_edges(edges, Point2D::new(0.004, 500.0),
        &screen()).unwrap();

    assert_eq!(cone.exit_a.side, Side::Top);
    assert_eq!(cone.exit_a.point.x, 0.0);
    assert_eq!(cone.exit_a.point.y, 0.0);
    assert_eq!(cone.exit_b.side, Side::Top);
}

#[test]
fn viewer_on_an_edge_is_degenerate() {
    let edges = PortalEdges {
        a: Point2D::new(100.0, 100.0),
        b: Point2D::new(200.0, 100.0),
    };
    let result = build_cone_from_edges(edges, Point2D::new(100.0, 100.0),
        &screen());

    assert_eq!(result,
        Err(PortalError::DegenerateRay { origin: Point2D::new(100.0, 100.0) }));
}

#[test]
fn vertex_count_stays_between_four_and_six() {
    let b = screen();
    let mut seen = [false; 3];

    for cx in (100..=900).step_by(200) {
        for cy in (100..=700).step_by(150) {
            let portal = Portal::new(Point2D::new(cx as f64, cy as f64), 60.0);
            for vx in (7..1024).step_by(97) {
                for vy in (5..768).step_by(89) {
                    let viewer = Point2D::new(vx as f64, vy as f64);
                    let cone = build_cone(&portal, viewer, &b).unwrap();
                    let n = cone.vertices.len();

                    assert!(n >= 4 && n <= 6, "{} vertices", n);
                    seen[n - 4] = true;
                }
            }
        }
    }

    assert_eq!(seen, [true, true, true]);
}

#[test]
fn local_frame_round_trips() {
    let portal = Portal::new(Point2D::new(300.0, 500.0), 100.0);
    let cone = build_cone(&portal, Point2D::new(650.0, 420.0), &screen())
        .unwrap();

    for (local, vertex) in cone.local_vertices().iter().zip(cone.vertices.iter()) {
        let back = cone.bounds.to_world(*local);
        assert!((back.x - vertex.x).abs() < 1e-4);
        assert!((back.y - vertex.y).abs() < 1e-4);
    }
}

#[test]
fn bounding_box_covers_all_vertices() {
    let edges = PortalEdges {
        a: Point2D::new(500.0, 384.0),
        b: Point2D::new(524.0, 384.0),
    };
    let cone = build_cone_from_edges(edges, Point2D::new(512.0, 384.0),
        &screen()).unwrap();

    assert_eq!(cone.bounds.min, Point2D::new(0.0, 0.0));
    assert_eq!(cone.bounds.max, Point2D::new(1024.0, 384.0));
    assert_eq!(cone.capture_size(), (1024.0, 384.0));
    assert_eq!(cone.bounds.center(), Point2D::new(512.0, 192.0));
}

#[test]
fn tex_coords_are_normalized_over_the_screen() {
    let edges = PortalEdges {
        a: Point2D::new(500.0, 384.0),
        b: Point2D::new(524.0, 384.0),
    };
    let b = screen();
    let cone = build_cone_from_edges(edges, Point2D::new(512.0, 384.0), &b)
        .unwrap();
    let uv = cone.tex_coords(&b);

    assert_eq!(uv.len(), cone.vertices.len());
    assert_eq!(uv[2], Point2D::new(1.0, 0.5));
    assert_eq!(uv[4], Point2D::new(0.0, 0.0));
}

#[test]
fn triangle_fan_shares_the_first_vertex() {
    let portal = Portal::new(Point2D::new(512.0, 384.0), 100.0);
    let cone = build_cone(&portal, Point2D::new(512.0, 600.0), &screen())
        .unwrap();
    let tris = cone.triangles();

    assert_eq!(tris.len(), cone.vertices.len() - 2);
    assert!(tris.iter().all(|t| t[0] == cone.vertices[0]));
}
