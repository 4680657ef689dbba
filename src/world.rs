use serde::{ Serialize, Deserialize };
use tracing::{ debug, warn };

use crate::boundary::Boundary;
use crate::color::Color;
use crate::cone::{ Cone, build_cone_from_edges };
use crate::consts::{ PORTAL_SIZE, SIGHT_LINE_SCALE, VIEWER_SIZE, VIEWER_STEP,
    VIEWER_START };
use crate::point::Point2D;
use crate::portal::{ Portal, PortalEdges, PortalId };
use crate::registry::PortalRegistry;
use crate::sink::DrawSink;

/// Directional movement requested for one frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Movement {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl Movement {
    /// The offset this movement applies for a given step length.
    pub fn offset(&self, step: f64) -> Point2D {
        let mut offset = Point2D::zero();
        if self.right { offset.x += step; }
        if self.left { offset.x -= step; }
        if self.up { offset.y -= step; }
        if self.down { offset.y += step; }

        offset
    }
}

/// Everything the frame loop reads from its environment for one frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameInput {
    /// Where a new portal would be placed.
    pub cursor: Point2D,

    /// Whether the pending portal is placed this frame.
    pub commit: bool,

    pub movement: Movement,
}

/// The geometry of one placed portal for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct PortalView {
    pub id: PortalId,
    pub edges: PortalEdges,

    /// Lines from the viewer through each edge, far past the edge.
    pub sight_lines: [(Point2D, Point2D); 2],

    /// The cone behind the portal. Missing only if it could not be built,
    /// which happens when the viewer sits exactly on an edge point or the
    /// portal lies outside the boundary.
    pub cone: Option<Cone>,
}

/// The output of one step of the frame loop.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// The viewer position all geometry in this frame was computed from.
    pub viewer: Point2D,

    /// The end points of the portal waiting to be placed.
    pub pending: PortalEdges,

    /// One view per placed portal, in placement order.
    pub portals: Vec<PortalView>,

    /// Portal identifiers ordered nearest to farthest from the viewer.
    pub order: Vec<PortalId>,

    /// The portal placed this frame, if any.
    pub placed: Option<PortalId>,
}

impl Frame {
    pub fn view(&self, id: PortalId) -> Option<&PortalView> {
        self.portals.get(id.0)
    }

    /// Emits this frame into a drawing sink.
    ///
    /// Cones are drawn farthest first so that nearer portals end up on top.
    /// Slits and sight lines follow, then the pending portal, and the viewer
    /// last of all.
    pub fn draw(&self, boundary: &Boundary, sink: &mut dyn DrawSink) {
        sink.background();

        for id in self.order.iter().rev() {
            let view = match self.view(*id) {
                Some(view) => view,
                None => continue,
            };

            if let Some(cone) = &view.cone {
                sink.fill_polygon(&cone.vertices, &cone.tex_coords(boundary),
                    Color::from_hex(0x4466ff));
            }
        }

        for view in self.portals.iter() {
            for (from, to) in view.sight_lines.iter() {
                sink.line(*from, *to, 1.0, Color::black());
            }

            sink.line(view.edges.a, view.edges.b, 3.0, Color::blue());
        }

        sink.line(self.pending.a, self.pending.b, 3.0, Color::red());
        sink.square(self.viewer, VIEWER_SIZE, Color::from_hex(0x0052ac));
    }
}

/// The state owned by the frame loop: the viewer, the portal waiting to be
/// placed and every portal placed so far.
#[derive(Clone, Debug)]
pub struct World {
    pub boundary: Boundary,
    pub viewer: Point2D,
    pub viewer_step: f64,
    pub pending: Portal,
    pub registry: PortalRegistry,
}

impl Default for World {
    fn default() -> World {
        World::new(Boundary::default(), PortalRegistry::new(), PORTAL_SIZE)
    }
}

impl World {
    pub fn new(boundary: Boundary, registry: PortalRegistry, portal_size: f64)
        -> World {
        World {
            boundary,
            viewer: VIEWER_START.into(),
            viewer_step: VIEWER_STEP,
            pending: Portal::new(Point2D::zero(), portal_size),
            registry,
        }
    }

    /// Advances the frame loop by one frame.
    ///
    /// The pending portal follows the cursor and is placed first when the
    /// input commits it; a full registry drops the placement. All geometry is
    /// then computed from the current viewer position, and every portal's
    /// edges are recomputed. Movement is applied last and takes effect from
    /// the next frame.
    pub fn step(&mut self, input: &FrameInput) -> Frame {
        self.pending.center = input.cursor;

        let placed = if input.commit {
            // The registry already reports dropped placements.
            self.registry.place(self.pending).ok()
        } else {
            None
        };

        let viewer = self.viewer;
        let portals: Vec<PortalView> = self.registry.iter()
            .map(|(id, portal)| self.view_portal(id, portal, viewer))
            .collect();
        let order = self.registry.rank(viewer);

        debug!("Frame at ({}, {}): {} portals, order {:?}",
            viewer.x, viewer.y, portals.len(), order);

        self.viewer = viewer + input.movement.offset(self.viewer_step);

        Frame {
            viewer,
            pending: self.pending.edges(viewer),
            portals,
            order,
            placed,
        }
    }

    fn view_portal(&self, id: PortalId, portal: &Portal, viewer: Point2D)
        -> PortalView {
        let edges = portal.edges(viewer);
        let sight = |edge: Point2D| {
            (viewer, viewer + (edge - viewer) * SIGHT_LINE_SCALE)
        };

        let cone = match build_cone_from_edges(edges, viewer, &self.boundary) {
            Ok(cone) => Some(cone),
            Err(e) => {
                warn!("Skipping cone of portal {}: {}", id, e);
                None
            }
        };

        PortalView {
            id,
            edges,
            sight_lines: [sight(edges.a), sight(edges.b)],
            cone,
        }
    }
}

#[cfg(test)]
fn click(x: f64, y: f64) -> FrameInput {
    FrameInput { cursor: Point2D::new(x, y), commit: true, ..Default::default() }
}

#[test]
fn pending_portal_follows_the_cursor() {
    let mut w = World::default();
    let input = FrameInput { cursor: Point2D::new(400.0, 300.0), ..Default::default() };
    let frame = w.step(&input);

    assert_eq!(frame.pending.midpoint(), Point2D::new(400.0, 300.0));
    assert!(frame.portals.is_empty());
    assert_eq!(frame.placed, None);
}

#[test]
fn commit_places_and_links_portals() {
    let mut w = World::default();

    let first = w.step(&click(400.0, 300.0));
    assert_eq!(first.placed, Some(PortalId(0)));
    assert_eq!(first.portals.len(), 1);
    assert!(first.portals[0].cone.is_some());

    let second = w.step(&click(700.0, 500.0));
    assert_eq!(second.placed, Some(PortalId(1)));
    assert_eq!(w.registry.partner(PortalId(0)), Ok(Some(PortalId(1))));
}

#[test]
fn full_registry_drops_the_placement() {
    let registry = PortalRegistry::with_capacity(1);
    let mut w = World::new(Boundary::default(), registry, 100.0);

    assert_eq!(w.step(&click(400.0, 300.0)).placed, Some(PortalId(0)));

    let frame = w.step(&click(600.0, 300.0));
    assert_eq!(frame.placed, None);
    assert_eq!(frame.portals.len(), 1);
    assert_eq!(w.registry.len(), 1);
}

#[test]
fn movement_applies_from_the_next_frame() {
    let mut w = World::default();
    let input = FrameInput {
        movement: Movement { right: true, down: true, ..Default::default() },
        ..Default::default()
    };

    let frame = w.step(&input);
    assert_eq!(frame.viewer, Point2D::new(100.0, 100.0));
    assert_eq!(w.viewer, Point2D::new(104.0, 104.0));

    let frame = w.step(&FrameInput::default());
    assert_eq!(frame.viewer, Point2D::new(104.0, 104.0));
}

#[test]
fn opposing_movement_cancels_out() {
    let m = Movement { left: true, right: true, up: true, ..Default::default() };
    assert_eq!(m.offset(4.0), Point2D::new(0.0, -4.0));
}

#[test]
fn edges_are_recomputed_every_frame() {
    let mut w = World::default();
    w.step(&click(500.0, 400.0));
    w.viewer = Point2D::new(500.0, 700.0);
    let below = w.step(&FrameInput::default());
    w.viewer = Point2D::new(900.0, 400.0);
    let right = w.step(&FrameInput::default());

    assert_eq!(below.portals[0].edges.a, Point2D::new(450.0, 400.0));
    assert_eq!(right.portals[0].edges.a, Point2D::new(500.0, 450.0));
}

#[test]
fn frame_order_ranks_nearest_first() {
    let mut w = World::default();
    w.step(&click(800.0, 600.0));
    w.step(&click(150.0, 120.0));
    w.step(&click(400.0, 400.0));

    let frame = w.step(&FrameInput::default());
    assert_eq!(frame.order, vec![PortalId(1), PortalId(2), PortalId(0)]);
}

#[test]
fn sight_lines_pass_through_the_edges() {
    let mut w = World::default();
    let frame = w.step(&click(400.0, 300.0));
    let view = &frame.portals[0];
    let (from, to) = view.sight_lines[0];

    assert_eq!(from, frame.viewer);
    assert!((to - from).cross(&(view.edges.a - from)).abs() < 1e-3);
    assert!((to - from).magnitude() > (view.edges.a - from).magnitude());
}

#[test]
fn cone_is_skipped_only_when_no_exit_exists() {
    let mut w = World::default();
    w.step(&click(400.0, 300.0));
    w.viewer = w.registry.get(PortalId(0)).unwrap().center;
    // Viewer at the center: edges sit half a portal away, so the cone exists.
    assert!(w.step(&FrameInput::default()).portals[0].cone.is_some());

    let mut w = World::default();
    w.step(&FrameInput { cursor: Point2D::new(-300.0, -300.0), commit: true,
        ..Default::default() });
    // Outside the screen, looking away from it.
    assert!(w.step(&FrameInput::default()).portals[0].cone.is_none());
}

#[cfg(test)]
use crate::boundary::Side;

#[test]
fn large_screens_still_get_cones() {
    let mut w = World::new(Boundary::new(12000.0, 9000.0), PortalRegistry::new(),
        PORTAL_SIZE);
    w.viewer = Point2D::new(1000.0, 1000.0);
    let frame = w.step(&click(6000.0, 4500.0));

    let cone = frame.portals[0].cone.as_ref().unwrap();
    for exit in [cone.exit_a, cone.exit_b].iter() {
        assert!(matches!(exit.side, Side::Right | Side::Bottom));
    }
}

#[cfg(test)]
#[derive(Debug, PartialEq)]
enum DrawCall {
    Background,
    Fill { vertices: Vec<Point2D>, tex_coords: Vec<Point2D> },
    Line { from: Point2D, to: Point2D, color: Color },
    Square { center: Point2D, size: f64 },
}

#[cfg(test)]
#[derive(Default)]
struct Recorder(Vec<DrawCall>);

#[cfg(test)]
impl DrawSink for Recorder {
    fn background(&mut self) {
        self.0.push(DrawCall::Background);
    }

    fn fill_polygon(&mut self, vertices: &[Point2D], tex_coords: &[Point2D],
        _tint: Color) {
        self.0.push(DrawCall::Fill {
            vertices: vertices.to_vec(),
            tex_coords: tex_coords.to_vec(),
        });
    }

    fn line(&mut self, from: Point2D, to: Point2D, _thickness: f64, color: Color) {
        self.0.push(DrawCall::Line { from, to, color });
    }

    fn square(&mut self, center: Point2D, size: f64, _color: Color) {
        self.0.push(DrawCall::Square { center, size });
    }
}

#[test]
fn frames_draw_farthest_cone_first() {
    let mut w = World::default();
    w.step(&click(800.0, 600.0));
    w.step(&click(250.0, 200.0));
    let frame = w.step(&FrameInput { cursor: Point2D::new(500.0, 100.0),
        ..Default::default() });
    assert_eq!(frame.order, vec![PortalId(1), PortalId(0)]);

    let mut sink = Recorder::default();
    frame.draw(&w.boundary, &mut sink);
    assert_eq!(sink.0.first(), Some(&DrawCall::Background));

    let fills: Vec<&Vec<Point2D>> = sink.0.iter().filter_map(|call| match call {
        DrawCall::Fill { vertices, tex_coords } => {
            assert_eq!(tex_coords.len(), vertices.len());
            Some(vertices)
        }
        _ => None,
    }).collect();
    let far = &frame.portals[0].cone.as_ref().unwrap().vertices;
    let near = &frame.portals[1].cone.as_ref().unwrap().vertices;
    assert_eq!(fills, vec![far, near]);

    let last_line = sink.0.iter().rev().find_map(|call| match call {
        DrawCall::Line { from, to, color } => Some((*from, *to, *color)),
        _ => None,
    });
    assert_eq!(last_line, Some((frame.pending.a, frame.pending.b, Color::red())));

    // Two sight lines and a slit per portal.
    let lines = sink.0.iter().filter(|c| matches!(c, DrawCall::Line { .. })).count();
    assert_eq!(lines, 2 * 3 + 1);

    assert_eq!(sink.0.last(), Some(&DrawCall::Square {
        center: frame.viewer, size: VIEWER_SIZE }));
}

#[test]
fn redrawing_overwrites_the_previous_frame() {
    use crate::canvas::Rasterizer;
    use crate::pattern::CheckerPattern;

    let boundary = Boundary::new(64.0, 48.0);
    let mut w = World::new(boundary, PortalRegistry::new(), 10.0);
    w.viewer = Point2D::new(8.0, 8.0);
    let first = w.step(&click(40.0, 30.0));
    let second = w.step(&FrameInput { cursor: Point2D::new(20.0, 40.0),
        movement: Movement { right: true, ..Default::default() },
        ..Default::default() });
    let third = w.step(&FrameInput::default());

    let mut replayed = Rasterizer::new(64, 48, CheckerPattern::default());
    for frame in [&first, &second, &third].iter() {
        frame.draw(&boundary, &mut replayed);
    }
    let mut fresh = Rasterizer::new(64, 48, CheckerPattern::default());
    third.draw(&boundary, &mut fresh);

    assert_eq!(replayed.canvas, fresh.canvas);
}
