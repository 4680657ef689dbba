// Screen boundary
pub const SCREEN_WIDTH: f64 = 1024.0;
pub const SCREEN_HEIGHT: f64 = 768.0;

// Floating point comparisons
pub const FEQ_EPSILON: f64 = 0.0001;

// Direction components below this are treated as axis-aligned
pub const AXIS_EPSILON: f64 = 0.02;

// Exit coordinates below this magnitude are snapped to zero
pub const SNAP_EPSILON: f64 = 0.01;

// Slack on the parametric [0, 1] range of a segment hit
pub const SEGMENT_EPSILON: f64 = 1e-9;

// Shortest length a unit ray is extended before testing against the boundary
pub const EXTENSION_SCALE: f64 = 5000.0;

// How far sight lines are drawn past the portal edges
pub const SIGHT_LINE_SCALE: f64 = 1000.0;

// Portal defaults
pub const MAX_PORTALS: usize = 20;
pub const PORTAL_SIZE: f64 = 100.0;

// Viewer defaults
pub const VIEWER_START: (f64, f64) = (100.0, 100.0);
pub const VIEWER_STEP: f64 = 4.0;
pub const VIEWER_SIZE: f64 = 20.0;

// Runtime parameters
pub const OUT_FILE: &'static str = "./out.ppm";
