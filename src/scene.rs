use std::convert::TryFrom;

use serde::{ Serialize, Deserialize };

use crate::boundary::Boundary;
use crate::consts::{ MAX_PORTALS, PORTAL_SIZE, SCREEN_WIDTH, SCREEN_HEIGHT,
    VIEWER_START, VIEWER_STEP };
use crate::error::PortalError;
use crate::point::Point2D;
use crate::registry::PortalRegistry;
use crate::world::{ FrameInput, World };

/// A scene description, usually read from JSON.
///
/// Every field is optional; missing fields take the defaults from `consts`.
///
/// ```
/// # use portal_cone::scene::SceneJson;
/// let scene: SceneJson = serde_json::from_str(r#"{ "max_portals": 8 }"#).unwrap();
/// assert_eq!(scene.max_portals, 8);
/// assert_eq!(scene.screen_width, 1024.0);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneJson {
    pub screen_width: f64,
    pub screen_height: f64,
    pub max_portals: usize,
    pub portal_size: f64,
    pub viewer: Point2D,
    pub viewer_step: f64,

    /// One input per frame, replayed in order.
    pub frames: Vec<FrameInput>,
}

impl Default for SceneJson {
    fn default() -> SceneJson {
        SceneJson {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            max_portals: MAX_PORTALS,
            portal_size: PORTAL_SIZE,
            viewer: VIEWER_START.into(),
            viewer_step: VIEWER_STEP,
            frames: Vec::new(),
        }
    }
}

impl SceneJson {
    /// The screen rectangle, rejecting sizes that are not positive and finite.
    pub fn boundary(&self) -> Result<Boundary, PortalError> {
        Boundary::checked(self.screen_width, self.screen_height)
    }
}

/// A world ready to run, together with the inputs to replay through it.
pub struct Scene {
    pub world: World,
    pub frames: Vec<FrameInput>,
}

impl TryFrom<SceneJson> for Scene {
    type Error = PortalError;

    fn try_from(scene_json: SceneJson) -> Result<Scene, PortalError> {
        let registry = PortalRegistry::with_capacity(scene_json.max_portals);
        let mut world = World::new(scene_json.boundary()?, registry,
            scene_json.portal_size);
        world.viewer = scene_json.viewer;
        world.viewer_step = scene_json.viewer_step;

        Ok(Scene { world, frames: scene_json.frames })
    }
}

#[test]
fn empty_json_uses_defaults() {
    let scene: SceneJson = serde_json::from_str("{}").unwrap();
    assert_eq!(scene, SceneJson::default());
}

#[test]
fn frames_parse_with_partial_fields() {
    let json = r#"{
        "screen_width": 640,
        "screen_height": 480,
        "viewer": { "x": 320, "y": 400 },
        "frames": [
            { "cursor": { "x": 320, "y": 200 }, "commit": true },
            { "movement": { "up": true } },
            {}
        ]
    }"#;
    let scene: SceneJson = serde_json::from_str(json).unwrap();

    assert_eq!(scene.boundary(), Ok(Boundary::new(640.0, 480.0)));
    assert_eq!(scene.frames.len(), 3);
    assert!(scene.frames[0].commit);
    assert_eq!(scene.frames[0].cursor, Point2D::new(320.0, 200.0));
    assert!(scene.frames[1].movement.up);
    assert!(!scene.frames[2].commit);
}

#[test]
fn scene_builds_a_configured_world() {
    let json = r#"{ "max_portals": 2, "portal_size": 40, "viewer": { "x": 10, "y": 20 } }"#;
    let scene = Scene::try_from(serde_json::from_str::<SceneJson>(json).unwrap())
        .unwrap();

    assert_eq!(scene.world.registry.capacity(), 2);
    assert_eq!(scene.world.pending.size, 40.0);
    assert_eq!(scene.world.viewer, Point2D::new(10.0, 20.0));
    assert!(scene.frames.is_empty());
}

#[test]
fn negative_capacity_is_rejected() {
    assert!(serde_json::from_str::<SceneJson>(r#"{ "max_portals": -1 }"#).is_err());
}

#[test]
fn empty_screen_is_rejected() {
    for json in [r#"{ "screen_width": 0 }"#, r#"{ "screen_height": -480 }"#].iter() {
        let scene_json: SceneJson = serde_json::from_str(json).unwrap();
        assert!(matches!(Scene::try_from(scene_json),
            Err(PortalError::InvalidBoundary { .. })));
    }

    let scene_json = SceneJson { screen_width: f64::NAN, ..Default::default() };
    assert!(scene_json.boundary().is_err());
}
