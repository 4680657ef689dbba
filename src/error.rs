use std::fmt;

use crate::point::Point2D;
use crate::portal::PortalId;

/// Errors raised by portal geometry and the portal registry.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PortalError {
    /// A placement was attempted while the registry was full.
    CapacityExceeded { capacity: usize },

    /// A ray with a zero-length (or non-finite) direction was cast.
    DegenerateRay { origin: Point2D },

    /// A ray never crossed the boundary. Only possible when the ray starts
    /// outside of the boundary and points away from it.
    NoExit { origin: Point2D, direction: Point2D },

    /// An identifier which does not belong to the registry.
    UnknownPortal(PortalId),

    /// A screen size which is zero, negative or not finite.
    InvalidBoundary { width: f64, height: f64 },
}

impl fmt::Display for PortalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortalError::CapacityExceeded { capacity } =>
                write!(f, "portal registry is full ({} portals)", capacity),
            PortalError::DegenerateRay { origin } =>
                write!(f, "degenerate ray cast from ({}, {})",
                    origin.x, origin.y),
            PortalError::NoExit { origin, direction } =>
                write!(f, "ray from ({}, {}) along ({}, {}) never exits the \
                    boundary", origin.x, origin.y, direction.x, direction.y),
            PortalError::UnknownPortal(id) =>
                write!(f, "no portal with id {}", id.0),
            PortalError::InvalidBoundary { width, height } =>
                write!(f, "invalid screen size {}x{}", width, height),
        }
    }
}

impl std::error::Error for PortalError { }

#[test]
fn capacity_message_names_capacity() {
    let e = PortalError::CapacityExceeded { capacity: 8 };
    assert_eq!(e.to_string(), "portal registry is full (8 portals)");
}

#[test]
fn unknown_portal_message_names_id() {
    let e = PortalError::UnknownPortal(PortalId(3));
    assert_eq!(e.to_string(), "no portal with id 3");
}

#[test]
fn invalid_boundary_message_names_size() {
    let e = PortalError::InvalidBoundary { width: 0.0, height: 768.0 };
    assert_eq!(e.to_string(), "invalid screen size 0x768");
}
