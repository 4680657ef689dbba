use tracing::{ debug, warn };

use crate::consts::MAX_PORTALS;
use crate::error::PortalError;
use crate::point::Point2D;
use crate::portal::{ Portal, PortalId };

/// An append-only collection of portals with a fixed capacity.
///
/// Portals are linked in pairs as they arrive: whenever a placement brings
/// the count to an even number, the new portal and the one placed right
/// before it become partners. Links are stored as identifiers on both
/// portals, so the registry is the only owner of any portal.
#[derive(Clone, Debug, PartialEq)]
pub struct PortalRegistry {
    portals: Vec<Portal>,
    capacity: usize,
}

impl Default for PortalRegistry {
    fn default() -> PortalRegistry {
        PortalRegistry::with_capacity(MAX_PORTALS)
    }
}

impl PortalRegistry {
    /// Creates an empty registry with the default capacity.
    pub fn new() -> PortalRegistry {
        Default::default()
    }

    pub fn with_capacity(capacity: usize) -> PortalRegistry {
        PortalRegistry { portals: Vec::with_capacity(capacity), capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.portals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.portals.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.portals.len() >= self.capacity
    }

    pub fn get(&self, id: PortalId) -> Option<&Portal> {
        self.portals.get(id.0)
    }

    /// Iterates over all portals together with their identifiers, in
    /// placement order.
    pub fn iter(&self) -> impl Iterator<Item = (PortalId, &Portal)> + '_ {
        self.portals.iter().enumerate().map(|(i, p)| (PortalId(i), p))
    }

    /// The partner of a portal, if it has one.
    pub fn partner(&self, id: PortalId) -> Result<Option<PortalId>, PortalError> {
        self.get(id)
            .map(|p| p.linked)
            .ok_or(PortalError::UnknownPortal(id))
    }

    /// Appends a portal to the registry.
    ///
    /// Any link carried by `portal` is discarded; links are only made by the
    /// registry. A full registry rejects the portal and stays unchanged.
    pub fn place(&mut self, mut portal: Portal) -> Result<PortalId, PortalError> {
        if self.is_full() {
            warn!("Dropping portal at ({}, {}): registry is full",
                portal.center.x, portal.center.y);
            return Err(PortalError::CapacityExceeded { capacity: self.capacity });
        }

        let id = PortalId(self.portals.len());
        portal.linked = None;
        self.portals.push(portal);
        debug!("Placed portal {} at ({}, {})", id, portal.center.x, portal.center.y);

        if self.portals.len() % 2 == 0 {
            let previous = PortalId(id.0 - 1);
            self.portals[previous.0].linked = Some(id);
            self.portals[id.0].linked = Some(previous);
            debug!("Linked portal {} with portal {}", previous, id);
        }

        Ok(id)
    }

    /// Orders all portals by their squared distance to `viewer`, nearest
    /// first. Equal distances keep placement order.
    pub fn rank(&self, viewer: Point2D) -> Vec<PortalId> {
        let mut ranked: Vec<(PortalId, f64)> = self.iter()
            .map(|(id, p)| (id, p.center.distance_squared(&viewer)))
            .collect();

        // `sort_by` is stable, which keeps ties in placement order.
        ranked.sort_by(|a, b|
            a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal)
        );

        ranked.into_iter().map(|(id, _)| id).collect()
    }
}

#[cfg(test)]
fn portal_at(x: f64, y: f64) -> Portal {
    Portal::new(Point2D::new(x, y), 100.0)
}

#[test]
fn place_until_full() {
    let mut r = PortalRegistry::with_capacity(8);

    for i in 0..8 {
        assert_eq!(r.place(portal_at(i as f64 * 10.0, 0.0)), Ok(PortalId(i)));
    }

    assert!(r.is_full());
    assert_eq!(r.place(portal_at(500.0, 500.0)),
        Err(PortalError::CapacityExceeded { capacity: 8 }));
    assert_eq!(r.len(), 8);
    assert_eq!(r.get(PortalId(8)), None);
}

#[test]
fn rejected_placement_changes_nothing() {
    let mut r = PortalRegistry::with_capacity(1);
    r.place(portal_at(1.0, 1.0)).unwrap();
    let before = r.clone();

    assert!(r.place(portal_at(2.0, 2.0)).is_err());
    assert_eq!(r, before);
}

#[test]
fn portals_link_in_pairs() {
    let mut r = PortalRegistry::new();
    let p0 = r.place(portal_at(0.0, 0.0)).unwrap();

    assert_eq!(r.partner(p0), Ok(None));

    let p1 = r.place(portal_at(10.0, 0.0)).unwrap();
    assert_eq!(r.partner(p0), Ok(Some(p1)));
    assert_eq!(r.partner(p1), Ok(Some(p0)));

    let p2 = r.place(portal_at(20.0, 0.0)).unwrap();
    assert_eq!(r.partner(p2), Ok(None));
    assert_eq!(r.partner(p1), Ok(Some(p0)));

    let p3 = r.place(portal_at(30.0, 0.0)).unwrap();
    assert_eq!(r.partner(p2), Ok(Some(p3)));
    assert_eq!(r.partner(p3), Ok(Some(p2)));
}

#[test]
fn links_are_mutual_and_never_self() {
    let mut r = PortalRegistry::new();
    for i in 0..7 {
        r.place(portal_at(i as f64, 0.0)).unwrap();
    }

    for (id, portal) in r.iter() {
        if let Some(partner) = portal.linked() {
            assert_ne!(partner, id);
            assert_eq!(r.partner(partner), Ok(Some(id)));
        }
    }
}

#[test]
fn incoming_links_are_discarded() {
    let mut r = PortalRegistry::new();
    let mut p = portal_at(0.0, 0.0);
    p.linked = Some(PortalId(5));

    let id = r.place(p).unwrap();
    assert_eq!(r.partner(id), Ok(None));
}

#[test]
fn unknown_partner_lookup_fails() {
    let r = PortalRegistry::new();
    assert_eq!(r.partner(PortalId(0)), Err(PortalError::UnknownPortal(PortalId(0))));
}

#[test]
fn rank_by_distance() {
    let mut r = PortalRegistry::new();
    let far = r.place(portal_at(10.0, 0.0)).unwrap();
    let near = r.place(portal_at(5.0, 0.0)).unwrap();
    let farthest = r.place(portal_at(20.0, 0.0)).unwrap();

    assert_eq!(r.rank(Point2D::zero()), vec![near, far, farthest]);
}

#[test]
fn rank_keeps_placement_order_on_ties() {
    let mut r = PortalRegistry::new();
    let a = r.place(portal_at(0.0, 5.0)).unwrap();
    let b = r.place(portal_at(5.0, 0.0)).unwrap();
    let c = r.place(portal_at(-5.0, 0.0)).unwrap();
    let d = r.place(portal_at(1.0, 1.0)).unwrap();

    assert_eq!(r.rank(Point2D::zero()), vec![d, a, b, c]);
}

#[test]
fn rank_of_empty_registry_is_empty() {
    assert!(PortalRegistry::new().rank(Point2D::zero()).is_empty());
}
