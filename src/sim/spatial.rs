//! Seams between the retrieval core and the world that owns the bodies
//!
//! The core never owns junk. It asks the world which bodies overlap a box,
//! reads and writes positions through stable [`BodyId`] handles, and hands
//! delivered bodies back for removal.

use core::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::shape::{CategoryMask, Rect};
use crate::inventory::Item;

/// Stable handle to a body owned by the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BodyId({})", self.0)
    }
}

/// Overlap queries against the world's bodies
pub trait SpatialQuery {
    /// Bodies whose category is in `filter` and that overlap `shape` swept
    /// along `delta`, first touch first.
    fn check(&self, shape: &Rect, delta: Vec2, filter: CategoryMask) -> Vec<BodyId>;
}

/// Handle-based access to junk bodies
pub trait JunkLookup {
    fn position(&self, id: BodyId) -> Option<Vec2>;

    /// Move a body; returns false if the handle is stale
    fn set_position(&mut self, id: BodyId, pos: Vec2) -> bool;

    /// Remove a body, returning its payload if it carried one
    fn remove(&mut self, id: BodyId) -> Option<Item>;
}
