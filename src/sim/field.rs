//! Magnetic field attraction
//!
//! While the magnet is out on the line and carrying nothing, every junk body
//! inside the field box is eased toward the magnet's pole. Membership is
//! rebuilt from scratch each frame; leaving the box just stops the pull.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::magnet::MagnetStateMachine;
use super::shape::CategoryMask;
use super::spatial::{BodyId, JunkLookup, SpatialQuery};
use crate::tuning::ScavengeTuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MagneticField {
    attraction_strength: f32,
    /// Pole position relative to the magnet centre
    anchor_offset: Vec2,
    /// Junk pulled this frame
    #[serde(skip)]
    membership: Vec<BodyId>,
}

impl MagneticField {
    pub fn new(tuning: &ScavengeTuning) -> Self {
        Self {
            attraction_strength: tuning.attraction_strength,
            anchor_offset: tuning.magnet_anchor,
            membership: Vec::new(),
        }
    }

    /// Junk inside the field box this frame
    pub fn membership(&self) -> &[BodyId] {
        &self.membership
    }

    /// World-space point junk is pulled toward
    pub fn anchor(&self, magnet: &MagnetStateMachine) -> Vec2 {
        magnet.position() + self.anchor_offset
    }

    /// Pull free junk toward the magnet for one frame
    pub fn update<W>(&mut self, magnet: &MagnetStateMachine, dt: f32, world: &mut W)
    where
        W: SpatialQuery + JunkLookup,
    {
        self.membership.clear();
        if !magnet.field_active() {
            return;
        }

        let anchor = self.anchor(magnet);
        let t = (self.attraction_strength * dt).clamp(0.0, 1.0);

        // An active field has no link, so the attached junk is never a member
        for junk in world.check(&magnet.field_bounds(), Vec2::ZERO, CategoryMask::JUNK) {
            let Some(pos) = world.position(junk) else {
                log::warn!("Field member {junk} missing from the world");
                continue;
            };
            if !world.set_position(junk, pos.lerp(anchor, t)) {
                log::warn!("Field member {junk} rejected its move, skipped");
                continue;
            }
            self.membership.push(junk);
        }
    }
}
