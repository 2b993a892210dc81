//! Per-frame retrieval update
//!
//! Runs the scavenge core in a fixed order every frame: input and magnet
//! transitions, delivery of retrieved junk, field attraction, then the tether
//! curve. Everything finishes before the caller draws.

use glam::Vec2;

use super::field::MagneticField;
use super::magnet::{CastState, MagnetInput, MagnetStateMachine, ScavengeEvent};
use super::shape::Rect;
use super::spatial::{BodyId, JunkLookup, SpatialQuery};
use super::tether::TetherCurve;
use crate::inventory::Inventory;
use crate::tuning::ScavengeTuning;

/// Player input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Cursor position in world space (None when off the play field)
    pub pointer: Option<Vec2>,
    /// Cast button pressed this frame
    pub cast: bool,
    /// Drop button pressed this frame
    pub drop: bool,
}

/// Wires input, the magnet, its field and the tether together
#[derive(Debug, Clone)]
pub struct RetrievalCoordinator {
    tuning: ScavengeTuning,
    magnet: MagnetStateMachine,
    field: MagneticField,
    tether: TetherCurve,
    events: Vec<ScavengeEvent>,
    frame: u64,
    delivered: u32,
}

impl RetrievalCoordinator {
    /// Start a scavenge session with the rod rooted at `root`
    pub fn new(tuning: ScavengeTuning, root: Vec2) -> Self {
        let tuning = tuning.sanitized();
        let tether = TetherCurve::new(&tuning, root);
        let magnet = MagnetStateMachine::new(&tuning, tether.rest_tip());
        let field = MagneticField::new(&tuning);
        log::info!(
            "Scavenge session started: line {:.0}, cast {:.0}, reel {:.0}, field {:.0}",
            tuning.line_length,
            tuning.cast_speed,
            tuning.reel_speed,
            tuning.field_radius
        );
        Self {
            tuning,
            magnet,
            field,
            tether,
            events: Vec::new(),
            frame: 0,
            delivered: 0,
        }
    }

    /// Advance one frame
    pub fn tick<W, I>(&mut self, input: &TickInput, dt: f32, world: &mut W, inventory: &mut I)
    where
        W: SpatialQuery + JunkLookup,
        I: Inventory,
    {
        self.events.clear();
        self.frame += 1;
        let dt = dt.max(0.0);

        let magnet_input = MagnetInput {
            pointer: input.pointer,
            cast: input.cast,
            drop: input.drop,
        };
        let before = self.magnet.state();
        self.magnet
            .update(&magnet_input, self.tether.rest_tip(), dt, world, &mut self.events);
        if self.magnet.state() != before {
            log::debug!("Frame {}: {:?} -> {:?}", self.frame, before, self.magnet.state());
        }

        self.deliver_retrieved(world, inventory);
        self.field.update(&self.magnet, dt, world);
        self.tether
            .update(self.magnet.position(), self.magnet.body().line_point());
    }

    /// Hand every junk that reached the rod this frame to the inventory
    fn deliver_retrieved<W, I>(&mut self, world: &mut W, inventory: &mut I)
    where
        W: JunkLookup,
        I: Inventory,
    {
        let retrieved: Vec<BodyId> = self
            .events
            .iter()
            .filter_map(|e| match e {
                ScavengeEvent::Retrieved { junk } => Some(*junk),
                _ => None,
            })
            .collect();

        for junk in retrieved {
            match world.remove(junk) {
                Some(item) => {
                    let name = item.name.clone();
                    inventory.deliver(item);
                    self.delivered += 1;
                    self.events.push(ScavengeEvent::Delivered { junk, item: name });
                }
                None => log::warn!("Retrieved {junk} has no payload in the world, nothing to deliver"),
            }
        }
    }

    /// Move the rod root (the player walked)
    pub fn set_tether_root(&mut self, root: Vec2) {
        self.tether.set_root(root);
    }

    pub fn magnet_position(&self) -> Vec2 {
        self.magnet.position()
    }

    pub fn field_bounds(&self) -> Rect {
        self.magnet.field_bounds()
    }

    pub fn is_attached(&self) -> bool {
        self.magnet.is_attached()
    }

    /// Rod tip the fishing line hangs from
    pub fn tether_anchor_point(&self) -> Vec2 {
        self.tether.tip()
    }

    pub fn state(&self) -> CastState {
        self.magnet.state()
    }

    pub fn magnet(&self) -> &MagnetStateMachine {
        &self.magnet
    }

    pub fn tether(&self) -> &TetherCurve {
        &self.tether
    }

    pub fn field_membership(&self) -> &[BodyId] {
        self.field.membership()
    }

    /// Events raised during the last frame
    pub fn events(&self) -> &[ScavengeEvent] {
        &self.events
    }

    pub fn tuning(&self) -> &ScavengeTuning {
        &self.tuning
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Items delivered this session
    pub fn delivered(&self) -> u32 {
        self.delivered
    }
}
