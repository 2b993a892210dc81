//! Scrapyard Scavenge - magnet retrieval core of a junk-collecting game
//!
//! Core modules:
//! - `sim`: Frame simulation (magnet state machine, magnetic field, tether curve)
//! - `inventory`: Item payloads and the delivery sink
//! - `tuning`: Data-driven magnet/rod parameters and key-item modifiers

pub mod inventory;
pub mod sim;
pub mod tuning;

pub use inventory::{Bag, Inventory, Item};
pub use tuning::{KeyItem, KeyItemModifier, KeyItemSlot, Loadout, ModifierKind, ScavengeTuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Reference frame step used by the demo and tests (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Magnet defaults (base values before key-item modifiers)
    pub const LINE_LENGTH: f32 = 400.0;
    pub const MAGNET_CAST_SPEED: f32 = 350.0;
    pub const MAGNET_REEL_SPEED: f32 = 400.0;
    pub const MAGNETIC_FIELD_SIZE: f32 = 100.0;
    pub const ATTRACTION_STRENGTH: f32 = 1.0;
    /// Seconds a dropped magnet refuses to lock onto anything
    pub const DROP_REACTIVATION_TIMER: f32 = 1.0;
    /// Retraction resolves once the magnet is this close to the rod tip
    pub const RETRACT_ARRIVAL_DISTANCE: f32 = 5.0;

    /// Magnet body (collision box is smaller than the 64px sprite)
    pub const MAGNET_SIZE: Vec2 = Vec2::new(44.0, 44.0);
    /// Attraction point relative to the magnet centre (its pole face)
    pub const MAGNET_ANCHOR: Vec2 = Vec2::new(-12.0, 12.0);

    /// Rod geometry, relative to the player's rod root
    pub const ROD_TIP_OFFSET: Vec2 = Vec2::new(118.0, -29.0);
    pub const ROD_RESOLUTION: usize = 20;
    pub const LINE_RESOLUTION: usize = 5;
    pub const ROD_BASE_FLEX: f32 = 75.0;
    pub const ROD_BASE_ANGLE: f32 = -std::f32::consts::FRAC_PI_4;
    pub const ROD_TIP_FLEX: f32 = 25.0;
    pub const ROD_TIP_MAX_SLOP: f32 = 5.0;
    pub const ROD_SPRITE_WIDTH: f32 = 16.0;
    /// Line hangs this far below the rod sprite's centreline
    pub const LINE_OFFSET: f32 = 4.0;
}

/// Step of at most `max_step` from `from` toward `to` (never overshoots)
///
/// A zero-length direction yields no movement.
#[inline]
pub fn move_towards(from: Vec2, to: Vec2, max_step: f32) -> Vec2 {
    let delta = to - from;
    let dist = delta.length();
    if dist <= f32::EPSILON || max_step <= 0.0 {
        return Vec2::ZERO;
    }
    delta / dist * max_step.min(dist)
}

/// Facing angle from `from` looking at `target`
#[inline]
pub fn angle_to(from: Vec2, target: Vec2) -> f32 {
    let d = target - from;
    d.y.atan2(d.x)
}

/// Rotate `point` around `pivot` by `angle` radians
#[inline]
pub fn rotate_around(point: Vec2, pivot: Vec2, angle: f32) -> Vec2 {
    pivot + Vec2::from_angle(angle).rotate(point - pivot)
}
