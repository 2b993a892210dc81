//! Magnet head state machine
//!
//! Owns the magnet's authoritative position and its cast/lock/retract/drop
//! cycle. At most one state transition happens per frame. A cast flies on
//! the frame it is thrown but leaves lock-on and line end to the next one; a
//! drop freezes its frame. Automatic transitions (line end, lock-on, arrival,
//! cooldown expiry) happen after that frame's motion.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::shape::{CategoryMask, Rect};
use super::spatial::{BodyId, JunkLookup, SpatialQuery};
use crate::tuning::ScavengeTuning;
use crate::{angle_to, move_towards};

/// Casting phase of the magnet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CastState {
    /// Stowed at the rod tip, no pointer
    Idle,
    /// Stowed at the rod tip, following the pointer
    Aiming,
    /// Flying out toward the cast target
    Casting,
    /// Reeling back to the rod tip, possibly carrying junk
    Retracting,
    /// Junk was dropped; the magnet reels home and lock-on waits for the drop timer
    Cooldown,
}

impl CastState {
    /// Magnet is out on the line rather than hanging at the rod tip
    pub fn is_deployed(self) -> bool {
        matches!(self, CastState::Casting | CastState::Retracting | CastState::Cooldown)
    }
}

/// Rigid link to locked-on junk
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttachedLink {
    pub junk: BodyId,
    /// Junk position minus magnet position, captured at lock-on
    pub offset: Vec2,
}

/// Something observable happened this frame (audio/UI hooks)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScavengeEvent {
    Cast { target: Vec2 },
    LockedOn { junk: BodyId },
    Dropped { junk: BodyId },
    /// Magnet got home carrying junk; the coordinator hands it over
    Retrieved { junk: BodyId },
    /// Retrieved junk reached the inventory
    Delivered { junk: BodyId, item: String },
    /// Magnet got home with nothing on it
    ReturnedEmpty,
    /// Drop timer ran out, lock-on is allowed again
    Reactivated,
}

/// Per-frame controls for the magnet
#[derive(Debug, Clone, Copy, Default)]
pub struct MagnetInput {
    /// Cursor position, if the pointer is over the play field
    pub pointer: Option<Vec2>,
    /// Cast button went down this frame
    pub cast: bool,
    /// Drop button went down this frame
    pub drop: bool,
}

/// The magnet head's physical state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MagnetBody {
    /// Centre of the collision box
    pub position: Vec2,
    pub half_extents: Vec2,
    pub field_half_extents: Vec2,
    /// Facing angle (radians)
    pub rotation: f32,
}

impl MagnetBody {
    pub fn new(position: Vec2, size: Vec2, field_radius: f32) -> Self {
        let half_extents = size.abs() * 0.5;
        Self {
            position,
            half_extents,
            field_half_extents: half_extents + Vec2::splat(field_radius),
            rotation: std::f32::consts::FRAC_PI_2,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.position, self.half_extents)
    }

    pub fn field_rect(&self) -> Rect {
        Rect::new(self.position, self.field_half_extents)
    }

    /// Unit vector the magnet faces
    pub fn facing(&self) -> Vec2 {
        Vec2::from_angle(self.rotation)
    }

    /// Where the fishing line ties on: the back of the head
    pub fn line_point(&self) -> Vec2 {
        self.position - self.facing() * self.half_extents.y
    }
}

/// Cast/attract/lock/retract/drop cycle of the magnet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MagnetStateMachine {
    body: MagnetBody,
    state: CastState,
    link: Option<AttachedLink>,
    cast_target: Vec2,
    cursor: Vec2,
    /// Seconds until lock-on is allowed again
    drop_timer: f32,
    line_length: f32,
    cast_speed: f32,
    reel_speed: f32,
    drop_reactivation_timer: f32,
    arrival_distance: f32,
    /// Junk was let go this frame
    #[serde(skip)]
    dropped_this_frame: bool,
}

impl MagnetStateMachine {
    /// New magnet stowed at `tracking` (the rod tip)
    pub fn new(tuning: &ScavengeTuning, tracking: Vec2) -> Self {
        Self {
            body: MagnetBody::new(tracking, tuning.magnet_size, tuning.field_radius),
            state: CastState::Idle,
            link: None,
            cast_target: tracking,
            cursor: tracking + Vec2::Y,
            drop_timer: 0.0,
            line_length: tuning.line_length,
            cast_speed: tuning.cast_speed,
            reel_speed: tuning.reel_speed,
            drop_reactivation_timer: tuning.drop_reactivation_timer,
            arrival_distance: tuning.retract_arrival_distance,
            dropped_this_frame: false,
        }
    }

    pub fn state(&self) -> CastState {
        self.state
    }

    pub fn body(&self) -> &MagnetBody {
        &self.body
    }

    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    pub fn rotation(&self) -> f32 {
        self.body.rotation
    }

    pub fn link(&self) -> Option<AttachedLink> {
        self.link
    }

    pub fn is_attached(&self) -> bool {
        self.link.is_some()
    }

    pub fn field_bounds(&self) -> Rect {
        self.body.field_rect()
    }

    pub fn cast_target(&self) -> Vec2 {
        self.cast_target
    }

    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    pub fn cooldown_remaining(&self) -> f32 {
        self.drop_timer
    }

    /// Lock-on is possible: nothing attached and the drop timer has run out
    pub fn can_lock(&self) -> bool {
        self.link.is_none() && self.drop_timer <= 0.0
    }

    /// Out on the line, carrying nothing: the field pulls junk in
    ///
    /// The drop timer does not switch the field off, but the frame junk is
    /// let go leaves it where it fell.
    pub fn field_active(&self) -> bool {
        self.state.is_deployed() && self.link.is_none() && !self.dropped_this_frame
    }

    /// Advance one frame
    ///
    /// `tracking` is where the magnet hangs when stowed (the rod's resting
    /// tip). Events raised this frame are appended to `events`.
    pub fn update<W>(
        &mut self,
        input: &MagnetInput,
        tracking: Vec2,
        dt: f32,
        world: &mut W,
        events: &mut Vec<ScavengeEvent>,
    ) where
        W: SpatialQuery + JunkLookup,
    {
        if let Some(pointer) = input.pointer {
            self.cursor = pointer;
        }
        self.dropped_this_frame = false;
        if self.drop_timer > 0.0 {
            self.drop_timer = (self.drop_timer - dt).max(0.0);
            if self.drop_timer <= 0.0 {
                log::debug!("Drop timer expired, lock-on re-enabled");
                events.push(ScavengeEvent::Reactivated);
            }
        }

        if input.drop && self.release(events) {
            // The dropped junk stays exactly where it was let go
        } else if input.cast && self.cast(tracking, events) {
            self.launch(dt, world);
        } else {
            match self.state {
                CastState::Idle | CastState::Aiming => self.update_stowed(input, tracking),
                CastState::Casting => self.update_casting(tracking, dt, world, events),
                CastState::Retracting => self.update_retracting(tracking, dt, world, events),
                CastState::Cooldown => self.update_cooldown(tracking, dt),
            }
        }

        self.face_look_target();
    }

    /// Release attached junk where it is and start the drop cooldown
    fn release(&mut self, events: &mut Vec<ScavengeEvent>) -> bool {
        let Some(link) = self.link.take() else {
            log::debug!("Drop ignored, nothing attached ({:?})", self.state);
            return false;
        };
        log::debug!("Dropped {}, cooldown {:.2}s", link.junk, self.drop_reactivation_timer);
        self.drop_timer = self.drop_reactivation_timer;
        self.state = CastState::Cooldown;
        self.dropped_this_frame = true;
        events.push(ScavengeEvent::Dropped { junk: link.junk });
        if self.drop_timer <= 0.0 {
            events.push(ScavengeEvent::Reactivated);
        }
        true
    }

    /// Throw the magnet toward the cursor, a full line length out
    fn cast(&mut self, tracking: Vec2, events: &mut Vec<ScavengeEvent>) -> bool {
        match self.state {
            CastState::Idle | CastState::Aiming | CastState::Cooldown => {}
            CastState::Casting | CastState::Retracting => {
                log::debug!("Cast ignored while {:?}", self.state);
                return false;
            }
        }
        let dir = (self.cursor - tracking).normalize_or_zero();
        if dir == Vec2::ZERO {
            log::debug!("Cast ignored, cursor is on the rod tip");
            return false;
        }
        if !self.state.is_deployed() {
            self.body.position = tracking;
        }
        self.cast_target = tracking + dir * self.line_length;
        self.state = CastState::Casting;
        events.push(ScavengeEvent::Cast {
            target: self.cast_target,
        });
        true
    }

    /// First frame of a cast: fly, leaving lock-on and line end to the next frame
    ///
    /// Junk already in the launch path holds the magnet back so the next
    /// frame's sweep still finds it.
    fn launch<W: SpatialQuery>(&mut self, dt: f32, world: &W) {
        let step = move_towards(self.body.position, self.cast_target, self.cast_speed * dt);
        if self.can_lock() && !world.check(&self.body.rect(), step, CategoryMask::JUNK).is_empty() {
            log::debug!("Junk in the launch path, holding for lock-on");
            return;
        }
        self.body.position += step;
    }

    fn update_stowed(&mut self, input: &MagnetInput, tracking: Vec2) {
        self.body.position = tracking;
        self.state = if input.pointer.is_some() {
            CastState::Aiming
        } else {
            CastState::Idle
        };
    }

    fn update_casting<W>(&mut self, tracking: Vec2, dt: f32, world: &mut W, events: &mut Vec<ScavengeEvent>)
    where
        W: SpatialQuery + JunkLookup,
    {
        let step = move_towards(self.body.position, self.cast_target, self.cast_speed * dt);
        let hit = if self.can_lock() {
            world
                .check(&self.body.rect(), step, CategoryMask::JUNK)
                .into_iter()
                .next()
        } else {
            None
        };
        self.body.position += step;

        if let Some(junk) = hit {
            match world.position(junk) {
                Some(junk_pos) => {
                    log::debug!("Locked onto {junk}");
                    self.link = Some(AttachedLink {
                        junk,
                        offset: junk_pos - self.body.position,
                    });
                    self.state = CastState::Retracting;
                    events.push(ScavengeEvent::LockedOn { junk });
                    return;
                }
                None => log::warn!("Spatial query returned {junk} but the world has no such body"),
            }
        }

        let reached_target = self.body.position.distance(self.cast_target) <= 1e-3;
        if reached_target || self.body.position.distance(tracking) >= self.line_length {
            self.state = CastState::Retracting;
        }
    }

    fn update_retracting<W>(&mut self, tracking: Vec2, dt: f32, world: &mut W, events: &mut Vec<ScavengeEvent>)
    where
        W: JunkLookup,
    {
        self.body.position += move_towards(self.body.position, tracking, self.reel_speed * dt);
        self.carry_attached(world);

        if self.body.position.distance(tracking) < self.arrival_distance {
            self.body.position = tracking;
            self.state = CastState::Idle;
            match self.link.take() {
                Some(link) => events.push(ScavengeEvent::Retrieved { junk: link.junk }),
                None => events.push(ScavengeEvent::ReturnedEmpty),
            }
        }
    }

    fn update_cooldown(&mut self, tracking: Vec2, dt: f32) {
        let home = self.body.position.distance(tracking) < self.arrival_distance;
        if home {
            self.body.position = tracking;
        } else {
            self.body.position += move_towards(self.body.position, tracking, self.reel_speed * dt);
        }

        if self.drop_timer <= 0.0 {
            self.state = if home {
                CastState::Idle
            } else {
                CastState::Retracting
            };
        }
    }

    /// Drag linked junk rigidly along with the magnet
    fn carry_attached<W: JunkLookup>(&mut self, world: &mut W) {
        if let Some(link) = self.link {
            if !world.set_position(link.junk, self.body.position + link.offset) {
                log::warn!("Attached {} vanished from the world, releasing link", link.junk);
                self.link = None;
            }
        }
    }

    fn face_look_target(&mut self) {
        let target = match (self.link, self.state) {
            (Some(link), _) => self.body.position + link.offset,
            (None, CastState::Casting) => self.cast_target,
            (None, _) => self.cursor,
        };
        if target.distance_squared(self.body.position) > f32::EPSILON {
            self.body.rotation = angle_to(self.body.position, target);
        }
    }
}
