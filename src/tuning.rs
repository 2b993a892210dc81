//! Data-driven magnet and rod parameters
//!
//! Base values come from [`crate::consts`]; equipped key items add named
//! modifiers on top. Tuning can be loaded from JSON (missing fields fall back
//! to defaults).

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Equipment slot a key item occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum KeyItemSlot {
    Reel,
    Rod,
    Line,
    Magnet,
    Boots,
    Electromagnet,
    Repulsor,
}

impl KeyItemSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyItemSlot::Reel => "Reel",
            KeyItemSlot::Rod => "Rod",
            KeyItemSlot::Line => "Line",
            KeyItemSlot::Magnet => "Magnet",
            KeyItemSlot::Boots => "Boots",
            KeyItemSlot::Electromagnet => "Electromagnet",
            KeyItemSlot::Repulsor => "Repulsor",
        }
    }
}

/// What a key item's modifier adjusts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModifierKind {
    CastSpeed,
    ReelSpeed,
    LineLength,
    FieldSize,
    AttractionStrength,
    DropTimer,
    MoveSpeed,
    /// Carried for the electromagnet slot; no magnet behaviour reads it yet
    ElectromagnetHold,
    /// Carried for the repulsor slot; no magnet behaviour reads it yet
    RepulsorForce,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyItemModifier {
    pub kind: ModifierKind,
    pub value: f32,
}

/// A crafted piece of equipment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyItem {
    pub name: String,
    pub slot: KeyItemSlot,
    pub modifier: KeyItemModifier,
}

impl KeyItem {
    pub fn new(name: impl Into<String>, slot: KeyItemSlot, kind: ModifierKind, value: f32) -> Self {
        Self {
            name: name.into(),
            slot,
            modifier: KeyItemModifier { kind, value },
        }
    }
}

/// Key items currently equipped, one per slot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Loadout {
    equipped: BTreeMap<KeyItemSlot, KeyItem>,
}

impl Loadout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Equip an item, returning whatever occupied its slot
    pub fn equip(&mut self, item: KeyItem) -> Option<KeyItem> {
        log::debug!("Equipping {} in {} slot", item.name, item.slot.as_str());
        self.equipped.insert(item.slot, item)
    }

    pub fn equipped(&self, slot: KeyItemSlot) -> Option<&KeyItem> {
        self.equipped.get(&slot)
    }

    pub fn is_occupied(&self, slot: KeyItemSlot) -> bool {
        self.equipped.contains_key(&slot)
    }

    /// Sum of all equipped modifiers of one kind
    pub fn modifier_total(&self, kind: ModifierKind) -> f32 {
        self.equipped
            .values()
            .filter(|item| item.modifier.kind == kind)
            .map(|item| item.modifier.value)
            .sum()
    }

    pub fn has_electromagnet(&self) -> bool {
        self.is_occupied(KeyItemSlot::Electromagnet)
    }

    pub fn has_repulsor(&self) -> bool {
        self.is_occupied(KeyItemSlot::Repulsor)
    }
}

/// Tether rod shape parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RodTuning {
    /// Resting tip position relative to the rod root
    pub tip_offset: Vec2,
    /// Bézier samples per frame
    pub resolution: usize,
    /// Number of line polyline points taken from the samples
    pub line_resolution: usize,
    pub base_flex: f32,
    /// Direction of the root control point (radians)
    pub base_angle: f32,
    pub tip_flex: f32,
    pub tip_max_slop: f32,
    /// Rod segments are never longer than the sprite they are drawn with
    pub sprite_width: f32,
    pub line_offset: f32,
}

impl Default for RodTuning {
    fn default() -> Self {
        Self {
            tip_offset: ROD_TIP_OFFSET,
            resolution: ROD_RESOLUTION,
            line_resolution: LINE_RESOLUTION,
            base_flex: ROD_BASE_FLEX,
            base_angle: ROD_BASE_ANGLE,
            tip_flex: ROD_TIP_FLEX,
            tip_max_slop: ROD_TIP_MAX_SLOP,
            sprite_width: ROD_SPRITE_WIDTH,
            line_offset: LINE_OFFSET,
        }
    }
}

/// Everything the retrieval core needs to know about the player's gear
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScavengeTuning {
    pub line_length: f32,
    pub cast_speed: f32,
    pub reel_speed: f32,
    /// Field box extends this far past the magnet body on every side
    pub field_radius: f32,
    pub attraction_strength: f32,
    pub drop_reactivation_timer: f32,
    pub retract_arrival_distance: f32,
    /// Magnet collision box size
    pub magnet_size: Vec2,
    /// Attraction point relative to the magnet centre
    pub magnet_anchor: Vec2,
    pub rod: RodTuning,
}

impl Default for ScavengeTuning {
    fn default() -> Self {
        Self {
            line_length: LINE_LENGTH,
            cast_speed: MAGNET_CAST_SPEED,
            reel_speed: MAGNET_REEL_SPEED,
            field_radius: MAGNETIC_FIELD_SIZE,
            attraction_strength: ATTRACTION_STRENGTH,
            drop_reactivation_timer: DROP_REACTIVATION_TIMER,
            retract_arrival_distance: RETRACT_ARRIVAL_DISTANCE,
            magnet_size: MAGNET_SIZE,
            magnet_anchor: MAGNET_ANCHOR,
            rod: RodTuning::default(),
        }
    }
}

impl ScavengeTuning {
    /// Parse tuning from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Self = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Apply the loadout's modifiers on top of these values
    pub fn with_loadout(&self, loadout: &Loadout) -> Self {
        let mut tuning = self.clone();
        tuning.cast_speed += loadout.modifier_total(ModifierKind::CastSpeed);
        tuning.reel_speed += loadout.modifier_total(ModifierKind::ReelSpeed);
        tuning.line_length += loadout.modifier_total(ModifierKind::LineLength);
        tuning.field_radius += loadout.modifier_total(ModifierKind::FieldSize);
        tuning.attraction_strength += loadout.modifier_total(ModifierKind::AttractionStrength);
        tuning.drop_reactivation_timer += loadout.modifier_total(ModifierKind::DropTimer);
        tuning.sanitized()
    }

    /// Clamp values into ranges the simulation can run with
    pub fn sanitized(mut self) -> Self {
        self.line_length = self.line_length.max(0.0);
        self.cast_speed = self.cast_speed.max(0.0);
        self.reel_speed = self.reel_speed.max(0.0);
        self.field_radius = self.field_radius.max(0.0);
        self.attraction_strength = self.attraction_strength.max(0.0);
        self.drop_reactivation_timer = self.drop_reactivation_timer.max(0.0);
        self.retract_arrival_distance = self.retract_arrival_distance.max(0.0);
        self.magnet_size = self.magnet_size.abs();
        self.rod.resolution = self.rod.resolution.max(1);
        self.rod.line_resolution = self.rod.line_resolution.clamp(1, self.rod.resolution);
        self.rod.tip_max_slop = self.rod.tip_max_slop.max(0.0);
        self.rod.sprite_width = self.rod.sprite_width.max(1.0);
        self
    }
}
