//! Item payloads and the inventory sink
//!
//! Junk carries an [`Item`]; a successful retraction hands it to an
//! [`Inventory`]. The crafting side of the game reads the material totals.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A retrieved piece of junk, broken down into raw materials
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    /// Material name -> rolled quantity
    pub materials: BTreeMap<String, u32>,
}

impl Item {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            materials: BTreeMap::new(),
        }
    }

    /// Add `amount` of a material (accumulates if already present)
    pub fn add_material(&mut self, material: impl Into<String>, amount: u32) {
        *self.materials.entry(material.into()).or_insert(0) += amount;
    }

    pub fn with_material(mut self, material: impl Into<String>, amount: u32) -> Self {
        self.add_material(material, amount);
        self
    }
}

/// Receives items delivered by the magnet
pub trait Inventory {
    fn deliver(&mut self, item: Item);
}

/// Simple inventory: every delivered item plus running material totals
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bag {
    pub items: Vec<Item>,
    pub materials: BTreeMap<String, u32>,
}

impl Bag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total quantity of a material across all delivered items
    pub fn material(&self, name: &str) -> u32 {
        self.materials.get(name).copied().unwrap_or(0)
    }

    /// Clear materials (spent at the crafting bench)
    pub fn reset_materials(&mut self) {
        self.materials.clear();
    }
}

impl Inventory for Bag {
    fn deliver(&mut self, item: Item) {
        log::info!("Adding {} to the bag", item.name);
        for (name, amount) in &item.materials {
            *self.materials.entry(name.clone()).or_insert(0) += amount;
        }
        self.items.push(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bag_totals_materials() {
        let mut bag = Bag::new();
        bag.deliver(Item::new("Fridge").with_material("Iron", 12).with_material("Rubber", 3));
        bag.deliver(Item::new("Car Door").with_material("Iron", 8));

        assert_eq!(bag.len(), 2);
        assert_eq!(bag.material("Iron"), 20);
        assert_eq!(bag.material("Rubber"), 3);
        assert_eq!(bag.material("Copper"), 0);

        bag.reset_materials();
        assert_eq!(bag.material("Iron"), 0);
        assert_eq!(bag.len(), 2);
    }

    #[test]
    fn test_item_material_accumulates() {
        let mut item = Item::new("Pipe");
        item.add_material("Steel", 2);
        item.add_material("Steel", 5);
        assert_eq!(item.materials["Steel"], 7);
    }
}
