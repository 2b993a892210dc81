//! Junk world: the bodies the magnet can find
//!
//! Owns every body of a scavenge session in a table keyed by stable
//! [`BodyId`]s (iteration by id keeps queries deterministic) and answers the
//! core's spatial and lookup queries. Sessions are populated from a weighted
//! junk table with a seeded RNG.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::shape::{Category, CategoryMask, Rect};
use super::spatial::{BodyId, JunkLookup, SpatialQuery};
use crate::inventory::Item;

/// Placement attempts per junk piece before it is skipped
const SPAWN_ATTEMPTS: u32 = 8;

/// A body in the world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub rect: Rect,
    pub category: Category,
    /// Payload delivered on retrieval (junk only)
    pub item: Option<Item>,
}

/// Quantity range for one material of a junk entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialRoll {
    pub material: String,
    pub min: u32,
    pub max: u32,
}

/// One weighted row of the junk table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JunkEntry {
    pub name: String,
    pub weight: u32,
    /// Collision box size
    pub size: Vec2,
    pub materials: Vec<MaterialRoll>,
}

impl JunkEntry {
    pub fn new(name: impl Into<String>, weight: u32, size: Vec2) -> Self {
        Self {
            name: name.into(),
            weight,
            size,
            materials: Vec::new(),
        }
    }

    pub fn material(mut self, material: impl Into<String>, min: u32, max: u32) -> Self {
        self.materials.push(MaterialRoll {
            material: material.into(),
            min: min.min(max),
            max: max.max(min),
        });
        self
    }

    /// Roll material quantities into a fresh item
    pub fn roll_item<R: Rng>(&self, rng: &mut R) -> Item {
        let mut item = Item::new(self.name.clone());
        for roll in &self.materials {
            item.add_material(roll.material.clone(), rng.random_range(roll.min..=roll.max));
        }
        item
    }
}

/// Weighted table junk is drawn from at session start
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JunkTable {
    pub entries: Vec<JunkEntry>,
}

impl Default for JunkTable {
    fn default() -> Self {
        Self {
            entries: vec![
                JunkEntry::new("Tyre", 30, Vec2::new(36.0, 36.0))
                    .material("Rubber", 4, 10)
                    .material("Steel", 0, 2),
                JunkEntry::new("Car Door", 20, Vec2::new(48.0, 34.0))
                    .material("Iron", 6, 14)
                    .material("Steel", 2, 6),
                JunkEntry::new("Washing Machine", 12, Vec2::new(44.0, 44.0))
                    .material("Iron", 10, 20)
                    .material("Copper", 1, 4)
                    .material("Rubber", 1, 3),
                JunkEntry::new("Fridge", 8, Vec2::new(40.0, 56.0))
                    .material("Steel", 8, 16)
                    .material("Copper", 2, 6),
                JunkEntry::new("Engine Block", 3, Vec2::new(50.0, 40.0))
                    .material("Iron", 20, 40)
                    .material("Steel", 10, 20),
            ],
        }
    }
}

/// Every body of one scavenge session
#[derive(Debug, Clone, Default)]
pub struct JunkWorld {
    bodies: BTreeMap<BodyId, Body>,
    next_id: u32,
}

impl JunkWorld {
    pub fn new() -> Self {
        Self {
            bodies: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// World populated with `count` junk pieces drawn from `table`
    ///
    /// Deterministic for a given seed.
    pub fn populate(table: &JunkTable, count: usize, bounds: Rect, seed: u64) -> Self {
        let mut world = Self::new();
        let mut rng = Pcg32::seed_from_u64(seed);

        let weights: Vec<u32> = table.entries.iter().map(|e| e.weight).collect();
        let picker = match WeightedIndex::new(&weights) {
            Ok(picker) => picker,
            Err(err) => {
                log::warn!("Junk table unusable ({err}), spawning nothing");
                return world;
            }
        };

        for _ in 0..count {
            let entry = &table.entries[picker.sample(&mut rng)];
            let half = entry.size * 0.5;
            let lo = bounds.min() + half;
            let hi = bounds.max() - half;
            if lo.x > hi.x || lo.y > hi.y {
                log::debug!("{} does not fit in the spawn area", entry.name);
                continue;
            }

            let placed = (0..SPAWN_ATTEMPTS).find_map(|_| {
                let center = Vec2::new(rng.random_range(lo.x..=hi.x), rng.random_range(lo.y..=hi.y));
                let rect = Rect::new(center, half);
                (!world.overlaps_any(&rect)).then_some(rect)
            });

            match placed {
                Some(rect) => {
                    let item = entry.roll_item(&mut rng);
                    world.spawn_junk(rect, item);
                }
                None => log::debug!("No free spot for {}, skipped", entry.name),
            }
        }

        log::info!("Scavenge field populated with {} junk (seed {seed})", world.junk_count());
        world
    }

    fn allocate_id(&mut self) -> BodyId {
        // next_id is 0 only for a Default-constructed world
        self.next_id = self.next_id.max(1);
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a junk body carrying `item`
    pub fn spawn_junk(&mut self, rect: Rect, item: Item) -> BodyId {
        self.add_body(rect, Category::Junk, Some(item))
    }

    /// Add any body (scenery uses `item: None`)
    pub fn add_body(&mut self, rect: Rect, category: Category, item: Option<Item>) -> BodyId {
        let id = self.allocate_id();
        self.bodies.insert(
            id,
            Body {
                id,
                rect,
                category,
                item,
            },
        );
        id
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(&id)
    }

    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.bodies.values()
    }

    pub fn junk_count(&self) -> usize {
        self.bodies
            .values()
            .filter(|b| b.category == Category::Junk)
            .count()
    }

    fn overlaps_any(&self, rect: &Rect) -> bool {
        self.bodies.values().any(|b| b.rect.overlaps(rect))
    }
}

impl SpatialQuery for JunkWorld {
    fn check(&self, shape: &Rect, delta: Vec2, filter: CategoryMask) -> Vec<BodyId> {
        if filter.is_empty() {
            return Vec::new();
        }
        let swept = shape.swept(delta);
        let mut hits: Vec<(f32, BodyId)> = self
            .bodies
            .values()
            .filter(|b| filter.contains(b.category) && b.rect.overlaps(&swept))
            .filter_map(|b| shape.sweep_entry(&b.rect, delta).map(|t| (t, b.id)))
            .collect();
        // Earliest contact along the move first; ties by id
        hits.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        hits.into_iter().map(|(_, id)| id).collect()
    }
}

impl JunkLookup for JunkWorld {
    fn position(&self, id: BodyId) -> Option<Vec2> {
        self.bodies.get(&id).map(|b| b.rect.center)
    }

    fn set_position(&mut self, id: BodyId, pos: Vec2) -> bool {
        match self.bodies.get_mut(&id) {
            Some(body) => {
                body.rect.center = pos;
                true
            }
            None => false,
        }
    }

    fn remove(&mut self, id: BodyId) -> Option<Item> {
        self.bodies.remove(&id).and_then(|b| b.item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn junk(world: &mut JunkWorld, x: f32, y: f32) -> BodyId {
        world.spawn_junk(
            Rect::from_size(Vec2::new(x, y), Vec2::splat(10.0)),
            Item::new("Can").with_material("Tin", 1),
        )
    }

    #[test]
    fn test_check_sweeps_along_delta() {
        let mut world = JunkWorld::new();
        let far = junk(&mut world, 100.0, 0.0);
        let shape = Rect::from_size(Vec2::ZERO, Vec2::splat(10.0));

        assert!(world.check(&shape, Vec2::ZERO, CategoryMask::JUNK).is_empty());
        assert_eq!(world.check(&shape, Vec2::new(120.0, 0.0), CategoryMask::JUNK), vec![far]);
    }

    #[test]
    fn test_check_orders_first_touch_first() {
        let mut world = JunkWorld::new();
        let far = junk(&mut world, 60.0, 0.0);
        let near = junk(&mut world, 20.0, 0.0);
        let shape = Rect::from_size(Vec2::ZERO, Vec2::splat(10.0));

        let hits = world.check(&shape, Vec2::new(80.0, 0.0), CategoryMask::JUNK);
        assert_eq!(hits, vec![near, far]);
    }

    #[test]
    fn test_check_orders_by_contact_not_centre() {
        let mut world = JunkWorld::new();
        // Wide hulk whose near edge (x=10) comes before the small can
        let hulk = world.spawn_junk(
            Rect::from_size(Vec2::new(40.0, -4.0), Vec2::new(60.0, 10.0)),
            Item::new("Hulk"),
        );
        let can = world.spawn_junk(Rect::from_size(Vec2::new(30.0, 4.0), Vec2::splat(4.0)), Item::new("Can"));
        let shape = Rect::from_size(Vec2::ZERO, Vec2::splat(10.0));

        let hits = world.check(&shape, Vec2::new(100.0, 0.0), CategoryMask::JUNK);
        assert_eq!(hits, vec![hulk, can]);
    }

    #[test]
    fn test_check_skips_bodies_the_move_never_touches() {
        let mut world = JunkWorld::new();
        junk(&mut world, 100.0, 0.0);
        let shape = Rect::from_size(Vec2::ZERO, Vec2::splat(10.0));
        assert!(world.check(&shape, Vec2::new(100.0, 100.0), CategoryMask::JUNK).is_empty());
    }

    #[test]
    fn test_check_filters_categories() {
        let mut world = JunkWorld::new();
        let rock = world.add_body(
            Rect::from_size(Vec2::new(5.0, 0.0), Vec2::splat(10.0)),
            Category::Solid,
            None,
        );
        let shape = Rect::from_size(Vec2::ZERO, Vec2::splat(10.0));

        assert!(world.check(&shape, Vec2::ZERO, CategoryMask::JUNK).is_empty());
        assert_eq!(
            world.check(&shape, Vec2::ZERO, CategoryMask::only(Category::Solid)),
            vec![rock]
        );
        assert!(world.check(&shape, Vec2::ZERO, CategoryMask::NONE).is_empty());
    }

    #[test]
    fn test_lookup_and_remove() {
        let mut world = JunkWorld::new();
        let id = junk(&mut world, 0.0, 0.0);

        assert!(world.set_position(id, Vec2::new(3.0, 4.0)));
        assert_eq!(world.position(id), Some(Vec2::new(3.0, 4.0)));

        let item = world.remove(id);
        assert_eq!(item.map(|i| i.name), Some("Can".to_string()));
        assert_eq!(world.position(id), None);
        assert!(!world.set_position(id, Vec2::ZERO));
        assert!(world.remove(id).is_none());
    }

    #[test]
    fn test_populate_is_deterministic_and_disjoint() {
        let bounds = Rect::from_size(Vec2::new(600.0, 500.0), Vec2::new(1200.0, 400.0));
        let a = JunkWorld::populate(&JunkTable::default(), 30, bounds, 42);
        let b = JunkWorld::populate(&JunkTable::default(), 30, bounds, 42);

        assert!(a.junk_count() > 0);
        assert_eq!(a.junk_count(), b.junk_count());
        for (x, y) in a.bodies().zip(b.bodies()) {
            assert_eq!(x.rect, y.rect);
            assert_eq!(x.item, y.item);
        }

        let bodies: Vec<&Body> = a.bodies().collect();
        for (i, x) in bodies.iter().enumerate() {
            assert!(bounds.contains_point(x.rect.min()) && bounds.contains_point(x.rect.max()));
            for y in &bodies[i + 1..] {
                assert!(!x.rect.overlaps(&y.rect));
            }
        }
    }

    #[test]
    fn test_populate_rolls_materials_in_range() {
        let table = JunkTable {
            entries: vec![JunkEntry::new("Radiator", 1, Vec2::splat(20.0)).material("Copper", 3, 5)],
        };
        let bounds = Rect::from_size(Vec2::ZERO, Vec2::splat(1000.0));
        let world = JunkWorld::populate(&table, 10, bounds, 7);
        for body in world.bodies() {
            let copper = body.item.as_ref().map(|i| i.materials["Copper"]).unwrap_or(0);
            assert!((3..=5).contains(&copper));
        }
    }

    #[test]
    fn test_populate_with_empty_table() {
        let table = JunkTable { entries: Vec::new() };
        let world = JunkWorld::populate(&table, 5, Rect::from_size(Vec2::ZERO, Vec2::splat(100.0)), 1);
        assert_eq!(world.junk_count(), 0);
    }
}
