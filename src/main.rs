//! Scrapyard Scavenge headless runner
//!
//! Plays a scripted scavenge session against a generated junk field and logs
//! what the magnet brings back. Pass a tuning JSON file path to override the
//! default magnet parameters. Set `RUST_LOG=debug` to see state transitions.

use glam::Vec2;

use scrapyard_scavenge::consts::FRAME_DT;
use scrapyard_scavenge::sim::{CastState, JunkLookup, JunkTable, JunkWorld, Rect, RetrievalCoordinator, TickInput};
use scrapyard_scavenge::{Bag, ScavengeTuning};

const SEED: u64 = 0x5C4A_9E11;
const JUNK_COUNT: usize = 40;
const CASTS: usize = 12;
/// Give up on a cast that has not come home after this many frames
const MAX_FRAMES_PER_CAST: usize = 60 * 20;

fn load_tuning() -> ScavengeTuning {
    let Some(path) = std::env::args().nth(1) else {
        return ScavengeTuning::default();
    };
    match std::fs::read_to_string(&path) {
        Ok(json) => match ScavengeTuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {path}");
                tuning
            }
            Err(err) => {
                log::warn!("Bad tuning file {path}: {err}, using defaults");
                ScavengeTuning::default()
            }
        },
        Err(err) => {
            log::warn!("Cannot read {path}: {err}, using defaults");
            ScavengeTuning::default()
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Scrapyard Scavenge (headless) starting...");

    let tuning = load_tuning();
    let root = Vec2::new(600.0, 120.0);
    let field = Rect::from_size(Vec2::new(683.0, 500.0), Vec2::new(1200.0, 420.0));
    let mut world = JunkWorld::populate(&JunkTable::default(), JUNK_COUNT, field, SEED);
    let mut bag = Bag::new();
    let mut scavenge = RetrievalCoordinator::new(tuning, root);

    // Aim at the nearest junk each cast, like a player would
    for cast in 0..CASTS {
        let tip = scavenge.tether().rest_tip();
        let Some(target) = world
            .bodies()
            .filter_map(|b| world.position(b.id))
            .min_by(|a, b| a.distance(tip).total_cmp(&b.distance(tip)))
        else {
            log::info!("Field picked clean");
            break;
        };

        let mut input = TickInput {
            pointer: Some(target),
            cast: true,
            drop: false,
        };
        for _ in 0..MAX_FRAMES_PER_CAST {
            scavenge.tick(&input, FRAME_DT, &mut world, &mut bag);
            input.cast = false;
            if matches!(scavenge.state(), CastState::Idle | CastState::Aiming) {
                break;
            }
        }
        log::info!(
            "Cast {}: {} delivered so far, {} junk left",
            cast + 1,
            scavenge.delivered(),
            world.junk_count()
        );
    }

    println!("Bag holds {} items:", bag.len());
    for item in &bag.items {
        println!("  {}", item.name);
    }
    for (material, amount) in &bag.materials {
        println!("  {material}: {amount}");
    }
}
