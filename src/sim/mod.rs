//! Scavenge simulation module
//!
//! The magnet retrieval core. Everything here is synchronous and runs in a
//! fixed order once per frame:
//! - Input and magnet state transitions
//! - Delivery of retrieved junk
//! - Magnetic field attraction
//! - Tether curve recompute
//!
//! The world owning the junk is reached only through the `spatial` traits.

pub mod field;
pub mod magnet;
pub mod shape;
pub mod spatial;
pub mod tether;
pub mod tick;
pub mod world;

pub use field::MagneticField;
pub use magnet::{AttachedLink, CastState, MagnetBody, MagnetInput, MagnetStateMachine, ScavengeEvent};
pub use shape::{Category, CategoryMask, Rect};
pub use spatial::{BodyId, JunkLookup, SpatialQuery};
pub use tether::{RodSegment, TetherCurve, cubic_bezier};
pub use tick::{RetrievalCoordinator, TickInput};
pub use world::{Body, JunkEntry, JunkTable, JunkWorld, MaterialRoll};
