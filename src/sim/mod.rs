//! Simulation module
//!
//! All gameplay logic lives here, free of rendering and platform code:
//! - Terrain and placements derive from seeds only
//! - The host supplies frame deltas and input, nothing else
//! - Side effects leave as [`GameEvent`]s for the presentation layer

pub mod arc;
pub mod bounds;
pub mod colliders;
pub mod collision;
pub mod economy;
pub mod locomotion;
pub mod noise;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod terrain;
pub mod tick;

pub use arc::{ArcHit, ArcParams, ControllerPose, TeleportArc, TeleportPhase, Teleporter};
pub use bounds::{clamp_to_bounds, within_radius};
pub use colliders::{AssetOutcome, Collider, ColliderRegistry, MoneyBag, ObjectModel, PendingPlacement, PropKind};
pub use collision::{push_out, resolve_collisions};
pub use economy::EconomyState;
pub use locomotion::{InputSource, KeyboardState, read_thumbstick};
pub use noise::PerlinNoise;
pub use snapshot::Snapshot;
pub use state::{GameEvent, GameState, ParticleBurst, Player};
pub use terrain::{HeightField, SurfaceSample};
pub use tick::{FrameInput, commit_teleport, tick};
