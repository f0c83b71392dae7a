//! Money Run - island exploration game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain, collisions, locomotion, teleport, economy)
//! - `settings`: Data-driven world and economy configuration
//! - `web`: Browser bindings (wasm32 only)

pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use settings::Settings;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Side of the square terrain domain (world units)
    pub const SIZE: f32 = 130.0;
    /// Terrain grid segments per side
    pub const TERRAIN_RESOLUTION: u32 = 256;
    /// Largest accepted terrain grid (keeps vertex indices within u32)
    pub const MAX_TERRAIN_RESOLUTION: u32 = 4096;
    /// Vertical scale applied to the summed noise octaves
    pub const TERRAIN_MAX_HEIGHT: f32 = 0.8;
    /// Seed of the terrain permutation table
    pub const TERRAIN_SEED: u32 = 2025;
    /// Walkable world radius (boundary wall sits just outside)
    pub const RADIUS: f32 = SIZE * 0.5 - 1.0;
    /// Maximum spawn radius for money bags
    pub const BAG_AREA: f32 = 40.0;

    pub const OBJECT_COUNT: usize = 100;
    pub const BAG_COUNT: usize = 25;
    pub const OBSTACLE_COUNT: usize = 12;

    pub const PLAYER_RADIUS: f32 = 0.35;
    pub const OBJECT_RADIUS: f32 = 1.2;
    pub const BAG_RADIUS: f32 = 0.45;
    /// Extra clearance added when pushing the player out of a collider
    pub const COLLISION_MARGIN: f32 = 0.1;

    /// Camera height above the terrain surface
    pub const EYE_HEIGHT: f32 = 1.6;
    /// Player spawn position
    pub const PLAYER_SPAWN: [f32; 3] = [0.0, EYE_HEIGHT, 3.0];

    /// Forward/backward speed (units/s)
    pub const WALK_SPEED: f32 = 5.5;
    /// Sideways speed (units/s)
    pub const STRAFE_SPEED: f32 = 4.8;
    /// Radians of yaw/pitch per pixel of mouse movement
    pub const MOUSE_SENSITIVITY: f32 = 0.002;

    /// Thumbstick axes below this magnitude read as zero
    pub const STICK_DEADZONE: f32 = 0.15;
    /// Primary stick pair below this on both axes falls back to the alternate pair
    pub const STICK_FALLBACK_THRESHOLD: f32 = 0.1;

    /// Teleport arc simulation steps
    pub const ARC_STEPS: usize = 40;
    /// Largest accepted arc step budget
    pub const MAX_ARC_STEPS: usize = 1000;
    /// Teleport arc launch speed (units/s)
    pub const ARC_SPEED: f32 = 7.5;
    /// Teleport arc downward acceleration (units/s²)
    pub const ARC_GRAVITY: f32 = 9.8;
    /// Arc integration timestep
    pub const ARC_DT: f32 = 1.0 / 60.0;
    /// Steepest landing surface accepted for a teleport (degrees from vertical)
    pub const MAX_SLOPE_ANGLE: f32 = 45.0;

    pub const MIN_MONEY_PER_BAG: u32 = 500;
    pub const MAX_MONEY_PER_BAG: u32 = 1500;
    pub const BONUS_CHANCE: f64 = 0.05;
    pub const BONUS_MULTIPLIER: u32 = 5;
    pub const TOTAL_MONEY_TARGET: u64 = 50_000;
    /// Seconds between bag respawn ticks
    pub const BAG_RESPAWN_RATE: f32 = 3.0;
    /// Seconds a collected bag stays visible before removal
    pub const BAG_LINGER: f32 = 0.3;

    /// Frame delta clamp (prevents giant pushes after a hitch)
    pub const MAX_FRAME_DT: f32 = 0.05;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) in the XZ plane to a ground-level point
#[inline]
pub fn polar_to_xz(r: f32, theta: f32) -> Vec3 {
    Vec3::new(r * theta.cos(), 0.0, r * theta.sin())
}

/// Distance from the vertical axis through the origin
#[inline]
pub fn xz_length(pos: Vec3) -> f32 {
    pos.x.hypot(pos.z)
}

/// Horizontal distance between two points (ignores height)
#[inline]
pub fn xz_distance(a: Vec3, b: Vec3) -> f32 {
    (a.x - b.x).hypot(a.z - b.z)
}
