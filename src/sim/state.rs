//! Game state and core simulation types
//!
//! Everything the frame tick mutates lives in [`GameState`]; subsystems take
//! it by reference instead of reaching for globals.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arc::Teleporter;
use super::colliders::{AssetOutcome, ColliderRegistry, PendingPlacement};
use super::economy::EconomyState;
use super::noise::PerlinNoise;
use super::spawn;
use super::terrain::HeightField;
use crate::consts::*;
use crate::normalize_angle;
use crate::settings::Settings;

/// The player rig (camera parent)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Eye position
    pub pos: Vec3,
    /// Rotation about +Y (radians)
    pub yaw: f32,
    /// Camera pitch (radians, positive looks up)
    pub pitch: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec3::from_array(PLAYER_SPAWN),
            yaw: 0.0,
            pitch: 0.0,
        }
    }
}

impl Player {
    /// Horizontal facing direction (-Z at zero yaw)
    pub fn forward(&self) -> Vec3 {
        Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    /// Apply a mouse movement in pixels
    pub fn look(&mut self, dx: f32, dy: f32) {
        let limit = std::f32::consts::FRAC_PI_2 - 0.1;
        self.yaw = normalize_angle(self.yaw - dx * MOUSE_SENSITIVITY);
        self.pitch = (self.pitch - dy * MOUSE_SENSITIVITY).clamp(-limit, limit);
    }
}

/// Side effects for the presentation layer (audio, particles, HUD)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Emitted exactly once per bag, at the moment of collection
    BagCollected {
        bag_id: u32,
        value: u32,
        bonus: bool,
        position: Vec3,
    },
    /// Emitted exactly once, when the total first reaches the target
    GameCompleted { total: u64 },
}

/// Lifetime of a pickup particle burst (seconds)
pub const BURST_LIFETIME: f32 = 2.2;
/// Particles per pickup burst
pub const BURST_PARTICLES: usize = 120;
/// Downward acceleration on burst particles
const BURST_GRAVITY: f32 = 7.5;

/// A single pickup particle
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec3,
    pub vel: Vec3,
    /// Hue in [0, 1] (greens)
    pub hue: f32,
}

/// Particles spawned by one pickup (visual only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleBurst {
    pub age: f32,
    pub particles: Vec<Particle>,
}

impl ParticleBurst {
    /// Burst at `origin`, seeded so it never touches the gameplay RNG
    pub fn new(origin: Vec3, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let particles = (0..BURST_PARTICLES)
            .map(|_| {
                let dir = Vec3::new(
                    (rng.random::<f32>() - 0.5) * 1.5,
                    rng.random::<f32>() * 1.6,
                    (rng.random::<f32>() - 0.5) * 1.5,
                );
                let speed = 2.0 + rng.random::<f32>() * 3.0;
                Particle {
                    pos: origin,
                    vel: dir * speed,
                    hue: 0.33 + rng.random::<f32>() * 0.1,
                }
            })
            .collect();
        Self { age: 0.0, particles }
    }

    pub fn update(&mut self, dt: f32) {
        self.age += dt;
        for p in &mut self.particles {
            p.vel.y -= BURST_GRAVITY * dt;
            p.pos += p.vel * dt;
        }
    }

    pub fn opacity(&self) -> f32 {
        (1.0 - self.age / BURST_LIFETIME).max(0.0)
    }

    pub fn expired(&self) -> bool {
        self.age > BURST_LIFETIME
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    /// Placement and money-roll RNG
    pub rng: Pcg32,
    pub terrain: HeightField,
    pub player: Player,
    pub colliders: ColliderRegistry,
    pub economy: EconomyState,
    pub teleport: Teleporter,
    /// Props whose assets have not resolved yet
    pub pending: Vec<PendingPlacement>,
    pub bursts: Vec<ParticleBurst>,
    /// Undrained side effects, oldest first
    pub events: Vec<GameEvent>,
    /// Seconds since the session started (wall clock)
    pub time: f32,
    /// Seconds accumulated toward the next respawn tick
    pub respawn_timer: f32,
    /// Frames ticked
    pub frame: u64,
}

impl GameState {
    /// Build the world: terrain, prop placements and the initial bags
    pub fn new(settings: Settings) -> Self {
        let settings = settings.sanitized();
        let noise = PerlinNoise::new(settings.terrain_seed);
        let terrain = HeightField::generate(
            &noise,
            settings.world.size,
            settings.world.terrain_resolution,
            settings.world.terrain_max_height,
        );

        let mut state = Self {
            rng: Pcg32::seed_from_u64(settings.world_seed),
            economy: EconomyState::new(settings.economy.total_money_target),
            settings,
            terrain,
            player: Player::default(),
            colliders: ColliderRegistry::new(),
            teleport: Teleporter::default(),
            pending: Vec::new(),
            bursts: Vec::new(),
            events: Vec::new(),
            time: 0.0,
            respawn_timer: 0.0,
            frame: 0,
        };

        spawn::plan_props(&mut state);
        spawn::spawn_initial_bags(&mut state);
        log::info!(
            "World ready: {} pending props, {} bags, target ${}",
            state.pending.len(),
            state.colliders.bag_count(),
            state.economy.target
        );

        state
    }

    /// Register one pending prop with its resolved asset outcome
    pub fn resolve_placement(&mut self, id: u32, outcome: AssetOutcome) -> bool {
        let Some(idx) = self.pending.iter().position(|p| p.id == id) else {
            log::warn!("No pending placement with id {}", id);
            return false;
        };
        let placement = self.pending.remove(idx);
        if outcome == AssetOutcome::Failed {
            log::warn!(
                "Model {} failed to load, using fallback for prop {}",
                placement.model.asset_path(),
                id
            );
        }
        self.colliders
            .register_prop(&placement, outcome, self.settings.objects.object_radius);
        true
    }

    /// Register every pending prop as loaded (headless sessions)
    pub fn resolve_all_loaded(&mut self) {
        let ids: Vec<u32> = self.pending.iter().map(|p| p.id).collect();
        for id in ids {
            self.resolve_placement(id, AssetOutcome::Loaded);
        }
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Terrain elevation under (x, z), 0 off the mesh
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        self.terrain.height_at(x, z)
    }

    /// Eye height for a player standing at (x, z)
    pub fn eye_height_at(&self, x: f32, z: f32) -> f32 {
        self.height_at(x, z) + EYE_HEIGHT
    }
}
