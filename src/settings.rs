//! World, object and economy settings
//!
//! Every field defaults to the matching constant in [`crate::consts`].
//! Persisted as JSON in LocalStorage on the web; read from an optional file
//! on native.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Terrain and boundary layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    pub size: f32,
    pub terrain_resolution: u32,
    pub terrain_max_height: f32,
    /// Walkable radius around the origin
    pub radius: f32,
    /// Outer spawn radius for money bags
    pub bag_area: f32,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            size: SIZE,
            terrain_resolution: TERRAIN_RESOLUTION,
            terrain_max_height: TERRAIN_MAX_HEIGHT,
            radius: RADIUS,
            bag_area: BAG_AREA,
        }
    }
}

/// Entity counts, collision radii, movement and teleport tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectSettings {
    pub object_count: usize,
    pub bag_count: usize,
    pub obstacle_count: usize,

    pub player_radius: f32,
    pub object_radius: f32,
    pub bag_radius: f32,

    pub walk_speed: f32,
    pub strafe_speed: f32,

    pub arc_steps: usize,
    pub arc_speed: f32,
    pub arc_gravity: f32,
    /// Degrees from vertical
    pub max_slope_angle: f32,
}

impl Default for ObjectSettings {
    fn default() -> Self {
        Self {
            object_count: OBJECT_COUNT,
            bag_count: BAG_COUNT,
            obstacle_count: OBSTACLE_COUNT,
            player_radius: PLAYER_RADIUS,
            object_radius: OBJECT_RADIUS,
            bag_radius: BAG_RADIUS,
            walk_speed: WALK_SPEED,
            strafe_speed: STRAFE_SPEED,
            arc_steps: ARC_STEPS,
            arc_speed: ARC_SPEED,
            arc_gravity: ARC_GRAVITY,
            max_slope_angle: MAX_SLOPE_ANGLE,
        }
    }
}

/// Bag values and collection goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomySettings {
    pub min_money_per_bag: u32,
    pub max_money_per_bag: u32,
    pub bonus_chance: f64,
    pub bonus_multiplier: u32,
    pub total_money_target: u64,
    /// Seconds between respawn ticks
    pub bag_respawn_rate: f32,
}

impl Default for EconomySettings {
    fn default() -> Self {
        Self {
            min_money_per_bag: MIN_MONEY_PER_BAG,
            max_money_per_bag: MAX_MONEY_PER_BAG,
            bonus_chance: BONUS_CHANCE,
            bonus_multiplier: BONUS_MULTIPLIER,
            total_money_target: TOTAL_MONEY_TARGET,
            bag_respawn_rate: BAG_RESPAWN_RATE,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Permutation seed for the terrain noise
    pub terrain_seed: u32,
    /// Seed for placements and bag value rolls
    pub world_seed: u64,
    pub world: WorldSettings,
    pub objects: ObjectSettings,
    pub economy: EconomySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            terrain_seed: TERRAIN_SEED,
            world_seed: TERRAIN_SEED as u64,
            world: WorldSettings::default(),
            objects: ObjectSettings::default(),
            economy: EconomySettings::default(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Settings>(json).map(Settings::sanitized)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse settings, falling back to defaults on malformed input
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Invalid settings JSON ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Replace out-of-range values with their defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Settings::default();

        fn fix_positive(value: &mut f32, default: f32, name: &str) {
            if !(value.is_finite() && *value > 0.0) {
                log::warn!("Setting `{}` = {} is invalid, using {}", name, value, default);
                *value = default;
            }
        }

        let w = &mut self.world;
        fix_positive(&mut w.size, defaults.world.size, "world.size");
        fix_positive(&mut w.radius, defaults.world.radius, "world.radius");
        fix_positive(&mut w.bag_area, defaults.world.bag_area, "world.bag_area");
        if !w.terrain_max_height.is_finite() {
            log::warn!("Setting `world.terrain_max_height` is not finite, using default");
            w.terrain_max_height = defaults.world.terrain_max_height;
        }
        if w.terrain_resolution == 0 {
            log::warn!("Setting `world.terrain_resolution` is zero, using default");
            w.terrain_resolution = defaults.world.terrain_resolution;
        }
        if w.terrain_resolution > MAX_TERRAIN_RESOLUTION {
            log::warn!(
                "Setting `world.terrain_resolution` = {} is too large, clamping to {}",
                w.terrain_resolution,
                MAX_TERRAIN_RESOLUTION
            );
            w.terrain_resolution = MAX_TERRAIN_RESOLUTION;
        }
        if w.bag_area < 8.0 {
            log::warn!("Setting `world.bag_area` = {} is below the 8 unit respawn ring", w.bag_area);
            w.bag_area = 8.0;
        }

        let o = &mut self.objects;
        let d = &defaults.objects;
        fix_positive(&mut o.player_radius, d.player_radius, "objects.player_radius");
        fix_positive(&mut o.object_radius, d.object_radius, "objects.object_radius");
        fix_positive(&mut o.bag_radius, d.bag_radius, "objects.bag_radius");
        fix_positive(&mut o.walk_speed, d.walk_speed, "objects.walk_speed");
        fix_positive(&mut o.strafe_speed, d.strafe_speed, "objects.strafe_speed");
        fix_positive(&mut o.arc_speed, d.arc_speed, "objects.arc_speed");
        fix_positive(&mut o.arc_gravity, d.arc_gravity, "objects.arc_gravity");
        fix_positive(&mut o.max_slope_angle, d.max_slope_angle, "objects.max_slope_angle");
        if o.arc_steps == 0 {
            log::warn!("Setting `objects.arc_steps` is zero, using default");
            o.arc_steps = d.arc_steps;
        }
        if o.arc_steps > MAX_ARC_STEPS {
            log::warn!(
                "Setting `objects.arc_steps` = {} is too large, clamping to {}",
                o.arc_steps,
                MAX_ARC_STEPS
            );
            o.arc_steps = MAX_ARC_STEPS;
        }
        if o.player_radius >= self.world.radius {
            log::warn!("Player radius does not fit inside the world, using defaults");
            o.player_radius = d.player_radius;
            self.world.radius = defaults.world.radius;
        }

        let e = &mut self.economy;
        let d = &defaults.economy;
        if e.min_money_per_bag > e.max_money_per_bag {
            log::warn!(
                "Money range {}..={} is inverted, swapping",
                e.min_money_per_bag,
                e.max_money_per_bag
            );
            std::mem::swap(&mut e.min_money_per_bag, &mut e.max_money_per_bag);
        }
        if !(0.0..=1.0).contains(&e.bonus_chance) {
            log::warn!("Setting `economy.bonus_chance` = {} out of range", e.bonus_chance);
            e.bonus_chance = e.bonus_chance.clamp(0.0, 1.0);
            if e.bonus_chance.is_nan() {
                e.bonus_chance = d.bonus_chance;
            }
        }
        fix_positive(&mut e.bag_respawn_rate, d.bag_respawn_rate, "economy.bag_respawn_rate");

        self
    }

    /// Radius the player's centre may reach before the boundary clamp applies
    pub fn bounds_limit(&self) -> f32 {
        self.world.radius - self.objects.player_radius
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "money_run_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json_or_default(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Load settings from an optional JSON file (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: Option<&std::path::Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(json) => {
                log::info!("Loaded settings from {}", path.display());
                Self::from_json_or_default(&json)
            }
            Err(e) => {
                log::warn!("Could not read {} ({}), using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}
