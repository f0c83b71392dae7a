//! World population: prop placements, bag spawning and respawn

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use super::colliders::{MoneyBag, ObjectModel, PendingPlacement, PropKind};
use super::state::GameState;
use crate::consts::BAG_LINGER;
use crate::settings::EconomySettings;
use crate::{polar_to_xz, xz_distance};

/// Props closer than this to the player spawn are relocated
const SPAWN_CLEAR_RADIUS: f32 = 6.0;
/// Respawned bags closer than this to the player are skipped
const RESPAWN_MIN_PLAYER_DISTANCE: f32 = 5.0;
/// Inner radius of the respawn ring
const RESPAWN_INNER_RADIUS: f32 = 8.0;
/// Bags hover this far above the ground
const BAG_HOVER: f32 = 0.2;

/// Roll a bag value: uniform base, occasionally multiplied as a bonus
pub fn roll_money<R: Rng>(rng: &mut R, economy: &EconomySettings) -> (u32, bool) {
    let base = rng.random_range(economy.min_money_per_bag..=economy.max_money_per_bag);
    let bonus = rng.random_bool(economy.bonus_chance);
    if bonus {
        (base.saturating_mul(economy.bonus_multiplier), true)
    } else {
        (base, false)
    }
}

/// Plan decorative props and obstacles; colliders register once assets resolve
pub fn plan_props(state: &mut GameState) {
    let size = state.settings.world.size;
    let spawn = state.player.pos;

    for _ in 0..state.settings.objects.object_count {
        let mut x = (state.rng.random::<f32>() - 0.5) * size;
        let mut z = (state.rng.random::<f32>() - 0.5) * size;

        if xz_distance(Vec3::new(x, 0.0, z), spawn) < SPAWN_CLEAR_RADIUS {
            let angle = state.rng.random::<f32>() * TAU;
            let radius = 8.0 + state.rng.random::<f32>() * 20.0;
            x = spawn.x + angle.cos() * radius;
            z = spawn.z + angle.sin() * radius;
        }

        push_placement(state, PropKind::Decorative, x, z);
    }

    let count = state.settings.objects.obstacle_count;
    for i in 0..count {
        let angle = (i as f32 / count as f32) * TAU + state.rng.random::<f32>() * 0.4;
        let radius = 15.0 + state.rng.random::<f32>() * 60.0;
        let p = polar_to_xz(radius, angle);
        push_placement(state, PropKind::Obstacle, p.x, p.z);
    }

    log::debug!("Planned {} prop placements", state.pending.len());
}

fn push_placement(state: &mut GameState, kind: PropKind, x: f32, z: f32) {
    let model = ObjectModel::ALL[state.rng.random_range(0..ObjectModel::ALL.len())];
    let yaw = state.rng.random::<f32>() * TAU;
    let placement = PendingPlacement {
        id: state.colliders.next_entity_id(),
        kind,
        x,
        z,
        ground_height: state.terrain.height_at(x, z),
        model,
        yaw,
    };
    state.pending.push(placement);
}

/// Place a new bag at (x, z) with a freshly rolled value
pub fn add_money_bag(state: &mut GameState, x: f32, z: f32) -> u32 {
    let (value, bonus) = roll_money(&mut state.rng, &state.settings.economy);
    let bag = MoneyBag {
        value,
        bonus,
        collected: false,
        linger: BAG_LINGER,
        base_height: state.terrain.height_at(x, z) + BAG_HOVER,
        phase_offset: x * 0.1,
    };
    let radius = state.settings.objects.bag_radius;
    state.colliders.add_bag(x, z, radius, bag)
}

/// Initial bags, evenly spread in angle
pub fn spawn_initial_bags(state: &mut GameState) {
    let count = state.settings.objects.bag_count;
    let area = state.settings.world.bag_area;
    for i in 0..count {
        let angle = (i as f32 / count as f32) * TAU;
        let radius = 10.0 + state.rng.random::<f32>() * area;
        let p = polar_to_xz(radius, angle);
        add_money_bag(state, p.x, p.z);
    }
}

/// Periodic respawn tick: top the bag collection back up to the configured count.
///
/// Slots that land too close to the player are skipped until the next tick.
/// Returns the number of bags spawned.
pub fn respawn_bags(state: &mut GameState) -> usize {
    if state.economy.completed {
        return 0;
    }

    let deficit = state
        .settings
        .objects
        .bag_count
        .saturating_sub(state.colliders.bag_count());
    let area = state.settings.world.bag_area;

    let mut spawned = 0;
    for _ in 0..deficit {
        let angle = state.rng.random::<f32>() * TAU;
        let radius = RESPAWN_INNER_RADIUS + state.rng.random::<f32>() * (area - RESPAWN_INNER_RADIUS);
        let p = polar_to_xz(radius, angle);

        if xz_distance(p, state.player.pos) > RESPAWN_MIN_PLAYER_DISTANCE {
            add_money_bag(state, p.x, p.z);
            spawned += 1;
        }
    }

    if deficit > 0 {
        log::debug!(
            "Respawn tick: {} missing, {} spawned, {} skipped",
            deficit,
            spawned,
            deficit - spawned
        );
    }
    spawned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::test_support::small_settings;
    use crate::xz_length;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_roll_money_range() {
        let mut rng = Pcg32::seed_from_u64(1);
        let economy = EconomySettings::default();
        let mut saw_bonus = false;
        for _ in 0..5_000 {
            let (value, bonus) = roll_money(&mut rng, &economy);
            if bonus {
                saw_bonus = true;
                assert!(value >= MIN_MONEY_PER_BAG * BONUS_MULTIPLIER);
                assert!(value <= MAX_MONEY_PER_BAG * BONUS_MULTIPLIER);
                assert_eq!(value % BONUS_MULTIPLIER, 0);
            } else {
                assert!((MIN_MONEY_PER_BAG..=MAX_MONEY_PER_BAG).contains(&value));
            }
        }
        assert!(saw_bonus, "5% bonus should appear in 5000 rolls");
    }

    #[test]
    fn test_no_bonus_when_chance_zero() {
        let mut rng = Pcg32::seed_from_u64(9);
        let economy = EconomySettings {
            bonus_chance: 0.0,
            ..Default::default()
        };
        assert!((0..1_000).all(|_| !roll_money(&mut rng, &economy).1));
    }

    #[test]
    fn test_props_clear_of_spawn() {
        let state = GameState::new(small_settings());
        let spawn = state.player.pos;
        for p in &state.pending {
            if p.kind == PropKind::Decorative {
                assert!(xz_distance(Vec3::new(p.x, 0.0, p.z), spawn) >= SPAWN_CLEAR_RADIUS - 1e-3);
            }
            assert_eq!(p.ground_height, state.terrain.height_at(p.x, p.z));
        }
    }

    #[test]
    fn test_initial_bags_ring() {
        let state = GameState::new(small_settings());
        for bag in &state.colliders.bags {
            let r = xz_length(Vec3::new(bag.x, 0.0, bag.z));
            assert!(r >= 10.0 - 1e-3 && r <= 10.0 + BAG_AREA + 1e-3);
            assert_eq!(bag.radius, BAG_RADIUS);
            assert!((bag.payload.phase_offset - bag.x * 0.1).abs() < 1e-6);
        }
    }

    #[test]
    fn test_respawn_fills_deficit() {
        let mut state = GameState::new(small_settings());
        state.colliders.bags.truncate(20);
        // Every respawn slot is at least 8 from the centre
        state.player.pos = Vec3::new(0.0, 1.6, 0.0);
        let spawned = respawn_bags(&mut state);
        assert_eq!(spawned, 5);
        assert_eq!(state.colliders.bag_count(), BAG_COUNT);
        for bag in &state.colliders.bags[20..] {
            let r = xz_length(Vec3::new(bag.x, 0.0, bag.z));
            assert!(r >= 8.0 - 1e-3 && r <= BAG_AREA + 1e-3);
        }
    }

    #[test]
    fn test_respawn_no_negative_deficit() {
        let mut state = GameState::new(small_settings());
        let extra = state.colliders.bags[0].payload.clone();
        state.colliders.add_bag(1.0, 1.0, BAG_RADIUS, extra);
        assert_eq!(respawn_bags(&mut state), 0);
        assert_eq!(state.colliders.bag_count(), BAG_COUNT + 1);
    }

    #[test]
    fn test_respawn_skipped_after_completion() {
        let mut state = GameState::new(small_settings());
        state.colliders.bags.clear();
        state.economy.completed = true;
        assert_eq!(respawn_bags(&mut state), 0);
        assert_eq!(state.colliders.bag_count(), 0);
    }

    #[test]
    fn test_respawn_skips_slots_near_player() {
        let mut settings = small_settings();
        // Ring of radius 8..9 around the origin; player sits on it
        settings.world.bag_area = 9.0;
        let mut state = GameState::new(settings);
        state.colliders.bags.clear();
        state.player.pos = Vec3::new(8.5, 1.6, 0.0);
        let spawned = respawn_bags(&mut state);
        assert_eq!(state.colliders.bag_count(), spawned);
        for bag in &state.colliders.bags {
            assert!(xz_distance(Vec3::new(bag.x, 0.0, bag.z), state.player.pos) > 5.0);
        }
    }
}
