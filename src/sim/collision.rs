//! Player collision response and bag pickup
//!
//! Resolution is a single pass over decorative props, obstacles and then bags
//! (newest first). Each overlapping collider pushes the candidate position
//! radially out to the combined radius plus a small margin. A later push may
//! move the player back into an earlier collider; the pass is not iterated.

use glam::Vec3;

use super::bounds::clamp_to_bounds;
use super::colliders::Collider;
use super::state::{GameEvent, GameState, ParticleBurst};
use crate::consts::COLLISION_MARGIN;

/// Result of pushing a body out of one collider
#[derive(Debug, Clone, Copy)]
pub struct PushResult {
    /// Whether the body overlapped the collider
    pub hit: bool,
    /// Corrected position (unchanged if no push was applied)
    pub pos: Vec3,
}

/// Push a body of `radius` at `pos` out of `collider`
///
/// Overlap is strict. A body exactly on the collider centre has no defined
/// push direction and is left where it is.
pub fn push_out<T>(pos: Vec3, radius: f32, collider: &Collider<T>) -> PushResult {
    if !collider.overlaps(pos, radius) {
        return PushResult { hit: false, pos };
    }

    let dx = pos.x - collider.x;
    let dz = pos.z - collider.z;
    let dist = dx.hypot(dz);
    let min_dist = radius + collider.radius + COLLISION_MARGIN;

    let mut out = pos;
    if dist > 0.0 && dist < min_dist {
        let push = (min_dist - dist) / dist;
        out.x += dx * push;
        out.z += dz * push;
    }
    PushResult { hit: true, pos: out }
}

/// Resolve a desired player position against every collider
///
/// Touching an uncollected bag collects it (unless the game is already
/// complete). The result is clamped to the world boundary; height is passed
/// through untouched.
pub fn resolve_collisions(state: &mut GameState, desired: Vec3) -> Vec3 {
    let radius = state.settings.objects.player_radius;
    let mut pos = desired;

    for collider in state
        .colliders
        .decorative
        .iter()
        .chain(state.colliders.obstacles.iter())
    {
        pos = push_out(pos, radius, collider).pos;
    }

    for i in (0..state.colliders.bags.len()).rev() {
        if state.colliders.bags[i].payload.collected {
            continue;
        }

        let result = push_out(pos, radius, &state.colliders.bags[i]);
        if !result.hit {
            continue;
        }
        pos = result.pos;

        if !state.economy.completed {
            collect_bag(state, i);
        }
    }

    clamp_to_bounds(pos, state.settings.bounds_limit())
}

fn collect_bag(state: &mut GameState, index: usize) {
    let bag = &mut state.colliders.bags[index];
    bag.payload.collected = true;

    let (id, value, bonus) = (bag.id, bag.payload.value, bag.payload.bonus);
    let position = Vec3::new(bag.x, bag.payload.pose(state.time).y, bag.z);

    log::debug!("Collected bag {} worth ${}{}", id, value, if bonus { " (bonus)" } else { "" });

    state.events.push(GameEvent::BagCollected {
        bag_id: id,
        value,
        bonus,
        position,
    });
    state
        .bursts
        .push(ParticleBurst::new(position, state.settings.world_seed ^ id as u64));

    if state.economy.add_money(value as u64) {
        state.events.push(GameEvent::GameCompleted {
            total: state.economy.total_collected,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::colliders::{ColliderRegistry, MoneyBag};
    use crate::sim::test_support::small_settings;
    use crate::xz_distance;
    use proptest::prelude::*;

    fn bag(value: u32) -> MoneyBag {
        MoneyBag {
            value,
            bonus: false,
            collected: false,
            linger: BAG_LINGER,
            base_height: 0.2,
            phase_offset: 0.0,
        }
    }

    /// World with no props and no bags
    fn empty_state() -> GameState {
        let mut state = GameState::new(small_settings());
        state.pending.clear();
        state.colliders = ColliderRegistry::new();
        state
    }

    #[test]
    fn test_push_out_of_bag() {
        let mut state = empty_state();
        state.economy.completed = true;
        state.colliders.add_bag(1.0, 0.0, BAG_RADIUS, bag(500));

        let pos = resolve_collisions(&mut state, Vec3::new(0.5, 1.6, 0.0));
        let dist = xz_distance(pos, Vec3::new(1.0, 0.0, 0.0));
        assert!(dist >= PLAYER_RADIUS + BAG_RADIUS + COLLISION_MARGIN - 1e-4);
        assert!(pos.x < 0.5);
        assert_eq!(pos.y, 1.6);
    }

    #[test]
    fn test_centred_on_bag_collects_without_push() {
        let mut state = empty_state();
        state.colliders.add_bag(1.0, 0.0, BAG_RADIUS, bag(500));

        let desired = Vec3::new(1.0, 1.6, 0.0);
        let pos = resolve_collisions(&mut state, desired);
        assert_eq!(pos, desired);
        assert!(state.colliders.bags[0].payload.collected);
        assert_eq!(state.economy.total_collected, 500);
    }

    #[test]
    fn test_non_overlapping_untouched() {
        let mut state = empty_state();
        state.colliders.add_bag(1.0, 0.0, BAG_RADIUS, bag(500));
        let desired = Vec3::new(-0.5, 1.6, 0.0);
        assert_eq!(resolve_collisions(&mut state, desired), desired);
        assert!(!state.colliders.bags[0].payload.collected);
    }

    #[test]
    fn test_zero_distance_is_noop() {
        let mut reg = ColliderRegistry::new();
        reg.add_bag(3.0, 3.0, BAG_RADIUS, bag(1));
        let pos = Vec3::new(3.0, 1.0, 3.0);
        let result = push_out(pos, PLAYER_RADIUS, &reg.bags[0]);
        assert!(result.hit);
        assert_eq!(result.pos, pos);
    }

    #[test]
    fn test_pickup_is_idempotent() {
        let mut state = empty_state();
        state.colliders.add_bag(1.0, 0.0, BAG_RADIUS, bag(700));

        resolve_collisions(&mut state, Vec3::new(0.5, 1.6, 0.0));
        resolve_collisions(&mut state, Vec3::new(0.8, 1.6, 0.0));
        resolve_collisions(&mut state, Vec3::new(1.0, 1.6, 0.1));

        assert_eq!(state.economy.total_collected, 700);
        let events = state.drain_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], GameEvent::BagCollected { value: 700, .. }));
        assert_eq!(state.bursts.len(), 1);
    }

    #[test]
    fn test_collected_bag_stops_colliding() {
        let mut state = empty_state();
        state.colliders.add_bag(1.0, 0.0, BAG_RADIUS, bag(700));
        resolve_collisions(&mut state, Vec3::new(0.5, 1.6, 0.0));

        let desired = Vec3::new(1.0, 1.6, 0.2);
        assert_eq!(resolve_collisions(&mut state, desired), desired);
    }

    #[test]
    fn test_completion_fires_once() {
        let mut settings = small_settings();
        settings.economy.total_money_target = 1_000;
        let mut state = GameState::new(settings);
        state.colliders = ColliderRegistry::new();
        state.colliders.add_bag(1.0, 0.0, BAG_RADIUS, bag(600));
        state.colliders.add_bag(-1.0, 0.0, BAG_RADIUS, bag(600));
        state.colliders.add_bag(0.0, 4.0, BAG_RADIUS, bag(600));

        resolve_collisions(&mut state, Vec3::new(0.8, 1.6, 0.0));
        resolve_collisions(&mut state, Vec3::new(-0.8, 1.6, 0.0));
        assert!(state.economy.completed);

        // Post-completion contact pushes but does not collect
        let pos = resolve_collisions(&mut state, Vec3::new(0.0, 1.6, 3.8));
        assert!(xz_distance(pos, Vec3::new(0.0, 0.0, 4.0)) > PLAYER_RADIUS + BAG_RADIUS);
        assert!(!state.colliders.bags[2].payload.collected);

        let events = state.drain_events();
        let completions = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameCompleted { .. }))
            .count();
        assert_eq!(completions, 1);
        assert_eq!(state.economy.total_collected, 1_200);
    }

    #[test]
    fn test_result_clamped_to_bounds() {
        let mut state = empty_state();
        let pos = resolve_collisions(&mut state, Vec3::new(100.0, 1.6, 0.0));
        assert!((pos.x - state.settings.bounds_limit()).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_single_collider_leaves_no_overlap(
            x in -3.0f32..3.0,
            z in -3.0f32..3.0,
            r in 0.2f32..2.0,
        ) {
            let mut reg = ColliderRegistry::new();
            reg.add_bag(0.0, 0.0, r, bag(1));
            let pos = Vec3::new(x, 0.0, z);
            prop_assume!(x.hypot(z) > 1e-3);

            let result = push_out(pos, PLAYER_RADIUS, &reg.bags[0]);
            let dist = result.pos.x.hypot(result.pos.z);
            prop_assert!(dist >= PLAYER_RADIUS + r - 1e-4);
        }
    }
}
