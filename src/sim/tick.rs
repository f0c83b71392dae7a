//! Per-frame simulation tick
//!
//! The host calls [`tick`] once per rendered frame with the wall-clock delta.
//! Movement and particles use the clamped delta; bag linger and the respawn
//! timer run on the raw delta so they track real time across hitches.

use glam::{Vec2, Vec3};

use super::arc::{ArcParams, ControllerPose};
use super::bounds::clamp_to_bounds;
use super::locomotion::{InputSource, KeyboardState, step_keyboard, step_vr};
use super::spawn::respawn_bags;
use super::state::GameState;
use crate::consts::MAX_FRAME_DT;

/// Input gathered by the host for a single frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// An immersive VR session is active
    pub presenting: bool,
    pub keys: KeyboardState,
    pub pointer_locked: bool,
    /// Mouse movement since the last frame (pixels)
    pub mouse_delta: Vec2,
    /// VR input sources in session order
    pub sources: Vec<InputSource>,
    /// Headset view direction (VR only)
    pub view_forward: Vec3,
    /// Teleport controller pose, if tracked
    pub controller: Option<ControllerPose>,
    /// Teleport trigger pressed this frame
    pub select_start: bool,
    /// Teleport trigger released this frame
    pub select_end: bool,
}

/// Advance the game by one frame
pub fn tick(state: &mut GameState, input: &FrameInput, raw_dt: f32) {
    let raw_dt = if raw_dt.is_finite() { raw_dt.max(0.0) } else { 0.0 };
    let dt = raw_dt.min(MAX_FRAME_DT);

    if input.presenting {
        if input.select_start {
            state.teleport.begin_aim();
        }
        if input.select_end {
            if let Some(target) = state.teleport.end_aim() {
                commit_teleport(state, target);
            }
        }

        step_vr(state, &input.sources, input.view_forward, dt);

        if let Some(pose) = input.controller {
            let params = ArcParams::from_settings(&state.settings);
            state.teleport.update(&state.terrain, pose, &params);
        }
    } else {
        if input.pointer_locked {
            state.player.look(input.mouse_delta.x, input.mouse_delta.y);
        }
        if state.teleport.arc_visible() {
            state.teleport.cancel();
        }
        step_keyboard(state, &input.keys, dt);
    }

    state.colliders.expire_collected_bags(raw_dt);

    for burst in &mut state.bursts {
        burst.update(dt);
    }
    state.bursts.retain(|b| !b.expired());

    // At most one respawn per frame; the deficit is re-measured each time
    state.respawn_timer += raw_dt;
    let rate = state.settings.economy.bag_respawn_rate;
    if state.respawn_timer >= rate {
        state.respawn_timer %= rate;
        respawn_bags(state);
    }

    state.time += raw_dt;
    state.frame += 1;
}

/// Move the player to a teleport landing point
///
/// The point is clamped to the boundary and the eye snapped to the terrain.
/// Colliders are not consulted.
pub fn commit_teleport(state: &mut GameState, target: Vec3) {
    let mut pos = clamp_to_bounds(target, state.settings.bounds_limit());
    pos.y = state.eye_height_at(pos.x, pos.z);
    log::debug!("Teleport to ({:.2}, {:.2})", pos.x, pos.z);
    state.player.pos = pos;
}
