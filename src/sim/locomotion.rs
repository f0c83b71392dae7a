//! Smooth locomotion from the keyboard and VR thumbsticks
//!
//! Every movement step runs the same pipeline: offset along the horizontal
//! view basis, clamp to the world boundary, snap the eye to the terrain, then
//! resolve collisions.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::bounds::clamp_to_bounds;
use super::collision::resolve_collisions;
use super::state::GameState;
use crate::consts::{STICK_DEADZONE, STICK_FALLBACK_THRESHOLD};

/// Held movement keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardState {
    pub key_w: bool,
    pub key_a: bool,
    pub key_s: bool,
    pub key_d: bool,
    pub arrow_up: bool,
    pub arrow_left: bool,
    pub arrow_down: bool,
    pub arrow_right: bool,
}

impl KeyboardState {
    /// Update from a DOM `KeyboardEvent.code`. Returns false for unmapped keys.
    pub fn set_key(&mut self, code: &str, down: bool) -> bool {
        let slot = match code {
            "KeyW" => &mut self.key_w,
            "KeyA" => &mut self.key_a,
            "KeyS" => &mut self.key_s,
            "KeyD" => &mut self.key_d,
            "ArrowUp" => &mut self.arrow_up,
            "ArrowLeft" => &mut self.arrow_left,
            "ArrowDown" => &mut self.arrow_down,
            "ArrowRight" => &mut self.arrow_right,
            _ => return false,
        };
        *slot = down;
        true
    }

    /// (forward, right) intent, each in {-1, 0, 1}
    pub fn intent(&self) -> (f32, f32) {
        let mut forward = 0.0;
        let mut right = 0.0;
        if self.key_w || self.arrow_up {
            forward += 1.0;
        }
        if self.key_s || self.arrow_down {
            forward -= 1.0;
        }
        if self.key_a || self.arrow_left {
            right -= 1.0;
        }
        if self.key_d || self.arrow_right {
            right += 1.0;
        }
        (forward, right)
    }
}

/// One tracked VR input source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSource {
    /// Gamepad axes; sources without a gamepad are skipped
    pub axes: Option<Vec<f32>>,
}

/// Pick and deadzone the thumbstick pair from a gamepad's axes
///
/// Four-axis pads prefer axes 2/3 and fall back to 0/1 when the preferred
/// stick is near rest. Missing or non-finite axes read as zero.
pub fn read_thumbstick(axes: &[f32]) -> (f32, f32) {
    let axis = |i: usize| axes.get(i).copied().filter(|v| v.is_finite()).unwrap_or(0.0);

    let (mut x, mut y) = if axes.len() >= 4 {
        let (x, y) = (axis(2), axis(3));
        if x.abs() < STICK_FALLBACK_THRESHOLD && y.abs() < STICK_FALLBACK_THRESHOLD {
            (axis(0), axis(1))
        } else {
            (x, y)
        }
    } else if axes.len() >= 2 {
        (axis(0), axis(1))
    } else {
        (0.0, 0.0)
    };

    if x.abs() < STICK_DEADZONE {
        x = 0.0;
    }
    if y.abs() < STICK_DEADZONE {
        y = 0.0;
    }
    (x, y)
}

/// Horizontal (forward, right) basis for a view direction
pub fn horizontal_basis(view_forward: Vec3) -> (Vec3, Vec3) {
    let forward = Vec3::new(view_forward.x, 0.0, view_forward.z).normalize_or_zero();
    let right = forward.cross(Vec3::Y).normalize_or_zero();
    (forward, right)
}

/// Move the player by `offset` through the standard pipeline
pub fn move_player(state: &mut GameState, offset: Vec3) {
    let mut next = clamp_to_bounds(state.player.pos + offset, state.settings.bounds_limit());
    next.y = state.eye_height_at(next.x, next.z);
    state.player.pos = resolve_collisions(state, next);
}

/// Desktop movement for one frame
pub fn step_keyboard(state: &mut GameState, keys: &KeyboardState, dt: f32) {
    let (mut forward_amt, mut right_amt) = keys.intent();
    if forward_amt == 0.0 && right_amt == 0.0 {
        return;
    }

    let magnitude = forward_amt.hypot(right_amt);
    forward_amt /= magnitude;
    right_amt /= magnitude;

    let (forward, right) = horizontal_basis(state.player.forward());
    let objects = &state.settings.objects;
    let offset = forward * (forward_amt * objects.walk_speed * dt)
        + right * (right_amt * objects.strafe_speed * dt);
    move_player(state, offset);
}

/// VR thumbstick movement for one frame; each active source moves the player
pub fn step_vr(state: &mut GameState, sources: &[InputSource], view_forward: Vec3, dt: f32) {
    let (forward, right) = horizontal_basis(view_forward);

    for axes in sources.iter().filter_map(|s| s.axes.as_deref()) {
        let (stick_x, stick_y) = read_thumbstick(axes);
        if stick_x == 0.0 && stick_y == 0.0 {
            continue;
        }
        let objects = &state.settings.objects;
        let offset = forward * (-stick_y * objects.walk_speed * dt)
            + right * (stick_x * objects.strafe_speed * dt);
        move_player(state, offset);
    }
}
