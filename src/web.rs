//! Browser bindings
//!
//! The page owns rendering, audio and asset loading. It forwards DOM and
//! WebXR input here, calls [`WebGame::frame`] from its animation loop and
//! reads back snapshots and events as JSON.

use glam::{Vec2, Vec3};
use wasm_bindgen::prelude::*;

use crate::settings::Settings;
use crate::sim::{
    AssetOutcome, ControllerPose, FrameInput, GameState, InputSource, Snapshot, tick,
};

fn to_js(e: serde_json::Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Money Run starting...");
}

/// A running session
#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    input: FrameInput,
}

#[wasm_bindgen]
impl WebGame {
    /// New session from stored settings with a fresh placement seed
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGame {
        let mut settings = Settings::load();
        settings.world_seed = js_sys::Date::now() as u64;
        log::info!("World seed: {}", settings.world_seed);
        Self::from_settings(settings)
    }

    /// New session from explicit settings JSON (fully seeded)
    pub fn with_settings(json: &str) -> Result<WebGame, JsValue> {
        let settings = Settings::from_json(json).map_err(to_js)?;
        Ok(Self::from_settings(settings))
    }

    pub fn save_settings(&self) {
        self.state.settings.save();
    }

    pub fn key_down(&mut self, code: &str) -> bool {
        self.input.keys.set_key(code, true)
    }

    pub fn key_up(&mut self, code: &str) -> bool {
        self.input.keys.set_key(code, false)
    }

    /// Accumulate pointer movement until the next frame
    pub fn mouse_move(&mut self, dx: f32, dy: f32) {
        self.input.mouse_delta += Vec2::new(dx, dy);
    }

    pub fn set_pointer_locked(&mut self, locked: bool) {
        if locked != self.input.pointer_locked {
            log::info!("Pointer lock {}", if locked { "acquired" } else { "released" });
        }
        self.input.pointer_locked = locked;
    }

    pub fn set_presenting(&mut self, presenting: bool) {
        if presenting != self.input.presenting {
            log::info!("XR session {}", if presenting { "started" } else { "ended" });
        }
        self.input.presenting = presenting;
    }

    pub fn set_view_forward(&mut self, x: f32, y: f32, z: f32) {
        self.input.view_forward = Vec3::new(x, y, z);
    }

    pub fn set_controller_pose(&mut self, px: f32, py: f32, pz: f32, fx: f32, fy: f32, fz: f32) {
        self.input.controller = Some(ControllerPose {
            position: Vec3::new(px, py, pz),
            forward: Vec3::new(fx, fy, fz),
        });
    }

    pub fn clear_controller_pose(&mut self) {
        self.input.controller = None;
    }

    pub fn clear_input_sources(&mut self) {
        self.input.sources.clear();
    }

    /// Append an input source; `None` for sources without a gamepad
    pub fn push_input_source(&mut self, axes: Option<Vec<f32>>) {
        self.input.sources.push(InputSource { axes });
    }

    pub fn select_start(&mut self) {
        self.input.select_start = true;
    }

    pub fn select_end(&mut self) {
        self.input.select_end = true;
    }

    /// Advance one frame by `dt` seconds of wall-clock time
    pub fn frame(&mut self, dt: f32) {
        tick(&mut self.state, &self.input, dt);
        self.input.mouse_delta = Vec2::ZERO;
        self.input.select_start = false;
        self.input.select_end = false;
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        Snapshot::capture(&self.state).to_json().map_err(to_js)
    }

    /// Drain queued events (pickups, completion)
    pub fn events_json(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state.drain_events()).map_err(to_js)
    }

    /// Props still waiting for their model
    pub fn pending_placements_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state.pending).map_err(to_js)
    }

    pub fn resolve_placement(&mut self, id: u32, loaded: bool) -> bool {
        let outcome = if loaded {
            AssetOutcome::Loaded
        } else {
            AssetOutcome::Failed
        };
        self.state.resolve_placement(id, outcome)
    }

    /// Terrain heights row by row, (resolution + 1)² values, for building the mesh
    pub fn terrain_heights(&self) -> Vec<f32> {
        self.state.terrain.heights().to_vec()
    }

    pub fn terrain_resolution(&self) -> u32 {
        self.state.terrain.resolution()
    }

    pub fn terrain_size(&self) -> f32 {
        self.state.terrain.size()
    }

    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        self.state.height_at(x, z)
    }
}

impl WebGame {
    fn from_settings(settings: Settings) -> Self {
        Self {
            state: GameState::new(settings),
            input: FrameInput::default(),
        }
    }
}

impl Default for WebGame {
    fn default() -> Self {
        Self::new()
    }
}
