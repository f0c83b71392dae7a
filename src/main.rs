//! Money Run entry point
//!
//! The web build is driven from JavaScript through `money_run::web`. Natively
//! this runs a headless session that walks toward the nearest bag until the
//! money target is reached or the frame budget runs out.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use serde::Serialize;

    use money_run::Settings;
    use money_run::sim::{FrameInput, GameEvent, GameState, tick};

    const FRAME_DT: f32 = 1.0 / 60.0;
    const DEFAULT_MAX_FRAMES: u64 = 60 * 60 * 5;

    #[derive(Debug, Serialize)]
    struct Summary {
        frames: u64,
        seconds: f32,
        bags_collected: usize,
        bonus_bags: usize,
        total_collected: u64,
        target: u64,
        completed: bool,
    }

    /// Point the player at the nearest uncollected bag; false if none remain
    fn steer(state: &mut GameState) -> bool {
        let pos = state.player.pos;
        let nearest = state
            .colliders
            .bags
            .iter()
            .filter(|b| !b.payload.collected)
            .min_by(|a, b| {
                let da = (a.x - pos.x).hypot(a.z - pos.z);
                let db = (b.x - pos.x).hypot(b.z - pos.z);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            });

        match nearest {
            Some(bag) => {
                state.player.yaw = (-(bag.x - pos.x)).atan2(-(bag.z - pos.z));
                true
            }
            None => false,
        }
    }

    pub fn run() {
        env_logger::init();
        log::info!("Money Run (native) starting...");

        let mut args = std::env::args().skip(1);
        let settings_path = args.next().map(PathBuf::from);
        let max_frames = args
            .next()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_MAX_FRAMES);

        let settings = Settings::load_from(settings_path.as_deref());
        let mut state = GameState::new(settings);
        state.resolve_all_loaded();

        let mut input = FrameInput::default();
        input.keys.set_key("KeyW", true);

        let mut bags_collected = 0;
        let mut bonus_bags = 0;
        while state.frame < max_frames && !state.economy.completed {
            input.keys.set_key("KeyW", steer(&mut state));
            tick(&mut state, &input, FRAME_DT);

            for event in state.drain_events() {
                match event {
                    GameEvent::BagCollected { value, bonus, .. } => {
                        bags_collected += 1;
                        if bonus {
                            bonus_bags += 1;
                        }
                        log::info!(
                            "+${} ({}%)",
                            value,
                            state.economy.progress_percent()
                        );
                    }
                    GameEvent::GameCompleted { total } => {
                        log::info!("Collected ${} at frame {}", total, state.frame);
                    }
                }
            }
        }

        let summary = Summary {
            frames: state.frame,
            seconds: state.time,
            bags_collected,
            bonus_bags,
            total_collected: state.economy.total_collected,
            target: state.economy.target,
            completed: state.economy.completed,
        };
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to serialize summary: {}", e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is money_run::web::wasm_start
}
