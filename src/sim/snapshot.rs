//! Serializable view of a frame for the presentation layer

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::colliders::{BagPose, ObjectModel};
use super::state::GameState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub pos: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BagView {
    pub id: u32,
    pub x: f32,
    pub z: f32,
    pub pose: BagPose,
    pub value: u32,
    pub bonus: bool,
    pub collected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropView {
    pub id: u32,
    pub model: ObjectModel,
    pub obstacle: bool,
    pub pos: Vec3,
    pub yaw: f32,
    pub scale: f32,
    pub fallback: bool,
}

/// Teleport arc as drawn: line color follows `valid`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArcView {
    pub visible: bool,
    pub valid: bool,
    pub points: Vec<Vec3>,
    /// Marker position, when the arc hit terrain
    pub marker: Option<Vec3>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BurstView {
    pub opacity: f32,
    pub points: Vec<Vec3>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomyView {
    pub total_collected: u64,
    pub target: u64,
    pub progress_percent: u32,
    pub completed: bool,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub frame: u64,
    pub time: f32,
    pub player: PlayerView,
    pub bags: Vec<BagView>,
    pub props: Vec<PropView>,
    pub arc: ArcView,
    pub bursts: Vec<BurstView>,
    pub economy: EconomyView,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let bags = state
            .colliders
            .bags
            .iter()
            .map(|b| BagView {
                id: b.id,
                x: b.x,
                z: b.z,
                pose: b.payload.pose(state.time),
                value: b.payload.value,
                bonus: b.payload.bonus,
                collected: b.payload.collected,
            })
            .collect();

        let decorative = state.colliders.decorative.iter().map(|c| (c, false));
        let obstacles = state.colliders.obstacles.iter().map(|c| (c, true));
        let props = decorative
            .chain(obstacles)
            .map(|(c, obstacle)| PropView {
                id: c.id,
                model: c.payload.model,
                obstacle,
                pos: Vec3::new(c.x, c.payload.ground_height, c.z),
                yaw: c.payload.yaw,
                scale: c.payload.scale,
                fallback: c.payload.fallback,
            })
            .collect();

        let teleport = &state.teleport;
        let arc = ArcView {
            visible: teleport.arc_visible(),
            valid: teleport.arc.valid,
            points: teleport.arc.points.clone(),
            marker: teleport.arc.target,
        };

        let bursts = state
            .bursts
            .iter()
            .map(|b| BurstView {
                opacity: b.opacity(),
                points: b.particles.iter().map(|p| p.pos).collect(),
            })
            .collect();

        Self {
            frame: state.frame,
            time: state.time,
            player: PlayerView {
                pos: state.player.pos,
                yaw: state.player.yaw,
                pitch: state.player.pitch,
            },
            bags,
            props,
            arc,
            bursts,
            economy: EconomyView {
                total_collected: state.economy.total_collected,
                target: state.economy.target,
                progress_percent: state.economy.progress_percent(),
                completed: state.economy.completed,
            },
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::test_support::small_settings;

    #[test]
    fn test_capture_counts() {
        let mut state = GameState::new(small_settings());
        state.resolve_all_loaded();
        let snap = Snapshot::capture(&state);
        assert_eq!(snap.bags.len(), BAG_COUNT);
        assert_eq!(snap.props.len(), OBJECT_COUNT + OBSTACLE_COUNT);
        assert_eq!(snap.props.iter().filter(|p| p.obstacle).count(), OBSTACLE_COUNT);
        assert!(!snap.arc.visible);
        assert_eq!(snap.economy.progress_percent, 0);
    }

    #[test]
    fn test_json_has_expected_fields() {
        let state = GameState::new(small_settings());
        let json = Snapshot::capture(&state).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["economy"]["target"], TOTAL_MONEY_TARGET);
        assert_eq!(value["bags"].as_array().map(|a| a.len()), Some(BAG_COUNT));
        assert!(value["arc"]["marker"].is_null());
    }
}
