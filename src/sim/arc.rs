//! VR teleport arc
//!
//! The arc is a projectile launched from the controller along its forward
//! direction, integrated with semi-implicit Euler at a fixed 60 Hz step until
//! a segment crosses the terrain or the step budget runs out. It is rebuilt
//! from scratch every frame while aiming.
//!
//! Aiming is an explicit two-state machine: the trigger press enters
//! `Aiming`, the release returns to `Idle` and commits the target only if the
//! last computed arc was valid.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::bounds::{clamp_to_bounds, within_radius};
use super::terrain::HeightField;
use crate::consts::ARC_DT;
use crate::settings::Settings;

/// Pieces each integration segment is split into when searching for a crossing
const SEGMENT_SUBDIVISIONS: usize = 4;
/// Bisection iterations used to refine a crossing
const BISECTION_STEPS: usize = 20;

/// Controller position and pointing direction in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControllerPose {
    pub position: Vec3,
    pub forward: Vec3,
}

/// Arc tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcParams {
    pub steps: usize,
    pub speed: f32,
    pub gravity: f32,
    pub dt: f32,
    /// Degrees from vertical
    pub max_slope_angle: f32,
    /// Landing points farther than this from the origin are rejected
    pub world_radius: f32,
    /// Player-centre clamp applied to the target
    pub bounds_limit: f32,
}

impl ArcParams {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            steps: settings.objects.arc_steps,
            speed: settings.objects.arc_speed,
            gravity: settings.objects.arc_gravity,
            dt: ARC_DT,
            max_slope_angle: settings.objects.max_slope_angle,
            world_radius: settings.world.radius,
            bounds_limit: settings.bounds_limit(),
        }
    }
}

/// Where an arc segment met the terrain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcHit {
    pub point: Vec3,
    pub normal: Vec3,
}

impl ArcHit {
    /// Angle between the surface normal and vertical, in degrees
    pub fn slope_degrees(&self) -> f32 {
        self.normal.dot(Vec3::Y).clamp(-1.0, 1.0).acos().to_degrees()
    }
}

/// One frame's arc simulation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeleportArc {
    /// Sampled positions, launch point first
    pub points: Vec<Vec3>,
    pub hit: Option<ArcHit>,
    pub valid: bool,
    /// Bounds-clamped landing point (present whenever the arc hit terrain)
    pub target: Option<Vec3>,
}

impl TeleportArc {
    /// Simulate the arc from a controller pose
    pub fn simulate(terrain: &HeightField, pose: ControllerPose, params: &ArcParams) -> Self {
        let direction = pose.forward.normalize_or_zero();
        let gravity = Vec3::new(0.0, -params.gravity, 0.0);

        let mut points = Vec::with_capacity(params.steps);
        let mut hit = None;
        let mut pos = pose.position;
        let mut vel = direction * params.speed;

        for _ in 0..params.steps {
            points.push(pos);
            vel += gravity * params.dt;
            let next = pos + vel * params.dt;

            if let Some(h) = segment_terrain_hit(terrain, pos, next) {
                hit = Some(h);
                break;
            }
            pos = next;
        }

        let (valid, target) = match hit {
            Some(h) => {
                let flat_enough = h.slope_degrees() <= params.max_slope_angle;
                let inside = within_radius(h.point, params.world_radius);
                (flat_enough && inside, Some(clamp_to_bounds(h.point, params.bounds_limit)))
            }
            None => (false, None),
        };

        Self {
            points,
            hit,
            valid,
            target,
        }
    }
}

/// First downward crossing of the terrain surface between `a` and `b`
pub fn segment_terrain_hit(terrain: &HeightField, a: Vec3, b: Vec3) -> Option<ArcHit> {
    if (b - a).length_squared() == 0.0 {
        return None;
    }

    // Signed height above the surface, None where there is no mesh
    let clearance = |p: Vec3| terrain.surface_at(p.x, p.z).map(|s| p.y - s.height);

    let mut prev = a;
    let mut prev_clear = clearance(a);
    for i in 1..=SEGMENT_SUBDIVISIONS {
        let cur = a.lerp(b, i as f32 / SEGMENT_SUBDIVISIONS as f32);
        let cur_clear = clearance(cur);

        // Only front-face hits: above the surface, then at or below it
        if let (Some(c0), Some(c1)) = (prev_clear, cur_clear) {
            if c0 > 0.0 && c1 <= 0.0 {
                let (mut lo, mut hi) = (prev, cur);
                for _ in 0..BISECTION_STEPS {
                    let mid = lo.lerp(hi, 0.5);
                    match clearance(mid) {
                        Some(c) if c > 0.0 => lo = mid,
                        _ => hi = mid,
                    }
                }
                let surface = terrain.surface_at(hi.x, hi.z)?;
                return Some(ArcHit {
                    point: Vec3::new(hi.x, surface.height, hi.z),
                    normal: surface.normal,
                });
            }
        }

        prev = cur;
        prev_clear = cur_clear;
    }

    None
}

/// Teleport aiming state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TeleportPhase {
    /// Arc hidden
    #[default]
    Idle,
    /// Trigger held, arc recomputed every frame
    Aiming,
}

/// Trigger-driven teleport controller
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Teleporter {
    pub phase: TeleportPhase,
    pub arc: TeleportArc,
}

impl Teleporter {
    /// Trigger pressed
    pub fn begin_aim(&mut self) {
        self.phase = TeleportPhase::Aiming;
        self.arc = TeleportArc::default();
    }

    /// Trigger released. Returns the landing target if the last arc was valid.
    pub fn end_aim(&mut self) -> Option<Vec3> {
        if self.phase != TeleportPhase::Aiming {
            return None;
        }
        self.phase = TeleportPhase::Idle;
        if self.arc.valid { self.arc.target } else { None }
    }

    /// Drop out of aiming without teleporting
    pub fn cancel(&mut self) {
        self.phase = TeleportPhase::Idle;
        self.arc = TeleportArc::default();
    }

    /// Recompute the arc while aiming
    pub fn update(&mut self, terrain: &HeightField, pose: ControllerPose, params: &ArcParams) {
        if self.phase == TeleportPhase::Aiming {
            self.arc = TeleportArc::simulate(terrain, pose, params);
        }
    }

    pub fn arc_visible(&self) -> bool {
        self.phase == TeleportPhase::Aiming
    }
}
