//! Circular colliders for props and money bags
//!
//! Three disjoint collections: decorative props and obstacles are never
//! removed; bags are removed once their post-collection linger expires.
//!
//! Props are registered in two phases. World generation produces
//! [`PendingPlacement`]s with a synchronously sampled ground height; once the
//! collaborator knows whether the model loaded it reports an [`AssetOutcome`]
//! and the collider is registered with the resolved scale.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Decorative model catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectModel {
    Tree,
    Lamp,
    Market,
    Car,
    TreeAlt,
}

impl ObjectModel {
    pub const ALL: [ObjectModel; 5] = [
        ObjectModel::Tree,
        ObjectModel::Lamp,
        ObjectModel::Market,
        ObjectModel::Car,
        ObjectModel::TreeAlt,
    ];

    /// Render and collision scale when the model loads
    pub fn scale(&self) -> f32 {
        match self {
            ObjectModel::Lamp | ObjectModel::Car => 1.5,
            ObjectModel::Tree | ObjectModel::Market | ObjectModel::TreeAlt => 1.0,
        }
    }

    /// Asset path relative to the web root
    pub fn asset_path(&self) -> &'static str {
        match self {
            ObjectModel::Tree => "models/arbol1/scene.gltf",
            ObjectModel::Lamp => "models/lampara/scene.gltf",
            ObjectModel::Market => "models/mercado/scene.gltf",
            ObjectModel::Car => "models/carro1/scene.gltf",
            ObjectModel::TreeAlt => "models/arbol2/scene.gltf",
        }
    }
}

/// Which prop collection a placement belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropKind {
    Decorative,
    Obstacle,
}

/// Result of resolving a prop's model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetOutcome {
    Loaded,
    /// Model failed to load; a unit-scale stand-in is used
    Failed,
}

/// A prop waiting for its asset to resolve
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingPlacement {
    pub id: u32,
    pub kind: PropKind,
    pub x: f32,
    pub z: f32,
    pub ground_height: f32,
    pub model: ObjectModel,
    pub yaw: f32,
}

/// Visual payload of a prop collider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prop {
    pub model: ObjectModel,
    pub scale: f32,
    pub ground_height: f32,
    pub yaw: f32,
    /// Rendered as the fallback box instead of the model
    pub fallback: bool,
}

/// Money bag payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoneyBag {
    /// Value rolled at spawn time
    pub value: u32,
    pub bonus: bool,
    pub collected: bool,
    /// Seconds of visibility left after collection
    pub linger: f32,
    /// Resting height of the hovering model
    pub base_height: f32,
    /// Bob phase so neighbouring bags don't move in lockstep
    pub phase_offset: f32,
}

/// Animated transform of a bag model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BagPose {
    pub y: f32,
    pub yaw: f32,
}

impl MoneyBag {
    /// Hover-and-spin pose at `time` seconds
    pub fn pose(&self, time: f32) -> BagPose {
        BagPose {
            y: self.base_height + (time * 1.5 + self.phase_offset).sin() * 0.1,
            yaw: time * 0.5,
        }
    }
}

/// A circle in the XZ plane with an owning payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collider<T> {
    pub id: u32,
    pub x: f32,
    pub z: f32,
    pub radius: f32,
    pub payload: T,
}

impl<T> Collider<T> {
    /// Circle-circle overlap with a body at `pos` of radius `radius`
    #[inline]
    pub fn overlaps(&self, pos: Vec3, radius: f32) -> bool {
        let dist = (pos.x - self.x).hypot(pos.z - self.z);
        dist < radius + self.radius
    }
}

/// All colliders in the world
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColliderRegistry {
    pub decorative: Vec<Collider<Prop>>,
    pub obstacles: Vec<Collider<Prop>>,
    pub bags: Vec<Collider<MoneyBag>>,
    next_id: u32,
}

impl ColliderRegistry {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    /// Allocate a new collider/placement ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        id
    }

    /// Register a prop once its asset has resolved
    pub fn register_prop(
        &mut self,
        placement: &PendingPlacement,
        outcome: AssetOutcome,
        base_radius: f32,
    ) -> u32 {
        let scale = match outcome {
            AssetOutcome::Loaded => placement.model.scale(),
            AssetOutcome::Failed => 1.0,
        };
        let collider = Collider {
            id: placement.id,
            x: placement.x,
            z: placement.z,
            radius: base_radius * scale,
            payload: Prop {
                model: placement.model,
                scale,
                ground_height: placement.ground_height,
                yaw: placement.yaw,
                fallback: outcome == AssetOutcome::Failed,
            },
        };
        match placement.kind {
            PropKind::Decorative => self.decorative.push(collider),
            PropKind::Obstacle => self.obstacles.push(collider),
        }
        placement.id
    }

    /// Add a freshly rolled bag
    pub fn add_bag(&mut self, x: f32, z: f32, radius: f32, bag: MoneyBag) -> u32 {
        let id = self.next_entity_id();
        self.bags.push(Collider {
            id,
            x,
            z,
            radius,
            payload: bag,
        });
        id
    }

    /// Bags present in the collection, lingering ones included
    pub fn bag_count(&self) -> usize {
        self.bags.len()
    }

    /// Bags that can still be picked up
    pub fn active_bag_count(&self) -> usize {
        self.bags.iter().filter(|b| !b.payload.collected).count()
    }

    /// Advance linger timers and drop expired bags; returns how many were removed
    pub fn expire_collected_bags(&mut self, dt: f32) -> usize {
        let before = self.bags.len();
        for bag in self.bags.iter_mut().filter(|b| b.payload.collected) {
            bag.payload.linger -= dt;
        }
        self.bags
            .retain(|b| !(b.payload.collected && b.payload.linger <= 0.0));
        before - self.bags.len()
    }

    pub fn prop_count(&self) -> usize {
        self.decorative.len() + self.obstacles.len()
    }
}
