//! Entity and world state types
//!
//! Everything a snapshot needs to reconstruct the world lives here.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Entity identifier (positive, minted by the game's id counter)
pub type EntityId = u32;

/// Which variant an entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Blob,
    Player,
}

/// A circular moving body
#[derive(Debug, Clone, PartialEq)]
pub struct Blob {
    pub id: EntityId,
    pub pos: DVec2,
    /// Velocity in units per 100ms
    pub vel: DVec2,
    pub r: f64,
    /// Set during a step or command; the entity is dropped from the next state
    pub dead: bool,
}

impl Blob {
    pub fn new(id: EntityId, pos: DVec2, vel: DVec2, r: f64) -> Self {
        Self {
            id,
            pos,
            vel,
            r,
            dead: false,
        }
    }

    pub fn area(&self) -> f64 {
        PI * self.r * self.r
    }

    /// Transfer `area` to this blob (or away from it when negative).
    ///
    /// Area, not radius, changes linearly so mass is conserved between the
    /// two sides of a transfer. Starting from `r == 0` this grows the radius
    /// by exactly `sqrt(area / PI)`. Draining more than the blob holds leaves
    /// it at radius 0.
    pub fn transfer_area(&mut self, area: f64) {
        let remaining = (self.area() + area).max(0.0);
        self.r = (remaining / PI).sqrt();
    }

    /// Where this blob will be `dt` milliseconds from now
    pub fn advance(&self, dt: f64) -> Self {
        Self {
            pos: self.pos + self.vel * dt / 10.0,
            ..self.clone()
        }
    }

    pub fn distance_to(&self, other: &Blob) -> f64 {
        self.pos.distance(other.pos)
    }

    /// How deep two (already intersecting) circles overlap, never negative
    pub fn overlap(&self, other: &Blob) -> f64 {
        (self.r + other.r - self.distance_to(other)).max(0.0)
    }

    pub fn intersects(&self, other: &Blob) -> bool {
        self.distance_to(other) < self.r + other.r
    }
}

/// A paddle: a blob with a rectangular footprint anchored at its position
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub blob: Blob,
    pub name: String,
    /// Paddle width, fixed at creation
    pub rect_w: f64,
    /// Reserved for pointer smoothing, not read by the stepper
    pub target_x: f64,
}

impl Player {
    pub fn new(id: EntityId, name: impl Into<String>, pos: DVec2) -> Self {
        Self {
            blob: Blob::new(id, pos, DVec2::ZERO, SPAWN_RADIUS),
            name: name.into(),
            rect_w: PADDLE_WIDTH,
            target_x: 0.0,
        }
    }

    pub fn id(&self) -> EntityId {
        self.blob.id
    }

    /// True for the paddle anchored on the top goal line
    pub fn guards_top(&self) -> bool {
        self.blob.pos.y == TOP_PADDLE_Y
    }

    /// True for the paddle anchored on the bottom goal line
    pub fn guards_bottom(&self) -> bool {
        self.blob.pos.y == BOTTOM_PADDLE_Y
    }
}

/// Any simulated object
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Blob(Blob),
    Player(Player),
}

impl Entity {
    pub fn id(&self) -> EntityId {
        self.blob().id
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Blob(_) => EntityKind::Blob,
            Entity::Player(_) => EntityKind::Player,
        }
    }

    /// The circular body shared by both variants
    pub fn blob(&self) -> &Blob {
        match self {
            Entity::Blob(b) => b,
            Entity::Player(p) => &p.blob,
        }
    }

    pub fn blob_mut(&mut self) -> &mut Blob {
        match self {
            Entity::Blob(b) => b,
            Entity::Player(p) => &mut p.blob,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.blob().dead
    }

    pub fn as_player(&self) -> Option<&Player> {
        match self {
            Entity::Player(p) => Some(p),
            Entity::Blob(_) => None,
        }
    }

    /// Returns the free blob, or `None` for a paddle
    pub fn as_ball(&self) -> Option<&Blob> {
        match self {
            Entity::Blob(b) => Some(b),
            Entity::Player(_) => None,
        }
    }

    /// A new value of this entity advanced by `dt` milliseconds
    pub fn advance(&self, dt: f64) -> Self {
        match self {
            Entity::Blob(b) => Entity::Blob(b.advance(dt)),
            Entity::Player(p) => Entity::Player(Player {
                blob: p.blob.advance(dt),
                ..p.clone()
            }),
        }
    }
}

impl From<Blob> for Entity {
    fn from(blob: Blob) -> Self {
        Entity::Blob(blob)
    }
}

impl From<Player> for Entity {
    fn from(player: Player) -> Self {
        Entity::Player(player)
    }
}

/// The world at one logical instant
///
/// Objects are keyed by id in a `BTreeMap` so every pass iterates in
/// ascending id order on every peer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldState {
    pub objects: BTreeMap<EntityId, Entity>,
    /// Logical time in milliseconds
    pub timestamp: f64,
}

impl WorldState {
    pub fn new(timestamp: f64) -> Self {
        Self {
            objects: BTreeMap::new(),
            timestamp,
        }
    }

    /// Insert (or replace) an entity under its own id
    pub fn insert(&mut self, entity: impl Into<Entity>) {
        let entity = entity.into();
        self.objects.insert(entity.id(), entity);
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.objects.get_mut(&id)
    }

    /// Paddles in id order
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.objects.values().filter_map(Entity::as_player)
    }

    /// Free blobs in id order
    pub fn balls(&self) -> impl Iterator<Item = &Blob> {
        self.objects.values().filter_map(Entity::as_ball)
    }

    pub fn player_count(&self) -> usize {
        self.players().count()
    }

    /// Largest id present, 0 when empty
    pub fn max_id(&self) -> EntityId {
        self.objects.keys().next_back().copied().unwrap_or(0)
    }
}
