//! Serializable world snapshots
//!
//! The record form is what goes over the wire and what level generation
//! produces: a map of id to entity record, each carrying a `type` tag so the
//! right variant is rebuilt on load.

use std::collections::BTreeMap;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::state::{Blob, Entity, EntityId, Player, WorldState};
use crate::consts::PADDLE_WIDTH;
use crate::error::Result;

/// Fields shared by every entity record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlobRecord {
    pub id: EntityId,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub r: f64,
    #[serde(default)]
    pub dead: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: EntityId,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub r: f64,
    #[serde(default)]
    pub dead: bool,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "rectW", default = "default_rect_w")]
    pub rect_w: f64,
    #[serde(rename = "targetX", default)]
    pub target_x: f64,
}

fn default_rect_w() -> f64 {
    PADDLE_WIDTH
}

/// One entity in record form, tagged by `"type": "blob" | "player"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EntityRecord {
    Blob(BlobRecord),
    Player(PlayerRecord),
}

impl EntityRecord {
    pub fn id(&self) -> EntityId {
        match self {
            EntityRecord::Blob(b) => b.id,
            EntityRecord::Player(p) => p.id,
        }
    }
}

impl From<&Blob> for BlobRecord {
    fn from(b: &Blob) -> Self {
        Self {
            id: b.id,
            x: b.pos.x,
            y: b.pos.y,
            vx: b.vel.x,
            vy: b.vel.y,
            r: b.r,
            dead: b.dead,
        }
    }
}

impl From<BlobRecord> for Blob {
    fn from(rec: BlobRecord) -> Self {
        Self {
            id: rec.id,
            pos: DVec2::new(rec.x, rec.y),
            vel: DVec2::new(rec.vx, rec.vy),
            r: rec.r,
            dead: rec.dead,
        }
    }
}

impl From<&Player> for PlayerRecord {
    fn from(p: &Player) -> Self {
        let b = &p.blob;
        Self {
            id: b.id,
            x: b.pos.x,
            y: b.pos.y,
            vx: b.vel.x,
            vy: b.vel.y,
            r: b.r,
            dead: b.dead,
            name: p.name.clone(),
            rect_w: p.rect_w,
            target_x: p.target_x,
        }
    }
}

impl From<PlayerRecord> for Player {
    fn from(rec: PlayerRecord) -> Self {
        Self {
            blob: Blob {
                id: rec.id,
                pos: DVec2::new(rec.x, rec.y),
                vel: DVec2::new(rec.vx, rec.vy),
                r: rec.r,
                dead: rec.dead,
            },
            name: rec.name,
            rect_w: rec.rect_w,
            target_x: rec.target_x,
        }
    }
}

impl From<&Entity> for EntityRecord {
    fn from(e: &Entity) -> Self {
        match e {
            Entity::Blob(b) => EntityRecord::Blob(b.into()),
            Entity::Player(p) => EntityRecord::Player(p.into()),
        }
    }
}

impl From<EntityRecord> for Entity {
    fn from(rec: EntityRecord) -> Self {
        match rec {
            EntityRecord::Blob(b) => Entity::Blob(b.into()),
            EntityRecord::Player(p) => Entity::Player(p.into()),
        }
    }
}

/// A full world state in record form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub objects: BTreeMap<EntityId, EntityRecord>,
    pub timestamp: f64,
}

impl Snapshot {
    pub fn from_state(state: &WorldState) -> Self {
        Self {
            objects: state
                .objects
                .iter()
                .map(|(id, e)| (*id, EntityRecord::from(e)))
                .collect(),
            timestamp: state.timestamp,
        }
    }

    /// Rebuild the world state. Records are keyed by their own `id` field,
    /// whatever map key they arrived under.
    pub fn into_state(self) -> WorldState {
        let mut state = WorldState::new(self.timestamp);
        for rec in self.objects.into_values() {
            state.insert(Entity::from(rec));
        }
        state
    }

    /// Largest entity id in the snapshot, 0 when empty
    pub fn max_id(&self) -> EntityId {
        self.objects.values().map(EntityRecord::id).max().unwrap_or(0)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
