//! Authoritative game instance
//!
//! Owns the world state and the id counter, applies player commands and
//! steps the simulation. The same type runs on the server and on clients;
//! feeding both the same commands and timestamps keeps them in agreement.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};
use crate::sim::{
    Blob, DeadEvent, Entity, EntityId, GameObserver, Player, Snapshot, StepResult, WorldState, compute_state,
    enforce_x, transfer_areas,
};
use crate::unit_vector;

/// A player intent as it arrives from a transport
///
/// The issuing entity id is supplied separately by whoever owns the
/// connection, see [`Game::apply`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum Command {
    Join {
        name: String,
    },
    Leave,
    Move {
        #[serde(rename = "mouseX")]
        mouse_x: f64,
        #[serde(rename = "playerX", default)]
        player_x: f64,
    },
    Shoot {
        direction: f64,
        timestamp: f64,
    },
}

/// The game: world state, id counter and the observer for terminal events
pub struct Game<O: GameObserver> {
    state: WorldState,
    /// Last id handed out; every id in `state` is at most this
    last_id: EntityId,
    update_count: u64,
    observer: O,
}

impl<O: GameObserver> Game<O> {
    /// Create an empty game at logical time 0
    pub fn new(observer: O) -> Self {
        Self {
            state: WorldState::new(0.0),
            last_id: 0,
            update_count: 0,
            observer,
        }
    }

    pub fn state(&self) -> &WorldState {
        &self.state
    }

    pub fn timestamp(&self) -> f64 {
        self.state.timestamp
    }

    pub fn last_id(&self) -> EntityId {
        self.last_id
    }

    /// Number of successful `update` calls
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Mint a fresh entity id
    pub fn new_id(&mut self) -> EntityId {
        self.last_id += 1;
        self.last_id
    }

    /// Compute the state `dt` ms ahead, dispatching any victories it raises.
    /// The current state is left as is.
    pub fn compute_state(&mut self, dt: f64) -> WorldState {
        let StepResult { state, events } = compute_state(&self.state, dt);
        for event in events {
            self.observer.notify(event);
        }
        state
    }

    /// Advance the world to `timestamp` (ms)
    ///
    /// Fails without touching the state if that would step backwards or more
    /// than `MAX_DELTA` forward.
    pub fn update(&mut self, timestamp: f64) -> Result<()> {
        let delta = timestamp - self.state.timestamp;
        if !(0.0..=MAX_DELTA).contains(&delta) {
            return Err(Error::InvalidDelta {
                delta,
                max: MAX_DELTA,
            });
        }
        self.state = self.compute_state(delta);
        self.update_count += 1;
        Ok(())
    }

    /// Add a paddle for `id`
    ///
    /// Players alternate between the top and bottom goal lines. The second
    /// player to join launches every blob.
    pub fn join(&mut self, id: EntityId, name: impl Into<String>) -> EntityId {
        let num_players = self.state.player_count();
        let pos = if num_players % 2 == 0 {
            DVec2::new(WIDTH / 2.0, TOP_PADDLE_Y)
        } else {
            DVec2::new(WIDTH / 2.0, BOTTOM_PADDLE_Y)
        };
        let player = Player::new(id, name, pos);
        log::info!("Player {} ({}) joined at ({}, {})", id, player.name, pos.x, pos.y);

        self.last_id = self.last_id.max(id);
        self.state.insert(player);

        if num_players == 1 {
            self.start_balls();
        }
        id
    }

    /// Join with a freshly minted id
    pub fn join_next(&mut self, name: impl Into<String>) -> EntityId {
        let id = self.new_id();
        self.join(id, name)
    }

    /// Remove an entity; unknown ids are fine
    pub fn leave(&mut self, id: EntityId) {
        if self.state.objects.remove(&id).is_some() {
            log::info!("Entity {} left", id);
        }
    }

    /// Fire a blob from `id` in `direction` (radians)
    ///
    /// A fixed share of the shooter's area moves into the new blob, which
    /// starts just outside the shooter and inherits its velocity. The shooter
    /// recoils, and dies if the shot leaves it too small.
    pub fn shoot(&mut self, id: EntityId, direction: f64, issued_at: f64) {
        let staleness = self.state.timestamp - issued_at;
        if staleness.abs() > TARGET_LATENCY {
            log::warn!("Shot from {} arrived {:.0}ms off world time", id, staleness);
        } else {
            log::debug!("Adding shot from {} issued {:.0}ms ago", id, staleness);
        }

        if !self.state.objects.contains_key(&id) {
            log::debug!("Ignoring shot from missing entity {}", id);
            return;
        }
        let blob_id = self.new_id();
        let Some(shooter) = self.state.get_mut(id) else {
            return;
        };
        let kind = shooter.kind();
        let body = shooter.blob_mut();

        let e = unit_vector(direction);
        let diff = body.area() * SHOT_AREA_RATIO;
        let mut blob = Blob::new(blob_id, DVec2::ZERO, body.vel + e * SHOT_SPEED_RATIO, 0.0);
        blob.pos = body.pos + e * (body.r + blob.r);

        body.vel -= e * PLAYER_SPEED_RATIO;
        blob.transfer_area(diff);
        body.transfer_area(-diff);

        let suicide = if body.r <= SHOOTER_DEATH_RADIUS {
            body.dead = true;
            Some(DeadEvent { id, kind })
        } else {
            None
        };

        self.state.insert(blob);
        if let Some(event) = suicide {
            log::info!("Entity {} shot itself to death", id);
            self.observer.dead(event);
        }
    }

    /// Center paddle `id` under the pointer at `mouse_x`
    ///
    /// `_player_x` is the paddle position the client saw when it sent the
    /// move; it is carried for wire compatibility only.
    pub fn move_paddle(&mut self, id: EntityId, mouse_x: f64, _player_x: f64) {
        let Some(entity) = self.state.get_mut(id) else {
            log::debug!("Ignoring move for missing entity {}", id);
            return;
        };
        entity.blob_mut().pos.x = mouse_x - PADDLE_HALF_WIDTH;
        enforce_x(entity);
    }

    /// Route a transport command issued by entity `from`
    pub fn apply(&mut self, from: EntityId, command: &Command) {
        match command {
            Command::Join { name } => {
                self.join(from, name.clone());
            }
            Command::Leave => self.leave(from),
            Command::Move { mouse_x, player_x } => self.move_paddle(from, *mouse_x, *player_x),
            Command::Shoot {
                direction,
                timestamp,
            } => self.shoot(from, *direction, *timestamp),
        }
    }

    /// Launch every free blob
    pub fn start_balls(&mut self) {
        for entity in self.state.objects.values_mut() {
            if let Entity::Blob(ball) = entity {
                ball.vel = DVec2::new(LAUNCH_VX, LAUNCH_VY);
                log::debug!("Launched blob {}", ball.id);
            }
        }
    }

    /// Freeze everything, paddles included
    pub fn pause_balls(&mut self) {
        for entity in self.state.objects.values_mut() {
            entity.blob_mut().vel = DVec2::ZERO;
        }
    }

    pub fn player_count(&self) -> usize {
        self.state.player_count()
    }

    pub fn blob_exists(&self, id: EntityId) -> bool {
        self.state.objects.contains_key(&id)
    }

    /// Let two touching bodies exchange area, the larger feeding on the smaller
    ///
    /// Returns whether a transfer happened. A body drained to death raises
    /// `dead` and is removed on the next step.
    pub fn absorb(&mut self, a: EntityId, b: EntityId) -> bool {
        if a == b {
            return false;
        }
        let (Some(mut first), Some(mut second)) =
            (self.state.get(a).cloned(), self.state.get(b).cloned())
        else {
            return false;
        };
        if first.is_dead() || second.is_dead() || !first.blob().intersects(second.blob()) {
            return false;
        }

        let killed = transfer_areas(&mut first, &mut second);
        self.state.insert(first);
        self.state.insert(second);
        if let Some(event) = killed {
            log::info!("Entity {} was absorbed", event.id);
            self.observer.dead(event);
        }
        true
    }

    /// Current state in record form
    pub fn save(&self) -> Snapshot {
        Snapshot::from_state(&self.state)
    }

    /// Replace the world with `snapshot`
    ///
    /// The id counter only moves forward, so ids minted afterwards never
    /// collide with loaded ones.
    pub fn load(&mut self, snapshot: Snapshot) {
        self.last_id = self.last_id.max(snapshot.max_id());
        self.state = snapshot.into_state();
        log::info!(
            "Loaded {} entities at t={}, last id {}",
            self.state.objects.len(),
            self.state.timestamp,
            self.last_id
        );
    }
}
