//! Blob Pong - a two-player paddle game where you shoot pieces of yourself
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, bounds, collisions, stepping, snapshots)
//! - `game`: Authoritative game instance and command handlers
//! - `level`: Initial state generation
//! - `timer`: Drift-correcting update schedule
//! - `session`: Rounds, restarts and the schedule for a host
//! - `settings`: Host configuration

pub mod error;
pub mod game;
pub mod level;
pub mod session;
pub mod settings;
pub mod sim;
pub mod timer;

pub use error::{Error, Result};
pub use game::{Command, Game};
pub use session::Session;
pub use settings::{LevelLayout, LevelSettings, Settings};

use glam::DVec2;

/// Game configuration constants
///
/// These are shared by every peer and must match exactly for clients and
/// the server to agree on the simulation.
pub mod consts {
    /// Field dimensions
    pub const WIDTH: f64 = 640.0;
    pub const HEIGHT: f64 = 960.0;

    /// Target update cadence (~30 Hz), in milliseconds
    pub const UPDATE_INTERVAL: f64 = 33.0;
    /// Largest time step `update` will accept, in milliseconds
    pub const MAX_DELTA: f64 = 10_000.0;
    /// Command staleness beyond which shots are logged as late (ms)
    pub const TARGET_LATENCY: f64 = 1_000.0;
    /// Pause between a victory and the next round (ms)
    pub const RESTART_DELAY: f64 = 1_000.0;

    /// Fraction of the shooter's area carried by each shot
    pub const SHOT_AREA_RATIO: f64 = 0.02;
    /// Launch speed of a shot relative to the shooter
    pub const SHOT_SPEED_RATIO: f64 = 1.0;
    /// Recoil applied to the shooter
    pub const PLAYER_SPEED_RATIO: f64 = 0.1;
    /// Fraction of the overlap moved per area transfer
    pub const TRANSFER_RATE: f64 = 0.05;

    /// Paddle footprint
    pub const PADDLE_WIDTH: f64 = 100.0;
    pub const PADDLE_HEIGHT: f64 = 25.0;
    /// Pointer offset that centers the paddle under the cursor
    pub const PADDLE_HALF_WIDTH: f64 = 50.0;
    /// Anchor y of the paddle guarding the top goal line
    pub const TOP_PADDLE_Y: f64 = 25.0;
    /// Anchor y of the paddle guarding the bottom goal line
    pub const BOTTOM_PADDLE_Y: f64 = HEIGHT - PADDLE_HEIGHT - 25.0;
    /// Radius a player spawns with
    pub const SPAWN_RADIUS: f64 = 20.0;

    /// A shooter at or below this radius has shot itself to death
    pub const SHOOTER_DEATH_RADIUS: f64 = 2.0;
    /// A body drained to or below this radius by an area transfer dies
    pub const ABSORBED_DEATH_RADIUS: f64 = 1.0;

    /// Velocity every blob receives when the second player joins
    pub const LAUNCH_VX: f64 = 1.0;
    pub const LAUNCH_VY: f64 = 1.0;
}

/// Unit vector for a direction angle (radians)
#[inline]
pub fn unit_vector(direction: f64) -> DVec2 {
    DVec2::new(direction.cos(), direction.sin())
}

/// Angle (radians) pointing from `from` toward `to`
#[inline]
pub fn aim_angle(from: DVec2, to: DVec2) -> f64 {
    let d = to - from;
    d.y.atan2(d.x)
}
