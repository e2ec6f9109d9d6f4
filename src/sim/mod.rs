//! Deterministic simulation module
//!
//! All gameplay rules live here. This module must stay pure and deterministic:
//! - Time only enters as an explicit delta
//! - Stable iteration order (by entity ID)
//! - No I/O; events are returned or handed to an observer

pub mod bounds;
pub mod collision;
pub mod events;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use bounds::{enforce_x, in_bounds, x_in_bounds, y_in_bounds};
pub use collision::{ball_paddle_collision, bounce, transfer_areas};
pub use events::{Callbacks, DeadEvent, EventLog, GameEvent, GameObserver, VictoryEvent};
pub use snapshot::{BlobRecord, EntityRecord, PlayerRecord, Snapshot};
pub use state::{Blob, Entity, EntityId, EntityKind, Player, WorldState};
pub use tick::{StepResult, compute_state, paddle_farthest_from_ball};
