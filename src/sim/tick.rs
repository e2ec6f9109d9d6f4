//! Time-delta simulation step
//!
//! Produces the next world state from the current one. Deterministic: the
//! same input state and delta always give the same output, and every pass
//! walks entities in ascending id order.

use std::collections::BTreeMap;

use super::bounds::{enforce_x, y_in_bounds};
use super::collision::{ball_paddle_collision, bounce};
use super::events::{GameEvent, VictoryEvent};
use super::state::{Blob, Entity, EntityId, WorldState};

/// Next state plus the terminal events raised while producing it
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    pub state: WorldState,
    pub events: Vec<GameEvent>,
}

/// Advance `state` by `dt` milliseconds
///
/// 1. Every live entity is advanced into a fresh table; dead ones are dropped.
/// 2. In id order: a paddle bounces every blob inside it, then the entity is
///    pushed back inside the side walls if needed.
/// 3. Every blob past a goal line raises a victory for the paddle farthest
///    from it.
///
/// `state` itself is never modified.
pub fn compute_state(state: &WorldState, dt: f64) -> StepResult {
    let mut objects: BTreeMap<EntityId, Entity> = state
        .objects
        .values()
        .filter(|e| !e.is_dead())
        .map(|e| (e.id(), e.advance(dt)))
        .collect();

    let ids: Vec<EntityId> = objects.keys().copied().collect();
    for id in ids {
        if let Some(Entity::Player(paddle)) = objects.get(&id) {
            let paddle = paddle.clone();
            for entity in objects.values_mut() {
                if let Entity::Blob(ball) = entity {
                    if ball_paddle_collision(ball, &paddle) {
                        bounce(ball, &paddle);
                    }
                }
            }
        }

        if let Some(entity) = objects.get_mut(&id) {
            enforce_x(entity);
        }
    }

    let mut events = Vec::new();
    for ball in objects.values().filter_map(Entity::as_ball) {
        if !y_in_bounds(ball) {
            let winner = paddle_farthest_from_ball(ball, &objects);
            log::info!(
                "Game over: blob {} escaped at y={:.1}, paddle {} wins",
                ball.id,
                ball.pos.y,
                winner
            );
            events.push(VictoryEvent { id: winner }.into());
        }
    }

    StepResult {
        state: WorldState {
            objects,
            timestamp: state.timestamp + dt,
        },
        events,
    }
}

/// The paddle farther (vertically) from `ball`, i.e. the one it did not get past
///
/// Only the first two paddles in id order are considered. With a single
/// paddle left it wins by default; with none the winner is 0.
pub fn paddle_farthest_from_ball(ball: &Blob, objects: &BTreeMap<EntityId, Entity>) -> EntityId {
    let mut paddles = objects.values().filter_map(Entity::as_player);
    match (paddles.next(), paddles.next()) {
        (None, _) => 0,
        (Some(only), None) => only.id(),
        (Some(first), Some(second)) => {
            let d_first = (ball.pos.y - first.blob.pos.y).abs();
            let d_second = (ball.pos.y - second.blob.pos.y).abs();
            if d_first > d_second {
                first.id()
            } else {
                second.id()
            }
        }
    }
}
