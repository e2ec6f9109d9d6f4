//! Terminal game events and the observer that receives them
//!
//! A `Game` is generic over its observer, so a game that nobody listens to
//! cannot be built: both `dead` and `victory` always have a handler.

use serde::{Deserialize, Serialize};

use super::state::{EntityId, EntityKind};

/// An entity shrank to nothing (shot itself out or was absorbed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadEvent {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub kind: EntityKind,
}

/// A blob crossed a goal line; `id` is the winning paddle, 0 if none remain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VictoryEvent {
    pub id: EntityId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum GameEvent {
    Dead(DeadEvent),
    Victory(VictoryEvent),
}

impl From<DeadEvent> for GameEvent {
    fn from(e: DeadEvent) -> Self {
        GameEvent::Dead(e)
    }
}

impl From<VictoryEvent> for GameEvent {
    fn from(e: VictoryEvent) -> Self {
        GameEvent::Victory(e)
    }
}

/// Receiver for terminal events, called synchronously from inside the game
pub trait GameObserver {
    fn dead(&mut self, event: DeadEvent);

    fn victory(&mut self, event: VictoryEvent);

    /// Route a `GameEvent` to the matching handler
    fn notify(&mut self, event: GameEvent) {
        match event {
            GameEvent::Dead(e) => self.dead(e),
            GameEvent::Victory(e) => self.victory(e),
        }
    }
}

/// Observer built from two closures, one per event
pub struct Callbacks<D, V>
where
    D: FnMut(DeadEvent),
    V: FnMut(VictoryEvent),
{
    on_dead: D,
    on_victory: V,
}

impl<D, V> Callbacks<D, V>
where
    D: FnMut(DeadEvent),
    V: FnMut(VictoryEvent),
{
    pub fn new(on_dead: D, on_victory: V) -> Self {
        Self {
            on_dead,
            on_victory,
        }
    }
}

impl<D, V> GameObserver for Callbacks<D, V>
where
    D: FnMut(DeadEvent),
    V: FnMut(VictoryEvent),
{
    fn dead(&mut self, event: DeadEvent) {
        (self.on_dead)(event);
    }

    fn victory(&mut self, event: VictoryEvent) {
        (self.on_victory)(event);
    }
}

/// Observer that queues events for the host to drain after each call
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take every queued event, oldest first
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl GameObserver for EventLog {
    fn dead(&mut self, event: DeadEvent) {
        self.events.push(event.into());
    }

    fn victory(&mut self, event: VictoryEvent) {
        self.events.push(event.into());
    }
}
