use crate::error::MoveError;

use super::state::{DropOutcome, Move};

/// What happened in response to one drop request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Placed(Move),
    Rejected { column: usize, error: MoveError },
}

impl GameEvent {
    pub fn outcome(&self) -> DropOutcome {
        match self {
            GameEvent::Placed(mv) => mv.outcome,
            GameEvent::Rejected { error, .. } => DropOutcome::from(error),
        }
    }
}

/// Receives engine events. Presentation layers implement this to render a
/// move without the engine knowing about them.
pub trait GameObserver {
    fn on_event(&mut self, event: &GameEvent);
}

impl<F: FnMut(&GameEvent)> GameObserver for F {
    fn on_event(&mut self, event: &GameEvent) {
        self(event)
    }
}

/// Records every event in order.
#[derive(Debug, Default, Clone)]
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

    pub fn outcomes(&self) -> Vec<DropOutcome> {
        self.events.iter().map(GameEvent::outcome).collect()
    }
}

impl GameObserver for EventLog {
    fn on_event(&mut self, event: &GameEvent) {
        self.events.push(event.clone());
    }
}

/// Forwards each event to several observers in order.
#[derive(Default)]
pub struct Fanout<'a> {
    observers: Vec<&'a mut dyn GameObserver>,
}

impl<'a> Fanout<'a> {
    pub fn new() -> Self {
        Fanout {
            observers: Vec::new(),
        }
    }

    pub fn with(mut self, observer: &'a mut dyn GameObserver) -> Self {
        self.observers.push(observer);
        self
    }
}

impl GameObserver for Fanout<'_> {
    fn on_event(&mut self, event: &GameEvent) {
        for observer in self.observers.iter_mut() {
            observer.on_event(event);
        }
    }
}

/// Logs rejected drops through `tracing`. Accepted moves are already logged
/// by the engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl GameObserver for TracingObserver {
    fn on_event(&mut self, event: &GameEvent) {
        if let GameEvent::Rejected { column, error } = event {
            tracing::debug!(column, %error, "drop rejected");
        }
    }
}
