//! Core Connect Four game logic: board representation, players, win
//! detection, and the turn state machine.

mod board;
pub mod events;
mod player;
mod state;
pub mod win;

pub use board::{Board, Cell, COLS, MAX_DIMENSION, MIN_DIMENSION, ROWS};
pub use events::{EventLog, Fanout, GameEvent, GameObserver, TracingObserver};
pub use player::{Player, PlayerId};
pub use state::{DropOutcome, GameEngine, GameStatus, Move};
pub use win::{Direction, Run, WinDetection};
