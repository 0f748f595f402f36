//! # Connect Four
//!
//! Rules engine for Connect Four on boards of any size from 4x4 up, with a
//! terminal front end built on Ratatui.
//!
//! ## Modules
//!
//! - [`game`] — Core game logic: board, players, win detection, turn state machine
//! - [`snapshot`] — Save/resume of a game position as JSON
//! - [`ui`] — Terminal UI that plays a game through the engine
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod config;
pub mod error;
pub mod game;
pub mod snapshot;
pub mod ui;
