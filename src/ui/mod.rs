//! Terminal front end: renders a game and turns key presses into drops.

mod app;
mod game_view;

pub use app::{App, StatusLine};
pub use game_view::player_color;
