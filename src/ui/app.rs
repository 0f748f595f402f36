use crate::game::{
    DropOutcome, Fanout, GameEngine, GameEvent, GameObserver, PlayerId, TracingObserver,
};
use crate::snapshot::SnapshotStore;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use std::io;

/// Turns engine events into the one-line message shown under the board.
#[derive(Debug, Default)]
pub struct StatusLine {
    message: Option<String>,
}

impl StatusLine {
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn set(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn clear(&mut self) {
        self.message = None;
    }
}

impl GameObserver for StatusLine {
    fn on_event(&mut self, event: &GameEvent) {
        self.message = match event.outcome() {
            DropOutcome::Continue(_) => None,
            DropOutcome::Won(player) => Some(format!("{player} wins!")),
            DropOutcome::Tied => Some("It's a tie!".to_string()),
            DropOutcome::RejectedColumnFull => Some("Column is full!".to_string()),
            DropOutcome::RejectedInvalidColumn => Some("Invalid column!".to_string()),
            DropOutcome::RejectedGameOver => {
                Some("Game over! Press 'r' to restart.".to_string())
            }
        };
    }
}

pub struct App {
    game: GameEngine,
    store: SnapshotStore,
    selected_column: usize,
    should_quit: bool,
    status: StatusLine,
}

impl App {
    pub fn new(game: GameEngine, store: SnapshotStore) -> Self {
        let selected_column = game.board().width() / 2;
        App {
            game,
            store,
            selected_column,
            should_quit: false,
            status: StatusLine::default(),
        }
    }

    pub fn game(&self) -> &GameEngine {
        &self.game
    }

    pub fn message(&self) -> Option<&str> {
        self.status.message()
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
        }
        Ok(())
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Handle key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        self.status.clear();

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                self.selected_column = self.selected_column.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.selected_column + 1 < self.game.board().width() {
                    self.selected_column += 1;
                }
            }
            KeyCode::Char(c @ '1'..='9') => {
                let col = c as usize - '1' as usize;
                if col < self.game.board().width() {
                    self.selected_column = col;
                    self.drop_piece();
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.drop_piece();
            }
            KeyCode::Char('r') => {
                self.game = self.game.restarted();
                self.selected_column = self.game.board().width() / 2;
                self.status.set("New game started!");
            }
            KeyCode::Char('s') => self.save(),
            _ => {}
        }
    }

    /// Drop piece in selected column
    fn drop_piece(&mut self) {
        let mut tracer = TracingObserver;
        let mut observers = Fanout::new().with(&mut self.status).with(&mut tracer);
        self.game
            .drop_piece_observed(self.selected_column, &mut observers);
    }

    fn save(&mut self) {
        match self.store.save(&self.game) {
            Ok(path) => {
                let msg = format!("Game saved to {}", path.display());
                self.status.set(msg);
            }
            Err(err) => {
                tracing::error!(%err, "failed to save game");
                self.status.set(format!("Save failed: {err}"));
            }
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn current_player(&self) -> PlayerId {
        self.game.current_player()
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        super::game_view::render(
            frame,
            &self.game,
            self.selected_column,
            self.status.message(),
        );
    }
}
