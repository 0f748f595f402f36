use tracing::{debug, info};

use super::events::{GameEvent, GameObserver};
use super::win::{Run, WinDetection};
use super::{Board, Cell, Player, PlayerId};
use crate::config::AppConfig;
use crate::error::{BoardError, MoveError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Won(PlayerId),
    Tied,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        self != GameStatus::InProgress
    }
}

/// Result of a single drop request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Move accepted; carries the player whose turn it is now.
    Continue(PlayerId),
    Won(PlayerId),
    Tied,
    RejectedColumnFull,
    RejectedGameOver,
    RejectedInvalidColumn,
}

impl DropOutcome {
    pub fn is_rejection(self) -> bool {
        matches!(
            self,
            DropOutcome::RejectedColumnFull
                | DropOutcome::RejectedGameOver
                | DropOutcome::RejectedInvalidColumn
        )
    }
}

impl From<&MoveError> for DropOutcome {
    fn from(error: &MoveError) -> Self {
        match error {
            MoveError::InvalidColumn { .. } => DropOutcome::RejectedInvalidColumn,
            MoveError::ColumnFull { .. } => DropOutcome::RejectedColumnFull,
            MoveError::GameAlreadyOver => DropOutcome::RejectedGameOver,
        }
    }
}

/// An accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub row: usize,
    pub column: usize,
    pub player: PlayerId,
    pub outcome: DropOutcome,
}

/// Turn order and terminal state for one game. Owns its board and both
/// players; nothing is shared between instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEngine {
    board: Board,
    players: [Player; 2],
    current_player: PlayerId,
    status: GameStatus,
    winning_run: Option<Run>,
    win_detection: WinDetection,
}

impl GameEngine {
    /// Start a game on a `height` x `width` board. Player one moves first.
    pub fn new(
        height: usize,
        width: usize,
        player1_color: impl Into<String>,
        player2_color: impl Into<String>,
    ) -> Result<Self, BoardError> {
        let board = Board::new(height, width)?;
        let players = [
            Player::new(PlayerId::One, player1_color),
            Player::new(PlayerId::Two, player2_color),
        ];
        Ok(Self::start(board, players))
    }

    /// Start a game from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self, BoardError> {
        Ok(Self::new(
            config.board.height,
            config.board.width,
            config.players.player1_color.clone(),
            config.players.player2_color.clone(),
        )?
        .with_win_detection(config.engine.win_detection))
    }

    fn start(board: Board, players: [Player; 2]) -> Self {
        GameEngine {
            board,
            players,
            current_player: PlayerId::One,
            status: GameStatus::InProgress,
            winning_run: None,
            win_detection: WinDetection::default(),
        }
    }

    /// Rebuild a game from a validated position.
    pub(crate) fn from_parts(
        board: Board,
        players: [Player; 2],
        current_player: PlayerId,
        status: GameStatus,
        winning_run: Option<Run>,
    ) -> Self {
        GameEngine {
            board,
            players,
            current_player,
            status,
            winning_run,
            win_detection: WinDetection::default(),
        }
    }

    pub fn with_win_detection(mut self, win_detection: WinDetection) -> Self {
        self.win_detection = win_detection;
        self
    }

    /// Same board size and players, empty board.
    pub fn restarted(&self) -> Self {
        Self::start(self.board.cleared(), self.players.clone())
            .with_win_detection(self.win_detection)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn cell_at(&self, row: usize, col: usize) -> Option<Cell> {
        self.board.cell_at(row, col)
    }

    /// Player to move, or the player who made the final move once the game
    /// is over.
    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// The four cells that won the game, if it was won.
    pub fn winning_run(&self) -> Option<Run> {
        self.winning_run
    }

    pub fn win_detection(&self) -> WinDetection {
        self.win_detection
    }

    /// Columns that can still take a piece. Empty once the game is over.
    pub fn legal_columns(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }
        (0..self.board.width())
            .filter(|&col| !self.board.is_column_full(col))
            .collect()
    }

    /// Drop the current player's piece into `column`.
    pub fn play(&mut self, column: usize) -> Result<Move, MoveError> {
        if self.is_terminal() {
            return Err(MoveError::GameAlreadyOver);
        }

        let row = self
            .board
            .landing_row(column)?
            .ok_or(MoveError::ColumnFull { column })?;
        let player = self.current_player;
        self.board.place(row, column, player);

        let win = self.win_detection.detect(&self.board, row, column, player);
        let outcome = if let Some(run) = win {
            self.status = GameStatus::Won(player);
            self.winning_run = Some(run);
            info!(player = player.number(), ?run, "game won");
            DropOutcome::Won(player)
        } else if self.board.is_full() {
            self.status = GameStatus::Tied;
            info!("game tied");
            DropOutcome::Tied
        } else {
            self.current_player = player.other();
            DropOutcome::Continue(self.current_player)
        };

        debug!(player = player.number(), row, column, ?outcome, "piece placed");
        Ok(Move {
            row,
            column,
            player,
            outcome,
        })
    }

    /// Drop the current player's piece into `column`, reporting rejections as
    /// outcomes rather than errors.
    pub fn drop_piece(&mut self, column: usize) -> DropOutcome {
        match self.play(column) {
            Ok(mv) => mv.outcome,
            Err(error) => {
                debug!(column, %error, "drop rejected");
                DropOutcome::from(&error)
            }
        }
    }

    /// Like [`GameEngine::drop_piece`], also handing the resulting event to
    /// `observer`.
    pub fn drop_piece_observed(
        &mut self,
        column: usize,
        observer: &mut dyn GameObserver,
    ) -> DropOutcome {
        let event = match self.play(column) {
            Ok(mv) => GameEvent::Placed(mv),
            Err(error) => GameEvent::Rejected { column, error },
        };
        observer.on_event(&event);
        event.outcome()
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::start(
            Board::standard(),
            [
                Player::new(PlayerId::One, "red"),
                Player::new(PlayerId::Two, "blue"),
            ],
        )
    }
}
