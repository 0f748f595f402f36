use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;
use crate::game::win::{find_winning_run, has_win};
use crate::game::{Board, Cell, GameEngine, GameStatus, Player, PlayerId};

fn default_colors() -> [String; 2] {
    ["red".to_string(), "blue".to_string()]
}

/// Minimal position needed to resume a game. `grid` lists rows from the top,
/// with 0 for an empty cell and the player id otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub height: usize,
    pub width: usize,
    pub grid: Vec<Vec<u8>>,
    pub current_player: u8,
    pub terminal: bool,
    #[serde(default = "default_colors")]
    pub colors: [String; 2],
}

impl GameSnapshot {
    pub fn capture(game: &GameEngine) -> Self {
        let board = game.board();
        let grid = board
            .rows()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.player().map_or(0, PlayerId::number))
                    .collect()
            })
            .collect();
        GameSnapshot {
            height: board.height(),
            width: board.width(),
            grid,
            current_player: game.current_player().number(),
            terminal: game.is_terminal(),
            colors: [
                game.player(PlayerId::One).color.clone(),
                game.player(PlayerId::Two).color.clone(),
            ],
        }
    }

    /// Rebuild the game, checking that the position could have been reached
    /// by legal play. The outcome is recomputed from the board.
    pub fn restore(&self) -> Result<GameEngine, SnapshotError> {
        let board = self.board()?;
        let current =
            PlayerId::try_from(self.current_player).map_err(SnapshotError::Inconsistent)?;

        let ones = board.count(PlayerId::One);
        let twos = board.count(PlayerId::Two);
        if ones != twos && ones != twos + 1 {
            return Err(SnapshotError::Inconsistent(format!(
                "player 1 has {ones} pieces and player 2 has {twos}"
            )));
        }
        let last_mover = if ones > twos {
            PlayerId::One
        } else {
            PlayerId::Two
        };

        let (status, run) = match (
            find_winning_run(&board, PlayerId::One),
            find_winning_run(&board, PlayerId::Two),
        ) {
            (Some(_), Some(_)) => {
                return Err(SnapshotError::Inconsistent(
                    "both players have four in a row".into(),
                ))
            }
            (Some(run), None) => (GameStatus::Won(PlayerId::One), Some(run)),
            (None, Some(run)) => (GameStatus::Won(PlayerId::Two), Some(run)),
            (None, None) if board.is_full() => (GameStatus::Tied, None),
            (None, None) => (GameStatus::InProgress, None),
        };

        if status.is_terminal() != self.terminal {
            return Err(SnapshotError::Inconsistent(format!(
                "terminal flag is {} but the position is {status:?}",
                self.terminal
            )));
        }

        let expected = match status {
            GameStatus::Won(winner) if winner != last_mover => {
                return Err(SnapshotError::Inconsistent(format!(
                    "{winner} has four in a row but {last_mover} moved last"
                )))
            }
            GameStatus::Won(winner) if !has_final_move(&board, winner) => {
                return Err(SnapshotError::Inconsistent(format!(
                    "{winner} kept playing after four in a row"
                )))
            }
            GameStatus::Won(_) | GameStatus::Tied => last_mover,
            GameStatus::InProgress => last_mover.other(),
        };
        if current != expected {
            return Err(SnapshotError::Inconsistent(format!(
                "current player is {current} but should be {expected}"
            )));
        }

        let players = [
            Player::new(PlayerId::One, self.colors[0].clone()),
            Player::new(PlayerId::Two, self.colors[1].clone()),
        ];
        Ok(GameEngine::from_parts(board, players, current, status, run))
    }

    fn board(&self) -> Result<Board, SnapshotError> {
        if self.grid.len() != self.height {
            return Err(SnapshotError::Inconsistent(format!(
                "grid has {} rows, expected {}",
                self.grid.len(),
                self.height
            )));
        }
        let mut cells = Vec::new();
        for (row, values) in self.grid.iter().enumerate() {
            if values.len() != self.width {
                return Err(SnapshotError::Inconsistent(format!(
                    "row {row} has {} cells, expected {}",
                    values.len(),
                    self.width
                )));
            }
            for &value in values {
                cells.push(match value {
                    0 => Cell::Empty,
                    id => Cell::Occupied(
                        PlayerId::try_from(id).map_err(SnapshotError::Inconsistent)?,
                    ),
                });
            }
        }
        Ok(Board::from_cells(self.height, self.width, cells)?)
    }
}

/// Whether some top piece of `winner`, once lifted, leaves a board with no
/// four in a row. That piece is the move that could have ended the game.
fn has_final_move(board: &Board, winner: PlayerId) -> bool {
    (0..board.width()).any(|col| {
        let mut before = board.clone();
        before.lift(col) == Some(winner) && !has_win(&before, winner)
    })
}

impl GameEngine {
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(self)
    }

    pub fn restore(snapshot: &GameSnapshot) -> Result<Self, SnapshotError> {
        snapshot.restore()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::DropOutcome;

    fn snapshot_of(layout: &str, current_player: u8, terminal: bool) -> GameSnapshot {
        let board = Board::from_layout(layout).unwrap();
        GameSnapshot {
            height: board.height(),
            width: board.width(),
            grid: board
                .rows()
                .map(|row| {
                    row.iter()
                        .map(|c| c.player().map_or(0, PlayerId::number))
                        .collect()
                })
                .collect(),
            current_player,
            terminal,
            colors: default_colors(),
        }
    }

    #[test]
    fn test_capture_and_restore_in_progress() {
        let mut game = GameEngine::new(6, 7, "gold", "teal").unwrap();
        for col in [3, 3, 4] {
            game.drop_piece(col);
        }
        let snapshot = game.snapshot();
        assert_eq!(snapshot.grid[5], vec![0, 0, 0, 1, 1, 0, 0]);
        assert_eq!(snapshot.grid[4], vec![0, 0, 0, 2, 0, 0, 0]);
        assert_eq!(snapshot.current_player, 2);
        assert!(!snapshot.terminal);

        let mut restored = GameEngine::restore(&snapshot).unwrap();
        assert_eq!(restored, game);
        assert_eq!(restored.player(PlayerId::One).color, "gold");
        assert_eq!(restored.drop_piece(0), DropOutcome::Continue(PlayerId::One));
    }

    #[test]
    fn test_restore_recomputes_win() {
        let mut game = GameEngine::default();
        for col in [0, 1, 0, 1, 0, 1, 0] {
            game.drop_piece(col);
        }
        let restored = game.snapshot().restore().unwrap();
        assert_eq!(restored.status(), GameStatus::Won(PlayerId::One));
        assert_eq!(restored.winning_run(), game.winning_run());
        assert_eq!(restored.current_player(), PlayerId::One);
    }

    #[test]
    fn test_long_line_roundtrip_keeps_run() {
        let mut game = GameEngine::default();
        for col in [0, 0, 1, 1, 2, 2, 4, 4, 5, 6, 3] {
            game.drop_piece(col);
        }
        let restored = game.snapshot().restore().unwrap();
        assert_eq!(restored, game);
        assert_eq!(
            restored.winning_run(),
            Some([(5, 0), (5, 1), (5, 2), (5, 3)])
        );
    }

    #[test]
    fn test_rejects_moves_after_win() {
        // Player 1 finished the column, then player 2 capped it and player 1
        // dropped again elsewhere.
        let snapshot = snapshot_of(
            ".....
             2....
             1....
             1....
             12...
             122.1",
            1,
            true,
        );
        assert!(matches!(snapshot.restore(), Err(SnapshotError::Inconsistent(_))));
    }

    #[test]
    fn test_rejects_oversized_width_without_panicking() {
        let snapshot = GameSnapshot {
            height: 4,
            width: usize::MAX,
            grid: vec![vec![0; 4]; 4],
            current_player: 1,
            terminal: false,
            colors: default_colors(),
        };
        assert!(matches!(snapshot.restore(), Err(SnapshotError::Inconsistent(_))));
    }

    #[test]
    fn test_json_shape() {
        let game = GameEngine::new(4, 4, "red", "blue").unwrap();
        let json = serde_json::to_value(game.snapshot()).unwrap();
        assert_eq!(json["height"], 4);
        assert_eq!(json["current_player"], 1);
        assert_eq!(json["terminal"], false);
        assert_eq!(json["grid"][3], serde_json::json!([0, 0, 0, 0]));
    }

    #[test]
    fn test_missing_colors_default() {
        let json = r#"{"height":4,"width":4,"grid":[[0,0,0,0],[0,0,0,0],[0,0,0,0],[0,0,0,0]],"current_player":1,"terminal":false}"#;
        let snapshot: GameSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.colors, default_colors());
        assert!(snapshot.restore().is_ok());
    }

    #[test]
    fn test_rejects_bad_grid_shape() {
        let mut snapshot = GameEngine::default().snapshot();
        snapshot.grid.pop();
        assert!(matches!(snapshot.restore(), Err(SnapshotError::Inconsistent(_))));

        let mut snapshot = GameEngine::default().snapshot();
        snapshot.grid[2].push(0);
        assert!(matches!(snapshot.restore(), Err(SnapshotError::Inconsistent(_))));
    }

    #[test]
    fn test_rejects_bad_cell_value() {
        let mut snapshot = GameEngine::default().snapshot();
        snapshot.grid[5][0] = 3;
        assert!(matches!(snapshot.restore(), Err(SnapshotError::Inconsistent(_))));
    }

    #[test]
    fn test_rejects_floating_piece() {
        let mut snapshot = GameEngine::default().snapshot();
        snapshot.grid[0][0] = 1;
        assert!(matches!(snapshot.restore(), Err(SnapshotError::Board(_))));
    }

    #[test]
    fn test_rejects_degenerate_dimensions() {
        let snapshot = GameSnapshot {
            height: 1,
            width: 1,
            grid: vec![vec![0]],
            current_player: 1,
            terminal: false,
            colors: default_colors(),
        };
        assert!(matches!(snapshot.restore(), Err(SnapshotError::Board(_))));
    }

    #[test]
    fn test_rejects_piece_count_mismatch() {
        let snapshot = snapshot_of(
            "....
             ....
             ....
             11..",
            2,
            false,
        );
        assert!(snapshot.restore().is_err());
    }

    #[test]
    fn test_rejects_wrong_current_player() {
        let snapshot = snapshot_of(
            "....
             ....
             ....
             12..",
            2,
            false,
        );
        assert!(snapshot.restore().is_err());
        let ok = snapshot_of(
            "....
             ....
             ....
             12..",
            1,
            false,
        );
        assert!(ok.restore().is_ok());
    }

    #[test]
    fn test_rejects_terminal_flag_mismatch() {
        let won_but_open = snapshot_of(
            ".....
             2....
             2....
             21111",
            1,
            false,
        );
        assert!(matches!(
            won_but_open.restore(),
            Err(SnapshotError::Inconsistent(_))
        ));

        let open_but_terminal = snapshot_of(
            "....
             ....
             ....
             12..",
            1,
            true,
        );
        assert!(open_but_terminal.restore().is_err());
    }

    #[test]
    fn test_rejects_win_by_player_who_did_not_move_last() {
        let snapshot = snapshot_of(
            "2....
             2....
             21.1.
             2111.",
            2,
            true,
        );
        assert!(matches!(snapshot.restore(), Err(SnapshotError::Inconsistent(_))));
    }
}
