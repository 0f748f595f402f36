//! Four-in-a-row detection.
//!
//! A run is four coordinates starting at some cell and stepping along one of
//! four direction vectors. It wins for a player iff every coordinate is on the
//! board and holds that player's piece. [`find_winning_run`] tries every start
//! cell; [`winning_run_through`] only tries the runs that contain a given
//! cell, which is all that can change after a single drop.
//!
//! When a line is longer than four, several runs win. Both searches report
//! the one whose start cell comes first in row-major order, breaking ties by
//! [`Direction::ALL`] order. After a legal drop every winning run contains
//! the new piece, so the two searches return the same run.

use serde::{Deserialize, Serialize};

use super::{Board, Cell, PlayerId};

/// Number of pieces in a winning line.
pub const RUN_LENGTH: usize = 4;

/// Four `(row, col)` coordinates forming a winning line.
pub type Run = [(usize, usize); RUN_LENGTH];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Horizontal,
    Vertical,
    DiagonalDownRight,
    DiagonalDownLeft,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::DiagonalDownRight,
        Direction::DiagonalDownLeft,
    ];

    /// `(row, col)` step
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
            Direction::DiagonalDownRight => (1, 1),
            Direction::DiagonalDownLeft => (1, -1),
        }
    }
}

/// Strategy the engine uses to look for a win after each drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinDetection {
    /// Only the runs through the piece just placed.
    #[default]
    LastMove,
    /// Every run on the board.
    FullScan,
}

impl WinDetection {
    /// Winning run for `player` after a piece landed at `(row, col)`.
    pub fn detect(self, board: &Board, row: usize, col: usize, player: PlayerId) -> Option<Run> {
        match self {
            WinDetection::LastMove => winning_run_through(board, row, col, player),
            WinDetection::FullScan => find_winning_run(board, player),
        }
    }
}

/// Coordinates of the run starting at `(row, col)`, if it fits on the board.
fn run_from(board: &Board, row: isize, col: isize, direction: Direction) -> Option<Run> {
    let (dr, dc) = direction.delta();
    let mut run = [(0, 0); RUN_LENGTH];
    for (step, slot) in run.iter_mut().enumerate() {
        let r = row + dr * step as isize;
        let c = col + dc * step as isize;
        if r < 0 || c < 0 || r as usize >= board.height() || c as usize >= board.width() {
            return None;
        }
        *slot = (r as usize, c as usize);
    }
    Some(run)
}

fn owned_by(board: &Board, run: &Run, player: PlayerId) -> bool {
    run.iter()
        .all(|&(r, c)| board.cell_at(r, c) == Some(Cell::Occupied(player)))
}

/// Scan every start cell and direction for a run owned by `player`.
pub fn find_winning_run(board: &Board, player: PlayerId) -> Option<Run> {
    for row in 0..board.height() as isize {
        for col in 0..board.width() as isize {
            for direction in Direction::ALL {
                if let Some(run) = run_from(board, row, col, direction) {
                    if owned_by(board, &run, player) {
                        return Some(run);
                    }
                }
            }
        }
    }
    None
}

/// Look for a run owned by `player` that passes through `(row, col)`.
pub fn winning_run_through(
    board: &Board,
    row: usize,
    col: usize,
    player: PlayerId,
) -> Option<Run> {
    if board.cell_at(row, col) != Some(Cell::Occupied(player)) {
        return None;
    }
    Direction::ALL
        .iter()
        .enumerate()
        .flat_map(|(index, &direction)| {
            let (dr, dc) = direction.delta();
            (0..RUN_LENGTH as isize).filter_map(move |offset| {
                let start_row = row as isize - dr * offset;
                let start_col = col as isize - dc * offset;
                run_from(board, start_row, start_col, direction).map(|run| (run, index))
            })
        })
        .filter(|(run, _)| owned_by(board, run, player))
        .min_by_key(|&(run, index)| (run[0], index))
        .map(|(run, _)| run)
}

pub fn has_win(board: &Board, player: PlayerId) -> bool {
    find_winning_run(board, player).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const ONE: PlayerId = PlayerId::One;
    const TWO: PlayerId = PlayerId::Two;

    fn layout(rows: &str) -> Board {
        Board::from_layout(rows).unwrap()
    }

    fn random_grid() -> impl Strategy<Value = Board> {
        (4usize..9, 4usize..9).prop_flat_map(|(height, width)| {
            prop::collection::vec(0u8..3, height * width).prop_map(move |values| {
                let mut board = Board::new(height, width).unwrap();
                for (i, value) in values.into_iter().enumerate() {
                    let cell = match value {
                        1 => Cell::Occupied(ONE),
                        2 => Cell::Occupied(TWO),
                        _ => Cell::Empty,
                    };
                    board.set(i / width, i % width, cell);
                }
                board
            })
        })
    }

    fn mirror_columns(board: &Board) -> Board {
        let mut out = Board::new(board.height(), board.width()).unwrap();
        for row in 0..board.height() {
            for col in 0..board.width() {
                let cell = board.cell_at(row, col).unwrap();
                out.set(row, board.width() - 1 - col, cell);
            }
        }
        out
    }

    fn reverse_rows(board: &Board) -> Board {
        let mut out = Board::new(board.height(), board.width()).unwrap();
        for row in 0..board.height() {
            for col in 0..board.width() {
                let cell = board.cell_at(row, col).unwrap();
                out.set(board.height() - 1 - row, col, cell);
            }
        }
        out
    }

    #[test]
    fn test_each_direction() {
        let horizontal = layout(
            "......
             ......
             ......
             ..222.
             .1111.",
        );
        assert_eq!(
            find_winning_run(&horizontal, ONE),
            Some([(4, 1), (4, 2), (4, 3), (4, 4)])
        );
        assert!(!has_win(&horizontal, TWO));

        let vertical = layout(
            "....
             2...
             2.1.
             2.1.
             2.1.",
        );
        assert_eq!(
            winning_run_through(&vertical, 1, 0, TWO),
            Some([(1, 0), (2, 0), (3, 0), (4, 0)])
        );
        assert!(!has_win(&vertical, ONE));

        let down_right = layout(
            "1......
             21.....
             221....
             1221...",
        );
        assert_eq!(
            find_winning_run(&down_right, ONE),
            Some([(0, 0), (1, 1), (2, 2), (3, 3)])
        );

        let down_left = layout(
            "......2
             .....21
             ....212
             ...2111",
        );
        assert_eq!(
            winning_run_through(&down_left, 3, 3, TWO),
            Some([(0, 6), (1, 5), (2, 4), (3, 3)])
        );
    }

    #[test]
    fn test_three_is_not_a_win() {
        let board = layout(
            "....
             ....
             ....
             111.",
        );
        assert!(!has_win(&board, ONE));
        assert_eq!(winning_run_through(&board, 3, 1, ONE), None);
    }

    #[test]
    fn test_run_must_stay_on_board() {
        // Pieces at the right edge and the left edge of the next row are
        // adjacent in memory but not on the board.
        let board = layout(
            "....
             ....
             .111
             1222",
        );
        assert!(!has_win(&board, ONE));
    }

    #[test]
    fn test_check_through_requires_player_at_cell() {
        let board = layout(
            "....
             ....
             ....
             1111",
        );
        assert_eq!(winning_run_through(&board, 3, 0, TWO), None);
        assert_eq!(winning_run_through(&board, 0, 0, ONE), None);
        assert!(winning_run_through(&board, 3, 3, ONE).is_some());
    }

    #[test]
    fn test_long_line_reports_first_run() {
        let board = layout(
            "......
             ......
             222...
             111112",
        );
        let first = Some([(3, 0), (3, 1), (3, 2), (3, 3)]);
        assert_eq!(find_winning_run(&board, ONE), first);
        for col in 0..4 {
            assert_eq!(winning_run_through(&board, 3, col, ONE), first);
        }
        assert_eq!(
            winning_run_through(&board, 3, 4, ONE),
            Some([(3, 1), (3, 2), (3, 3), (3, 4)])
        );
    }

    #[test]
    fn test_detection_strategies_agree_on_random_games() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let height = rng.random_range(4..9);
            let width = rng.random_range(4..9);
            let mut board = Board::new(height, width).unwrap();
            let mut player = ONE;
            loop {
                let open: Vec<usize> = (0..width).filter(|&c| !board.is_column_full(c)).collect();
                if open.is_empty() {
                    break;
                }
                let col = open[rng.random_range(0..open.len())];
                let row = board.drop_piece(col, player).unwrap();
                let through = WinDetection::LastMove.detect(&board, row, col, player);
                let scan = WinDetection::FullScan.detect(&board, row, col, player);
                assert_eq!(through, scan, "board:\n{board}");
                if through.is_some() {
                    break;
                }
                player = player.other();
            }
        }
    }

    proptest! {
        #[test]
        fn test_mirror_invariance(board in random_grid()) {
            let mirrored = mirror_columns(&board);
            for player in [ONE, TWO] {
                prop_assert_eq!(has_win(&board, player), has_win(&mirrored, player));
            }
        }

        #[test]
        fn test_row_reversal_invariance(board in random_grid()) {
            let reversed = reverse_rows(&board);
            for player in [ONE, TWO] {
                prop_assert_eq!(has_win(&board, player), has_win(&reversed, player));
            }
        }

        #[test]
        fn test_found_run_is_owned(board in random_grid()) {
            for player in [ONE, TWO] {
                if let Some(run) = find_winning_run(&board, player) {
                    for (r, c) in run {
                        prop_assert_eq!(board.cell_at(r, c), Some(Cell::Occupied(player)));
                    }
                    prop_assert!(winning_run_through(&board, run[0].0, run[0].1, player).is_some());
                }
            }
        }
    }
}
