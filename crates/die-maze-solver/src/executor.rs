//! Path replay with rule checking and metrics.
//!
//! Used to double-check solver output: a path is replayed from the
//! canonical start state and every roll is validated against the board.

use std::collections::HashSet;

use serde::Serialize;

use crate::die::Die;
use crate::puzzle::{Board, Direction, MoveVerdict, Position};

/// Why a replay stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ExecutionStatus {
    /// Ended on the goal with face 1 up
    Solved,
    /// A roll left the grid
    OffGrid,
    /// A roll hit an obstacle
    Blocked,
    /// A roll would have put face 6 on top
    SixUp,
    /// Every roll was legal but the final state is not a goal
    Unfinished,
}

/// Metrics collected during replay
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionMetrics {
    /// Rolls performed before stopping
    pub moves: usize,
    /// Distinct cells occupied, including the start
    pub cells_visited: usize,
    pub final_position: Position,
    pub final_top: u8,
}

/// Result of replaying a path
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub status: ExecutionStatus,
    pub metrics: ExecutionMetrics,
    pub solved: bool,
}

/// Die state during replay
struct RollState {
    position: Position,
    die: Die,
    visited: HashSet<Position>,
    moves: usize,
}

impl RollState {
    fn at_start(board: &Board) -> Self {
        let position = board.start();
        Self {
            position,
            die: Die::new(),
            visited: HashSet::from([position]),
            moves: 0,
        }
    }

    fn roll(&mut self, direction: Direction) {
        self.position = self.position.offset(direction);
        self.die.rotate(direction);
        self.visited.insert(self.position);
        self.moves += 1;
    }

    fn finish(self, status: ExecutionStatus) -> ExecutionResult {
        ExecutionResult {
            status,
            metrics: ExecutionMetrics {
                moves: self.moves,
                cells_visited: self.visited.len(),
                final_position: self.position,
                final_top: self.die.top(),
            },
            solved: status == ExecutionStatus::Solved,
        }
    }
}

/// Replay `path` from the start cell with the canonical die. Stops at the
/// first illegal roll.
pub fn execute(board: &Board, path: &[Direction]) -> ExecutionResult {
    let mut state = RollState::at_start(board);

    for &direction in path {
        let status = match board.move_verdict(direction, state.position, &state.die) {
            MoveVerdict::Legal => {
                state.roll(direction);
                continue;
            }
            MoveVerdict::OffGrid => ExecutionStatus::OffGrid,
            MoveVerdict::Blocked => ExecutionStatus::Blocked,
            MoveVerdict::SixUp => ExecutionStatus::SixUp,
        };
        return state.finish(status);
    }

    if board.is_goal(state.position, &state.die) {
        state.finish(ExecutionStatus::Solved)
    } else {
        state.finish(ExecutionStatus::Unfinished)
    }
}

/// Check whether a path is a valid solution
pub fn verify_solution(board: &Board, path: &[Direction]) -> bool {
    execute(board, path).solved
}

#[cfg(test)]
mod tests {
    use super::*;
    use Direction::*;

    fn create_simple_board() -> Board {
        Board::parse(". . . . .\nS . . . G\n. . . . .").unwrap()
    }

    #[test]
    fn test_detour_solution() {
        let board = create_simple_board();
        let path = [North, East, East, East, East, South];
        let result = execute(&board, &path);
        assert!(result.solved);
        assert_eq!(result.status, ExecutionStatus::Solved);
        assert_eq!(result.metrics.moves, 6);
        assert_eq!(result.metrics.cells_visited, 7);
        assert_eq!(result.metrics.final_position, board.goal());
        assert_eq!(result.metrics.final_top, 1);
        assert!(verify_solution(&board, &path));
        // Straight east brings face 6 up on the second roll
        assert!(!verify_solution(&board, &[East, East, East, East]));
    }

    #[test]
    fn test_empty_path_is_unfinished() {
        let board = create_simple_board();
        let result = execute(&board, &[]);
        assert_eq!(result.status, ExecutionStatus::Unfinished);
        assert_eq!(result.metrics.moves, 0);
        assert_eq!(result.metrics.cells_visited, 1);
        assert_eq!(result.metrics.final_top, 1);
    }

    #[test]
    fn test_stops_at_first_illegal_roll() {
        let board = create_simple_board();

        let result = execute(&board, &[West, East]);
        assert_eq!(result.status, ExecutionStatus::OffGrid);
        assert_eq!(result.metrics.moves, 0);

        // East twice brings face 6 up
        let result = execute(&board, &[East, East, East]);
        assert_eq!(result.status, ExecutionStatus::SixUp);
        assert_eq!(result.metrics.moves, 1);
        assert_eq!(result.metrics.final_position, Position::new(1, 1));
        assert!(!result.solved);

        let walled = Board::parse("S * G").unwrap();
        assert_eq!(execute(&walled, &[East]).status, ExecutionStatus::Blocked);
    }

    #[test]
    fn test_revisits_count_once() {
        let board = create_simple_board();
        let result = execute(&board, &[North, South, North, South]);
        assert_eq!(result.status, ExecutionStatus::Unfinished);
        assert_eq!(result.metrics.moves, 4);
        assert_eq!(result.metrics.cells_visited, 2);
    }

    #[test]
    fn test_serializes_camel_case() {
        let board = create_simple_board();
        let json = serde_json::to_value(execute(&board, &[North])).unwrap();
        assert_eq!(json["status"], "unfinished");
        assert_eq!(json["metrics"]["finalTop"], 5);
        assert_eq!(json["metrics"]["cellsVisited"], 2);
    }
}
