//! Distance estimates for A* over [`BoardNode`]s.
//!
//! All three heuristics are admissible and consistent, so A* returns a
//! shortest roll sequence with any of them. They differ only in how much
//! of the search they prune.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::die::{Facing, GOAL_FACE};
use crate::node::BoardNode;
use crate::puzzle::Direction;

/// Selectable heuristic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Heuristic {
    /// Always zero; A* degrades to uniform-cost search
    Zero,
    /// Grid distance to the goal
    Manhattan,
    /// Grid distance plus the rolls needed to bring face 1 up
    #[serde(rename = "orientation")]
    #[value(name = "orientation")]
    OrientationAware,
}

impl Heuristic {
    pub const ALL: [Heuristic; 3] = [
        Heuristic::Zero,
        Heuristic::Manhattan,
        Heuristic::OrientationAware,
    ];

    pub fn estimate(self, node: &BoardNode<'_>) -> u32 {
        match self {
            Heuristic::Zero => zero(node),
            Heuristic::Manhattan => manhattan(node),
            Heuristic::OrientationAware => orientation_aware(node),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Heuristic::Zero => "zero",
            Heuristic::Manhattan => "manhattan",
            Heuristic::OrientationAware => "orientation",
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn zero<N>(_node: &N) -> u32 {
    0
}

pub fn manhattan(node: &BoardNode<'_>) -> u32 {
    node.location().manhattan(node.board().goal())
}

/// Manhattan distance plus the extra rolls face 1 needs to end on top.
///
/// Each penalty is the smallest surplus over Manhattan distance that any
/// orientation with face 1 in the same place needs on an open board,
/// six-up rule included. Obstacles and edges only lengthen routes, so the
/// estimate never overshoots, and it drops by at most one per roll.
pub fn orientation_aware(node: &BoardNode<'_>) -> u32 {
    let here = node.location();
    let goal = node.board().goal();
    let dr = goal.row - here.row;
    let dc = goal.col - here.col;

    let penalty = match node.die().facing_of(GOAL_FACE) {
        Some(Facing::Up) => up_penalty(dr, dc),
        Some(Facing::Side(direction)) => side_penalty(direction, dr, dc),
        // Face 1 down means 6 is up, which no roll can produce
        Some(Facing::Down) | None => 0,
    };
    here.manhattan(goal) + penalty
}

/// Face 1 already up. Leaving the goal's row and column costs a full
/// four-roll turn to bring it back; on-axis a two-roll sidestep suffices.
fn up_penalty(dr: i32, dc: i32) -> u32 {
    match (dr, dc) {
        (0, 0) => 0,
        (0, _) | (_, 0) => 2,
        _ => 4,
    }
}

/// Face 1 points towards `direction`; `ahead` is the goal's offset along
/// it. Facing away from the goal lets forward rolls bring face 1 over the
/// top: exactly one step behind is free, further behind costs a detour.
/// Facing the goal or across it costs four.
fn side_penalty(direction: Direction, dr: i32, dc: i32) -> u32 {
    let (vr, vc) = direction.delta();
    let ahead = dr * vr + dc * vc;
    match ahead {
        -1 => 0,
        a if a <= -2 => 2,
        _ => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, VecDeque};

    use crate::die::Die;
    use crate::puzzle::{Board, Position};
    use crate::search::SearchNode;

    fn create_open_board(goal: Position) -> Board {
        let text: Vec<String> = (0..5)
            .map(|r| {
                (0..5)
                    .map(|c| {
                        if (r, c) == (goal.row, goal.col) {
                            "G"
                        } else if (r, c) == (0, 0) {
                            "S"
                        } else {
                            "."
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
        Board::parse(&text.join("\n")).unwrap()
    }

    /// Exact number of rolls from `node` to a goal state, by breadth-first search.
    fn true_distance(node: &BoardNode<'_>) -> Option<u32> {
        let mut seen = HashMap::from([(node.state(), 0u32)]);
        let mut queue = VecDeque::from([node.clone()]);
        while let Some(current) = queue.pop_front() {
            let depth = seen[&current.state()];
            if current.is_goal() {
                return Some(depth);
            }
            for next in current.successors() {
                if !seen.contains_key(&next.state()) {
                    seen.insert(next.state(), depth + 1);
                    queue.push_back(next);
                }
            }
        }
        None
    }

    fn all_nodes(board: &Board) -> Vec<BoardNode<'_>> {
        let mut nodes = Vec::new();
        for row in 0..board.rows() as i32 {
            for col in 0..board.cols() as i32 {
                for die in Die::orientations() {
                    nodes.push(BoardNode::new(board, Position::new(row, col), die));
                }
            }
        }
        nodes
    }

    #[test]
    fn test_known_estimates() {
        let board = Board::parse(". . . . .\nS . . . G\n. . . . .").unwrap();
        let at = |row, col, die| BoardNode::new(&board, Position::new(row, col), die);
        let start = Die::new();

        assert_eq!(zero(&at(1, 0, start)), 0);
        assert_eq!(manhattan(&at(1, 0, start)), 4);
        assert_eq!(orientation_aware(&at(1, 0, start)), 6);
        assert_eq!(orientation_aware(&at(1, 3, start)), 3);
        assert_eq!(orientation_aware(&at(1, 4, start)), 0);
        let north = start.rolled(Direction::North);
        assert_eq!(orientation_aware(&at(1, 4, north)), 4);
        // Face 1 down only exists on hand-built nodes; it adds nothing
        let down = north.rolled(Direction::North);
        assert_eq!(orientation_aware(&at(1, 2, down)), manhattan(&at(1, 2, down)));
    }

    #[test]
    fn test_face_up_off_axis() {
        let board = Board::parse("S . .\n. . .\n. . .\n. . G").unwrap();
        let node = BoardNode::start(&board);
        assert_eq!(manhattan(&node), 5);
        assert_eq!(orientation_aware(&node), 9);
        assert_eq!(true_distance(&node), Some(9));
    }

    #[test]
    fn test_estimates_are_exact_on_open_board() {
        let board = Board::parse(
            "S . . . . . .\n. . . . . . .\n. . . . . . .\n. . . . . . .\n\
             . . . G . . .\n. . . . . . .\n. . . . . . .",
        )
        .unwrap();
        let north = Die::new().rolled(Direction::North);
        let cases = [
            // face 1 up, same column as the goal
            (Position::new(1, 3), Die::new(), 5),
            // face 1 points away, goal one step behind
            (Position::new(3, 3), north, 1),
            // face 1 points away, goal three steps behind
            (Position::new(1, 3), north, 5),
            // face 1 points at the goal
            (Position::new(5, 3), north, 5),
            // face 1 points across the goal's row
            (Position::new(4, 1), north, 6),
        ];
        for (location, die, expected) in cases {
            let node = BoardNode::new(&board, location, die);
            assert_eq!(orientation_aware(&node), expected, "at {}", location);
            assert_eq!(true_distance(&node), Some(expected), "at {}", location);
        }
    }

    #[test]
    fn test_orientation_never_below_manhattan() {
        let board = create_open_board(Position::new(2, 2));
        for node in all_nodes(&board) {
            assert!(orientation_aware(&node) >= manhattan(&node));
        }
    }

    #[test]
    fn test_admissible_against_exact_distance() {
        for goal in [Position::new(2, 2), Position::new(4, 4), Position::new(0, 3)] {
            let board = create_open_board(goal);
            for node in all_nodes(&board) {
                if let Some(exact) = true_distance(&node) {
                    for heuristic in Heuristic::ALL {
                        assert!(
                            heuristic.estimate(&node) <= exact,
                            "{} overestimates at {} with\n{}",
                            heuristic,
                            node.location(),
                            node.die()
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_consistent_across_every_roll() {
        let board = create_open_board(Position::new(3, 1));
        for node in all_nodes(&board) {
            let here = orientation_aware(&node);
            for next in node.successors() {
                assert!(here <= 1 + orientation_aware(&next));
            }
        }
    }

    #[test]
    fn test_registry() {
        assert_eq!(Heuristic::ALL.len(), 3);
        assert_eq!(Heuristic::OrientationAware.to_string(), "orientation");
        assert_eq!(
            serde_json::to_string(&Heuristic::OrientationAware).unwrap(),
            "\"orientation\""
        );
        assert_eq!(serde_json::to_string(&Heuristic::Zero).unwrap(), "\"zero\"");
        let board = Board::parse("S . G").unwrap();
        let node = BoardNode::start(&board);
        assert_eq!(Heuristic::Manhattan.estimate(&node), 2);
        assert_eq!(Heuristic::Zero.estimate(&node), 0);
    }
}
