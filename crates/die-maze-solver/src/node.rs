//! Search nodes over a maze board.

use std::hash::{Hash, Hasher};

use crate::die::Die;
use crate::puzzle::{Board, Direction, Position};
use crate::search::SearchNode;

/// Die position and orientation plus the rolls that led there.
///
/// Two nodes are equal when location and orientation match; the path
/// does not take part in equality or hashing.
#[derive(Debug, Clone)]
pub struct BoardNode<'a> {
    board: &'a Board,
    location: Position,
    die: Die,
    path: Vec<Direction>,
}

impl<'a> BoardNode<'a> {
    pub fn new(board: &'a Board, location: Position, die: Die) -> Self {
        Self {
            board,
            location,
            die,
            path: Vec::new(),
        }
    }

    /// Canonical die on the start cell
    pub fn start(board: &'a Board) -> Self {
        Self::new(board, board.start(), Die::new())
    }

    pub fn board(&self) -> &'a Board {
        self.board
    }

    pub fn location(&self) -> Position {
        self.location
    }

    pub fn die(&self) -> Die {
        self.die
    }
}

impl PartialEq for BoardNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.location == other.location && self.die == other.die
    }
}

impl Eq for BoardNode<'_> {}

impl Hash for BoardNode<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.location.hash(state);
        self.die.hash(state);
    }
}

impl SearchNode for BoardNode<'_> {
    type State = (Position, Die);
    type Step = Direction;

    fn state(&self) -> (Position, Die) {
        (self.location, self.die)
    }

    fn successors(&self) -> Vec<Self> {
        self.board
            .legal_moves(self.location, &self.die)
            .into_iter()
            .map(|direction| {
                let (location, die) = self.board.next_state(direction, self.location, &self.die);
                let mut path = Vec::with_capacity(self.path.len() + 1);
                path.extend_from_slice(&self.path);
                path.push(direction);
                BoardNode {
                    board: self.board,
                    location,
                    die,
                    path,
                }
            })
            .collect()
    }

    fn is_goal(&self) -> bool {
        self.board.is_goal(self.location, &self.die)
    }

    fn path(&self) -> &[Direction] {
        &self.path
    }
}

/// Location-only node that ignores the die entirely. Any route found for
/// the real puzzle is also a route here, so a failed search over these
/// nodes proves the puzzle unsolvable.
#[derive(Debug, Clone)]
pub struct RelaxedNode<'a> {
    board: &'a Board,
    location: Position,
    path: Vec<Direction>,
}

impl<'a> RelaxedNode<'a> {
    pub fn new(board: &'a Board, location: Position) -> Self {
        Self {
            board,
            location,
            path: Vec::new(),
        }
    }

    pub fn start(board: &'a Board) -> Self {
        Self::new(board, board.start())
    }

    pub fn location(&self) -> Position {
        self.location
    }
}

impl SearchNode for RelaxedNode<'_> {
    type State = Position;
    type Step = Direction;

    fn state(&self) -> Position {
        self.location
    }

    fn successors(&self) -> Vec<Self> {
        Direction::ALL
            .into_iter()
            .filter(|&direction| self.board.is_open(self.location.offset(direction)))
            .map(|direction| {
                let mut path = self.path.clone();
                path.push(direction);
                RelaxedNode {
                    board: self.board,
                    location: self.location.offset(direction),
                    path,
                }
            })
            .collect()
    }

    fn is_goal(&self) -> bool {
        self.location == self.board.goal()
    }

    fn path(&self) -> &[Direction] {
        &self.path
    }
}
