//! Board representation for rolling-die mazes.
//!
//! A board is a rectangular grid read from whitespace-separated tokens:
//! `.` for a free cell, `*` for an obstacle, `S` for the start and `G`
//! for the goal. Row 0 is the northernmost row and column 0 the
//! westernmost column.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::die::{Die, FORBIDDEN_FACE, GOAL_FACE};
use crate::error::{PuzzleError, Result};

/// Compass direction of a single roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Every direction, in the order moves are generated.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Row and column offset of one step in this direction
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (-1, 0),
            Direction::East => (0, 1),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "NORTH",
            Direction::East => "EAST",
            Direction::South => "SOUTH",
            Direction::West => "WEST",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Cell coordinate. Signed so that stepping off the board is representable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The neighbouring cell in `direction`
    pub fn offset(self, direction: Direction) -> Position {
        let (dr, dc) = direction.delta();
        Position::new(self.row + dr, self.col + dc)
    }

    pub fn manhattan(self, other: Position) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Contents of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    Free,
    Obstacle,
    Start,
    Goal,
}

impl Cell {
    pub fn from_token(token: &str) -> Option<Cell> {
        match token {
            "." => Some(Cell::Free),
            "*" => Some(Cell::Obstacle),
            "S" => Some(Cell::Start),
            "G" => Some(Cell::Goal),
            _ => None,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Cell::Free => ".",
            Cell::Obstacle => "*",
            Cell::Start => "S",
            Cell::Goal => "G",
        }
    }

    /// Whether the die may rest on this cell
    pub fn is_passable(self) -> bool {
        self != Cell::Obstacle
    }
}

/// Outcome of checking a single roll against the board rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveVerdict {
    Legal,
    /// Target lies outside the grid
    OffGrid,
    /// Target is an obstacle
    Blocked,
    /// The roll would leave face 6 on top
    SixUp,
}

/// A parsed maze. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    grid: Vec<Vec<Cell>>,
    start: Position,
    goal: Position,
}

impl Board {
    /// Parse a board from its textual form. Blank lines are ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let mut grid: Vec<Vec<Cell>> = Vec::new();
        let mut starts = Vec::new();
        let mut goals = Vec::new();

        for line in text.lines() {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.is_empty() {
                continue;
            }

            let row = grid.len();
            let mut cells = Vec::with_capacity(tokens.len());
            for (col, token) in tokens.into_iter().enumerate() {
                let cell = Cell::from_token(token).ok_or_else(|| PuzzleError::UnknownToken {
                    token: token.to_string(),
                    row,
                    col,
                })?;
                let position = Position::new(row as i32, col as i32);
                match cell {
                    Cell::Start => starts.push(position),
                    Cell::Goal => goals.push(position),
                    _ => {}
                }
                cells.push(cell);
            }

            if let Some(first) = grid.first() {
                if cells.len() != first.len() {
                    return Err(PuzzleError::RaggedRow {
                        row,
                        expected: first.len(),
                        found: cells.len(),
                    });
                }
            }
            grid.push(cells);
        }

        if grid.is_empty() {
            return Err(PuzzleError::Empty);
        }

        let start = match starts.as_slice() {
            [only] => *only,
            [] => return Err(PuzzleError::NoStart),
            many => return Err(PuzzleError::MultipleStarts(many.len())),
        };
        let goal = match goals.as_slice() {
            [only] => *only,
            [] => return Err(PuzzleError::NoGoal),
            many => return Err(PuzzleError::MultipleGoals(many.len())),
        };

        debug!(
            rows = grid.len(),
            cols = grid[0].len(),
            %start,
            %goal,
            "parsed board"
        );

        Ok(Self { grid, start, goal })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| PuzzleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    pub fn rows(&self) -> usize {
        self.grid.len()
    }

    pub fn cols(&self) -> usize {
        self.grid[0].len()
    }

    /// The cell at `position`, or `None` when it lies off the grid
    pub fn cell(&self, position: Position) -> Option<Cell> {
        let row = usize::try_from(position.row).ok()?;
        let col = usize::try_from(position.col).ok()?;
        self.grid.get(row)?.get(col).copied()
    }

    /// In bounds and not an obstacle
    pub fn is_open(&self, position: Position) -> bool {
        self.cell(position).is_some_and(Cell::is_passable)
    }

    /// Check a roll from `location` without performing it.
    pub fn move_verdict(&self, direction: Direction, location: Position, die: &Die) -> MoveVerdict {
        match self.cell(location.offset(direction)) {
            None => MoveVerdict::OffGrid,
            Some(Cell::Obstacle) => MoveVerdict::Blocked,
            Some(_) if die.peek_top_after(direction) == FORBIDDEN_FACE => MoveVerdict::SixUp,
            Some(_) => MoveVerdict::Legal,
        }
    }

    pub fn is_legal_move(&self, direction: Direction, location: Position, die: &Die) -> bool {
        self.move_verdict(direction, location, die) == MoveVerdict::Legal
    }

    /// Legal rolls from a state, always in north, east, south, west order.
    pub fn legal_moves(&self, location: Position, die: &Die) -> SmallVec<[Direction; 4]> {
        Direction::ALL
            .iter()
            .copied()
            .filter(|&direction| self.is_legal_move(direction, location, die))
            .collect()
    }

    /// The state reached by rolling. The inputs are left untouched.
    pub fn next_state(&self, direction: Direction, location: Position, die: &Die) -> (Position, Die) {
        (location.offset(direction), die.rolled(direction))
    }

    pub fn is_goal(&self, location: Position, die: &Die) -> bool {
        self.cell(location) == Some(Cell::Goal) && die.top() == GOAL_FACE
    }

    /// Render the grid with `D` marking the die, followed by its faces.
    pub fn render_with_die(&self, location: Position, die: &Die) -> String {
        let mut out = String::new();
        for (r, row) in self.grid.iter().enumerate() {
            let tokens: Vec<&str> = row
                .iter()
                .enumerate()
                .map(|(c, cell)| {
                    if Position::new(r as i32, c as i32) == location {
                        "D"
                    } else {
                        cell.token()
                    }
                })
                .collect();
            out.push_str(&tokens.join(" "));
            out.push('\n');
        }
        out.push_str(&die.to_string());
        out
    }
}

impl FromStr for Board {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.grid {
            let tokens: Vec<&str> = row.iter().map(|cell| cell.token()).collect();
            writeln!(f, "{}", tokens.join(" "))?;
        }
        Ok(())
    }
}
