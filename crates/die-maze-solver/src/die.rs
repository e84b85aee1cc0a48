//! Six-sided die orientation model.
//!
//! The die is tracked as three axes of opposite faces. Faces on opposite
//! sides always sum to seven, and a roll moves four faces around the axis
//! perpendicular to the roll direction while the two faces on that axis
//! stay put.

use std::collections::HashSet;
use std::fmt;

use crate::error::{PuzzleError, Result};
use crate::puzzle::Direction;

/// Face that must be on top when the die reaches the goal
pub const GOAL_FACE: u8 = 1;

/// Face that may never be on top after a roll
pub const FORBIDDEN_FACE: u8 = 6;

/// Where a given face currently points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facing {
    Up,
    Down,
    Side(Direction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Die {
    /// (top, bottom)
    up_down: (u8, u8),
    /// (north, south)
    north_south: (u8, u8),
    /// (east, west)
    east_west: (u8, u8),
}

impl Default for Die {
    fn default() -> Self {
        Self::new()
    }
}

impl Die {
    /// Canonical starting orientation: 1 up, 2 north, 3 east.
    pub fn new() -> Self {
        Self {
            up_down: (1, 6),
            north_south: (2, 5),
            east_west: (3, 4),
        }
    }

    /// Build the orientation with the given top, north and east faces.
    pub fn with_faces(top: u8, north: u8, east: u8) -> Result<Self> {
        Self::orientations()
            .into_iter()
            .find(|die| die.top() == top && die.north() == north && die.east() == east)
            .ok_or(PuzzleError::InvalidDie { top, north, east })
    }

    /// All 24 orientations reachable from the canonical die by rolling.
    pub fn orientations() -> Vec<Die> {
        let start = Die::new();
        let mut seen = HashSet::from([start]);
        let mut order = vec![start];
        let mut next = 0;
        while next < order.len() {
            let current = order[next];
            next += 1;
            for direction in Direction::ALL {
                let rolled = current.rolled(direction);
                if seen.insert(rolled) {
                    order.push(rolled);
                }
            }
        }
        order
    }

    /// Roll one step in `direction`.
    pub fn rotate(&mut self, direction: Direction) {
        let (top, bottom) = self.up_down;
        match direction {
            Direction::North => {
                let (north, south) = self.north_south;
                self.up_down = (south, north);
                self.north_south = (top, bottom);
            }
            Direction::South => {
                let (north, south) = self.north_south;
                self.up_down = (north, south);
                self.north_south = (bottom, top);
            }
            Direction::East => {
                let (east, west) = self.east_west;
                self.up_down = (west, east);
                self.east_west = (top, bottom);
            }
            Direction::West => {
                let (east, west) = self.east_west;
                self.up_down = (east, west);
                self.east_west = (bottom, top);
            }
        }
    }

    /// Copy of this die after a roll
    pub fn rolled(self, direction: Direction) -> Die {
        let mut next = self;
        next.rotate(direction);
        next
    }

    /// Top face after a hypothetical roll. Does not change `self`.
    pub fn peek_top_after(&self, direction: Direction) -> u8 {
        self.rolled(direction).top()
    }

    pub fn top(&self) -> u8 {
        self.up_down.0
    }

    pub fn bottom(&self) -> u8 {
        self.up_down.1
    }

    pub fn north(&self) -> u8 {
        self.north_south.0
    }

    pub fn south(&self) -> u8 {
        self.north_south.1
    }

    pub fn east(&self) -> u8 {
        self.east_west.0
    }

    pub fn west(&self) -> u8 {
        self.east_west.1
    }

    /// Face pointing in a horizontal direction
    pub fn face(&self, direction: Direction) -> u8 {
        match direction {
            Direction::North => self.north(),
            Direction::East => self.east(),
            Direction::South => self.south(),
            Direction::West => self.west(),
        }
    }

    pub fn facing_of(&self, face: u8) -> Option<Facing> {
        if self.top() == face {
            return Some(Facing::Up);
        }
        if self.bottom() == face {
            return Some(Facing::Down);
        }
        Direction::ALL
            .into_iter()
            .find(|&direction| self.face(direction) == face)
            .map(Facing::Side)
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "top {}  north {}  east {}",
            self.top(),
            self.north(),
            self.east()
        )?;
        writeln!(
            f,
            "bottom {}  south {}  west {}",
            self.bottom(),
            self.south(),
            self.west()
        )
    }
}
