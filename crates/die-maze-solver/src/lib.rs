//! Optimal solver for rolling-die maze puzzles.
//!
//! A standard die starts on the `S` cell of a grid with 1 on top, 2 facing
//! north and 3 facing east. Each move rolls it one cell north, east, south
//! or west. Obstacles and the grid edge block moves, and no roll may leave
//! 6 on top. A puzzle is solved when the die rests on `G` with 1 on top.
//!
//! The search engine in [`search`] is generic over [`SearchNode`]; the
//! maze-specific pieces are [`Board`], [`Die`], [`BoardNode`] and the
//! estimates in [`heuristics`].

pub mod die;
pub mod error;
pub mod executor;
pub mod heuristics;
pub mod node;
pub mod puzzle;
pub mod queue;
pub mod search;
pub mod solver;

// Re-export main types
pub use die::{Die, Facing, FORBIDDEN_FACE, GOAL_FACE};
pub use error::PuzzleError;
pub use executor::{execute, verify_solution, ExecutionMetrics, ExecutionResult, ExecutionStatus};
pub use heuristics::Heuristic;
pub use node::{BoardNode, RelaxedNode};
pub use puzzle::{Board, Cell, Direction, MoveVerdict, Position};
pub use queue::{Keyed, MoreImportant, PriorityQueue, PrioritySet, PushOutcome};
pub use search::{
    a_star_search, a_star_search_observed, best_first_search, best_first_search_observed,
    BestFirstSearch, NoopObserver, Objective, SearchMode, SearchNode, SearchObserver,
    SearchStats, SearchStatus,
};
pub use solver::{solve, solve_file, HeuristicRun, SolverConfig, SolverResult};
