//! Generic best-first search with an A* specialisation.
//!
//! The engine is written against the [`SearchNode`] trait and knows
//! nothing about boards or dice. Callers supply an evaluation function
//! and pick whether lower ([`Objective::MinimizeCost`]) or higher
//! ([`Objective::MaximizeUtility`]) evaluations are explored first.
//!
//! In [`SearchMode::Graph`] each world state is closed at most once and
//! the frontier keeps one entry per state, replacing it when a strictly
//! better evaluation turns up. [`SearchMode::Tree`] keeps no closed set
//! and allows duplicate frontier entries; it is guaranteed to finish only
//! when a goal is reachable.

use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::queue::{Keyed, MoreImportant, PriorityQueue, PrioritySet, PushOutcome};

/// A search-space node that knows its world state, successors and the
/// steps taken to reach it.
pub trait SearchNode: Sized {
    /// Identity used for duplicate detection. Two nodes with equal states
    /// are the same world position regardless of how they were reached.
    type State: Eq + Hash + Clone;
    type Step: Clone;

    fn state(&self) -> Self::State;

    /// Nodes one step away. Each carries this node's path plus the step.
    fn successors(&self) -> Vec<Self>;

    fn is_goal(&self) -> bool;

    fn path(&self) -> &[Self::Step];

    fn path_cost(&self) -> u32 {
        self.path().len() as u32
    }
}

/// Which end of the evaluation scale is explored first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Objective {
    #[default]
    MinimizeCost,
    MaximizeUtility,
}

impl Objective {
    /// Whether evaluation `a` should be explored strictly before `b`
    pub fn prefers<E: Ord>(self, a: &E, b: &E) -> bool {
        match self {
            Objective::MinimizeCost => a < b,
            Objective::MaximizeUtility => a > b,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchMode {
    #[default]
    Graph,
    Tree,
}

/// A node paired with its evaluation, computed once when it was generated.
#[derive(Debug, Clone)]
pub struct Scored<N, E> {
    pub node: N,
    pub evaluation: E,
}

impl<N: SearchNode, E> PartialEq for Scored<N, E> {
    fn eq(&self, other: &Self) -> bool {
        self.node.state() == other.node.state()
    }
}

impl<N: SearchNode, E> Eq for Scored<N, E> {}

impl<N: SearchNode, E> Hash for Scored<N, E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node.state().hash(state);
    }
}

impl<N: SearchNode, E> Keyed for Scored<N, E> {
    type Key = N::State;

    fn key(&self) -> N::State {
        self.node.state()
    }
}

#[derive(Debug, Clone, Copy)]
struct ByEvaluation(Objective);

impl<N, E: Ord> MoreImportant<Scored<N, E>> for ByEvaluation {
    fn more_important(&self, a: &Scored<N, E>, b: &Scored<N, E>) -> bool {
        self.0.prefers(&a.evaluation, &b.evaluation)
    }
}

/// Callbacks fired as the search progresses.
pub trait SearchObserver<N> {
    /// A node was taken off the frontier.
    fn on_close(&mut self, _node: &N) {}

    /// A node was pushed onto the frontier or replaced a worse entry.
    fn on_expand(&mut self, _node: &N) {}
}

impl<N, O: SearchObserver<N> + ?Sized> SearchObserver<N> for &mut O {
    fn on_close(&mut self, node: &N) {
        (**self).on_close(node);
    }

    fn on_expand(&mut self, node: &N) {
        (**self).on_expand(node);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl<N> SearchObserver<N> for NoopObserver {}

/// Node counters collected through the observer hooks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub closed: usize,
    pub expanded: usize,
}

impl<N> SearchObserver<N> for SearchStats {
    fn on_close(&mut self, _node: &N) {
        self.closed += 1;
    }

    fn on_expand(&mut self, _node: &N) {
        self.expanded += 1;
    }
}

/// Result of a single search step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStatus<S> {
    Running,
    Succeeded(Vec<S>),
    Failed,
}

enum Frontier<N: SearchNode, E> {
    Graph {
        open: PrioritySet<Scored<N, E>, ByEvaluation>,
        closed: HashSet<N::State>,
    },
    Tree {
        open: PriorityQueue<Scored<N, E>, ByEvaluation>,
    },
}

/// Best-first search as an explicit state machine. Each call to
/// [`step`](Self::step) closes one node.
pub struct BestFirstSearch<N: SearchNode, E, F, O = NoopObserver> {
    frontier: Frontier<N, E>,
    evaluate: F,
    observer: O,
    outcome: Option<SearchStatus<N::Step>>,
}

impl<N, E, F> BestFirstSearch<N, E, F, NoopObserver>
where
    N: SearchNode,
    E: Ord,
    F: FnMut(&N) -> E,
{
    pub fn new(start: N, evaluate: F, mode: SearchMode, objective: Objective) -> Self {
        Self::with_observer(start, evaluate, mode, objective, NoopObserver)
    }
}

impl<N, E, F, O> BestFirstSearch<N, E, F, O>
where
    N: SearchNode,
    E: Ord,
    F: FnMut(&N) -> E,
    O: SearchObserver<N>,
{
    pub fn with_observer(
        start: N,
        mut evaluate: F,
        mode: SearchMode,
        objective: Objective,
        observer: O,
    ) -> Self {
        let comparator = ByEvaluation(objective);
        let evaluation = evaluate(&start);
        let first = Scored {
            node: start,
            evaluation,
        };
        let frontier = match mode {
            SearchMode::Graph => {
                let mut open = PrioritySet::new(comparator);
                open.push(first);
                Frontier::Graph {
                    open,
                    closed: HashSet::new(),
                }
            }
            SearchMode::Tree => {
                let mut open = PriorityQueue::new(comparator);
                open.push(first);
                Frontier::Tree { open }
            }
        };
        Self {
            frontier,
            evaluate,
            observer,
            outcome: None,
        }
    }

    /// Close the best frontier node and expand it. Once the search has
    /// finished, every further call returns the same terminal status.
    pub fn step(&mut self) -> SearchStatus<N::Step> {
        if let Some(done) = &self.outcome {
            return done.clone();
        }

        let Self {
            frontier,
            evaluate,
            observer,
            outcome,
        } = self;

        let current = match frontier {
            Frontier::Graph { open, .. } => open.pop(),
            Frontier::Tree { open } => open.pop(),
        };
        let Some(current) = current else {
            *outcome = Some(SearchStatus::Failed);
            return SearchStatus::Failed;
        };

        observer.on_close(&current.node);
        if let Frontier::Graph { closed, .. } = frontier {
            closed.insert(current.node.state());
        }

        if current.node.is_goal() {
            let path = current.node.path().to_vec();
            debug!(length = path.len(), "goal reached");
            *outcome = Some(SearchStatus::Succeeded(path.clone()));
            return SearchStatus::Succeeded(path);
        }

        for successor in current.node.successors() {
            match frontier {
                Frontier::Graph { open, closed } => {
                    let key = successor.state();
                    if closed.contains(&key) {
                        continue;
                    }
                    let evaluation = evaluate(&successor);
                    let scored = Scored {
                        node: successor,
                        evaluation,
                    };
                    if open.push_if_better(scored) != PushOutcome::Rejected {
                        if let Some(stored) = open.find(&key) {
                            observer.on_expand(&stored.node);
                        }
                    }
                }
                Frontier::Tree { open } => {
                    let evaluation = evaluate(&successor);
                    observer.on_expand(&successor);
                    open.push(Scored {
                        node: successor,
                        evaluation,
                    });
                }
            }
        }

        trace!(frontier = self.frontier_len(), "node closed");
        SearchStatus::Running
    }

    /// Step until the search succeeds or the frontier runs dry.
    pub fn run(&mut self) -> Option<Vec<N::Step>> {
        loop {
            match self.step() {
                SearchStatus::Running => continue,
                SearchStatus::Succeeded(path) => return Some(path),
                SearchStatus::Failed => return None,
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn frontier_len(&self) -> usize {
        match &self.frontier {
            Frontier::Graph { open, .. } => open.len(),
            Frontier::Tree { open } => open.len(),
        }
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }
}

/// Run a best-first search to completion.
pub fn best_first_search<N, E, F>(
    evaluate: F,
    start: N,
    mode: SearchMode,
    objective: Objective,
) -> Option<Vec<N::Step>>
where
    N: SearchNode,
    E: Ord,
    F: FnMut(&N) -> E,
{
    best_first_search_observed(evaluate, start, mode, objective, &mut NoopObserver)
}

pub fn best_first_search_observed<N, E, F, O>(
    evaluate: F,
    start: N,
    mode: SearchMode,
    objective: Objective,
    observer: &mut O,
) -> Option<Vec<N::Step>>
where
    N: SearchNode,
    E: Ord,
    F: FnMut(&N) -> E,
    O: SearchObserver<N>,
{
    BestFirstSearch::with_observer(start, evaluate, mode, objective, observer).run()
}

/// A* evaluation: heuristic estimate plus cost of the path so far.
pub fn a_star_evaluation<N, H>(mut heuristic: H) -> impl FnMut(&N) -> u32
where
    N: SearchNode,
    H: FnMut(&N) -> u32,
{
    move |node: &N| heuristic(node) + node.path_cost()
}

/// A* graph search minimising `heuristic(node) + path_cost(node)`.
///
/// With an admissible and consistent heuristic the returned path is a
/// shortest one.
pub fn a_star_search<N, H>(heuristic: H, start: N) -> Option<Vec<N::Step>>
where
    N: SearchNode,
    H: FnMut(&N) -> u32,
{
    a_star_search_observed(heuristic, start, &mut NoopObserver)
}

pub fn a_star_search_observed<N, H, O>(heuristic: H, start: N, observer: &mut O) -> Option<Vec<N::Step>>
where
    N: SearchNode,
    H: FnMut(&N) -> u32,
    O: SearchObserver<N>,
{
    best_first_search_observed(
        a_star_evaluation(heuristic),
        start,
        SearchMode::Graph,
        Objective::MinimizeCost,
        observer,
    )
}
