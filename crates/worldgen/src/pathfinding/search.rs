//! Breadth-first, greedy best-first, and A* search over a [`SearchGraph`].
//!
//! Every variant stops when the goal is dequeued (not when it is first discovered) if
//! `early_exit` is set, and returns the predecessor map it built. A goal missing from that
//! map means it was unreachable; that is an answer, not an error.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::error::{Result, WorldGenError};
use crate::types::{Pos, SearchAlgorithm};

use super::graph::SearchGraph;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenNode {
    priority: u32,
    x: i32,
    y: i32,
}

impl OpenNode {
    fn new(priority: u32, pos: Pos) -> Self {
        Self { priority, x: pos.x, y: pos.y }
    }

    fn pos(self) -> Pos {
        Pos { x: self.x, y: self.y }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchResult {
    /// Every discovered node mapped to the node it was reached from; the start maps to `None`.
    pub came_from: BTreeMap<Pos, Option<Pos>>,
    /// Best known cost to each node. Only A* tracks costs.
    pub cost_so_far: Option<BTreeMap<Pos, u32>>,
}

impl SearchResult {
    pub fn reached(&self, goal: Pos) -> bool {
        self.came_from.contains_key(&goal)
    }

    /// Nodes from the start to `goal`, both included.
    pub fn path_to(&self, goal: Pos) -> Option<Vec<Pos>> {
        let mut current = goal;
        let mut path = vec![current];
        while let Some(previous) = *self.came_from.get(&current)? {
            if path.len() > self.came_from.len() {
                return None;
            }
            path.push(previous);
            current = previous;
        }
        path.reverse();
        Some(path)
    }

    pub fn cost_to(&self, goal: Pos) -> Option<u32> {
        self.cost_so_far.as_ref()?.get(&goal).copied()
    }
}

/// Configured search request. `start` and `goal` must both be set before [`Pathfinder::search`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pathfinder {
    pub algorithm: SearchAlgorithm,
    pub early_exit: bool,
    pub start: Option<Pos>,
    pub goal: Option<Pos>,
}

impl Pathfinder {
    pub fn new(algorithm: SearchAlgorithm) -> Self {
        Self { algorithm, early_exit: true, start: None, goal: None }
    }

    pub fn with_endpoints(self, start: Pos, goal: Pos) -> Self {
        Self { start: Some(start), goal: Some(goal), ..self }
    }

    pub fn search<G: SearchGraph + ?Sized>(&self, graph: &G) -> Result<SearchResult> {
        let start = self.start.ok_or(WorldGenError::PreconditionUnmet("start point not set"))?;
        let goal = self.goal.ok_or(WorldGenError::PreconditionUnmet("goal point not set"))?;
        Ok(match self.algorithm {
            SearchAlgorithm::BreadthFirst => breadth_first(graph, start, goal, self.early_exit),
            SearchAlgorithm::GreedyBestFirst => {
                greedy_best_first(graph, start, goal, self.early_exit)
            }
            SearchAlgorithm::AStar => a_star(graph, start, goal, self.early_exit),
        })
    }
}

/// Manhattan distance; admissible and consistent on a 4-connected unit-cost grid.
pub fn heuristic(a: Pos, b: Pos) -> u32 {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}

pub fn breadth_first<G: SearchGraph + ?Sized>(
    graph: &G,
    start: Pos,
    goal: Pos,
    early_exit: bool,
) -> SearchResult {
    let mut frontier = VecDeque::from([start]);
    let mut came_from = BTreeMap::from([(start, None)]);

    while let Some(current) = frontier.pop_front() {
        if early_exit && current == goal {
            break;
        }
        for next in graph.neighbors(current) {
            if came_from.contains_key(&next) {
                continue;
            }
            came_from.insert(next, Some(current));
            frontier.push_back(next);
        }
    }

    SearchResult { came_from, cost_so_far: None }
}

/// Orders the frontier by heuristic alone. Fast, but the path it finds is not necessarily
/// the shortest one.
pub fn greedy_best_first<G: SearchGraph + ?Sized>(
    graph: &G,
    start: Pos,
    goal: Pos,
    early_exit: bool,
) -> SearchResult {
    let mut frontier = BTreeSet::from([OpenNode::new(0, start)]);
    let mut came_from = BTreeMap::from([(start, None)]);

    while let Some(node) = frontier.pop_first() {
        let current = node.pos();
        if early_exit && current == goal {
            break;
        }
        for next in graph.neighbors(current) {
            if came_from.contains_key(&next) {
                continue;
            }
            frontier.insert(OpenNode::new(heuristic(goal, next), next));
            came_from.insert(next, Some(current));
        }
    }

    SearchResult { came_from, cost_so_far: None }
}

/// Orders the frontier by cost so far plus heuristic and re-opens a node whenever a strictly
/// cheaper route to it turns up.
pub fn a_star<G: SearchGraph + ?Sized>(
    graph: &G,
    start: Pos,
    goal: Pos,
    early_exit: bool,
) -> SearchResult {
    let mut frontier = BTreeSet::from([OpenNode::new(0, start)]);
    let mut came_from = BTreeMap::from([(start, None)]);
    let mut cost_so_far = BTreeMap::from([(start, 0_u32)]);

    while let Some(node) = frontier.pop_first() {
        let current = node.pos();
        if early_exit && current == goal {
            break;
        }
        let Some(&current_cost) = cost_so_far.get(&current) else {
            continue;
        };
        for next in graph.neighbors(current) {
            let new_cost = current_cost + graph.cost(current, next);
            if cost_so_far.get(&next).is_some_and(|&known| known <= new_cost) {
                continue;
            }
            cost_so_far.insert(next, new_cost);
            frontier.insert(OpenNode::new(new_cost + heuristic(goal, next), next));
            came_from.insert(next, Some(current));
        }
    }

    SearchResult { came_from, cost_so_far: Some(cost_so_far) }
}
