//! Floor graphs and the search algorithms that run over them.

pub mod graph;
pub mod search;

pub use graph::{DEFAULT_IMPASSABLE, FloorGraph, SearchGraph};
pub use search::{Pathfinder, SearchResult, a_star, breadth_first, greedy_best_first, heuristic};
