//! # grid_astar
//!
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) pathfinding on a
//! dense 2D tile grid with 8-directional movement. Every step costs 1,
//! cardinal or diagonal, and the
//! [Chebyshev distance](https://en.wikipedia.org/wiki/Chebyshev_distance)
//! serves as heuristic, so returned routes visit the fewest cells possible.
//! Cells carry their adjacency precomputed at grid construction, and grids
//! translate pixel coordinates to cells for tile-based worlds.
mod astar;
pub mod grid;
pub mod pathfinder;

pub use crate::grid::{Cell, Grid, GridError};
pub use crate::pathfinder::{chebyshev_distance, PathFinder};

/// A cell has at most 8 neighbours, which bounds every successor list.
pub(crate) const N_NEIGHBOURS: usize = 8;
