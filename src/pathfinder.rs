use crate::astar::astar;
use crate::grid::{Cell, Grid};
use crate::N_NEIGHBOURS;
use log::info;
use smallvec::SmallVec;

/// [Chebyshev distance](https://en.wikipedia.org/wiki/Chebyshev_distance)
/// between two cells: the number of unit-cost steps an unobstructed
/// 8-directional walk needs, which makes it an exact (and therefore
/// admissible) heuristic on an open grid.
pub fn chebyshev_distance(a: &Cell, b: &Cell) -> i32 {
    (a.column() - b.column())
        .abs()
        .max((a.row() - b.row()).abs())
}

/// Finds shortest routes between two cells of a [Grid] using
/// [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) over the grid's
/// precomputed adjacency. Every step costs 1, cardinal or diagonal, and the
/// heuristic is the [Chebyshev distance](chebyshev_distance) to the goal.
///
/// A `PathFinder` holds no search state; each
/// [find_path](PathFinder::find_path) call is independent, so one instance
/// can serve any number of grids and searches.
#[derive(Clone, Debug)]
pub struct PathFinder {
    /// Scales the heuristic estimate. At 1.0 (the default) the estimate
    /// stays admissible and returned routes are shortest; larger values
    /// greedily favour cells near the goal (Weighted A*), trading optimality
    /// for speed.
    pub heuristic_factor: f32,
}

impl PathFinder {
    pub fn new() -> PathFinder {
        PathFinder {
            heuristic_factor: 1.0,
        }
    }

    /// Computes a shortest route from `start` to `goal`, or [None] when no
    /// route exists. Absence of a route is a normal outcome, not an error.
    ///
    /// Both cells must have been obtained from `grid`: they are resolved by
    /// id against it, and a cell of some other grid panics on an
    /// out-of-range id or silently names the wrong cell. The returned route
    /// borrows `grid`'s cells in start-to-goal order, endpoints included.
    ///
    /// Blocked cells are never stepped *through*, but the endpoints
    /// themselves may be blocked: a route can leave a blocked start and end
    /// on a blocked goal as long as every cell between them is walkable.
    /// `find_path(c, c)` returns the degenerate single-cell route for any
    /// `c`. When several routes share the optimal length the search prefers
    /// frontier entries with less heuristic remaining; leftover ties resolve
    /// by heap order, which is deterministic for an unchanged grid, so
    /// repeated calls return the same route.
    pub fn find_path<'g>(
        &self,
        grid: &'g Grid,
        start: &Cell,
        goal: &Cell,
    ) -> Option<Vec<&'g Cell>> {
        let cells = grid.cells();
        let start_id = start.id();
        let goal_id = goal.id();
        if start_id == goal_id {
            return Some(vec![&cells[start_id]]);
        }
        let goal_cell = &cells[goal_id];
        let result = astar(
            &start_id,
            |&id| {
                cells[id]
                    .neighbour_ids()
                    .iter()
                    // Unwalkable cells are excluded as intermediate steps;
                    // the goal itself may be stepped onto regardless.
                    .filter(|&&neighbour| cells[neighbour].walkable || neighbour == goal_id)
                    .map(|&neighbour| (neighbour, 1))
                    .collect::<SmallVec<[(usize, i32); N_NEIGHBOURS]>>()
            },
            |&id| (chebyshev_distance(&cells[id], goal_cell) as f32 * self.heuristic_factor) as i32,
            |&id| id == goal_id,
        );
        match result {
            Some((ids, _cost)) => Some(ids.into_iter().map(|id| &cells[id]).collect()),
            None => {
                info!("no path from {} to {}", &cells[start_id], goal_cell);
                None
            }
        }
    }
}

impl Default for PathFinder {
    fn default() -> PathFinder {
        PathFinder::new()
    }
}
