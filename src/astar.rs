//! Best-first search core behind [PathFinder](crate::PathFinder).
//!
//! A variant of [pathfinding's astar function](https://docs.rs/pathfinding/latest/pathfinding/directed/astar/index.html)
//! trimmed down to what a uniform-cost grid needs: callers drive it with
//! closures and get back the node sequence plus its total cost. Every piece
//! of bookkeeping is local to one call.

use fxhash::FxBuildHasher;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use num_traits::Zero;

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::Hash;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Entry in the frontier. The ordering is reversed so that the max-heap pops
/// the entry with the lowest estimated total cost first; among equal
/// estimates the entry with the larger known cost wins, i.e. the node with
/// the smaller heuristic remainder, which steers expansion toward the goal.
/// Remaining ties fall back to heap order, which is deterministic for a given
/// push sequence.
struct FrontierNode<K> {
    estimated_cost: K,
    cost: K,
    index: usize,
}

impl<K: PartialEq> Eq for FrontierNode<K> {}

impl<K: PartialEq> PartialEq for FrontierNode<K> {
    fn eq(&self, other: &Self) -> bool {
        self.estimated_cost.eq(&other.estimated_cost) && self.cost.eq(&other.cost)
    }
}

impl<K: Ord> PartialOrd for FrontierNode<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord> Ord for FrontierNode<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        match other.estimated_cost.cmp(&self.estimated_cost) {
            Ordering::Equal => self.cost.cmp(&other.cost),
            ordering => ordering,
        }
    }
}

/// Walks the parent links back from the node at `goal_index` and returns the
/// chain in start-to-goal order.
fn reverse_path<N, C>(parents: &FxIndexMap<N, (usize, C)>, goal_index: usize) -> Vec<N>
where
    N: Eq + Hash + Clone,
{
    let mut path: Vec<N> = itertools::unfold(goal_index, |index| {
        parents.get_index(*index).map(|(node, &(parent_index, _))| {
            *index = parent_index;
            node.clone()
        })
    })
    .collect();
    path.reverse();
    path
}

/// Searches from `start`, expanding nodes with `successors`, guiding the
/// expansion order with `heuristic` and stopping at the first expanded node
/// matching `success`. Returns that node's path and cost, or [None] once the
/// frontier is exhausted.
///
/// The parent map keys every visited node; its insertion indices stay stable,
/// so frontier entries carry plain indices instead of node clones.
pub(crate) fn astar<N, C, FN, IN, FH, FS>(
    start: &N,
    mut successors: FN,
    mut heuristic: FH,
    mut success: FS,
) -> Option<(Vec<N>, C)>
where
    N: Eq + Hash + Clone,
    C: Zero + Ord + Copy,
    FN: FnMut(&N) -> IN,
    IN: IntoIterator<Item = (N, C)>,
    FH: FnMut(&N) -> C,
    FS: FnMut(&N) -> bool,
{
    let mut frontier = BinaryHeap::new();
    frontier.push(FrontierNode {
        estimated_cost: Zero::zero(),
        cost: Zero::zero(),
        index: 0,
    });
    let mut parents: FxIndexMap<N, (usize, C)> = FxIndexMap::default();
    parents.insert(start.clone(), (usize::MAX, Zero::zero()));
    while let Some(FrontierNode { cost, index, .. }) = frontier.pop() {
        let succ = {
            let (node, &(_, best_cost)) = parents.get_index(index).unwrap();
            if success(node) {
                return Some((reverse_path(&parents, index), cost));
            }
            // A node sits in the heap once per improvement found before its
            // expansion; only the entry carrying its best cost may expand.
            if cost > best_cost {
                continue;
            }
            successors(node)
        };
        for (successor, move_cost) in succ {
            let new_cost = cost + move_cost;
            let h;
            let successor_index;
            match parents.entry(successor) {
                Vacant(e) => {
                    h = heuristic(e.key());
                    successor_index = e.index();
                    e.insert((index, new_cost));
                }
                Occupied(mut e) => {
                    if e.get().1 > new_cost {
                        h = heuristic(e.key());
                        successor_index = e.index();
                        e.insert((index, new_cost));
                    } else {
                        continue;
                    }
                }
            }
            frontier.push(FrontierNode {
                estimated_cost: new_cost + h,
                cost: new_cost,
                index: successor_index,
            });
        }
    }
    None
}
