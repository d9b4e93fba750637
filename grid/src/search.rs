//! Static adjacency and the breadth-first search used by the grid engine.

use std::collections::VecDeque;

/// Up to four grid-adjacent node indices in fixed expansion order.
///
/// The order is up (`y + 1`), down (`y - 1`), left (`x - 1`), right (`x + 1`).
/// Search results depend on it when several goals lie at the same depth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Neighbours {
    slots: [usize; 4],
    len: usize,
}

impl Neighbours {
    fn push(&mut self, index: usize) {
        self.slots[self.len] = index;
        self.len += 1;
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots[..self.len].iter().copied()
    }
}

/// Builds the row-major adjacency relation for a `width` x `length` grid.
///
/// Adjacency depends on geometry alone; occupancy is filtered during search.
pub(crate) fn build_adjacency(width: usize, length: usize) -> Vec<Neighbours> {
    let mut adjacency = Vec::with_capacity(width.saturating_mul(length));

    for y in 0..length {
        for x in 0..width {
            let mut neighbours = Neighbours::default();

            if y + 1 < length {
                neighbours.push(offset(width, x, y + 1));
            }

            if y > 0 {
                neighbours.push(offset(width, x, y - 1));
            }

            if x > 0 {
                neighbours.push(offset(width, x - 1, y));
            }

            if x + 1 < width {
                neighbours.push(offset(width, x + 1, y));
            }

            adjacency.push(neighbours);
        }
    }

    adjacency
}

fn offset(width: usize, x: usize, y: usize) -> usize {
    y * width + x
}

/// Per-query bookkeeping for a breadth-first search.
///
/// Every field is indexed by node id. Nothing here outlives the query that
/// created it; only occupancy persists on the engine.
#[derive(Clone, Debug)]
pub(crate) struct SearchContext {
    visited: Vec<bool>,
    parent: Vec<Option<usize>>,
    distance: Vec<Option<u32>>,
    goal: Vec<bool>,
    frontier: VecDeque<usize>,
}

impl SearchContext {
    pub(crate) fn new(node_count: usize) -> Self {
        Self {
            visited: vec![false; node_count],
            parent: vec![None; node_count],
            distance: vec![None; node_count],
            goal: vec![false; node_count],
            frontier: VecDeque::new(),
        }
    }

    /// Clears visited markers, parents, distances and the frontier.
    ///
    /// Goal marks survive so a context can be prepared before the search runs.
    pub(crate) fn reset(&mut self) {
        self.visited.fill(false);
        self.parent.fill(None);
        self.distance.fill(None);
        self.frontier.clear();
    }

    /// Marks `node` as a candidate goal. Returns `false` if it already was one.
    pub(crate) fn mark_goal(&mut self, node: usize) -> bool {
        !std::mem::replace(&mut self.goal[node], true)
    }

    pub(crate) fn is_goal(&self, node: usize) -> bool {
        self.goal[node]
    }

    pub(crate) fn parent(&self, node: usize) -> Option<usize> {
        self.parent[node]
    }

    /// Depth at which `node` was discovered in the current search.
    pub(crate) fn distance(&self, node: usize) -> Option<u32> {
        self.distance[node]
    }

    fn discover(&mut self, node: usize, parent: Option<usize>, depth: u32) {
        debug_assert!(!self.visited[node], "node discovered twice");
        self.visited[node] = true;
        self.parent[node] = parent;
        self.distance[node] = Some(depth);
    }

    /// Runs a level-order search from `source` and returns the first goal found.
    ///
    /// Nodes for which `is_blocked` returns `true` are never entered. The
    /// search stops as soon as a goal is discovered, so the parent chain from
    /// that goal is a minimum-edge-count path back to `source`.
    pub(crate) fn breadth_first<F>(
        &mut self,
        source: usize,
        adjacency: &[Neighbours],
        is_blocked: F,
    ) -> Option<usize>
    where
        F: Fn(usize) -> bool,
    {
        self.reset();
        self.discover(source, None, 0);
        self.frontier.push_back(source);

        while let Some(current) = self.frontier.pop_front() {
            let Some(neighbours) = adjacency.get(current) else {
                continue;
            };
            let next_depth = self.distance[current].map_or(1, |depth| depth.saturating_add(1));

            for neighbour in neighbours.iter() {
                if self.visited[neighbour] || is_blocked(neighbour) {
                    continue;
                }

                self.discover(neighbour, Some(current), next_depth);

                if self.goal[neighbour] {
                    return Some(neighbour);
                }

                self.frontier.push_back(neighbour);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_nodes_have_two_neighbours() {
        let adjacency = build_adjacency(3, 3);

        assert_eq!(adjacency[0].iter().collect::<Vec<_>>(), vec![3, 1]);
        assert_eq!(adjacency[8].iter().collect::<Vec<_>>(), vec![5, 7]);
    }

    #[test]
    fn interior_node_expands_up_down_left_right() {
        let adjacency = build_adjacency(3, 3);

        assert_eq!(adjacency[4].iter().collect::<Vec<_>>(), vec![7, 1, 3, 5]);
    }

    #[test]
    fn single_row_grid_only_links_horizontally() {
        let adjacency = build_adjacency(4, 1);

        assert_eq!(adjacency[0].iter().collect::<Vec<_>>(), vec![1]);
        assert_eq!(adjacency[2].iter().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn breadth_first_records_discovery_depth() {
        let adjacency = build_adjacency(4, 1);
        let mut search = SearchContext::new(4);
        assert!(search.mark_goal(3));

        let goal = search.breadth_first(0, &adjacency, |_| false);

        assert_eq!(goal, Some(3));
        assert_eq!(search.distance(0), Some(0));
        assert_eq!(search.distance(1), Some(1));
        assert_eq!(search.distance(2), Some(2));
        assert_eq!(search.distance(3), Some(3));
        assert_eq!(search.parent(3), Some(2));
        assert_eq!(search.parent(0), None);
    }

    #[test]
    fn breadth_first_skips_blocked_nodes() {
        let adjacency = build_adjacency(3, 1);
        let mut search = SearchContext::new(3);
        assert!(search.mark_goal(2));

        assert_eq!(search.breadth_first(0, &adjacency, |node| node == 1), None);
        assert_eq!(search.distance(2), None);
    }

    #[test]
    fn reset_clears_previous_bookkeeping() {
        let adjacency = build_adjacency(2, 1);
        let mut search = SearchContext::new(2);
        assert!(search.mark_goal(1));
        assert_eq!(search.breadth_first(0, &adjacency, |_| false), Some(1));

        search.reset();

        assert_eq!(search.distance(1), None);
        assert_eq!(search.parent(1), None);
        assert!(search.is_goal(1));
        assert!(!search.mark_goal(1));
    }
}
