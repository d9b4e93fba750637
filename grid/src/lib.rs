#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Grid graph and shortest-path engine for Motherboard Defense.
//!
//! [`GridEngine`] owns a dense `width x length` array of [`GridNode`] values
//! and a static 4-connected adjacency relation derived from the extents.
//! Occupancy is the only persistent mutable state: path queries allocate
//! their own search bookkeeping, so they take `&self` and never disturb each
//! other. A query that cannot reach any goal answers `Ok(None)`; only usage
//! errors such as out-of-range coordinates surface as [`GridError`].

mod error;
mod node;
mod search;
mod text;

use std::{fmt, str::FromStr};

use log::trace;
use motherboard_defense_core::CellCoord;

pub use crate::error::{FixtureDefect, GridError};
pub use crate::node::GridNode;
use crate::search::{build_adjacency, Neighbours, SearchContext};

/// Largest extent along either axis that signed cell coordinates can address.
pub const MAX_EXTENT: u32 = i32::MAX as u32;

/// Dense occupancy grid with breadth-first shortest-path queries.
#[derive(Clone, Debug)]
pub struct GridEngine {
    width: u32,
    length: u32,
    nodes: Vec<GridNode>,
    adjacency: Vec<Neighbours>,
}

impl GridEngine {
    /// Creates a grid of the provided extents with every cell unoccupied.
    ///
    /// Both extents must be non-zero so every grid has a text rendering.
    pub fn new(width: u32, length: u32) -> Result<Self, GridError> {
        if width == 0 || length == 0 {
            return Err(GridError::EmptyExtent { width, length });
        }

        let too_large = GridError::ExtentTooLarge { width, length };
        if width > MAX_EXTENT || length > MAX_EXTENT {
            return Err(too_large);
        }

        let columns = usize::try_from(width).map_err(|_| too_large.clone())?;
        let rows = usize::try_from(length).map_err(|_| too_large.clone())?;
        let cell_count = columns.checked_mul(rows).ok_or(too_large)?;

        let mut nodes = Vec::with_capacity(cell_count);
        for y in 0..length {
            for x in 0..width {
                // Both axes were bounded by `MAX_EXTENT` above.
                nodes.push(GridNode::new(CellCoord::new(x as i32, y as i32), false));
            }
        }

        Ok(Self {
            width,
            length,
            nodes,
            adjacency: build_adjacency(columns, rows),
        })
    }

    /// Builds a grid from the row-encoded text format.
    ///
    /// Each line is one row, `'1'` marks an occupied cell and `'0'` a free
    /// one. Rows must all have the same non-zero width.
    pub fn from_text(input: &str) -> Result<Self, GridError> {
        let parsed = text::parse(input)?;
        let width = u32::try_from(parsed.width).unwrap_or(u32::MAX);
        let length = u32::try_from(parsed.length).unwrap_or(u32::MAX);

        let mut engine = Self::new(width, length)?;
        for (node, occupied) in engine.nodes.iter_mut().zip(parsed.occupied) {
            node.set_occupied(occupied);
        }
        Ok(engine)
    }

    /// Builds a grid from a column-major occupancy matrix, where
    /// `columns[x][y]` is `true` for an occupied cell.
    pub fn from_occupancy(columns: &[Vec<bool>]) -> Result<Self, GridError> {
        let rows = columns.first().map_or(0, Vec::len);
        if let Some((column, found)) = columns
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != rows)
        {
            return Err(GridError::RaggedOccupancy {
                column,
                expected: rows,
                found,
            });
        }

        let width = u32::try_from(columns.len()).unwrap_or(u32::MAX);
        let length = u32::try_from(rows).unwrap_or(u32::MAX);
        let mut engine = Self::new(width, length)?;
        for (index, node) in engine.nodes.iter_mut().enumerate() {
            node.set_occupied(columns[index % columns.len()][index / columns.len()]);
        }
        Ok(engine)
    }

    /// Number of cells along the x axis.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of cells along the y axis.
    #[must_use]
    pub const fn length(&self) -> u32 {
        self.length
    }

    /// Reports whether `coord` lies inside the grid.
    #[must_use]
    pub fn contains(&self, coord: CellCoord) -> bool {
        self.index_of(coord).is_some()
    }

    /// Iterator over every node in row-major order.
    pub fn nodes(&self) -> impl Iterator<Item = &GridNode> {
        self.nodes.iter()
    }

    /// Iterator over the coordinates of every occupied cell in row-major order.
    pub fn occupied_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.nodes
            .iter()
            .filter(|node| node.is_occupied())
            .map(GridNode::coord)
    }

    /// Returns the node stored for `coord`.
    pub fn node(&self, coord: CellCoord) -> Result<&GridNode, GridError> {
        let index = self.checked_index(coord)?;
        Ok(&self.nodes[index])
    }

    /// Reports whether the cell at `coord` blocks traversal.
    pub fn is_occupied(&self, coord: CellCoord) -> Result<bool, GridError> {
        self.node(coord).map(GridNode::is_occupied)
    }

    /// Places an obstacle at `coord`.
    ///
    /// Any previously computed path through `coord` becomes stale; callers
    /// are responsible for discarding it.
    pub fn set_occupied(&mut self, coord: CellCoord) -> Result<(), GridError> {
        self.set_occupancy(coord, true)
    }

    /// Places or removes an obstacle at `coord`.
    pub fn set_occupancy(&mut self, coord: CellCoord, occupied: bool) -> Result<(), GridError> {
        let index = self.checked_index(coord)?;
        self.nodes[index].set_occupied(occupied);
        Ok(())
    }

    /// Shortest path from `source` to the single cell `goal`.
    pub fn find_path_to(
        &self,
        source: CellCoord,
        goal: CellCoord,
    ) -> Result<Option<Vec<CellCoord>>, GridError> {
        self.find_path(source, &[goal])
    }

    /// Shortest path from `source` to the nearest reachable cell in `goals`.
    ///
    /// Goals that are out of range or occupied are ignored. The returned path
    /// starts at `source`, ends at the reached goal and steps between
    /// grid-adjacent free cells. When `source` is itself a free goal the path
    /// is just `[source]`. Among equally distant goals the one discovered
    /// first wins, expanding neighbours up, down, left, right.
    ///
    /// Returns `Ok(None)` when `source` is occupied, no goal is usable, or
    /// every usable goal is cut off. Fails only when `source` lies outside
    /// the grid.
    pub fn find_path(
        &self,
        source: CellCoord,
        goals: &[CellCoord],
    ) -> Result<Option<Vec<CellCoord>>, GridError> {
        let source_index = self.checked_index(source)?;

        if self.nodes[source_index].is_occupied() {
            trace!("no path from {source}: source is occupied");
            return Ok(None);
        }

        let mut search = SearchContext::new(self.nodes.len());
        let candidates = self.mark_candidate_goals(&mut search, goals);
        if candidates == 0 {
            trace!("no path from {source}: none of {} goals is available", goals.len());
            return Ok(None);
        }

        if search.is_goal(source_index) {
            return Ok(Some(vec![source]));
        }

        let reached = search.breadth_first(source_index, &self.adjacency, |index| {
            self.nodes[index].is_occupied()
        });

        let Some(goal_index) = reached else {
            trace!("no path from {source}: all {candidates} candidate goals are cut off");
            return Ok(None);
        };

        let path = self.trace_path(&search, goal_index);
        trace!(
            "path from {source} reached {} in {} steps",
            self.nodes[goal_index].coord(),
            path.len().saturating_sub(1)
        );
        Ok(Some(path))
    }

    /// Answers what [`GridEngine::find_path`] would return if `candidate`
    /// were occupied, without modifying this grid.
    ///
    /// The simulation runs on a private copy of the occupancy, so the result
    /// equals cloning the grid, occupying `candidate` on the clone and
    /// querying the clone. Fails when `candidate` or `source` is out of range.
    pub fn would_allow_path(
        &self,
        candidate: CellCoord,
        source: CellCoord,
        goals: &[CellCoord],
    ) -> Result<Option<Vec<CellCoord>>, GridError> {
        let mut simulation = self.clone();
        simulation.set_occupied(candidate)?;
        simulation.find_path(source, goals)
    }

    /// Renders occupancy in the row-encoded text format.
    #[must_use]
    pub fn render(&self) -> String {
        text::render(self.row_width(), &self.draw())
    }

    /// Renders occupancy with every cell of `path` drawn as `'P'`.
    pub fn render_with_path(&self, path: &[CellCoord]) -> Result<String, GridError> {
        let mut drawing = self.draw();
        for &coord in path {
            let index = self.checked_index(coord)?;
            drawing[index] = text::PATH;
        }
        Ok(text::render(self.row_width(), &drawing))
    }

    fn draw(&self) -> Vec<char> {
        self.nodes
            .iter()
            .map(|node| {
                if node.is_occupied() {
                    text::OCCUPIED
                } else {
                    text::FREE
                }
            })
            .collect()
    }

    fn row_width(&self) -> usize {
        usize::try_from(self.width).unwrap_or(0)
    }

    fn mark_candidate_goals(&self, search: &mut SearchContext, goals: &[CellCoord]) -> usize {
        let mut candidates = 0;
        for &goal in goals {
            let Some(index) = self.index_of(goal) else {
                continue;
            };

            if self.nodes[index].is_occupied() {
                continue;
            }

            if search.mark_goal(index) {
                candidates += 1;
            }
        }
        candidates
    }

    fn trace_path(&self, search: &SearchContext, goal: usize) -> Vec<CellCoord> {
        let capacity = search
            .distance(goal)
            .and_then(|depth| usize::try_from(depth).ok())
            .map_or(0, |depth| depth + 1);
        let mut path = Vec::with_capacity(capacity);

        let mut cursor = Some(goal);
        while let Some(index) = cursor {
            path.push(self.nodes[index].coord());
            cursor = search.parent(index);
        }

        path.reverse();
        path
    }

    fn index_of(&self, coord: CellCoord) -> Option<usize> {
        let x = u32::try_from(coord.x()).ok()?;
        let y = u32::try_from(coord.y()).ok()?;
        if x >= self.width || y >= self.length {
            return None;
        }

        let width = usize::try_from(self.width).ok()?;
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        y.checked_mul(width)?.checked_add(x)
    }

    fn checked_index(&self, coord: CellCoord) -> Result<usize, GridError> {
        self.index_of(coord).ok_or(GridError::OutOfRange {
            coord,
            width: self.width,
            length: self.length,
        })
    }
}

impl fmt::Display for GridEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl FromStr for GridEngine {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}
