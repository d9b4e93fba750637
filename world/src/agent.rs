//! Authoritative agent state and route bookkeeping.

use std::{collections::VecDeque, time::Duration};

use motherboard_defense_core::{AgentSnapshot, CellCoord};
use motherboard_defense_grid::GridEngine;

/// Reasons a route handed to the agent is refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RouteDefect {
    Empty,
    WrongStart,
    Disjoint,
    Blocked,
}

#[derive(Clone, Debug)]
pub(crate) struct Agent {
    pub(crate) cell: CellCoord,
    route: VecDeque<CellCoord>,
    pub(crate) accumulator: Duration,
    route_needed: bool,
}

impl Agent {
    pub(crate) fn at(cell: CellCoord) -> Self {
        Self {
            cell,
            route: VecDeque::new(),
            accumulator: Duration::ZERO,
            route_needed: true,
        }
    }

    /// Validates `route` against the grid and queues every step after the
    /// agent's current cell. Returns the number of queued steps.
    pub(crate) fn assign_route(
        &mut self,
        route: Vec<CellCoord>,
        grid: &GridEngine,
    ) -> Result<usize, RouteDefect> {
        let Some(&first) = route.first() else {
            return Err(RouteDefect::Empty);
        };

        if first != self.cell {
            return Err(RouteDefect::WrongStart);
        }

        if route.windows(2).any(|pair| !pair[0].is_adjacent(pair[1])) {
            return Err(RouteDefect::Disjoint);
        }

        if route
            .iter()
            .any(|cell| grid.is_occupied(*cell).unwrap_or(true))
        {
            return Err(RouteDefect::Blocked);
        }

        self.route = route.into_iter().skip(1).collect();
        if !self.route.is_empty() {
            self.route_needed = false;
        }
        Ok(self.route.len())
    }

    pub(crate) fn next_step(&self) -> Option<CellCoord> {
        self.route.front().copied()
    }

    pub(crate) fn advance(&mut self, destination: CellCoord) {
        let _ = self.route.pop_front();
        self.cell = destination;
    }

    /// Flags that a route is required. Returns `true` only on the transition.
    pub(crate) fn mark_route_needed(&mut self) -> bool {
        let was_needed = self.route_needed;
        self.route_needed = true;
        !was_needed
    }

    pub(crate) fn clear_route(&mut self) {
        self.route.clear();
        self.route_needed = true;
    }

    /// Remaining route including the agent's own cell.
    pub(crate) fn planned_route(&self) -> Vec<CellCoord> {
        std::iter::once(self.cell)
            .chain(self.route.iter().copied())
            .collect()
    }

    pub(crate) fn teleport(&mut self, cell: CellCoord) {
        self.cell = cell;
        self.route.clear();
        self.accumulator = Duration::ZERO;
        self.route_needed = true;
    }

    pub(crate) fn snapshot(&self, spawn: CellCoord) -> AgentSnapshot {
        AgentSnapshot {
            cell: self.cell,
            spawn,
            next_hop: self.next_step(),
            needs_route: self.route_needed,
            accumulated: self.accumulator,
        }
    }
}
