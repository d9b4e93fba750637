#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Motherboard Defense.

mod agent;

use std::time::Duration;

use log::{debug, warn};
use motherboard_defense_core::{
    CellCoord, Command, Event, PlacementError, RemovalError, WELCOME_BANNER,
};
use motherboard_defense_grid::{GridEngine, MAX_EXTENT};

use crate::agent::Agent;

// Non-zero and at most `MAX_EXTENT`, so `GridEngine::new` accepts them.
const DEFAULT_GRID_WIDTH: u32 = 12;
const DEFAULT_GRID_LENGTH: u32 = 18;
const _: () = assert!(
    DEFAULT_GRID_WIDTH > 0
        && DEFAULT_GRID_LENGTH > 0
        && DEFAULT_GRID_WIDTH <= MAX_EXTENT
        && DEFAULT_GRID_LENGTH <= MAX_EXTENT
);
const DEFAULT_SPAWN: CellCoord = CellCoord::new(4, 0);

/// Eight cells per second.
const DEFAULT_STEP_DURATION: Duration = Duration::from_millis(125);

/// Represents the authoritative Motherboard Defense world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: GridEngine,
    spawn: CellCoord,
    goals: Vec<CellCoord>,
    agent: Agent,
    step_duration: Duration,
    tick_index: u64,
}

impl World {
    /// Creates a new world with the default playing field ready for simulation.
    #[must_use]
    pub fn new() -> Self {
        let grid = GridEngine::new(DEFAULT_GRID_WIDTH, DEFAULT_GRID_LENGTH)
            .expect("default extents are non-zero and addressable");
        Self {
            banner: WELCOME_BANNER,
            goals: last_row(&grid),
            grid,
            spawn: DEFAULT_SPAWN,
            agent: Agent::at(DEFAULT_SPAWN),
            step_duration: DEFAULT_STEP_DURATION,
            tick_index: 0,
        }
    }

    fn placement_verdict(&self, cell: CellCoord) -> Result<(), PlacementError> {
        match self.grid.is_occupied(cell) {
            Err(_) => return Err(PlacementError::OutOfBounds),
            Ok(true) => return Err(PlacementError::Occupied),
            Ok(false) => {}
        }

        if cell == self.agent.cell || self.agent.next_step() == Some(cell) {
            return Err(PlacementError::AgentInTheWay);
        }

        let mut sources = vec![self.agent.cell];
        if self.spawn != self.agent.cell {
            sources.push(self.spawn);
        }

        for source in sources {
            match self.grid.would_allow_path(cell, source, &self.goals) {
                Ok(Some(_)) => {}
                Ok(None) => return Err(PlacementError::BlocksPath),
                Err(_) => return Err(PlacementError::OutOfBounds),
            }
        }

        Ok(())
    }

    fn invalidate_route(&mut self, out_events: &mut Vec<Event>) {
        self.agent.clear_route();
        out_events.push(Event::AgentRouteNeeded);
    }

    fn advance_agent(&mut self, out_events: &mut Vec<Event>) {
        while self.agent.accumulator >= self.step_duration {
            let Some(next_cell) = self.agent.next_step() else {
                break;
            };

            let from = self.agent.cell;
            let enterable =
                from.is_adjacent(next_cell) && self.grid.is_occupied(next_cell) == Ok(false);
            if !enterable {
                debug!("agent route through {next_cell} went stale");
                self.invalidate_route(out_events);
                return;
            }

            self.agent.advance(next_cell);
            self.agent.accumulator = self.agent.accumulator.saturating_sub(self.step_duration);
            out_events.push(Event::AgentAdvanced {
                from,
                to: next_cell,
            });

            if self.goals.contains(&next_cell) {
                out_events.push(Event::AgentReachedGoal { cell: next_cell });
            }
        }

        if self.agent.next_step().is_none() {
            self.agent.accumulator = self.agent.accumulator.min(self.step_duration);
            if self.agent.mark_route_needed() {
                out_events.push(Event::AgentRouteNeeded);
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid {
            width,
            length,
            spawn,
        } => {
            let grid = match GridEngine::new(width, length) {
                Ok(grid) => grid,
                Err(error) => {
                    warn!("ignoring grid configuration: {error}");
                    return;
                }
            };

            if !grid.contains(spawn) {
                warn!("ignoring grid configuration: spawn {spawn} lies outside {width}x{length}");
                return;
            }

            world.goals = last_row(&grid);
            world.grid = grid;
            world.spawn = spawn;
            world.agent = Agent::at(spawn);
            out_events.push(Event::GridConfigured { width, length });
            out_events.push(Event::AgentRouteNeeded);
        }
        Command::ConfigureAgentStep { step_duration } => {
            world.step_duration = step_duration;
        }
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });

            world.agent.accumulator = world.agent.accumulator.saturating_add(dt);
            world.advance_agent(out_events);
        }
        Command::PlaceObstacle { cell } => match world.placement_verdict(cell) {
            Ok(()) => {
                if let Err(error) = world.grid.set_occupied(cell) {
                    warn!("placement at {cell} failed after approval: {error}");
                    out_events.push(Event::ObstaclePlacementRejected {
                        cell,
                        reason: PlacementError::OutOfBounds,
                    });
                    return;
                }

                debug!("obstacle placed at {cell}");
                out_events.push(Event::ObstaclePlaced { cell });
                world.invalidate_route(out_events);
            }
            Err(reason) => {
                debug!("obstacle at {cell} rejected: {reason:?}");
                out_events.push(Event::ObstaclePlacementRejected { cell, reason });
            }
        },
        Command::RemoveObstacle { cell } => {
            let reason = match world.grid.is_occupied(cell) {
                Err(_) => Some(RemovalError::OutOfBounds),
                Ok(false) => Some(RemovalError::Vacant),
                Ok(true) => None,
            };

            if let Some(reason) = reason {
                out_events.push(Event::ObstacleRemovalRejected { cell, reason });
                return;
            }

            if let Err(error) = world.grid.set_occupancy(cell, false) {
                warn!("removal at {cell} failed after validation: {error}");
                return;
            }

            debug!("obstacle removed from {cell}");
            out_events.push(Event::ObstacleRemoved { cell });
            world.invalidate_route(out_events);
        }
        Command::SetAgentRoute { route } => {
            match world.agent.assign_route(route, &world.grid) {
                Ok(steps) => {
                    debug!("agent at {} accepted a {steps}-step route", world.agent.cell);
                    out_events.push(Event::AgentRouteAssigned { steps });
                }
                Err(defect) => {
                    warn!("agent at {} refused route: {defect:?}", world.agent.cell);
                    if world.agent.mark_route_needed() {
                        out_events.push(Event::AgentRouteNeeded);
                    }
                }
            }
        }
        Command::ReturnAgentToSpawn => {
            world.agent.teleport(world.spawn);
            out_events.push(Event::AgentReturnedToSpawn { cell: world.spawn });
            out_events.push(Event::AgentRouteNeeded);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use motherboard_defense_core::{AgentSnapshot, CellCoord, PlacementError};
    use motherboard_defense_grid::GridEngine;

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the playing field's grid engine.
    #[must_use]
    pub fn grid(world: &World) -> &GridEngine {
        &world.grid
    }

    /// Cells the agent tries to reach.
    #[must_use]
    pub fn goals(world: &World) -> &[CellCoord] {
        &world.goals
    }

    /// Cell the agent starts from and returns to.
    #[must_use]
    pub fn spawn(world: &World) -> CellCoord {
        world.spawn
    }

    /// Captures a read-only snapshot of the agent.
    #[must_use]
    pub fn agent_snapshot(world: &World) -> AgentSnapshot {
        world.agent.snapshot(world.spawn)
    }

    /// Remaining route of the agent, starting at its current cell.
    #[must_use]
    pub fn agent_route(world: &World) -> Vec<CellCoord> {
        world.agent.planned_route()
    }

    /// Reports whether an obstacle at `cell` would currently be accepted.
    ///
    /// Mirrors the checks `apply` performs for [`motherboard_defense_core::Command::PlaceObstacle`].
    pub fn placement_verdict(world: &World, cell: CellCoord) -> Result<(), PlacementError> {
        world.placement_verdict(cell)
    }

    /// Number of ticks processed since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}

fn last_row(grid: &GridEngine) -> Vec<CellCoord> {
    let Some(row) = grid.length().checked_sub(1) else {
        return Vec::new();
    };

    grid.nodes()
        .map(|node| node.coord())
        .filter(|coord| i64::from(coord.y()) == i64::from(row))
        .collect()
}
