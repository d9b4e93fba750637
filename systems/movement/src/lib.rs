#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that plans the agent's route and decides
//! where it heads next.
//!
//! The system never mutates the world. It reacts to `AgentRouteNeeded` and
//! `TimeAdvanced` events by querying the grid for the shortest route to the
//! goal set and answering with [`Command::SetAgentRoute`]. Once the agent
//! stands on a goal it is sent back to its spawn instead.

use log::{debug, trace, warn};
use motherboard_defense_core::{AgentSnapshot, CellCoord, Command, Event};
use motherboard_defense_grid::GridEngine;

/// Pure system that reacts to world events and emits movement commands.
#[derive(Debug, Default)]
pub struct Movement {
    stranded_at: Option<CellCoord>,
}

impl Movement {
    /// Creates a new movement system.
    #[must_use]
    pub const fn new() -> Self {
        Self { stranded_at: None }
    }

    /// Consumes world events and immutable views to emit movement commands.
    ///
    /// An explicit `AgentRouteNeeded` event always triggers planning. Plain
    /// ticks retry planning only while the agent waits for a route and was
    /// not already found stranded at its current cell.
    pub fn handle(
        &mut self,
        events: &[Event],
        agent: &AgentSnapshot,
        grid: &GridEngine,
        goals: &[CellCoord],
        out: &mut Vec<Command>,
    ) {
        let requested = events
            .iter()
            .any(|event| matches!(event, Event::AgentRouteNeeded));
        let ticked = events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }));

        if requested {
            self.stranded_at = None;
        }

        if !agent.needs_route || !(requested || ticked) {
            return;
        }

        if self.stranded_at == Some(agent.cell) {
            return;
        }

        if goals.contains(&agent.cell) && agent.cell != agent.spawn {
            out.push(Command::ReturnAgentToSpawn);
            return;
        }

        match grid.find_path(agent.cell, goals) {
            Ok(Some(route)) if route.len() > 1 => {
                self.stranded_at = None;
                out.push(Command::SetAgentRoute { route });
            }
            Ok(Some(_)) => {
                trace!("agent already stands on goal {}", agent.cell);
                self.stranded_at = Some(agent.cell);
            }
            Ok(None) => {
                debug!("agent at {} has no route to any goal", agent.cell);
                self.stranded_at = Some(agent.cell);
            }
            Err(error) => {
                warn!("route planning failed: {error}");
                self.stranded_at = Some(agent.cell);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn c(x: i32, y: i32) -> CellCoord {
        CellCoord::new(x, y)
    }

    fn waiting_agent(cell: CellCoord) -> AgentSnapshot {
        AgentSnapshot {
            cell,
            spawn: c(0, 0),
            next_hop: None,
            needs_route: true,
            accumulated: Duration::ZERO,
        }
    }

    #[test]
    fn plans_shortest_route_on_request() {
        let grid = GridEngine::new(2, 3).expect("grid");
        let goals = [c(0, 2), c(1, 2)];
        let mut movement = Movement::new();
        let mut commands = Vec::new();

        movement.handle(
            &[Event::AgentRouteNeeded],
            &waiting_agent(c(0, 0)),
            &grid,
            &goals,
            &mut commands,
        );

        assert_eq!(
            commands,
            vec![Command::SetAgentRoute {
                route: vec![c(0, 0), c(0, 1), c(0, 2)],
            }]
        );
    }

    #[test]
    fn ignores_events_when_agent_has_route() {
        let grid = GridEngine::new(2, 3).expect("grid");
        let mut agent = waiting_agent(c(0, 0));
        agent.needs_route = false;
        let mut movement = Movement::new();
        let mut commands = Vec::new();

        movement.handle(
            &[Event::AgentRouteNeeded],
            &agent,
            &grid,
            &[c(0, 2)],
            &mut commands,
        );

        assert!(commands.is_empty());
    }

    #[test]
    fn agent_on_goal_returns_to_spawn() {
        let grid = GridEngine::new(2, 3).expect("grid");
        let mut movement = Movement::new();
        let mut commands = Vec::new();

        movement.handle(
            &[Event::AgentRouteNeeded],
            &waiting_agent(c(1, 2)),
            &grid,
            &[c(0, 2), c(1, 2)],
            &mut commands,
        );

        assert_eq!(commands, vec![Command::ReturnAgentToSpawn]);
    }

    #[test]
    fn stranded_agent_is_not_replanned_every_tick() {
        let grid = GridEngine::from_text("00\n11\n00\n").expect("fixture");
        let goals = [c(0, 2)];
        let agent = waiting_agent(c(0, 0));
        let mut movement = Movement::new();
        let mut commands = Vec::new();
        let tick = [Event::TimeAdvanced {
            dt: Duration::from_millis(125),
        }];

        movement.handle(&[Event::AgentRouteNeeded], &agent, &grid, &goals, &mut commands);
        assert!(commands.is_empty());

        let open = GridEngine::new(2, 3).expect("grid");
        movement.handle(&tick, &agent, &open, &goals, &mut commands);
        assert!(commands.is_empty(), "ticks alone must not retry a stranded agent");

        movement.handle(&[Event::AgentRouteNeeded], &agent, &open, &goals, &mut commands);
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn agent_resting_on_spawn_goal_is_not_replanned_every_tick() {
        let grid = GridEngine::new(2, 3).expect("grid");
        let mut agent = waiting_agent(c(0, 2));
        agent.spawn = c(0, 2);
        let mut movement = Movement::new();
        let mut commands = Vec::new();
        let tick = [Event::TimeAdvanced {
            dt: Duration::from_millis(125),
        }];

        movement.handle(&[Event::AgentRouteNeeded], &agent, &grid, &[c(0, 2), c(1, 2)], &mut commands);
        assert!(commands.is_empty());

        movement.handle(&tick, &agent, &grid, &[c(1, 2)], &mut commands);
        assert!(commands.is_empty(), "ticks alone must not replan an agent resting on a goal");

        movement.handle(&[Event::AgentRouteNeeded], &agent, &grid, &[c(1, 2)], &mut commands);
        assert_eq!(
            commands,
            vec![Command::SetAgentRoute {
                route: vec![c(0, 2), c(1, 2)],
            }]
        );
    }
}
