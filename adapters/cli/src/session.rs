//! Headless session wiring the world to the builder and movement systems.

use std::time::Duration;

use anyhow::{bail, Result};
use log::{debug, info};
use motherboard_defense_core::{
    AgentSnapshot, CellCoord, Command, Event, PlacementError, RemovalError,
};
use motherboard_defense_system_builder::{Builder, BuilderInput};
use motherboard_defense_system_movement::Movement;
use motherboard_defense_world::{self as world, query, World};

use crate::config::SessionConfig;

#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    builder: Builder,
    movement: Movement,
    laps: u32,
}

impl Session {
    pub(crate) fn new(config: &SessionConfig) -> Result<Self> {
        let mut session = Self {
            world: World::new(),
            builder: Builder::new(),
            movement: Movement::new(),
            laps: 0,
        };

        let mut events = Vec::new();
        world::apply(
            &mut session.world,
            Command::ConfigureAgentStep {
                step_duration: config.step_duration(),
            },
            &mut events,
        );
        world::apply(
            &mut session.world,
            Command::ConfigureGrid {
                width: config.width,
                length: config.length,
                spawn: config.spawn(),
            },
            &mut events,
        );

        if !events
            .iter()
            .any(|event| matches!(event, Event::GridConfigured { .. }))
        {
            bail!(
                "a {}x{} grid cannot host spawn {}",
                config.width,
                config.length,
                config.spawn()
            );
        }

        info!(
            "session configured: {}x{} grid, spawn {}",
            config.width,
            config.length,
            config.spawn()
        );
        session.dispatch(events);
        Ok(session)
    }

    /// Places an obstacle the way a player confirming the hovered cell would.
    pub(crate) fn place(&mut self, cell: CellCoord) -> Result<(), PlacementError> {
        let commands = self.drive_builder(&[], BuilderInput::new(true, false, Some(cell)));
        if commands.is_empty() {
            let reason = self
                .builder
                .preview()
                .and_then(|preview| preview.rejection)
                .unwrap_or(PlacementError::Occupied);
            return Err(reason);
        }

        let events = self.apply_all(commands);
        let rejection = events.iter().find_map(|event| match event {
            Event::ObstaclePlacementRejected { reason, .. } => Some(*reason),
            _ => None,
        });
        self.dispatch(events);
        rejection.map_or(Ok(()), Err)
    }

    pub(crate) fn remove(&mut self, cell: CellCoord) -> Result<(), RemovalError> {
        let events = self.apply_all(vec![Command::RemoveObstacle { cell }]);
        let rejection = events.iter().find_map(|event| match event {
            Event::ObstacleRemovalRejected { reason, .. } => Some(*reason),
            _ => None,
        });
        self.dispatch(events);
        rejection.map_or(Ok(()), Err)
    }

    pub(crate) fn tick(&mut self, dt: Duration) {
        let events = self.apply_all(vec![Command::Tick { dt }]);
        self.dispatch(events);
    }

    pub(crate) fn agent(&self) -> AgentSnapshot {
        query::agent_snapshot(&self.world)
    }

    /// Number of times the agent reached a goal.
    pub(crate) fn laps(&self) -> u32 {
        self.laps
    }

    /// Board with the agent's remaining route overlaid.
    pub(crate) fn render(&self) -> Result<String> {
        let route = query::agent_route(&self.world);
        Ok(query::grid(&self.world).render_with_path(&route)?)
    }

    fn drive_builder(&mut self, events: &[Event], input: BuilderInput) -> Vec<Command> {
        let world = &self.world;
        let mut commands = Vec::new();
        self.builder.handle(
            events,
            input,
            |cell| query::placement_verdict(world, cell),
            |cell| query::grid(world).is_occupied(cell) == Ok(true),
            &mut commands,
        );
        commands
    }

    fn apply_all(&mut self, commands: Vec<Command>) -> Vec<Event> {
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        events
    }

    /// Feeds events to the systems until no further commands are produced.
    fn dispatch(&mut self, mut events: Vec<Event>) {
        while !events.is_empty() {
            for event in &events {
                if let Event::AgentReachedGoal { cell } = event {
                    self.laps += 1;
                    debug!("agent reached goal {cell}");
                }
            }

            let mut commands = self.drive_builder(&events, BuilderInput::default());
            let agent = query::agent_snapshot(&self.world);
            self.movement.handle(
                &events,
                &agent,
                query::grid(&self.world),
                query::goals(&self.world),
                &mut commands,
            );

            events = self.apply_all(commands);
        }
    }
}
