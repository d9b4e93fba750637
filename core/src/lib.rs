#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Motherboard Defense engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Motherboard Defense.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the playing field with an empty grid of the provided extents.
    ConfigureGrid {
        /// Number of cells along the x axis.
        width: u32,
        /// Number of cells along the y axis.
        length: u32,
        /// Cell the agent starts from and returns to after every lap.
        spawn: CellCoord,
    },
    /// Updates the duration the agent must accumulate before taking another step.
    ConfigureAgentStep {
        /// Minimum simulated time required between successive agent steps.
        step_duration: Duration,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that an obstacle be committed at the provided cell.
    PlaceObstacle {
        /// Cell that should become occupied.
        cell: CellCoord,
    },
    /// Requests that the obstacle at the provided cell be removed.
    RemoveObstacle {
        /// Cell that should become free.
        cell: CellCoord,
    },
    /// Hands the agent a freshly computed route to follow.
    SetAgentRoute {
        /// Ordered cells starting at the agent's current cell.
        route: Vec<CellCoord>,
    },
    /// Sends the agent back to its spawn cell.
    ReturnAgentToSpawn,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that the playing field was replaced.
    GridConfigured {
        /// Number of cells along the x axis.
        width: u32,
        /// Number of cells along the y axis.
        length: u32,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that an obstacle was committed.
    ObstaclePlaced {
        /// Cell that became occupied.
        cell: CellCoord,
    },
    /// Reports that an obstacle placement request was rejected.
    ObstaclePlacementRejected {
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that an obstacle was removed.
    ObstacleRemoved {
        /// Cell that became free.
        cell: CellCoord,
    },
    /// Reports that an obstacle removal request was rejected.
    ObstacleRemovalRejected {
        /// Cell provided in the removal request.
        cell: CellCoord,
        /// Specific reason the removal failed.
        reason: RemovalError,
    },
    /// Signals that the agent has no usable route and awaits a new one.
    AgentRouteNeeded,
    /// Confirms that the agent accepted a new route.
    AgentRouteAssigned {
        /// Number of steps left to walk along the route.
        steps: usize,
    },
    /// Confirms that the agent moved between two adjacent cells.
    AgentAdvanced {
        /// Cell the agent occupied before moving.
        from: CellCoord,
        /// Cell the agent occupies after completing the move.
        to: CellCoord,
    },
    /// Announces that the agent stepped onto a goal cell.
    AgentReachedGoal {
        /// Goal cell the agent reached.
        cell: CellCoord,
    },
    /// Confirms that the agent was sent back to its spawn.
    AgentReturnedToSpawn {
        /// Spawn cell the agent now occupies.
        cell: CellCoord,
    },
}

/// Location of a single grid cell expressed as `x` and `y` coordinates.
///
/// Components are signed so callers can name cells that lie outside a grid;
/// such coordinates are rejected by the grid rather than being unrepresentable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    x: i32,
    y: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Computes the Manhattan distance between two cell coordinates.
    ///
    /// Saturates at `u32::MAX` for cells at opposite ends of the `i32` range.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.x
            .abs_diff(other.x)
            .saturating_add(self.y.abs_diff(other.y))
    }

    /// Reports whether `other` shares an edge with this cell.
    #[must_use]
    pub fn is_adjacent(self, other: CellCoord) -> bool {
        matches!(
            (self.x.abs_diff(other.x), self.y.abs_diff(other.y)),
            (0, 1) | (1, 0)
        )
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

/// Immutable representation of the agent's state used for queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgentSnapshot {
    /// Grid cell currently occupied by the agent.
    pub cell: CellCoord,
    /// Cell the agent returns to after reaching a goal.
    pub spawn: CellCoord,
    /// Head of the queued route, if any.
    pub next_hop: Option<CellCoord>,
    /// Indicates whether the world awaits a new route for the agent.
    pub needs_route: bool,
    /// Duration accumulated toward the next step.
    pub accumulated: Duration,
}

/// Reasons an obstacle placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested cell lies outside the configured grid.
    OutOfBounds,
    /// The requested cell already holds an obstacle.
    Occupied,
    /// The agent stands on, or is about to enter, the requested cell.
    AgentInTheWay,
    /// Occupying the cell would leave no route to any goal.
    BlocksPath,
}

/// Reasons an obstacle removal request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalError {
    /// The requested cell lies outside the configured grid.
    OutOfBounds,
    /// No obstacle occupies the requested cell.
    Vacant,
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, PlacementError, RemovalError};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn manhattan_distance_spans_negative_coordinates() {
        let origin = CellCoord::new(-2, 0);
        assert_eq!(origin.manhattan_distance(CellCoord::new(1, -1)), 4);
    }

    #[test]
    fn manhattan_distance_saturates_across_full_range() {
        let low = CellCoord::new(i32::MIN, i32::MIN);
        let high = CellCoord::new(i32::MAX, i32::MAX);
        assert_eq!(low.manhattan_distance(high), u32::MAX);
    }

    #[test]
    fn adjacency_requires_shared_edge() {
        let cell = CellCoord::new(2, 2);
        assert!(cell.is_adjacent(CellCoord::new(2, 3)));
        assert!(cell.is_adjacent(CellCoord::new(1, 2)));
        assert!(!cell.is_adjacent(CellCoord::new(3, 3)));
        assert!(!cell.is_adjacent(cell));
        assert!(!cell.is_adjacent(CellCoord::new(i32::MIN, i32::MIN)));
    }

    #[test]
    fn display_uses_bracketed_pair() {
        assert_eq!(CellCoord::new(3, 7).to_string(), "[3, 7]");
        assert_eq!(CellCoord::new(-1, 0).to_string(), "[-1, 0]");
    }

    #[test]
    fn equality_and_hash_are_structural() {
        use std::collections::HashSet;

        let mut cells = HashSet::new();
        assert!(cells.insert(CellCoord::new(1, 2)));
        assert!(!cells.insert(CellCoord::new(1, 2)));
        assert!(cells.contains(&CellCoord::new(1, 2)));
        assert!(!cells.contains(&CellCoord::new(2, 1)));
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn cell_coord_round_trips_through_bincode() {
        assert_round_trip(&CellCoord::new(5, -7));
    }

    #[test]
    fn placement_error_round_trips_through_bincode() {
        assert_round_trip(&PlacementError::BlocksPath);
    }

    #[test]
    fn removal_error_round_trips_through_bincode() {
        assert_round_trip(&RemovalError::Vacant);
    }
}
