#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure builder system responsible for previewing obstacle placements and
//! emitting placement and removal commands.

use log::debug;
use motherboard_defense_core::{CellCoord, Command, Event, PlacementError};

/// Declarative placement preview describing a potential obstacle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementPreview {
    /// Cell the obstacle would occupy.
    pub cell: CellCoord,
    /// Indicates whether the world would accept the placement.
    pub placeable: bool,
    /// Reason the placement would be refused, if any.
    pub rejection: Option<PlacementError>,
}

impl PlacementPreview {
    /// Builds a preview from the world's verdict for `cell`.
    #[must_use]
    pub fn from_verdict(cell: CellCoord, verdict: Result<(), PlacementError>) -> Self {
        let rejection = verdict.err();
        Self {
            cell,
            placeable: rejection.is_none(),
            rejection,
        }
    }
}

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuilderInput {
    /// Indicates whether the player confirmed a placement on this frame.
    pub confirm_action: bool,
    /// Indicates whether the player requested obstacle removal on this frame.
    pub remove_action: bool,
    /// Cell currently hovered by the cursor.
    pub cursor_cell: Option<CellCoord>,
}

impl BuilderInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(
        confirm_action: bool,
        remove_action: bool,
        cursor_cell: Option<CellCoord>,
    ) -> Self {
        Self {
            confirm_action,
            remove_action,
            cursor_cell,
        }
    }
}

/// Builder system that translates hover and input into placement commands.
#[derive(Debug, Clone, Default)]
pub struct Builder {
    preview: Option<PlacementPreview>,
}

impl Builder {
    /// Creates a new builder system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self { preview: None }
    }

    /// Preview computed for the most recently hovered free cell.
    #[must_use]
    pub fn preview(&self) -> Option<PlacementPreview> {
        self.preview
    }

    /// Consumes world events and adapter input to emit builder commands.
    ///
    /// `placement_verdict` should mirror the world's `query::placement_verdict`
    /// and `is_occupied` should report whether an obstacle sits on a cell. The
    /// verdict is only recomputed when the hovered cell changes or the world
    /// reports a change that could alter it.
    pub fn handle<V, O>(
        &mut self,
        events: &[Event],
        input: BuilderInput,
        mut placement_verdict: V,
        mut is_occupied: O,
        out: &mut Vec<Command>,
    ) where
        V: FnMut(CellCoord) -> Result<(), PlacementError>,
        O: FnMut(CellCoord) -> bool,
    {
        if events.iter().any(invalidates_preview) {
            self.preview = None;
        }

        let Some(cell) = input.cursor_cell else {
            self.preview = None;
            return;
        };

        let occupied = is_occupied(cell);

        if occupied {
            self.preview = None;
        } else if self.preview.map(|preview| preview.cell) != Some(cell) {
            let preview = PlacementPreview::from_verdict(cell, placement_verdict(cell));
            debug!("preview at {cell}: placeable = {}", preview.placeable);
            self.preview = Some(preview);
        }

        if input.confirm_action {
            if let Some(preview) = self.preview.filter(|preview| preview.placeable) {
                out.push(Command::PlaceObstacle { cell: preview.cell });
            }
        }

        if input.remove_action && occupied {
            out.push(Command::RemoveObstacle { cell });
        }
    }
}

fn invalidates_preview(event: &Event) -> bool {
    matches!(
        event,
        Event::GridConfigured { .. }
            | Event::ObstaclePlaced { .. }
            | Event::ObstacleRemoved { .. }
            | Event::AgentAdvanced { .. }
            | Event::AgentReturnedToSpawn { .. }
            | Event::AgentRouteAssigned { .. }
    )
}
