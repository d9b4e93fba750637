use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use motherboard_defense_core::CellCoord;
use motherboard_defense_grid::{GridEngine, GridError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SNAPSHOT_DOMAIN: &str = "grid";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded snapshot payload.
pub(crate) const SNAPSHOT_HEADER: &str = "grid:v1";
const FIELD_DELIMITER: char = ':';

/// Obstacle layout of a playing field, transferable as a single line of text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ObstacleLayout {
    pub(crate) width: u32,
    pub(crate) length: u32,
    pub(crate) obstacles: Vec<CellCoord>,
}

#[derive(Serialize, Deserialize)]
struct Payload {
    obstacles: Vec<CellCoord>,
}

impl ObstacleLayout {
    /// Captures the occupied cells of `grid`.
    pub(crate) fn capture(grid: &GridEngine) -> Self {
        Self {
            width: grid.width(),
            length: grid.length(),
            obstacles: grid.occupied_cells().collect(),
        }
    }

    /// Builds a grid with the captured extents and obstacles.
    pub(crate) fn restore(&self) -> Result<GridEngine, LayoutTransferError> {
        let mut grid = GridEngine::new(self.width, self.length)?;
        for &cell in &self.obstacles {
            grid.set_occupied(cell)?;
        }
        Ok(grid)
    }

    pub(crate) fn encode(&self) -> Result<String, LayoutTransferError> {
        let json = serde_json::to_vec(&Payload {
            obstacles: self.obstacles.clone(),
        })
        .map_err(LayoutTransferError::InvalidPayload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!(
            "{SNAPSHOT_HEADER}:{}x{}:{encoded}",
            self.width, self.length
        ))
    }

    pub(crate) fn decode(value: &str) -> Result<Self, LayoutTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LayoutTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(LayoutTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(LayoutTransferError::MissingVersion)?;
        let dimensions = parts.next().ok_or(LayoutTransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(LayoutTransferError::MissingPayload)?;

        if domain != SNAPSHOT_DOMAIN {
            return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != SNAPSHOT_VERSION {
            return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
        }

        let (width, length) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(LayoutTransferError::InvalidEncoding)?;
        let decoded: Payload =
            serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;

        Ok(Self {
            width,
            length,
            obstacles: decoded.obstacles,
        })
    }
}

/// Errors that can occur while decoding layout transfer strings.
#[derive(Debug, Error)]
pub(crate) enum LayoutTransferError {
    #[error("layout string was empty")]
    EmptyPayload,
    #[error("layout string is missing the prefix")]
    MissingPrefix,
    #[error("layout string is missing the version")]
    MissingVersion,
    #[error("layout string is missing the grid dimensions")]
    MissingDimensions,
    #[error("layout string is missing the payload")]
    MissingPayload,
    #[error("layout prefix '{0}' is not supported")]
    InvalidPrefix(String),
    #[error("layout version '{0}' is not supported")]
    UnsupportedVersion(String),
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    #[error("could not decode layout payload")]
    InvalidEncoding(#[source] base64::DecodeError),
    #[error("could not parse layout payload")]
    InvalidPayload(#[source] serde_json::Error),
    #[error("layout does not fit its grid")]
    Grid(#[from] GridError),
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), LayoutTransferError> {
    let invalid = || LayoutTransferError::InvalidDimensions(dimensions.to_owned());

    let (width, length) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;
    let width = width.trim().parse::<u32>().map_err(|_| invalid())?;
    let length = length.trim().parse::<u32>().map_err(|_| invalid())?;

    if width == 0 || length == 0 {
        return Err(invalid());
    }

    Ok((width, length))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captured_layout_restores_same_board() {
        let grid = GridEngine::from_text("010\n000\n110\n").expect("fixture");

        let encoded = ObstacleLayout::capture(&grid).encode().expect("encodes");
        assert!(encoded.starts_with(&format!("{SNAPSHOT_HEADER}:3x3:")));

        let restored = ObstacleLayout::decode(&encoded)
            .expect("decodes")
            .restore()
            .expect("fits");
        assert_eq!(restored.render(), grid.render());
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let layout = ObstacleLayout {
            width: 2,
            length: 4,
            obstacles: vec![CellCoord::new(1, 3)],
        };
        let encoded = format!("  {}\n", layout.encode().expect("encodes"));

        assert_eq!(ObstacleLayout::decode(&encoded).expect("decodes"), layout);
    }

    #[test]
    fn malformed_headers_are_rejected() {
        assert!(matches!(
            ObstacleLayout::decode("   "),
            Err(LayoutTransferError::EmptyPayload)
        ));
        assert!(matches!(
            ObstacleLayout::decode("maze:v1:2x2:e30"),
            Err(LayoutTransferError::InvalidPrefix(prefix)) if prefix == "maze"
        ));
        assert!(matches!(
            ObstacleLayout::decode("grid:v2:2x2:e30"),
            Err(LayoutTransferError::UnsupportedVersion(version)) if version == "v2"
        ));
        assert!(matches!(
            ObstacleLayout::decode("grid:v1:0x2:e30"),
            Err(LayoutTransferError::InvalidDimensions(_))
        ));
        assert!(matches!(
            ObstacleLayout::decode("grid:v1:2x2"),
            Err(LayoutTransferError::MissingPayload)
        ));
        assert!(matches!(
            ObstacleLayout::decode("grid:v1:2x2:!!"),
            Err(LayoutTransferError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn obstacles_outside_the_grid_fail_to_restore() {
        let layout = ObstacleLayout {
            width: 2,
            length: 2,
            obstacles: vec![CellCoord::new(2, 0)],
        };
        let decoded = ObstacleLayout::decode(&layout.encode().expect("encodes")).expect("decodes");

        assert!(matches!(
            decoded.restore(),
            Err(LayoutTransferError::Grid(GridError::OutOfRange { .. }))
        ));
    }
}
