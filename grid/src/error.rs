//! Error types for grid construction and queries.

use motherboard_defense_core::CellCoord;
use thiserror::Error;

/// Errors surfaced by [`crate::GridEngine`] operations.
///
/// An unreachable goal is not an error: path queries report it as `Ok(None)`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// A coordinate argument lies outside `[0, width) x [0, length)`.
    #[error("coordinate {coord} lies outside the {width}x{length} grid")]
    OutOfRange {
        /// The offending coordinate.
        coord: CellCoord,
        /// Width of the grid that rejected the coordinate.
        width: u32,
        /// Length of the grid that rejected the coordinate.
        length: u32,
    },
    /// One of the requested extents is zero.
    #[error("grid extents {width}x{length} contain no cells")]
    EmptyExtent {
        /// Requested width.
        width: u32,
        /// Requested length.
        length: u32,
    },
    /// The requested extents cannot be addressed with signed cell coordinates.
    #[error("grid extents {width}x{length} exceed the addressable range")]
    ExtentTooLarge {
        /// Requested width.
        width: u32,
        /// Requested length.
        length: u32,
    },
    /// A row-encoded fixture could not be parsed.
    #[error("malformed grid fixture at line {line}: {defect}")]
    MalformedFixture {
        /// One-based line number where parsing stopped.
        line: usize,
        /// What was wrong with the line.
        defect: FixtureDefect,
    },
    /// A column of an occupancy matrix differs in length from the first.
    #[error("occupancy column {column} has {found} cells, expected {expected}")]
    RaggedOccupancy {
        /// Zero-based index of the offending column.
        column: usize,
        /// Length of the first column.
        expected: usize,
        /// Length of the offending column.
        found: usize,
    },
}

/// Specific problem found in a row-encoded fixture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum FixtureDefect {
    /// The fixture contains no rows at all.
    #[error("fixture contains no rows")]
    NoRows,
    /// A row contains no cells.
    #[error("row is empty")]
    EmptyRow,
    /// A row is shorter or longer than the first row.
    #[error("expected {expected} cells but found {found}")]
    Ragged {
        /// Width established by the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A cell is neither `'0'` nor `'1'`.
    #[error("unexpected character {character:?} in column {column}")]
    InvalidCharacter {
        /// The offending character.
        character: char,
        /// Zero-based column of the character.
        column: usize,
    },
}
