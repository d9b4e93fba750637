//! Row-encoded text format used for fixtures and diagnostics.
//!
//! One line per grid row (`y = 0` first), one character per cell (`x = 0`
//! first): `'1'` for occupied, `'0'` for free. Path overlays reuse the same
//! layout and draw route cells as `'P'`.

use crate::error::{FixtureDefect, GridError};

pub(crate) const OCCUPIED: char = '1';
pub(crate) const FREE: char = '0';
pub(crate) const PATH: char = 'P';

/// Occupancy decoded from a fixture, stored in row-major order.
#[derive(Debug)]
pub(crate) struct ParsedGrid {
    pub(crate) width: usize,
    pub(crate) length: usize,
    pub(crate) occupied: Vec<bool>,
}

pub(crate) fn parse(input: &str) -> Result<ParsedGrid, GridError> {
    let mut width = None;
    let mut length = 0;
    let mut occupied = Vec::new();

    for (index, line) in input.lines().enumerate() {
        let line_number = index + 1;
        let malformed = |defect| GridError::MalformedFixture {
            line: line_number,
            defect,
        };

        let row_width = line.chars().count();
        if row_width == 0 {
            return Err(malformed(FixtureDefect::EmptyRow));
        }

        let expected = *width.get_or_insert(row_width);
        if row_width != expected {
            return Err(malformed(FixtureDefect::Ragged {
                expected,
                found: row_width,
            }));
        }

        for (column, character) in line.chars().enumerate() {
            match character {
                OCCUPIED => occupied.push(true),
                FREE => occupied.push(false),
                _ => {
                    return Err(malformed(FixtureDefect::InvalidCharacter { character, column }));
                }
            }
        }

        length += 1;
    }

    let Some(width) = width else {
        return Err(GridError::MalformedFixture {
            line: 1,
            defect: FixtureDefect::NoRows,
        });
    };

    Ok(ParsedGrid {
        width,
        length,
        occupied,
    })
}

/// Joins a row-major character buffer into newline-terminated rows.
pub(crate) fn render(width: usize, cells: &[char]) -> String {
    if width == 0 {
        return String::new();
    }

    let mut output = String::with_capacity(cells.len() + cells.len() / width);
    for row in cells.chunks(width) {
        output.extend(row.iter());
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reads_rows_in_order() {
        let parsed = parse("010\n001\n").expect("fixture parses");

        assert_eq!(parsed.width, 3);
        assert_eq!(parsed.length, 2);
        assert_eq!(
            parsed.occupied,
            vec![false, true, false, false, false, true]
        );
    }

    #[test]
    fn parse_accepts_missing_trailing_newline_and_crlf() {
        let parsed = parse("01\r\n10").expect("fixture parses");

        assert_eq!(parsed.width, 2);
        assert_eq!(parsed.length, 2);
    }

    #[test]
    fn parse_rejects_empty_input() {
        assert_eq!(
            parse("").unwrap_err(),
            GridError::MalformedFixture {
                line: 1,
                defect: FixtureDefect::NoRows,
            }
        );
    }

    #[test]
    fn parse_rejects_ragged_rows() {
        assert_eq!(
            parse("000\n00\n").unwrap_err(),
            GridError::MalformedFixture {
                line: 2,
                defect: FixtureDefect::Ragged {
                    expected: 3,
                    found: 2,
                },
            }
        );
    }

    #[test]
    fn parse_rejects_blank_rows() {
        assert_eq!(
            parse("00\n\n00\n").unwrap_err(),
            GridError::MalformedFixture {
                line: 2,
                defect: FixtureDefect::EmptyRow,
            }
        );
    }

    #[test]
    fn parse_rejects_unknown_characters() {
        assert_eq!(
            parse("0P0\n").unwrap_err(),
            GridError::MalformedFixture {
                line: 1,
                defect: FixtureDefect::InvalidCharacter {
                    character: 'P',
                    column: 1,
                },
            }
        );
    }

    #[test]
    fn render_terminates_every_row() {
        assert_eq!(render(2, &['0', '1', 'P', '0']), "01\nP0\n");
    }
}
