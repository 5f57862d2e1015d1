//! Error types for grid construction and editing.

use crate::cell::CellMark;
use grid_util::point::Point;
use std::fmt;

/// Errors arising from grid construction or from edits that would break the grid invariants.
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// A coordinate is outside of the grid.
    OutOfBounds {
        pos: Point,
        width: usize,
        height: usize,
    },
    /// The edit is not allowed on a cell carrying the start or end mark.
    MarkedCell { pos: Point, mark: CellMark },
    /// A configuration that cannot produce a valid grid.
    InvalidConfig { reason: String },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { pos, width, height } => {
                write!(
                    f,
                    "coordinate ({}, {}) out of bounds for {width}x{height} grid",
                    pos.x, pos.y
                )
            }
            Self::MarkedCell { pos, mark } => {
                write!(f, "cell ({}, {}) is marked as {mark:?}", pos.x, pos.y)
            }
            Self::InvalidConfig { reason } => write!(f, "invalid grid configuration: {reason}"),
        }
    }
}

impl std::error::Error for GridError {}

/// A malformed line in a text map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapParseError {
    /// One-based line number, 0 if the problem concerns the map as a whole.
    pub line: usize,
    pub reason: String,
}

impl MapParseError {
    pub(crate) fn new(line: usize, reason: impl Into<String>) -> MapParseError {
        MapParseError {
            line,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for MapParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "invalid map: {}", self.reason)
        } else {
            write!(f, "invalid map at line {}: {}", self.line, self.reason)
        }
    }
}

impl std::error::Error for MapParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_coordinate() {
        let err = GridError::OutOfBounds {
            pos: Point::new(7, -1),
            width: 5,
            height: 5,
        };
        assert_eq!(
            err.to_string(),
            "coordinate (7, -1) out of bounds for 5x5 grid"
        );
        let err = MapParseError::new(3, "expected two coordinates");
        assert_eq!(
            err.to_string(),
            "invalid map at line 3: expected two coordinates"
        );
    }
}
