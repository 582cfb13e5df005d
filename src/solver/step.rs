//! Search-trace records.
//!
//! The engine can report every candidate line assignment it tries through an
//! optional sink. Each [`Step`] is a snapshot of the whole grid, optionally
//! marked with the line the search is branching on. Steps are a pure side
//! channel: the engine never reads them back and the search outcome is
//! identical with or without a sink.

use crate::solver::constraint::Cell;
use serde::Serialize;

/// Orientation of a line in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Axis {
    /// A horizontal line, indexed top to bottom.
    Row,
    /// A vertical line, indexed left to right.
    Column,
}

/// Identifies one row or column of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Line {
    /// Row or column.
    pub axis: Axis,
    /// Zero-based index along that axis.
    pub index: usize,
}

/// An immutable snapshot of the grid at one instant of the search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    /// Row-major copy of every cell.
    pub grid: Vec<Vec<Cell>>,
    /// The line being branched on, when the snapshot precedes a commit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_cells_as_wire_integers() {
        let step = Step {
            grid: vec![vec![Cell::Unknown, Cell::Blank, Cell::Filled]],
            line: Some(Line {
                axis: Axis::Row,
                index: 0,
            }),
        };
        let json = serde_json::to_string(&step).unwrap();
        assert_eq!(
            json,
            r#"{"grid":[[0,1,2]],"line":{"axis":"row","index":0}}"#
        );
    }

    #[test]
    fn omits_the_line_marker_when_absent() {
        let step = Step {
            grid: vec![vec![Cell::Unknown]],
            line: None,
        };
        assert_eq!(serde_json::to_string(&step).unwrap(), r#"{"grid":[[0]]}"#);
    }
}
