#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The solve-request data model.
//!
//! A front end (HTTP handler, CLI file mode) hands a deserialized
//! [`PuzzleInput`] to [`solve_request`] and serializes the returned
//! [`PuzzleOutput`]. Shape validation happens here; per-line clue fitness is
//! checked by the solver core itself.

use crate::solver::board::Board;
use crate::solver::step::Step;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

/// Deserialized body of a solve request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleInput {
    /// Cells already known blank, `true` meaning a cross in that cell.
    pub board: Vec<Vec<bool>>,
    /// One run-length clue per row, top to bottom.
    pub row_constraints: Vec<Vec<i32>>,
    /// One run-length clue per column, left to right.
    pub col_constraints: Vec<Vec<i32>>,
}

/// Serialized body of a solve response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleOutput {
    /// Whether a full solution was found.
    pub success: bool,
    /// The solution grid, `true` meaning a filled cell.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution: Option<Vec<Vec<bool>>>,
    /// The search trace, when the caller asked for one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<Step>>,
    /// Why no solution is attached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PuzzleOutput {
    fn solved(solution: Vec<Vec<bool>>, steps: Option<Vec<Step>>) -> Self {
        Self {
            success: true,
            solution: Some(solution),
            steps,
            error: None,
        }
    }

    fn failed(error: impl Into<String>, steps: Option<Vec<Step>>) -> Self {
        Self {
            success: false,
            solution: None,
            steps,
            error: Some(error.into()),
        }
    }
}

/// A request whose shape is malformed: empty or ragged board, or clue
/// counts not matching the board dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPuzzle(String);

impl fmt::Display for InvalidPuzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Error for InvalidPuzzle {}

impl PuzzleInput {
    /// Checks the request shape, leaving clue fitness to the solver.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPuzzle`] with a user-facing message naming the first
    /// violated requirement.
    pub fn validate(&self) -> Result<(), InvalidPuzzle> {
        if self.board.is_empty() {
            return Err(InvalidPuzzle("Board must have at least one row".into()));
        }
        let col_count = self.board[0].len();
        if col_count == 0 {
            return Err(InvalidPuzzle("Board must have at least one column".into()));
        }
        if self.board.iter().any(|row| row.len() != col_count) {
            return Err(InvalidPuzzle(
                "Board has inconsistent number of columns".into(),
            ));
        }
        if self.row_constraints.len() != self.board.len() {
            return Err(InvalidPuzzle(
                "Must have the same number of row constraints as number of rows".into(),
            ));
        }
        if self.col_constraints.len() != col_count {
            return Err(InvalidPuzzle(
                "Must have the same number of col constraints as number of cols".into(),
            ));
        }
        Ok(())
    }
}

/// Validates, constructs, and solves in one call, mapping every outcome to
/// a response body. `record_steps` attaches the full search trace, on
/// success and on unsatisfiable puzzles alike.
#[must_use]
pub fn solve_request(input: &PuzzleInput, record_steps: bool) -> PuzzleOutput {
    if let Err(invalid) = input.validate() {
        return PuzzleOutput::failed(invalid.to_string(), None);
    }

    let Ok(mut board) = Board::new(&input.board, &input.row_constraints, &input.col_constraints)
    else {
        return PuzzleOutput::failed("At least one of the constraints is invalid", None);
    };

    if record_steps {
        let mut steps = Vec::new();
        let solution = board.solve_observed(Some(&mut |step| steps.push(step)));
        match solution {
            Some(solution) => PuzzleOutput::solved(solution, Some(steps)),
            None => PuzzleOutput::failed("Unsolvable puzzle", Some(steps)),
        }
    } else {
        match board.solve() {
            Some(solution) => PuzzleOutput::solved(solution, None),
            None => PuzzleOutput::failed("Unsolvable puzzle", None),
        }
    }
}
