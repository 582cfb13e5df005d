#![deny(missing_docs)]
//! This crate solves nonogram (picture-logic / picross) puzzles: given a grid
//! with some cells already crossed out and a run-length clue for every row
//! and column, it finds a full fill/blank assignment consistent with all
//! clues, or reports that none exists.
//!
//! The engine enumerates every realization of each line's clue up front,
//! then runs a chronological backtracking search that commits the
//! most-constrained line first and narrows every perpendicular line after
//! each commit, with exact undo on failure.
//!
//! ```
//! use nonogram_solver::solver::board::Board;
//!
//! let crosses = vec![vec![false; 2]; 2];
//! let mut board = Board::new(&crosses, &[vec![2], vec![]], &[vec![1], vec![1]]).unwrap();
//! assert_eq!(
//!     board.solve(),
//!     Some(vec![vec![true, true], vec![false, false]])
//! );
//! ```

/// The `puzzle` module defines the JSON request/response layer a front end
/// mounts on top of the solver.
pub mod puzzle;

/// The `solver` module implements the constraint-propagation backtracking
/// engine.
pub mod solver;
