#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]

/// The `board` module owns the dual-view cell grid and the backtracking search.
pub mod board;
/// The `constraint` module enumerates and narrows the realizations of one line's clue.
pub mod constraint;
/// The `error` module defines the construction-time failure type.
pub mod error;
/// The `step` module defines the search-trace records emitted for observers.
pub mod step;
