#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Per-line constraint handling.
//!
//! A [`Constraint`] is bound to exactly one line of the grid. At construction
//! it enumerates every concrete placement of the clue's runs inside the line
//! (a "realization"), discarding placements that clash with cells known at
//! that point. During the search, [`Constraint::update`] marks realizations
//! dead as perpendicular lines fix more cells, and [`Constraint::undo`]
//! resurrects exactly the set killed by the matching `update`, so the engine
//! can backtrack with no residue.

use crate::solver::error::InvalidConstraint;
use bit_vec::BitVec;
use serde::{Serialize, Serializer};
use smallvec::{smallvec, SmallVec};
use std::fmt;

/// Tri-state value of one grid cell.
///
/// `Unknown` only exists mid-search; a solved board holds `Blank` and
/// `Filled` exclusively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum Cell {
    /// Not yet determined.
    #[default]
    Unknown,
    /// Cannot be part of a filled run.
    Blank,
    /// Part of a filled run.
    Filled,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "?"),
            Self::Blank => write!(f, "."),
            Self::Filled => write!(f, "X"),
        }
    }
}

// Serialized as the wire encoding used by the original service:
// 0 undecided, 1 crossed, 2 chosen.
impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(match self {
            Self::Unknown => 0,
            Self::Blank => 1,
            Self::Filled => 2,
        })
    }
}

/// A cell is compatible with a realization cell unless it is already fixed
/// to the opposite state.
fn consistent(realization: &[Cell], cells: &[Cell]) -> bool {
    debug_assert_eq!(realization.len(), cells.len(), "line length mismatch");
    realization
        .iter()
        .zip(cells)
        .all(|(&r, &c)| c == Cell::Unknown || r == c)
}

/// All a-priori realizations of one line's clue, with live/dead tracking,
/// an O(1) live count, and a LIFO undo stack of kill frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    /// Immutable after construction; order is the deterministic branch order.
    realizations: Vec<Vec<Cell>>,
    live: BitVec,
    live_count: usize,
    removed: Vec<SmallVec<[usize; 8]>>,
    resolved: bool,
}

impl Constraint {
    /// Enumerates every placement of `clue` in a line of `cells.len()` cells
    /// and keeps the ones consistent with the cells already fixed.
    ///
    /// Zero surviving realizations is a legitimate outcome (the caller's
    /// branch is unsatisfiable), not an error.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConstraint`] if any run length is non-positive, or
    /// if the clue's minimum span (runs plus one separator between each
    /// pair) exceeds the line length.
    pub fn new(clue: &[i32], cells: &[Cell]) -> Result<Self, InvalidConstraint> {
        let n = cells.len();
        if clue.iter().any(|&run| run <= 0) {
            return Err(InvalidConstraint::new(clue, n));
        }
        #[allow(clippy::cast_sign_loss)]
        let runs: SmallVec<[usize; 8]> = clue.iter().map(|&run| run as usize).collect();
        let span = runs.iter().sum::<usize>() + runs.len().saturating_sub(1);
        if span > n {
            return Err(InvalidConstraint::new(clue, n));
        }

        let mut realizations = Vec::new();
        let mut gaps: SmallVec<[usize; 8]> = smallvec![0; runs.len() + 1];
        Self::enumerate(&runs, &mut gaps, n - span, 0, cells, &mut realizations);

        let count = realizations.len();
        Ok(Self {
            realizations,
            live: BitVec::from_elem(count, true),
            live_count: count,
            removed: Vec::new(),
            resolved: false,
        })
    }

    /// Distributes the remaining slack over the gaps from `index` on, and
    /// materializes a realization for every complete composition.
    fn enumerate(
        runs: &[usize],
        gaps: &mut SmallVec<[usize; 8]>,
        slack: usize,
        index: usize,
        cells: &[Cell],
        out: &mut Vec<Vec<Cell>>,
    ) {
        if index == gaps.len() - 1 {
            gaps[index] = slack;
            let line = Self::materialize(runs, gaps, cells.len());
            if consistent(&line, cells) {
                out.push(line);
            }
            return;
        }
        for extra in 0..=slack {
            gaps[index] = extra;
            Self::enumerate(runs, gaps, slack - extra, index + 1, cells, out);
        }
    }

    /// Builds the concrete cell vector for one gap composition:
    /// `gaps[0]` blanks, the first run, a separator plus `gaps[i]` blanks
    /// before each later run, and `gaps[k]` trailing blanks.
    fn materialize(runs: &[usize], gaps: &[usize], n: usize) -> Vec<Cell> {
        let mut line = Vec::with_capacity(n);
        for (i, (&gap, &run)) in gaps.iter().zip(runs).enumerate() {
            if i > 0 {
                line.push(Cell::Blank);
            }
            for _ in 0..gap {
                line.push(Cell::Blank);
            }
            for _ in 0..run {
                line.push(Cell::Filled);
            }
        }
        for _ in 0..gaps[gaps.len() - 1] {
            line.push(Cell::Blank);
        }
        debug_assert_eq!(line.len(), n);
        line
    }

    /// Re-checks every live realization against the line's current cells,
    /// killing the newly inconsistent ones as a single undo frame.
    ///
    /// Calling this twice with the same cells pushes an empty frame the
    /// second time.
    pub fn update(&mut self, cells: &[Cell]) {
        let mut frame = SmallVec::new();
        for (i, realization) in self.realizations.iter().enumerate() {
            if self.live[i] && !consistent(realization, cells) {
                self.live.set(i, false);
                frame.push(i);
            }
        }
        self.live_count -= frame.len();
        self.removed.push(frame);
    }

    /// Reverses the most recent [`Constraint::update`] exactly.
    ///
    /// # Panics
    ///
    /// Panics if there is no frame to pop. Updates and undos must be strictly
    /// paired; an unbalanced undo is a bug in the engine.
    pub fn undo(&mut self) {
        let frame = self
            .removed
            .pop()
            .expect("constraint undo without a matching update");
        for &i in &frame {
            self.live.set(i, true);
        }
        self.live_count += frame.len();
    }

    /// Number of realizations still consistent with everything known.
    #[must_use]
    pub const fn possibility_count(&self) -> usize {
        self.live_count
    }

    /// The live realizations, in construction order.
    #[must_use]
    pub fn possibilities(&self) -> Vec<&[Cell]> {
        self.realizations
            .iter()
            .enumerate()
            .filter(|&(i, _)| self.live[i])
            .map(|(_, r)| r.as_slice())
            .collect()
    }

    /// Whether the engine has committed this line in the current branch.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Excludes this line from the candidate scan.
    pub fn resolve(&mut self) {
        self.resolved = true;
    }

    /// Re-admits this line to the candidate scan.
    pub fn unresolve(&mut self) {
        self.resolved = false;
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Realizations: {{ ")?;
        for realization in self.possibilities() {
            for cell in realization {
                write!(f, "{cell}")?;
            }
            write!(f, " ")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const U: Cell = Cell::Unknown;
    const B: Cell = Cell::Blank;
    const F: Cell = Cell::Filled;

    fn binomial(n: usize, k: usize) -> usize {
        (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
    }

    #[test]
    fn one_possibility() {
        let mut constraint = Constraint::new(&[1, 3], &[U; 5]).unwrap();
        assert_eq!(constraint.possibility_count(), 1);
        assert_eq!(constraint.possibilities(), vec![&[F, B, F, F, F]]);

        constraint.update(&[F, U, F, U, U]);
        assert_eq!(constraint.possibility_count(), 1);
        constraint.undo();
        constraint.update(&[U, F, U, U, U]);
        assert_eq!(constraint.possibility_count(), 0);
        constraint.undo();
        constraint.update(&[U, U, F, U, U]);
        assert_eq!(constraint.possibility_count(), 1);
        constraint.undo();
        constraint.update(&[F, F, B, U, U]);
        assert_eq!(constraint.possibility_count(), 0);
    }

    #[test]
    fn multiple_possibilities() {
        let mut constraint = Constraint::new(&[1, 1], &[U; 5]).unwrap();
        assert_eq!(constraint.possibility_count(), 6);

        constraint.update(&[U, F, U, U, U]);
        assert_eq!(constraint.possibility_count(), 2);
        constraint.undo();
        constraint.update(&[B, F, U, U, U]);
        assert_eq!(constraint.possibility_count(), 2);
        constraint.undo();
        constraint.update(&[F, B, F, U, F]);
        assert_eq!(constraint.possibility_count(), 0);
        constraint.undo();
        constraint.update(&[F, B, F, U, U]);
        assert_eq!(constraint.possibility_count(), 1);
        constraint.undo();
        constraint.update(&[U, F, F, U, U]);
        assert_eq!(constraint.possibility_count(), 0);
        constraint.undo();
        constraint.update(&[F, U, U, F, U]);
        assert_eq!(constraint.possibility_count(), 1);
    }

    #[test]
    fn undo_restores_each_frame_in_reverse() {
        let mut constraint = Constraint::new(&[1, 1], &[U, B, U, U, U]).unwrap();
        assert_eq!(constraint.possibility_count(), 4);

        constraint.update(&[F, B, U, U, B]);
        constraint.update(&[F, B, F, U, B]);
        constraint.update(&[F, B, F, F, B]);
        assert_eq!(constraint.possibility_count(), 0);
        constraint.undo();
        assert_eq!(constraint.possibility_count(), 1);
        constraint.undo();
        assert_eq!(constraint.possibility_count(), 2);
        constraint.undo();
        assert_eq!(constraint.possibility_count(), 4);
    }

    #[test]
    fn unconstrained_count_is_stars_and_bars() {
        // k runs summing to s in a line of n leave n - s - (k - 1) slack
        // over k + 1 gaps: C(slack + k, k) compositions.
        for (clue, n) in [
            (vec![2], 6),
            (vec![1, 1, 1], 7),
            (vec![3, 2], 10),
            (vec![1], 1),
        ] {
            let k = clue.len();
            let s: i32 = clue.iter().sum();
            let slack = n - s as usize - (k - 1);
            let constraint = Constraint::new(&clue, &vec![U; n]).unwrap();
            assert_eq!(
                constraint.possibility_count(),
                binomial(slack + k, k),
                "clue {clue:?} in line of {n}"
            );
        }
    }

    #[test]
    fn update_is_idempotent() {
        let mut constraint = Constraint::new(&[1, 1], &[U; 5]).unwrap();
        constraint.update(&[F, U, U, U, U]);
        let count = constraint.possibility_count();
        constraint.update(&[F, U, U, U, U]);
        assert_eq!(constraint.possibility_count(), count);
        constraint.undo();
        assert_eq!(constraint.possibility_count(), count);
        constraint.undo();
        assert_eq!(constraint.possibility_count(), 6);
    }

    #[test]
    fn possibilities_are_sound_after_updates() {
        let cells = [U, U, F, U, U, B, U];
        let mut constraint = Constraint::new(&[2, 1], &[U; 7]).unwrap();
        constraint.update(&cells);
        for realization in constraint.possibilities() {
            assert!(consistent(realization, &cells), "{realization:?}");
        }
        assert_eq!(constraint.possibilities().len(), constraint.possibility_count());
    }

    #[test]
    fn initial_conflicts_are_discarded_for_good() {
        // Realizations pruned at construction stay gone after update/undo.
        let mut constraint = Constraint::new(&[1], &[B, U, U]).unwrap();
        assert_eq!(constraint.possibility_count(), 2);
        constraint.update(&[B, U, U]);
        constraint.undo();
        assert_eq!(constraint.possibility_count(), 2);
    }

    #[test]
    fn empty_clue_is_all_blank() {
        let constraint = Constraint::new(&[], &[U; 4]).unwrap();
        assert_eq!(constraint.possibilities(), vec![&[B, B, B, B]]);
    }

    #[test]
    fn empty_clue_conflicting_with_a_filled_cell_has_no_possibilities() {
        let constraint = Constraint::new(&[], &[U, F, U]).unwrap();
        assert_eq!(constraint.possibility_count(), 0);
    }

    #[test]
    fn oversized_clue_is_invalid() {
        assert!(Constraint::new(&[6], &[U; 5]).is_err());
        assert!(Constraint::new(&[3, 2], &[U; 5]).is_err());
        assert!(Constraint::new(&[1], &[]).is_err());
    }

    #[test]
    fn exact_fit_is_valid() {
        let constraint = Constraint::new(&[3, 1], &[U; 5]).unwrap();
        assert_eq!(constraint.possibilities(), vec![&[F, F, F, B, F]]);
    }

    #[test]
    fn non_positive_runs_are_invalid() {
        assert!(Constraint::new(&[0], &[U; 5]).is_err());
        assert!(Constraint::new(&[2, -1], &[U; 5]).is_err());
    }

    #[test]
    fn empty_clue_on_empty_line_is_valid() {
        let constraint = Constraint::new(&[], &[]).unwrap();
        assert_eq!(constraint.possibility_count(), 1);
    }

    #[test]
    #[should_panic(expected = "undo without a matching update")]
    fn unbalanced_undo_panics() {
        let mut constraint = Constraint::new(&[1], &[U; 3]).unwrap();
        constraint.undo();
    }
}
