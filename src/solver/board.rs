#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The grid and its backtracking search.
//!
//! A [`Board`] holds the authoritative cell state twice, as row vectors and
//! as column vectors, so a line constraint can inspect or narrow any single
//! row or column in O(line length). Every write goes through both views.
//!
//! The search commits one line at a time: it picks the unresolved line with
//! the fewest live realizations, tries each realization in order, propagates
//! the fixed cells into every perpendicular constraint, and recurses. A
//! perpendicular constraint dropping to zero possibilities prunes the
//! realization on the spot; exhausting a line's realizations undoes all
//! propagation and reports failure one frame up.

use crate::solver::constraint::{Cell, Constraint};
use crate::solver::error::InvalidConstraint;
use crate::solver::step::{Axis, Line, Step};
use itertools::Itertools;
use log::debug;

/// The sink type for search-trace observers.
pub type StepSink<'a> = &'a mut dyn FnMut(Step);

/// A nonogram grid with one [`Constraint`] per row and per column, and the
/// search that resolves them.
#[derive(Debug, Clone)]
pub struct Board {
    rows: Vec<Vec<Cell>>,
    cols: Vec<Vec<Cell>>,
    row_constraints: Vec<Constraint>,
    col_constraints: Vec<Constraint>,
}

impl Board {
    /// Builds a board from the cells already known and one clue per line.
    ///
    /// `true` in `crosses` marks a cell already known to be blank, as on a
    /// paper puzzle; `false` leaves the cell undetermined.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConstraint`] if any clue cannot fit its line. No
    /// partially constructed board escapes.
    ///
    /// # Panics
    ///
    /// Panics if the grid is not rectangular or the clue counts do not match
    /// its dimensions; callers validate shape before constructing.
    pub fn new(
        crosses: &[Vec<bool>],
        row_clues: &[Vec<i32>],
        col_clues: &[Vec<i32>],
    ) -> Result<Self, InvalidConstraint> {
        let row_count = crosses.len();
        let col_count = crosses.first().map_or(0, Vec::len);
        assert_eq!(row_clues.len(), row_count, "one clue per row");
        assert_eq!(col_clues.len(), col_count, "one clue per column");

        let rows: Vec<Vec<Cell>> = crosses
            .iter()
            .map(|row| {
                assert_eq!(row.len(), col_count, "rectangular grid");
                row.iter()
                    .map(|&crossed| if crossed { Cell::Blank } else { Cell::Unknown })
                    .collect()
            })
            .collect();
        let cols: Vec<Vec<Cell>> = (0..col_count)
            .map(|j| (0..row_count).map(|i| rows[i][j]).collect())
            .collect();

        let row_constraints = row_clues
            .iter()
            .zip(&rows)
            .map(|(clue, cells)| Constraint::new(clue, cells))
            .try_collect()?;
        let col_constraints = col_clues
            .iter()
            .zip(&cols)
            .map(|(clue, cells)| Constraint::new(clue, cells))
            .try_collect()?;

        Ok(Self {
            rows,
            cols,
            row_constraints,
            col_constraints,
        })
    }

    /// Finds a full assignment consistent with every clue, or `None` if the
    /// puzzle is unsatisfiable.
    ///
    /// In the returned grid `true` means the cell is filled.
    pub fn solve(&mut self) -> Option<Vec<Vec<bool>>> {
        self.solve_observed(None)
    }

    /// Like [`Board::solve`], reporting a [`Step`] to `sink` immediately
    /// before and immediately after each tentative line commit. The sink has
    /// no effect on the search outcome.
    pub fn solve_observed(&mut self, mut sink: Option<StepSink>) -> Option<Vec<Vec<bool>>> {
        let unresolved = self.row_constraints.len() + self.col_constraints.len();
        self.search(unresolved, &mut sink).then(|| self.solution())
    }

    fn search(&mut self, unresolved: usize, sink: &mut Option<StepSink>) -> bool {
        if unresolved == 0 {
            return true;
        }

        let best_row = Self::best_candidate(&self.row_constraints);
        let best_col = Self::best_candidate(&self.col_constraints);
        // Rows win ties: most-constrained-first, deterministic.
        match (best_row, best_col) {
            (Some(row), Some(col)) => {
                if self.row_constraints[row].possibility_count()
                    <= self.col_constraints[col].possibility_count()
                {
                    self.resolve_line(Axis::Row, row, unresolved, sink)
                } else {
                    self.resolve_line(Axis::Column, col, unresolved, sink)
                }
            }
            (Some(row), None) => self.resolve_line(Axis::Row, row, unresolved, sink),
            (None, Some(col)) => self.resolve_line(Axis::Column, col, unresolved, sink),
            (None, None) => unreachable!("unresolved lines remain but none is a candidate"),
        }
    }

    /// The unresolved line with the fewest live realizations, first index on
    /// ties.
    fn best_candidate(constraints: &[Constraint]) -> Option<usize> {
        constraints
            .iter()
            .enumerate()
            .filter(|(_, constraint)| !constraint.is_resolved())
            .map(|(i, constraint)| (constraint.possibility_count(), i))
            .min()
            .map(|(_, i)| i)
    }

    /// Commits `line` to each of its live realizations in turn, recursing on
    /// the ones every perpendicular constraint survives.
    fn resolve_line(
        &mut self,
        axis: Axis,
        index: usize,
        unresolved: usize,
        sink: &mut Option<StepSink>,
    ) -> bool {
        let original = self.line(axis, index).to_vec();
        self.constraint_mut(axis, index).resolve();
        let candidates: Vec<Vec<Cell>> = self
            .constraint(axis, index)
            .possibilities()
            .into_iter()
            .map(<[Cell]>::to_vec)
            .collect();
        debug!(
            "branching on {axis:?} {index} with {} live realizations",
            candidates.len()
        );

        for candidate in candidates {
            self.emit(sink, Some(Line { axis, index }));
            let committed = self.commit(axis, index, &candidate, &original);
            self.emit(sink, None);
            if !committed {
                continue;
            }
            if self.search(unresolved - 1, sink) {
                return true;
            }
            self.undo_perpendicular(axis);
        }

        debug!("exhausted {axis:?} {index}, backtracking");
        self.restore(axis, index, &original);
        self.constraint_mut(axis, index).unresolve();
        false
    }

    /// Writes `candidate` into both views and narrows every perpendicular
    /// constraint. If one drops to zero possibilities, the constraint
    /// updates and the partial cell writes already made are undone and
    /// `false` is returned.
    fn commit(&mut self, axis: Axis, index: usize, candidate: &[Cell], original: &[Cell]) -> bool {
        match axis {
            Axis::Row => {
                self.rows[index].copy_from_slice(candidate);
                for j in 0..self.cols.len() {
                    self.cols[j][index] = candidate[j];
                    self.col_constraints[j].update(&self.cols[j]);
                    if self.col_constraints[j].possibility_count() == 0 {
                        for u in (0..=j).rev() {
                            self.col_constraints[u].undo();
                            self.cols[u][index] = original[u];
                        }
                        self.rows[index].copy_from_slice(original);
                        return false;
                    }
                }
            }
            Axis::Column => {
                self.cols[index].copy_from_slice(candidate);
                for i in 0..self.rows.len() {
                    self.rows[i][index] = candidate[i];
                    self.row_constraints[i].update(&self.rows[i]);
                    if self.row_constraints[i].possibility_count() == 0 {
                        for u in (0..=i).rev() {
                            self.row_constraints[u].undo();
                            self.rows[u][index] = original[u];
                        }
                        self.cols[index].copy_from_slice(original);
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Reverses one full round of perpendicular updates made by a successful
    /// [`Board::commit`].
    fn undo_perpendicular(&mut self, axis: Axis) {
        let perpendicular = match axis {
            Axis::Row => &mut self.col_constraints,
            Axis::Column => &mut self.row_constraints,
        };
        for constraint in perpendicular {
            constraint.undo();
            debug_assert!(constraint.possibility_count() > 0);
        }
    }

    /// Puts a line's original cells back into both views.
    fn restore(&mut self, axis: Axis, index: usize, original: &[Cell]) {
        match axis {
            Axis::Row => {
                self.rows[index].copy_from_slice(original);
                for (j, &cell) in original.iter().enumerate() {
                    self.cols[j][index] = cell;
                }
            }
            Axis::Column => {
                self.cols[index].copy_from_slice(original);
                for (i, &cell) in original.iter().enumerate() {
                    self.rows[i][index] = cell;
                }
            }
        }
    }

    fn line(&self, axis: Axis, index: usize) -> &[Cell] {
        match axis {
            Axis::Row => &self.rows[index],
            Axis::Column => &self.cols[index],
        }
    }

    fn constraint(&self, axis: Axis, index: usize) -> &Constraint {
        match axis {
            Axis::Row => &self.row_constraints[index],
            Axis::Column => &self.col_constraints[index],
        }
    }

    fn constraint_mut(&mut self, axis: Axis, index: usize) -> &mut Constraint {
        match axis {
            Axis::Row => &mut self.row_constraints[index],
            Axis::Column => &mut self.col_constraints[index],
        }
    }

    fn emit(&self, sink: &mut Option<StepSink>, line: Option<Line>) {
        if let Some(sink) = sink.as_mut() {
            sink(Step {
                grid: self.rows.clone(),
                line,
            });
        }
    }

    /// Translates the fully determined grid to booleans, `true` for filled.
    fn solution(&self) -> Vec<Vec<bool>> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&cell| {
                        debug_assert_ne!(cell, Cell::Unknown, "solved board left a cell undetermined");
                        cell == Cell::Filled
                    })
                    .collect()
            })
            .collect()
    }
}
