use itertools::Itertools;
use std::error::Error;
use std::fmt;

/// A clue that can never be satisfied by its line: it contains a
/// non-positive run length, or its minimum span exceeds the line length.
///
/// Raised at construction time only; the search itself never fails this way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidConstraint {
    clue: Vec<i32>,
    length: usize,
}

impl InvalidConstraint {
    pub(crate) fn new(clue: &[i32], length: usize) -> Self {
        Self {
            clue: clue.to_vec(),
            length,
        }
    }

    /// The offending clue.
    #[must_use]
    pub fn clue(&self) -> &[i32] {
        &self.clue
    }

    /// The length of the line the clue was bound to.
    #[must_use]
    pub const fn length(&self) -> usize {
        self.length
    }
}

impl fmt::Display for InvalidConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "clue [{}] cannot be satisfied in a line of length {}",
            self.clue.iter().join(", "),
            self.length
        )
    }
}

impl Error for InvalidConstraint {}
