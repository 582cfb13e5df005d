//! Command-line surface: clap argument definitions and the interactive
//! prompt loop of the original terminal front end.

use clap::{Args, Parser, Subcommand};
use nonogram_solver::solver::board::Board;
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Defines the command-line interface for the nonogram solver application.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(
    name = "nonogram-solver",
    version,
    about = "A constraint-propagation nonogram solver"
)]
pub(crate) struct Cli {
    /// An optional global path argument. If provided without a subcommand,
    /// it's treated as the path to a puzzle JSON file to solve.
    #[arg(global = true)]
    pub path: Option<PathBuf>,

    /// Specifies the subcommand to execute (e.g. `interactive`, `file`, `json`).
    #[clap(subcommand)]
    pub command: Option<Commands>,

    /// Common options applicable to all commands.
    #[command(flatten)]
    pub common: CommonOptions,
}

/// Enumerates the available subcommands for the nonogram solver.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Read a puzzle from the terminal, prompting line by line.
    Interactive,

    /// Solve a puzzle JSON file.
    File {
        /// Path to the puzzle JSON file (`board`, `rowConstraints`,
        /// `colConstraints`).
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve a puzzle provided as an inline JSON string.
    Json {
        /// The puzzle JSON (e.g. `{"board": [[false]], "rowConstraints":
        /// [[1]], "colConstraints": [[1]]}`).
        #[arg(short, long)]
        input: String,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Defines common command-line options shared across different subcommands.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct CommonOptions {
    /// Enable printing of timing and memory statistics after solving.
    #[arg(short, long, default_value_t = true)]
    pub(crate) stats: bool,

    /// Record the search trace and include it in the JSON output.
    #[arg(short, long, default_value_t = false)]
    pub(crate) trace: bool,

    /// Render the solution grid as `X`/`.` text in addition to the JSON
    /// output.
    #[arg(short, long, default_value_t = false)]
    pub(crate) print_solution: bool,
}

/// Runs the interactive front end: prompts for the grid dimensions, the
/// crosses of each row as a binary string, and the clue of every line, then
/// prints the solution grid or "No solution". Malformed input reprompts.
///
/// Reads from `input` and writes to `out` so tests can drive it with
/// in-memory buffers.
///
/// # Panics
///
/// Panics if reading or writing fails; the terminal going away is not
/// recoverable here.
pub(crate) fn run_interactive<R: BufRead, W: Write>(mut input: R, mut out: W) {
    let row_count = read_number(&mut input, &mut out, "Number of rows: ");
    let col_count = read_number(&mut input, &mut out, "Number of columns: ");

    let crosses: Vec<Vec<bool>> = (0..row_count)
        .map(|i| read_row(&mut input, &mut out, i, col_count))
        .collect();
    let row_clues: Vec<Vec<i32>> = (0..row_count)
        .map(|i| {
            write!(out, "Constraint on row {}: ", i + 1).expect("write failed");
            read_clue(&mut input, &mut out)
        })
        .collect();
    let col_clues: Vec<Vec<i32>> = (0..col_count)
        .map(|i| {
            write!(out, "Constraint on column {}: ", i + 1).expect("write failed");
            read_clue(&mut input, &mut out)
        })
        .collect();

    let solution = match Board::new(&crosses, &row_clues, &col_clues) {
        Ok(mut board) => board.solve(),
        Err(_) => None,
    };
    print_solution(&mut out, solution.as_deref());
}

fn read_line<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> String {
    out.flush().expect("flush failed");
    let mut line = String::new();
    input.read_line(&mut line).expect("read failed");
    line.trim_end_matches(['\r', '\n']).to_string()
}

fn read_number<R: BufRead, W: Write>(input: &mut R, out: &mut W, prompt: &str) -> usize {
    write!(out, "{prompt}").expect("write failed");
    loop {
        if let Ok(number) = read_line(input, out).parse() {
            return number;
        }
        writeln!(out, "Not a number!").expect("write failed");
        write!(out, "{prompt}").expect("write failed");
    }
}

fn read_row<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    index: usize,
    col_count: usize,
) -> Vec<bool> {
    write!(out, "Crosses on line {}, in binary format: ", index + 1).expect("write failed");
    loop {
        if let Some(row) = parse_row(&read_line(input, out), col_count) {
            return row;
        }
        write!(out, "Invalid! Try again: ").expect("write failed");
    }
}

fn parse_row(response: &str, col_count: usize) -> Option<Vec<bool>> {
    if response.len() != col_count {
        return None;
    }
    response
        .chars()
        .map(|c| match c {
            '0' => Some(false),
            '1' => Some(true),
            _ => None,
        })
        .collect()
}

fn read_clue<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Vec<i32> {
    loop {
        if let Some(clue) = parse_clue(&read_line(input, out)) {
            return clue;
        }
        write!(out, "Invalid, please try again: ").expect("write failed");
    }
}

fn parse_clue(response: &str) -> Option<Vec<i32>> {
    if response.is_empty() {
        return None;
    }
    response
        .split(' ')
        .map(|part| part.parse().ok())
        .collect()
}

fn print_solution<W: Write>(out: &mut W, solution: Option<&[Vec<bool>]>) {
    match solution {
        None => writeln!(out, "No solution").expect("write failed"),
        Some(grid) => {
            for row in grid {
                for &filled in row {
                    write!(out, "{} ", if filled { 'X' } else { '.' }).expect("write failed");
                }
                writeln!(out).expect("write failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(script: &str) -> String {
        let mut out = Vec::new();
        run_interactive(Cursor::new(script), &mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn solves_a_prompted_puzzle() {
        // 2x2, no crosses, rows XX / X. pinned by the column clues.
        let out = run("2\n2\n00\n00\n2\n1\n2\n1\n");
        assert!(out.contains("Constraint on row 1: "));
        assert!(out.contains("Constraint on column 2: "));
        assert!(out.ends_with("X X \nX . \n"), "{out}");
    }

    #[test]
    fn reprompts_on_malformed_input() {
        let out = run("two\n1\n1\n12\n0\n1\n1\n");
        assert!(out.contains("Not a number!"));
        assert!(out.contains("Invalid! Try again: "));
        assert!(out.ends_with("X \n"), "{out}");
    }

    #[test]
    fn invalid_constraints_print_no_solution() {
        let out = run("1\n1\n0\n2\n1\n");
        assert!(out.ends_with("No solution\n"), "{out}");
    }

    #[test]
    fn crosses_rule_out_the_puzzle() {
        // Both cells crossed but every clue demands a filled cell.
        let out = run("1\n2\n11\n1\n1\n1\n");
        assert!(out.ends_with("No solution\n"), "{out}");
    }
}
