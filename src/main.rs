//! # nonogram-solver
//!
//! A configurable command-line nonogram (picross) solver. It reads puzzles
//! interactively from the terminal or as JSON (a `board` of crosses plus
//! `rowConstraints`/`colConstraints`), solves them with a
//! constraint-propagation backtracking engine, and prints the solution as
//! JSON and/or as an `X`/`.` grid, with optional search tracing and
//! timing/memory statistics.
//!
//! ```sh
//! nonogram-solver interactive
//! nonogram-solver file --path puzzle.json --trace
//! nonogram-solver json --input '{"board": [[false]], "rowConstraints": [[1]], "colConstraints": [[1]]}'
//! nonogram-solver puzzle.json
//! ```

use crate::command_line::cli::{Cli, Commands, CommonOptions};
use clap::{CommandFactory, Parser};
use nonogram_solver::puzzle::{solve_request, PuzzleInput, PuzzleOutput};
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};
use tikv_jemalloc_ctl::{epoch, stats};

mod command_line;

/// Global allocator using `tikv-jemallocator`, which also backs the memory
/// figures in the stats block.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    // A bare path argument without a subcommand is treated as a puzzle file.
    if let Some(path) = cli.path.clone() {
        if cli.command.is_none() {
            solve_file(&path, &cli.common);
            return;
        }
    }

    match cli.command {
        Some(Commands::Interactive) => {
            command_line::cli::run_interactive(io::stdin().lock(), io::stdout());
        }
        Some(Commands::File { path, common }) => solve_file(&path, &common),
        Some(Commands::Json { input, common }) => solve_json(&input, &common),
        Some(Commands::Completions { shell }) => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "nonogram-solver", &mut io::stdout());
        }
        None => {
            eprintln!("No command provided. Use --help for more information.");
            std::process::exit(1);
        }
    }
}

/// Reads and solves a puzzle JSON file.
fn solve_file(path: &Path, common: &CommonOptions) {
    let text = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read file {}: {e}", path.display()));
    solve_json(&text, common);
}

/// Parses and solves a puzzle JSON string, reporting per the common options.
fn solve_json(text: &str, common: &CommonOptions) {
    let time = Instant::now();
    let input: PuzzleInput =
        serde_json::from_str(text).unwrap_or_else(|e| panic!("Failed to parse puzzle JSON: {e}"));
    let parse_time = time.elapsed();

    let time = Instant::now();
    let output = solve_request(&input, common.trace);
    let solve_time = time.elapsed();

    println!(
        "{}",
        serde_json::to_string_pretty(&output).expect("puzzle output is always serializable")
    );

    if common.print_solution {
        print_grid(output.solution.as_deref());
    }

    if common.stats {
        print_stats(&input, &output, parse_time, solve_time);
    }
}

/// Renders the solution as the interactive front end does.
fn print_grid(solution: Option<&[Vec<bool>]>) {
    match solution {
        None => println!("No solution"),
        Some(grid) => {
            for row in grid {
                let line: String = row.iter().map(|&f| if f { "X " } else { ". " }).collect();
                println!("{line}");
            }
        }
    }
}

/// Prints timing, search and memory statistics for one solve.
fn print_stats(
    input: &PuzzleInput,
    output: &PuzzleOutput,
    parse_time: Duration,
    solve_time: Duration,
) {
    // Advance the jemalloc epoch so the figures reflect the solving phase.
    epoch::advance().expect("jemalloc epoch");
    let allocated_bytes = stats::allocated::mib()
        .and_then(|mib| mib.read())
        .expect("jemalloc stats");
    let resident_bytes = stats::resident::mib()
        .and_then(|mib| mib.read())
        .expect("jemalloc stats");
    #[allow(clippy::cast_precision_loss)]
    let allocated_mib = allocated_bytes as f64 / (1024.0 * 1024.0);
    #[allow(clippy::cast_precision_loss)]
    let resident_mib = resident_bytes as f64 / (1024.0 * 1024.0);

    let rows = input.board.len();
    let cols = input.board.first().map_or(0, Vec::len);
    println!("Grid: {rows} x {cols}");
    println!("Parse time: {parse_time:?}");
    println!("Solve time: {solve_time:?}");
    println!("Solved: {}", output.success);
    if let Some(steps) = &output.steps {
        println!("Search steps: {}", steps.len());
    }
    println!("Memory allocated: {allocated_mib:.2} MiB");
    println!("Memory resident: {resident_mib:.2} MiB");
}
