//! CLI entry point for the die maze solver.
//!
//! Usage:
//!   die-maze-solver solve <FILE>... [options]
//!
//! Options:
//!   --heuristic <name>        zero, manhattan or orientation (repeatable; default: all)
//!   --tree-search             Search without duplicate detection
//!   --no-reachability-check   Skip the orientation-free pre-check
//!   --no-verify               Skip replaying found paths
//!   --format <text|json>      Output format (default: text)
//!   --log-level <filter>      Tracing filter (default: warn, RUST_LOG wins)

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

use die_maze_solver::{solve, Board, Heuristic, SearchMode, SolverConfig, SolverResult};

#[derive(Parser)]
#[command(name = "die-maze-solver")]
#[command(about = "Optimal A* solver for rolling-die maze puzzles")]
#[command(version)]
struct Cli {
    /// Tracing filter directive, e.g. "debug" or "die_maze_solver=trace"
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve one or more board files
    Solve {
        /// Board files, one puzzle per file
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Heuristic to run; may be given more than once
        #[arg(long = "heuristic", value_enum)]
        heuristics: Vec<Heuristic>,

        /// Use tree search instead of graph search
        #[arg(long)]
        tree_search: bool,

        /// Skip the orientation-free reachability pre-check
        #[arg(long)]
        no_reachability_check: bool,

        /// Do not replay found paths
        #[arg(long)]
        no_verify: bool,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// JSON output for one input file
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileOutput {
    file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<SolverResult>,
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Solve {
            files,
            heuristics,
            tree_search,
            no_reachability_check,
            no_verify,
            format,
        } => {
            let config = SolverConfig {
                heuristics: if heuristics.is_empty() {
                    Heuristic::ALL.to_vec()
                } else {
                    heuristics
                },
                mode: if tree_search {
                    SearchMode::Tree
                } else {
                    SearchMode::Graph
                },
                check_reachability: !no_reachability_check,
                verify: !no_verify,
            };

            let mut failures = 0;
            let mut outputs = Vec::with_capacity(files.len());

            for file in files {
                // A bad file is reported and skipped; the batch carries on
                let board = match Board::from_file(&file) {
                    Ok(board) => board,
                    Err(e) => {
                        error!(file = %file.display(), "{}", e);
                        failures += 1;
                        if format == OutputFormat::Text {
                            eprintln!("Error: {}", e);
                        }
                        outputs.push(FileOutput {
                            file,
                            error: Some(e.to_string()),
                            result: None,
                        });
                        continue;
                    }
                };

                let result = solve(&board, &config);
                if format == OutputFormat::Text {
                    print_text(&file, &board, &result);
                }
                outputs.push(FileOutput {
                    file,
                    error: None,
                    result: Some(result),
                });
            }

            if format == OutputFormat::Json {
                match serde_json::to_string_pretty(&outputs) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error serializing output: {}", e);
                        return ExitCode::FAILURE;
                    }
                }
            }

            if failures > 0 {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
    }
}

fn print_text(file: &Path, board: &Board, result: &SolverResult) {
    println!("== {}", file.display());
    print!("{}", board);
    if result.reachable == Some(false) {
        println!("Goal is unreachable from the start");
    }

    for run in &result.runs {
        println!();
        println!("Heuristic: {}", run.heuristic);
        match &run.path {
            Some(path) => {
                for direction in path {
                    println!("{}", direction);
                }
                println!("Length: {}", path.len());
            }
            None => println!("No solution"),
        }
        println!(
            "Nodes closed: {}, expanded: {} ({} ms)",
            run.stats.closed, run.stats.expanded, run.time_elapsed_ms
        );
        if run.verified == Some(false) {
            println!("WARNING: path failed replay");
        }
    }
    println!();
}
