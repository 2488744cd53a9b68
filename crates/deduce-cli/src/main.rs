//! Command-line surface: solve, rate, and generate boards.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use deduce_core::{
    Board, DeduceOptions, Deducer, Difficulty, Generator, ParseError, Position, Solver,
};

#[derive(Parser)]
#[command(
    name = "deduce",
    about = "Solve, grade, and generate Sudoku puzzles by layered logical deduction"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve one or more boards, guessing only when deduction stalls
    Solve {
        /// 81-character board string; '1'..'9' are givens, anything else
        /// is an unfilled cell
        board: Option<String>,
        /// File of boards: 81-character lines and/or blocks of nine
        /// comma-separated rows
        #[arg(short, long, conflicts_with = "board")]
        file: Option<PathBuf>,
        /// Narrate every deduction step
        #[arg(short, long)]
        explain: bool,
        /// Also search for a second solution
        #[arg(short, long)]
        multiple: bool,
        /// Longest strong-weak chain to search
        #[arg(long, default_value_t = 5)]
        max_chain_length: usize,
        /// Deepest two-way fork derivation
        #[arg(long, default_value_t = 2)]
        max_derivation_depth: usize,
        /// Emit the structured steps as JSON instead of prose
        #[arg(long, requires = "explain")]
        json: bool,
    },
    /// Grade a board's difficulty on the 1..=5 scale
    Rate {
        /// 81-character board string
        board: String,
    },
    /// Generate a puzzle at the requested difficulty levels
    Generate {
        /// Target levels, e.g. `3` or `4,5`; default is any
        #[arg(short, long, value_delimiter = ',')]
        difficulty: Vec<u8>,
        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Solve {
            board,
            file,
            explain,
            multiple,
            max_chain_length,
            max_derivation_depth,
            json,
        } => {
            let boards = match (board, file) {
                (Some(s), None) => vec![parse_board(&s)?],
                (None, Some(path)) => boards_from_file(&path)?,
                _ => return Err("pass a board string or --file".into()),
            };
            let options = DeduceOptions {
                max_chain_length,
                max_derivation_depth,
                explain,
                ..DeduceOptions::default()
            };
            let many = boards.len() > 1;
            for (i, board) in boards.into_iter().enumerate() {
                if many {
                    println!("=== board {} ===", i + 1);
                }
                solve_one(&board, &options, multiple, json)?;
            }
            Ok(())
        }
        Command::Rate { board } => {
            let board = parse_board(&board)?;
            let level = Deducer::new().evaluate(&board);
            let label = Difficulty::from_level(level).label();
            if label.is_empty() {
                println!("{level}");
            } else {
                println!("{level} ({label})");
            }
            Ok(())
        }
        Command::Generate { difficulty, seed } => {
            let mut generator = match seed {
                Some(seed) => Generator::with_seed(difficulty, seed),
                None => Generator::new(difficulty),
            };
            let (puzzle, solution, level) = generator.generate();
            println!("puzzle:");
            print_grid(&puzzle);
            println!("string: {puzzle}");
            println!(
                "difficulty: {} ({})",
                level,
                Difficulty::from_level(level).label()
            );
            println!("solution:");
            print_grid(&solution);
            Ok(())
        }
    }
}

fn solve_one(
    board: &Board,
    options: &DeduceOptions,
    multiple: bool,
    json: bool,
) -> Result<(), String> {
    print_grid(board);

    if options.explain {
        let deducer = Deducer::with_options(options.clone());
        let mut narrated = board.clone();
        let outcome = deducer.deduce(&mut narrated);
        if json {
            let rendered = serde_json::to_string_pretty(&outcome.steps)
                .map_err(|e| format!("serializing steps: {e}"))?;
            println!("{rendered}");
        } else {
            for line in outcome.narrative() {
                println!("{line}");
            }
        }
    }

    let solver = Solver::with_options(DeduceOptions {
        explain: false,
        ..options.clone()
    })
    .check_multiple(multiple);
    let outcome = solver.solve(board);

    if outcome.solved {
        println!("solved (guesses: {}):", outcome.guesses);
        print_grid(&outcome.board);
        match outcome.alternate {
            Some(second) => {
                println!("the solution is not unique; another one:");
                print_grid(&second);
            }
            None => {
                let level = Deducer::new().evaluate(board);
                let label = Difficulty::from_level(level).label();
                if !label.is_empty() {
                    println!("difficulty: {level} ({label})");
                }
            }
        }
    } else {
        println!("no solution; final state:");
        print_grid(&outcome.board);
    }
    Ok(())
}

fn parse_board(s: &str) -> Result<Board, String> {
    Board::from_string(s.trim()).map_err(|e: ParseError| e.to_string())
}

/// Boards from a file: an 81-character line stands alone, nine successive
/// comma-separated rows form one board.
fn boards_from_file(path: &PathBuf) -> Result<Vec<Board>, String> {
    let text =
        fs::read_to_string(path).map_err(|e| format!("reading {}: {e}", path.display()))?;
    let mut boards = Vec::new();
    let mut matrix: Vec<Vec<u8>> = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.split(',').collect();
        if cells.len() == 1 {
            boards.push(parse_board(cells[0])?);
        } else if cells.len() == 9 {
            matrix.push(
                cells
                    .iter()
                    .map(|c| c.trim().parse::<u8>().unwrap_or(0))
                    .collect(),
            );
            if matrix.len() == 9 {
                boards.push(Board::from_matrix(&matrix).map_err(|e| e.to_string())?);
                matrix.clear();
            }
        } else {
            return Err(format!("unrecognized line in {}: {line}", path.display()));
        }
    }
    if boards.is_empty() {
        return Err(format!("no boards found in {}", path.display()));
    }
    Ok(boards)
}

fn print_grid(board: &Board) {
    for row in 0..9 {
        if row == 3 || row == 6 {
            println!("------+-------+------");
        }
        let mut line = String::new();
        for col in 0..9 {
            if col == 3 || col == 6 {
                line.push_str("| ");
            }
            match board.value(Position::new(row, col)) {
                Some(d) => line.push(char::from(b'0' + d)),
                None => line.push('.'),
            }
            line.push(' ');
        }
        println!("{}", line.trim_end());
    }
}
