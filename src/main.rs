use anyhow::Context;
use clap::Parser;
use crossterm::style::Stylize;
use rand::{rngs::StdRng, SeedableRng};
use std::path::PathBuf;

use slider_solver::{input, PuzzleState, Solver};

#[derive(Debug, Parser)]
#[command(name = "slider-solver", about = "Find the shortest solution to a sliding tile puzzle")]
struct Args {
    /// Puzzle file: the dimension n followed by n*n tiles, 0 for the blank
    input: Option<PathBuf>,

    /// Instead of reading a file, scramble the goal board with this many random moves
    #[arg(long, conflicts_with = "input")]
    scramble: Option<usize>,

    /// Board dimension used with --scramble
    #[arg(long, default_value_t = 3, requires = "scramble")]
    size: usize,

    /// RNG seed for scrambling and twin selection
    #[arg(long)]
    seed: Option<u64>,

    /// Print the blank's moves instead of every board on the path
    #[arg(long)]
    moves_only: bool,

    /// Only print the number of moves
    #[arg(short, long)]
    quiet: bool,

    /// Print search statistics to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let initial = load_board(&args, &mut rng)?;
    if args.verbose {
        eprintln!("Initial board:\n{}", initial);
    }

    let solver = Solver::with_rng(&initial, &mut rng);

    if args.verbose {
        let stats = solver.stats();
        eprintln!(
            "main frontier: {} expanded, {} enqueued",
            stats.main_expanded, stats.main_enqueued
        );
        eprintln!(
            "twin frontier: {} expanded, {} enqueued",
            stats.twin_expanded, stats.twin_enqueued
        );
        eprintln!("parity check agrees: {}", initial.has_solvable_parity() == solver.is_solvable());
    }

    let (Some(moves), Some(path)) = (solver.moves(), solver.solution()) else {
        println!("{}", "No solution possible".red());
        return Ok(());
    };

    println!("{}", format!("Minimum number of moves = {}", moves).green());
    if args.quiet {
        return Ok(());
    }

    if args.moves_only {
        for dir in solver.solution_moves().unwrap_or_default() {
            println!("{}", dir);
        }
    } else {
        for board in path {
            println!("{}", board);
        }
    }

    Ok(())
}

fn load_board(args: &Args, rng: &mut StdRng) -> anyhow::Result<PuzzleState> {
    if let Some(steps) = args.scramble {
        return PuzzleState::scrambled(args.size, steps, rng)
            .with_context(|| format!("cannot scramble a {}x{} board", args.size, args.size));
    }

    let Some(path) = &args.input else {
        anyhow::bail!("either a puzzle file or --scramble is required");
    };

    let grid = input::read_grid(path)
        .with_context(|| format!("failed to read puzzle from '{}'", path.display()))?;
    PuzzleState::new(&grid).with_context(|| format!("invalid puzzle in '{}'", path.display()))
}
