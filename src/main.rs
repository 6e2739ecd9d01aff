// symalu: extremal model numbers for ALU programs

use std::fs;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tracing::Level;

use symalu::interpreter::constants::INPUT_DIGITS;
use symalu::parser::ast::Register;
use symalu::{solve_source, SolverConfig};

#[derive(Parser, Debug)]
#[command(name = "symalu", version, about)]
struct Cli {
    /// ALU program, one instruction per line.
    file: PathBuf,

    /// Register that must end at zero.
    #[arg(long, default_value = "z", value_parser = parse_register)]
    target: Register,

    /// Split the digit search across worker threads.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_register(name: &str) -> Result<Register, String> {
    Register::from_name(name).ok_or_else(|| format!("unknown register '{name}', expected w, x, y or z"))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let source = fs::read_to_string(&cli.file)
        .with_context(|| format!("failed to read '{}'", cli.file.display()))?;

    let config = SolverConfig {
        target: cli.target,
        parallel: cli.parallel,
        threads: cli.threads,
    };
    let solution = solve_source(&source, &config)
        .with_context(|| format!("failed to solve '{}'", cli.file.display()))?;

    tracing::debug!(stats = ?solution.stats, width = solution.width, "solved");
    if solution.width != INPUT_DIGITS {
        tracing::warn!(
            width = solution.width,
            "program reads {} digits instead of {}",
            solution.width,
            INPUT_DIGITS
        );
    }

    match solution.extremes {
        Some(extremes) => {
            println!("largest: {}", extremes.max);
            println!("smallest: {}", extremes.min);
        }
        None => println!("no solution"),
    }
    Ok(())
}
