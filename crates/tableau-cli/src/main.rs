mod report;
mod session;

use clap::Parser;
use tableau_solver::Solver;
use tracing_subscriber::{fmt, EnvFilter};

use crate::session::{OutputFormat, Session, SessionConfig};

#[derive(Parser)]
#[command(name = "simplex")]
#[command(about = "Interactive tableau simplex solver for <= constrained linear programs", long_about = None)]
struct Cli {
    /// Maximum pivots per problem before giving up
    #[arg(long, default_value_t = 10000)]
    max_iterations: usize,
    /// Tolerance for floating point comparisons
    #[arg(long, default_value_t = 1e-9)]
    tolerance: f64,
    /// Only print the final result, not every tableau
    #[arg(long)]
    no_iterations: bool,
    /// Do not clear the terminal between problems
    #[arg(long)]
    no_clear: bool,
    /// Output format for results
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,
    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    if !(cli.tolerance.is_finite() && cli.tolerance > 0.0) {
        eprintln!("Error: tolerance must be a positive number, got {}", cli.tolerance);
        std::process::exit(1);
    }

    let solver = Solver::new()
        .with_max_iterations(cli.max_iterations)
        .with_tolerance(cli.tolerance);
    let config = SessionConfig {
        show_iterations: !cli.no_iterations,
        clear_screen: !cli.no_clear,
        format: cli.format,
    };

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut session = Session::new(stdin.lock(), stdout.lock(), solver, config);

    if let Err(e) = session.run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
