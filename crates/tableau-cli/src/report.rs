use std::io::{self, Write};

use tableau_solver::{Iteration, SolveOutcome, SolveReport, Tableau};

use crate::session::{OutputFormat, SessionConfig};

/// Values this close to zero print as zero instead of `-0.0000`
const DISPLAY_EPSILON: f64 = 1e-9;

pub fn render(out: &mut impl Write, report: &SolveReport, config: &SessionConfig) -> io::Result<()> {
    match config.format {
        OutputFormat::Json => {
            let json = if config.show_iterations {
                serde_json::to_string_pretty(report)
            } else {
                serde_json::to_string_pretty(&report.outcome)
            };
            writeln!(out, "{}", json.map_err(io::Error::other)?)
        }
        OutputFormat::Pretty => {
            if config.show_iterations {
                for iteration in &report.iterations {
                    write_iteration(out, iteration)?;
                }
            }
            write_outcome(out, &report.outcome)
        }
    }
}

fn write_iteration(out: &mut impl Write, iteration: &Iteration) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{} Iteration {} {}", "-".repeat(30), iteration.number, "-".repeat(30))?;
    write_tableau(out, &iteration.tableau)?;

    if let Some(pivot) = iteration.pivot {
        writeln!(out, "Entering: {}, leaving: {}", pivot.entering, pivot.leaving)?;
    }
    Ok(())
}

fn write_tableau(out: &mut impl Write, tableau: &Tableau) -> io::Result<()> {
    write!(out, "{:>6}", "Basis")?;
    for label in tableau.column_labels() {
        write!(out, " {:>8}", label.to_string())?;
    }
    writeln!(out, " {:>8}", "RHS")?;

    for i in 0..tableau.rows() {
        let label = match tableau.basis().get(i) {
            Some(variable) => variable.to_string(),
            None => "Z".to_string(),
        };
        write!(out, "{:>6}", label)?;
        for &val in tableau.row(i).unwrap_or_default() {
            write!(out, " {:>8.2}", clean(val))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_outcome(out: &mut impl Write, outcome: &SolveOutcome) -> io::Result<()> {
    writeln!(out)?;
    match outcome {
        SolveOutcome::Optimal(solution) => {
            writeln!(out, "OPTIMAL SOLUTION")?;
            writeln!(out)?;
            for (j, &value) in solution.values.iter().enumerate() {
                writeln!(out, "x{} = {:.4}", j + 1, clean(value))?;
            }
            writeln!(out)?;
            writeln!(out, "OPTIMAL VALUE OF Z = {:.4}", clean(solution.objective_value))
        }
        SolveOutcome::Unbounded { entering } => {
            writeln!(out, "UNBOUNDED")?;
            writeln!(
                out,
                "{} can increase without limit; the objective has no finite optimum.",
                entering
            )
        }
        SolveOutcome::IterationLimitExceeded { iterations } => {
            writeln!(out, "ITERATION LIMIT EXCEEDED")?;
            writeln!(
                out,
                "Stopped after {} pivots without reaching an optimum (the problem may be cycling).",
                iterations
            )
        }
    }
}

fn clean(value: f64) -> f64 {
    if value.abs() < DISPLAY_EPSILON { 0.0 } else { value }
}
