use std::io::{self, BufRead, Write};

use tableau_solver::{Direction, Problem, Solver};
use tracing::{debug, info};

use crate::report;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Print every intermediate tableau
    pub show_iterations: bool,
    /// Clear the terminal before each problem
    pub clear_screen: bool,
    pub format: OutputFormat,
}

/// Result of collecting one problem from the operator
enum Collected {
    Problem(Problem),
    /// Input was unusable; the message explains why
    Rejected(String),
}

/// Interactive loop: collect a problem, solve it, report, repeat.
///
/// Nothing but configuration outlives a single problem.
pub struct Session<R, W> {
    input: R,
    output: W,
    solver: Solver,
    config: SessionConfig,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W, solver: Solver, config: SessionConfig) -> Self {
        Self {
            input,
            output,
            solver,
            config,
        }
    }

    /// Runs until the operator declines another problem or input ends
    pub fn run(&mut self) -> io::Result<()> {
        let mut solved = 0;
        loop {
            if self.config.clear_screen {
                write!(self.output, "\x1B[2J\x1B[H")?;
            }
            writeln!(self.output, "=== INTERACTIVE SIMPLEX METHOD ===")?;

            match self.collect()? {
                None => break,
                Some(Collected::Rejected(message)) => {
                    writeln!(self.output, "{}", message)?;
                }
                Some(Collected::Problem(problem)) => {
                    writeln!(self.output)?;
                    writeln!(self.output, "Solving the problem...")?;
                    debug!(
                        variables = problem.num_variables(),
                        constraints = problem.num_constraints(),
                        direction = ?problem.direction(),
                        "solving"
                    );
                    let result = self.solver.solve_traced(&problem);
                    report::render(&mut self.output, &result, &self.config)?;
                    solved += 1;
                }
            }

            writeln!(self.output)?;
            match self.prompt("Solve another problem? (y/n): ")? {
                Some(answer) if is_yes(&answer) => continue,
                _ => break,
            }
        }

        info!(solved, "session finished");
        Ok(())
    }

    /// Writes `text` and reads one line; `None` once input is exhausted
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn read_number(&mut self, text: &str) -> io::Result<Option<f64>> {
        loop {
            let Some(line) = self.prompt(text)? else {
                return Ok(None);
            };
            match line.parse::<f64>() {
                Ok(value) if value.is_finite() => return Ok(Some(value)),
                _ => writeln!(self.output, "Invalid value. Enter a number.")?,
            }
        }
    }

    fn read_coefficients(&mut self, n: usize) -> io::Result<Option<Vec<f64>>> {
        let mut coefficients = Vec::with_capacity(n);
        for j in 1..=n {
            let Some(value) = self.read_number(&format!("Coefficient of x{}: ", j))? else {
                return Ok(None);
            };
            coefficients.push(value);
        }
        Ok(Some(coefficients))
    }

    fn read_rhs(&mut self) -> io::Result<Option<f64>> {
        loop {
            let Some(value) = self.read_number("Right-hand side (RHS): ")? else {
                return Ok(None);
            };
            if value >= 0.0 {
                return Ok(Some(value));
            }
            writeln!(self.output, "The right-hand side must be nonnegative.")?;
        }
    }

    fn read_direction(&mut self) -> io::Result<Option<Direction>> {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "Maximize or minimize the objective function?")?;
            writeln!(self.output, "1. Maximize")?;
            writeln!(self.output, "2. Minimize")?;
            let Some(choice) = self.prompt("Select an option (1/2): ")? else {
                return Ok(None);
            };
            match choice.as_str() {
                "1" => return Ok(Some(Direction::Maximize)),
                "2" => return Ok(Some(Direction::Minimize)),
                _ => writeln!(self.output, "Invalid option.")?,
            }
        }
    }

    fn collect(&mut self) -> io::Result<Option<Collected>> {
        let Some(line) = self.prompt("How many variables does the objective function have? ")? else {
            return Ok(None);
        };
        let n = match line.parse::<i64>() {
            Ok(n) if n <= 0 => {
                return Ok(Some(Collected::Rejected(
                    "The number of variables must be positive.".to_string(),
                )));
            }
            Ok(n) => match usize::try_from(n) {
                Ok(n) => n,
                Err(_) => return Ok(Some(Collected::Rejected("Enter a valid number.".to_string()))),
            },
            Err(_) => return Ok(Some(Collected::Rejected("Enter a valid number.".to_string()))),
        };

        writeln!(self.output)?;
        writeln!(self.output, "Enter the objective function coefficients ({} variables):", n)?;
        let Some(objective) = self.read_coefficients(n)? else {
            return Ok(None);
        };

        let mut constraints = Vec::new();
        let mut rhs = Vec::new();
        loop {
            writeln!(self.output)?;
            let Some(answer) = self.prompt("Add a new constraint? (y/n): ")? else {
                return Ok(None);
            };
            if !is_yes(&answer) {
                break;
            }

            writeln!(self.output, "Enter the constraint coefficients:")?;
            let Some(row) = self.read_coefficients(n)? else {
                return Ok(None);
            };
            let Some(b) = self.read_rhs()? else {
                return Ok(None);
            };
            constraints.push(row);
            rhs.push(b);
        }

        if constraints.is_empty() {
            return Ok(Some(Collected::Rejected(
                "At least one constraint is required.".to_string(),
            )));
        }

        let Some(direction) = self.read_direction()? else {
            return Ok(None);
        };

        Ok(Some(match Problem::new(objective, constraints, rhs, direction) {
            Ok(problem) => Collected::Problem(problem),
            Err(e) => Collected::Rejected(e.to_string()),
        }))
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_session(script: &str) -> String {
        let config = SessionConfig {
            show_iterations: false,
            clear_screen: false,
            format: OutputFormat::Pretty,
        };
        let mut output = Vec::new();
        Session::new(Cursor::new(script), &mut output, Solver::new(), config)
            .run()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_textbook_session() {
        // 2 variables, maximize 3x1 + 5x2 under three constraints
        let script = "2\n3\n5\ny\n1\n0\n4\ny\n0\n2\n12\ny\n3\n2\n18\nn\n1\nn\n";

        let text = run_session(script);

        assert!(text.contains("x1 = 2.0000"), "{}", text);
        assert!(text.contains("x2 = 6.0000"));
        assert!(text.contains("OPTIMAL VALUE OF Z = 36.0000"));
    }

    #[test]
    fn test_invalid_values_are_reprompted() {
        let script = "1\nabc\n1\ny\n1\n-10\nten\n10\nn\n3\n1\nn\n";

        let text = run_session(script);

        assert_eq!(text.matches("Invalid value. Enter a number.").count(), 2);
        assert!(text.contains("The right-hand side must be nonnegative."));
        assert!(text.contains("Invalid option."));
        assert!(text.contains("x1 = 10.0000"));
    }

    #[test]
    fn test_missing_constraints_restart() {
        let script = "1\n1\nn\ny\n2\n2\n3\ny\n1\n1\n4\nn\n2\nn\n";

        let text = run_session(script);

        assert!(text.contains("At least one constraint is required."));
        assert_eq!(text.matches("=== INTERACTIVE SIMPLEX METHOD ===").count(), 2);
        assert!(text.contains("x1 = 0.0000"));
        assert!(text.contains("x2 = 0.0000"));
        assert!(text.contains("OPTIMAL VALUE OF Z = 0.0000"));
    }

    #[test]
    fn test_nonpositive_variable_count() {
        let text = run_session("0\nn\n");

        assert!(text.contains("The number of variables must be positive."));
        assert!(!text.contains("Solving"));
    }

    #[test]
    fn test_negative_variable_count() {
        let text = run_session("-1
n
");

        assert!(text.contains("The number of variables must be positive."));
        assert!(!text.contains("Enter a valid number."));
    }

    #[test]
    fn test_non_numeric_variable_count() {
        let text = run_session("two
n
");

        assert!(text.contains("Enter a valid number."));
    }

    #[test]
    fn test_end_of_input_ends_session() {
        let text = run_session("2\n1\n");

        assert!(text.contains("Coefficient of x2: "));
        assert!(!text.contains("Solve another problem?"));
    }

    #[test]
    fn test_clear_screen() {
        let config = SessionConfig {
            show_iterations: false,
            clear_screen: true,
            format: OutputFormat::Pretty,
        };
        let mut output = Vec::new();
        Session::new(Cursor::new("0\nn\n"), &mut output, Solver::new(), config)
            .run()
            .unwrap();

        assert!(String::from_utf8(output).unwrap().starts_with("\x1B[2J\x1B[H"));
    }
}
