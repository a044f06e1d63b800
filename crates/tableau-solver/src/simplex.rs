use tracing::{debug, trace, warn};

use crate::problem::Problem;
use crate::solution::{Iteration, Pivot, SolveOutcome, SolveReport};
use crate::tableau::Tableau;

/// Primal simplex solver for `<=` constrained problems
#[derive(Debug, Clone, Copy)]
pub struct Solver {
    /// Maximum pivots before giving up
    max_iterations: usize,
    /// Tolerance for floating point comparisons
    tolerance: f64,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_iterations: 10000,
            tolerance: 1e-9,
        }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn solve(&self, problem: &Problem) -> SolveOutcome {
        self.run(problem, |_, _, _| {})
    }

    /// Like [`Solver::solve`], also keeping a snapshot of every iteration
    pub fn solve_traced(&self, problem: &Problem) -> SolveReport {
        let mut iterations = Vec::new();
        let outcome = self.run(problem, |number, tableau, pivot| {
            iterations.push(Iteration {
                number,
                tableau: tableau.clone(),
                pivot,
            })
        });
        SolveReport { outcome, iterations }
    }

    /// Drives the tableau to a terminal state. `record` sees the tableau at the
    /// head of every iteration along with the pivot about to be applied.
    fn run(
        &self,
        problem: &Problem,
        mut record: impl FnMut(usize, &Tableau, Option<Pivot>),
    ) -> SolveOutcome {
        let mut tableau = Tableau::initialize(problem);
        trace!(
            rows = tableau.rows(),
            columns = tableau.columns(),
            "initialized tableau"
        );

        let mut pivots = 0;
        loop {
            let number = pivots + 1;

            let Some(col) = tableau.pivot_column(self.tolerance) else {
                record(number, &tableau, None);
                debug!(pivots, "optimal");
                return SolveOutcome::Optimal(
                    tableau.extract_solution(problem.direction(), self.tolerance),
                );
            };

            let entering = tableau.variable_at(col);
            let Some(row) = tableau.pivot_row(col, self.tolerance) else {
                record(number, &tableau, None);
                debug!(pivots, %entering, "unbounded");
                return SolveOutcome::Unbounded { entering };
            };

            if pivots == self.max_iterations {
                warn!(pivots, "iteration limit reached");
                return SolveOutcome::IterationLimitExceeded { iterations: pivots };
            }

            let leaving = tableau.basis()[row];
            record(
                number,
                &tableau,
                Some(Pivot {
                    row,
                    column: col,
                    entering,
                    leaving,
                }),
            );

            tableau.pivot(row, col);
            pivots += 1;
            debug!(iteration = number, %entering, %leaving, row, col, "pivot");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Direction;
    use crate::tableau::Variable;

    fn assert_optimal(outcome: &SolveOutcome, values: &[f64], objective: f64) {
        let Some(solution) = outcome.solution() else {
            panic!("expected optimal, got {:?}", outcome);
        };
        for (j, (&got, &want)) in solution.values.iter().zip(values).enumerate() {
            assert!((got - want).abs() < 1e-6, "x{} = {} (expected {})", j + 1, got, want);
        }
        assert!(
            (solution.objective_value - objective).abs() < 1e-6,
            "obj = {} (expected {})",
            solution.objective_value,
            objective
        );
    }

    #[test]
    fn test_textbook_maximization() {
        // Maximize: 3x1 + 5x2
        // Subject to:
        //   x1 <= 4
        //   2x2 <= 12
        //   3x1 + 2x2 <= 18
        // Optimal: x1=2, x2=6, obj=36
        let problem = Problem::new(
            vec![3.0, 5.0],
            vec![vec![1.0, 0.0], vec![0.0, 2.0], vec![3.0, 2.0]],
            vec![4.0, 12.0, 18.0],
            Direction::Maximize,
        )
        .unwrap();

        let outcome = Solver::new().solve(&problem);

        assert_optimal(&outcome, &[2.0, 6.0], 36.0);
        assert!(outcome.is_optimal());
        let solution = outcome.solution().unwrap();
        assert!((solution.value_of(Variable::Structural(1)).unwrap() - 6.0).abs() < 1e-6);
        assert_eq!(solution.value_of(Variable::Slack(0)), None);
        assert!(problem.is_feasible(&outcome.solution().unwrap().values, 1e-6));
    }

    #[test]
    fn test_minimization_stays_at_origin() {
        // Minimize: 2x1 + 3x2 subject to x1 + x2 <= 4
        let problem = Problem::new(
            vec![2.0, 3.0],
            vec![vec![1.0, 1.0]],
            vec![4.0],
            Direction::Minimize,
        )
        .unwrap();

        let outcome = Solver::new().solve(&problem);

        assert_optimal(&outcome, &[0.0, 0.0], 0.0);
        assert!(outcome.solution().unwrap().objective_value.is_sign_positive());
    }

    #[test]
    fn test_single_variable() {
        let problem = Problem::new(vec![1.0], vec![vec![1.0]], vec![10.0], Direction::Maximize).unwrap();

        assert_optimal(&Solver::new().solve(&problem), &[10.0], 10.0);
    }

    #[test]
    fn test_minimization_with_negative_costs() {
        // Minimize: -x1 - 2x2
        // Subject to:
        //   x1 + x2 <= 4
        //   x2 <= 3
        // Optimal: x1=1, x2=3, obj=-7
        let problem = Problem::new(
            vec![-1.0, -2.0],
            vec![vec![1.0, 1.0], vec![0.0, 1.0]],
            vec![4.0, 3.0],
            Direction::Minimize,
        )
        .unwrap();

        assert_optimal(&Solver::new().solve(&problem), &[1.0, 3.0], -7.0);
    }

    #[test]
    fn test_unbounded() {
        // Maximize x1 subject to x1 - x2 <= 1
        let problem = Problem::new(
            vec![1.0, 0.0],
            vec![vec![1.0, -1.0]],
            vec![1.0],
            Direction::Maximize,
        )
        .unwrap();

        let outcome = Solver::new().solve(&problem);

        assert_eq!(
            outcome,
            SolveOutcome::Unbounded {
                entering: Variable::Structural(1)
            }
        );
        assert!(outcome.solution().is_none());
    }

    #[test]
    fn test_iteration_limit() {
        let problem = Problem::new(
            vec![3.0, 5.0],
            vec![vec![1.0, 0.0], vec![0.0, 2.0], vec![3.0, 2.0]],
            vec![4.0, 12.0, 18.0],
            Direction::Maximize,
        )
        .unwrap();

        let solver = Solver::new().with_max_iterations(1);
        assert_eq!(solver.max_iterations(), 1);
        assert_eq!(solver.tolerance(), 1e-9);

        let outcome = solver.solve(&problem);

        assert_eq!(outcome, SolveOutcome::IterationLimitExceeded { iterations: 1 });
    }

    #[test]
    fn test_degenerate_problem_terminates() {
        // Zero right-hand side makes the first pivot degenerate
        let problem = Problem::new(
            vec![2.0, 1.0],
            vec![vec![1.0, -1.0], vec![1.0, 1.0]],
            vec![0.0, 6.0],
            Direction::Maximize,
        )
        .unwrap();

        let outcome = Solver::new().solve(&problem);

        assert_optimal(&outcome, &[3.0, 3.0], 9.0);
    }

    #[test]
    fn test_trace_records_every_iteration() {
        let problem = Problem::new(
            vec![3.0, 5.0],
            vec![vec![1.0, 0.0], vec![0.0, 2.0], vec![3.0, 2.0]],
            vec![4.0, 12.0, 18.0],
            Direction::Maximize,
        )
        .unwrap();

        let report = Solver::new().solve_traced(&problem);

        assert_eq!(report.outcome, Solver::new().solve(&problem));
        assert_eq!(report.iterations.len(), 3);
        assert_eq!(report.iterations[0].tableau, Tableau::initialize(&problem));

        let first = report.iterations[0].pivot.unwrap();
        assert_eq!(first.entering, Variable::Structural(1));
        assert_eq!(first.leaving, Variable::Slack(1));

        let second = report.iterations[1].pivot.unwrap();
        assert_eq!(second.entering, Variable::Structural(0));
        assert_eq!(second.leaving, Variable::Slack(2));

        let last = &report.iterations[2];
        assert_eq!(last.number, 3);
        assert!(last.pivot.is_none());
        assert!(last.tableau.objective_row().iter().all(|&v| v >= -1e-9));
    }

    #[test]
    fn test_trace_snapshots_precede_their_pivot() {
        let problem = Problem::new(
            vec![2.0, 1.0],
            vec![vec![1.0, -1.0], vec![1.0, 1.0]],
            vec![0.0, 6.0],
            Direction::Maximize,
        )
        .unwrap();

        let report = Solver::new().solve_traced(&problem);

        for pair in report.iterations.windows(2) {
            let pivot = pair[0].pivot.unwrap();
            let mut stepped = pair[0].tableau.clone();
            assert_eq!(stepped.basis()[pivot.row], pivot.leaving);

            assert_eq!(stepped.pivot(pivot.row, pivot.column), pivot.leaving);
            assert_eq!(stepped, pair[1].tableau);
        }
        assert!(report.iterations.last().unwrap().pivot.is_none());
    }

    #[test]
    fn test_random_problems_are_feasible_and_optimal() {
        // Small deterministic generator, coefficients in 0..=9
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = move || {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            (seed % 10) as f64
        };

        for _ in 0..50 {
            let n = 3;
            let m = 4;
            let objective: Vec<f64> = (0..n).map(|_| next() + 1.0).collect();
            let constraints: Vec<Vec<f64>> =
                (0..m).map(|_| (0..n).map(|_| next() + 1.0).collect()).collect();
            let rhs: Vec<f64> = (0..m).map(|_| next() * 3.0).collect();
            let problem = Problem::new(objective, constraints, rhs, Direction::Maximize).unwrap();

            let report = Solver::new().solve_traced(&problem);
            let Some(solution) = report.outcome.solution() else {
                panic!("positive bounded problem must be optimal: {:?}", report.outcome);
            };

            assert!(problem.is_feasible(&solution.values, 1e-6));
            assert!((problem.evaluate(&solution.values) - solution.objective_value).abs() < 1e-6);
            let last = report.iterations.last().unwrap();
            assert!(last.tableau.is_optimal(1e-9));
        }
    }
}
