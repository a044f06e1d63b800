use thiserror::Error;

/// Optimization direction of the objective function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Direction {
    Maximize,
    Minimize,
}

/// Reasons a problem is rejected before any tableau is built
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProblemError {
    #[error("Objective function has no variables")]
    EmptyObjective,
    #[error("At least one constraint is required")]
    NoConstraints,
    #[error("Got {constraints} constraint rows but {rhs} right-hand sides")]
    RhsCountMismatch { constraints: usize, rhs: usize },
    #[error("Constraint {row} has {found} coefficients, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Constraint {row} has negative right-hand side {value}")]
    NegativeRhs { row: usize, value: f64 },
    #[error("Non-finite value in {what}")]
    NonFinite { what: String },
}

/// A linear program with only `<=` constraints and nonnegative right-hand sides.
///
/// All variables are implicitly nonnegative. Once built the problem cannot be
/// changed; every solve constructs its own tableau from it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Problem {
    objective: Vec<f64>,
    constraints: Vec<Vec<f64>>,
    rhs: Vec<f64>,
    direction: Direction,
}

impl Problem {
    pub fn new(
        objective: Vec<f64>,
        constraints: Vec<Vec<f64>>,
        rhs: Vec<f64>,
        direction: Direction,
    ) -> Result<Self, ProblemError> {
        if objective.is_empty() {
            return Err(ProblemError::EmptyObjective);
        }
        if constraints.is_empty() {
            return Err(ProblemError::NoConstraints);
        }
        if constraints.len() != rhs.len() {
            return Err(ProblemError::RhsCountMismatch {
                constraints: constraints.len(),
                rhs: rhs.len(),
            });
        }
        if objective.iter().any(|c| !c.is_finite()) {
            return Err(ProblemError::NonFinite {
                what: "objective".to_string(),
            });
        }

        for (i, (row, &b)) in constraints.iter().zip(&rhs).enumerate() {
            if row.len() != objective.len() {
                return Err(ProblemError::RowLength {
                    row: i + 1,
                    expected: objective.len(),
                    found: row.len(),
                });
            }
            if row.iter().any(|c| !c.is_finite()) || !b.is_finite() {
                return Err(ProblemError::NonFinite {
                    what: format!("constraint {}", i + 1),
                });
            }
            if b < 0.0 {
                return Err(ProblemError::NegativeRhs { row: i + 1, value: b });
            }
        }

        Ok(Self {
            objective,
            constraints,
            rhs,
            direction,
        })
    }

    pub fn objective(&self) -> &[f64] {
        &self.objective
    }

    pub fn constraints(&self) -> &[Vec<f64>] {
        &self.constraints
    }

    pub fn rhs(&self) -> &[f64] {
        &self.rhs
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn num_variables(&self) -> usize {
        self.objective.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Objective value of an assignment, in the problem's own sign
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.objective.iter().zip(values).map(|(c, x)| c * x).sum()
    }

    /// Checks nonnegativity and every `<=` row within `tolerance`
    pub fn is_feasible(&self, values: &[f64], tolerance: f64) -> bool {
        if values.len() != self.num_variables() || values.iter().any(|&x| x < -tolerance) {
            return false;
        }

        self.constraints.iter().zip(&self.rhs).all(|(row, &b)| {
            let lhs: f64 = row.iter().zip(values).map(|(a, x)| a * x).sum();
            lhs <= b + tolerance
        })
    }
}
