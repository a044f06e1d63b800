use crate::tableau::{Tableau, Variable};

/// Optimal assignment read off the final tableau
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Solution {
    /// Value of each decision variable, `x1` first
    pub values: Vec<f64>,
    /// Objective value in the problem's own direction
    pub objective_value: f64,
}

impl Solution {
    /// Value of a decision variable; slacks are not part of the assignment
    pub fn value_of(&self, variable: Variable) -> Option<f64> {
        match variable {
            Variable::Structural(j) => self.values.get(j).copied(),
            Variable::Slack(_) => None,
        }
    }
}

/// Terminal state of a solve
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "status", rename_all = "snake_case"))]
pub enum SolveOutcome {
    /// No improving column remains
    Optimal(Solution),
    /// `entering` has no positive entry in any constraint row
    Unbounded { entering: Variable },
    /// The safety bound on pivots was hit, most likely by degenerate cycling
    IterationLimitExceeded { iterations: usize },
}

impl SolveOutcome {
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SolveOutcome::Optimal(solution) => Some(solution),
            _ => None,
        }
    }

    pub fn is_optimal(&self) -> bool {
        matches!(self, SolveOutcome::Optimal(_))
    }
}

/// A pivot performed at the end of an iteration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Pivot {
    pub row: usize,
    pub column: usize,
    pub entering: Variable,
    pub leaving: Variable,
}

/// Snapshot of the tableau at the head of an iteration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Iteration {
    /// 1-based iteration counter
    pub number: usize,
    pub tableau: Tableau,
    /// `None` on the final iteration
    pub pivot: Option<Pivot>,
}

/// Outcome plus every intermediate tableau
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SolveReport {
    pub outcome: SolveOutcome,
    pub iterations: Vec<Iteration>,
}
