//! Dense tableau simplex engine for small linear programs whose constraints
//! are all `<=` with nonnegative right-hand sides.

mod problem;
mod simplex;
mod solution;
mod tableau;

pub use problem::{Direction, Problem, ProblemError};
pub use simplex::Solver;
pub use solution::{Iteration, Pivot, Solution, SolveOutcome, SolveReport};
pub use tableau::{Tableau, Variable};
