use std::fmt;

use crate::problem::{Direction, Problem};
use crate::solution::Solution;

/// A tableau column that can be basic in some row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Variable {
    /// Decision variable `x_{i+1}`
    Structural(usize),
    /// Slack of constraint `i+1`
    Slack(usize),
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variable::Structural(i) => write!(f, "x{}", i + 1),
            Variable::Slack(i) => write!(f, "s{}", i + 1),
        }
    }
}

/// Dense simplex tableau.
///
/// Layout is `[x_1..x_n | s_1..s_m | RHS]` with one row per constraint followed
/// by the objective (`Z`) row. The objective row always holds coefficients for
/// which a negative entry means the objective can still improve: `-c` when
/// maximizing and `+c` when minimizing.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Tableau {
    data: Vec<Vec<f64>>,
    basis: Vec<Variable>,
    n_vars: usize,
}

impl Tableau {
    pub fn initialize(problem: &Problem) -> Self {
        let n_vars = problem.num_variables();
        let n_constraints = problem.num_constraints();
        let total_cols = n_vars + n_constraints + 1;
        let rhs_col = total_cols - 1;

        let mut data = vec![vec![0.0; total_cols]; n_constraints + 1];

        for (i, (coefficients, &rhs)) in problem.constraints().iter().zip(problem.rhs()).enumerate() {
            data[i][..n_vars].copy_from_slice(coefficients);
            data[i][n_vars + i] = 1.0;
            data[i][rhs_col] = rhs;
        }

        let obj_row = n_constraints;
        for (j, &coef) in problem.objective().iter().enumerate() {
            data[obj_row][j] = match problem.direction() {
                Direction::Maximize => -coef,
                Direction::Minimize => coef,
            };
        }

        Self {
            data,
            basis: (0..n_constraints).map(Variable::Slack).collect(),
            n_vars,
        }
    }

    /// Number of rows, objective row included
    pub fn rows(&self) -> usize {
        self.data.len()
    }

    /// Number of columns, RHS included
    pub fn columns(&self) -> usize {
        self.data[0].len()
    }

    pub fn num_variables(&self) -> usize {
        self.n_vars
    }

    pub fn num_constraints(&self) -> usize {
        self.data.len() - 1
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.data.get(row).and_then(|r| r.get(col)).copied()
    }

    pub fn row(&self, row: usize) -> Option<&[f64]> {
        self.data.get(row).map(Vec::as_slice)
    }

    pub fn objective_row(&self) -> &[f64] {
        &self.data[self.num_constraints()]
    }

    pub fn rhs(&self, row: usize) -> Option<f64> {
        self.get(row, self.rhs_col())
    }

    /// Basic variable of each constraint row
    pub fn basis(&self) -> &[Variable] {
        &self.basis
    }

    /// The variable owning each non-RHS column
    pub fn column_labels(&self) -> Vec<Variable> {
        (0..self.n_vars)
            .map(Variable::Structural)
            .chain((0..self.num_constraints()).map(Variable::Slack))
            .collect()
    }

    pub fn variable_at(&self, col: usize) -> Variable {
        if col < self.n_vars {
            Variable::Structural(col)
        } else {
            Variable::Slack(col - self.n_vars)
        }
    }

    pub fn is_optimal(&self, tolerance: f64) -> bool {
        self.pivot_column(tolerance).is_none()
    }

    fn rhs_col(&self) -> usize {
        self.columns() - 1
    }

    /// Column with the most negative objective entry, or `None` at the optimum.
    /// Ties go to the lowest index.
    pub fn pivot_column(&self, tolerance: f64) -> Option<usize> {
        let obj = self.objective_row();

        let mut min_val = -tolerance;
        let mut min_col = None;

        for (j, &val) in obj[..self.rhs_col()].iter().enumerate() {
            if val < min_val {
                min_val = val;
                min_col = Some(j);
            }
        }

        min_col
    }

    /// Minimum ratio test over rows with a strictly positive entry in `col`.
    /// `None` means the entering variable can grow without bound.
    pub fn pivot_row(&self, col: usize, tolerance: f64) -> Option<usize> {
        let rhs_col = self.rhs_col();

        let mut min_ratio = f64::INFINITY;
        let mut min_row = None;

        for i in 0..self.num_constraints() {
            let val = self.data[i][col];
            if val > tolerance {
                let ratio = self.data[i][rhs_col] / val;
                if ratio < min_ratio {
                    min_ratio = ratio;
                    min_row = Some(i);
                }
            }
        }

        min_row
    }

    /// Gauss-Jordan step on `(row, col)`. Returns the variable that left the basis.
    ///
    /// # Panics
    ///
    /// Panics if `row` is not a constraint row, `col` is out of range, or the
    /// pivot element is zero.
    pub fn pivot(&mut self, row: usize, col: usize) -> Variable {
        assert!(row < self.num_constraints(), "pivot row {row} is not a constraint row");
        assert!(col < self.rhs_col(), "pivot column {col} is out of range");
        assert!(self.data[row][col] != 0.0, "pivot element at ({row}, {col}) is zero");

        let entering = self.variable_at(col);
        let leaving = std::mem::replace(&mut self.basis[row], entering);

        let pivot_val = self.data[row][col];
        for val in self.data[row].iter_mut() {
            *val /= pivot_val;
        }

        let pivot_row = self.data[row].clone();
        for (i, other) in self.data.iter_mut().enumerate() {
            if i == row {
                continue;
            }
            let factor = other[col];
            if factor == 0.0 {
                continue;
            }
            for (val, p) in other.iter_mut().zip(&pivot_row) {
                *val -= factor * p;
            }
        }

        leaving
    }

    /// Reads the assignment off unit structural columns and the objective off
    /// the `Z` row. Does not modify the tableau.
    pub fn extract_solution(&self, direction: Direction, tolerance: f64) -> Solution {
        let n_constraints = self.num_constraints();
        let rhs_col = self.rhs_col();

        let mut values = vec![0.0; self.n_vars];
        let mut claimed = vec![false; n_constraints];

        for (j, value) in values.iter_mut().enumerate() {
            if let Some(row) = self.unit_row(j, tolerance) {
                if !claimed[row] {
                    claimed[row] = true;
                    *value = self.data[row][rhs_col];
                }
            }
        }

        let z = self.data[n_constraints][rhs_col];
        let objective_value = match direction {
            Direction::Maximize => z,
            Direction::Minimize => -z,
        };

        Solution {
            values,
            // adding 0.0 turns -0.0 into 0.0
            objective_value: objective_value + 0.0,
        }
    }

    /// Row holding the single 1 of a unit column, if `col` is one
    fn unit_row(&self, col: usize, tolerance: f64) -> Option<usize> {
        let mut found = None;
        for (i, row) in self.data.iter().enumerate() {
            let val = row[col];
            if (val - 1.0).abs() <= tolerance && i < self.num_constraints() && found.is_none() {
                found = Some(i);
            } else if val.abs() > tolerance {
                return None;
            }
        }
        found
    }
}
