//! Limited-memory BFGS minimizer
//!
//! Two-loop recursion over the last `history_size` correction pairs with a
//! backtracking Armijo line search. Used for the smooth logistic losses.

use crate::core::{ClassifierError, LogisticConfig, Result};
use crate::solver::dual_cd::dot;
use log::{debug, trace};
use std::collections::VecDeque;

/// Relative objective decrease treated as stagnation
const FTOL: f64 = 64.0 * f64::EPSILON;
/// Armijo sufficient-decrease constant
const ARMIJO_C1: f64 = 1e-4;
const MAX_LINE_SEARCH: usize = 50;

/// Result of a minimization run
#[derive(Debug, Clone)]
pub struct LbfgsResult {
    /// Final parameter vector
    pub x: Vec<f64>,
    /// Objective value at `x`
    pub value: f64,
    /// Number of accepted steps
    pub iterations: usize,
    /// Whether a stopping criterion other than the iteration limit was met
    pub converged: bool,
}

struct Correction {
    s: Vec<f64>,
    y: Vec<f64>,
    rho: f64,
}

/// L-BFGS solver configuration
#[derive(Debug, Clone)]
pub struct Lbfgs {
    tolerance: f64,
    max_iterations: usize,
    history_size: usize,
}

impl Lbfgs {
    pub fn new(tolerance: f64, max_iterations: usize, history_size: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
            history_size: history_size.max(1),
        }
    }

    pub fn from_config(config: &LogisticConfig) -> Self {
        Self::new(
            config.tolerance,
            config.max_iterations,
            config.history_size,
        )
    }

    /// Minimize `f`, which writes the gradient into its second argument and
    /// returns the objective value.
    pub fn minimize<F>(&self, mut f: F, x0: Vec<f64>) -> Result<LbfgsResult>
    where
        F: FnMut(&[f64], &mut [f64]) -> f64,
    {
        let n = x0.len();
        let mut x = x0;
        let mut grad = vec![0.0; n];
        let mut value = f(&x, &mut grad);
        check_finite(value)?;

        let mut history: VecDeque<Correction> = VecDeque::with_capacity(self.history_size);
        let mut x_new = vec![0.0; n];
        let mut grad_new = vec![0.0; n];
        let mut iterations = 0;

        loop {
            if max_abs(&grad) <= self.tolerance {
                return Ok(LbfgsResult {
                    x,
                    value,
                    iterations,
                    converged: true,
                });
            }
            if iterations >= self.max_iterations {
                return Ok(LbfgsResult {
                    x,
                    value,
                    iterations,
                    converged: false,
                });
            }

            let mut direction = two_loop(&grad, &history);
            let mut slope = dot(&grad, &direction);
            if slope >= 0.0 {
                // Curvature information went stale; restart from steepest descent
                debug!("L-BFGS direction not descending at iteration {iterations}, resetting");
                history.clear();
                direction = grad.iter().map(|g| -g).collect();
                slope = dot(&grad, &direction);
            }

            let mut step = 1.0;
            let mut value_new = f64::INFINITY;
            let mut accepted = false;
            for _ in 0..MAX_LINE_SEARCH {
                for i in 0..n {
                    x_new[i] = x[i] + step * direction[i];
                }
                value_new = f(&x_new, &mut grad_new);
                if value_new.is_finite() && value_new <= value + ARMIJO_C1 * step * slope {
                    accepted = true;
                    break;
                }
                step *= 0.5;
            }

            if !accepted {
                debug!("L-BFGS line search failed at iteration {iterations}");
                return Ok(LbfgsResult {
                    x,
                    value,
                    iterations,
                    converged: false,
                });
            }

            let s: Vec<f64> = x_new.iter().zip(x.iter()).map(|(a, b)| a - b).collect();
            let y: Vec<f64> = grad_new
                .iter()
                .zip(grad.iter())
                .map(|(a, b)| a - b)
                .collect();
            let sy = dot(&s, &y);
            if sy > 1e-10 {
                if history.len() == self.history_size {
                    history.pop_front();
                }
                history.push_back(Correction { s, y, rho: 1.0 / sy });
            }

            iterations += 1;
            let decrease = (value - value_new) / value.abs().max(value_new.abs()).max(1.0);
            trace!("L-BFGS iteration {iterations}: f={value_new:.6e} step={step:.3e}");

            std::mem::swap(&mut x, &mut x_new);
            std::mem::swap(&mut grad, &mut grad_new);
            value = value_new;

            if decrease <= FTOL {
                return Ok(LbfgsResult {
                    x,
                    value,
                    iterations,
                    converged: true,
                });
            }
        }
    }
}

/// Approximate `-H * grad` from stored corrections
fn two_loop(grad: &[f64], history: &VecDeque<Correction>) -> Vec<f64> {
    let mut q = grad.to_vec();
    let mut alphas = Vec::with_capacity(history.len());

    for c in history.iter().rev() {
        let a = c.rho * dot(&c.s, &q);
        for (qi, yi) in q.iter_mut().zip(c.y.iter()) {
            *qi -= a * yi;
        }
        alphas.push(a);
    }

    let gamma = match history.back() {
        Some(last) => dot(&last.s, &last.y) / dot(&last.y, &last.y),
        // First step: unit length along the gradient
        None => 1.0 / dot(grad, grad).sqrt(),
    };
    for qi in q.iter_mut() {
        *qi *= gamma;
    }

    for (c, a) in history.iter().zip(alphas.iter().rev()) {
        let b = c.rho * dot(&c.y, &q);
        for (qi, si) in q.iter_mut().zip(c.s.iter()) {
            *qi += si * (a - b);
        }
    }

    q.iter().map(|v| -v).collect()
}

fn check_finite(value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ClassifierError::OptimizationError(format!(
            "objective is not finite: {value}"
        )))
    }
}

fn max_abs(v: &[f64]) -> f64 {
    v.iter().fold(0.0, |m, x| m.max(x.abs()))
}
