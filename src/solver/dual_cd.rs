//! Dual coordinate descent for L2-regularized squared-hinge linear SVM
//!
//! Solves
//!
//! ```text
//! min_w  0.5 * ||w||^2 + C * sum_i max(0, 1 - y_i * w^T x_i)^2
//! ```
//!
//! through its dual, updating one multiplier at a time while maintaining
//! `w = sum_i alpha_i * y_i * x_i` (Hsieh et al., ICML 2008). The bias is
//! learned as the weight of a constant feature equal to `intercept_scaling`.

use crate::core::{ClassifierError, LinearSvcConfig, Result};
use crate::solver::shrinking::ActiveSet;
use log::{debug, warn};

/// Solution of one binary problem
#[derive(Debug, Clone)]
pub struct DualSolution {
    /// Feature weights (without the bias component)
    pub weights: Vec<f64>,
    /// Intercept, already multiplied by the intercept scaling
    pub bias: f64,
    /// Number of passes performed
    pub iterations: usize,
    /// Whether the projected-gradient gap fell below the tolerance
    pub converged: bool,
}

/// Dual coordinate descent solver
pub struct DualCoordinateDescent {
    config: LinearSvcConfig,
}

impl DualCoordinateDescent {
    pub fn new(config: LinearSvcConfig) -> Self {
        Self { config }
    }

    /// Solve a binary problem; `targets` must be +1 or -1
    pub fn solve(&self, rows: &[&[f64]], targets: &[f64]) -> Result<DualSolution> {
        if rows.is_empty() {
            return Err(ClassifierError::EmptyDataset);
        }
        if rows.len() != targets.len() {
            return Err(ClassifierError::InvalidDataset(format!(
                "{} rows but {} targets",
                rows.len(),
                targets.len()
            )));
        }
        if let Some(&bad) = targets.iter().find(|&&y| y != 1.0 && y != -1.0) {
            return Err(ClassifierError::InvalidDataset(format!(
                "binary target must be -1 or +1, got {bad}"
            )));
        }

        let n = rows.len();
        let dim = rows[0].len();
        let bias_feature = self.config.intercept_scaling;
        // Squared hinge: no upper bound on alpha, diagonal shift 1/(2C)
        let diag = 0.5 / self.config.c;

        let q_diag: Vec<f64> = rows
            .iter()
            .map(|x| x.iter().map(|v| v * v).sum::<f64>() + bias_feature * bias_feature + diag)
            .collect();

        let mut alpha = vec![0.0; n];
        let mut w = vec![0.0; dim];
        let mut w_bias = 0.0;

        let mut active = ActiveSet::new(n, self.config.seed);
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.config.max_iterations {
            let mut pg_max_new = f64::NEG_INFINITY;
            let mut pg_min_new = f64::INFINITY;

            active.shuffle();

            let mut s = 0;
            while s < active.len() {
                let i = active.get(s);
                let yi = targets[i];
                let xi = rows[i];

                let g = yi * (dot(&w, xi) + w_bias * bias_feature) - 1.0 + alpha[i] * diag;

                let pg = if alpha[i] == 0.0 {
                    if active.should_shrink(g) {
                        active.shrink(s);
                        continue;
                    }
                    g.min(0.0)
                } else {
                    g
                };

                pg_max_new = pg_max_new.max(pg);
                pg_min_new = pg_min_new.min(pg);

                if pg.abs() > 1e-12 {
                    let alpha_old = alpha[i];
                    alpha[i] = (alpha[i] - g / q_diag[i]).max(0.0);
                    let delta = (alpha[i] - alpha_old) * yi;
                    for (wj, &xj) in w.iter_mut().zip(xi.iter()) {
                        *wj += delta * xj;
                    }
                    w_bias += delta * bias_feature;
                }

                s += 1;
            }

            iterations += 1;

            if pg_max_new - pg_min_new <= self.config.tolerance {
                if active.is_full() {
                    converged = true;
                    break;
                }
                debug!("active set converged after {iterations} passes, checking all variables");
                active.reactivate();
                continue;
            }

            active.update_bound(pg_max_new);
        }

        if !w.iter().all(|v| v.is_finite()) || !w_bias.is_finite() {
            return Err(ClassifierError::OptimizationError(
                "weights diverged to non-finite values".to_string(),
            ));
        }

        if !converged {
            warn!(
                "linear SVC reached max_iterations={} without converging; consider more iterations",
                self.config.max_iterations
            );
        }

        Ok(DualSolution {
            weights: w,
            bias: w_bias * bias_feature,
            iterations,
            converged,
        })
    }
}

/// Inner product of two equally long slices
pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
