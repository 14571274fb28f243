//! Linearly implicit Rosenbrock (2,3) integrator for stiff systems.
//!
//! This is the Shampine-Reichelt `ode23s` scheme: a second-order step with
//! a third-order error estimate, one LU factorization of
//! `W = I - h d J` per attempt, first-same-as-last reuse of `f(y_new)`, and
//! the method's own continuous extension to fill the output grid.

use crate::config::SolverConfig;
use crate::error::SolveError;
use crate::trajectory::Trajectory;
use nalgebra::{DMatrix, DVector};
use std::time::Instant;
use tracing::trace;

/// An autonomous system `dx/dt = f(x)`.
pub trait OdeSystem {
    fn dim(&self) -> usize;

    fn rhs(&self, x: &DVector<f64>, dxdt: &mut DVector<f64>);

    /// Jacobian `df/dx` at `x`, where `fx = f(x)`.
    ///
    /// The default uses forward differences.
    fn jacobian(&self, x: &DVector<f64>, fx: &DVector<f64>, jac: &mut DMatrix<f64>) {
        let n = self.dim();
        let mut nudged = x.clone();
        let mut shifted = DVector::zeros(n);
        for j in 0..n {
            let delta = f64::EPSILON.sqrt() * x[j].abs().max(1e-3);
            nudged[j] = x[j] + delta;
            self.rhs(&nudged, &mut shifted);
            nudged[j] = x[j];
            for i in 0..n {
                jac[(i, j)] = (shifted[i] - fx[i]) / delta;
            }
        }
    }
}

/// Counters from one solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveStats {
    pub accepted: usize,
    pub rejected: usize,
    pub rhs_evals: usize,
}

const D: f64 = 0.292_893_218_813_452_5; // 1 / (2 + sqrt(2))
const E32: f64 = 7.414_213_562_373_095; // 6 + sqrt(2)

#[derive(Debug, Clone)]
pub struct Rosenbrock23 {
    config: SolverConfig,
}

impl Rosenbrock23 {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Integrate from `y0` at `times[0]` and sample at every entry of `times`.
    ///
    /// `times` must be non-decreasing.
    pub fn solve<S: OdeSystem>(
        &self,
        system: &S,
        y0: &[f64],
        times: Vec<f64>,
    ) -> Result<(Trajectory, SolveStats), SolveError> {
        let n = system.dim();
        let mut rows = Vec::with_capacity(times.len() * n);
        rows.extend_from_slice(y0);
        let mut stats = SolveStats::default();
        if times.len() < 2 {
            return Ok((Trajectory::from_rows(times, n, &rows), stats));
        }

        let rtol = self.config.rtol;
        let atol = self.config.atol;
        let deadline = self.config.max_wall.map(|d| Instant::now() + d);
        let t_end = times[times.len() - 1];

        let mut t = times[0];
        let mut y = DVector::from_column_slice(y0);
        let mut f0 = DVector::zeros(n);
        system.rhs(&y, &mut f0);
        stats.rhs_evals += 1;

        let mut h = (0.1 * (t_end - t)).min(1.0);
        let mut next = 1;

        let mut jac = DMatrix::zeros(n, n);
        let mut stage = DVector::zeros(n);
        let mut f1 = DVector::zeros(n);
        let mut f2 = DVector::zeros(n);
        let identity = DMatrix::<f64>::identity(n, n);

        while next < times.len() {
            if stats.accepted + stats.rejected >= self.config.max_steps {
                return Err(SolveError::StepLimit {
                    max_steps: self.config.max_steps,
                    t,
                });
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return Err(SolveError::Timeout { t });
            }

            h = h.min(t_end - t);
            if h <= 16.0 * f64::EPSILON * t.abs().max(1.0) {
                return Err(SolveError::StepSizeUnderflow { h, t });
            }

            system.jacobian(&y, &f0, &mut jac);
            stats.rhs_evals += n;
            let w = &identity - &jac * (h * D);
            let lu = w.lu();

            let k1 = lu.solve(&f0).ok_or(SolveError::SingularMatrix { t })?;

            stage.copy_from(&y);
            stage.axpy(0.5 * h, &k1, 1.0);
            system.rhs(&stage, &mut f1);

            let mut k2 = lu
                .solve(&(&f1 - &k1))
                .ok_or(SolveError::SingularMatrix { t })?;
            k2 += &k1;

            let mut y_new = y.clone();
            y_new.axpy(h, &k2, 1.0);
            system.rhs(&y_new, &mut f2);
            stats.rhs_evals += 2;

            let rhs3 = &f2 - (&k2 - &f1) * E32 - (&k1 - &f0) * 2.0;
            let k3 = lu.solve(&rhs3).ok_or(SolveError::SingularMatrix { t })?;

            let mut err = 0.0f64;
            for i in 0..n {
                let scale = atol + rtol * y[i].abs().max(y_new[i].abs());
                let e = (h / 6.0 * (k1[i] - 2.0 * k2[i] + k3[i])).abs() / scale;
                err = if e.is_nan() { f64::INFINITY } else { err.max(e) };
            }
            let finite = y_new.iter().all(|v| v.is_finite());

            if err <= 1.0 && finite {
                let t_new = t + h;
                let reach = t_new + 1e-12 * t_new.abs().max(1.0);
                while next < times.len() && times[next] <= reach {
                    let s = (times[next] - t) / h;
                    let c1 = s * (1.0 - s) / (1.0 - 2.0 * D);
                    let c2 = s * (s - 2.0 * D) / (1.0 - 2.0 * D);
                    rows.extend((0..n).map(|i| y[i] + h * (c1 * k1[i] + c2 * k2[i])));
                    next += 1;
                }
                t = t_new;
                y = y_new;
                std::mem::swap(&mut f0, &mut f2);
                stats.accepted += 1;
            } else {
                stats.rejected += 1;
            }

            let factor = if err > 0.0 {
                0.8 * err.powf(-1.0 / 3.0)
            } else {
                5.0
            };
            h *= factor.clamp(0.2, 5.0);
        }

        if rows.iter().any(|v| !v.is_finite()) {
            return Err(SolveError::NonFinite { t });
        }

        trace!(
            accepted = stats.accepted,
            rejected = stats.rejected,
            rhs_evals = stats.rhs_evals,
            "Rosenbrock solve finished"
        );
        Ok((Trajectory::from_rows(times, n, &rows), stats))
    }
}
