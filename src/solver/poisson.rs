use ndarray::{s, Zip};

use super::boundary::set_pressure_bnd;
use super::params::RelaxParams;
use crate::error::PoissonError;
use crate::state::Field;

/// Outcome of one relaxation call.
#[derive(Clone, Debug, PartialEq)]
pub struct RelaxReport {
    /// Number of sweeps performed (`max_iter + 1` when the cap was hit).
    pub iterations: usize,
    /// Last sampled relative L2 norm; NaN if the previous iterate was all zeros.
    pub residual: f64,
    /// How many times the norm was sampled.
    pub samples: usize,
    pub l2_target: f64,
    pub max_iter: usize,
}

impl RelaxReport {
    pub fn converged(&self) -> bool {
        self.residual <= self.l2_target
    }

    pub fn hit_cap(&self) -> bool {
        self.iterations > self.max_iter
    }
}

/// Relative L2 norm of the change between two iterates:
/// `sqrt(sum((p - pn)^2) / sum(pn^2))`.
///
/// Reduced serially in row-major order. A zero `pn` gives NaN (0/0) or +inf.
pub fn relative_l2_diff(p: &Field, pn: &Field) -> f64 {
    let (num, den) = Zip::from(p)
        .and(pn)
        .fold((0.0_f64, 0.0_f64), |(num, den), &a, &b| {
            let d = a - b;
            (num + d * d, den + b * b)
        });
    (num / den).sqrt()
}

/// One Jacobi sweep over the interior of `p`, reading only from `pn`.
fn jacobi_sweep(p: &mut Field, pn: &Field, b: &Field, parallel: bool) {
    let (nx, ny) = p.dim();
    let kernel = |(i, j): (usize, usize), cell: &mut f64| {
        let (i, j) = (i + 1, j + 1);
        *cell = 0.25 * (pn[[i + 1, j]] + pn[[i - 1, j]] + pn[[i, j + 1]] + pn[[i, j - 1]])
            - b[[i, j]];
    };
    let interior = p.slice_mut(s![1..nx - 1, 1..ny - 1]);
    if parallel {
        Zip::indexed(interior).par_for_each(kernel);
    } else {
        Zip::indexed(interior).for_each(kernel);
    }
}

/// Jacobi relaxation of the pressure Poisson equation.
///
/// Holds the second buffer of the double-buffered sweep and the sampled
/// norms, so repeated calls (one per timestep) stop allocating once the shape
/// and the longest run so far are known.
pub struct PoissonRelaxer {
    params: RelaxParams,
    scratch: Field,
    history: Vec<f64>,
}

impl PoissonRelaxer {
    pub fn new(params: RelaxParams) -> Self {
        Self {
            params,
            scratch: Field::zeros((0, 0)),
            history: Vec::new(),
        }
    }

    /// Pre-size the scratch buffer for a known grid.
    pub fn with_shape(shape: (usize, usize), params: RelaxParams) -> Self {
        Self {
            params,
            scratch: Field::zeros(shape),
            history: Vec::new(),
        }
    }

    pub fn params(&self) -> &RelaxParams {
        &self.params
    }

    /// Norms sampled by the most recent call, in order.
    pub fn history(&self) -> &[f64] {
        &self.history
    }

    /// Relax `p` in place against the fixed source `b`.
    ///
    /// Loops while the sampled norm is above `l2_target` and `n <= max_iter`.
    /// The norm is sampled when `n % check_interval == 0`; between samples
    /// the last value stands. Hitting the cap is not an error, and a NaN norm
    /// (zero previous iterate) ends the loop as NaN never compares greater
    /// than the target. Use [`try_relax`](Self::try_relax) to have both reported.
    ///
    /// # Panics
    /// If `p` and `b` differ in shape or the grid is smaller than 3x3.
    pub fn relax(&mut self, p: &mut Field, b: &Field) -> RelaxReport {
        assert_eq!(p.dim(), b.dim(), "pressure and source must share a shape");
        let (nx, ny) = p.dim();
        assert!(nx >= 3 && ny >= 3, "grid {:?} has no interior", (nx, ny));
        if self.scratch.dim() != p.dim() {
            self.scratch = Field::zeros(p.dim());
        }

        let RelaxParams {
            l2_target,
            max_iter,
            check_interval,
            parallel,
        } = self.params;
        let check_interval = check_interval.max(1);

        let mut iter_diff = l2_target + 1.0;
        let mut n = 0;
        self.history.clear();

        while iter_diff > l2_target && n <= max_iter {
            // The previous iterate moves to scratch; every cell of p is rewritten below.
            std::mem::swap(p, &mut self.scratch);
            let pn = &self.scratch;

            jacobi_sweep(p, pn, b, parallel);
            set_pressure_bnd(p);

            if n % check_interval == 0 {
                iter_diff = relative_l2_diff(p, pn);
                self.history.push(iter_diff);
            }
            n += 1;
        }

        if n > max_iter {
            tracing::debug!(
                iterations = n,
                residual = iter_diff,
                l2_target,
                "pressure relaxation hit iteration cap"
            );
        } else {
            tracing::trace!(iterations = n, residual = iter_diff, "pressure relaxation done");
        }

        RelaxReport {
            iterations: n,
            residual: iter_diff,
            samples: self.history.len(),
            l2_target,
            max_iter,
        }
    }

    /// Like [`relax`](Self::relax), but reports what the plain path keeps silent.
    ///
    /// `p` holds the relaxed field whether or not an error is returned.
    pub fn try_relax(&mut self, p: &mut Field, b: &Field) -> Result<RelaxReport, PoissonError> {
        if p.dim() != b.dim() {
            return Err(PoissonError::ShapeMismatch {
                pressure: p.dim(),
                source_term: b.dim(),
            });
        }
        let (nx, ny) = p.dim();
        if nx < 3 || ny < 3 {
            return Err(PoissonError::GridTooSmall { shape: (nx, ny) });
        }

        let report = self.relax(p, b);
        if report.residual.is_nan() {
            return Err(PoissonError::DegenerateNorm {
                iteration: report.iterations - 1,
            });
        }
        if report.hit_cap() && !report.converged() {
            return Err(PoissonError::NonConvergence {
                iterations: report.iterations,
                residual: report.residual,
                l2_target: report.l2_target,
            });
        }
        Ok(report)
    }
}

/// Relax a copy of `p` with the default cap and check interval.
pub fn relax_pressure(p: &Field, b: &Field, l2_target: f64) -> Field {
    let mut out = p.clone();
    PoissonRelaxer::with_shape(p.dim(), RelaxParams::with_target(l2_target)).relax(&mut out, b);
    out
}
