//! Error types for the hardened relaxer and the config loader.

use std::path::PathBuf;

use thiserror::Error;

/// Errors reported by [`PoissonRelaxer::try_relax`](crate::solver::PoissonRelaxer::try_relax).
///
/// The plain `relax` path never produces these: it always hands back whatever
/// the pressure field holds when the loop stops.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PoissonError {
    /// Iteration cap reached with the sampled norm still above the target.
    #[error("pressure relaxation did not converge: {iterations} sweeps, residual {residual:.3e} > target {l2_target:.3e}")]
    NonConvergence {
        iterations: usize,
        residual: f64,
        l2_target: f64,
    },

    /// The loop stopped on a NaN norm, i.e. the previous iterate was all zeros.
    #[error("relative L2 norm undefined at sweep {iteration}: previous pressure iterate is identically zero")]
    DegenerateNorm { iteration: usize },

    #[error("field shape mismatch: pressure is {pressure:?}, source is {source_term:?}")]
    ShapeMismatch {
        pressure: (usize, usize),
        source_term: (usize, usize),
    },

    #[error("grid {shape:?} has no interior; at least 3x3 is required")]
    GridTooSmall { shape: (usize, usize) },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_convergence_message() {
        let err = PoissonError::NonConvergence {
            iterations: 501,
            residual: 2.5e-3,
            l2_target: 1e-4,
        };
        let msg = err.to_string();
        assert!(msg.contains("501 sweeps"), "got {}", msg);
        assert!(msg.contains("2.500e-3"), "got {}", msg);
    }

    #[test]
    fn test_invalid_config_message() {
        let err = ConfigError::Invalid("dt must be positive".into());
        assert_eq!(err.to_string(), "invalid configuration: dt must be positive");
    }
}
