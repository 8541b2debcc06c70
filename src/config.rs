use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::solver::{RelaxParams, SolverParams};

pub const DEFAULT_PATH: &str = "cavity.yaml";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub grid: GridConfig,
    pub physics: PhysicsConfig,
    pub relaxation: RelaxationConfig,
    pub run: RunConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub nx: usize,
    pub ny: usize,
    /// Side length of the square cavity.
    pub length: f64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub rho: f64,
    pub nu: f64,
    pub dt: f64,
    pub lid_velocity: f64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RelaxationConfig {
    pub l2_target: f64,
    pub max_iter: usize,
    pub check_interval: usize,
    pub parallel: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub steps: usize,
    pub report_every: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            physics: PhysicsConfig::default(),
            relaxation: RelaxationConfig::default(),
            run: RunConfig::default(),
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            nx: 41,
            ny: 41,
            length: 2.0,
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            rho: 1.0,
            nu: 0.1,
            dt: 0.005,
            lid_velocity: 1.0,
        }
    }
}

impl Default for RelaxationConfig {
    fn default() -> Self {
        let relax = RelaxParams::default();
        Self {
            l2_target: relax.l2_target,
            max_iter: relax.max_iter,
            check_interval: relax.check_interval,
            parallel: relax.parallel,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            steps: 500,
            report_every: 50,
        }
    }
}

impl Config {
    /// Node spacing; both axes share it.
    pub fn dx(&self) -> f64 {
        self.grid.length / (self.grid.nx - 1) as f64
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));
        if self.grid.nx < 3 || self.grid.ny < 3 {
            return invalid(format!(
                "grid must be at least 3x3 (nx={}, ny={})",
                self.grid.nx, self.grid.ny
            ));
        }
        if self.grid.nx != self.grid.ny {
            return invalid(format!(
                "grid must be square so x and y share dx (nx={}, ny={})",
                self.grid.nx, self.grid.ny
            ));
        }
        if !(self.grid.length > 0.0) {
            return invalid(format!("length must be positive, got {}", self.grid.length));
        }
        if !(self.physics.rho > 0.0) {
            return invalid(format!("rho must be positive, got {}", self.physics.rho));
        }
        if !(self.physics.dt > 0.0) {
            return invalid(format!("dt must be positive, got {}", self.physics.dt));
        }
        if !(self.physics.nu >= 0.0) {
            return invalid(format!("nu must be non-negative, got {}", self.physics.nu));
        }
        if !(self.relaxation.l2_target >= 0.0) {
            return invalid(format!(
                "l2_target must be non-negative, got {}",
                self.relaxation.l2_target
            ));
        }
        if self.relaxation.check_interval == 0 {
            return invalid("check_interval must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn solver_params(&self) -> SolverParams {
        SolverParams {
            rho: self.physics.rho,
            nu: self.physics.nu,
            dt: self.physics.dt,
            dx: self.dx(),
            lid_velocity: self.physics.lid_velocity,
            relax: RelaxParams {
                l2_target: self.relaxation.l2_target,
                max_iter: self.relaxation.max_iter,
                check_interval: self.relaxation.check_interval,
                parallel: self.relaxation.parallel,
            },
        }
    }
}

pub fn parse(contents: &str, path: &Path) -> Result<Config, ConfigError> {
    let cfg: Config = serde_yaml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    cfg.validate()?;
    Ok(cfg)
}

/// Read, parse and validate a config file.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&contents, path)
}

/// Load `cavity.yaml` from the working directory, falling back to defaults
/// when it is missing or unusable.
pub fn load() -> Config {
    let path = Path::new(DEFAULT_PATH);
    if !path.exists() {
        return Config::default();
    }
    match load_from(path) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!("{e}; using defaults");
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(yaml: &str) -> Result<Config, ConfigError> {
        parse(yaml, Path::new("test.yaml"))
    }

    #[test]
    fn test_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.grid.nx, 41);
        assert_eq!(cfg.grid.ny, 41);
        assert_eq!(cfg.grid.length, 2.0);
        assert_eq!(cfg.physics.rho, 1.0);
        assert_eq!(cfg.physics.nu, 0.1);
        assert_eq!(cfg.physics.dt, 0.005);
        assert_eq!(cfg.physics.lid_velocity, 1.0);
        assert_eq!(cfg.relaxation.l2_target, 1e-4);
        assert_eq!(cfg.relaxation.max_iter, 500);
        assert_eq!(cfg.relaxation.check_interval, 10);
        assert!(!cfg.relaxation.parallel);
        assert_eq!(cfg.run.steps, 500);
        assert_eq!(cfg.run.report_every, 50);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_default_dx() {
        assert!((Config::default().dx() - 0.05).abs() < 1e-15);
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = "physics:\n  nu: 0.05\nrun:\n  steps: 100\n";
        let cfg = parse_str(yaml).unwrap();
        assert_eq!(cfg.physics.nu, 0.05);
        assert_eq!(cfg.physics.dt, 0.005); // default
        assert_eq!(cfg.run.steps, 100);
        assert_eq!(cfg.run.report_every, 50); // default
        assert_eq!(cfg.grid.nx, 41); // default
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
grid:
  nx: 81
  ny: 81
  length: 1.0
physics:
  rho: 1.2
  nu: 0.02
  dt: 0.001
  lid_velocity: 2.0
relaxation:
  l2_target: 1.0e-6
  max_iter: 2000
  check_interval: 5
  parallel: true
run:
  steps: 10
  report_every: 2
"#;
        let cfg = parse_str(yaml).unwrap();
        assert_eq!(cfg.grid.nx, 81);
        assert_eq!(cfg.grid.length, 1.0);
        assert_eq!(cfg.physics.rho, 1.2);
        assert_eq!(cfg.physics.lid_velocity, 2.0);
        assert_eq!(cfg.relaxation.l2_target, 1.0e-6);
        assert_eq!(cfg.relaxation.max_iter, 2000);
        assert_eq!(cfg.relaxation.check_interval, 5);
        assert!(cfg.relaxation.parallel);
        assert_eq!(cfg.run.report_every, 2);

        let params = cfg.solver_params();
        assert!((params.dx - 1.0 / 80.0).abs() < 1e-15);
        assert_eq!(params.relax.max_iter, 2000);
        assert!(params.relax.parallel);
    }

    #[test]
    fn test_default_matches_solver_defaults() {
        let params = Config::default().solver_params();
        let reference = SolverParams::default_cavity();
        assert_eq!(params.rho, reference.rho);
        assert_eq!(params.nu, reference.nu);
        assert_eq!(params.dt, reference.dt);
        assert!((params.dx - reference.dx).abs() < 1e-15);
        assert_eq!(params.relax, reference.relax);
    }

    #[test]
    fn test_rejects_non_square_grid() {
        let err = parse_str("grid:\n  nx: 41\n  ny: 21\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "got {err:?}");
    }

    #[test]
    fn test_rejects_tiny_grid() {
        assert!(parse_str("grid:\n  nx: 2\n  ny: 2\n").is_err());
    }

    #[test]
    fn test_rejects_zero_dt() {
        assert!(parse_str("physics:\n  dt: 0.0\n").is_err());
    }

    #[test]
    fn test_rejects_zero_check_interval() {
        assert!(parse_str("relaxation:\n  check_interval: 0\n").is_err());
    }

    #[test]
    fn test_parse_error_keeps_path() {
        let err = parse_str("grid: [1, 2").unwrap_err();
        match err {
            ConfigError::Parse { path, .. } => assert_eq!(path, Path::new("test.yaml")),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = load_from(Path::new("does-not-exist/cavity.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        // When no cavity.yaml exists, load() should return defaults
        let cfg = load();
        assert_eq!(cfg.grid.nx, 41);
        assert_eq!(cfg.relaxation.max_iter, 500);
    }
}
