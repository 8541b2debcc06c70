//! Lid-driven cavity flow with a Jacobi pressure Poisson solver.
//!
//! The core is two kernels: [`solver::build_source_term`] turns a velocity
//! field into the Poisson right-hand side, and [`solver::PoissonRelaxer`]
//! relaxes the pressure against it. [`solver::fluid_step_cavity`] wires them
//! into a timestep.

pub mod config;
pub mod error;
pub mod solver;
pub mod state;

pub use error::{ConfigError, PoissonError};
pub use solver::{build_source_term, relax_pressure};
pub use state::{CavityState, Field};
