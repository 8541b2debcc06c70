mod boundary;
mod core;
pub mod diagnostics;
mod params;
mod poisson;
mod source;

// Re-export public API
pub use boundary::{set_bnd, set_pressure_bnd, FieldType};
pub use params::{RelaxParams, SolverParams};
pub use poisson::{relative_l2_diff, relax_pressure, PoissonRelaxer, RelaxReport};
pub use source::{build_source_term, build_source_term_into};

use crate::state::CavityState;
use self::core::update_velocity;

/// One timestep of the lid-driven cavity.
///
/// Builds the source from the step-start velocity, relaxes the pressure
/// (warm-started from the previous step), then advances the velocity.
/// Returns the relaxation report so callers can track sweep counts.
pub fn fluid_step_cavity(
    state: &mut CavityState,
    params: &SolverParams,
    relaxer: &mut PoissonRelaxer,
) -> RelaxReport {
    // 1. Snapshot velocity
    state.u0.assign(&state.u);
    state.v0.assign(&state.v);

    // 2. Source term from the snapshot
    build_source_term_into(
        &mut state.b,
        &state.u0,
        &state.v0,
        params.rho,
        params.dt,
        params.dx,
        relaxer.params().parallel,
    );

    // 3. Pressure
    let report = relaxer.relax(&mut state.p, &state.b);

    // 4. Momentum
    update_velocity(
        &mut state.u,
        &mut state.v,
        &state.u0,
        &state.v0,
        &state.p,
        params,
    );

    // 5. Walls, lid last
    set_bnd(FieldType::Vx, &mut state.u, params.lid_velocity);
    set_bnd(FieldType::Vy, &mut state.v, params.lid_velocity);

    state.step_count += 1;
    report
}
