/// Controls for the Jacobi pressure relaxation.
#[derive(Clone, Debug, PartialEq)]
pub struct RelaxParams {
    /// Relative L2 tolerance on the change between consecutive iterates.
    pub l2_target: f64,
    /// The loop runs while `n <= max_iter`, so a full run is `max_iter + 1` sweeps.
    pub max_iter: usize,
    /// The norm is only recomputed when `n % check_interval == 0`.
    pub check_interval: usize,
    /// Evaluate stencil interiors on the rayon pool.
    pub parallel: bool,
}

impl Default for RelaxParams {
    fn default() -> Self {
        Self {
            l2_target: 1e-4,
            max_iter: 500,
            check_interval: 10,
            parallel: false,
        }
    }
}

impl RelaxParams {
    pub fn with_target(l2_target: f64) -> Self {
        Self {
            l2_target,
            ..Self::default()
        }
    }
}

/// Solver parameters for the cavity simulation.
#[derive(Clone, Debug)]
pub struct SolverParams {
    pub rho: f64,
    pub nu: f64,
    pub dt: f64,
    /// Grid spacing, shared by x and y.
    pub dx: f64,
    pub lid_velocity: f64,
    pub relax: RelaxParams,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self::default_cavity()
    }
}

impl SolverParams {
    /// 41x41 nodes on a 2x2 box, unit lid speed.
    pub fn default_cavity() -> Self {
        Self {
            rho: 1.0,
            nu: 0.1,
            dt: 0.005,
            dx: 2.0 / 40.0,
            lid_velocity: 1.0,
            relax: RelaxParams::default(),
        }
    }

    /// Explicit diffusion number `nu * dt / dx^2`; the scheme needs it <= 0.25.
    pub fn diffusion_number(&self) -> f64 {
        self.nu * self.dt / (self.dx * self.dx)
    }

    /// Lid CFL number `|lid_velocity| * dt / dx`.
    pub fn lid_cfl(&self) -> f64 {
        self.lid_velocity.abs() * self.dt / self.dx
    }
}
