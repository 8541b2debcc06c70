use ndarray::Array2;

/// Dense 2D scalar field. Axis 0 is x (index `i`), axis 1 is y (index `j`).
pub type Field = Array2<f64>;

/// All buffers of a lid-driven cavity run, allocated once at setup.
pub struct CavityState {
    pub nx: usize,
    pub ny: usize,
    pub u: Field,
    pub v: Field,
    /// Pressure; carried across steps as the relaxer's warm start.
    pub p: Field,
    /// Poisson source term, rebuilt every step.
    pub b: Field,
    /// Velocity snapshots taken at the start of a step.
    pub u0: Field,
    pub v0: Field,
    pub step_count: u64,
    pub dt: f64,
}

impl CavityState {
    pub fn new(nx: usize, ny: usize, dt: f64) -> Self {
        Self {
            nx,
            ny,
            u: Field::zeros((nx, ny)),
            v: Field::zeros((nx, ny)),
            p: Field::zeros((nx, ny)),
            b: Field::zeros((nx, ny)),
            u0: Field::zeros((nx, ny)),
            v0: Field::zeros((nx, ny)),
            step_count: 0,
            dt,
        }
    }

    /// Simulated time so far.
    pub fn time(&self) -> f64 {
        self.step_count as f64 * self.dt
    }

    /// Zero every field and rewind the clock. Buffers are reused.
    pub fn reset(&mut self) {
        self.u.fill(0.0);
        self.v.fill(0.0);
        self.p.fill(0.0);
        self.b.fill(0.0);
        self.u0.fill(0.0);
        self.v0.fill(0.0);
        self.step_count = 0;
    }
}
