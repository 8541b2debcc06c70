use crate::state::Field;

use super::params::SolverParams;

/// Explicit momentum update on the interior of `u` and `v`.
///
/// Backward-difference convection, centered pressure gradient and centered
/// diffusion, all read from the step-start snapshots `u0`, `v0` and the
/// relaxed pressure `p`. Walls are left for `set_bnd`.
pub fn update_velocity(
    u: &mut Field,
    v: &mut Field,
    u0: &Field,
    v0: &Field,
    p: &Field,
    params: &SolverParams,
) {
    let (nx, ny) = u.dim();
    let dt = params.dt;
    let dx = params.dx;
    let c = dt / dx;
    let d = dt / (dx * dx);
    let g = dt / (2.0 * params.rho * dx);
    let nu = params.nu;

    for i in 1..nx - 1 {
        for j in 1..ny - 1 {
            let uc = u0[[i, j]];
            let vc = v0[[i, j]];

            u[[i, j]] = uc
                - uc * c * (uc - u0[[i - 1, j]])
                - vc * c * (uc - u0[[i, j - 1]])
                - g * (p[[i + 1, j]] - p[[i - 1, j]])
                + nu * (d * (u0[[i + 1, j]] - 2.0 * uc + u0[[i - 1, j]])
                    + d * (u0[[i, j + 1]] - 2.0 * uc + u0[[i, j - 1]]));

            v[[i, j]] = vc
                - uc * c * (vc - v0[[i - 1, j]])
                - vc * c * (vc - v0[[i, j - 1]])
                - g * (p[[i, j + 1]] - p[[i, j - 1]])
                + nu * (d * (v0[[i + 1, j]] - 2.0 * vc + v0[[i - 1, j]])
                    + d * (v0[[i, j + 1]] - 2.0 * vc + v0[[i, j - 1]]));
        }
    }
}
