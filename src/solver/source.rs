use ndarray::{s, Zip};

use crate::state::Field;

/// Build the pressure Poisson source term from the velocity field.
///
/// The returned field has the shape of `u` and zero boundary rows/columns.
/// See [`build_source_term_into`] for the stencil.
pub fn build_source_term(u: &Field, v: &Field, rho: f64, dt: f64, dx: f64) -> Field {
    let mut b = Field::zeros(u.dim());
    build_source_term_into(&mut b, u, v, rho, dt, dx, false);
    b
}

/// Write the source term into the interior of `b`; boundary nodes are left as-is.
///
/// Centered differences with `dx == dy`, pre-scaled so the Jacobi update is
/// `p = 0.25 * (neighbors) - b`:
///
/// ```text
/// b = rho*dx/16 * ( (2/dt) * (du + dv)
///                 - (2/dx) * du_y * dv_x
///                 - du^2 / dx
///                 - dv^2 / dx )
/// ```
///
/// where `du = u[i+1,j] - u[i-1,j]`, `dv = v[i,j+1] - v[i,j-1]`,
/// `du_y = u[i,j+1] - u[i,j-1]` and `dv_x = v[i+1,j] - v[i-1,j]`.
/// `dt` and `dx` must be nonzero; this is not checked.
pub fn build_source_term_into(
    b: &mut Field,
    u: &Field,
    v: &Field,
    rho: f64,
    dt: f64,
    dx: f64,
    parallel: bool,
) {
    assert_eq!(u.dim(), v.dim(), "u and v must share a shape");
    assert_eq!(b.dim(), u.dim(), "b must match the velocity shape");
    let (nx, ny) = b.dim();
    if nx < 3 || ny < 3 {
        return;
    }

    let scale = rho * dx / 16.0;
    let kernel = |(i, j): (usize, usize), cell: &mut f64| {
        let (i, j) = (i + 1, j + 1);
        let du = u[[i + 1, j]] - u[[i - 1, j]];
        let dv = v[[i, j + 1]] - v[[i, j - 1]];
        let du_y = u[[i, j + 1]] - u[[i, j - 1]];
        let dv_x = v[[i + 1, j]] - v[[i - 1, j]];
        *cell = scale
            * ((2.0 / dt) * (du + dv)
                - (2.0 / dx) * du_y * dv_x
                - du * du / dx
                - dv * dv / dx);
    };

    let interior = b.slice_mut(s![1..nx - 1, 1..ny - 1]);
    if parallel {
        Zip::indexed(interior).par_for_each(kernel);
    } else {
        Zip::indexed(interior).for_each(kernel);
    }
}
