use ndarray::Zip;

use crate::state::Field;

/// Interior-averaged kinetic energy: KE = 0.5 * <u² + v²>.
pub fn compute_kinetic_energy(u: &Field, v: &Field) -> f64 {
    let (nx, ny) = u.dim();
    let mut sum = 0.0;
    let mut count = 0usize;
    for i in 1..nx.saturating_sub(1) {
        for j in 1..ny.saturating_sub(1) {
            sum += u[[i, j]] * u[[i, j]] + v[[i, j]] * v[[i, j]];
            count += 1;
        }
    }
    if count > 0 { 0.5 * sum / count as f64 } else { 0.0 }
}

/// Largest |du/dx + dv/dy| over interior nodes, centered differences.
pub fn max_divergence(u: &Field, v: &Field, dx: f64) -> f64 {
    let (nx, ny) = u.dim();
    let mut max = 0.0_f64;
    for i in 1..nx.saturating_sub(1) {
        for j in 1..ny.saturating_sub(1) {
            let div = (u[[i + 1, j]] - u[[i - 1, j]] + v[[i, j + 1]] - v[[i, j - 1]]) / (2.0 * dx);
            max = max.max(div.abs());
        }
    }
    max
}

/// Largest interior violation of the discrete Poisson equation
/// `p = 0.25 * (neighbors) - b`.
pub fn poisson_residual(p: &Field, b: &Field) -> f64 {
    let (nx, ny) = p.dim();
    let mut max = 0.0_f64;
    for i in 1..nx.saturating_sub(1) {
        for j in 1..ny.saturating_sub(1) {
            let rhs = 0.25 * (p[[i + 1, j]] + p[[i - 1, j]] + p[[i, j + 1]] + p[[i, j - 1]])
                - b[[i, j]];
            max = max.max((rhs - p[[i, j]]).abs());
        }
    }
    max
}

/// Largest deviation from the pressure wall rules (Neumann on low-y and both
/// x walls, zero on high-y). Zero right after a relaxation call.
pub fn pressure_bnd_violation(p: &Field) -> f64 {
    let (nx, ny) = p.dim();
    let mut max = 0.0_f64;
    for i in 0..nx {
        max = max.max((p[[i, 0]] - p[[i, 1]]).abs());
        max = max.max(p[[i, ny - 1]].abs());
    }
    for j in 0..ny {
        max = max.max((p[[0, j]] - p[[1, j]]).abs());
        max = max.max((p[[nx - 1, j]] - p[[nx - 2, j]]).abs());
    }
    max
}

/// Element-wise `|a - b| <= atol + rtol * |b|`, NaN never close.
/// Shapes must match.
pub fn fields_allclose(a: &Field, b: &Field, rtol: f64, atol: f64) -> bool {
    if a.dim() != b.dim() {
        return false;
    }
    Zip::from(a)
        .and(b)
        .fold(true, |ok, &x, &y| ok && (x - y).abs() <= atol + rtol * y.abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use crate::solver::boundary::set_pressure_bnd;

    const N: usize = 9;

    #[test]
    fn test_kinetic_energy_zero() {
        let u = Field::zeros((N, N));
        let v = Field::zeros((N, N));
        let ke = compute_kinetic_energy(&u, &v);
        assert!(ke.abs() < 1e-15, "KE should be 0 with no flow, got {}", ke);
    }

    #[test]
    fn test_kinetic_energy_uniform_flow() {
        let u = Field::from_elem((N, N), 1.0);
        let v = Field::zeros((N, N));
        let ke = compute_kinetic_energy(&u, &v);
        assert!((ke - 0.5).abs() < 1e-10, "KE should be 0.5, got {}", ke);
    }

    #[test]
    fn test_kinetic_energy_ignores_walls() {
        let mut u = Field::zeros((N, N));
        for i in 0..N {
            u[[i, N - 1]] = 1.0;
        }
        let v = Field::zeros((N, N));
        assert_eq!(compute_kinetic_energy(&u, &v), 0.0);
    }

    #[test]
    fn test_divergence_free_rotation() {
        // u = -y, v = x is solenoidal.
        let u = Field::from_shape_fn((N, N), |(_, j)| -(j as f64));
        let v = Field::from_shape_fn((N, N), |(i, _)| i as f64);
        assert_eq!(max_divergence(&u, &v, 0.1), 0.0);
    }

    #[test]
    fn test_divergence_of_expansion() {
        // u = x: du/dx = 1 with unit spacing.
        let u = Field::from_shape_fn((N, N), |(i, _)| i as f64);
        let v = Field::zeros((N, N));
        assert_abs_diff_eq!(max_divergence(&u, &v, 1.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_poisson_residual_of_harmonic_field() {
        // Linear fields are discrete-harmonic: with b = 0 the residual is 0.
        let p = Field::from_shape_fn((N, N), |(i, j)| 2.0 * i as f64 - j as f64);
        let b = Field::zeros((N, N));
        assert!(poisson_residual(&p, &b) < 1e-12);
        let b = Field::from_elem((N, N), 0.25);
        assert_abs_diff_eq!(poisson_residual(&p, &b), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_bnd_violation() {
        let mut p = Field::from_shape_fn((N, N), |(i, j)| (i * j) as f64);
        assert!(pressure_bnd_violation(&p) > 0.0);
        set_pressure_bnd(&mut p);
        assert_eq!(pressure_bnd_violation(&p), 0.0);
    }

    #[test]
    fn test_allclose() {
        let a = Field::from_elem((N, N), 1.0);
        let mut b = a.clone();
        assert!(fields_allclose(&a, &b, 1e-5, 1e-5));
        b[[3, 3]] += 1.5e-5;
        assert!(fields_allclose(&a, &b, 1e-5, 1e-5));
        b[[3, 3]] += 1e-4;
        assert!(!fields_allclose(&a, &b, 1e-5, 1e-5));
        b[[3, 3]] = f64::NAN;
        assert!(!fields_allclose(&a, &b, 1e-5, 1e-5));
        assert!(!fields_allclose(&a, &Field::zeros((N, N + 1)), 1e-5, 1e-5));
    }
}
