use crate::state::Field;

/// Field type for boundary condition dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Pressure,
    Vx,
    Vy,
}

/// Boundary condition handler for the lid-driven cavity.
/// The lid is the high-y wall (`j = ny - 1`).
pub fn set_bnd(field_type: FieldType, x: &mut Field, lid_velocity: f64) {
    match field_type {
        FieldType::Pressure => set_pressure_bnd(x),
        FieldType::Vx => set_vx_bnd(x, lid_velocity),
        FieldType::Vy => set_vy_bnd(x),
    }
}

/// Pressure walls, applied in a fixed order; later passes own the corners.
///   1. low-y: Neumann, `p[:,0] = p[:,1]`
///   2. high-y: Dirichlet, `p[:,-1] = 0`
///   3. low-x: Neumann, `p[0,:] = p[1,:]`
///   4. high-x: Neumann, `p[-1,:] = p[-2,:]`
pub fn set_pressure_bnd(p: &mut Field) {
    let (nx, ny) = p.dim();
    for i in 0..nx {
        p[[i, 0]] = p[[i, 1]];
    }
    for i in 0..nx {
        p[[i, ny - 1]] = 0.0;
    }
    for j in 0..ny {
        p[[0, j]] = p[[1, j]];
    }
    for j in 0..ny {
        p[[nx - 1, j]] = p[[nx - 2, j]];
    }
}

/// No-slip on the bottom and side walls, moving lid on top.
/// The lid pass runs last so the top corners carry the lid speed.
fn set_vx_bnd(u: &mut Field, lid_velocity: f64) {
    let (nx, ny) = u.dim();
    for i in 0..nx {
        u[[i, 0]] = 0.0;
    }
    for j in 0..ny {
        u[[0, j]] = 0.0;
        u[[nx - 1, j]] = 0.0;
    }
    for i in 0..nx {
        u[[i, ny - 1]] = lid_velocity;
    }
}

/// No penetration on all four walls.
fn set_vy_bnd(v: &mut Field) {
    let (nx, ny) = v.dim();
    for i in 0..nx {
        v[[i, 0]] = 0.0;
        v[[i, ny - 1]] = 0.0;
    }
    for j in 0..ny {
        v[[0, j]] = 0.0;
        v[[nx - 1, j]] = 0.0;
    }
}
