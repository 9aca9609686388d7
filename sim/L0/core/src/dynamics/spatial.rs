//! Spatial algebra utilities for 6D motion and force vectors.
//!
//! Implements Featherstone's spatial vector algebra used by the dynamics
//! pipeline (CRBA, RNE, Jacobians). All spatial quantities are expressed in
//! world coordinates about the world origin, so no frame transforms are
//! needed between bodies. Functions here are pure math.

use nalgebra::{Matrix3, Matrix6, Vector3, Vector6};

/// 6D spatial vector: [angular (3), linear (3)].
///
/// Following Featherstone's convention:
/// - Motion vectors: [ω, v] (angular velocity, linear velocity)
/// - Force vectors: [τ, f] (torque, force)
pub type SpatialVector = Vector6<f64>;

/// Split a spatial vector into its angular and linear parts.
#[inline]
#[must_use]
pub fn split(v: &SpatialVector) -> (Vector3<f64>, Vector3<f64>) {
    (
        Vector3::new(v[0], v[1], v[2]),
        Vector3::new(v[3], v[4], v[5]),
    )
}

/// Assemble a spatial vector from angular and linear parts.
#[inline]
#[must_use]
pub fn join(angular: &Vector3<f64>, linear: &Vector3<f64>) -> SpatialVector {
    SpatialVector::new(
        angular.x, angular.y, angular.z, linear.x, linear.y, linear.z,
    )
}

/// Spatial cross product for motion vectors: v × s.
#[allow(clippy::inline_always)] // Profiling shows inlining improves debug performance
#[inline(always)]
#[must_use]
pub fn spatial_cross_motion(v: SpatialVector, s: SpatialVector) -> SpatialVector {
    let (w, v_lin) = split(&v);
    let (s_ang, s_lin) = split(&s);
    join(&w.cross(&s_ang), &(w.cross(&s_lin) + v_lin.cross(&s_ang)))
}

/// Spatial cross product for force vectors: v ×* f.
#[allow(clippy::inline_always)] // Profiling shows inlining improves debug performance
#[inline(always)]
#[must_use]
pub fn spatial_cross_force(v: SpatialVector, f: SpatialVector) -> SpatialVector {
    let (w, v_lin) = split(&v);
    let (f_ang, f_lin) = split(&f);
    join(&(w.cross(&f_ang) + v_lin.cross(&f_lin)), &w.cross(&f_lin))
}

/// Motion subspace of a pin with unit axis `axis` through point `anchor`
/// (both world frame): `[a; o × a]`.
#[inline]
#[must_use]
pub fn pin_motion_subspace(axis: &Vector3<f64>, anchor: &Vector3<f64>) -> SpatialVector {
    join(axis, &anchor.cross(axis))
}

/// Spatial force of a force `force` applied at world point `point` plus a
/// pure torque, about the world origin.
#[inline]
#[must_use]
pub fn point_wrench(
    point: &Vector3<f64>,
    force: &Vector3<f64>,
    torque: &Vector3<f64>,
) -> SpatialVector {
    join(&(point.cross(force) + torque), force)
}

/// Body spatial inertia about the world origin.
///
/// - `mass`: body mass
/// - `i_com`: rotational inertia about the COM, world axes
/// - `h`: COM position in world frame
///
/// The spatial inertia has the form:
/// ```text
/// I = [I_com + m*(h·h*I - h⊗h),  m*[h]×  ]
///     [m*[h]×ᵀ,                  m*I_3×3 ]
/// ```
#[must_use]
pub fn body_spatial_inertia(mass: f64, i_com: &Matrix3<f64>, h: &Vector3<f64>) -> Matrix6<f64> {
    let mut crb = Matrix6::zeros();

    // Upper-left 3x3: rotational inertia about the origin (parallel axis theorem)
    let rot = i_com + (Matrix3::identity() * h.norm_squared() - h * h.transpose()) * mass;
    crb.fixed_view_mut::<3, 3>(0, 0).copy_from(&rot);

    // Lower-right 3x3: translational inertia
    crb.fixed_view_mut::<3, 3>(3, 3)
        .copy_from(&(Matrix3::identity() * mass));

    // Off-diagonal: coupling (skew-symmetric of m*h)
    let mh = h.cross_matrix() * mass;
    crb.fixed_view_mut::<3, 3>(0, 3).copy_from(&mh);
    crb.fixed_view_mut::<3, 3>(3, 0).copy_from(&mh.transpose());

    crb
}
