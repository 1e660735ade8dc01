// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rotation helpers: XYZ Cardan angles and basis-to-basis rotations.
//!
//! All rotations are active and right-handed. The Cardan convention is
//! `R = Rx(a1) · Ry(a2) · Rz(a3)`.

use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::error::{Error, Result};
use crate::frame::DEGENERACY_TOLERANCE;

/// Builds `Rx(a1) · Ry(a2) · Rz(a3)`.
pub fn rotation_from_cardan(a1: f64, a2: f64, a3: f64) -> Rotation3<f64> {
    Rotation3::from_axis_angle(&Vector3::x_axis(), a1)
        * Rotation3::from_axis_angle(&Vector3::y_axis(), a2)
        * Rotation3::from_axis_angle(&Vector3::z_axis(), a3)
}

/// Extracts `(a1, a2, a3)` such that `rotation_from_cardan(a1, a2, a3) == rotation`.
///
/// At gimbal lock (`|a2| = π/2`) the split between `a1` and `a3` is not
/// unique; `a3` is set to zero.
pub fn cardan_angles(rotation: &Rotation3<f64>) -> Vector3<f64> {
    let m = rotation.matrix();
    let sin_a2 = m[(0, 2)].clamp(-1.0, 1.0);
    let a2 = sin_a2.asin();

    if 1.0 - sin_a2.abs() < 1e-12 {
        let a1 = m[(2, 1)].atan2(m[(1, 1)]);
        return Vector3::new(a1, a2, 0.0);
    }

    let a1 = (-m[(1, 2)]).atan2(m[(2, 2)]);
    let a3 = (-m[(0, 1)]).atan2(m[(0, 0)]);
    Vector3::new(a1, a2, a3)
}

/// Rotation `R` with `R · from[i] = to[i]` for two orthonormal bases.
pub fn rotation_between_bases(
    from: [&Vector3<f64>; 3],
    to: [&Vector3<f64>; 3],
) -> Rotation3<f64> {
    let f = Matrix3::from_columns(&[*from[0], *from[1], *from[2]]);
    let t = Matrix3::from_columns(&[*to[0], *to[1], *to[2]]);
    Rotation3::from_matrix_unchecked(t * f.transpose())
}

/// Right-handed orthonormal basis whose first axis is along `first` and whose
/// second axis lies in the plane of `first` and `second`.
pub fn orthonormal_basis(
    first: &Vector3<f64>,
    second: &Vector3<f64>,
) -> Result<[Vector3<f64>; 3]> {
    let a = first
        .try_normalize(DEGENERACY_TOLERANCE)
        .ok_or_else(|| Error::DegenerateSurveyResult(format!("zero-length axis {first:?}")))?;
    let b = (second - a * a.dot(second))
        .try_normalize(DEGENERACY_TOLERANCE)
        .ok_or_else(|| {
            Error::DegenerateSurveyResult(format!("axes {first:?} and {second:?} are parallel"))
        })?;
    Ok([a, b, a.cross(&b)])
}

/// XYZ Cardan angles of the rotation taking the pair `(u, v)` onto `(target_u, target_v)`.
///
/// Both pairs are completed to right-handed orthonormal bases first.
pub fn cardan_angles_from_pairs(
    u: &Vector3<f64>,
    v: &Vector3<f64>,
    target_u: &Vector3<f64>,
    target_v: &Vector3<f64>,
) -> Result<Vector3<f64>> {
    let [a, b, c] = orthonormal_basis(u, v)?;
    let [ta, tb, tc] = orthonormal_basis(target_u, target_v)?;
    let rotation = rotation_between_bases([&a, &b, &c], [&ta, &tb, &tc]);
    Ok(cardan_angles(&rotation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn cardan_round_trip() {
        let (a1, a2, a3) = (0.3, -0.2, 1.1);
        let angles = cardan_angles(&rotation_from_cardan(a1, a2, a3));
        assert_relative_eq!(angles.x, a1, epsilon = 1e-12);
        assert_relative_eq!(angles.y, a2, epsilon = 1e-12);
        assert_relative_eq!(angles.z, a3, epsilon = 1e-12);
    }

    #[test]
    fn cardan_order_is_x_then_y_then_z_as_matrix_product() {
        let r = rotation_from_cardan(FRAC_PI_2, 0.0, FRAC_PI_2);
        // Rz acts first: x -> y, then Rx: y -> z.
        let mapped = r * Vector3::x();
        assert_relative_eq!(mapped.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn gimbal_lock_is_stable() {
        let r = rotation_from_cardan(0.4, FRAC_PI_2, 0.0);
        let angles = cardan_angles(&r);
        let rebuilt = rotation_from_cardan(angles.x, angles.y, angles.z);
        assert_relative_eq!(rebuilt.matrix(), r.matrix(), epsilon = 1e-9);
    }

    #[test]
    fn flipped_module_angles() {
        // Module with u along -y (tilted 30 mrad) and v along -z.
        let u = Vector3::new(0.03, -0.99955, 0.0);
        let v = Vector3::new(0.0, 0.0, -1.0);
        let angles =
            cardan_angles_from_pairs(&u, &v, &Vector3::y(), &Vector3::z()).unwrap();
        assert_relative_eq!(angles.x.abs(), PI, epsilon = 1e-9);
        assert_relative_eq!(angles.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(angles.z, -0.030005, epsilon = 1e-5);
    }

    #[test]
    fn basis_rotation_maps_axes() {
        let from = [Vector3::x(), Vector3::y(), Vector3::z()];
        let to = [Vector3::y(), -Vector3::x(), Vector3::z()];
        let r = rotation_between_bases(
            [&from[0], &from[1], &from[2]],
            [&to[0], &to[1], &to[2]],
        );
        assert_relative_eq!(r * from[0], to[0], epsilon = 1e-12);
        assert_relative_eq!(r * from[1], to[1], epsilon = 1e-12);
    }

    #[test]
    fn parallel_axes_have_no_basis() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        assert!(orthonormal_basis(&a, &(a * 2.0)).is_err());
    }
}
