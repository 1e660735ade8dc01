// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Survey-point coordinate frames.
//!
//! A [`CoordinateSystem`] is an origin plus a right-handed orthonormal basis
//! `(u, v, w)` expressed in the frame of its parent. It is derived from three
//! survey points:
//!
//! - `origin` is the ball,
//! - `u` points from the ball to the vee,
//! - `w` is normal to the (ball, vee, flat) plane, `unit(u × (flat − ball))`,
//! - `v = w × u`.
//!
//! Only the directions of vee and flat relative to the ball matter. The
//! [`Transform`] of a frame maps coordinates local to the frame into its
//! parent: the rotation has `u, v, w` as columns and the translation is the
//! origin.

use std::fmt;
use std::ops::Mul;

use nalgebra::{Matrix3, Matrix4, Point3, Rotation3, Vector3};

use crate::angles::{cardan_angles, rotation_between_bases};
use crate::error::{Error, Result};

/// Below this length a direction is treated as zero.
pub const DEGENERACY_TOLERANCE: f64 = 1e-9;

/// The three survey points of a mechanical part, expressed in its parent frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurveyTriple {
    pub ball: Point3<f64>,
    pub vee: Point3<f64>,
    pub flat: Point3<f64>,
}

impl SurveyTriple {
    pub fn new(ball: Point3<f64>, vee: Point3<f64>, flat: Point3<f64>) -> Self {
        Self { ball, vee, flat }
    }

    /// Ball at `ball`, vee and flat offset from it.
    pub fn from_offsets(
        ball: Point3<f64>,
        vee_offset: Vector3<f64>,
        flat_offset: Vector3<f64>,
    ) -> Self {
        Self {
            ball,
            vee: ball + vee_offset,
            flat: ball + flat_offset,
        }
    }

    /// Triple whose frame is the parent frame shifted to `ball`.
    pub fn axis_aligned(ball: Point3<f64>) -> Self {
        Self::from_offsets(ball, Vector3::x(), Vector3::y())
    }
}

/// A rigid local-to-parent transformation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub rotation: Rotation3<f64>,
    pub translation: Vector3<f64>,
}

impl Transform {
    pub fn new(rotation: Rotation3<f64>, translation: Vector3<f64>) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    pub fn identity() -> Self {
        Self::new(Rotation3::identity(), Vector3::zeros())
    }

    /// Maps a point given in local coordinates into the parent frame.
    pub fn apply_point(&self, point: &Point3<f64>) -> Point3<f64> {
        self.rotation * point + self.translation
    }

    /// Rotates a direction into the parent frame. Translation is ignored.
    pub fn apply_vector(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * vector
    }

    /// `self ∘ inner`: apply `inner` first, then `self`.
    pub fn compose(&self, inner: &Transform) -> Transform {
        Transform {
            rotation: self.rotation * inner.rotation,
            translation: self.rotation * inner.translation + self.translation,
        }
    }

    pub fn inverse(&self) -> Transform {
        let rotation = self.rotation.inverse();
        Transform {
            rotation,
            translation: -(rotation * self.translation),
        }
    }

    /// Homogeneous 4x4 matrix; columns 0-2 hold the local axes, column 3 the origin.
    pub fn to_matrix(&self) -> Matrix4<f64> {
        let mut m = Matrix4::identity();
        m.fixed_view_mut::<3, 3>(0, 0)
            .copy_from(self.rotation.matrix());
        m.fixed_view_mut::<3, 1>(0, 3).copy_from(&self.translation);
        m
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        self.compose(&rhs)
    }
}

/// An origin plus a right-handed orthonormal basis, relative to a parent frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateSystem {
    origin: Point3<f64>,
    u: Vector3<f64>,
    v: Vector3<f64>,
    w: Vector3<f64>,
}

impl CoordinateSystem {
    /// Derives the frame from a survey triple.
    ///
    /// Fails with [`Error::DegenerateSurvey`] when the vee coincides with the
    /// ball or the three points are collinear.
    pub fn from_survey(triple: &SurveyTriple) -> Result<Self> {
        let to_vee = triple.vee - triple.ball;
        if to_vee.norm() < DEGENERACY_TOLERANCE {
            return Err(Error::DegenerateSurvey(format!(
                "vee {:?} coincides with ball {:?}",
                triple.vee.coords, triple.ball.coords
            )));
        }
        let u = to_vee.normalize();

        let normal = u.cross(&(triple.flat - triple.ball));
        if normal.norm() < DEGENERACY_TOLERANCE {
            return Err(Error::DegenerateSurvey(format!(
                "ball {:?}, vee {:?} and flat {:?} are collinear",
                triple.ball.coords, triple.vee.coords, triple.flat.coords
            )));
        }
        let w = normal.normalize();
        let v = w.cross(&u);

        Ok(Self {
            origin: triple.ball,
            u,
            v,
            w,
        })
    }

    /// The parent frame itself.
    pub fn identity() -> Self {
        Self {
            origin: Point3::origin(),
            u: Vector3::x(),
            v: Vector3::y(),
            w: Vector3::z(),
        }
    }

    /// Builds a frame from a transform; the inverse of [`Self::transformation`].
    pub fn from_transformation(transform: &Transform) -> Self {
        let m = transform.rotation.matrix();
        Self {
            origin: Point3::from(transform.translation),
            u: m.column(0).into_owned(),
            v: m.column(1).into_owned(),
            w: m.column(2).into_owned(),
        }
    }

    pub fn origin(&self) -> &Point3<f64> {
        &self.origin
    }

    pub fn u(&self) -> &Vector3<f64> {
        &self.u
    }

    pub fn v(&self) -> &Vector3<f64> {
        &self.v
    }

    pub fn w(&self) -> &Vector3<f64> {
        &self.w
    }

    /// Local-to-parent transformation of this frame.
    pub fn transformation(&self) -> Transform {
        let basis = Matrix3::from_columns(&[self.u, self.v, self.w]);
        Transform::new(
            Rotation3::from_matrix_unchecked(basis),
            self.origin.coords,
        )
    }

    /// Reinterprets this frame as expressed in the local space of `transform`
    /// and replaces it with the equivalent frame one level up.
    pub fn transform(&mut self, transform: &Transform) {
        self.origin = transform.apply_point(&self.origin);
        self.u = transform.apply_vector(&self.u);
        self.v = transform.apply_vector(&self.v);
        self.w = transform.apply_vector(&self.w);
    }

    /// Returns this frame composed through `reference`.
    pub fn compose(&self, reference: &CoordinateSystem) -> CoordinateSystem {
        let mut composed = *self;
        composed.transform(&reference.transformation());
        composed
    }

    /// Shifts the origin by a vector given in the parent frame.
    pub fn translate(&mut self, translation: &Vector3<f64>) {
        self.origin += *translation;
    }

    /// Rotates the axes by a rotation given in the parent frame. The origin stays.
    pub fn rotate(&mut self, rotation: &Rotation3<f64>) {
        self.u = rotation * self.u;
        self.v = rotation * self.v;
        self.w = rotation * self.w;
    }

    /// Replaces the axes. Callers pass an orthonormal right-handed basis.
    pub fn set_axes(&mut self, u: Vector3<f64>, v: Vector3<f64>, w: Vector3<f64>) {
        self.u = u;
        self.v = v;
        self.w = w;
    }

    /// XYZ Cardan angles of the rotation taking `(u, v, w)` onto the target basis.
    pub fn cardan_angles(
        &self,
        target_u: &Vector3<f64>,
        target_v: &Vector3<f64>,
        target_w: &Vector3<f64>,
    ) -> Vector3<f64> {
        let rotation = rotation_between_bases(
            [&self.u, &self.v, &self.w],
            [target_u, target_v, target_w],
        );
        cardan_angles(&rotation)
    }

    /// True when the axes are unit length, mutually orthogonal and right-handed.
    pub fn is_orthonormal(&self, epsilon: f64) -> bool {
        let unit = |a: &Vector3<f64>| (a.norm() - 1.0).abs() < epsilon;
        unit(&self.u)
            && unit(&self.v)
            && unit(&self.w)
            && self.u.dot(&self.v).abs() < epsilon
            && self.u.dot(&self.w).abs() < epsilon
            && self.v.dot(&self.w).abs() < epsilon
            && (self.u.cross(&self.v) - self.w).norm() < epsilon
    }
}

impl Default for CoordinateSystem {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "origin {} u {} v {} w {}",
            fmt_vec(&self.origin.coords),
            fmt_vec(&self.u),
            fmt_vec(&self.v),
            fmt_vec(&self.w)
        )
    }
}

/// `[ x, y, z ]` with fixed precision, for log and report output.
pub fn fmt_vec(v: &Vector3<f64>) -> String {
    format!("[ {:.5}, {:.5}, {:.5} ]", v.x, v.y, v.z)
}
