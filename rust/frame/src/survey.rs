// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Measured survey frames that override a part's nominal frame.
//!
//! Survey data is recorded in the metrology convention of each part type, so
//! a result is first [adjusted](SurveyResult::adjusted) to the geometry
//! convention of its target, then carried through the part's reference
//! frames, and finally replaces the part's origin and axes.

use std::f64::consts::{FRAC_PI_2, PI};

use nalgebra::{Point3, Rotation3, Vector3};

use crate::angles::{orthonormal_basis, rotation_between_bases};
use crate::error::Result;
use crate::frame::{fmt_vec, CoordinateSystem, Transform};

/// Millimetres per inch.
pub const INCH: f64 = 25.4;

/// Which U-channel family a survey belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UChannelGroup {
    L13,
    L46,
}

/// Part type a survey result was measured on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurveyTarget {
    Module { top: bool },
    HalfModule,
    KinMount { top: bool },
    UChannel { group: UChannelGroup, top: bool },
}

/// A measured origin and axis triplet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurveyResult {
    pub origin: Point3<f64>,
    pub x: Vector3<f64>,
    pub y: Vector3<f64>,
    pub z: Vector3<f64>,
}

impl SurveyResult {
    pub fn new(origin: Point3<f64>, x: Vector3<f64>, y: Vector3<f64>, z: Vector3<f64>) -> Self {
        Self { origin, x, y, z }
    }

    /// Moves the origin and axes one frame up.
    pub fn transform(&mut self, transform: &Transform) {
        self.origin = transform.apply_point(&self.origin);
        self.x = transform.apply_vector(&self.x);
        self.y = transform.apply_vector(&self.y);
        self.z = transform.apply_vector(&self.z);
    }

    /// Rotates the origin and the axes about the parent origin.
    pub fn rotate(&mut self, rotation: &Rotation3<f64>) {
        self.origin = rotation * self.origin;
        self.x = rotation * self.x;
        self.y = rotation * self.y;
        self.z = rotation * self.z;
    }

    pub fn translate(&mut self, translation: &Vector3<f64>) {
        self.origin += *translation;
    }

    /// Converts the measurement from the metrology convention of `target`
    /// into the geometry convention.
    pub fn adjusted(&self, target: SurveyTarget) -> SurveyResult {
        let mut s = *self;
        match target {
            SurveyTarget::Module { top: true } => {
                s.rotate(&rx(-FRAC_PI_2));
                s.swap_xy();
            }
            SurveyTarget::Module { top: false } => {
                s.rotate(&(rz(PI) * rx(FRAC_PI_2)));
                s.swap_xy();
            }
            SurveyTarget::HalfModule => {
                let shift = s.z * -0.160;
                s.translate(&shift);
                s.rotate(&rz(FRAC_PI_2));
                s.swap_xy();
            }
            SurveyTarget::KinMount { .. } => {
                s.shift_from_base_plate();
                s.rotate(&rx(FRAC_PI_2));
                let (y, z) = (-s.z, s.y);
                s.y = y;
                s.z = z;
            }
            SurveyTarget::UChannel { group, top } => {
                if group == UChannelGroup::L46 {
                    s.shift_from_base_plate();
                }
                s.rotate(&rx(FRAC_PI_2));
                if top {
                    let (y, z) = (s.z, -s.y);
                    s.y = y;
                    s.z = z;
                } else {
                    let (x, y, z) = (-s.x, s.z, s.y);
                    s.x = x;
                    s.y = y;
                    s.z = z;
                }
            }
        }
        tracing::trace!(?target, before = %self, after = %s, "adjusted survey result");
        s
    }

    /// Replaces the origin and axes of `coord` with this measurement.
    ///
    /// The result is carried through `references` in order first. The measured
    /// axes are re-orthonormalized from `x` and `y` before the rotation is
    /// computed.
    pub fn apply_to(&self, coord: &mut CoordinateSystem, references: &[Transform]) -> Result<()> {
        let mut s = *self;
        for reference in references {
            s.transform(reference);
        }

        let shift = s.origin - coord.origin();
        coord.translate(&shift);

        let [x, y, z] = orthonormal_basis(&s.x, &s.y)?;
        let rotation = rotation_between_bases([coord.u(), coord.v(), coord.w()], [&x, &y, &z]);
        coord.rotate(&rotation);
        Ok(())
    }

    // (x, y) <- (-y, x)
    fn swap_xy(&mut self) {
        let (x, y) = (-self.y, self.x);
        self.x = x;
        self.y = y;
    }

    // Kin mount and L4-6 U-channel surveys are taken from the base plate surface.
    fn shift_from_base_plate(&mut self) {
        self.origin -= Vector3::new(0.0, 0.0, -0.375 * INCH);
        self.origin -= Vector3::new(0.0, 0.0, 50.5 * INCH / 2.0);
    }
}

impl std::fmt::Display for SurveyResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "origin {} x {} y {} z {}",
            fmt_vec(&self.origin.coords),
            fmt_vec(&self.x),
            fmt_vec(&self.y),
            fmt_vec(&self.z)
        )
    }
}

fn rx(angle: f64) -> Rotation3<f64> {
    Rotation3::from_axis_angle(&Vector3::x_axis(), angle)
}

fn rz(angle: f64) -> Rotation3<f64> {
    Rotation3::from_axis_angle(&Vector3::z_axis(), angle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::frame::SurveyTriple;
    use approx::assert_relative_eq;

    fn aligned(origin: Point3<f64>) -> SurveyResult {
        SurveyResult::new(origin, Vector3::x(), Vector3::y(), Vector3::z())
    }

    fn assert_axes(s: &SurveyResult, x: Vector3<f64>, y: Vector3<f64>, z: Vector3<f64>) {
        assert_relative_eq!(s.x, x, epsilon = 1e-12);
        assert_relative_eq!(s.y, y, epsilon = 1e-12);
        assert_relative_eq!(s.z, z, epsilon = 1e-12);
    }

    #[test]
    fn rotate_turns_origin_and_axes() {
        let mut s = aligned(Point3::new(1.0, 0.0, 0.0));
        s.rotate(&rz(FRAC_PI_2));
        assert_relative_eq!(s.origin.coords, Vector3::y(), epsilon = 1e-12);
        assert_axes(&s, Vector3::y(), -Vector3::x(), Vector3::z());
    }

    #[test]
    fn top_module_adjustment() {
        let s = aligned(Point3::new(1.0, 2.0, 3.0)).adjusted(SurveyTarget::Module { top: true });
        // Rx(-pi/2)
        assert_relative_eq!(s.origin.coords, Vector3::new(1.0, 3.0, -2.0), epsilon = 1e-12);
        assert_axes(&s, Vector3::z(), Vector3::x(), Vector3::y());
    }

    #[test]
    fn bottom_module_adjustment() {
        let s = aligned(Point3::new(10.0, 20.0, 30.0)).adjusted(SurveyTarget::Module { top: false });
        // Rz(pi)·Rx(pi/2)
        assert_relative_eq!(s.origin.coords, Vector3::new(-10.0, 30.0, 20.0), epsilon = 1e-12);
        assert_axes(&s, -Vector3::z(), -Vector3::x(), Vector3::y());
    }

    #[test]
    fn half_module_adjustment_shifts_along_normal_then_rotates() {
        let s = aligned(Point3::new(1.0, 2.0, 3.0)).adjusted(SurveyTarget::HalfModule);
        assert_relative_eq!(s.origin.coords, Vector3::new(-2.0, 1.0, 3.0 - 0.160), epsilon = 1e-12);
        assert_axes(&s, Vector3::x(), Vector3::y(), Vector3::z());
    }

    #[test]
    fn kin_mount_adjustment_moves_to_box_center() {
        for top in [false, true] {
            let s = aligned(Point3::new(1.0, 2.0, 3.0)).adjusted(SurveyTarget::KinMount { top });
            let z = 3.0 + 0.375 * INCH - 25.25 * INCH;
            assert_relative_eq!(s.origin.coords, Vector3::new(1.0, -z, 2.0), epsilon = 1e-9);
            assert_axes(&s, Vector3::x(), Vector3::y(), Vector3::z());
        }
    }

    #[test]
    fn l46_u_channel_adjustments() {
        let z = 3.0 + 0.375 * INCH - 25.25 * INCH;
        let top = aligned(Point3::new(1.0, 2.0, 3.0)).adjusted(SurveyTarget::UChannel {
            group: UChannelGroup::L46,
            top: true,
        });
        assert_relative_eq!(top.origin.coords, Vector3::new(1.0, -z, 2.0), epsilon = 1e-9);
        assert_axes(&top, Vector3::x(), -Vector3::y(), -Vector3::z());

        let bottom = aligned(Point3::new(1.0, 2.0, 3.0)).adjusted(SurveyTarget::UChannel {
            group: UChannelGroup::L46,
            top: false,
        });
        assert_relative_eq!(bottom.origin.coords, Vector3::new(1.0, -z, 2.0), epsilon = 1e-9);
        assert_axes(&bottom, -Vector3::x(), -Vector3::y(), Vector3::z());
    }

    #[test]
    fn l13_u_channel_adjustments() {
        let top = aligned(Point3::new(1.0, 2.0, 3.0)).adjusted(SurveyTarget::UChannel {
            group: UChannelGroup::L13,
            top: true,
        });
        // Rx(pi/2), no shift
        assert_relative_eq!(top.origin.coords, Vector3::new(1.0, -3.0, 2.0), epsilon = 1e-12);
        assert_axes(&top, Vector3::x(), -Vector3::y(), -Vector3::z());

        let bottom = aligned(Point3::new(1.0, 2.0, 3.0)).adjusted(SurveyTarget::UChannel {
            group: UChannelGroup::L13,
            top: false,
        });
        assert_relative_eq!(bottom.origin.coords, Vector3::new(1.0, -3.0, 2.0), epsilon = 1e-12);
        assert_axes(&bottom, -Vector3::x(), -Vector3::y(), Vector3::z());
    }

    #[test]
    fn apply_replaces_frame() {
        let mut coord = CoordinateSystem::from_survey(&SurveyTriple::axis_aligned(Point3::new(
            4.0, 5.0, 6.0,
        )))
        .unwrap();
        let survey = SurveyResult::new(
            Point3::new(-1.0, 0.5, 2.0),
            Vector3::y(),
            Vector3::z(),
            Vector3::x(),
        );
        survey.apply_to(&mut coord, &[]).unwrap();
        assert_relative_eq!(coord.origin().coords, survey.origin.coords, epsilon = 1e-12);
        assert_relative_eq!(*coord.u(), Vector3::y(), epsilon = 1e-12);
        assert_relative_eq!(*coord.v(), Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(*coord.w(), Vector3::x(), epsilon = 1e-12);
    }

    #[test]
    fn apply_carries_through_references() {
        let mut coord = CoordinateSystem::identity();
        let reference = Transform::new(
            Rotation3::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2),
            Vector3::new(10.0, 0.0, 0.0),
        );
        aligned(Point3::new(1.0, 0.0, 0.0))
            .apply_to(&mut coord, &[reference])
            .unwrap();
        assert_relative_eq!(coord.origin().coords, Vector3::new(10.0, 1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(*coord.u(), Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn skewed_axes_are_orthonormalized() {
        let mut coord = CoordinateSystem::identity();
        let survey = SurveyResult::new(
            Point3::origin(),
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::new(0.01, 1.0, 0.0),
            Vector3::z(),
        );
        survey.apply_to(&mut coord, &[]).unwrap();
        assert!(coord.is_orthonormal(1e-12));
        assert_relative_eq!(*coord.u(), Vector3::x(), epsilon = 1e-12);
    }

    #[test]
    fn parallel_axes_are_rejected() {
        let mut coord = CoordinateSystem::identity();
        let survey =
            SurveyResult::new(Point3::origin(), Vector3::x(), Vector3::x(), Vector3::z());
        assert!(matches!(
            survey.apply_to(&mut coord, &[]),
            Err(Error::DegenerateSurveyResult(_))
        ));
    }
}
