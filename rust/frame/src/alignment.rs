// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Local alignment corrections.
//!
//! A correction is expressed in the axes of the frame it corrects. The
//! translation is rotated into the parent frame before it moves the origin;
//! the rotation acts on the local unit axes, which are then re-expressed in
//! the parent frame. A rotation never moves the origin.

use nalgebra::{Rotation3, Vector3};

use crate::error::Result;
use crate::frame::{CoordinateSystem, Transform};
use crate::survey::SurveyResult;

/// Which half of a correction is applied first.
///
/// Some parts were surveyed with a procedure that expects the rotation before
/// the translation; the order is kept per part rather than unified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorrectionOrder {
    #[default]
    TranslateThenRotate,
    RotateThenTranslate,
}

/// An optional translation and rotation, plus an optional survey override.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignmentCorrection {
    /// Translation in the part's local axes (mm).
    pub translation: Option<Vector3<f64>>,
    /// Rotation in the part's local axes.
    pub rotation: Option<Rotation3<f64>>,
    /// Measured frame that replaces the nominal one before the corrections.
    pub survey: Option<SurveyResult>,
    pub order: CorrectionOrder,
}

impl AlignmentCorrection {
    pub fn new(translation: Option<Vector3<f64>>, rotation: Option<Rotation3<f64>>) -> Self {
        Self {
            translation,
            rotation,
            survey: None,
            order: CorrectionOrder::default(),
        }
    }

    /// A correction that does nothing unless a survey is attached.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_survey(mut self, survey: Option<SurveyResult>) -> Self {
        self.survey = survey;
        self
    }

    pub fn with_order(mut self, order: CorrectionOrder) -> Self {
        self.order = order;
        self
    }

    /// True when applying the correction cannot change a frame.
    pub fn is_identity(&self) -> bool {
        self.survey.is_none()
            && self.translation.map_or(true, |t| t == Vector3::zeros())
            && self.rotation.map_or(true, |r| r == Rotation3::identity())
    }

    /// Applies the survey override (if any), then translation and rotation in
    /// the configured order.
    ///
    /// `references` are the transforms of the owning part's reference frames,
    /// in the order they were composed.
    pub fn apply(&self, coord: &mut CoordinateSystem, references: &[Transform]) -> Result<()> {
        if let Some(survey) = &self.survey {
            survey.apply_to(coord, references)?;
        }
        match self.order {
            CorrectionOrder::TranslateThenRotate => {
                self.apply_translation(coord);
                self.apply_rotation(coord);
            }
            CorrectionOrder::RotateThenTranslate => {
                self.apply_rotation(coord);
                self.apply_translation(coord);
            }
        }
        Ok(())
    }

    fn apply_translation(&self, coord: &mut CoordinateSystem) {
        if let Some(local) = &self.translation {
            let in_mother = coord.transformation().apply_vector(local);
            tracing::trace!(?local, ?in_mother, "alignment translation");
            coord.translate(&in_mother);
        }
    }

    fn apply_rotation(&self, coord: &mut CoordinateSystem) {
        if let Some(rotation) = &self.rotation {
            let to_mother = coord.transformation().rotation;
            let u = to_mother * (rotation * Vector3::x());
            let v = to_mother * (rotation * Vector3::y());
            let w = to_mother * (rotation * Vector3::z());
            coord.set_axes(u, v, w);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angles::rotation_from_cardan;
    use crate::frame::SurveyTriple;
    use approx::assert_relative_eq;
    use nalgebra::Point3;
    use std::f64::consts::FRAC_PI_2;

    /// Frame at (5, 0, 0) with u along +y.
    fn turned() -> CoordinateSystem {
        CoordinateSystem::from_survey(&SurveyTriple::from_offsets(
            Point3::new(5.0, 0.0, 0.0),
            Vector3::y(),
            -Vector3::x(),
        ))
        .unwrap()
    }

    #[test]
    fn zero_correction_is_identity() {
        let c = AlignmentCorrection::new(
            Some(Vector3::zeros()),
            Some(rotation_from_cardan(0.0, 0.0, 0.0)),
        );
        assert!(c.is_identity());
        let mut frame = turned();
        c.apply(&mut frame, &[]).unwrap();
        assert_eq!(frame, turned());
    }

    #[test]
    fn absent_components_are_noops() {
        let mut frame = turned();
        AlignmentCorrection::none().apply(&mut frame, &[]).unwrap();
        assert_eq!(frame, turned());
    }

    #[test]
    fn translation_is_in_local_axes() {
        let mut frame = turned();
        AlignmentCorrection::new(Some(Vector3::new(1.0, 0.0, 0.0)), None)
            .apply(&mut frame, &[])
            .unwrap();
        // local x is mother +y
        assert_relative_eq!(frame.origin().x, 5.0, epsilon = 1e-12);
        assert_relative_eq!(frame.origin().y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn rotation_is_in_local_axes_and_keeps_origin() {
        let mut frame = turned();
        let r = Rotation3::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2);
        AlignmentCorrection::new(None, Some(r))
            .apply(&mut frame, &[])
            .unwrap();
        // local x -> local y, which is mother -x
        assert_relative_eq!(*frame.u(), -Vector3::x(), epsilon = 1e-12);
        assert_relative_eq!(*frame.w(), Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(frame.origin().x, 5.0);
    }

    #[test]
    fn order_changes_the_result() {
        let t = Some(Vector3::new(2.0, 0.0, 0.0));
        let r = Some(Rotation3::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2));

        let mut first = turned();
        AlignmentCorrection::new(t, r).apply(&mut first, &[]).unwrap();

        let mut second = turned();
        AlignmentCorrection::new(t, r)
            .with_order(CorrectionOrder::RotateThenTranslate)
            .apply(&mut second, &[])
            .unwrap();

        assert_relative_eq!(first.origin().y, 2.0, epsilon = 1e-12);
        // rotated local x is mother -x
        assert_relative_eq!(second.origin().x, 3.0, epsilon = 1e-12);
        assert_relative_eq!(*first.u(), *second.u(), epsilon = 1e-12);
    }
}
