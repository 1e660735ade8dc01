// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # SVT Survey Frame
//!
//! Coordinate frames derived from survey points (ball, vee, flat) on the
//! mechanical parts of a silicon-strip tracker, and the corrections that
//! move them: millepede alignment constants and measured survey results.
//!
//! All lengths are millimetres and all angles radians.
//!
//! ```
//! use nalgebra::Point3;
//! use svt_survey_frame::{CoordinateSystem, SurveyTriple};
//!
//! let triple = SurveyTriple::new(
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(2.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//! );
//! let frame = CoordinateSystem::from_survey(&triple).unwrap();
//! assert_eq!(frame.origin().x, 1.0);
//! ```

pub mod alignment;
pub mod angles;
pub mod error;
pub mod frame;
pub mod mille;
pub mod survey;

pub use alignment::{AlignmentCorrection, CorrectionOrder};
pub use angles::{cardan_angles, cardan_angles_from_pairs, rotation_from_cardan};
pub use error::{Error, Result};
pub use frame::{fmt_vec, CoordinateSystem, SurveyTriple, Transform, DEGENERACY_TOLERANCE};
pub use mille::{MilleKind, MilleParameter, MilleSelector, MilleTable};
pub use survey::{SurveyResult, SurveyTarget, UChannelGroup, INCH};
