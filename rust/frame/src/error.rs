// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for frame and alignment operations.

/// Result type alias for frame operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building frames or reading alignment constants.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Ball, vee and flat do not span a plane.
    #[error("degenerate survey points: {0}")]
    DegenerateSurvey(String),

    /// A measured survey frame has a zero-length or parallel axis.
    #[error("degenerate survey result axes: {0}")]
    DegenerateSurveyResult(String),

    /// A millepede parameter id does not decode to a valid half, kind or axis.
    #[error("invalid millepede parameter id {id}: {reason}")]
    InvalidMilleParameter { id: i32, reason: &'static str },

    /// A half-module selector did not find exactly three translations and three rotations.
    #[error(
        "Problem finding translation alignment parameters (found t {translations} r {rotations}) for {half} layer {layer}"
    )]
    AlignmentParameterCount {
        half: &'static str,
        layer: u32,
        translations: usize,
        rotations: usize,
    },

    /// A support-plate rotation parameter carried a sensor index.
    #[error("sensor name is not zero for support plate param! {0}")]
    NonZeroSupportSensor(u32),
}
