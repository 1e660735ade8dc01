// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Nominal dimensions and survey positions of the 2014 tracker.
//!
//! Lengths are millimetres. Values quoted in inches on the drawings are
//! multiplied by [`INCH`] here so every constant carries its drawing value.

use svt_survey_frame::INCH;

/// Highest millepede sensor index in the 2014 layout (layer 6, top/bottom slot stereo).
pub const MAX_MILLEPEDE_LAYER: u32 = 18;

/// Number of layers the build loop visits.
pub const LAYER_COUNT: u8 = 6;

/// Stereo angle of layers 1-3 (rad).
pub const STEREO_ANGLE_L13: f64 = 0.1;
/// Stereo angle of layers 4-6 (rad).
pub const STEREO_ANGLE_L46: f64 = 0.05;

// =============================================================================
// Vacuum chamber and SVT box
// =============================================================================

/// Target position in the SVT box frame.
pub const TARGET_FROM_BOX_CENTER: [f64; 3] = [0.84 * INCH, 0.0, 13.777 * INCH];

pub const CHAMBER_WIDTH: f64 = 17.0 * INCH;
pub const CHAMBER_LENGTH: f64 = 52.0 * INCH;
pub const CHAMBER_HEIGHT: f64 = 7.0 * INCH;

pub const BOX_HEIGHT: f64 = 6.740 * INCH;

pub const BASE_PLATE_WIDTH: f64 = 16.0 * INCH;
pub const BASE_PLATE_LENGTH: f64 = 50.5 * INCH;
pub const BASE_PLATE_HEIGHT: f64 = 0.25 * INCH;
pub const KIN_MOUNT_TO_PLATE_EDGE_X: f64 = (8.0 - 5.0) * INCH;
pub const KIN_MOUNT_TO_PLATE_EDGE_Y: f64 = 0.375 * INCH;

// =============================================================================
// L1-3 support
// =============================================================================

pub const KIN_MOUNT_X: f64 = -138.665;
pub const KIN_MOUNT_Y: f64 = -67.855;
pub const KIN_MOUNT_Z_BOTTOM: f64 = -67.996;
pub const KIN_MOUNT_Z_TOP: f64 = 56.857;

pub const U_CHANNEL_HEIGHT: f64 = 2.575 * INCH;
pub const SIDE_PLATE_CONE_Y: f64 = 2.0 * INCH;

pub const L13_PLATE_WIDTH: f64 = 9.25 * INCH;
pub const L13_PLATE_LENGTH: f64 = 16.0 * INCH;
pub const L13_PLATE_HEIGHT: f64 = 0.375 * INCH;

pub const L13_CONE_TO_EDGE_BOTTOM: f64 = 12.25 * INCH;
pub const L13_CONE_TO_EDGE_TOP: f64 = 12.875 * INCH;
pub const L13_PIN_TO_EDGE_BOTTOM: f64 = (16.0 - 4.126) * INCH;
pub const L13_PIN_TO_EDGE_TOP: f64 = (16.0 - 2.75) * INCH;

/// Midpoint of the forward survey balls, in the SVT box frame.
pub const L13_BALL_BOTTOM: [f64; 3] = [-46.446, 241.184, -8.423];
pub const L13_BALL_TOP: [f64; 3] = [-46.930, 257.052, 8.423];

// Survey cones on the drawing. Only their differences are used, as directions.
pub const L13_BOTTOM_FWD_RIGHT: [f64; 3] = [-6.493, 9.353, -0.332];
pub const L13_BOTTOM_BWD_RIGHT: [f64; 3] = [-6.253, 1.483, -0.332];
pub const L13_BOTTOM_FWD_LEFT: [f64; 3] = [2.836, 9.638, -0.332];
pub const L13_TOP_FWD_RIGHT: [f64; 3] = [-6.512, 9.978, 0.332];
pub const L13_TOP_FWD_LEFT: [f64; 3] = [2.817, 10.262, 0.332];
pub const L13_TOP_BWD_LEFT: [f64; 3] = [3.057, 2.392, 0.332];

// =============================================================================
// L4-6 support
// =============================================================================

pub const L46_PLATE_WIDTH: f64 = 13.5 * INCH;
pub const L46_PLATE_LENGTH: f64 = 21.0 * INCH;
pub const L46_PLATE_HEIGHT: f64 = 0.5 * INCH;

pub const L46_CONE_TO_EDGE_BOTTOM: f64 = 2.75 * INCH;
pub const L46_CONE_TO_EDGE_TOP: f64 = 2.125 * INCH;
pub const L46_PIN_TO_EDGE_BOTTOM: f64 = 3.125 * INCH;
pub const L46_PIN_TO_EDGE_TOP: f64 = 1.75 * INCH;

pub const L46_BALL_BOTTOM: [f64; 3] = [-5.857, -157.776, -8.423];
pub const L46_BALL_TOP: [f64; 3] = [-6.341, -141.909, 8.423];

pub const L46_BOTTOM_FWD_RIGHT: [f64; 3] = [-7.019 * INCH, -6.419 * INCH, -0.332 * INCH];
pub const L46_BOTTOM_FWD_LEFT: [f64; 3] = [6.558 * INCH, -6.005 * INCH, -0.332 * INCH];
pub const L46_BOTTOM_BWD_LEFT: [f64; 3] = [7.038 * INCH, -21.745 * INCH, -0.332 * INCH];
pub const L46_TOP_FWD_RIGHT: [f64; 3] = [-7.038 * INCH, -5.794 * INCH, 0.332 * INCH];
pub const L46_TOP_FWD_LEFT: [f64; 3] = [6.539 * INCH, -5.380 * INCH, 0.332 * INCH];
pub const L46_TOP_BWD_RIGHT: [f64; 3] = [-6.558 * INCH, -21.535 * INCH, 0.332 * INCH];

// =============================================================================
// Modules
// =============================================================================

pub const MODULE_WIDTH: f64 = 2.5 * INCH + 0.04 * INCH + 0.5 * INCH;
pub const MODULE_HEIGHT: f64 = 1.0 * INCH - 0.45 * INCH;
pub const L13_MODULE_LENGTH: f64 = 8.0 * INCH + 10.0;
pub const L46_MODULE_LENGTH: f64 = 12.25 * INCH;
pub const HOLE_TO_MODULE_EDGE_LENGTH: f64 = 0.25 * INCH;

/// Mounting hole across the U-channel; top modules sit on the other side.
pub const L13_HOLE_ACROSS: f64 = 95.25;
pub const L13_HOLE_ALONG_BOTTOM: [f64; 3] = [9.525, 109.525, 209.525];
pub const L13_HOLE_ALONG_TOP: [f64; 3] = [-9.525, 90.475, 190.475];
pub const L13_HOLE_VERTICAL_L1: f64 = -51.435;
pub const L13_HOLE_VERTICAL_STEP: f64 = 1.5;

pub const L46_HOLE_ACROSS: f64 = 149.225;
pub const L46_HOLE_ALONG_L4: f64 = 9.525;
pub const L46_HOLE_ALONG_STEP: f64 = 200.0;
pub const L46_HOLE_VERTICAL_L4: f64 = -53.34;
pub const L46_HOLE_VERTICAL_STEP: f64 = 3.0;

// =============================================================================
// Half-modules and their parts
// =============================================================================

pub const SENSOR_WIDTH: f64 = 40.34;
pub const SENSOR_LENGTH: f64 = 100.0;
pub const SENSOR_THICKNESS: f64 = 0.32;
pub const ACTIVE_SENSOR_WIDTH: f64 = 38.3399;
pub const ACTIVE_SENSOR_LENGTH: f64 = 98.33;

pub const L13_LAMINATION_WIDTH: f64 = 38.0;
pub const L13_LAMINATION_THICKNESS: f64 = 0.050;
pub const L46_LAMINATION_THICKNESS: f64 = 0.050;

pub const CARBON_FIBER_WIDTH: f64 = 36.02;
pub const CARBON_FIBER_LENGTH: f64 = 100.0;
pub const CARBON_FIBER_THICKNESS: f64 = 0.203;

pub const HYBRID_THICKNESS: f64 = 4.0 / 64.0 * INCH;
/// Sensor plus hybrid along the strips.
pub const SENSOR_AND_HYBRID_LENGTH: f64 = 170.0;
pub const HYBRID_LENGTH: f64 = SENSOR_AND_HYBRID_LENGTH - SENSOR_LENGTH;

pub const L13_HALF_MODULE_WIDTH: f64 = 6.83 + SENSOR_WIDTH;
pub const L13_HALF_MODULE_LENGTH: f64 = CARBON_FIBER_LENGTH;
pub const L13_HALF_MODULE_THICKNESS: f64 =
    HYBRID_THICKNESS + CARBON_FIBER_THICKNESS + L13_LAMINATION_THICKNESS;

pub const L13_AXIAL_SENSOR: [f64; 3] = [-1.543 * INCH, 4.868 * INCH, -0.23 * INCH];
pub const L13_STEREO_SENSOR_Z: f64 = -0.52 * INCH;

pub const L46_AXIAL_HOLE_SENSOR: [f64; 3] = [-1.382 * INCH, 3.887 * INCH, -0.23 * INCH];
pub const L46_AXIAL_SLOT_SENSOR: [f64; 3] = [-1.382 * INCH, 7.863 * INCH, -0.23 * INCH];
pub const L46_STEREO_HOLE_SENSOR: [f64; 3] = [-1.282 * INCH, 3.889 * INCH, -0.52 * INCH];
pub const L46_STEREO_SLOT_SENSOR: [f64; 3] = [-1.481 * INCH, 7.861 * INCH, -0.52 * INCH];

pub const L46_HALF_MODULE_THICKNESS: f64 = 0.37;
/// Sensor center to the half-module box center along w.
pub const L46_HALF_MODULE_CENTER_Z: f64 = SENSOR_THICKNESS / 2.0 - 0.185;
