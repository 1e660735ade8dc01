// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Part kinds of the 2014 tracker and the geometry each one contributes.
//!
//! A [`PartKind`] knows its survey points in the mother frame, its box, its
//! material and its generic correction. Mothers, references and alignment
//! corrections are wired up by the builder, which knows the build order.

use std::f64::consts::PI;

use nalgebra::{Point3, Rotation3, Vector3};
use svt_survey_frame::{SurveyTarget, SurveyTriple, UChannelGroup};
use svt_survey_tree::{
    BuildConfig, Half, ModulePosition, NodeKind, NodeMeta, NodeSpec, PointSource,
    SensorOrientation,
};

use crate::constants::*;

/// Materials assigned to boxed parts.
pub mod material {
    pub const VACUUM: &str = "Vacuum";
    pub const ALUMINUM: &str = "Aluminum";
    pub const SILICON: &str = "Silicon";
    pub const KAPTON: &str = "Kapton";
    pub const CARBON_FIBER: &str = "CarbonFiber";
    pub const G10: &str = "G10";
}

/// Identity of one half-module, shared by the parts built under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HalfModuleId {
    pub layer: u8,
    pub half: Half,
    pub orientation: SensorOrientation,
    /// Hole or slot, for layers 4-6 only.
    pub position: Option<ModulePosition>,
}

impl HalfModuleId {
    pub fn is_short(&self) -> bool {
        self.layer <= 3
    }

    fn meta(&self) -> NodeMeta {
        NodeMeta::half_module(self.layer, self.half, self.orientation, self.position)
    }
}

/// Every kind of part in the 2014 tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PartKind {
    TrackingVolume,
    Chamber,
    Base,
    BasePlate,
    KinMount { half: Half },
    UChannel { group: UChannelGroup, half: Half },
    SupportPlate { group: UChannelGroup, half: Half },
    Module { layer: u8, half: Half },
    HalfModule(HalfModuleId),
    Sensor(HalfModuleId),
    ActiveSensor(HalfModuleId),
    Lamination(HalfModuleId),
    CarbonFiber(HalfModuleId),
    Hybrid(HalfModuleId),
}

fn first_layer(group: UChannelGroup) -> u8 {
    match group {
        UChannelGroup::L13 => 1,
        UChannelGroup::L46 => 4,
    }
}

fn v(a: [f64; 3]) -> Vector3<f64> {
    Vector3::from(a)
}

fn at(a: [f64; 3]) -> Point3<f64> {
    Point3::from(a)
}

// Ball with vee along +x and flat along +y of the mother.
fn aligned(ball: [f64; 3]) -> SurveyTriple {
    SurveyTriple::axis_aligned(at(ball))
}

impl PartKind {
    /// Structured identity; the node name derives from it.
    pub fn meta(&self) -> NodeMeta {
        match *self {
            PartKind::TrackingVolume => NodeMeta::fixed(NodeKind::TrackingVolume),
            PartKind::Chamber => NodeMeta::fixed(NodeKind::Chamber),
            PartKind::Base => NodeMeta::fixed(NodeKind::Base),
            PartKind::BasePlate => NodeMeta::fixed(NodeKind::BasePlate),
            PartKind::KinMount { half } => NodeMeta::kin_mount(half),
            PartKind::UChannel { group, half } => NodeMeta::u_channel(first_layer(group), half),
            PartKind::SupportPlate { group, half } => {
                NodeMeta::support_plate(first_layer(group), half)
            }
            PartKind::Module { layer, half } => NodeMeta::module(layer, half),
            PartKind::HalfModule(id) => id.meta(),
            PartKind::Sensor(id) => id.meta().with_kind(NodeKind::Sensor),
            PartKind::ActiveSensor(id) => id.meta().with_kind(NodeKind::ActiveSensor),
            PartKind::Lamination(id) => id.meta().with_kind(NodeKind::Lamination),
            PartKind::CarbonFiber(id) => id.meta().with_kind(NodeKind::CarbonFiber),
            PartKind::Hybrid(id) => id.meta().with_kind(NodeKind::Hybrid),
        }
    }

    pub fn name(&self) -> String {
        self.meta().display_name()
    }

    /// Ball, vee and flat in the mother frame (before any reference).
    pub fn survey_triple(&self) -> SurveyTriple {
        match *self {
            PartKind::TrackingVolume | PartKind::Base => aligned([0.0; 3]),
            PartKind::Chamber => {
                SurveyTriple::from_offsets(at(TARGET_FROM_BOX_CENTER), Vector3::x(), -Vector3::z())
            }
            PartKind::BasePlate => aligned([
                -BASE_PLATE_WIDTH / 2.0 + KIN_MOUNT_TO_PLATE_EDGE_X,
                -BASE_PLATE_LENGTH / 2.0 + KIN_MOUNT_TO_PLATE_EDGE_Y,
                -BOX_HEIGHT / 2.0 + BASE_PLATE_HEIGHT,
            ]),
            PartKind::KinMount { half } => aligned(kin_mount_ball(half)),
            PartKind::UChannel { group, half } => u_channel_triple(group, half),
            // Same frame as the U-channel they are referenced to.
            PartKind::SupportPlate { .. } => aligned([0.0; 3]),
            PartKind::Module { layer, half } => {
                let hole = module_hole(layer, half);
                let flat = if half.is_top() { Vector3::x() } else { -Vector3::x() };
                SurveyTriple::from_offsets(at(hole), -Vector3::z(), flat)
            }
            PartKind::HalfModule(id) => aligned(sensor_position(&id)),
            PartKind::Sensor(_) => SurveyTriple::new(
                Point3::origin(),
                Point3::new(SENSOR_WIDTH / 2.0, 0.0, 0.0),
                Point3::new(0.0, SENSOR_LENGTH / 2.0, 0.0),
            ),
            PartKind::ActiveSensor(_) => SurveyTriple::new(
                Point3::origin(),
                Point3::new(ACTIVE_SENSOR_WIDTH / 2.0, 0.0, 0.0),
                Point3::new(0.0, ACTIVE_SENSOR_LENGTH / 2.0, 0.0),
            ),
            PartKind::Lamination(id) => {
                let thickness = if id.is_short() {
                    L13_LAMINATION_THICKNESS
                } else {
                    L46_LAMINATION_THICKNESS
                };
                aligned([0.0, 0.0, -(SENSOR_THICKNESS / 2.0 + thickness / 2.0)])
            }
            PartKind::CarbonFiber(_) => aligned([
                0.0,
                0.0,
                -(SENSOR_THICKNESS / 2.0 + L13_LAMINATION_THICKNESS + CARBON_FIBER_THICKNESS / 2.0),
            ]),
            PartKind::Hybrid(_) => aligned([
                0.0,
                SENSOR_LENGTH / 2.0 - SENSOR_AND_HYBRID_LENGTH + HYBRID_LENGTH / 2.0,
                -SENSOR_THICKNESS / 2.0 + HYBRID_THICKNESS / 2.0,
            ]),
        }
    }

    /// Box center in the local frame. Kin mounts and the tracking volume have none.
    pub fn center(&self, config: &BuildConfig) -> Option<Vector3<f64>> {
        let center = match *self {
            PartKind::TrackingVolume | PartKind::KinMount { .. } => return None,
            PartKind::Chamber | PartKind::Base => Vector3::zeros(),
            PartKind::BasePlate => Vector3::new(
                BASE_PLATE_WIDTH / 2.0 - KIN_MOUNT_TO_PLATE_EDGE_X,
                BASE_PLATE_LENGTH / 2.0 - KIN_MOUNT_TO_PLATE_EDGE_Y,
                -BASE_PLATE_HEIGHT / 2.0,
            ),
            PartKind::UChannel { group, half } => {
                let (y, plate_height) = support_y_and_plate_height(group, half);
                Vector3::new(0.0, y, -SIDE_PLATE_CONE_Y - plate_height + U_CHANNEL_HEIGHT / 2.0)
            }
            PartKind::SupportPlate { group, half } => {
                let (y, plate_height) = support_y_and_plate_height(group, half);
                Vector3::new(0.0, y, -SIDE_PLATE_CONE_Y - plate_height / 2.0)
            }
            PartKind::Module { layer, half } => {
                let length = if layer <= 3 { L13_MODULE_LENGTH } else { L46_MODULE_LENGTH };
                Vector3::new(
                    -MODULE_WIDTH / 2.0,
                    -HOLE_TO_MODULE_EDGE_LENGTH + length / 2.0,
                    -hole_to_module_center(layer, half).abs(),
                )
            }
            PartKind::HalfModule(id) if id.is_short() => {
                let along = L13_HALF_MODULE_LENGTH / 2.0
                    - ((SENSOR_AND_HYBRID_LENGTH + 10.0) - SENSOR_LENGTH / 2.0);
                let normal = -SENSOR_THICKNESS / 2.0
                    - L13_LAMINATION_THICKNESS
                    - CARBON_FIBER_THICKNESS
                    + L13_HALF_MODULE_THICKNESS / 2.0;
                let across = L13_HALF_MODULE_WIDTH / 2.0
                    - (12.66 - (8.83 - 3.00) + SENSOR_WIDTH / 2.0);
                if config.si_strips_convention {
                    Vector3::new(-across, along, normal)
                } else {
                    Vector3::new(along, normal, across)
                }
            }
            PartKind::HalfModule(_) => Vector3::new(0.0, 0.0, L46_HALF_MODULE_CENTER_Z),
            PartKind::Sensor(_)
            | PartKind::ActiveSensor(_)
            | PartKind::Lamination(_)
            | PartKind::CarbonFiber(_)
            | PartKind::Hybrid(_) => Vector3::zeros(),
        };
        Some(center)
    }

    /// Full box extents along (u, v, w). `None` makes the node a ghost.
    pub fn box_dimensions(&self, config: &BuildConfig) -> Option<Vector3<f64>> {
        let dims = match *self {
            PartKind::TrackingVolume | PartKind::KinMount { .. } => return None,
            PartKind::Chamber => Vector3::new(CHAMBER_WIDTH, CHAMBER_LENGTH, CHAMBER_HEIGHT),
            PartKind::Base => Vector3::new(BASE_PLATE_WIDTH, BASE_PLATE_LENGTH, BOX_HEIGHT),
            PartKind::BasePlate => {
                Vector3::new(BASE_PLATE_WIDTH, BASE_PLATE_LENGTH, BASE_PLATE_HEIGHT)
            }
            PartKind::UChannel { group, .. } => {
                let (width, length, _) = support_plate(group);
                Vector3::new(width, length, U_CHANNEL_HEIGHT)
            }
            PartKind::SupportPlate { group, .. } => {
                let (width, length, height) = support_plate(group);
                Vector3::new(width, length, height)
            }
            PartKind::Module { layer, .. } => {
                let length = if layer <= 3 { L13_MODULE_LENGTH } else { L46_MODULE_LENGTH };
                Vector3::new(MODULE_WIDTH, length, MODULE_HEIGHT)
            }
            PartKind::HalfModule(id) if id.is_short() => {
                if config.si_strips_convention {
                    Vector3::new(
                        L13_HALF_MODULE_WIDTH,
                        L13_HALF_MODULE_LENGTH,
                        L13_HALF_MODULE_THICKNESS,
                    )
                } else {
                    Vector3::new(
                        L13_HALF_MODULE_LENGTH,
                        L13_HALF_MODULE_THICKNESS,
                        L13_HALF_MODULE_WIDTH,
                    )
                }
            }
            PartKind::HalfModule(_) => {
                Vector3::new(SENSOR_WIDTH, SENSOR_LENGTH, L46_HALF_MODULE_THICKNESS)
            }
            PartKind::Sensor(_) => {
                if config.si_strips_convention {
                    Vector3::new(SENSOR_WIDTH, SENSOR_LENGTH, SENSOR_THICKNESS)
                } else {
                    Vector3::new(SENSOR_LENGTH, SENSOR_THICKNESS, SENSOR_WIDTH)
                }
            }
            PartKind::ActiveSensor(_) => {
                Vector3::new(ACTIVE_SENSOR_WIDTH, ACTIVE_SENSOR_LENGTH, SENSOR_THICKNESS)
            }
            PartKind::Lamination(id) if id.is_short() => {
                Vector3::new(L13_LAMINATION_WIDTH, SENSOR_LENGTH, L13_LAMINATION_THICKNESS)
            }
            PartKind::Lamination(_) => {
                Vector3::new(SENSOR_WIDTH, SENSOR_LENGTH, L46_LAMINATION_THICKNESS)
            }
            PartKind::CarbonFiber(_) => {
                Vector3::new(CARBON_FIBER_WIDTH, CARBON_FIBER_LENGTH, CARBON_FIBER_THICKNESS)
            }
            PartKind::Hybrid(_) => Vector3::new(SENSOR_WIDTH, HYBRID_LENGTH, HYBRID_THICKNESS),
        };
        Some(dims)
    }

    pub fn material(&self) -> &'static str {
        match self {
            PartKind::BasePlate | PartKind::SupportPlate { .. } => material::ALUMINUM,
            PartKind::Sensor(_) | PartKind::ActiveSensor(_) => material::SILICON,
            PartKind::Lamination(_) => material::KAPTON,
            PartKind::CarbonFiber(_) => material::CARBON_FIBER,
            PartKind::Hybrid(_) => material::G10,
            _ => material::VACUUM,
        }
    }

    /// Rz(stereo)·Ry(π) for stereo half-modules, in the mother frame.
    pub fn generic_correction(&self) -> Option<Rotation3<f64>> {
        match self {
            PartKind::HalfModule(id) if id.orientation == SensorOrientation::Stereo => {
                let stereo = if id.is_short() {
                    STEREO_ANGLE_L13
                } else {
                    STEREO_ANGLE_L46
                };
                let flip = Rotation3::from_axis_angle(&Vector3::y_axis(), PI);
                let tilt = Rotation3::from_axis_angle(&Vector3::z_axis(), stereo);
                Some(tilt * flip)
            }
            _ => None,
        }
    }

    /// Metrology convention of a survey result measured on this part.
    pub fn survey_target(&self) -> Option<SurveyTarget> {
        match *self {
            PartKind::KinMount { half } => Some(SurveyTarget::KinMount { top: half.is_top() }),
            PartKind::UChannel { group, half } => Some(SurveyTarget::UChannel {
                group,
                top: half.is_top(),
            }),
            PartKind::Module { half, .. } => Some(SurveyTarget::Module { top: half.is_top() }),
            PartKind::HalfModule(_) => Some(SurveyTarget::HalfModule),
            _ => None,
        }
    }

    /// Node descriptor with points, box, material and generic correction set.
    ///
    /// `points` replaces the nominal triple, e.g. with a table lookup.
    pub fn spec(&self, config: &BuildConfig, points: Option<PointSource>) -> NodeSpec {
        let points = points.unwrap_or_else(|| PointSource::Fixed(self.survey_triple()));
        let mut spec = NodeSpec::new(self.meta(), points).material(self.material());
        match (self.center(config), self.box_dimensions(config)) {
            (Some(center), Some(dims)) => spec = spec.with_box(center, dims),
            (Some(center), None) => spec = spec.center(center),
            _ => {}
        }
        if let Some(rotation) = self.generic_correction() {
            spec = spec.generic_correction(rotation);
        }
        spec
    }
}

fn kin_mount_ball(half: Half) -> [f64; 3] {
    let z = match half {
        Half::Top => KIN_MOUNT_Z_TOP,
        Half::Bottom => KIN_MOUNT_Z_BOTTOM,
    };
    [KIN_MOUNT_X, KIN_MOUNT_Y, z]
}

fn u_channel_triple(group: UChannelGroup, half: Half) -> SurveyTriple {
    match (group, half) {
        // L1-3 channels are placed relative to their kin mount.
        (UChannelGroup::L13, Half::Bottom) => SurveyTriple::from_offsets(
            at(L13_BALL_BOTTOM) - v(kin_mount_ball(half)),
            (v(L13_BOTTOM_FWD_RIGHT) - v(L13_BOTTOM_FWD_LEFT)) * 0.5,
            v(L13_BOTTOM_BWD_RIGHT) - v(L13_BOTTOM_FWD_RIGHT),
        ),
        (UChannelGroup::L13, Half::Top) => SurveyTriple::from_offsets(
            at(L13_BALL_TOP) - v(kin_mount_ball(half)),
            (v(L13_TOP_FWD_LEFT) - v(L13_TOP_FWD_RIGHT)) * 0.5,
            v(L13_TOP_BWD_LEFT) - v(L13_TOP_FWD_LEFT),
        ),
        (UChannelGroup::L46, Half::Bottom) => SurveyTriple::from_offsets(
            at(L46_BALL_BOTTOM),
            (v(L46_BOTTOM_FWD_RIGHT) - v(L46_BOTTOM_FWD_LEFT)) * 0.5,
            v(L46_BOTTOM_BWD_LEFT) - v(L46_BOTTOM_FWD_LEFT),
        ),
        (UChannelGroup::L46, Half::Top) => SurveyTriple::from_offsets(
            at(L46_BALL_TOP),
            (v(L46_TOP_FWD_LEFT) - v(L46_TOP_FWD_RIGHT)) * 0.5,
            v(L46_TOP_BWD_RIGHT) - v(L46_TOP_FWD_RIGHT),
        ),
    }
}

// (width, length, height)
fn support_plate(group: UChannelGroup) -> (f64, f64, f64) {
    match group {
        UChannelGroup::L13 => (L13_PLATE_WIDTH, L13_PLATE_LENGTH, L13_PLATE_HEIGHT),
        UChannelGroup::L46 => (L46_PLATE_WIDTH, L46_PLATE_LENGTH, L46_PLATE_HEIGHT),
    }
}

// Box center along the channel, and the plate thickness below the side plates.
fn support_y_and_plate_height(group: UChannelGroup, half: Half) -> (f64, f64) {
    let (_, length, height) = support_plate(group);
    let y = match (group, half) {
        (UChannelGroup::L13, Half::Bottom) => L13_CONE_TO_EDGE_BOTTOM - length / 2.0,
        (UChannelGroup::L13, Half::Top) => L13_CONE_TO_EDGE_TOP - length / 2.0,
        (UChannelGroup::L46, Half::Bottom) => -L46_CONE_TO_EDGE_BOTTOM + length / 2.0,
        (UChannelGroup::L46, Half::Top) => -L46_CONE_TO_EDGE_TOP + length / 2.0,
    };
    (y, height)
}

fn hole_to_module_center(layer: u8, half: Half) -> f64 {
    match (layer <= 3, half) {
        (true, Half::Bottom) => L13_CONE_TO_EDGE_BOTTOM - L13_PIN_TO_EDGE_BOTTOM,
        (true, Half::Top) => L13_CONE_TO_EDGE_TOP - L13_PIN_TO_EDGE_TOP,
        (false, Half::Bottom) => L46_CONE_TO_EDGE_BOTTOM - L46_PIN_TO_EDGE_BOTTOM,
        (false, Half::Top) => L46_CONE_TO_EDGE_TOP - L46_PIN_TO_EDGE_TOP,
    }
}

/// Module mounting hole in the U-channel frame.
fn module_hole(layer: u8, half: Half) -> [f64; 3] {
    if layer <= 3 {
        let i = usize::from(layer.saturating_sub(1)).min(2);
        let z = L13_HOLE_VERTICAL_L1 - L13_HOLE_VERTICAL_STEP * f64::from(layer.saturating_sub(1));
        match half {
            Half::Bottom => [L13_HOLE_ACROSS, L13_HOLE_ALONG_BOTTOM[i], z],
            Half::Top => [-L13_HOLE_ACROSS, L13_HOLE_ALONG_TOP[i], z],
        }
    } else {
        let step = f64::from(layer - 4);
        let z = L46_HOLE_VERTICAL_L4 - L46_HOLE_VERTICAL_STEP * step;
        match half {
            Half::Bottom => [L46_HOLE_ACROSS, L46_HOLE_ALONG_L4 + L46_HOLE_ALONG_STEP * step, z],
            Half::Top => [-L46_HOLE_ACROSS, -L46_HOLE_ALONG_L4 + L46_HOLE_ALONG_STEP * step, z],
        }
    }
}

/// Sensor center of a half-module in the module frame.
fn sensor_position(id: &HalfModuleId) -> [f64; 3] {
    if id.is_short() {
        return match id.orientation {
            SensorOrientation::Axial => L13_AXIAL_SENSOR,
            SensorOrientation::Stereo => {
                [L13_AXIAL_SENSOR[0], L13_AXIAL_SENSOR[1], L13_STEREO_SENSOR_Z]
            }
        };
    }
    let hole = id.position.map_or(true, ModulePosition::is_hole);
    match (id.orientation, hole) {
        (SensorOrientation::Axial, true) => L46_AXIAL_HOLE_SENSOR,
        (SensorOrientation::Axial, false) => L46_AXIAL_SLOT_SENSOR,
        (SensorOrientation::Stereo, true) => L46_STEREO_HOLE_SENSOR,
        (SensorOrientation::Stereo, false) => L46_STEREO_SLOT_SENSOR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use svt_survey_frame::{CoordinateSystem, INCH};

    fn hm(
        layer: u8,
        half: Half,
        orientation: SensorOrientation,
        position: Option<ModulePosition>,
    ) -> HalfModuleId {
        HalfModuleId {
            layer,
            half,
            orientation,
            position,
        }
    }

    #[test]
    fn names_follow_meta() {
        assert_eq!(PartKind::KinMount { half: Half::Bottom }.name(), "c_support_kin_L13b");
        assert_eq!(
            PartKind::SupportPlate {
                group: UChannelGroup::L46,
                half: Half::Top
            }
            .name(),
            "support_plate_top_L46"
        );
        let id = hm(5, Half::Top, SensorOrientation::Stereo, Some(ModulePosition::Slot));
        assert_eq!(
            PartKind::ActiveSensor(id).name(),
            "module_L5t_halfmodule_stereo_slot_sensor_active"
        );
    }

    #[test]
    fn every_survey_triple_spans_a_frame() {
        let mut parts = vec![
            PartKind::TrackingVolume,
            PartKind::Chamber,
            PartKind::Base,
            PartKind::BasePlate,
        ];
        for half in [Half::Bottom, Half::Top] {
            parts.push(PartKind::KinMount { half });
            for group in [UChannelGroup::L13, UChannelGroup::L46] {
                parts.push(PartKind::UChannel { group, half });
                parts.push(PartKind::SupportPlate { group, half });
            }
            for layer in 1..=6 {
                parts.push(PartKind::Module { layer, half });
                let id = hm(layer, half, SensorOrientation::Stereo, None);
                parts.push(PartKind::HalfModule(id));
                parts.push(PartKind::Hybrid(id));
            }
        }
        for part in parts {
            let frame = CoordinateSystem::from_survey(&part.survey_triple());
            assert!(frame.is_ok(), "{}", part.name());
            assert!(frame.unwrap().is_orthonormal(1e-9));
        }
    }

    #[test]
    fn base_plate_sits_on_box_floor() {
        let ball = PartKind::BasePlate.survey_triple().ball;
        assert_relative_eq!(ball.x, -5.0 * INCH, epsilon = 1e-9);
        assert_relative_eq!(ball.y, -24.875 * INCH, epsilon = 1e-9);
        assert_relative_eq!(ball.z, -3.12 * INCH, epsilon = 1e-9);
        let center = PartKind::BasePlate.center(&BuildConfig::default()).unwrap();
        assert_relative_eq!(center.x, 5.0 * INCH, epsilon = 1e-9);
        assert_relative_eq!(center.z, -0.125 * INCH, epsilon = 1e-9);
    }

    #[test]
    fn module_holes_step_down_per_layer() {
        let l2 = PartKind::Module { layer: 2, half: Half::Bottom }.survey_triple();
        assert_relative_eq!(l2.ball.coords, Vector3::new(95.25, 109.525, -52.935), epsilon = 1e-9);
        let l6 = PartKind::Module { layer: 6, half: Half::Top }.survey_triple();
        assert_relative_eq!(l6.ball.coords, Vector3::new(-149.225, 390.475, -59.34), epsilon = 1e-9);

        // vee points down, flat across the channel
        let frame = CoordinateSystem::from_survey(&l6).unwrap();
        assert_relative_eq!(*frame.u(), -Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(*frame.w(), -Vector3::y(), epsilon = 1e-12);
        let l6b = PartKind::Module { layer: 6, half: Half::Bottom }.survey_triple();
        let frame = CoordinateSystem::from_survey(&l6b).unwrap();
        assert_relative_eq!(*frame.w(), Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn module_box_is_centered_below_hole() {
        let config = BuildConfig::default();
        let center = PartKind::Module { layer: 1, half: Half::Bottom }.center(&config).unwrap();
        assert_relative_eq!(center.x, -1.52 * INCH, epsilon = 1e-9);
        assert_relative_eq!(center.z, -0.376 * INCH, epsilon = 1e-9);
        let dims = PartKind::Module { layer: 4, half: Half::Top }.box_dimensions(&config).unwrap();
        assert_relative_eq!(dims, Vector3::new(3.04 * INCH, 12.25 * INCH, 0.55 * INCH), epsilon = 1e-9);
    }

    #[test]
    fn short_half_module_box_follows_convention() {
        let id = hm(2, Half::Top, SensorOrientation::Axial, None);
        let si = BuildConfig::default();
        let old = BuildConfig {
            si_strips_convention: false,
            ..si
        };
        let part = PartKind::HalfModule(id);

        let c = part.center(&si).unwrap();
        assert_relative_eq!(c, Vector3::new(3.415, -80.0, 0.50725), epsilon = 1e-9);
        let d = part.box_dimensions(&si).unwrap();
        assert_relative_eq!(d, Vector3::new(47.17, 100.0, 1.8405), epsilon = 1e-9);

        let c = part.center(&old).unwrap();
        assert_relative_eq!(c, Vector3::new(-80.0, 0.50725, -3.415), epsilon = 1e-9);
        let d = part.box_dimensions(&old).unwrap();
        assert_relative_eq!(d, Vector3::new(100.0, 1.8405, 47.17), epsilon = 1e-9);
    }

    #[test]
    fn stereo_correction_flips_and_tilts() {
        let id = hm(4, Half::Bottom, SensorOrientation::Stereo, Some(ModulePosition::Hole));
        let r = PartKind::HalfModule(id).generic_correction().unwrap();
        // z flips under Ry(pi), then Rz leaves it alone
        assert_relative_eq!(r * Vector3::z(), -Vector3::z(), epsilon = 1e-12);
        let x = r * Vector3::x();
        assert_relative_eq!(x, Vector3::new(-(0.05f64).cos(), -(0.05f64).sin(), 0.0), epsilon = 1e-12);

        let axial = hm(4, Half::Bottom, SensorOrientation::Axial, Some(ModulePosition::Hole));
        assert!(PartKind::HalfModule(axial).generic_correction().is_none());
        assert!(PartKind::Sensor(id).generic_correction().is_none());
    }

    #[test]
    fn ghosts_and_materials() {
        let config = BuildConfig::default();
        assert!(PartKind::KinMount { half: Half::Top }.box_dimensions(&config).is_none());
        assert!(PartKind::KinMount { half: Half::Top }.center(&config).is_none());
        assert!(PartKind::TrackingVolume.box_dimensions(&config).is_none());

        let id = hm(1, Half::Bottom, SensorOrientation::Axial, None);
        assert_eq!(PartKind::Sensor(id).material(), "Silicon");
        assert_eq!(PartKind::Hybrid(id).material(), "G10");
        assert_eq!(PartKind::Module { layer: 1, half: Half::Bottom }.material(), "Vacuum");
        assert_eq!(
            PartKind::SupportPlate {
                group: UChannelGroup::L13,
                half: Half::Bottom
            }
            .material(),
            "Aluminum"
        );
    }

    #[test]
    fn hybrid_sits_behind_sensor() {
        let id = hm(3, Half::Top, SensorOrientation::Axial, None);
        let ball = PartKind::Hybrid(id).survey_triple().ball;
        assert_relative_eq!(ball.y, -85.0, epsilon = 1e-9);
        assert_relative_eq!(ball.z, -0.16 + 0.79375, epsilon = 1e-9);
    }
}
