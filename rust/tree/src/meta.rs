// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structured node metadata and the display names derived from it.
//!
//! Layer, half, orientation and position are attached to a node as fields.
//! Names are generated from them. [`NodeMeta::parse`] goes the other way for
//! external tables that are keyed by name.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Top or bottom detector half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Half {
    Top,
    Bottom,
}

impl Half {
    pub fn is_top(self) -> bool {
        self == Half::Top
    }

    pub fn from_top(top: bool) -> Self {
        if top {
            Half::Top
        } else {
            Half::Bottom
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Half::Top => "top",
            Half::Bottom => "bottom",
        }
    }

    /// Single-letter suffix used in module names.
    pub fn letter(self) -> char {
        match self {
            Half::Top => 't',
            Half::Bottom => 'b',
        }
    }
}

impl fmt::Display for Half {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strip orientation of a half-module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorOrientation {
    Axial,
    Stereo,
}

impl SensorOrientation {
    pub fn is_axial(self) -> bool {
        self == SensorOrientation::Axial
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SensorOrientation::Axial => "axial",
            SensorOrientation::Stereo => "stereo",
        }
    }
}

/// Mounting position of an L4-6 half-module on its module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModulePosition {
    Hole,
    Slot,
}

impl ModulePosition {
    pub fn is_hole(self) -> bool {
        self == ModulePosition::Hole
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ModulePosition::Hole => "hole",
            ModulePosition::Slot => "slot",
        }
    }
}

/// Part family of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    TrackingVolume,
    Chamber,
    Base,
    BasePlate,
    KinMount,
    UChannel,
    SupportPlate,
    Module,
    HalfModule,
    Sensor,
    ActiveSensor,
    Lamination,
    CarbonFiber,
    Hybrid,
}

impl NodeKind {
    /// True for the parts that hang below a half-module.
    pub fn is_half_module_part(self) -> bool {
        matches!(
            self,
            NodeKind::Sensor
                | NodeKind::ActiveSensor
                | NodeKind::Lamination
                | NodeKind::CarbonFiber
                | NodeKind::Hybrid
        )
    }
}

/// Structured identity of a node.
///
/// For U-channels and support plates `layer` is the first layer the support
/// carries (1 or 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeMeta {
    pub kind: NodeKind,
    pub layer: Option<u8>,
    pub half: Option<Half>,
    pub orientation: Option<SensorOrientation>,
    pub position: Option<ModulePosition>,
}

impl NodeMeta {
    /// A part with no layer or half.
    pub fn fixed(kind: NodeKind) -> Self {
        Self {
            kind,
            layer: None,
            half: None,
            orientation: None,
            position: None,
        }
    }

    pub fn kin_mount(half: Half) -> Self {
        Self {
            half: Some(half),
            ..Self::fixed(NodeKind::KinMount)
        }
    }

    pub fn u_channel(first_layer: u8, half: Half) -> Self {
        Self {
            layer: Some(first_layer),
            half: Some(half),
            ..Self::fixed(NodeKind::UChannel)
        }
    }

    pub fn support_plate(first_layer: u8, half: Half) -> Self {
        Self {
            kind: NodeKind::SupportPlate,
            ..Self::u_channel(first_layer, half)
        }
    }

    pub fn module(layer: u8, half: Half) -> Self {
        Self {
            layer: Some(layer),
            half: Some(half),
            ..Self::fixed(NodeKind::Module)
        }
    }

    pub fn half_module(
        layer: u8,
        half: Half,
        orientation: SensorOrientation,
        position: Option<ModulePosition>,
    ) -> Self {
        Self {
            kind: NodeKind::HalfModule,
            orientation: Some(orientation),
            position,
            ..Self::module(layer, half)
        }
    }

    /// Same identity fields with another kind, e.g. the sensor of a half-module.
    pub fn with_kind(&self, kind: NodeKind) -> Self {
        Self { kind, ..*self }
    }

    fn group(&self) -> &'static str {
        match self.layer {
            Some(l) if l >= 4 => "L46",
            _ => "L13",
        }
    }

    fn half_str(&self) -> &'static str {
        self.half.map_or("", Half::as_str)
    }

    fn module_name(&self) -> String {
        format!(
            "module_L{}{}",
            self.layer.unwrap_or(0),
            self.half.map_or('?', Half::letter)
        )
    }

    fn half_module_name(&self) -> String {
        let mut name = format!(
            "{}_halfmodule_{}",
            self.module_name(),
            self.orientation.map_or("", SensorOrientation::as_str)
        );
        if let Some(position) = self.position {
            name.push('_');
            name.push_str(position.as_str());
        }
        name
    }

    /// Name of the node, derived from the fields.
    pub fn display_name(&self) -> String {
        match self.kind {
            NodeKind::TrackingVolume => "trackingVolume".to_string(),
            NodeKind::Chamber => "chamber".to_string(),
            NodeKind::Base => "base".to_string(),
            NodeKind::BasePlate => "base_plate".to_string(),
            NodeKind::KinMount => {
                format!("c_support_kin_L13{}", self.half.map_or('?', Half::letter))
            }
            NodeKind::UChannel => format!("support_{}_{}", self.half_str(), self.group()),
            NodeKind::SupportPlate => {
                format!("support_plate_{}_{}", self.half_str(), self.group())
            }
            NodeKind::Module => self.module_name(),
            NodeKind::HalfModule => self.half_module_name(),
            NodeKind::Sensor => format!("{}_sensor", self.half_module_name()),
            NodeKind::ActiveSensor => format!("{}_sensor_active", self.half_module_name()),
            NodeKind::Lamination => format!("{}_lamination", self.half_module_name()),
            NodeKind::CarbonFiber => format!("{}_cf", self.half_module_name()),
            NodeKind::Hybrid => format!("{}_hybrid", self.half_module_name()),
        }
    }

    /// Recovers the fields from a name produced by [`Self::display_name`].
    pub fn parse(name: &str) -> Result<Self> {
        let unknown = || Error::UnknownNodeName(name.to_string());

        let fixed = match name {
            "trackingVolume" => Some(NodeKind::TrackingVolume),
            "chamber" => Some(NodeKind::Chamber),
            "base" => Some(NodeKind::Base),
            "base_plate" => Some(NodeKind::BasePlate),
            _ => None,
        };
        if let Some(kind) = fixed {
            return Ok(Self::fixed(kind));
        }

        if let Some(rest) = name.strip_prefix("c_support_kin_L13") {
            return match rest {
                "t" => Ok(Self::kin_mount(Half::Top)),
                "b" => Ok(Self::kin_mount(Half::Bottom)),
                _ => Err(unknown()),
            };
        }

        if let Some(rest) = name.strip_prefix("support_plate_") {
            let (half, layer) = parse_support(rest).ok_or_else(unknown)?;
            return Ok(Self::support_plate(layer, half));
        }
        if let Some(rest) = name.strip_prefix("support_") {
            let (half, layer) = parse_support(rest).ok_or_else(unknown)?;
            return Ok(Self::u_channel(layer, half));
        }

        let rest = name.strip_prefix("module_L").ok_or_else(unknown)?;
        let digits = rest.chars().take_while(char::is_ascii_digit).count();
        let layer: u8 = rest[..digits].parse().map_err(|_| unknown())?;
        let rest = &rest[digits..];
        let half = match rest.chars().next() {
            Some('t') => Half::Top,
            Some('b') => Half::Bottom,
            _ => return Err(unknown()),
        };
        let rest = &rest[1..];
        if rest.is_empty() {
            return Ok(Self::module(layer, half));
        }

        let rest = rest.strip_prefix("_halfmodule_").ok_or_else(unknown)?;
        let (orientation, rest) = if let Some(r) = rest.strip_prefix("axial") {
            (SensorOrientation::Axial, r)
        } else if let Some(r) = rest.strip_prefix("stereo") {
            (SensorOrientation::Stereo, r)
        } else {
            return Err(unknown());
        };
        let (position, rest) = if let Some(r) = rest.strip_prefix("_hole") {
            (Some(ModulePosition::Hole), r)
        } else if let Some(r) = rest.strip_prefix("_slot") {
            (Some(ModulePosition::Slot), r)
        } else {
            (None, rest)
        };

        let kind = match rest {
            "" => NodeKind::HalfModule,
            "_sensor" => NodeKind::Sensor,
            "_sensor_active" => NodeKind::ActiveSensor,
            "_lamination" => NodeKind::Lamination,
            "_cf" => NodeKind::CarbonFiber,
            "_hybrid" => NodeKind::Hybrid,
            _ => return Err(unknown()),
        };
        Ok(Self::half_module(layer, half, orientation, position).with_kind(kind))
    }

    /// Millepede sensor index of a half-module or one of its parts.
    pub fn millepede_layer(&self) -> Option<u32> {
        let layer = self.layer?;
        let half = self.half?;
        let orientation = self.orientation?;
        let hole = self.position.map_or(true, ModulePosition::is_hole);
        Some(millepede_layer(
            half.is_top(),
            layer,
            orientation.is_axial(),
            hole,
        ))
    }
}

impl fmt::Display for NodeMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

// "{bottom|top}_L{13|46}"
fn parse_support(rest: &str) -> Option<(Half, u8)> {
    let (half, group) = rest.split_once('_')?;
    let half = match half {
        "top" => Half::Top,
        "bottom" => Half::Bottom,
        _ => return None,
    };
    let layer = match group {
        "L13" => 1,
        "L46" => 4,
        _ => return None,
    };
    Some((half, layer))
}

/// Whether the half-module of `layer` on the given half is axial.
///
/// Bottom modules carry the axial sensor on even layers, top modules on odd.
pub fn is_axial(top: bool, layer: u8) -> bool {
    if top {
        layer % 2 == 1
    } else {
        layer % 2 == 0
    }
}

/// Millepede sensor index of a half-module.
///
/// Layers 1-3 keep the two-sensors-per-layer numbering. From layer 4 each
/// layer has four sensors per half, numbered from 7.
pub fn millepede_layer(top: bool, layer: u8, axial: bool, hole: bool) -> u32 {
    let l = u32::from(layer);
    if layer < 4 {
        return match (axial, top) {
            (true, true) => 2 * l - 1,
            (true, false) => 2 * l,
            (false, true) => 2 * l,
            (false, false) => 2 * l - 1,
        };
    }
    let side = if top { !axial } else { axial };
    let slot = if hole { 0 } else { 2 };
    7 + (l - 4) * 4 + u32::from(side) + slot
}
