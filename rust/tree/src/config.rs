// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Build switches threaded through a tree build.

use serde::{Deserialize, Serialize};

use crate::meta::{Half, SensorOrientation};

/// Options read by part constructors during one build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Lay sensor and half-module boxes out as (width, length, thickness)
    /// along (u, v, w). When false the older (length, thickness, width)
    /// layout is used.
    pub si_strips_convention: bool,
    /// Bit `n - 1` enables layer `n`.
    pub layer_mask: u8,
    pub axial: bool,
    pub stereo: bool,
    pub top: bool,
    pub bottom: bool,
}

impl BuildConfig {
    pub fn includes_layer(&self, layer: u8) -> bool {
        (1..=8).contains(&layer) && self.layer_mask & (1 << (layer - 1)) != 0
    }

    pub fn includes_half(&self, half: Half) -> bool {
        match half {
            Half::Top => self.top,
            Half::Bottom => self.bottom,
        }
    }

    pub fn includes_orientation(&self, orientation: SensorOrientation) -> bool {
        match orientation {
            SensorOrientation::Axial => self.axial,
            SensorOrientation::Stereo => self.stereo,
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            si_strips_convention: true,
            layer_mask: 0x3F,
            axial: true,
            stereo: true,
            top: true,
            bottom: true,
        }
    }
}
