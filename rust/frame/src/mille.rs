// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Millepede alignment parameters.
//!
//! A parameter id packs its selector fields as decimal digits, `HKAss`:
//!
//! | digits | field | values |
//! |---|---|---|
//! | `H` (`id / 10000`) | half | 1 top, 2 bottom |
//! | `K` (`id % 10000 / 1000`) | kind | 1 translation, 2 rotation, 3 L1-3 support rotation |
//! | `A` (`id % 1000 / 100`) | axis | 1..=3 |
//! | `ss` (`id % 100`) | sensor | millepede layer, 0 for supports |

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::alignment::AlignmentCorrection;
use crate::angles::rotation_from_cardan;
use crate::error::{Error, Result};

/// Parameter kind digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MilleKind {
    Translation,
    Rotation,
    SupportRotation,
}

impl MilleKind {
    fn digit(self) -> i32 {
        match self {
            MilleKind::Translation => 1,
            MilleKind::Rotation => 2,
            MilleKind::SupportRotation => 3,
        }
    }
}

/// One alignment constant as read from the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MilleParameter {
    pub id: i32,
    pub value: f64,
}

/// Decoded selector fields of a [`MilleParameter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MilleSelector {
    pub top: bool,
    pub kind: MilleKind,
    /// Zero-based axis index.
    pub axis: usize,
    pub sensor: u32,
}

impl MilleParameter {
    pub fn new(id: i32, value: f64) -> Self {
        Self { id, value }
    }

    /// Packs selector fields into an id.
    pub fn encode(top: bool, kind: MilleKind, axis: usize, sensor: u32) -> i32 {
        let half = if top { 1 } else { 2 };
        half * 10000 + kind.digit() * 1000 + (axis as i32 + 1) * 100 + sensor as i32
    }

    pub fn decode(&self) -> Result<MilleSelector> {
        let id = self.id;
        if id < 0 {
            return Err(Error::InvalidMilleParameter {
                id,
                reason: "negative id",
            });
        }
        let top = match id / 10000 {
            1 => true,
            2 => false,
            _ => {
                return Err(Error::InvalidMilleParameter {
                    id,
                    reason: "half digit must be 1 (top) or 2 (bottom)",
                })
            }
        };
        let kind = match (id % 10000) / 1000 {
            1 => MilleKind::Translation,
            2 => MilleKind::Rotation,
            3 => MilleKind::SupportRotation,
            _ => {
                return Err(Error::InvalidMilleParameter {
                    id,
                    reason: "kind digit must be 1, 2 or 3",
                })
            }
        };
        let axis = match (id % 1000) / 100 {
            d @ 1..=3 => d as usize - 1,
            _ => {
                return Err(Error::InvalidMilleParameter {
                    id,
                    reason: "axis digit must be 1, 2 or 3",
                })
            }
        };
        Ok(MilleSelector {
            top,
            kind,
            axis,
            sensor: (id % 100) as u32,
        })
    }
}

/// The flat table of alignment constants for one detector.
#[derive(Debug, Clone, Default)]
pub struct MilleTable {
    parameters: Vec<(MilleParameter, MilleSelector)>,
}

impl MilleTable {
    /// Decodes every parameter up front; a malformed id fails the whole table.
    pub fn new(parameters: impl IntoIterator<Item = MilleParameter>) -> Result<Self> {
        let parameters = parameters
            .into_iter()
            .map(|p| p.decode().map(|s| (p, s)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { parameters })
    }

    /// Zero-valued translations and rotations for millepede layers `1..=max_layer`
    /// on both halves.
    pub fn nominal(max_layer: u32) -> Self {
        let mut parameters = Vec::new();
        for top in [true, false] {
            for kind in [MilleKind::Translation, MilleKind::Rotation] {
                for axis in 0..3 {
                    for sensor in 1..=max_layer {
                        let p = MilleParameter::new(MilleParameter::encode(top, kind, axis, sensor), 0.0);
                        let s = MilleSelector {
                            top,
                            kind,
                            axis,
                            sensor,
                        };
                        parameters.push((p, s));
                    }
                }
            }
        }
        Self { parameters }
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MilleParameter> {
        self.parameters.iter().map(|(p, _)| p)
    }

    /// Translation and rotation of the half-module on `top`/bottom with the
    /// given millepede layer.
    ///
    /// Exactly three translation and three rotation entries must match.
    pub fn half_module_correction(&self, top: bool, layer: u32) -> Result<AlignmentCorrection> {
        let mut t = [0.0; 3];
        let mut r = [0.0; 3];
        let mut t_found = 0;
        let mut r_found = 0;

        for (p, s) in &self.parameters {
            if s.top != top || s.sensor != layer {
                continue;
            }
            match s.kind {
                MilleKind::Translation => {
                    t[s.axis] = p.value;
                    t_found += 1;
                }
                MilleKind::Rotation => {
                    r[s.axis] = p.value;
                    r_found += 1;
                }
                MilleKind::SupportRotation => {}
            }
        }

        if t_found != 3 || r_found != 3 {
            return Err(Error::AlignmentParameterCount {
                half: if top { "top" } else { "bottom" },
                layer,
                translations: t_found,
                rotations: r_found,
            });
        }

        tracing::trace!(top, layer, ?t, ?r, "half-module alignment constants");
        Ok(AlignmentCorrection::new(
            Some(Vector3::from(t)),
            Some(rotation_from_cardan(r[0], r[1], r[2])),
        ))
    }

    /// Rotation of the L1-3 support on `top`/bottom. Translation is zero.
    pub fn l13_support_correction(&self, top: bool) -> Result<AlignmentCorrection> {
        let mut r = [0.0; 3];
        for (p, s) in &self.parameters {
            if s.top != top || s.kind != MilleKind::SupportRotation {
                continue;
            }
            if s.sensor != 0 {
                return Err(Error::NonZeroSupportSensor(s.sensor));
            }
            r[s.axis] = p.value;
        }
        Ok(AlignmentCorrection::new(
            Some(Vector3::zeros()),
            Some(rotation_from_cardan(r[0], r[1], r[2])),
        ))
    }
}
