// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tracker construction in dependency order.
//!
//! Every node is inserted after its mother and references, so the order of
//! the calls below is part of the geometry. Supports come first, then one
//! module bundle per enabled (layer, half), bottom before top.

use rustc_hash::FxHashMap;
use svt_survey_frame::{AlignmentCorrection, MilleTable, UChannelGroup};
use svt_survey_tree::{
    millepede_layer, BuildConfig, BundleRegistry, Half, HalfModuleBundle, ModuleBundle,
    ModulePosition, NodeKey, NodePlacement, NodeTree, PointSource, SensorOrientation,
};

use crate::config::DetectorConfig;
use crate::constants::LAYER_COUNT;
use crate::error::{Error, Result};
use crate::parts::{HalfModuleId, PartKind};

/// Name of the root node; placements are reported relative to it.
pub const TRACKING_VOLUME: &str = "trackingVolume";

/// Detector generations with a known part catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Generation {
    #[default]
    Tracker2014,
}

/// A finished build: the node tree and the module bundles indexing into it.
#[derive(Debug, Clone)]
pub struct Tracker {
    pub generation: Generation,
    pub tree: NodeTree,
    pub bundles: BundleRegistry,
}

impl Tracker {
    pub fn bundle(&self, layer: u8, half: Half) -> Option<&ModuleBundle> {
        self.bundles.get(layer, half)
    }

    /// Placement of every node relative to the tracking volume, in build order.
    pub fn placements(&self) -> Result<Vec<NodePlacement>> {
        Ok(self.tree.placements(TRACKING_VOLUME)?)
    }
}

/// Builds the tracker of `generation` from a detector configuration.
pub fn build_tracker(
    generation: Generation,
    detector: &DetectorConfig,
    config: &BuildConfig,
) -> Result<Tracker> {
    match generation {
        Generation::Tracker2014 => {
            let mut builder = TrackerBuilder::new(detector, config)?;
            for layer in 1..=LAYER_COUNT {
                if !config.includes_layer(layer) {
                    continue;
                }
                for half in [Half::Bottom, Half::Top] {
                    if config.includes_half(half) {
                        builder.add_module_bundle(layer, half)?;
                    }
                }
            }
            Ok(builder.finish())
        }
    }
}

/// Incremental 2014 tracker build.
///
/// [`TrackerBuilder::new`] places the chamber, box and supports; module
/// bundles are added one at a time.
pub struct TrackerBuilder<'a> {
    detector: &'a DetectorConfig,
    config: &'a BuildConfig,
    mille: MilleTable,
    tree: NodeTree,
    bundles: BundleRegistry,
    base: NodeKey,
    channels: FxHashMap<(UChannelGroup, Half), NodeKey>,
}

impl<'a> TrackerBuilder<'a> {
    pub fn new(detector: &'a DetectorConfig, config: &'a BuildConfig) -> Result<Self> {
        let mille = detector.mille_table()?;
        let mut tree = NodeTree::with_survey_points(detector.survey_point_table());

        let tracking = insert(&mut tree, detector, config, PartKind::TrackingVolume, None, None, None)?;
        let chamber = insert(&mut tree, detector, config, PartKind::Chamber, Some(tracking), None, None)?;
        let base = insert(&mut tree, detector, config, PartKind::Base, Some(chamber), None, None)?;
        insert(&mut tree, detector, config, PartKind::BasePlate, Some(base), None, None)?;

        let mut builder = Self {
            detector,
            config,
            mille,
            tree,
            bundles: BundleRegistry::new(),
            base,
            channels: FxHashMap::default(),
        };

        for half in [Half::Bottom, Half::Top] {
            let kin = PartKind::KinMount { half };
            let support = builder.mille.l13_support_correction(half.is_top())?;
            let kin = builder.add(kin, None, Some(support))?;
            builder.add_support(UChannelGroup::L13, half, Some(kin))?;
        }
        for half in [Half::Bottom, Half::Top] {
            builder.add_support(UChannelGroup::L46, half, None)?;
        }
        Ok(builder)
    }

    /// Adds a module with its half-modules and their parts.
    ///
    /// Layers 1-3 carry an axial and a stereo half-module; layers 4-6 carry
    /// one of each at the hole and at the slot position.
    pub fn add_module_bundle(&mut self, layer: u8, half: Half) -> Result<()> {
        if self.bundles.contains(layer, half) {
            return Err(svt_survey_tree::Error::DuplicateBundle { layer, half }.into());
        }
        let group = if layer <= 3 {
            UChannelGroup::L13
        } else {
            UChannelGroup::L46
        };
        let Some(&channel) = self.channels.get(&(group, half)) else {
            return Err(svt_survey_tree::Error::UnknownNode(
                PartKind::UChannel { group, half }.name(),
            )
            .into());
        };

        tracing::debug!(layer, %half, "Building module bundle");
        let module = self.add(
            PartKind::Module { layer, half },
            Some(channel),
            Some(AlignmentCorrection::none()),
        )?;
        self.bundles.add(ModuleBundle::new(layer, half, module))?;

        let slots: &[(SensorOrientation, Option<ModulePosition>)] = if layer <= 3 {
            &[(SensorOrientation::Axial, None), (SensorOrientation::Stereo, None)]
        } else {
            &[
                (SensorOrientation::Axial, Some(ModulePosition::Hole)),
                (SensorOrientation::Axial, Some(ModulePosition::Slot)),
                (SensorOrientation::Stereo, Some(ModulePosition::Hole)),
                (SensorOrientation::Stereo, Some(ModulePosition::Slot)),
            ]
        };
        for &(orientation, position) in slots {
            if !self.config.includes_orientation(orientation) {
                continue;
            }
            let id = HalfModuleId {
                layer,
                half,
                orientation,
                position,
            };
            let half_module = self.add_half_module(id, module)?;
            if let Some(bundle) = self.bundles.get_mut(layer, half) {
                bundle.half_modules.push(half_module);
            }
        }
        Ok(())
    }

    pub fn finish(self) -> Tracker {
        tracing::info!(
            nodes = self.tree.len(),
            bundles = self.bundles.len(),
            "Constructed tracker geometry"
        );
        Tracker {
            generation: Generation::Tracker2014,
            tree: self.tree,
            bundles: self.bundles,
        }
    }

    fn add_support(
        &mut self,
        group: UChannelGroup,
        half: Half,
        kin_mount: Option<NodeKey>,
    ) -> Result<()> {
        let channel = self.add(
            PartKind::UChannel { group, half },
            kin_mount,
            Some(AlignmentCorrection::none()),
        )?;
        self.add(PartKind::SupportPlate { group, half }, Some(channel), None)?;
        self.channels.insert((group, half), channel);
        Ok(())
    }

    fn add_half_module(&mut self, id: HalfModuleId, module: NodeKey) -> Result<HalfModuleBundle> {
        let top = id.half.is_top();
        let hole = id.position.map_or(true, ModulePosition::is_hole);
        let sensor_index = millepede_layer(top, id.layer, id.orientation.is_axial(), hole);
        let correction = self.mille.half_module_correction(top, sensor_index)?;

        let half_module = self.add_child(PartKind::HalfModule(id), module, Some(correction))?;
        let sensor = self.add_child(PartKind::Sensor(id), half_module, None)?;
        let active_sensor = self.add_child(PartKind::ActiveSensor(id), sensor, None)?;
        let lamination = self.add_child(PartKind::Lamination(id), half_module, None)?;
        let (carbon_fiber, hybrid) = if id.is_short() {
            (
                Some(self.add_child(PartKind::CarbonFiber(id), half_module, None)?),
                Some(self.add_child(PartKind::Hybrid(id), half_module, None)?),
            )
        } else {
            (None, None)
        };

        Ok(HalfModuleBundle {
            half_module,
            orientation: id.orientation,
            position: id.position,
            sensor,
            active_sensor,
            lamination: Some(lamination),
            carbon_fiber,
            hybrid,
        })
    }

    // Parts on the SVT box, placed through an optional reference.
    fn add(
        &mut self,
        part: PartKind,
        reference: Option<NodeKey>,
        alignment: Option<AlignmentCorrection>,
    ) -> Result<NodeKey> {
        let alignment = alignment.map(|a| self.with_survey(&part, a));
        insert(
            &mut self.tree,
            self.detector,
            self.config,
            part,
            Some(self.base),
            reference,
            alignment,
        )
    }

    fn add_child(
        &mut self,
        part: PartKind,
        mother: NodeKey,
        alignment: Option<AlignmentCorrection>,
    ) -> Result<NodeKey> {
        let alignment = alignment.map(|a| self.with_survey(&part, a));
        insert(&mut self.tree, self.detector, self.config, part, Some(mother), None, alignment)
    }

    // Attaches the adjusted survey result measured on `part`, if any.
    fn with_survey(&self, part: &PartKind, correction: AlignmentCorrection) -> AlignmentCorrection {
        let survey = part.survey_target().and_then(|target| {
            self.detector
                .survey_result(&part.name())
                .map(|s| s.adjusted(target))
        });
        if survey.is_some() {
            tracing::debug!(part = %part.name(), "Applying survey result");
        }
        correction.with_survey(survey)
    }
}

fn insert(
    tree: &mut NodeTree,
    detector: &DetectorConfig,
    config: &BuildConfig,
    part: PartKind,
    mother: Option<NodeKey>,
    reference: Option<NodeKey>,
    alignment: Option<AlignmentCorrection>,
) -> Result<NodeKey> {
    let name = part.name();
    let points = detector
        .has_survey_points(&name)
        .then_some(PointSource::Lookup);
    let mut spec = part.spec(config, points);
    if let Some(mother) = mother {
        spec = spec.mother(mother);
    }
    if let Some(reference) = reference {
        spec = spec.reference(reference);
    }
    if let Some(alignment) = alignment {
        spec = spec.alignment(alignment);
    }
    tree.insert(spec).map_err(Error::from)
}
