// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry nodes and the descriptors they are built from.

use nalgebra::{Rotation3, Vector3};
use svt_survey_frame::{AlignmentCorrection, CoordinateSystem, SurveyTriple};

use crate::keys::NodeKey;
use crate::meta::NodeMeta;

/// Material of a node that does not name one.
pub const DEFAULT_MATERIAL: &str = "Vacuum";

/// Where a node takes its survey points from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointSource {
    /// Constants known when the descriptor is built.
    Fixed(SurveyTriple),
    /// Looked up by node name in the tree's external survey-point table.
    Lookup,
}

/// Everything needed to construct one node.
///
/// Built with the chained setters and consumed by
/// [`NodeTree::insert`](crate::NodeTree::insert).
#[derive(Debug, Clone)]
pub struct NodeSpec {
    pub(crate) name: String,
    pub(crate) meta: Option<NodeMeta>,
    pub(crate) material: String,
    pub(crate) mother: Option<NodeKey>,
    pub(crate) references: Vec<NodeKey>,
    pub(crate) points: PointSource,
    pub(crate) center: Option<Vector3<f64>>,
    pub(crate) box_dimensions: Option<Vector3<f64>>,
    pub(crate) generic_correction: Option<Rotation3<f64>>,
    pub(crate) alignment: Option<AlignmentCorrection>,
}

impl NodeSpec {
    /// Node named after its metadata.
    pub fn new(meta: NodeMeta, points: PointSource) -> Self {
        let mut spec = Self::named(meta.display_name(), points);
        spec.meta = Some(meta);
        spec
    }

    /// Node with an explicit name and no metadata.
    pub fn named(name: impl Into<String>, points: PointSource) -> Self {
        Self {
            name: name.into(),
            meta: None,
            material: DEFAULT_MATERIAL.to_string(),
            mother: None,
            references: Vec::new(),
            points,
            center: None,
            box_dimensions: None,
            generic_correction: None,
            alignment: None,
        }
    }

    pub fn material(mut self, material: impl Into<String>) -> Self {
        self.material = material.into();
        self
    }

    pub fn mother(mut self, mother: NodeKey) -> Self {
        self.mother = Some(mother);
        self
    }

    /// Appends a reference; references are composed in the order added.
    pub fn reference(mut self, reference: NodeKey) -> Self {
        self.references.push(reference);
        self
    }

    /// Box centered at `center` (local frame) with full extents `dimensions`.
    pub fn with_box(mut self, center: Vector3<f64>, dimensions: Vector3<f64>) -> Self {
        self.center = Some(center);
        self.box_dimensions = Some(dimensions);
        self
    }

    /// Center without a box, for anchors that still report a center.
    pub fn center(mut self, center: Vector3<f64>) -> Self {
        self.center = Some(center);
        self
    }

    /// Rotation applied to the axes, in the mother frame, after the box is set.
    pub fn generic_correction(mut self, rotation: Rotation3<f64>) -> Self {
        self.generic_correction = Some(rotation);
        self
    }

    pub fn alignment(mut self, correction: AlignmentCorrection) -> Self {
        self.alignment = Some(correction);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// One mechanical part with its finalized frame.
///
/// Nodes are read-only once inserted.
#[derive(Debug, Clone)]
pub struct GeometryNode {
    pub(crate) name: String,
    pub(crate) meta: Option<NodeMeta>,
    pub(crate) material: String,
    pub(crate) mother: Option<NodeKey>,
    pub(crate) references: Vec<NodeKey>,
    pub(crate) survey: SurveyTriple,
    pub(crate) coord: CoordinateSystem,
    pub(crate) center: Option<Vector3<f64>>,
    pub(crate) box_dimensions: Option<Vector3<f64>>,
}

impl GeometryNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn meta(&self) -> Option<&NodeMeta> {
        self.meta.as_ref()
    }

    pub fn material(&self) -> &str {
        &self.material
    }

    pub fn mother(&self) -> Option<NodeKey> {
        self.mother
    }

    pub fn references(&self) -> &[NodeKey] {
        &self.references
    }

    /// Survey points the frame was derived from, in the mother frame.
    pub fn survey_points(&self) -> &SurveyTriple {
        &self.survey
    }

    /// Frame of this node in its mother's frame.
    pub fn frame(&self) -> &CoordinateSystem {
        &self.coord
    }

    /// Box center in the node's local frame.
    pub fn center(&self) -> Option<&Vector3<f64>> {
        self.center.as_ref()
    }

    /// Full box extents along (u, v, w).
    pub fn box_dimensions(&self) -> Option<&Vector3<f64>> {
        self.box_dimensions.as_ref()
    }

    /// A node without a box only anchors a frame.
    pub fn is_ghost(&self) -> bool {
        self.box_dimensions.is_none()
    }
}
