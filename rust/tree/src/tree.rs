// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena that owns every geometry node of one detector build.
//!
//! Nodes are inserted top-down. [`NodeTree::insert`] runs the whole node
//! lifecycle before it returns, so a node can only name a mother or
//! reference that is already final:
//!
//! 1. take the survey points (fixed, or looked up by name),
//! 2. build the local frame,
//! 3. transform it through each reference in order,
//! 4. record center and box,
//! 5. apply the generic rotation,
//! 6. apply the alignment correction.

use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use svt_survey_frame::{CoordinateSystem, SurveyTriple};

use crate::error::{Error, Result};
use crate::keys::NodeKey;
use crate::node::{GeometryNode, NodeSpec, PointSource};

/// Owner of all nodes, in construction order.
///
/// # Example
///
/// ```
/// use nalgebra::Point3;
/// use svt_survey_frame::SurveyTriple;
/// use svt_survey_tree::{NodeSpec, NodeTree, PointSource};
///
/// let mut tree = NodeTree::new();
/// let world = tree
///     .insert(NodeSpec::named(
///         "world",
///         PointSource::Fixed(SurveyTriple::axis_aligned(Point3::origin())),
///     ))
///     .unwrap();
/// let plate = tree
///     .insert(
///         NodeSpec::named(
///             "plate",
///             PointSource::Fixed(SurveyTriple::axis_aligned(Point3::new(10.0, 0.0, 0.0))),
///         )
///         .mother(world),
///     )
///     .unwrap();
///
/// assert_eq!(tree.len(), 2);
/// assert_eq!(tree.node(plate).unwrap().frame().origin().x, 10.0);
/// ```
#[derive(Debug, Clone)]
pub struct NodeTree {
    // Node storage
    pub(crate) nodes: SlotMap<NodeKey, GeometryNode>,
    pub(crate) order: Vec<NodeKey>,
    pub(crate) root: Option<NodeKey>,

    // Indexes
    pub(crate) by_name: FxHashMap<String, NodeKey>,

    // Survey points for nodes built with PointSource::Lookup
    pub(crate) survey_points: FxHashMap<String, SurveyTriple>,
}

impl NodeTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            order: Vec::new(),
            root: None,
            by_name: FxHashMap::default(),
            survey_points: FxHashMap::default(),
        }
    }

    /// Creates an empty tree whose lookup nodes read their points from `points`.
    pub fn with_survey_points(points: impl IntoIterator<Item = (String, SurveyTriple)>) -> Self {
        let mut tree = Self::new();
        tree.survey_points.extend(points);
        tree
    }

    /// Builds a node from `spec` and stores it.
    ///
    /// The first node inserted without a mother becomes the root; any later
    /// node without one is rejected.
    pub fn insert(&mut self, spec: NodeSpec) -> Result<NodeKey> {
        let NodeSpec {
            name,
            meta,
            material,
            mother,
            references,
            points,
            center,
            box_dimensions,
            generic_correction,
            alignment,
        } = spec;

        if self.by_name.contains_key(&name) {
            return Err(Error::DuplicateName(name));
        }
        match mother {
            Some(key) if !self.nodes.contains_key(key) => {
                return Err(Error::MotherNotFound { name, key });
            }
            None => {
                if let Some(root) = self.root {
                    let root = self.nodes.get(root).map(|n| n.name.clone()).unwrap_or_default();
                    return Err(Error::MissingMother { name, root });
                }
            }
            _ => {}
        }

        let survey = match points {
            PointSource::Fixed(triple) => triple,
            PointSource::Lookup => match self.survey_points.get(&name) {
                Some(triple) => *triple,
                None => return Err(Error::MissingSurveyPoints(name)),
            },
        };

        let mut coord = CoordinateSystem::from_survey(&survey)?;
        tracing::trace!(node = %name, frame = %coord, "local frame");

        let mut reference_transforms = Vec::with_capacity(references.len());
        for &key in &references {
            let Some(reference) = self.nodes.get(key) else {
                return Err(Error::ReferenceNotFound { name, key });
            };
            let transform = reference.coord.transformation();
            coord.transform(&transform);
            reference_transforms.push(transform);
            tracing::trace!(node = %name, reference = %reference.name, frame = %coord, "composed reference");
        }

        if let Some(rotation) = &generic_correction {
            coord.rotate(rotation);
            tracing::trace!(node = %name, frame = %coord, "generic correction");
        }

        if let Some(correction) = &alignment {
            correction.apply(&mut coord, &reference_transforms)?;
            tracing::trace!(node = %name, frame = %coord, "alignment correction");
        }

        tracing::debug!(
            node = %name,
            material = %material,
            references = references.len(),
            ghost = box_dimensions.is_none(),
            frame = %coord,
            "Built geometry node"
        );

        let key = self.nodes.insert(GeometryNode {
            name: name.clone(),
            meta,
            material,
            mother,
            references,
            survey,
            coord,
            center,
            box_dimensions,
        });
        self.order.push(key);
        self.by_name.insert(name, key);
        if mother.is_none() {
            self.root = Some(key);
        }
        Ok(key)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn node(&self, key: NodeKey) -> Option<&GeometryNode> {
        self.nodes.get(key)
    }

    /// Like [`Self::node`] but a missing key is an error.
    pub fn get(&self, key: NodeKey) -> Result<&GeometryNode> {
        self.nodes.get(key).ok_or(Error::NodeNotFound(key))
    }

    pub fn get_by_name(&self, name: &str) -> Option<&GeometryNode> {
        self.key_of(name).and_then(|key| self.nodes.get(key))
    }

    pub fn key_of(&self, name: &str) -> Option<NodeKey> {
        self.by_name.get(name).copied()
    }

    /// Like [`Self::key_of`] but a missing name is an error.
    pub fn require(&self, name: &str) -> Result<NodeKey> {
        self.key_of(name)
            .ok_or_else(|| Error::UnknownNode(name.to_string()))
    }

    /// Nodes in construction order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeKey, &GeometryNode)> + '_ {
        self.order
            .iter()
            .filter_map(move |&key| self.nodes.get(key).map(|node| (key, node)))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> Option<NodeKey> {
        self.root
    }

    /// Mother, grandmother, ... up to and including the root.
    pub fn ancestors(&self, key: NodeKey) -> impl Iterator<Item = (NodeKey, &GeometryNode)> + '_ {
        let mut next = self.nodes.get(key).and_then(|n| n.mother);
        std::iter::from_fn(move || {
            let key = next?;
            let node = self.nodes.get(key)?;
            next = node.mother;
            Some((key, node))
        })
    }

    /// Direct children of `key`, in construction order.
    pub fn daughters(&self, key: NodeKey) -> impl Iterator<Item = (NodeKey, &GeometryNode)> + '_ {
        self.iter().filter(move |(_, node)| node.mother == Some(key))
    }

    /// Nearest ancestor that has a box.
    pub fn solid_ancestor(&self, key: NodeKey) -> Option<(NodeKey, &GeometryNode)> {
        self.ancestors(key).find(|(_, node)| !node.is_ghost())
    }
}

impl Default for NodeTree {
    fn default() -> Self {
        Self::new()
    }
}
