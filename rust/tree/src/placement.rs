// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Consumer-facing placement records and text summaries.

use std::fmt;

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use svt_survey_frame::{cardan_angles, fmt_vec, CoordinateSystem};

use crate::error::Result;
use crate::keys::NodeKey;
use crate::node::GeometryNode;
use crate::tree::NodeTree;

/// Placement of one node relative to a chosen ancestor.
///
/// `center` and `box_dimensions` stay in the node's local frame;
/// `box_center` is the same center expressed in the ancestor frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePlacement {
    pub name: String,
    pub relative_to: String,
    pub mother: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
    pub material: String,
    pub ghost: bool,
    pub origin: [f64; 3],
    pub u: [f64; 3],
    pub v: [f64; 3],
    pub w: [f64; 3],
    /// XYZ Cardan angles of the rotation taking the ancestor axes onto (u, v, w).
    pub cardan_angles: [f64; 3],
    pub center: Option<[f64; 3]>,
    pub box_center: Option<[f64; 3]>,
    pub box_dimensions: Option<[f64; 3]>,
}

fn arr(v: &Vector3<f64>) -> [f64; 3] {
    [v.x, v.y, v.z]
}

impl NodeTree {
    fn name_of(&self, key: NodeKey) -> Option<String> {
        self.node(key).map(|n| n.name.clone())
    }

    /// Placement of `key` in the frame of the ancestor named `ancestor`.
    pub fn placement(&self, key: NodeKey, ancestor: &str) -> Result<NodePlacement> {
        let node = self.get(key)?;
        let transform = self.transform_to_ancestor(key, ancestor)?;
        let axes = transform.rotation.matrix();

        Ok(NodePlacement {
            name: node.name.clone(),
            relative_to: ancestor.to_string(),
            mother: node.mother.and_then(|m| self.name_of(m)),
            references: node
                .references
                .iter()
                .filter_map(|&r| self.name_of(r))
                .collect(),
            material: node.material.clone(),
            ghost: node.is_ghost(),
            origin: arr(&transform.translation),
            u: arr(&axes.column(0).into_owned()),
            v: arr(&axes.column(1).into_owned()),
            w: arr(&axes.column(2).into_owned()),
            cardan_angles: arr(&cardan_angles(&transform.rotation)),
            center: node.center.as_ref().map(arr),
            box_center: node
                .center
                .map(|c| arr(&transform.apply_point(&Point3::from(c)).coords)),
            box_dimensions: node.box_dimensions.as_ref().map(arr),
        })
    }

    /// Placements of `ancestor` and every node below it, in construction order.
    ///
    /// Fails if no node is called `ancestor` or a placement cannot be resolved.
    pub fn placements(&self, ancestor: &str) -> Result<Vec<NodePlacement>> {
        let anchor = self.require(ancestor)?;
        self.iter()
            .filter(|&(key, _)| key == anchor || self.ancestors(key).any(|(k, _)| k == anchor))
            .map(|(key, _)| self.placement(key, ancestor))
            .collect()
    }

    /// Multi-line summary of a node, with its frame expressed in every ancestor.
    pub fn describe(&self, key: NodeKey) -> Result<String> {
        let node = self.get(key)?;
        let frames = self
            .ancestors(key)
            .map(|(_, ancestor)| {
                self.resolve_frame_relative_to(key, &ancestor.name)
                    .map(|frame| (ancestor.name.as_str(), frame))
            })
            .collect::<Result<Vec<_>>>()?;

        let description = NodeDescription {
            node,
            mother: node
                .mother
                .and_then(|m| self.name_of(m))
                .unwrap_or_else(|| "-".to_string()),
            references: node
                .references
                .iter()
                .filter_map(|&r| self.name_of(r))
                .collect(),
            frames,
        };
        Ok(description.to_string())
    }
}

struct NodeDescription<'a> {
    node: &'a GeometryNode,
    mother: String,
    references: Vec<String>,
    frames: Vec<(&'a str, CoordinateSystem)>,
}

impl fmt::Display for NodeDescription<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node;
        writeln!(f, "{} ({})", node.name, node.material)?;
        writeln!(
            f,
            "  mother {} references [{}]",
            self.mother,
            self.references.join(", ")
        )?;
        writeln!(
            f,
            "  ball {} vee {} flat {}",
            fmt_vec(&node.survey.ball.coords),
            fmt_vec(&node.survey.vee.coords),
            fmt_vec(&node.survey.flat.coords)
        )?;
        writeln!(f, "  frame {}", node.coord)?;
        match (&node.center, &node.box_dimensions) {
            (Some(c), Some(d)) => writeln!(f, "  center {} box {}", fmt_vec(c), fmt_vec(d))?,
            (Some(c), None) => writeln!(f, "  center {} (ghost)", fmt_vec(c))?,
            _ => writeln!(f, "  ghost")?,
        }
        for (name, frame) in &self.frames {
            writeln!(f, "  in {name}: {frame}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeSpec, PointSource};
    use approx::assert_relative_eq;
    use svt_survey_frame::SurveyTriple;

    fn two_level() -> (NodeTree, NodeKey) {
        let mut tree = NodeTree::new();
        let root = tree
            .insert(NodeSpec::named(
                "root",
                PointSource::Fixed(SurveyTriple::axis_aligned(Point3::origin())),
            ))
            .unwrap();
        let plate = tree
            .insert(
                NodeSpec::named(
                    "plate",
                    PointSource::Fixed(SurveyTriple::from_offsets(
                        Point3::new(1.0, 2.0, 3.0),
                        Vector3::y(),
                        -Vector3::x(),
                    )),
                )
                .mother(root)
                .material("Aluminum")
                .with_box(Vector3::new(10.0, 0.0, 0.0), Vector3::new(20.0, 4.0, 1.0)),
            )
            .unwrap();
        (tree, plate)
    }

    #[test]
    fn placement_reports_frame_and_box() {
        let (tree, plate) = two_level();
        let p = tree.placement(plate, "root").unwrap();
        assert_eq!(p.name, "plate");
        assert_eq!(p.mother.as_deref(), Some("root"));
        assert_eq!(p.material, "Aluminum");
        assert!(!p.ghost);
        assert_eq!(p.origin, [1.0, 2.0, 3.0]);
        assert_relative_eq!(p.u[1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.cardan_angles[2], std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
        // local +x is root +y
        let box_center = p.box_center.unwrap();
        assert_relative_eq!(box_center[1], 12.0, epsilon = 1e-12);
        assert_eq!(p.box_dimensions, Some([20.0, 4.0, 1.0]));
    }

    #[test]
    fn placements_serialize_to_json() {
        let (tree, _) = two_level();
        let all = tree.placements("root").unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].ghost);
        let json = serde_json::to_string(&all).unwrap();
        let back: Vec<NodePlacement> = serde_json::from_str(&json).unwrap();
        assert_eq!(back[1].name, "plate");
    }

    #[test]
    fn placements_cover_the_named_subtree() {
        let (mut tree, plate) = two_level();
        let root = tree.root().unwrap();
        tree.insert(
            NodeSpec::named(
                "rail",
                PointSource::Fixed(SurveyTriple::axis_aligned(Point3::new(0.0, 5.0, 0.0))),
            )
            .mother(root),
        )
        .unwrap();
        tree.insert(
            NodeSpec::named(
                "bolt",
                PointSource::Fixed(SurveyTriple::axis_aligned(Point3::new(1.0, 0.0, 0.0))),
            )
            .mother(plate),
        )
        .unwrap();

        let below_plate = tree.placements("plate").unwrap();
        let names: Vec<&str> = below_plate.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["plate", "bolt"]);
        assert_eq!(below_plate[0].origin, [0.0, 0.0, 0.0]);
        assert_eq!(tree.placements("root").unwrap().len(), 4);

        assert!(matches!(
            tree.placements("nowhere"),
            Err(crate::Error::UnknownNode(ref n)) if n == "nowhere"
        ));
    }

    #[test]
    fn describe_lists_every_ancestor() {
        let (tree, plate) = two_level();
        let text = tree.describe(plate).unwrap();
        assert!(text.starts_with("plate (Aluminum)"));
        assert!(text.contains("mother root"));
        assert!(text.contains("in root:"));
        assert!(text.contains("center [ 10.00000, 0.00000, 0.00000 ] box [ 20.00000, 4.00000, 1.00000 ]"));
        assert!(text.ends_with('\n'));
    }
}
