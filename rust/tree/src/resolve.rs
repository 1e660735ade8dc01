// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Expressing a node's frame in the frame of one of its ancestors.

use nalgebra::{Point3, Vector3};
use svt_survey_frame::{CoordinateSystem, Transform};

use crate::error::{Error, Result};
use crate::keys::NodeKey;
use crate::tree::NodeTree;

impl NodeTree {
    /// Transform from the local frame of `key` into the frame of the ancestor
    /// named `ancestor`.
    ///
    /// Walks mother links, composing each mother's transform on the left,
    /// until the mother's name matches. Naming the node itself gives the
    /// identity.
    pub fn transform_to_ancestor(&self, key: NodeKey, ancestor: &str) -> Result<Transform> {
        let node = self.get(key)?;
        if node.name == ancestor {
            return Ok(Transform::identity());
        }

        let mut transform = node.coord.transformation();
        let mut current = node;
        loop {
            let Some(mother_key) = current.mother else {
                return Err(Error::AncestorNotFound {
                    name: node.name.clone(),
                    ancestor: ancestor.to_string(),
                });
            };
            let mother = self.get(mother_key)?;
            if mother.name == ancestor {
                return Ok(transform);
            }
            transform = mother.coord.transformation() * transform;
            current = mother;
        }
    }

    /// Frame of `key` expressed in the ancestor named `ancestor`.
    ///
    /// For the immediate mother this is the node's own frame.
    pub fn resolve_frame_relative_to(&self, key: NodeKey, ancestor: &str) -> Result<CoordinateSystem> {
        let transform = self.transform_to_ancestor(key, ancestor)?;
        Ok(CoordinateSystem::from_transformation(&transform))
    }

    /// Maps a point given in the local frame of `key` into the ancestor frame.
    pub fn transform_point_to_ancestor(
        &self,
        key: NodeKey,
        ancestor: &str,
        point: &Point3<f64>,
    ) -> Result<Point3<f64>> {
        Ok(self.transform_to_ancestor(key, ancestor)?.apply_point(point))
    }

    /// Rotates a direction given in the local frame of `key` into the ancestor frame.
    pub fn rotate_vector_to_ancestor(
        &self,
        key: NodeKey,
        ancestor: &str,
        vector: &Vector3<f64>,
    ) -> Result<Vector3<f64>> {
        Ok(self.transform_to_ancestor(key, ancestor)?.apply_vector(vector))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeSpec, PointSource};
    use approx::assert_relative_eq;
    use svt_survey_frame::SurveyTriple;

    fn chain() -> (NodeTree, NodeKey, NodeKey) {
        let mut tree = NodeTree::new();
        let root = tree
            .insert(NodeSpec::named(
                "root",
                PointSource::Fixed(SurveyTriple::axis_aligned(Point3::new(0.0, 0.0, 100.0))),
            ))
            .unwrap();
        // quarter turn about z, at (5, 0, 0)
        let a = tree
            .insert(
                NodeSpec::named(
                    "a",
                    PointSource::Fixed(SurveyTriple::from_offsets(
                        Point3::new(5.0, 0.0, 0.0),
                        Vector3::y(),
                        -Vector3::x(),
                    )),
                )
                .mother(root),
            )
            .unwrap();
        let b = tree
            .insert(
                NodeSpec::named(
                    "b",
                    PointSource::Fixed(SurveyTriple::axis_aligned(Point3::new(2.0, 0.0, 0.0))),
                )
                .mother(a),
            )
            .unwrap();
        (tree, a, b)
    }

    #[test]
    fn one_hop_matches_own_frame() {
        let (tree, _, b) = chain();
        let resolved = tree.resolve_frame_relative_to(b, "a").unwrap();
        let own = tree.node(b).unwrap().frame();
        assert_relative_eq!(resolved.origin().coords, own.origin().coords, epsilon = 1e-12);
        assert_relative_eq!(*resolved.u(), *own.u(), epsilon = 1e-12);
        assert_relative_eq!(*resolved.w(), *own.w(), epsilon = 1e-12);
    }

    #[test]
    fn two_hops_compose_mother_on_the_left() {
        let (tree, _, b) = chain();
        let resolved = tree.resolve_frame_relative_to(b, "root").unwrap();
        // b's local x is a's local x = root +y
        assert_relative_eq!(resolved.origin().coords, Vector3::new(5.0, 2.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(*resolved.u(), Vector3::y(), epsilon = 1e-12);

        let above_root = tree.transform_to_ancestor(b, "root").unwrap();
        let p = tree
            .transform_point_to_ancestor(b, "root", &Point3::new(1.0, 0.0, 0.0))
            .unwrap();
        assert_relative_eq!(p, above_root.apply_point(&Point3::new(1.0, 0.0, 0.0)));
        let v = tree.rotate_vector_to_ancestor(b, "root", &Vector3::y()).unwrap();
        assert_relative_eq!(v, -Vector3::x(), epsilon = 1e-12);
    }

    #[test]
    fn self_is_identity() {
        let (tree, a, _) = chain();
        assert_eq!(tree.transform_to_ancestor(a, "a").unwrap(), Transform::identity());
    }

    #[test]
    fn missing_ancestor_fails_at_root() {
        let (tree, _, b) = chain();
        assert!(matches!(
            tree.resolve_frame_relative_to(b, "nowhere"),
            Err(Error::AncestorNotFound { ref name, .. }) if name == "b"
        ));
    }

    #[test]
    fn descendants_are_not_ancestors() {
        let (tree, a, _) = chain();
        assert!(tree.transform_to_ancestor(a, "b").is_err());
    }
}
