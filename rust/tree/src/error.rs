// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for tree construction and lookups.

use crate::keys::NodeKey;
use crate::meta::Half;

/// Result type alias for tree operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or querying a node tree.
///
/// Every variant aborts the build; none is recovered internally.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Frame derivation or an alignment correction failed.
    #[error(transparent)]
    Frame(#[from] svt_survey_frame::Error),

    /// A non-root node was inserted without a mother.
    #[error("node {name} has no mother but the tree already has root {root}")]
    MissingMother { name: String, root: String },

    /// The mother key does not belong to this tree.
    #[error("mother {key:?} of node {name} is not in the tree")]
    MotherNotFound { name: String, key: NodeKey },

    /// A reference key does not belong to this tree.
    #[error("reference {key:?} of node {name} is not in the tree")]
    ReferenceNotFound { name: String, key: NodeKey },

    /// Node names are unique within a tree.
    #[error("duplicate node name {0}")]
    DuplicateName(String),

    /// A node key does not belong to this tree.
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeKey),

    /// No node carries this name.
    #[error("no node named {0}")]
    UnknownNode(String),

    /// The root was reached without meeting the named ancestor.
    #[error("ancestor {ancestor} not found above node {name}")]
    AncestorNotFound { name: String, ancestor: String },

    /// The node reads its survey points from the external table and none were given.
    #[error("no survey points for node {0}")]
    MissingSurveyPoints(String),

    /// A node name does not decode into layer, half and orientation fields.
    #[error("cannot decode node name {0}")]
    UnknownNodeName(String),

    /// At most one module bundle per (layer, half).
    #[error("There is already a module bundle with layer {layer} and half {half}")]
    DuplicateBundle { layer: u8, half: Half },
}
