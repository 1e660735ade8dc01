// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # SVT Survey Tree
//!
//! Arena of geometry nodes for a survey-based tracker description.
//!
//! Each node is one mechanical part. Its frame is derived from three survey
//! points given in its mother's frame, composed through optional reference
//! nodes, then corrected. The [`NodeTree`] stores nodes with stable
//! [`NodeKey`]s in construction order, and resolves any node's frame relative
//! to any of its ancestors.
//!
//! Construction order is load-bearing: a node can only be inserted after its
//! mother and references.

pub mod bundle;
pub mod config;
pub mod error;
pub mod keys;
pub mod meta;
pub mod node;
pub mod placement;
pub mod resolve;
pub mod tree;

pub use bundle::{BundleRegistry, HalfModuleBundle, ModuleBundle};
pub use config::BuildConfig;
pub use error::{Error, Result};
pub use keys::NodeKey;
pub use meta::{is_axial, millepede_layer, Half, ModulePosition, NodeKind, NodeMeta, SensorOrientation};
pub use node::{GeometryNode, NodeSpec, PointSource, DEFAULT_MATERIAL};
pub use placement::NodePlacement;
pub use tree::NodeTree;
