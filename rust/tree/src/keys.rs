// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Node key type for arena-based storage.
//!
//! Keys are created by `slotmap::SlotMap` and stay valid for the lifetime of
//! the tree. Nodes are never removed.

use slotmap::new_key_type;

new_key_type! {
    /// Key for a geometry node in a [`NodeTree`](crate::NodeTree).
    pub struct NodeKey;
}
