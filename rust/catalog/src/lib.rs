// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # SVT Survey Catalog
//!
//! The parts of the 2014 silicon vertex tracker and the order they are built in.
//!
//! ## Overview
//!
//! - **Parts**: [`PartKind`] holds the survey points, box and material of
//!   every part, from the vacuum chamber down to the hybrids.
//! - **Build**: [`build_tracker`] inserts the parts into a
//!   [`NodeTree`](svt_survey_tree::NodeTree) and wires up alignment
//!   corrections from a [`DetectorConfig`].
//!
//! ## Example
//!
//! ```
//! use svt_survey_catalog::{build_tracker, DetectorConfig, Generation};
//! use svt_survey_tree::{BuildConfig, Half};
//!
//! let tracker = build_tracker(
//!     Generation::Tracker2014,
//!     &DetectorConfig::nominal(),
//!     &BuildConfig::default(),
//! )
//! .unwrap();
//!
//! let l1 = tracker.bundle(1, Half::Bottom).unwrap();
//! let frame = tracker
//!     .tree
//!     .resolve_frame_relative_to(l1.module, "trackingVolume")
//!     .unwrap();
//! assert!(frame.is_orthonormal(1e-9));
//! ```

pub mod builder;
pub mod config;
pub mod constants;
pub mod error;
pub mod parts;

pub use builder::{build_tracker, Generation, Tracker, TrackerBuilder, TRACKING_VOLUME};
pub use config::{DetectorConfig, SurveyPointsEntry, SurveyResultEntry};
pub use error::{Error, Result};
pub use parts::{HalfModuleId, PartKind};
