// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for catalog builds
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading a detector configuration or building a tracker
#[derive(Error, Debug)]
pub enum Error {
    #[error("Tree error: {0}")]
    Tree(#[from] svt_survey_tree::Error),

    #[error("Frame error: {0}")]
    Frame(#[from] svt_survey_frame::Error),

    #[error("Cannot read detector configuration {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid detector configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Survey result {name} has a degenerate axis")]
    InvalidSurveyResult { name: String },

    #[error("Duplicate {what} entry for {name}")]
    DuplicateEntry { what: &'static str, name: String },
}
