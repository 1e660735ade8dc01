// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Detector configuration documents.
//!
//! A [`DetectorConfig`] carries everything a build reads from outside the
//! code: millepede constants, survey results measured on individual parts,
//! and optional replacement survey points. It is plain JSON:
//!
//! ```json
//! {
//!   "name": "HPS-Proposal2014-v8-2pt2",
//!   "millepede_constants": [{ "id": 11101, "value": 0.0 }],
//!   "survey_results": [
//!     { "name": "module_L1b", "origin": [0, 0, 0], "x": [1, 0, 0], "y": [0, 1, 0], "z": [0, 0, 1] }
//!   ],
//!   "survey_points": [
//!     { "name": "base", "ball": [0, 0, 0], "vee": [1, 0, 0], "flat": [0, 1, 0] }
//!   ]
//! }
//! ```

use std::path::Path;

use nalgebra::{Point3, Vector3};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use svt_survey_frame::{
    MilleParameter, MilleTable, SurveyResult, SurveyTriple, DEGENERACY_TOLERANCE,
};

use crate::constants::MAX_MILLEPEDE_LAYER;
use crate::error::{Error, Result};

/// A measured frame for the part called `name`, in metrology convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyResultEntry {
    pub name: String,
    pub origin: [f64; 3],
    pub x: [f64; 3],
    pub y: [f64; 3],
    pub z: [f64; 3],
}

impl SurveyResultEntry {
    pub fn to_survey_result(&self) -> SurveyResult {
        SurveyResult::new(
            Point3::from(self.origin),
            Vector3::from(self.x),
            Vector3::from(self.y),
            Vector3::from(self.z),
        )
    }
}

/// Replacement ball, vee and flat for the part called `name`, in its mother frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyPointsEntry {
    pub name: String,
    pub ball: [f64; 3],
    pub vee: [f64; 3],
    pub flat: [f64; 3],
}

impl SurveyPointsEntry {
    pub fn to_triple(&self) -> SurveyTriple {
        SurveyTriple::new(
            Point3::from(self.ball),
            Point3::from(self.vee),
            Point3::from(self.flat),
        )
    }
}

/// External inputs of one tracker build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub name: Option<String>,
    pub millepede_constants: Vec<MilleParameter>,
    pub survey_results: Vec<SurveyResultEntry>,
    pub survey_points: Vec<SurveyPointsEntry>,
}

impl DetectorConfig {
    /// Zero-valued alignment constants for every half-module, no surveys.
    pub fn nominal() -> Self {
        Self {
            name: Some("nominal".to_string()),
            millepede_constants: MilleTable::nominal(MAX_MILLEPEDE_LAYER).iter().copied().collect(),
            ..Self::default()
        }
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        tracing::debug!(
            path = %path.display(),
            constants = config.millepede_constants.len(),
            survey_results = config.survey_results.len(),
            survey_points = config.survey_points.len(),
            "Loaded detector configuration"
        );
        Ok(config)
    }

    /// Rejects duplicate names and survey results whose axes cannot form a frame.
    pub fn validate(&self) -> Result<()> {
        let mut seen = FxHashSet::default();
        for entry in &self.survey_results {
            if !seen.insert(entry.name.as_str()) {
                return Err(Error::DuplicateEntry {
                    what: "survey result",
                    name: entry.name.clone(),
                });
            }
            let s = entry.to_survey_result();
            if s.x.cross(&s.y).norm() < DEGENERACY_TOLERANCE {
                return Err(Error::InvalidSurveyResult {
                    name: entry.name.clone(),
                });
            }
        }

        seen.clear();
        for entry in &self.survey_points {
            if !seen.insert(entry.name.as_str()) {
                return Err(Error::DuplicateEntry {
                    what: "survey points",
                    name: entry.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Decoded millepede table; a malformed id is an error.
    pub fn mille_table(&self) -> Result<MilleTable> {
        Ok(MilleTable::new(self.millepede_constants.iter().copied())?)
    }

    /// Survey result measured on `name`, unadjusted.
    pub fn survey_result(&self, name: &str) -> Option<SurveyResult> {
        self.survey_results
            .iter()
            .find(|e| e.name == name)
            .map(SurveyResultEntry::to_survey_result)
    }

    pub fn has_survey_points(&self, name: &str) -> bool {
        self.survey_points.iter().any(|e| e.name == name)
    }

    /// Replacement survey points keyed by node name.
    pub fn survey_point_table(&self) -> impl Iterator<Item = (String, SurveyTriple)> + '_ {
        self.survey_points
            .iter()
            .map(|e| (e.name.clone(), e.to_triple()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nominal_covers_every_half_module() {
        let config = DetectorConfig::nominal();
        // 2 halves x 2 kinds x 3 axes x 18 sensors
        assert_eq!(config.millepede_constants.len(), 216);
        assert!(config.millepede_constants.iter().all(|p| p.value == 0.0));
        let table = config.mille_table().unwrap();
        assert!(table.half_module_correction(true, 18).is_ok());
        assert!(table.half_module_correction(false, 19).is_err());
    }

    #[test]
    fn parses_partial_document() {
        let config = DetectorConfig::from_json_str(
            r#"{
                "survey_results": [
                    { "name": "module_L1b", "origin": [1, 2, 3], "x": [1, 0, 0], "y": [0, 1, 0], "z": [0, 0, 1] }
                ]
            }"#,
        )
        .unwrap();
        assert!(config.millepede_constants.is_empty());
        assert!(config.name.is_none());
        let s = config.survey_result("module_L1b").unwrap();
        assert_eq!(s.origin, Point3::new(1.0, 2.0, 3.0));
        assert!(config.survey_result("module_L1t").is_none());
    }

    #[test]
    fn duplicate_survey_result_is_rejected() {
        let entry = r#"{ "name": "base", "origin": [0, 0, 0], "x": [1, 0, 0], "y": [0, 1, 0], "z": [0, 0, 1] }"#;
        let json = format!(r#"{{ "survey_results": [{entry}, {entry}] }}"#);
        assert!(matches!(
            DetectorConfig::from_json_str(&json),
            Err(Error::DuplicateEntry { what: "survey result", .. })
        ));
    }

    #[test]
    fn parallel_survey_axes_are_rejected() {
        let json = r#"{ "survey_results": [
            { "name": "module_L2t", "origin": [0, 0, 0], "x": [1, 0, 0], "y": [2, 0, 0], "z": [0, 0, 1] }
        ] }"#;
        assert!(matches!(
            DetectorConfig::from_json_str(json),
            Err(Error::InvalidSurveyResult { .. })
        ));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            DetectorConfig::from_json_str("{ \"millepede_constants\": 3 }"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = DetectorConfig::from_path("/nonexistent/detector.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/detector.json"));
    }

    #[test]
    fn round_trips_through_json() {
        let mut config = DetectorConfig::nominal();
        config.survey_points.push(SurveyPointsEntry {
            name: "base".to_string(),
            ball: [0.0; 3],
            vee: [1.0, 0.0, 0.0],
            flat: [0.0, 1.0, 0.0],
        });
        let json = serde_json::to_string(&config).unwrap();
        let back = DetectorConfig::from_json_str(&json).unwrap();
        assert_eq!(back, config);
        assert!(back.has_survey_points("base"));
        assert_eq!(back.survey_point_table().count(), 1);
    }
}
