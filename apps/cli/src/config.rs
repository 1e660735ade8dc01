// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI configuration loaded from environment variables.

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// Reads `SVT_LOG_FORMAT`; pretty when unset.
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("SVT_LOG_FORMAT").unwrap_or_default())
    }

    /// `json` (any case) selects JSON; anything else is pretty.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Detector configuration JSON. Nominal constants when unset.
    pub detector_config: Option<String>,
    /// Placement output file. Stdout when unset.
    pub output: Option<String>,
    pub log_format: LogFormat,
    /// Bit `n - 1` enables layer `n`.
    pub layer_mask: u8,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            detector_config: non_empty(std::env::var("SVT_CONFIG").ok()),
            output: non_empty(std::env::var("SVT_OUTPUT").ok()),
            log_format: LogFormat::from_env(),
            layer_mask: layer_mask_from(std::env::var("SVT_LAYER_MASK").ok()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// All six layers.
const DEFAULT_LAYER_MASK: u8 = 0x3F;

/// An unset mask enables every layer; a malformed one does too, with a warning.
fn layer_mask_from(value: Option<String>) -> u8 {
    let Some(value) = value else {
        return DEFAULT_LAYER_MASK;
    };
    parse_mask(&value).unwrap_or_else(|| {
        tracing::warn!(
            value = %value,
            fallback = DEFAULT_LAYER_MASK,
            "Ignoring malformed SVT_LAYER_MASK"
        );
        DEFAULT_LAYER_MASK
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Decimal, `0x` hex or `0b` binary.
fn parse_mask(value: &str) -> Option<u8> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        u8::from_str_radix(hex, 16).ok()
    } else if let Some(bin) = value.strip_prefix("0b") {
        u8::from_str_radix(bin, 2).ok()
    } else {
        value.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn mask_formats() {
        assert_eq!(parse_mask("63"), Some(0x3F));
        assert_eq!(parse_mask("0x07"), Some(7));
        assert_eq!(parse_mask(" 0b101 "), Some(5));
        assert_eq!(parse_mask("0x1FF"), None);
        assert_eq!(parse_mask("all"), None);
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn malformed_mask_warns_and_enables_all_layers() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let mask = tracing::subscriber::with_default(subscriber, || {
            layer_mask_from(Some("0x1FF".to_string()))
        });
        assert_eq!(mask, 0x3F);

        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("WARN"), "{logs}");
        assert!(logs.contains("0x1FF"), "{logs}");
    }

    #[test]
    fn layer_mask_from_env_value() {
        assert_eq!(layer_mask_from(None), 0x3F);
        assert_eq!(layer_mask_from(Some("0b11".to_string())), 3);
    }

    #[test]
    fn log_format_defaults_to_pretty() {
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse(""), LogFormat::Pretty);
    }

    #[test]
    fn blank_paths_are_unset() {
        assert_eq!(non_empty(Some("  ".into())), None);
        assert_eq!(non_empty(Some("a.json".into())).as_deref(), Some("a.json"));
    }
}
