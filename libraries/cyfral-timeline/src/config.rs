//! Timeline configuration

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Configuration for timing retrieval and progress rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Site root that track folders are relative to
    pub base_url: String,

    /// Name of the timings file inside each track folder
    pub timings_file: String,

    /// HTTP timeout for timings requests, in seconds (native targets only)
    pub request_timeout_secs: u64,

    /// Duration assumed until the audio element reports one
    pub assumed_duration_secs: f64,

    /// Minimum length given to the last segment when the real duration is unknown or shorter
    pub tail_pad_secs: f64,

    /// Crossfade length of the artist label
    pub label_crossfade_ms: u64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost/".to_string(),
            timings_file: "тайминги.txt".to_string(),
            request_timeout_secs: 10,
            assumed_duration_secs: 200.0,
            tail_pad_secs: 8.0,
            label_crossfade_ms: 260,
        }
    }
}

impl TimelineConfig {
    /// Parse from TOML, missing keys take their defaults
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = TimelineConfig::default();
        assert_eq!(config.timings_file, "тайминги.txt");
        assert_eq!(config.assumed_duration_secs, 200.0);
        assert_eq!(config.tail_pad_secs, 8.0);
        assert_eq!(config.label_crossfade_ms, 260);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = TimelineConfig::from_toml_str(r#"base_url = "https://cyfral.example/""#)
            .unwrap();
        assert_eq!(config.base_url, "https://cyfral.example/");
        assert_eq!(config.timings_file, "тайминги.txt");
    }
}
