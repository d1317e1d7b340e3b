//! Canvas configuration: dimensions, look, and animation timings.

use serde::{Deserialize, Serialize};
use tc_core::model::Color;
use tc_core::scene::palette;

/// Whether entrances are animated or shapes appear at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationMode {
    /// Vertices fade in one after another; edges settle, then draw
    /// progressively from source to destination.
    #[default]
    Animated,
    /// Everything appears fully drawn in the same call.
    /// Highlight reversion is still timed.
    Immediate,
}

/// Configuration for a `TeachingCanvas`.
///
/// Every field has a default, so a JSON config file only needs to name
/// what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Logical width in canvas units. Default: **800**.
    pub width: f64,
    /// Logical height in canvas units. Default: **600**.
    pub height: f64,
    /// CSS color painted on clear. Default: `#1a1a1a`.
    pub background: String,
    pub mode: AnimationMode,
    pub vertex_fade_ms: f64,
    /// Pause before an edge starts drawing.
    pub edge_settle_ms: f64,
    pub edge_draw_ms: f64,
    pub annotation_fade_ms: f64,
    pub formula_fade_ms: f64,
    /// Used when a highlight call names no color. Default: `yellow`.
    pub highlight_color: String,
    /// Used when a highlight call names no duration. Default: **2000**.
    pub highlight_duration_ms: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            background: "#1a1a1a".into(),
            mode: AnimationMode::Animated,
            vertex_fade_ms: 500.0,
            edge_settle_ms: 150.0,
            edge_draw_ms: 600.0,
            annotation_fade_ms: 300.0,
            formula_fade_ms: 400.0,
            highlight_color: "yellow".into(),
            highlight_duration_ms: 2000.0,
        }
    }
}

impl CanvasConfig {
    /// Default config with entrance animations turned off.
    pub fn immediate() -> Self {
        Self {
            mode: AnimationMode::Immediate,
            ..Self::default()
        }
    }

    pub fn is_animated(&self) -> bool {
        self.mode == AnimationMode::Animated
    }

    pub fn background_color(&self) -> Color {
        Color::parse(&self.background).unwrap_or(palette::BACKGROUND)
    }

    /// Parse a (possibly partial) JSON config.
    ///
    /// # Errors
    /// Returns the serde error text if the JSON does not match the schema.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Invalid canvas config: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = CanvasConfig::from_json(r#"{ "mode": "immediate", "highlight_color": "red" }"#).unwrap();
        assert_eq!(config.mode, AnimationMode::Immediate);
        assert_eq!(config.highlight_color, "red");
        assert_eq!(config.width, 800.0);
        assert_eq!(config.vertex_fade_ms, 500.0);
    }

    #[test]
    fn unparseable_background_falls_back() {
        let config = CanvasConfig {
            background: "not-a-color".into(),
            ..CanvasConfig::default()
        };
        assert_eq!(config.background_color(), palette::BACKGROUND);
    }

    #[test]
    fn bad_json_is_an_error() {
        let err = CanvasConfig::from_json(r#"{ "mode": "slow-motion" }"#).unwrap_err();
        assert!(err.starts_with("Invalid canvas config"));
    }
}
