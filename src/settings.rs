//! Match settings
//!
//! Loaded from a JSON file. Missing fields fall back to defaults, and bad
//! values are repaired with a warning rather than aborting the match.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::axis::{AxisGeometry, HeightOffsets};
use crate::consts::*;
use crate::sim::MatchRules;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid color string: {0:?}")]
    InvalidColor(String),
}

/// Linear RGBA color, components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    fn from_bytes(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// 24-bit `0xRRGGBB` value (alpha dropped)
    pub fn to_rgb_u32(&self) -> u32 {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }
}

/// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (leading `#` optional)
pub fn parse_hex_color(input: &str) -> Result<Rgba, SettingsError> {
    let invalid = || SettingsError::InvalidColor(input.to_string());
    let hex = input.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !hex.is_ascii() {
        return Err(invalid());
    }

    let byte = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
    match hex.len() {
        3 => {
            let nibble = |i: usize| byte(&hex[i..i + 1]).map(|v| v * 17);
            Ok(Rgba::from_bytes(nibble(0)?, nibble(1)?, nibble(2)?, 255))
        }
        6 => Ok(Rgba::from_bytes(
            byte(&hex[0..2])?,
            byte(&hex[2..4])?,
            byte(&hex[4..6])?,
            255,
        )),
        8 => Ok(Rgba::from_bytes(
            byte(&hex[0..2])?,
            byte(&hex[2..4])?,
            byte(&hex[4..6])?,
            byte(&hex[6..8])?,
        )),
        _ => Err(invalid()),
    }
}

/// Parse a configured color, substituting white (with a warning) when malformed
pub fn resolve_color(input: &str) -> Rgba {
    match parse_hex_color(input) {
        Ok(color) => color,
        Err(err) => {
            log::warn!("{}; using white", err);
            Rgba::WHITE
        }
    }
}

/// Normal and highlighted name colors for one token
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorPair {
    pub normal: Rgba,
    pub highlight: Rgba,
}

/// Resolved presentation colors for both tokens
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub a: ColorPair,
    pub b: ColorPair,
}

/// Match settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Rules ===
    /// Round budget
    pub max_rounds: u32,
    /// Token bounds (inclusive)
    pub min_position: i32,
    pub max_position: i32,
    /// Starting layout
    pub initial_a: i32,
    pub initial_b: i32,
    pub initial_chest: i32,

    // === Timing ===
    /// Round banner hold before input opens (seconds)
    pub round_start_secs: f32,
    /// "Calculating" hold before resolution (seconds)
    pub calculating_secs: f32,

    // === Axis ===
    /// Tilt per unit of combined token position (degrees)
    pub unit_degree: f32,
    /// Axis rect size before scaling
    pub axis_width: f32,
    pub axis_height: f32,
    pub axis_scale: Vec2,
    /// World position of the axis center
    pub axis_anchor: Vec2,
    pub token_a_height_offset: f32,
    pub token_b_height_offset: f32,
    pub chest_height_offset: f32,
    /// Axis transition length (0 = snap)
    pub smooth_secs: f32,

    // === Colors ===
    pub a_normal_color: String,
    pub a_highlight_color: String,
    pub b_normal_color: String,
    pub b_highlight_color: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            min_position: DEFAULT_MIN_POSITION,
            max_position: DEFAULT_MAX_POSITION,
            initial_a: DEFAULT_INITIAL_A,
            initial_b: DEFAULT_INITIAL_B,
            initial_chest: DEFAULT_INITIAL_CHEST,

            round_start_secs: DEFAULT_ROUND_START_SECS,
            calculating_secs: DEFAULT_CALCULATING_SECS,

            unit_degree: DEFAULT_UNIT_DEGREE,
            axis_width: 800.0,
            axis_height: 20.0,
            axis_scale: Vec2::ONE,
            axis_anchor: Vec2::ZERO,
            token_a_height_offset: DEFAULT_TOKEN_HEIGHT_OFFSET,
            token_b_height_offset: DEFAULT_TOKEN_HEIGHT_OFFSET,
            chest_height_offset: DEFAULT_CHEST_HEIGHT_OFFSET,
            smooth_secs: DEFAULT_SMOOTH_SECS,

            a_normal_color: "#FFFFFF".to_string(),
            a_highlight_color: "#FFFF00".to_string(),
            b_normal_color: "#FFFFFF".to_string(),
            b_highlight_color: "#FF0000".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings.validated())
    }

    /// Load from `path` if given, falling back to defaults on any failure
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("{}; using default settings", err);
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Repair values the match can't run with
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();
        let limit = MAX_POSITION_MAGNITUDE;

        for (name, value) in [
            ("min_position", &mut self.min_position),
            ("max_position", &mut self.max_position),
            ("initial_chest", &mut self.initial_chest),
        ] {
            let clamped = (*value).clamp(-limit, limit);
            if clamped != *value {
                log::warn!("{} of {} is beyond +/-{}; clamped to {}", name, value, limit, clamped);
                *value = clamped;
            }
        }

        if self.min_position >= self.max_position {
            log::warn!(
                "Invalid bounds [{}, {}]; using [{}, {}]",
                self.min_position,
                self.max_position,
                defaults.min_position,
                defaults.max_position
            );
            self.min_position = defaults.min_position;
            self.max_position = defaults.max_position;
        }

        for (name, pos) in [("A", &mut self.initial_a), ("B", &mut self.initial_b)] {
            let clamped = (*pos).clamp(self.min_position, self.max_position);
            if clamped != *pos {
                log::warn!("Initial position of {} ({}) out of bounds; clamped to {}", name, pos, clamped);
                *pos = clamped;
            }
        }

        if self.max_rounds == 0 {
            log::warn!("Round budget of 0; using {}", defaults.max_rounds);
            self.max_rounds = defaults.max_rounds;
        }

        for secs in [
            &mut self.round_start_secs,
            &mut self.calculating_secs,
            &mut self.smooth_secs,
        ] {
            if !secs.is_finite() || *secs < 0.0 {
                log::warn!("Invalid duration {}; using 0", secs);
                *secs = 0.0;
            }
        }

        if !self.unit_degree.is_finite() {
            log::warn!("Invalid unit degree; using {}", defaults.unit_degree);
            self.unit_degree = defaults.unit_degree;
        }

        self
    }

    /// Immutable rule parameters for a new match
    pub fn match_rules(&self) -> MatchRules {
        MatchRules {
            max_rounds: self.max_rounds,
            min_position: self.min_position,
            max_position: self.max_position,
            initial_a: self.initial_a,
            initial_b: self.initial_b,
            initial_chest: self.initial_chest,
            round_start_secs: self.round_start_secs,
            calculating_secs: self.calculating_secs,
        }
    }

    pub fn axis_geometry(&self) -> AxisGeometry {
        AxisGeometry::from_rect(
            Vec2::new(self.axis_width, self.axis_height),
            self.axis_scale,
            self.axis_anchor,
            self.min_position,
            self.max_position,
        )
    }

    pub fn height_offsets(&self) -> HeightOffsets {
        HeightOffsets {
            token_a: self.token_a_height_offset,
            token_b: self.token_b_height_offset,
            chest: self.chest_height_offset,
        }
    }

    /// Name colors, with malformed entries replaced by white
    pub fn palette(&self) -> Palette {
        Palette {
            a: ColorPair {
                normal: resolve_color(&self.a_normal_color),
                highlight: resolve_color(&self.a_highlight_color),
            },
            b: ColorPair {
                normal: resolve_color(&self.b_normal_color),
                highlight: resolve_color(&self.b_highlight_color),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(parse_hex_color("#FFFFFF").unwrap(), Rgba::WHITE);
        assert_eq!(parse_hex_color("ff0000").unwrap().to_rgb_u32(), 0xFF0000);
        assert_eq!(parse_hex_color("#FF0").unwrap().to_rgb_u32(), 0xFFFF00);
        let translucent = parse_hex_color("#00000080").unwrap();
        assert!((translucent.a - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(matches!(parse_hex_color("#12345"), Err(SettingsError::InvalidColor(_))));
        assert!(parse_hex_color("#GGGGGG").is_err());
        assert!(parse_hex_color("").is_err());
        assert!(parse_hex_color("#ÿÿÿ").is_err());
    }

    #[test]
    fn test_malformed_color_falls_back_to_white() {
        let settings = Settings {
            b_highlight_color: "not a color".to_string(),
            ..Default::default()
        };
        let palette = settings.palette();
        assert_eq!(palette.b.highlight, Rgba::WHITE);
        assert_eq!(palette.a.highlight.to_rgb_u32(), 0xFFFF00);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "max_rounds": 4, "unit_degree": 5.0 }"#).unwrap();
        assert_eq!(settings.max_rounds, 4);
        assert_eq!(settings.unit_degree, 5.0);
        assert_eq!(settings.min_position, -10);
        assert_eq!(settings.b_highlight_color, "#FF0000");
    }

    #[test]
    fn test_validation_repairs_rules() {
        let settings = Settings {
            min_position: 5,
            max_position: -5,
            initial_a: -30,
            max_rounds: 0,
            round_start_secs: -1.0,
            ..Default::default()
        }
        .validated();
        assert_eq!((settings.min_position, settings.max_position), (-10, 10));
        assert_eq!(settings.initial_a, -10);
        assert_eq!(settings.initial_b, 5);
        assert_eq!(settings.max_rounds, 10);
        assert_eq!(settings.round_start_secs, 0.0);
    }

    #[test]
    fn test_validation_limits_position_range() {
        let settings = Settings {
            min_position: i32::MIN,
            max_position: i32::MAX - 1,
            initial_a: i32::MIN,
            initial_chest: i32::MAX - 1,
            ..Default::default()
        }
        .validated();
        assert_eq!(settings.min_position, -MAX_POSITION_MAGNITUDE);
        assert_eq!(settings.max_position, MAX_POSITION_MAGNITUDE);
        assert_eq!(settings.initial_a, -MAX_POSITION_MAGNITUDE);
        assert_eq!(settings.initial_chest, MAX_POSITION_MAGNITUDE);

        // A chest far off to one side plays out without trouble
        let settings = Settings {
            initial_chest: i32::MAX - 1,
            ..Default::default()
        }
        .validated();
        let rules = settings.match_rules();
        assert_eq!(rules.initial_chest, MAX_POSITION_MAGNITUDE);
        let (a, b) = crate::sim::resolve_actions(
            crate::sim::ActionKind::SelfAdd1,
            crate::sim::ActionKind::SelfAdd1,
            rules.initial_a,
            rules.initial_b,
        );
        let drift = crate::sim::drift_chest(rules.initial_chest, a, b);
        assert_eq!(drift.to, MAX_POSITION_MAGNITUDE + 2);
    }

    #[test]
    fn test_rules_and_geometry_from_settings() {
        let settings = Settings {
            axis_scale: Vec2::new(1.5, 2.0),
            ..Default::default()
        };
        let rules = settings.match_rules();
        assert_eq!(rules, MatchRules::default());

        let geometry = settings.axis_geometry();
        assert_eq!(geometry.width, 1200.0);
        assert_eq!(geometry.thickness, 40.0);
        assert_eq!((geometry.min, geometry.max), (-10, 10));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let path = std::env::temp_dir().join("balance_chest_settings_missing.json");
        let _ = fs::remove_file(&path);
        assert!(matches!(Settings::load_from(&path), Err(SettingsError::Io { .. })));
        assert_eq!(Settings::load_or_default(Some(&path)), Settings::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("balance_chest_settings_{}.json", std::process::id()));
        let settings = Settings {
            max_rounds: 7,
            a_highlight_color: "#00FF00".to_string(),
            ..Default::default()
        };
        settings.save_to(&path).unwrap();
        let loaded = Settings::load_from(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }
}
