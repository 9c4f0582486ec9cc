//! Balance Chest - a two-player see-saw game on a tilting axis
//!
//! Core modules:
//! - `sim`: Deterministic round resolution (actions, chest drift, outcomes)
//! - `host`: Observer registration and event dispatch around a match
//! - `axis`: Projection of integer positions onto the rotating axis
//! - `ui`: Status text and highlight styling
//! - `settings`: Data-driven match configuration

pub mod axis;
pub mod host;
pub mod settings;
pub mod sim;
pub mod ui;

pub use axis::{AxisError, AxisGeometry, AxisView, Entity, Placement};
pub use host::{MatchHost, MatchObserver, ObserverId};
pub use settings::{Rgba, Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Host tick rate (Hz)
    pub const TICK_RATE: u32 = 60;
    /// Fixed tick duration
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;

    /// Number of discrete action triggers (keys 1-6)
    pub const ACTION_TRIGGER_COUNT: usize = 6;

    /// Rule defaults
    pub const DEFAULT_MAX_ROUNDS: u32 = 10;
    pub const DEFAULT_MIN_POSITION: i32 = -10;
    pub const DEFAULT_MAX_POSITION: i32 = 10;
    pub const DEFAULT_INITIAL_A: i32 = -5;
    pub const DEFAULT_INITIAL_B: i32 = 5;
    pub const DEFAULT_INITIAL_CHEST: i32 = 0;
    /// Largest position magnitude a configuration may use
    pub const MAX_POSITION_MAGNITUDE: i32 = 1_000_000;

    /// Phase holds (seconds)
    pub const DEFAULT_ROUND_START_SECS: f32 = 1.0;
    pub const DEFAULT_CALCULATING_SECS: f32 = 1.0;

    /// Axis tilt per unit of combined token position (degrees)
    pub const DEFAULT_UNIT_DEGREE: f32 = 3.0;
    /// Entity bottom-to-center distances above the axis surface
    pub const DEFAULT_TOKEN_HEIGHT_OFFSET: f32 = 1.0;
    pub const DEFAULT_CHEST_HEIGHT_OFFSET: f32 = 0.5;
    /// Smooth axis transition length (seconds, 0 = snap)
    pub const DEFAULT_SMOOTH_SECS: f32 = 0.5;
}
