//! Lane Hopper - An endless lane-crossing game
//!
//! Core modules:
//! - `sim`: Simulation engine (world generation, stepping, collisions)
//! - `settings`: Data-driven geometry and timing
//! - `highscores`: Local best-lane leaderboard
//! - `web`: Browser host (wasm32 only)

pub mod highscores;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use highscores::HighScores;
pub use settings::Settings;

/// Game configuration defaults (overridable through [`Settings`])
pub mod consts {
    /// Discrete columns per lane
    pub const COLUMNS: u32 = 17;
    /// Width of one column / depth of one lane, before zoom
    pub const POSITION_WIDTH: f32 = 42.0;
    /// World scale factor
    pub const ZOOM: f32 = 2.0;
    /// Actor footprint, before zoom
    pub const CHICKEN_SIZE: f32 = 15.0;
    /// Duration of one step (ms)
    pub const STEP_TIME_MS: f64 = 200.0;
    /// Peak of the hop arc, before zoom
    pub const HOP_HEIGHT: f32 = 8.0;
    /// Committed lanes generated at start (0..INITIAL_LANES)
    pub const INITIAL_LANES: u32 = 10;

    /// Vehicle lengths, before zoom
    pub const CAR_LENGTH: f32 = 60.0;
    pub const TRUCK_LENGTH: f32 = 105.0;

    /// Obstacle counts per lane
    pub const TREES_PER_FOREST: usize = 4;
    pub const CARS_PER_LANE: usize = 3;
    pub const TRUCKS_PER_LANE: usize = 2;

    /// Columns covered by one placement slot
    pub const CAR_SLOT_COLUMNS: u32 = 2;
    pub const TRUCK_SLOT_COLUMNS: u32 = 3;

    /// Vehicle speed divisor: world units per ms = speed / SPEED_DIVISOR
    pub const SPEED_DIVISOR: f32 = 16.0;

    /// Smallest column count every lane kind can be laid out on
    pub const MIN_COLUMNS: u32 = 5;
}
