//! Game settings: board geometry and timing
//!
//! Persisted separately from high scores in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tunable geometry and timing for one engine instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Board ===
    /// Discrete columns per lane
    pub columns: u32,
    /// Column width / lane depth (world units, before zoom)
    pub position_width: f32,
    /// World scale factor
    pub zoom: f32,
    /// Lanes committed at start and after retry
    pub initial_lanes: u32,
    /// How far past the board edge vehicles travel before wrapping (columns)
    pub off_screen_margin_columns: f32,

    // === Actor ===
    /// Actor footprint (before zoom)
    pub chicken_size: f32,
    /// Duration of one step (ms)
    pub step_time_ms: f64,
    /// Peak hop height (before zoom)
    pub hop_height: f32,

    // === Traffic ===
    /// Speeds a road lane may draw from
    pub lane_speeds: Vec<f32>,
    /// Car length (before zoom)
    pub car_length: f32,
    /// Truck length (before zoom)
    pub truck_length: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            columns: COLUMNS,
            position_width: POSITION_WIDTH,
            zoom: ZOOM,
            initial_lanes: INITIAL_LANES,
            off_screen_margin_columns: 2.0,

            chicken_size: CHICKEN_SIZE,
            step_time_ms: STEP_TIME_MS,
            hop_height: HOP_HEIGHT,

            lane_speeds: vec![2.0, 2.5, 3.0],
            car_length: CAR_LENGTH,
            truck_length: TRUCK_LENGTH,
        }
    }
}

impl Settings {
    /// Parse settings from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Settings>(json).map(Settings::sanitized)
    }

    /// Clamp values the engine cannot run with
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if self.columns < MIN_COLUMNS {
            log::warn!("columns {} too small, using {}", self.columns, MIN_COLUMNS);
            self.columns = MIN_COLUMNS;
        }
        if self.initial_lanes == 0 {
            log::warn!("initial_lanes must be at least 1");
            self.initial_lanes = 1;
        }
        if self.step_time_ms.is_nan() || self.step_time_ms <= 0.0 {
            log::warn!("step_time_ms {} invalid, using default", self.step_time_ms);
            self.step_time_ms = defaults.step_time_ms;
        }
        if self.position_width.is_nan() || self.position_width <= 0.0 {
            self.position_width = defaults.position_width;
        }
        if self.zoom.is_nan() || self.zoom <= 0.0 {
            self.zoom = defaults.zoom;
        }
        if self.lane_speeds.is_empty() {
            log::warn!("lane_speeds empty, using defaults");
            self.lane_speeds = defaults.lane_speeds;
        }

        self
    }

    /// Column the actor starts in
    #[inline]
    pub fn start_column(&self) -> u32 {
        self.columns / 2
    }

    /// Size of one cell in world units
    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.position_width * self.zoom
    }

    /// Full board width in world units
    #[inline]
    pub fn board_width(&self) -> f32 {
        self.columns as f32 * self.cell_size()
    }

    /// World X of a column centre (board centred on x = 0)
    #[inline]
    pub fn column_x(&self, column: u32) -> f32 {
        (column as f32 * self.position_width + self.position_width / 2.0) * self.zoom
            - self.board_width() / 2.0
    }

    /// World Y of a lane
    #[inline]
    pub fn lane_y(&self, lane: u32) -> f32 {
        lane as f32 * self.cell_size()
    }

    /// Vehicle wrap bound (absolute X beyond which vehicles wrap around)
    #[inline]
    pub fn wrap_bound(&self) -> f32 {
        self.board_width() / 2.0 + self.off_screen_margin_columns * self.cell_size()
    }

    /// Actor collision width in world units
    #[inline]
    pub fn actor_width(&self) -> f32 {
        self.chicken_size * self.zoom
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "lane_hopper_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    ///
    /// Failures are logged; the running game keeps its settings either way.
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok()).flatten() else {
            log::warn!("LocalStorage unavailable, settings not saved");
            return;
        };
        match serde_json::to_string(self) {
            Ok(json) => match storage.set_item(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Settings saved ({} columns)", self.columns),
                Err(e) => log::warn!("Could not save settings: {:?}", e),
            },
            Err(e) => log::warn!("Could not encode settings: {}", e),
        }
    }

    /// Load settings from a JSON file, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
