//! Local best-lane leaderboard
//!
//! Persisted to LocalStorage, tracks the top 10 runs by furthest lane reached.

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Furthest lane reached
    pub score: u32,
    /// World seed of the run
    pub seed: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "lane_hopper_highscores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        match self.entries.last() {
            Some(lowest) if self.entries.len() >= MAX_HIGH_SCORES => score > lowest.score,
            _ => true,
        }
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, score: u32, seed: u64, timestamp: f64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            seed,
            timestamp,
        };

        // Find insertion point (sorted descending by score)
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        // Trim to max size
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Load high scores from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(scores) = serde_json::from_str::<HighScores>(&json) {
                    log::info!("Loaded {} high scores", scores.entries.len());
                    return scores;
                }
            }
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    /// Save high scores to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("High scores saved ({} entries)", self.entries.len());
            }
        }
    }

    /// Load high scores from a JSON file (native), starting fresh on any error
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: &std::path::Path) -> Self {
        let loaded = std::fs::read_to_string(path)
            .ok()
            .and_then(|json| serde_json::from_str::<HighScores>(&json).ok());

        match loaded {
            Some(scores) => {
                log::info!("Loaded {} high scores from {}", scores.entries.len(), path.display());
                scores
            }
            None => {
                log::info!("No high scores at {}, starting fresh", path.display());
                Self::new()
            }
        }
    }

    /// Write high scores to a JSON file (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_path(&self, path: &std::path::Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_never_qualifies() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert!(scores.qualifies(1));
    }

    #[test]
    fn test_add_score_keeps_descending_order() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(5, 15, 1.0), Some(1));
        assert_eq!(scores.add_score(12, 22, 2.0), Some(1));
        assert_eq!(scores.add_score(7, 17, 3.0), Some(2));
        assert_eq!(scores.add_score(0, 10, 4.0), None);

        let order: Vec<u32> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(order, vec![12, 7, 5]);
        assert_eq!(scores.top_score(), Some(12));
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("lane_hopper_scores_{}.json", std::process::id()));
        let mut scores = HighScores::new();
        scores.add_score(9, 42, 1.0);
        scores.save_to_path(&path).unwrap();

        let loaded = HighScores::load_from_path(&path);
        assert_eq!(loaded.top_score(), Some(9));
        assert_eq!(loaded.entries[0].seed, 42);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let loaded = HighScores::load_from_path(std::path::Path::new("/nonexistent/lane_hopper.json"));
        assert!(loaded.entries.is_empty());
        assert_eq!(loaded.top_score(), None);
    }

    #[test]
    fn test_board_is_capped() {
        let mut scores = HighScores::new();
        for score in 1..=(MAX_HIGH_SCORES as u32 + 5) {
            scores.add_score(score, score as u64, score as f64);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert!(!scores.qualifies(5));
        assert_eq!(scores.add_score(100, 0, 0.0), Some(1));
        assert_eq!(scores.entries.last().map(|e| e.score), Some(7));
    }
}
