//! Best score record
//!
//! Persisted to LocalStorage on the web, kept in memory natively.

use serde::{Deserialize, Serialize};

/// The best round so far
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BestScore {
    /// Pumps, to two decimals
    pub score: f64,
    /// Unix timestamp (ms) when achieved, 0 if never
    pub timestamp: f64,
}

impl BestScore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "pump_ball_best";

    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score beats the record
    pub fn qualifies(&self, score: f64) -> bool {
        score > self.score
    }

    /// Keep `score` if it beats the record. Returns true if it did.
    pub fn record(&mut self, score: f64, timestamp: f64) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.score = score;
        self.timestamp = timestamp;
        true
    }

    /// Score as shown in the page
    pub fn display(&self) -> String {
        format!("{:.2}", self.score)
    }

    /// Load the best score from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(best) = serde_json::from_str::<BestScore>(&json) {
                    log::info!("Loaded best score {}", best.display());
                    return best;
                }
            }
        }

        log::info!("No best score found, starting fresh");
        Self::new()
    }

    /// Save the best score to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Best score saved ({})", self.display());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
