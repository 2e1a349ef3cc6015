//! Engine settings
//!
//! Read from LocalStorage on the web, defaults natively.

use serde::Deserialize;

use crate::engine::{EngineError, Result};

/// How the driver schedules the next frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FramePacing {
    /// Next frame as soon as the host allows
    #[default]
    Uncapped,
    /// Fixed interval of `1000 / fps` milliseconds
    Capped { fps: u32 },
}

impl FramePacing {
    /// Delay before the next frame, `None` when uncapped
    pub fn interval_ms(&self) -> Option<f64> {
        match self {
            FramePacing::Uncapped => None,
            FramePacing::Capped { fps } => Some(1000.0 / *fps as f64),
        }
    }
}

/// Engine settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Id of the canvas element to draw on
    pub canvas_id: String,
    pub pacing: FramePacing,
    /// How often a polling driver re-checks the asset gate
    pub asset_poll_interval_ms: u32,
    /// Clamp for frame deltas (seconds), e.g. after the tab was hidden
    pub max_delta_seconds: Option<f64>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            canvas_id: "canvas".to_string(),
            pacing: FramePacing::Uncapped,
            asset_poll_interval_ms: 100,
            max_delta_seconds: None,
        }
    }
}

impl EngineSettings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "pump_ball_settings";

    pub fn validate(&self) -> Result<()> {
        if self.pacing == (FramePacing::Capped { fps: 0 }) {
            return Err(EngineError::InvalidArgument("fps cap must be positive".into()));
        }
        if self.asset_poll_interval_ms == 0 {
            return Err(EngineError::InvalidArgument(
                "asset poll interval must be positive".into(),
            ));
        }
        if self.max_delta_seconds.is_some_and(|m| !(m > 0.0)) {
            return Err(EngineError::InvalidArgument(
                "max delta must be positive".into(),
            ));
        }
        if self.canvas_id.is_empty() {
            return Err(EngineError::InvalidArgument("canvas id is empty".into()));
        }
        Ok(())
    }

    /// Parse and validate settings JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)
            .map_err(|e| EngineError::InvalidArgument(format!("bad settings: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Apply a delta clamp if one is configured
    pub fn clamp_delta(&self, delta: f64) -> f64 {
        match self.max_delta_seconds {
            Some(max) => delta.min(max),
            None => delta,
        }
    }

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

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
