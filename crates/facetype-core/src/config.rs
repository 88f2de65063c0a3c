use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{FacetypeError, Result};

/// Top-level configuration for the Facetype application.
///
/// Loaded from `~/.facetype/config.toml` by default. Each section maps to one
/// stage of the gesture-to-text pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FacetypeConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub gesture: GestureConfig,
    #[serde(default)]
    pub calibration: CalibrationConfig,
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
}

impl FacetypeConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read, parsed, or holds values
    /// outside their valid ranges.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: FacetypeConfig = toml::from_str(&content)?;
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Reject values that would make triggers unreachable or always-on.
    pub fn validate(&self) -> Result<()> {
        let g = &self.gesture;
        if !(0.0..1.0).contains(&g.dead_zone) {
            return Err(FacetypeError::Config(format!(
                "gesture.dead_zone must be in [0, 1), got {}",
                g.dead_zone
            )));
        }
        if !(0.0..1.0).contains(&g.dominance_margin) {
            return Err(FacetypeError::Config(format!(
                "gesture.dominance_margin must be in [0, 1), got {}",
                g.dominance_margin
            )));
        }
        if g.hold_duration_ms == 0 {
            return Err(FacetypeError::Config(
                "gesture.hold_duration_ms must be greater than zero".to_string(),
            ));
        }

        let c = &self.calibration;
        if !(c.trigger_factor > 0.0 && c.trigger_factor <= 1.0) {
            return Err(FacetypeError::Config(format!(
                "calibration.trigger_factor must be in (0, 1], got {}",
                c.trigger_factor
            )));
        }
        if !(c.min_valid_max > 0.0 && c.min_valid_max <= 1.0) {
            return Err(FacetypeError::Config(format!(
                "calibration.min_valid_max must be in (0, 1], got {}",
                c.min_valid_max
            )));
        }
        if c.default_max < c.min_valid_max || c.default_max > 1.0 {
            return Err(FacetypeError::Config(format!(
                "calibration.default_max must be in [{}, 1], got {}",
                c.min_valid_max, c.default_max
            )));
        }

        if self.vocabulary.max_suggestions == 0 {
            return Err(FacetypeError::Config(
                "vocabulary.max_suggestions must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Data directory for persisted calibration.
    pub data_dir: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.facetype/data".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Trigger evaluation and hold-timer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Minimum interval between evaluator updates.
    pub update_interval_ms: u64,
    /// Intensities below this floor read as zero.
    pub dead_zone: f32,
    /// Gap a smile channel needs over the opposing one to count.
    pub dominance_margin: f32,
    /// Face-muscle mode: left and right smiles are mutually exclusive.
    pub dominance_enabled: bool,
    /// Route the raw left smile into the right trigger and vice versa.
    pub cross_wired_smile: bool,
    /// How long a trigger must stay active before its action fires.
    pub hold_duration_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: 50,
            dead_zone: 0.02,
            dominance_margin: 0.1,
            dominance_enabled: true,
            cross_wired_smile: true,
            hold_duration_ms: 400,
        }
    }
}

impl GestureConfig {
    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }

    pub fn hold_duration(&self) -> Duration {
        Duration::from_millis(self.hold_duration_ms)
    }
}

/// Calibration defaults and capture-flow settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Fraction of the calibrated maximum a channel must exceed to trigger.
    pub trigger_factor: f32,
    /// Per-channel maximum used before any calibration has been captured.
    pub default_max: f32,
    /// Floor applied to every captured maximum.
    pub min_valid_max: f32,
    /// Length of one calibration capture window.
    pub capture_window_ms: u64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            trigger_factor: 0.6,
            default_max: 0.5,
            min_valid_max: 0.1,
            capture_window_ms: 3000,
        }
    }
}

impl CalibrationConfig {
    pub fn capture_window(&self) -> Duration {
        Duration::from_millis(self.capture_window_ms)
    }
}

/// Dictionary and menu content settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularyConfig {
    /// Ranked word list (newline-separated or JSON array). Built-in fallback if unset.
    pub dictionary_path: Option<String>,
    /// Number of completions shown in the right-hand menu.
    pub max_suggestions: usize,
    /// Whole phrases offered when the message is empty.
    pub quick_phrases: Vec<String>,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            dictionary_path: None,
            max_suggestions: 2,
            quick_phrases: ["Yes", "No", "Pain", "Water", "Help", "Thank you"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}
