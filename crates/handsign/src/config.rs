//! Configuration of the gesture pipeline.
//!
//! Configuration is read from TOML. Every field is optional and falls back to its default:
//!
//! ```toml
//! [classifier]
//! ok_distance_threshold = 0.05
//! thumb_polarity = "unmirrored"
//!
//! [smoothing]
//! capacity = 5
//! slots = 2
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    filter::DEFAULT_CAPACITY,
    hand::{
        gesture::{GestureClassifier, ThumbPolarity},
        tracking::GestureTracker,
    },
    Error, Result,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub classifier: ClassifierConfig,
    pub smoothing: SmoothingConfig,
}

/// Parameters of the [`GestureClassifier`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Maximum thumb tip to index tip distance for the "OK" gesture, in normalized coordinates.
    pub ok_distance_threshold: f32,
    pub thumb_polarity: ThumbPolarity,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            ok_distance_threshold: GestureClassifier::DEFAULT_OK_DISTANCE_THRESHOLD,
            thumb_polarity: ThumbPolarity::default(),
        }
    }
}

/// Landmark smoothing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SmoothingConfig {
    /// Number of frames each hand's landmarks are averaged over.
    pub capacity: usize,
    /// Maximum number of hands processed per frame.
    pub slots: usize,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            slots: GestureTracker::DEFAULT_SLOTS,
        }
    }
}

impl Config {
    /// Loads and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parses and validates a TOML configuration.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Checks that all values are usable.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.classifier.ok_distance_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(Error::Config(format!(
                "`ok_distance_threshold` must be a non-negative number, got {threshold}"
            )));
        }
        if self.smoothing.capacity == 0 {
            return Err(Error::Config("`capacity` must be at least 1".into()));
        }
        if self.smoothing.slots == 0 {
            return Err(Error::Config("`slots` must be at least 1".into()));
        }
        Ok(())
    }

    /// Creates the classifier described by this configuration.
    ///
    /// # Errors
    ///
    /// Fails if the configuration does not pass [`Config::validate`].
    pub fn classifier(&self) -> Result<GestureClassifier> {
        self.validate()?;
        Ok(GestureClassifier::new(self.classifier.ok_distance_threshold)
            .with_thumb_polarity(self.classifier.thumb_polarity))
    }

    /// Creates a [`GestureTracker`] described by this configuration.
    pub fn tracker(&self) -> Result<GestureTracker> {
        let classifier = self.classifier()?;
        Ok(GestureTracker::new(
            classifier,
            self.smoothing.slots,
            self.smoothing.capacity,
        ))
    }
}
