// File: crates/chart-core/src/config.rs
// Summary: Bar chart configuration with defaults, TOML loading and validation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::theme::Rgb;

/// Upper bound for `value_ticks`.
pub const MAX_VALUE_TICKS: usize = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub value: f64,
    pub color: Rgb,
}

impl ColorStop {
    pub const fn new(value: f64, color: Rgb) -> Self {
        Self { value, color }
    }
}

/// Tunables for [`crate::BarChart`]. Every field has a default, so a config file only
/// needs the keys it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BarChartConfig {
    /// Value range mapped onto the plot height, bottom to top.
    pub value_domain: [f64; 2],
    /// Band padding, used for both inner and outer padding.
    pub band_padding: f64,
    /// Fill color stops, increasing by value.
    pub color_stops: Vec<ColorStop>,
    /// Hold fill colors at the first/last stop outside the stop range.
    pub clamp_colors: bool,
    /// Approximate number of value-axis ticks, at most [`MAX_VALUE_TICKS`].
    pub value_ticks: usize,
    /// Gap between a bar top and its hover label.
    pub label_offset: f64,
    /// Theme preset name, see [`crate::theme::find`].
    pub theme: String,
}

impl Default for BarChartConfig {
    fn default() -> Self {
        Self {
            value_domain: [0.0, 150.0],
            band_padding: 0.5,
            color_stops: vec![
                ColorStop::new(75.0, Rgb::GREEN),
                ColorStop::new(100.0, Rgb::ORANGE),
                ColorStop::new(150.0, Rgb::RED),
            ],
            clamp_colors: true,
            value_ticks: 10,
            label_offset: 8.0,
            theme: "light".to_string(),
        }
    }
}

impl BarChartConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&text)
    }

    pub fn with_value_domain(mut self, min: f64, max: f64) -> Self {
        self.value_domain = [min, max];
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let [lo, hi] = self.value_domain;
        if !(lo.is_finite() && hi.is_finite() && lo < hi) {
            return Err(ConfigError::InvalidDomain(lo, hi));
        }
        if !(0.0..=1.0).contains(&self.band_padding) {
            return Err(ConfigError::InvalidPadding(self.band_padding));
        }
        if self.value_ticks > MAX_VALUE_TICKS {
            return Err(ConfigError::InvalidTicks(self.value_ticks));
        }
        let finite = self.color_stops.iter().all(|s| s.value.is_finite());
        let increasing = self.color_stops.windows(2).all(|w| w[0].value < w[1].value);
        if self.color_stops.is_empty() || !finite || !increasing {
            return Err(ConfigError::ColorStops);
        }
        Ok(())
    }
}
