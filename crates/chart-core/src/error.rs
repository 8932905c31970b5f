// File: crates/chart-core/src/error.rs
// Summary: Error types for size observation and chart configuration.

use std::path::PathBuf;

use crate::observer::ElementId;

/// Failures reported by a size observer or the platform behind it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObserverError {
    #[error("element reference is not mounted")]
    Unmounted,
    #[error("element {0} is not known to the platform")]
    ElementNotFound(ElementId),
    #[error("element {0} was removed while observed")]
    ElementRemoved(ElementId),
    #[error("observer has been disposed")]
    Disposed,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("value domain must be finite and increasing, got [{0}, {1}]")]
    InvalidDomain(f64, f64),
    #[error("band padding must be within [0, 1], got {0}")]
    InvalidPadding(f64),
    #[error("value_ticks must be at most {max}, got {0}", max = crate::config::MAX_VALUE_TICKS)]
    InvalidTicks(usize),
    #[error("color stops must be non-empty, finite and strictly increasing")]
    ColorStops,
    #[error("unknown color {0:?}")]
    UnknownColor(String),
}
