// File: crates/chart-core/src/lib.rs
// Summary: Core library entry point; exports size observation and bar chart APIs.

pub mod axis;
pub mod chart;
pub mod config;
pub mod error;
pub mod geometry;
pub mod host;
pub mod observer;
pub mod render;
pub mod scale;
pub mod theme;

pub use axis::{AxisLayout, AxisOrient, Tick};
pub use chart::BarChart;
pub use config::{BarChartConfig, ColorStop};
pub use error::{ConfigError, ObserverError};
pub use geometry::{compute_geometry, BarShape, ChartGeometry, Label, TextAnchor};
pub use host::LayoutHost;
pub use observer::{
    listener_fn, ElementId, ElementRef, Notification, ObservationHandle, ObservedBox, ResizeCallback, ResizeEntry,
    ResizePlatform, SizeListener, SizeObserver, SizeSignal,
};
pub use render::{RenderTarget, SceneRecorder};
pub use scale::{BandScale, ColorScale, LinearScale};
pub use theme::{Rgb, Theme};
