// File: crates/chart-core/src/geometry.rs
// Summary: Derived bar chart geometry: scales, axes, bar shapes and hover labels.

use crate::axis::{AxisLayout, AxisOrient};
use crate::config::BarChartConfig;
use crate::observer::ObservedBox;
use crate::scale::{BandScale, ColorScale, LinearScale};
use crate::theme::Rgb;

/// One bar, in plot coordinates (origin top-left, y down).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarShape {
    pub index: usize,
    pub value: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Rgb,
}

impl BarShape {
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

/// Transient text shape shown above a hovered bar.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub index: usize,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub anchor: TextAnchor,
}

/// Everything derived from `(data, box)`.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartGeometry {
    pub size: ObservedBox,
    pub x_scale: BandScale,
    pub y_scale: LinearScale,
    pub color_scale: ColorScale,
    pub x_axis: AxisLayout,
    pub y_axis: AxisLayout,
    pub bars: Vec<BarShape>,
    pub label_offset: f64,
}

impl ChartGeometry {
    /// Hover label for bar `index`: its value, centered above the bar top.
    pub fn label_for(&self, index: usize) -> Option<Label> {
        let bar = self.bars.get(index)?;
        Some(Label {
            index,
            text: format_value(bar.value),
            x: bar.x + bar.width * 0.5,
            y: self.y_scale.map(bar.value) - self.label_offset,
            anchor: TextAnchor::Middle,
        })
    }

    /// Bar under a pointer at plot coordinates `(px, py)`.
    pub fn bar_at(&self, px: f64, py: f64) -> Option<usize> {
        let index = self.x_scale.invert(px)?;
        self.bars.get(index).filter(|bar| bar.contains(px, py)).map(|bar| bar.index)
    }
}

/// Derive chart geometry. An absent box yields no geometry.
pub fn compute_geometry(data: &[f64], size: Option<ObservedBox>, config: &BarChartConfig) -> Option<ChartGeometry> {
    let size = size?;
    let (width, height) = (size.width.max(0.0), size.height.max(0.0));

    let x_scale = BandScale::new(data.len(), (0.0, width)).padding(config.band_padding);
    let [lo, hi] = config.value_domain;
    let y_scale = LinearScale::new((lo, hi), (height, 0.0));
    let color_scale = ColorScale::new(config.color_stops.iter().map(|s| (s.value, s.color)).collect())
        .clamped(config.clamp_colors);

    let bars = data
        .iter()
        .enumerate()
        .filter_map(|(index, &value)| {
            let x = x_scale.map(index)?;
            let top = y_scale.map(value);
            Some(BarShape {
                index,
                value,
                x,
                y: top,
                width: x_scale.bandwidth(),
                height: (height - top).max(0.0),
                fill: color_scale.map(value),
            })
        })
        .collect();

    let x_axis = AxisLayout::band(&x_scale, AxisOrient::Bottom, height);
    let y_axis = AxisLayout::linear(&y_scale, AxisOrient::Right, width, config.value_ticks);

    Some(ChartGeometry {
        size,
        x_scale,
        y_scale,
        color_scale,
        x_axis,
        y_axis,
        bars,
        label_offset: config.label_offset,
    })
}

/// Shortest display form of a data value (`200`, `12.5`).
pub fn format_value(v: f64) -> String {
    if v == v.trunc() && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}
