// File: crates/chart-core/src/chart.rs
// Summary: BarChart view: owns data and the latest observed box, re-derives geometry on change.
// Notes:
// - Data changes (`set_data`) and size changes (`set_size`, or the `SizeListener` impl)
//   both go through `recompute`, so geometry is always a pure function of (data, box, config).

use tracing::debug;

use crate::config::BarChartConfig;
use crate::error::{ConfigError, ObserverError};
use crate::geometry::{compute_geometry, ChartGeometry, Label};
use crate::observer::{ObservedBox, SizeListener};
use crate::render::RenderTarget;

pub struct BarChart {
    config: BarChartConfig,
    data: Vec<f64>,
    size: Option<ObservedBox>,
    hovered: Option<usize>,
    geometry: Option<ChartGeometry>,
    revision: u64,
}

impl BarChart {
    /// Build a chart with a validated config.
    pub fn new(config: BarChartConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: BarChartConfig) -> Self {
        Self { config, data: Vec::new(), size: None, hovered: None, geometry: None, revision: 0 }
    }

    pub fn with_data(mut self, data: impl Into<Vec<f64>>) -> Self {
        self.set_data(data);
        self
    }

    pub fn set_data(&mut self, data: impl Into<Vec<f64>>) -> Option<&ChartGeometry> {
        self.data = data.into();
        self.recompute()
    }

    pub fn set_size(&mut self, size: Option<ObservedBox>) -> Option<&ChartGeometry> {
        self.size = size;
        self.recompute()
    }

    pub fn set_config(&mut self, config: BarChartConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        self.recompute();
        Ok(())
    }

    /// Re-derive geometry from the current data and box. Without a box this clears it.
    pub fn recompute(&mut self) -> Option<&ChartGeometry> {
        self.geometry = compute_geometry(&self.data, self.size, &self.config);
        if self.hovered.is_some_and(|i| i >= self.data.len()) {
            self.hovered = None;
        }
        self.revision += 1;
        match &self.geometry {
            Some(g) => debug!(
                bars = g.bars.len(),
                width = g.size.width,
                height = g.size.height,
                revision = self.revision,
                "bar chart recomputed"
            ),
            None => debug!(revision = self.revision, "bar chart has no measurement; geometry cleared"),
        }
        self.geometry.as_ref()
    }

    /// Show the label for bar `index`. Returns false if there is no such bar.
    pub fn pointer_enter(&mut self, index: usize) -> bool {
        let exists = self.geometry.as_ref().is_some_and(|g| index < g.bars.len());
        if exists {
            self.hovered = Some(index);
        }
        exists
    }

    pub fn pointer_leave(&mut self) {
        self.hovered = None;
    }

    /// Track a pointer at plot coordinates. Returns true when the hovered bar changed.
    pub fn pointer_move(&mut self, px: f64, py: f64) -> bool {
        let hit = self.hit_test(px, py);
        if hit == self.hovered {
            return false;
        }
        self.hovered = hit;
        true
    }

    pub fn hit_test(&self, px: f64, py: f64) -> Option<usize> {
        self.geometry.as_ref()?.bar_at(px, py)
    }

    pub fn label(&self) -> Option<Label> {
        self.geometry.as_ref()?.label_for(self.hovered?)
    }

    pub fn render(&self, target: &mut dyn RenderTarget) {
        let Some(g) = &self.geometry else {
            target.clear();
            return;
        };
        target.begin(g.size);
        for bar in &g.bars {
            target.upsert_bar(bar);
        }
        target.remove_bars_from(g.bars.len());
        target.draw_axis(&g.x_axis);
        target.draw_axis(&g.y_axis);
        match self.label() {
            Some(label) => target.show_label(&label),
            None => target.hide_label(),
        }
        target.finish();
    }

    pub fn geometry(&self) -> Option<&ChartGeometry> {
        self.geometry.as_ref()
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn size(&self) -> Option<ObservedBox> {
        self.size
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn config(&self) -> &BarChartConfig {
        &self.config
    }

    /// Number of recomputations so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl Default for BarChart {
    fn default() -> Self {
        Self::with_valid_config(BarChartConfig::default())
    }
}

impl SizeListener for BarChart {
    fn on_change(&mut self, size: ObservedBox) {
        self.set_size(Some(size));
    }

    fn on_error(&mut self, _err: &ObserverError) {
        if self.size.is_some() {
            self.set_size(None);
        }
    }

    fn on_reset(&mut self) {
        if self.size.is_some() {
            self.set_size(None);
        }
    }
}
