// File: crates/chart-core/src/render.rs
// Summary: Rendering capability used by the bar chart, plus a retained in-memory scene.

use std::collections::BTreeMap;

use crate::axis::AxisLayout;
use crate::geometry::{BarShape, Label};
use crate::observer::ObservedBox;

/// Backend that receives positioned shapes keyed by data index.
///
/// A frame is `begin`, any number of shape calls, then `finish`. Bars not re-sent in a
/// frame keep their previous state until `remove_bars_from` drops them.
pub trait RenderTarget {
    fn begin(&mut self, size: ObservedBox);
    fn upsert_bar(&mut self, bar: &BarShape);
    /// Remove every bar with `index >= len`.
    fn remove_bars_from(&mut self, len: usize);
    fn draw_axis(&mut self, axis: &AxisLayout);
    fn show_label(&mut self, label: &Label);
    fn hide_label(&mut self);
    fn finish(&mut self) {}
    /// Drop everything; used when there is no geometry to show.
    fn clear(&mut self);
}

/// Retained scene: the latest state of every shape, with simple change counters.
#[derive(Clone, Debug, Default)]
pub struct SceneRecorder {
    pub size: Option<ObservedBox>,
    pub bars: BTreeMap<usize, BarShape>,
    pub axes: Vec<AxisLayout>,
    pub label: Option<Label>,
    pub frames: usize,
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
    pub clears: usize,
}

impl SceneRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when nothing would be drawn.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty() && self.axes.is_empty() && self.label.is_none()
    }
}

impl RenderTarget for SceneRecorder {
    fn begin(&mut self, size: ObservedBox) {
        self.size = Some(size);
        self.axes.clear();
    }

    fn upsert_bar(&mut self, bar: &BarShape) {
        match self.bars.insert(bar.index, *bar) {
            Some(_) => self.updated += 1,
            None => self.created += 1,
        }
    }

    fn remove_bars_from(&mut self, len: usize) {
        let stale = self.bars.split_off(&len);
        self.removed += stale.len();
    }

    fn draw_axis(&mut self, axis: &AxisLayout) {
        self.axes.push(axis.clone());
    }

    fn show_label(&mut self, label: &Label) {
        self.label = Some(label.clone());
    }

    fn hide_label(&mut self) {
        self.label = None;
    }

    fn finish(&mut self) {
        self.frames += 1;
    }

    fn clear(&mut self) {
        self.size = None;
        self.removed += self.bars.len();
        self.bars.clear();
        self.axes.clear();
        self.label = None;
        self.clears += 1;
    }
}
