// File: crates/chart-core/src/axis.rs
// Summary: Axis layouts (tick positions and labels) for band and linear scales.

use crate::scale::{BandScale, LinearScale};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisOrient {
    /// Horizontal axis, ticks and labels below the line.
    Bottom,
    /// Vertical axis, ticks and labels to the right of the line.
    Right,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    pub value: f64,
    /// Pixel position along the axis.
    pub position: f64,
    pub label: String,
}

/// Everything a renderer needs to draw one axis.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisLayout {
    pub orient: AxisOrient,
    /// Cross-axis translation: `y` of a bottom axis, `x` of a right axis.
    pub offset: f64,
    /// Extent of the axis line along the axis.
    pub extent: (f64, f64),
    pub ticks: Vec<Tick>,
    pub tick_size: f64,
    pub tick_padding: f64,
}

pub const TICK_SIZE: f64 = 6.0;
pub const TICK_PADDING: f64 = 3.0;

impl AxisLayout {
    /// One tick per band, at the band center, labelled with the index.
    pub fn band(scale: &BandScale, orient: AxisOrient, offset: f64) -> Self {
        let ticks = scale
            .domain()
            .filter_map(|i| {
                scale.center(i).map(|position| Tick { value: i as f64, position, label: i.to_string() })
            })
            .collect();
        Self::with_ticks(orient, offset, scale.range(), ticks)
    }

    /// Nice ticks over the scale's domain, about `count` of them.
    pub fn linear(scale: &LinearScale, orient: AxisOrient, offset: f64, count: usize) -> Self {
        let values = scale.ticks(count);
        let step = tick_step(scale.domain.0, scale.domain.1, count);
        let ticks = values
            .into_iter()
            .map(|value| Tick { value, position: scale.map(value), label: format_tick(value, step) })
            .collect();
        Self::with_ticks(orient, offset, scale.range, ticks)
    }

    fn with_ticks(orient: AxisOrient, offset: f64, extent: (f64, f64), ticks: Vec<Tick>) -> Self {
        Self { orient, offset, extent, ticks, tick_size: TICK_SIZE, tick_padding: TICK_PADDING }
    }
}

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

// Returns (i1, i2, inc): ticks are i*inc for inc > 0, or i / -inc for inc < 0.
fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let k = 10f64.powf(-power) / factor;
        i1 = (start * k).round();
        i2 = (stop * k).round();
        if i1 / k < start {
            i1 += 1.0;
        }
        if i2 / k > stop {
            i2 -= 1.0;
        }
        inc = -k;
    } else {
        let k = 10f64.powf(power) * factor;
        i1 = (start / k).round();
        i2 = (stop / k).round();
        if i1 * k < start {
            i1 += 1.0;
        }
        if i2 * k > stop {
            i2 -= 1.0;
        }
        inc = k;
    }
    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

/// Round-number ticks (1, 2 or 5 times a power of ten) covering `[start, stop]`.
pub fn linear_ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let (i1, i2, inc) = tick_spec(lo, hi, count as f64);
    if !(i2 >= i1) {
        return Vec::new();
    }
    let n = (i2 - i1 + 1.0) as usize;
    let mut ticks: Vec<f64> = (0..n)
        .map(|i| {
            let k = i1 + i as f64;
            if inc < 0.0 {
                k / -inc
            } else {
                k * inc
            }
        })
        .collect();
    if reverse {
        ticks.reverse();
    }
    ticks
}

/// Distance between consecutive ticks produced by [`linear_ticks`].
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    if count == 0 || start == stop {
        return 0.0;
    }
    let (lo, hi) = if stop < start { (stop, start) } else { (start, stop) };
    let (_, _, inc) = tick_spec(lo, hi, count as f64);
    if inc < 0.0 {
        1.0 / -inc
    } else {
        inc
    }
}

/// Format a tick with just enough decimals for `step`.
pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step > 0.0 && step.is_finite() {
        (-step.abs().log10().floor()).max(0.0) as usize
    } else {
        0
    };
    let s = format!("{value:.decimals$}");
    // avoid "-0"
    if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
        s[1..].to_string()
    } else {
        s
    }
}
