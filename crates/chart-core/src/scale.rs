// File: crates/chart-core/src/scale.rs
// Summary: Band (ordinal position), linear (value) and piecewise color scales.

use std::ops::Range;

use crate::axis::linear_ticks;
use crate::theme::Rgb;

/// Ordinal scale mapping indices `0..len` onto evenly spaced bands of a pixel range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandScale {
    len: usize,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
    // derived
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    pub fn new(len: usize, range: (f64, f64)) -> Self {
        let mut s = Self {
            len,
            range,
            padding_inner: 0.0,
            padding_outer: 0.0,
            start: 0.0,
            step: 0.0,
            bandwidth: 0.0,
        };
        s.rescale();
        s
    }

    /// Set inner and outer padding together (inner is capped at 1).
    pub fn padding(mut self, p: f64) -> Self {
        self.padding_inner = p.clamp(0.0, 1.0);
        self.padding_outer = p.max(0.0);
        self.rescale();
        self
    }

    fn rescale(&mut self) {
        let (r0, r1) = self.range;
        let (lo, hi) = if r1 < r0 { (r1, r0) } else { (r0, r1) };
        let n = self.len as f64;
        self.step = (hi - lo) / (n - self.padding_inner + self.padding_outer * 2.0).max(1.0);
        // bands are centered (align 0.5)
        self.start = lo + (hi - lo - self.step * (n - self.padding_inner)) * 0.5;
        self.bandwidth = self.step * (1.0 - self.padding_inner);
    }

    /// Left edge of band `index`, or `None` outside the domain.
    pub fn map(&self, index: usize) -> Option<f64> {
        if index >= self.len {
            return None;
        }
        let slot = if self.range.1 < self.range.0 { self.len - 1 - index } else { index };
        Some(self.start + self.step * slot as f64)
    }

    /// Center of band `index`.
    pub fn center(&self, index: usize) -> Option<f64> {
        self.map(index).map(|x| x + self.bandwidth * 0.5)
    }

    /// Index whose band contains `px` (gaps between bands map to `None`).
    pub fn invert(&self, px: f64) -> Option<usize> {
        if self.len == 0 || self.step <= 0.0 {
            return None;
        }
        let slot = ((px - self.start) / self.step).floor();
        if slot < 0.0 || slot >= self.len as f64 {
            return None;
        }
        let slot = slot as usize;
        let left = self.start + self.step * slot as f64;
        if px > left + self.bandwidth {
            return None;
        }
        Some(if self.range.1 < self.range.0 { self.len - 1 - slot } else { slot })
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn domain(&self) -> Range<usize> {
        0..self.len
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }
}

/// Continuous linear scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
    pub clamp: bool,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range, clamp: false }
    }

    pub fn clamped(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    #[inline]
    fn normalize(&self, v: f64) -> f64 {
        let span = self.domain.1 - self.domain.0;
        // degenerate domain maps everything to the middle of the range
        let t = if span == 0.0 { 0.5 } else { (v - self.domain.0) / span };
        if self.clamp {
            t.clamp(0.0, 1.0)
        } else {
            t
        }
    }

    #[inline]
    pub fn map(&self, v: f64) -> f64 {
        let t = self.normalize(v);
        self.range.0 + t * (self.range.1 - self.range.0)
    }

    pub fn invert(&self, px: f64) -> f64 {
        let span = self.range.1 - self.range.0;
        let mut t = if span == 0.0 { 0.5 } else { (px - self.range.0) / span };
        if self.clamp {
            t = t.clamp(0.0, 1.0);
        }
        self.domain.0 + t * (self.domain.1 - self.domain.0)
    }

    /// Round-number ticks across the domain, about `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        linear_ticks(self.domain.0, self.domain.1, count)
    }
}

/// Piecewise-linear color scale over increasing stops.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorScale {
    stops: Vec<(f64, Rgb)>,
    clamp: bool,
}

impl ColorScale {
    /// `stops` must be non-empty and increasing in value; config validation guarantees it.
    pub fn new(stops: Vec<(f64, Rgb)>) -> Self {
        Self { stops, clamp: false }
    }

    pub fn clamped(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    pub fn stops(&self) -> &[(f64, Rgb)] {
        &self.stops
    }

    pub fn map(&self, v: f64) -> Rgb {
        match self.stops.as_slice() {
            [] => Rgb::BLACK,
            [(_, only)] => *only,
            stops => {
                let first = stops[0].0;
                let last = stops[stops.len() - 1].0;
                let v = if self.clamp { v.max(first).min(last) } else { v };
                // segment i covers [stops[i], stops[i + 1]]; values past either end use the edge segment
                let i = stops[1..stops.len() - 1]
                    .iter()
                    .take_while(|(d, _)| *d <= v)
                    .count();
                let (d0, c0) = stops[i];
                let (d1, c1) = stops[i + 1];
                let t = if d1 == d0 { 0.0 } else { (v - d0) / (d1 - d0) };
                c0.lerp(c1, t)
            }
        }
    }
}
