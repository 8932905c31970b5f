// File: crates/chart-render-skia/src/lib.rs
// Summary: Skia CPU raster render target for the bar chart (RGBA8 buffers and PNG bytes).
// Notes:
// - Shapes are retained between frames and painted on `finish`; the surface is reused
//   while the pixel size stays the same.
// - Plot coordinates are offset by the insets so axes and overflowing bars stay visible.

mod text;

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chart_core::{
    AxisLayout, AxisOrient, BarChart, BarShape, Label, ObservedBox, RenderTarget, Rgb, TextAnchor, Theme,
};
use skia_safe as skia;
use tracing::{trace, warn};

pub use text::TextShaper;

/// Margins around the observed box, in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Insets {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Insets {
    pub const fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        Self { left, right, top, bottom }
    }
    /// Total horizontal inset (left + right).
    pub const fn hsum(&self) -> u32 {
        self.left + self.right
    }
    /// Total vertical inset (top + bottom).
    pub const fn vsum(&self) -> u32 {
        self.top + self.bottom
    }
}

impl Default for Insets {
    // room for the right-hand value axis, the bottom index axis and tall-bar overflow
    fn default() -> Self {
        Self::new(16, 40, 24, 28)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RenderOptions {
    pub insets: Insets,
    pub theme: Theme,
    /// Device pixel ratio; the surface is `(box + insets) * dpr` pixels.
    pub dpr: f32,
    pub draw_labels: bool,
    pub font_size: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { insets: Insets::default(), theme: Theme::default(), dpr: 1.0, draw_labels: true, font_size: 11.0 }
    }
}

impl RenderOptions {
    /// Pixel dimensions of the surface for an observed box.
    pub fn surface_size(&self, size: ObservedBox) -> (i32, i32) {
        let w = (size.width.max(0.0) as f32 + self.insets.hsum() as f32) * self.dpr;
        let h = (size.height.max(0.0) as f32 + self.insets.vsum() as f32) * self.dpr;
        ((w.round() as i32).max(1), (h.round() as i32).max(1))
    }
}

#[inline]
fn color(c: Rgb) -> skia::Color {
    skia::Color::from_rgb(c.r, c.g, c.b)
}

/// Render target backed by a Skia raster surface.
pub struct SkiaTarget {
    opts: RenderOptions,
    size: Option<ObservedBox>,
    bars: BTreeMap<usize, BarShape>,
    axes: Vec<AxisLayout>,
    label: Option<Label>,
    surface: Option<skia::Surface>,
    shaper: Option<TextShaper>,
}

impl SkiaTarget {
    pub fn new(opts: RenderOptions) -> Self {
        Self {
            opts,
            size: None,
            bars: BTreeMap::new(),
            axes: Vec::new(),
            label: None,
            surface: None,
            shaper: None,
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.opts
    }

    /// Change options; takes effect on the next painted frame.
    pub fn set_options(&mut self, opts: RenderOptions) {
        self.opts = opts;
    }

    /// Pixel size of the last painted frame.
    pub fn pixel_size(&self) -> Option<(i32, i32)> {
        self.surface.as_ref().map(|s| (s.width(), s.height()))
    }

    /// Paint the retained scene into the surface.
    pub fn paint(&mut self) -> Result<()> {
        let size = self.size.context("no frame has begun")?;
        let (w, h) = self.opts.surface_size(size);
        let reuse = self.surface.as_ref().is_some_and(|s| s.width() == w && s.height() == h);
        if !reuse {
            let surface = skia::surfaces::raster_n32_premul((w, h))
                .ok_or_else(|| anyhow::anyhow!("failed to create {w}x{h} raster surface"))?;
            self.surface = Some(surface);
        }
        if self.opts.draw_labels && self.shaper.is_none() {
            self.shaper = Some(TextShaper::new());
        }
        let opts = self.opts;
        let shaper = if opts.draw_labels { self.shaper.as_ref() } else { None };
        let surface = self.surface.as_mut().context("surface missing")?;
        let canvas = surface.canvas();

        canvas.clear(color(opts.theme.background));
        canvas.save();
        canvas.scale((opts.dpr, opts.dpr));
        canvas.translate((opts.insets.left as f32, opts.insets.top as f32));

        let mut fill = skia::Paint::default();
        fill.set_anti_alias(true);
        fill.set_style(skia::paint::Style::Fill);
        for bar in self.bars.values() {
            fill.set_color(color(bar.fill));
            let rect = skia::Rect::from_xywh(bar.x as f32, bar.y as f32, bar.width as f32, bar.height as f32);
            canvas.draw_rect(rect, &fill);
        }

        for axis in &self.axes {
            draw_axis(canvas, axis, &opts, shaper);
        }

        if let (Some(label), Some(shaper)) = (&self.label, shaper) {
            shaper.draw(
                canvas,
                &label.text,
                label.x as f32,
                label.y as f32,
                opts.font_size,
                color(opts.theme.tooltip),
                label.anchor,
            );
        }
        canvas.restore();
        trace!(width = w, height = h, bars = self.bars.len(), "painted frame");
        Ok(())
    }

    /// Copy the painted frame out as tightly packed RGBA8 (unpremultiplied).
    /// Returns (pixels, width, height).
    pub fn rgba8(&mut self) -> Result<(Vec<u8>, u32, u32)> {
        let surface = self.surface.as_mut().context("nothing has been rendered")?;
        let (w, h) = (surface.width(), surface.height());
        let info = skia::ImageInfo::new((w, h), skia::ColorType::RGBA8888, skia::AlphaType::Unpremul, None);
        let row_bytes = w as usize * 4;
        let mut pixels = vec![0u8; row_bytes * h as usize];
        if !surface.read_pixels(&info, &mut pixels, row_bytes, (0, 0)) {
            anyhow::bail!("read_pixels failed for {w}x{h} surface");
        }
        Ok((pixels, w as u32, h as u32))
    }

    /// Encode the painted frame as PNG.
    pub fn png_bytes(&mut self) -> Result<Vec<u8>> {
        let (pixels, w, h) = self.rgba8()?;
        let img = image::RgbaImage::from_raw(w, h, pixels).context("pixel buffer size mismatch")?;
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).context("encode PNG failed")?;
        Ok(out.into_inner())
    }
}

impl RenderTarget for SkiaTarget {
    fn begin(&mut self, size: ObservedBox) {
        self.size = Some(size);
        self.axes.clear();
    }

    fn upsert_bar(&mut self, bar: &BarShape) {
        self.bars.insert(bar.index, *bar);
    }

    fn remove_bars_from(&mut self, len: usize) {
        self.bars.split_off(&len);
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
        if let Err(e) = self.paint() {
            warn!(error = %e, "skia frame failed");
        }
    }

    fn clear(&mut self) {
        self.size = None;
        self.bars.clear();
        self.axes.clear();
        self.label = None;
        self.surface = None;
    }
}

fn draw_axis(canvas: &skia::Canvas, axis: &AxisLayout, opts: &RenderOptions, shaper: Option<&TextShaper>) {
    let mut line = skia::Paint::default();
    line.set_anti_alias(true);
    line.set_style(skia::paint::Style::Stroke);
    line.set_stroke_width(1.0);
    line.set_color(color(opts.theme.axis_line));

    let off = axis.offset as f32;
    let (e0, e1) = (axis.extent.0 as f32, axis.extent.1 as f32);
    let size = axis.tick_size as f32;
    let gap = size + axis.tick_padding as f32;
    match axis.orient {
        AxisOrient::Bottom => canvas.draw_line((e0, off), (e1, off), &line),
        AxisOrient::Right => canvas.draw_line((off, e0), (off, e1), &line),
    };

    line.set_color(color(opts.theme.tick));
    for tick in &axis.ticks {
        let p = tick.position as f32;
        match axis.orient {
            AxisOrient::Bottom => {
                canvas.draw_line((p, off), (p, off + size), &line);
                if let Some(shaper) = shaper {
                    let baseline = off + gap + opts.font_size * 0.8;
                    shaper.draw(canvas, &tick.label, p, baseline, opts.font_size, color(opts.theme.tick_label), TextAnchor::Middle);
                }
            }
            AxisOrient::Right => {
                canvas.draw_line((off, p), (off + size, p), &line);
                if let Some(shaper) = shaper {
                    let baseline = p + opts.font_size * 0.35;
                    shaper.draw(canvas, &tick.label, off + gap, baseline, opts.font_size, color(opts.theme.tick_label), TextAnchor::Start);
                }
            }
        }
    }
}

/// Render `chart` into a fresh target and return PNG bytes, or `None` when the chart
/// has no measured size yet.
pub fn render_png(chart: &BarChart, opts: RenderOptions) -> Result<Option<Vec<u8>>> {
    if chart.geometry().is_none() {
        return Ok(None);
    }
    let mut target = SkiaTarget::new(opts);
    // `finish` paints; a failed paint leaves no surface and `png_bytes` reports it
    chart.render(&mut target);
    target.png_bytes().map(Some)
}

/// Convert RGBA8 pixels into 0RGB `u32`s (softbuffer's layout).
pub fn rgba_to_xrgb(rgba: &[u8], out: &mut [u32]) {
    for (dst, px) in out.iter_mut().zip(rgba.chunks_exact(4)) {
        let (r, g, b) = (px[0] as u32, px[1] as u32, px[2] as u32);
        *dst = (r << 16) | (g << 8) | b;
    }
}
