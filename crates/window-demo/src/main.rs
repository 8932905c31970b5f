// File: crates/window-demo/src/main.rs
// Summary: Windowed demo: the window's content box is observed through WindowPlatform, every emitted
// box recomputes the BarChart, and Skia renders are blitted with softbuffer (CPU).
// Keys: Space regenerates data, Escape closes. Hovering a bar shows its value.

mod platform;

use std::cell::RefCell;
use std::num::NonZeroU32;
use std::rc::Rc;

use anyhow::{Context, Result};
use chart_core::{BarChart, SizeObserver};
use chart_render_skia::{rgba_to_xrgb, RenderOptions, SkiaTarget};
use rand::Rng;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use winit::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use platform::WindowPlatform;

fn random_data(n: usize) -> Vec<f64> {
    let mut rng = rand::rng();
    (0..n).map(|_| rng.random_range(0.0..200.0_f64).round()).collect()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title("Constellation Bars")
        .with_inner_size(winit::dpi::LogicalSize::new(720.0, 420.0))
        .build(&event_loop)
        .context("build window")?;

    let context = unsafe { softbuffer::Context::new(&window) }
        .map_err(|e| anyhow::anyhow!("softbuffer context: {e}"))?;
    let mut surface = unsafe { softbuffer::Surface::new(&context, &window) }
        .map_err(|e| anyhow::anyhow!("softbuffer surface: {e}"))?;

    let mut opts = RenderOptions { dpr: window.scale_factor() as f32, ..RenderOptions::default() };
    let platform = Rc::new(WindowPlatform::new(opts.insets));
    let chart = Rc::new(RefCell::new(BarChart::default().with_data(random_data(8))));
    let mut observer = SizeObserver::with_listener(Rc::clone(&platform), Rc::clone(&chart));
    observer.attach(Some(platform.content())).context("observe window content")?;
    platform
        .on_resized(window.inner_size(), window.scale_factor())
        .context("initial window size")?;

    let mut target = SkiaTarget::new(opts);
    let mut shown_revision = u64::MAX;
    let mut dirty = true;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested
                | WindowEvent::KeyboardInput {
                    input: KeyboardInput { virtual_keycode: Some(VirtualKeyCode::Escape), state: ElementState::Pressed, .. },
                    ..
                } => {
                    if let Err(e) = platform.close() {
                        warn!(error = %e, "closing window content");
                    }
                    platform.flush();
                    observer.dispose();
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => {
                    if let Err(e) = platform.on_resized(size, window.scale_factor()) {
                        warn!(error = %e, "resize dropped");
                    }
                }
                WindowEvent::ScaleFactorChanged { scale_factor, new_inner_size } => {
                    opts.dpr = scale_factor as f32;
                    target.set_options(opts);
                    if let Err(e) = platform.on_resized(*new_inner_size, scale_factor) {
                        warn!(error = %e, "resize dropped");
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    let (x, y) = platform.to_plot(position.x, position.y);
                    dirty |= chart.borrow_mut().pointer_move(x, y);
                }
                WindowEvent::CursorLeft { .. } => {
                    chart.borrow_mut().pointer_leave();
                    dirty = true;
                }
                WindowEvent::KeyboardInput {
                    input: KeyboardInput { virtual_keycode: Some(VirtualKeyCode::Space), state: ElementState::Pressed, .. },
                    ..
                } => {
                    let n = rand::rng().random_range(3..16);
                    chart.borrow_mut().set_data(random_data(n));
                    info!(bars = n, "new data");
                }
                _ => {}
            },
            Event::MainEventsCleared => {
                let batches = platform.flush();
                let revision = chart.borrow().revision();
                if batches > 0 || revision != shown_revision || dirty {
                    debug!(batches, revision, "redraw requested");
                    shown_revision = revision;
                    dirty = false;
                    window.request_redraw();
                }
            }
            Event::RedrawRequested(_) => {
                chart.borrow().render(&mut target);
                if let Err(e) = present(&mut surface, &mut target, window.inner_size()) {
                    warn!(error = %e, "present failed");
                }
            }
            _ => {}
        }
    })
}

fn present(
    surface: &mut softbuffer::Surface,
    target: &mut SkiaTarget,
    size: winit::dpi::PhysicalSize<u32>,
) -> Result<()> {
    let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) else {
        return Ok(());
    };
    surface.resize(w, h).map_err(|e| anyhow::anyhow!("resize surface: {e}"))?;
    let mut frame = surface.buffer_mut().map_err(|e| anyhow::anyhow!("frame: {e}"))?;
    let bg = target.options().theme.background;
    frame.fill(((bg.r as u32) << 16) | ((bg.g as u32) << 8) | bg.b as u32);

    if target.pixel_size().is_some() {
        let (rgba, fw, fh) = target.rgba8()?;
        let (dst_w, dst_h) = (w.get() as usize, h.get() as usize);
        let (cols, rows) = ((fw as usize).min(dst_w), (fh as usize).min(dst_h));
        for row in 0..rows {
            let src = &rgba[row * fw as usize * 4..][..cols * 4];
            rgba_to_xrgb(src, &mut frame[row * dst_w..][..cols]);
        }
    }
    frame.present().map_err(|e| anyhow::anyhow!("present: {e}"))?;
    Ok(())
}
