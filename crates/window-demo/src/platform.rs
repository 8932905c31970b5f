// File: crates/window-demo/src/platform.rs
// Summary: Resize-observation platform backed by a winit window's inner size.
// Notes:
// - The window content is one element; its box is the logical inner size minus the render
//   insets, with the insets reported as `top`/`left` offsets.
// - Resizes are queued and only delivered on `flush`, once per event-loop iteration.

use chart_core::{
    ElementId, LayoutHost, ObservationHandle, ObservedBox, ObserverError, ResizeCallback, ResizePlatform,
};
use chart_render_skia::Insets;
use std::cell::Cell;
use tracing::trace;
use winit::dpi::PhysicalSize;

pub struct WindowPlatform {
    host: LayoutHost,
    content: ElementId,
    insets: Insets,
    scale: Cell<f64>,
}

impl WindowPlatform {
    pub fn new(insets: Insets) -> Self {
        let host = LayoutHost::new();
        let content = host.mount();
        Self { host, content, insets, scale: Cell::new(1.0) }
    }

    /// The element that stands for the window's drawable area.
    pub fn content(&self) -> ElementId {
        self.content
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale.get()
    }

    pub fn on_resized(&self, physical: PhysicalSize<u32>, scale_factor: f64) -> Result<(), ObserverError> {
        self.scale.set(scale_factor);
        let size = content_box(physical, scale_factor, self.insets);
        trace!(width = size.width, height = size.height, scale_factor, "window resized");
        self.host.resize(self.content, size)
    }

    /// Deliver pending resizes to observers. Returns the number of batches delivered.
    pub fn flush(&self) -> usize {
        self.host.flush()
    }

    /// The window is going away; observers get a lost-element notification on the next flush.
    pub fn close(&self) -> Result<(), ObserverError> {
        self.host.unmount(self.content)
    }

    /// Map a physical cursor position to plot coordinates.
    pub fn to_plot(&self, x: f64, y: f64) -> (f64, f64) {
        let s = self.scale.get();
        (x / s - self.insets.left as f64, y / s - self.insets.top as f64)
    }
}

impl ResizePlatform for WindowPlatform {
    fn observe(&self, element: ElementId, callback: ResizeCallback) -> Result<ObservationHandle, ObserverError> {
        self.host.observe(element, callback)
    }

    fn unobserve(&self, handle: ObservationHandle) {
        self.host.unobserve(handle)
    }
}

pub fn content_box(physical: PhysicalSize<u32>, scale_factor: f64, insets: Insets) -> ObservedBox {
    let logical = physical.to_logical::<f64>(scale_factor);
    ObservedBox::new(
        (logical.width - insets.hsum() as f64).max(0.0),
        (logical.height - insets.vsum() as f64).max(0.0),
    )
    .with_offsets(insets.top as f64, insets.left as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chart_core::{listener_fn, SizeObserver};
    use std::rc::Rc;

    #[test]
    fn content_box_is_logical_size_minus_insets() {
        let insets = Insets::new(10, 20, 5, 15);
        let b = content_box(PhysicalSize::new(600, 400), 2.0, insets);
        assert_eq!(b.width, 270.0);
        assert_eq!(b.height, 180.0);
        assert_eq!((b.top, b.left), (5.0, 10.0));

        let tiny = content_box(PhysicalSize::new(10, 10), 1.0, insets);
        assert!(tiny.is_empty());
    }

    #[test]
    fn resizes_reach_observer_on_flush() {
        let platform = Rc::new(WindowPlatform::new(Insets::new(0, 0, 0, 0)));
        let seen = Rc::new(Cell::new(None));
        let sink = Rc::clone(&seen);
        let mut observer = SizeObserver::with_listener(
            Rc::clone(&platform),
            listener_fn(move |b: ObservedBox| sink.set(Some(b))),
        );
        observer.attach(Some(platform.content())).unwrap();

        platform.on_resized(PhysicalSize::new(300, 200), 1.0).unwrap();
        platform.on_resized(PhysicalSize::new(800, 600), 2.0).unwrap();
        assert!(seen.get().is_none());
        assert_eq!(platform.flush(), 1);
        assert_eq!(seen.get(), Some(ObservedBox::new(400.0, 300.0)));
        assert_eq!(platform.to_plot(100.0, 50.0), (50.0, 25.0));

        platform.close().unwrap();
        platform.flush();
        assert!(observer.current().is_none());
    }
}
