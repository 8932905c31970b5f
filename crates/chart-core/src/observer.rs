// File: crates/chart-core/src/observer.rs
// Summary: Size observer that turns platform resize callbacks into a reactive content-box value.
// Notes:
// - Everything here is single-threaded (`Rc`/`RefCell`); platforms deliver on the UI thread.
// - Each attach bumps a generation counter. Callbacks carry the generation they were
//   registered with, so batches from a detached or replaced registration are dropped.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::error::ObserverError;

/// Opaque id of a platform element (a container whose box can be measured).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Reference to an element that may not be mounted yet.
pub type ElementRef = Option<ElementId>;

/// Measured content box of an element, in logical pixels.
///
/// `top`/`left` are the content offsets inside the element (its padding).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ObservedBox {
    pub width: f64,
    pub height: f64,
    pub top: f64,
    pub left: f64,
}

impl ObservedBox {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height, top: 0.0, left: 0.0 }
    }

    pub const fn with_offsets(mut self, top: f64, left: f64) -> Self {
        self.top = top;
        self.left = left;
        self
    }

    /// True when the box has no drawable area.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// One platform measurement of one element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeEntry {
    pub target: ElementId,
    pub content_rect: ObservedBox,
}

/// What a platform hands to an observation callback.
#[derive(Clone, Debug, PartialEq)]
pub enum Notification {
    /// A coalesced batch of measurements, in arrival order.
    Resized(Vec<ResizeEntry>),
    /// The platform can no longer observe the element; the registration is gone.
    Lost(ObserverError),
}

/// Platform-issued token for one registered observation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObservationHandle(pub u64);

pub type ResizeCallback = Box<dyn FnMut(Notification)>;

/// Platform size-observation capability.
pub trait ResizePlatform {
    fn observe(&self, element: ElementId, callback: ResizeCallback) -> Result<ObservationHandle, ObserverError>;
    /// Unknown or already-removed handles are ignored.
    fn unobserve(&self, handle: ObservationHandle);
}

impl<P: ResizePlatform + ?Sized> ResizePlatform for Rc<P> {
    fn observe(&self, element: ElementId, callback: ResizeCallback) -> Result<ObservationHandle, ObserverError> {
        (**self).observe(element, callback)
    }
    fn unobserve(&self, handle: ObservationHandle) {
        (**self).unobserve(handle)
    }
}

/// Receiver of observer output.
pub trait SizeListener {
    fn on_change(&mut self, size: ObservedBox);
    fn on_error(&mut self, _err: &ObserverError) {}
    /// The value went back to absent because the observer moved to another element.
    fn on_reset(&mut self) {}
    fn on_close(&mut self) {}
}

impl<L: SizeListener + ?Sized> SizeListener for Rc<RefCell<L>> {
    fn on_change(&mut self, size: ObservedBox) {
        self.borrow_mut().on_change(size)
    }
    fn on_error(&mut self, err: &ObserverError) {
        self.borrow_mut().on_error(err)
    }
    fn on_reset(&mut self) {
        self.borrow_mut().on_reset()
    }
    fn on_close(&mut self) {
        self.borrow_mut().on_close()
    }
}

impl<L: SizeListener + ?Sized> SizeListener for Box<L> {
    fn on_change(&mut self, size: ObservedBox) {
        (**self).on_change(size)
    }
    fn on_error(&mut self, err: &ObserverError) {
        (**self).on_error(err)
    }
    fn on_reset(&mut self) {
        (**self).on_reset()
    }
    fn on_close(&mut self) {
        (**self).on_close()
    }
}

/// Listener built from a closure; errors and close are ignored.
pub struct FnListener<F>(F);

impl<F: FnMut(ObservedBox)> SizeListener for FnListener<F> {
    fn on_change(&mut self, size: ObservedBox) {
        (self.0)(size)
    }
}

pub fn listener_fn<F: FnMut(ObservedBox)>(f: F) -> FnListener<F> {
    FnListener(f)
}

/// Read-only handle on the latest observed box.
#[derive(Clone, Default)]
pub struct SizeSignal {
    inner: Rc<SignalCell>,
}

#[derive(Default)]
struct SignalCell {
    value: Cell<Option<ObservedBox>>,
    version: Cell<u64>,
}

impl SizeSignal {
    pub fn get(&self) -> Option<ObservedBox> {
        self.inner.value.get()
    }

    /// Incremented on every write, including writes back to the absent state.
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    fn set(&self, value: Option<ObservedBox>) {
        self.inner.value.set(value);
        self.inner.version.set(self.inner.version.get() + 1);
    }
}

impl fmt::Debug for SizeSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SizeSignal")
            .field("value", &self.get())
            .field("version", &self.version())
            .finish()
    }
}

#[derive(Default)]
struct Shared {
    generation: u64,
    element: Option<ElementId>,
    disposed: bool,
    // Set when dispose runs while the listener is out for delivery.
    close_pending: bool,
    listener: Option<Box<dyn SizeListener>>,
}

/// Exposes the content box of one element as a reactive value.
///
/// One observer holds at most one platform registration. Call [`SizeObserver::dispose`]
/// on teardown; dropping the observer disposes it as well.
pub struct SizeObserver<P: ResizePlatform> {
    platform: P,
    state: Rc<RefCell<Shared>>,
    signal: SizeSignal,
    handle: Option<ObservationHandle>,
}

impl<P: ResizePlatform> SizeObserver<P> {
    pub fn new(platform: P) -> Self {
        Self {
            platform,
            state: Rc::new(RefCell::new(Shared::default())),
            signal: SizeSignal::default(),
            handle: None,
        }
    }

    pub fn with_listener(platform: P, listener: impl SizeListener + 'static) -> Self {
        let observer = Self::new(platform);
        observer.state.borrow_mut().listener = Some(Box::new(listener));
        observer
    }

    /// Start observing `element`, replacing any previous registration.
    ///
    /// Re-attaching to the element already observed is a no-op. Attaching to a different
    /// element resets the current value to absent until the new element is measured.
    pub fn attach(&mut self, element: ElementRef) -> Result<(), ObserverError> {
        if self.state.borrow().disposed {
            return Err(ObserverError::Disposed);
        }
        let Some(element) = element else {
            let err = ObserverError::Unmounted;
            warn!("size observer attach without a mounted element");
            self.report(&err);
            return Err(err);
        };
        if self.handle.is_some() && self.state.borrow().element == Some(element) {
            return Ok(());
        }

        self.release();
        if self.signal.get().is_some() {
            self.signal.set(None);
            with_listener(&self.state, |listener| listener.on_reset());
        }

        let generation = {
            let mut state = self.state.borrow_mut();
            state.generation += 1;
            state.element = Some(element);
            state.generation
        };
        let callback = deliver(Rc::clone(&self.state), self.signal.clone(), generation, element);
        match self.platform.observe(element, callback) {
            Ok(handle) => {
                debug!(%element, handle = handle.0, generation, "size observer attached");
                self.handle = Some(handle);
                Ok(())
            }
            Err(err) => {
                {
                    let mut state = self.state.borrow_mut();
                    state.generation += 1;
                    state.element = None;
                }
                warn!(%element, error = %err, "size observer attach refused");
                self.report(&err);
                Err(err)
            }
        }
    }

    /// Stop observing. Safe to call without a prior attach and more than once.
    pub fn detach(&mut self) {
        self.release();
    }

    /// Detach and notify the listener's `on_close` exactly once.
    pub fn dispose(&mut self) {
        if self.state.borrow().disposed {
            return;
        }
        self.release();
        let listener = {
            let mut state = self.state.borrow_mut();
            state.disposed = true;
            let listener = state.listener.take();
            if listener.is_none() {
                state.close_pending = true;
            }
            listener
        };
        if let Some(mut listener) = listener {
            listener.on_close();
        }
        debug!("size observer disposed");
    }

    pub fn current(&self) -> Option<ObservedBox> {
        self.signal.get()
    }

    pub fn signal(&self) -> SizeSignal {
        self.signal.clone()
    }

    /// Element currently observed, if any.
    pub fn element(&self) -> Option<ElementId> {
        self.state.borrow().element
    }

    pub fn is_attached(&self) -> bool {
        self.state.borrow().element.is_some()
    }

    pub fn is_disposed(&self) -> bool {
        self.state.borrow().disposed
    }

    fn release(&mut self) {
        let Some(handle) = self.handle.take() else { return };
        let element = {
            let mut state = self.state.borrow_mut();
            state.generation += 1;
            state.element.take()
        };
        self.platform.unobserve(handle);
        match element {
            Some(element) => debug!(%element, handle = handle.0, "size observer detached"),
            None => debug!(handle = handle.0, "size observer released a lost registration"),
        }
    }

    fn report(&self, err: &ObserverError) {
        with_listener(&self.state, |listener| listener.on_error(err));
    }
}

impl<P: ResizePlatform> Drop for SizeObserver<P> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<P: ResizePlatform> fmt::Debug for SizeObserver<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("SizeObserver")
            .field("element", &state.element)
            .field("generation", &state.generation)
            .field("disposed", &state.disposed)
            .field("current", &self.signal.get())
            .finish()
    }
}

// Build the platform callback for one registration.
fn deliver(state: Rc<RefCell<Shared>>, signal: SizeSignal, generation: u64, element: ElementId) -> ResizeCallback {
    Box::new(move |note| {
        {
            let Ok(current) = state.try_borrow() else {
                warn!(%element, "size notification arrived during observer update; dropped");
                return;
            };
            if current.generation != generation || current.disposed {
                debug!(%element, generation, "discarding notification for stale registration");
                return;
            }
        }
        match note {
            Notification::Resized(entries) => {
                let latest = entries
                    .iter()
                    .filter(|entry| entry.target == element)
                    .last()
                    .map(|entry| entry.content_rect);
                let Some(size) = latest else { return };
                signal.set(Some(size));
                debug!(%element, width = size.width, height = size.height, batch = entries.len(), "size changed");
                with_listener(&state, |listener| listener.on_change(size));
            }
            Notification::Lost(err) => {
                warn!(%element, error = %err, "observed element lost");
                {
                    let mut current = state.borrow_mut();
                    current.generation += 1;
                    current.element = None;
                }
                if signal.get().is_some() {
                    signal.set(None);
                }
                with_listener(&state, |listener| listener.on_error(&err));
            }
        }
    })
}

// Run `f` on the listener without holding the state borrow, so the listener may call
// back into the observer (detach, dispose) from inside the hook.
fn with_listener(state: &Rc<RefCell<Shared>>, f: impl FnOnce(&mut dyn SizeListener)) {
    let Some(mut listener) = state.borrow_mut().listener.take() else { return };
    f(listener.as_mut());
    let mut current = state.borrow_mut();
    if current.disposed {
        let close = std::mem::take(&mut current.close_pending);
        drop(current);
        if close {
            listener.on_close();
        }
    } else if current.listener.is_none() {
        current.listener = Some(listener);
    }
}
