// File: crates/chart-core/src/host.rs
// Summary: In-memory layout host implementing the resize-observation platform.
// Notes:
// - Size changes are queued per observation and delivered on `flush`, one batch per
//   observation, which is how a browser coalesces resize notifications per frame.
// - Callbacks run without the host borrowed, so they may observe/unobserve/resize.

use std::cell::RefCell;
use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::error::ObserverError;
use crate::observer::{
    ElementId, Notification, ObservationHandle, ObservedBox, ResizeCallback, ResizeEntry, ResizePlatform,
};

struct Observation {
    element: ElementId,
    // `None` while the callback is running.
    callback: Option<ResizeCallback>,
    queue: Vec<ResizeEntry>,
    lost: bool,
}

#[derive(Default)]
struct HostState {
    next_element: u64,
    next_handle: u64,
    // `None` = mounted but never laid out.
    elements: BTreeMap<ElementId, Option<ObservedBox>>,
    observations: BTreeMap<ObservationHandle, Observation>,
}

/// Element tree stand-in: mount elements, change their size, flush notifications.
#[derive(Default)]
pub struct LayoutHost {
    inner: RefCell<HostState>,
}

impl LayoutHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount an element that has not been measured yet.
    pub fn mount(&self) -> ElementId {
        self.mount_inner(None)
    }

    /// Mount an element with an initial layout.
    pub fn mount_with_size(&self, size: ObservedBox) -> ElementId {
        self.mount_inner(Some(size))
    }

    fn mount_inner(&self, size: Option<ObservedBox>) -> ElementId {
        let mut st = self.inner.borrow_mut();
        st.next_element += 1;
        let id = ElementId(st.next_element);
        st.elements.insert(id, size);
        trace!(element = %id, "mounted");
        id
    }

    /// Remove an element. Observations of it receive `Notification::Lost` on the next flush.
    pub fn unmount(&self, element: ElementId) -> Result<(), ObserverError> {
        let mut st = self.inner.borrow_mut();
        st.elements.remove(&element).ok_or(ObserverError::ElementNotFound(element))?;
        for obs in st.observations.values_mut().filter(|o| o.element == element) {
            obs.lost = true;
            obs.queue.clear();
        }
        debug!(%element, "unmounted");
        Ok(())
    }

    /// Lay out `element` at `size`. Unchanged sizes queue nothing.
    pub fn resize(&self, element: ElementId, size: ObservedBox) -> Result<(), ObserverError> {
        let mut st = self.inner.borrow_mut();
        let slot = st.elements.get_mut(&element).ok_or(ObserverError::ElementNotFound(element))?;
        if *slot == Some(size) {
            return Ok(());
        }
        *slot = Some(size);
        let entry = ResizeEntry { target: element, content_rect: size };
        for obs in st.observations.values_mut().filter(|o| o.element == element && !o.lost) {
            obs.queue.push(entry);
        }
        trace!(%element, width = size.width, height = size.height, "resized");
        Ok(())
    }

    pub fn measure(&self, element: ElementId) -> Option<ObservedBox> {
        self.inner.borrow().elements.get(&element).copied().flatten()
    }

    pub fn is_mounted(&self, element: ElementId) -> bool {
        self.inner.borrow().elements.contains_key(&element)
    }

    /// Number of live registrations.
    pub fn observation_count(&self) -> usize {
        self.inner.borrow().observations.len()
    }

    /// True when a flush would deliver something.
    pub fn has_pending(&self) -> bool {
        self.inner
            .borrow()
            .observations
            .values()
            .any(|o| o.lost || !o.queue.is_empty())
    }

    /// Deliver queued notifications. Returns the number of batches delivered.
    pub fn flush(&self) -> usize {
        let handles: Vec<ObservationHandle> = self.inner.borrow().observations.keys().copied().collect();
        let mut delivered = 0;
        for handle in handles {
            let taken = {
                let mut st = self.inner.borrow_mut();
                let next = match st.observations.get_mut(&handle) {
                    Some(obs) if obs.lost => obs
                        .callback
                        .take()
                        .map(|cb| (cb, Notification::Lost(ObserverError::ElementRemoved(obs.element)))),
                    Some(obs) if !obs.queue.is_empty() => {
                        let batch = std::mem::take(&mut obs.queue);
                        obs.callback.take().map(|cb| (cb, Notification::Resized(batch)))
                    }
                    _ => None,
                };
                next
            };
            let Some((mut callback, note)) = taken else { continue };
            let lost = matches!(note, Notification::Lost(_));
            callback(note);
            delivered += 1;

            let mut st = self.inner.borrow_mut();
            if lost {
                st.observations.remove(&handle);
            } else if let Some(obs) = st.observations.get_mut(&handle) {
                obs.callback = Some(callback);
            }
        }
        delivered
    }
}

impl ResizePlatform for LayoutHost {
    fn observe(&self, element: ElementId, callback: ResizeCallback) -> Result<ObservationHandle, ObserverError> {
        let mut st = self.inner.borrow_mut();
        let layout = *st.elements.get(&element).ok_or(ObserverError::ElementNotFound(element))?;
        st.next_handle += 1;
        let handle = ObservationHandle(st.next_handle);
        // A laid-out element reports its current box on the first flush after observe.
        let queue = layout
            .map(|size| vec![ResizeEntry { target: element, content_rect: size }])
            .unwrap_or_default();
        st.observations.insert(handle, Observation { element, callback: Some(callback), queue, lost: false });
        debug!(%element, handle = handle.0, "observe");
        Ok(handle)
    }

    fn unobserve(&self, handle: ObservationHandle) {
        if self.inner.borrow_mut().observations.remove(&handle).is_some() {
            debug!(handle = handle.0, "unobserve");
        }
    }
}
