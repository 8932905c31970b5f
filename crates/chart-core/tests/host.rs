// File: crates/chart-core/tests/host.rs
// Purpose: In-memory layout host: queuing, per-observation batches, re-entrant callbacks.

use std::cell::RefCell;
use std::rc::Rc;

use chart_core::{LayoutHost, Notification, ObservedBox, ObserverError, ResizePlatform};

#[test]
fn unchanged_size_queues_nothing() {
    let host = LayoutHost::new();
    let el = host.mount_with_size(ObservedBox::new(10.0, 10.0));
    let hits = Rc::new(RefCell::new(0));
    let h = Rc::clone(&hits);
    host.observe(el, Box::new(move |_| *h.borrow_mut() += 1)).unwrap();
    host.flush();
    host.resize(el, ObservedBox::new(10.0, 10.0)).unwrap();
    assert!(!host.has_pending());
    assert_eq!(host.flush(), 0);
    assert_eq!(*hits.borrow(), 1);
}

#[test]
fn batches_keep_arrival_order() {
    let host = LayoutHost::new();
    let el = host.mount();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    host.observe(
        el,
        Box::new(move |note| {
            if let Notification::Resized(entries) = note {
                sink.borrow_mut().push(entries.iter().map(|e| e.content_rect.width).collect::<Vec<_>>());
            }
        }),
    )
    .unwrap();
    host.resize(el, ObservedBox::new(1.0, 1.0)).unwrap();
    host.resize(el, ObservedBox::new(2.0, 1.0)).unwrap();
    host.resize(el, ObservedBox::new(3.0, 1.0)).unwrap();
    host.flush();
    assert_eq!(*seen.borrow(), vec![vec![1.0, 2.0, 3.0]]);
}

#[test]
fn unknown_elements_are_rejected() {
    let host = LayoutHost::new();
    let el = host.mount();
    host.unmount(el).unwrap();
    assert!(!host.is_mounted(el));
    assert_eq!(host.resize(el, ObservedBox::new(1.0, 1.0)), Err(ObserverError::ElementNotFound(el)));
    assert!(host.observe(el, Box::new(|_| {})).is_err());
    assert_eq!(host.unmount(el), Err(ObserverError::ElementNotFound(el)));
}

#[test]
fn callback_may_unobserve_itself() {
    let host = Rc::new(LayoutHost::new());
    let el = host.mount();
    let handle_slot = Rc::new(RefCell::new(None));
    let (h, slot) = (Rc::clone(&host), Rc::clone(&handle_slot));
    let handle = host
        .observe(
            el,
            Box::new(move |_| {
                if let Some(handle) = *slot.borrow() {
                    h.unobserve(handle);
                }
            }),
        )
        .unwrap();
    *handle_slot.borrow_mut() = Some(handle);

    host.resize(el, ObservedBox::new(4.0, 4.0)).unwrap();
    assert_eq!(host.flush(), 1);
    assert_eq!(host.observation_count(), 0);
    host.resize(el, ObservedBox::new(5.0, 5.0)).unwrap();
    assert_eq!(host.flush(), 0);
}

#[test]
fn measure_reports_layout() {
    let host = LayoutHost::new();
    let el = host.mount();
    assert_eq!(host.measure(el), None);
    host.resize(el, ObservedBox::new(7.0, 8.0).with_offsets(1.0, 2.0)).unwrap();
    let b = host.measure(el).unwrap();
    assert_eq!((b.width, b.height, b.top, b.left), (7.0, 8.0, 1.0, 2.0));
}
