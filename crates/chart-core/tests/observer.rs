// File: crates/chart-core/tests/observer.rs
// Purpose: Size observer contract: last-write-wins, detach silence, re-attach isolation, teardown.

use std::cell::RefCell;
use std::rc::Rc;

use chart_core::{
    listener_fn, ElementId, LayoutHost, Notification, ObservationHandle, ObservedBox, ObserverError, ResizeCallback,
    ResizeEntry, ResizePlatform, SizeListener, SizeObserver,
};

#[derive(Default)]
struct Recorder {
    changes: Vec<ObservedBox>,
    errors: Vec<ObserverError>,
    resets: usize,
    closes: usize,
}

impl SizeListener for Recorder {
    fn on_change(&mut self, size: ObservedBox) {
        self.changes.push(size);
    }
    fn on_error(&mut self, err: &ObserverError) {
        self.errors.push(err.clone());
    }
    fn on_reset(&mut self) {
        self.resets += 1;
    }
    fn on_close(&mut self) {
        self.closes += 1;
    }
}

fn setup() -> (Rc<LayoutHost>, Rc<RefCell<Recorder>>, SizeObserver<Rc<LayoutHost>>) {
    let host = Rc::new(LayoutHost::new());
    let rec = Rc::new(RefCell::new(Recorder::default()));
    let observer = SizeObserver::with_listener(Rc::clone(&host), Rc::clone(&rec));
    (host, rec, observer)
}

#[test]
fn last_write_wins_within_a_batch() {
    let (host, rec, mut observer) = setup();
    let el = host.mount();
    observer.attach(Some(el)).unwrap();

    for w in [100.0, 250.0, 320.0, 410.0] {
        host.resize(el, ObservedBox::new(w, 200.0)).unwrap();
    }
    assert_eq!(host.flush(), 1);

    assert_eq!(observer.current(), Some(ObservedBox::new(410.0, 200.0)));
    // one coalesced emission per batch
    assert_eq!(rec.borrow().changes, vec![ObservedBox::new(410.0, 200.0)]);
}

#[test]
fn emissions_follow_batches_in_order() {
    let (host, rec, mut observer) = setup();
    let el = host.mount();
    observer.attach(Some(el)).unwrap();
    let signal = observer.signal();

    host.resize(el, ObservedBox::new(300.0, 100.0)).unwrap();
    host.flush();
    let v1 = signal.version();
    host.resize(el, ObservedBox::new(500.0, 120.0)).unwrap();
    host.flush();

    assert!(signal.version() > v1);
    assert_eq!(signal.get(), Some(ObservedBox::new(500.0, 120.0)));
    assert_eq!(
        rec.borrow().changes,
        vec![ObservedBox::new(300.0, 100.0), ObservedBox::new(500.0, 120.0)]
    );
}

#[test]
fn no_measurement_means_absent() {
    let (host, rec, mut observer) = setup();
    let el = host.mount();
    observer.attach(Some(el)).unwrap();
    assert_eq!(host.flush(), 0);
    assert_eq!(observer.current(), None);
    assert!(rec.borrow().changes.is_empty());
}

#[test]
fn laid_out_element_reports_initial_box() {
    let (host, _rec, mut observer) = setup();
    let el = host.mount_with_size(ObservedBox::new(400.0, 200.0));
    observer.attach(Some(el)).unwrap();
    host.flush();
    assert_eq!(observer.current(), Some(ObservedBox::new(400.0, 200.0)));
}

#[test]
fn detach_silences_further_events() {
    let (host, rec, mut observer) = setup();
    let el = host.mount();
    observer.attach(Some(el)).unwrap();
    host.resize(el, ObservedBox::new(100.0, 100.0)).unwrap();
    host.flush();

    observer.detach();
    assert_eq!(host.observation_count(), 0);
    host.resize(el, ObservedBox::new(999.0, 999.0)).unwrap();
    host.flush();

    assert_eq!(rec.borrow().changes.len(), 1);
    assert_eq!(observer.current(), Some(ObservedBox::new(100.0, 100.0)));
}

#[test]
fn detach_without_attach_is_a_noop() {
    let (host, rec, mut observer) = setup();
    observer.detach();
    observer.detach();
    assert!(!observer.is_attached());
    assert_eq!(host.observation_count(), 0);
    assert!(rec.borrow().errors.is_empty());
}

#[test]
fn attach_unmounted_reference_is_reported() {
    let (_host, rec, mut observer) = setup();
    let err = observer.attach(None).unwrap_err();
    assert_eq!(err, ObserverError::Unmounted);
    assert_eq!(rec.borrow().errors, vec![ObserverError::Unmounted]);
    assert!(!observer.is_attached());
}

#[test]
fn attach_unknown_element_is_reported() {
    let (_host, rec, mut observer) = setup();
    let err = observer.attach(Some(ElementId(42))).unwrap_err();
    assert_eq!(err, ObserverError::ElementNotFound(ElementId(42)));
    assert_eq!(rec.borrow().errors.len(), 1);
}

#[test]
fn reattach_same_element_keeps_registration() {
    let (host, rec, mut observer) = setup();
    let el = host.mount();
    observer.attach(Some(el)).unwrap();
    observer.attach(Some(el)).unwrap();
    assert_eq!(host.observation_count(), 1);
    assert_eq!(rec.borrow().resets, 0);
}

#[test]
fn reattach_never_emits_old_element_boxes() {
    let (host, rec, mut observer) = setup();
    let old = host.mount();
    let new = host.mount();
    observer.attach(Some(old)).unwrap();
    host.resize(old, ObservedBox::new(111.0, 11.0)).unwrap();
    host.flush();

    // queued but undelivered change on the old element
    host.resize(old, ObservedBox::new(222.0, 22.0)).unwrap();
    observer.attach(Some(new)).unwrap();
    assert_eq!(observer.current(), None, "value resets until the new element is measured");
    assert_eq!(rec.borrow().resets, 1);
    host.resize(new, ObservedBox::new(333.0, 33.0)).unwrap();
    host.flush();
    host.resize(old, ObservedBox::new(444.0, 44.0)).unwrap();
    host.flush();

    assert_eq!(observer.element(), Some(new));
    assert_eq!(host.observation_count(), 1);
    assert_eq!(
        rec.borrow().changes,
        vec![ObservedBox::new(111.0, 11.0), ObservedBox::new(333.0, 33.0)]
    );
}

#[test]
fn unmount_while_observed_reports_lost_element() {
    let (host, rec, mut observer) = setup();
    let el = host.mount_with_size(ObservedBox::new(50.0, 50.0));
    observer.attach(Some(el)).unwrap();
    host.flush();
    host.unmount(el).unwrap();
    host.flush();

    assert_eq!(rec.borrow().errors, vec![ObserverError::ElementRemoved(el)]);
    assert_eq!(observer.current(), None);
    assert!(!observer.is_attached());
    assert_eq!(host.observation_count(), 0);
    // releasing the dead registration is harmless
    observer.detach();
}

#[test]
fn dispose_closes_once_and_blocks_attach() {
    let (host, rec, mut observer) = setup();
    let el = host.mount();
    observer.attach(Some(el)).unwrap();
    observer.dispose();
    observer.dispose();
    assert_eq!(rec.borrow().closes, 1);
    assert_eq!(host.observation_count(), 0);
    assert_eq!(observer.attach(Some(el)), Err(ObserverError::Disposed));
}

#[test]
fn drop_releases_the_registration() {
    let host = Rc::new(LayoutHost::new());
    let el = host.mount();
    let closes = Rc::new(RefCell::new(Recorder::default()));
    {
        let mut observer = SizeObserver::with_listener(Rc::clone(&host), Rc::clone(&closes));
        observer.attach(Some(el)).unwrap();
        assert_eq!(host.observation_count(), 1);
    }
    assert_eq!(host.observation_count(), 0);
    assert_eq!(closes.borrow().closes, 1);
}

#[test]
fn closure_listener_receives_changes() {
    let host = Rc::new(LayoutHost::new());
    let el = host.mount();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let mut observer = SizeObserver::with_listener(Rc::clone(&host), listener_fn(move |b| sink.borrow_mut().push(b.width)));
    observer.attach(Some(el)).unwrap();
    host.resize(el, ObservedBox::new(12.0, 1.0)).unwrap();
    host.flush();
    assert_eq!(*seen.borrow(), vec![12.0]);
}

// A platform that ignores unobserve and keeps firing, to exercise the stale-generation guard.
#[derive(Default)]
struct LeakyPlatform {
    callbacks: RefCell<Vec<(ElementId, ResizeCallback)>>,
}

impl LeakyPlatform {
    fn fire(&self, target: ElementId, size: ObservedBox) {
        for (el, cb) in self.callbacks.borrow_mut().iter_mut() {
            if *el == target {
                cb(Notification::Resized(vec![ResizeEntry { target, content_rect: size }]));
            }
        }
    }
}

impl ResizePlatform for LeakyPlatform {
    fn observe(&self, element: ElementId, callback: ResizeCallback) -> Result<ObservationHandle, ObserverError> {
        let mut cbs = self.callbacks.borrow_mut();
        cbs.push((element, callback));
        Ok(ObservationHandle(cbs.len() as u64))
    }
    fn unobserve(&self, _handle: ObservationHandle) {}
}

#[test]
fn platform_events_after_detach_are_discarded() {
    let platform = Rc::new(LeakyPlatform::default());
    let rec = Rc::new(RefCell::new(Recorder::default()));
    let mut observer = SizeObserver::with_listener(Rc::clone(&platform), Rc::clone(&rec));
    let el = ElementId(1);
    observer.attach(Some(el)).unwrap();
    platform.fire(el, ObservedBox::new(10.0, 10.0));
    observer.detach();
    platform.fire(el, ObservedBox::new(20.0, 20.0));
    platform.fire(el, ObservedBox::new(30.0, 30.0));

    assert_eq!(rec.borrow().changes, vec![ObservedBox::new(10.0, 10.0)]);
    assert_eq!(observer.current(), Some(ObservedBox::new(10.0, 10.0)));
}

#[test]
fn stale_registration_cannot_leak_into_new_element() {
    let platform = Rc::new(LeakyPlatform::default());
    let rec = Rc::new(RefCell::new(Recorder::default()));
    let mut observer = SizeObserver::with_listener(Rc::clone(&platform), Rc::clone(&rec));
    observer.attach(Some(ElementId(1))).unwrap();
    observer.attach(Some(ElementId(2))).unwrap();
    platform.fire(ElementId(1), ObservedBox::new(1.0, 1.0));
    platform.fire(ElementId(2), ObservedBox::new(2.0, 2.0));

    assert_eq!(rec.borrow().changes, vec![ObservedBox::new(2.0, 2.0)]);
}

// Listener that tears the observer down from inside its own callback.
struct SelfDetaching {
    observer: Rc<RefCell<Option<SizeObserver<Rc<LayoutHost>>>>>,
    seen: usize,
    closes: Rc<RefCell<usize>>,
}

impl SizeListener for SelfDetaching {
    fn on_change(&mut self, _size: ObservedBox) {
        self.seen += 1;
        if let Some(observer) = self.observer.borrow_mut().as_mut() {
            observer.dispose();
        }
    }
    fn on_close(&mut self) {
        *self.closes.borrow_mut() += 1;
    }
}

#[test]
fn dispose_from_inside_callback_is_safe() {
    let host = Rc::new(LayoutHost::new());
    let el = host.mount();
    let slot = Rc::new(RefCell::new(None));
    let closes = Rc::new(RefCell::new(0));
    let listener = SelfDetaching { observer: Rc::clone(&slot), seen: 0, closes: Rc::clone(&closes) };
    let mut observer = SizeObserver::with_listener(Rc::clone(&host), listener);
    observer.attach(Some(el)).unwrap();
    *slot.borrow_mut() = Some(observer);

    host.resize(el, ObservedBox::new(5.0, 5.0)).unwrap();
    host.flush();
    host.resize(el, ObservedBox::new(6.0, 6.0)).unwrap();
    host.flush();

    assert_eq!(host.observation_count(), 0);
    assert_eq!(*closes.borrow(), 1);
    let observer = slot.borrow_mut().take().unwrap();
    assert!(observer.is_disposed());
}
