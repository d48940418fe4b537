//! Owner of the open modal stack.

use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use tracing::{debug, error};

use super::accessor::ModalAccessor;
use super::descriptor::{ModalDescriptor, ModalId, ModalRequest, OnClose};

/// Shared flag telling the screen below the overlays to stop scrolling.
///
/// The store engages the lock when the first modal opens and releases it when
/// the last one closes. Everything else only reads it.
#[derive(Debug, Clone, Default)]
pub struct ScrollLock(Rc<Cell<bool>>);

impl ScrollLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_engaged(&self) -> bool {
        self.0.get()
    }

    fn set(&self, engaged: bool) {
        self.0.set(engaged);
    }
}

/// Ordered list of open modals.
///
/// The last element is the topmost modal. The list is only mutated through
/// [`ModalStore::open`], [`ModalStore::close`] and [`ModalStore::close_all`];
/// every one of them keeps the scroll lock and the escape listener in step
/// with whether the list is empty.
#[derive(Debug, Default)]
pub struct ModalStore {
    active: Vec<ModalDescriptor>,
    scroll_lock: ScrollLock,
    escape_listener: bool,
}

impl ModalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that drives an existing scroll lock.
    ///
    /// The lock is left as it is until this store's first open. A lock has a
    /// single owning store; the screen and the app only read it.
    pub fn with_scroll_lock(scroll_lock: ScrollLock) -> Self {
        Self {
            active: Vec::new(),
            scroll_lock,
            escape_listener: false,
        }
    }

    /// Handle to the scroll lock driven by this store.
    pub fn scroll_lock(&self) -> ScrollLock {
        self.scroll_lock.clone()
    }

    /// Defaulting facade over this store.
    pub const fn modals(&mut self) -> ModalAccessor<'_> {
        ModalAccessor::new(self)
    }

    /// Push a new modal on top of the stack and return its id.
    pub fn open(&mut self, request: ModalRequest) -> ModalId {
        let mut id = ModalId::generate();
        while self.is_open(&id) {
            id = ModalId::generate();
        }

        self.active.push(request.into_descriptor(id.clone()));
        debug!(modal = %id, depth = self.active.len(), "Opened modal");
        self.sync_listeners();
        id
    }

    /// Close the modal with the given id, or every modal when `id` is `None`.
    ///
    /// Unknown ids are ignored.
    pub fn close(&mut self, id: Option<&ModalId>) {
        let Some(id) = id else {
            self.close_all();
            return;
        };

        let Some(position) = self.active.iter().position(|m| m.id() == id) else {
            return;
        };

        let callback = self.active[position].take_on_close();
        run_on_close(id, callback);

        self.active.remove(position);
        debug!(modal = %id, depth = self.active.len(), "Closed modal");
        self.sync_listeners();
    }

    /// Close every open modal, firing each close callback once.
    pub fn close_all(&mut self) {
        if self.active.is_empty() {
            return;
        }

        for descriptor in &mut self.active {
            let callback = descriptor.take_on_close();
            run_on_close(descriptor.id(), callback);
        }

        debug!(count = self.active.len(), "Closed all modals");
        self.active.clear();
        self.sync_listeners();
    }

    pub fn is_open(&self, id: &ModalId) -> bool {
        self.active.iter().any(|m| m.id() == id)
    }

    /// Open modals, bottom first.
    pub fn descriptors(&self) -> &[ModalDescriptor] {
        &self.active
    }

    pub(super) fn descriptors_mut(&mut self) -> &mut [ModalDescriptor] {
        &mut self.active
    }

    pub fn topmost(&self) -> Option<&ModalDescriptor> {
        self.active.last()
    }

    pub fn topmost_mut(&mut self) -> Option<&mut ModalDescriptor> {
        self.active.last_mut()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_lock.is_engaged()
    }

    /// Whether an escape press currently reaches the stack.
    pub const fn is_listening_for_escape(&self) -> bool {
        self.escape_listener
    }

    /// Deliver an escape press.
    ///
    /// Only the topmost modal is considered, and it closes only if it allows
    /// escape dismissal. Returns true if a modal was closed.
    pub fn handle_escape(&mut self) -> bool {
        if !self.is_listening_for_escape() {
            return false;
        }
        let Some(top) = self.active.last() else {
            return false;
        };
        if !top.close_on_escape() {
            return false;
        }

        let id = top.id().clone();
        self.close(Some(&id));
        true
    }

    fn sync_listeners(&mut self) {
        let has_modals = !self.active.is_empty();
        if has_modals == self.escape_listener {
            return;
        }

        self.escape_listener = has_modals;
        self.scroll_lock.set(has_modals);
        if has_modals {
            debug!("Escape listener registered, background scroll locked");
        } else {
            debug!("Escape listener removed, background scroll released");
        }
    }
}

fn run_on_close(id: &ModalId, callback: Option<OnClose>) {
    let Some(callback) = callback else {
        return;
    };
    if panic::catch_unwind(AssertUnwindSafe(callback)).is_err() {
        error!(modal = %id, "Close callback panicked");
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashSet;

    use super::*;
    use crate::modal::testing::Lines;

    fn request() -> ModalRequest {
        ModalRequest::new(Lines { rows: 1 })
    }

    fn counting(counter: &Rc<Cell<u32>>) -> ModalRequest {
        let counter = Rc::clone(counter);
        request().on_close(move || counter.set(counter.get() + 1))
    }

    fn ids(store: &ModalStore) -> Vec<ModalId> {
        store.descriptors().iter().map(|m| m.id().clone()).collect()
    }

    #[test]
    fn test_open_appends_and_returns_unique_ids() {
        let mut store = ModalStore::new();
        let opened: Vec<ModalId> = (0..50).map(|_| store.open(request())).collect();

        let unique: HashSet<&ModalId> = opened.iter().collect();
        assert_eq!(unique.len(), 50);
        assert_eq!(ids(&store), opened);
        assert!(opened.iter().all(|id| store.is_open(id)));
    }

    #[test]
    fn test_open_applies_defaults() {
        let mut store = ModalStore::new();
        store.open(request());
        let modal = store.topmost().unwrap();
        assert_eq!(modal.size(), crate::modal::ModalSize::Medium);
        assert!(modal.close_on_overlay_click());
        assert!(modal.close_on_escape());
        assert!(modal.show_close_button());
    }

    #[test]
    fn test_length_tracks_opens_minus_closes() {
        let mut store = ModalStore::new();
        let a = store.open(request());
        let b = store.open(request());
        store.open(request());
        assert_eq!(store.len(), 3);

        store.close(Some(&a));
        assert_eq!(store.len(), 2);
        store.close(Some(&a));
        assert_eq!(store.len(), 2);
        store.close(Some(&b));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_close_by_id_keeps_others_in_order() {
        let mut store = ModalStore::new();
        let a = store.open(request());
        let b = store.open(request());
        let c = store.open(request());

        store.close(Some(&b));

        assert_eq!(ids(&store), vec![a, c]);
        assert!(!store.is_open(&b));
    }

    #[test]
    fn test_close_unknown_id_is_noop() {
        let counter = Rc::new(Cell::new(0));
        let mut store = ModalStore::new();
        store.open(counting(&counter));

        store.close(Some(&ModalId::from("not-a-modal")));
        store.close(Some(&ModalId::from("")));

        assert_eq!(store.len(), 1);
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn test_on_close_fires_once() {
        let counter = Rc::new(Cell::new(0));
        let mut store = ModalStore::new();
        let id = store.open(counting(&counter));

        store.close(Some(&id));
        store.close(Some(&id));
        store.close_all();

        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn test_close_without_id_closes_everything() {
        let counter = Rc::new(Cell::new(0));
        let mut store = ModalStore::new();
        for _ in 0..3 {
            store.open(counting(&counter));
        }
        store.open(request());

        store.close(None);

        assert!(store.is_empty());
        assert_eq!(counter.get(), 3);
        assert!(!store.is_scroll_locked());
    }

    #[test]
    fn test_close_all_runs_remaining_callbacks_after_panic() {
        let fired = Rc::new(RefCell::new(Vec::new()));
        let mut store = ModalStore::new();

        let first = Rc::clone(&fired);
        store.open(request().on_close(move || first.borrow_mut().push("first")));
        store.open(request().on_close(|| panic!("callback failure")));
        let last = Rc::clone(&fired);
        store.open(request().on_close(move || last.borrow_mut().push("last")));

        store.close_all();

        assert!(store.is_empty());
        assert_eq!(*fired.borrow(), vec!["first", "last"]);
    }

    #[test]
    fn test_callback_runs_before_removal() {
        let lock = ScrollLock::new();
        let observed = Rc::new(Cell::new(false));
        let mut store = ModalStore::with_scroll_lock(lock.clone());

        let seen = Rc::clone(&observed);
        let callback_lock = lock.clone();
        let id = store.open(request().on_close(move || seen.set(callback_lock.is_engaged())));
        store.close(Some(&id));

        assert!(observed.get());
        assert!(!lock.is_engaged());
        assert!(store.is_empty());
    }

    #[test]
    fn test_close_all_callbacks_see_engaged_lock() {
        let lock = ScrollLock::new();
        let observed = Rc::new(RefCell::new(Vec::new()));
        let mut store = ModalStore::with_scroll_lock(lock.clone());

        for _ in 0..2 {
            let seen = Rc::clone(&observed);
            let callback_lock = lock.clone();
            store.open(
                request().on_close(move || seen.borrow_mut().push(callback_lock.is_engaged())),
            );
        }
        store.close_all();

        assert_eq!(*observed.borrow(), vec![true, true]);
        assert!(!lock.is_engaged());
    }

    #[test]
    fn test_new_store_leaves_shared_lock_alone() {
        let lock = ScrollLock::new();
        let mut first = ModalStore::with_scroll_lock(lock.clone());
        first.open(request());
        assert!(lock.is_engaged());

        let second = ModalStore::with_scroll_lock(lock.clone());
        assert!(lock.is_engaged());
        assert!(second.is_empty());
    }

    #[test]
    fn test_escape_closes_only_topmost() {
        let mut store = ModalStore::new();
        let a = store.open(request());
        let b = store.open(request());

        assert!(store.handle_escape());
        assert!(store.is_open(&a));
        assert!(!store.is_open(&b));

        assert!(store.handle_escape());
        assert!(store.is_empty());
        assert!(!store.handle_escape());
    }

    #[test]
    fn test_escape_respects_topmost_flag() {
        let mut store = ModalStore::new();
        let a = store.open(request());
        let b = store.open(request().close_on_escape(false));

        assert!(!store.handle_escape());
        assert_eq!(ids(&store), vec![a, b]);
    }

    #[test]
    fn test_scroll_lock_follows_emptiness() {
        let lock = ScrollLock::new();
        let mut store = ModalStore::with_scroll_lock(lock.clone());
        assert!(!lock.is_engaged());
        assert!(!store.is_listening_for_escape());

        let a = store.open(request());
        assert!(lock.is_engaged());
        assert!(store.is_listening_for_escape());

        let b = store.open(request());
        store.close(Some(&a));
        assert!(lock.is_engaged());

        store.close(Some(&b));
        assert!(!lock.is_engaged());
        assert!(!store.is_listening_for_escape());
    }

    #[test]
    fn test_scenario_escape_then_close_all() {
        let mut store = ModalStore::new();
        let m1 = store.open(request().title("A").close_on_overlay_click(false));
        assert_eq!(ids(&store), vec![m1.clone()]);

        let m2 = store.open(request().title("B"));
        assert_eq!(ids(&store), vec![m1.clone(), m2.clone()]);
        assert!(store.is_scroll_locked());

        store.handle_escape();
        assert_eq!(ids(&store), vec![m1.clone()]);
        assert!(!store.is_open(&m2));

        store.close(None);
        assert!(store.is_empty());
        assert!(!store.is_scroll_locked());
    }
}
