use super::descriptor::{ModalId, ModalRequest};
use super::store::ModalStore;

/// Facade that completes every request before it reaches the store.
///
/// Holds no state of its own: callers get the same store state whether they
/// go through the accessor or talk to [`ModalStore`] directly.
pub struct ModalAccessor<'a> {
    store: &'a mut ModalStore,
}

impl<'a> ModalAccessor<'a> {
    pub const fn new(store: &'a mut ModalStore) -> Self {
        Self { store }
    }

    /// Open a modal with medium size and every dismissal path enabled, unless
    /// the request says otherwise.
    pub fn open(&mut self, request: ModalRequest) -> ModalId {
        self.store.open(request.with_defaults())
    }

    pub fn close(&mut self, id: Option<&ModalId>) {
        self.store.close(id);
    }

    pub fn close_all(&mut self) {
        self.store.close_all();
    }

    pub fn is_open(&self, id: &ModalId) -> bool {
        self.store.is_open(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modal::ModalSize;
    use crate::modal::testing::Lines;

    #[test]
    fn test_open_fills_defaults() {
        let mut store = ModalStore::new();
        let id = store.modals().open(ModalRequest::new(Lines { rows: 2 }));

        assert!(store.modals().is_open(&id));
        let modal = store.topmost().unwrap();
        assert_eq!(modal.size(), ModalSize::Medium);
        assert!(modal.close_on_overlay_click());
        assert!(modal.close_on_escape());
        assert!(modal.show_close_button());
    }

    #[test]
    fn test_open_keeps_caller_fields() {
        let mut store = ModalStore::new();
        store.modals().open(
            ModalRequest::new(Lines { rows: 2 })
                .size(ModalSize::Small)
                .close_on_overlay_click(false)
                .close_on_escape(false)
                .show_close_button(false),
        );

        let modal = store.topmost().unwrap();
        assert_eq!(modal.size(), ModalSize::Small);
        assert!(!modal.close_on_overlay_click());
        assert!(!modal.close_on_escape());
        assert!(!modal.show_close_button());
    }

    #[test]
    fn test_accessor_and_store_share_state() {
        let mut store = ModalStore::new();
        let first = store.open(ModalRequest::new(Lines { rows: 1 }));
        let second = store.modals().open(ModalRequest::new(Lines { rows: 1 }));
        assert_eq!(store.len(), 2);

        store.modals().close(Some(&first));
        assert!(!store.is_open(&first));
        assert!(store.is_open(&second));

        store.modals().close_all();
        assert!(store.is_empty());
        assert!(!store.is_scroll_locked());
    }
}
