//! Stacked modal overlays.
//!
//! The subsystem is split in three layers:
//! - [`ModalStore`] - owns the ordered list of open modals and their dismissal plumbing
//! - [`ModalAccessor`] - borrowed facade that fills in default configuration
//! - [`ModalRenderer`] - draws one overlay per open modal and hit-tests pointer input
//!
//! The last modal in the store is the topmost one. It is the only modal that
//! receives keys, escape dismissal and pointer events.

mod accessor;
mod descriptor;
mod renderer;
mod store;

pub use accessor::ModalAccessor;
pub use descriptor::{
    ModalAction, ModalContent, ModalDescriptor, ModalId, ModalRequest, ModalSize, OnClose,
};
pub use renderer::ModalRenderer;
pub use store::{ModalStore, ScrollLock};
