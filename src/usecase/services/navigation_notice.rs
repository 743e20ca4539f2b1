use std::cell::{OnceCell, RefCell};
use std::rc::Rc;

use tracing::debug;

use crate::domain::entities::notice::NavigationNotice;

/// The single slot a navigation transition carries its message in.
///
/// Clones share the slot. Taking the message leaves the slot empty, so a
/// re-render or back-navigation finds nothing to show.
#[derive(Clone, Default)]
pub struct NoticeChannel {
    slot: Rc<RefCell<Option<NavigationNotice>>>,
}

impl PartialEq for NoticeChannel {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.slot, &other.slot)
    }
}

impl NoticeChannel {
    pub fn push(&self, message: impl Into<String>) {
        let message = message.into();
        debug!(%message, "navigation notice attached");
        *self.slot.borrow_mut() = Some(NavigationNotice { message });
    }

    pub fn take(&self) -> Option<NavigationNotice> {
        self.slot.borrow_mut().take()
    }

    /// Leaving a screen without reading the message drops it.
    pub fn clear(&self) {
        self.slot.borrow_mut().take();
    }

    pub fn is_empty(&self) -> bool {
        self.slot.borrow().is_none()
    }
}

/// Per-mount latch: the first `fire` drains the channel, every later call is a no-op.
#[derive(Default)]
pub struct NoticeLatch {
    fired: OnceCell<()>,
}

impl NoticeLatch {
    pub fn fire(&self, channel: &NoticeChannel) -> Option<NavigationNotice> {
        let mut taken = None;
        self.fired.get_or_init(|| {
            taken = channel.take();
        });
        taken
    }

    pub fn has_fired(&self) -> bool {
        self.fired.get().is_some()
    }
}
