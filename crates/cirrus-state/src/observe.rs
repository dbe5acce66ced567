#![forbid(unsafe_code)]

//! Message publisher with synchronous, in-order delivery.
//!
//! # Design
//!
//! [`Observe<M>`] is the event-dispatch primitive shared by the store and the
//! views: interested parties register callbacks, and `notify` delivers a
//! message to every live subscriber synchronously, in registration order.
//! Cloning an `Observe` creates a new handle to the **same** subscriber list.
//!
//! Subscribers are stored as weak references. Dropping the [`Subscription`]
//! guard returned by `subscribe` unregisters the callback; dead entries are
//! pruned lazily on the next `notify`.
//!
//! # Failure Modes
//!
//! - **Subscriber panics** are not caught. `notify` never raises for
//!   anything it did not itself cause; callers own subscriber robustness.
//! - **Re-entrant subscribe** from inside a callback is supported (the
//!   subscriber list is not borrowed while callbacks run). The new
//!   subscriber does not see the in-flight message.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A subscriber callback stored as a strong `Rc` inside the guard, handed
/// to the publisher as `Weak`.
type CallbackRc<M> = Rc<dyn Fn(&M)>;
type CallbackWeak<M> = Weak<dyn Fn(&M)>;

struct ObserveInner<M> {
    /// Subscribers in registration order. Dead entries are pruned on notify.
    subscribers: Vec<CallbackWeak<M>>,
}

/// A shared publisher of typed messages.
pub struct Observe<M> {
    inner: Rc<RefCell<ObserveInner<M>>>,
}

// Manual Clone: shares the same Rc.
impl<M> Clone for Observe<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<M> std::fmt::Debug for Observe<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observe")
            .field("subscriber_count", &self.inner.borrow().subscribers.len())
            .finish()
    }
}

impl<M: 'static> Default for Observe<M> {
    fn default() -> Self {
        Self::new()
    }
}

// `M: 'static` because subscribe stores the callback behind `dyn Any`.
impl<M: 'static> Observe<M> {
    /// Create a publisher with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObserveInner {
                subscribers: Vec::new(),
            })),
        }
    }

    /// Register a callback invoked on every `notify`, in registration order.
    ///
    /// Returns a [`Subscription`] guard. Dropping the guard unregisters the
    /// callback (it will not be called after drop, though the dead entry may
    /// linger in the list until the next `notify` prunes it).
    pub fn subscribe(&self, callback: impl Fn(&M) + 'static) -> Subscription {
        let strong: CallbackRc<M> = Rc::new(callback);
        let weak = Rc::downgrade(&strong);
        self.inner.borrow_mut().subscribers.push(weak);
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Number of registered subscribers (including dead ones not yet pruned).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Deliver `message` to every live subscriber, synchronously, in
    /// registration order. Dead subscribers are pruned first.
    pub fn notify(&self, message: &M) {
        // Collect live callbacks first so the list is not borrowed while
        // callbacks run (callbacks may subscribe or notify re-entrantly).
        let callbacks: Vec<CallbackRc<M>> = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|w| w.strong_count() > 0);
            inner.subscribers.iter().filter_map(Weak::upgrade).collect()
        };
        for callback in &callbacks {
            callback(message);
        }
    }
}

/// RAII guard for a subscriber callback.
///
/// Dropping the `Subscription` drops the strong `Rc` holding the callback,
/// so the publisher's `Weak` entry fails to upgrade on the next notify.
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl Subscription {
    pub(crate) fn hold(guard: Box<dyn std::any::Any>) -> Self {
        Self { _guard: guard }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
