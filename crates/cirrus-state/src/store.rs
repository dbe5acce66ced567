#![forbid(unsafe_code)]

//! The store: single source of truth for application state.
//!
//! # Design
//!
//! `Store` owns the current [`State`]. `dispatch` applies the reducer,
//! replaces the state, then notifies every subscriber once with the new
//! state, in subscription order, synchronously — dispatch completes all
//! notifications before returning.
//!
//! Re-entrant dispatch (a subscriber dispatching from inside its callback)
//! is queued FIFO and processed after the current notification round, so
//! subscriber iteration is never corrupted and interleavings are defined.
//!
//! The store is an explicit, constructed object passed to components that
//! need it — never a process-wide singleton — and is `Rc`-based, so a
//! session is single-threaded by construction; hosts with multiple threads
//! serialize dispatch upstream.

use crate::action::Action;
use crate::observe::Subscription;
use crate::reducer::reduce;
use crate::state::State;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use tracing::debug;

type CallbackRc = Rc<dyn Fn(&State)>;
type CallbackWeak = Weak<dyn Fn(&State)>;

struct StoreInner {
    state: State,
    /// Subscribers in subscription order. Dead entries are pruned on notify.
    subscribers: Vec<CallbackWeak>,
    /// Pending actions, drained FIFO by the outermost dispatch.
    queue: VecDeque<Action>,
    dispatching: bool,
}

/// Cloneable handle to one shared store. Clones see the same state and
/// share subscribers.
pub struct Store {
    inner: Rc<RefCell<StoreInner>>,
}

impl Clone for Store {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Store")
            .field("subscriber_count", &inner.subscribers.len())
            .field("queued", &inner.queue.len())
            .finish_non_exhaustive()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(State::default())
    }
}

impl Store {
    /// Create a store owning `state`.
    #[must_use]
    pub fn new(state: State) -> Self {
        Self {
            inner: Rc::new(RefCell::new(StoreInner {
                state,
                subscribers: Vec::new(),
                queue: VecDeque::new(),
                dispatching: false,
            })),
        }
    }

    /// Clone of the current state.
    #[must_use]
    pub fn state(&self) -> State {
        self.inner.borrow().state.clone()
    }

    /// Read the current state by reference without cloning.
    pub fn with_state<R>(&self, f: impl FnOnce(&State) -> R) -> R {
        f(&self.inner.borrow().state)
    }

    /// Register a callback invoked with the new state after every dispatch.
    ///
    /// Returns a [`Subscription`] guard; dropping it unsubscribes.
    pub fn subscribe(&self, callback: impl Fn(&State) + 'static) -> Subscription {
        let strong: CallbackRc = Rc::new(callback);
        let weak = Rc::downgrade(&strong);
        self.inner.borrow_mut().subscribers.push(weak);
        Subscription::hold(Box::new(strong))
    }

    /// Number of registered subscribers (including dead ones not yet pruned).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Apply `action` and notify subscribers with the new state.
    ///
    /// Called re-entrantly, the action is queued and processed after the
    /// in-flight notification round completes.
    pub fn dispatch(&self, action: Action) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.queue.push_back(action);
            if inner.dispatching {
                return;
            }
            inner.dispatching = true;
        }

        loop {
            let pending = self.inner.borrow_mut().queue.pop_front();
            let Some(action) = pending else {
                break;
            };
            debug!(action = ?action, "dispatch");

            let next = self.with_state(|state| reduce(state, &action));
            let callbacks: Vec<CallbackRc> = {
                let mut inner = self.inner.borrow_mut();
                inner.state = next;
                inner.subscribers.retain(|w| w.strong_count() > 0);
                inner.subscribers.iter().filter_map(Weak::upgrade).collect()
            };

            // Snapshot so callbacks observe a consistent state even if a
            // queued action lands while they run.
            let snapshot = self.state();
            for callback in &callbacks {
                callback(&snapshot);
            }
        }

        self.inner.borrow_mut().dispatching = false;
    }
}
