//! Action-driven store owning both state containers.
//!
//! The store is constructed explicitly by the application root and passed
//! to whatever needs to dispatch. Subscribers are attached while building the
//! store and run after every dispatched action.

use std::fmt;
use std::mem;

use crate::state::{self, Action, RootState};

/// Receives the new state after every dispatched action.
pub trait Subscriber {
    fn on_change(&mut self, state: &RootState);
}

impl<F> Subscriber for F
where
    F: FnMut(&RootState),
{
    fn on_change(&mut self, state: &RootState) {
        self(state);
    }
}

/// Anything actions can be dispatched into.
///
/// The async dispatchers in [`crate::actions`] are written against this trait
/// so they can run against the real [`Store`] or a recording double.
pub trait Dispatch {
    fn dispatch(&mut self, action: Action);
}

/// Single-threaded state container
#[derive(Default)]
pub struct Store {
    state: RootState,
    subscribers: Vec<Box<dyn Subscriber>>,
}

impl Store {
    #[must_use]
    pub fn new(initial: RootState) -> Self {
        Self {
            state: initial,
            subscribers: Vec::new(),
        }
    }

    /// Attach a subscriber; intended to be chained right after [`Store::new`].
    #[must_use]
    pub fn subscribe(mut self, subscriber: impl Subscriber + 'static) -> Self {
        self.subscribers.push(Box::new(subscriber));
        self
    }

    pub const fn state(&self) -> &RootState {
        &self.state
    }
}

impl Dispatch for Store {
    fn dispatch(&mut self, action: Action) {
        tracing::trace!(?action, "dispatch");
        let current = mem::take(&mut self.state);
        self.state = state::reduce(current, &action);

        for subscriber in &mut self.subscribers {
            subscriber.on_change(&self.state);
        }
    }
}

impl Dispatch for Vec<Action> {
    fn dispatch(&mut self, action: Action) {
        self.push(action);
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Store")
            .field("state", &self.state)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
