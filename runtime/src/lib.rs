//! # Composable UI Runtime
//!
//! Runtime implementation for the Composable UI architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and event publication, plus the in-memory [`dom::Document`] views render
//! into.
//!
//! ## Core Components
//!
//! - **Store**: Owns the model state, runs the reducer, publishes events to observers
//! - **Dispatch loop**: Runs every action to completion; actions sent while
//!   an action is in flight are queued and processed in order
//! - **Document**: Element tree with markup serialization and event bubbling
//!
//! ## Example
//!
//! ```ignore
//! use composable_ui_runtime::Store;
//!
//! let store = Rc::new(Store::new(TaskState::new(), TaskReducer::new(), env));
//! store.subscribe(&view);
//!
//! // Send an action
//! store.send(TaskAction::AddTask { title: "Water plants".into(), priority: None })?;
//!
//! // Read state
//! let count = store.state(|s| s.count());
//! ```
//!
//! ## Threading
//!
//! Everything here is single-threaded (`Rc`, `RefCell`). The host drives the
//! store from one event loop, the same way a browser page drives its scripts.

use composable_ui_core::{Observer, SubscriptionId, effect::Effect, reducer::Reducer};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

/// In-memory document tree and DOM-style events
pub mod dom;

pub use dom::{Document, DomError, ElementId, Event, EventKind, EventListener};
pub use error::StoreError;
pub use store::Store;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Too many actions were sent from observers while an action was in flight
        ///
        /// This almost always means two observers keep triggering each other.
        #[error("Dispatch queue overflow: more than {limit} actions queued during dispatch")]
        QueueOverflow {
            /// The configured queue limit
            limit: usize,
        },
    }
}

/// Configuration for a Store
///
/// # Example
///
/// ```ignore
/// let config = StoreConfig::default().with_max_queued_actions(16);
/// let store = Store::with_config(state, reducer, env, config);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Maximum number of actions that may wait in the dispatch queue
    pub max_queued_actions: usize,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub const fn new(max_queued_actions: usize) -> Self {
        Self { max_queued_actions }
    }

    /// Set the dispatch queue limit
    #[must_use]
    pub const fn with_max_queued_actions(mut self, limit: usize) -> Self {
        self.max_queued_actions = limit;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_queued_actions: 64,
        }
    }
}

/// Internal: RAII guard that ends a dispatch on drop
///
/// Clears the dispatching flag and discards whatever is still queued, so a
/// panic in an observer can't leave stale actions to run on the next send.
struct DispatchGuard<'a, A> {
    dispatching: &'a Cell<bool>,
    queue: &'a RefCell<VecDeque<A>>,
}

impl<'a, A> DispatchGuard<'a, A> {
    fn enter(dispatching: &'a Cell<bool>, queue: &'a RefCell<VecDeque<A>>) -> Self {
        dispatching.set(true);
        Self { dispatching, queue }
    }
}

impl<A> Drop for DispatchGuard<'_, A> {
    fn drop(&mut self) {
        if let Ok(mut queue) = self.queue.try_borrow_mut() {
            if !queue.is_empty() {
                tracing::warn!(
                    dropped = queue.len(),
                    "Discarding actions queued by an aborted dispatch"
                );
                queue.clear();
            }
        }
        self.dispatching.set(false);
    }
}

/// Store runtime for coordinating reducer execution and event publication.
pub mod store {
    use super::{
        Cell, DispatchGuard, Effect, Observer, Rc, Reducer, RefCell, StoreConfig, StoreError,
        SubscriptionId, VecDeque, Weak,
    };

    /// Subscribed observer, held weakly
    type Subscriber<A> = (SubscriptionId, Weak<dyn Observer<A>>);

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind a `RefCell`, borrowed only while the reducer runs)
    /// 2. Reducer (model logic)
    /// 3. Environment (injected dependencies)
    /// 4. Observers (usually views), notified of every published event
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: RefCell<S>,
        reducer: R,
        environment: E,
        config: StoreConfig,
        observers: RefCell<Vec<Subscriber<A>>>,
        next_subscription: Cell<u64>,
        queue: RefCell<VecDeque<A>>,
        dispatching: Cell<bool>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
        A: std::fmt::Debug + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Uses [`StoreConfig::default`].
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        #[must_use]
        pub fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: StoreConfig,
        ) -> Self {
            Self {
                state: RefCell::new(initial_state),
                reducer,
                environment,
                config,
                observers: RefCell::new(Vec::new()),
                next_subscription: Cell::new(0),
                queue: RefCell::new(VecDeque::new()),
                dispatching: Cell::new(false),
            }
        }

        /// The configuration this store was built with
        #[must_use]
        pub const fn config(&self) -> &StoreConfig {
            &self.config
        }

        /// The injected environment
        #[must_use]
        pub const fn environment(&self) -> &E {
            &self.environment
        }

        /// Send an action to the store
        ///
        /// Outside of a dispatch, the action is reduced immediately, its
        /// effects executed, and any actions observers sent in the meantime
        /// are drained in FIFO order before this returns.
        ///
        /// From inside an observer, the action is only queued: it runs after
        /// the action currently being processed has fully completed.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::QueueOverflow`] if the action had to be
        /// queued and the queue is already at `max_queued_actions`.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub fn send(&self, action: A) -> Result<(), StoreError> {
            if self.dispatching.get() {
                return self.enqueue(action);
            }

            let _guard = DispatchGuard::enter(&self.dispatching, &self.queue);
            let mut next = Some(action);
            while let Some(action) = next {
                self.process(action);
                next = self.queue.borrow_mut().pop_front();
            }
            tracing::debug!("Dispatch completed");

            Ok(())
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let titles = store.state(|s| s.titles());
        /// ```
        ///
        /// # Panics
        ///
        /// Panics if called from inside the reducer, which never happens
        /// through the public API since observers run after the reducer.
        pub fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            f(&self.state.borrow())
        }

        /// Subscribe an observer to published events
        ///
        /// The store only keeps a weak reference: the caller stays
        /// responsible for keeping the observer alive.
        pub fn subscribe<O>(&self, observer: &Rc<O>) -> SubscriptionId
        where
            O: Observer<A> + 'static,
        {
            let weak: Weak<dyn Observer<A>> = Rc::downgrade(observer) as Weak<dyn Observer<A>>;
            let id = SubscriptionId::new(self.next_subscription.get());
            self.next_subscription.set(id.get() + 1);
            self.observers.borrow_mut().push((id, weak));
            tracing::trace!(%id, "Observer subscribed");
            id
        }

        /// Remove a subscription
        ///
        /// Returns `false` if the subscription was unknown (or already pruned).
        pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
            let mut observers = self.observers.borrow_mut();
            let before = observers.len();
            observers.retain(|(sub, _)| *sub != id);
            let removed = observers.len() != before;
            if removed {
                tracing::trace!(%id, "Observer unsubscribed");
            }
            removed
        }

        /// Number of subscribed observers that are still alive
        #[must_use]
        pub fn observer_count(&self) -> usize {
            self.observers
                .borrow()
                .iter()
                .filter(|(_, observer)| observer.strong_count() > 0)
                .count()
        }

        fn enqueue(&self, action: A) -> Result<(), StoreError> {
            let mut queue = self.queue.borrow_mut();
            let limit = self.config.max_queued_actions;
            if queue.len() >= limit {
                metrics::counter!("store.queue.overflow").increment(1);
                tracing::warn!(limit, ?action, "Rejected action: dispatch queue full");
                return Err(StoreError::QueueOverflow { limit });
            }
            queue.push_back(action);
            tracing::trace!(queued = queue.len(), "Queued action sent during dispatch");
            Ok(())
        }

        fn process(&self, action: A) {
            tracing::debug!(?action, "Processing action");
            metrics::counter!("store.actions.total").increment(1);

            let effects = {
                let mut state = self.state.borrow_mut();

                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();

                self.reducer.reduce(&mut state, action, &self.environment)
            };

            tracing::trace!("Reducer completed, returned {} effects", effects.len());
            for effect in effects {
                self.execute_effect(effect);
            }
        }

        fn execute_effect(&self, effect: Effect<A>) {
            match effect {
                Effect::None => {},
                Effect::Publish(event) => self.publish(&event),
            }
        }

        fn publish(&self, event: &A) {
            // Snapshot so observers may subscribe or unsubscribe while being notified
            let observers: Vec<Rc<dyn Observer<A>>> = {
                let mut observers = self.observers.borrow_mut();
                observers.retain(|(_, observer)| observer.strong_count() > 0);
                observers
                    .iter()
                    .filter_map(|(_, observer)| observer.upgrade())
                    .collect()
            };

            metrics::counter!("store.events.published").increment(1);
            tracing::trace!(observers = observers.len(), ?event, "Publishing event");

            for observer in observers {
                observer.notify(event);
            }
        }
    }
}
