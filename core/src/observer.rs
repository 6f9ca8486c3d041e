//! Observer abstraction for model → view notification.
//!
//! A store publishes every event produced by its reducer to the observers
//! subscribed to it. Observers are held weakly: subscribing never keeps a view
//! alive, and a view that has been dropped simply stops receiving events.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │    View     │──── send(Command) ────┐
//! └──────▲──────┘                       │
//!        │                              ▼
//!        │                     ┌─────────────────┐
//!        │                     │    Reducer      │
//!        │                     └────────┬────────┘
//!        │                              │ Effect::Publish(Event)
//!        │                              ▼
//!        │                     ┌─────────────────┐
//!        └──── notify(&Event) ─│  Store observers│
//!                              └─────────────────┘
//! ```
//!
//! # Key Principles
//!
//! - **Synchronous**: `notify` runs to completion before the next observer is called
//! - **Ordered**: observers are notified in subscription order
//! - **Filtering is the observer's job**: every observer sees every event
//!
//! # Example
//!
//! ```rust,ignore
//! use composable_ui_core::Observer;
//!
//! struct Logger;
//!
//! impl Observer<TaskAction> for Logger {
//!     fn notify(&self, event: &TaskAction) {
//!         tracing::info!(?event, "task event");
//!     }
//! }
//! ```

use std::fmt;

/// Receives events published by a store.
pub trait Observer<A> {
    /// Handle one published event.
    ///
    /// Called synchronously from inside the store's dispatch loop. The store's
    /// state is readable from here, and actions sent from here are queued and
    /// processed after the current one completes.
    fn notify(&self, event: &A);
}

/// Handle returned by a subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates a subscription id from its raw value
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}
