//! # Composable UI Core
//!
//! Core traits and types for the Composable UI architecture.
//!
//! This crate provides the fundamental abstractions for building small,
//! event-driven user interfaces with the Reducer pattern: views never mutate
//! models directly, they send actions to a store, and re-render when the store
//! publishes the events those actions produced.
//!
//! ## Core Concepts
//!
//! - **State**: The model (e.g. an ordered collection of records)
//! - **Action**: All possible inputs to a reducer (commands and events)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Observer**: Anything that reacts to published events (usually a view)
//! - **Environment**: Injected dependencies via traits
//!
//! ## Architecture Principles
//!
//! - Unidirectional Data Flow: view → action → reducer → event → view
//! - Composition over inheritance: records are plain data, views attach as observers
//! - Explicit dependencies: the store is handed to each view, never global
//!
//! ## Example
//!
//! ```ignore
//! use composable_ui_core::*;
//!
//! #[derive(Clone, Debug, Default)]
//! struct CounterState {
//!     count: i64,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum CounterAction {
//!     Increment,
//!     Incremented { count: i64 },
//! }
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         action: CounterAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         match action {
//!             CounterAction::Increment => {
//!                 state.count += 1;
//!                 smallvec![Effect::Publish(CounterAction::Incremented { count: state.count })]
//!             }
//!             CounterAction::Incremented { .. } => SmallVec::new(),
//!         }
//!     }
//! }
//! ```

// Re-export commonly used types
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

/// Observers of published events
pub mod observer;

pub use observer::{Observer, SubscriptionId};

/// Reducer module - The core trait for model logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They hold every rule about how the model may change (validation included)
/// and are deterministic and testable without any view attached.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for model logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The model state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed by the store
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects are values returned from reducers. The store executes them after
/// the reducer has released the state, so an observer reacting to an effect
/// can always read the state it describes.
pub mod effect {
    /// Effect type - describes a side effect to be executed by the store
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type carried by published events
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Publish an event to every observer of the store
        Publish(Action),
    }

    impl<Action> Effect<Action> {
        /// Returns the published event, if this effect publishes one
        #[must_use]
        pub const fn published(&self) -> Option<&Action> {
            match self {
                Self::Publish(action) => Some(action),
                Self::None => None,
            }
        }

        /// Returns `true` for [`Effect::None`]
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Self::None)
        }
    }
}

/// Environment module - Dependency injection traits
///
/// Everything a reducer or a view needs from the outside world is abstracted
/// behind a trait here, so tests can substitute deterministic versions.
pub mod environment {
    use uuid::Uuid;

    /// Asks the user for a line of text.
    ///
    /// This is the `window.prompt` of the host: a blocking question with a
    /// pre-filled default answer.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// struct AlwaysCancel;
    /// impl Prompt for AlwaysCancel {
    ///     fn prompt(&self, _message: &str, _default: &str) -> Option<String> {
    ///         None
    ///     }
    /// }
    /// ```
    pub trait Prompt {
        /// Show `message` with `default` pre-filled.
        ///
        /// Returns `None` when the user cancels.
        fn prompt(&self, message: &str, default: &str) -> Option<String>;
    }

    /// Generates identifiers for new records.
    pub trait IdGenerator {
        /// Produce the next identifier
        fn next_id(&self) -> Uuid;
    }

    /// Random v4 identifiers
    #[derive(Debug, Clone, Copy, Default)]
    pub struct RandomIdGenerator;

    impl IdGenerator for RandomIdGenerator {
        fn next_id(&self) -> Uuid {
            Uuid::new_v4()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::effect::Effect;
    use super::environment::{IdGenerator, RandomIdGenerator};

    #[test]
    fn effect_published() {
        let effect = Effect::Publish(7_u8);
        assert_eq!(effect.published(), Some(&7));
        assert!(!effect.is_none());

        let none = Effect::<u8>::None;
        assert_eq!(none.published(), None);
        assert!(none.is_none());
    }

    #[test]
    fn random_ids_differ() {
        let ids = RandomIdGenerator;
        assert_ne!(ids.next_id(), ids.next_id());
    }
}
