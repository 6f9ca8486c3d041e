//! # Composable UI Testing
//!
//! Testing utilities and helpers for the Composable UI architecture.
//!
//! This crate provides:
//! - Deterministic implementations of Environment traits
//! - An observer that records every published event
//! - A Given-When-Then harness for reducers
//!
//! ## Example
//!
//! ```ignore
//! use composable_ui_testing::{RecordingObserver, ScriptedPrompt};
//!
//! #[test]
//! fn rename_task() {
//!     let store = Rc::new(Store::new(fixture_state(), TaskReducer::new(), test_env()));
//!     let recorder = Rc::new(RecordingObserver::new());
//!     store.subscribe(&recorder);
//!
//!     let prompt = Rc::new(ScriptedPrompt::answering(["Renamed"]));
//!     // ... drive a view with `prompt` ...
//!
//!     assert_eq!(recorder.events().len(), 1);
//! }
//! ```

/// Ergonomic reducer tests
pub mod reducer_test;

pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations of Environment traits and observers
pub mod mocks {
    use composable_ui_core::Observer;
    use composable_ui_core::environment::{IdGenerator, Prompt};
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use uuid::Uuid;

    /// Identifier generator counting up from 1
    ///
    /// # Example
    ///
    /// ```
    /// use composable_ui_testing::mocks::SequentialIdGenerator;
    /// use composable_ui_core::environment::IdGenerator;
    /// use uuid::Uuid;
    ///
    /// let ids = SequentialIdGenerator::new();
    /// assert_eq!(ids.next_id(), Uuid::from_u128(1));
    /// assert_eq!(ids.next_id(), Uuid::from_u128(2));
    /// ```
    #[derive(Debug, Default)]
    pub struct SequentialIdGenerator {
        last: Cell<u128>,
    }

    impl SequentialIdGenerator {
        /// Create a generator whose first id is `Uuid::from_u128(1)`
        #[must_use]
        pub const fn new() -> Self {
            Self { last: Cell::new(0) }
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self) -> Uuid {
            let next = self.last.get() + 1;
            self.last.set(next);
            Uuid::from_u128(next)
        }
    }

    /// Prompt that replays canned answers and records what it was asked
    ///
    /// Once the answers run out every further prompt is cancelled.
    #[derive(Debug, Default)]
    pub struct ScriptedPrompt {
        answers: RefCell<VecDeque<Option<String>>>,
        asked: RefCell<Vec<(String, String)>>,
    }

    impl ScriptedPrompt {
        /// A prompt that always cancels
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// A prompt answering with `answers`, in order
        #[must_use]
        pub fn answering<I, S>(answers: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            let prompt = Self::new();
            for answer in answers {
                prompt.push_answer(answer);
            }
            prompt
        }

        /// Queue one more answer
        pub fn push_answer(&self, answer: impl Into<String>) {
            self.answers.borrow_mut().push_back(Some(answer.into()));
        }

        /// Queue a cancellation
        pub fn push_cancel(&self) {
            self.answers.borrow_mut().push_back(None);
        }

        /// `(message, default)` pairs of every prompt shown so far
        #[must_use]
        pub fn asked(&self) -> Vec<(String, String)> {
            self.asked.borrow().clone()
        }
    }

    impl Prompt for ScriptedPrompt {
        fn prompt(&self, message: &str, default: &str) -> Option<String> {
            self.asked
                .borrow_mut()
                .push((message.to_string(), default.to_string()));
            self.answers.borrow_mut().pop_front().flatten()
        }
    }

    /// Observer that keeps a copy of every event it is notified of
    #[derive(Debug)]
    pub struct RecordingObserver<A> {
        events: RefCell<Vec<A>>,
    }

    impl<A> RecordingObserver<A> {
        /// Create an empty recorder
        #[must_use]
        pub const fn new() -> Self {
            Self {
                events: RefCell::new(Vec::new()),
            }
        }

        /// Forget everything recorded so far
        pub fn clear(&self) {
            self.events.borrow_mut().clear();
        }
    }

    impl<A: Clone> RecordingObserver<A> {
        /// Everything recorded so far, oldest first
        #[must_use]
        pub fn events(&self) -> Vec<A> {
            self.events.borrow().clone()
        }
    }

    impl<A> Default for RecordingObserver<A> {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<A: Clone> Observer<A> for RecordingObserver<A> {
        fn notify(&self, event: &A) {
            self.events.borrow_mut().push(event.clone());
        }
    }
}

// Re-export commonly used items
pub use mocks::{RecordingObserver, ScriptedPrompt, SequentialIdGenerator};
