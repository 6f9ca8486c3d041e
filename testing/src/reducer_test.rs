//! Given-When-Then harness for reducers
//!
//! Reducers are plain functions over state, so they are tested without a
//! store: set up state, reduce one action, check the state and the effects.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use composable_ui_core::{effect::Effect, reducer::Reducer};
use std::fmt::Debug;

/// One deferred check, run in the order it was added
enum Check<S, A> {
    State(Box<dyn FnOnce(&S)>),
    Effects(Box<dyn FnOnce(&[Effect<A>])>),
}

/// What a [`ReducerTest`] run produced, for checks that don't fit the builder
#[derive(Debug)]
pub struct Outcome<S, A> {
    /// State after the action under test
    pub state: S,
    /// Effects returned for the action under test
    pub effects: Vec<Effect<A>>,
}

impl<S, A> Outcome<S, A> {
    /// Events the effects publish, in order
    #[must_use]
    pub fn published(&self) -> Vec<&A> {
        self.effects.iter().filter_map(Effect::published).collect()
    }
}

/// Builder for a single reducer test
///
/// Actions passed to [`ReducerTest::given_actions`] are reduced before the
/// action under test and their effects dropped; checks only ever see the
/// effects of the `when` action.
///
/// # Example
///
/// ```ignore
/// use composable_ui_testing::ReducerTest;
///
/// ReducerTest::new(TaskReducer::new())
///     .with_env(test_env())
///     .given_state(TaskState::new())
///     .when_action(TaskAction::AddTask { title: "A".into(), priority: Some(4) })
///     .then_state(|state| assert_eq!(state.count(), 1))
///     .then_published(|events| assert_eq!(events.len(), 1))
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    env: Option<E>,
    state: Option<S>,
    history: Vec<A>,
    action: Option<A>,
    checks: Vec<Check<S, A>>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Start a test of `reducer`
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            env: None,
            state: None,
            history: Vec::new(),
            action: None,
            checks: Vec::new(),
        }
    }

    /// Environment handed to the reducer
    #[must_use]
    pub fn with_env(mut self, env: E) -> Self {
        self.env = Some(env);
        self
    }

    /// Starting state
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.state = Some(state);
        self
    }

    /// Actions that happened before the one under test
    #[must_use]
    pub fn given_actions(mut self, actions: impl IntoIterator<Item = A>) -> Self {
        self.history.extend(actions);
        self
    }

    /// The action under test
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.action = Some(action);
        self
    }

    /// Check the resulting state
    #[must_use]
    pub fn then_state<F>(mut self, check: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.checks.push(Check::State(Box::new(check)));
        self
    }

    /// Check the returned effects
    #[must_use]
    pub fn then_effects<F>(mut self, check: F) -> Self
    where
        F: FnOnce(&[Effect<A>]) + 'static,
    {
        self.checks.push(Check::Effects(Box::new(check)));
        self
    }

    /// Check only the events the effects publish
    #[must_use]
    pub fn then_published<F>(self, check: F) -> Self
    where
        F: FnOnce(&[&A]) + 'static,
        A: 'static,
    {
        self.then_effects(move |effects| {
            let published: Vec<&A> = effects.iter().filter_map(Effect::published).collect();
            check(&published);
        })
    }

    /// Expect exactly `expected` to be published, in order
    #[must_use]
    pub fn then_publishes(self, expected: Vec<A>) -> Self
    where
        A: PartialEq + Debug + 'static,
    {
        self.then_published(move |events| {
            let expected: Vec<&A> = expected.iter().collect();
            assert_eq!(events, expected.as_slice(), "Published events differ");
        })
    }

    /// Reduce and run every check in order
    ///
    /// # Panics
    ///
    /// Panics if the state, action or environment was never given, or if a
    /// check fails.
    #[allow(clippy::panic)] // Test harness
    pub fn run(self) -> Outcome<S, A> {
        let Some(mut state) = self.state else {
            panic!("ReducerTest needs a starting state: call given_state()");
        };
        let Some(action) = self.action else {
            panic!("ReducerTest needs an action: call when_action()");
        };
        let Some(env) = self.env else {
            panic!("ReducerTest needs an environment: call with_env()");
        };

        for earlier in self.history {
            drop(self.reducer.reduce(&mut state, earlier, &env));
        }
        let effects = self.reducer.reduce(&mut state, action, &env).into_vec();

        for check in self.checks {
            match check {
                Check::State(check) => check(&state),
                Check::Effects(check) => check(&effects),
            }
        }

        Outcome { state, effects }
    }
}

/// Free-standing effect checks, usable inside `then_effects`
pub mod assertions {
    use composable_ui_core::effect::Effect;
    use std::fmt::Debug;

    /// Nothing observable happens: every effect is [`Effect::None`]
    ///
    /// # Panics
    ///
    /// Panics if any effect publishes.
    pub fn assert_no_effects<A: Debug>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().all(Effect::is_none),
            "Expected no effects, got {effects:?}"
        );
    }

    /// Exactly `expected` effects were returned
    ///
    /// # Panics
    ///
    /// Panics on a different count.
    pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(effects.len(), expected, "Unexpected number of effects");
    }

    /// Exactly one event is published and `predicate` accepts it
    ///
    /// # Panics
    ///
    /// Panics if zero or several events are published, or the predicate fails.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_publishes_one<A, F>(effects: &[Effect<A>], predicate: F)
    where
        A: Debug,
        F: FnOnce(&A) -> bool,
    {
        let published: Vec<&A> = effects.iter().filter_map(Effect::published).collect();
        match published.as_slice() {
            [event] => assert!(predicate(*event), "Unexpected event published: {event:?}"),
            other => panic!("Expected exactly one published event, found {other:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::{SmallVec, smallvec};

    /// Names on a guest list; duplicates are refused
    #[derive(Clone, Debug, Default)]
    struct GuestList {
        names: Vec<String>,
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum GuestAction {
        Invite(String),
        Invited(String),
        Refused(String),
    }

    struct GuestReducer;

    impl Reducer for GuestReducer {
        type State = GuestList;
        type Action = GuestAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut GuestList,
            action: GuestAction,
            _env: &(),
        ) -> SmallVec<[Effect<GuestAction>; 4]> {
            match action {
                GuestAction::Invite(name) if state.names.contains(&name) => {
                    smallvec![Effect::Publish(GuestAction::Refused(name))]
                },
                GuestAction::Invite(name) => {
                    state.names.push(name.clone());
                    smallvec![Effect::Publish(GuestAction::Invited(name))]
                },
                GuestAction::Invited(_) | GuestAction::Refused(_) => smallvec![Effect::None],
            }
        }
    }

    fn invite(name: &str) -> GuestAction {
        GuestAction::Invite(name.to_string())
    }

    #[test]
    fn checks_state_and_published_events() {
        ReducerTest::new(GuestReducer)
            .with_env(())
            .given_state(GuestList::default())
            .when_action(invite("ada"))
            .then_state(|state| assert_eq!(state.names, vec!["ada"]))
            .then_effects(|effects| {
                assertions::assert_publishes_one(effects, |e| {
                    *e == GuestAction::Invited("ada".to_string())
                });
            })
            .run();
    }

    #[test]
    fn history_is_reduced_first_and_its_effects_dropped() {
        let outcome = ReducerTest::new(GuestReducer)
            .with_env(())
            .given_state(GuestList::default())
            .given_actions([invite("ada"), invite("grace")])
            .when_action(invite("ada"))
            .then_publishes(vec![GuestAction::Refused("ada".to_string())])
            .run();

        assert_eq!(outcome.state.names, vec!["ada", "grace"]);
        assert_eq!(outcome.effects.len(), 1);
        assert_eq!(outcome.published().len(), 1);
    }

    #[test]
    fn effect_assertions() {
        assertions::assert_no_effects::<GuestAction>(&[Effect::None]);
        assertions::assert_no_effects::<GuestAction>(&[]);
        assertions::assert_effects_count(&[Effect::<GuestAction>::None], 1);
    }

    #[test]
    #[should_panic(expected = "call when_action()")]
    fn missing_action_panics() {
        let _ = ReducerTest::new(GuestReducer)
            .with_env(())
            .given_state(GuestList::default())
            .run();
    }
}
