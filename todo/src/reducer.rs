//! Reducer logic for the task collection.
//!
//! Commands are validated, turned into events, and the events are applied to
//! state and published so the views can follow along.

use crate::types::{
    Task, TaskAction, TaskAttributes, TaskError, TaskId, TaskState, validate,
};
use composable_ui_core::environment::IdGenerator;
use composable_ui_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};
use composable_ui_runtime::Store;
use std::rc::Rc;

/// Store specialised for the task collection
pub type TaskStore = Store<TaskState, TaskAction, TaskEnvironment, TaskReducer>;

/// Environment dependencies for the task reducer
#[derive(Clone)]
pub struct TaskEnvironment {
    /// Source of ids for new tasks
    pub ids: Rc<dyn IdGenerator>,
}

impl TaskEnvironment {
    /// Creates a new `TaskEnvironment`
    #[must_use]
    pub fn new(ids: Rc<dyn IdGenerator>) -> Self {
        Self { ids }
    }
}

/// Reducer for the task collection
#[derive(Clone, Debug, Default)]
pub struct TaskReducer;

impl TaskReducer {
    /// Creates a new `TaskReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn rejected(
        state: &mut TaskState,
        id: Option<TaskId>,
        error: TaskError,
    ) -> SmallVec<[Effect<TaskAction>; 4]> {
        let event = TaskAction::ValidationFailed { id, error };
        Self::apply_event(state, &event);
        smallvec![Effect::Publish(event)]
    }

    fn accepted(state: &mut TaskState, event: TaskAction) -> SmallVec<[Effect<TaskAction>; 4]> {
        Self::apply_event(state, &event);
        smallvec![Effect::Publish(event)]
    }

    /// Applies an event to state
    fn apply_event(state: &mut TaskState, action: &TaskAction) {
        match action {
            TaskAction::TaskAdded { task } => {
                state.tasks.push(task.clone());
                state.last_error = None;
            },
            TaskAction::TaskChanged { id, title, .. } => {
                if let Some(task) = state.tasks.iter_mut().find(|task| task.id == *id) {
                    task.title.clone_from(title);
                }
                state.last_error = None;
            },
            TaskAction::TaskDestroyed { id } => {
                state.tasks.retain(|task| task.id != *id);
                state.last_error = None;
            },
            TaskAction::ValidationFailed { error, .. } => {
                state.last_error = Some(*error);
            },
            // Commands are not applied to state
            TaskAction::AddTask { .. }
            | TaskAction::EditTitle { .. }
            | TaskAction::DeleteTask { .. } => {},
        }
    }
}

impl Reducer for TaskReducer {
    type State = TaskState;
    type Action = TaskAction;
    type Environment = TaskEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            TaskAction::AddTask { title, priority } => {
                let attributes = TaskAttributes { title, priority };
                if let Err(error) = validate(&attributes) {
                    return Self::rejected(state, None, error);
                }

                let task = Task::new(TaskId::from_uuid(env.ids.next_id()), attributes);
                tracing::info!(id = %task.id, title = %task.title, "Task added");
                Self::accepted(state, TaskAction::TaskAdded { task })
            },

            TaskAction::EditTitle { id, title } => {
                let Some(task) = state.get(&id) else {
                    tracing::debug!(%id, "Ignoring rename of unknown task");
                    return SmallVec::new();
                };

                let candidate = TaskAttributes {
                    title,
                    priority: task.priority,
                };
                if let Err(error) = validate(&candidate) {
                    return Self::rejected(state, Some(id), error);
                }

                // Setting the same value is not a change
                if candidate.title == task.title {
                    return SmallVec::new();
                }

                let previous_title = task.title.clone();
                tracing::info!(%id, title = %candidate.title, "Task renamed");
                Self::accepted(
                    state,
                    TaskAction::TaskChanged {
                        id,
                        title: candidate.title,
                        previous_title,
                    },
                )
            },

            TaskAction::DeleteTask { id } => {
                if !state.contains(&id) {
                    tracing::debug!(%id, "Ignoring delete of unknown task");
                    return SmallVec::new();
                }

                tracing::info!(%id, "Task destroyed");
                Self::accepted(state, TaskAction::TaskDestroyed { id })
            },

            // ========== Events ==========
            TaskAction::TaskAdded { .. }
            | TaskAction::TaskChanged { .. }
            | TaskAction::TaskDestroyed { .. }
            | TaskAction::ValidationFailed { .. } => {
                // Replayed events update state but are not re-published
                Self::apply_event(state, &action);
                SmallVec::new()
            },
        }
    }
}
