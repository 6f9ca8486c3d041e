//! Domain types for the to-do list.
//!
//! A task is a plain record (title and optional priority). The collection is
//! an ordered list of tasks; it never renders anything itself; views learn
//! about changes from the events the reducer publishes.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a task
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a `TaskId` from a UUID
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The only way a task can be invalid
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskError {
    /// Title is empty once surrounding whitespace is trimmed
    #[error("Task title must not be empty")]
    InvalidTitle,
}

/// Proposed attribute set of a task, the unit of validation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskAttributes {
    /// Title shown in the list
    pub title: String,
    /// Priority, unset for tasks added through the form
    #[serde(default)]
    pub priority: Option<i64>,
}

impl TaskAttributes {
    /// Attributes with a title and no priority
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            priority: None,
        }
    }

    /// Set the priority
    #[must_use]
    pub const fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    /// See [`validate`]
    ///
    /// # Errors
    ///
    /// [`TaskError::InvalidTitle`] for a blank title.
    pub fn validate(&self) -> Result<(), TaskError> {
        validate(self)
    }
}

/// Check a proposed attribute set
///
/// Fails iff the title is empty after trimming leading and trailing
/// whitespace. Pure: nothing is mutated either way.
///
/// # Errors
///
/// [`TaskError::InvalidTitle`] for a blank title.
pub fn validate(attributes: &TaskAttributes) -> Result<(), TaskError> {
    tracing::debug!(title = %attributes.title, "Validating task attributes");

    if attributes.title.trim().is_empty() {
        tracing::warn!(title = ?attributes.title, "Rejected task: title must not be empty");
        return Err(TaskError::InvalidTitle);
    }

    Ok(())
}

/// A single task
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,
    /// Title shown in the list
    pub title: String,
    /// Priority, if any
    pub priority: Option<i64>,
}

impl Task {
    /// Creates a task from already validated attributes
    #[must_use]
    pub fn new(id: TaskId, attributes: TaskAttributes) -> Self {
        Self {
            id,
            title: attributes.title,
            priority: attributes.priority,
        }
    }

    /// Current attribute set
    #[must_use]
    pub fn attributes(&self) -> TaskAttributes {
        TaskAttributes {
            title: self.title.clone(),
            priority: self.priority,
        }
    }
}

/// State of the task collection
///
/// Tasks keep insertion order; titles need not be unique.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskState {
    /// All tasks, oldest first
    pub tasks: Vec<Task>,
    /// Last validation error (if any)
    pub last_error: Option<TaskError>,
}

impl TaskState {
    /// Creates an empty collection
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tasks: Vec::new(),
            last_error: None,
        }
    }

    /// Number of tasks
    #[must_use]
    pub fn count(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the collection is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Task by id
    #[must_use]
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == *id)
    }

    /// Index of a task in insertion order
    #[must_use]
    pub fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == *id)
    }

    /// Whether a task exists
    #[must_use]
    pub fn contains(&self, id: &TaskId) -> bool {
        self.position(id).is_some()
    }

    /// Ids in order
    #[must_use]
    pub fn ids(&self) -> Vec<TaskId> {
        self.tasks.iter().map(|task| task.id).collect()
    }

    /// Titles in order
    #[must_use]
    pub fn titles(&self) -> Vec<String> {
        self.tasks.iter().map(|task| task.title.clone()).collect()
    }
}

/// Actions representing commands and events for tasks
///
/// Commands come from views and are validated by the reducer. Events
/// describe what changed; the store publishes them to the views.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskAction {
    // ========== Commands ==========
    /// Command: Append a new task
    AddTask {
        /// Title of the task
        title: String,
        /// Priority, if any
        priority: Option<i64>,
    },

    /// Command: Replace a task's title
    EditTitle {
        /// Task to rename
        id: TaskId,
        /// Proposed title
        title: String,
    },

    /// Command: Remove a task
    DeleteTask {
        /// Task to remove
        id: TaskId,
    },

    // ========== Events ==========
    /// Event: A task was appended
    TaskAdded {
        /// The new task
        task: Task,
    },

    /// Event: A task's title changed
    TaskChanged {
        /// Task that changed
        id: TaskId,
        /// New title
        title: String,
        /// Title before the change
        previous_title: String,
    },

    /// Event: A task was removed
    TaskDestroyed {
        /// Removed task
        id: TaskId,
    },

    /// Event: A command was rejected by validation
    ValidationFailed {
        /// Task the command targeted, `None` for additions
        id: Option<TaskId>,
        /// Why it was rejected
        error: TaskError,
    },
}

impl TaskAction {
    /// Whether this action is a command
    #[must_use]
    pub const fn is_command(&self) -> bool {
        matches!(
            self,
            Self::AddTask { .. } | Self::EditTitle { .. } | Self::DeleteTask { .. }
        )
    }

    /// Whether this action is an event
    #[must_use]
    pub const fn is_event(&self) -> bool {
        !self.is_command()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id(n: u128) -> TaskId {
        TaskId::from_uuid(Uuid::from_u128(n))
    }

    #[test]
    fn validate_rejects_blank_titles() {
        assert_eq!(validate(&TaskAttributes::new("")), Err(TaskError::InvalidTitle));
        assert_eq!(validate(&TaskAttributes::new("   \t\n")), Err(TaskError::InvalidTitle));
        assert_eq!(validate(&TaskAttributes::new(" Buy milk ")), Ok(()));
        assert_eq!(
            TaskAttributes::new("Buy milk").with_priority(2).validate(),
            Ok(())
        );
    }

    #[test]
    fn task_error_message() {
        assert_eq!(TaskError::InvalidTitle.to_string(), "Task title must not be empty");
    }

    #[test]
    fn task_keeps_attributes() {
        let task = Task::new(id(1), TaskAttributes::new("A").with_priority(4));
        assert_eq!(task.attributes(), TaskAttributes::new("A").with_priority(4));
        assert_eq!(task.id.as_uuid(), &Uuid::from_u128(1));
    }

    #[test]
    fn state_lookup_preserves_order() {
        let mut state = TaskState::new();
        assert!(state.is_empty());
        state.tasks.push(Task::new(id(1), TaskAttributes::new("A")));
        state.tasks.push(Task::new(id(2), TaskAttributes::new("B")));
        state.tasks.push(Task::new(id(3), TaskAttributes::new("A")));

        assert_eq!(state.count(), 3);
        assert_eq!(state.titles(), vec!["A", "B", "A"]);
        assert_eq!(state.ids(), vec![id(1), id(2), id(3)]);
        assert_eq!(state.position(&id(2)), Some(1));
        assert!(state.contains(&id(3)));
        assert!(state.get(&id(4)).is_none());
    }

    #[test]
    fn action_kinds() {
        assert!(TaskAction::DeleteTask { id: id(1) }.is_command());
        assert!(TaskAction::TaskDestroyed { id: id(1) }.is_event());
        assert!(
            TaskAction::ValidationFailed {
                id: None,
                error: TaskError::InvalidTitle
            }
            .is_event()
        );
    }

    #[test]
    fn attributes_deserialize_without_priority() {
        let attributes: TaskAttributes = serde_json::from_str(r#"{"title":"C"}"#).unwrap();
        assert_eq!(attributes, TaskAttributes::new("C"));
    }

    proptest! {
        #[test]
        fn validate_fails_iff_trimmed_title_is_empty(title in "\\PC{0,12}|[ \t\n\r]{0,6}") {
            let result = validate(&TaskAttributes::new(title.clone()));
            prop_assert_eq!(result.is_err(), title.trim().is_empty());
        }
    }
}
