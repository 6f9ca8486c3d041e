//! Demo content: the three tasks the list starts with when
//! `TODO_SEED_DEMO` is enabled.

use crate::reducer::TaskStore;
use crate::types::{TaskAction, TaskAttributes};
use composable_ui_runtime::StoreError;

/// The demo tasks, in display order
#[must_use]
pub fn demo_tasks() -> Vec<TaskAttributes> {
    vec![
        TaskAttributes::new("Set up a local web server on the laptop").with_priority(4),
        TaskAttributes::new("Upload the finished site to the hosting").with_priority(3),
        TaskAttributes::new("Install plugins for Sublime Text").with_priority(5),
    ]
}

/// Add `tasks` to the store, in order
///
/// Seeds go through the same validation as any other addition.
///
/// # Errors
///
/// [`StoreError`] if the store refuses a command.
pub fn seed(store: &TaskStore, tasks: impl IntoIterator<Item = TaskAttributes>) -> Result<(), StoreError> {
    for attributes in tasks {
        store.send(TaskAction::AddTask {
            title: attributes.title,
            priority: attributes.priority,
        })?;
    }
    tracing::debug!(count = store.state(|s| s.count()), "Seeded task collection");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reducer::{TaskEnvironment, TaskReducer};
    use crate::types::TaskState;
    use composable_ui_runtime::Store;
    use composable_ui_testing::SequentialIdGenerator;
    use std::rc::Rc;

    #[test]
    fn demo_tasks_are_valid() {
        let tasks = demo_tasks();
        assert_eq!(tasks.len(), 3);
        assert!(tasks.iter().all(|task| task.validate().is_ok()));
    }

    #[test]
    fn seed_keeps_order_and_priorities() {
        let store = Store::new(
            TaskState::new(),
            TaskReducer::new(),
            TaskEnvironment::new(Rc::new(SequentialIdGenerator::new())),
        );
        seed(&store, demo_tasks()).unwrap();

        let priorities: Vec<Option<i64>> =
            store.state(|s| s.tasks.iter().map(|task| task.priority).collect());
        assert_eq!(priorities, vec![Some(4), Some(3), Some(5)]);
    }
}
