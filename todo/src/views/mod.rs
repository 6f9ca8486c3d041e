//! Views: the task row, the task list and the add-task form.
//!
//! Each view owns one element of the [`Document`](composable_ui_runtime::Document),
//! holds the shared store it was constructed with, and reacts to the events
//! the store publishes. Views never mutate the collection; they send
//! commands and wait for the resulting events.
//!
//! The document owns the listener views, so views only keep a weak handle
//! back to it. Dropping the last strong handle to the document releases
//! every row view along with it.

mod add_task;
pub mod task_view;
mod tasks_view;

pub use add_task::AddTaskView;
pub use task_view::{DELETE_CONTROL, EDIT_CONTROL, TaskView};
pub use tasks_view::TasksView;

use crate::templates::TemplateError;
use composable_ui_runtime::{Document, DomError, StoreError};
use std::rc::{Rc, Weak};
use thiserror::Error;

/// Errors raised while rendering or handling user input
#[derive(Error, Debug)]
pub enum ViewError {
    /// A document operation failed
    #[error(transparent)]
    Dom(#[from] DomError),

    /// A template could not be rendered
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// The store refused an action
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The document the view renders into has been dropped
    #[error("Document is gone")]
    DocumentGone,

    /// A row index past the end of the list
    #[error("No task row {index} (list has {len} rows)")]
    RowOutOfRange {
        /// Requested index (0-based)
        index: usize,
        /// Number of rows
        len: usize,
    },
}

fn upgrade(document: &Weak<Document>) -> Result<Rc<Document>, ViewError> {
    document.upgrade().ok_or(ViewError::DocumentGone)
}
