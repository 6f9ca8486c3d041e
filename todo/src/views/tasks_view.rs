//! The task list.

use super::{TaskView, ViewError, upgrade};
use crate::reducer::TaskStore;
use crate::types::{TaskAction, TaskId};
use composable_ui_core::Observer;
use composable_ui_core::environment::Prompt;
use composable_ui_runtime::{Document, ElementId};
use std::cell::Cell;
use std::rc::{Rc, Weak};

/// Renders the whole collection as a `ul`, one [`TaskView`] per task.
///
/// The list only ever appends: a new task adds one row at the end, and a
/// destroyed task's row removes itself without the list being involved.
pub struct TasksView {
    element: ElementId,
    store: Rc<TaskStore>,
    document: Weak<Document>,
    prompt: Rc<dyn Prompt>,
    rendered: Cell<bool>,
}

impl std::fmt::Debug for TasksView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TasksView")
            .field("element", &self.element)
            .field("rendered", &self.rendered.get())
            .finish_non_exhaustive()
    }
}

impl TasksView {
    /// Create the view, its `ul` element, and subscribe to additions
    ///
    /// # Errors
    ///
    /// [`ViewError::Dom`] if the element cannot be set up.
    pub fn new(
        store: Rc<TaskStore>,
        document: &Rc<Document>,
        prompt: Rc<dyn Prompt>,
    ) -> Result<Rc<Self>, ViewError> {
        let element = document.create_element("ul");
        document.set_attribute(element, "class", "task-list")?;

        let view = Rc::new(Self {
            element,
            store,
            document: Rc::downgrade(document),
            prompt,
            rendered: Cell::new(false),
        });
        view.store.subscribe(&view);

        Ok(view)
    }

    /// The `ul` element
    #[must_use]
    pub const fn element(&self) -> ElementId {
        self.element
    }

    /// Append one row per task currently in the collection, in order
    ///
    /// Meant to be called once per list: later tasks arrive through
    /// [`TaskAction::TaskAdded`], and calling this again appends every
    /// row a second time.
    ///
    /// # Errors
    ///
    /// Any [`ViewError`] raised while rendering a row.
    pub fn render(&self) -> Result<ElementId, ViewError> {
        if self.rendered.replace(true) {
            tracing::warn!("Task list rendered twice; rows will be duplicated");
        }

        for id in self.store.state(|s| s.ids()) {
            self.add_one(id)?;
        }

        Ok(self.element)
    }

    /// Rows currently in the list
    ///
    /// # Errors
    ///
    /// [`ViewError::Dom`] if the list element is gone.
    pub fn rows(&self) -> Result<Vec<ElementId>, ViewError> {
        Ok(upgrade(&self.document)?.children(self.element)?)
    }

    fn add_one(&self, id: TaskId) -> Result<(), ViewError> {
        let document = upgrade(&self.document)?;
        let view = TaskView::new(
            id,
            Rc::clone(&self.store),
            &document,
            Rc::clone(&self.prompt),
        )?;
        let row = view.render()?;
        document.append_child(self.element, row)?;
        tracing::debug!(%id, "Appended task row");
        Ok(())
    }
}

impl Observer<TaskAction> for TasksView {
    fn notify(&self, event: &TaskAction) {
        if let TaskAction::TaskAdded { task } = event {
            if let Err(error) = self.add_one(task.id) {
                tracing::error!(id = %task.id, %error, "Failed to append task row");
            }
        }
    }
}
