//! One row of the task list.

use super::{ViewError, upgrade};
use crate::reducer::TaskStore;
use crate::templates::{TemplateId, attributes_of};
use crate::types::{TaskAction, TaskId};
use composable_ui_core::environment::Prompt;
use composable_ui_core::{Observer, SubscriptionId};
use composable_ui_runtime::{Document, ElementId, Event, EventListener};
use std::cell::Cell;
use std::rc::{Rc, Weak};

/// Control that opens the rename prompt
pub const EDIT_CONTROL: &str = ".edit";
/// Control that deletes the task
pub const DELETE_CONTROL: &str = ".delete";

const RENAME_MESSAGE: &str = "Rename task";

/// Renders one task as an `li` and turns clicks on its controls into commands.
///
/// The view refers to its task by id and reads it through the store; it
/// never owns the record. It is kept alive by the document (as the listener
/// of its element) and goes away when the task is destroyed and the element
/// removed, or when the document itself is dropped.
///
/// States: mounted, then unmounted once the task is destroyed. Unmounted is
/// terminal.
pub struct TaskView {
    id: TaskId,
    element: ElementId,
    store: Rc<TaskStore>,
    document: Weak<Document>,
    prompt: Rc<dyn Prompt>,
    subscription: Cell<Option<SubscriptionId>>,
    mounted: Cell<bool>,
}

impl std::fmt::Debug for TaskView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskView")
            .field("id", &self.id)
            .field("element", &self.element)
            .field("mounted", &self.mounted.get())
            .finish_non_exhaustive()
    }
}

impl TaskView {
    /// Create the view and its (still detached) element
    ///
    /// # Errors
    ///
    /// [`ViewError::Dom`] if the element cannot be set up.
    pub fn new(
        id: TaskId,
        store: Rc<TaskStore>,
        document: &Rc<Document>,
        prompt: Rc<dyn Prompt>,
    ) -> Result<Rc<Self>, ViewError> {
        let element = document.create_element("li");
        document.set_attribute(element, "class", "task")?;
        document.set_attribute(element, "data-id", id.to_string())?;

        let view = Rc::new(Self {
            id,
            element,
            store,
            document: Rc::downgrade(document),
            prompt,
            subscription: Cell::new(None),
            mounted: Cell::new(true),
        });

        let subscription = view.store.subscribe(&view);
        view.subscription.set(Some(subscription));
        document.listen(element, Rc::clone(&view) as Rc<dyn EventListener>)?;

        Ok(view)
    }

    /// Task this view renders
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// The `li` element
    #[must_use]
    pub const fn element(&self) -> ElementId {
        self.element
    }

    /// Whether the view is still mounted
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted.get()
    }

    /// Project the task's current attributes into the element
    ///
    /// Safe to call any number of times; returns the element for the parent
    /// to append.
    ///
    /// # Errors
    ///
    /// [`ViewError::Template`], [`ViewError::Dom`] or
    /// [`ViewError::DocumentGone`].
    pub fn render(&self) -> Result<ElementId, ViewError> {
        if !self.is_mounted() {
            return Ok(self.element);
        }
        let Some(task) = self.store.state(|s| s.get(&self.id).cloned()) else {
            return Ok(self.element);
        };

        let markup = TemplateId::TaskRow.render(&attributes_of(&task)?)?;
        upgrade(&self.document)?.set_inner_html(self.element, markup)?;
        tracing::trace!(id = %self.id, "Rendered task row");

        Ok(self.element)
    }

    /// Ask for a new title and request the rename
    ///
    /// A cancelled prompt attempts nothing. A blank answer is rejected by the
    /// reducer and the row keeps its title.
    ///
    /// # Errors
    ///
    /// [`ViewError::Store`] if the store refuses the command.
    pub fn request_edit(&self) -> Result<(), ViewError> {
        if !self.is_mounted() {
            return Ok(());
        }
        let current = self
            .store
            .state(|s| s.get(&self.id).map(|task| task.title.clone()))
            .unwrap_or_default();

        let Some(title) = self.prompt.prompt(RENAME_MESSAGE, &current) else {
            tracing::debug!(id = %self.id, "Rename cancelled");
            return Ok(());
        };

        self.store.send(TaskAction::EditTitle { id: self.id, title })?;
        Ok(())
    }

    /// Request the task be destroyed
    ///
    /// # Errors
    ///
    /// [`ViewError::Store`] if the store refuses the command.
    pub fn request_delete(&self) -> Result<(), ViewError> {
        if !self.is_mounted() {
            return Ok(());
        }
        self.store.send(TaskAction::DeleteTask { id: self.id })?;
        Ok(())
    }

    fn remove(&self) {
        if !self.mounted.replace(false) {
            return;
        }
        if let Some(subscription) = self.subscription.take() {
            self.store.unsubscribe(subscription);
        }
        // Drops the document's reference to this view as well
        let removed = upgrade(&self.document)
            .and_then(|document| document.remove(self.element).map_err(ViewError::from));
        if let Err(error) = removed {
            tracing::debug!(id = %self.id, %error, "Task row already gone");
        }
        tracing::debug!(id = %self.id, "Task row removed");
    }
}

impl Observer<TaskAction> for TaskView {
    fn notify(&self, event: &TaskAction) {
        match event {
            TaskAction::TaskChanged { id, .. } if *id == self.id => {
                if let Err(error) = self.render() {
                    tracing::error!(id = %self.id, %error, "Failed to re-render task row");
                }
            },
            TaskAction::TaskDestroyed { id } if *id == self.id => self.remove(),
            TaskAction::ValidationFailed { id: Some(id), error } if *id == self.id => {
                tracing::debug!(id = %self.id, %error, "Rename rejected, keeping title");
            },
            _ => {},
        }
    }
}

impl EventListener for TaskView {
    fn handle_event(&self, event: &Event, _current: ElementId) {
        let result = if event.is_click_on(EDIT_CONTROL) {
            self.request_edit()
        } else if event.is_click_on(DELETE_CONTROL) {
            self.request_delete()
        } else {
            Ok(())
        };

        if let Err(error) = result {
            tracing::error!(id = %self.id, %error, "Task row event failed");
        }
    }
}
