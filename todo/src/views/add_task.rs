//! The add-task form.

use super::{ViewError, upgrade};
use crate::reducer::TaskStore;
use crate::templates::{Attributes, TemplateId};
use crate::types::TaskAction;
use composable_ui_runtime::{Document, ElementId, Event, EventKind, EventListener};
use std::rc::{Rc, Weak};

/// Selector of the title input inside the form
pub const TITLE_INPUT: &str = "input[type=text]";

/// Binds to the host's form element and turns submissions into `AddTask`.
///
/// The form handler only reads the input; the new row appears because the
/// list view observes the resulting `TaskAdded` event.
pub struct AddTaskView {
    element: ElementId,
    store: Rc<TaskStore>,
    document: Weak<Document>,
}

impl std::fmt::Debug for AddTaskView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddTaskView")
            .field("element", &self.element)
            .finish_non_exhaustive()
    }
}

impl AddTaskView {
    /// Attach to an existing form element
    ///
    /// # Errors
    ///
    /// [`ViewError::Dom`] if `form` does not exist.
    pub fn bind(
        form: ElementId,
        store: Rc<TaskStore>,
        document: &Rc<Document>,
    ) -> Result<Rc<Self>, ViewError> {
        let view = Rc::new(Self {
            element: form,
            store,
            document: Rc::downgrade(document),
        });
        document.listen(form, Rc::clone(&view) as Rc<dyn EventListener>)?;
        tracing::debug!(%form, "Add-task form bound");
        Ok(view)
    }

    /// The form element
    #[must_use]
    pub const fn element(&self) -> ElementId {
        self.element
    }

    /// Fill the form: template markup, a text input and a submit button
    ///
    /// # Errors
    ///
    /// [`ViewError::Template`], [`ViewError::Dom`] or
    /// [`ViewError::DocumentGone`].
    pub fn render(&self) -> Result<ElementId, ViewError> {
        let document = upgrade(&self.document)?;
        let markup = TemplateId::AddTaskForm.render(&Attributes::new())?;
        document.set_inner_html(self.element, markup)?;

        let input = document.create_element("input");
        document.set_attribute(input, "type", "text")?;
        document.set_attribute(input, "name", "title")?;
        document.append_child(self.element, input)?;

        let button = document.create_element("button");
        document.set_attribute(button, "type", "submit")?;
        document.set_inner_html(button, "Add")?;
        document.append_child(self.element, button)?;

        Ok(self.element)
    }

    /// The title input
    ///
    /// # Errors
    ///
    /// [`ViewError::Dom`] if the form has not been rendered.
    pub fn input(&self) -> Result<ElementId, ViewError> {
        Ok(upgrade(&self.document)?.query_within(self.element, TITLE_INPUT)?)
    }

    /// Handle a submission: suppress navigation, read the input, request the addition
    ///
    /// # Errors
    ///
    /// [`ViewError::Dom`] if the input is missing, [`ViewError::Store`] if the
    /// store refuses the command.
    pub fn submit(&self, event: &Event) -> Result<(), ViewError> {
        event.prevent_default();

        let title = upgrade(&self.document)?.value(self.input()?)?;
        tracing::info!(%title, "Add-task form submitted");

        self.store.send(TaskAction::AddTask {
            title,
            priority: None,
        })?;

        tracing::debug!(tasks = ?self.store.state(|s| s.titles()), "Collection after submit");
        Ok(())
    }
}

impl EventListener for AddTaskView {
    fn handle_event(&self, event: &Event, _current: ElementId) {
        if matches!(event.kind(), EventKind::Submit) {
            if let Err(error) = self.submit(event) {
                tracing::error!(%error, "Add-task submission failed");
            }
        }
    }
}
