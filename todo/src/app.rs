//! Application wiring: puts the list and the form into a host document.

use crate::config::TodoConfig;
use crate::reducer::TaskStore;
use crate::views::{AddTaskView, TasksView, ViewError};
use composable_ui_core::environment::Prompt;
use composable_ui_runtime::{Document, DomError, ElementId, Event};
use std::rc::Rc;

/// The mounted to-do application.
///
/// Holds the two top-level views. Row views are owned by the document and
/// need no handle here.
pub struct TodoApp {
    store: Rc<TaskStore>,
    document: Rc<Document>,
    tasks: Rc<TasksView>,
    form: Rc<AddTaskView>,
}

impl std::fmt::Debug for TodoApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoApp")
            .field("tasks", &self.tasks)
            .field("form", &self.form)
            .finish_non_exhaustive()
    }
}

impl TodoApp {
    /// Build a host page containing the containers `config` names
    ///
    /// Produces `<body><div …list…></div><form …form…></form></body>`.
    ///
    /// # Errors
    ///
    /// [`ViewError::Dom`] if a selector is not `#id` or `.class`.
    pub fn host_document(config: &TodoConfig) -> Result<Rc<Document>, ViewError> {
        let document = Document::new();

        let list = document.create_element("div");
        set_selector(&document, list, &config.list_selector)?;
        document.append_child(document.body(), list)?;

        let form = document.create_element("form");
        set_selector(&document, form, &config.form_selector)?;
        document.append_child(document.body(), form)?;

        Ok(document)
    }

    /// Render the list into its container and bind the form
    ///
    /// # Errors
    ///
    /// [`ViewError::Dom`] if either container is missing, or any error raised
    /// while rendering.
    pub fn mount(
        document: Rc<Document>,
        store: Rc<TaskStore>,
        prompt: Rc<dyn Prompt>,
        config: &TodoConfig,
    ) -> Result<Self, ViewError> {
        let list_container = document.query(&config.list_selector)?;
        let form_element = document.query(&config.form_selector)?;

        let tasks = TasksView::new(Rc::clone(&store), &document, prompt)?;
        let list = tasks.render()?;
        document.mount(list_container, list)?;

        let form = AddTaskView::bind(form_element, Rc::clone(&store), &document)?;
        form.render()?;

        tracing::info!(
            list = %config.list_selector,
            form = %config.form_selector,
            tasks = store.state(|s| s.count()),
            "To-do application mounted"
        );

        Ok(Self {
            store,
            document,
            tasks,
            form,
        })
    }

    /// The task store
    #[must_use]
    pub const fn store(&self) -> &Rc<TaskStore> {
        &self.store
    }

    /// The host document
    #[must_use]
    pub const fn document(&self) -> &Rc<Document> {
        &self.document
    }

    /// The list view
    #[must_use]
    pub const fn tasks_view(&self) -> &Rc<TasksView> {
        &self.tasks
    }

    /// Rendered rows, in list order
    ///
    /// # Errors
    ///
    /// [`ViewError::Dom`] if the list element is gone.
    pub fn rows(&self) -> Result<Vec<ElementId>, ViewError> {
        self.tasks.rows()
    }

    /// Type `title` into the form and submit it
    ///
    /// # Errors
    ///
    /// [`ViewError::Dom`] if the form is not rendered or not attached.
    pub fn submit_task(&self, title: &str) -> Result<(), ViewError> {
        self.document.set_value(self.form.input()?, title)?;
        self.document.dispatch(self.form.element(), &Event::submit())?;
        Ok(())
    }

    /// Click `control` (e.g. `.edit`) on the row at `index`
    ///
    /// # Errors
    ///
    /// [`ViewError::RowOutOfRange`] if there is no such row.
    pub fn click_task(&self, index: usize, control: &str) -> Result<(), ViewError> {
        let rows = self.rows()?;
        let row = *rows.get(index).ok_or(ViewError::RowOutOfRange {
            index,
            len: rows.len(),
        })?;
        self.document.dispatch(row, &Event::click(control))?;
        Ok(())
    }

    /// Markup of the list
    ///
    /// # Errors
    ///
    /// [`ViewError::Dom`] if the list element is gone.
    pub fn markup(&self) -> Result<String, ViewError> {
        Ok(self.document.outer_html(self.tasks.element())?)
    }

    /// JSON dump of the collection, for debugging
    ///
    /// # Errors
    ///
    /// If the state cannot be serialized.
    pub fn snapshot(&self) -> Result<String, serde_json::Error> {
        self.store.state(serde_json::to_string_pretty)
    }
}

fn set_selector(document: &Document, element: ElementId, selector: &str) -> Result<(), DomError> {
    if let Some(id) = selector.strip_prefix('#') {
        document.set_attribute(element, "id", id)
    } else if let Some(class) = selector.strip_prefix('.') {
        document.set_attribute(element, "class", class)
    } else {
        Err(DomError::InvalidSelector(selector.to_string()))
    }
}
