//! Markup templates.
//!
//! Templates are addressed by [`TemplateId`] rather than by a string looked
//! up in the page, so a missing template is a compile error. A template is
//! interpolated against a flat attribute map: every `{{name}}` placeholder
//! is replaced by the HTML-escaped value of attribute `name`.

use composable_ui_runtime::dom::escape;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Flat attribute mapping handed to a template
pub type Attributes = BTreeMap<String, String>;

/// Errors raised while building attributes or interpolating a template
#[derive(Error, Debug)]
pub enum TemplateError {
    /// The record could not be serialized
    #[error("Failed to serialize attributes: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The record did not serialize to a map
    #[error("Attributes must serialize to an object")]
    NotAnObject,

    /// An attribute is a list or an object
    #[error("Attribute '{name}' is not a scalar")]
    NotFlat {
        /// The offending attribute
        name: String,
    },

    /// A placeholder names an attribute that was not supplied
    #[error("Template '{template}' references missing attribute '{name}'")]
    MissingAttribute {
        /// Template being rendered
        template: &'static str,
        /// Missing attribute
        name: String,
    },

    /// A `{{` without its closing `}}`
    #[error("Template '{template}' has an unterminated placeholder")]
    Unterminated {
        /// Template being rendered
        template: &'static str,
    },
}

/// Build the flat attribute map of a record
///
/// Strings are taken as-is, numbers and booleans are formatted, `null`
/// becomes the empty string.
///
/// # Errors
///
/// [`TemplateError::NotAnObject`] or [`TemplateError::NotFlat`] when the
/// record does not serialize to a flat object.
pub fn attributes_of<T: Serialize>(record: &T) -> Result<Attributes, TemplateError> {
    let serde_json::Value::Object(map) = serde_json::to_value(record)? else {
        return Err(TemplateError::NotAnObject);
    };

    map.into_iter()
        .map(|(name, value)| {
            let value = match value {
                serde_json::Value::Null => String::new(),
                serde_json::Value::String(s) => s,
                serde_json::Value::Bool(b) => b.to_string(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                    return Err(TemplateError::NotFlat { name });
                },
            };
            Ok((name, value))
        })
        .collect()
}

/// A named template source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    name: &'static str,
    source: &'static str,
}

impl Template {
    /// Creates a template from its source
    #[must_use]
    pub const fn new(name: &'static str, source: &'static str) -> Self {
        Self { name, source }
    }

    /// Template name, for diagnostics
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Interpolate `attributes` into the template
    ///
    /// # Errors
    ///
    /// [`TemplateError::MissingAttribute`] or [`TemplateError::Unterminated`].
    pub fn render(&self, attributes: &Attributes) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.source.len());
        let mut rest = self.source;

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after.find("}}").ok_or(TemplateError::Unterminated {
                template: self.name,
            })?;
            let name = after[..end].trim();
            let value = attributes
                .get(name)
                .ok_or_else(|| TemplateError::MissingAttribute {
                    template: self.name,
                    name: name.to_string(),
                })?;
            out.push_str(&escape(value));
            rest = &after[end + 2..];
        }
        out.push_str(rest);

        Ok(out)
    }
}

/// Every template the application renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateId {
    /// One row of the task list
    TaskRow,
    /// Content of the add-task form
    AddTaskForm,
}

const TASK_ROW: Template = Template::new(
    "taskTemplate",
    "<span class=\"title\">{{title}}</span> \
     <span class=\"priority\">{{priority}}</span> \
     <button class=\"edit\">Edit</button> \
     <button class=\"delete\">Delete</button>",
);

const ADD_TASK_FORM: Template = Template::new("addTaskTemplate", "<label>New task</label>");

impl TemplateId {
    /// The template behind this id
    #[must_use]
    pub const fn template(self) -> Template {
        match self {
            Self::TaskRow => TASK_ROW,
            Self::AddTaskForm => ADD_TASK_FORM,
        }
    }

    /// Shorthand for `self.template().render(attributes)`
    ///
    /// # Errors
    ///
    /// See [`Template::render`].
    pub fn render(self, attributes: &Attributes) -> Result<String, TemplateError> {
        self.template().render(attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Task, TaskAttributes, TaskId};
    use uuid::Uuid;

    fn task(title: &str, priority: Option<i64>) -> Task {
        Task::new(
            TaskId::from_uuid(Uuid::from_u128(1)),
            TaskAttributes {
                title: title.to_string(),
                priority,
            },
        )
    }

    #[test]
    fn task_row_interpolates_title_and_priority() {
        let attributes = attributes_of(&task("Water plants", Some(4))).unwrap();
        let markup = TemplateId::TaskRow.render(&attributes).unwrap();
        assert!(markup.starts_with("<span class=\"title\">Water plants</span>"));
        assert!(markup.contains("<span class=\"priority\">4</span>"));
        assert!(markup.contains("<button class=\"edit\">Edit</button>"));
        assert!(markup.contains("<button class=\"delete\">Delete</button>"));
    }

    #[test]
    fn unset_priority_renders_empty() {
        let attributes = attributes_of(&task("C", None)).unwrap();
        assert_eq!(attributes.get("priority").map(String::as_str), Some(""));
        let markup = TemplateId::TaskRow.render(&attributes).unwrap();
        assert!(markup.contains("<span class=\"priority\"></span>"));
    }

    #[test]
    fn negative_priority_renders_with_sign() {
        let attributes = attributes_of(&task("Someday", Some(-2))).unwrap();
        let markup = TemplateId::TaskRow.render(&attributes).unwrap();
        assert!(markup.contains("<span class=\"priority\">-2</span>"));
    }

    #[test]
    fn values_are_escaped() {
        let attributes = attributes_of(&task("<b>bold</b> & co", None)).unwrap();
        let markup = TemplateId::TaskRow.render(&attributes).unwrap();
        assert!(markup.contains("&lt;b&gt;bold&lt;/b&gt; &amp; co"));
    }

    #[test]
    fn missing_attribute_is_an_error() {
        let error = TemplateId::TaskRow.render(&Attributes::new()).unwrap_err();
        assert!(matches!(
            error,
            TemplateError::MissingAttribute { template: "taskTemplate", ref name } if name == "title"
        ));
    }

    #[test]
    fn unterminated_placeholder_is_an_error() {
        let template = Template::new("broken", "<p>{{title</p>");
        let mut attributes = Attributes::new();
        attributes.insert("title".to_string(), "x".to_string());
        assert!(matches!(
            template.render(&attributes),
            Err(TemplateError::Unterminated { template: "broken" })
        ));
    }

    #[test]
    fn placeholder_whitespace_is_ignored() {
        let template = Template::new("spaced", "[{{ title }}]");
        let mut attributes = Attributes::new();
        attributes.insert("title".to_string(), "x".to_string());
        assert_eq!(template.render(&attributes).unwrap(), "[x]");
    }

    #[test]
    fn nested_values_are_rejected() {
        #[derive(Serialize)]
        struct Nested {
            tags: Vec<String>,
        }
        assert!(matches!(
            attributes_of(&Nested { tags: vec![] }),
            Err(TemplateError::NotFlat { ref name }) if name == "tags"
        ));
        assert!(matches!(attributes_of(&"text"), Err(TemplateError::NotAnObject)));
    }

    #[test]
    fn form_template_needs_no_attributes() {
        let markup = TemplateId::AddTaskForm.render(&Attributes::new()).unwrap();
        assert_eq!(markup, "<label>New task</label>");
        assert_eq!(TemplateId::AddTaskForm.template().name(), "addTaskTemplate");
    }
}
