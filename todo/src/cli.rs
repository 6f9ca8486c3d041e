//! Line-oriented host for the `todo` binary.
//!
//! Each input line becomes a [`Command`], which a [`Session`] turns into the
//! DOM events a browser would raise: a form submission or a click on a row
//! control.

use crate::app::TodoApp;
use crate::types::TaskAction;
use crate::views::{DELETE_CONTROL, EDIT_CONTROL, ViewError};
use composable_ui_core::Observer;
use composable_ui_core::environment::Prompt;
use std::cell::RefCell;
use std::fmt::Write as _;
use std::rc::Rc;
use std::str::FromStr;
use thiserror::Error;

/// Usage text shown by `help`
pub const HELP: &str = "\
Commands:
  add <title>         add a task
  edit <n> <title>    rename task n (1-based)
  delete <n>          delete task n (1-based)
  list                show the list
  help                show this help
  quit                leave";

/// Errors from parsing an input line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The line was blank
    #[error("Empty command")]
    Empty,

    /// The first word is not a command
    #[error("Unknown command '{0}' (try 'help')")]
    Unknown(String),

    /// A required argument was missing
    #[error("'{command}' needs {argument}")]
    MissingArgument {
        /// Command name
        command: &'static str,
        /// Description of the missing argument
        argument: &'static str,
    },

    /// A row number was not a positive integer
    #[error("Invalid task number '{0}'")]
    InvalidIndex(String),
}

/// One parsed input line
///
/// Row indices are 0-based; the text form is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Submit the form with this title
    Add(String),
    /// Click edit on a row and answer the prompt with `title`
    Edit {
        /// Row index
        index: usize,
        /// Answer given to the rename prompt
        title: String,
    },
    /// Click delete on a row
    Delete(usize),
    /// Print the list
    List,
    /// Print usage
    Help,
    /// End the session
    Quit,
}

impl Command {
    /// Parse one input line
    ///
    /// # Errors
    ///
    /// [`CommandError`] describing why the line is not a command.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim_start()));

        match word.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            // Titles are passed through untouched: blank ones are for the reducer to reject
            "add" => Ok(Self::Add(rest.to_string())),
            "edit" => {
                let (number, title) = rest
                    .split_once(char::is_whitespace)
                    .map_or((rest, ""), |(number, title)| (number, title.trim_start()));
                if number.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "edit",
                        argument: "a task number",
                    });
                }
                Ok(Self::Edit {
                    index: parse_index(number)?,
                    title: title.to_string(),
                })
            },
            "delete" | "rm" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "delete",
                        argument: "a task number",
                    });
                }
                Ok(Self::Delete(parse_index(rest)?))
            },
            "list" | "ls" => Ok(Self::List),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_index(text: &str) -> Result<usize, CommandError> {
    match text.trim().parse::<usize>() {
        Ok(number) if number > 0 => Ok(number - 1),
        _ => Err(CommandError::InvalidIndex(text.to_string())),
    }
}

/// Prompt answered from the command line
///
/// `edit` stores its title here before clicking; the row's prompt takes it.
/// With nothing stored the prompt is cancelled.
#[derive(Debug, Default)]
pub struct PendingAnswer {
    answer: RefCell<Option<String>>,
}

impl PendingAnswer {
    /// Creates an empty prompt
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the next prompt with `answer`
    pub fn set(&self, answer: impl Into<String>) {
        *self.answer.borrow_mut() = Some(answer.into());
    }

    /// Drop an unused answer
    pub fn clear(&self) {
        self.answer.borrow_mut().take();
    }
}

impl Prompt for PendingAnswer {
    fn prompt(&self, message: &str, default: &str) -> Option<String> {
        let answer = self.answer.borrow_mut().take();
        tracing::debug!(message, default, answered = answer.is_some(), "Prompt");
        answer
    }
}

/// Collects user-facing messages for rejected titles
#[derive(Debug, Default)]
pub struct Diagnostics {
    messages: RefCell<Vec<String>>,
}

impl Diagnostics {
    /// Creates an empty collector
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every message collected so far
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.messages.borrow_mut())
    }
}

impl Observer<TaskAction> for Diagnostics {
    fn notify(&self, event: &TaskAction) {
        if let TaskAction::ValidationFailed { id, error } = event {
            let message = match id {
                Some(id) => format!("Rejected edit of {id}: {error}"),
                None => format!("Rejected new task: {error}"),
            };
            self.messages.borrow_mut().push(message);
        }
    }
}

/// What the host should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print this and read the next line
    Continue(String),
    /// End the session
    Quit,
}

/// A mounted application driven by [`Command`]s
pub struct Session {
    app: TodoApp,
    prompt: Rc<PendingAnswer>,
    diagnostics: Rc<Diagnostics>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("app", &self.app)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Wrap `app`, whose rows must have been built with `prompt`
    #[must_use]
    pub fn new(app: TodoApp, prompt: Rc<PendingAnswer>) -> Self {
        let diagnostics = Rc::new(Diagnostics::new());
        app.store().subscribe(&diagnostics);
        Self {
            app,
            prompt,
            diagnostics,
        }
    }

    /// The application
    #[must_use]
    pub const fn app(&self) -> &TodoApp {
        &self.app
    }

    /// Run one command
    ///
    /// Mutations print any diagnostics followed by the list markup.
    ///
    /// # Errors
    ///
    /// [`ViewError`] from the application, e.g. a row number past the end.
    pub fn execute(&self, command: Command) -> Result<Outcome, ViewError> {
        tracing::debug!(?command, "Executing command");
        match command {
            Command::Add(title) => self.app.submit_task(&title)?,
            Command::Edit { index, title } => {
                self.prompt.set(title);
                let result = self.app.click_task(index, EDIT_CONTROL);
                self.prompt.clear();
                result?;
            },
            Command::Delete(index) => self.app.click_task(index, DELETE_CONTROL)?,
            Command::List => return Ok(Outcome::Continue(self.app.markup()?)),
            Command::Help => return Ok(Outcome::Continue(HELP.to_string())),
            Command::Quit => return Ok(Outcome::Quit),
        }

        let mut output = String::new();
        for message in self.diagnostics.drain() {
            let _ = writeln!(output, "{message}");
        }
        output.push_str(&self.app.markup()?);
        Ok(Outcome::Continue(output))
    }
}
