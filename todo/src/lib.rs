//! To-do list built on Composable UI.
//!
//! The collection of tasks lives in a [`TaskStore`]; every change goes
//! through [`TaskReducer`], which validates commands and publishes the
//! resulting events. Views observe those events and keep the
//! [`Document`](composable_ui_runtime::Document) in step:
//!
//! - [`TasksView`](views::TasksView) renders the list and appends a row per added task
//! - [`TaskView`](views::TaskView) renders one row and handles its edit and delete controls
//! - [`AddTaskView`](views::AddTaskView) turns form submissions into `AddTask` commands
//!
//! # Quick Start
//!
//! ```no_run
//! use composable_ui_core::environment::RandomIdGenerator;
//! use composable_ui_runtime::Store;
//! use std::rc::Rc;
//! use todo::{TaskEnvironment, TaskReducer, TaskState, TodoApp, TodoConfig};
//! use todo::cli::PendingAnswer;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TodoConfig::default();
//! let store = Rc::new(Store::with_config(
//!     TaskState::new(),
//!     TaskReducer::new(),
//!     TaskEnvironment::new(Rc::new(RandomIdGenerator)),
//!     config.store_config(),
//! ));
//!
//! let document = TodoApp::host_document(&config)?;
//! let app = TodoApp::mount(document, store, Rc::new(PendingAnswer::new()), &config)?;
//!
//! app.submit_task("Buy milk")?;
//! println!("{}", app.markup()?);
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod reducer;
pub mod seed;
pub mod templates;
pub mod types;
pub mod views;

pub use app::TodoApp;
pub use config::{ConfigError, TodoConfig};
pub use reducer::{TaskEnvironment, TaskReducer, TaskStore};
pub use types::{Task, TaskAction, TaskAttributes, TaskError, TaskId, TaskState};
