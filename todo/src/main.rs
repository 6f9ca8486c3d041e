//! `todo` binary
//!
//! Mounts the to-do list into an in-memory page and drives it from stdin:
//! each line is turned into the form submission or row click a browser would
//! produce, and the resulting list markup is printed.
//!
//! Run with: `cargo run --bin todo`, then type `help`.

use anyhow::Context;
use composable_ui_core::environment::{Prompt, RandomIdGenerator};
use composable_ui_runtime::Store;
use std::rc::Rc;
use todo::cli::{Command, Outcome, PendingAnswer, Session};
use todo::{TaskEnvironment, TaskReducer, TaskState, TodoApp, TodoConfig, seed};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout carries only the list
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = TodoConfig::from_env().context("Failed to load configuration")?;
    info!(?config, "Starting to-do list");

    let store = Rc::new(Store::with_config(
        TaskState::new(),
        TaskReducer::new(),
        TaskEnvironment::new(Rc::new(RandomIdGenerator)),
        config.store_config(),
    ));
    if config.seed_demo {
        seed::seed(&store, seed::demo_tasks()).context("Failed to seed demo tasks")?;
    }

    let prompt = Rc::new(PendingAnswer::new());
    let document = TodoApp::host_document(&config).context("Failed to build host page")?;
    let app = TodoApp::mount(document, store, Rc::clone(&prompt) as Rc<dyn Prompt>, &config)
        .context("Failed to mount application")?;
    let session = Session::new(app, prompt);

    println!("{}", session.app().markup()?);
    println!("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read stdin")?,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        };
        let Some(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(error) => {
                eprintln!("{error}");
                continue;
            },
        };

        match session.execute(command) {
            Ok(Outcome::Continue(output)) => println!("{output}"),
            Ok(Outcome::Quit) => break,
            Err(error) => {
                warn!(%error, "Command failed");
                eprintln!("{error}");
            },
        }
    }

    info!(tasks = session.app().store().state(|s| s.count()), "Goodbye");
    Ok(())
}
