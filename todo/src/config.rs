//! Configuration management for the to-do application.
//!
//! Loads configuration from environment variables with sensible defaults.

use composable_ui_runtime::StoreConfig;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Configuration error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable could not be parsed
    #[error("Invalid value '{value}' for {var}: {reason}")]
    InvalidValue {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
        /// What was expected
        reason: &'static str,
    },

    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    Validation(String),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoConfig {
    /// Selector of the container the task list is mounted into
    pub list_selector: String,
    /// Selector of the add-task form
    pub form_selector: String,
    /// Whether to start with the demo tasks
    pub seed_demo: bool,
    /// Dispatch queue limit of the store
    pub max_queued_actions: usize,
}

impl Default for TodoConfig {
    fn default() -> Self {
        Self {
            list_selector: ".tasks".to_string(),
            form_selector: "#addTask".to_string(),
            seed_demo: true,
            max_queued_actions: StoreConfig::default().max_queued_actions,
        }
    }
}

impl TodoConfig {
    /// Load configuration from the process environment
    ///
    /// - `TODO_LIST_SELECTOR` (default `.tasks`)
    /// - `TODO_FORM_SELECTOR` (default `#addTask`)
    /// - `TODO_SEED_DEMO` (default `true`)
    /// - `TODO_MAX_QUEUED_ACTIONS` (default 64)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is malformed or the result fails
    /// [`TodoConfig::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Same as [`TodoConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let seed_demo = match lookup("TODO_SEED_DEMO") {
            Some(value) => parse_bool("TODO_SEED_DEMO", &value)?,
            None => defaults.seed_demo,
        };

        let max_queued_actions = match lookup("TODO_MAX_QUEUED_ACTIONS") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: "TODO_MAX_QUEUED_ACTIONS",
                value,
                reason: "expected a non-negative integer",
            })?,
            None => defaults.max_queued_actions,
        };

        let config = Self {
            list_selector: lookup("TODO_LIST_SELECTOR").unwrap_or(defaults.list_selector),
            form_selector: lookup("TODO_FORM_SELECTOR").unwrap_or(defaults.form_selector),
            seed_demo,
            max_queued_actions,
        };
        config.validate()?;

        Ok(config)
    }

    /// Check the configuration is usable
    ///
    /// Selectors must be `#id` or `.class` so the host page can create the
    /// containers they name.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Validation`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, selector) in [
            ("list_selector", &self.list_selector),
            ("form_selector", &self.form_selector),
        ] {
            let body = selector
                .strip_prefix('#')
                .or_else(|| selector.strip_prefix('.'))
                .unwrap_or_default();
            let valid = !body.is_empty()
                && body
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
            if !valid {
                return Err(ConfigError::Validation(format!(
                    "{name} must be '#id' or '.class', got '{selector}'"
                )));
            }
        }

        if self.list_selector == self.form_selector {
            return Err(ConfigError::Validation(
                "list_selector and form_selector must differ".to_string(),
            ));
        }

        if self.max_queued_actions == 0 {
            return Err(ConfigError::Validation(
                "max_queued_actions must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Store configuration derived from this config
    #[must_use]
    pub const fn store_config(&self) -> StoreConfig {
        StoreConfig::new(self.max_queued_actions)
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: value.to_string(),
            reason: "expected true or false",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = TodoConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, TodoConfig::default());
        assert_eq!(config.store_config(), StoreConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let config = TodoConfig::from_lookup(lookup(&[
            ("TODO_LIST_SELECTOR", "#list"),
            ("TODO_FORM_SELECTOR", ".new-task"),
            ("TODO_SEED_DEMO", "no"),
            ("TODO_MAX_QUEUED_ACTIONS", " 8 "),
        ]))
        .unwrap();

        assert_eq!(config.list_selector, "#list");
        assert_eq!(config.form_selector, ".new-task");
        assert!(!config.seed_demo);
        assert_eq!(config.max_queued_actions, 8);
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(matches!(
            TodoConfig::from_lookup(lookup(&[("TODO_SEED_DEMO", "maybe")])),
            Err(ConfigError::InvalidValue { var: "TODO_SEED_DEMO", .. })
        ));
        assert!(matches!(
            TodoConfig::from_lookup(lookup(&[("TODO_MAX_QUEUED_ACTIONS", "-1")])),
            Err(ConfigError::InvalidValue { var: "TODO_MAX_QUEUED_ACTIONS", .. })
        ));
    }

    #[test]
    fn validation_errors() {
        let bad_selector = TodoConfig {
            list_selector: "ul li".to_string(),
            ..TodoConfig::default()
        };
        assert!(matches!(bad_selector.validate(), Err(ConfigError::Validation(_))));

        let same = TodoConfig {
            form_selector: ".tasks".to_string(),
            ..TodoConfig::default()
        };
        assert!(same.validate().is_err());

        let zero_queue = TodoConfig {
            max_queued_actions: 0,
            ..TodoConfig::default()
        };
        assert!(zero_queue.validate().is_err());
    }
}
