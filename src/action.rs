use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cleaner;
use crate::config::Config;
use crate::error::ActionError;
use crate::scanner;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Scan,
    Clean,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Scan => "scan",
            Action::Clean => "clean",
        }
    }

    pub fn all() -> Vec<Action> {
        vec![Action::Scan, Action::Clean]
    }

    /// Runs the action over the configured targets and returns its result as JSON.
    pub fn run(&self, config: &Config) -> Result<Value, ActionError> {
        let data = match self {
            Action::Scan => {
                serde_json::to_value(scanner::scan(&config.targets, config.scan_throttle))?
            }
            Action::Clean => {
                serde_json::to_value(cleaner::clean(&config.targets, config.clean_throttle))?
            }
        };
        Ok(data)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::all()
            .into_iter()
            .find(|action| action.name() == s)
            .ok_or_else(|| ActionError::Unrecognized { name: s.to_string() })
    }
}

/// JSON envelope returned for every background request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub data: Option<Value>,
    pub message: String,
}

impl ActionResponse {
    pub fn ok(data: Value) -> Self {
        ActionResponse {
            success: true,
            data: Some(data),
            message: String::new(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        ActionResponse {
            success: false,
            data: None,
            message: message.into(),
        }
    }
}

impl From<Result<Value, ActionError>> for ActionResponse {
    fn from(result: Result<Value, ActionError>) -> Self {
        match result {
            Ok(data) => ActionResponse::ok(data),
            Err(err) => ActionResponse::from(err),
        }
    }
}

impl From<ActionError> for ActionResponse {
    fn from(err: ActionError) -> Self {
        match &err {
            ActionError::Unrecognized { name } => debug!(action = %name, "unrecognized action"),
            other => warn!(error = %other, "action failed"),
        }
        ActionResponse::failure(err.to_string())
    }
}

/// Resolves `name` and runs it. Never fails: every error ends up in the envelope.
pub fn dispatch(name: &str, config: &Config) -> ActionResponse {
    name.parse::<Action>()
        .and_then(|action| action.run(config))
        .into()
}
