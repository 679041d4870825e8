//! Action scripts for headless replay.
//!
//! A script is an ordered list of [`Action`]s. TOML scripts use one `[[step]]`
//! table per action; JSON scripts are a plain array.
//!
//! ```toml
//! [[step]]
//! action = "select_pool_index"
//! index = 0
//!
//! [[step]]
//! action = "tap_at"
//! position = { x = 10.0, y = 10.0 }
//! ```

use crate::games::dots::{Action, GameSession, Outcome, RuleError};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Ordered input events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Actions in the order they are applied.
    #[serde(default)]
    pub step: Vec<Action>,
}

impl Script {
    /// Loads a script, choosing the format from the file extension.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ScriptError::new(format!("Failed to read script: {}", e)))?;

        let script = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml(&content)?,
            Some("json") => Self::from_json(&content)?,
            other => {
                return Err(ScriptError::new(format!(
                    "Unsupported script extension: {}",
                    other.unwrap_or("<none>")
                )));
            }
        };

        info!(steps = script.step.len(), "Script loaded");
        Ok(script)
    }

    /// Parses a TOML script.
    pub fn from_toml(content: &str) -> Result<Self, ScriptError> {
        toml::from_str(content)
            .map_err(|e| ScriptError::new(format!("Failed to parse TOML script: {}", e)))
    }

    /// Parses a JSON array of actions.
    pub fn from_json(content: &str) -> Result<Self, ScriptError> {
        let step = serde_json::from_str(content)
            .map_err(|e| ScriptError::new(format!("Failed to parse JSON script: {}", e)))?;
        Ok(Self { step })
    }
}

/// Result of one replayed action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    /// Position in the script.
    pub step: usize,
    /// The action applied.
    pub action: Action,
    /// What the action did.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    /// Why the action was rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepReport {
    fn new(step: usize, action: Action, result: Result<Outcome, RuleError>) -> Self {
        let (outcome, error) = match result {
            Ok(outcome) => (Some(outcome), None),
            Err(e) => (None, Some(e.to_string())),
        };
        Self {
            step,
            action,
            outcome,
            error,
        }
    }

    /// Returns true if the action was rejected.
    pub fn is_rejected(&self) -> bool {
        self.error.is_some()
    }
}

/// Applies every action in order. Rejected actions are reported and skipped.
#[instrument(skip(session, actions))]
pub fn replay<'a, I>(session: &mut GameSession, actions: I) -> Vec<StepReport>
where
    I: IntoIterator<Item = &'a Action>,
{
    actions
        .into_iter()
        .enumerate()
        .map(|(step, &action)| {
            let result = session.apply(action);
            match &result {
                Ok(outcome) => debug!(step, %action, ?outcome, "Step applied"),
                Err(e) => warn!(step, %action, error = %e, "Step rejected"),
            }
            StepReport::new(step, action, result)
        })
        .collect()
}

/// Script loading error.
#[derive(Debug, Clone, Display, Error)]
#[display("Script error: {} at {}:{}", message, file, line)]
pub struct ScriptError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ScriptError {
    /// Creates a new script error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
