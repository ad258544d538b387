// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Step scripts.
//!
//! Provides a fluent API and a JSON format for ordered lists of steps, and a
//! sequential runner that records assertion failures and keeps going while
//! any other error ends the run.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::context::TestContext;
use crate::error::FixtureResult;
use crate::step::{Step, StepOutcome};

/// A recorded assertion failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
    /// Position of the step in the script.
    pub index: usize,
    /// Action name of the step.
    pub action: &'static str,
    /// Failure message.
    pub message: String,
}

/// What a script run produced.
#[derive(Debug, Clone, Default)]
pub struct ScriptReport {
    executed: usize,
    failures: Vec<StepFailure>,
    values: BTreeMap<(String, String, String), String>,
}

impl ScriptReport {
    /// Whether no assertion failed.
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of steps executed.
    pub fn executed(&self) -> usize {
        self.executed
    }

    pub fn failures(&self) -> &[StepFailure] {
        &self.failures
    }

    /// Value retrieved by a `retrieveField` step for `key` in `scope`.
    pub fn value(&self, key: &str, field: &str, scope: &str) -> Option<&str> {
        self.values
            .get(&(scope.to_string(), key.to_string(), field.to_string()))
            .map(String::as_str)
    }
}

/// A named, ordered list of steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestScript {
    name: String,
    #[serde(default)]
    steps: Vec<Step>,
}

impl TestScript {
    /// Create an empty script.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Parse a script from JSON: `{"name": ..., "steps": [...]}`.
    pub fn from_json_str(json: &str) -> FixtureResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a script from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> FixtureResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    /// Append a step.
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Run every step in order against `ctx`.
    ///
    /// Assertion failures are recorded in the report; the first error of any
    /// other kind stops the run and is returned.
    pub fn run(&self, ctx: &TestContext) -> FixtureResult<ScriptReport> {
        info!("Running script '{}' ({} step(s))", self.name, self.steps.len());

        let mut report = ScriptReport::default();

        for (index, step) in self.steps.iter().enumerate() {
            info!("Step {}: {}", index, step.name());
            report.executed += 1;

            match ctx.run_step(step) {
                Ok(StepOutcome::Value(value)) => {
                    if let Step::RetrieveField {
                        step_key,
                        field,
                        scope,
                    } = step
                    {
                        report
                            .values
                            .insert((scope.clone(), step_key.clone(), field.clone()), value);
                    }
                }
                Ok(_) => {}
                Err(err) if err.is_assertion() => {
                    warn!("Step {} ({}) failed: {}", index, step.name(), err);
                    report.failures.push(StepFailure {
                        index,
                        action: step.name(),
                        message: err.to_string(),
                    });
                }
                Err(err) => {
                    warn!("Script '{}' aborted at step {}: {}", self.name, index, err);
                    return Err(err);
                }
            }
        }

        info!(
            "Script '{}' finished: {} step(s), {} failure(s)",
            self.name,
            report.executed,
            report.failures.len()
        );
        Ok(report)
    }
}
