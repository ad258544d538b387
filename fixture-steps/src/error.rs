// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error types for fixture steps and assertions.

use std::io;
use thiserror::Error;

/// Result type alias for fixture operations.
pub type FixtureResult<T> = Result<T, FixtureError>;

/// Errors raised by assertions, the entity façade, and the collaborators behind it.
#[derive(Error, Debug)]
pub enum FixtureError {
    /// Assertion failed (reported, not fatal to the run).
    #[error("Assertion failed: {0}")]
    Assertion(String),

    /// A value in a date-normalized sequence could not be read as a date.
    #[error("Failed to parse element {index} as a date: '{value}'")]
    DateParse { index: usize, value: String },

    /// Step arguments were unusable.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No entity is recorded under the key/scope pair.
    #[error("Entity '{key}' not found in scope '{scope}'")]
    EntityNotFound { key: String, scope: String },

    /// The entity exists but does not carry the requested field.
    #[error("Field '{field}' not found on entity '{key}' in scope '{scope}'")]
    FieldNotFound {
        key: String,
        field: String,
        scope: String,
    },

    /// An entity is already recorded under the key/scope pair.
    #[error("Entity '{key}' already exists in scope '{scope}'")]
    DuplicateEntity { key: String, scope: String },

    /// A dependent key has not been created or fetched yet.
    #[error("Missing dependent entity: {0}")]
    MissingDependency(String),

    /// No template with the given name is known.
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// GET index does not select an element of the returned collection.
    #[error("Index {index} out of range for entity '{key}' ({len} item(s))")]
    IndexOutOfRange {
        key: String,
        index: usize,
        len: usize,
    },

    /// The credential collaborator could not resolve or decrypt a secret.
    #[error("Unable to resolve secret '{name}': {reason}")]
    Secret { name: String, reason: String },

    /// A collaborator could not be bound.
    #[error("Binding error: {0}")]
    Binding(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic collaborator error.
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl FixtureError {
    /// Create an assertion error.
    pub fn assertion(msg: impl Into<String>) -> Self {
        Self::Assertion(msg.into())
    }

    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an entity-not-found error.
    pub fn entity_not_found(key: impl Into<String>, scope: impl Into<String>) -> Self {
        Self::EntityNotFound {
            key: key.into(),
            scope: scope.into(),
        }
    }

    /// Create a field-not-found error.
    pub fn field_not_found(
        key: impl Into<String>,
        field: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self::FieldNotFound {
            key: key.into(),
            field: field.into(),
            scope: scope.into(),
        }
    }

    /// Create a missing-dependency error.
    pub fn missing_dependency(key: impl Into<String>) -> Self {
        Self::MissingDependency(key.into())
    }

    /// Create a template-not-found error.
    pub fn template_not_found(name: impl Into<String>) -> Self {
        Self::TemplateNotFound(name.into())
    }

    /// Create a secret resolution error.
    pub fn secret(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Secret {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a binding error.
    pub fn binding(msg: impl Into<String>) -> Self {
        Self::Binding(msg.into())
    }

    /// Returns true for assertion failures, which a script run records and continues past.
    pub fn is_assertion(&self) -> bool {
        matches!(self, Self::Assertion(_))
    }
}
