// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Collaborator Ports
//!
//! Traits for the two external collaborators fixture steps rely on, and the
//! request bundles forwarded to the persistence collaborator.
//!
//! Implementations own all state: entity data stays inside the persistence
//! collaborator, secret resolution inside the credential collaborator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::FixtureResult;

/// Request to create an entity from a named template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntity {
    /// Step key identifying the entity within the run.
    pub key: String,
    /// Namespace the key belongs to.
    pub scope: String,
    /// Name of the template to materialize.
    pub template: String,
    /// Keys of entities this one depends on.
    #[serde(default)]
    pub dependent_keys: Vec<String>,
    /// Field values applied on top of the template.
    #[serde(default)]
    pub override_fields: BTreeMap<String, String>,
    /// Store view the entity is created in. Empty means unspecified.
    #[serde(default)]
    pub store_code: String,
}

impl CreateEntity {
    pub fn new(key: impl Into<String>, scope: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            scope: scope.into(),
            template: template.into(),
            dependent_keys: Vec::new(),
            override_fields: BTreeMap::new(),
            store_code: String::new(),
        }
    }

    /// Add a dependent entity key.
    pub fn depends_on(mut self, key: impl Into<String>) -> Self {
        self.dependent_keys.push(key.into());
        self
    }

    /// Override a template field.
    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.override_fields.insert(field.into(), value.into());
        self
    }

    /// Set the store code.
    pub fn in_store(mut self, store_code: impl Into<String>) -> Self {
        self.store_code = store_code.into();
        self
    }
}

/// Request to update a previously created entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntity {
    pub key: String,
    pub scope: String,
    /// Name of the template holding the updated fields.
    pub template: String,
    #[serde(default)]
    pub dependent_keys: Vec<String>,
}

impl UpdateEntity {
    pub fn new(key: impl Into<String>, scope: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            scope: scope.into(),
            template: template.into(),
            dependent_keys: Vec::new(),
        }
    }

    /// Add a dependent entity key.
    pub fn depends_on(mut self, key: impl Into<String>) -> Self {
        self.dependent_keys.push(key.into());
        self
    }
}

/// Request to fetch an entity and record it under a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetEntity {
    pub key: String,
    pub scope: String,
    pub template: String,
    #[serde(default)]
    pub dependent_keys: Vec<String>,
    #[serde(default)]
    pub store_code: String,
    /// Selects one item when the fetch returns a collection.
    #[serde(default)]
    pub index: Option<usize>,
}

impl GetEntity {
    pub fn new(key: impl Into<String>, scope: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            scope: scope.into(),
            template: template.into(),
            dependent_keys: Vec::new(),
            store_code: String::new(),
            index: None,
        }
    }

    /// Add a dependent entity key.
    pub fn depends_on(mut self, key: impl Into<String>) -> Self {
        self.dependent_keys.push(key.into());
        self
    }

    /// Set the store code.
    pub fn in_store(mut self, store_code: impl Into<String>) -> Self {
        self.store_code = store_code.into();
        self
    }

    /// Select one element of a collection result.
    pub fn at_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

/// Persistence collaborator: creates, fetches, and removes entities keyed by
/// (key, scope) and answers field lookups on them.
///
/// Methods take `&self`; implementations keep their registry behind interior
/// mutability.
pub trait PersistencePort {
    /// Creates an entity and records it under its key and scope.
    fn create_entity(&self, request: &CreateEntity) -> FixtureResult<()>;

    /// Applies an update template to a recorded entity.
    fn update_entity(&self, request: &UpdateEntity) -> FixtureResult<()>;

    /// Fetches an entity and records it under its key and scope.
    fn get_entity(&self, request: &GetEntity) -> FixtureResult<()>;

    /// Deletes a recorded entity.
    fn delete_entity(&self, key: &str, scope: &str) -> FixtureResult<()>;

    /// Returns one field of a recorded entity as text.
    fn retrieve_entity_field(&self, key: &str, field: &str, scope: &str) -> FixtureResult<String>;
}

/// Credential collaborator.
pub trait CredentialPort {
    /// Resolves a secret by name.
    ///
    /// `Ok(None)` is only returned when the implementation treats an unknown
    /// name as non-fatal.
    fn get_secret(&self, name: &str) -> FixtureResult<Option<String>>;
}
