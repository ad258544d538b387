// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! In-memory persistence collaborator.
//!
//! Entities are field maps materialized from named templates and recorded
//! under (scope, key). A template value of the form `$key.field$` is replaced
//! by that field of a dependent entity listed in the request; when `key` is
//! not one of the request's dependent keys the value is kept as written.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{FixtureError, FixtureResult};
use crate::ports::{CreateEntity, GetEntity, PersistencePort, UpdateEntity};

/// Field name -> text value.
pub type Fields = BTreeMap<String, String>;

/// Field recording the store code an entity was created or fetched in.
const STORE_CODE_FIELD: &str = "store_code";

/// Static data behind a template name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemplateData {
    /// One entity.
    Single(Fields),
    /// A collection, as returned by a GET on a list endpoint.
    Collection(Vec<Fields>),
}

#[derive(Debug, Deserialize)]
struct TemplateCatalog {
    templates: BTreeMap<String, TemplateData>,
}

type EntityKey = (String, String);

/// In-memory entity registry.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    templates: BTreeMap<String, TemplateData>,
    entities: RefCell<BTreeMap<EntityKey, Fields>>,
}

impl MemoryPersistence {
    /// Create a registry with no templates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load templates from a JSON catalog: `{"templates": {"Name": {...} | [{...}]}}`.
    pub fn from_json_str(json: &str) -> FixtureResult<Self> {
        let catalog: TemplateCatalog = serde_json::from_str(json)?;
        debug!("Loaded {} template(s)", catalog.templates.len());
        Ok(Self {
            templates: catalog.templates,
            entities: RefCell::default(),
        })
    }

    /// Load templates from a JSON catalog file.
    pub fn from_path(path: impl AsRef<Path>) -> FixtureResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    /// Register a single-entity template.
    pub fn with_template<I, K, V>(mut self, name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.templates
            .insert(name.into(), TemplateData::Single(collect_fields(fields)));
        self
    }

    /// Register a collection template.
    pub fn with_collection(mut self, name: impl Into<String>, items: Vec<Fields>) -> Self {
        self.templates
            .insert(name.into(), TemplateData::Collection(items));
        self
    }

    /// Number of recorded entities.
    pub fn entity_count(&self) -> usize {
        self.entities.borrow().len()
    }

    /// Whether an entity is recorded under the key and scope.
    pub fn contains(&self, key: &str, scope: &str) -> bool {
        self.entities.borrow().contains_key(&entity_key(key, scope))
    }

    fn template(&self, name: &str) -> FixtureResult<&TemplateData> {
        self.templates
            .get(name)
            .ok_or_else(|| FixtureError::template_not_found(name))
    }

    fn single_template(&self, name: &str) -> FixtureResult<&Fields> {
        match self.template(name)? {
            TemplateData::Single(fields) => Ok(fields),
            TemplateData::Collection(_) => Err(FixtureError::invalid_input(format!(
                "template '{}' is a collection and can only be fetched",
                name
            ))),
        }
    }

    /// Looks up every dependent key, in any scope.
    fn dependencies(&self, keys: &[String]) -> FixtureResult<HashMap<String, (String, Fields)>> {
        let entities = self.entities.borrow();
        keys.iter()
            .map(|key| {
                entities
                    .iter()
                    .find(|((_, k), _)| k == key)
                    .map(|((scope, _), fields)| (key.clone(), (scope.clone(), fields.clone())))
                    .ok_or_else(|| FixtureError::missing_dependency(key.clone()))
            })
            .collect()
    }

    fn materialize(&self, template: &Fields, dependent_keys: &[String]) -> FixtureResult<Fields> {
        let dependencies = self.dependencies(dependent_keys)?;
        template
            .iter()
            .map(|(field, value)| -> FixtureResult<(String, String)> {
                Ok((field.clone(), resolve_value(value, &dependencies)?))
            })
            .collect()
    }
}

impl PersistencePort for MemoryPersistence {
    fn create_entity(&self, request: &CreateEntity) -> FixtureResult<()> {
        if self.contains(&request.key, &request.scope) {
            return Err(FixtureError::DuplicateEntity {
                key: request.key.clone(),
                scope: request.scope.clone(),
            });
        }

        let template = self.single_template(&request.template)?;
        let mut fields = self.materialize(template, &request.dependent_keys)?;
        fields.extend(
            request
                .override_fields
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        record_store_code(&mut fields, &request.store_code);

        trace!("Created '{}' with {} field(s)", request.key, fields.len());
        self.entities
            .borrow_mut()
            .insert(entity_key(&request.key, &request.scope), fields);
        Ok(())
    }

    fn update_entity(&self, request: &UpdateEntity) -> FixtureResult<()> {
        if !self.contains(&request.key, &request.scope) {
            return Err(FixtureError::entity_not_found(&request.key, &request.scope));
        }

        let template = self.single_template(&request.template)?;
        let updates = self.materialize(template, &request.dependent_keys)?;

        let mut entities = self.entities.borrow_mut();
        let fields = entities
            .get_mut(&entity_key(&request.key, &request.scope))
            .ok_or_else(|| FixtureError::entity_not_found(&request.key, &request.scope))?;
        fields.extend(updates);
        Ok(())
    }

    fn get_entity(&self, request: &GetEntity) -> FixtureResult<()> {
        let selected = match (self.template(&request.template)?, request.index) {
            (TemplateData::Single(fields), None | Some(0)) => fields,
            (TemplateData::Single(_), Some(index)) => {
                return Err(FixtureError::IndexOutOfRange {
                    key: request.key.clone(),
                    index,
                    len: 1,
                })
            }
            (TemplateData::Collection(items), index) => {
                let index = index.unwrap_or(0);
                items.get(index).ok_or_else(|| FixtureError::IndexOutOfRange {
                    key: request.key.clone(),
                    index,
                    len: items.len(),
                })?
            }
        };

        let mut fields = self.materialize(selected, &request.dependent_keys)?;
        record_store_code(&mut fields, &request.store_code);

        self.entities
            .borrow_mut()
            .insert(entity_key(&request.key, &request.scope), fields);
        Ok(())
    }

    fn delete_entity(&self, key: &str, scope: &str) -> FixtureResult<()> {
        self.entities
            .borrow_mut()
            .remove(&entity_key(key, scope))
            .map(|_| ())
            .ok_or_else(|| FixtureError::entity_not_found(key, scope))
    }

    fn retrieve_entity_field(&self, key: &str, field: &str, scope: &str) -> FixtureResult<String> {
        let entities = self.entities.borrow();
        let fields = entities
            .get(&entity_key(key, scope))
            .ok_or_else(|| FixtureError::entity_not_found(key, scope))?;
        fields
            .get(field)
            .cloned()
            .ok_or_else(|| FixtureError::field_not_found(key, field, scope))
    }
}

fn entity_key(key: &str, scope: &str) -> EntityKey {
    (scope.to_string(), key.to_string())
}

fn collect_fields<I, K, V>(fields: I) -> Fields
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    fields
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

fn record_store_code(fields: &mut Fields, store_code: &str) {
    if !store_code.is_empty() {
        fields.insert(STORE_CODE_FIELD.to_string(), store_code.to_string());
    }
}

/// Replaces a whole-value `$key.field$` reference with the dependent entity's field.
fn resolve_value(value: &str, dependencies: &HashMap<String, (String, Fields)>) -> FixtureResult<String> {
    let reference = value
        .strip_prefix('$')
        .and_then(|v| v.strip_suffix('$'))
        .and_then(|v| v.split_once('.'));

    let Some((key, field)) = reference else {
        return Ok(value.to_string());
    };

    // Only keys the request depends on are references; anything else is data.
    let Some((scope, fields)) = dependencies.get(key) else {
        return Ok(value.to_string());
    };
    fields
        .get(field)
        .cloned()
        .ok_or_else(|| FixtureError::field_not_found(key, field, scope.clone()))
}
