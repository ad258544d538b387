// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entity Lifecycle Façade
//!
//! Create, update, fetch, and delete test fixtures addressed by (key, scope).
//!
//! Every operation forwards its arguments unchanged to the persistence
//! collaborator and returns the collaborator's errors unchanged. The façade
//! holds no entity data of its own.
//!
//! # Example
//!
//! ```ignore
//! use fixture_steps::prelude::*;
//!
//! let facade = EntityFacade::with_persistence(Box::new(MemoryPersistence::new()));
//! facade.create(&CreateEntity::new("customer", "test", "Customer"))?;
//! let email = facade.retrieve_field("customer", "email", "test")?;
//! facade.delete("customer", "test")?;
//! ```

use tracing::debug;

use crate::binding::Binding;
use crate::error::FixtureResult;
use crate::ports::{CreateEntity, GetEntity, PersistencePort, UpdateEntity};

/// Forwarding façade over a lazily bound persistence collaborator.
#[derive(Debug)]
pub struct EntityFacade {
    persistence: Binding<dyn PersistencePort>,
}

impl EntityFacade {
    /// Create a façade that builds its collaborator on first use.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> FixtureResult<Box<dyn PersistencePort>> + 'static,
    {
        Self {
            persistence: Binding::new("persistence", factory),
        }
    }

    /// Create a façade around an existing collaborator.
    pub fn with_persistence(persistence: Box<dyn PersistencePort>) -> Self {
        Self {
            persistence: Binding::bound("persistence", persistence),
        }
    }

    /// Whether the collaborator has been constructed yet.
    pub fn is_bound(&self) -> bool {
        self.persistence.is_bound()
    }

    /// Create an entity from a template.
    pub fn create(&self, request: &CreateEntity) -> FixtureResult<()> {
        debug!(
            "createData '{}' (scope '{}') from template '{}'",
            request.key, request.scope, request.template
        );
        self.persistence.get()?.create_entity(request)
    }

    /// Update a previously created entity.
    pub fn update(&self, request: &UpdateEntity) -> FixtureResult<()> {
        debug!(
            "updateData '{}' (scope '{}') with template '{}'",
            request.key, request.scope, request.template
        );
        self.persistence.get()?.update_entity(request)
    }

    /// Fetch an entity and record it under its key.
    pub fn get(&self, request: &GetEntity) -> FixtureResult<()> {
        debug!(
            "getData '{}' (scope '{}') from template '{}', index {:?}",
            request.key, request.scope, request.template, request.index
        );
        self.persistence.get()?.get_entity(request)
    }

    /// Delete a previously created entity.
    pub fn delete(&self, key: &str, scope: &str) -> FixtureResult<()> {
        debug!("deleteData '{}' (scope '{}')", key, scope);
        self.persistence.get()?.delete_entity(key, scope)
    }

    /// Read one field of a recorded entity.
    pub fn retrieve_field(&self, step_key: &str, field: &str, scope: &str) -> FixtureResult<String> {
        debug!("Retrieving '{}.{}' (scope '{}')", step_key, field, scope);
        self.persistence
            .get()?
            .retrieve_entity_field(step_key, field, scope)
    }
}
