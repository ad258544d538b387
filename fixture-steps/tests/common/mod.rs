// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Common Test Utilities
//!
//! Collaborator doubles and fixtures shared by the integration tests.

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use fixture_steps::prelude::*;

/// Template catalog used across tests.
pub const CATALOG: &str = r#"{
    "templates": {
        "T": {"some_field": "recorded-value", "name": "Fixture"},
        "TRename": {"name": "Renamed"},
        "Category": {"name": "Shoes", "is_active": "true"},
        "Product": {"sku": "shoe-001", "category_id": "$category.entity_id$"},
        "CategoryIds": [{"entity_id": "11"}, {"entity_id": "12"}]
    }
}"#;

/// Counts how many times the persistence factory ran.
#[derive(Clone, Default)]
pub struct BindingCounter(Rc<Cell<usize>>);

impl BindingCounter {
    pub fn count(&self) -> usize {
        self.0.get()
    }

    /// A façade whose factory bumps this counter and builds a catalog-backed registry.
    pub fn facade(&self) -> EntityFacade {
        let counter = self.0.clone();
        EntityFacade::new(move || {
            counter.set(counter.get() + 1);
            Ok(Box::new(MemoryPersistence::from_json_str(CATALOG)?) as Box<dyn PersistencePort>)
        })
    }

    /// A context whose persistence factory bumps this counter.
    pub fn context(&self) -> TestContext {
        let counter = self.0.clone();
        TestContext::new(
            move || {
                counter.set(counter.get() + 1);
                Ok(Box::new(MemoryPersistence::from_json_str(CATALOG)?) as Box<dyn PersistencePort>)
            },
            || Ok(Box::new(MemoryCredentials::new().with_secret("admin/password", "123123q")) as Box<dyn CredentialPort>),
        )
    }
}
