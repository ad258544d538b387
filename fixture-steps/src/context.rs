// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-run test context.
//!
//! Owns the entity façade and the secret accessor for one test run. Each
//! collaborator is constructed on first use and reused until the context is
//! dropped; separate contexts never share collaborators.

use tracing::info;

use crate::config::FixtureConfig;
use crate::error::FixtureResult;
use crate::facade::EntityFacade;
use crate::memory::{FileCredentials, MemoryCredentials, MemoryPersistence};
use crate::ordering;
use crate::ports::{CredentialPort, PersistencePort};
use crate::secrets::SecretAccessor;
use crate::step::{Step, StepOutcome};

/// Everything a step needs during one test run.
#[derive(Debug)]
pub struct TestContext {
    facade: EntityFacade,
    secrets: SecretAccessor,
    default_store_code: String,
}

impl TestContext {
    /// Create a context whose collaborators are built by the given factories on first use.
    pub fn new<P, C>(persistence: P, credentials: C) -> Self
    where
        P: Fn() -> FixtureResult<Box<dyn PersistencePort>> + 'static,
        C: Fn() -> FixtureResult<Box<dyn CredentialPort>> + 'static,
    {
        Self {
            facade: EntityFacade::new(persistence),
            secrets: SecretAccessor::new(credentials),
            default_store_code: String::new(),
        }
    }

    /// Create a context around existing collaborators.
    pub fn with_collaborators(
        persistence: Box<dyn PersistencePort>,
        credentials: Box<dyn CredentialPort>,
    ) -> Self {
        Self {
            facade: EntityFacade::with_persistence(persistence),
            secrets: SecretAccessor::with_credentials(credentials),
            default_store_code: String::new(),
        }
    }

    /// Create a context backed by the reference collaborators.
    ///
    /// Files named by the configuration are read on first use, not here.
    pub fn from_config(config: &FixtureConfig) -> Self {
        let templates = config.templates_path.clone();
        let credentials = config.credentials_path.clone();

        info!(
            "Creating test context (templates: {:?}, credentials: {:?})",
            templates, credentials
        );

        Self::new(
            move || {
                let persistence = match &templates {
                    Some(path) => MemoryPersistence::from_path(path)?,
                    None => MemoryPersistence::new(),
                };
                Ok(Box::new(persistence) as Box<dyn PersistencePort>)
            },
            move || {
                let store: Box<dyn CredentialPort> = match &credentials {
                    Some(path) => Box::new(FileCredentials::from_path(path)?),
                    None => Box::new(MemoryCredentials::new()),
                };
                Ok(store)
            },
        )
        .with_default_store_code(config.default_store_code.clone())
    }

    /// Store code applied to create/get steps that omit one.
    pub fn with_default_store_code(mut self, store_code: impl Into<String>) -> Self {
        self.default_store_code = store_code.into();
        self
    }

    pub fn facade(&self) -> &EntityFacade {
        &self.facade
    }

    pub fn secrets(&self) -> &SecretAccessor {
        &self.secrets
    }

    /// Execute one step.
    ///
    /// An unsorted `assertArrayIsSorted` yields an assertion error; every
    /// other error comes from the step's collaborator unchanged.
    pub fn run_step(&self, step: &Step) -> FixtureResult<StepOutcome> {
        match step {
            Step::CreateData(request) if request.store_code.is_empty() => {
                let mut request = request.clone();
                request.store_code = self.default_store_code.clone();
                self.facade.create(&request)?;
                Ok(StepOutcome::Done)
            }
            Step::CreateData(request) => {
                self.facade.create(request)?;
                Ok(StepOutcome::Done)
            }
            Step::UpdateData(request) => {
                self.facade.update(request)?;
                Ok(StepOutcome::Done)
            }
            Step::GetData(request) if request.store_code.is_empty() => {
                let mut request = request.clone();
                request.store_code = self.default_store_code.clone();
                self.facade.get(&request)?;
                Ok(StepOutcome::Done)
            }
            Step::GetData(request) => {
                self.facade.get(request)?;
                Ok(StepOutcome::Done)
            }
            Step::DeleteData { key, scope } => {
                self.facade.delete(key, scope)?;
                Ok(StepOutcome::Done)
            }
            Step::RetrieveField {
                step_key,
                field,
                scope,
            } => self
                .facade
                .retrieve_field(step_key, field, scope)
                .map(StepOutcome::Value),
            Step::GetSecret { name } => self.secrets.get_secret(name).map(StepOutcome::Secret),
            Step::AssertArrayIsSorted { values, sort_order } => {
                let report = ordering::verify_sorted(values, *sort_order)?;
                report.clone().into_result()?;
                Ok(StepOutcome::Sorted(report))
            }
        }
    }
}
