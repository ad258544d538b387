// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Test run configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Environment variable naming the JSON template catalog.
pub const TEMPLATES_ENV: &str = "FIXTURE_TEMPLATES";

/// Environment variable naming the credentials file.
pub const CREDENTIALS_ENV: &str = "FIXTURE_CREDENTIALS";

/// Environment variable holding the default store code.
pub const STORE_CODE_ENV: &str = "FIXTURE_STORE_CODE";

/// Where a test run's collaborators get their data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FixtureConfig {
    /// JSON template catalog for the persistence collaborator.
    pub templates_path: Option<PathBuf>,
    /// `name=value` credentials file for the credential collaborator.
    pub credentials_path: Option<PathBuf>,
    /// Store code applied to create/get steps that omit one.
    pub default_store_code: String,
}

impl FixtureConfig {
    /// Read configuration from the environment.
    ///
    /// Empty variables count as unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        Self {
            templates_path: var(TEMPLATES_ENV).map(PathBuf::from),
            credentials_path: var(CREDENTIALS_ENV).map(PathBuf::from),
            default_store_code: var(STORE_CODE_ENV).unwrap_or_default(),
        }
    }

    /// Set the template catalog path.
    pub fn with_templates(mut self, path: impl Into<PathBuf>) -> Self {
        self.templates_path = Some(path.into());
        self
    }

    /// Set the credentials file path.
    pub fn with_credentials(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = Some(path.into());
        self
    }

    /// Set the default store code.
    pub fn with_store_code(mut self, store_code: impl Into<String>) -> Self {
        self.default_store_code = store_code.into();
        self
    }
}
