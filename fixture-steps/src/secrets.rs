// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Secret Accessor
//!
//! Looks up secrets by name through its own lazily bound credential
//! collaborator. Secret values are never logged.

use tracing::debug;

use crate::binding::Binding;
use crate::error::{FixtureError, FixtureResult};
use crate::ports::CredentialPort;

/// Pass-through accessor for the credential collaborator.
#[derive(Debug)]
pub struct SecretAccessor {
    credentials: Binding<dyn CredentialPort>,
}

impl SecretAccessor {
    /// Create an accessor that builds its collaborator on first use.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> FixtureResult<Box<dyn CredentialPort>> + 'static,
    {
        Self {
            credentials: Binding::new("credentials", factory),
        }
    }

    /// Create an accessor around an existing collaborator.
    pub fn with_credentials(credentials: Box<dyn CredentialPort>) -> Self {
        Self {
            credentials: Binding::bound("credentials", credentials),
        }
    }

    /// Whether the collaborator has been constructed yet.
    pub fn is_bound(&self) -> bool {
        self.credentials.is_bound()
    }

    /// Resolve a secret by name.
    ///
    /// Lookup errors keep their variant; I/O, JSON, and untyped collaborator
    /// errors are reported as [`FixtureError::Secret`] naming the secret.
    pub fn get_secret(&self, name: &str) -> FixtureResult<Option<String>> {
        debug!("Resolving secret '{}'", name);
        self.credentials
            .get()?
            .get_secret(name)
            .map_err(|err| match err {
                FixtureError::Io(_) | FixtureError::Json(_) | FixtureError::Other(_) => {
                    FixtureError::secret(name, err.to_string())
                }
                other => other,
            })
    }
}
