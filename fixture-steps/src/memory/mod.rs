// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Reference collaborators.
//!
//! In-process implementations of the collaborator ports:
//! - [`MemoryPersistence`]: entity registry materialized from JSON templates
//! - [`FileCredentials`]: secrets read from a `name=value` credentials file
//! - [`MemoryCredentials`]: map-backed secrets, unknown names are absent

mod credentials;
mod persistence;

pub use credentials::{FileCredentials, MemoryCredentials};
pub use persistence::{Fields, MemoryPersistence, TemplateData};
