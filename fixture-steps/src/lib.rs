// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Assertion and fixture-lifecycle steps for declarative functional tests
//!
//! This crate provides the helpers a functional test script calls between
//! browser actions: an order assertion that understands numbers, text, and
//! dates, and a façade for creating and tearing down fixture entities
//! through an external persistence collaborator.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  TestScript (steps in order)                │
//! ├─────────────────────────────────────────────────────────────┤
//! │                  TestContext (one per run)                  │
//! │  ┌──────────────────┐ ┌──────────────┐ ┌─────────────────┐  │
//! │  │  EntityFacade    │ │ SecretAccess │ │ Order verifier  │  │
//! │  │  (lazy binding)  │ │ (lazy bind.) │ │ (pure)          │  │
//! │  └────────┬─────────┘ └──────┬───────┘ └─────────────────┘  │
//! └───────────┼──────────────────┼──────────────────────────────┘
//!             ▼                  ▼
//!      PersistencePort     CredentialPort
//! ```
//!
//! # Example
//!
//! ```ignore
//! use fixture_steps::prelude::*;
//!
//! let ctx = TestContext::from_config(&FixtureConfig::from_env());
//!
//! let report = TestScript::new("admin grid sorting")
//!     .step(Step::CreateData(CreateEntity::new("customer", "test", "Customer")))
//!     .step(Step::assert_sorted(["2020-01-01", "2021-06-01"], SortDirection::Ascending))
//!     .step(Step::delete("customer", "test"))
//!     .run(&ctx)?;
//!
//! assert!(report.passed());
//! ```

pub mod binding;
pub mod config;
pub mod context;
pub mod error;
pub mod facade;
pub mod logging;
pub mod memory;
pub mod ordering;
pub mod ports;
pub mod script;
pub mod secrets;
pub mod step;

pub mod prelude {
    //! Re-exports commonly used types for convenience.
    pub use crate::config::FixtureConfig;
    pub use crate::context::TestContext;
    pub use crate::error::{FixtureError, FixtureResult};
    pub use crate::facade::EntityFacade;
    pub use crate::memory::{FileCredentials, MemoryCredentials, MemoryPersistence};
    pub use crate::ordering::{assert_sorted, verify_sorted, OrderedValue, SortDirection, SortReport};
    pub use crate::ports::{CreateEntity, CredentialPort, GetEntity, PersistencePort, UpdateEntity};
    pub use crate::script::{ScriptReport, TestScript};
    pub use crate::secrets::SecretAccessor;
    pub use crate::step::{Step, StepOutcome};
}
