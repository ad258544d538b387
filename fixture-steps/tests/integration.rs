// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for the entity façade, secret accessor, and script runner.

mod common;

use std::io::Write;

use common::{BindingCounter, CATALOG};
use fixture_steps::prelude::*;
use tempfile::TempDir;

// ============================================================
// Façade lifecycle
// ============================================================

#[test]
fn test_create_get_retrieve_round_trip() {
    let counter = BindingCounter::default();
    let facade = counter.facade();

    facade.create(&CreateEntity::new("k1", "s", "T")).unwrap();
    facade.get(&GetEntity::new("k1", "s", "T")).unwrap();

    assert_eq!(
        facade.retrieve_field("k1", "some_field", "s").unwrap(),
        "recorded-value"
    );
}

#[test]
fn test_delete_then_retrieve_is_lookup_failure() {
    let facade = BindingCounter::default().facade();

    facade.create(&CreateEntity::new("k1", "s", "T")).unwrap();
    facade.delete("k1", "s").unwrap();

    let err = facade.retrieve_field("k1", "some_field", "s").unwrap_err();
    assert!(matches!(err, FixtureError::EntityNotFound { ref key, ref scope } if key == "k1" && scope == "s"));
}

#[test]
fn test_update_after_create() {
    let facade = BindingCounter::default().facade();

    facade.create(&CreateEntity::new("k1", "test", "T")).unwrap();
    facade.update(&UpdateEntity::new("k1", "test", "TRename")).unwrap();

    assert_eq!(facade.retrieve_field("k1", "name", "test").unwrap(), "Renamed");
    assert_eq!(
        facade.retrieve_field("k1", "some_field", "test").unwrap(),
        "recorded-value"
    );
}

#[test]
fn test_dependent_entities_feed_templates() {
    let facade = BindingCounter::default().facade();

    facade
        .get(&GetEntity::new("category", "suite", "CategoryIds").at_index(1))
        .unwrap();
    facade
        .create(&CreateEntity::new("product", "test", "Product").depends_on("category"))
        .unwrap();

    assert_eq!(facade.retrieve_field("product", "category_id", "test").unwrap(), "12");
}

#[test]
fn test_same_key_in_different_scopes_is_independent() {
    let facade = BindingCounter::default().facade();

    facade
        .create(&CreateEntity::new("k1", "test", "T").with_field("name", "in test"))
        .unwrap();
    facade
        .create(&CreateEntity::new("k1", "hook", "T").with_field("name", "in hook"))
        .unwrap();
    facade.delete("k1", "test").unwrap();

    assert_eq!(facade.retrieve_field("k1", "name", "hook").unwrap(), "in hook");
    assert!(facade.retrieve_field("k1", "name", "test").is_err());
}

// ============================================================
// Binding reuse
// ============================================================

#[test]
fn test_all_operations_share_one_binding() {
    let counter = BindingCounter::default();
    let facade = counter.facade();
    assert_eq!(counter.count(), 0);

    facade.create(&CreateEntity::new("k1", "s", "T")).unwrap();
    facade.update(&UpdateEntity::new("k1", "s", "TRename")).unwrap();
    facade.get(&GetEntity::new("k2", "s", "T")).unwrap();
    facade.retrieve_field("k1", "name", "s").unwrap();
    facade.delete("k1", "s").unwrap();
    let _ = facade.retrieve_field("k1", "name", "s");

    assert_eq!(counter.count(), 1);
}

#[test]
fn test_failed_operations_do_not_rebind() {
    let counter = BindingCounter::default();
    let facade = counter.facade();

    assert!(facade.delete("missing", "s").is_err());
    assert!(facade.create(&CreateEntity::new("k", "s", "Unknown")).is_err());
    assert!(facade.retrieve_field("missing", "f", "s").is_err());

    assert_eq!(counter.count(), 1);
}

#[test]
fn test_contexts_do_not_share_bindings() {
    let counter = BindingCounter::default();
    let first = counter.context();
    let second = counter.context();

    first.run_step(&Step::CreateData(CreateEntity::new("k1", "s", "T"))).unwrap();
    second.run_step(&Step::CreateData(CreateEntity::new("k1", "s", "T"))).unwrap();

    assert_eq!(counter.count(), 2);
    assert!(first.facade().retrieve_field("k1", "name", "s").is_ok());
}

// ============================================================
// Secrets
// ============================================================

#[test]
fn test_secret_binding_is_independent_of_persistence() {
    let counter = BindingCounter::default();
    let ctx = counter.context();

    assert_eq!(
        ctx.secrets().get_secret("admin/password").unwrap(),
        Some("123123q".to_string())
    );
    assert!(ctx.secrets().is_bound());
    assert!(!ctx.facade().is_bound());
    assert_eq!(counter.count(), 0);
}

#[test]
fn test_credentials_file_errors_name_the_secret() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".credentials");
    std::fs::write(&path, "magento/tfa/OTP_SHARED_SECRET=ABCDEFGH\n").unwrap();

    let ctx = TestContext::from_config(&FixtureConfig::default().with_credentials(&path));

    assert_eq!(
        ctx.run_step(&Step::get_secret("magento/tfa/OTP_SHARED_SECRET")).unwrap(),
        StepOutcome::Secret(Some("ABCDEFGH".to_string()))
    );

    let err = ctx.secrets().get_secret("magento/unknown").unwrap_err();
    assert!(err.to_string().contains("magento/unknown"));
}

// ============================================================
// Scripts
// ============================================================

#[test]
fn test_script_from_file_runs_full_lifecycle() {
    let dir = TempDir::new().unwrap();

    let templates = dir.path().join("templates.json");
    std::fs::write(&templates, CATALOG).unwrap();

    let script_path = dir.path().join("script.json");
    let mut file = std::fs::File::create(&script_path).unwrap();
    write!(
        file,
        r#"{{
            "name": "category lifecycle",
            "steps": [
                {{"action": "createData", "key": "category", "scope": "test", "template": "Category",
                  "overrideFields": {{"name": "Boots"}}}},
                {{"action": "retrieveField", "stepKey": "category", "field": "name", "scope": "test"}},
                {{"action": "assertArrayIsSorted", "values": ["Jan 5, 2020", "Dec 1, 2019"], "sortOrder": "asc"}},
                {{"action": "assertArrayIsSorted", "values": [10, 5, 5, 1], "sortOrder": "desc"}},
                {{"action": "deleteData", "key": "category", "scope": "test"}}
            ]
        }}"#
    )
    .unwrap();

    let config = FixtureConfig::default().with_templates(&templates).with_store_code("default");
    let ctx = TestContext::from_config(&config);
    let script = TestScript::from_path(&script_path).unwrap();
    let report = script.run(&ctx).unwrap();

    assert_eq!(report.executed(), 5);
    assert_eq!(report.value("category", "name", "test"), Some("Boots"));
    assert_eq!(report.failures().len(), 1);
    assert_eq!(report.failures()[0].index, 2);
    assert!(report.failures()[0]
        .message
        .contains("Array of dates converted to unix timestamp for comparison"));
}

#[test]
fn test_script_aborts_on_date_parse_failure() {
    let ctx = BindingCounter::default().context();
    let script = TestScript::new("bad dates")
        .step(Step::assert_sorted(["2020-01-01", "someday"], SortDirection::Ascending))
        .step(Step::get_secret("admin/password"));

    let err = script.run(&ctx).unwrap_err();
    assert!(matches!(err, FixtureError::DateParse { index: 1, .. }));
    assert!(!ctx.secrets().is_bound());
}
