// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Named steps.
//!
//! Each operation exposed to test scripts as a named action with keyword
//! arguments. Steps deserialize from JSON objects tagged by `action`:
//!
//! ```json
//! {"action": "createData", "key": "customer", "scope": "test", "template": "Customer"}
//! {"action": "assertArrayIsSorted", "values": ["b", "a"], "sortOrder": "desc"}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ordering::{OrderedValue, SortDirection, SortReport};
use crate::ports::{CreateEntity, GetEntity, UpdateEntity};

/// One invocation of a fixture or assertion operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Step {
    /// Create an entity from a template.
    CreateData(CreateEntity),
    /// Update a created entity.
    UpdateData(UpdateEntity),
    /// Fetch an entity and record it.
    GetData(GetEntity),
    /// Delete a recorded entity.
    DeleteData { key: String, scope: String },
    /// Read one field of a recorded entity.
    #[serde(rename_all = "camelCase")]
    RetrieveField {
        #[serde(alias = "key")]
        step_key: String,
        field: String,
        scope: String,
    },
    /// Resolve a secret.
    GetSecret { name: String },
    /// Assert that values are sorted.
    #[serde(rename_all = "camelCase")]
    AssertArrayIsSorted {
        values: Vec<OrderedValue>,
        #[serde(default)]
        sort_order: SortDirection,
    },
}

impl Step {
    pub fn delete(key: impl Into<String>, scope: impl Into<String>) -> Self {
        Step::DeleteData {
            key: key.into(),
            scope: scope.into(),
        }
    }

    pub fn retrieve_field(
        step_key: impl Into<String>,
        field: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Step::RetrieveField {
            step_key: step_key.into(),
            field: field.into(),
            scope: scope.into(),
        }
    }

    pub fn get_secret(name: impl Into<String>) -> Self {
        Step::GetSecret { name: name.into() }
    }

    pub fn assert_sorted<I, V>(values: I, sort_order: SortDirection) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<OrderedValue>,
    {
        Step::AssertArrayIsSorted {
            values: values.into_iter().map(Into::into).collect(),
            sort_order,
        }
    }

    /// Action name as written in scripts.
    pub fn name(&self) -> &'static str {
        match self {
            Step::CreateData(_) => "createData",
            Step::UpdateData(_) => "updateData",
            Step::GetData(_) => "getData",
            Step::DeleteData { .. } => "deleteData",
            Step::RetrieveField { .. } => "retrieveField",
            Step::GetSecret { .. } => "getSecret",
            Step::AssertArrayIsSorted { .. } => "assertArrayIsSorted",
        }
    }
}

/// Result of a successful step.
#[derive(Clone, PartialEq)]
pub enum StepOutcome {
    /// The step has no result value.
    Done,
    /// A retrieved field value.
    Value(String),
    /// A resolved secret.
    Secret(Option<String>),
    /// A passing order check.
    Sorted(SortReport),
}

// Secrets are redacted so outcomes can be logged.
impl fmt::Debug for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::Done => write!(f, "Done"),
            StepOutcome::Value(value) => f.debug_tuple("Value").field(value).finish(),
            StepOutcome::Secret(Some(_)) => write!(f, "Secret(<redacted>)"),
            StepOutcome::Secret(None) => write!(f, "Secret(None)"),
            StepOutcome::Sorted(report) => f.debug_tuple("Sorted").field(report).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_create_step() {
        let step: Step = serde_json::from_str(
            r#"{"action": "createData", "key": "product", "scope": "test",
                "template": "SimpleProduct", "dependentKeys": ["category"]}"#,
        )
        .unwrap();

        assert_eq!(
            step,
            Step::CreateData(CreateEntity::new("product", "test", "SimpleProduct").depends_on("category"))
        );
        assert_eq!(step.name(), "createData");
    }

    #[test]
    fn test_deserialize_get_step_with_index() {
        let step: Step = serde_json::from_str(
            r#"{"action": "getData", "key": "order", "scope": "hook", "template": "Orders", "index": 1}"#,
        )
        .unwrap();

        assert_eq!(step, Step::GetData(GetEntity::new("order", "hook", "Orders").at_index(1)));
    }

    #[test]
    fn test_deserialize_retrieve_field_accepts_key_alias() {
        let expected = Step::retrieve_field("customer", "email", "test");

        let step: Step = serde_json::from_str(
            r#"{"action": "retrieveField", "stepKey": "customer", "field": "email", "scope": "test"}"#,
        )
        .unwrap();
        assert_eq!(step, expected);

        let step: Step = serde_json::from_str(
            r#"{"action": "retrieveField", "key": "customer", "field": "email", "scope": "test"}"#,
        )
        .unwrap();
        assert_eq!(step, expected);
    }

    #[test]
    fn test_sort_order_defaults_to_ascending() {
        let step: Step =
            serde_json::from_str(r#"{"action": "assertArrayIsSorted", "values": [1, "2", 3]}"#).unwrap();

        match step {
            Step::AssertArrayIsSorted { values, sort_order } => {
                assert_eq!(values.len(), 3);
                assert_eq!(sort_order, SortDirection::Ascending);
            }
            other => panic!("unexpected step {:?}", other),
        }
    }

    #[test]
    fn test_unknown_action_rejected() {
        assert!(serde_json::from_str::<Step>(r#"{"action": "launchRocket"}"#).is_err());
    }

    #[test]
    fn test_secret_outcome_is_redacted() {
        let outcome = StepOutcome::Secret(Some("hunter2".to_string()));
        assert_eq!(format!("{:?}", outcome), "Secret(<redacted>)");
    }
}
