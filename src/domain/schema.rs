//! Presence-based argument rules derived from a tool's input schema
//!
//! Only `required`, `oneOf[].required` and `dependencies` are understood. Value
//! types, patterns and nested schemas are ignored.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Validation rules extracted once from an input schema document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SchemaRules {
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default, rename = "oneOf")]
    pub one_of: Vec<RequirementSet>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, Vec<String>>,
}

/// One alternative of a `oneOf` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RequirementSet {
    #[serde(default)]
    pub required: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field `{field}`")]
    MissingRequired { field: String },
    #[error("arguments must satisfy oneOf requirements")]
    OneOfUnsatisfied,
    #[error("field `{field}` requires `{dependent}`")]
    MissingDependency { field: String, dependent: String },
}

impl SchemaRules {
    /// Parses the rule subset out of a raw schema document.
    ///
    /// Fails when one of the understood keywords has the wrong shape, e.g.
    /// `required` that is not an array of strings.
    pub fn from_schema(schema: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(schema)
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.one_of.is_empty() && self.dependencies.is_empty()
    }

    /// Checks argument presence in order: required, oneOf, dependencies.
    /// The first failing check wins.
    pub fn validate(&self, arguments: &Map<String, Value>) -> Result<(), ValidationError> {
        if let Some(field) = self
            .required
            .iter()
            .find(|field| !arguments.contains_key(field.as_str()))
        {
            return Err(ValidationError::MissingRequired {
                field: field.clone(),
            });
        }

        if !self.one_of.is_empty() && !self.one_of.iter().any(|set| set.is_satisfied(arguments)) {
            return Err(ValidationError::OneOfUnsatisfied);
        }

        for (field, companions) in &self.dependencies {
            if !arguments.contains_key(field) {
                continue;
            }
            if let Some(dependent) = companions
                .iter()
                .find(|companion| !arguments.contains_key(companion.as_str()))
            {
                return Err(ValidationError::MissingDependency {
                    field: field.clone(),
                    dependent: dependent.clone(),
                });
            }
        }

        Ok(())
    }
}

impl RequirementSet {
    fn is_satisfied(&self, arguments: &Map<String, Value>) -> bool {
        self.required
            .iter()
            .all(|field| arguments.contains_key(field.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Map, Value};

    use super::{SchemaRules, ValidationError};

    fn rules(schema: Value) -> SchemaRules {
        SchemaRules::from_schema(&schema).expect("schema should parse")
    }

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("arguments object")
    }

    #[test]
    fn empty_rules_accept_anything() {
        let rules = rules(json!({"type": "object", "properties": {"x": {"type": "string"}}}));

        assert!(rules.is_empty());
        assert!(rules.validate(&args(json!({}))).is_ok());
        assert!(rules.validate(&args(json!({"x": 1, "y": null}))).is_ok());
    }

    #[test]
    fn required_field_must_be_present() {
        let rules = rules(json!({"required": ["token"]}));

        assert!(rules.validate(&args(json!({"token": "abc"}))).is_ok());
        // Presence only; the value is never inspected.
        assert!(rules.validate(&args(json!({"token": null}))).is_ok());

        let error = rules
            .validate(&args(json!({"other": 1})))
            .expect_err("missing token must fail");
        assert_eq!(
            error,
            ValidationError::MissingRequired {
                field: "token".to_string()
            }
        );
        let message = error.to_string();
        assert!(message.contains("missing required field"));
        assert!(message.contains("token"));
    }

    #[test]
    fn one_of_accepts_either_or_both_alternatives() {
        let rules = rules(json!({"oneOf": [{"required": ["phone"]}, {"required": ["email"]}]}));

        assert!(rules.validate(&args(json!({"phone": "+1555"}))).is_ok());
        assert!(rules.validate(&args(json!({"email": "a@b.c"}))).is_ok());
        assert!(rules
            .validate(&args(json!({"phone": "+1555", "email": "a@b.c"})))
            .is_ok());

        let error = rules
            .validate(&args(json!({})))
            .expect_err("neither alternative present");
        assert_eq!(error, ValidationError::OneOfUnsatisfied);
        assert_eq!(error.to_string(), "arguments must satisfy oneOf requirements");
    }

    #[test]
    fn one_of_gives_no_partial_credit() {
        let rules = rules(json!({"oneOf": [{"required": ["lat", "lon"]}, {"required": ["address"]}]}));

        assert!(rules.validate(&args(json!({"lat": 1.0}))).is_err());
        assert!(rules.validate(&args(json!({"lat": 1.0, "lon": 2.0}))).is_ok());
    }

    #[test]
    fn dependencies_trigger_only_when_key_present() {
        let rules = rules(json!({"dependencies": {"a": ["b"]}}));

        assert!(rules.validate(&args(json!({}))).is_ok());
        assert!(rules.validate(&args(json!({"b": 1}))).is_ok());
        assert!(rules.validate(&args(json!({"a": 1, "b": 2}))).is_ok());

        let error = rules
            .validate(&args(json!({"a": 1})))
            .expect_err("a without b must fail");
        assert_eq!(error.to_string(), "field `a` requires `b`");
    }

    #[test]
    fn dependency_failure_names_first_missing_companion() {
        let rules = rules(json!({"dependencies": {"geo_lat": ["geo_lon", "geo_radius"]}}));

        let error = rules
            .validate(&args(json!({"geo_lat": 1.0, "geo_radius": 5})))
            .expect_err("geo_lon missing");
        assert_eq!(
            error,
            ValidationError::MissingDependency {
                field: "geo_lat".to_string(),
                dependent: "geo_lon".to_string()
            }
        );
    }

    #[test]
    fn required_is_checked_before_one_of() {
        let rules = rules(json!({
            "required": ["code"],
            "oneOf": [{"required": ["phone", "code"]}, {"required": ["email", "code"]}]
        }));

        assert!(rules
            .validate(&args(json!({"code": "123456", "phone": "+1555"})))
            .is_ok());

        let error = rules
            .validate(&args(json!({"phone": "+1555"})))
            .expect_err("code is unconditionally required");
        assert!(matches!(error, ValidationError::MissingRequired { .. }));
    }

    #[test]
    fn malformed_keywords_are_rejected() {
        assert!(SchemaRules::from_schema(&json!({"required": "token"})).is_err());
        assert!(SchemaRules::from_schema(&json!({"oneOf": {"required": ["a"]}})).is_err());
        assert!(SchemaRules::from_schema(&json!({"dependencies": {"a": "b"}})).is_err());
        assert!(SchemaRules::from_schema(&json!("not an object")).is_err());
    }
}
