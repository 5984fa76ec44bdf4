//! Tool definitions exposed via `tools/list` and invoked via `tools/call`

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::schema::SchemaRules;
use crate::errors::LoadError;

/// A declared tool. Immutable once built; the rule set is derived from
/// `input_schema` at construction and never sent to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    name: String,
    description: String,
    input_schema: Value,
    #[serde(skip)]
    rules: SchemaRules,
}

/// Wire shape of a tool entry in a definitions document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ToolDocument {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
    ) -> Result<Self, LoadError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(LoadError::EmptyName { kind: "tool" });
        }

        let rules = SchemaRules::from_schema(&input_schema).map_err(|source| {
            LoadError::Schema {
                tool: name.clone(),
                source,
            }
        })?;

        Ok(Self {
            name,
            description: description.into(),
            input_schema,
            rules,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn input_schema(&self) -> &Value {
        &self.input_schema
    }

    pub fn rules(&self) -> &SchemaRules {
        &self.rules
    }
}

impl TryFrom<ToolDocument> for ToolDefinition {
    type Error = LoadError;

    fn try_from(document: ToolDocument) -> Result<Self, Self::Error> {
        Self::new(document.name, document.description, document.input_schema)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::ToolDefinition;
    use crate::errors::LoadError;

    #[test]
    fn derives_rules_from_schema() {
        let tool = ToolDefinition::new(
            "otp-request",
            "request a one-time code",
            json!({
                "type": "object",
                "properties": {"phone": {"type": "string"}, "email": {"type": "string"}},
                "oneOf": [{"required": ["phone"]}, {"required": ["email"]}]
            }),
        )
        .expect("tool should build");

        assert_eq!(tool.name(), "otp-request");
        assert_eq!(tool.rules().one_of.len(), 2);
        assert!(tool.rules().required.is_empty());
    }

    #[test]
    fn serializes_without_rules() {
        let tool = ToolDefinition::new(
            "echo",
            "echoes",
            json!({"type": "object", "required": ["msg"]}),
        )
        .expect("tool should build");

        let value = serde_json::to_value(&tool).expect("serialize tool");
        assert_eq!(
            value,
            json!({
                "name": "echo",
                "description": "echoes",
                "inputSchema": {"type": "object", "required": ["msg"]}
            })
        );
    }

    #[test]
    fn malformed_schema_names_the_tool() {
        let error = ToolDefinition::new("broken", "d", json!({"required": [1, 2]}))
            .expect_err("numeric required entries are malformed");

        assert!(matches!(error, LoadError::Schema { ref tool, .. } if tool == "broken"));
        assert!(error.to_string().contains("broken"));
    }

    #[test]
    fn empty_name_is_rejected() {
        let error = ToolDefinition::new("  ", "d", json!({})).expect_err("blank name");
        assert!(matches!(error, LoadError::EmptyName { kind: "tool" }));
    }
}
