//! Resource definitions exposed via `resources/list` and read via `resources/read`

use serde::{Deserialize, Serialize};

use crate::errors::LoadError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDefinition {
    pub name: String,
    pub description: String,
    pub uri: String,
    pub mime_type: String,
}

impl ResourceDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        uri: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            uri: uri.into(),
            mime_type: mime_type.into(),
        }
    }

    pub(crate) fn check(&self) -> Result<(), LoadError> {
        if self.name.trim().is_empty() {
            return Err(LoadError::EmptyName { kind: "resource" });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::ResourceDefinition;

    #[test]
    fn uses_camel_case_mime_type() {
        let resource = ResourceDefinition::new(
            "forecast",
            "monthly forecast",
            "s3://bucket/forecast.csv",
            "text/csv",
        );

        let value = serde_json::to_value(&resource).expect("serialize resource");
        assert_eq!(value["mimeType"], json!("text/csv"));
        assert!(value.get("mime_type").is_none());
    }

    #[test]
    fn blank_name_fails_check() {
        let resource = ResourceDefinition::new("", "d", "file:///x", "text/plain");
        assert!(resource.check().is_err());
    }
}
