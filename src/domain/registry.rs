//! Read-only, name-indexed registry of declared tools and resources

use std::collections::HashMap;

use crate::domain::{resources::ResourceDefinition, tools::ToolDefinition};
use crate::errors::LoadError;

#[derive(Debug, Clone, Default)]
pub struct Registry {
    tools: Vec<ToolDefinition>,
    tool_index: HashMap<String, usize>,
    resources: Vec<ResourceDefinition>,
    resource_index: HashMap<String, usize>,
}

impl Registry {
    /// Indexes definitions by name, keeping declaration order for listings.
    /// Names must be unique within each kind.
    pub fn new(
        tools: Vec<ToolDefinition>,
        resources: Vec<ResourceDefinition>,
    ) -> Result<Self, LoadError> {
        let mut tool_index = HashMap::with_capacity(tools.len());
        for (position, tool) in tools.iter().enumerate() {
            if tool_index.insert(tool.name().to_string(), position).is_some() {
                return Err(LoadError::DuplicateTool(tool.name().to_string()));
            }
        }

        let mut resource_index = HashMap::with_capacity(resources.len());
        for (position, resource) in resources.iter().enumerate() {
            if resource_index
                .insert(resource.name.clone(), position)
                .is_some()
            {
                return Err(LoadError::DuplicateResource(resource.name.clone()));
            }
        }

        Ok(Self {
            tools,
            tool_index,
            resources,
            resource_index,
        })
    }

    pub fn tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tool_index.get(name).map(|&position| &self.tools[position])
    }

    pub fn resource(&self, name: &str) -> Option<&ResourceDefinition> {
        self.resource_index
            .get(name)
            .map(|&position| &self.resources[position])
    }

    // Linear scan; URIs are not indexed.
    pub fn resource_by_uri(&self, uri: &str) -> Option<&ResourceDefinition> {
        self.resources.iter().find(|resource| resource.uri == uri)
    }

    pub fn tools(&self) -> &[ToolDefinition] {
        &self.tools
    }

    pub fn resources(&self) -> &[ResourceDefinition] {
        &self.resources
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::Registry;
    use crate::domain::{resources::ResourceDefinition, tools::ToolDefinition};
    use crate::errors::LoadError;

    fn tool(name: &str) -> ToolDefinition {
        ToolDefinition::new(name, "d", json!({"type": "object"})).expect("tool")
    }

    fn resource(name: &str, uri: &str) -> ResourceDefinition {
        ResourceDefinition::new(name, "d", uri, "text/csv")
    }

    #[test]
    fn looks_up_by_name_and_keeps_order() {
        let registry = Registry::new(
            vec![tool("b"), tool("a")],
            vec![resource("data", "file:///data.csv")],
        )
        .expect("registry");

        assert_eq!(registry.tool("a").map(ToolDefinition::name), Some("a"));
        assert!(registry.tool("missing").is_none());
        let names: Vec<_> = registry.tools().iter().map(ToolDefinition::name).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn name_and_uri_resolve_to_same_resource() {
        let registry = Registry::new(
            vec![],
            vec![
                resource("first", "file:///first.csv"),
                resource("second", "file:///second.csv"),
            ],
        )
        .expect("registry");

        let by_name = registry.resource("second").expect("by name");
        let by_uri = registry.resource_by_uri("file:///second.csv").expect("by uri");
        assert!(std::ptr::eq(by_name, by_uri));
        assert!(registry.resource_by_uri("file:///other.csv").is_none());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let error = Registry::new(vec![tool("echo"), tool("echo")], vec![])
            .expect_err("duplicate tool");
        assert!(matches!(error, LoadError::DuplicateTool(ref name) if name == "echo"));

        let error = Registry::new(
            vec![],
            vec![resource("r", "file:///1"), resource("r", "file:///2")],
        )
        .expect_err("duplicate resource");
        assert!(matches!(error, LoadError::DuplicateResource(_)));
    }
}
