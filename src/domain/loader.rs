//! JSON loading of tool and resource definitions from disk or raw bytes

use std::path::Path;

use crate::domain::{
    resources::ResourceDefinition,
    tools::{ToolDefinition, ToolDocument},
};
use crate::errors::LoadError;

const TOOLS_JSON_SOURCE: &str = "tools JSON";
const RESOURCES_JSON_SOURCE: &str = "resources JSON";

pub fn load_tools(path: impl AsRef<Path>) -> Result<Vec<ToolDefinition>, LoadError> {
    let path = path.as_ref();
    let data = read_source(path)?;
    parse_tools_from(&data, &path.display().to_string())
}

/// Parses a JSON array of `{name, description, inputSchema}` entries.
pub fn parse_tools(data: &[u8]) -> Result<Vec<ToolDefinition>, LoadError> {
    parse_tools_from(data, TOOLS_JSON_SOURCE)
}

pub fn load_resources(path: impl AsRef<Path>) -> Result<Vec<ResourceDefinition>, LoadError> {
    let path = path.as_ref();
    let data = read_source(path)?;
    parse_resources_from(&data, &path.display().to_string())
}

/// Parses a JSON array of `{name, description, uri, mimeType}` entries.
pub fn parse_resources(data: &[u8]) -> Result<Vec<ResourceDefinition>, LoadError> {
    parse_resources_from(data, RESOURCES_JSON_SOURCE)
}

fn read_source(path: &Path) -> Result<Vec<u8>, LoadError> {
    std::fs::read(path).map_err(|source| LoadError::Io {
        source_name: path.display().to_string(),
        source,
    })
}

fn parse_tools_from(data: &[u8], source_name: &str) -> Result<Vec<ToolDefinition>, LoadError> {
    let documents: Vec<ToolDocument> =
        serde_json::from_slice(data).map_err(|source| LoadError::Json {
            source_name: source_name.to_string(),
            source,
        })?;

    documents.into_iter().map(ToolDefinition::try_from).collect()
}

fn parse_resources_from(
    data: &[u8],
    source_name: &str,
) -> Result<Vec<ResourceDefinition>, LoadError> {
    let resources: Vec<ResourceDefinition> =
        serde_json::from_slice(data).map_err(|source| LoadError::Json {
            source_name: source_name.to_string(),
            source,
        })?;

    for resource in &resources {
        resource.check()?;
    }
    Ok(resources)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{load_resources, load_tools, parse_resources, parse_tools};
    use crate::errors::LoadError;

    const TOOLS: &str = r#"[
        {"name":"echo","description":"echoes","inputSchema":{"type":"object","properties":{"msg":{"type":"string"}},"required":["msg"]}},
        {"name":"channel-put","description":"ch","inputSchema":{"type":"object","properties":{},"dependencies":{"geo_lat":["geo_lon"]}}}
    ]"#;

    #[test]
    fn parses_tools_with_rules() {
        let tools = parse_tools(TOOLS.as_bytes()).expect("tools should parse");

        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0].name(), "echo");
        assert_eq!(tools[0].rules().required, vec!["msg".to_string()]);
        assert!(tools[1].rules().dependencies.contains_key("geo_lat"));
    }

    #[test]
    fn parses_resources() {
        let resources = parse_resources(
            br#"[{"name":"forecast","description":"monthly","uri":"s3://bucket/file.csv","mimeType":"text/csv"}]"#,
        )
        .expect("resources should parse");

        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].uri, "s3://bucket/file.csv");
        assert_eq!(resources[0].mime_type, "text/csv");
    }

    #[test]
    fn malformed_json_names_the_source() {
        let error = parse_tools(b"{not valid json").expect_err("invalid json");

        assert!(matches!(error, LoadError::Json { .. }));
        assert!(error.to_string().contains("tools JSON"));
    }

    #[test]
    fn tool_without_input_schema_is_rejected() {
        let error = parse_tools(br#"[{"name":"t","description":"d"}]"#)
            .expect_err("inputSchema is mandatory");
        assert!(matches!(error, LoadError::Json { .. }));
    }

    #[test]
    fn resource_missing_uri_is_rejected() {
        let error = parse_resources(br#"[{"name":"r","description":"d","mimeType":"text/csv"}]"#)
            .expect_err("uri is mandatory");
        assert!(error.to_string().contains("resources JSON"));
    }

    #[test]
    fn malformed_schema_fails_whole_load() {
        let error = parse_tools(
            br#"[{"name":"otp","description":"d","inputSchema":{"oneOf":[{"required":"phone"}]}}]"#,
        )
        .expect_err("oneOf required must be an array");
        assert!(matches!(error, LoadError::Schema { ref tool, .. } if tool == "otp"));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().expect("temp dir");
        let tools_path = dir.path().join("tools.json");
        let resources_path = dir.path().join("resources.json");
        fs::write(&tools_path, TOOLS).expect("write tools");
        fs::write(
            &resources_path,
            r#"[{"name":"test-data","description":"test resource","uri":"file:///test.csv","mimeType":"text/csv"}]"#,
        )
        .expect("write resources");

        assert_eq!(load_tools(&tools_path).expect("load tools").len(), 2);
        assert_eq!(
            load_resources(&resources_path).expect("load resources")[0].name,
            "test-data"
        );
    }

    #[test]
    fn missing_file_names_the_path() {
        let error = load_tools("/nonexistent/tools.json").expect_err("file does not exist");

        assert!(matches!(error, LoadError::Io { .. }));
        assert!(error.to_string().contains("/nonexistent/tools.json"));
    }

    #[test]
    fn bundled_definitions_load() {
        let manifest = env!("CARGO_MANIFEST_DIR");
        let tools = load_tools(format!("{manifest}/config/tools.json")).expect("bundled tools");
        let resources = load_resources(format!("{manifest}/config/resources.json"))
            .expect("bundled resources");

        assert!(tools.iter().any(|tool| !tool.rules().one_of.is_empty()));
        assert!(!resources.is_empty());
    }
}
