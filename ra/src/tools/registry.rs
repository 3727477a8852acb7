//! ToolRegistry - maps tool names to capability implementations

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use super::{Tool, ToolError};

/// Name-keyed set of registered tools
///
/// Built once at agent construction from the run configuration; the
/// BTreeMap keeps iteration order deterministic so prompt catalogs are
/// stable across runs.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool; fails if the name is already taken
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), ToolError> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(ToolError::DuplicateTool(name));
        }
        debug!(%name, "registry: registered tool");
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Look up a tool by name
    pub fn resolve(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    /// Registered tools in name order (for prompt construction)
    pub fn list(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.values()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry").field("names", &self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::SandboxEnvironment;
    use crate::tools::{ParamSpec, ParamType};
    use async_trait::async_trait;
    use serde_json::{Map, Value};

    struct NamedTool(&'static str);

    #[async_trait]
    impl Tool for NamedTool {
        fn name(&self) -> &'static str {
            self.0
        }

        fn description(&self) -> &'static str {
            "a test tool"
        }

        fn params(&self) -> Vec<ParamSpec> {
            vec![ParamSpec::required("x", ParamType::String, "x")]
        }

        async fn run(&self, _args: &Map<String, Value>, _env: &dyn SandboxEnvironment) -> Result<String, ToolError> {
            Ok("ran".to_string())
        }
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(NamedTool("alpha"))).unwrap();

        assert!(registry.contains("alpha"));
        assert!(registry.resolve("alpha").is_some());
        assert!(registry.resolve("beta").is_none());
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(NamedTool("alpha"))).unwrap();

        let err = registry.register(Arc::new(NamedTool("alpha"))).unwrap_err();
        assert!(matches!(err, ToolError::DuplicateTool(name) if name == "alpha"));
    }

    #[test]
    fn test_list_is_name_ordered() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(NamedTool("zeta"))).unwrap();
        registry.register(Arc::new(NamedTool("alpha"))).unwrap();
        registry.register(Arc::new(NamedTool("mid"))).unwrap();

        let names: Vec<&str> = registry.list().map(|t| t.name()).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }
}
