//! Tool trait and parameter schema

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::env::SandboxEnvironment;

use super::ToolError;

/// Declared type of a tool parameter
///
/// The response parser coerces raw argument text to these types before a
/// tool ever runs, so handlers can rely on the shape of their input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    Integer,
    Boolean,
}

impl ParamType {
    pub fn label(&self) -> &'static str {
        match self {
            ParamType::String => "str",
            ParamType::Integer => "int",
            ParamType::Boolean => "bool",
        }
    }
}

/// One parameter of a tool's schema
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: &'static str,
    pub ty: ParamType,
    pub required: bool,
    pub description: &'static str,
}

impl ParamSpec {
    pub fn required(name: &'static str, ty: ParamType, description: &'static str) -> Self {
        Self {
            name,
            ty,
            required: true,
            description,
        }
    }

    pub fn optional(name: &'static str, ty: ParamType, description: &'static str) -> Self {
        Self {
            name,
            ty,
            required: false,
            description,
        }
    }
}

/// A capability the model can invoke
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name as it appears in function calls
    fn name(&self) -> &'static str;

    /// Human-readable description for the system-prompt catalog
    fn description(&self) -> &'static str;

    /// Parameter schema (drives argument validation and coercion)
    fn params(&self) -> Vec<ParamSpec>;

    /// Execute with validated arguments against the sandbox
    async fn run(&self, args: &Map<String, Value>, env: &dyn SandboxEnvironment) -> Result<String, ToolError>;
}

/// Render `name(arg: type, ...)` for the system-prompt catalog
pub fn signature(tool: &dyn Tool) -> String {
    let params: Vec<String> = tool
        .params()
        .iter()
        .map(|p| {
            if p.required {
                format!("{}: {}", p.name, p.ty.label())
            } else {
                format!("{}?: {}", p.name, p.ty.label())
            }
        })
        .collect();
    format!("{}({})", tool.name(), params.join(", "))
}

/// Extract a required string argument
pub fn str_arg<'a>(args: &'a Map<String, Value>, name: &str) -> Result<&'a str, ToolError> {
    args.get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| ToolError::InvalidArgument(format!("missing string argument '{}'", name)))
}

/// Extract a required integer argument
pub fn int_arg(args: &Map<String, Value>, name: &str) -> Result<i64, ToolError> {
    args.get(name)
        .and_then(|v| v.as_i64())
        .ok_or_else(|| ToolError::InvalidArgument(format!("missing integer argument '{}'", name)))
}
