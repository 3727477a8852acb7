//! Tool system for the agent loop
//!
//! Tools are the agent's only way to act on the repository. Each tool
//! declares a typed parameter schema used both for response parsing and
//! for the system-prompt catalog, and expresses its effect as shell
//! commands run through the sandbox environment.

mod error;
mod registry;
mod traits;

pub mod builtin;

pub use error::ToolError;
pub use registry::ToolRegistry;
pub use traits::{ParamSpec, ParamType, Tool, int_arg, signature, str_arg};
