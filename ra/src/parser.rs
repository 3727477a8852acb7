//! Response parser - extracts exactly one function call from model output
//!
//! The model is instructed to end every response with a single
//! delimiter-framed function call. The parser rejects, never repairs,
//! responses with zero or multiple call blocks: silently picking one
//! would let the agent execute an action the model did not clearly
//! commit to. Parsing is pure - errors are values the loop turns into
//! corrective observations.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::tools::{ParamSpec, ParamType, ToolRegistry};

pub const BEGIN_CALL: &str = "----BEGIN_FUNCTION_CALL----";
pub const END_CALL: &str = "----END_FUNCTION_CALL----";
pub const ARG_SEP: &str = "----ARG----";

/// Why a response failed to parse
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("no function call found in response")]
    NoToolCallFound,

    #[error("response contains more than one function call")]
    MultipleToolCalls,

    #[error("unknown tool '{name}'")]
    UnknownTool { name: String },

    #[error("malformed argument '{field}': {reason}")]
    MalformedArguments { field: String, reason: String },
}

impl ParseError {
    /// Machine-checkable reason tag
    pub fn kind(&self) -> &'static str {
        match self {
            ParseError::NoToolCallFound => "no_tool_call_found",
            ParseError::MultipleToolCalls => "multiple_tool_calls",
            ParseError::UnknownTool { .. } => "unknown_tool",
            ParseError::MalformedArguments { .. } => "malformed_arguments",
        }
    }
}

/// A validated function call extracted from a response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedCall {
    /// Free-form reasoning text preceding the call block
    pub thought: String,
    pub name: String,
    /// Arguments coerced to the tool's declared parameter types
    pub arguments: Map<String, Value>,
}

/// Parses the rigid textual function-call format
///
/// # Examples
///
/// ```
/// use reagent::parser::ResponseParser;
/// use reagent::tools::builtin::standard_registry;
///
/// let registry = standard_registry(false, false).unwrap();
/// let parser = ResponseParser::new();
///
/// let text = "I'll list the files first.\n\
///             ----BEGIN_FUNCTION_CALL----\n\
///             run_bash_cmd\n\
///             ----ARG----\n\
///             command\n\
///             ls\n\
///             ----END_FUNCTION_CALL----";
/// let call = parser.parse(text, &registry).unwrap();
/// assert_eq!(call.name, "run_bash_cmd");
/// assert_eq!(call.arguments["command"], "ls");
///
/// // Two call blocks are rejected, not repaired
/// let doubled = format!("{}\n{}", text, text);
/// assert_eq!(parser.parse(&doubled, &registry).unwrap_err().kind(), "multiple_tool_calls");
///
/// // So is a call naming an unregistered tool
/// let unknown = text.replace("run_bash_cmd", "rm_everything");
/// assert_eq!(parser.parse(&unknown, &registry).unwrap_err().kind(), "unknown_tool");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser;

impl ResponseParser {
    pub fn new() -> Self {
        Self
    }

    /// Protocol template included verbatim in the system prompt
    pub fn response_format(&self) -> String {
        format!(
            "your_thoughts_here\n...\n{begin}\nfunction_name\n{arg}\narg1_name\narg1_value (can be multiline)\n{arg}\narg2_name\narg2_value (can be multiline)\n...\n{end}\n",
            begin = BEGIN_CALL,
            arg = ARG_SEP,
            end = END_CALL,
        )
    }

    /// Extract the single function call from `text`, validated against the
    /// registry
    pub fn parse(&self, text: &str, registry: &ToolRegistry) -> Result<ParsedCall, ParseError> {
        let begins = text.matches(BEGIN_CALL).count();
        let ends = text.matches(END_CALL).count();

        if begins == 0 || ends == 0 {
            return Err(ParseError::NoToolCallFound);
        }
        if begins > 1 || ends > 1 {
            return Err(ParseError::MultipleToolCalls);
        }

        let Some(begin_idx) = text.find(BEGIN_CALL) else {
            return Err(ParseError::NoToolCallFound);
        };
        let Some(end_idx) = text.find(END_CALL) else {
            return Err(ParseError::NoToolCallFound);
        };
        if end_idx < begin_idx {
            return Err(ParseError::NoToolCallFound);
        }

        let thought = text[..begin_idx].trim().to_string();
        let inner = &text[begin_idx + BEGIN_CALL.len()..end_idx];

        let mut parts = inner.split(ARG_SEP);
        let name = parts.next().unwrap_or_default().trim().to_string();
        if name.is_empty() {
            return Err(ParseError::MalformedArguments {
                field: "function_name".to_string(),
                reason: "missing function name".to_string(),
            });
        }

        let Some(tool) = registry.resolve(&name) else {
            return Err(ParseError::UnknownTool { name });
        };

        let mut raw_args: Map<String, Value> = Map::new();
        for block in parts {
            let segment = block.trim_start_matches('\n');
            if segment.trim().is_empty() {
                continue;
            }
            let Some(newline_idx) = segment.find('\n') else {
                return Err(ParseError::MalformedArguments {
                    field: segment.trim().to_string(),
                    reason: "expected a name line followed by a value".to_string(),
                });
            };
            let arg_name = segment[..newline_idx].trim();
            if arg_name.is_empty() {
                return Err(ParseError::MalformedArguments {
                    field: "argument_name".to_string(),
                    reason: "missing argument name".to_string(),
                });
            }
            let arg_value = segment[newline_idx + 1..].trim();
            raw_args.insert(arg_name.to_string(), Value::String(arg_value.to_string()));
        }

        let mut arguments = Map::new();
        for param in tool.params() {
            match raw_args.remove(param.name) {
                Some(Value::String(raw)) => {
                    arguments.insert(param.name.to_string(), coerce(&param, &raw)?);
                }
                Some(_) | None if param.required => {
                    return Err(ParseError::MalformedArguments {
                        field: param.name.to_string(),
                        reason: "missing required argument".to_string(),
                    });
                }
                _ => {}
            }
        }
        for leftover in raw_args.keys() {
            debug!(tool = %name, argument = %leftover, "parser: dropping undeclared argument");
        }

        Ok(ParsedCall {
            thought,
            name,
            arguments,
        })
    }
}

/// Coerce a raw argument string to its declared parameter type
fn coerce(param: &ParamSpec, raw: &str) -> Result<Value, ParseError> {
    match param.ty {
        ParamType::String => Ok(Value::String(raw.to_string())),
        ParamType::Integer => raw.trim().parse::<i64>().map(Value::from).map_err(|_| {
            ParseError::MalformedArguments {
                field: param.name.to_string(),
                reason: format!("expected an integer, got '{}'", raw),
            }
        }),
        ParamType::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(ParseError::MalformedArguments {
                field: param.name.to_string(),
                reason: format!("expected true or false, got '{}'", raw),
            }),
        },
    }
}
