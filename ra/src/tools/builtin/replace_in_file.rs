//! replace_in_file tool - replace a line range with new content

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Map, Value};
use tracing::debug;

use crate::env::SandboxEnvironment;
use crate::tools::{ParamSpec, ParamType, Tool, ToolError, int_arg, str_arg};

/// Replace an inclusive line range of a file with the given content
///
/// The replacement text travels base64-encoded so multiline content and
/// shell metacharacters survive the trip through the sandbox shell.
pub struct ReplaceInFileTool;

#[async_trait]
impl Tool for ReplaceInFileTool {
    fn name(&self) -> &'static str {
        "replace_in_file"
    }

    fn description(&self) -> &'static str {
        "Replace a line range (inclusive) of an existing file with new content. Inspect the \
         file with show_file or show_file_range first and keep edits surgical; indentation is \
         preserved exactly as given."
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::required("file_path", ParamType::String, "path of the file to edit"),
            ParamSpec::required("from_line", ParamType::Integer, "first line to replace (1-based)"),
            ParamSpec::required("to_line", ParamType::Integer, "last line to replace (inclusive)"),
            ParamSpec::required("content", ParamType::String, "replacement text (may be multiline)"),
        ]
    }

    async fn run(&self, args: &Map<String, Value>, env: &dyn SandboxEnvironment) -> Result<String, ToolError> {
        let file_path = str_arg(args, "file_path")?;
        let from_line = int_arg(args, "from_line")?;
        let to_line = int_arg(args, "to_line")?;
        let content = str_arg(args, "content")?;

        if from_line < 1 || to_line < from_line {
            return Err(ToolError::InvalidArgument(format!(
                "invalid line range {}-{}",
                from_line, to_line
            )));
        }

        let encoded = BASE64.encode(sanitize(content));
        let quoted = shell_words::quote(file_path).into_owned();
        // Keep lines before the range, splice the decoded replacement, resume
        // after the range. `test -f` makes a missing file an error instead of
        // silently creating one.
        let command = format!(
            "test -f {path} && {{ head -n {keep} {path}; printf '%s' {b64} | base64 -d; tail -n +{resume} {path}; }} > {path}.ra_edit && mv {path}.ra_edit {path} && echo \"Replaced lines {from}-{to} in\" {path}",
            path = quoted,
            keep = from_line - 1,
            b64 = encoded,
            resume = to_line + 1,
            from = from_line,
            to = to_line,
        );

        debug!(%file_path, from_line, to_line, "replace_in_file: executing");
        let output = env.execute(&command).await?;
        if output.success() {
            Ok(output.stdout)
        } else {
            Err(ToolError::CommandFailed {
                exit_code: output.exit_code,
                output: output.combined(),
            })
        }
    }
}

/// Normalize newlines, expand tabs (literal and escaped), and guarantee a
/// trailing newline so the splice preserves line structure
fn sanitize(content: &str) -> String {
    let mut text = content
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace("\\t", "    ")
        .replace('\t', "    ");
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}
