//! Prompt context rendering
//!
//! The model sees the conversation as one text document: each message on
//! the root-to-head path gets a delimiter header, and the system message
//! carries the tool catalog and response format so the vocabulary always
//! matches what is actually registered.

use crate::parser::ResponseParser;
use crate::prompts;
use crate::tools::{ToolRegistry, signature};
use crate::tree::{Message, Role};

/// Renders the root-to-head path into the completion prompt
pub struct PromptBuilder<'a> {
    registry: &'a ToolRegistry,
    parser: &'a ResponseParser,
}

impl<'a> PromptBuilder<'a> {
    pub fn new(registry: &'a ToolRegistry, parser: &'a ResponseParser) -> Self {
        Self { registry, parser }
    }

    pub fn render(&self, path: &[&Message]) -> String {
        path.iter().map(|m| self.render_message(m)).collect()
    }

    fn render_message(&self, message: &Message) -> String {
        let header = format!(
            "----------------------------\n|MESSAGE(role=\"{}\", id={})|\n",
            message.role, message.id
        );
        match message.role {
            Role::System => format!(
                "{}{}\n--- AVAILABLE TOOLS ---\n{}\n--- RESPONSE FORMAT ---\n{}\n",
                header,
                message.content,
                self.tool_catalog(),
                self.parser.response_format()
            ),
            Role::Instructor => format!("{}{}\n{}\n", header, prompts::INSTRUCTOR_BANNER, message.content),
            _ => format!("{}{}\n", header, message.content),
        }
    }

    fn tool_catalog(&self) -> String {
        let entries: Vec<String> = self
            .registry
            .list()
            .map(|tool| {
                let mut entry = format!("Function: {}\n{}\n", signature(tool.as_ref()), tool.description());
                for param in tool.params() {
                    entry.push_str(&format!(
                        "  - {} ({}{}): {}\n",
                        param.name,
                        param.ty.label(),
                        if param.required { "" } else { ", optional" },
                        param.description
                    ));
                }
                entry
            })
            .collect();
        entries.join("\n")
    }
}
