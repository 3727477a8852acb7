//! Builtin tool vocabulary
//!
//! The mandatory tools (`finish`, `run_bash_cmd`) are always registered.
//! `add_instructions_and_backtrack` and the optional file/search/test
//! suite are registered per run configuration; their absence only narrows
//! the vocabulary advertised to the model.

use std::sync::Arc;

mod add_instructions_and_backtrack;
mod finish;
mod grep_repo;
mod replace_in_file;
mod run_bash_cmd;
mod show_file;
mod show_file_range;
mod stage_and_diff;
mod syntax_check;

pub use add_instructions_and_backtrack::AddInstructionsAndBacktrackTool;
pub use finish::FinishTool;
pub use grep_repo::GrepRepoTool;
pub use replace_in_file::ReplaceInFileTool;
pub use run_bash_cmd::RunBashCmdTool;
pub use run_common_tests::RunCommonTestsTool;
pub use show_file::ShowFileTool;
pub use show_file_range::ShowFileRangeTool;
pub use stage_and_diff::StageAndDiffTool;
pub use syntax_check::SyntaxCheckTool;

use super::{ToolError, ToolRegistry};

/// Assemble the tool vocabulary for a run
pub fn standard_registry(backtracking: bool, optional_tools: bool) -> Result<ToolRegistry, ToolError> {
    let mut registry = ToolRegistry::new();

    registry.register(Arc::new(FinishTool))?;
    registry.register(Arc::new(RunBashCmdTool))?;

    if backtracking {
        registry.register(Arc::new(AddInstructionsAndBacktrackTool))?;
    }

    if optional_tools {
        registry.register(Arc::new(ShowFileTool))?;
        registry.register(Arc::new(ShowFileRangeTool))?;
        registry.register(Arc::new(ReplaceInFileTool))?;
        registry.register(Arc::new(GrepRepoTool))?;
        registry.register(Arc::new(StageAndDiffTool))?;
        registry.register(Arc::new(RunCommonTestsTool))?;
        registry.register(Arc::new(SyntaxCheckTool))?;
    }

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_registry_has_mandatory_tools() {
        let registry = standard_registry(false, false).unwrap();

        assert!(registry.contains("finish"));
        assert!(registry.contains("run_bash_cmd"));
        assert!(!registry.contains("add_instructions_and_backtrack"));
        assert!(!registry.contains("show_file"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_backtracking_adds_backtrack_tool() {
        let registry = standard_registry(true, false).unwrap();
        assert!(registry.contains("add_instructions_and_backtrack"));
    }

    #[test]
    fn test_optional_tools_add_full_suite() {
        let registry = standard_registry(true, true).unwrap();

        for name in [
            "show_file",
            "show_file_range",
            "replace_in_file",
            "grep_repo",
            "stage_and_diff",
            "run_common_tests",
            "syntax_check",
        ] {
            assert!(registry.contains(name), "missing {}", name);
        }
        assert_eq!(registry.len(), 10);
    }
}
