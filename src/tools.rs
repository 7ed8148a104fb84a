//! External tool detection.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::providers::espeak::ESPEAK_BINARY;

/// Information about an external tool.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub name: String,
    pub available: bool,
    /// First line of `--version` output.
    pub version: Option<String>,
    pub path: Option<PathBuf>,
}

/// Run `program --version` and report what was found.
pub fn check_tool(name: &str, program: &Path) -> ToolInfo {
    match Command::new(program).arg("--version").output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .map(|s| s.trim().to_string());

            let path = if program.components().count() > 1 {
                Some(program.to_path_buf())
            } else {
                which::which(program).ok()
            };

            ToolInfo {
                name: name.to_string(),
                available: true,
                version,
                path,
            }
        }
        _ => ToolInfo {
            name: name.to_string(),
            available: false,
            version: None,
            path: None,
        },
    }
}

/// Check the tools the configured providers depend on.
pub fn check_tools(espeak_path: Option<&Path>) -> Vec<ToolInfo> {
    let espeak = espeak_path.unwrap_or(Path::new(ESPEAK_BINARY));
    vec![check_tool(ESPEAK_BINARY, espeak)]
}
