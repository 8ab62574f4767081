//! Shell completion scripts for agent-pr.
//!
//! ```ignore
//! let shell = ShellType::from_name("zsh")?;
//! print!("{}", generate_completion_script(shell));
//! ```

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::error::{AgentPrError, Result};

/// Supported shell types for completion scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellType {
    Bash,
    Zsh,
    Fish,
}

impl ShellType {
    /// Parse a shell name or path such as `zsh` or `/usr/bin/fish`.
    pub fn from_name(shell: &str) -> Result<Self> {
        let name = std::path::Path::new(shell)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(shell);

        match name {
            "bash" => Ok(ShellType::Bash),
            "zsh" => Ok(ShellType::Zsh),
            "fish" => Ok(ShellType::Fish),
            _ => Err(AgentPrError::Input(format!(
                "Unsupported shell: '{}'. Supported shells are: bash, zsh, fish.",
                name
            ))),
        }
    }

    pub fn to_clap_shell(self) -> Shell {
        match self {
            ShellType::Bash => Shell::Bash,
            ShellType::Zsh => Shell::Zsh,
            ShellType::Fish => Shell::Fish,
        }
    }
}

/// Generate a completion script covering every subcommand and flag.
pub fn generate_completion_script(shell: ShellType) -> String {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    generate(shell.to_clap_shell(), &mut cmd, "agent-pr", &mut buf);
    String::from_utf8(buf).unwrap_or_default()
}
