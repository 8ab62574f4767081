use crate::error::{AgentPrError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// The base config directory name under ~/.config/
const CONFIG_DIR_NAME: &str = "agent-pr";

/// The filename for the configuration file.
const CONFIG_FILENAME: &str = "config.toml";

/// Settings shared by every command.
///
/// Missing fields in a config file fall back to their defaults, so partial
/// files work.
///
/// # Example
///
/// ```toml
/// agent_name = "Claude"
/// section_header = "## Comments Addressed"
/// remote = "origin"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Name shown in the agent prefix: `[🤖 <agent_name>]: ...`.
    #[serde(default = "default_agent_name")]
    pub agent_name: String,

    /// Header line of the section maintained in PR descriptions.
    #[serde(default = "default_section_header")]
    pub section_header: String,

    /// Git remote used to resolve bare PR numbers.
    #[serde(default = "default_remote")]
    pub remote: String,

    /// GitHub host for PR URLs, remotes and API calls.
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_gh_binary")]
    pub gh_binary: String,

    #[serde(default = "default_git_binary")]
    pub git_binary: String,
}

fn default_agent_name() -> String {
    "Claude".to_string()
}

fn default_section_header() -> String {
    "## Comments Addressed".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_host() -> String {
    "github.com".to_string()
}

fn default_gh_binary() -> String {
    "gh".to_string()
}

fn default_git_binary() -> String {
    "git".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            agent_name: default_agent_name(),
            section_header: default_section_header(),
            remote: default_remote(),
            host: default_host(),
            gh_binary: default_gh_binary(),
            git_binary: default_git_binary(),
        }
    }
}

/// Default config file content with explanatory comments.
const DEFAULT_CONFIG_WITH_COMMENTS: &str = r###"# agent-pr configuration

# Name used in the reply prefix: [🤖 <agent_name>]: <message>
agent_name = "Claude"

# Header of the section maintained in PR descriptions
section_header = "## Comments Addressed"

# Git remote used to resolve bare PR numbers
remote = "origin"

# GitHub host (change for GitHub Enterprise)
host = "github.com"

# Executables
gh_binary = "gh"
git_binary = "git"
"###;

/// Check the configuration for values the commands cannot work with.
pub fn validate_config(config: &Config) -> Result<()> {
    for (key, value) in [
        ("agent_name", &config.agent_name),
        ("section_header", &config.section_header),
        ("remote", &config.remote),
        ("host", &config.host),
        ("gh_binary", &config.gh_binary),
        ("git_binary", &config.git_binary),
    ] {
        if value.trim().is_empty() {
            return Err(AgentPrError::Config(format!("`{}` must not be empty", key)));
        }
    }

    if config.section_header.contains('\n') {
        return Err(AgentPrError::Config(
            "`section_header` must be a single line".to_string(),
        ));
    }

    if config.agent_name.contains(']') {
        return Err(AgentPrError::Config(
            "`agent_name` must not contain ']'".to_string(),
        ));
    }

    Ok(())
}

/// Get the agent-pr config directory path (~/.config/agent-pr/).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| AgentPrError::Config("Could not determine home directory".to_string()))?;
    Ok(home.join(".config").join(CONFIG_DIR_NAME))
}

/// Get the path to the default config file.
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILENAME))
}

/// Load configuration from `path`, or defaults when the file does not exist.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content).map_err(|e| {
        AgentPrError::Config(format!(
            "Failed to parse config file at {:?}: {}",
            path, e
        ))
    })?;

    validate_config(&config)?;
    Ok(config)
}

/// Load the configuration from an explicit path or `~/.config/agent-pr/config.toml`.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            if !path.exists() {
                return Err(AgentPrError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            load_config_from(path)
        }
        None => load_config_from(&config_path()?),
    }
}

/// Write the commented default config to `path` unless a file is already there.
///
/// Returns whether a file was written.
pub fn init_config_at(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, DEFAULT_CONFIG_WITH_COMMENTS)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.agent_name, "Claude");
        assert_eq!(config.section_header, "## Comments Addressed");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "agent_name = \"Reviewer\"\n").unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.agent_name, "Reviewer");
        assert_eq!(config.remote, "origin");
        assert_eq!(config.host, "github.com");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "agent_name = ").unwrap();

        match load_config_from(&path) {
            Err(AgentPrError::Config(msg)) => assert!(msg.contains("Failed to parse")),
            other => panic!("Expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_rejects_empty_and_multiline_values() {
        let config = Config {
            agent_name: "  ".to_string(),
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());

        let config = Config {
            section_header: "## A\n## B".to_string(),
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());

        let config = Config {
            agent_name: "Bad]Name".to_string(),
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());

        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_commented_defaults_parse_to_defaults() {
        let config: Config = toml::from_str(DEFAULT_CONFIG_WITH_COMMENTS).unwrap();
        assert_eq!(config, Config::default());
        assert!(DEFAULT_CONFIG_WITH_COMMENTS
            .contains("section_header = \"## Comments Addressed\""));
    }

    #[test]
    fn test_explicit_missing_path_is_error() {
        let dir = TempDir::new().unwrap();
        let result = load_config(Some(&dir.path().join("nope.toml")));
        assert!(matches!(result, Err(AgentPrError::Config(_))));
    }

    #[test]
    fn test_init_writes_parseable_defaults_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        assert!(init_config_at(&path).unwrap());
        assert_eq!(load_config_from(&path).unwrap(), Config::default());

        fs::write(&path, "agent_name = \"Kept\"\n").unwrap();
        assert!(!init_config_at(&path).unwrap());
        assert_eq!(load_config_from(&path).unwrap().agent_name, "Kept");
    }
}
