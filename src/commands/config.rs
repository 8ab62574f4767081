//! Config command handler.
//!
//! Shows the effective configuration or writes the commented default file.

use std::path::Path;

use crate::config::{config_path, init_config_at, load_config, Config};
use crate::error::{AgentPrError, Result};
use crate::output::{print_info, print_success, BOLD, GRAY, RESET, YELLOW};

/// Print the effective configuration as TOML.
pub fn config_display_command(explicit: Option<&Path>) -> Result<()> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => config_path()?,
    };
    let config = load_config(explicit)?;

    println!("{BOLD}# agent-pr config{RESET}");
    println!("{GRAY}# {}{RESET}", path.display());
    if !path.exists() {
        println!("{YELLOW}# (file does not exist, using defaults){RESET}");
    }
    println!();
    print!("{}", render_config(&config)?);

    Ok(())
}

/// Write the default config file unless one already exists.
pub fn config_init_command(explicit: Option<&Path>) -> Result<()> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => config_path()?,
    };

    if init_config_at(&path)? {
        print_success(&format!("Created {}", path.display()));
    } else {
        print_info(&format!("Config already exists at {}", path.display()));
    }

    Ok(())
}

fn render_config(config: &Config) -> Result<String> {
    toml::to_string_pretty(config)
        .map_err(|e| AgentPrError::Config(format!("Failed to serialize config: {}", e)))
}
