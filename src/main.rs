//! agent-pr CLI entry point.
//!
//! Parses command-line arguments and dispatches to the appropriate command handler.

use agent_pr::cli::{usage_error, Cli, Commands, ConfigSubcommand};
use agent_pr::commands::{
    config_display_command, config_init_command, describe_command, input_or_stdin,
    load_comments_file, reply_command, review_command, Context,
};
use agent_pr::completion::{generate_completion_script, ShellType};
use agent_pr::config::load_config;
use agent_pr::gh::GhCli;
use agent_pr::git::GitRepo;
use agent_pr::output::{emit_error, emit_success};
use agent_pr::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config_override = cli.config.as_deref();

    match cli.command {
        Commands::Config { subcommand } => match subcommand {
            Some(ConfigSubcommand::Init) => config_init_command(config_override),
            None => config_display_command(config_override),
        },

        Commands::Completions { shell } => {
            let shell = ShellType::from_name(&shell)?;
            print!("{}", generate_completion_script(shell));
            Ok(())
        }

        command => {
            let config = load_config(config_override)?;
            let api = GhCli::new(config.gh_binary.as_str(), config.host.as_str());
            let repo = GitRepo::new(config.git_binary.as_str(), config.remote.as_str());
            let ctx = Context::new(&config, &api, &repo);

            match command {
                Commands::Reply(args) => {
                    let request = input_or_stdin(args.into_input()?)?.into_request()?;
                    emit_success(&reply_command(&ctx, request)?);
                }
                Commands::Review(args) => {
                    let from_args = match args.into_input()? {
                        Some((mut input, Some(path))) => {
                            input.comments = Some(load_comments_file(&path)?);
                            Some(input)
                        }
                        Some((input, None)) => Some(input),
                        None => None,
                    };
                    let request = input_or_stdin(from_args)?.into_request()?;
                    emit_success(&review_command(&ctx, request)?);
                }
                Commands::Describe(args) => {
                    let request = input_or_stdin(args.into_input()?)?.into_request()?;
                    emit_success(&describe_command(&ctx, request)?);
                }
                Commands::Config { .. } | Commands::Completions { .. } => {}
            }
            Ok(())
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match usage_error(&e) {
            Some(err) => {
                emit_error(&err);
                std::process::exit(err.exit_code());
            }
            None => e.exit(),
        },
    };
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        emit_error(&e);
        std::process::exit(e.exit_code());
    }
}
