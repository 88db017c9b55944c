//! # sprout-cli
//!
//! Command-line front end for the Sprout config compiler.
//!
//! This is the main entry point for the Sprout CLI tool. It handles command parsing,
//! sets up logging and error handling, and dispatches to the appropriate command handlers.

use clap::{Args, Parser, Subcommand};
use sprout_core::{CliArgs, ConfigValue, SproutError};
use std::process::ExitCode;
use tracing::{debug, error};

mod commands;
mod output;

use commands::CommandContext;
use output::errors::ErrorFormatter;

/// Validate, inspect and compile Sprout project config
#[derive(Parser)]
#[command(name = "sprout", version, about = "Sprout config compiler")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check the project's config and report problems
    CheckConfig {
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Print the final config a command would use, as JSON
    Config {
        /// Command to compile config for, e.g. build, serve or test
        #[arg(default_value = "build")]
        for_command: String,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Print the resolved test-runner plugins
    TestPlugins {
        /// Include code coverage reporting
        #[arg(long)]
        coverage: bool,
        /// Print the whole generated test-runner config
        #[arg(long)]
        full: bool,
        #[command(flatten)]
        config: ConfigArgs,
    },
}

/// Flags shared by every config-reading command
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Config file to use instead of sprout.config.json
    #[arg(long, value_name = "PATH")]
    pub config: Option<camino::Utf8PathBuf>,

    /// Project type
    #[arg(long = "type", value_name = "TYPE")]
    pub project_type: Option<String>,

    /// Global name for the UMD build, or false to disable it
    #[arg(long, value_name = "GLOBAL")]
    pub umd: Option<String>,

    /// Build an ES modules version
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub es_modules: Option<String>,

    /// Keep propTypes in production builds
    #[arg(long)]
    pub keep_proptypes: bool,

    /// Comma-separated browsers to run tests in
    #[arg(long, value_name = "LIST")]
    pub browsers: Option<String>,

    /// Dev server host
    #[arg(long)]
    pub host: Option<String>,

    /// Dev server port
    #[arg(long)]
    pub port: Option<u16>,

    /// Open the app in a browser when the dev server starts
    #[arg(long)]
    pub open: bool,

    /// Disable hot module replacement
    #[arg(long)]
    pub no_hmr: bool,

    /// Alias React to Inferno in builds
    #[arg(long)]
    pub inferno: bool,

    /// Alias React to Preact in builds
    #[arg(long)]
    pub preact: bool,
}

impl ConfigArgs {
    /// Flags as seen by the config pipeline, for `command`
    pub fn to_cli_args(&self, command: &str) -> CliArgs {
        let mut args = CliArgs::new([command]);
        if let Some(project_type) = &self.project_type {
            args = args.with_flag("type", project_type.as_str());
        }
        if let Some(umd) = &self.umd {
            args = match umd.as_str() {
                "false" => args.with_flag("umd", false),
                global => args.with_flag("umd", global),
            };
        }
        if let Some(es_modules) = &self.es_modules {
            args = args.with_flag("es-modules", es_modules.as_str());
        }
        if let Some(browsers) = &self.browsers {
            args = args.with_flag("browsers", browsers.as_str());
        }
        if let Some(host) = &self.host {
            args = args.with_flag("host", host.as_str());
        }
        if let Some(port) = self.port {
            args = args.with_flag("port", port);
        }
        let switches = [
            ("keep-proptypes", self.keep_proptypes),
            ("open", self.open),
            ("inferno", self.inferno),
            ("preact", self.preact),
        ];
        for (name, enabled) in switches {
            if enabled {
                args = args.with_flag(name, true);
            }
        }
        if self.no_hmr {
            args = args.with_flag("hmr", ConfigValue::Bool(false));
        }
        args
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose);
    debug!("Starting Sprout CLI v{}", env!("CARGO_PKG_VERSION"));

    match run_cli(cli) {
        Ok(code) => code,
        Err(err) => {
            let formatter = ErrorFormatter::new();
            match err.downcast_ref::<SproutError>() {
                Some(sprout_error) => eprintln!("{}", formatter.format_error(sprout_error)),
                None => {
                    error!("{:#}", err);
                    eprintln!("{}", formatter.format_simple(&format!("{:#}", err)));
                },
            }
            ExitCode::FAILURE
        },
    }
}

fn run_cli(cli: Cli) -> anyhow::Result<ExitCode> {
    // Create Tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| anyhow::Error::new(e).context("Failed to create async runtime"))?;

    rt.block_on(async {
        let ctx = CommandContext::new()?;
        let code = commands::dispatch_command(cli.command, &ctx).await?;
        Ok::<_, anyhow::Error>(code)
    })
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "sprout={level},sprout_core={level},sprout_config={level},sprout_resolver={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_config_args_become_flags() {
        let cli = Cli::parse_from([
            "sprout",
            "config",
            "serve",
            "--type",
            "react-app",
            "--umd",
            "false",
            "--es-modules",
            "--port",
            "3000",
            "--no-hmr",
        ]);
        let Commands::Config { for_command, config } = cli.command else {
            panic!("expected the config command");
        };
        let args = config.to_cli_args(&for_command);
        assert_eq!(args.command(), Some("serve"));
        assert_eq!(args.flag_str("type"), Some("react-app"));
        assert!(args.is_disabled("umd"));
        assert_eq!(args.flag_str("es-modules"), Some("true"));
        assert_eq!(args.flag("port"), Some(&ConfigValue::from(3000u16)));
        assert!(args.is_disabled("hmr"));
        assert!(args.flag("open").is_none());
    }
}
