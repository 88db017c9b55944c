//! Command implementations and dispatch logic.
//!
//! Every command loads the project's plugins and config file the same way,
//! then runs the config pipeline for the command it is inspecting.

use camino::Utf8PathBuf;
use sprout_config::{scan_plugins, CompiledConfig, ConfigLoader, ConfigPipeline, UserConfig};
use sprout_core::{CliArgs, Report, SproutError, SproutResult};
use sprout_resolver::{
    create_test_runner_config, resolve_test_runner_config, RunnerArgs, TestRunnerOptions,
};
use std::process::ExitCode;
use tracing::{debug, info};


use crate::{output::OutputHandler, Commands, ConfigArgs};

/// Shared context for all commands
pub struct CommandContext {
    pub cwd: Utf8PathBuf,
    pub output: OutputHandler,
}

impl CommandContext {
    /// Create a context for the current directory
    pub fn new() -> SproutResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| SproutError::io("Failed to get current directory".to_string(), e))?;
        let cwd = Utf8PathBuf::from_path_buf(cwd).map_err(|path| {
            SproutError::io(
                format!("Current directory is not valid UTF-8: {}", path.display()),
                std::io::Error::from(std::io::ErrorKind::InvalidData),
            )
        })?;

        Ok(Self {
            cwd,
            output: OutputHandler::new(),
        })
    }
}

/// Dispatch a command to its handler
pub async fn dispatch_command(command: Commands, ctx: &CommandContext) -> SproutResult<ExitCode> {
    match command {
        Commands::CheckConfig { config } => {
            info!("Checking config");
            let report = check_config(ctx, &config).await?;
            ctx.output.print_report(&report);
            if report.has_errors() {
                ctx.output.error(&report.summary());
                return Ok(ExitCode::FAILURE);
            }
            if report.deprecations().is_empty() {
                ctx.output.success("Config is valid");
            } else {
                ctx.output.warn("Config is valid but uses deprecated settings");
            }
            Ok(ExitCode::SUCCESS)
        },
        Commands::Config {
            for_command,
            config,
        } => {
            info!("Compiling config for {}", for_command);
            let compiled = compile_config(ctx, &for_command, &config).await?;
            ctx.output.info(&format!(
                "Compiled {} config from {}",
                for_command,
                compiled.report.config_source()
            ));
            if compiled.report.has_something_to_report() {
                ctx.output.print_report(&compiled.report);
            }
            ctx.output.print_json(&compiled.config.to_value().to_json());
            Ok(ExitCode::SUCCESS)
        },
        Commands::TestPlugins {
            coverage,
            full,
            config,
        } => {
            info!("Resolving test plugins (coverage: {}, full: {})", coverage, full);
            let resolved = test_plugins(ctx, coverage, full, &config).await?;
            ctx.output.print_json(&resolved);
            Ok(ExitCode::SUCCESS)
        },
    }
}

/// Validate the project's config file and return the report.
///
/// Problems with the config's contents land in the report; only a missing or
/// unreadable config file is an error.
pub async fn check_config(ctx: &CommandContext, args: &ConfigArgs) -> SproutResult<Report> {
    let (pipeline, user) = prepare(ctx, "check-config", args, true).await?;
    Ok(pipeline.check(user.as_ref()).report)
}

/// Compile the config `command` would run with
pub async fn compile_config(
    ctx: &CommandContext,
    command: &str,
    args: &ConfigArgs,
) -> SproutResult<CompiledConfig> {
    let (pipeline, user) = prepare(ctx, command, args, false).await?;
    pipeline.run(user.as_ref())
}

/// The test runner's plugins as JSON, or its whole generated config with `full`
pub async fn test_plugins(
    ctx: &CommandContext,
    coverage: bool,
    full: bool,
    args: &ConfigArgs,
) -> SproutResult<serde_json::Value> {
    let mut cli_args = args.to_cli_args("test");
    if coverage {
        cli_args = cli_args.with_flag("coverage", true);
    }
    let (pipeline, user) = prepare_with(ctx, cli_args.clone(), args, false).await?;
    let karma = pipeline.run(user.as_ref())?.config.karma;

    let value = if full {
        create_test_runner_config(&karma, RunnerArgs::from_cli(&cli_args))
    } else {
        resolve_test_runner_config(&TestRunnerOptions::from_karma_config(&karma, coverage))
            .to_value()
    };
    Ok(value.to_json())
}

async fn prepare(
    ctx: &CommandContext,
    command: &str,
    args: &ConfigArgs,
    required: bool,
) -> SproutResult<(ConfigPipeline, Option<UserConfig>)> {
    prepare_with(ctx, args.to_cli_args(command), args, required).await
}

async fn prepare_with(
    ctx: &CommandContext,
    cli_args: CliArgs,
    args: &ConfigArgs,
    required: bool,
) -> SproutResult<(ConfigPipeline, Option<UserConfig>)> {
    let plugins = scan_plugins(&ctx.cwd).await?;
    let loaded = ConfigLoader::new(ctx.cwd.clone())
        .load(args.config.as_deref(), required)
        .await?;

    let mut pipeline = ConfigPipeline::new(cli_args).with_plugins(plugins);
    let user = match loaded {
        Some(loaded) => {
            debug!(path = %loaded.path, "Using config file");
            pipeline = pipeline.with_config_path(loaded.path.to_string());
            Some(UserConfig::Tree(loaded.config))
        },
        None => None,
    };
    Ok((pipeline, user))
}
