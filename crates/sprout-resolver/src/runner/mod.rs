//! Test-runner config generation

use sprout_config::merge::{deep_merge_with, MergeStrategy};
use sprout_core::{CliArgs, ConfigMap, ConfigValue};
use tracing::debug;

use crate::plugins::{resolve_test_runner_config, TestRunnerOptions};

/// Test files looked for when the config names none
pub const DEFAULT_TEST_FILES: &str = "+(src|test?(s))/**/*+(-test|.spec|.test).js";

/// Directory coverage reports are written to
pub const COVERAGE_DIR: &str = "coverage";

/// Flags that affect the generated test-runner config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerArgs {
    pub code_coverage: bool,
    /// Run once and exit rather than watching
    pub single_run: bool,
}

impl Default for RunnerArgs {
    fn default() -> Self {
        Self {
            code_coverage: false,
            single_run: true,
        }
    }
}

impl RunnerArgs {
    pub fn from_cli(args: &CliArgs) -> Self {
        Self {
            code_coverage: args.is_enabled("coverage"),
            single_run: !args.is_enabled("server"),
        }
    }
}

/// Build the test runner's config from the merged `karma` namespace.
///
/// `karma.extra` is merged over the generated config with arrays
/// concatenated, then `karma.config` gets the final say.
pub fn create_test_runner_config(karma: &ConfigMap, args: RunnerArgs) -> ConfigValue {
    let resolved =
        resolve_test_runner_config(&TestRunnerOptions::from_karma_config(karma, args.code_coverage));

    let files = test_files(karma);
    let mut preprocessors = ConfigMap::new();
    for file in &files {
        if let ConfigValue::String(file) = file {
            preprocessors.insert(file.clone(), vec!["webpack", "sourcemap"].into());
        }
    }

    let mut config = ConfigMap::new();
    config.insert("browsers".into(), resolved.browsers.into());
    config.insert("frameworks".into(), resolved.frameworks.into());
    config.insert("reporters".into(), resolved.reporters.into());
    config.insert(
        "plugins".into(),
        ConfigValue::Array(resolved.plugins.iter().map(|entry| entry.to_value()).collect()),
    );
    config.insert("files".into(), ConfigValue::Array(files));
    config.insert("preprocessors".into(), preprocessors.into());
    config.insert("singleRun".into(), args.single_run.into());
    config.insert("mochaReporter".into(), mocha_reporter());
    if args.code_coverage {
        config.insert("coverageReporter".into(), coverage_reporter(karma));
    }

    let mut config = ConfigValue::Object(config);
    if let Some(extra) = karma.get("extra") {
        config = deep_merge_with(&config, extra, &MergeStrategy::concat_arrays());
    }
    if let Some(custom) = karma.get("config").and_then(ConfigValue::as_function) {
        debug!("Applying karma.config function");
        config = custom.call(config);
    }
    config
}

fn test_files(karma: &ConfigMap) -> Vec<ConfigValue> {
    match (karma.get("testContext"), karma.get("testFiles")) {
        (Some(context @ ConfigValue::String(_)), _) => vec![context.clone()],
        (_, Some(ConfigValue::Array(files))) => files.clone(),
        (_, Some(file @ ConfigValue::String(_))) => vec![file.clone()],
        _ => vec![DEFAULT_TEST_FILES.into()],
    }
}

fn mocha_reporter() -> ConfigValue {
    let mut reporter = ConfigMap::new();
    reporter.insert("showDiff".into(), true.into());
    reporter.into()
}

fn coverage_reporter(karma: &ConfigMap) -> ConfigValue {
    let report = |kind: &str, subdir: &str| {
        let mut map = ConfigMap::new();
        map.insert("type".into(), kind.into());
        map.insert("subdir".into(), subdir.into());
        ConfigValue::Object(map)
    };
    let mut reporter = ConfigMap::new();
    reporter.insert("dir".into(), COVERAGE_DIR.into());
    reporter.insert(
        "reporters".into(),
        ConfigValue::Array(vec![report("html", "html"), report("lcovonly", ".")]),
    );
    if let Some(exclude) = karma.get("excludeFromCoverage") {
        reporter.insert("exclude".into(), exclude.clone());
    }
    reporter.into()
}
