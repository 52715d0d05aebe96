//! Demo front end for `bizlogic-core`.
//!
//! Hosts the device-info registry from `host` and runs one action, one
//! condition, or a rule book key against it. Results go to stdout as JSON;
//! tracing goes to stderr.

mod exit_codes;
mod host;
mod logging;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use bizlogic_core::{
    BusinessLogicExecutor, ExecutorConfig, InvocationOutcome, MethodRegistry, RuleBook, RuleReport,
};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::debug;

use host::{DEVICE_TYPE, DeviceInfo, FeatureState, RunContext};

#[derive(Parser)]
#[command(
    name = "bizlogic-cli",
    version,
    about = "Dispatch business-logic rules against a demo device"
)]
struct Cli {
    #[command(flatten)]
    device: DeviceArgs,

    /// Type used for bare method names.
    #[arg(long, global = true, default_value = DEVICE_TYPE)]
    default_type: String,

    /// Regex whose matches are masked in failure causes. Repeatable.
    #[arg(long = "redact", global = true, value_name = "REGEX")]
    redaction_patterns: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct DeviceArgs {
    /// Device property as KEY=VALUE. Repeatable.
    #[arg(long = "prop", global = true, value_name = "KEY=VALUE", value_parser = parse_property)]
    properties: Vec<(String, String)>,

    /// Device serial for the run context.
    #[arg(long, global = true, default_value = "emulator-5554")]
    serial: String,

    /// SDK level for the run context.
    #[arg(long, global = true, default_value_t = 34)]
    sdk: u32,

    /// Run without a context object.
    #[arg(long, global = true)]
    no_context: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Run one rule as an action.
    Action {
        /// `method`, `Type.method` or `Outer$Inner.method`.
        rule: String,
        args: Vec<String>,
    },
    /// Run one rule as a condition.
    Condition { rule: String, args: Vec<String> },
    /// Apply every rule list a rule book holds for KEY.
    Rules {
        /// Rule book JSON file.
        file: PathBuf,
        key: String,
    },
    /// Show which overload a rule and argument count resolve to.
    Describe {
        rule: String,
        #[arg(long, default_value_t = 0)]
        args: usize,
    },
}

#[derive(Serialize)]
struct Report<'a, T: Serialize> {
    #[serde(flatten)]
    result: T,
    notes: Vec<String>,
    features: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<&'a str>,
}

#[derive(Serialize)]
struct OutcomeResult {
    outcome: InvocationOutcome,
}

#[derive(Serialize)]
struct RulesResult {
    key: String,
    report: RuleReport,
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let (registry, features) = host::registry().context("build demo registry")?;
    let registry = Arc::new(registry);

    let target = DeviceInfo::new(cli.device.properties.iter().cloned());
    let run_context = RunContext {
        serial: cli.device.serial.clone(),
        sdk_level: cli.device.sdk,
    };
    let context = (!cli.device.no_context).then_some(&run_context);
    let context_any = context.map(|c| c as &dyn std::any::Any);

    match &cli.command {
        Command::Action { rule, args } => {
            let exec = executor(&registry, &cli, &[])?;
            let outcome = exec.execute_action(rule, args, &target, context_any)?;
            let code = outcome_code(&outcome);
            print(&target, &features, context, OutcomeResult { outcome })?;
            Ok(code)
        }
        Command::Condition { rule, args } => {
            let exec = executor(&registry, &cli, &[])?;
            let outcome = exec.execute_condition(rule, args, &target, context_any)?;
            let code = outcome_code(&outcome);
            print(&target, &features, context, OutcomeResult { outcome })?;
            Ok(code)
        }
        Command::Rules { file, key } => {
            let book = read_rule_book(file)?;
            let exec = executor(&registry, &cli, &book.redaction_patterns)?;
            if !book.has_logic_for(key) {
                debug!(%key, "no rule lists for key");
            }
            let report = book.apply_logic_for(key, &exec, &target, context_any)?;
            let code = if report.is_failed() {
                exit_codes::FAILED
            } else {
                exit_codes::OK
            };
            print(
                &target,
                &features,
                context,
                RulesResult {
                    key: key.clone(),
                    report,
                },
            )?;
            Ok(code)
        }
        Command::Describe { rule, args } => {
            let exec = executor(&registry, &cli, &[])?;
            let shape = exec.describe(rule, *args, context.is_some())?;
            println!("{}", serde_json::to_string_pretty(shape)?);
            Ok(exit_codes::OK)
        }
    }
}

fn executor(
    registry: &Arc<MethodRegistry>,
    cli: &Cli,
    extra_patterns: &[String],
) -> Result<BusinessLogicExecutor> {
    let config = ExecutorConfig::new(cli.default_type.clone()).with_redaction_patterns(
        cli.redaction_patterns
            .iter()
            .chain(extra_patterns)
            .cloned(),
    );
    let exec = BusinessLogicExecutor::new(Arc::clone(registry), &config)
        .context("invalid executor config")?;
    debug!(default_type = exec.default_type(), "executor ready");
    Ok(exec)
}

fn read_rule_book(path: &Path) -> Result<RuleBook> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    RuleBook::from_json_str(&text).with_context(|| format!("parse {}", path.display()))
}

fn outcome_code(outcome: &InvocationOutcome) -> i32 {
    if outcome.is_failed() {
        exit_codes::FAILED
    } else {
        exit_codes::OK
    }
}

fn print<T: Serialize>(
    target: &DeviceInfo,
    features: &FeatureState,
    context: Option<&RunContext>,
    result: T,
) -> Result<()> {
    let report = Report {
        result,
        notes: target.notes(),
        features: features.enabled(),
        context: context.map(|c| c.serial.as_str()),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn parse_property(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {s:?}"))?;
    if key.is_empty() {
        return Err(format!("empty property key in {s:?}"));
    }
    Ok((key.to_string(), value.to_string()))
}
