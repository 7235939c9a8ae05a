mod input;
mod logging;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use input::{InputSource, parse_param};
use modelcheck_core::{Error as CoreError, report_json_schema};
use modelcheck_models::{ModelCatalog, derived_values};
use modelcheck_validate::ValidationContext;
use serde::Serialize;
use serde_json::json;
use settings::{Settings, load_settings};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
enum CliError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("logging error: {0}")]
    Logging(String),
}

#[derive(Parser, Debug)]
#[command(name = "modelcheck", version, about = "Validate records against typed models")]
struct Cli {
    /// Settings file; defaults apply when it does not exist.
    #[arg(long, global = true, default_value = "modelcheck.toml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a record and print it with any derived values.
    Validate(ValidateArgs),
    /// List model names.
    Models,
    /// Print a model's record spec as JSON.
    Describe(DescribeArgs),
    /// Print the JSON Schema of validation reports.
    ReportSchema,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Validate(_) => "validate",
            Command::Models => "models",
            Command::Describe(_) => "describe",
            Command::ReportSchema => "report-schema",
        }
    }
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Model name, see `modelcheck models`.
    model: String,
    /// JSON input file, `-` for stdin.
    #[arg(value_name = "INPUT", conflicts_with = "params")]
    input: Option<PathBuf>,
    /// Input field as KEY=VALUE; values are passed as strings.
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    params: Vec<(String, String)>,
    /// Validation clock as RFC 3339, defaults to the current time.
    #[arg(long, value_parser = parse_now)]
    now: Option<DateTime<Utc>>,
}

#[derive(Args, Debug)]
struct DescribeArgs {
    model: String,
}

fn main() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();
    let settings = load_settings(&cli.config)?;
    logging::init_logging(&settings.log)?;

    let run_id = Uuid::new_v4();
    tracing::info!(
        event = "run_started",
        run_id = %run_id,
        command = cli.command.name(),
        config = %cli.config.display()
    );

    let catalog = ModelCatalog::standard()?;
    let code = match cli.command {
        Command::Validate(args) => run_validate(&catalog, &settings, args)?,
        Command::Models => {
            for name in catalog.names() {
                let spec = catalog.spec(name)?;
                match spec.description() {
                    Some(description) => println!("{name}\t{description}"),
                    None => println!("{name}"),
                }
            }
            ExitCode::SUCCESS
        }
        Command::Describe(args) => {
            let spec = catalog.spec(&args.model)?;
            emit(spec, &settings)?;
            ExitCode::SUCCESS
        }
        Command::ReportSchema => {
            emit(&report_json_schema(), &settings)?;
            ExitCode::SUCCESS
        }
    };

    tracing::info!(event = "run_finished", run_id = %run_id);
    Ok(code)
}

fn run_validate(
    catalog: &ModelCatalog,
    settings: &Settings,
    args: ValidateArgs,
) -> Result<ExitCode, CliError> {
    let ValidateArgs {
        model,
        input,
        params,
        now,
    } = args;

    let source = InputSource::resolve(input, params);
    tracing::info!(event = "input_read", model = %model, source = %source.describe());
    let payload = source.read()?;

    let context = now.map(ValidationContext::at).unwrap_or_default();
    match catalog.validate(&model, &payload, context)? {
        Ok(record) => {
            let mut output = json!({
                "model": model,
                "record": record.to_json(),
            });
            if let Some(derived) = derived_values(&record, settings.output.money_scale)? {
                output["derived"] = derived;
            }
            tracing::info!(event = "validation_passed", model = %model);
            emit(&output, settings)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(report) => {
            tracing::info!(
                event = "validation_failed",
                model = %model,
                violations = report.len()
            );
            emit(&report, settings)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn emit<T: Serialize + ?Sized>(value: &T, settings: &Settings) -> Result<(), CliError> {
    let encoded = if settings.output.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{encoded}");
    Ok(())
}

fn parse_now(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|now| now.with_timezone(&Utc))
        .map_err(|err| format!("invalid RFC 3339 timestamp '{raw}': {err}"))
}
