use anyhow::Context;
use clap::{Parser, Subcommand};
use request_armor::entities::ConnectionProfile;
use request_armor::guards::ContentSanitizer;
use request_armor::infrastructure::logging::{FileSecurityLog, TracingSecurityLog};
use request_armor::ports::SecurityLog;
use request_armor::value_objects::RequestFieldMap;
use request_armor::Config;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "armor-check", about = "Offline checks for request hardening")]
struct Cli {
    /// TOML config file; environment variables are used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit diagnostics as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a JSON object of request fields for script injection
    Scan {
        /// Input file; reads stdin when omitted
        input: Option<PathBuf>,

        /// Report detections through tracing instead of the security log file
        #[arg(long)]
        dry_run: bool,
    },
    /// Load and validate configuration
    CheckConfig,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::from_toml_file(path)?,
        None => Config::from_env(),
    };
    config.validate_log_file()?;
    Ok(config)
}

fn read_fields(input: Option<&PathBuf>) -> anyhow::Result<RequestFieldMap> {
    let raw = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    serde_json::from_str(&raw).context("input must be a JSON object of fields")
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "request_armor=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Command::Scan { input, dry_run } => {
            let fields = read_fields(input.as_ref())?;
            let log: Arc<dyn SecurityLog> = if dry_run {
                Arc::new(TracingSecurityLog)
            } else {
                Arc::new(FileSecurityLog::new(&config.log_file))
            };
            let sanitizer = ContentSanitizer::with_config(&config.sanitizer, log)?;

            match sanitizer.detect(&fields) {
                Some(detection) => {
                    sanitizer.scan(&fields);
                    println!(
                        "threat detected in field '{}' ({})",
                        detection.field, detection.rule
                    );
                    Ok(ExitCode::FAILURE)
                }
                None => {
                    println!("clean: {} field(s) scanned", fields.len());
                    Ok(ExitCode::SUCCESS)
                }
            }
        }
        Command::CheckConfig => {
            config.validate_database()?;
            let db = &config.database;
            let profile =
                ConnectionProfile::configure(&db.driver, &db.host, &db.name, &db.user, &db.password)?;

            println!("log file:   {}", config.log_file.display());
            println!("driver:     {}", profile.kind());
            println!("descriptor: {}", profile.connection_string());
            println!("xss rules:  {} extra", config.sanitizer.extra_patterns.len());
            Ok(ExitCode::SUCCESS)
        }
    }
}
