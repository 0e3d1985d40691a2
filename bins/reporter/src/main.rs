//! Vendora report generator
//!
//! Reads raw transaction rows as a JSON array, builds a report document and
//! writes it as JSON.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vendora_core::payments::FixedRatioSplit;
use vendora_core::reports::{ReportEngine, ReportFilters, ReportKind, ReportRequest};
use vendora_core::transaction::RawTransactionRecord;
use vendora_shared::types::{LocationId, MachineId, ProductId};
use vendora_shared::{AppConfig, AppError};

/// Build sales reports from vending-machine transactions.
#[derive(Debug, Parser)]
#[command(name = "vendora-report", version, about)]
struct Cli {
    /// JSON file of raw transaction rows. Reads stdin when omitted or `-`.
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// First day of the period (YYYY-MM-DD), inclusive.
    #[arg(long, env = "VENDORA_REPORT_FROM")]
    from: NaiveDate,

    /// Last day of the period (YYYY-MM-DD), inclusive.
    #[arg(long, env = "VENDORA_REPORT_TO")]
    to: NaiveDate,

    /// Report kind: payment_types, financial or full.
    #[arg(long, env = "VENDORA_REPORT_KIND", default_value = "full")]
    kind: ReportKind,

    /// Keep only this machine. Repeatable.
    #[arg(long = "machine", value_name = "ID")]
    machines: Vec<MachineId>,

    /// Keep only this product. Repeatable.
    #[arg(long = "product", value_name = "ID")]
    products: Vec<ProductId>,

    /// Keep only machines at this location. Repeatable.
    #[arg(long = "location", value_name = "ID")]
    locations: Vec<LocationId>,

    /// Keep TEST dispenses.
    #[arg(long, env = "VENDORA_INCLUDE_TEST_ORDERS")]
    include_test_orders: bool,

    /// Output file. Writes stdout when omitted.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Pretty-print the document.
    #[arg(long)]
    pretty: bool,

    /// Emit logs as JSON.
    #[arg(long, env = "VENDORA_LOG_JSON")]
    log_json: bool,
}

fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let (code, error_code) = err
                .downcast_ref::<AppError>()
                .map_or((1, "UNEXPECTED_ERROR"), |e| (e.exit_code(), e.error_code()));
            error!(error_code, "{err:#}");
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vendora=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries the document
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    let input = read_input(cli.input.as_deref())?;
    let records: Vec<RawTransactionRecord> = serde_json::from_str(&input)
        .map_err(|e| AppError::Input(format!("expected a JSON array of transactions: {e}")))?;
    info!(records = records.len(), "Loaded transactions");

    let filters = ReportFilters {
        machine_ids: cli.machines.into_iter().collect(),
        product_ids: cli.products.into_iter().collect(),
        location_ids: cli.locations.into_iter().collect(),
        include_test_orders: cli.include_test_orders,
    };
    let request = ReportRequest::new(cli.from, cli.to, cli.kind).with_filters(filters);

    let settlement = FixedRatioSplit::from_config(&config.engine.settlement);
    let engine = ReportEngine::new(config.engine);
    let document = engine
        .generate(&request, &records, &settlement)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&document)
    } else {
        serde_json::to_string(&document)
    }
    .map_err(|e| AppError::Internal(e.to_string()))?;

    write_output(cli.output.as_deref(), &json)?;
    let destination = cli
        .output
        .as_deref()
        .map_or_else(|| "stdout".to_string(), |p| p.display().to_string());
    info!(
        report_id = %document.metadata.report_id,
        output = %destination,
        "Report written"
    );
    Ok(())
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .map_err(|e| AppError::Input(format!("{}: {e}", path.display())))
            .with_context(|| "Failed to read transactions"),
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| AppError::Input(format!("stdin: {e}")))?;
            Ok(buffer)
        }
    }
}

fn write_output(path: Option<&Path>, json: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => fs::write(path, json)
            .map_err(|e| AppError::Internal(format!("{}: {e}", path.display())))
            .with_context(|| "Failed to write report"),
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}").map_err(|e| AppError::Internal(format!("stdout: {e}")))?;
            Ok(())
        }
    }
}
