use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use employee_time_report::{
    FileSink, HttpEntrySource, ReportConfig, ReportService,
    helpers::{api, chart},
    service,
};

/// Builds an HTML table and a pie chart of hours worked per employee.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Time entries endpoint
    #[arg(long, default_value = service::DEFAULT_API_URL, hide_default_value = true)]
    url: String,

    /// Directory the reports are written to, defaults to the working directory
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Chart width in pixels
    #[arg(long, default_value_t = chart::DEFAULT_WIDTH)]
    width: u32,

    /// Chart height in pixels
    #[arg(long, default_value_t = chart::DEFAULT_HEIGHT)]
    height: u32,

    /// Log level for diagnostics on stderr
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log_level)?)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting employee time report");

    let config = ReportConfig {
        api_url: cli.url,
        output_dir: cli.output_dir.unwrap_or_default(),
        chart_width: cli.width,
        chart_height: cli.height,
        ..ReportConfig::default()
    };

    let client = api::api_client_init()?;
    let source = HttpEntrySource::new(client, config.api_url.clone());
    let sink = FileSink::new(config.output_dir.clone());

    let report_service = ReportService::new(source, sink, config);
    let outcome = report_service.process_report().await?;

    if let Ok(path) = &outcome.html {
        println!("HTML report generated: {}", path.display());
    }
    if let Ok(path) = &outcome.chart {
        println!("PNG image generated: {}", path.display());
    }

    outcome.into_paths()?;
    Ok(())
}
