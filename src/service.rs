use std::path::PathBuf;
use tracing::{error, info};

use crate::{
    error::ReportResult,
    helpers::{
        aggregate::aggregate,
        api::EntrySource,
        chart::{self, build_chart_model, rasterize},
        html::render_html,
        output::ReportSink,
    },
    models::time_entry::EmployeeSummary,
};

pub const DEFAULT_API_URL: &str = "https://rc-vault-fap-live-1.azurewebsites.net/api/gettimeentries?code=vO17RnE8vuzXzPJo5eaLLjXjmRW07law99QTD90zat9FfOQJKKUcgQ==";
pub const DEFAULT_HTML_FILE: &str = "EmployeeReport.html";
pub const DEFAULT_CHART_FILE: &str = "EmployeeTimeChart.png";

/// Configuration for the report service
#[derive(Clone, Debug)]
pub struct ReportConfig {
    pub api_url: String,
    pub output_dir: PathBuf,
    pub html_file_name: String,
    pub chart_file_name: String,
    pub chart_width: u32,
    pub chart_height: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            output_dir: PathBuf::new(),
            html_file_name: DEFAULT_HTML_FILE.to_string(),
            chart_file_name: DEFAULT_CHART_FILE.to_string(),
            chart_width: chart::DEFAULT_WIDTH,
            chart_height: chart::DEFAULT_HEIGHT,
        }
    }
}

/// Result of one run. Each output succeeds or fails on its own.
#[derive(Debug)]
pub struct ReportOutcome {
    pub summary: Vec<EmployeeSummary>,
    pub html: ReportResult<PathBuf>,
    pub chart: ReportResult<PathBuf>,
}

impl ReportOutcome {
    /// Both output paths, or the first output failure.
    pub fn into_paths(self) -> ReportResult<(PathBuf, PathBuf)> {
        Ok((self.html?, self.chart?))
    }
}

/// Fetches time entries, aggregates them and writes the HTML and chart reports
pub struct ReportService<S, K> {
    pub source: S,
    pub sink: K,
    pub config: ReportConfig,
}

impl<S: EntrySource, K: ReportSink> ReportService<S, K> {
    pub fn new(source: S, sink: K, config: ReportConfig) -> Self {
        info!("Creating new ReportService instance");
        Self {
            source,
            sink,
            config,
        }
    }

    /// Runs the whole pipeline once.
    ///
    /// A failed fetch aborts before anything is written. The two outputs are
    /// independent: if one cannot be rendered or persisted the other is still
    /// attempted, and both results are reported in the outcome.
    pub async fn process_report(&self) -> ReportResult<ReportOutcome> {
        let entries = self.source.fetch_entries().await?;
        info!("Processing {} time entries", entries.len());

        let summary = aggregate(&entries);
        drop(entries);

        let html = self.write_html(&summary).await;
        match &html {
            Ok(path) => info!("HTML report written to {}", path.display()),
            Err(e) => error!("HTML report failed: {}", e),
        }

        let chart = self.write_chart(&summary).await;
        match &chart {
            Ok(path) => info!("Chart written to {}", path.display()),
            Err(e) => error!("Chart report failed: {}", e),
        }

        Ok(ReportOutcome {
            summary,
            html,
            chart,
        })
    }

    async fn write_html(&self, summary: &[EmployeeSummary]) -> ReportResult<PathBuf> {
        let html = render_html(summary);
        self.sink
            .persist(&self.config.html_file_name, html.as_bytes())
            .await
    }

    async fn write_chart(&self, summary: &[EmployeeSummary]) -> ReportResult<PathBuf> {
        let model = build_chart_model(summary);
        let png_bytes = rasterize(&model, self.config.chart_width, self.config.chart_height)?;
        self.sink
            .persist(&self.config.chart_file_name, &png_bytes)
            .await
    }
}
