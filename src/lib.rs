//! Employee Time Report Library
//!
//! This library fetches employee time entries, totals the hours worked per
//! employee, and renders the result as an HTML table and a PNG pie chart.

pub mod error;
pub mod helpers;
pub mod models;
pub mod service;

pub use error::{ReportError, ReportResult};
pub use service::{ReportConfig, ReportOutcome, ReportService};

// Re-export key types for convenience
pub use helpers::aggregate::aggregate;
pub use helpers::api::{EntrySource, HttpEntrySource};
pub use helpers::chart::{ChartModel, PieSlice, build_chart_model, rasterize};
pub use helpers::html::render_html;
pub use helpers::output::{FileSink, ReportSink};
pub use models::time_entry::{EmployeeSummary, TimeEntry};
