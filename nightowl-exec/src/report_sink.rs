use std::sync::Mutex;

use nightowl_core::RunReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Where the aggregate report goes after each session, on interrupt and
/// before a fatal error is returned.
pub trait ReportSink: Send + Sync {
    fn emit(&self, report: &RunReport);
}

pub struct StdoutReportSink {
    format: ReportFormat,
}

impl StdoutReportSink {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }
}

impl ReportSink for StdoutReportSink {
    fn emit(&self, report: &RunReport) {
        match self.format {
            ReportFormat::Text => println!("{}", report.render_text()),
            ReportFormat::Json => {
                println!("{}", serde_json::to_string(report).unwrap_or_default())
            }
        }
    }
}

/// Keeps every emitted report.
#[derive(Default)]
pub struct MemoryReportSink {
    reports: Mutex<Vec<RunReport>>,
}

impl MemoryReportSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<RunReport> {
        self.reports.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<RunReport> {
        self.reports().pop()
    }
}

impl ReportSink for MemoryReportSink {
    fn emit(&self, report: &RunReport) {
        if let Ok(mut reports) = self.reports.lock() {
            reports.push(report.clone());
        }
    }
}
