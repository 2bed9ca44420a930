//! JSON payloads for dashboards
//!
//! The status report is published as one JSON document so a dashboard can
//! subscribe to a single topic instead of stitching together a dozen.

use coolguard_core::report::StatusReport;
use serde::Serialize;

use crate::ConnectorError;

#[derive(Debug, Serialize)]
struct StatusDocument<'a> {
    timestamp: String,
    #[serde(flatten)]
    report: &'a StatusReport,
}

/// Status report as JSON, with the RTC timestamp in ISO-8601
pub fn status_json(report: &StatusReport) -> Result<String, ConnectorError> {
    let doc = StatusDocument { timestamp: report.at.to_string(), report };
    Ok(serde_json::to_string(&doc)?)
}
