use serde::Serialize;
use uuid::Uuid;

use backend_domain::BenfordReport;

use crate::commands::benford_commands::BenfordRun;

/// JSON shape of an analysis. Warnings use the same shape with `report`
/// left out, so callers render `message` inline instead of an error page.
#[derive(Debug, Clone, Serialize)]
pub struct BenfordResponse {
    pub analysis_id: Uuid,
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<BenfordReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_data_uri: Option<String>,
}

impl From<BenfordRun> for BenfordResponse {
    fn from(run: BenfordRun) -> Self {
        let status = run.outcome.status();
        let message = run.outcome.message();
        let report = run.outcome.report().cloned();
        let chart_data_uri = report.as_ref().and_then(BenfordReport::chart_data_uri);
        Self {
            analysis_id: run.analysis_id,
            status,
            message,
            report,
            chart_data_uri,
        }
    }
}
