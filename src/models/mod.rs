use serde::Deserialize;

use crate::error::{StatsError, StatsResult};

/// Index of the week total inside a record's `totals` array.
pub const WEEK_TOTAL_INDEX: usize = 7;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RecordTitle {
    pub client: String,
    pub project: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ReportRecord {
    pub title: RecordTitle,
    /// Seconds per weekday; days without entries come back as `null`.
    pub totals: Vec<Option<u64>>,
}

impl ReportRecord {
    pub fn project_key(&self) -> String {
        format!("{} - {}", self.title.client, self.title.project)
    }

    pub fn week_seconds(&self) -> u64 {
        self.totals
            .get(WEEK_TOTAL_INDEX)
            .copied()
            .flatten()
            .unwrap_or(0)
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct RawReport {
    #[serde(default)]
    data: Option<Vec<ReportRecord>>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportResponse {
    Success(Vec<ReportRecord>),
    Failure(String),
}

impl ReportResponse {
    pub fn from_json(body: &str) -> StatsResult<Self> {
        let raw: RawReport = serde_json::from_str(body)?;

        match (raw.data, raw.error) {
            (Some(records), _) => {
                if let Some(short) = records.iter().find(|r| r.totals.len() <= WEEK_TOTAL_INDEX) {
                    return Err(StatsError::MalformedResponse(format!(
                        "record '{}' has {} totals, expected {}",
                        short.project_key(),
                        short.totals.len(),
                        WEEK_TOTAL_INDEX + 1
                    )));
                }
                Ok(ReportResponse::Success(records))
            }
            (None, Some(error)) => Ok(ReportResponse::Failure(error.message)),
            (None, None) => Err(StatsError::MalformedResponse(
                "response has neither data nor error".to_string(),
            )),
        }
    }

    pub fn into_records(self) -> StatsResult<Vec<ReportRecord>> {
        match self {
            ReportResponse::Success(records) => Ok(records),
            ReportResponse::Failure(message) => Err(StatsError::Api(message)),
        }
    }
}
