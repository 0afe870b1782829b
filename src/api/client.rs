use crate::config::Settings;
use crate::error::{StatsError, StatsResult};
use crate::models::ReportResponse;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{header, Client, ClientBuilder};
use tracing::{debug, instrument};

pub const BASE_URL: &str = "https://api.track.toggl.com";
const WEEKLY_REPORT_PATH: &str = "/reports/api/v2/weekly";
const REPORT_USER_AGENT: &str = "toggl-stats";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Anything that can hand back a decoded weekly report.
#[async_trait]
pub trait ReportSource: Send + Sync {
    async fn weekly_report(
        &self,
        settings: &Settings,
        since: NaiveDate,
    ) -> StatsResult<ReportResponse>;
}

#[derive(Debug, Clone)]
pub struct TogglClient {
    client: Client,
    base_url: String,
}

impl TogglClient {
    pub fn new(base_url: impl Into<String>) -> StatsResult<Self> {
        Self::from_builder(Client::builder(), base_url)
    }

    fn from_builder(builder: ClientBuilder, base_url: impl Into<String>) -> StatsResult<Self> {
        let client = builder.user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn weekly_url(&self) -> String {
        format!("{}{}", self.base_url, WEEKLY_REPORT_PATH)
    }

    /// Issues the request and buffers the whole body. HTTP error statuses are not
    /// treated as failures here since the API reports its errors in the body.
    #[instrument(skip(self, settings), fields(workspace = %settings.workspace))]
    pub async fn fetch_weekly(
        &self,
        settings: &Settings,
        since: NaiveDate,
    ) -> StatsResult<(u16, String)> {
        let since = since.format("%Y-%m-%d").to_string();
        let response = self
            .client
            .get(self.weekly_url())
            .query(&[
                ("user_agent", REPORT_USER_AGENT),
                ("workspace_id", settings.workspace.as_str()),
                ("since", since.as_str()),
            ])
            .basic_auth(&settings.token, Some("api_token"))
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "weekly report received");

        Ok((status.as_u16(), body))
    }
}

/// Decodes a buffered body. A non-2xx response whose body is not a report
/// becomes an API error carrying the status and the raw text.
pub fn decode_body(status: u16, body: &str) -> StatsResult<ReportResponse> {
    match ReportResponse::from_json(body) {
        Ok(response) => Ok(response),
        Err(StatsError::MalformedResponse(_)) if !(200..300).contains(&status) => Err(
            StatsError::Api(format!("Request failed: {} - {}", status, body.trim())),
        ),
        Err(err) => Err(err),
    }
}

#[async_trait]
impl ReportSource for TogglClient {
    async fn weekly_report(
        &self,
        settings: &Settings,
        since: NaiveDate,
    ) -> StatsResult<ReportResponse> {
        let (status, body) = self.fetch_weekly(settings, since).await?;
        decode_body(status, &body)
    }
}
