//! China Welfare Lottery draw-notice API.

use async_trait::async_trait;
use chrono::NaiveDate;
use fc3d_core::{period, RawDraw};
use serde::Deserialize;
use tracing::{debug, info};

use crate::adapter::digits_from_tokens;
use crate::http::get_text;
use crate::{SourceAdapter, SourceError};

const BASE_URL: &str = "https://www.cwl.gov.cn/cwl_admin/front/cwlkj/search/kjxx/findDrawNotice";
const REFERER: &str = "https://www.cwl.gov.cn/ygkj/wqkjgg/fc3d/";

pub struct CwlAdapter {
    client: reqwest::Client,
    issue_count: usize,
}

#[derive(Deserialize)]
struct NoticeResponse {
    state: i64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: Vec<Notice>,
}

#[derive(Deserialize)]
struct Notice {
    code: String,
    /// e.g. `2025-09-08(一)`.
    #[serde(default)]
    date: String,
    /// e.g. `5,0,8`.
    red: String,
}

impl CwlAdapter {
    pub fn new(client: reqwest::Client, issue_count: usize) -> Self {
        Self {
            client,
            issue_count,
        }
    }

    fn url(&self) -> String {
        format!("{BASE_URL}?name=3d&issueCount={}", self.issue_count)
    }
}

#[async_trait]
impl SourceAdapter for CwlAdapter {
    fn name(&self) -> &'static str {
        "cwl"
    }

    async fn fetch(&self) -> Result<Vec<RawDraw>, SourceError> {
        let body = get_text(&self.client, &self.url(), Some(REFERER)).await?;
        let draws = parse_payload(&body)?;
        info!(count = draws.len(), "parsed cwl notices");
        Ok(draws)
    }
}

/// Parse a draw-notice response body.
pub fn parse_payload(body: &str) -> Result<Vec<RawDraw>, SourceError> {
    let resp: NoticeResponse = serde_json::from_str(body)?;
    if resp.state != 0 {
        return Err(SourceError::Malformed(format!(
            "state {}: {}",
            resp.state, resp.message
        )));
    }

    let draws = resp
        .result
        .into_iter()
        .filter_map(|notice| {
            let period = period::extract(&notice.code);
            let numbers = digits_from_tokens(notice.red.split(','));
            match (period, numbers) {
                (Some(period), Some(numbers)) => {
                    Some(RawDraw::new(period, numbers, parse_notice_date(&notice.date)))
                }
                _ => {
                    debug!(code = %notice.code, red = %notice.red, "skipping cwl notice");
                    None
                }
            }
        })
        .collect();
    Ok(draws)
}

/// `2025-09-08(一)` → 2025-09-08. The weekday suffix is ignored.
fn parse_notice_date(raw: &str) -> Option<NaiveDate> {
    let head = raw.get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}
