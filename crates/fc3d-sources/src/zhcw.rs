//! zhcw.com draw history API.
//!
//! The endpoint is paginated. Pages are requested one at a time with a short
//! pause in between so the portal is not hit in a burst.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use fc3d_core::{period, RawDraw};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::adapter::digits_from_tokens;
use crate::http::{request, send_text, HttpSettings};
use crate::{SourceAdapter, SourceError};

const BASE_URL: &str = "https://jc.zhcw.com/port/client_json.php";
const REFERER: &str = "https://www.zhcw.com/";
/// zhcw's lottery id for Fucai 3D.
const LOTTERY_ID: u32 = 2;

pub struct ZhcwAdapter {
    client: reqwest::Client,
    page_size: usize,
    max_pages: u32,
    page_delay: Duration,
    page_timeout: Duration,
}

/// The API returns every scalar as a string.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageResponse {
    res_code: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    pages: Option<String>,
    #[serde(default)]
    data: Vec<Issue>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Issue {
    issue: String,
    #[serde(default)]
    open_time: String,
    /// e.g. `5 0 8`.
    front_winning_num: String,
}

/// One parsed page.
#[derive(Debug)]
pub struct Page {
    pub draws: Vec<RawDraw>,
    /// Total page count reported by the server, when present.
    pub pages: Option<u32>,
}

impl ZhcwAdapter {
    pub fn new(client: reqwest::Client, settings: &HttpSettings) -> Self {
        Self {
            client,
            page_size: settings.page_size,
            max_pages: settings.max_pages.max(1),
            page_delay: settings.page_delay,
            page_timeout: settings.page_timeout(),
        }
    }

    fn url(&self, page: u32) -> String {
        format!(
            "{BASE_URL}?transactionType=10001001&lotteryId={LOTTERY_ID}&issueCount={}&type=0&pageNum={page}&pageSize={}",
            self.page_size * self.max_pages as usize,
            self.page_size
        )
    }
}

#[async_trait]
impl SourceAdapter for ZhcwAdapter {
    fn name(&self) -> &'static str {
        "zhcw"
    }

    async fn fetch(&self) -> Result<Vec<RawDraw>, SourceError> {
        let mut draws = Vec::new();

        for page_num in 1..=self.max_pages {
            if page_num > 1 && !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }

            let req = request(&self.client, &self.url(page_num), Some(REFERER)).timeout(self.page_timeout);
            let page = match send_text(req)
                .await
                .and_then(|body| parse_page(&body))
            {
                Ok(page) => page,
                // Keep what earlier pages produced.
                Err(e) if !draws.is_empty() => {
                    warn!(page = page_num, error = %e, "zhcw page failed, keeping earlier pages");
                    break;
                }
                Err(e) => return Err(e),
            };

            let last = page.draws.is_empty() || page.pages.is_some_and(|p| page_num >= p);
            draws.extend(page.draws);
            if last {
                break;
            }
        }

        info!(count = draws.len(), "parsed zhcw issues");
        Ok(draws)
    }
}

/// Parse one page of the history response.
pub fn parse_page(body: &str) -> Result<Page, SourceError> {
    let resp: PageResponse = serde_json::from_str(body.trim())?;
    if resp.res_code != "000000" {
        return Err(SourceError::Malformed(format!(
            "resCode {}: {}",
            resp.res_code, resp.message
        )));
    }

    let draws = resp
        .data
        .into_iter()
        .filter_map(|issue| {
            let period = period::extract(&issue.issue);
            let numbers = digits_from_tokens(issue.front_winning_num.split_whitespace());
            match (period, numbers) {
                (Some(period), Some(numbers)) => {
                    let date = NaiveDate::parse_from_str(issue.open_time.trim(), "%Y-%m-%d").ok();
                    Some(RawDraw::new(period, numbers, date))
                }
                _ => {
                    debug!(issue = %issue.issue, "skipping zhcw issue");
                    None
                }
            }
        })
        .collect();

    Ok(Page {
        draws,
        pages: resp.pages.and_then(|p| p.trim().parse().ok()),
    })
}
