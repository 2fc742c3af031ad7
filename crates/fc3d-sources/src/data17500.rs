//! data.17500.cn plain-text history, newest first.
//!
//! One draw per line: `period date d0 d1 d2 [extra columns...]`.

use async_trait::async_trait;
use chrono::NaiveDate;
use fc3d_core::{period, RawDraw};
use tracing::info;

use crate::adapter::digits_from_tokens;
use crate::http::get_text;
use crate::{SourceAdapter, SourceError};

const URL: &str = "https://data.17500.cn/3d_desc.txt";

pub struct Data17500Adapter {
    client: reqwest::Client,
    max_rows: usize,
}

impl Data17500Adapter {
    pub fn new(client: reqwest::Client, max_rows: usize) -> Self {
        Self { client, max_rows }
    }
}

#[async_trait]
impl SourceAdapter for Data17500Adapter {
    fn name(&self) -> &'static str {
        "17500"
    }

    async fn fetch(&self) -> Result<Vec<RawDraw>, SourceError> {
        let body = get_text(&self.client, URL, None).await?;
        let draws = parse_text(&body, self.max_rows)?;
        info!(count = draws.len(), "parsed 17500 lines");
        Ok(draws)
    }
}

/// Parse the text listing, keeping at most `max_rows` draws.
///
/// A non-empty body without a single parseable line is treated as a
/// malformed payload (usually an HTML error page).
pub fn parse_text(body: &str, max_rows: usize) -> Result<Vec<RawDraw>, SourceError> {
    let draws: Vec<RawDraw> = body
        .lines()
        .filter_map(parse_line)
        .take(max_rows)
        .collect();

    if draws.is_empty() && !body.trim().is_empty() {
        return Err(SourceError::Malformed("no parseable draw lines".into()));
    }
    Ok(draws)
}

fn parse_line(line: &str) -> Option<RawDraw> {
    let cols: Vec<&str> = line.split_whitespace().collect();
    if cols.len() < 5 {
        return None;
    }
    if cols[0].len() != period::PERIOD_LEN && cols[0].len() != period::SHORT_PERIOD_LEN {
        return None;
    }
    let period = period::extract(cols[0])?;
    let date = NaiveDate::parse_from_str(cols[1], "%Y-%m-%d").ok();
    let numbers = digits_from_tokens(cols[2..5].iter().copied())?;
    Some(RawDraw::new(period, numbers, date))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = "\
2025242 2025-09-08 5 0 8 1 2 3
2025241 2025-09-07 3 3 7
garbage line
2025240 ???? 2 3 4 9 9 9
2025239 2025-09-05 1 2
";

    #[test]
    fn parses_lines() {
        let draws = parse_text(FIXTURE, 50).unwrap();
        assert_eq!(draws.len(), 3);
        assert_eq!(draws[0].period, "2025242");
        assert_eq!(draws[0].numbers, [5, 0, 8]);
        assert_eq!(draws[0].date, NaiveDate::from_ymd_opt(2025, 9, 8));
        assert_eq!(draws[2].period, "2025240");
        assert_eq!(draws[2].date, None);
    }

    #[test]
    fn respects_row_limit() {
        assert_eq!(parse_text(FIXTURE, 2).unwrap().len(), 2);
    }

    #[test]
    fn html_body_is_malformed() {
        let err = parse_text("<html><body>403 Forbidden</body></html>", 50).unwrap_err();
        assert!(matches!(err, SourceError::Malformed(_)));
    }

    #[test]
    fn empty_body_is_empty() {
        assert!(parse_text("", 50).unwrap().is_empty());
    }
}
