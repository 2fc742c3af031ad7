//! datachart.500.com 3D history table.
//!
//! The page lists one draw per `<tr class="t_tr1">` inside the element with
//! `id="tdata"`. The first cell holds the period; the digits follow either
//! one per cell or space-separated in a single cell. No draw date is
//! published, so dates are derived from the period downstream.

use async_trait::async_trait;
use fc3d_core::{period, RawDraw};
use tracing::{debug, info};

use crate::adapter::digits_from_tokens;
use crate::http::get_text;
use crate::markup;
use crate::{SourceAdapter, SourceError};

const URL: &str = "https://datachart.500.com/sd/history/newinc/history.php";

pub struct FiveHundredAdapter {
    client: reqwest::Client,
    max_rows: usize,
}

impl FiveHundredAdapter {
    pub fn new(client: reqwest::Client, max_rows: usize) -> Self {
        Self { client, max_rows }
    }
}

#[async_trait]
impl SourceAdapter for FiveHundredAdapter {
    fn name(&self) -> &'static str {
        "500"
    }

    async fn fetch(&self) -> Result<Vec<RawDraw>, SourceError> {
        let html = get_text(&self.client, URL, None).await?;
        let draws = parse_doc(&html, self.max_rows)?;
        info!(count = draws.len(), "parsed 500.com rows");
        Ok(draws)
    }
}

/// Parse the history page, keeping at most `max_rows` draws.
pub fn parse_doc(html: &str, max_rows: usize) -> Result<Vec<RawDraw>, SourceError> {
    let table = ["tbody", "table"]
        .iter()
        .flat_map(|tag| markup::blocks(html, tag))
        .find(|block| markup::has_attr(block, "id", "tdata"))
        .ok_or_else(|| SourceError::Malformed("no #tdata table".into()))?;

    let draws = markup::blocks(table, "tr")
        .into_iter()
        .filter(|row| markup::has_attr(row, "class", "t_tr1"))
        .filter_map(parse_row)
        .take(max_rows)
        .collect();
    Ok(draws)
}

fn parse_row(row: &str) -> Option<RawDraw> {
    let cells: Vec<String> = markup::blocks(row, "td").into_iter().map(markup::text).collect();
    if cells.len() < 2 {
        return None;
    }
    let Some(period) = period::extract(&cells[0]) else {
        debug!(cell = %cells[0], "skipping 500.com row without period");
        return None;
    };

    let numbers = cells
        .get(1..4)
        .and_then(|three| digits_from_tokens(three.iter().map(String::as_str)))
        .or_else(|| digits_from_tokens(cells[1].split_whitespace()));

    match numbers {
        Some(numbers) => Some(RawDraw::new(period, numbers, None)),
        None => {
            debug!(period = %period, "skipping 500.com row without digits");
            None
        }
    }
}
