//! The capability every draw source implements, and the registry of known
//! sources.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use fc3d_core::RawDraw;

use crate::SourceError;

/// One external provider of draw results.
///
/// `fetch` reports every failure as a [`SourceError`]; implementations do not
/// panic on bad payloads. Individual rows that cannot be parsed are skipped
/// instead of failing the batch.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Short stable name used in logs and reports.
    fn name(&self) -> &'static str;

    async fn fetch(&self) -> Result<Vec<RawDraw>, SourceError>;
}

/// Known providers. The order of a `[SourceKind]` list is the merge
/// precedence: first listed wins on conflicting periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// China Welfare Lottery draw-notice API (operator).
    Cwl,
    /// zhcw.com paginated JSON API.
    Zhcw,
    /// datachart.500.com history table.
    FiveHundred,
    /// data.17500.cn plain-text history.
    Data17500,
}

impl SourceKind {
    /// Operator first, then its affiliated portal, then the two aggregators.
    pub const DEFAULT_PRECEDENCE: [SourceKind; 4] =
        [Self::Cwl, Self::Zhcw, Self::FiveHundred, Self::Data17500];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cwl => "cwl",
            Self::Zhcw => "zhcw",
            Self::FiveHundred => "500",
            Self::Data17500 => "17500",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cwl" => Ok(Self::Cwl),
            "zhcw" => Ok(Self::Zhcw),
            "500" | "fivehundred" => Ok(Self::FiveHundred),
            "17500" => Ok(Self::Data17500),
            other => Err(format!(
                "unknown source {other:?} (expected one of: cwl, zhcw, 500, 17500)"
            )),
        }
    }
}

/// Parse three digit tokens such as `["5", "0", "8"]`.
///
/// Returns `None` unless there are exactly three tokens and each is a single
/// digit 0–9.
pub fn digits_from_tokens<'a, I>(tokens: I) -> Option<[u8; 3]>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = [0u8; 3];
    let mut count = 0;
    for tok in tokens {
        let tok = tok.trim();
        if tok.is_empty() {
            continue;
        }
        if count == 3 {
            return None;
        }
        let digit: u8 = tok.parse().ok()?;
        if digit > 9 {
            return None;
        }
        out[count] = digit;
        count += 1;
    }
    (count == 3).then_some(out)
}
