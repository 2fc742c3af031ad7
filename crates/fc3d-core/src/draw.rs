//! Canonical draw records and the three-digit classifier.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::period;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DrawError {
    #[error("invalid period {0:?}: expected YYYYDDD with a day inside the year")]
    InvalidPeriod(String),
    #[error("digit out of range in {0:?}")]
    DigitOutOfRange([u8; 3]),
    #[error("derived field {field} does not match numbers {numbers:?}")]
    Inconsistent {
        field: &'static str,
        numbers: [u8; 3],
    },
}

/// Categorical shape of a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DrawType {
    /// All three digits identical.
    Triple,
    /// Exactly one repeated digit.
    Pair,
    /// Three consecutive digits in any order.
    Straight,
    /// Three distinct, non-consecutive digits.
    Mixed,
}

impl DrawType {
    pub const ALL: [DrawType; 4] = [Self::Triple, Self::Pair, Self::Straight, Self::Mixed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Triple => "Triple",
            Self::Pair => "Pair",
            Self::Straight => "Straight",
            Self::Mixed => "Mixed",
        }
    }

    /// Conventional label used on Chinese lottery sites.
    pub fn label_zh(&self) -> &'static str {
        match self {
            Self::Triple => "豹子",
            Self::Pair => "对子",
            Self::Straight => "顺子",
            Self::Mixed => "组六",
        }
    }
}

/// Compute `(sum, span, type)` for three digits.
///
/// Pure and total over `[0, 9]^3`; the result depends only on the multiset
/// of digits, not their order.
pub fn classify(numbers: [u8; 3]) -> (u8, u8, DrawType) {
    let mut sorted = numbers;
    sorted.sort_unstable();
    let [lo, mid, hi] = sorted;

    let sum = lo + mid + hi;
    let span = hi - lo;

    let draw_type = if lo == hi {
        DrawType::Triple
    } else if lo == mid || mid == hi {
        DrawType::Pair
    } else if mid - lo == 1 && hi - mid == 1 {
        DrawType::Straight
    } else {
        DrawType::Mixed
    };

    (sum, span, draw_type)
}

/// One draw as reported by a single source, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDraw {
    pub period: String,
    pub numbers: [u8; 3],
    /// `None` when the source does not publish a draw date.
    pub date: Option<NaiveDate>,
}

impl RawDraw {
    pub fn new(period: impl Into<String>, numbers: [u8; 3], date: Option<NaiveDate>) -> Self {
        Self {
            period: period.into(),
            numbers,
            date,
        }
    }
}

/// A classified draw. Derived fields are computed at construction and
/// cannot be set independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredDraw")]
pub struct DrawResult {
    period: String,
    numbers: [u8; 3],
    date: NaiveDate,
    sum: u8,
    span: u8,
    #[serde(rename = "type")]
    draw_type: DrawType,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

impl DrawResult {
    /// Build a draw, validating the period and digit range. The period must
    /// name a real day of its year even when the date is supplied separately.
    pub fn new(period: impl Into<String>, numbers: [u8; 3], date: NaiveDate) -> Result<Self, DrawError> {
        let period = period.into();
        if period::date_from_period(&period).is_none() {
            return Err(DrawError::InvalidPeriod(period));
        }
        if numbers.iter().any(|&n| n > 9) {
            return Err(DrawError::DigitOutOfRange(numbers));
        }
        let (sum, span, draw_type) = classify(numbers);
        Ok(Self {
            period,
            numbers,
            date,
            sum,
            span,
            draw_type,
            note: None,
        })
    }

    /// Normalise a raw source item. The date falls back to the one encoded
    /// in the period.
    pub fn from_raw(raw: RawDraw) -> Result<Self, DrawError> {
        let date = match raw.date {
            Some(d) => d,
            None => period::date_from_period(&raw.period)
                .ok_or_else(|| DrawError::InvalidPeriod(raw.period.clone()))?,
        };
        Self::new(raw.period, raw.numbers, date)
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn period(&self) -> &str {
        &self.period
    }

    pub fn numbers(&self) -> [u8; 3] {
        self.numbers
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn sum(&self) -> u8 {
        self.sum
    }

    pub fn span(&self) -> u8 {
        self.span
    }

    pub fn draw_type(&self) -> DrawType {
        self.draw_type
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// True for the placeholder written when no source produced data.
    pub fn is_degraded(&self) -> bool {
        self.note.is_some()
    }
}

/// Wire shape of a persisted record; checked against the classifier on load.
#[derive(Deserialize)]
struct StoredDraw {
    period: String,
    numbers: [u8; 3],
    date: NaiveDate,
    sum: u8,
    span: u8,
    #[serde(rename = "type")]
    draw_type: DrawType,
    #[serde(default)]
    note: Option<String>,
}

impl TryFrom<StoredDraw> for DrawResult {
    type Error = DrawError;

    fn try_from(stored: StoredDraw) -> Result<Self, Self::Error> {
        let mut draw = DrawResult::new(stored.period, stored.numbers, stored.date)?;
        let field = if draw.sum != stored.sum {
            Some("sum")
        } else if draw.span != stored.span {
            Some("span")
        } else if draw.draw_type != stored.draw_type {
            Some("type")
        } else {
            None
        };
        if let Some(field) = field {
            return Err(DrawError::Inconsistent {
                field,
                numbers: stored.numbers,
            });
        }
        draw.note = stored.note;
        Ok(draw)
    }
}
