//! Persisted document shapes.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::draw::DrawResult;

/// Full window of recent draws, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub success: bool,
    #[serde(with = "update_time")]
    pub update_time: NaiveDateTime,
    pub total: usize,
    pub data: Vec<DrawResult>,
}

impl Snapshot {
    pub fn new(data: Vec<DrawResult>, update_time: NaiveDateTime) -> Self {
        Self {
            success: true,
            update_time,
            total: data.len(),
            data,
        }
    }

    /// Newest record, if any.
    pub fn latest(&self) -> Option<&DrawResult> {
        self.data.first()
    }

    /// True when the snapshot holds only the fallback placeholder.
    pub fn is_degraded(&self) -> bool {
        self.data.iter().all(DrawResult::is_degraded) && !self.data.is_empty()
    }
}

/// Single newest draw, written next to the snapshot for cheap reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestView {
    pub success: bool,
    #[serde(with = "update_time")]
    pub update_time: NaiveDateTime,
    pub latest: DrawResult,
}

impl LatestView {
    pub fn new(latest: DrawResult, update_time: NaiveDateTime) -> Self {
        Self {
            success: true,
            update_time,
            latest,
        }
    }
}

/// `updateTime` as `YYYY-MM-DD HH:MM:SS`.
pub mod update_time {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, 8)
            .unwrap()
            .and_hms_opt(21, 30, 5)
            .unwrap()
    }

    fn draw(p: &str, n: [u8; 3]) -> DrawResult {
        DrawResult::new(p, n, NaiveDate::from_ymd_opt(2025, 9, 8).unwrap()).unwrap()
    }

    #[test]
    fn snapshot_envelope() {
        let snap = Snapshot::new(vec![draw("2025242", [1, 2, 3]), draw("2025241", [4, 4, 4])], ts());
        let value = serde_json::to_value(&snap).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["updateTime"], "2025-09-08 21:30:05");
        assert_eq!(value["total"], 2);
        assert_eq!(value["data"][0]["period"], "2025242");
        assert_eq!(value["data"][1]["type"], "Triple");
    }

    #[test]
    fn latest_envelope() {
        let view = LatestView::new(draw("2025242", [1, 2, 3]), ts());
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["updateTime"], "2025-09-08 21:30:05");
        assert_eq!(value["latest"]["span"], 2);
        assert!(value.get("data").is_none());
        assert!(value.get("total").is_none());
    }

    #[test]
    fn snapshot_json_roundtrip() {
        let snap = Snapshot::new(vec![draw("2025242", [0, 9, 9]), draw("2025240", [3, 5, 7])], ts());
        let json = serde_json::to_string_pretty(&snap).unwrap();
        let parsed: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snap);
    }

    #[test]
    fn bad_update_time_rejected() {
        let json = r#"{"success": true, "updateTime": "yesterday", "total": 0, "data": []}"#;
        assert!(serde_json::from_str::<Snapshot>(json).is_err());
    }

    #[test]
    fn degraded_detection() {
        let normal = Snapshot::new(vec![draw("2025242", [1, 2, 3])], ts());
        assert!(!normal.is_degraded());
        let placeholder = Snapshot::new(vec![draw("2025251", [0, 0, 0]).with_note("offline")], ts());
        assert!(placeholder.is_degraded());
        assert!(!Snapshot::new(vec![], ts()).is_degraded());
    }
}
