use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReadingStatus {
    Pass,
    Fail,
}

impl ReadingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingStatus::Pass => "PASS",
            ReadingStatus::Fail => "FAIL",
        }
    }
}

/// One committed measurement in the audit trail. Entries are never edited
/// after they are appended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticLogEntry {
    pub timestamp: DateTime<Utc>,
    pub step_id: String,
    /// Reading as typed plus the step's unit, e.g. `"5.0 V"`.
    pub value: String,
    pub status: ReadingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Value read off a multimeter display by the OCR collaborator. `value` is
/// free-form and may not parse as a number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeterReading {
    pub value: String,
    pub unit: String,
}
