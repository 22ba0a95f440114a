use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::WorkbenchError;
use crate::models::{
    AnalysisResult, AssistantMode, DiagnosticLogEntry, MeterReading, NetCategory, ProbingStep,
    ReadingStatus,
};

pub const PASS_NARRATION: &str = "Reading valid. Proceeding to next step.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SessionPhase {
    /// No analysis active.
    Idle,
    /// Analysis active but it has no probing steps.
    Reviewing,
    /// An analysis or meter request is in flight.
    Capturing,
    /// A probing step is current and waiting for a reading.
    StepActive,
}

/// What the next frame is used for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CaptureKind {
    Analysis,
    MeterReading,
}

/// Everything the measurement protocol needs between events. Each transition
/// below borrows the current state and returns the next one; the caller swaps
/// it in.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub analysis: Option<Arc<AnalysisResult>>,
    pub step_index: usize,
    pub reading: String,
    /// Newest first. Only ever grows.
    pub history: Vec<DiagnosticLogEntry>,
    pub awaiting_meter_capture: bool,
    pub in_flight: Option<CaptureKind>,
    pub mode: AssistantMode,
    pub net_filter: Option<NetCategory>,
    pub last_error: Option<String>,
}

/// Next state plus whatever the operator should hear about it.
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: SessionState,
    pub narration: Option<String>,
}

impl Transition {
    fn silent(state: SessionState) -> Self {
        Self {
            state,
            narration: None,
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: AssistantMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> SessionPhase {
        if self.in_flight.is_some() {
            SessionPhase::Capturing
        } else if self.analysis.is_none() {
            SessionPhase::Idle
        } else if self.current_step().is_some() {
            SessionPhase::StepActive
        } else {
            SessionPhase::Reviewing
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn current_step(&self) -> Option<&ProbingStep> {
        self.analysis
            .as_ref()
            .and_then(|analysis| analysis.steps.get(self.step_index))
    }

    pub fn step_count(&self) -> usize {
        self.analysis
            .as_ref()
            .map(|analysis| analysis.steps.len())
            .unwrap_or(0)
    }

    /// Marks a capture as in flight. A second capture while one is
    /// outstanding is rejected, not queued.
    pub fn capture_started(&self) -> Result<(SessionState, CaptureKind), WorkbenchError> {
        if let Some(kind) = self.in_flight {
            debug!("rejecting capture: {kind:?} request still outstanding");
            return Err(WorkbenchError::Busy);
        }

        let kind = if self.awaiting_meter_capture {
            CaptureKind::MeterReading
        } else {
            CaptureKind::Analysis
        };

        let mut next = self.clone();
        next.in_flight = Some(kind);
        next.last_error = None;
        Ok((next, kind))
    }

    /// Installs a fresh analysis. Step position, pending reading and the meter
    /// flag start over; the audit trail is kept.
    pub fn analysis_succeeded(&self, result: AnalysisResult) -> Transition {
        let narration = Some(result.general_recommendation.clone());
        let mut next = self.clone();
        next.analysis = Some(Arc::new(result));
        next.step_index = 0;
        next.reading.clear();
        next.awaiting_meter_capture = false;
        next.in_flight = None;
        next.last_error = None;
        Transition {
            state: next,
            narration,
        }
    }

    /// Leaves the previous analysis and the audit trail untouched.
    pub fn analysis_failed(&self, error: &WorkbenchError) -> SessionState {
        let mut next = self.clone();
        next.in_flight = None;
        next.last_error = Some(error.to_string());
        next
    }

    /// OCR only ever feeds the pending reading.
    pub fn meter_read(&self, meter: &MeterReading) -> Transition {
        let mut next = self.clone();
        next.reading = meter.value.trim().to_string();
        next.awaiting_meter_capture = false;
        next.in_flight = None;
        next.last_error = None;
        Transition {
            state: next,
            narration: Some(format!("Value detected: {} {}", meter.value, meter.unit)),
        }
    }

    /// The meter flag stays armed so the operator can simply re-shoot.
    pub fn meter_failed(&self, error: &WorkbenchError) -> SessionState {
        let mut next = self.clone();
        next.in_flight = None;
        next.last_error = Some(error.to_string());
        next
    }

    /// Settles whichever capture is outstanding as failed.
    pub fn capture_failed(&self, error: &WorkbenchError) -> SessionState {
        match self.in_flight {
            Some(CaptureKind::MeterReading) => self.meter_failed(error),
            _ => self.analysis_failed(error),
        }
    }

    pub fn reading_changed(&self, reading: &str) -> SessionState {
        let mut next = self.clone();
        next.reading = reading.to_string();
        next
    }

    pub fn meter_capture_armed(&self, armed: bool) -> Result<SessionState, WorkbenchError> {
        if armed && self.analysis.is_none() {
            return Err(WorkbenchError::NoAnalysis);
        }
        let mut next = self.clone();
        next.awaiting_meter_capture = armed;
        Ok(next)
    }

    pub fn mode_changed(&self, mode: AssistantMode) -> SessionState {
        let mut next = self.clone();
        next.mode = mode;
        next
    }

    pub fn net_filter_changed(&self, filter: Option<NetCategory>) -> SessionState {
        let mut next = self.clone();
        next.net_filter = filter;
        next
    }

    /// Checks the pending reading against the current step.
    ///
    /// Only acts in [`SessionPhase::StepActive`] with a reading that parses as
    /// a finite decimal; anything else returns the state unchanged. In range
    /// logs PASS and advances unless this is the last step. Out of range logs
    /// FAIL with the step's fault theory and keeps both the step and the
    /// reading so the operator can re-measure.
    pub fn commit_reading(&self, at: DateTime<Utc>) -> Transition {
        if self.phase() != SessionPhase::StepActive {
            return Transition::silent(self.clone());
        }
        let Some(step) = self.current_step() else {
            return Transition::silent(self.clone());
        };
        let Some(actual) = parse_reading(&self.reading) else {
            debug!("ignoring commit of unparseable reading {:?}", self.reading);
            return Transition::silent(self.clone());
        };

        let range = &step.expected_range;
        let status = if range.contains(actual) {
            ReadingStatus::Pass
        } else {
            ReadingStatus::Fail
        };
        let entry = DiagnosticLogEntry {
            timestamp: at,
            step_id: step.id.clone(),
            value: format!("{} {}", self.reading.trim(), range.unit),
            status,
            note: match status {
                ReadingStatus::Pass => None,
                ReadingStatus::Fail => Some(step.fault_theory.clone()),
            },
        };
        info!(
            "step {} ({}) read {} -> {}",
            self.step_index + 1,
            step.id,
            entry.value,
            status.as_str()
        );

        let narration = match status {
            ReadingStatus::Pass => PASS_NARRATION.to_string(),
            ReadingStatus::Fail => format!("Fault detected. Theory: {}", step.fault_theory),
        };
        let is_last = self.step_index + 1 >= self.step_count();

        let mut next = self.clone();
        next.history.insert(0, entry);
        if status == ReadingStatus::Pass && !is_last {
            next.step_index += 1;
            next.reading.clear();
        }

        Transition {
            state: next,
            narration: Some(narration),
        }
    }

    /// Drops the analysis but keeps the audit trail and the mode. An
    /// outstanding request stays tracked until it settles.
    pub fn reset(&self) -> SessionState {
        let mut next = self.clone();
        next.analysis = None;
        next.step_index = 0;
        next.reading.clear();
        next.awaiting_meter_capture = false;
        next.last_error = None;
        next
    }
}

/// Strict decimal parse of an operator or OCR reading.
pub fn parse_reading(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}
