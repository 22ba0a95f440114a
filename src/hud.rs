//! Heads-up panels around the AR view, derived from session state alone.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{AssistantMode, Persona, ReadingStatus};
use crate::session::SessionState;

const AUDIT_TRAIL_ROWS: usize = 5;
const CAUSAL_NOTES: usize = 3;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StageChip {
    pub order: f64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StepPanel {
    pub sequence: String,
    pub title: String,
    pub description: String,
    pub expect: String,
    pub reading: String,
    pub meter_armed: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CausalNote {
    pub name: String,
    pub causal_role: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuditRow {
    /// Absent when the step belongs to an earlier analysis.
    pub step_title: Option<String>,
    pub status: ReadingStatus,
    pub value: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HudSnapshot {
    /// `TOPOLOGY_SYNC: OK` once a board is analysed, `SEEKING_QUAD` before.
    pub board_locked: bool,
    /// Locked and not re-analysing.
    pub spatial_lock: bool,
    pub mode: AssistantMode,
    pub persona: &'static str,
    pub complexity: Option<&'static str>,
    pub stages: Vec<StageChip>,
    pub step_panel: Option<StepPanel>,
    pub causal_notes: Vec<CausalNote>,
    pub safety_notes: Vec<String>,
    pub audit_trail: Vec<AuditRow>,
    pub analyzing: bool,
    pub error: Option<String>,
}

pub fn build_hud(state: &SessionState, persona: Persona) -> HudSnapshot {
    let analysis = state.analysis.as_deref();

    let board_locked = analysis.is_some();

    let step_panel = match state.mode {
        AssistantMode::Measurement => state.current_step().map(|step| StepPanel {
            sequence: format!("OP_SEQ {}/{}", state.step_index + 1, state.step_count()),
            title: step.title.clone(),
            description: step.description.clone(),
            expect: step.expected_range.describe(),
            reading: state.reading.clone(),
            meter_armed: state.awaiting_meter_capture,
        }),
        _ => None,
    };

    let causal_notes = match (state.mode, analysis) {
        (AssistantMode::Tutorial, Some(analysis)) => analysis
            .components
            .iter()
            .take(CAUSAL_NOTES)
            .map(|component| CausalNote {
                name: component.name.clone(),
                causal_role: component.causal_role.clone(),
            })
            .collect(),
        _ => Vec::new(),
    };

    let audit_trail = state
        .history
        .iter()
        .take(AUDIT_TRAIL_ROWS)
        .map(|entry| AuditRow {
            step_title: analysis
                .and_then(|analysis| analysis.step(&entry.step_id))
                .map(|step| step.title.clone()),
            status: entry.status,
            value: entry.value.clone(),
            timestamp: entry.timestamp,
        })
        .collect();

    HudSnapshot {
        board_locked,
        spatial_lock: board_locked && !state.is_busy(),
        mode: state.mode,
        persona: persona.label(),
        complexity: analysis.map(|analysis| analysis.estimated_complexity.as_str()),
        stages: analysis
            .map(|analysis| {
                analysis
                    .logic_flow
                    .iter()
                    .map(|stage| StageChip {
                        order: stage.order,
                        name: stage.name.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default(),
        step_panel,
        causal_notes,
        safety_notes: analysis
            .map(|analysis| analysis.safety_notes.clone())
            .unwrap_or_default(),
        audit_trail,
        analyzing: state.is_busy(),
        error: state.last_error.clone(),
    }
}
