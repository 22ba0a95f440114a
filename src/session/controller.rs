use chrono::Utc;
use log::{error, info, warn};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

use crate::{
    error::WorkbenchError,
    hud::{build_hud, HudSnapshot},
    inference::{AnalysisRequest, Frame, VisionCollaborator},
    models::{AssistantMode, DiagnosticLogEntry, MeterReading, NetCategory, Persona},
    narration::NarrationChannel,
    overlay::{render_scene, OverlayInput, Scene},
    settings::{OperatorSettings, SettingsStore},
};

use super::state::{CaptureKind, SessionPhase, SessionState};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkbenchSnapshot {
    pub phase: SessionPhase,
    pub state: SessionState,
    pub hud: HudSnapshot,
    pub scene: Scene,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum CaptureOutcome {
    Analyzed { components: usize, steps: usize },
    MeterRead { reading: MeterReading },
}

/// Inputs passed through to the analysis model without interpretation, plus
/// the narration toggle.
#[derive(Debug, Clone)]
struct OperatorContext {
    persona: Persona,
    query: Option<String>,
    voice_enabled: bool,
}

impl From<&OperatorSettings> for OperatorContext {
    fn from(settings: &OperatorSettings) -> Self {
        Self {
            persona: settings.persona,
            query: None,
            voice_enabled: settings.voice_enabled,
        }
    }
}

/// Owns the single session and applies one operator or collaborator event at
/// a time. Collaborator calls run with the lock released; the in-flight flag
/// keeps a second capture out meanwhile.
#[derive(Clone)]
pub struct WorkbenchController {
    state: Arc<Mutex<SessionState>>,
    operator: Arc<Mutex<OperatorContext>>,
    collaborator: Arc<dyn VisionCollaborator>,
    narration: NarrationChannel,
    state_tx: Arc<watch::Sender<SessionState>>,
    settings: Option<Arc<SettingsStore>>,
}

impl WorkbenchController {
    pub fn new(collaborator: Arc<dyn VisionCollaborator>, narration: NarrationChannel) -> Self {
        Self::build(collaborator, narration, &OperatorSettings::default(), None)
    }

    /// Seeds persona, narration toggle and mode from the store and writes
    /// later changes back to it.
    pub fn with_settings(
        collaborator: Arc<dyn VisionCollaborator>,
        narration: NarrationChannel,
        settings: Arc<SettingsStore>,
    ) -> Self {
        let initial = settings.current();
        Self::build(collaborator, narration, &initial, Some(settings))
    }

    fn build(
        collaborator: Arc<dyn VisionCollaborator>,
        narration: NarrationChannel,
        initial: &OperatorSettings,
        settings: Option<Arc<SettingsStore>>,
    ) -> Self {
        let state = SessionState::with_mode(initial.default_mode);
        let (state_tx, _rx) = watch::channel(state.clone());
        Self {
            state: Arc::new(Mutex::new(state)),
            operator: Arc::new(Mutex::new(OperatorContext::from(initial))),
            collaborator,
            narration,
            state_tx: Arc::new(state_tx),
            settings,
        }
    }

    pub async fn get_state(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    pub async fn get_snapshot(&self) -> WorkbenchSnapshot {
        let state = self.get_state().await;
        let persona = self.operator.lock().await.persona;
        WorkbenchSnapshot {
            phase: state.phase(),
            hud: build_hud(&state, persona),
            scene: render_scene(&OverlayInput::from_session(&state)),
            state,
        }
    }

    /// Every committed state, newest only.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    pub fn narration(&self) -> &NarrationChannel {
        &self.narration
    }

    /// Sends the frame to the analysis model, or to the meter reader when a
    /// meter capture is armed. Rejected with [`WorkbenchError::Busy`] while
    /// another capture is outstanding. A failure clears the busy flag and
    /// leaves the previous analysis and the audit trail in place.
    pub async fn capture(&self, frame: Frame) -> Result<CaptureOutcome, WorkbenchError> {
        let (kind, mode) = {
            let mut state = self.state.lock().await;
            let (next, kind) = state.capture_started().map_err(|err| {
                warn!("capture rejected: {err}");
                err
            })?;
            *state = next;
            self.publish(&state);
            (kind, state.mode)
        };
        let pending = PendingCapture::new(self);

        info!(
            "{kind:?} capture started ({}, {} bytes)",
            frame.mime_type(),
            frame.bytes().len()
        );

        match kind {
            CaptureKind::Analysis => self.run_analysis(frame, mode, pending).await,
            CaptureKind::MeterReading => self.run_meter_reading(frame, pending).await,
        }
    }

    async fn run_analysis(
        &self,
        frame: Frame,
        mode: AssistantMode,
        pending: PendingCapture,
    ) -> Result<CaptureOutcome, WorkbenchError> {
        let request = {
            let operator = self.operator.lock().await;
            AnalysisRequest {
                frame,
                mode,
                query: operator.query.clone(),
                persona: operator.persona,
            }
        };

        let result = self.collaborator.analyze_frame(request).await;

        let mut state = self.state.lock().await;
        match result {
            Ok(analysis) => {
                let outcome = CaptureOutcome::Analyzed {
                    components: analysis.components.len(),
                    steps: analysis.steps.len(),
                };
                let transition = state.analysis_succeeded(analysis);
                *state = transition.state;
                pending.settled();
                self.publish(&state);
                drop(state);

                info!("analysis installed: {outcome:?}");
                self.narrate(transition.narration).await;
                Ok(outcome)
            }
            Err(err) => {
                error!("analysis failed: {err}");
                *state = state.analysis_failed(&err);
                pending.settled();
                self.publish(&state);
                Err(err)
            }
        }
    }

    async fn run_meter_reading(
        &self,
        frame: Frame,
        pending: PendingCapture,
    ) -> Result<CaptureOutcome, WorkbenchError> {
        let result = self.collaborator.read_meter(frame).await;

        let mut state = self.state.lock().await;
        match result {
            Ok(reading) => {
                let transition = state.meter_read(&reading);
                *state = transition.state;
                pending.settled();
                self.publish(&state);
                drop(state);

                info!("meter read {} {}", reading.value, reading.unit);
                self.narrate(transition.narration).await;
                Ok(CaptureOutcome::MeterRead { reading })
            }
            Err(err) => {
                error!("meter reading failed: {err}");
                *state = state.meter_failed(&err);
                pending.settled();
                self.publish(&state);
                Err(err)
            }
        }
    }

    pub async fn set_reading(&self, reading: &str) -> SessionState {
        self.apply(|state| state.reading_changed(reading)).await
    }

    /// Returns the appended audit entry, or `None` when the commit was a
    /// no-op (no current step, busy, or a reading that is not a number).
    pub async fn commit_reading(&self) -> Option<DiagnosticLogEntry> {
        let mut state = self.state.lock().await;
        let logged_before = state.history.len();
        let transition = state.commit_reading(Utc::now());
        *state = transition.state;

        let appended = (state.history.len() > logged_before)
            .then(|| state.history.first().cloned())
            .flatten();
        if appended.is_some() {
            self.publish(&state);
        }
        drop(state);

        self.narrate(transition.narration).await;
        appended
    }

    pub async fn arm_meter_capture(&self, armed: bool) -> Result<(), WorkbenchError> {
        let mut state = self.state.lock().await;
        *state = state.meter_capture_armed(armed)?;
        self.publish(&state);
        Ok(())
    }

    pub async fn set_mode(&self, mode: AssistantMode) {
        self.apply(|state| state.mode_changed(mode)).await;
        self.persist(|settings| settings.default_mode = mode);
    }

    pub async fn set_net_filter(&self, filter: Option<NetCategory>) {
        self.apply(|state| state.net_filter_changed(filter)).await;
    }

    pub async fn set_persona(&self, persona: Persona) {
        self.operator.lock().await.persona = persona;
        self.persist(|settings| settings.persona = persona);
    }

    pub async fn persona(&self) -> Persona {
        self.operator.lock().await.persona
    }

    /// Blank text clears the query.
    pub async fn set_query(&self, query: &str) {
        let query = query.trim();
        self.operator.lock().await.query = (!query.is_empty()).then(|| query.to_string());
    }

    pub async fn set_voice_enabled(&self, enabled: bool) {
        self.operator.lock().await.voice_enabled = enabled;
        self.persist(|settings| settings.voice_enabled = enabled);
    }

    pub async fn voice_enabled(&self) -> bool {
        self.operator.lock().await.voice_enabled
    }

    /// Drops the analysis; the audit trail is kept.
    pub async fn reset(&self) -> SessionState {
        self.apply(SessionState::reset).await
    }

    async fn apply(&self, transition: impl FnOnce(&SessionState) -> SessionState) -> SessionState {
        let mut state = self.state.lock().await;
        *state = transition(&*state);
        self.publish(&state);
        state.clone()
    }

    fn publish(&self, state: &SessionState) {
        self.state_tx.send_replace(state.clone());
    }

    async fn narrate(&self, text: Option<String>) {
        let Some(text) = text else {
            return;
        };
        if self.voice_enabled().await {
            self.narration.request(text);
        }
    }

    fn persist(&self, apply: impl FnOnce(&mut OperatorSettings)) {
        if let Some(settings) = &self.settings {
            if let Err(err) = settings.update(apply) {
                warn!("Failed to persist operator settings: {err:#}");
            }
        }
    }
}

/// Settles the capture as [`WorkbenchError::Cancelled`] when its future is
/// dropped (timeout, `select!`, task abort) before the collaborator answers.
struct PendingCapture {
    state: Arc<Mutex<SessionState>>,
    state_tx: Arc<watch::Sender<SessionState>>,
    settled: bool,
}

impl PendingCapture {
    fn new(controller: &WorkbenchController) -> Self {
        Self {
            state: Arc::clone(&controller.state),
            state_tx: Arc::clone(&controller.state_tx),
            settled: false,
        }
    }

    /// Call with the state lock held, right after the outcome is applied.
    fn settled(mut self) {
        self.settled = true;
    }
}

impl Drop for PendingCapture {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!("capture abandoned before the collaborator answered");

        let state_tx = Arc::clone(&self.state_tx);
        let abandon = move |state: &mut SessionState| {
            if state.is_busy() {
                *state = state.capture_failed(&WorkbenchError::Cancelled);
                state_tx.send_replace(state.clone());
            }
        };

        if let Ok(mut state) = self.state.try_lock() {
            abandon(&mut *state);
            return;
        }
        // Dropped while waiting on the state lock; settle once it frees up.
        let state = Arc::clone(&self.state);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    let mut state = state.lock().await;
                    abandon(&mut *state);
                });
            }
            Err(_) => error!("no runtime left to release the abandoned capture"),
        }
    }
}
