mod common;

use circuitsense_lib::{
    models::{AssistantMode, Persona},
    narration::NarrationChannel,
    session::WorkbenchController,
    settings::{OperatorSettings, SettingsStore},
};
use common::{jpeg_frame, two_step_analysis, ScriptedCollaborator};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn idle_collaborator() -> Arc<ScriptedCollaborator> {
    Arc::new(ScriptedCollaborator::new(vec![Ok(two_step_analysis())], vec![]))
}

#[tokio::test]
async fn operator_preferences_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.json");

    let store = Arc::new(SettingsStore::new(path.clone()).unwrap());
    let controller =
        WorkbenchController::with_settings(idle_collaborator(), NarrationChannel::new(), store);
    controller.set_mode(AssistantMode::Thermal).await;
    controller.set_persona(Persona::Professor).await;
    controller.set_voice_enabled(false).await;

    let reopened = Arc::new(SettingsStore::new(path).unwrap());
    assert_eq!(
        reopened.current(),
        OperatorSettings {
            persona: Persona::Professor,
            voice_enabled: false,
            default_mode: AssistantMode::Thermal,
        }
    );

    let narration = NarrationChannel::new();
    let restarted =
        WorkbenchController::with_settings(idle_collaborator(), narration.clone(), reopened);
    assert_eq!(restarted.get_state().await.mode, AssistantMode::Thermal);
    assert_eq!(restarted.persona().await, Persona::Professor);
    assert!(!restarted.voice_enabled().await);

    restarted.capture(jpeg_frame()).await.unwrap();
    assert_eq!(narration.latest(), None);
}

#[tokio::test]
async fn voice_narrates_analysis_summary() {
    let narration = NarrationChannel::new();
    let controller = WorkbenchController::new(idle_collaborator(), narration.clone());
    controller.set_voice_enabled(true).await;
    controller.capture(jpeg_frame()).await.unwrap();

    let spoken = narration.latest().unwrap();
    assert_eq!(spoken.text, two_step_analysis().general_recommendation);
}
