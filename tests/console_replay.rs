mod common;

use circuitsense_lib::{
    inference::ReplayCollaborator,
    narration::NarrationChannel,
    overlay::LayerKind,
    session::{execute, parse_command, SessionPhase, WorkbenchController},
};
use common::demos_dir;
use pretty_assertions::assert_eq;
use std::sync::Arc;

async fn run(controller: &WorkbenchController, line: &str) -> Result<String, String> {
    execute(controller, parse_command(line)?).await
}

fn replay_controller() -> WorkbenchController {
    WorkbenchController::new(
        Arc::new(ReplayCollaborator::new(demos_dir())),
        NarrationChannel::new(),
    )
}

#[tokio::test]
async fn bench_session_from_recorded_responses() {
    let controller = replay_controller();
    let board = demos_dir().join("board.png");
    let capture = format!("capture {}", board.display());

    assert_eq!(
        run(&controller, &capture).await.unwrap(),
        "board analysed: 5 components, 3 probing steps"
    );
    assert_eq!(run(&controller, "mode measurement").await.unwrap(), "mode MEASUREMENT");

    let snapshot = controller.get_snapshot().await;
    assert_eq!(snapshot.phase, SessionPhase::StepActive);
    assert!(snapshot.scene.layer(LayerKind::ProbeGuide).is_some());
    let panel = snapshot.hud.step_panel.unwrap();
    assert_eq!(panel.sequence, "OP_SEQ 1/3");
    assert_eq!(panel.expect, "4.5-5.3 V");

    run(&controller, "reading 5.02").await.unwrap();
    assert_eq!(run(&controller, "").await.unwrap(), "PASS 5.02 V");

    assert_eq!(
        run(&controller, "meter on").await.unwrap(),
        "next capture reads the meter"
    );
    assert_eq!(run(&controller, &capture).await.unwrap(), "meter reads 3.29 V");
    let state = controller.get_state().await;
    assert_eq!(state.reading, "3.29");
    assert!(!state.awaiting_meter_capture);

    assert_eq!(run(&controller, "commit").await.unwrap(), "PASS 3.29 V");
    let state = controller.get_state().await;
    assert_eq!(state.step_index, 2);
    assert_eq!(state.history.len(), 2);

    assert_eq!(
        run(&controller, "reset").await.unwrap(),
        "analysis cleared, 2 audit entries kept"
    );
    assert_eq!(controller.get_state().await.phase(), SessionPhase::Idle);
    assert!(controller.get_snapshot().await.scene.is_empty());
}

#[tokio::test]
async fn console_reports_failures_without_panicking() {
    let controller = replay_controller();

    assert_eq!(run(&controller, "commit").await.unwrap(), "nothing to commit");
    assert!(run(&controller, "meter on").await.is_err());
    assert!(run(&controller, "capture /definitely/not/here.png").await.is_err());
    assert!(run(&controller, "mode sideways").await.is_err());

    let empty = tempfile::tempdir().unwrap();
    let controller = WorkbenchController::new(
        Arc::new(ReplayCollaborator::new(empty.path())),
        NarrationChannel::new(),
    );
    let board = demos_dir().join("board.png");
    let err = run(&controller, &format!("capture {}", board.display()))
        .await
        .unwrap_err();
    assert!(err.starts_with("topological inference failed"), "{err}");
    assert!(!controller.get_state().await.is_busy());
}
