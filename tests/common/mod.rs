#![allow(dead_code)]

use async_trait::async_trait;
use circuitsense_lib::{
    inference::{parse_analysis_response, AnalysisRequest, Frame, VisionCollaborator},
    models::{AnalysisResult, ExpectedRange, MeterReading},
    WorkbenchError,
};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Notify;

pub fn demos_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos")
}

pub fn demo_analysis() -> AnalysisResult {
    parse_analysis_response(include_str!("../../demos/analysis.json")).expect("demo fixture parses")
}

/// Demo board trimmed to two steps: 0–1 V then 10–20 mA.
pub fn two_step_analysis() -> AnalysisResult {
    let mut analysis = demo_analysis();
    analysis.steps.truncate(2);
    analysis.steps[0].expected_range = ExpectedRange {
        min: 0.0,
        max: 1.0,
        unit: "V".into(),
    };
    analysis.steps[1].expected_range = ExpectedRange {
        min: 10.0,
        max: 20.0,
        unit: "mA".into(),
    };
    analysis
}

pub fn jpeg_frame() -> Frame {
    Frame::from_encoded(vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'])
        .expect("jpeg magic")
}

/// Answers analysis requests from a script, one entry per call.
pub struct ScriptedCollaborator {
    analyses: Mutex<VecDeque<Result<AnalysisResult, WorkbenchError>>>,
    meters: Mutex<VecDeque<Result<MeterReading, WorkbenchError>>>,
    pub requests: Mutex<Vec<AnalysisRequest>>,
}

impl ScriptedCollaborator {
    pub fn new(
        analyses: Vec<Result<AnalysisResult, WorkbenchError>>,
        meters: Vec<Result<MeterReading, WorkbenchError>>,
    ) -> Self {
        Self {
            analyses: Mutex::new(analyses.into()),
            meters: Mutex::new(meters.into()),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl VisionCollaborator for ScriptedCollaborator {
    async fn analyze_frame(
        &self,
        request: AnalysisRequest,
    ) -> Result<AnalysisResult, WorkbenchError> {
        self.requests.lock().unwrap().push(request);
        self.analyses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(WorkbenchError::Inference("script exhausted".into())))
    }

    async fn read_meter(&self, _frame: Frame) -> Result<MeterReading, WorkbenchError> {
        self.meters
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(WorkbenchError::Ocr("script exhausted".into())))
    }
}

/// Holds every analysis call until the test releases it.
pub struct GatedCollaborator {
    pub release: Notify,
    pub calls: AtomicUsize,
    analysis: AnalysisResult,
}

impl GatedCollaborator {
    pub fn new(analysis: AnalysisResult) -> Self {
        Self {
            release: Notify::new(),
            calls: AtomicUsize::new(0),
            analysis,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisionCollaborator for GatedCollaborator {
    async fn analyze_frame(
        &self,
        _request: AnalysisRequest,
    ) -> Result<AnalysisResult, WorkbenchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.release.notified().await;
        Ok(self.analysis.clone())
    }

    async fn read_meter(&self, _frame: Frame) -> Result<MeterReading, WorkbenchError> {
        self.release.notified().await;
        Ok(MeterReading {
            value: "0".into(),
            unit: "V".into(),
        })
    }
}
