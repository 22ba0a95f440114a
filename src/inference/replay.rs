use async_trait::async_trait;
use log::info;
use std::path::{Path, PathBuf};

use super::{parse_analysis_response, parse_meter_response, AnalysisRequest, Frame, VisionCollaborator};
use crate::error::WorkbenchError;
use crate::models::{AnalysisResult, MeterReading};

pub const ANALYSIS_FIXTURE: &str = "analysis.json";
pub const METER_FIXTURE: &str = "meter.json";

/// Answers from recorded model responses on disk, for benches without
/// network access. Files are re-read on every call so they can be edited
/// between captures.
#[derive(Debug, Clone)]
pub struct ReplayCollaborator {
    dir: PathBuf,
}

impl ReplayCollaborator {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn read_fixture(&self, name: &str) -> Result<String, String> {
        let path = self.dir.join(name);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|err| format!("{}: {err}", path.display()))
    }
}

#[async_trait]
impl VisionCollaborator for ReplayCollaborator {
    async fn analyze_frame(
        &self,
        request: AnalysisRequest,
    ) -> Result<AnalysisResult, WorkbenchError> {
        info!(
            "replaying analysis for {} frame ({} bytes), mode={} persona={} query={:?}",
            request.frame.mime_type(),
            request.frame.bytes().len(),
            request.mode.as_str(),
            request.persona.as_str(),
            request.query
        );
        let raw = self
            .read_fixture(ANALYSIS_FIXTURE)
            .await
            .map_err(WorkbenchError::Inference)?;
        parse_analysis_response(&raw)
    }

    async fn read_meter(&self, frame: Frame) -> Result<MeterReading, WorkbenchError> {
        info!("replaying meter reading for {} frame", frame.mime_type());
        let raw = self
            .read_fixture(METER_FIXTURE)
            .await
            .map_err(WorkbenchError::Ocr)?;
        parse_meter_response(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssistantMode, Persona};

    fn jpeg() -> Frame {
        Frame::from_encoded(vec![0xFF, 0xD8, 0xFF, 0xDB]).unwrap()
    }

    #[tokio::test]
    async fn missing_fixture_is_a_typed_failure() {
        let dir = tempfile::tempdir().unwrap();
        let replay = ReplayCollaborator::new(dir.path());

        let err = replay
            .analyze_frame(AnalysisRequest {
                frame: jpeg(),
                mode: AssistantMode::Inspection,
                query: None,
                persona: Persona::Professor,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, WorkbenchError::Inference(_)));

        let err = replay.read_meter(jpeg()).await.unwrap_err();
        assert!(matches!(err, WorkbenchError::Ocr(_)));
    }

    #[tokio::test]
    async fn reads_meter_fixture() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(METER_FIXTURE), r#"{"value":"4.98","unit":"V"}"#).unwrap();
        let reading = ReplayCollaborator::new(dir.path())
            .read_meter(jpeg())
            .await
            .unwrap();
        assert_eq!(reading.value, "4.98");
    }
}
