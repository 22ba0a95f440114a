//! Seam to the remote vision model. The core never assumes latency bounds and
//! never retries on its own; a retry is the operator capturing again.

pub mod frame;
pub mod replay;
pub mod schema;

use async_trait::async_trait;

use crate::error::WorkbenchError;
use crate::models::{AnalysisResult, AssistantMode, MeterReading, Persona};

pub use frame::Frame;
pub use replay::ReplayCollaborator;
pub use schema::{parse_analysis_response, parse_meter_response};

/// Everything the analysis model receives besides its own prompt.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub frame: Frame,
    pub mode: AssistantMode,
    pub query: Option<String>,
    pub persona: Persona,
}

#[async_trait]
pub trait VisionCollaborator: Send + Sync {
    /// Fails with [`WorkbenchError::Inference`] on rejection or bad output.
    async fn analyze_frame(&self, request: AnalysisRequest)
        -> Result<AnalysisResult, WorkbenchError>;

    /// Fails with [`WorkbenchError::Ocr`].
    async fn read_meter(&self, frame: Frame) -> Result<MeterReading, WorkbenchError>;
}
