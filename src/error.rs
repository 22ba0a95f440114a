use thiserror::Error;

/// Recoverable failures surfaced to the operator. None of them is fatal and
/// none of them leaves the session in a half-applied state.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WorkbenchError {
    #[error("topological inference failed: {0}")]
    Inference(String),

    #[error("OCR failure: {0}")]
    Ocr(String),

    #[error("a capture is already in flight")]
    Busy,

    #[error("capture abandoned before the collaborator answered")]
    Cancelled,

    #[error("no board analysis is active")]
    NoAnalysis,

    #[error("frame is not a recognised still image: {0}")]
    InvalidFrame(String),
}
