pub mod commands;
pub mod controller;
pub mod state;

pub use commands::{execute, parse_command, OperatorCommand};
pub use controller::{CaptureOutcome, WorkbenchController, WorkbenchSnapshot};
pub use state::{parse_reading, CaptureKind, SessionPhase, SessionState, Transition};
