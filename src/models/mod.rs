pub mod analysis;
pub mod diagnostic;
pub mod geometry;
pub mod mode;

pub use analysis::{
    AnalysisResult, Complexity, Component, ComponentKind, ComponentStatus, ExpectedRange,
    Heuristic, LogicStage, Net, NetCategory, ProbingStep, ThermalLevel,
};
pub use diagnostic::{DiagnosticLogEntry, MeterReading, ReadingStatus};
pub use geometry::{BoardCorners, BoardPose, Point};
pub use mode::{AssistantMode, Persona};
