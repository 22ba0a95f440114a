use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::geometry::{BoardPose, Point};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Ic,
    Resistor,
    Capacitor,
    Diode,
    Transistor,
    Connector,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Ok,
    Faulty,
    Suspicious,
    Unknown,
}

impl ComponentStatus {
    /// Faulty and suspicious parts get the alert treatment in the overlay.
    pub fn is_alert(&self) -> bool {
        matches!(self, ComponentStatus::Faulty | ComponentStatus::Suspicious)
    }
}

/// Heuristic operating-temperature band; predicted, never measured.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ThermalLevel {
    Cool,
    Nominal,
    Warm,
    Hot,
    Critical,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum NetCategory {
    #[serde(rename = "GND")]
    Gnd,
    #[serde(rename = "VCC")]
    Vcc,
    #[serde(rename = "3V3")]
    Rail3v3,
    #[serde(rename = "5V")]
    Rail5v,
    #[serde(rename = "SIGNAL")]
    Signal,
    #[serde(rename = "BUS")]
    Bus,
    #[serde(rename = "PROTECTION")]
    Protection,
}

impl NetCategory {
    pub const ALL: [NetCategory; 7] = [
        NetCategory::Gnd,
        NetCategory::Vcc,
        NetCategory::Rail3v3,
        NetCategory::Rail5v,
        NetCategory::Signal,
        NetCategory::Bus,
        NetCategory::Protection,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NetCategory::Gnd => "GND",
            NetCategory::Vcc => "VCC",
            NetCategory::Rail3v3 => "3V3",
            NetCategory::Rail5v => "5V",
            NetCategory::Signal => "SIGNAL",
            NetCategory::Bus => "BUS",
            NetCategory::Protection => "PROTECTION",
        }
    }
}

impl FromStr for NetCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        NetCategory::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown net category '{wanted}'"))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Easy,
    Moderate,
    Advanced,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Easy => "easy",
            Complexity::Moderate => "moderate",
            Complexity::Advanced => "advanced",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
    pub status: ComponentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_analysis: Option<String>,
    pub causal_role: String,
    pub thermal_signature: ThermalLevel,
    #[serde(default)]
    pub nets: Vec<String>,
}

impl Component {
    /// Bounding box as `(min, max)` corners in board-surface space. The
    /// producer does not guarantee `xmin < xmax` or `ymin < ymax`.
    pub fn bounds(&self) -> (Point, Point) {
        (
            Point::new(self.xmin.min(self.xmax), self.ymin.min(self.ymax)),
            Point::new(self.xmin.max(self.xmax), self.ymin.max(self.ymax)),
        )
    }

    pub fn centroid(&self) -> Point {
        Point::new((self.xmin + self.xmax) / 2.0, (self.ymin + self.ymax) / 2.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Net {
    pub id: String,
    pub label: String,
    pub category: NetCategory,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogicStage {
    /// Sort key only: values may repeat or skip.
    pub order: f64,
    pub name: String,
    pub description: String,
    /// Component ids, first one anchors the tutorial flow line.
    pub components: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpectedRange {
    pub min: f64,
    pub max: f64,
    pub unit: String,
}

impl ExpectedRange {
    /// Inclusive on both bounds.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn describe(&self) -> String {
        format!("{}-{} {}", self.min, self.max, self.unit)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProbingStep {
    pub id: String,
    pub title: String,
    pub description: String,
    pub red_probe: Point,
    pub black_probe: Point,
    pub expected_range: ExpectedRange,
    pub reasoning: String,
    pub fault_theory: String,
}

/// Advisory only; nothing in the session logic reads these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Heuristic {
    pub context: String,
    pub inference: String,
    pub probability: f64,
}

/// Structured interpretation of one board photo. Immutable once received;
/// a new capture replaces it wholesale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub board_pose: BoardPose,
    pub components: Vec<Component>,
    pub nets: Vec<Net>,
    pub steps: Vec<ProbingStep>,
    pub heuristics: Vec<Heuristic>,
    pub logic_flow: Vec<LogicStage>,
    pub safety_notes: Vec<String>,
    pub general_recommendation: String,
    pub estimated_complexity: Complexity,
}

impl AnalysisResult {
    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|component| component.id == id)
    }

    pub fn step(&self, id: &str) -> Option<&ProbingStep> {
        self.steps.iter().find(|step| step.id == id)
    }
}
