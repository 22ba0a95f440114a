//! Builders shared by unit tests.

use crate::models::{
    AnalysisResult, BoardCorners, BoardPose, Complexity, Component, ComponentKind,
    ComponentStatus, ExpectedRange, LogicStage, Net, NetCategory, Point, ProbingStep,
    ThermalLevel,
};

pub(crate) fn square_pose() -> BoardPose {
    BoardPose {
        corners: BoardCorners {
            top_left: Point::new(0.0, 0.0),
            top_right: Point::new(1000.0, 0.0),
            bottom_right: Point::new(1000.0, 1000.0),
            bottom_left: Point::new(0.0, 1000.0),
        },
        confidence: 0.93,
    }
}

pub(crate) fn component(id: &str, bbox: [f64; 4], status: ComponentStatus) -> Component {
    let [xmin, ymin, xmax, ymax] = bbox;
    Component {
        id: id.to_string(),
        kind: ComponentKind::Ic,
        name: format!("{id}-name"),
        category: String::new(),
        xmin,
        ymin,
        xmax,
        ymax,
        status,
        failure_analysis: None,
        causal_role: format!("{id} exists for a reason"),
        thermal_signature: ThermalLevel::Nominal,
        nets: Vec::new(),
    }
}

pub(crate) fn step(id: &str, min: f64, max: f64, unit: &str) -> ProbingStep {
    ProbingStep {
        id: id.to_string(),
        title: format!("Measure {id}"),
        description: format!("Probe {id}"),
        red_probe: Point::new(200.0, 300.0),
        black_probe: Point::new(800.0, 300.0),
        expected_range: ExpectedRange {
            min,
            max,
            unit: unit.to_string(),
        },
        reasoning: "rail must be present".to_string(),
        fault_theory: format!("{id} out of range: suspect regulator"),
    }
}

pub(crate) fn stage(order: f64, name: &str, components: &[&str]) -> LogicStage {
    LogicStage {
        order,
        name: name.to_string(),
        description: format!("{name} stage"),
        components: components.iter().map(|id| id.to_string()).collect(),
    }
}

pub(crate) fn net(id: &str, category: NetCategory, points: &[(f64, f64)]) -> Net {
    Net {
        id: id.to_string(),
        label: id.to_uppercase(),
        category,
        points: points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
    }
}

pub(crate) fn analysis(steps: Vec<ProbingStep>) -> AnalysisResult {
    AnalysisResult {
        board_pose: square_pose(),
        components: vec![component("u1", [100.0, 100.0, 300.0, 200.0], ComponentStatus::Ok)],
        nets: Vec::new(),
        steps,
        heuristics: Vec::new(),
        logic_flow: Vec::new(),
        safety_notes: vec!["Disconnect mains before probing".to_string()],
        general_recommendation: "Check the 5V rail first".to_string(),
        estimated_complexity: Complexity::Moderate,
    }
}
