use log::debug;

use crate::models::{
    AnalysisResult, AssistantMode, BoardCorners, Component, NetCategory, Point, ProbingStep,
    ThermalLevel,
};
use crate::projection::{project, project_point};
use crate::session::SessionState;

use super::palette;
use super::scene::{Layer, LayerKind, Primitive, Scene};

const THERMAL_HALO_RADIUS: f64 = 60.0;
const CRITICAL_LABEL_LIFT: f64 = 40.0;
const CRITICAL_LABEL: &str = "CRITICAL_TEMP";
const FLOW_MARKER_RADIUS: f64 = 5.0;
const TUTORIAL_LABEL_LIFT: f64 = 50.0;
const ALERT_LABEL_LIFT: f64 = 45.0;
const FAULT_SNIPPET_CHARS: usize = 30;
const PROBE_RADIUS: f64 = 20.0;
const RED_PROBE_RING_RADIUS: f64 = 50.0;
const PROBE_GUIDE_ARC_LIFT: f64 = 120.0;

/// What the overlay needs to know about the session.
#[derive(Debug, Clone, Copy)]
pub struct OverlayInput<'a> {
    pub analysis: Option<&'a AnalysisResult>,
    pub mode: AssistantMode,
    pub step_index: usize,
    pub net_filter: Option<NetCategory>,
}

impl<'a> OverlayInput<'a> {
    pub fn from_session(state: &'a SessionState) -> Self {
        Self {
            analysis: state.analysis.as_deref(),
            mode: state.mode,
            step_index: state.step_index,
            net_filter: state.net_filter,
        }
    }
}

/// Builds the full overlay. Without an analysis there is no pose, so the
/// scene is empty (the "seeking board" steady state).
pub fn render_scene(input: &OverlayInput<'_>) -> Scene {
    let Some(analysis) = input.analysis else {
        return Scene::default();
    };
    let corners = &analysis.board_pose.corners;
    let mode = input.mode;
    let mut scene = Scene::default();

    scene.layers.push(board_outline_layer(corners));

    if mode != AssistantMode::Thermal {
        if let Some(category) = input.net_filter {
            scene.layers.push(net_layer(analysis, category, corners));
        }
    }

    if mode == AssistantMode::Thermal {
        scene.layers.push(thermal_layer(analysis, corners));
    }

    if mode == AssistantMode::Tutorial {
        scene.layers.push(tutorial_flow_layer(analysis, corners));
    }

    if mode != AssistantMode::Thermal {
        scene.layers.push(component_layer(analysis, mode, corners));
    }

    if mode == AssistantMode::Measurement {
        if let Some(step) = analysis.steps.get(input.step_index) {
            scene.layers.push(probe_layer(step, corners));
        }
    }

    scene
}

fn board_outline_layer(corners: &BoardCorners) -> Layer {
    let mut layer = Layer::new(LayerKind::BoardOutline);
    layer.primitives.push(Primitive::Polygon {
        points: corners.outline().to_vec(),
        stroke: palette::BOARD_STROKE,
        fill: Some(palette::BOARD_FILL),
        stroke_width: 1.0,
        dashed: true,
        pulse: false,
    });
    layer
}

fn net_layer(analysis: &AnalysisResult, category: NetCategory, corners: &BoardCorners) -> Layer {
    let mut layer = Layer::new(LayerKind::NetTraces);
    for net in analysis
        .nets
        .iter()
        .filter(|net| net.category == category && !net.points.is_empty())
    {
        layer.primitives.push(Primitive::Polyline {
            points: net
                .points
                .iter()
                .map(|&point| project_point(point, corners))
                .collect(),
            stroke: palette::net_color(category),
            stroke_width: 3.0,
        });
    }
    layer
}

fn thermal_layer(analysis: &AnalysisResult, corners: &BoardCorners) -> Layer {
    let mut layer = Layer::new(LayerKind::Thermal);
    for component in &analysis.components {
        let center = project_point(component.centroid(), corners);
        layer.primitives.push(Primitive::Circle {
            center,
            radius: THERMAL_HALO_RADIUS,
            fill: Some(palette::thermal_color(component.thermal_signature)),
            stroke: None,
            stroke_width: 0.0,
            pulse: true,
        });
        if component.thermal_signature == ThermalLevel::Critical {
            layer.primitives.push(Primitive::Label {
                anchor: Point::new(center.x, center.y - CRITICAL_LABEL_LIFT),
                lines: vec![CRITICAL_LABEL.to_string()],
                text: palette::LABEL_TEXT,
                background: None,
                border: None,
            });
        }
    }
    layer
}

/// Links the first resolvable component of each stage to the next stage's,
/// in `order`. A pair with an unresolvable end is skipped on its own; the
/// rest of the chain still draws.
fn tutorial_flow_layer(analysis: &AnalysisResult, corners: &BoardCorners) -> Layer {
    let mut stages: Vec<_> = analysis.logic_flow.iter().collect();
    stages.sort_by(|a, b| a.order.total_cmp(&b.order));

    let anchors: Vec<Option<&Component>> = stages
        .iter()
        .map(|stage| {
            stage
                .components
                .first()
                .and_then(|id| analysis.component(id))
        })
        .collect();

    let mut layer = Layer::new(LayerKind::TutorialFlow);
    for (index, pair) in anchors.windows(2).enumerate() {
        let (Some(from), Some(to)) = (pair[0], pair[1]) else {
            debug!(
                "skipping flow {} -> {}: stage anchor not found",
                stages[index].name,
                stages[index + 1].name
            );
            continue;
        };
        let from = project_point(from.centroid(), corners);
        let to = project_point(to.centroid(), corners);
        layer.primitives.push(Primitive::Line {
            from,
            to,
            stroke: palette::FLOW_STROKE,
            stroke_width: 2.0,
            dashed: true,
        });
        layer.primitives.push(Primitive::Circle {
            center: to,
            radius: FLOW_MARKER_RADIUS,
            fill: Some(palette::FLOW_MARKER),
            stroke: None,
            stroke_width: 0.0,
            pulse: true,
        });
    }
    layer
}

fn component_layer(analysis: &AnalysisResult, mode: AssistantMode, corners: &BoardCorners) -> Layer {
    let tutorial = mode == AssistantMode::Tutorial;
    let mut layer = Layer::new(LayerKind::Components);

    for component in &analysis.components {
        let (min, max) = component.bounds();
        let top_left = project(min.x, min.y, corners);
        let outline = vec![
            top_left,
            project(max.x, min.y, corners),
            project(max.x, max.y, corners),
            project(min.x, max.y, corners),
        ];
        let alert = component.status.is_alert();
        let color = if alert {
            palette::COMPONENT_ALERT
        } else {
            palette::COMPONENT_NEUTRAL
        };

        layer.primitives.push(Primitive::Polygon {
            points: outline,
            stroke: color,
            fill: None,
            stroke_width: if tutorial { 4.0 } else { 1.5 },
            dashed: false,
            pulse: alert,
        });

        if tutorial {
            layer.primitives.push(Primitive::Label {
                anchor: Point::new(top_left.x, top_left.y - TUTORIAL_LABEL_LIFT),
                lines: vec![
                    component.name.clone(),
                    format!("\"{}\"", component.causal_role),
                ],
                text: palette::LABEL_TEXT,
                background: Some(palette::LABEL_BACKGROUND),
                border: Some(color),
            });
        } else if alert {
            let mut lines = vec![format!("SUSPECT: {}", component.name)];
            if let Some(failure) = component.failure_analysis.as_deref() {
                lines.push(fault_snippet(failure));
            }
            layer.primitives.push(Primitive::Label {
                anchor: Point::new(top_left.x, top_left.y - ALERT_LABEL_LIFT),
                lines,
                text: palette::LABEL_TEXT,
                background: Some(palette::COMPONENT_ALERT),
                border: None,
            });
        }
    }
    layer
}

/// Red (signal) and black (reference) probe targets joined by an arc that
/// bows upward over the board.
fn probe_layer(step: &ProbingStep, corners: &BoardCorners) -> Layer {
    let red = project_point(step.red_probe, corners);
    let black = project_point(step.black_probe, corners);
    let control = Point::new(
        (black.x + red.x) / 2.0,
        black.y.min(red.y) - PROBE_GUIDE_ARC_LIFT,
    );

    let mut layer = Layer::new(LayerKind::ProbeGuide);
    layer.primitives.push(Primitive::Curve {
        from: black,
        control,
        to: red,
        stroke: palette::PROBE_GUIDE,
        stroke_width: 2.0,
        dashed: true,
    });
    layer.primitives.push(Primitive::Circle {
        center: black,
        radius: PROBE_RADIUS,
        fill: Some(palette::BLACK_PROBE_FILL),
        stroke: Some(palette::BLACK_PROBE_STROKE),
        stroke_width: 4.0,
        pulse: false,
    });
    layer.primitives.push(Primitive::Circle {
        center: red,
        radius: PROBE_RADIUS,
        fill: Some(palette::RED_PROBE_FILL),
        stroke: Some(palette::RED_PROBE_STROKE),
        stroke_width: 4.0,
        pulse: false,
    });
    layer.primitives.push(Primitive::Circle {
        center: red,
        radius: RED_PROBE_RING_RADIUS,
        fill: None,
        stroke: Some(palette::RED_PROBE_RING),
        stroke_width: 2.0,
        pulse: true,
    });
    layer
}

fn fault_snippet(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(FAULT_SNIPPET_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
