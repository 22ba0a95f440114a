use serde::Serialize;

use crate::models::Point;

/// CSS color string handed straight to the drawing surface.
pub type Color = &'static str;

/// Layers in compositing order.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum LayerKind {
    BoardOutline,
    NetTraces,
    Thermal,
    TutorialFlow,
    Components,
    ProbeGuide,
}

/// Screen-space drawing primitive.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "shape", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Primitive {
    Polygon {
        points: Vec<Point>,
        stroke: Color,
        fill: Option<Color>,
        stroke_width: f64,
        dashed: bool,
        pulse: bool,
    },
    Polyline {
        points: Vec<Point>,
        stroke: Color,
        stroke_width: f64,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Color,
        stroke_width: f64,
        dashed: bool,
    },
    /// Quadratic curve through `control`.
    Curve {
        from: Point,
        control: Point,
        to: Point,
        stroke: Color,
        stroke_width: f64,
        dashed: bool,
    },
    Circle {
        center: Point,
        radius: f64,
        fill: Option<Color>,
        stroke: Option<Color>,
        stroke_width: f64,
        pulse: bool,
    },
    /// Text block; `anchor` is its top-left corner.
    Label {
        anchor: Point,
        lines: Vec<String>,
        text: Color,
        background: Option<Color>,
        border: Option<Color>,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Layer {
    pub kind: LayerKind,
    pub primitives: Vec<Primitive>,
}

impl Layer {
    pub fn new(kind: LayerKind) -> Self {
        Self {
            kind,
            primitives: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct Scene {
    pub layers: Vec<Layer>,
}

impl Scene {
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layer(&self, kind: LayerKind) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.kind == kind)
    }

    pub fn kinds(&self) -> Vec<LayerKind> {
        self.layers.iter().map(|layer| layer.kind).collect()
    }
}
