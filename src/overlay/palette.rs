use super::scene::Color;
use crate::models::{NetCategory, ThermalLevel};

pub const BOARD_STROKE: Color = "rgba(59, 130, 246, 0.2)";
pub const BOARD_FILL: Color = "rgba(59, 130, 246, 0.01)";

pub const COMPONENT_NEUTRAL: Color = "#3b82f6";
pub const COMPONENT_ALERT: Color = "#f43f5e";
pub const LABEL_BACKGROUND: Color = "rgba(15, 23, 42, 0.95)";
pub const LABEL_TEXT: Color = "#ffffff";

pub const FLOW_STROKE: Color = "rgba(255, 255, 255, 0.4)";
pub const FLOW_MARKER: Color = "#ffffff";

pub const PROBE_GUIDE: Color = "rgba(255, 255, 255, 0.3)";
pub const RED_PROBE_FILL: Color = "#dc2626";
pub const RED_PROBE_STROKE: Color = "#ffffff";
pub const RED_PROBE_RING: Color = "#ef4444";
pub const BLACK_PROBE_FILL: Color = "#0f172a";
pub const BLACK_PROBE_STROKE: Color = "#475569";

pub fn thermal_color(level: ThermalLevel) -> Color {
    match level {
        ThermalLevel::Cool => "#3b82f6",
        ThermalLevel::Nominal => "#10b981",
        ThermalLevel::Warm => "#fbbf24",
        ThermalLevel::Hot => "#f97316",
        ThermalLevel::Critical => "#ef4444",
    }
}

pub fn net_color(category: NetCategory) -> Color {
    match category {
        NetCategory::Gnd => "#64748b",
        NetCategory::Vcc => "#ef4444",
        NetCategory::Rail3v3 => "#f59e0b",
        NetCategory::Rail5v => "#f97316",
        NetCategory::Signal => "#22d3ee",
        NetCategory::Bus => "#a855f7",
        NetCategory::Protection => "#10b981",
    }
}
