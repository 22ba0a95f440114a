use crate::error::WorkbenchError;
use crate::models::{AnalysisResult, MeterReading};

/// Parses a model response into an [`AnalysisResult`]. Anything short of the
/// full schema is rejected; a partial structure never escapes.
pub fn parse_analysis_response(raw: &str) -> Result<AnalysisResult, WorkbenchError> {
    serde_json::from_str(strip_code_fence(raw))
        .map_err(|err| WorkbenchError::Inference(err.to_string()))
}

pub fn parse_meter_response(raw: &str) -> Result<MeterReading, WorkbenchError> {
    serde_json::from_str(strip_code_fence(raw)).map_err(|err| WorkbenchError::Ocr(err.to_string()))
}

/// Models sometimes wrap JSON in a markdown fence even when asked not to.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = body.strip_prefix("json").unwrap_or(body);
    body.strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ComponentKind, ComponentStatus, NetCategory, ThermalLevel};
    use pretty_assertions::assert_eq;

    const RESPONSE: &str = r#"{
        "boardPose": {
            "corners": {
                "topLeft": {"x": 120, "y": 80},
                "topRight": {"x": 880, "y": 95},
                "bottomRight": {"x": 900, "y": 910},
                "bottomLeft": {"x": 100, "y": 890}
            },
            "confidence": 0.87
        },
        "components": [{
            "id": "U2", "type": "ic", "name": "AMS1117", "category": "regulator",
            "xmin": 410, "ymin": 300, "xmax": 520, "ymax": 380,
            "status": "suspicious", "failureAnalysis": "Output sagging under load",
            "causalRole": "Drops 5V to 3V3 for the MCU",
            "thermalSignature": "HOT"
        }],
        "nets": [{"id": "n1", "label": "3V3", "category": "3V3", "points": [{"x": 450, "y": 340}]}],
        "steps": [{
            "id": "st1", "title": "LDO output", "description": "Measure U2 pin 2",
            "redProbe": {"x": 470, "y": 330}, "blackProbe": {"x": 60, "y": 940},
            "expectedRange": {"min": 3.2, "max": 3.4, "unit": "V"},
            "reasoning": "MCU needs 3V3", "faultTheory": "LDO in thermal shutdown"
        }],
        "heuristics": [{"context": "hot LDO", "inference": "overcurrent", "probability": 0.6}],
        "logicFlow": [{"order": 1, "name": "Power", "description": "Input", "components": ["U2"]}],
        "safetyNotes": ["Unplug USB before reflow"],
        "generalRecommendation": "Start at the regulator",
        "estimatedComplexity": "moderate"
    }"#;

    #[test]
    fn parses_full_response() {
        let result = parse_analysis_response(RESPONSE).unwrap();
        let u2 = result.component("U2").unwrap();
        assert_eq!(u2.kind, ComponentKind::Ic);
        assert_eq!(u2.status, ComponentStatus::Suspicious);
        assert_eq!(u2.thermal_signature, ThermalLevel::Hot);
        assert!(u2.nets.is_empty());
        assert_eq!(result.nets[0].category, NetCategory::Rail3v3);
        assert_eq!(result.steps[0].expected_range.max, 3.4);
        assert_eq!(result.board_pose.corners.top_right.y, 95.0);
    }

    #[test]
    fn accepts_fenced_json() {
        let fenced = format!("```json\n{RESPONSE}\n```");
        assert!(parse_analysis_response(&fenced).is_ok());
    }

    #[test]
    fn missing_required_field_is_an_inference_failure() {
        let truncated = RESPONSE.replace(r#""estimatedComplexity": "moderate""#, r#""x": 1"#);
        let err = parse_analysis_response(&truncated).unwrap_err();
        assert!(err.to_string().starts_with("topological inference failed"));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            parse_analysis_response("I could not see a board"),
            Err(WorkbenchError::Inference(_))
        ));
        assert!(matches!(parse_meter_response("{}"), Err(WorkbenchError::Ocr(_))));
    }

    #[test]
    fn meter_value_may_be_non_numeric() {
        let reading = parse_meter_response(r#"{"value": "OL", "unit": "Ω"}"#).unwrap();
        assert_eq!(reading.value, "OL");
    }
}
