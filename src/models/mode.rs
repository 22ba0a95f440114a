use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which overlay layers and HUD panels are active. Passed to the inference
/// collaborator as context only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssistantMode {
    Inspection,
    Measurement,
    Repair,
    Validation,
    Tutorial,
    Thermal,
}

impl Default for AssistantMode {
    fn default() -> Self {
        AssistantMode::Inspection
    }
}

impl AssistantMode {
    pub const ALL: [AssistantMode; 6] = [
        AssistantMode::Inspection,
        AssistantMode::Measurement,
        AssistantMode::Repair,
        AssistantMode::Validation,
        AssistantMode::Tutorial,
        AssistantMode::Thermal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssistantMode::Inspection => "INSPECTION",
            AssistantMode::Measurement => "MEASUREMENT",
            AssistantMode::Repair => "REPAIR",
            AssistantMode::Validation => "VALIDATION",
            AssistantMode::Tutorial => "TUTORIAL",
            AssistantMode::Thermal => "THERMAL",
        }
    }
}

impl FromStr for AssistantMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        AssistantMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown mode '{wanted}'"))
    }
}

/// Expert voice requested from the inference collaborator. Opaque to the core.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Persona {
    SeniorEng,
    HardwareHacker,
    Professor,
    SovietTech,
}

impl Default for Persona {
    fn default() -> Self {
        Persona::SeniorEng
    }
}

impl Persona {
    pub const ALL: [Persona; 4] = [
        Persona::SeniorEng,
        Persona::HardwareHacker,
        Persona::Professor,
        Persona::SovietTech,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Persona::SeniorEng => "SENIOR_ENG",
            Persona::HardwareHacker => "HARDWARE_HACKER",
            Persona::Professor => "PROFESSOR",
            Persona::SovietTech => "SOVIET_TECH",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Persona::SeniorEng => "Senior Engineer",
            Persona::HardwareHacker => "Hacker/Maker",
            Persona::Professor => "Professor",
            Persona::SovietTech => "Old School Tech",
        }
    }
}

impl FromStr for Persona {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Persona::ALL
            .into_iter()
            .find(|persona| persona.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown persona '{wanted}'"))
    }
}
