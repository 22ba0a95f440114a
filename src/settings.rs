use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::RwLock,
};

use crate::models::{AssistantMode, Persona};

pub const SETTINGS_FILE: &str = "settings.json";
const DEFAULT_HOME: &str = ".circuitsense";

/// Operator preferences that outlive a session. Analysis results and the audit
/// trail are never written here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct OperatorSettings {
    pub persona: Persona,
    pub voice_enabled: bool,
    pub default_mode: AssistantMode,
}

impl Default for OperatorSettings {
    fn default() -> Self {
        Self {
            persona: Persona::SeniorEng,
            voice_enabled: false,
            default_mode: AssistantMode::Inspection,
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<OperatorSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!("Ignoring unreadable settings at {}: {err}", path.display());
                OperatorSettings::default()
            })
        } else {
            OperatorSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    /// `$CIRCUITSENSE_HOME/settings.json`, or under `./.circuitsense`.
    pub fn default_path() -> PathBuf {
        std::env::var_os("CIRCUITSENSE_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HOME))
            .join(SETTINGS_FILE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn current(&self) -> OperatorSettings {
        self.data
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn update(&self, apply: impl FnOnce(&mut OperatorSettings)) -> Result<OperatorSettings> {
        let mut guard = self
            .data
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        apply(&mut guard);
        self.persist(&guard)?;
        Ok(guard.clone())
    }

    fn persist(&self, data: &OperatorSettings) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
