use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

use crate::ledger::LedgerPolicy;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrSettings {
    pub endpoint: String,
    pub api_key: String,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://vision.googleapis.com/v1/images:annotate".into(),
            api_key: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserSettings {
    ocr: OcrSettings,
    ledger: LedgerPolicy,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn ocr(&self) -> OcrSettings {
        self.data.read().unwrap().ocr.clone()
    }

    pub fn ledger_policy(&self) -> LedgerPolicy {
        self.data.read().unwrap().ledger.clone()
    }

    pub fn update_ocr(&self, settings: OcrSettings) -> Result<()> {
        {
            let mut guard = self.data.write().unwrap();
            guard.ocr = settings;
            self.persist(&guard)?;
        }
        Ok(())
    }

    pub fn update_ledger_policy(&self, policy: LedgerPolicy) -> Result<()> {
        {
            let mut guard = self.data.write().unwrap();
            guard.ledger = policy;
            self.persist(&guard)?;
        }
        Ok(())
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_file_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json")).unwrap();
        assert!(store.ledger_policy().allow_repeat_entries);
        assert!(store.ocr().api_key.is_empty());
    }

    #[test]
    fn roundtrips_updates_through_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let store = SettingsStore::new(path.clone()).unwrap();
        store
            .update_ledger_policy(LedgerPolicy {
                allow_repeat_entries: false,
            })
            .unwrap();

        let reloaded = SettingsStore::new(path).unwrap();
        assert!(!reloaded.ledger_policy().allow_repeat_entries);
    }
}
