//! Settings management for WriteWell
//!
//! Stores settings in ~/.config/writewell/config.json

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::suggest::client::{DEFAULT_ADDRESS, DEFAULT_MODEL};

/// User-supplied style and tone guides, keyed by name. Guide bodies are
/// opaque guideline text; they are embedded in prompts, never validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomGuides {
    #[serde(default)]
    pub styles: BTreeMap<String, String>,
    #[serde(default)]
    pub tones: BTreeMap<String, String>,
}

/// The preferences snapshot the pipeline reads at the start of an analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    pub style: String,
    pub tone: String,
    pub simple_mode: bool,
    #[serde(default)]
    pub custom_guides: CustomGuides,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            style: "formal".to_string(),
            tone: "neutral".to_string(),
            simple_mode: false,
            custom_guides: CustomGuides::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default = "default_tone")]
    pub tone: String,
    #[serde(default)]
    pub simple_mode: bool,
    #[serde(default = "default_address")]
    pub ollama_address: String,
    #[serde(default = "default_model")]
    pub ollama_model: String,
    #[serde(default)]
    pub custom_guides: CustomGuides,
}

fn default_style() -> String {
    "formal".to_string()
}

fn default_tone() -> String {
    "neutral".to_string()
}

fn default_address() -> String {
    DEFAULT_ADDRESS.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            style: default_style(),
            tone: default_tone(),
            simple_mode: false,
            ollama_address: default_address(),
            ollama_model: default_model(),
            custom_guides: CustomGuides::default(),
        }
    }
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("writewell"))
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.json"))
    }

    /// Load settings from disk, or return defaults.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load settings from a specific path, or return defaults.
    ///
    /// A corrupt file is backed up next to the original before defaults
    /// are returned, so a hand-edited config is never silently lost.
    pub fn load_from(path: &Path) -> Self {
        if let Ok(content) = fs::read_to_string(path) {
            match serde_json::from_str(&content) {
                Ok(settings) => return settings,
                Err(err) => {
                    preserve_corrupt_config(path, &content);
                    log::warn!(
                        "config file was corrupted ({}); a backup was saved and defaults loaded",
                        err
                    );
                }
            }
        }
        Self::default()
    }

    /// Save settings to disk.
    pub fn save(&self) -> Result<(), Error> {
        let dir = Self::config_dir()
            .ok_or_else(|| Error::config("could not determine config directory"))?;
        self.save_to(&dir.join("config.json"))
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), Error> {
        let dir = path
            .parent()
            .ok_or_else(|| Error::config("config path has no parent directory"))?;

        fs::create_dir_all(dir)
            .map_err(|e| Error::config(format!("failed to create config directory: {}", e)))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = fs::set_permissions(dir, fs::Permissions::from_mode(0o700)) {
                log::warn!("failed to set config directory permissions: {}", e);
            }
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| Error::config(format!("failed to serialize settings: {}", e)))?;

        #[cfg(unix)]
        {
            write_config_atomic(path, &content)
                .map_err(|e| Error::config(format!("failed to write config: {}", e)))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(path, content)
                .map_err(|e| Error::config(format!("failed to write config: {}", e)))?;
        }

        Ok(())
    }

    /// The preferences snapshot handed to the analysis pipeline.
    pub fn preferences(&self) -> Preferences {
        Preferences {
            style: self.style.clone(),
            tone: self.tone.clone(),
            simple_mode: self.simple_mode,
            custom_guides: self.custom_guides.clone(),
        }
    }
}

/// Write config atomically: temp file in the same directory, then rename.
#[cfg(unix)]
fn write_config_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let tmp = dir.join(".config.json.tmp");
    {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)
}

/// Keep a copy of an unreadable config so user edits are recoverable.
fn preserve_corrupt_config(path: &Path, content: &str) {
    let backup = path.with_extension("json.corrupt");
    if let Err(e) = fs::write(&backup, content) {
        log::warn!("failed to back up corrupt config: {}", e);
    }
}
