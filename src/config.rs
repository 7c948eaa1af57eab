use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::error::{Result, MkvStampError};

fn default_extension() -> String {
    "mkv".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub tools: ToolsConfig,
    pub branding: BrandingConfig,
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Path to the mkvmerge binary
    pub mkvmerge_path: String,
    /// Path to the mkvpropedit binary
    pub mkvpropedit_path: String,
    /// Path to the mkvinfo binary (text fallback for track inspection)
    pub mkvinfo_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandingConfig {
    /// Container-level title written into every output file
    pub container_title: String,
    /// Display name applied to every recognized track
    pub track_label: String,
    /// Name of the injected subtitle track
    pub subtitle_track_name: String,
    /// Language tag of the injected subtitle track
    pub subtitle_language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Container extension to match when scanning the input directory
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Delete the source file once its copy is fully processed
    #[serde(default = "default_true")]
    pub delete_source: bool,
    /// Run the OS `sync` command after each deletion
    #[serde(default = "default_true")]
    pub sync_after_delete: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tools: ToolsConfig {
                mkvmerge_path: "mkvmerge".to_string(),
                mkvpropedit_path: "mkvpropedit".to_string(),
                mkvinfo_path: "mkvinfo".to_string(),
            },
            branding: BrandingConfig {
                container_title: "Visit & Support - Google.in".to_string(),
                track_label: "Google.in".to_string(),
                subtitle_track_name: "Google Subtitle".to_string(),
                subtitle_language: "eng".to_string(),
            },
            batch: BatchConfig {
                extension: default_extension(),
                delete_source: true,
                sync_after_delete: true,
            },
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MkvStampError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| MkvStampError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MkvStampError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| MkvStampError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}
