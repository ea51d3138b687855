use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use transcript_compare_core::alignment::infrastructure::renderer_factory::MarkupFormat;
use transcript_compare_core::shared::config::DiarizationConfig;
use transcript_compare_core::shared::constants::{
    APP_CONFIG_DIR, DEFAULT_WORKER_THREADS, SETTINGS_FILENAME,
};
use transcript_compare_core::shared::tokenizer::Granularity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Ansi,
    Html,
    Plain,
    Json,
}

impl OutputFormat {
    /// Markup used for the diff. JSON reports carry HTML markup.
    pub fn markup(self) -> MarkupFormat {
        match self {
            OutputFormat::Ansi => MarkupFormat::Ansi,
            OutputFormat::Html | OutputFormat::Json => MarkupFormat::Html,
            OutputFormat::Plain => MarkupFormat::Plain,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Ansi => write!(f, "ansi"),
            OutputFormat::Html => write!(f, "html"),
            OutputFormat::Plain => write!(f, "plain"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ansi" => Ok(OutputFormat::Ansi),
            "html" => Ok(OutputFormat::Html),
            "plain" => Ok(OutputFormat::Plain),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!(
                "Format must be one of: ansi, html, plain, json, got '{other}'"
            )),
        }
    }
}

/// Per-user defaults, overridden by command-line flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub normalized: bool,
    pub mode: Granularity,
    pub format: OutputFormat,
    pub threads: usize,
    pub diarization: DiarizationConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            normalized: false,
            mode: Granularity::Word,
            format: OutputFormat::Ansi,
            threads: DEFAULT_WORKER_THREADS,
            diarization: DiarizationConfig::default(),
        }
    }
}

impl Settings {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_CONFIG_DIR).join(SETTINGS_FILENAME))
    }

    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Missing file gives defaults; an unreadable one is reported and
    /// ignored.
    pub fn load_from(path: &Path) -> Self {
        let Ok(json) = fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring invalid settings in {}: {e}", path.display());
                Self::default()
            }
        }
    }
}
