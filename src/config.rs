//! Builder settings, loaded from an optional YAML file.

use crate::error::{ClozeError, Result};
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Looked up in the current directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "cloze.yaml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuilderConfig {
    pub voting: VotingWeights,
    pub audio: AudioConfig,
}

/// Votes carried by each kind of vocalization candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VotingWeights {
    pub headword_weight: u32,
    pub example_weight: u32,
}

impl Default for VotingWeights {
    fn default() -> Self {
        // Sentence context makes the service more reliable than on bare words.
        Self {
            headword_weight: 1,
            example_weight: 2,
        }
    }
}

/// How audio files are named.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AudioScheme {
    /// `ar_<ascii transliteration>.mp3`, lossy but human-readable
    #[default]
    Readable,
    /// `ar_<base64url of the Arabic text>.mp3`, reversible
    Base64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AudioConfig {
    pub scheme: AudioScheme,
    pub words_in_filename: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            scheme: AudioScheme::Readable,
            words_in_filename: 7,
        }
    }
}

impl BuilderConfig {
    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: BuilderConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            ClozeError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&contents)
    }

    /// Load `path` if given, else [`DEFAULT_CONFIG_FILE`] if it exists, else
    /// defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let candidate = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !candidate.exists() {
                    debug!("No {} found, using default settings", DEFAULT_CONFIG_FILE);
                    return Ok(Self::default());
                }
                candidate
            }
        };
        debug!("Loading settings from {}", path.display());
        Self::from_file(&path)
    }

    fn validate(&self) -> Result<()> {
        if self.voting.headword_weight == 0 || self.voting.example_weight == 0 {
            return Err(ClozeError::Config(
                "voting weights must be at least 1".to_string(),
            ));
        }
        if self.audio.words_in_filename == 0 {
            return Err(ClozeError::Config(
                "audio.words_in_filename must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
