use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::ValueEnum;
use sapper_core::GameConfig;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    #[default]
    Beginner,
    Intermediate,
    Expert,
}

impl Preset {
    pub const fn config(self) -> GameConfig {
        match self {
            Self::Beginner => GameConfig::beginner(),
            Self::Intermediate => GameConfig::intermediate(),
            Self::Expert => GameConfig::expert(),
        }
    }
}

/// Defaults read from the settings file; command line flags win.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub store: PathBuf,
    pub player_name: String,
    pub preset: Preset,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store: PathBuf::from("sapper-games.json"),
            player_name: "player".to_string(),
            preset: Preset::default(),
        }
    }
}

impl Settings {
    /// A missing file yields the defaults, a broken one is an error.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents)
                .with_context(|| format!("Invalid settings file {}", path.display())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("No settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(err) => {
                Err(err).with_context(|| format!("Could not read settings {}", path.display()))
            }
        }
    }

    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}
