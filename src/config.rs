use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file looked up next to the data when no --config is given.
pub const DEFAULT_CONFIG_FILE: &str = "stimdist.toml";

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub paths: PathsConfig,
    pub providers: ProvidersConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Input stimuli table
    pub stimuli: PathBuf,
    /// Output table with per-pair distances
    pub output: PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProvidersConfig {
    pub elmo: ElmoConfig,
    pub bert: BertConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ElmoConfig {
    /// Base URL of the ELMo-style embedding server
    pub url: String,
    /// Mid-network layer to take per-token vectors from
    pub layer: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BertConfig {
    /// Base URL of the BERT-style embedding server
    pub url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig {
                stimuli: PathBuf::from("data/stims/stimuli.csv"),
                output: PathBuf::from("data/processed/stims_with_nlm_distances.csv"),
            },
            providers: ProvidersConfig {
                elmo: ElmoConfig {
                    url: "http://localhost:8765".to_string(),
                    layer: 2,
                },
                bert: BertConfig {
                    url: "http://localhost:8866".to_string(),
                },
            },
        }
    }
}

impl Config {
    /// Load config from an explicit path, or from ./stimdist.toml if it
    /// exists, falling back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("parsing config from {}", path.display()))
    }

    /// Write current config to disk (for `stimdist init`).
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("writing config to {}", path.display()))?;
        Ok(())
    }
}
