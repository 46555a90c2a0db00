use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Worker threads used for independent output files
    #[serde(default = "default_threads")]
    pub threads: usize,

    #[serde(default = "default_show_progress")]
    pub show_progress: bool,
}

fn default_threads() -> usize {
    1
}

fn default_show_progress() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threads: default_threads(),
            show_progress: default_show_progress(),
        }
    }
}

impl Config {
    pub fn path() -> Option<PathBuf> {
        ProjectDirs::from("org", "contig-splicer", "contig-splicer")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Reads the user config, falling back to defaults when it is absent or unreadable.
    pub fn load() -> Self {
        Self::path()
            .filter(|path| path.exists())
            .and_then(|path| fs::read_to_string(path).ok())
            .map(|content| Self::from_toml(&content))
            .unwrap_or_default()
    }

    pub fn from_toml(content: &str) -> Self {
        toml::from_str(content).unwrap_or_default()
    }
}
