//! Simtree configuration loading from `.simtreerc.toml`.
//!
//! Configuration is optional; every setting has a default and command-line
//! flags override whatever the file says.
//!
//! # Example Configuration
//!
//! ```toml
//! [git]
//! max_commits = 200
//! repo = "../service"
//!
//! [tree]
//! min_similarity = 0.5
//!
//! [precedents]
//! max_results = 10
//!
//! [output]
//! format = "json"
//! color = false
//! ```

use serde::Deserialize;
use std::path::Path;

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = ".simtreerc.toml";

/// Root configuration structure loaded from `.simtreerc.toml`.
#[derive(Debug, Deserialize, Default)]
pub struct SimtreeConfig {
    /// Where commits come from.
    #[serde(default)]
    pub git: GitConfig,

    /// Tree printout settings.
    #[serde(default)]
    pub tree: TreeConfig,

    /// Precedent search settings.
    #[serde(default)]
    pub precedents: PrecedentConfig,

    /// Output formatting preferences.
    #[serde(default)]
    pub output: OutputSettings,
}

#[derive(Debug, Deserialize)]
pub struct GitConfig {
    /// Number of most recent commits to read from `git log`.
    ///
    /// Default: `50`
    #[serde(default = "default_max_commits")]
    pub max_commits: usize,

    /// Repository to read instead of the working directory.
    #[serde(default)]
    pub repo: Option<String>,
}

fn default_max_commits() -> usize {
    50
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            max_commits: default_max_commits(),
            repo: None,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct TreeConfig {
    /// Children whose cached similarity is below this are not printed.
    #[serde(default)]
    pub min_similarity: f64,
}

#[derive(Debug, Deserialize)]
pub struct PrecedentConfig {
    /// Default: `5`
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_max_results() -> usize {
    5
}

impl Default for PrecedentConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
        }
    }
}

/// Output formatting preferences.
///
/// Distinct from the runtime `OutputConfig` in the output module, which
/// handles actual rendering.
#[derive(Debug, Deserialize, Default)]
pub struct OutputSettings {
    /// Valid values: `table`, `json`
    #[serde(default)]
    pub format: Option<String>,

    /// Force colored output on or off; unset means auto-detect.
    #[serde(default)]
    pub color: Option<bool>,
}

impl SimtreeConfig {
    /// Load configuration from `.simtreerc.toml` in the given directory.
    ///
    /// A missing file yields defaults. Read and parse errors are logged as
    /// warnings and also yield defaults.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse {}: {}", CONFIG_FILE, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", CONFIG_FILE, e);
                }
            }
        }
        Self::default()
    }

    pub fn default_format(&self) -> Option<&str> {
        self.output.format.as_deref()
    }

    pub fn use_color(&self) -> Option<bool> {
        self.output.color
    }

    pub fn repo(&self) -> Option<&str> {
        self.git.repo.as_deref()
    }
}
