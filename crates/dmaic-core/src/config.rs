use crate::error::{DmaicError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// RecommendConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendConfig {
    /// Maximum number of recommendations returned for a project.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    crate::recommend::DEFAULT_LIMIT
}

impl RecommendConfig {
    /// The limit actually applied: never more than the engine's cap of
    /// `DEFAULT_LIMIT` cards.
    pub fn effective_limit(&self) -> usize {
        self.limit.min(crate::recommend::DEFAULT_LIMIT)
    }
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub name: String,
    /// Catalog YAML relative to the project root. The built-in catalog is
    /// used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    #[serde(default)]
    pub recommend: RecommendConfig,
}

fn default_version() -> u32 {
    1
}

impl Config {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: 1,
            name: name.into(),
            catalog: None,
            recommend: RecommendConfig::default(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        crate::io::read_yaml(&paths::config_path(root))?.ok_or(DmaicError::NotInitialized)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        crate::io::write_yaml(&paths::config_path(root), self)
    }

    pub fn catalog_path(&self, root: &Path) -> Option<PathBuf> {
        self.catalog.as_ref().map(|p| root.join(p))
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self, root: &Path) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.recommend.limit == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "recommend.limit is 0: no tools will ever be recommended".to_string(),
            });
        } else if self.recommend.limit > crate::recommend::DEFAULT_LIMIT {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "recommend.limit {} exceeds the maximum of {}; {} will be used",
                    self.recommend.limit,
                    crate::recommend::DEFAULT_LIMIT,
                    crate::recommend::DEFAULT_LIMIT
                ),
            });
        }

        if let Some(path) = self.catalog_path(root) {
            if !path.exists() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("catalog file '{}' does not exist", path.display()),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
