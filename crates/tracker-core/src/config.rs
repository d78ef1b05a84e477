use crate::error::{Result, TrackerError};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ExecutionConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Minimum pass percentage before a release can be marked ready.
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold: u32,
}

fn default_pass_threshold() -> u32 {
    95
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            pass_threshold: default_pass_threshold(),
        }
    }
}

// ---------------------------------------------------------------------------
// ProjectConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub project: ProjectConfig,
    /// Name recorded as owner / added-by on uploads and stakeholders.
    #[serde(default = "default_current_user")]
    pub current_user: String,
    #[serde(default)]
    pub execution: ExecutionConfig,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_version() -> u32 {
    1
}

fn default_current_user() -> String {
    "Current User".to_string()
}

fn default_history_limit() -> usize {
    200
}

impl Config {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            version: 1,
            project: ProjectConfig {
                name: project_name.into(),
                description: None,
            },
            current_user: default_current_user(),
            execution: ExecutionConfig::default(),
            history_limit: default_history_limit(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(TrackerError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        let threshold = self.execution.pass_threshold;
        if threshold > 100 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "execution.pass_threshold={threshold} can never be met (max 100)"
                ),
            });
        } else if threshold == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "execution.pass_threshold=0 lets any test run through".to_string(),
            });
        }

        if self.current_user.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "current_user is empty; uploads will have no owner".to_string(),
            });
        }

        if self.history_limit == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "history_limit=0 disables the transition history".to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::new("o2c");
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.project.name, "o2c");
        assert_eq!(parsed.execution.pass_threshold, 95);
        assert_eq!(parsed.current_user, "Current User");
    }

    #[test]
    fn minimal_yaml_fills_defaults() {
        let cfg: Config = serde_yaml::from_str("project:\n  name: p2p\n").unwrap();
        assert_eq!(cfg.version, 1);
        assert_eq!(cfg.execution.pass_threshold, 95);
        assert_eq!(cfg.history_limit, 200);
    }

    #[test]
    fn load_missing_is_not_initialized() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(TrackerError::NotInitialized)
        ));
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::new("o2c");
        cfg.execution.pass_threshold = 80;
        cfg.save(dir.path()).unwrap();
        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.execution.pass_threshold, 80);
    }

    #[test]
    fn validate_default_is_clean() {
        assert!(Config::new("o2c").validate().is_empty());
    }

    #[test]
    fn validate_flags_unreachable_threshold() {
        let mut cfg = Config::new("o2c");
        cfg.execution.pass_threshold = 120;
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, WarnLevel::Error);
    }

    #[test]
    fn validate_flags_zero_threshold_and_empty_user() {
        let mut cfg = Config::new("o2c");
        cfg.execution.pass_threshold = 0;
        cfg.current_user = "  ".to_string();
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().all(|w| w.level == WarnLevel::Warning));
    }
}
