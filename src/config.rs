//! Reference configuration: how to obtain the ontology and which reasoner to attach.
//!
//! Persisted as TOML. Every field except the ontology IRI has a default, so a
//! minimal file is a single line:
//!
//! ```toml
//! ontology_iri = "http://www.semanticweb.org/kitchen"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::reasoner::Completeness;
use crate::reasoner::factory::DEFAULT_REASONER;

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Where the ontology of a new reference comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateMode {
    /// Start from an empty ontology.
    #[default]
    Create,
    /// Parse the document at `file_path`.
    LoadFromFile,
    /// Fetch the document from `web_url` (or the ontology IRI).
    LoadFromWeb,
}

/// Configuration of one reference, persisted as TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceConfig {
    /// IRI of the ontology; entity names are resolved against `<iri>#`.
    pub ontology_iri: String,
    /// Document to load from, and the default target of `save`.
    #[serde(default)]
    pub file_path: Option<PathBuf>,
    /// Document URL for [`CreateMode::LoadFromWeb`].
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default)]
    pub mode: CreateMode,
    /// Reasoner factory key.
    #[serde(default = "default_reasoner")]
    pub reasoner: String,
    /// Reasoner re-classifies only on synchronization.
    #[serde(default = "default_true")]
    pub buffering_reasoner: bool,
    /// Writes wait in the change buffer until flushed.
    #[serde(default)]
    pub buffering_manipulator: bool,
    /// Reads merge reasoner answers with asserted facts.
    #[serde(default = "default_true")]
    pub include_inferences: bool,
    #[serde(default)]
    pub completeness: Completeness,
    /// Lock waits or holds longer than this are logged.
    #[serde(default = "default_lock_log_threshold_ns")]
    pub lock_log_threshold_ns: u64,
    /// Give up on a web document after this many seconds.
    #[serde(default = "default_web_timeout_secs")]
    pub web_timeout_secs: u64,
}

fn default_reasoner() -> String {
    DEFAULT_REASONER.into()
}
fn default_true() -> bool {
    true
}
fn default_lock_log_threshold_ns() -> u64 {
    50
}
fn default_web_timeout_secs() -> u64 {
    30
}

impl ReferenceConfig {
    /// An empty ontology with default settings.
    pub fn new(ontology_iri: impl Into<String>) -> Self {
        Self {
            ontology_iri: ontology_iri.into(),
            file_path: None,
            web_url: None,
            mode: CreateMode::Create,
            reasoner: default_reasoner(),
            buffering_reasoner: true,
            buffering_manipulator: false,
            include_inferences: true,
            completeness: Completeness::default(),
            lock_log_threshold_ns: default_lock_log_threshold_ns(),
            web_timeout_secs: default_web_timeout_secs(),
        }
    }

    /// Load the ontology from `path`, which is also where it will be saved.
    pub fn from_file(ontology_iri: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::new(ontology_iri)
            .with_mode(CreateMode::LoadFromFile)
            .with_file(path)
    }

    pub fn with_mode(mut self, mode: CreateMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_reasoner(mut self, key: impl Into<String>) -> Self {
        self.reasoner = key.into();
        self
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    pub fn with_web_url(mut self, url: impl Into<String>) -> Self {
        self.web_url = Some(url.into());
        self
    }

    pub fn with_buffering(mut self, reasoner: bool, manipulator: bool) -> Self {
        self.buffering_reasoner = reasoner;
        self.buffering_manipulator = manipulator;
        self
    }

    pub fn with_completeness(mut self, completeness: Completeness) -> Self {
        self.completeness = completeness;
        self
    }

    pub fn with_inferences(mut self, include: bool) -> Self {
        self.include_inferences = include;
        self
    }

    pub fn with_web_timeout(mut self, timeout: Duration) -> Self {
        self.web_timeout_secs = timeout.as_secs().max(1);
        self
    }

    /// Check that the mode has what it needs.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.ontology_iri.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "ontology_iri must not be empty".into(),
            });
        }
        if self.mode == CreateMode::LoadFromFile && self.file_path.is_none() {
            return Err(ConfigError::Invalid {
                message: "mode \"load_from_file\" requires file_path".into(),
            });
        }
        Ok(())
    }

    /// Source URL for web loading.
    pub fn web_source(&self) -> &str {
        self.web_url.as_deref().unwrap_or(&self.ontology_iri)
    }

    pub fn web_timeout(&self) -> Duration {
        Duration::from_secs(self.web_timeout_secs)
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_toml_uses_defaults() {
        let cfg: ReferenceConfig = toml::from_str(r#"ontology_iri = "http://ex.org/k""#).unwrap();
        assert_eq!(cfg, ReferenceConfig::new("http://ex.org/k"));
        assert_eq!(cfg.reasoner, "saturation");
        assert!(cfg.buffering_reasoner);
        assert!(!cfg.buffering_manipulator);
        assert_eq!(cfg.lock_log_threshold_ns, 50);
        assert_eq!(cfg.web_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn config_roundtrip_toml() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("kb.toml");
        let cfg = ReferenceConfig::from_file("http://ex.org/k", "/tmp/k.owl")
            .with_reasoner("structural")
            .with_buffering(false, true)
            .with_completeness(Completeness::Direct)
            .with_web_timeout(Duration::from_secs(5));
        cfg.save(&path).unwrap();

        let loaded = ReferenceConfig::load(&path).unwrap();
        assert_eq!(loaded, cfg);
        assert_eq!(loaded.web_timeout(), Duration::from_secs(5));
        assert_eq!(loaded.mode, CreateMode::LoadFromFile);
    }

    #[test]
    fn validation_catches_missing_file() {
        let cfg = ReferenceConfig::new("http://ex.org/k").with_mode(CreateMode::LoadFromFile);
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid { .. })));
        assert!(ReferenceConfig::new("").validate().is_err());
        assert_eq!(
            ReferenceConfig::new("http://ex.org/k").web_source(),
            "http://ex.org/k"
        );
    }

    #[test]
    fn unreadable_file_is_reported() {
        let err = ReferenceConfig::load(Path::new("/nonexistent/kb.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
