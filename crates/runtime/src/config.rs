use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Errors from loading or writing a scene configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid scene config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("scene config lists no interaction sources")]
    NoSources,
    #[error("interactor id `{0}` is used by more than one source")]
    DuplicateInteractor(String),
}

/// A host node bound to an interactor at bootstrap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionSource {
    /// Identifier the host resolves to a node (e.g. a DOM element id).
    pub element_id: String,
    /// Stable id stored in the entity's `Interactor` component.
    pub interactor_id: String,
}

impl InteractionSource {
    pub fn new(element_id: impl Into<String>, interactor_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
            interactor_id: interactor_id.into(),
        }
    }

    /// Left/right cursors and left/right hand controllers.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("left-cursor", "leftRemote"),
            Self::new("right-cursor", "rightRemote"),
            Self::new("player-left-controller", "leftHand"),
            Self::new("player-right-controller", "rightHand"),
        ]
    }
}

/// Settings for the key-triggered box spawner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    /// Key whose key-up event spawns a box.
    pub trigger_key: String,
    /// World position of every spawned box.
    pub offset: Vec3,
    /// Edge length of the rendered box.
    pub box_size: f32,
    /// Half extents of the physics shape.
    pub half_extents: Vec3,
    /// 0xRRGGBB
    pub color: u32,
    pub opacity: f32,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            trigger_key: "j".into(),
            offset: Vec3::new(1.0, 2.0, 0.0),
            box_size: 1.0,
            half_extents: Vec3::splat(0.5),
            color: 0xff0000,
            opacity: 0.3,
        }
    }
}

/// Scene configuration. Every field has a default, so a config file only
/// needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Host subsystem that must report ready before bootstrap.
    pub readiness_subsystem: String,
    /// Interaction sources, in entity creation order.
    pub sources: Vec<InteractionSource>,
    pub spawner: SpawnerConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            readiness_subsystem: "physics".into(),
            sources: InteractionSource::defaults(),
            spawner: SpawnerConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Read a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        tracing::debug!(path = %path.display(), "scene config loaded");
        Ok(config)
    }

    /// Parse and validate a JSON config.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Interactor ids identify the controller that holds a body, so each
    /// must be unique and at least one source must exist.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::NoSources);
        }
        let mut seen = BTreeSet::new();
        for source in &self.sources {
            if !seen.insert(source.interactor_id.as_str()) {
                return Err(ConfigError::DuplicateInteractor(source.interactor_id.clone()));
            }
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Set the subsystem whose readiness gates bootstrap.
    pub fn with_readiness_subsystem(mut self, subsystem: impl Into<String>) -> Self {
        self.readiness_subsystem = subsystem.into();
        self
    }

    pub fn with_sources(mut self, sources: Vec<InteractionSource>) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_spawner(mut self, spawner: SpawnerConfig) -> Self {
        self.spawner = spawner;
        self
    }
}
