//! Scene manager configuration

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};
use crate::spatial::OctreeConfig;

/// Defaults applied to every [`RaySceneQuery`](crate::query::RaySceneQuery)
/// created through the scene manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RayQueryDefaults {
    /// Sort hits by ascending distance
    pub sort_by_distance: bool,
    /// Maximum number of hits kept when sorting (0 = unbounded)
    pub max_results: usize,
}

impl Default for RayQueryDefaults {
    fn default() -> Self {
        Self {
            sort_by_distance: false,
            max_results: 0,
        }
    }
}

/// # Scene Configuration
///
/// Tuning for the spatial index and defaults for queries created by a
/// [`SceneManager`](crate::scene::SceneManager).
///
/// ```toml
/// [octree]
/// max_entities_per_node = 8
/// max_depth = 8
/// min_node_size = 1.0
///
/// [ray_query]
/// sort_by_distance = true
/// max_results = 2
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Broad-phase octree tuning
    pub octree: OctreeConfig,
    /// Ray query defaults
    pub ray_query: RayQueryDefaults,
}

impl SceneConfig {
    /// Check that the values can drive an octree build
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.octree.max_entities_per_node == 0 {
            return Err(ConfigError::Invalid {
                field: "octree.max_entities_per_node",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(self.octree.min_node_size.is_finite() && self.octree.min_node_size >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "octree.min_node_size",
                reason: format!("{} is not a finite, non-negative size", self.octree.min_node_size),
            });
        }
        Ok(())
    }
}

impl Config for SceneConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_partial_document_uses_defaults() {
        let config = SceneConfig::from_toml_str(
            "[octree]\nmax_depth = 3\n\n[ray_query]\nsort_by_distance = true\n",
        )
        .unwrap();

        assert_eq!(config.octree.max_depth, 3);
        assert_eq!(config.octree.max_entities_per_node, OctreeConfig::default().max_entities_per_node);
        assert!(config.ray_query.sort_by_distance);
        assert_eq!(config.ray_query.max_results, 0);
    }

    #[test]
    fn test_ron_document() {
        let config = SceneConfig::from_ron_str(
            "(octree: (max_entities_per_node: 2, max_depth: 4, min_node_size: 0.5), ray_query: (sort_by_distance: true, max_results: 1))",
        )
        .unwrap();

        assert_eq!(config.octree.max_entities_per_node, 2);
        assert_eq!(config.ray_query.max_results, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_nodes() {
        let mut config = SceneConfig::default();
        config.octree.max_entities_per_node = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_unsupported_extension() {
        let result = SceneConfig::load_from_file("scene.yaml");
        assert!(result.is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let mut config = SceneConfig::default();
        config.octree.max_depth = 5;
        config.ray_query.max_results = 7;

        let path = std::env::temp_dir().join(format!("scene_engine_config_{}.toml", std::process::id()));
        let path = path.to_string_lossy().into_owned();
        config.save_to_file(&path).unwrap();
        let loaded = SceneConfig::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }
}
