//! Export configuration
//!
//! Parses `export.toml`:
//!
//! ```toml
//! z_up = true
//!
//! [channels]
//! use_binormals = true
//! has_uv = [true, false, false, false]
//! has_color = [true, true, false, false]
//! has_bones = true
//!
//! [meshes.Eyes]
//! has_bones = false
//!
//! [template]
//! shader_group = "PokeDefaultShader"
//! ```

use anyhow::{Context, Result};
use gfbmdl_common::VertexChannels;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::template::MaterialTemplate;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Rotate the scene from Z-up to Y-up before packing.
    pub z_up: bool,
    /// Channels for meshes without an entry in `meshes`.
    pub channels: VertexChannels,
    /// Per-mesh channel overrides by mesh name. Fields left out of an entry
    /// take the built-in defaults, not the `[channels]` values.
    pub meshes: HashMap<String, VertexChannels>,
    pub template: MaterialTemplate,
}

impl ExportConfig {
    pub fn channels_for(&self, mesh: &str) -> &VertexChannels {
        self.meshes.get(mesh).unwrap_or(&self.channels)
    }
}

pub fn load_config(path: &Path) -> Result<ExportConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {:?}", path))?;
    let config: ExportConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config: {:?}", path))?;
    Ok(config)
}

/// Load `path` if given and present, otherwise the defaults.
pub fn load_config_or_default(path: Option<&Path>) -> Result<ExportConfig> {
    match path {
        Some(path) if path.exists() => load_config(path),
        Some(path) => {
            tracing::info!("No config at {:?}, using defaults", path);
            Ok(ExportConfig::default())
        }
        None => Ok(ExportConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: ExportConfig = toml::from_str("").unwrap();
        assert_eq!(config, ExportConfig::default());
        assert!(config.channels.use_binormals);
        assert_eq!(config.channels.has_uv, [true, false, false, false]);
        assert_eq!(config.channels.has_color, [true, true, false, false]);
        assert!(config.channels.has_bones);
        assert!(!config.z_up);
    }

    #[test]
    fn test_per_mesh_override() {
        let config: ExportConfig = toml::from_str(
            r#"
            [channels]
            use_binormals = false

            [meshes.Eyes]
            has_bones = false
            has_color = [false, false, false, false]
            "#,
        )
        .unwrap();

        assert!(!config.channels_for("Body").use_binormals);
        let eyes = config.channels_for("Eyes");
        assert!(!eyes.has_bones);
        assert!(eyes.use_binormals);
        assert_eq!(eyes.has_color, [false; 4]);
    }

    #[test]
    fn test_template_override() {
        let config: ExportConfig = toml::from_str(
            r#"
            [template]
            render_layer = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.template.render_layer, 2);
        assert_eq!(config.template.shader_group, "PokeDefaultShader");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = load_config_or_default(Some(Path::new("/nonexistent/export.toml"))).unwrap();
        assert_eq!(config, ExportConfig::default());
    }
}
