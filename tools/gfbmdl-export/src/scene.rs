//! JSON host scene
//!
//! The file-based [`SceneSource`] used by the CLI. A host plugin writes its
//! scene as JSON in this shape; omitted fields take their defaults.
//!
//! ```json
//! {
//!   "texture_names": ["body_col"],
//!   "materials": [{ "name": "Body", "base_color_texture": 0 }],
//!   "meshes": [{
//!     "name": "Body",
//!     "positions": [[0, 0, 0], [1, 0, 0], [0, 1, 0]],
//!     "normals": [[0, 0, 1], [0, 0, 1], [0, 0, 1]],
//!     "polygons": [{ "vertices": [0, 1, 2], "material_index": 0 }],
//!     "material_slots": 1
//!   }],
//!   "bones": [{ "name": "Root", "head": [0, 0, 0], "deform": true }]
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::adapter::{HostBone, HostMaterial, HostMesh, SceneSource};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonScene {
    pub texture_names: Vec<String>,
    pub materials: Vec<HostMaterial>,
    pub meshes: Vec<HostMesh>,
    pub bones: Vec<HostBone>,
}

impl SceneSource for JsonScene {
    fn texture_names(&self) -> &[String] {
        &self.texture_names
    }

    fn materials(&self) -> &[HostMaterial] {
        &self.materials
    }

    fn meshes(&self) -> &[HostMesh] {
        &self.meshes
    }

    fn bones(&self) -> &[HostBone] {
        &self.bones
    }
}

pub fn load_scene(path: &Path) -> Result<JsonScene> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scene: {:?}", path))?;
    let scene: JsonScene = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse scene: {:?}", path))?;
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_parse_minimal_scene() {
        let scene: JsonScene = serde_json::from_str(
            r#"{
                "meshes": [{
                    "name": "Tri",
                    "positions": [[0, 0, 0], [1, 0, 0], [0, 1, 0]],
                    "normals": [[0, 0, 1], [0, 0, 1], [0, 0, 1]],
                    "skin": [{ "bone_index": 0, "weight": 1.0 }, null, null],
                    "polygons": [{ "vertices": [0, 1, 2] }],
                    "material_slots": 1
                }],
                "bones": [{ "name": "Root", "deform": true }]
            }"#,
        )
        .unwrap();

        assert!(scene.texture_names().is_empty());
        let mesh = &scene.meshes()[0];
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.positions[1], Vec3::X);
        assert_eq!(mesh.polygons[0].material_index, 0);
        assert!(mesh.skin[0].is_some());
        assert!(mesh.skin[1].is_none());
        assert_eq!(scene.bones()[0].parent, None);
    }

    #[test]
    fn test_load_scene_missing_file() {
        let err = load_scene(Path::new("/nonexistent/scene.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read scene"));
    }
}
