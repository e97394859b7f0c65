//! Host adapter interface
//!
//! Everything the assembler needs from a 3D host, expressed as plain data. A
//! host implements [`SceneSource`]; the assembler never sees host objects.
//!
//! Per-vertex layers (`normals`, `tangents`, UV and color layers, `skin`) are
//! indexed like `positions`. Optional layers may be left empty.

use gfbmdl_common::{MatColor, MatFloat, MatSwitch};
use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Single-bone skin binding of one vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkinBinding {
    /// Index into [`SceneSource::bones`].
    pub bone_index: usize,
    pub weight: f32,
}

/// A host polygon: vertex indices in winding order plus its material slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostPolygon {
    pub vertices: Vec<u32>,
    #[serde(default)]
    pub material_index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostMesh {
    pub name: String,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    /// Tangent in `xyz`, bitangent sign in `w`.
    pub tangents: Vec<Vec4>,
    pub uv_layers: Vec<Vec<Vec2>>,
    pub color_layers: Vec<Vec<Vec4>>,
    pub skin: Vec<Option<SkinBinding>>,
    pub polygons: Vec<HostPolygon>,
    /// Number of material slots; polygon groups are emitted for each.
    pub material_slots: usize,
    /// Name of the bone the mesh is attached to.
    pub owner_bone: Option<String>,
}

impl HostMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostBone {
    pub name: String,
    pub parent: Option<String>,
    pub head: Vec3,
    pub deform: bool,
}

/// Host material. Override lists replace template entries of the same name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostMaterial {
    pub name: String,
    /// Index into [`SceneSource::texture_names`] of the base color image.
    pub base_color_texture: Option<i32>,
    pub switches: Vec<MatSwitch>,
    pub values: Vec<MatFloat>,
    pub colors: Vec<MatColor>,
}

/// A host scene as seen by the exporter.
pub trait SceneSource {
    fn texture_names(&self) -> &[String];
    fn materials(&self) -> &[HostMaterial];
    fn meshes(&self) -> &[HostMesh];
    /// Bones in declared order; parents are referenced by name.
    fn bones(&self) -> &[HostBone];
}
