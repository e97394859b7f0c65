//! Human-readable model summary for `gfbmdl-export info`.

use std::fmt;

use gfbmdl_common::{Model, VertexType};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshSummary {
    pub index: usize,
    pub attributes: Vec<VertexType>,
    /// `None` when the attribute list is not a valid layout.
    pub stride: Option<usize>,
    pub vertex_count: Option<usize>,
    pub triangle_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummary {
    pub version: u32,
    pub textures: usize,
    pub materials: usize,
    pub groups: usize,
    pub bones: usize,
    pub collision_groups: usize,
    pub meshes: Vec<MeshSummary>,
}

impl ModelSummary {
    pub fn new(model: &Model) -> Self {
        let meshes = model
            .meshes
            .iter()
            .enumerate()
            .map(|(index, mesh)| {
                let layout = mesh.layout().ok();
                MeshSummary {
                    index,
                    attributes: mesh.attributes.iter().map(|a| a.vertex_type).collect(),
                    stride: layout.as_ref().map(|l| l.stride()),
                    vertex_count: layout.and_then(|l| l.vertex_count(mesh.data.len()).ok()),
                    triangle_count: mesh.polygons.iter().map(|p| p.faces.len() / 3).sum(),
                }
            })
            .collect();

        Self {
            version: model.version,
            textures: model.texture_names.len(),
            materials: model.materials.len(),
            groups: model.groups.len(),
            bones: model.bones.len(),
            collision_groups: model.collision_groups.len(),
            meshes,
        }
    }
}

fn or_dash(value: Option<usize>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

impl fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "version:          {:#010x}", self.version)?;
        writeln!(f, "textures:         {}", self.textures)?;
        writeln!(f, "materials:        {}", self.materials)?;
        writeln!(f, "groups:           {}", self.groups)?;
        writeln!(f, "bones:            {}", self.bones)?;
        writeln!(f, "collision groups: {}", self.collision_groups)?;
        write!(f, "meshes:           {}", self.meshes.len())?;
        for mesh in &self.meshes {
            write!(
                f,
                "\n  mesh {}: stride {}, {} vertices, {} triangles, {:?}",
                mesh.index,
                or_dash(mesh.stride),
                or_dash(mesh.vertex_count),
                mesh.triangle_count,
                mesh.attributes
            )?;
        }
        Ok(())
    }
}
