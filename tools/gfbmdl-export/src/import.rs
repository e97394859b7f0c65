//! Model → host-facing view
//!
//! The outbound half of the adapter: flat vertices and material-tagged
//! triangles per mesh, bones with resolved parent indices, and materials as
//! name plus raw parameter lists.

use gfbmdl_common::{
    CodecError, DecodeMode, ErrorScope, MatColor, MatFloat, MatSwitch, MeshAttribute, Model,
    ScopedError, Triangle, Vertex, WrapMode, check_face_indices, decode_model_with, triangles,
    unpack_vertices,
};
use glam::Vec3;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportedMesh {
    pub name: String,
    pub attributes: Vec<MeshAttribute>,
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportedBone {
    pub name: String,
    /// Index into [`ImportedScene::bones`], `None` for roots.
    pub parent: Option<usize>,
    pub head: Vec3,
    pub bone_type: u32,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportedTextureMap {
    pub sampler: String,
    pub texture_index: i32,
    /// Name the index resolves to, if it is in range.
    pub texture_name: Option<String>,
    pub wrap: [WrapMode; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportedMaterial {
    pub name: String,
    pub shader_group: String,
    pub switches: Vec<MatSwitch>,
    pub values: Vec<MatFloat>,
    pub colors: Vec<MatColor>,
    pub texture_maps: Vec<ImportedTextureMap>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportedScene {
    pub texture_names: Vec<String>,
    pub materials: Vec<ImportedMaterial>,
    pub meshes: Vec<ImportedMesh>,
    pub bones: Vec<ImportedBone>,
    /// Problems recorded by a best-effort import.
    #[serde(skip)]
    pub errors: Vec<ScopedError>,
}

fn import_material(model: &Model, material: &gfbmdl_common::Material) -> ImportedMaterial {
    let texture_maps = material
        .texture_maps
        .iter()
        .map(|map| ImportedTextureMap {
            sampler: map.sampler.clone(),
            texture_index: map.texture_index,
            texture_name: usize::try_from(map.texture_index)
                .ok()
                .and_then(|i| model.texture_names.get(i))
                .cloned(),
            wrap: map
                .mapping
                .map(|m| [m.wrap_x, m.wrap_y, m.wrap_z])
                .unwrap_or_default(),
        })
        .collect();

    ImportedMaterial {
        name: material.name.clone(),
        shader_group: material.shader_group.clone(),
        switches: material.switches.clone(),
        values: material.values.clone(),
        colors: material.colors.clone(),
        texture_maps,
    }
}

fn import_mesh(index: usize, mesh: &gfbmdl_common::Mesh) -> Result<ImportedMesh, CodecError> {
    let layout = mesh.layout()?;
    let vertices = unpack_vertices(&layout, &mesh.data)?;
    check_face_indices(&mesh.polygons, vertices.len())?;
    Ok(ImportedMesh {
        name: format!("Mesh_{}", index),
        attributes: mesh.attributes.clone(),
        vertices,
        triangles: triangles(&mesh.polygons),
    })
}

/// Build the host-facing view of a model.
///
/// In strict mode the first mesh that fails to unpack, or whose faces point
/// past its vertices, aborts the import. In
/// best-effort mode it is replaced by an empty mesh and recorded. A bone whose
/// parent index is out of range becomes a root in either mode.
pub fn import_model(model: &Model, mode: DecodeMode) -> Result<ImportedScene, CodecError> {
    let mut errors = Vec::new();

    let materials = model
        .materials
        .iter()
        .map(|m| import_material(model, m))
        .collect();

    let mut meshes = Vec::with_capacity(model.meshes.len());
    for (i, mesh) in model.meshes.iter().enumerate() {
        match (import_mesh(i, mesh), mode) {
            (Ok(imported), _) => meshes.push(imported),
            (Err(error), DecodeMode::Strict) => return Err(error),
            (Err(error), DecodeMode::BestEffort) => {
                warn!("mesh {}: {}, importing it empty", i, error);
                errors.push(ScopedError {
                    scope: ErrorScope::Mesh(i),
                    error,
                });
                meshes.push(ImportedMesh {
                    name: format!("Mesh_{}", i),
                    ..Default::default()
                });
            }
        }
    }

    let bone_count = model.bones.len();
    let bones = model
        .bones
        .iter()
        .enumerate()
        .map(|(i, bone)| {
            let parent = match bone.parent {
                -1 => None,
                p if p >= 0 && (p as usize) < bone_count => Some(p as usize),
                p => {
                    let error = CodecError::UnresolvedBoneParent {
                        bone: bone.name.clone(),
                        parent: p.to_string(),
                    };
                    warn!("{}", error);
                    errors.push(ScopedError {
                        scope: ErrorScope::Bone(i),
                        error,
                    });
                    None
                }
            };
            ImportedBone {
                name: bone.name.clone(),
                parent,
                head: bone.translation.into(),
                bone_type: bone.bone_type,
                visible: bone.visible,
            }
        })
        .collect();

    let scene = ImportedScene {
        texture_names: model.texture_names.clone(),
        materials,
        meshes,
        bones,
        errors,
    };
    info!(
        materials = scene.materials.len(),
        meshes = scene.meshes.len(),
        bones = scene.bones.len(),
        errors = scene.errors.len(),
        "imported model"
    );
    Ok(scene)
}

/// Decode a buffer and build its host-facing view.
///
/// Errors recorded by a best-effort decode come first in
/// [`ImportedScene::errors`].
pub fn import_bytes(bytes: &[u8], mode: DecodeMode) -> Result<ImportedScene, CodecError> {
    let report = decode_model_with(bytes, mode)?;
    let mut scene = import_model(&report.model, mode)?;
    let mut errors = report.errors;
    errors.append(&mut scene.errors);
    scene.errors = errors;
    Ok(scene)
}
