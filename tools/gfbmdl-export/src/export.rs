//! Scene assembler
//!
//! Turns a [`SceneSource`] into a [`Model`]: materials from the template,
//! bones linked by name, meshes packed per their channel selection, and one
//! group per mesh carrying its bounds.

use gfbmdl_common::{BoundingBox, CodecError, Group, Model, encode_model};
use glam::Vec3;
use tracing::{info, warn};

use crate::adapter::SceneSource;
use crate::config::ExportConfig;
use crate::error::ExportError;
use crate::material::build_material;
use crate::mesh::{build_mesh, to_y_up};
use crate::skeleton::link_bones;

/// An assembled model plus the non-fatal problems found on the way.
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub model: Model,
    pub warnings: Vec<CodecError>,
}

fn z_up_to_y_up(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.z, -v.y)
}

fn identity(v: Vec3) -> Vec3 {
    v
}

/// Assemble a model from a host scene.
pub fn export_scene(
    scene: &dyn SceneSource,
    config: &ExportConfig,
) -> Result<ExportOutcome, ExportError> {
    let transform: fn(Vec3) -> Vec3 = if config.z_up { z_up_to_y_up } else { identity };

    let mut skeleton = link_bones(scene.bones(), transform);
    let bone_count = skeleton.bones.len();
    let mut warnings = std::mem::take(&mut skeleton.warnings);

    let materials: Vec<_> = scene
        .materials()
        .iter()
        .map(|m| build_material(m, &config.template))
        .collect();
    let material_names: Vec<String> = materials.iter().map(|m| m.name.clone()).collect();

    let mut meshes = Vec::with_capacity(scene.meshes().len());
    let mut groups = Vec::with_capacity(scene.meshes().len());
    let mut bounding: Option<BoundingBox> = None;

    for (mesh_index, host) in scene.meshes().iter().enumerate() {
        let rotated;
        let host = if config.z_up {
            rotated = to_y_up(host);
            &rotated
        } else {
            host
        };

        let built = build_mesh(host, config.channels_for(&host.name), bone_count)?;

        let bone_index = match host.owner_bone.as_deref() {
            None => 0,
            Some(name) => skeleton.index_of(name).unwrap_or_else(|| {
                let error = CodecError::UnresolvedOwnerBone {
                    mesh: host.name.clone(),
                    bone: name.to_string(),
                };
                warn!("{}", error);
                warnings.push(error);
                0
            }),
        };
        groups.push(Group {
            bone_index: bone_index as u32,
            mesh_index: mesh_index as u32,
            bounding: built.bounds,
        });

        bounding = Some(match bounding {
            Some(total) => total.union(&built.bounds),
            None => built.bounds,
        });
        meshes.push(built.mesh);
    }

    let model = Model {
        bounding: bounding.unwrap_or_default(),
        texture_names: scene.texture_names().to_vec(),
        shader_names: material_names.clone(),
        material_names,
        materials,
        groups,
        meshes,
        bones: skeleton.bones,
        ..Default::default()
    };

    info!(
        materials = model.materials.len(),
        meshes = model.meshes.len(),
        bones = model.bones.len(),
        warnings = warnings.len(),
        "assembled model"
    );

    Ok(ExportOutcome { model, warnings })
}

/// Assemble and encode in one step.
pub fn export_to_bytes(
    scene: &dyn SceneSource,
    config: &ExportConfig,
) -> Result<(Vec<u8>, Vec<CodecError>), ExportError> {
    let outcome = export_scene(scene, config)?;
    let bytes = encode_model(&outcome.model)?;
    Ok((bytes, outcome.warnings))
}
