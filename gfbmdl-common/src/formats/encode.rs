//! Model to bytes.
//!
//! Children are always finished before their parent table is opened; the
//! [`TableWriter`](crate::table::TableWriter) borrow makes any other order a
//! compile error. Every string and vector field is written, even when empty,
//! so readers can tell an empty collection from a missing one. Scalars equal
//! to their default are left out.

use tracing::debug;

use super::model::*;
use super::schema;
use crate::error::Result;
use crate::table::{Builder, Offset};

/// Serialize a model to a GFBMDL buffer.
///
/// Fails if a mesh's attribute list is invalid or its data is not a whole
/// number of vertex records.
pub fn encode_model(model: &Model) -> Result<Vec<u8>> {
    for (index, mesh) in model.meshes.iter().enumerate() {
        let count = mesh.vertex_count()?;
        debug!(mesh = index, vertices = count, polygons = mesh.polygons.len(), "encoding mesh");
    }

    let mut fbb = Builder::with_capacity(estimate_size(model));
    let root = write_model(&mut fbb, model);
    let bytes = fbb.finish(root);

    debug!(
        bytes = bytes.len(),
        materials = model.materials.len(),
        meshes = model.meshes.len(),
        bones = model.bones.len(),
        "encoded model"
    );
    Ok(bytes)
}

fn estimate_size(model: &Model) -> usize {
    let mesh_bytes: usize = model
        .meshes
        .iter()
        .map(|m| m.data.len() + m.polygons.iter().map(|p| p.faces.len() * 2).sum::<usize>())
        .sum();
    1024 + mesh_bytes + model.materials.len() * 2048 + model.bones.len() * 128
}

fn write_tables<T>(
    fbb: &mut Builder,
    items: &[T],
    mut write: impl FnMut(&mut Builder, &T) -> Offset,
) -> Offset {
    let offsets: Vec<Offset> = items.iter().map(|item| write(fbb, item)).collect();
    fbb.create_offset_vector(&offsets)
}

fn write_model(fbb: &mut Builder, model: &Model) -> Offset {
    use schema::model as f;

    let texture_names = fbb.create_strings(&model.texture_names);
    let shader_names = fbb.create_strings(&model.shader_names);
    let unknown = write_tables(fbb, &model.unknown, |fbb, _| fbb.start_table().finish());
    let material_names = fbb.create_strings(&model.material_names);
    let materials = write_tables(fbb, &model.materials, write_material);
    let groups = write_tables(fbb, &model.groups, write_group);
    let meshes = write_tables(fbb, &model.meshes, write_mesh);
    let bones = write_tables(fbb, &model.bones, write_bone);
    let collision_groups = write_tables(fbb, &model.collision_groups, write_collision_group);

    let mut table = fbb.start_table();
    table.add_scalar(&f::VERSION, model.version, 0);
    table.add_struct(&f::BOUNDING, &model.bounding);
    table.add_offset(&f::TEXTURE_NAMES, texture_names);
    table.add_offset(&f::SHADER_NAMES, shader_names);
    table.add_offset(&f::UNKNOWN, unknown);
    table.add_offset(&f::MATERIAL_NAMES, material_names);
    table.add_offset(&f::MATERIALS, materials);
    table.add_offset(&f::GROUPS, groups);
    table.add_offset(&f::MESHES, meshes);
    table.add_offset(&f::BONES, bones);
    table.add_offset(&f::COLLISION_GROUPS, collision_groups);
    table.finish()
}

// ============================================================================
// Materials
// ============================================================================

fn write_material(fbb: &mut Builder, material: &Material) -> Offset {
    use schema::material as f;

    let name = fbb.create_string(&material.name);
    let shader_group = fbb.create_string(&material.shader_group);
    let texture_maps = write_tables(fbb, &material.texture_maps, write_texture_map);
    let switches = write_tables(fbb, &material.switches, write_switch);
    let values = write_tables(fbb, &material.values, write_float);
    let colors = write_tables(fbb, &material.colors, write_color);
    let common = material
        .common
        .as_ref()
        .map(|common| write_material_common(fbb, common));

    let mut table = fbb.start_table();
    table.add_offset(&f::NAME, name);
    table.add_offset(&f::SHADER_GROUP, shader_group);
    table.add_scalar(&f::RENDER_LAYER, material.render_layer, 0);
    table.add_scalar(&f::SHADER_INDEX, material.shader_index, 0);
    for (field, &value) in f::PARAMETERS.iter().zip(&material.parameters) {
        table.add_scalar(field, value, 0);
    }
    for (field, &value) in f::RESERVED.iter().zip(&material.reserved) {
        table.add_scalar(field, value, 0);
    }
    table.add_offset(&f::TEXTURE_MAPS, texture_maps);
    table.add_offset(&f::SWITCHES, switches);
    table.add_offset(&f::VALUES, values);
    table.add_offset(&f::COLORS, colors);
    if let Some(common) = common {
        table.add_offset(&f::COMMON, common);
    }
    table.finish()
}

fn write_texture_map(fbb: &mut Builder, map: &TextureMap) -> Offset {
    use schema::texture_map as f;

    let sampler = fbb.create_string(&map.sampler);
    let params = map.mapping.as_ref().map(|m| write_texture_mapping(fbb, m));

    let mut table = fbb.start_table();
    table.add_offset(&f::SAMPLER, sampler);
    table.add_scalar(&f::INDEX, map.texture_index, 0);
    if let Some(params) = params {
        table.add_offset(&f::PARAMS, params);
    }
    table.finish()
}

fn write_texture_mapping(fbb: &mut Builder, mapping: &TextureMapping) -> Offset {
    use schema::texture_mapping as f;

    let mut table = fbb.start_table();
    table.add_scalar(&f::WRAP_X, mapping.wrap_x as u32, 0);
    table.add_scalar(&f::WRAP_Y, mapping.wrap_y as u32, 0);
    table.add_scalar(&f::WRAP_Z, mapping.wrap_z as u32, 0);
    table.add_scalar(&f::LOD_BIAS, mapping.lod_bias, 0.0);
    for (field, &value) in f::RESERVED.iter().zip(&mapping.reserved) {
        table.add_scalar(field, value, 0);
    }
    table.finish()
}

fn write_switch(fbb: &mut Builder, switch: &MatSwitch) -> Offset {
    use schema::mat_switch as f;

    let name = fbb.create_string(&switch.name);
    let mut table = fbb.start_table();
    table.add_offset(&f::NAME, name);
    table.add_scalar(&f::VALUE, switch.value, false);
    table.finish()
}

fn write_float(fbb: &mut Builder, value: &MatFloat) -> Offset {
    use schema::mat_float as f;

    let name = fbb.create_string(&value.name);
    let mut table = fbb.start_table();
    table.add_offset(&f::NAME, name);
    table.add_scalar(&f::VALUE, value.value, 0.0);
    table.finish()
}

fn write_int(fbb: &mut Builder, value: &MatInt) -> Offset {
    use schema::mat_int as f;

    let name = fbb.create_string(&value.name);
    let mut table = fbb.start_table();
    table.add_offset(&f::NAME, name);
    table.add_scalar(&f::VALUE, value.value, 0);
    table.finish()
}

fn write_color(fbb: &mut Builder, color: &MatColor) -> Offset {
    use schema::mat_color as f;

    let name = fbb.create_string(&color.name);
    let mut table = fbb.start_table();
    table.add_offset(&f::NAME, name);
    table.add_struct(&f::COLOR, &color.color);
    table.finish()
}

fn write_material_common(fbb: &mut Builder, common: &MaterialCommon) -> Offset {
    use schema::material_common as f;

    let switches = write_tables(fbb, &common.switches, write_switch);
    let values = write_tables(fbb, &common.values, write_int);
    let colors = write_tables(fbb, &common.colors, write_color);

    let mut table = fbb.start_table();
    table.add_offset(&f::SWITCHES, switches);
    table.add_offset(&f::VALUES, values);
    table.add_offset(&f::COLORS, colors);
    table.finish()
}

// ============================================================================
// Geometry
// ============================================================================

fn write_group(fbb: &mut Builder, group: &Group) -> Offset {
    use schema::group as f;

    let mut table = fbb.start_table();
    table.add_scalar(&f::BONE_INDEX, group.bone_index, 0);
    table.add_scalar(&f::MESH_INDEX, group.mesh_index, 0);
    table.add_struct(&f::BOUNDING, &group.bounding);
    table.finish()
}

fn write_mesh(fbb: &mut Builder, mesh: &Mesh) -> Offset {
    use schema::mesh as f;

    let polygons = write_tables(fbb, &mesh.polygons, write_polygon);
    let attributes = write_tables(fbb, &mesh.attributes, |fbb, attribute| {
        use schema::mesh_attribute as a;

        let mut table = fbb.start_table();
        table.add_scalar(&a::VERTEX_TYPE, attribute.vertex_type as u32, 0);
        table.add_scalar(&a::BUFFER_FORMAT, attribute.format as u32, 0);
        table.add_scalar(&a::ELEMENT_COUNT, attribute.count, 0);
        table.finish()
    });
    let data = fbb.create_byte_vector(&mesh.data);

    let mut table = fbb.start_table();
    table.add_offset(&f::POLYGONS, polygons);
    table.add_offset(&f::ATTRIBUTES, attributes);
    table.add_offset(&f::DATA, data);
    table.finish()
}

fn write_polygon(fbb: &mut Builder, polygon: &MeshPolygon) -> Offset {
    use schema::mesh_polygon as f;

    let faces = fbb.create_scalar_vector(&polygon.faces);
    let mut table = fbb.start_table();
    table.add_scalar(&f::MATERIAL_INDEX, polygon.material_index, 0);
    table.add_offset(&f::FACES, faces);
    table.finish()
}

// ============================================================================
// Skeleton
// ============================================================================

fn write_bone(fbb: &mut Builder, bone: &Bone) -> Offset {
    use schema::bone as f;

    let name = fbb.create_string(&bone.name);
    let rigid_check = bone.rigid_check.map(|rigid| {
        let mut table = fbb.start_table();
        table.add_scalar(&schema::bone_rigid_data::UNKNOWN1, rigid.unknown1, 0);
        table.finish()
    });

    let mut table = fbb.start_table();
    table.add_offset(&f::NAME, name);
    table.add_scalar(&f::BONE_TYPE, bone.bone_type, 0);
    table.add_scalar(&f::PARENT, bone.parent, 0);
    table.add_scalar(&f::ZERO, bone.zero, 0);
    table.add_scalar(&f::VISIBLE, bone.visible, false);
    table.add_struct(&f::SCALE, &bone.scale);
    table.add_struct(&f::ROTATION, &bone.rotation);
    table.add_struct(&f::TRANSLATION, &bone.translation);
    if let Some(radius) = &bone.radius_start {
        table.add_struct(&f::RADIUS_START, radius);
    }
    if let Some(radius) = &bone.radius_end {
        table.add_struct(&f::RADIUS_END, radius);
    }
    if let Some(rigid_check) = rigid_check {
        table.add_offset(&f::RIGID_CHECK, rigid_check);
    }
    table.finish()
}

fn write_collision_group(fbb: &mut Builder, group: &CollisionGroup) -> Offset {
    use schema::collision_group as f;

    let children = fbb.create_scalar_vector(&group.bone_children);
    let mut table = fbb.start_table();
    table.add_scalar(&f::BONE_INDEX, group.bone_index, 0);
    table.add_scalar(&f::UNKNOWN1, group.unknown1, 0);
    table.add_offset(&f::BONE_CHILDREN, children);
    if let Some(bounding) = &group.bounding {
        table.add_struct(&f::BOUNDING, bounding);
    }
    table.finish()
}

