//! Slot layout of every GFBMDL table type.
//!
//! One module per table type, each with a `FieldDef` per field and a `SCHEMA`
//! listing them. [`encode`](super::encode) and [`decode`](super::decode) only
//! ever address fields through these constants.

use crate::table::{FieldDef, ScalarType, TableSchema};

use super::model::{BoundingBox, ColorRgb, Vector3};

const BOUNDS: usize = std::mem::size_of::<BoundingBox>();
const VEC3: usize = std::mem::size_of::<Vector3>();
const RGB: usize = std::mem::size_of::<ColorRgb>();

pub mod model {
    use super::*;

    pub const VERSION: FieldDef = FieldDef::scalar("version", 0, ScalarType::U32);
    pub const BOUNDING: FieldDef = FieldDef::structure("bounding", 1, BOUNDS);
    pub const TEXTURE_NAMES: FieldDef = FieldDef::strings("texture_names", 2);
    pub const SHADER_NAMES: FieldDef = FieldDef::strings("shader_names", 3);
    pub const UNKNOWN: FieldDef = FieldDef::tables("unknown", 4);
    pub const MATERIAL_NAMES: FieldDef = FieldDef::strings("material_names", 5);
    pub const MATERIALS: FieldDef = FieldDef::tables("materials", 6);
    pub const GROUPS: FieldDef = FieldDef::tables("groups", 7);
    pub const MESHES: FieldDef = FieldDef::tables("meshes", 8);
    pub const BONES: FieldDef = FieldDef::tables("bones", 9);
    pub const COLLISION_GROUPS: FieldDef = FieldDef::tables("collision_groups", 10);

    pub const SCHEMA: TableSchema = TableSchema::new(
        "Model",
        &[
            VERSION,
            BOUNDING,
            TEXTURE_NAMES,
            SHADER_NAMES,
            UNKNOWN,
            MATERIAL_NAMES,
            MATERIALS,
            GROUPS,
            MESHES,
            BONES,
            COLLISION_GROUPS,
        ],
    );
}

pub mod unknown {
    use super::*;

    pub const SCHEMA: TableSchema = TableSchema::new("UnknownEntry", &[]);
}

pub mod material {
    use super::*;

    pub const NAME: FieldDef = FieldDef::string("name", 0);
    pub const SHADER_GROUP: FieldDef = FieldDef::string("shader_group", 1);
    pub const RENDER_LAYER: FieldDef = FieldDef::scalar("render_layer", 2, ScalarType::I32);
    pub const UNKNOWN1: FieldDef = FieldDef::scalar("unknown1", 3, ScalarType::U8);
    pub const UNKNOWN2: FieldDef = FieldDef::scalar("unknown2", 4, ScalarType::U8);
    pub const PARAMETER1: FieldDef = FieldDef::scalar("parameter1", 5, ScalarType::I32);
    pub const PARAMETER2: FieldDef = FieldDef::scalar("parameter2", 6, ScalarType::I32);
    pub const PARAMETER3: FieldDef = FieldDef::scalar("parameter3", 7, ScalarType::I32);
    pub const SHADER_INDEX: FieldDef = FieldDef::scalar("shader_index", 8, ScalarType::I32);
    pub const PARAMETER4: FieldDef = FieldDef::scalar("parameter4", 9, ScalarType::I32);
    pub const PARAMETER5: FieldDef = FieldDef::scalar("parameter5", 10, ScalarType::I32);
    pub const TEXTURE_MAPS: FieldDef = FieldDef::tables("texture_maps", 11);
    pub const SWITCHES: FieldDef = FieldDef::tables("switches", 12);
    pub const VALUES: FieldDef = FieldDef::tables("values", 13);
    pub const COLORS: FieldDef = FieldDef::tables("colors", 14);
    pub const UNKNOWN3: FieldDef = FieldDef::scalar("unknown3", 15, ScalarType::U8);
    pub const UNKNOWN4: FieldDef = FieldDef::scalar("unknown4", 16, ScalarType::U8);
    pub const UNKNOWN5: FieldDef = FieldDef::scalar("unknown5", 17, ScalarType::U8);
    pub const UNKNOWN6: FieldDef = FieldDef::scalar("unknown6", 18, ScalarType::U8);
    pub const UNKNOWN7: FieldDef = FieldDef::scalar("unknown7", 19, ScalarType::U8);
    pub const COMMON: FieldDef = FieldDef::table("common", 20);

    /// `parameter1..=parameter5` in [`Material::parameters`](super::super::Material) order.
    pub const PARAMETERS: [FieldDef; 5] = [PARAMETER1, PARAMETER2, PARAMETER3, PARAMETER4, PARAMETER5];

    /// Reserved byte fields in [`Material::reserved`](super::super::Material) order.
    pub const RESERVED: [FieldDef; 7] = [UNKNOWN1, UNKNOWN2, UNKNOWN3, UNKNOWN4, UNKNOWN5, UNKNOWN6, UNKNOWN7];

    pub const SCHEMA: TableSchema = TableSchema::new(
        "Material",
        &[
            NAME,
            SHADER_GROUP,
            RENDER_LAYER,
            UNKNOWN1,
            UNKNOWN2,
            PARAMETER1,
            PARAMETER2,
            PARAMETER3,
            SHADER_INDEX,
            PARAMETER4,
            PARAMETER5,
            TEXTURE_MAPS,
            SWITCHES,
            VALUES,
            COLORS,
            UNKNOWN3,
            UNKNOWN4,
            UNKNOWN5,
            UNKNOWN6,
            UNKNOWN7,
            COMMON,
        ],
    );
}

pub mod texture_map {
    use super::*;

    pub const SAMPLER: FieldDef = FieldDef::string("sampler", 0);
    pub const INDEX: FieldDef = FieldDef::scalar("index", 1, ScalarType::I32);
    pub const PARAMS: FieldDef = FieldDef::table("params", 2);

    pub const SCHEMA: TableSchema = TableSchema::new("TextureMap", &[SAMPLER, INDEX, PARAMS]);
}

pub mod texture_mapping {
    use super::*;

    pub const UNKNOWN1: FieldDef = FieldDef::scalar("unknown1", 0, ScalarType::I32);
    pub const WRAP_X: FieldDef = FieldDef::scalar("wrap_x", 1, ScalarType::U32);
    pub const WRAP_Y: FieldDef = FieldDef::scalar("wrap_y", 2, ScalarType::U32);
    pub const WRAP_Z: FieldDef = FieldDef::scalar("wrap_z", 3, ScalarType::U32);
    pub const UNKNOWN5: FieldDef = FieldDef::scalar("unknown5", 4, ScalarType::I32);
    pub const UNKNOWN6: FieldDef = FieldDef::scalar("unknown6", 5, ScalarType::I32);
    pub const UNKNOWN7: FieldDef = FieldDef::scalar("unknown7", 6, ScalarType::I32);
    pub const UNKNOWN8: FieldDef = FieldDef::scalar("unknown8", 7, ScalarType::I32);
    pub const LOD_BIAS: FieldDef = FieldDef::scalar("lod_bias", 8, ScalarType::F32);

    /// Reserved fields in [`TextureMapping::reserved`](super::super::TextureMapping) order.
    pub const RESERVED: [FieldDef; 5] = [UNKNOWN1, UNKNOWN5, UNKNOWN6, UNKNOWN7, UNKNOWN8];

    pub const SCHEMA: TableSchema = TableSchema::new(
        "TextureMapping",
        &[
            UNKNOWN1, WRAP_X, WRAP_Y, WRAP_Z, UNKNOWN5, UNKNOWN6, UNKNOWN7, UNKNOWN8, LOD_BIAS,
        ],
    );
}

pub mod mat_switch {
    use super::*;

    pub const NAME: FieldDef = FieldDef::string("name", 0);
    pub const VALUE: FieldDef = FieldDef::scalar("value", 1, ScalarType::Bool);

    pub const SCHEMA: TableSchema = TableSchema::new("MatSwitch", &[NAME, VALUE]);
}

pub mod mat_float {
    use super::*;

    pub const NAME: FieldDef = FieldDef::string("name", 0);
    pub const VALUE: FieldDef = FieldDef::scalar("value", 1, ScalarType::F32);

    pub const SCHEMA: TableSchema = TableSchema::new("MatFloat", &[NAME, VALUE]);
}

pub mod mat_int {
    use super::*;

    pub const NAME: FieldDef = FieldDef::string("name", 0);
    pub const VALUE: FieldDef = FieldDef::scalar("value", 1, ScalarType::I32);

    pub const SCHEMA: TableSchema = TableSchema::new("MatInt", &[NAME, VALUE]);
}

pub mod mat_color {
    use super::*;

    pub const NAME: FieldDef = FieldDef::string("name", 0);
    pub const COLOR: FieldDef = FieldDef::structure("color", 1, RGB);

    pub const SCHEMA: TableSchema = TableSchema::new("MatColor", &[NAME, COLOR]);
}

pub mod material_common {
    use super::*;

    pub const SWITCHES: FieldDef = FieldDef::tables("switches", 0);
    pub const VALUES: FieldDef = FieldDef::tables("values", 1);
    pub const COLORS: FieldDef = FieldDef::tables("colors", 2);

    pub const SCHEMA: TableSchema = TableSchema::new("MaterialCommon", &[SWITCHES, VALUES, COLORS]);
}

pub mod group {
    use super::*;

    pub const BONE_INDEX: FieldDef = FieldDef::scalar("bone_index", 0, ScalarType::U32);
    pub const MESH_INDEX: FieldDef = FieldDef::scalar("mesh_index", 1, ScalarType::U32);
    pub const BOUNDING: FieldDef = FieldDef::structure("bounding", 2, BOUNDS);

    pub const SCHEMA: TableSchema = TableSchema::new("Group", &[BONE_INDEX, MESH_INDEX, BOUNDING]);
}

pub mod mesh {
    use super::*;

    pub const POLYGONS: FieldDef = FieldDef::tables("polygons", 0);
    pub const ATTRIBUTES: FieldDef = FieldDef::tables("attributes", 1);
    pub const DATA: FieldDef = FieldDef::scalars("data", 2, ScalarType::U8);

    pub const SCHEMA: TableSchema = TableSchema::new("Mesh", &[POLYGONS, ATTRIBUTES, DATA]);
}

pub mod mesh_polygon {
    use super::*;

    pub const MATERIAL_INDEX: FieldDef = FieldDef::scalar("material_index", 0, ScalarType::U32);
    pub const FACES: FieldDef = FieldDef::scalars("faces", 1, ScalarType::U16);

    pub const SCHEMA: TableSchema = TableSchema::new("MeshPolygon", &[MATERIAL_INDEX, FACES]);
}

pub mod mesh_attribute {
    use super::*;

    pub const VERTEX_TYPE: FieldDef = FieldDef::scalar("vertex_type", 0, ScalarType::U32);
    pub const BUFFER_FORMAT: FieldDef = FieldDef::scalar("buffer_format", 1, ScalarType::U32);
    pub const ELEMENT_COUNT: FieldDef = FieldDef::scalar("element_count", 2, ScalarType::U32);

    pub const SCHEMA: TableSchema =
        TableSchema::new("MeshAttribute", &[VERTEX_TYPE, BUFFER_FORMAT, ELEMENT_COUNT]);
}

pub mod bone {
    use super::*;

    pub const NAME: FieldDef = FieldDef::string("name", 0);
    pub const BONE_TYPE: FieldDef = FieldDef::scalar("bone_type", 1, ScalarType::U32);
    pub const PARENT: FieldDef = FieldDef::scalar("parent", 2, ScalarType::I32);
    pub const ZERO: FieldDef = FieldDef::scalar("zero", 3, ScalarType::U32);
    pub const VISIBLE: FieldDef = FieldDef::scalar("visible", 4, ScalarType::Bool);
    pub const SCALE: FieldDef = FieldDef::structure("scale", 5, VEC3);
    pub const ROTATION: FieldDef = FieldDef::structure("rotation", 6, VEC3);
    pub const TRANSLATION: FieldDef = FieldDef::structure("translation", 7, VEC3);
    pub const RADIUS_START: FieldDef = FieldDef::structure("radius_start", 8, VEC3);
    pub const RADIUS_END: FieldDef = FieldDef::structure("radius_end", 9, VEC3);
    pub const RIGID_CHECK: FieldDef = FieldDef::table("rigid_check", 10);

    pub const SCHEMA: TableSchema = TableSchema::new(
        "Bone",
        &[
            NAME,
            BONE_TYPE,
            PARENT,
            ZERO,
            VISIBLE,
            SCALE,
            ROTATION,
            TRANSLATION,
            RADIUS_START,
            RADIUS_END,
            RIGID_CHECK,
        ],
    );
}

pub mod bone_rigid_data {
    use super::*;

    pub const UNKNOWN1: FieldDef = FieldDef::scalar("unknown1", 0, ScalarType::U32);

    pub const SCHEMA: TableSchema = TableSchema::new("BoneRigidData", &[UNKNOWN1]);
}

pub mod collision_group {
    use super::*;

    pub const BONE_INDEX: FieldDef = FieldDef::scalar("bone_index", 0, ScalarType::U32);
    pub const UNKNOWN1: FieldDef = FieldDef::scalar("unknown1", 1, ScalarType::U32);
    pub const BONE_CHILDREN: FieldDef = FieldDef::scalars("bone_children", 2, ScalarType::U32);
    pub const BOUNDING: FieldDef = FieldDef::structure("bounding", 3, BOUNDS);

    pub const SCHEMA: TableSchema = TableSchema::new(
        "CollisionGroup",
        &[BONE_INDEX, UNKNOWN1, BONE_CHILDREN, BOUNDING],
    );
}

/// Every table type of the format, root first.
pub const ALL_SCHEMAS: &[TableSchema] = &[
    model::SCHEMA,
    unknown::SCHEMA,
    material::SCHEMA,
    texture_map::SCHEMA,
    texture_mapping::SCHEMA,
    mat_switch::SCHEMA,
    mat_float::SCHEMA,
    mat_int::SCHEMA,
    mat_color::SCHEMA,
    material_common::SCHEMA,
    group::SCHEMA,
    mesh::SCHEMA,
    mesh_polygon::SCHEMA,
    mesh_attribute::SCHEMA,
    bone::SCHEMA,
    bone_rigid_data::SCHEMA,
    collision_group::SCHEMA,
];

/// Look up a table type by name.
pub fn find_schema(name: &str) -> Option<&'static TableSchema> {
    ALL_SCHEMAS.iter().find(|s| s.name.eq_ignore_ascii_case(name))
}
