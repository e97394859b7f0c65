//! Bytes to model.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::model::*;
use super::schema;
use crate::error::{CodecError, Result};
use crate::table::{FieldDef, Table};
use crate::vertex::{MeshAttribute, VertexLayout};

/// How decode failures below the root are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecodeMode {
    /// Any error aborts the decode.
    #[default]
    Strict,
    /// A material, mesh or bone that fails to decode is replaced by its default
    /// and the error is recorded. Indices into the document stay stable.
    BestEffort,
}

/// Part of the document an error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorScope {
    Model,
    Material(usize),
    Mesh(usize),
    Bone(usize),
}

impl fmt::Display for ErrorScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorScope::Model => write!(f, "model"),
            ErrorScope::Material(i) => write!(f, "material {}", i),
            ErrorScope::Mesh(i) => write!(f, "mesh {}", i),
            ErrorScope::Bone(i) => write!(f, "bone {}", i),
        }
    }
}

/// An error recorded during a best-effort decode.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopedError {
    pub scope: ErrorScope,
    pub error: CodecError,
}

impl fmt::Display for ScopedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.scope, self.error)
    }
}

/// Decoded model plus everything that was skipped on the way.
#[derive(Debug, Clone)]
pub struct DecodeReport {
    pub model: Model,
    pub errors: Vec<ScopedError>,
}

impl DecodeReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Decode a GFBMDL buffer, failing on the first error.
pub fn decode_model(bytes: &[u8]) -> Result<Model> {
    decode_model_with(bytes, DecodeMode::Strict).map(|report| report.model)
}

/// Decode a GFBMDL buffer in the given mode.
///
/// Container errors at the root (bad root offset, unreadable name lists,
/// groups or collision groups) are always fatal. In best-effort mode an
/// unsupported version is recorded and decoding continues.
pub fn decode_model_with(bytes: &[u8], mode: DecodeMode) -> Result<DecodeReport> {
    use schema::model as f;

    let root = Table::root(bytes)?;
    let mut errors = Vec::new();

    let version = root.scalar(&f::VERSION, 0u32)?;
    if version != GFBMDL_VERSION {
        let error = CodecError::UnsupportedVersion {
            found: version,
            expected: GFBMDL_VERSION,
        };
        match mode {
            DecodeMode::Strict => return Err(error),
            DecodeMode::BestEffort => {
                warn!("{}", error);
                errors.push(ScopedError {
                    scope: ErrorScope::Model,
                    error,
                });
            }
        }
    }

    let mut materials = Vec::new();
    for (i, table) in root.tables(&f::MATERIALS)?.into_iter().enumerate() {
        let material = recover(mode, &mut errors, ErrorScope::Material(i), read_material(table))?;
        materials.push(material);
    }

    let mut meshes = Vec::new();
    for (i, table) in root.tables(&f::MESHES)?.into_iter().enumerate() {
        meshes.push(recover(mode, &mut errors, ErrorScope::Mesh(i), read_mesh(table))?);
    }

    let mut bones = Vec::new();
    for (i, table) in root.tables(&f::BONES)?.into_iter().enumerate() {
        bones.push(recover(mode, &mut errors, ErrorScope::Bone(i), read_bone(table))?);
    }

    let model = Model {
        version,
        bounding: root.structure(&f::BOUNDING)?.unwrap_or_default(),
        texture_names: root.strings(&f::TEXTURE_NAMES)?,
        shader_names: root.strings(&f::SHADER_NAMES)?,
        unknown: vec![UnknownEntry; root.tables(&f::UNKNOWN)?.len()],
        material_names: root.strings(&f::MATERIAL_NAMES)?,
        materials,
        groups: read_all(root, &f::GROUPS, read_group)?,
        meshes,
        bones,
        collision_groups: read_all(root, &f::COLLISION_GROUPS, read_collision_group)?,
    };

    debug!(
        materials = model.materials.len(),
        meshes = model.meshes.len(),
        bones = model.bones.len(),
        errors = errors.len(),
        "decoded model"
    );
    Ok(DecodeReport { model, errors })
}

/// Pass a result through, or in best-effort mode record the error and fall
/// back to the default value.
fn recover<T: Default>(
    mode: DecodeMode,
    errors: &mut Vec<ScopedError>,
    scope: ErrorScope,
    result: Result<T>,
) -> Result<T> {
    match (result, mode) {
        (Ok(value), _) => Ok(value),
        (Err(error), DecodeMode::Strict) => Err(error),
        (Err(error), DecodeMode::BestEffort) => {
            warn!("skipping {}: {}", scope, error);
            errors.push(ScopedError { scope, error });
            Ok(T::default())
        }
    }
}

fn read_all<T>(
    table: Table<'_>,
    field: &FieldDef,
    read: impl Fn(Table<'_>) -> Result<T>,
) -> Result<Vec<T>> {
    table.tables(field)?.into_iter().map(read).collect()
}

fn read_string(table: Table<'_>, field: &FieldDef) -> Result<String> {
    Ok(table.string(field)?.unwrap_or_default().to_owned())
}

// ============================================================================
// Materials
// ============================================================================

fn read_material(table: Table<'_>) -> Result<Material> {
    use schema::material as f;

    let mut parameters = [0i32; 5];
    for (value, field) in parameters.iter_mut().zip(&f::PARAMETERS) {
        *value = table.scalar(field, 0)?;
    }
    let mut reserved = [0u8; 7];
    for (value, field) in reserved.iter_mut().zip(&f::RESERVED) {
        *value = table.scalar(field, 0)?;
    }

    Ok(Material {
        name: read_string(table, &f::NAME)?,
        shader_group: read_string(table, &f::SHADER_GROUP)?,
        render_layer: table.scalar(&f::RENDER_LAYER, 0)?,
        shader_index: table.scalar(&f::SHADER_INDEX, 0)?,
        parameters,
        reserved,
        texture_maps: read_all(table, &f::TEXTURE_MAPS, read_texture_map)?,
        switches: read_all(table, &f::SWITCHES, read_switch)?,
        values: read_all(table, &f::VALUES, read_float)?,
        colors: read_all(table, &f::COLORS, read_color)?,
        common: table.table(&f::COMMON)?.map(read_material_common).transpose()?,
    })
}

fn read_texture_map(table: Table<'_>) -> Result<TextureMap> {
    use schema::texture_map as f;

    Ok(TextureMap {
        sampler: read_string(table, &f::SAMPLER)?,
        texture_index: table.scalar(&f::INDEX, 0)?,
        mapping: table.table(&f::PARAMS)?.map(read_texture_mapping).transpose()?,
    })
}

fn read_wrap(table: Table<'_>, field: &FieldDef) -> Result<WrapMode> {
    let raw = table.scalar(field, 0u32)?;
    WrapMode::from_raw(raw).ok_or(CodecError::malformed(table.position(), "unknown wrap mode"))
}

fn read_texture_mapping(table: Table<'_>) -> Result<TextureMapping> {
    use schema::texture_mapping as f;

    let mut reserved = [0i32; 5];
    for (value, field) in reserved.iter_mut().zip(&f::RESERVED) {
        *value = table.scalar(field, 0)?;
    }
    Ok(TextureMapping {
        wrap_x: read_wrap(table, &f::WRAP_X)?,
        wrap_y: read_wrap(table, &f::WRAP_Y)?,
        wrap_z: read_wrap(table, &f::WRAP_Z)?,
        lod_bias: table.scalar(&f::LOD_BIAS, 0.0)?,
        reserved,
    })
}

fn read_switch(table: Table<'_>) -> Result<MatSwitch> {
    use schema::mat_switch as f;

    Ok(MatSwitch {
        name: read_string(table, &f::NAME)?,
        value: table.scalar(&f::VALUE, false)?,
    })
}

fn read_float(table: Table<'_>) -> Result<MatFloat> {
    use schema::mat_float as f;

    Ok(MatFloat {
        name: read_string(table, &f::NAME)?,
        value: table.scalar(&f::VALUE, 0.0)?,
    })
}

fn read_int(table: Table<'_>) -> Result<MatInt> {
    use schema::mat_int as f;

    Ok(MatInt {
        name: read_string(table, &f::NAME)?,
        value: table.scalar(&f::VALUE, 0)?,
    })
}

fn read_color(table: Table<'_>) -> Result<MatColor> {
    use schema::mat_color as f;

    Ok(MatColor {
        name: read_string(table, &f::NAME)?,
        color: table.structure(&f::COLOR)?.unwrap_or_default(),
    })
}

fn read_material_common(table: Table<'_>) -> Result<MaterialCommon> {
    use schema::material_common as f;

    Ok(MaterialCommon {
        switches: read_all(table, &f::SWITCHES, read_switch)?,
        values: read_all(table, &f::VALUES, read_int)?,
        colors: read_all(table, &f::COLORS, read_color)?,
    })
}

// ============================================================================
// Geometry
// ============================================================================

fn read_group(table: Table<'_>) -> Result<Group> {
    use schema::group as f;

    Ok(Group {
        bone_index: table.scalar(&f::BONE_INDEX, 0)?,
        mesh_index: table.scalar(&f::MESH_INDEX, 0)?,
        bounding: table.structure(&f::BOUNDING)?.unwrap_or_default(),
    })
}

fn read_attribute(table: Table<'_>) -> Result<MeshAttribute> {
    use schema::mesh_attribute as f;

    MeshAttribute::from_raw(
        table.scalar(&f::VERTEX_TYPE, 0)?,
        table.scalar(&f::BUFFER_FORMAT, 0)?,
        table.scalar(&f::ELEMENT_COUNT, 0)?,
    )
}

fn read_polygon(table: Table<'_>) -> Result<MeshPolygon> {
    use schema::mesh_polygon as f;

    Ok(MeshPolygon {
        material_index: table.scalar(&f::MATERIAL_INDEX, 0)?,
        faces: table.scalars(&f::FACES)?,
    })
}

/// Decode a mesh and check that its data is a whole number of records.
fn read_mesh(table: Table<'_>) -> Result<Mesh> {
    use schema::mesh as f;

    let attributes = read_all(table, &f::ATTRIBUTES, read_attribute)?;
    let data = table.bytes(&f::DATA)?.to_vec();
    VertexLayout::new(&attributes)?.vertex_count(data.len())?;

    Ok(Mesh {
        polygons: read_all(table, &f::POLYGONS, read_polygon)?,
        attributes,
        data,
    })
}

// ============================================================================
// Skeleton
// ============================================================================

fn read_bone(table: Table<'_>) -> Result<Bone> {
    use schema::bone as f;

    let rigid_check = match table.table(&f::RIGID_CHECK)? {
        Some(rigid) => Some(BoneRigidData {
            unknown1: rigid.scalar(&schema::bone_rigid_data::UNKNOWN1, 0)?,
        }),
        None => None,
    };

    Ok(Bone {
        name: read_string(table, &f::NAME)?,
        bone_type: table.scalar(&f::BONE_TYPE, 0)?,
        parent: table.scalar(&f::PARENT, 0)?,
        zero: table.scalar(&f::ZERO, 0)?,
        visible: table.scalar(&f::VISIBLE, false)?,
        scale: table.structure(&f::SCALE)?.unwrap_or(Vector3::ONE),
        rotation: table.structure(&f::ROTATION)?.unwrap_or_default(),
        translation: table.structure(&f::TRANSLATION)?.unwrap_or_default(),
        radius_start: table.structure(&f::RADIUS_START)?,
        radius_end: table.structure(&f::RADIUS_END)?,
        rigid_check,
    })
}

fn read_collision_group(table: Table<'_>) -> Result<CollisionGroup> {
    use schema::collision_group as f;

    Ok(CollisionGroup {
        bone_index: table.scalar(&f::BONE_INDEX, 0)?,
        unknown1: table.scalar(&f::UNKNOWN1, 0)?,
        bone_children: table.scalars(&f::BONE_CHILDREN)?,
        bounding: table.structure(&f::BOUNDING)?,
    })
}
