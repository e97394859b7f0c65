//! Owned GFBMDL document types.
//!
//! Every vector keeps file order: materials, meshes and bones are referenced by
//! index from elsewhere in the document.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::vertex::{MeshAttribute, VertexLayout};

/// Model schema revision understood by this codec.
pub const GFBMDL_VERSION: u32 = 0x1810_0920;

/// Axis-aligned bounding box (24 bytes, stored inline).
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
#[repr(C)]
pub struct BoundingBox {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.to_array(),
            max: max.to_array(),
        }
    }

    /// Smallest box containing every point; zero-sized at the origin when empty.
    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Self {
        let mut points = points.into_iter();
        let Some(first) = points.next() else {
            return Self::default();
        };
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Self::new(min, max)
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BoundingBox) -> Self {
        Self::new(
            Vec3::from(self.min).min(Vec3::from(other.min)),
            Vec3::from(self.max).max(Vec3::from(other.max)),
        )
    }
}

/// Three floats stored inline (12 bytes).
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
#[repr(C)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<Vec3> for Vector3 {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vector3> for Vec3 {
    fn from(v: Vector3) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

/// RGB color of three floats stored inline (12 bytes).
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
#[repr(C)]
pub struct ColorRgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl ColorRgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[f32; 3]> for ColorRgb {
    fn from(c: [f32; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

/// Root document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub version: u32,
    pub bounding: BoundingBox,
    pub texture_names: Vec<String>,
    pub shader_names: Vec<String>,
    pub unknown: Vec<UnknownEntry>,
    pub material_names: Vec<String>,
    pub materials: Vec<Material>,
    pub groups: Vec<Group>,
    pub meshes: Vec<Mesh>,
    pub bones: Vec<Bone>,
    pub collision_groups: Vec<CollisionGroup>,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            version: GFBMDL_VERSION,
            bounding: BoundingBox::default(),
            texture_names: Vec::new(),
            shader_names: Vec::new(),
            unknown: Vec::new(),
            material_names: Vec::new(),
            materials: Vec::new(),
            groups: Vec::new(),
            meshes: Vec::new(),
            bones: Vec::new(),
            collision_groups: Vec::new(),
        }
    }
}

/// Entry of the reserved root vector (slot 4). The tables carry no fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownEntry;

/// Texture wrap mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u32)]
pub enum WrapMode {
    #[default]
    Repeat = 0,
    Clamp = 1,
    Mirror = 2,
}

impl WrapMode {
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(WrapMode::Repeat),
            1 => Some(WrapMode::Clamp),
            2 => Some(WrapMode::Mirror),
            _ => None,
        }
    }
}

/// Sampler parameters of a texture map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TextureMapping {
    pub wrap_x: WrapMode,
    pub wrap_y: WrapMode,
    pub wrap_z: WrapMode,
    pub lod_bias: f32,
    /// Reserved fields `unknown1` and `unknown5..=unknown8`, kept verbatim.
    pub reserved: [i32; 5],
}

/// A material sampler bound to one entry of [`Model::texture_names`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextureMap {
    pub sampler: String,
    pub texture_index: i32,
    pub mapping: Option<TextureMapping>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatSwitch {
    pub name: String,
    pub value: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatFloat {
    pub name: String,
    pub value: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatInt {
    pub name: String,
    pub value: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatColor {
    pub name: String,
    pub color: ColorRgb,
}

/// Shader-independent render state shared by all materials of a shader.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialCommon {
    pub switches: Vec<MatSwitch>,
    pub values: Vec<MatInt>,
    pub colors: Vec<MatColor>,
}

/// Material parameters. The shader itself is opaque to the codec.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub shader_group: String,
    pub render_layer: i32,
    pub shader_index: i32,
    /// `parameter1..=parameter5`.
    pub parameters: [i32; 5],
    /// `unknown1`, `unknown2`, then `unknown3..=unknown7`, kept verbatim.
    pub reserved: [u8; 7],
    pub texture_maps: Vec<TextureMap>,
    pub switches: Vec<MatSwitch>,
    pub values: Vec<MatFloat>,
    pub colors: Vec<MatColor>,
    pub common: Option<MaterialCommon>,
}

/// Binds a renderable mesh to the bone that owns it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub bone_index: u32,
    pub mesh_index: u32,
    pub bounding: BoundingBox,
}

/// Flat triangle index list for one material.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshPolygon {
    pub material_index: u32,
    pub faces: Vec<u16>,
}

/// Attribute-described vertex buffer plus per-material index lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub polygons: Vec<MeshPolygon>,
    pub attributes: Vec<MeshAttribute>,
    pub data: Vec<u8>,
}

impl Mesh {
    /// Record layout described by the attribute list.
    pub fn layout(&self) -> Result<VertexLayout> {
        VertexLayout::new(&self.attributes)
    }

    /// Number of whole vertex records in `data`.
    pub fn vertex_count(&self) -> Result<usize> {
        self.layout()?.vertex_count(self.data.len())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoneRigidData {
    pub unknown1: u32,
}

/// Skeleton node. `parent` is an index into [`Model::bones`], `-1` for roots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    pub name: String,
    pub bone_type: u32,
    pub parent: i32,
    pub zero: u32,
    pub visible: bool,
    pub scale: Vector3,
    pub rotation: Vector3,
    pub translation: Vector3,
    pub radius_start: Option<Vector3>,
    pub radius_end: Option<Vector3>,
    pub rigid_check: Option<BoneRigidData>,
}

impl Default for Bone {
    fn default() -> Self {
        Self {
            name: String::new(),
            bone_type: 0,
            parent: -1,
            zero: 0,
            visible: false,
            scale: Vector3::ONE,
            rotation: Vector3::ZERO,
            translation: Vector3::ZERO,
            radius_start: None,
            radius_end: None,
            rigid_check: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollisionGroup {
    pub bone_index: u32,
    pub unknown1: u32,
    pub bone_children: Vec<u32>,
    pub bounding: Option<BoundingBox>,
}
