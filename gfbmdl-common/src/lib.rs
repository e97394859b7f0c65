//! Shared codec for the GFBMDL model container
//!
//! This crate provides everything needed to read and write `.gfbmdl` files
//! without any knowledge of the host application that produced the geometry:
//! - `gfbmdl-export` (scene assembler, import view, CLI)
//!
//! # Modules
//!
//! - [`table`] - Offset-based table reader/writer driven by schema descriptors
//! - [`formats`] - Document types, slot schemas and model encode/decode
//! - [`vertex`] - Vertex attribute schema (semantics, formats, stride)
//! - [`packing`] - Vertex buffer packing/unpacking
//! - [`polygon`] - Face-index grouping by material and triangle reconstruction

pub mod error;
pub mod formats;
pub mod packing;
pub mod polygon;
pub mod table;
pub mod vertex;

pub use error::{CodecError, Result};

// Re-export commonly used packing items
pub use packing::{
    Vertex, f32_to_unorm8, f32_to_unorm16, pack_vertices, unorm8_to_f32, unorm16_to_f32,
    unpack_vertices,
};

// Re-export commonly used vertex schema items
pub use vertex::{BufferFormat, MeshAttribute, Semantic, VertexChannels, VertexLayout, VertexType};

// Re-export commonly used polygon items
pub use polygon::{Triangle, check_face_indices, group_by_material, triangles};

// Re-export commonly used format items
pub use formats::{
    Bone, BoneRigidData, BoundingBox, CollisionGroup, ColorRgb, DecodeMode, DecodeReport,
    ErrorScope, GFBMDL_VERSION, Group, MatColor, MatFloat, MatInt, MatSwitch, Material,
    MaterialCommon, Mesh, MeshPolygon, Model, ScopedError, TextureMap, TextureMapping,
    UnknownEntry, Vector3, WrapMode, decode_model, decode_model_with, encode_model,
};
