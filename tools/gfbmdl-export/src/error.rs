//! Export error type.

use gfbmdl_common::CodecError;
use thiserror::Error;

/// Largest vertex count addressable by 16-bit face indices.
pub const MAX_VERTICES: usize = u16::MAX as usize + 1;

/// Errors raised while assembling a host scene into a model.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("mesh '{mesh}' has {count} vertices, at most {max} fit 16-bit indices", max = MAX_VERTICES)]
    TooManyVertices { mesh: String, count: usize },

    #[error("mesh '{mesh}': {layer} has {found} entries, expected {expected}")]
    LayerLength {
        mesh: String,
        layer: String,
        expected: usize,
        found: usize,
    },

    #[error("mesh '{mesh}': vertex {vertex} is bound to bone {bone}, but the skeleton has {bone_count} bones")]
    BoneIndexOutOfRange {
        mesh: String,
        vertex: usize,
        bone: usize,
        bone_count: usize,
    },

    #[error("mesh '{mesh}': vertex {vertex} is bound to bone {bone}, but its bone id format holds at most {max}")]
    BoneIndexTooWide {
        mesh: String,
        vertex: usize,
        bone: usize,
        max: usize,
    },

    #[error("mesh '{mesh}': polygon {polygon} refers to vertex {index} of {vertex_count}")]
    PolygonIndex {
        mesh: String,
        polygon: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error(transparent)]
    Codec(#[from] CodecError),
}
