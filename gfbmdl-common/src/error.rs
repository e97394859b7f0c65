//! Codec error type.

use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Errors produced while reading, writing, packing and unpacking GFBMDL data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    /// An offset, length or vtable entry points outside the buffer.
    #[error("malformed container at offset {offset}: {reason}")]
    MalformedContainer {
        /// Byte offset where the inconsistency was detected.
        offset: usize,
        /// What was wrong at that offset.
        reason: &'static str,
    },

    /// Raw vertex data is not a whole number of records.
    #[error("vertex buffer of {len} bytes is not a multiple of stride {stride}")]
    TruncatedVertexBuffer {
        /// Length of the raw buffer in bytes.
        len: usize,
        /// Record stride computed from the attribute list.
        stride: usize,
    },

    /// A bone refers to a parent that does not exist.
    #[error("bone '{bone}' has unresolved parent {parent}; treating it as a root")]
    UnresolvedBoneParent {
        /// Name of the bone whose parent could not be resolved.
        bone: String,
        /// The parent reference as given (index or name).
        parent: String,
    },

    /// The root version field does not match the supported schema revision.
    #[error("unsupported model version {found:#010x} (expected {expected:#010x})")]
    UnsupportedVersion {
        /// Version found in the file.
        found: u32,
        /// Version this codec understands.
        expected: u32,
    },

    /// A vertex attribute combination the packer does not understand.
    #[error(
        "unsupported vertex attribute (type {vertex_type}, format {format}, count {count}): {reason}"
    )]
    SchemaMismatch {
        /// Raw semantic id.
        vertex_type: u32,
        /// Raw buffer format id.
        format: u32,
        /// Component count.
        count: u32,
        /// Why the combination was rejected.
        reason: &'static str,
    },

    /// A raw integer component does not fit its buffer format.
    #[error("component {value} does not fit buffer format {format} (max {max})")]
    ComponentOutOfRange {
        /// Raw buffer format id.
        format: u32,
        /// The component as given.
        value: f32,
        /// Largest value the format holds.
        max: u32,
    },

    /// A mesh is tied to a bone the skeleton does not contain.
    #[error("mesh '{mesh}' names unknown owner bone '{bone}'; binding it to bone 0")]
    UnresolvedOwnerBone {
        /// Name of the mesh.
        mesh: String,
        /// The owner bone name as given.
        bone: String,
    },

    /// A face index points past the mesh's last vertex.
    #[error("face index {index} is past the last of {vertex_count} vertices")]
    FaceIndexOutOfRange {
        /// The offending face index.
        index: u16,
        /// Vertices the mesh actually holds.
        vertex_count: usize,
    },

    /// A face index does not fit the 16-bit index list.
    #[error("face index {index} does not fit a 16-bit index list")]
    FaceIndexOverflow {
        /// The offending vertex index.
        index: u32,
    },
}

impl CodecError {
    pub(crate) fn malformed(offset: usize, reason: &'static str) -> Self {
        CodecError::MalformedContainer { offset, reason }
    }
}
