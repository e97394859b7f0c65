//! Vertex attribute schema
//!
//! A mesh stores its vertex layout as an ordered list of [`MeshAttribute`]s.
//! Each attribute contributes `width(format) * count` bytes to the record; the
//! record stride is the sum over the list, in list order.

use half::f16;
use serde::{Deserialize, Serialize};

use crate::error::{CodecError, Result};
use crate::packing::{f32_to_unorm8, f32_to_unorm16, unorm8_to_f32, unorm16_to_f32};

// ============================================================================
// Semantics
// ============================================================================

/// Attribute semantic id as stored in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum VertexType {
    Position = 0,
    Normal = 1,
    Binormal = 2,
    Uv1 = 3,
    Uv2 = 4,
    Uv3 = 5,
    Uv4 = 6,
    Color1 = 7,
    Color2 = 8,
    Color3 = 9,
    Color4 = 10,
    BoneId = 11,
    BoneWeight = 12,
}

/// What an attribute means, with channel numbers unfolded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Semantic {
    Position,
    Normal,
    Binormal,
    /// UV channel `0..4`.
    Uv(usize),
    /// Color channel `0..4`.
    Color(usize),
    BoneId,
    BoneWeight,
}

impl VertexType {
    pub const UVS: [VertexType; 4] = [
        VertexType::Uv1,
        VertexType::Uv2,
        VertexType::Uv3,
        VertexType::Uv4,
    ];

    pub const COLORS: [VertexType; 4] = [
        VertexType::Color1,
        VertexType::Color2,
        VertexType::Color3,
        VertexType::Color4,
    ];

    pub fn from_raw(raw: u32) -> Option<Self> {
        Some(match raw {
            0 => VertexType::Position,
            1 => VertexType::Normal,
            2 => VertexType::Binormal,
            3 => VertexType::Uv1,
            4 => VertexType::Uv2,
            5 => VertexType::Uv3,
            6 => VertexType::Uv4,
            7 => VertexType::Color1,
            8 => VertexType::Color2,
            9 => VertexType::Color3,
            10 => VertexType::Color4,
            11 => VertexType::BoneId,
            12 => VertexType::BoneWeight,
            _ => return None,
        })
    }

    pub fn semantic(self) -> Semantic {
        match self {
            VertexType::Position => Semantic::Position,
            VertexType::Normal => Semantic::Normal,
            VertexType::Binormal => Semantic::Binormal,
            VertexType::Uv1 | VertexType::Uv2 | VertexType::Uv3 | VertexType::Uv4 => {
                Semantic::Uv(self as usize - VertexType::Uv1 as usize)
            }
            VertexType::Color1 | VertexType::Color2 | VertexType::Color3 | VertexType::Color4 => {
                Semantic::Color(self as usize - VertexType::Color1 as usize)
            }
            VertexType::BoneId => Semantic::BoneId,
            VertexType::BoneWeight => Semantic::BoneWeight,
        }
    }

    /// Whether integer formats of this semantic map onto `[0, 1]`.
    pub fn is_normalized(self) -> bool {
        matches!(self.semantic(), Semantic::Color(_))
    }
}

// ============================================================================
// Formats
// ============================================================================

/// Numeric encoding of one attribute component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum BufferFormat {
    Float = 0,
    HalfFloat = 1,
    Byte = 3,
    Short = 5,
    /// Unsigned byte read back as `byte / 255`.
    BytesAsFloat = 8,
}

impl BufferFormat {
    pub fn from_raw(raw: u32) -> Option<Self> {
        Some(match raw {
            0 => BufferFormat::Float,
            1 => BufferFormat::HalfFloat,
            3 => BufferFormat::Byte,
            5 => BufferFormat::Short,
            8 => BufferFormat::BytesAsFloat,
            _ => return None,
        })
    }

    /// Bytes per component.
    pub const fn width(self) -> usize {
        match self {
            BufferFormat::Float => 4,
            BufferFormat::HalfFloat => 2,
            BufferFormat::Byte => 1,
            BufferFormat::Short => 2,
            BufferFormat::BytesAsFloat => 1,
        }
    }

    /// Encode one component into `out[..self.width()]`.
    ///
    /// `normalized` turns `Byte` into unorm8 and `Short` into unorm16. Raw
    /// integer components are rounded and must fit the format's range.
    pub fn encode(self, value: f32, normalized: bool, out: &mut [u8]) -> Result<()> {
        match self {
            BufferFormat::Float => out[..4].copy_from_slice(&value.to_le_bytes()),
            BufferFormat::HalfFloat => {
                out[..2].copy_from_slice(&f16::from_f32(value).to_le_bytes())
            }
            BufferFormat::Byte if normalized => out[0] = f32_to_unorm8(value),
            BufferFormat::Byte => out[0] = self.integer(value)? as u8,
            BufferFormat::Short if normalized => {
                out[..2].copy_from_slice(&f32_to_unorm16(value).to_le_bytes())
            }
            BufferFormat::Short => {
                let raw = self.integer(value)? as u16;
                out[..2].copy_from_slice(&raw.to_le_bytes());
            }
            BufferFormat::BytesAsFloat => out[0] = f32_to_unorm8(value),
        }
        Ok(())
    }

    /// Largest raw integer a non-normalized `Byte` or `Short` component holds.
    pub const fn max_integer(self) -> Option<u32> {
        match self {
            BufferFormat::Byte => Some(u8::MAX as u32),
            BufferFormat::Short => Some(u16::MAX as u32),
            _ => None,
        }
    }

    fn integer(self, value: f32) -> Result<u32> {
        let max = self.max_integer().unwrap_or(0);
        let rounded = value.round();
        if !(0.0..=max as f32).contains(&rounded) {
            return Err(CodecError::ComponentOutOfRange {
                format: self as u32,
                value,
                max,
            });
        }
        Ok(rounded as u32)
    }

    /// Decode one component from `bytes[..self.width()]`.
    pub fn decode(self, bytes: &[u8], normalized: bool) -> f32 {
        match self {
            BufferFormat::Float => f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            BufferFormat::HalfFloat => f16::from_le_bytes([bytes[0], bytes[1]]).to_f32(),
            BufferFormat::Byte if normalized => unorm8_to_f32(bytes[0]),
            BufferFormat::Byte => bytes[0] as f32,
            BufferFormat::Short => {
                let raw = u16::from_le_bytes([bytes[0], bytes[1]]);
                if normalized {
                    unorm16_to_f32(raw)
                } else {
                    raw as f32
                }
            }
            BufferFormat::BytesAsFloat => unorm8_to_f32(bytes[0]),
        }
    }
}

// ============================================================================
// Attributes
// ============================================================================

/// One entry of a mesh's attribute list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeshAttribute {
    pub vertex_type: VertexType,
    pub format: BufferFormat,
    pub count: u32,
}

impl MeshAttribute {
    pub const fn new(vertex_type: VertexType, format: BufferFormat, count: u32) -> Self {
        Self {
            vertex_type,
            format,
            count,
        }
    }

    /// Build from raw file ids, rejecting unknown semantics and formats.
    pub fn from_raw(vertex_type: u32, format: u32, count: u32) -> Result<Self> {
        let mismatch = |reason| CodecError::SchemaMismatch {
            vertex_type,
            format,
            count,
            reason,
        };
        let semantic = VertexType::from_raw(vertex_type).ok_or_else(|| mismatch("unknown vertex type"))?;
        let buffer_format = BufferFormat::from_raw(format).ok_or_else(|| mismatch("unknown buffer format"))?;
        Ok(Self::new(semantic, buffer_format, count))
    }

    /// Bytes this attribute occupies in one vertex record.
    pub fn stride(&self) -> usize {
        self.format.width() * self.count as usize
    }

    fn mismatch(&self, reason: &'static str) -> CodecError {
        CodecError::SchemaMismatch {
            vertex_type: self.vertex_type as u32,
            format: self.format as u32,
            count: self.count,
            reason,
        }
    }
}

/// Which optional attributes an exported mesh carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VertexChannels {
    pub use_binormals: bool,
    pub has_uv: [bool; 4],
    pub has_color: [bool; 4],
    pub has_bones: bool,
}

impl Default for VertexChannels {
    fn default() -> Self {
        Self {
            use_binormals: true,
            has_uv: [true, false, false, false],
            has_color: [true, true, false, false],
            has_bones: true,
        }
    }
}

impl VertexChannels {
    /// Attribute list in canonical order.
    pub fn attributes(&self) -> Vec<MeshAttribute> {
        let mut attributes = vec![
            MeshAttribute::new(VertexType::Position, BufferFormat::Float, 3),
            MeshAttribute::new(VertexType::Normal, BufferFormat::HalfFloat, 4),
        ];
        if self.use_binormals {
            attributes.push(MeshAttribute::new(VertexType::Binormal, BufferFormat::HalfFloat, 4));
        }
        for (uv, _) in VertexType::UVS.iter().zip(self.has_uv).filter(|(_, on)| *on) {
            attributes.push(MeshAttribute::new(*uv, BufferFormat::Float, 2));
        }
        for (color, _) in VertexType::COLORS.iter().zip(self.has_color).filter(|(_, on)| *on) {
            attributes.push(MeshAttribute::new(*color, BufferFormat::Byte, 4));
        }
        if self.has_bones {
            attributes.push(MeshAttribute::new(VertexType::BoneId, BufferFormat::Byte, 4));
            attributes.push(MeshAttribute::new(VertexType::BoneWeight, BufferFormat::BytesAsFloat, 4));
        }
        attributes
    }

    pub fn layout(&self) -> VertexLayout {
        let attributes = self.attributes();
        let offsets = running_offsets(&attributes);
        let stride = attributes.iter().map(MeshAttribute::stride).sum();
        VertexLayout {
            attributes,
            offsets,
            stride,
        }
    }
}

fn running_offsets(attributes: &[MeshAttribute]) -> Vec<usize> {
    attributes
        .iter()
        .scan(0, |offset, attribute| {
            let at = *offset;
            *offset += attribute.stride();
            Some(at)
        })
        .collect()
}

// ============================================================================
// Layout
// ============================================================================

/// Validated attribute list with per-attribute byte offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    attributes: Vec<MeshAttribute>,
    offsets: Vec<usize>,
    stride: usize,
}

impl VertexLayout {
    /// Validate an attribute list.
    ///
    /// Every attribute needs 1 to 4 components, bone ids must be `Byte` or
    /// `Short`, and no semantic may appear twice.
    pub fn new(attributes: &[MeshAttribute]) -> Result<Self> {
        for (i, attribute) in attributes.iter().enumerate() {
            if !(1..=4).contains(&attribute.count) {
                return Err(attribute.mismatch("component count must be 1 to 4"));
            }
            if attribute.vertex_type == VertexType::BoneId
                && !matches!(attribute.format, BufferFormat::Byte | BufferFormat::Short)
            {
                return Err(attribute.mismatch("bone ids must be Byte or Short"));
            }
            if attributes[..i]
                .iter()
                .any(|a| a.vertex_type == attribute.vertex_type)
            {
                return Err(attribute.mismatch("duplicate vertex type"));
            }
        }

        Ok(Self {
            attributes: attributes.to_vec(),
            offsets: running_offsets(attributes),
            stride: attributes.iter().map(MeshAttribute::stride).sum(),
        })
    }

    /// Bytes per vertex record.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn attributes(&self) -> &[MeshAttribute] {
        &self.attributes
    }

    /// Attributes paired with their byte offset inside the record.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &MeshAttribute)> {
        self.offsets.iter().copied().zip(&self.attributes)
    }

    /// Byte offset of a semantic inside the record, if present.
    pub fn offset_of(&self, vertex_type: VertexType) -> Option<usize> {
        self.iter()
            .find(|(_, a)| a.vertex_type == vertex_type)
            .map(|(offset, _)| offset)
    }

    /// Number of records in a buffer of `len` bytes.
    pub fn vertex_count(&self, len: usize) -> Result<usize> {
        if self.stride == 0 {
            return match len {
                0 => Ok(0),
                _ => Err(CodecError::TruncatedVertexBuffer { len, stride: 0 }),
            };
        }
        if len % self.stride != 0 {
            return Err(CodecError::TruncatedVertexBuffer {
                len,
                stride: self.stride,
            });
        }
        Ok(len / self.stride)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_widths() {
        assert_eq!(BufferFormat::Float.width(), 4);
        assert_eq!(BufferFormat::HalfFloat.width(), 2);
        assert_eq!(BufferFormat::Byte.width(), 1);
        assert_eq!(BufferFormat::Short.width(), 2);
        assert_eq!(BufferFormat::BytesAsFloat.width(), 1);
    }

    #[test]
    fn test_raw_ids() {
        assert_eq!(VertexType::from_raw(12), Some(VertexType::BoneWeight));
        assert_eq!(VertexType::from_raw(13), None);
        assert_eq!(BufferFormat::from_raw(8), Some(BufferFormat::BytesAsFloat));
        assert_eq!(BufferFormat::from_raw(2), None);
        assert_eq!(VertexType::Color3 as u32, 9);
    }

    #[test]
    fn test_semantic_channels() {
        assert_eq!(VertexType::Uv3.semantic(), Semantic::Uv(2));
        assert_eq!(VertexType::Color1.semantic(), Semantic::Color(0));
        assert!(VertexType::Color4.is_normalized());
        assert!(!VertexType::BoneId.is_normalized());
    }

    #[test]
    fn test_default_channel_stride() {
        // 12 + 8 + 8 + 8 + 4 + 4 + 4 + 4
        let layout = VertexChannels::default().layout();
        assert_eq!(layout.stride(), 52);
        assert_eq!(layout.offset_of(VertexType::Position), Some(0));
        assert_eq!(layout.offset_of(VertexType::Binormal), Some(20));
        assert_eq!(layout.offset_of(VertexType::Uv1), Some(28));
        assert_eq!(layout.offset_of(VertexType::BoneWeight), Some(48));
        assert_eq!(layout.offset_of(VertexType::Uv2), None);
    }

    #[test]
    fn test_stride_is_sum_of_attributes() {
        let channels = VertexChannels {
            use_binormals: false,
            has_uv: [true, true, true, true],
            has_color: [false; 4],
            has_bones: false,
        };
        let attributes = channels.attributes();
        let expected: usize = attributes.iter().map(|a| a.format.width() * a.count as usize).sum();
        let layout = VertexLayout::new(&attributes).unwrap();
        assert_eq!(layout.stride(), expected);
        assert_eq!(layout.stride(), 12 + 8 + 4 * 8);
        assert_eq!(layout, channels.layout());
    }

    #[test]
    fn test_layout_rejects_bad_count() {
        let attributes = [MeshAttribute::new(VertexType::Position, BufferFormat::Float, 5)];
        assert!(matches!(
            VertexLayout::new(&attributes),
            Err(CodecError::SchemaMismatch { count: 5, .. })
        ));
    }

    #[test]
    fn test_layout_rejects_float_bone_ids() {
        let attributes = [MeshAttribute::new(VertexType::BoneId, BufferFormat::Float, 4)];
        assert!(VertexLayout::new(&attributes).is_err());
    }

    #[test]
    fn test_layout_rejects_duplicates() {
        let attributes = [
            MeshAttribute::new(VertexType::Position, BufferFormat::Float, 3),
            MeshAttribute::new(VertexType::Position, BufferFormat::HalfFloat, 3),
        ];
        assert!(VertexLayout::new(&attributes).is_err());
    }

    #[test]
    fn test_from_raw_rejects_unknown_format() {
        assert_eq!(
            MeshAttribute::from_raw(0, 2, 3),
            Err(CodecError::SchemaMismatch {
                vertex_type: 0,
                format: 2,
                count: 3,
                reason: "unknown buffer format"
            })
        );
    }

    #[test]
    fn test_vertex_count() {
        let layout = VertexChannels::default().layout();
        assert_eq!(layout.vertex_count(52 * 3).unwrap(), 3);
        assert_eq!(
            layout.vertex_count(52 * 3 + 1),
            Err(CodecError::TruncatedVertexBuffer { len: 157, stride: 52 })
        );
    }

    #[test]
    fn test_empty_layout() {
        let layout = VertexLayout::new(&[]).unwrap();
        assert_eq!(layout.vertex_count(0).unwrap(), 0);
        assert!(layout.vertex_count(4).is_err());
    }

    #[test]
    fn test_half_float_component() {
        let mut out = [0u8; 2];
        BufferFormat::HalfFloat.encode(-0.5, false, &mut out).unwrap();
        assert_eq!(BufferFormat::HalfFloat.decode(&out, false), -0.5);
    }

    #[test]
    fn test_byte_component_modes() {
        let mut out = [0u8; 1];
        BufferFormat::Byte.encode(7.4, false, &mut out).unwrap();
        assert_eq!(out[0], 7);
        BufferFormat::Byte.encode(255.2, false, &mut out).unwrap();
        assert_eq!(out[0], 255);
        BufferFormat::Byte.encode(0.5, true, &mut out).unwrap();
        assert_eq!(out[0], 128);
        BufferFormat::BytesAsFloat.encode(1.0, false, &mut out).unwrap();
        assert_eq!(BufferFormat::BytesAsFloat.decode(&out, false), 1.0);
    }

    #[test]
    fn test_short_component_modes() {
        let mut out = [0u8; 2];
        BufferFormat::Short.encode(513.0, false, &mut out).unwrap();
        assert_eq!(out, [1, 2]);
        BufferFormat::Short.encode(1.0, true, &mut out).unwrap();
        assert_eq!(out, [0xFF, 0xFF]);
        assert_eq!(BufferFormat::Short.decode(&out, true), 1.0);
    }

    #[test]
    fn test_integer_component_out_of_range() {
        let mut out = [0u8; 2];
        assert_eq!(
            BufferFormat::Byte.encode(299.0, false, &mut out),
            Err(CodecError::ComponentOutOfRange {
                format: 3,
                value: 299.0,
                max: 255
            })
        );
        assert!(BufferFormat::Byte.encode(-1.0, false, &mut out).is_err());
        assert!(BufferFormat::Short.encode(65536.0, false, &mut out).is_err());
        assert!(BufferFormat::Short.encode(f32::NAN, false, &mut out).is_err());

        // Normalized components still saturate.
        BufferFormat::Byte.encode(2.0, true, &mut out).unwrap();
        assert_eq!(out[0], 255);
    }
}
