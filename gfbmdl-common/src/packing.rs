//! Vertex buffer packing utilities
//!
//! Converts between per-vertex f32 data and the raw, attribute-described byte
//! stream stored in a mesh:
//! - f32 → f32 / f16 (IEEE 754 half-float, round to nearest even)
//! - f32 → unorm8 (colors, bone weights)
//! - integer → u8 / u16 (bone ids)
//!
//! Records are written in attribute-list order with no padding between
//! attributes or records.

use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::vertex::{MeshAttribute, Semantic, VertexLayout};

// ============================================================================
// Basic Conversion Functions
// ============================================================================

/// Convert f32 to unsigned normalized 8-bit integer (unorm8)
///
/// Maps f32 range [0.0, 1.0] to u8 range [0, 255], rounding to nearest.
#[inline]
pub fn f32_to_unorm8(value: f32) -> u8 {
    let clamped = value.clamp(0.0, 1.0);
    (clamped * 255.0).round() as u8
}

#[inline]
pub fn unorm8_to_f32(value: u8) -> f32 {
    value as f32 / 255.0
}

/// Convert f32 to unsigned normalized 16-bit integer (unorm16)
///
/// Maps f32 range [0.0, 1.0] to u16 range [0, 65535], rounding to nearest.
#[inline]
pub fn f32_to_unorm16(value: f32) -> u16 {
    let clamped = value.clamp(0.0, 1.0);
    (clamped * 65535.0).round() as u16
}

#[inline]
pub fn unorm16_to_f32(value: u16) -> f32 {
    value as f32 / 65535.0
}

// ============================================================================
// Vertex
// ============================================================================

/// Unpacked vertex with every channel the format can carry.
///
/// Channels missing from a layout are skipped on pack and left at their
/// default on unpack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub binormal: Vec3,
    pub uvs: [Vec2; 4],
    pub colors: [Vec4; 4],
    pub bone_ids: [u16; 4],
    pub bone_weights: [f32; 4],
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            normal: Vec3::ZERO,
            binormal: Vec3::ZERO,
            uvs: [Vec2::ZERO; 4],
            colors: [Vec4::ONE; 4],
            bone_ids: [0; 4],
            bone_weights: [0.0; 4],
        }
    }
}

impl Vertex {
    /// Components of one attribute, padded to four.
    fn components(&self, semantic: Semantic) -> [f32; 4] {
        match semantic {
            Semantic::Position => self.position.extend(1.0).to_array(),
            Semantic::Normal => self.normal.extend(0.0).to_array(),
            Semantic::Binormal => self.binormal.extend(0.0).to_array(),
            Semantic::Uv(ch) => [self.uvs[ch].x, self.uvs[ch].y, 0.0, 0.0],
            Semantic::Color(ch) => self.colors[ch].to_array(),
            Semantic::BoneId => self.bone_ids.map(|id| id as f32),
            Semantic::BoneWeight => self.bone_weights,
        }
    }

    /// Store the first `count` components of one attribute.
    fn set_components(&mut self, semantic: Semantic, c: [f32; 4], count: usize) {
        match semantic {
            Semantic::Position => self.position = Vec3::new(c[0], c[1], c[2]),
            Semantic::Normal => self.normal = Vec3::new(c[0], c[1], c[2]),
            Semantic::Binormal => self.binormal = Vec3::new(c[0], c[1], c[2]),
            Semantic::Uv(ch) => self.uvs[ch] = Vec2::new(c[0], c[1]),
            Semantic::Color(ch) => {
                let mut color = Vec4::ONE.to_array();
                color[..count].copy_from_slice(&c[..count]);
                self.colors[ch] = Vec4::from_array(color);
            }
            Semantic::BoneId => self.bone_ids = c.map(|id| id.round() as u16),
            Semantic::BoneWeight => self.bone_weights = c,
        }
    }
}

// ============================================================================
// Full Vertex Packing
// ============================================================================

fn pack_attribute(vertex: &Vertex, attribute: &MeshAttribute, out: &mut [u8]) -> Result<()> {
    let components = vertex.components(attribute.vertex_type.semantic());
    let normalized = attribute.vertex_type.is_normalized();
    let width = attribute.format.width();
    for (i, chunk) in out.chunks_exact_mut(width).enumerate() {
        attribute.format.encode(components[i], normalized, chunk)?;
    }
    Ok(())
}

/// Pack vertices into a raw buffer of `vertices.len() * layout.stride()` bytes.
///
/// Fails with `ComponentOutOfRange` when a raw integer component (a bone id)
/// does not fit its format.
pub fn pack_vertices(layout: &VertexLayout, vertices: &[Vertex]) -> Result<Vec<u8>> {
    let stride = layout.stride();
    let mut packed = vec![0u8; vertices.len() * stride];
    if stride == 0 {
        return Ok(packed);
    }

    for (vertex, record) in vertices.iter().zip(packed.chunks_exact_mut(stride)) {
        for (offset, attribute) in layout.iter() {
            let end = offset + attribute.stride();
            pack_attribute(vertex, attribute, &mut record[offset..end])?;
        }
    }
    Ok(packed)
}

/// Unpack a raw buffer into vertices.
///
/// Fails with `TruncatedVertexBuffer` when `data` is not a whole number of
/// records.
pub fn unpack_vertices(layout: &VertexLayout, data: &[u8]) -> Result<Vec<Vertex>> {
    let count = layout.vertex_count(data.len())?;
    if count == 0 {
        return Ok(Vec::new());
    }

    let vertices = data
        .chunks_exact(layout.stride())
        .map(|record| {
            let mut vertex = Vertex::default();
            for (offset, attribute) in layout.iter() {
                let normalized = attribute.vertex_type.is_normalized();
                let width = attribute.format.width();
                let bytes = &record[offset..offset + attribute.stride()];

                let mut components = [0.0f32; 4];
                for (c, chunk) in components.iter_mut().zip(bytes.chunks_exact(width)) {
                    *c = attribute.format.decode(chunk, normalized);
                }
                vertex.set_components(
                    attribute.vertex_type.semantic(),
                    components,
                    attribute.count as usize,
                );
            }
            vertex
        })
        .collect();
    Ok(vertices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodecError;
    use crate::vertex::{BufferFormat, VertexChannels, VertexType};

    fn sample_vertex() -> Vertex {
        Vertex {
            position: Vec3::new(1.5, -2.25, 100.0),
            normal: Vec3::new(0.0, 1.0, 0.0),
            binormal: Vec3::new(1.0, 0.0, 0.0),
            uvs: [Vec2::new(0.25, 0.75), Vec2::ZERO, Vec2::ZERO, Vec2::ZERO],
            colors: [
                Vec4::new(1.0, 0.0, 0.0, 1.0),
                Vec4::new(0.0, 0.0, 1.0, 0.0),
                Vec4::ONE,
                Vec4::ONE,
            ],
            bone_ids: [3, 0, 0, 0],
            bone_weights: [1.0, 0.0, 0.0, 0.0],
        }
    }

    #[test]
    fn test_f32_to_unorm8_range() {
        assert_eq!(f32_to_unorm8(0.0), 0);
        assert_eq!(f32_to_unorm8(1.0), 255);
        assert_eq!(f32_to_unorm8(0.5), 128);
        assert_eq!(f32_to_unorm8(-1.0), 0);
        assert_eq!(f32_to_unorm8(2.0), 255);
    }

    #[test]
    fn test_unorm8_roundtrip_endpoints() {
        assert_eq!(unorm8_to_f32(f32_to_unorm8(1.0)), 1.0);
        assert_eq!(unorm8_to_f32(f32_to_unorm8(0.0)), 0.0);
    }

    #[test]
    fn test_f32_to_unorm16_range() {
        assert_eq!(f32_to_unorm16(0.0), 0);
        assert_eq!(f32_to_unorm16(1.0), 65535);
        assert_eq!(unorm16_to_f32(65535), 1.0);
    }

    #[test]
    fn test_packed_length() {
        let layout = VertexChannels::default().layout();
        let vertices = vec![sample_vertex(); 7];
        let packed = pack_vertices(&layout, &vertices).unwrap();
        assert_eq!(packed.len(), 7 * layout.stride());
    }

    #[test]
    fn test_color_packs_to_bytes() {
        let layout = VertexLayout::new(&[MeshAttribute::new(
            VertexType::Color1,
            BufferFormat::Byte,
            4,
        )])
        .unwrap();
        let packed = pack_vertices(&layout, &[sample_vertex()]).unwrap();
        assert_eq!(packed, vec![255, 0, 0, 255]);

        let unpacked = unpack_vertices(&layout, &packed).unwrap();
        assert_eq!(unpacked[0].colors[0], Vec4::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_default_layout_unpack() {
        let layout = VertexChannels::default().layout();
        let vertex = sample_vertex();
        let packed = pack_vertices(&layout, &[vertex, vertex]).unwrap();
        let unpacked = unpack_vertices(&layout, &packed).unwrap();

        assert_eq!(unpacked.len(), 2);
        let v = unpacked[1];
        // Position is f32 and values chosen exactly representable in f16.
        assert_eq!(v.position, vertex.position);
        assert_eq!(v.normal, vertex.normal);
        assert_eq!(v.binormal, vertex.binormal);
        assert_eq!(v.uvs[0], vertex.uvs[0]);
        assert_eq!(v.colors[0], vertex.colors[0]);
        assert_eq!(v.colors[1], vertex.colors[1]);
        assert_eq!(v.bone_ids, [3, 0, 0, 0]);
        assert_eq!(v.bone_weights, [1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_normal_w_is_zero() {
        let layout = VertexChannels::default().layout();
        let packed = pack_vertices(&layout, &[sample_vertex()]).unwrap();
        let normal_at = layout.offset_of(VertexType::Normal).unwrap();
        assert_eq!(&packed[normal_at + 6..normal_at + 8], &[0, 0]);
    }

    #[test]
    fn test_truncated_buffer() {
        let layout = VertexChannels::default().layout();
        let stride = layout.stride();
        let data = vec![0u8; stride * 3 + 1];
        assert_eq!(
            unpack_vertices(&layout, &data),
            Err(CodecError::TruncatedVertexBuffer {
                len: stride * 3 + 1,
                stride
            })
        );
    }

    #[test]
    fn test_short_bone_ids() {
        let layout = VertexLayout::new(&[MeshAttribute::new(
            VertexType::BoneId,
            BufferFormat::Short,
            4,
        )])
        .unwrap();
        let vertex = Vertex {
            bone_ids: [300, 1, 0, 2],
            ..Default::default()
        };
        let packed = pack_vertices(&layout, &[vertex]).unwrap();
        assert_eq!(packed, vec![44, 1, 1, 0, 0, 0, 2, 0]);
        assert_eq!(unpack_vertices(&layout, &packed).unwrap()[0].bone_ids, [300, 1, 0, 2]);
    }

    #[test]
    fn test_byte_bone_id_past_255_is_rejected() {
        let layout = VertexChannels::default().layout();
        let vertex = Vertex {
            bone_ids: [299, 0, 0, 0],
            ..sample_vertex()
        };
        assert!(matches!(
            pack_vertices(&layout, &[vertex]),
            Err(CodecError::ComponentOutOfRange { max: 255, .. })
        ));
    }

    #[test]
    fn test_missing_channels_keep_defaults() {
        let layout = VertexLayout::new(&[MeshAttribute::new(
            VertexType::Position,
            BufferFormat::Float,
            3,
        )])
        .unwrap();
        let packed = pack_vertices(&layout, &[sample_vertex()]).unwrap();
        assert_eq!(packed.len(), 12);
        let v = unpack_vertices(&layout, &packed).unwrap()[0];
        assert_eq!(v.colors, [Vec4::ONE; 4]);
        assert_eq!(v.uvs, [Vec2::ZERO; 4]);
    }
}
