//! Host mesh → packed document mesh.

use gfbmdl_common::{
    BoundingBox, Mesh, Vertex, VertexChannels, VertexType, group_by_material, pack_vertices,
};
use glam::Vec3;
use tracing::debug;

use crate::adapter::HostMesh;
use crate::error::{ExportError, MAX_VERTICES};

/// A packed mesh and the bounds of its positions.
#[derive(Debug, Clone)]
pub struct BuiltMesh {
    pub mesh: Mesh,
    pub bounds: BoundingBox,
}

fn check_layer<T>(mesh: &HostMesh, layer: &str, data: &[T], optional: bool) -> Result<(), ExportError> {
    let expected = mesh.vertex_count();
    if data.len() == expected || (optional && data.is_empty()) {
        return Ok(());
    }
    Err(ExportError::LayerLength {
        mesh: mesh.name.clone(),
        layer: layer.to_string(),
        expected,
        found: data.len(),
    })
}

fn validate(host: &HostMesh, bone_count: usize, channels: &VertexChannels) -> Result<(), ExportError> {
    let count = host.vertex_count();
    if count > MAX_VERTICES {
        return Err(ExportError::TooManyVertices {
            mesh: host.name.clone(),
            count,
        });
    }

    check_layer(host, "normals", &host.normals, false)?;
    check_layer(host, "tangents", &host.tangents, true)?;
    check_layer(host, "skin", &host.skin, true)?;
    for (i, layer) in host.uv_layers.iter().enumerate() {
        check_layer(host, &format!("uv layer {}", i), layer, false)?;
    }
    for (i, layer) in host.color_layers.iter().enumerate() {
        check_layer(host, &format!("color layer {}", i), layer, false)?;
    }

    if channels.has_bones {
        let max = channels
            .layout()
            .attributes()
            .iter()
            .find(|a| a.vertex_type == VertexType::BoneId)
            .and_then(|a| a.format.max_integer())
            .unwrap_or(u16::MAX as u32) as usize;
        for (vertex, binding) in host.skin.iter().enumerate() {
            let Some(binding) = binding else { continue };
            if binding.bone_index >= bone_count {
                return Err(ExportError::BoneIndexOutOfRange {
                    mesh: host.name.clone(),
                    vertex,
                    bone: binding.bone_index,
                    bone_count,
                });
            }
            if binding.bone_index > max {
                return Err(ExportError::BoneIndexTooWide {
                    mesh: host.name.clone(),
                    vertex,
                    bone: binding.bone_index,
                    max,
                });
            }
        }
    }

    for (polygon, p) in host.polygons.iter().enumerate() {
        if let Some(&index) = p.vertices.iter().find(|&&v| v as usize >= count) {
            return Err(ExportError::PolygonIndex {
                mesh: host.name.clone(),
                polygon,
                index,
                vertex_count: count,
            });
        }
    }
    Ok(())
}

/// `sign * (normal x tangent)`, zero when the first UV layer is missing.
fn binormals(host: &HostMesh, channels: &VertexChannels) -> Vec<Vec3> {
    let has_tangent_space =
        channels.has_uv[0] && !host.uv_layers.is_empty() && !host.tangents.is_empty();
    if !has_tangent_space {
        return vec![Vec3::ZERO; host.vertex_count()];
    }
    host.normals
        .iter()
        .zip(&host.tangents)
        .map(|(n, t)| t.w * n.cross(t.truncate()))
        .collect()
}

/// Convert a host mesh to the attribute layout selected by `channels`.
///
/// Missing UV layers pack as zero and missing color layers as opaque white.
/// An unbound vertex gets bone id 0 with weight 0.
pub fn build_mesh(
    host: &HostMesh,
    channels: &VertexChannels,
    bone_count: usize,
) -> Result<BuiltMesh, ExportError> {
    validate(host, bone_count, channels)?;

    let binormals = binormals(host, channels);
    let vertices: Vec<Vertex> = (0..host.vertex_count())
        .map(|i| {
            let mut vertex = Vertex {
                position: host.positions[i],
                normal: host.normals[i],
                binormal: binormals[i],
                ..Default::default()
            };
            for (ch, layer) in host.uv_layers.iter().take(4).enumerate() {
                vertex.uvs[ch] = layer[i];
            }
            for (ch, layer) in host.color_layers.iter().take(4).enumerate() {
                vertex.colors[ch] = layer[i];
            }
            if let Some(Some(binding)) = host.skin.get(i) {
                vertex.bone_ids[0] = binding.bone_index as u16;
                vertex.bone_weights[0] = binding.weight;
            }
            vertex
        })
        .collect();

    let layout = channels.layout();
    let data = pack_vertices(&layout, &vertices)?;
    let polygons = group_by_material(
        host.polygons
            .iter()
            .map(|p| (p.material_index, p.vertices.as_slice())),
        host.material_slots,
    )?;

    debug!(
        mesh = %host.name,
        stride = layout.stride(),
        vertices = vertices.len(),
        groups = polygons.len(),
        "packed mesh"
    );

    Ok(BuiltMesh {
        mesh: Mesh {
            polygons,
            attributes: layout.attributes().to_vec(),
            data,
        },
        bounds: BoundingBox::from_points(host.positions.iter().copied()),
    })
}

/// Rotate a Z-up mesh into Y-up: `(x, y, z) -> (x, z, -y)`.
pub fn to_y_up(host: &HostMesh) -> HostMesh {
    let rotate = |v: Vec3| Vec3::new(v.x, v.z, -v.y);
    HostMesh {
        positions: host.positions.iter().copied().map(rotate).collect(),
        normals: host.normals.iter().copied().map(rotate).collect(),
        tangents: host
            .tangents
            .iter()
            .map(|t| rotate(t.truncate()).extend(t.w))
            .collect(),
        ..host.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{HostPolygon, SkinBinding};
    use gfbmdl_common::{VertexLayout, unpack_vertices};
    use glam::{Vec2, Vec4};

    fn quad() -> HostMesh {
        HostMesh {
            name: "Quad".to_string(),
            positions: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            normals: vec![Vec3::Z; 4],
            tangents: vec![Vec4::new(1.0, 0.0, 0.0, 1.0); 4],
            uv_layers: vec![vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 1.0),
            ]],
            color_layers: Vec::new(),
            skin: vec![
                Some(SkinBinding {
                    bone_index: 1,
                    weight: 1.0,
                }),
                None,
                None,
                None,
            ],
            polygons: vec![HostPolygon {
                vertices: vec![0, 1, 2, 3],
                material_index: 0,
            }],
            material_slots: 1,
            owner_bone: None,
        }
    }

    #[test]
    fn test_build_quad() {
        let channels = VertexChannels::default();
        let built = build_mesh(&quad(), &channels, 2).unwrap();

        let layout = VertexLayout::new(&built.mesh.attributes).unwrap();
        assert_eq!(built.mesh.data.len(), 4 * layout.stride());
        assert_eq!(built.mesh.polygons.len(), 1);
        assert_eq!(built.mesh.polygons[0].faces, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(built.bounds.min, [0.0, 0.0, 0.0]);
        assert_eq!(built.bounds.max, [1.0, 1.0, 0.0]);

        let vertices = unpack_vertices(&layout, &built.mesh.data).unwrap();
        // Z x X = Y
        assert_eq!(vertices[0].binormal, Vec3::Y);
        assert_eq!(vertices[2].uvs[0], Vec2::new(1.0, 1.0));
        assert_eq!(vertices[0].colors[0], Vec4::ONE);
        assert_eq!(vertices[0].bone_ids, [1, 0, 0, 0]);
        assert_eq!(vertices[1].bone_weights, [0.0; 4]);
    }

    #[test]
    fn test_binormal_zero_without_uvs() {
        let mut host = quad();
        host.uv_layers.clear();
        let built = build_mesh(&host, &VertexChannels::default(), 2).unwrap();
        let layout = VertexLayout::new(&built.mesh.attributes).unwrap();
        let vertices = unpack_vertices(&layout, &built.mesh.data).unwrap();
        assert_eq!(vertices[0].binormal, Vec3::ZERO);
        assert_eq!(vertices[0].uvs[0], Vec2::ZERO);
    }

    #[test]
    fn test_channels_select_attributes() {
        let channels = VertexChannels {
            use_binormals: false,
            has_uv: [true, true, false, false],
            has_color: [false; 4],
            has_bones: false,
        };
        let built = build_mesh(&quad(), &channels, 0).unwrap();
        let types: Vec<VertexType> = built.mesh.attributes.iter().map(|a| a.vertex_type).collect();
        assert_eq!(
            types,
            vec![VertexType::Position, VertexType::Normal, VertexType::Uv1, VertexType::Uv2]
        );
    }

    #[test]
    fn test_layer_length_mismatch() {
        let mut host = quad();
        host.normals.pop();
        assert!(matches!(
            build_mesh(&host, &VertexChannels::default(), 2),
            Err(ExportError::LayerLength { expected: 4, found: 3, .. })
        ));
    }

    #[test]
    fn test_bone_index_out_of_range() {
        assert!(matches!(
            build_mesh(&quad(), &VertexChannels::default(), 1),
            Err(ExportError::BoneIndexOutOfRange { bone: 1, bone_count: 1, .. })
        ));
    }

    #[test]
    fn test_bone_index_past_byte_range() {
        let mut host = quad();
        host.skin[0] = Some(SkinBinding {
            bone_index: 299,
            weight: 1.0,
        });
        assert!(matches!(
            build_mesh(&host, &VertexChannels::default(), 300),
            Err(ExportError::BoneIndexTooWide { vertex: 0, bone: 299, max: 255, .. })
        ));

        host.skin[0] = Some(SkinBinding {
            bone_index: 255,
            weight: 1.0,
        });
        let built = build_mesh(&host, &VertexChannels::default(), 300).unwrap();
        let layout = VertexLayout::new(&built.mesh.attributes).unwrap();
        let vertices = unpack_vertices(&layout, &built.mesh.data).unwrap();
        assert_eq!(vertices[0].bone_ids[0], 255);
    }

    #[test]
    fn test_polygon_index_out_of_range() {
        let mut host = quad();
        host.polygons[0].vertices.push(9);
        assert!(matches!(
            build_mesh(&host, &VertexChannels::default(), 2),
            Err(ExportError::PolygonIndex { index: 9, .. })
        ));
    }

    #[test]
    fn test_too_many_vertices() {
        let host = HostMesh {
            name: "Big".to_string(),
            positions: vec![Vec3::ZERO; MAX_VERTICES + 1],
            normals: vec![Vec3::Z; MAX_VERTICES + 1],
            ..Default::default()
        };
        assert!(matches!(
            build_mesh(&host, &VertexChannels::default(), 0),
            Err(ExportError::TooManyVertices { .. })
        ));
    }

    #[test]
    fn test_to_y_up() {
        let host = to_y_up(&quad());
        assert_eq!(host.positions[3], Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(host.normals[0], Vec3::Y);
        assert_eq!(host.tangents[0], Vec4::new(1.0, 0.0, 0.0, 1.0));
    }
}
