//! Face-index grouping by material.
//!
//! A mesh stores one [`MeshPolygon`] per material slot, each holding a flat
//! list of triangle indices.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CodecError, Result};
use crate::formats::MeshPolygon;

/// One triangle tagged with the material of its polygon group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triangle {
    pub indices: [u16; 3],
    pub material_index: u32,
}

/// Rebuild triangles three indices at a time.
///
/// Trailing indices that do not form a whole triangle are ignored.
pub fn triangles(polygons: &[MeshPolygon]) -> Vec<Triangle> {
    let mut out = Vec::new();
    for polygon in polygons {
        let chunks = polygon.faces.chunks_exact(3);
        if !chunks.remainder().is_empty() {
            warn!(
                material = polygon.material_index,
                extra = chunks.remainder().len(),
                "face list is not a multiple of 3, ignoring trailing indices"
            );
        }
        out.extend(chunks.map(|f| Triangle {
            indices: [f[0], f[1], f[2]],
            material_index: polygon.material_index,
        }));
    }
    out
}

/// Check that every face index addresses one of `vertex_count` vertices.
pub fn check_face_indices(polygons: &[MeshPolygon], vertex_count: usize) -> Result<()> {
    let past_end = polygons
        .iter()
        .flat_map(|p| p.faces.iter())
        .find(|&&index| index as usize >= vertex_count);
    match past_end {
        Some(&index) => Err(CodecError::FaceIndexOutOfRange {
            index,
            vertex_count,
        }),
        None => Ok(()),
    }
}

fn face_index(index: u32) -> Result<u16> {
    u16::try_from(index).map_err(|_| CodecError::FaceIndexOverflow { index })
}

/// Bucket polygons by material, fan-triangulating anything larger than a
/// triangle.
///
/// Returns one group per material slot in slot order, empty groups included.
/// A polygon whose material lies past `material_count` grows the group list to
/// cover it. Polygons with fewer than three vertices are dropped.
pub fn group_by_material<'a, I>(polygons: I, material_count: usize) -> Result<Vec<MeshPolygon>>
where
    I: IntoIterator<Item = (usize, &'a [u32])>,
{
    let mut buckets: Vec<Vec<u16>> = vec![Vec::new(); material_count];
    let mut dropped = 0usize;

    for (material, vertices) in polygons {
        if vertices.len() < 3 {
            dropped += 1;
            continue;
        }
        if material >= buckets.len() {
            buckets.resize_with(material + 1, Vec::new);
        }
        let bucket = &mut buckets[material];
        let first = face_index(vertices[0])?;
        for pair in vertices[1..].windows(2) {
            bucket.extend_from_slice(&[first, face_index(pair[0])?, face_index(pair[1])?]);
        }
    }

    if dropped > 0 {
        debug!(dropped, "skipped degenerate polygons");
    }

    Ok(buckets
        .into_iter()
        .enumerate()
        .map(|(material, faces)| MeshPolygon {
            material_index: material as u32,
            faces,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangles_from_flat_list() {
        let polygons = [MeshPolygon {
            material_index: 2,
            faces: vec![0, 1, 2, 3, 4, 5],
        }];
        let tris = triangles(&polygons);
        assert_eq!(
            tris,
            vec![
                Triangle {
                    indices: [0, 1, 2],
                    material_index: 2
                },
                Triangle {
                    indices: [3, 4, 5],
                    material_index: 2
                },
            ]
        );
    }

    #[test]
    fn test_triangles_ignore_remainder() {
        let polygons = [MeshPolygon {
            material_index: 0,
            faces: vec![0, 1, 2, 3],
        }];
        assert_eq!(triangles(&polygons).len(), 1);
    }

    #[test]
    fn test_face_indices_within_vertex_count() {
        let polygons = [
            MeshPolygon {
                material_index: 0,
                faces: vec![0, 1, 2],
            },
            MeshPolygon {
                material_index: 1,
                faces: vec![2, 1, 7],
            },
        ];
        assert!(check_face_indices(&polygons, 8).is_ok());
        assert_eq!(
            check_face_indices(&polygons, 3),
            Err(CodecError::FaceIndexOutOfRange {
                index: 7,
                vertex_count: 3
            })
        );
        assert!(check_face_indices(&[], 0).is_ok());
    }

    #[test]
    fn test_group_by_material_fans_quads() {
        let quad = [0u32, 1, 2, 3];
        let tri = [4u32, 5, 6];
        let groups = group_by_material([(1, &quad[..]), (0, &tri[..])], 2).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].faces, vec![4, 5, 6]);
        assert_eq!(groups[1].material_index, 1);
        assert_eq!(groups[1].faces, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_group_by_material_keeps_empty_groups() {
        let tri = [0u32, 1, 2];
        let groups = group_by_material([(0, &tri[..])], 3).unwrap();
        assert_eq!(groups.len(), 3);
        assert!(groups[1].faces.is_empty());
        assert!(groups[2].faces.is_empty());
    }

    #[test]
    fn test_group_by_material_grows_for_out_of_range_slot() {
        let tri = [0u32, 1, 2];
        let groups = group_by_material([(4, &tri[..])], 1).unwrap();
        assert_eq!(groups.len(), 5);
        assert_eq!(groups[4].faces, vec![0, 1, 2]);
    }

    #[test]
    fn test_group_by_material_drops_degenerate() {
        let line = [0u32, 1];
        let groups = group_by_material([(0, &line[..])], 1).unwrap();
        assert!(groups[0].faces.is_empty());
    }

    #[test]
    fn test_group_by_material_rejects_wide_index() {
        let tri = [0u32, 1, 70_000];
        assert_eq!(
            group_by_material([(0, &tri[..])], 1),
            Err(CodecError::FaceIndexOverflow { index: 70_000 })
        );
    }
}
