//! Host bones → document skeleton
//!
//! Parents are resolved by name. A parent that names no bone is reported as a
//! warning and the bone becomes a root.

use gfbmdl_common::{Bone, CodecError, Vector3};
use glam::Vec3;
use hashbrown::HashMap;
use tracing::warn;

use crate::adapter::HostBone;

/// Bones in host order plus the name → index map used to resolve references.
#[derive(Debug, Clone, Default)]
pub struct LinkedSkeleton {
    pub bones: Vec<Bone>,
    pub warnings: Vec<CodecError>,
    index: HashMap<String, usize>,
}

impl LinkedSkeleton {
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
}

fn convert_bone(host: &HostBone, parent: i32, transform: impl Fn(Vec3) -> Vec3) -> Bone {
    Bone {
        name: host.name.clone(),
        bone_type: u32::from(host.deform),
        parent,
        zero: 0,
        visible: host.deform,
        scale: Vector3::ONE,
        rotation: Vector3::ZERO,
        translation: transform(host.head).into(),
        radius_start: Some(Vector3::ZERO),
        radius_end: None,
        rigid_check: None,
    }
}

/// Link host bones into document bones.
///
/// `transform` is applied to each head position.
pub fn link_bones(hosts: &[HostBone], transform: impl Fn(Vec3) -> Vec3) -> LinkedSkeleton {
    // First name wins on duplicates.
    let mut index = HashMap::with_capacity(hosts.len());
    for (i, host) in hosts.iter().enumerate() {
        index.entry(host.name.clone()).or_insert(i);
    }

    let mut warnings = Vec::new();
    let bones = hosts
        .iter()
        .map(|host| {
            let parent = match &host.parent {
                None => -1,
                Some(name) => match index.get(name) {
                    Some(&i) => i as i32,
                    None => {
                        warn!(bone = %host.name, parent = %name, "unresolved parent, treating as root");
                        warnings.push(CodecError::UnresolvedBoneParent {
                            bone: host.name.clone(),
                            parent: name.clone(),
                        });
                        -1
                    }
                },
            };
            convert_bone(host, parent, &transform)
        })
        .collect();

    LinkedSkeleton {
        bones,
        warnings,
        index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bone(name: &str, parent: Option<&str>, head: Vec3) -> HostBone {
        HostBone {
            name: name.to_string(),
            parent: parent.map(str::to_string),
            head,
            deform: true,
        }
    }

    #[test]
    fn test_link_parents() {
        let hosts = vec![
            bone("Root", None, Vec3::ZERO),
            bone("Spine", Some("Root"), Vec3::new(0.0, 1.0, 0.0)),
            bone("Head", Some("Spine"), Vec3::new(0.0, 2.0, 0.0)),
        ];
        let skeleton = link_bones(&hosts, |v| v);

        let parents: Vec<i32> = skeleton.bones.iter().map(|b| b.parent).collect();
        assert_eq!(parents, vec![-1, 0, 1]);
        assert!(skeleton.warnings.is_empty());
        assert_eq!(skeleton.index_of("Head"), Some(2));
        assert_eq!(skeleton.index_of("Tail"), None);
        assert_eq!(skeleton.bones[2].translation, Vector3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_bone_defaults() {
        let mut hosts = vec![bone("Root", None, Vec3::ZERO)];
        hosts.push(HostBone {
            deform: false,
            ..bone("Helper", Some("Root"), Vec3::ZERO)
        });
        let skeleton = link_bones(&hosts, |v| v);

        let root = &skeleton.bones[0];
        assert_eq!(root.bone_type, 1);
        assert!(root.visible);
        assert_eq!(root.scale, Vector3::ONE);
        assert_eq!(root.rotation, Vector3::ZERO);
        assert_eq!(root.radius_start, Some(Vector3::ZERO));
        assert_eq!(root.radius_end, None);
        assert_eq!(root.rigid_check, None);

        let helper = &skeleton.bones[1];
        assert_eq!(helper.bone_type, 0);
        assert!(!helper.visible);
    }

    #[test]
    fn test_unresolved_parent_becomes_root() {
        let hosts = vec![bone("Root", None, Vec3::ZERO), bone("Arm", Some("Missing"), Vec3::ZERO)];
        let skeleton = link_bones(&hosts, |v| v);

        assert_eq!(skeleton.bones[1].parent, -1);
        assert_eq!(skeleton.warnings.len(), 1);
        assert!(matches!(
            &skeleton.warnings[0],
            CodecError::UnresolvedBoneParent { bone, parent } if bone == "Arm" && parent == "Missing"
        ));
    }

    #[test]
    fn test_transform_applied_to_head() {
        let hosts = vec![bone("Root", None, Vec3::new(1.0, 2.0, 3.0))];
        let skeleton = link_bones(&hosts, |v| Vec3::new(v.x, v.z, -v.y));
        assert_eq!(skeleton.bones[0].translation, Vector3::new(1.0, 3.0, -2.0));
    }
}
