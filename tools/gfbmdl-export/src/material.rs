//! Host material → document material.

use gfbmdl_common::{Material, TextureMap};

use crate::adapter::HostMaterial;
use crate::template::{BASE_COLOR_SAMPLER, MaterialTemplate};

/// Entries with a `name` that overrides can replace.
trait Named {
    fn name(&self) -> &str;
}

macro_rules! impl_named {
    ($($ty:ty),*) => {
        $(impl Named for $ty {
            fn name(&self) -> &str {
                &self.name
            }
        })*
    };
}

impl_named!(gfbmdl_common::MatSwitch, gfbmdl_common::MatFloat, gfbmdl_common::MatColor);

/// Replace entries by name, appending names the base does not have.
fn merge<T: Named + Clone>(base: &[T], overrides: &[T]) -> Vec<T> {
    let mut merged = base.to_vec();
    for entry in overrides {
        match merged.iter_mut().find(|e| e.name() == entry.name()) {
            Some(slot) => *slot = entry.clone(),
            None => merged.push(entry.clone()),
        }
    }
    merged
}

/// Build a material from the template plus host overrides.
///
/// The base color sampler points at the host's base color texture, or at
/// texture 0 when the host has none. Every other sampler points at texture 0.
pub fn build_material(host: &HostMaterial, template: &MaterialTemplate) -> Material {
    let texture_maps = template
        .samplers
        .iter()
        .map(|sampler| TextureMap {
            sampler: sampler.clone(),
            texture_index: match sampler.as_str() {
                BASE_COLOR_SAMPLER => host.base_color_texture.unwrap_or(0),
                _ => 0,
            },
            mapping: Some(template.mapping),
        })
        .collect();

    Material {
        name: host.name.clone(),
        shader_group: template.shader_group.clone(),
        render_layer: template.render_layer,
        shader_index: template.shader_index,
        parameters: template.parameters,
        reserved: template.reserved,
        texture_maps,
        switches: merge(&template.switches, &host.switches),
        values: merge(&template.values, &host.values),
        colors: merge(&template.colors, &host.colors),
        common: Some(template.common.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gfbmdl_common::{ColorRgb, MatColor, MatFloat, MatSwitch};

    #[test]
    fn test_base_color_texture_index() {
        let template = MaterialTemplate::default();
        let host = HostMaterial {
            name: "Body".to_string(),
            base_color_texture: Some(3),
            ..Default::default()
        };
        let material = build_material(&host, &template);
        assert_eq!(material.name, "Body");
        assert_eq!(material.texture_maps.len(), 8);
        assert_eq!(material.texture_maps[0].sampler, "Col0Tex");
        assert_eq!(material.texture_maps[0].texture_index, 3);
        assert!(material.texture_maps[1..].iter().all(|m| m.texture_index == 0));
        assert_eq!(material.reserved, [1, 1, 0, 1, 0, 0, 0]);
    }

    #[test]
    fn test_missing_texture_points_at_zero() {
        let material = build_material(&HostMaterial::default(), &MaterialTemplate::default());
        assert_eq!(material.texture_maps[0].texture_index, 0);
    }

    #[test]
    fn test_overrides_replace_and_append() {
        let template = MaterialTemplate::default();
        let host = HostMaterial {
            name: "Eye".to_string(),
            base_color_texture: None,
            switches: vec![MatSwitch {
                name: "useColorTex".to_string(),
                value: false,
            }],
            values: vec![MatFloat {
                name: "CustomValue".to_string(),
                value: 0.5,
            }],
            colors: vec![MatColor {
                name: "RimColor".to_string(),
                color: ColorRgb::new(1.0, 0.0, 0.0),
            }],
        };
        let material = build_material(&host, &template);

        assert_eq!(material.switches.len(), template.switches.len());
        assert!(!material.switches[0].value);
        assert_eq!(material.values.len(), template.values.len() + 1);
        assert_eq!(material.values.last().map(|v| v.value), Some(0.5));
        let rim = material.colors.iter().find(|c| c.name == "RimColor").unwrap();
        assert_eq!(rim.color, ColorRgb::new(1.0, 0.0, 0.0));
    }
}
