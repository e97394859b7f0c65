//! Default material parameter set applied on export.
//!
//! The tables reproduce the parameter set the game's default shader expects.
//! Host overrides are merged on top by [`crate::material::build_material`].

use gfbmdl_common::{
    ColorRgb, MatColor, MatFloat, MatInt, MatSwitch, MaterialCommon, TextureMapping, WrapMode,
};
use serde::{Deserialize, Serialize};

/// Sampler that receives the host's base color texture.
pub const BASE_COLOR_SAMPLER: &str = "Col0Tex";

const SHADER_GROUP: &str = "PokeDefaultShader";

const SAMPLERS: &[&str] = &[
    BASE_COLOR_SAMPLER,
    "EmissionMaskTex",
    "LyCol0Tex",
    "AmbientTex",
    "NormalMapTex",
    "LightTblTex",
    "SphereMapTex",
    "EffectTex",
];

const SWITCHES: &[(&str, bool)] = &[
    ("useColorTex", true),
    ("SwitchEmissionMaskTexUV", false),
    ("EmissionMaskUse", false),
    ("SwitchPriority", false),
    ("Layer1Enable", false),
    ("SwitchAmbientTexUV", false),
    ("AmbientMapEnable", true),
    ("SwitchNormalMapUV", false),
    ("NormalMapEnable", true),
    ("LightTableEnable", true),
    ("SpecularMaskEnable", false),
    ("BaseColorAddEnable", true),
    ("SphereMapEnable", false),
    ("SphereMaskEnable", false),
    ("RimMaskEnable", false),
    ("alphaShell", false),
    ("EffectVal", true),
    ("NormalEdgeEnable", true),
    ("OutLineIDEnable", false),
    ("OutLineColFixed", false),
];

const VALUES: &[(&str, f32)] = &[
    ("ColorUVScaleU", 2.0),
    ("ColorUVScaleV", 1.0),
    ("ColorUVTranslateU", 0.0),
    ("ColorBaseU", 0.0),
    ("ColorUVTranslateV", 0.0),
    ("ColorBaseV", 0.0),
    ("ConstantColor0Val", 1.0),
    ("Layer1UVScaleU", 1.0),
    ("Layer1UVScaleV", 1.0),
    ("Layer1UVTranslateU", 0.0),
    ("Layer1BaseU", 0.0),
    ("Layer1UVTranslateV", 0.0),
    ("Layer1BaseV", 0.0),
    ("EmissionMaskVal", 1.0),
    ("ConstantColorSd0Val", 1.0),
    ("ConstantColor1Val", 1.0),
    ("ConstantColorSd1Val", 1.0),
    ("ColorLerpValue", 0.0),
    ("L1ConstantColor0Val", 1.0),
    ("L1AddColor0Val", 0.0),
    ("L1ConstantColor1Val", 1.0),
    ("L1AddColor1Val", 0.0),
    ("L1ConstantColorSd0Val", 1.0),
    ("L1ConstantColorSd1Val", 1.0),
    ("Layer1OverLerpValue", 1.0),
    ("NormalMapUVScaleU", 1.0),
    ("NormalMapUVScaleV", 1.0),
    ("LightTblIndex", 6.0),
    ("LightMul", 1.0),
    ("SpecularPower", 6.0),
    ("SpecularScale", 0.3),
    ("SphereMapColorVal", 1.0),
    ("RimColorVal", 1.0),
    ("RimPower", 8.0),
    ("RimStrength", 8.0),
    ("OnGameEmissionVal", 1.0),
    ("ConstantColorVal", 1.0),
    ("ConstantAlpha", 1.0),
    ("OnGameColorVal", 1.0),
    ("OnGameAlpha", 1.0),
    ("OutLineID", 0.0),
    ("ProgID", 0.0),
    ("Def0_OneMin1_FreCol", 1.0),
    ("DistortionIntensity", 1.0),
    ("Sin01", 4.0),
    ("ScaleUV", 1.0),
    ("EffectTexTranslateU", 0.0),
    ("EffectTexTranslateV", 0.0),
    ("EffectTexRotate", 0.0),
    ("EffectTexScaleU", 8.0),
    ("EffectTexScaleV", 5.0),
    ("EffectColPower", 1.0),
];

const COLORS: &[(&str, [f32; 3])] = &[
    ("ConstantColor0", [1.0, 1.0, 1.0]),
    ("ConstantColorSd0", [0.651, 0.7, 0.63]),
    ("ConstantColor1", [1.0, 1.0, 1.0]),
    ("ConstantColorSd1", [0.651, 0.7, 0.63]),
    ("L1ConstantColor0", [1.0, 1.0, 1.0]),
    ("L1AddColor0", [1.0, 1.0, 1.0]),
    ("L1ConstantColor1", [1.0, 1.0, 1.0]),
    ("L1AddColor1", [1.0, 1.0, 1.0]),
    ("L1ConstantColorSd0", [1.0, 1.0, 1.0]),
    ("L1ConstantColorSd1", [1.0, 1.0, 1.0]),
    ("DeepShadowColor", [1.0, 1.0, 1.0]),
    ("SpecularColor", [0.813333, 1.0, 0.65]),
    ("SphereMapColor", [1.000024, 1.000024, 1.000024]),
    ("RimColor", [0.314675, 0.41, 0.2255]),
    ("RimColorShadow", [0.1622, 0.2, 0.074]),
    ("ConstantColor", [1.0, 1.0, 1.0]),
    ("OnGameColor", [1.0, 1.0, 1.0]),
    ("OutLineCol", [0.39, 0.6, 0.46]),
    ("EffectColor01", [1.0, 0.0, 1.0]),
];

const COMMON_SWITCHES: &[(&str, bool)] = &[
    ("FogEnable", true),
    ("DiscardEnable", false),
    ("CastShadow", true),
    ("ReceiveShadow", false),
    ("TextureAlphaTestEnable", false),
    ("ShadowMapPrevEnable", true),
    ("LayerCalcMulti", false),
    ("FireMaskPathEnable", false),
    ("GPUInstancingEnable", false),
    ("Wireframe", false),
    ("DepthWrite", true),
    ("DepthTest", true),
    ("IsErase", false),
    ("MayaPreviewEnable", false),
];

const COMMON_VALUES: &[(&str, i32)] = &[
    ("CullMode", 0),
    ("LightSetNo", 0),
    ("ShaderType", 0),
    ("Priority", 0),
    ("MipMapBias", 0),
    ("PreMultiplieMode", 0),
    ("BlendMode", 0),
    ("ColorMapUvIndex", 0),
    ("Layer1UvIdx", 0),
    ("EmissionMaskTexSS", 7),
    ("AmbientTexSS", 7),
    ("NormalMapTexSS", 7),
    ("Col0TexSS", 7),
    ("LyCol0TexSS", 7),
    ("PolygonOffset", 0),
];

fn switches(table: &[(&str, bool)]) -> Vec<MatSwitch> {
    table
        .iter()
        .map(|&(name, value)| MatSwitch {
            name: name.to_string(),
            value,
        })
        .collect()
}

/// Material fields shared by every exported material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialTemplate {
    pub shader_group: String,
    pub render_layer: i32,
    pub shader_index: i32,
    pub parameters: [i32; 5],
    pub reserved: [u8; 7],
    /// Sampler names, one texture map each.
    pub samplers: Vec<String>,
    /// Sampler parameters used for every texture map.
    pub mapping: TextureMapping,
    pub switches: Vec<MatSwitch>,
    pub values: Vec<MatFloat>,
    pub colors: Vec<MatColor>,
    pub common: MaterialCommon,
}

impl Default for MaterialTemplate {
    fn default() -> Self {
        Self {
            shader_group: SHADER_GROUP.to_string(),
            render_layer: 0,
            shader_index: 0,
            parameters: [0; 5],
            reserved: [1, 1, 0, 1, 0, 0, 0],
            samplers: SAMPLERS.iter().map(|s| s.to_string()).collect(),
            mapping: TextureMapping {
                wrap_x: WrapMode::Mirror,
                wrap_y: WrapMode::Repeat,
                wrap_z: WrapMode::Repeat,
                lod_bias: 0.0,
                reserved: [0; 5],
            },
            switches: switches(SWITCHES),
            values: VALUES
                .iter()
                .map(|&(name, value)| MatFloat {
                    name: name.to_string(),
                    value,
                })
                .collect(),
            colors: COLORS
                .iter()
                .map(|&(name, rgb)| MatColor {
                    name: name.to_string(),
                    color: ColorRgb::from(rgb),
                })
                .collect(),
            common: MaterialCommon {
                switches: switches(COMMON_SWITCHES),
                values: COMMON_VALUES
                    .iter()
                    .map(|&(name, value)| MatInt {
                        name: name.to_string(),
                        value,
                    })
                    .collect(),
                colors: Vec::new(),
            },
        }
    }
}
