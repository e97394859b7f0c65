//! gfbmdl-export library
//!
//! Assembles host scenes into GFBMDL models and turns decoded models back into
//! a host-facing view. The CLI in `main.rs` is a thin wrapper over these
//! functions; host plugins can call them directly through [`SceneSource`].

pub mod adapter;
pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod material;
pub mod mesh;
pub mod scene;
pub mod skeleton;
pub mod summary;
pub mod template;

pub use adapter::{HostBone, HostMaterial, HostMesh, HostPolygon, SceneSource, SkinBinding};
pub use config::{ExportConfig, load_config, load_config_or_default};
pub use error::{ExportError, MAX_VERTICES};
pub use export::{ExportOutcome, export_scene, export_to_bytes};
pub use import::{
    ImportedBone, ImportedMaterial, ImportedMesh, ImportedScene, ImportedTextureMap, import_bytes,
    import_model,
};
pub use scene::{JsonScene, load_scene};
pub use summary::ModelSummary;
pub use template::MaterialTemplate;
