//! GFBMDL document format
//!
//! A GFBMDL file is a single table tree rooted at [`Model`]. There are no magic
//! bytes and no checksum; the only format marker is the root `version` field,
//! which pins the slot layout described in [`schema`].
//!
//! - [`model`] - Owned document types
//! - [`schema`] - Slot descriptors for every table type
//! - [`encode`] / [`decode`] - Document codec (strict and best-effort)

pub mod decode;
pub mod encode;
pub mod model;
pub mod schema;

pub use decode::{DecodeMode, DecodeReport, ErrorScope, ScopedError, decode_model, decode_model_with};
pub use encode::encode_model;
pub use model::*;
