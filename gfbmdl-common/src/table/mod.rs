//! Offset-based table container
//!
//! GFBMDL files use the FlatBuffers wire layout: a `u32` root offset followed by
//! tables addressed through relative little-endian offsets.
//!
//! # Layout
//! ```text
//! file:    root_offset u32 | ... data ...
//! table:   soffset i32 (table - soffset = vtable) | inline fields
//! vtable:  vtable_size u16 | table_size u16 | field_offset u16 * slots
//! vector:  len u32 | elements (scalars inline, tables/strings as u32 offsets)
//! string:  len u32 | bytes | 0
//! ```
//!
//! Fields are addressed by slot through [`FieldDef`] descriptors. A field whose
//! vtable entry is zero (or beyond the vtable) is absent and reads as its default.
//! Buffers are built back to front, so every child is written before the parent
//! that refers to it.

mod builder;
mod reader;
mod schema;

pub use builder::{Builder, Offset, TableWriter};
pub use reader::{Table, Vector};
pub use schema::{FieldDef, ScalarType, TableSchema, WireType};

/// Size of a `u32` offset on the wire.
pub(crate) const UOFFSET_SIZE: usize = 4;

/// Fixed-width little-endian value stored inline in a table or vector.
pub trait Scalar: Copy + PartialEq {
    /// Width on the wire in bytes.
    const SIZE: usize;
    /// Matching wire type in schema descriptors.
    const KIND: ScalarType;

    /// Decode from exactly `SIZE` bytes.
    fn from_le(bytes: &[u8]) -> Self;

    /// Encode into exactly `SIZE` bytes.
    fn write_le(self, out: &mut [u8]);

    /// Equal on the wire; `-0.0` and `0.0` differ.
    fn same_bits(self, other: Self) -> bool;
}

macro_rules! impl_scalar {
    ($ty:ty, $kind:ident) => {
        impl Scalar for $ty {
            const SIZE: usize = std::mem::size_of::<$ty>();
            const KIND: ScalarType = ScalarType::$kind;

            #[inline]
            fn from_le(bytes: &[u8]) -> Self {
                let mut raw = [0u8; std::mem::size_of::<$ty>()];
                raw.copy_from_slice(bytes);
                <$ty>::from_le_bytes(raw)
            }

            #[inline]
            fn write_le(self, out: &mut [u8]) {
                out.copy_from_slice(&self.to_le_bytes());
            }

            #[inline]
            fn same_bits(self, other: Self) -> bool {
                self.to_le_bytes() == other.to_le_bytes()
            }
        }
    };
}

impl_scalar!(u8, U8);
impl_scalar!(u16, U16);
impl_scalar!(u32, U32);
impl_scalar!(i32, I32);
impl_scalar!(f32, F32);

impl Scalar for bool {
    const SIZE: usize = 1;
    const KIND: ScalarType = ScalarType::Bool;

    #[inline]
    fn from_le(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }

    #[inline]
    fn write_le(self, out: &mut [u8]) {
        out[0] = u8::from(self);
    }

    #[inline]
    fn same_bits(self, other: Self) -> bool {
        self == other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAME: FieldDef = FieldDef::string("name", 0);
    const COUNT: FieldDef = FieldDef::scalar("count", 1, ScalarType::U32);
    const SCALE: FieldDef = FieldDef::scalar("scale", 2, ScalarType::F32);
    const FLAG: FieldDef = FieldDef::scalar("flag", 3, ScalarType::Bool);
    const TAGS: FieldDef = FieldDef::strings("tags", 4);
    const CHILDREN: FieldDef = FieldDef::tables("children", 5);
    const INDICES: FieldDef = FieldDef::scalars("indices", 6, ScalarType::U16);
    const EXTENT: FieldDef = FieldDef::structure("extent", 7, 12);
    const PAYLOAD: FieldDef = FieldDef::scalars("payload", 8, ScalarType::U8);
    const PARENT: FieldDef = FieldDef::scalar("parent", 9, ScalarType::I32);

    fn build_sample() -> Vec<u8> {
        let mut fbb = Builder::new();

        let child_name = fbb.create_string("child");
        let mut child = fbb.start_table();
        child.add_offset(&NAME, child_name);
        child.add_scalar(&COUNT, 7u32, 0);
        let child = child.finish();

        let children = fbb.create_offset_vector(&[child]);
        let tags = fbb.create_strings(&["a", "bc", ""]);
        let indices = fbb.create_scalar_vector(&[0u16, 1, 2]);
        let payload = fbb.create_byte_vector(&[9, 8, 7, 6, 5]);
        let name = fbb.create_string("root");

        let mut root = fbb.start_table();
        root.add_offset(&NAME, name);
        root.add_scalar(&COUNT, 42u32, 0);
        root.add_scalar(&SCALE, 0.0f32, 0.0);
        root.add_scalar(&FLAG, true, false);
        root.add_offset(&TAGS, tags);
        root.add_offset(&CHILDREN, children);
        root.add_offset(&INDICES, indices);
        root.add_struct(&EXTENT, &[1.0f32, 2.0, 3.0]);
        root.add_offset(&PAYLOAD, payload);
        root.add_scalar(&PARENT, -1i32, 0);
        let root = root.finish();

        fbb.finish(root)
    }

    #[test]
    fn test_table_roundtrip() {
        let bytes = build_sample();
        let root = Table::root(&bytes).unwrap();

        assert_eq!(root.string(&NAME).unwrap(), Some("root"));
        assert_eq!(root.scalar(&COUNT, 0u32).unwrap(), 42);
        assert!(root.scalar(&FLAG, false).unwrap());
        assert_eq!(root.scalar(&PARENT, 0i32).unwrap(), -1);
        assert_eq!(root.strings(&TAGS).unwrap(), vec!["a", "bc", ""]);
        assert_eq!(root.scalars::<u16>(&INDICES).unwrap(), vec![0, 1, 2]);
        assert_eq!(root.bytes(&PAYLOAD).unwrap(), &[9, 8, 7, 6, 5]);
        assert_eq!(
            root.structure::<[f32; 3]>(&EXTENT).unwrap(),
            Some([1.0, 2.0, 3.0])
        );

        let children = root.tables(&CHILDREN).unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].string(&NAME).unwrap(), Some("child"));
        assert_eq!(children[0].scalar(&COUNT, 0u32).unwrap(), 7);
    }

    #[test]
    fn test_default_scalar_is_omitted() {
        let bytes = build_sample();
        let root = Table::root(&bytes).unwrap();

        // 0.0 equals the default, so the writer left the slot empty.
        assert!(!root.has(&SCALE).unwrap());
        assert_eq!(root.scalar(&SCALE, 1.5f32).unwrap(), 1.5);
    }

    #[test]
    fn test_negative_zero_is_written() {
        let mut fbb = Builder::new();
        let mut table = fbb.start_table();
        table.add_scalar(&SCALE, -0.0f32, 0.0);
        let table = table.finish();
        let bytes = fbb.finish(table);
        let root = Table::root(&bytes).unwrap();

        assert!(root.has(&SCALE).unwrap());
        let scale = root.scalar(&SCALE, 0.0f32).unwrap();
        assert_eq!(scale.to_bits(), (-0.0f32).to_bits());
    }

    #[test]
    fn test_absent_fields_read_defaults() {
        let mut fbb = Builder::new();
        let table = fbb.start_table().finish();
        let bytes = fbb.finish(table);
        let root = Table::root(&bytes).unwrap();

        assert_eq!(root.string(&NAME).unwrap(), None);
        assert_eq!(root.scalar(&COUNT, 3u32).unwrap(), 3);
        assert!(root.strings(&TAGS).unwrap().is_empty());
        assert!(root.tables(&CHILDREN).unwrap().is_empty());
        assert!(root.vector(&CHILDREN).unwrap().is_none());
        assert_eq!(root.structure::<[f32; 3]>(&EXTENT).unwrap(), None);
    }

    #[test]
    fn test_empty_vector_is_present() {
        let mut fbb = Builder::new();
        let children = fbb.create_offset_vector(&[]);
        let mut root = fbb.start_table();
        root.add_offset(&CHILDREN, children);
        let root = root.finish();
        let bytes = fbb.finish(root);

        let root = Table::root(&bytes).unwrap();
        let vector = root.vector(&CHILDREN).unwrap().expect("vector should be present");
        assert!(vector.is_empty());
    }

    #[test]
    fn test_root_offset_outside_buffer() {
        let bytes = 1000u32.to_le_bytes();
        assert!(matches!(
            Table::root(&bytes),
            Err(crate::CodecError::MalformedContainer { .. })
        ));
    }

    #[test]
    fn test_truncated_buffer_is_malformed() {
        let bytes = build_sample();
        let truncated = &bytes[..bytes.len() / 2];
        let result = Table::root(truncated).and_then(|root| root.strings(&TAGS));
        assert!(matches!(
            result,
            Err(crate::CodecError::MalformedContainer { .. })
        ));
    }

    #[test]
    fn test_vector_length_past_end_is_malformed() {
        let mut fbb = Builder::new();
        let payload = fbb.create_byte_vector(&[1, 2, 3, 4]);
        let mut root = fbb.start_table();
        root.add_offset(&PAYLOAD, payload);
        let root = root.finish();
        let mut bytes = fbb.finish(root);

        // The byte vector is the last thing in the buffer: len u32 followed by 4 bytes.
        let len_at = bytes.len() - 8;
        bytes[len_at..len_at + 4].copy_from_slice(&1000u32.to_le_bytes());

        let root = Table::root(&bytes).unwrap();
        assert!(matches!(
            root.bytes(&PAYLOAD),
            Err(crate::CodecError::MalformedContainer { .. })
        ));
    }

    #[test]
    fn test_scalar_roundtrip_le() {
        let mut out = [0u8; 4];
        0x1810_0920u32.write_le(&mut out);
        assert_eq!(out, [0x20, 0x09, 0x10, 0x18]);
        assert_eq!(<u32 as Scalar>::from_le(&out), 0x1810_0920);
    }
}
