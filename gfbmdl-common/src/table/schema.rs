//! Table schema descriptors.
//!
//! A [`TableSchema`] lists the fields of one table type together with their
//! vtable slot and wire type. The reader and writer take a [`FieldDef`] for every
//! access, so the slot layout lives in exactly one place per table type.

use std::fmt;

/// Fixed-width scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Bool,
    U8,
    U16,
    U32,
    I32,
    F32,
}

impl ScalarType {
    /// Schema-language name of the scalar.
    pub const fn name(self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::U8 => "ubyte",
            ScalarType::U16 => "ushort",
            ScalarType::U32 => "uint",
            ScalarType::I32 => "int",
            ScalarType::F32 => "float",
        }
    }
}

/// How a field is stored on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    /// Inline scalar.
    Scalar(ScalarType),
    /// Inline fixed-size struct of the given byte size.
    Struct(usize),
    /// Offset to a string.
    String,
    /// Offset to a nested table.
    Table,
    /// Offset to a vector of string offsets.
    StringVector,
    /// Offset to a vector of table offsets.
    TableVector,
    /// Offset to a vector of inline scalars.
    ScalarVector(ScalarType),
}

impl WireType {
    /// Whether the field stores a `u32` offset rather than inline data.
    pub const fn is_offset(self) -> bool {
        !matches!(self, WireType::Scalar(_) | WireType::Struct(_))
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireType::Scalar(s) => write!(f, "{}", s.name()),
            WireType::Struct(size) => write!(f, "struct({} bytes)", size),
            WireType::String => write!(f, "string"),
            WireType::Table => write!(f, "table"),
            WireType::StringVector => write!(f, "[string]"),
            WireType::TableVector => write!(f, "[table]"),
            WireType::ScalarVector(s) => write!(f, "[{}]", s.name()),
        }
    }
}

/// One field of a table: its name, vtable slot and wire type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub slot: u16,
    pub wire: WireType,
}

impl FieldDef {
    pub const fn new(name: &'static str, slot: u16, wire: WireType) -> Self {
        Self { name, slot, wire }
    }

    pub const fn scalar(name: &'static str, slot: u16, ty: ScalarType) -> Self {
        Self::new(name, slot, WireType::Scalar(ty))
    }

    pub const fn structure(name: &'static str, slot: u16, size: usize) -> Self {
        Self::new(name, slot, WireType::Struct(size))
    }

    pub const fn string(name: &'static str, slot: u16) -> Self {
        Self::new(name, slot, WireType::String)
    }

    pub const fn table(name: &'static str, slot: u16) -> Self {
        Self::new(name, slot, WireType::Table)
    }

    pub const fn strings(name: &'static str, slot: u16) -> Self {
        Self::new(name, slot, WireType::StringVector)
    }

    pub const fn tables(name: &'static str, slot: u16) -> Self {
        Self::new(name, slot, WireType::TableVector)
    }

    pub const fn scalars(name: &'static str, slot: u16, ty: ScalarType) -> Self {
        Self::new(name, slot, WireType::ScalarVector(ty))
    }

    /// Byte offset of this field's entry inside a vtable.
    #[inline]
    pub const fn vtable_entry(&self) -> usize {
        4 + 2 * self.slot as usize
    }
}

/// Field list of one table type.
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub name: &'static str,
    pub fields: &'static [FieldDef],
}

impl TableSchema {
    pub const fn new(name: &'static str, fields: &'static [FieldDef]) -> Self {
        Self { name, fields }
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Number of vtable slots the table type declares.
    pub fn slot_count(&self) -> usize {
        self.fields
            .iter()
            .map(|f| f.slot as usize + 1)
            .max()
            .unwrap_or(0)
    }
}

impl fmt::Display for TableSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "table {} {{", self.name)?;
        for field in self.fields {
            writeln!(f, "  {:>2}  {}: {}", field.slot, field.name, field.wire)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: TableSchema = TableSchema::new(
        "Sample",
        &[
            FieldDef::scalar("id", 0, ScalarType::U32),
            FieldDef::strings("names", 2),
        ],
    );

    #[test]
    fn test_vtable_entry() {
        assert_eq!(FieldDef::scalar("a", 0, ScalarType::U8).vtable_entry(), 4);
        assert_eq!(FieldDef::table("b", 10).vtable_entry(), 24);
    }

    #[test]
    fn test_slot_count_uses_highest_slot() {
        assert_eq!(SAMPLE.slot_count(), 3);
        assert_eq!(SAMPLE.field("names").map(|f| f.slot), Some(2));
        assert!(SAMPLE.field("missing").is_none());
    }

    #[test]
    fn test_display_lists_fields() {
        let text = SAMPLE.to_string();
        assert!(text.starts_with("table Sample {"));
        assert!(text.contains(" 0  id: uint"));
        assert!(text.contains(" 2  names: [string]"));
    }

    #[test]
    fn test_offset_wire_types() {
        assert!(!WireType::Scalar(ScalarType::F32).is_offset());
        assert!(!WireType::Struct(24).is_offset());
        assert!(WireType::TableVector.is_offset());
        assert!(WireType::ScalarVector(ScalarType::U16).is_offset());
    }
}
