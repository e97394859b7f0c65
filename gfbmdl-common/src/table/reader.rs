//! Bounds-checked read views over a finished buffer.

use bytemuck::Pod;

use super::schema::{FieldDef, WireType};
use super::{Scalar, UOFFSET_SIZE};
use crate::error::{CodecError, Result};

fn read_at<T: Scalar>(buf: &[u8], at: usize) -> Result<T> {
    let bytes = at
        .checked_add(T::SIZE)
        .and_then(|end| buf.get(at..end))
        .ok_or(CodecError::malformed(at, "read past end of buffer"))?;
    Ok(T::from_le(bytes))
}

/// Follow the `u32` offset stored at `at`.
fn follow(buf: &[u8], at: usize) -> Result<usize> {
    let relative: u32 = read_at(buf, at)?;
    let target = at
        .checked_add(relative as usize)
        .ok_or(CodecError::malformed(at, "offset overflow"))?;
    if target >= buf.len() {
        return Err(CodecError::malformed(at, "offset points outside buffer"));
    }
    Ok(target)
}

fn read_str(buf: &[u8], at: usize) -> Result<&str> {
    let len: u32 = read_at(buf, at)?;
    let start = at + UOFFSET_SIZE;
    let bytes = start
        .checked_add(len as usize)
        .and_then(|end| buf.get(start..end))
        .ok_or(CodecError::malformed(at, "string length exceeds buffer"))?;
    std::str::from_utf8(bytes).map_err(|_| CodecError::malformed(at, "string is not valid UTF-8"))
}

/// Read view of one table.
#[derive(Debug, Clone, Copy)]
pub struct Table<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Table<'a> {
    /// Open the root table of a finished buffer.
    pub fn root(buf: &'a [u8]) -> Result<Self> {
        let pos = follow(buf, 0)?;
        Self::at(buf, pos)
    }

    fn at(buf: &'a [u8], pos: usize) -> Result<Self> {
        let table = Self { buf, pos };
        table.vtable()?;
        Ok(table)
    }

    /// Byte position of the table inside the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Locate the vtable and return `(position, size)`.
    fn vtable(&self) -> Result<(usize, usize)> {
        let soffset: i32 = read_at(self.buf, self.pos)?;
        let vtable = self.pos as i64 - soffset as i64;
        if vtable < 0 || vtable as usize >= self.buf.len() {
            return Err(CodecError::malformed(self.pos, "vtable outside buffer"));
        }
        let vtable = vtable as usize;
        let size: u16 = read_at(self.buf, vtable)?;
        let size = size as usize;
        if size < 4 || size % 2 != 0 || vtable + size > self.buf.len() {
            return Err(CodecError::malformed(vtable, "invalid vtable size"));
        }
        Ok((vtable, size))
    }

    /// Absolute position of a field's data, or `None` if absent.
    fn locate(&self, field: &FieldDef) -> Result<Option<usize>> {
        let (vtable, size) = self.vtable()?;
        let entry = field.vtable_entry();
        if entry + 2 > size {
            return Ok(None);
        }
        let relative: u16 = read_at(self.buf, vtable + entry)?;
        if relative == 0 {
            return Ok(None);
        }
        Ok(Some(self.pos + relative as usize))
    }

    /// Whether the field is present in this table.
    pub fn has(&self, field: &FieldDef) -> Result<bool> {
        Ok(self.locate(field)?.is_some())
    }

    pub fn scalar<T: Scalar>(&self, field: &FieldDef, default: T) -> Result<T> {
        debug_assert_eq!(field.wire, WireType::Scalar(T::KIND), "field '{}'", field.name);
        match self.locate(field)? {
            Some(at) => read_at(self.buf, at),
            None => Ok(default),
        }
    }

    pub fn structure<S: Pod>(&self, field: &FieldDef) -> Result<Option<S>> {
        let size = std::mem::size_of::<S>();
        debug_assert_eq!(field.wire, WireType::Struct(size), "field '{}'", field.name);
        let Some(at) = self.locate(field)? else {
            return Ok(None);
        };
        let bytes = self
            .buf
            .get(at..at + size)
            .ok_or(CodecError::malformed(at, "struct extends past end of buffer"))?;
        Ok(Some(bytemuck::pod_read_unaligned(bytes)))
    }

    pub fn string(&self, field: &FieldDef) -> Result<Option<&'a str>> {
        debug_assert_eq!(field.wire, WireType::String, "field '{}'", field.name);
        match self.locate(field)? {
            Some(at) => read_str(self.buf, follow(self.buf, at)?).map(Some),
            None => Ok(None),
        }
    }

    pub fn table(&self, field: &FieldDef) -> Result<Option<Table<'a>>> {
        debug_assert_eq!(field.wire, WireType::Table, "field '{}'", field.name);
        match self.locate(field)? {
            Some(at) => Table::at(self.buf, follow(self.buf, at)?).map(Some),
            None => Ok(None),
        }
    }

    pub fn vector(&self, field: &FieldDef) -> Result<Option<Vector<'a>>> {
        debug_assert!(
            matches!(
                field.wire,
                WireType::StringVector | WireType::TableVector | WireType::ScalarVector(_)
            ),
            "field '{}'",
            field.name
        );
        match self.locate(field)? {
            Some(at) => Vector::at(self.buf, follow(self.buf, at)?).map(Some),
            None => Ok(None),
        }
    }

    /// All strings of a string vector; absent reads as empty.
    pub fn strings(&self, field: &FieldDef) -> Result<Vec<String>> {
        let Some(vector) = self.vector(field)? else {
            return Ok(Vec::new());
        };
        (0..vector.len())
            .map(|i| vector.string(i).map(str::to_owned))
            .collect()
    }

    /// All tables of a table vector; absent reads as empty.
    pub fn tables(&self, field: &FieldDef) -> Result<Vec<Table<'a>>> {
        let Some(vector) = self.vector(field)? else {
            return Ok(Vec::new());
        };
        (0..vector.len()).map(|i| vector.table(i)).collect()
    }

    /// All elements of a scalar vector; absent reads as empty.
    pub fn scalars<T: Scalar>(&self, field: &FieldDef) -> Result<Vec<T>> {
        let Some(vector) = self.vector(field)? else {
            return Ok(Vec::new());
        };
        vector.scalars()
    }

    /// Contents of a byte vector; absent reads as empty.
    pub fn bytes(&self, field: &FieldDef) -> Result<&'a [u8]> {
        match self.vector(field)? {
            Some(vector) => vector.as_bytes(),
            None => Ok(&[]),
        }
    }
}

/// Read view of a vector.
#[derive(Debug, Clone, Copy)]
pub struct Vector<'a> {
    buf: &'a [u8],
    start: usize,
    len: usize,
}

impl<'a> Vector<'a> {
    fn at(buf: &'a [u8], pos: usize) -> Result<Self> {
        let len: u32 = read_at(buf, pos)?;
        Ok(Self {
            buf,
            start: pos + UOFFSET_SIZE,
            len: len as usize,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Elements as raw bytes, after checking they fit the buffer.
    fn elements(&self, elem_size: usize) -> Result<&'a [u8]> {
        self.len
            .checked_mul(elem_size)
            .and_then(|n| self.start.checked_add(n))
            .and_then(|end| self.buf.get(self.start..end))
            .ok_or(CodecError::malformed(
                self.start,
                "vector length exceeds buffer",
            ))
    }

    fn element_at(&self, index: usize, elem_size: usize) -> Result<usize> {
        if index >= self.len {
            return Err(CodecError::malformed(self.start, "vector index out of range"));
        }
        self.elements(elem_size)?;
        Ok(self.start + index * elem_size)
    }

    pub fn scalar<T: Scalar>(&self, index: usize) -> Result<T> {
        let at = self.element_at(index, T::SIZE)?;
        read_at(self.buf, at)
    }

    pub fn scalars<T: Scalar>(&self) -> Result<Vec<T>> {
        Ok(self
            .elements(T::SIZE)?
            .chunks_exact(T::SIZE)
            .map(T::from_le)
            .collect())
    }

    pub fn string(&self, index: usize) -> Result<&'a str> {
        let at = self.element_at(index, UOFFSET_SIZE)?;
        read_str(self.buf, follow(self.buf, at)?)
    }

    pub fn table(&self, index: usize) -> Result<Table<'a>> {
        let at = self.element_at(index, UOFFSET_SIZE)?;
        Table::at(self.buf, follow(self.buf, at)?)
    }

    pub fn as_bytes(&self) -> Result<&'a [u8]> {
        self.elements(1)
    }
}
