//! Back-to-front table writer.

use bytemuck::Pod;

use super::schema::{FieldDef, WireType};
use super::{Scalar, UOFFSET_SIZE};

/// Location of a finished string, vector or table.
///
/// Measured from the end of the buffer, which stays stable while the buffer
/// grows towards the front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offset(u32);

impl Offset {
    /// Raw distance from the end of the buffer.
    pub fn value(self) -> u32 {
        self.0
    }
}

/// Growable buffer that accumulates tables bottom-up.
///
/// Data lives in `buf[head..]`; every write moves `head` towards zero.
#[derive(Debug)]
pub struct Builder {
    buf: Vec<u8>,
    head: usize,
    min_align: usize,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![0; capacity],
            head: capacity,
            min_align: 1,
        }
    }

    /// Bytes written so far.
    #[inline]
    fn used(&self) -> usize {
        self.buf.len() - self.head
    }

    /// Make room for `additional` bytes in front of `head`.
    fn reserve(&mut self, additional: usize) {
        if additional <= self.head {
            return;
        }
        let used = self.used();
        let mut capacity = self.buf.len().max(64);
        while capacity - used < additional {
            capacity *= 2;
        }
        let mut grown = vec![0u8; capacity];
        grown[capacity - used..].copy_from_slice(&self.buf[self.head..]);
        self.buf = grown;
        self.head = capacity - used;
    }

    fn pad(&mut self, n: usize) {
        self.reserve(n);
        self.buf[self.head - n..self.head].fill(0);
        self.head -= n;
    }

    /// Pad so that after writing `additional` bytes the next `size`-byte value
    /// is aligned to `size`.
    fn prep(&mut self, size: usize, additional: usize) {
        self.min_align = self.min_align.max(size);
        let align = (!(self.used() + additional)).wrapping_add(1) & (size - 1);
        self.reserve(align + size + additional);
        self.pad(align);
    }

    fn place_bytes(&mut self, bytes: &[u8]) {
        self.reserve(bytes.len());
        self.head -= bytes.len();
        self.buf[self.head..self.head + bytes.len()].copy_from_slice(bytes);
    }

    fn place<T: Scalar>(&mut self, value: T) {
        self.reserve(T::SIZE);
        self.head -= T::SIZE;
        value.write_le(&mut self.buf[self.head..self.head + T::SIZE]);
    }

    fn push<T: Scalar>(&mut self, value: T) {
        self.prep(T::SIZE, 0);
        self.place(value);
    }

    /// Write a `u32` offset pointing forward at `target`.
    fn push_uoffset(&mut self, target: Offset) {
        self.prep(UOFFSET_SIZE, 0);
        debug_assert!(target.0 as usize <= self.used(), "offset must refer to written data");
        let relative = (self.used() + UOFFSET_SIZE) as u32 - target.0;
        self.place(relative);
    }

    fn end_vector(&mut self, len: usize) -> Offset {
        self.place(len as u32);
        Offset(self.used() as u32)
    }

    /// Write a length-prefixed, zero-terminated string.
    pub fn create_string(&mut self, s: &str) -> Offset {
        let bytes = s.as_bytes();
        self.prep(UOFFSET_SIZE, bytes.len() + 1);
        self.place(0u8);
        self.place_bytes(bytes);
        self.end_vector(bytes.len())
    }

    /// Write every string, then a vector referring to them in order.
    pub fn create_strings<S: AsRef<str>>(&mut self, items: &[S]) -> Offset {
        let offsets: Vec<Offset> = items
            .iter()
            .map(|s| self.create_string(s.as_ref()))
            .collect();
        self.create_offset_vector(&offsets)
    }

    /// Write a vector of offsets to already finished strings or tables.
    pub fn create_offset_vector(&mut self, items: &[Offset]) -> Offset {
        self.prep(UOFFSET_SIZE, UOFFSET_SIZE * items.len());
        for &item in items.iter().rev() {
            self.push_uoffset(item);
        }
        self.end_vector(items.len())
    }

    /// Write a vector of inline scalars.
    pub fn create_scalar_vector<T: Scalar>(&mut self, items: &[T]) -> Offset {
        let bytes = T::SIZE * items.len();
        self.prep(UOFFSET_SIZE, bytes);
        self.prep(T::SIZE, bytes);
        for &item in items.iter().rev() {
            self.place(item);
        }
        self.end_vector(items.len())
    }

    /// Write a raw byte vector.
    pub fn create_byte_vector(&mut self, bytes: &[u8]) -> Offset {
        self.prep(UOFFSET_SIZE, bytes.len());
        self.place_bytes(bytes);
        self.end_vector(bytes.len())
    }

    /// Open a table. Nothing else can be written until it is finished.
    pub fn start_table(&mut self) -> TableWriter<'_> {
        let start = self.used();
        TableWriter {
            builder: self,
            start,
            fields: Vec::new(),
        }
    }

    /// Write the root offset and return the finished buffer.
    pub fn finish(mut self, root: Offset) -> Vec<u8> {
        self.prep(self.min_align, UOFFSET_SIZE);
        self.push_uoffset(root);
        self.buf.split_off(self.head)
    }
}

/// A table under construction.
///
/// Borrows the [`Builder`] mutably, so child strings, vectors and tables must
/// all be finished before the parent table is started.
#[derive(Debug)]
pub struct TableWriter<'b> {
    builder: &'b mut Builder,
    start: usize,
    fields: Vec<(u16, usize)>,
}

impl TableWriter<'_> {
    fn record(&mut self, field: &FieldDef) {
        self.fields.push((field.slot, self.builder.used()));
    }

    /// Add an inline scalar; values bitwise equal to `default` are left out.
    pub fn add_scalar<T: Scalar>(&mut self, field: &FieldDef, value: T, default: T) {
        debug_assert_eq!(field.wire, WireType::Scalar(T::KIND), "field '{}'", field.name);
        if value.same_bits(default) {
            return;
        }
        self.builder.push(value);
        self.record(field);
    }

    /// Add an inline fixed-size struct.
    pub fn add_struct<S: Pod>(&mut self, field: &FieldDef, value: &S) {
        debug_assert_eq!(
            field.wire,
            WireType::Struct(std::mem::size_of::<S>()),
            "field '{}'",
            field.name
        );
        self.builder
            .prep(std::mem::align_of::<S>(), std::mem::size_of::<S>());
        self.builder.place_bytes(bytemuck::bytes_of(value));
        self.record(field);
    }

    /// Add an offset to a finished string, vector or table.
    pub fn add_offset(&mut self, field: &FieldDef, offset: Offset) {
        debug_assert!(field.wire.is_offset(), "field '{}'", field.name);
        self.builder.push_uoffset(offset);
        self.record(field);
    }

    /// Write the vtable and close the table.
    pub fn finish(self) -> Offset {
        let TableWriter {
            builder,
            start,
            fields,
        } = self;

        builder.push(0i32);
        let object = builder.used();

        let slot_count = fields
            .iter()
            .map(|&(slot, _)| slot as usize + 1)
            .max()
            .unwrap_or(0);
        let mut entries = vec![0u16; slot_count];
        for (slot, at) in fields {
            debug_assert!(object - at <= u16::MAX as usize);
            entries[slot as usize] = (object - at) as u16;
        }

        for &entry in entries.iter().rev() {
            builder.push(entry);
        }
        builder.push((object - start) as u16);
        builder.push(((slot_count + 2) * 2) as u16);

        // The table's soffset points back at the vtable just written.
        let vtable = builder.used();
        let table_at = builder.buf.len() - object;
        let soffset = (vtable - object) as i32;
        builder.buf[table_at..table_at + 4].copy_from_slice(&soffset.to_le_bytes());

        Offset(object as u32)
    }
}
