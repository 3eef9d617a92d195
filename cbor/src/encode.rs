/*!
Serialization of [`DataItem`](crate::item::DataItem)s.

Every item writes back the header it carries, so an item produced by the
decoder encodes to exactly the bytes it was read from, and an item built
through the constructors encodes in shortest form.
*/

use super::*;
use item::*;
use length::{Argument, MajorType};

pub trait ToCbor {
    fn to_cbor(&self, encoder: &mut Encoder);
}

#[derive(Debug, Default)]
pub struct Encoder {
    data: Vec<u8>,
}

impl Encoder {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }

    pub fn offset(&self) -> usize {
        self.data.len()
    }

    /// Writes an initial byte and the argument bytes that follow it.
    pub fn emit_header(&mut self, major: MajorType, argument: &Argument) {
        self.data
            .push(major.initial_byte(argument.additional_information()));
        match argument {
            Argument::Immediate(_) => {}
            Argument::U8(v) => self.data.push(*v),
            Argument::U16(v) => self.data.extend(v.to_be_bytes()),
            Argument::U32(v) => self.data.extend(v.to_be_bytes()),
            Argument::U64(v) => self.data.extend(v.to_be_bytes()),
        }
    }

    pub fn emit_indefinite(&mut self, major: MajorType) {
        self.data.push(major.initial_byte(length::INDEFINITE))
    }

    pub fn emit_break(&mut self) {
        self.data.push(length::BREAK)
    }

    pub fn emit_raw_slice(&mut self, data: &[u8]) {
        self.data.extend_from_slice(data)
    }

    pub fn emit<T>(&mut self, value: &T)
    where
        T: ToCbor + ?Sized,
    {
        value.to_cbor(self)
    }
}

/// Encodes `value` into a new buffer.
pub fn emit<T>(value: &T) -> Vec<u8>
where
    T: ToCbor + ?Sized,
{
    let mut e = Encoder::new();
    e.emit(value);
    e.build()
}

impl ToCbor for DataItem {
    fn to_cbor(&self, encoder: &mut Encoder) {
        match self {
            Self::Unsigned(i) => encoder.emit_header(MajorType::Unsigned, i.argument()),
            Self::Negative(i) => encoder.emit_header(MajorType::Negative, i.argument()),
            Self::Bytes(b) => b.to_cbor(encoder),
            Self::Text(t) => t.to_cbor(encoder),
            Self::ByteChunks(c) => c.to_cbor(encoder),
            Self::TextChunks(c) => c.to_cbor(encoder),
            Self::List(l) => l.to_cbor(encoder),
            Self::Map(m) => m.to_cbor(encoder),
            Self::Tagged(t) => t.to_cbor(encoder),
            Self::Simple(s) => s.to_cbor(encoder),
        }
    }
}

impl ToCbor for ByteString {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.emit_header(MajorType::Bytes, self.length());
        encoder.emit_raw_slice(self.data())
    }
}

impl ToCbor for TextString {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.emit_header(MajorType::Text, self.length());
        encoder.emit_raw_slice(self.as_str().as_bytes())
    }
}

impl ToCbor for ByteChunks {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.emit_indefinite(MajorType::Bytes);
        for chunk in self.chunks() {
            chunk.to_cbor(encoder);
        }
        encoder.emit_break()
    }
}

impl ToCbor for TextChunks {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.emit_indefinite(MajorType::Text);
        for chunk in self.chunks() {
            chunk.to_cbor(encoder);
        }
        encoder.emit_break()
    }
}

impl ToCbor for List {
    fn to_cbor(&self, encoder: &mut Encoder) {
        match self.length() {
            Some(length) => encoder.emit_header(MajorType::List, length),
            None => encoder.emit_indefinite(MajorType::List),
        }
        for item in self {
            item.to_cbor(encoder);
        }
        if !self.is_definite() {
            encoder.emit_break()
        }
    }
}

impl ToCbor for Map {
    fn to_cbor(&self, encoder: &mut Encoder) {
        match self.length() {
            Some(length) => encoder.emit_header(MajorType::Map, length),
            None => encoder.emit_indefinite(MajorType::Map),
        }
        for (k, v) in self {
            k.to_cbor(encoder);
            v.to_cbor(encoder);
        }
        if !self.is_definite() {
            encoder.emit_break()
        }
    }
}

impl ToCbor for Tagged {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.emit_header(MajorType::Tag, self.argument());
        self.item().to_cbor(encoder)
    }
}

impl ToCbor for Simple {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder
            .data
            .push(MajorType::Other.initial_byte(self.additional_information()));
        encoder.data.extend(self.trailing_bytes())
    }
}

macro_rules! impl_to_cbor_via_item {
    ($($ty:ty),*) => {
        $(
            impl ToCbor for $ty {
                fn to_cbor(&self, encoder: &mut Encoder) {
                    DataItem::from(*self).to_cbor(encoder)
                }
            }
        )*
    };
}

impl_to_cbor_via_item!(
    u8,
    u16,
    u32,
    u64,
    usize,
    i8,
    i16,
    i32,
    i64,
    isize,
    f64,
    f32,
    half::f16,
    bool
);

impl ToCbor for str {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.emit_header(MajorType::Text, &length::length_of_bytes(self.as_bytes()));
        encoder.emit_raw_slice(self.as_bytes())
    }
}

impl ToCbor for [u8] {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.emit_header(MajorType::Bytes, &length::length_of_bytes(self));
        encoder.emit_raw_slice(self)
    }
}

impl<T: ToCbor + ?Sized> ToCbor for &T {
    fn to_cbor(&self, encoder: &mut Encoder) {
        (**self).to_cbor(encoder)
    }
}

impl<T: ToCbor + ?Sized> ToCbor for Box<T> {
    fn to_cbor(&self, encoder: &mut Encoder) {
        (**self).to_cbor(encoder)
    }
}
