/*!
The CBOR data model: a closed set of item variants, each remembering the
header it was decoded from (or built with).

Items are built once, either by the decoder or through the constructors
here, and are not mutated afterwards. Children are owned exclusively by
their parent.
*/

use super::*;
use alloc::sync::Arc;
use core::fmt;
use length::{Argument, MajorType, compute_length, length_of_bytes, length_of_items};
use num_bigint::{BigInt, BigUint};

/// One CBOR data item.
#[derive(Debug, Clone, PartialEq)]
pub enum DataItem {
    /// Major type 0.
    Unsigned(Integer),
    /// Major type 1; the value is `-1 - magnitude`.
    Negative(Integer),
    Bytes(ByteString),
    Text(TextString),
    /// Indefinite-length byte string made of definite byte string chunks.
    ByteChunks(ByteChunks),
    /// Indefinite-length text string made of definite text string chunks.
    TextChunks(TextChunks),
    List(List),
    Map(Map),
    Tagged(Tagged),
    Simple(Simple),
}

impl DataItem {
    pub fn major_type(&self) -> MajorType {
        match self {
            Self::Unsigned(_) => MajorType::Unsigned,
            Self::Negative(_) => MajorType::Negative,
            Self::Bytes(_) | Self::ByteChunks(_) => MajorType::Bytes,
            Self::Text(_) | Self::TextChunks(_) => MajorType::Text,
            Self::List(_) => MajorType::List,
            Self::Map(_) => MajorType::Map,
            Self::Tagged(_) => MajorType::Tag,
            Self::Simple(_) => MajorType::Other,
        }
    }

    /// The low five bits of the initial byte.
    pub fn additional_information(&self) -> u8 {
        match self {
            Self::Unsigned(i) | Self::Negative(i) => i.argument.additional_information(),
            Self::Bytes(b) => b.length.additional_information(),
            Self::Text(t) => t.length.additional_information(),
            Self::ByteChunks(_) | Self::TextChunks(_) => length::INDEFINITE,
            Self::List(l) => l.length.map_or(length::INDEFINITE, |a| a.additional_information()),
            Self::Map(m) => m.length.map_or(length::INDEFINITE, |a| a.additional_information()),
            Self::Tagged(t) => t.tag.additional_information(),
            Self::Simple(s) => s.additional_information(),
        }
    }

    /// The bytes between the initial byte and the payload.
    pub fn trailing_bytes(&self) -> Vec<u8> {
        match self {
            Self::Unsigned(i) | Self::Negative(i) => i.argument.trailing_bytes(),
            Self::Bytes(b) => b.length.trailing_bytes(),
            Self::Text(t) => t.length.trailing_bytes(),
            Self::ByteChunks(_) | Self::TextChunks(_) => Vec::new(),
            Self::List(l) => l.length.map(|a| a.trailing_bytes()).unwrap_or_default(),
            Self::Map(m) => m.length.map(|a| a.trailing_bytes()).unwrap_or_default(),
            Self::Tagged(t) => t.tag.trailing_bytes(),
            Self::Simple(s) => s.trailing_bytes(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Unsigned(_) => "unsigned integer",
            Self::Negative(_) => "negative integer",
            Self::Bytes(_) => "byte string",
            Self::Text(_) => "text string",
            Self::ByteChunks(_) => "indefinite-length byte string",
            Self::TextChunks(_) => "indefinite-length text string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Tagged(_) => "tag",
            Self::Simple(s) => s.type_name(),
        }
    }

    pub fn null() -> Self {
        Self::Simple(Simple::Null)
    }

    pub fn undefined() -> Self {
        Self::Simple(Simple::Undefined)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Unsigned(_) | Self::Negative(_))
    }

    /// True for definite and indefinite byte strings.
    pub fn is_bytes(&self) -> bool {
        matches!(self, Self::Bytes(_) | Self::ByteChunks(_))
    }

    /// True for definite and indefinite text strings.
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_) | Self::TextChunks(_))
    }

    /// The integer value of a major type 0 or 1 item.
    pub fn to_big_int(&self) -> Option<BigInt> {
        match self {
            Self::Unsigned(i) => Some(BigInt::from(i.magnitude())),
            Self::Negative(i) => Some(num::negate_magnitude(i.big_magnitude())),
            _ => None,
        }
    }

    pub fn to_u64(&self) -> Result<u64, Error> {
        match self {
            Self::Unsigned(i) => Ok(i.magnitude()),
            _ => Err(Error::Overflow),
        }
    }

    pub fn to_i64(&self) -> Result<i64, Error> {
        match self {
            Self::Unsigned(i) => i64::try_from(i.magnitude()).map_err(|_| Error::Overflow),
            Self::Negative(i) => i64::try_from(i.magnitude())
                .map(|m| -1 - m)
                .map_err(|_| Error::Overflow),
            _ => Err(Error::Overflow),
        }
    }

    /// The content of a definite or indefinite byte string, chunks concatenated.
    pub fn to_bytes(&self) -> Option<Vec<u8>> {
        match self {
            Self::Bytes(b) => Some(b.data.clone()),
            Self::ByteChunks(c) => Some(c.concat()),
            _ => None,
        }
    }

    /// The content of a definite or indefinite text string, chunks concatenated.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Text(t) => Some(t.text.clone()),
            Self::TextChunks(c) => Some(c.concat()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_tagged(&self) -> Option<&Tagged> {
        match self {
            Self::Tagged(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_simple(&self) -> Option<&Simple> {
        match self {
            Self::Simple(s) => Some(s),
            _ => None,
        }
    }
}

/// The header argument of an integer item. The magnitude never exceeds 64 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Integer {
    argument: Argument,
}

impl Integer {
    pub fn new(magnitude: u64) -> Self {
        Self {
            argument: compute_length(magnitude),
        }
    }

    /// Keeps a specific header width, e.g. a non-shortest one.
    pub fn from_argument(argument: Argument) -> Result<Self, Error> {
        argument.check()?;
        Ok(Self { argument })
    }

    pub fn argument(&self) -> &Argument {
        &self.argument
    }

    pub fn magnitude(&self) -> u64 {
        self.argument.value()
    }

    pub fn big_magnitude(&self) -> BigUint {
        BigUint::from(self.argument.value())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ByteString {
    length: Argument,
    data: Vec<u8>,
}

impl ByteString {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        let data = data.into();
        Self {
            length: length_of_bytes(&data),
            data,
        }
    }

    /// Pairs `data` with the header it arrived with.
    pub(crate) fn from_parts(length: Argument, data: Vec<u8>) -> Self {
        Self { length, data }
    }

    pub fn length(&self) -> &Argument {
        &self.length
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextString {
    length: Argument,
    text: String,
}

impl TextString {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            length: length_of_bytes(text.as_bytes()),
            text,
        }
    }

    pub(crate) fn from_parts(length: Argument, text: String) -> Self {
        Self { length, text }
    }

    pub fn length(&self) -> &Argument {
        &self.length
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

/// An indefinite-length byte string. Only definite byte strings can be chunks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteChunks {
    chunks: Vec<ByteString>,
}

impl ByteChunks {
    pub fn new(chunks: Vec<ByteString>) -> Self {
        Self { chunks }
    }

    pub fn chunks(&self) -> &[ByteString] {
        &self.chunks
    }

    pub fn concat(&self) -> Vec<u8> {
        self.chunks.iter().fold(Vec::new(), |mut v, c| {
            v.extend_from_slice(&c.data);
            v
        })
    }
}

/// An indefinite-length text string. Only definite text strings can be chunks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TextChunks {
    chunks: Vec<TextString>,
}

impl TextChunks {
    pub fn new(chunks: Vec<TextString>) -> Self {
        Self { chunks }
    }

    pub fn chunks(&self) -> &[TextString] {
        &self.chunks
    }

    pub fn concat(&self) -> String {
        self.chunks.iter().map(|c| c.as_str()).collect()
    }
}

/// An ordered sequence of items. `length` is `None` for indefinite-length lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct List {
    length: Option<Argument>,
    items: Vec<DataItem>,
}

impl List {
    pub fn new(items: Vec<DataItem>) -> Self {
        Self {
            length: Some(length_of_items(items.len())),
            items,
        }
    }

    pub fn indefinite(items: Vec<DataItem>) -> Self {
        Self {
            length: None,
            items,
        }
    }

    pub(crate) fn from_parts(length: Option<Argument>, items: Vec<DataItem>) -> Self {
        Self { length, items }
    }

    pub fn length(&self) -> Option<&Argument> {
        self.length.as_ref()
    }

    pub fn is_definite(&self) -> bool {
        self.length.is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DataItem> {
        self.items.get(index)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, DataItem> {
        self.items.iter()
    }

    pub fn into_items(self) -> Vec<DataItem> {
        self.items
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a DataItem;
    type IntoIter = core::slice::Iter<'a, DataItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Key/value pairs in encounter order. Duplicate keys are kept as they are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Map {
    length: Option<Argument>,
    entries: Vec<(DataItem, DataItem)>,
}

impl Map {
    pub fn new(entries: Vec<(DataItem, DataItem)>) -> Self {
        Self {
            length: Some(length_of_items(entries.len())),
            entries,
        }
    }

    pub fn indefinite(entries: Vec<(DataItem, DataItem)>) -> Self {
        Self {
            length: None,
            entries,
        }
    }

    pub(crate) fn from_parts(length: Option<Argument>, entries: Vec<(DataItem, DataItem)>) -> Self {
        Self { length, entries }
    }

    pub fn length(&self) -> Option<&Argument> {
        self.length.as_ref()
    }

    pub fn is_definite(&self) -> bool {
        self.length.is_some()
    }

    /// The number of pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The value of the first pair whose key equals `key`.
    pub fn get(&self, key: &DataItem) -> Option<&DataItem> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, (DataItem, DataItem)> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> Vec<(DataItem, DataItem)> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a Map {
    type Item = &'a (DataItem, DataItem);
    type IntoIter = core::slice::Iter<'a, (DataItem, DataItem)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A tag number annotating exactly one item.
///
/// Tags resolved through a [`TagRegistry`](crate::tag::TagRegistry) keep the
/// handler that accepted them; it drives normalization. Equality only looks
/// at the tag header and the item.
#[derive(Clone)]
pub struct Tagged {
    tag: Argument,
    item: Box<DataItem>,
    handler: Option<Arc<dyn tag::TagHandler>>,
}

impl Tagged {
    /// An uninterpreted tag, as produced for unregistered tag numbers.
    pub fn new(tag: u64, item: DataItem) -> Self {
        Self::from_parts(compute_length(tag), item, None)
    }

    pub(crate) fn from_parts(
        tag: Argument,
        item: DataItem,
        handler: Option<Arc<dyn tag::TagHandler>>,
    ) -> Self {
        Self {
            tag,
            item: Box::new(item),
            handler,
        }
    }

    pub fn tag(&self) -> u64 {
        self.tag.value()
    }

    pub fn argument(&self) -> &Argument {
        &self.tag
    }

    pub fn item(&self) -> &DataItem {
        &self.item
    }

    pub fn into_item(self) -> DataItem {
        *self.item
    }

    pub fn handler(&self) -> Option<&Arc<dyn tag::TagHandler>> {
        self.handler.as_ref()
    }

    /// The registered name of the tag, `None` for generic tags.
    pub fn name(&self) -> Option<&'static str> {
        self.handler.as_ref().map(|h| h.name())
    }
}

impl PartialEq for Tagged {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && self.item == other.item
    }
}

impl fmt::Debug for Tagged {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tagged")
            .field("tag", &self.tag)
            .field("name", &self.name())
            .field("item", &self.item)
            .finish()
    }
}

/// Major type 7 items.
#[derive(Debug, Clone, PartialEq)]
pub enum Simple {
    False,
    True,
    Null,
    Undefined,
    /// A simple value carried in the following byte (additional information 24).
    Value(u8),
    Half(half::f16),
    Single(f32),
    Double(f64),
    /// A value with no registered meaning, kept verbatim. Built through
    /// [`Simple::generic`].
    Generic(GenericSimple),
}

/// The header of a major type 7 item nobody interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenericSimple {
    additional_information: u8,
    data: Vec<u8>,
}

impl GenericSimple {
    pub fn additional_information(&self) -> u8 {
        self.additional_information
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl Simple {
    /// A verbatim simple value.
    ///
    /// `data` must have the width announced by `additional_information`, and
    /// may not start with a byte below 32: that range is reserved for the
    /// meanings defined by the standard simple values.
    pub fn generic(additional_information: u8, data: &[u8]) -> Result<Self, Error> {
        if additional_information > length::LENGTH_8_BYTES
            || length::trailing_len(additional_information).unwrap_or(0) != data.len()
            || data.first().is_some_and(|b| *b < 32)
        {
            return Err(Error::InvalidSimpleValue(additional_information));
        }
        Ok(Self::Generic(GenericSimple {
            additional_information,
            data: data.to_vec(),
        }))
    }

    pub fn additional_information(&self) -> u8 {
        match self {
            Self::False => 20,
            Self::True => 21,
            Self::Null => 22,
            Self::Undefined => 23,
            Self::Value(_) => length::LENGTH_1_BYTE,
            Self::Half(_) => length::LENGTH_2_BYTES,
            Self::Single(_) => length::LENGTH_4_BYTES,
            Self::Double(_) => length::LENGTH_8_BYTES,
            Self::Generic(g) => g.additional_information,
        }
    }

    pub fn trailing_bytes(&self) -> Vec<u8> {
        match self {
            Self::Value(v) => alloc::vec![*v],
            Self::Half(f) => f.to_be_bytes().to_vec(),
            Self::Single(f) => f.to_be_bytes().to_vec(),
            Self::Double(f) => f.to_be_bytes().to_vec(),
            Self::Generic(g) => g.data.clone(),
            _ => Vec::new(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::False | Self::True => "boolean",
            Self::Null => "null",
            Self::Undefined => "undefined",
            Self::Value(_) | Self::Generic(_) => "simple value",
            Self::Half(_) | Self::Single(_) | Self::Double(_) => "float",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::False => Some(false),
            Self::True => Some(true),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Half(f) => Some(f64::from(*f)),
            Self::Single(f) => Some(*f as f64),
            Self::Double(f) => Some(*f),
            _ => None,
        }
    }
}

macro_rules! impl_uint_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for DataItem {
                fn from(value: $ty) -> Self {
                    Self::Unsigned(Integer::new(value as u64))
                }
            }
        )*
    };
}

impl_uint_from!(u8, u16, u32, u64, usize);

macro_rules! impl_int_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for DataItem {
                fn from(value: $ty) -> Self {
                    let value = value as i64;
                    if value >= 0 {
                        Self::Unsigned(Integer::new(value as u64))
                    } else {
                        Self::Negative(Integer::new(!value as u64))
                    }
                }
            }
        )*
    };
}

impl_int_from!(i8, i16, i32, i64, isize);

fn lossless_float_coerce<T>(value: f64) -> Option<T>
where
    T: num_traits::FromPrimitive + Into<f64> + Copy,
{
    match <T as num_traits::FromPrimitive>::from_f64(value) {
        Some(f) if <T as Into<f64>>::into(f) == value => Some(f),
        _ => None,
    }
}

impl From<f64> for DataItem {
    /// Uses the narrowest float width that holds `value` exactly.
    fn from(value: f64) -> Self {
        Self::Simple(if let Some(f) = lossless_float_coerce::<half::f16>(value) {
            Simple::Half(f)
        } else if let Some(f) = lossless_float_coerce::<f32>(value) {
            Simple::Single(f)
        } else {
            Simple::Double(value)
        })
    }
}

impl From<f32> for DataItem {
    fn from(value: f32) -> Self {
        Self::Simple(match lossless_float_coerce::<half::f16>(value as f64) {
            Some(f) => Simple::Half(f),
            None => Simple::Single(value),
        })
    }
}

impl From<half::f16> for DataItem {
    fn from(value: half::f16) -> Self {
        Self::Simple(Simple::Half(value))
    }
}

impl From<bool> for DataItem {
    fn from(value: bool) -> Self {
        Self::Simple(if value { Simple::True } else { Simple::False })
    }
}

impl From<&str> for DataItem {
    fn from(value: &str) -> Self {
        Self::Text(TextString::new(value))
    }
}

impl From<String> for DataItem {
    fn from(value: String) -> Self {
        Self::Text(TextString::new(value))
    }
}

impl From<&[u8]> for DataItem {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(ByteString::new(value))
    }
}

impl From<Vec<u8>> for DataItem {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(ByteString::new(value))
    }
}

impl From<Vec<DataItem>> for DataItem {
    fn from(value: Vec<DataItem>) -> Self {
        Self::List(List::new(value))
    }
}

impl From<ByteString> for DataItem {
    fn from(value: ByteString) -> Self {
        Self::Bytes(value)
    }
}

impl From<TextString> for DataItem {
    fn from(value: TextString) -> Self {
        Self::Text(value)
    }
}

impl From<ByteChunks> for DataItem {
    fn from(value: ByteChunks) -> Self {
        Self::ByteChunks(value)
    }
}

impl From<TextChunks> for DataItem {
    fn from(value: TextChunks) -> Self {
        Self::TextChunks(value)
    }
}

impl From<List> for DataItem {
    fn from(value: List) -> Self {
        Self::List(value)
    }
}

impl From<Map> for DataItem {
    fn from(value: Map) -> Self {
        Self::Map(value)
    }
}

impl From<Tagged> for DataItem {
    fn from(value: Tagged) -> Self {
        Self::Tagged(value)
    }
}

impl From<Simple> for DataItem {
    fn from(value: Simple) -> Self {
        Self::Simple(value)
    }
}

/// Diagnostic notation (RFC 8949 §8), e.g. `[_ 1, h'0102', 24(h'40')]`.
impl fmt::Display for DataItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsigned(i) => write!(f, "{}", i.magnitude()),
            Self::Negative(_) => match self.to_big_int() {
                Some(v) => write!(f, "{v}"),
                None => Ok(()),
            },
            Self::Bytes(b) => write_hex(f, &b.data),
            Self::Text(t) => write!(f, "{:?}", t.text),
            Self::ByteChunks(c) => {
                f.write_str("(_ ")?;
                for (i, chunk) in c.chunks.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_hex(f, &chunk.data)?;
                }
                f.write_str(")")
            }
            Self::TextChunks(c) => {
                f.write_str("(_ ")?;
                for (i, chunk) in c.chunks.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{:?}", chunk.text)?;
                }
                f.write_str(")")
            }
            Self::List(l) => {
                f.write_str(if l.is_definite() { "[" } else { "[_ " })?;
                for (i, item) in l.items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Map(m) => {
                f.write_str(if m.is_definite() { "{" } else { "{_ " })?;
                for (i, (k, v)) in m.entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Self::Tagged(t) => write!(f, "{}({})", t.tag(), t.item),
            Self::Simple(s) => match s {
                Simple::False => f.write_str("false"),
                Simple::True => f.write_str("true"),
                Simple::Null => f.write_str("null"),
                Simple::Undefined => f.write_str("undefined"),
                Simple::Value(v) => write!(f, "simple({v})"),
                Simple::Generic(g) => match g.data.first() {
                    Some(v) => write!(f, "simple({v})"),
                    None => write!(f, "simple({})", g.additional_information),
                },
                Simple::Half(_) | Simple::Single(_) | Simple::Double(_) => {
                    let v = s.as_f64().unwrap_or_default();
                    if v.is_nan() {
                        f.write_str("NaN")
                    } else if v.is_infinite() {
                        f.write_str(if v > 0.0 { "Infinity" } else { "-Infinity" })
                    } else {
                        write!(f, "{v:?}")
                    }
                }
            },
        }
    }
}

fn write_hex(f: &mut fmt::Formatter<'_>, data: &[u8]) -> fmt::Result {
    f.write_str("h'")?;
    for b in data {
        write!(f, "{b:02x}")?;
    }
    f.write_str("'")
}
