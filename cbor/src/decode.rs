/*!
Recursive-descent decoding of a single data item.

The decoder reads one header, then either builds the item directly,
recurses for the children of lists, maps and tags, or loops over the
elements of an indefinite-length item until its break marker. Tags and
simple values are handed to the registries once their content is known.
*/

use super::*;
use config::DecoderConfig;
use cursor::{Cursor, SliceCursor};
use item::*;
use length::{Argument, MajorType};
use simple::SimpleRegistry;
use tag::TagRegistry;

/// A decoder bound to a pair of registries and its limits.
///
/// Decoding never mutates the decoder, so one instance can serve any
/// number of cursors, including from several threads at once.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    tags: TagRegistry,
    simple: SimpleRegistry,
    config: DecoderConfig,
}

impl Decoder {
    /// A decoder with the standard tag and simple value handlers.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registries(tags: TagRegistry, simple: SimpleRegistry) -> Self {
        Self {
            tags,
            simple,
            config: DecoderConfig::default(),
        }
    }

    pub fn with_config(self, config: DecoderConfig) -> Self {
        Self { config, ..self }
    }

    pub fn tags(&self) -> &TagRegistry {
        &self.tags
    }

    pub fn simple(&self) -> &SimpleRegistry {
        &self.simple
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Reads exactly one item from `cursor`.
    pub fn decode<C>(&self, cursor: &mut C) -> Result<DataItem, Error>
    where
        C: Cursor + ?Sized,
    {
        self.parse_value(cursor, 0)
    }

    /// Decodes the item at the start of `data`, returning it with the
    /// number of bytes it occupied.
    pub fn decode_slice(&self, data: &[u8]) -> Result<(DataItem, usize), Error> {
        let mut cursor = SliceCursor::new(data);
        let item = self.decode(&mut cursor)?;
        Ok((item, cursor.position()))
    }

    /// Decodes `data`, which must hold exactly one item.
    pub fn decode_all(&self, data: &[u8]) -> Result<DataItem, Error> {
        let (item, len) = self.decode_slice(data)?;
        if len != data.len() {
            return Err(Error::AdditionalData);
        }
        Ok(item)
    }

    /// Decodes consecutive items until `data` is exhausted.
    pub fn decode_sequence(&self, data: &[u8]) -> Result<Vec<DataItem>, Error> {
        let mut cursor = SliceCursor::new(data);
        let mut items = Vec::new();
        while !cursor.is_empty() {
            items.push(self.decode(&mut cursor)?);
        }
        Ok(items)
    }

    fn parse_value<C>(&self, cursor: &mut C, depth: usize) -> Result<DataItem, Error>
    where
        C: Cursor + ?Sized,
    {
        self.parse_item(cursor, false, depth)?
            .ok_or(Error::UnexpectedBreak)
    }

    /// Returns `None` for a break marker, which is only accepted when
    /// `breakable`.
    fn parse_item<C>(
        &self,
        cursor: &mut C,
        breakable: bool,
        depth: usize,
    ) -> Result<Option<DataItem>, Error>
    where
        C: Cursor + ?Sized,
    {
        if let Some(max_depth) = self.config.max_depth.filter(|max| depth > *max) {
            debug!("Nesting deeper than {max_depth}");
            return Err(Error::MaxDepthExceeded(max_depth));
        }

        let initial = cursor.read_byte()?;
        let major = initial >> 5;
        match initial & 0x1F {
            ai @ 28..=30 => Err(Error::InvalidAdditionalInformation(ai)),
            length::INDEFINITE => self.parse_indefinite(cursor, major, breakable, depth),
            ai => {
                let data = match length::trailing_len(ai) {
                    Some(len) => cursor.read_vec(len)?,
                    None => Vec::new(),
                };
                let argument = Argument::from_wire(ai, &data)?;
                self.parse_finite(cursor, major, argument, depth).map(Some)
            }
        }
    }

    fn parse_finite<C>(
        &self,
        cursor: &mut C,
        major: u8,
        argument: Argument,
        depth: usize,
    ) -> Result<DataItem, Error>
    where
        C: Cursor + ?Sized,
    {
        match MajorType::try_from(major)? {
            MajorType::Unsigned => Integer::from_argument(argument).map(DataItem::Unsigned),
            MajorType::Negative => Integer::from_argument(argument).map(DataItem::Negative),
            MajorType::Bytes => {
                let data = cursor.read_vec(argument.to_usize()?)?;
                Ok(DataItem::Bytes(ByteString::from_parts(argument, data)))
            }
            MajorType::Text => {
                let data = cursor.read_vec(argument.to_usize()?)?;
                let text = String::from_utf8(data).map_err(|e| Error::InvalidUtf8(e.utf8_error()))?;
                Ok(DataItem::Text(TextString::from_parts(argument, text)))
            }
            MajorType::List => {
                let count = argument.to_usize()?;
                let mut items = Vec::new();
                for _ in 0..count {
                    items.push(self.parse_value(cursor, depth + 1)?);
                }
                Ok(DataItem::List(List::from_parts(Some(argument), items)))
            }
            MajorType::Map => {
                let count = argument.to_usize()?;
                let mut entries = Vec::new();
                for _ in 0..count {
                    let key = self.parse_value(cursor, depth + 1)?;
                    let value = self.parse_value(cursor, depth + 1)?;
                    entries.push((key, value));
                }
                Ok(DataItem::Map(Map::from_parts(Some(argument), entries)))
            }
            MajorType::Tag => {
                let item = self.parse_value(cursor, depth + 1)?;
                self.tags.resolve(argument, item).map(DataItem::Tagged)
            }
            MajorType::Other => self
                .simple
                .resolve(argument.additional_information(), &argument.trailing_bytes())
                .map(DataItem::Simple),
        }
    }

    fn parse_indefinite<C>(
        &self,
        cursor: &mut C,
        major: u8,
        breakable: bool,
        depth: usize,
    ) -> Result<Option<DataItem>, Error>
    where
        C: Cursor + ?Sized,
    {
        match MajorType::try_from(major)? {
            MajorType::Bytes => {
                let mut chunks = Vec::new();
                while let Some(chunk) = self.parse_item(cursor, true, depth + 1)? {
                    match chunk {
                        DataItem::Bytes(b) => chunks.push(b),
                        other => {
                            return Err(Error::InvalidChunkType("byte string", other.type_name()));
                        }
                    }
                }
                Ok(Some(DataItem::ByteChunks(ByteChunks::new(chunks))))
            }
            MajorType::Text => {
                let mut chunks = Vec::new();
                while let Some(chunk) = self.parse_item(cursor, true, depth + 1)? {
                    match chunk {
                        DataItem::Text(t) => chunks.push(t),
                        other => {
                            return Err(Error::InvalidChunkType("text string", other.type_name()));
                        }
                    }
                }
                Ok(Some(DataItem::TextChunks(TextChunks::new(chunks))))
            }
            MajorType::List => {
                let mut items = Vec::new();
                while let Some(item) = self.parse_item(cursor, true, depth + 1)? {
                    items.push(item);
                }
                Ok(Some(DataItem::List(List::indefinite(items))))
            }
            MajorType::Map => {
                let mut entries = Vec::new();
                while let Some(key) = self.parse_item(cursor, true, depth + 1)? {
                    let value = self.parse_value(cursor, depth + 1)?;
                    entries.push((key, value));
                }
                Ok(Some(DataItem::Map(Map::indefinite(entries))))
            }
            MajorType::Other if breakable => Ok(None),
            MajorType::Other => Err(Error::UnexpectedBreak),
            _ => Err(Error::IndefiniteLengthNotAllowed(major)),
        }
    }
}

/// Decodes `data`, which must hold exactly one item, with the standard registries.
///
/// Nesting depth is not bounded here, so deeply nested input from an
/// untrusted source can exhaust the stack. Use a [`Decoder`] configured with
/// [`DecoderConfig::with_max_depth`] for such input.
pub fn decode(data: &[u8]) -> Result<DataItem, Error> {
    Decoder::new().decode_all(data)
}
