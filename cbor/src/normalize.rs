/*!
Best-effort projection of data items onto native values.

Normalization forgets the wire form: header widths, indefinite lengths and
string chunking all disappear. Registered tags decide how they project
through [`TagHandler::normalize`](crate::tag::TagHandler::normalize).
*/

use super::*;
use item::{DataItem, Simple, Tagged};
use num_bigint::BigInt;

#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Integer(BigInt),
    Bytes(Vec<u8>),
    Text(String),
    List(Vec<Normalized>),
    /// Pairs in encounter order, duplicates included.
    Map(Vec<(Normalized, Normalized)>),
    Bool(bool),
    Null,
    Undefined,
    Float(f64),
    Simple(u8),
    /// `mantissa * base ^ exponent`, from decimal fractions and bigfloats.
    Fraction {
        base: u32,
        exponent: BigInt,
        mantissa: BigInt,
    },
    /// A tag with no native projection, around its normalized operand.
    Tagged(u64, Box<Normalized>),
}

pub trait Normalize {
    fn normalize(&self) -> Result<Normalized, Error>;
}

impl Normalize for DataItem {
    fn normalize(&self) -> Result<Normalized, Error> {
        match self {
            Self::Unsigned(_) | Self::Negative(_) => self
                .to_big_int()
                .map(Normalized::Integer)
                .ok_or(Error::Overflow),
            Self::Bytes(b) => Ok(Normalized::Bytes(b.data().to_vec())),
            Self::ByteChunks(c) => Ok(Normalized::Bytes(c.concat())),
            Self::Text(t) => Ok(Normalized::Text(t.as_str().into())),
            Self::TextChunks(c) => Ok(Normalized::Text(c.concat())),
            Self::List(l) => l
                .iter()
                .map(Normalize::normalize)
                .collect::<Result<_, _>>()
                .map(Normalized::List),
            Self::Map(m) => m
                .iter()
                .map(|(k, v)| -> Result<_, Error> { Ok((k.normalize()?, v.normalize()?)) })
                .collect::<Result<_, _>>()
                .map(Normalized::Map),
            Self::Tagged(t) => t.normalize(),
            Self::Simple(s) => s.normalize(),
        }
    }
}

impl Normalize for Tagged {
    fn normalize(&self) -> Result<Normalized, Error> {
        match self.handler() {
            Some(handler) => handler.normalize(self),
            None => Ok(Normalized::Tagged(
                self.tag(),
                Box::new(self.item().normalize()?),
            )),
        }
    }
}

impl Normalize for Simple {
    fn normalize(&self) -> Result<Normalized, Error> {
        match self {
            Self::False => Ok(Normalized::Bool(false)),
            Self::True => Ok(Normalized::Bool(true)),
            Self::Null => Ok(Normalized::Null),
            Self::Undefined => Ok(Normalized::Undefined),
            Self::Value(v) => Ok(Normalized::Simple(*v)),
            Self::Half(_) | Self::Single(_) | Self::Double(_) => {
                Ok(Normalized::Float(self.as_f64().unwrap_or(f64::NAN)))
            }
            Self::Generic(g) => match (g.additional_information(), g.data()) {
                (ai, []) if ai < length::LENGTH_1_BYTE => Ok(Normalized::Simple(ai)),
                (length::LENGTH_1_BYTE, [v]) => Ok(Normalized::Simple(*v)),
                (ai, _) => Err(Error::InvalidSimpleValue(ai)),
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use alloc::vec;
    use item::{List, Map, TextChunks, TextString};

    #[test]
    fn scalars() {
        assert_eq!(
            DataItem::from(-500i16).normalize().unwrap(),
            Normalized::Integer(BigInt::from(-500))
        );
        assert_eq!(
            DataItem::from(1.5f32).normalize().unwrap(),
            Normalized::Float(1.5)
        );
        assert_eq!(
            DataItem::from(false).normalize().unwrap(),
            Normalized::Bool(false)
        );
        assert_eq!(
            DataItem::Simple(Simple::generic(16, &[]).unwrap())
                .normalize()
                .unwrap(),
            Normalized::Simple(16)
        );
        assert!(matches!(
            DataItem::Simple(Simple::generic(25, &[0x40, 0]).unwrap()).normalize(),
            Err(Error::InvalidSimpleValue(25))
        ));
    }

    #[test]
    fn containers() {
        let item = DataItem::Map(Map::indefinite(vec![
            (
                "a".into(),
                DataItem::List(List::indefinite(vec![1u8.into()])),
            ),
            (
                "b".into(),
                TextChunks::new(vec![TextString::new("x"), TextString::new("y")]).into(),
            ),
        ]));
        assert_eq!(
            item.normalize().unwrap(),
            Normalized::Map(vec![
                (
                    Normalized::Text("a".into()),
                    Normalized::List(vec![Normalized::Integer(BigInt::from(1))])
                ),
                (Normalized::Text("b".into()), Normalized::Text("xy".into())),
            ])
        );
    }

    #[test]
    fn unregistered_tag() {
        let item = DataItem::Tagged(Tagged::new(1000, "x".into()));
        assert_eq!(
            item.normalize().unwrap(),
            Normalized::Tagged(1000, Box::new(Normalized::Text("x".into())))
        );
    }
}
