/*!
The header shared by every CBOR item: a major type in the top three bits of
the initial byte, and an argument that is either carried directly in the low
five bits or in 1, 2, 4 or 8 big-endian bytes that follow.
*/

use super::*;

/// Additional information values that announce trailing argument bytes.
pub const LENGTH_1_BYTE: u8 = 24;
pub const LENGTH_2_BYTES: u8 = 25;
pub const LENGTH_4_BYTES: u8 = 26;
pub const LENGTH_8_BYTES: u8 = 27;

/// Additional information value for indefinite length, or break in major type 7.
pub const INDEFINITE: u8 = 31;

/// The one-byte break marker.
pub const BREAK: u8 = (7 << 5) | INDEFINITE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum MajorType {
    Unsigned = 0,
    Negative = 1,
    Bytes = 2,
    Text = 3,
    List = 4,
    Map = 5,
    Tag = 6,
    Other = 7,
}

impl MajorType {
    /// Returns the initial byte for this major type and `additional_information`.
    pub fn initial_byte(self, additional_information: u8) -> u8 {
        ((self as u8) << 5) | (additional_information & 0x1F)
    }
}

impl TryFrom<u8> for MajorType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Unsigned),
            1 => Ok(Self::Negative),
            2 => Ok(Self::Bytes),
            3 => Ok(Self::Text),
            4 => Ok(Self::List),
            5 => Ok(Self::Map),
            6 => Ok(Self::Tag),
            7 => Ok(Self::Other),
            _ => Err(Error::UnsupportedMajorType(value)),
        }
    }
}

/// A definite header argument, remembering the width it was (or will be) encoded with.
///
/// Keeping the width rather than just the value is what lets a decoded item
/// re-encode to exactly the bytes it was read from, even when the sender did
/// not use the shortest form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Argument {
    /// 0..=23, held in the additional information itself.
    Immediate(u8),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
}

impl Argument {
    /// Builds an argument from its wire form: `data` must be empty for
    /// `additional_information` below 24, or exactly the announced width.
    pub fn from_wire(additional_information: u8, data: &[u8]) -> Result<Self, Error> {
        match (additional_information, trailing_len(additional_information)) {
            (ai, None) if ai < LENGTH_1_BYTE && data.is_empty() => Ok(Self::Immediate(ai)),
            (ai, Some(n)) if n == data.len() => {
                let value = num::bin_to_uint(data)?;
                Ok(match ai {
                    LENGTH_1_BYTE => Self::U8(value as u8),
                    LENGTH_2_BYTES => Self::U16(value as u16),
                    LENGTH_4_BYTES => Self::U32(value as u32),
                    _ => Self::U64(value),
                })
            }
            (_, Some(_)) => Err(Error::TruncatedInput),
            (ai, None) if ai < LENGTH_1_BYTE => Err(Error::AdditionalData),
            (ai, None) => Err(Error::InvalidAdditionalInformation(ai)),
        }
    }

    /// Fails for an immediate value that does not fit the additional
    /// information field, which would otherwise be masked into another value.
    pub fn check(&self) -> Result<(), Error> {
        match self {
            Self::Immediate(v) if *v >= LENGTH_1_BYTE => {
                Err(Error::InvalidAdditionalInformation(*v))
            }
            _ => Ok(()),
        }
    }

    pub fn additional_information(&self) -> u8 {
        match self {
            Self::Immediate(v) => *v,
            Self::U8(_) => LENGTH_1_BYTE,
            Self::U16(_) => LENGTH_2_BYTES,
            Self::U32(_) => LENGTH_4_BYTES,
            Self::U64(_) => LENGTH_8_BYTES,
        }
    }

    pub fn value(&self) -> u64 {
        match self {
            Self::Immediate(v) | Self::U8(v) => *v as u64,
            Self::U16(v) => *v as u64,
            Self::U32(v) => *v as u64,
            Self::U64(v) => *v,
        }
    }

    /// The big-endian bytes following the initial byte; empty for immediate values.
    pub fn trailing_bytes(&self) -> Vec<u8> {
        match self {
            Self::Immediate(_) => Vec::new(),
            Self::U8(v) => alloc::vec![*v],
            Self::U16(v) => v.to_be_bytes().to_vec(),
            Self::U32(v) => v.to_be_bytes().to_vec(),
            Self::U64(v) => v.to_be_bytes().to_vec(),
        }
    }

    /// The argument as a platform length or count.
    pub fn to_usize(&self) -> Result<usize, Error> {
        usize::try_from(self.value()).map_err(|_| Error::Overflow)
    }

    /// True when no narrower encoding of the same value exists.
    pub fn is_shortest(&self) -> bool {
        *self == compute_length(self.value())
    }
}

/// The number of trailing bytes announced by `additional_information`, if any.
pub fn trailing_len(additional_information: u8) -> Option<usize> {
    match additional_information {
        LENGTH_1_BYTE..=LENGTH_8_BYTES => Some(1 << (additional_information & 0b111)),
        _ => None,
    }
}

/// Chooses the shortest header argument for `n`.
///
/// | n                 | additional information | trailing bytes |
/// |-------------------|------------------------|----------------|
/// | 0..=23            | n                      | none           |
/// | 24..=255          | 24                     | 1              |
/// | 256..=65535       | 25                     | 2              |
/// | 65536..=2^32-1    | 26                     | 4              |
/// | 2^32..=2^64-1     | 27                     | 8              |
///
/// Indefinite length (31) is never chosen here: it is requested explicitly
/// through the indefinite container constructors.
pub fn compute_length(n: u64) -> Argument {
    if n < LENGTH_1_BYTE as u64 {
        Argument::Immediate(n as u8)
    } else if n <= u8::MAX as u64 {
        Argument::U8(n as u8)
    } else if n <= u16::MAX as u64 {
        Argument::U16(n as u16)
    } else if n <= u32::MAX as u64 {
        Argument::U32(n as u32)
    } else {
        Argument::U64(n)
    }
}

pub fn length_of_bytes(data: &[u8]) -> Argument {
    compute_length(data.len() as u64)
}

pub fn length_of_items(count: usize) -> Argument {
    compute_length(count as u64)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn boundaries() {
        for (n, ai, trailing) in [
            (0u64, 0u8, 0usize),
            (23, 23, 0),
            (24, 24, 1),
            (255, 24, 1),
            (256, 25, 2),
            (65535, 25, 2),
            (65536, 26, 4),
            (u32::MAX as u64, 26, 4),
            (u32::MAX as u64 + 1, 27, 8),
            (u64::MAX, 27, 8),
        ] {
            let a = compute_length(n);
            assert_eq!(a.additional_information(), ai, "n = {n}");
            assert_eq!(a.trailing_bytes().len(), trailing, "n = {n}");
            assert_eq!(a.value(), n);
            assert!(a.is_shortest());
        }
        assert_eq!(compute_length(256).trailing_bytes(), [0x01, 0x00]);
        assert_eq!(compute_length(65536).trailing_bytes(), [0x00, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn wire() {
        assert_eq!(Argument::from_wire(23, &[]).unwrap(), Argument::Immediate(23));
        assert_eq!(Argument::from_wire(24, &[5]).unwrap(), Argument::U8(5));
        assert!(!Argument::from_wire(24, &[5]).unwrap().is_shortest());
        assert_eq!(
            Argument::from_wire(26, &[0, 0x0f, 0x42, 0x40]).unwrap(),
            Argument::U32(1_000_000)
        );
        assert!(Argument::from_wire(25, &[1]).is_err());
        assert!(matches!(
            Argument::from_wire(28, &[]),
            Err(Error::InvalidAdditionalInformation(28))
        ));
        assert!(Argument::Immediate(23).check().is_ok());
        assert!(matches!(
            Argument::Immediate(30).check(),
            Err(Error::InvalidAdditionalInformation(30))
        ));
        assert!(Argument::U8(5).check().is_ok());
        assert_eq!(trailing_len(27), Some(8));
        assert_eq!(trailing_len(31), None);
    }

    #[test]
    fn major_types() {
        assert_eq!(MajorType::try_from(4).unwrap(), MajorType::List);
        assert!(matches!(
            MajorType::try_from(8),
            Err(Error::UnsupportedMajorType(8))
        ));
        assert_eq!(MajorType::Other.initial_byte(INDEFINITE), BREAK);
    }
}
