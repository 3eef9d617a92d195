/*!
Handlers for the tags defined by RFC 8949 §3.4 and the common IANA entries.
*/

use super::*;
use base64::{
    Engine,
    alphabet,
    engine::{
        DecodePaddingMode,
        general_purpose::{GeneralPurpose, GeneralPurposeConfig},
    },
};

pub const DATE_TIME: u64 = 0;
pub const EPOCH_DATE_TIME: u64 = 1;
pub const UNSIGNED_BIGNUM: u64 = 2;
pub const NEGATIVE_BIGNUM: u64 = 3;
pub const DECIMAL_FRACTION: u64 = 4;
pub const BIGFLOAT: u64 = 5;
pub const EXPECTED_BASE64URL: u64 = 21;
pub const EXPECTED_BASE64: u64 = 22;
pub const EXPECTED_BASE16: u64 = 23;
pub const ENCODED_CBOR: u64 = 24;
pub const URI: u64 = 32;
pub const BASE64URL: u64 = 33;
pub const BASE64: u64 = 34;
pub const MIME: u64 = 36;
pub const SELF_DESCRIBED: u64 = 55799;

// Tag 33 text may or may not carry padding.
static BASE64URL_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

static BASE64_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Registers every handler in this module.
pub fn register_all(registry: &mut TagRegistry) {
    registry.register(TextTag::new(DATE_TIME, "standard date/time"));
    registry.register(EpochDateTime);
    registry.register(Bignum::unsigned());
    registry.register(Bignum::negative());
    registry.register(Fraction::decimal());
    registry.register(Fraction::bigfloat());
    registry.register(ExpectedBase64::url());
    registry.register(ExpectedBase64::standard());
    registry.register(Transparent::new(EXPECTED_BASE16, "expected base16"));
    registry.register(EncodedCbor);
    registry.register(TextTag::new(URI, "URI"));
    registry.register(Base64Text::url());
    registry.register(Base64Text::standard());
    registry.register(TextTag::new(MIME, "MIME message"));
    registry.register(Transparent::new(SELF_DESCRIBED, "self-described CBOR"));
}

fn base64_engine(url: bool) -> &'static GeneralPurpose {
    if url {
        &BASE64URL_ENGINE
    } else {
        &BASE64_ENGINE
    }
}

/// Decodes base64 `text` for `tag`, logging the reason on failure.
fn decode_base64(tag: u64, url: bool, text: &str) -> Result<Normalized, Error> {
    let expected = if url {
        "base64url text"
    } else {
        "base64 text"
    };
    base64_engine(url)
        .decode(text)
        .map(Normalized::Bytes)
        .map_err(|e| {
            debug!("Invalid {expected} under tag {tag}: {e}");
            Error::InvalidTagOperand { tag, expected }
        })
}

fn expect(tag: u64, ok: bool, expected: &'static str) -> Result<(), Error> {
    if ok {
        Ok(())
    } else {
        Err(Error::InvalidTagOperand { tag, expected })
    }
}

/// A tag whose operand must be a text string, normalized to that text.
#[derive(Debug, Clone, Copy)]
pub struct TextTag {
    tag: u64,
    name: &'static str,
}

impl TextTag {
    pub const fn new(tag: u64, name: &'static str) -> Self {
        Self { tag, name }
    }
}

impl TagHandler for TextTag {
    fn tag(&self) -> u64 {
        self.tag
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn check(&self, _: &Argument, item: &DataItem) -> Result<(), Error> {
        expect(self.tag, item.is_text(), "a text string")
    }

    fn normalize(&self, tagged: &Tagged) -> Result<Normalized, Error> {
        tagged.item().normalize()
    }
}

/// A tag that accepts any operand and normalizes to it.
#[derive(Debug, Clone, Copy)]
pub struct Transparent {
    tag: u64,
    name: &'static str,
}

impl Transparent {
    pub const fn new(tag: u64, name: &'static str) -> Self {
        Self { tag, name }
    }
}

impl TagHandler for Transparent {
    fn tag(&self) -> u64 {
        self.tag
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn normalize(&self, tagged: &Tagged) -> Result<Normalized, Error> {
        tagged.item().normalize()
    }
}

/// Tags 21 and 22: any operand. Text operands normalize to the bytes they
/// encode, everything else normalizes to itself.
#[derive(Debug, Clone, Copy)]
pub struct ExpectedBase64 {
    url: bool,
}

impl ExpectedBase64 {
    pub const fn url() -> Self {
        Self { url: true }
    }

    pub const fn standard() -> Self {
        Self { url: false }
    }
}

impl TagHandler for ExpectedBase64 {
    fn tag(&self) -> u64 {
        if self.url {
            EXPECTED_BASE64URL
        } else {
            EXPECTED_BASE64
        }
    }

    fn name(&self) -> &'static str {
        if self.url {
            "expected base64url"
        } else {
            "expected base64"
        }
    }

    fn normalize(&self, tagged: &Tagged) -> Result<Normalized, Error> {
        match tagged.item().to_text() {
            Some(text) => decode_base64(self.tag(), self.url, &text),
            None => tagged.item().normalize(),
        }
    }
}

/// Tag 1: seconds relative to 1970-01-01T00:00Z.
#[derive(Debug, Clone, Copy)]
pub struct EpochDateTime;

impl TagHandler for EpochDateTime {
    fn tag(&self) -> u64 {
        EPOCH_DATE_TIME
    }

    fn name(&self) -> &'static str {
        "epoch date/time"
    }

    fn check(&self, _: &Argument, item: &DataItem) -> Result<(), Error> {
        let is_float = item
            .as_simple()
            .is_some_and(|s| s.as_f64().is_some());
        expect(
            EPOCH_DATE_TIME,
            item.is_integer() || is_float,
            "an integer or a float",
        )
    }

    fn normalize(&self, tagged: &Tagged) -> Result<Normalized, Error> {
        tagged.item().normalize()
    }
}

/// Tags 2 and 3: arbitrary-precision integers carried as big-endian bytes.
#[derive(Debug, Clone, Copy)]
pub struct Bignum {
    negative: bool,
}

impl Bignum {
    pub const fn unsigned() -> Self {
        Self { negative: false }
    }

    pub const fn negative() -> Self {
        Self { negative: true }
    }
}

impl TagHandler for Bignum {
    fn tag(&self) -> u64 {
        if self.negative {
            NEGATIVE_BIGNUM
        } else {
            UNSIGNED_BIGNUM
        }
    }

    fn name(&self) -> &'static str {
        if self.negative {
            "negative bignum"
        } else {
            "unsigned bignum"
        }
    }

    fn check(&self, _: &Argument, item: &DataItem) -> Result<(), Error> {
        expect(self.tag(), item.is_bytes(), "a byte string")
    }

    fn normalize(&self, tagged: &Tagged) -> Result<Normalized, Error> {
        let data = tagged.item().to_bytes().ok_or(Error::InvalidTagOperand {
            tag: self.tag(),
            expected: "a byte string",
        })?;
        let magnitude = num::bin_to_big_uint(&data);
        Ok(Normalized::Integer(if self.negative {
            num::negate_magnitude(magnitude)
        } else {
            magnitude.into()
        }))
    }
}

/// Tags 4 and 5: `[exponent, mantissa]` scaled by a power of 10 or 2.
#[derive(Debug, Clone, Copy)]
pub struct Fraction {
    tag: u64,
    base: u32,
}

impl Fraction {
    pub const fn decimal() -> Self {
        Self {
            tag: DECIMAL_FRACTION,
            base: 10,
        }
    }

    pub const fn bigfloat() -> Self {
        Self {
            tag: BIGFLOAT,
            base: 2,
        }
    }

    fn is_mantissa(item: &DataItem) -> bool {
        item.is_integer()
            || item.as_tagged().is_some_and(|t| {
                matches!(t.tag(), UNSIGNED_BIGNUM | NEGATIVE_BIGNUM) && t.item().is_bytes()
            })
    }

    fn operand_error(&self) -> Error {
        Error::InvalidTagOperand {
            tag: self.tag,
            expected: "a list of an integer exponent and an integer or bignum mantissa",
        }
    }
}

impl TagHandler for Fraction {
    fn tag(&self) -> u64 {
        self.tag
    }

    fn name(&self) -> &'static str {
        if self.base == 10 {
            "decimal fraction"
        } else {
            "bigfloat"
        }
    }

    fn check(&self, _: &Argument, item: &DataItem) -> Result<(), Error> {
        match item.as_list() {
            Some(l)
                if l.len() == 2
                    && l.get(0).is_some_and(DataItem::is_integer)
                    && l.get(1).is_some_and(Self::is_mantissa) =>
            {
                Ok(())
            }
            _ => Err(self.operand_error()),
        }
    }

    fn normalize(&self, tagged: &Tagged) -> Result<Normalized, Error> {
        let list = tagged.item().as_list().ok_or_else(|| self.operand_error())?;
        let exponent = list
            .get(0)
            .and_then(DataItem::to_big_int)
            .ok_or_else(|| self.operand_error())?;
        let mantissa = match list.get(1).map(Normalize::normalize).transpose()? {
            Some(Normalized::Integer(m)) => m,
            _ => return Err(self.operand_error()),
        };
        Ok(Normalized::Fraction {
            base: self.base,
            exponent,
            mantissa,
        })
    }
}

/// Tag 24: a byte string holding another encoded item.
#[derive(Debug, Clone, Copy)]
pub struct EncodedCbor;

impl TagHandler for EncodedCbor {
    fn tag(&self) -> u64 {
        ENCODED_CBOR
    }

    fn name(&self) -> &'static str {
        "encoded CBOR data item"
    }

    fn check(&self, _: &Argument, item: &DataItem) -> Result<(), Error> {
        expect(ENCODED_CBOR, item.is_bytes(), "a byte string")
    }

    fn normalize(&self, tagged: &Tagged) -> Result<Normalized, Error> {
        tagged.item().normalize()
    }
}

/// Tags 33 and 34: text that normalizes to the bytes it encodes.
#[derive(Debug, Clone, Copy)]
pub struct Base64Text {
    url: bool,
}

impl Base64Text {
    pub const fn url() -> Self {
        Self { url: true }
    }

    pub const fn standard() -> Self {
        Self { url: false }
    }

}

impl TagHandler for Base64Text {
    fn tag(&self) -> u64 {
        if self.url { BASE64URL } else { BASE64 }
    }

    fn name(&self) -> &'static str {
        if self.url { "base64url" } else { "base64" }
    }

    fn check(&self, _: &Argument, item: &DataItem) -> Result<(), Error> {
        expect(self.tag(), item.is_text(), "a text string")
    }

    fn normalize(&self, tagged: &Tagged) -> Result<Normalized, Error> {
        let expected = if self.url {
            "base64url text"
        } else {
            "base64 text"
        };
        let text = tagged.item().to_text().ok_or(Error::InvalidTagOperand {
            tag: self.tag(),
            expected,
        })?;
        decode_base64(self.tag(), self.url, &text)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use alloc::vec;
    use item::{List, Simple};
    use num_bigint::BigInt;

    fn resolve(tag: u64, item: DataItem) -> Result<Tagged, Error> {
        TagRegistry::default().resolve(length::compute_length(tag), item)
    }

    #[test]
    fn operands() {
        assert!(resolve(DATE_TIME, "2013-03-21T20:04:00Z".into()).is_ok());
        assert!(resolve(DATE_TIME, 0u8.into()).is_err());
        assert!(resolve(EPOCH_DATE_TIME, 1363896240u32.into()).is_ok());
        assert!(resolve(EPOCH_DATE_TIME, 1363896240.5f64.into()).is_ok());
        assert!(resolve(EPOCH_DATE_TIME, "x".into()).is_err());
        assert!(resolve(UNSIGNED_BIGNUM, vec![1u8, 0].into()).is_ok());
        assert!(matches!(
            resolve(NEGATIVE_BIGNUM, 1u8.into()),
            Err(Error::InvalidTagOperand {
                tag: NEGATIVE_BIGNUM,
                ..
            })
        ));
        assert!(resolve(ENCODED_CBOR, vec![0x01u8].into()).is_ok());
        assert!(resolve(ENCODED_CBOR, "01".into()).is_err());
        assert!(resolve(SELF_DESCRIBED, DataItem::null()).is_ok());
        assert!(resolve(DECIMAL_FRACTION, vec![DataItem::from(-2i8)].into()).is_err());
        assert!(
            resolve(
                BIGFLOAT,
                vec![DataItem::from(1u8), DataItem::from(1.5f64)].into()
            )
            .is_err()
        );
    }

    #[test]
    fn bignums() {
        let t = resolve(UNSIGNED_BIGNUM, vec![1u8, 0, 0, 0, 0, 0, 0, 0, 0].into()).unwrap();
        assert_eq!(
            Normalized::Integer(BigInt::from(u64::MAX) + 1),
            t.normalize().unwrap()
        );
        let t = resolve(NEGATIVE_BIGNUM, vec![1u8, 0, 0, 0, 0, 0, 0, 0, 0].into()).unwrap();
        assert_eq!(
            Normalized::Integer(-BigInt::from(u64::MAX) - 2),
            t.normalize().unwrap()
        );
    }

    #[test]
    fn fractions() {
        let mantissa = resolve(UNSIGNED_BIGNUM, vec![0x01u8, 0x00].into()).unwrap();
        let t = resolve(
            DECIMAL_FRACTION,
            DataItem::List(List::new(vec![(-2i8).into(), mantissa.into()])),
        )
        .unwrap();
        assert_eq!(
            t.normalize().unwrap(),
            Normalized::Fraction {
                base: 10,
                exponent: BigInt::from(-2),
                mantissa: BigInt::from(256),
            }
        );

        let t = resolve(
            BIGFLOAT,
            vec![DataItem::from(-1i8), DataItem::from(3u8)].into(),
        )
        .unwrap();
        assert_eq!(t.name(), Some("bigfloat"));
        assert_eq!(
            t.normalize().unwrap(),
            Normalized::Fraction {
                base: 2,
                exponent: BigInt::from(-1),
                mantissa: BigInt::from(3),
            }
        );
    }

    #[test]
    fn base64() {
        let t = resolve(BASE64URL, "_-8".into()).unwrap();
        assert_eq!(t.normalize().unwrap(), Normalized::Bytes(vec![0xff, 0xef]));
        let t = resolve(BASE64, "/+8=".into()).unwrap();
        assert_eq!(t.normalize().unwrap(), Normalized::Bytes(vec![0xff, 0xef]));
        let t = resolve(BASE64, "!!".into()).unwrap();
        assert!(matches!(
            t.normalize(),
            Err(Error::InvalidTagOperand { tag: BASE64, .. })
        ));
    }

    #[test]
    fn expected_base64() {
        let t = resolve(EXPECTED_BASE64URL, "_-8".into()).unwrap();
        assert_eq!(t.name(), Some("expected base64url"));
        assert_eq!(t.normalize().unwrap(), Normalized::Bytes(vec![0xff, 0xef]));
        let t = resolve(EXPECTED_BASE64, "/+8".into()).unwrap();
        assert_eq!(t.normalize().unwrap(), Normalized::Bytes(vec![0xff, 0xef]));

        let t = resolve(EXPECTED_BASE64, vec![1u8, 2].into()).unwrap();
        assert_eq!(t.normalize().unwrap(), Normalized::Bytes(vec![1, 2]));
        let t = resolve(EXPECTED_BASE64URL, 7u8.into()).unwrap();
        assert_eq!(t.normalize().unwrap(), Normalized::Integer(BigInt::from(7)));

        let t = resolve(EXPECTED_BASE64URL, "/+8".into()).unwrap();
        assert!(matches!(
            t.normalize(),
            Err(Error::InvalidTagOperand {
                tag: EXPECTED_BASE64URL,
                ..
            })
        ));
    }

    #[test]
    fn projections() {
        let t = resolve(SELF_DESCRIBED, 1u8.into()).unwrap();
        assert_eq!(t.normalize().unwrap(), Normalized::Integer(BigInt::from(1)));
        let t = resolve(URI, "http://www.example.com".into()).unwrap();
        assert_eq!(
            t.normalize().unwrap(),
            Normalized::Text("http://www.example.com".into())
        );
        let t = resolve(EPOCH_DATE_TIME, Simple::Double(1.5).into()).unwrap();
        assert_eq!(t.normalize().unwrap(), Normalized::Float(1.5));
    }
}
