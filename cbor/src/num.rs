/*!
Glue between raw big-endian bytes, digit strings and the `num-bigint` types.
*/

use super::*;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Num;

/// Interprets `data` as an unsigned big-endian integer.
///
/// Leading zero bytes are accepted; anything wider than 64 significant bits
/// fails with [`Error::Overflow`].
pub fn bin_to_uint(data: &[u8]) -> Result<u64, Error> {
    let significant = data
        .iter()
        .position(|b| *b != 0)
        .map_or(&data[data.len()..], |start| &data[start..]);
    if significant.len() > 8 {
        return Err(Error::Overflow);
    }
    Ok(significant
        .iter()
        .fold(0u64, |acc, b| (acc << 8) | (*b as u64)))
}

pub fn bin_to_big_uint(data: &[u8]) -> BigUint {
    BigUint::from_bytes_be(data)
}

/// Parses a signed digit string in `base` (2..=36).
///
/// A single leading `+` or `-` is accepted, leading zeros are ignored and
/// digits are case-insensitive.
pub fn from_base(number: &str, base: u32) -> Result<BigInt, Error> {
    if !(2..=36).contains(&base) {
        return Err(Error::InvalidNumber("base must be in the range 2 to 36"));
    }

    let (sign, digits) = match number.as_bytes().first() {
        Some(b'-') => (Sign::Minus, &number[1..]),
        Some(b'+') => (Sign::Plus, &number[1..]),
        _ => (Sign::Plus, number),
    };
    if digits.is_empty() {
        return Err(Error::InvalidNumber("the number cannot be empty"));
    }
    if !digits.chars().all(|c| c.is_digit(base)) {
        return Err(Error::InvalidNumber("invalid digit for base"));
    }

    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(BigInt::default());
    }

    BigUint::from_str_radix(digits, base)
        .map(|magnitude| BigInt::from_biguint(sign, magnitude))
        .map_err(|_| Error::InvalidNumber("invalid digit for base"))
}

/// Renders `value` as lowercase digits in `base` (2..=36).
pub fn to_base(value: &BigInt, base: u32) -> Result<String, Error> {
    if !(2..=36).contains(&base) {
        return Err(Error::InvalidNumber("base must be in the range 2 to 36"));
    }
    Ok(value.to_str_radix(base))
}

/// The value of a negative integer or negative bignum: `-1 - magnitude`.
pub fn negate_magnitude(magnitude: BigUint) -> BigInt {
    -BigInt::from(1u8) - BigInt::from(magnitude)
}

#[cfg(test)]
mod test {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn binary() {
        assert_eq!(bin_to_uint(&[]).unwrap(), 0);
        assert_eq!(bin_to_uint(&[0x01, 0x00]).unwrap(), 256);
        assert_eq!(
            bin_to_uint(&[0, 0, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]).unwrap(),
            u64::MAX
        );
        assert!(matches!(
            bin_to_uint(&[1, 0, 0, 0, 0, 0, 0, 0, 0]),
            Err(Error::Overflow)
        ));
        assert_eq!(
            bin_to_big_uint(&[1, 0, 0, 0, 0, 0, 0, 0, 0]).to_string(),
            "18446744073709551616"
        );
    }

    #[test]
    fn bases() {
        assert_eq!(
            from_base("FFFFFFFFFFFFFFFF", 16).unwrap(),
            BigInt::from(u64::MAX)
        );
        assert_eq!(from_base("-0010", 2).unwrap(), BigInt::from(-2));
        assert_eq!(from_base("+000", 10).unwrap(), BigInt::default());
        assert!(from_base("", 10).is_err());
        assert!(from_base("-", 10).is_err());
        assert!(from_base("12", 2).is_err());
        assert!(from_base("1_000", 10).is_err());
        assert!(from_base("10", 37).is_err());

        let n = from_base("zz", 36).unwrap();
        assert_eq!(to_base(&n, 10).unwrap(), "1295");
        assert_eq!(to_base(&n, 36).unwrap(), "zz");
        assert_eq!(
            negate_magnitude(BigUint::from(u64::MAX)).to_string(),
            "-18446744073709551616"
        );
    }
}
