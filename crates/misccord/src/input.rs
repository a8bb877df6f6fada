use crate::{Error, Result};

/// Trait for converting the raw forms an API hands us into a `u64` bitmask or
/// snowflake.
///
/// Integers convert directly. Strings must consist only of ASCII decimal
/// digits; nothing is trimmed, signs are not accepted and an empty string is
/// rejected. Anything else fails with [`Error::InvalidInput`] rather than
/// being coerced to zero.
///
/// # Example
///
/// ```
/// use misccord::IntoRaw;
///
/// assert_eq!("175928847299117063".into_raw().unwrap(), 175928847299117063);
/// assert_eq!(42u8.into_raw().unwrap(), 42);
/// assert!("0x2a".into_raw().is_err());
/// assert!((-1i64).into_raw().is_err());
/// ```
pub trait IntoRaw {
    fn into_raw(self) -> Result<u64>;
}

macro_rules! into_raw_lossless {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoRaw for $ty {
                fn into_raw(self) -> Result<u64> {
                    Ok(u64::from(self))
                }
            }
        )*
    };
}

macro_rules! into_raw_checked {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoRaw for $ty {
                fn into_raw(self) -> Result<u64> {
                    u64::try_from(self).map_err(|_| Error::invalid_input(self))
                }
            }
        )*
    };
}

into_raw_lossless!(u8, u16, u32, u64);
into_raw_checked!(u128, usize, i8, i16, i32, i64, i128, isize);

impl IntoRaw for &str {
    fn into_raw(self) -> Result<u64> {
        parse_digits(self)
    }
}

impl IntoRaw for &String {
    fn into_raw(self) -> Result<u64> {
        parse_digits(self)
    }
}

impl IntoRaw for String {
    fn into_raw(self) -> Result<u64> {
        parse_digits(&self)
    }
}

/// Numbers must be non-negative integers; strings follow the digit rules
/// above. Floats, booleans, null, arrays and objects are rejected.
#[cfg(feature = "json")]
impl IntoRaw for &serde_json::Value {
    fn into_raw(self) -> Result<u64> {
        use serde_json::Value;
        match self {
            Value::Number(n) => n.as_u64().ok_or_else(|| Error::invalid_input(n)),
            Value::String(s) => parse_digits(s),
            other => Err(Error::invalid_input(other)),
        }
    }
}

fn parse_digits(s: &str) -> Result<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::invalid_input(format_args!("{s:?}")));
    }
    // All digits, so the only possible failure left is overflow.
    s.parse().map_err(|_| Error::invalid_input(s))
}
