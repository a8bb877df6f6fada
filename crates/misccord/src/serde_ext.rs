use crate::IntoRaw;
use serde::Deserializer;
use serde::de::{self, Visitor};

/// Accepts the two shapes the API uses for 64-bit values: a JSON integer or
/// a decimal string.
struct RawVisitor {
    expecting: &'static str,
}

impl Visitor<'_> for RawVisitor {
    type Value = u64;

    fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
        formatter.write_str(self.expecting)
    }

    #[inline]
    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        v.into_raw().map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.into_raw().map_err(E::custom)
    }
}

pub(crate) fn deserialize_raw<'de, D>(d: D, expecting: &'static str) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    d.deserialize_any(RawVisitor { expecting })
}
