use crate::{Error, IntoRaw, Result};
use core::fmt;
use core::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
#[cfg(feature = "tracing")]
use tracing::instrument;

/// Platform epoch: Thursday, January 1, 2015 00:00:00 UTC, in unix
/// milliseconds.
pub const DISCORD_EPOCH_MS: u64 = 1_420_070_400_000;

/// [`DISCORD_EPOCH_MS`] as a [`Duration`] since the unix epoch.
pub const DISCORD_EPOCH: Duration = Duration::from_millis(DISCORD_EPOCH_MS);

/// A 64-bit platform snowflake.
///
/// - 42 bits timestamp (ms since [`DISCORD_EPOCH`])
/// - 5 bits internal worker ID
/// - 5 bits internal process ID
/// - 12 bits per-process increment
///
/// ```text
///  Bit Index:  63             22 21        17 16         12 11              0
///              +----------------+------------+-------------+----------------+
///  Field:      | timestamp (42) | worker (5) | process (5) | increment (12) |
///              +----------------+------------+-------------+----------------+
///              |<----- MSB ------------- 64 bits ---------------- LSB ----->|
/// ```
///
/// Every accessor is derived from the raw value on demand; the type holds
/// nothing else.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Snowflake {
    id: u64,
}

impl Snowflake {
    /// Number of bits to shift the timestamp to its position (bit 22).
    pub const TIMESTAMP_SHIFT: u64 = 22;

    /// Largest value the 42-bit timestamp field can hold.
    pub const MAX_EPOCH_OFFSET_MS: u64 = (1 << 42) - 1;

    /// Bitmask for the 5-bit worker ID field, bits 17 through 21.
    pub const WORKER_ID_MASK: u64 = 0x3E_0000;

    /// Number of bits to shift the worker ID field (bit 17).
    pub const WORKER_ID_SHIFT: u64 = 17;

    /// Bitmask for the 5-bit process ID field, bits 12 through 16.
    pub const PROCESS_ID_MASK: u64 = 0x1_F000;

    /// Number of bits to shift the process ID field (bit 12).
    pub const PROCESS_ID_SHIFT: u64 = 12;

    /// Bitmask for the 12-bit increment field, bits 0 through 11.
    pub const INCREMENT_MASK: u64 = 0xFFF;

    pub const fn from_raw(id: u64) -> Self {
        Self { id }
    }

    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// The lowest snowflake that could have been created at `unix_ms`.
    ///
    /// Not a real ID: worker, process and increment are all zero. Use it as a
    /// bound when filtering IDs by creation time. Instants before the
    /// platform epoch saturate to zero, and instants past the last
    /// representable millisecond saturate to [`MAX_EPOCH_OFFSET_MS`].
    ///
    /// [`MAX_EPOCH_OFFSET_MS`]: Self::MAX_EPOCH_OFFSET_MS
    pub const fn from_timestamp_ms(unix_ms: u64) -> Self {
        let mut offset = unix_ms.saturating_sub(DISCORD_EPOCH_MS);
        if offset > Self::MAX_EPOCH_OFFSET_MS {
            offset = Self::MAX_EPOCH_OFFSET_MS;
        }
        Self {
            id: offset << Self::TIMESTAMP_SHIFT,
        }
    }

    /// Milliseconds since the platform epoch, straight from the top 42 bits.
    pub const fn epoch_offset_ms(&self) -> u64 {
        self.id >> Self::TIMESTAMP_SHIFT
    }

    /// Creation time as unix milliseconds.
    pub const fn timestamp_ms(&self) -> u64 {
        self.epoch_offset_ms() + DISCORD_EPOCH_MS
    }

    /// Creation time as fractional unix seconds.
    pub fn timestamp_secs(&self) -> f64 {
        self.timestamp_ms() as f64 / 1000.0
    }

    /// Creation time as a [`SystemTime`].
    pub fn created_at(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_millis(self.timestamp_ms())
    }

    /// Creation time as a UTC datetime.
    #[cfg(feature = "chrono")]
    pub fn created_at_utc(&self) -> chrono::DateTime<chrono::Utc> {
        // The timestamp field tops out near the year 2154, well inside the
        // range chrono can represent.
        let ms = i64::try_from(self.timestamp_ms()).unwrap_or(i64::MAX);
        chrono::DateTime::from_timestamp_millis(ms)
            .unwrap_or(chrono::DateTime::<chrono::Utc>::MAX_UTC)
    }

    pub const fn worker_id(&self) -> u64 {
        (self.id & Self::WORKER_ID_MASK) >> Self::WORKER_ID_SHIFT
    }

    pub const fn process_id(&self) -> u64 {
        (self.id & Self::PROCESS_ID_MASK) >> Self::PROCESS_ID_SHIFT
    }

    /// Incremented for every ID generated on the process.
    pub const fn increment(&self) -> u64 {
        self.id & Self::INCREMENT_MASK
    }

    /// Returns the ID as a zero-padded 20-digit string.
    pub fn to_padded_string(&self) -> String {
        format!("{:020}", self.id)
    }

    fn fields(&self) -> [FieldLayout; 4] {
        [
            FieldLayout {
                name: "timestamp",
                bits: 42,
                value: self.epoch_offset_ms(),
            },
            FieldLayout {
                name: "worker_id",
                bits: 5,
                value: self.worker_id(),
            },
            FieldLayout {
                name: "process_id",
                bits: 5,
                value: self.process_id(),
            },
            FieldLayout {
                name: "increment",
                bits: 12,
                value: self.increment(),
            },
        ]
    }
}

/// Splits a snowflake given as an integer or a string of decimal digits.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for anything else, including digit strings
/// that overflow 64 bits.
///
/// # Example
///
/// ```
/// use misccord::decompose_snowflake;
///
/// let id = decompose_snowflake("175928847299117063")?;
/// assert_eq!(id.timestamp_ms(), 1462015105796);
/// assert_eq!(id.worker_id(), 1);
/// assert_eq!(id.process_id(), 0);
/// assert_eq!(id.increment(), 7);
/// # Ok::<(), misccord::Error>(())
/// ```
#[cfg_attr(feature = "tracing", instrument(level = "trace", skip(value)))]
pub fn decompose_snowflake(value: impl IntoRaw) -> Result<Snowflake> {
    value.into_raw().map(Snowflake::from_raw)
}

impl From<u64> for Snowflake {
    fn from(id: u64) -> Self {
        Self::from_raw(id)
    }
}

impl From<Snowflake> for u64 {
    fn from(id: Snowflake) -> Self {
        id.to_raw()
    }
}

impl FromStr for Snowflake {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        decompose_snowflake(s)
    }
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_bit_layout_debug(f, self)
    }
}

struct FieldLayout {
    name: &'static str,
    bits: u8,
    value: u64,
}

fn write_bit_layout_debug(f: &mut fmt::Formatter<'_>, id: &Snowflake) -> fmt::Result {
    let fields = id.fields();

    // Widest of label, decimal and hex per column, plus padding
    let columns: Vec<usize> = fields
        .iter()
        .map(|field| {
            let label_len = format!("{} ({})", field.name, field.bits).len();
            let dec_len = field.value.to_string().len();
            let hex_len = format!("0x{:x}", field.value).len();
            label_len.max(dec_len).max(hex_len) + 2
        })
        .collect();

    fn center(s: impl ToString, width: usize) -> String {
        let s = s.to_string();
        let pad = width.saturating_sub(s.len());
        let left = pad / 2;
        format!("{}{}{}", " ".repeat(left), s, " ".repeat(pad - left))
    }

    fn border(f: &mut fmt::Formatter<'_>, columns: &[usize]) -> fmt::Result {
        write!(f, "        +")?;
        for &w in columns {
            write!(f, "{}+", "-".repeat(w))?;
        }
        writeln!(f)
    }

    writeln!(f, "Snowflake {{")?;
    writeln!(f, "    raw id     : 0x{:016x} ({})", id.id, id.id)?;
    writeln!(f, "    padded     : {}", id.to_padded_string())?;
    writeln!(f, "    created at : {} ms", id.timestamp_ms())?;
    writeln!(f, "    layout     :")?;

    border(f, &columns)?;
    write!(f, "        |")?;
    for (field, &w) in fields.iter().zip(&columns) {
        write!(f, "{}|", center(format!("{} ({})", field.name, field.bits), w))?;
    }
    writeln!(f)?;
    border(f, &columns)?;

    write!(f, "        |")?;
    for (field, &w) in fields.iter().zip(&columns) {
        write!(f, "{}|", center(field.value, w))?;
    }
    writeln!(f)?;

    write!(f, "        |")?;
    for (field, &w) in fields.iter().zip(&columns) {
        write!(f, "{}|", center(format!("0x{:x}", field.value), w))?;
    }
    writeln!(f)?;
    border(f, &columns)?;

    write!(f, "}}")
}

// Snowflakes are strings on the wire; integers are accepted on the way in.
#[cfg(feature = "serde")]
impl serde::Serialize for Snowflake {
    fn serialize<S: serde::Serializer>(&self, s: S) -> core::result::Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Snowflake {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> core::result::Result<Self, D::Error> {
        crate::serde_ext::deserialize_raw(d, "a snowflake integer or digit string")
            .map(Self::from_raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: u64 = 175_928_847_299_117_063;

    #[test]
    fn known_snowflake_components() {
        let id = decompose_snowflake(SAMPLE).unwrap();
        assert_eq!(id.worker_id(), 1);
        assert_eq!(id.process_id(), 0);
        assert_eq!(id.increment(), SAMPLE & 0xFFF);
        assert_eq!(id.increment(), 7);
        assert_eq!(id.timestamp_ms(), (SAMPLE >> 22) + 1_420_070_400_000);
        assert_eq!(id.timestamp_ms(), 1_462_015_105_796);
    }

    #[test]
    fn zero_is_the_epoch() {
        let id = decompose_snowflake(0u64).unwrap();
        assert_eq!(id.worker_id(), 0);
        assert_eq!(id.process_id(), 0);
        assert_eq!(id.increment(), 0);
        assert_eq!(id.timestamp_ms(), DISCORD_EPOCH_MS);
        assert_eq!(id.created_at(), UNIX_EPOCH + DISCORD_EPOCH);
    }

    #[test]
    fn max_value_fields_saturate() {
        let id = Snowflake::from_raw(u64::MAX);
        assert_eq!(id.worker_id(), 0x1F);
        assert_eq!(id.process_id(), 0x1F);
        assert_eq!(id.increment(), 0xFFF);
        assert_eq!(id.epoch_offset_ms(), (1 << 42) - 1);
    }

    #[test]
    fn seconds_keep_the_fraction() {
        let id = Snowflake::from_raw(SAMPLE);
        assert_eq!(id.timestamp_secs(), 1_462_015_105.796);
    }

    #[test]
    fn created_at_matches_timestamp() {
        let id = Snowflake::from_raw(SAMPLE);
        let since_unix = id.created_at().duration_since(UNIX_EPOCH).unwrap();
        assert_eq!(since_unix.as_millis(), u128::from(id.timestamp_ms()));
    }

    #[test]
    fn strings_and_integers_agree() {
        assert_eq!(
            decompose_snowflake("175928847299117063").unwrap(),
            decompose_snowflake(SAMPLE).unwrap()
        );
        assert_eq!("175928847299117063".parse::<Snowflake>().unwrap().to_raw(), SAMPLE);
    }

    #[test]
    fn precision_is_kept_above_two_pow_53() {
        let raw = (1u64 << 53) + 1;
        let id: Snowflake = raw.to_string().parse().unwrap();
        assert_eq!(id.to_raw(), raw);
        assert_eq!(id.increment(), 1);
    }

    #[test]
    fn malformed_strings_are_rejected() {
        for s in ["", "17592884729911706x", "-1", "1.5", "18446744073709551616"] {
            assert!(
                matches!(decompose_snowflake(s), Err(Error::InvalidInput { .. })),
                "{s:?} should be rejected"
            );
        }
    }

    #[test]
    fn timestamp_bound_orders_ids() {
        let id = Snowflake::from_raw(SAMPLE);
        let lower = Snowflake::from_timestamp_ms(id.timestamp_ms());
        let upper = Snowflake::from_timestamp_ms(id.timestamp_ms() + 1);
        assert!(lower <= id && id < upper);
        assert_eq!(lower.timestamp_ms(), id.timestamp_ms());
        assert_eq!(Snowflake::from_timestamp_ms(0), Snowflake::from_raw(0));
    }

    #[test]
    fn timestamp_bound_saturates_past_the_last_millisecond() {
        let latest = Snowflake::from_raw(u64::MAX);
        for unix_ms in [
            DISCORD_EPOCH_MS + Snowflake::MAX_EPOCH_OFFSET_MS,
            DISCORD_EPOCH_MS + (1 << 42),
            u64::MAX,
        ] {
            let bound = Snowflake::from_timestamp_ms(unix_ms);
            assert_eq!(bound.epoch_offset_ms(), Snowflake::MAX_EPOCH_OFFSET_MS);
            assert_eq!(bound.timestamp_ms(), latest.timestamp_ms());
            assert!(bound <= latest);
            assert!(Snowflake::from_raw(SAMPLE) < bound);
        }
    }

    #[test]
    fn debug_renders_the_layout() {
        let rendered = format!("{:?}", Snowflake::from_raw(SAMPLE));
        assert!(rendered.starts_with("Snowflake {"));
        assert!(rendered.contains("worker_id (5)"));
        assert!(rendered.contains("increment (12)"));
        assert!(rendered.contains("00175928847299117063"));
    }

    #[cfg(feature = "chrono")]
    #[test]
    fn chrono_datetime() {
        let id = Snowflake::from_raw(SAMPLE);
        assert_eq!(id.created_at_utc().timestamp_millis(), 1_462_015_105_796);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip_as_string() {
        let id = Snowflake::from_raw(SAMPLE);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"175928847299117063\"");
        assert_eq!(serde_json::from_str::<Snowflake>(&json).unwrap(), id);
        assert_eq!(
            serde_json::from_str::<Snowflake>("175928847299117063").unwrap(),
            id
        );
    }
}
