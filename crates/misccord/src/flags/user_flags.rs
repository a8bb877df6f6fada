use crate::{IntoRaw, Result};
#[cfg(feature = "tracing")]
use tracing::instrument;

bitflags::bitflags! {
    /// Badge flags carried on a user account.
    ///
    /// Bits 0 through 17 are named. The unnamed positions in that range are
    /// undocumented by the platform but still decode to a placeholder label.
    /// Any bit above 17 is retained in the value and ignored by [`labels`].
    ///
    /// ```text
    ///  Bit:   17   16   15   14   13   12   11   10    9 ...  0
    ///        +----+----+----+----+----+----+----+----+----+---+----+
    ///        | VD | VB | ?? | B2 | ?? | SY | ?? | TU | ES |...| ST |
    ///        +----+----+----+----+----+----+----+----+----+---+----+
    /// ```
    ///
    /// [`labels`]: UserFlags::labels
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct UserFlags: u64 {
        const STAFF = 1 << 0;
        const PARTNER = 1 << 1;
        const HYPESQUAD_EVENTS = 1 << 2;
        const BUG_HUNTER = 1 << 3;
        /// Undocumented; observed as the SMS multi-factor marker.
        const UNKNOWN_4 = 1 << 4;
        /// Undocumented; observed as a dismissed premium promotion.
        const UNKNOWN_5 = 1 << 5;
        const HYPESQUAD_BRAVERY = 1 << 6;
        const HYPESQUAD_BRILLIANCE = 1 << 7;
        const HYPESQUAD_BALANCE = 1 << 8;
        const EARLY_SUPPORTER = 1 << 9;
        const TEAM_USER = 1 << 10;
        /// Undocumented and unused.
        const UNKNOWN_11 = 1 << 11;
        const SYSTEM = 1 << 12;
        /// Undocumented; set while an urgent system message is unread.
        const UNKNOWN_13 = 1 << 13;
        const BUG_HUNTER_2 = 1 << 14;
        /// Undocumented; set on accounts deleted for being underage.
        const UNKNOWN_15 = 1 << 15;
        const VERIFIED_BOT = 1 << 16;
        const VERIFIED_DEVELOPER = 1 << 17;
    }
}

/// Bit-ascending label table. Exactly one entry per named flag.
const LABELS: [(UserFlags, &str); 18] = [
    (UserFlags::STAFF, "Staff"),
    (UserFlags::PARTNER, "Partner"),
    (UserFlags::HYPESQUAD_EVENTS, "Hypesquad Events"),
    (UserFlags::BUG_HUNTER, "Bug hunter"),
    (UserFlags::UNKNOWN_4, "MFA_SMS"),
    (UserFlags::UNKNOWN_5, "PREMIUM_PROMO_DISMISSED"),
    (UserFlags::HYPESQUAD_BRAVERY, "Hypesquad bravery"),
    (UserFlags::HYPESQUAD_BRILLIANCE, "Hypesquad brilliance"),
    (UserFlags::HYPESQUAD_BALANCE, "Hypesquad balance"),
    (UserFlags::EARLY_SUPPORTER, "Early nitro"),
    (UserFlags::TEAM_USER, "Team user"),
    (UserFlags::UNKNOWN_11, "Unused"),
    (UserFlags::SYSTEM, "System"),
    (UserFlags::UNKNOWN_13, "Unread urgent system message"),
    (UserFlags::BUG_HUNTER_2, "Bug hunter lvl2"),
    (UserFlags::UNKNOWN_15, "UNDERAGE_DELETED"),
    (UserFlags::VERIFIED_BOT, "Verified Bot"),
    (UserFlags::VERIFIED_DEVELOPER, "Verified Developer"),
];

impl UserFlags {
    /// Wraps a raw mask, keeping bits that have no name.
    pub const fn from_raw(raw: u64) -> Self {
        Self::from_bits_retain(raw)
    }

    /// Labels of the named flags set in `self`, in ascending bit order.
    pub fn labels(self) -> impl Iterator<Item = &'static str> {
        LABELS
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, label)| label)
    }

    /// The label of a single named flag. `None` for composite or unnamed
    /// values.
    pub fn label(self) -> Option<&'static str> {
        LABELS
            .into_iter()
            .find(|(flag, _)| *flag == self)
            .map(|(_, label)| label)
    }
}

/// Decodes a user flags value into badge labels, in ascending bit order.
///
/// The value may be an integer or a string of decimal digits, as found in the
/// `flags` and `public_flags` fields of a user object.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`](crate::Error::InvalidInput) when the value
/// is neither.
///
/// # Example
///
/// ```
/// use misccord::decode_flags;
///
/// assert_eq!(decode_flags(1u64).unwrap(), ["Staff"]);
/// assert_eq!(
///     decode_flags("196608").unwrap(),
///     ["Verified Bot", "Verified Developer"]
/// );
/// assert!(decode_flags("abc").is_err());
/// ```
#[cfg_attr(feature = "tracing", instrument(level = "trace", skip(value)))]
pub fn decode_flags(value: impl IntoRaw) -> Result<Vec<&'static str>> {
    let raw = value.into_raw()?;
    Ok(UserFlags::from_raw(raw).labels().collect())
}

#[cfg(feature = "serde")]
impl serde::Serialize for UserFlags {
    fn serialize<S: serde::Serializer>(&self, s: S) -> core::result::Result<S::Ok, S::Error> {
        s.serialize_u64(self.bits())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for UserFlags {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> core::result::Result<Self, D::Error> {
        crate::serde_ext::deserialize_raw(d, "a user flags integer or digit string")
            .map(Self::from_raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn zero_has_no_labels() {
        assert!(decode_flags(0u64).unwrap().is_empty());
    }

    #[test]
    fn single_bits() {
        assert_eq!(decode_flags(1u64).unwrap(), ["Staff"]);
        assert_eq!(decode_flags(1u64 << 16).unwrap(), ["Verified Bot"]);
        assert_eq!(decode_flags(1u64 << 4).unwrap(), ["MFA_SMS"]);
        assert_eq!(
            decode_flags(1u64 << 13).unwrap(),
            ["Unread urgent system message"]
        );
    }

    #[test]
    fn labels_come_out_in_bit_order() {
        let mask = UserFlags::VERIFIED_DEVELOPER | UserFlags::STAFF | UserFlags::UNKNOWN_11;
        assert_eq!(
            mask.labels().collect::<Vec<_>>(),
            ["Staff", "Unused", "Verified Developer"]
        );
    }

    #[test]
    fn table_is_complete_and_ordered() {
        assert_eq!(LABELS.len(), 18);
        for (n, (flag, _)) in LABELS.iter().enumerate() {
            assert_eq!(flag.bits(), 1 << n, "entry {n}");
        }
        assert_eq!(
            LABELS.iter().fold(UserFlags::empty(), |acc, (flag, _)| acc | *flag),
            UserFlags::all()
        );
    }

    #[test]
    fn every_set_bit_yields_one_label() {
        for mask in 0u64..(1 << 18) {
            let labels = decode_flags(mask).unwrap();
            assert_eq!(labels.len(), mask.count_ones() as usize, "mask {mask:#x}");
        }
    }

    #[test]
    fn bits_above_seventeen_are_ignored() {
        assert_eq!(decode_flags((1u64 << 18) | 2).unwrap(), ["Partner"]);
        assert!(decode_flags(u64::MAX << 18).unwrap().is_empty());
    }

    #[test]
    fn numeric_strings_match_integers() {
        assert_eq!(decode_flags("123").unwrap(), decode_flags(123u64).unwrap());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(decode_flags("abc"), Err(Error::InvalidInput { .. })));
        assert!(matches!(decode_flags(-1i64), Err(Error::InvalidInput { .. })));
    }

    #[test]
    fn single_flag_labels() {
        assert_eq!(UserFlags::BUG_HUNTER_2.label(), Some("Bug hunter lvl2"));
        assert_eq!((UserFlags::STAFF | UserFlags::PARTNER).label(), None);
        assert_eq!(UserFlags::from_raw(1 << 40).label(), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_accepts_integers_and_strings() {
        let from_int: UserFlags = serde_json::from_str("131072").unwrap();
        let from_str: UserFlags = serde_json::from_str("\"131072\"").unwrap();
        assert_eq!(from_int, UserFlags::VERIFIED_DEVELOPER);
        assert_eq!(from_str, from_int);
        assert_eq!(serde_json::to_string(&from_int).unwrap(), "131072");
        assert!(serde_json::from_str::<UserFlags>("\"x\"").is_err());
    }
}
