use crate::UserFlags;

/// A decoded list of badge labels with one predicate per known badge.
///
/// Predicates test for the exact label string, so a list assembled by hand
/// answers the same way as one produced by [`decode_flags`].
///
/// [`decode_flags`]: crate::decode_flags
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct FlagLabels {
    labels: Vec<String>,
}

impl FlagLabels {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// Labels in the order they were supplied.
    pub fn as_slice(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Whether `label` appears verbatim.
    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    fn has(&self, flag: UserFlags) -> bool {
        flag.label().is_some_and(|label| self.contains(label))
    }

    /// Discord staff.
    pub fn has_staff(&self) -> bool {
        self.has(UserFlags::STAFF)
    }

    /// Partnered server owner.
    pub fn has_partner(&self) -> bool {
        self.has(UserFlags::PARTNER)
    }

    pub fn has_hypesquad_events(&self) -> bool {
        self.has(UserFlags::HYPESQUAD_EVENTS)
    }

    /// Bug hunter, level 1.
    pub fn has_bug_hunter(&self) -> bool {
        self.has(UserFlags::BUG_HUNTER)
    }

    pub fn has_hypesquad_bravery(&self) -> bool {
        self.has(UserFlags::HYPESQUAD_BRAVERY)
    }

    pub fn has_hypesquad_brilliance(&self) -> bool {
        self.has(UserFlags::HYPESQUAD_BRILLIANCE)
    }

    pub fn has_hypesquad_balance(&self) -> bool {
        self.has(UserFlags::HYPESQUAD_BALANCE)
    }

    /// Early premium supporter.
    pub fn has_early_supporter(&self) -> bool {
        self.has(UserFlags::EARLY_SUPPORTER)
    }

    pub fn has_team_user(&self) -> bool {
        self.has(UserFlags::TEAM_USER)
    }

    /// Platform system account.
    pub fn has_system(&self) -> bool {
        self.has(UserFlags::SYSTEM)
    }

    /// Bug hunter, level 2.
    pub fn has_bug_hunter_2(&self) -> bool {
        self.has(UserFlags::BUG_HUNTER_2)
    }

    pub fn has_verified_bot(&self) -> bool {
        self.has(UserFlags::VERIFIED_BOT)
    }

    pub fn has_verified_developer(&self) -> bool {
        self.has(UserFlags::VERIFIED_DEVELOPER)
    }
}

impl From<UserFlags> for FlagLabels {
    fn from(flags: UserFlags) -> Self {
        Self::new(flags.labels().map(String::from).collect())
    }
}

impl From<Vec<&str>> for FlagLabels {
    fn from(labels: Vec<&str>) -> Self {
        Self::new(labels.into_iter().map(String::from).collect())
    }
}

impl<'a> IntoIterator for &'a FlagLabels {
    type Item = &'a str;
    type IntoIter = core::iter::Map<core::slice::Iter<'a, String>, fn(&'a String) -> &'a str>;

    fn into_iter(self) -> Self::IntoIter {
        self.labels
            .iter()
            .map(String::as_str as fn(&'a String) -> &'a str)
    }
}
