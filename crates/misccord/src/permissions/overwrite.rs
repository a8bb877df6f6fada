use crate::{Error, PermissionValue, Permissions, Result, TargetKind};
#[cfg(feature = "tracing")]
use tracing::instrument;

/// A channel's allow/deny override of inherited permissions.
///
/// Both masks are validated against the same channel kind. A permission in
/// neither mask is not overridden: it inherits from the enclosing scope, and
/// [`entries`](Self::entries) carries nothing for it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ChannelOverwrite {
    allow: PermissionValue,
    deny: PermissionValue,
}

impl ChannelOverwrite {
    /// # Errors
    ///
    /// - [`Error::InvalidTargetKind`] if `kind` is not a text or voice channel.
    /// - [`Error::InvalidPermissionSet`] if either mask sets a bit forbidden
    ///   for `kind`; `allow` is checked first.
    #[cfg_attr(feature = "tracing", instrument(level = "trace"))]
    pub fn new(allow: u64, deny: u64, kind: TargetKind) -> Result<Self> {
        if !kind.is_channel() {
            return Err(Error::InvalidTargetKind { kind });
        }
        Ok(Self {
            allow: PermissionValue::new(allow, kind)?,
            deny: PermissionValue::new(deny, kind)?,
        })
    }

    pub const fn kind(&self) -> TargetKind {
        self.allow.kind()
    }

    pub const fn allow(&self) -> &PermissionValue {
        &self.allow
    }

    pub const fn deny(&self) -> &PermissionValue {
        &self.deny
    }

    /// Allowed labels paired with `true`, followed by denied labels paired
    /// with `false`, each group in ascending bit order.
    pub fn entries(&self) -> Vec<(&'static str, bool)> {
        self.allow
            .iter()
            .map(|label| (label, true))
            .chain(self.deny.iter().map(|label| (label, false)))
            .collect()
    }

    /// The override for one permission: `Some(true)` if allowed,
    /// `Some(false)` if denied, `None` to inherit.
    ///
    /// When a bit is set in both masks the allow wins, matching the order of
    /// [`entries`](Self::entries).
    pub const fn resolve(&self, perm: Permissions) -> Option<bool> {
        if self.allow.contains(perm) {
            Some(true)
        } else if self.deny.contains(perm) {
            Some(false)
        } else {
            None
        }
    }

    /// Applies the overwrite to a base permission set: denied bits are
    /// cleared, then allowed bits are set.
    pub const fn apply(&self, base: Permissions) -> Permissions {
        base.difference(self.deny.permissions())
            .union(self.allow.permissions())
    }
}

impl IntoIterator for &ChannelOverwrite {
    type Item = (&'static str, bool);
    type IntoIter = std::vec::IntoIter<(&'static str, bool)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries().into_iter()
    }
}
