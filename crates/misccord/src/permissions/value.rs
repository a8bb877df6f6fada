use crate::{Error, IntoRaw, Permissions, Result, TargetKind};
#[cfg(feature = "tracing")]
use tracing::instrument;

/// A permission mask validated against the kind of object it applies to.
///
/// Construction rejects any bit in [`TargetKind::forbidden`]; once built the
/// value is immutable and every query is a plain bit test.
///
/// # Example
///
/// ```
/// use misccord::{PermissionValue, Permissions, TargetKind};
///
/// let perms = PermissionValue::new(Permissions::SEND_MESSAGES.bits(), TargetKind::TextChannel)?;
/// assert!(perms.has_send_messages());
/// assert_eq!(perms.enabled_permissions(), ["Send Messages"]);
///
/// assert!(PermissionValue::new(Permissions::KICK_MEMBERS.bits(), TargetKind::TextChannel).is_err());
/// # Ok::<(), misccord::Error>(())
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PermissionValue {
    permissions: Permissions,
    kind: TargetKind,
}

impl PermissionValue {
    /// # Errors
    ///
    /// Returns [`Error::InvalidPermissionSet`] if `mask` sets a bit that is
    /// forbidden for `kind`.
    #[cfg_attr(feature = "tracing", instrument(level = "trace"))]
    pub fn new(mask: u64, kind: TargetKind) -> Result<Self> {
        let permissions = Permissions::from_raw(mask);
        let illegal = permissions & kind.forbidden();
        if !illegal.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::debug!(%kind, bits = illegal.bits(), "rejected permission set");
            return Err(Error::InvalidPermissionSet {
                kind,
                bits: illegal,
            });
        }
        Ok(Self { permissions, kind })
    }

    /// Like [`new`](Self::new) but accepts a digit string as well.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for malformed input, otherwise the same
    /// errors as [`new`](Self::new).
    pub fn parse(value: impl IntoRaw, kind: TargetKind) -> Result<Self> {
        Self::new(value.into_raw()?, kind)
    }

    pub const fn kind(&self) -> TargetKind {
        self.kind
    }

    pub const fn permissions(&self) -> Permissions {
        self.permissions
    }

    /// The mask exactly as given, unnamed high bits included.
    pub const fn bits(&self) -> u64 {
        self.permissions.bits()
    }

    /// Labels of every set permission in ascending bit order.
    pub fn enabled_permissions(&self) -> Vec<&'static str> {
        self.iter().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.permissions.labels()
    }

    pub const fn contains(&self, perm: Permissions) -> bool {
        self.permissions.contains(perm)
    }
}

macro_rules! accessors {
    ($($(#[$doc:meta])* $method:ident => $flag:ident;)*) => {
        impl PermissionValue {
            $(
                $(#[$doc])*
                pub const fn $method(&self) -> bool {
                    self.contains(Permissions::$flag)
                }
            )*
        }
    };
}

accessors! {
    has_create_instant_invite => CREATE_INSTANT_INVITE;
    has_kick_members => KICK_MEMBERS;
    has_ban_members => BAN_MEMBERS;
    has_administrator => ADMINISTRATOR;
    has_manage_channels => MANAGE_CHANNELS;
    has_manage_guild => MANAGE_GUILD;
    has_add_reactions => ADD_REACTIONS;
    has_view_audit_log => VIEW_AUDIT_LOG;
    has_priority_speaker => PRIORITY_SPEAKER;
    /// Voice channels only.
    has_stream => STREAM;
    has_view_channel => VIEW_CHANNEL;
    has_send_messages => SEND_MESSAGES;
    has_send_tts_messages => SEND_TTS_MESSAGES;
    has_manage_messages => MANAGE_MESSAGES;
    has_embed_links => EMBED_LINKS;
    has_attach_files => ATTACH_FILES;
    has_read_message_history => READ_MESSAGE_HISTORY;
    has_mention_everyone => MENTION_EVERYONE;
    has_use_external_emotes => USE_EXTERNAL_EMOTES;
    has_view_guild_insights => VIEW_GUILD_INSIGHTS;
    has_connect => CONNECT;
    has_speak => SPEAK;
    has_mute_members => MUTE_MEMBERS;
    has_deafen_members => DEAFEN_MEMBERS;
    has_move_members => MOVE_MEMBERS;
    has_use_vad => USE_VAD;
    has_change_nickname => CHANGE_NICKNAME;
    has_manage_nicknames => MANAGE_NICKNAMES;
    has_manage_roles => MANAGE_ROLES;
    has_manage_webhooks => MANAGE_WEBHOOKS;
    has_manage_emojis => MANAGE_EMOJIS;
}

impl From<PermissionValue> for u64 {
    fn from(value: PermissionValue) -> Self {
        value.bits()
    }
}

impl IntoIterator for &PermissionValue {
    type Item = &'static str;
    type IntoIter = std::vec::IntoIter<&'static str>;

    fn into_iter(self) -> Self::IntoIter {
        self.enabled_permissions().into_iter()
    }
}
