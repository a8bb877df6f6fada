use crate::{Error, Permissions};
use core::fmt;
use core::str::FromStr;

/// The kind of object a permission mask applies to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TargetKind {
    TextChannel,
    VoiceChannel,
    Role,
    User,
}

/// Bits that mean nothing on any channel.
const GUILD_ONLY: Permissions = Permissions::KICK_MEMBERS
    .union(Permissions::BAN_MEMBERS)
    .union(Permissions::ADMINISTRATOR)
    .union(Permissions::MANAGE_GUILD)
    .union(Permissions::VIEW_AUDIT_LOG)
    .union(Permissions::VIEW_GUILD_INSIGHTS)
    .union(Permissions::CHANGE_NICKNAME)
    .union(Permissions::MANAGE_NICKNAMES)
    .union(Permissions::MANAGE_EMOJIS);

impl TargetKind {
    pub const ALL: [Self; 4] = [
        Self::TextChannel,
        Self::VoiceChannel,
        Self::Role,
        Self::User,
    ];

    /// Bits a text channel can never carry: guild-level and voice-only ones.
    pub const TEXT_FORBIDDEN: Permissions = GUILD_ONLY
        .union(Permissions::PRIORITY_SPEAKER)
        .union(Permissions::STREAM)
        .union(Permissions::CONNECT)
        .union(Permissions::SPEAK)
        .union(Permissions::MUTE_MEMBERS)
        .union(Permissions::DEAFEN_MEMBERS)
        .union(Permissions::MOVE_MEMBERS)
        .union(Permissions::USE_VAD);

    /// Bits a voice channel can never carry: guild-level and text-only ones.
    pub const VOICE_FORBIDDEN: Permissions = GUILD_ONLY
        .union(Permissions::ADD_REACTIONS)
        .union(Permissions::SEND_MESSAGES)
        .union(Permissions::SEND_TTS_MESSAGES)
        .union(Permissions::MANAGE_MESSAGES)
        .union(Permissions::EMBED_LINKS)
        .union(Permissions::ATTACH_FILES)
        .union(Permissions::READ_MESSAGE_HISTORY)
        .union(Permissions::MENTION_EVERYONE)
        .union(Permissions::USE_EXTERNAL_EMOTES);

    /// The bits that are invalid for this kind. Empty for roles and users.
    pub const fn forbidden(self) -> Permissions {
        match self {
            Self::TextChannel => Self::TEXT_FORBIDDEN,
            Self::VoiceChannel => Self::VOICE_FORBIDDEN,
            Self::Role | Self::User => Permissions::empty(),
        }
    }

    pub const fn is_channel(self) -> bool {
        matches!(self, Self::TextChannel | Self::VoiceChannel)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TextChannel => "text channel",
            Self::VoiceChannel => "voice channel",
            Self::Role => "role",
            Self::User => "user",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the short names `text`, `voice`, `role`, `user` as well as the
/// [`Display`](fmt::Display) forms.
impl FromStr for TargetKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" | "text channel" | "text_channel" => Ok(Self::TextChannel),
            "voice" | "voice channel" | "voice_channel" => Ok(Self::VoiceChannel),
            "role" => Ok(Self::Role),
            "user" => Ok(Self::User),
            other => Err(Error::invalid_input(format_args!("{other:?}"))),
        }
    }
}
