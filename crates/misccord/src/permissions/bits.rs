bitflags::bitflags! {
    /// Permission bits 0 through 30.
    ///
    /// Higher bits are retained as-is but have no name, so they never show up
    /// in [`Permissions::labels`].
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct Permissions: u64 {
        const CREATE_INSTANT_INVITE = 1 << 0;
        const KICK_MEMBERS = 1 << 1;
        const BAN_MEMBERS = 1 << 2;
        /// Grants every permission and bypasses channel overwrites.
        const ADMINISTRATOR = 1 << 3;
        const MANAGE_CHANNELS = 1 << 4;
        const MANAGE_GUILD = 1 << 5;
        const ADD_REACTIONS = 1 << 6;
        const VIEW_AUDIT_LOG = 1 << 7;
        const PRIORITY_SPEAKER = 1 << 8;
        /// Go live in a voice channel.
        const STREAM = 1 << 9;
        const VIEW_CHANNEL = 1 << 10;
        const SEND_MESSAGES = 1 << 11;
        const SEND_TTS_MESSAGES = 1 << 12;
        const MANAGE_MESSAGES = 1 << 13;
        const EMBED_LINKS = 1 << 14;
        const ATTACH_FILES = 1 << 15;
        const READ_MESSAGE_HISTORY = 1 << 16;
        const MENTION_EVERYONE = 1 << 17;
        const USE_EXTERNAL_EMOTES = 1 << 18;
        const VIEW_GUILD_INSIGHTS = 1 << 19;
        const CONNECT = 1 << 20;
        const SPEAK = 1 << 21;
        const MUTE_MEMBERS = 1 << 22;
        const DEAFEN_MEMBERS = 1 << 23;
        const MOVE_MEMBERS = 1 << 24;
        /// Voice activity detection; without it members must push to talk.
        const USE_VAD = 1 << 25;
        const CHANGE_NICKNAME = 1 << 26;
        const MANAGE_NICKNAMES = 1 << 27;
        const MANAGE_ROLES = 1 << 28;
        const MANAGE_WEBHOOKS = 1 << 29;
        const MANAGE_EMOJIS = 1 << 30;
    }
}

const LABELS: [(Permissions, &str); 31] = [
    (Permissions::CREATE_INSTANT_INVITE, "Create Instant Invite"),
    (Permissions::KICK_MEMBERS, "Kick Members"),
    (Permissions::BAN_MEMBERS, "Ban Members"),
    (Permissions::ADMINISTRATOR, "Administrator"),
    (Permissions::MANAGE_CHANNELS, "Manage Channels"),
    (Permissions::MANAGE_GUILD, "Manage Guild"),
    (Permissions::ADD_REACTIONS, "Add Reactions"),
    (Permissions::VIEW_AUDIT_LOG, "View Audit Log"),
    (Permissions::PRIORITY_SPEAKER, "Priority Speaker"),
    (Permissions::STREAM, "Stream"),
    (Permissions::VIEW_CHANNEL, "View Channel"),
    (Permissions::SEND_MESSAGES, "Send Messages"),
    (Permissions::SEND_TTS_MESSAGES, "Send TTS Messages"),
    (Permissions::MANAGE_MESSAGES, "Manage Messages"),
    (Permissions::EMBED_LINKS, "Embed Links"),
    (Permissions::ATTACH_FILES, "Attach Files"),
    (Permissions::READ_MESSAGE_HISTORY, "Read Message History"),
    (Permissions::MENTION_EVERYONE, "Mention Everyone"),
    (Permissions::USE_EXTERNAL_EMOTES, "Use External Emotes"),
    (Permissions::VIEW_GUILD_INSIGHTS, "View Guild Insights"),
    (Permissions::CONNECT, "Connect"),
    (Permissions::SPEAK, "Speak"),
    (Permissions::MUTE_MEMBERS, "Mute Members"),
    (Permissions::DEAFEN_MEMBERS, "Deafen Members"),
    (Permissions::MOVE_MEMBERS, "Move Members"),
    (Permissions::USE_VAD, "Use VAD"),
    (Permissions::CHANGE_NICKNAME, "Change Nickname"),
    (Permissions::MANAGE_NICKNAMES, "Manage Nicknames"),
    (Permissions::MANAGE_ROLES, "Manage Roles"),
    (Permissions::MANAGE_WEBHOOKS, "Manage Webhooks"),
    (Permissions::MANAGE_EMOJIS, "Manage Emojis"),
];

impl Permissions {
    pub const fn from_raw(raw: u64) -> Self {
        Self::from_bits_retain(raw)
    }

    /// Labels of the named permissions set in `self`, in ascending bit order.
    pub fn labels(self) -> impl Iterator<Item = &'static str> {
        LABELS
            .into_iter()
            .filter(move |(perm, _)| self.contains(*perm))
            .map(|(_, label)| label)
    }

    /// The label of a single named permission.
    pub fn label(self) -> Option<&'static str> {
        LABELS
            .into_iter()
            .find(|(perm, _)| *perm == self)
            .map(|(_, label)| label)
    }

    /// Looks a permission up by its label.
    pub fn from_label(label: &str) -> Option<Self> {
        LABELS
            .into_iter()
            .find(|(_, l)| *l == label)
            .map(|(perm, _)| perm)
    }
}

// Permission masks travel as decimal strings in API payloads since they can
// outgrow a double.
#[cfg(feature = "serde")]
impl serde::Serialize for Permissions {
    fn serialize<S: serde::Serializer>(&self, s: S) -> core::result::Result<S::Ok, S::Error> {
        s.collect_str(&self.bits())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Permissions {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> core::result::Result<Self, D::Error> {
        crate::serde_ext::deserialize_raw(d, "a permission integer or digit string")
            .map(Self::from_raw)
    }
}
