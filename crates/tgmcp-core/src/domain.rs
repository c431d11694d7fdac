//! Transient projections of remote Telegram entities.
//!
//! Nothing here is owned or cached: every value is read from the remote service
//! for the current call and dropped afterwards.

use chrono::{DateTime, Utc};

/// A chat or user reference as given by the caller, after normalization.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChatRef {
    Id(i64),
    Handle(String),
}

impl std::fmt::Display for ChatRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Handle(h) => write!(f, "@{h}"),
        }
    }
}

/// Online status of a user account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserStatus {
    Online,
    Offline { was_online: Option<DateTime<Utc>> },
    Recently,
    LastWeek,
    LastMonth,
    Unknown,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserProfile {
    pub id: i64,
    /// Needed to address the user in follow-up requests.
    pub access_hash: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub phone: Option<String>,
    pub bot: bool,
    pub status: Option<UserStatus>,
}

/// Basic (legacy) group chat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupInfo {
    pub id: i64,
    pub title: Option<String>,
    pub participants_count: Option<i32>,
}

/// Broadcast channel or supergroup (`megagroup`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelInfo {
    pub id: i64,
    pub access_hash: Option<i64>,
    pub title: Option<String>,
    pub username: Option<String>,
    pub megagroup: bool,
    pub participants_count: Option<i32>,
}

/// The closed set of entity kinds the formatters handle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entity {
    User(UserProfile),
    Group(GroupInfo),
    Channel(ChannelInfo),
    /// Anything the remote service may introduce that we do not model.
    Other { id: i64 },
}

impl Entity {
    pub fn id(&self) -> i64 {
        match self {
            Self::User(u) => u.id,
            Self::Group(g) => g.id,
            Self::Channel(c) => c.id,
            Self::Other { id } => *id,
        }
    }

    /// Type name reported when a user was expected but something else was found.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::User(_) => "User",
            Self::Group(_) => "Chat",
            Self::Channel(_) => "Channel",
            Self::Other { .. } => "Unknown",
        }
    }

    /// Id in the "marked" form used by dialog listings (`-id` for groups, `-100…` for channels).
    pub fn marked_id(&self) -> i64 {
        match self {
            Self::User(u) => u.id,
            Self::Group(g) => -g.id,
            Self::Channel(c) => -(1_000_000_000_000 + c.id),
            Self::Other { id } => *id,
        }
    }

    /// Whether `id` refers to this entity, either bare or in marked form.
    pub fn matches_id(&self, id: i64) -> bool {
        self.id() == id || self.marked_id() == id
    }
}

/// Document attributes inspected for media classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DocumentAttribute {
    Video,
    Audio { voice: bool },
    Sticker,
    Animated,
    Other,
}

/// Media payload attached to a message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Media {
    Photo,
    /// `None` when the payload carries no document body.
    Document(Option<Vec<DocumentAttribute>>),
    WebPage,
    Geo,
    Contact,
    Poll,
    Other,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteMessage {
    pub id: i32,
    pub date: Option<DateTime<Utc>>,
    pub text: Option<String>,
    pub sender: Option<Entity>,
    pub reply_to_msg_id: Option<i32>,
    pub media: Option<Media>,
    pub forwarded: bool,
    pub pinned: bool,
    /// Chat the message lives in, when the adapter knows it.
    pub chat: Option<Entity>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dialog {
    pub entity: Entity,
    pub id: i64,
    pub title: String,
    pub unread_count: i32,
    pub last_message: Option<RemoteMessage>,
}

/// Extra chat fields only available through the "full info" requests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FullChat {
    pub about: Option<String>,
    pub participants_count: Option<i32>,
}

/// Confirmation returned by send/edit calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentMessage {
    pub id: i32,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseMode {
    Markdown,
    Html,
}

impl ParseMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Some(Self::Markdown),
            "html" => Some(Self::Html),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marked_ids_follow_peer_kind() {
        let ch = Entity::Channel(ChannelInfo {
            id: 1234,
            access_hash: None,
            title: None,
            username: None,
            megagroup: false,
            participants_count: None,
        });
        assert_eq!(ch.marked_id(), -1_000_000_001_234);
        assert!(ch.matches_id(1234));
        assert!(ch.matches_id(-1_000_000_001_234));

        let g = Entity::Group(GroupInfo {
            id: 77,
            title: None,
            participants_count: None,
        });
        assert_eq!(g.marked_id(), -77);
        assert!(!g.matches_id(78));
    }

    #[test]
    fn parse_mode_accepts_known_names() {
        assert_eq!(ParseMode::parse("Markdown"), Some(ParseMode::Markdown));
        assert_eq!(ParseMode::parse("html"), Some(ParseMode::Html));
        assert_eq!(ParseMode::parse("bbcode"), None);
    }
}
