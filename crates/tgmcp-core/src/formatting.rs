//! Formatting helpers: remote entities/messages → flat JSON-friendly records.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{DocumentAttribute, Entity, Media, RemoteMessage, UserProfile, UserStatus};

/// `YYYY-MM-DD HH:MM:SS UTC`, or `None` for an absent timestamp.
pub fn format_timestamp(ts: Option<DateTime<Utc>>) -> Option<String> {
    ts.map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
}

/// Media kind tag for a message, `None` when there is no media.
pub fn media_type(media: Option<&Media>) -> Option<&'static str> {
    let kind = match media? {
        Media::Photo => "photo",
        Media::Document(Some(attrs)) => document_kind(attrs),
        Media::Document(None) => "other",
        Media::WebPage => "webpage",
        Media::Geo => "location",
        Media::Contact => "contact",
        Media::Poll => "poll",
        Media::Other => "other",
    };
    Some(kind)
}

fn document_kind(attrs: &[DocumentAttribute]) -> &'static str {
    // First matching attribute wins.
    for attr in attrs {
        match attr {
            DocumentAttribute::Video => return "video",
            DocumentAttribute::Audio { voice: true } => return "voice",
            DocumentAttribute::Audio { voice: false } => return "audio",
            DocumentAttribute::Sticker => return "sticker",
            DocumentAttribute::Animated => return "gif",
            DocumentAttribute::Other => {}
        }
    }
    "document"
}

pub fn user_status(status: Option<&UserStatus>) -> String {
    match status {
        Some(UserStatus::Online) => "online".to_string(),
        Some(UserStatus::Offline { was_online }) => format!(
            "offline (last seen {})",
            format_timestamp(*was_online).unwrap_or_else(|| "None".to_string())
        ),
        Some(UserStatus::Recently) => "recently".to_string(),
        Some(UserStatus::LastWeek) => "last week".to_string(),
        Some(UserStatus::LastMonth) => "last month".to_string(),
        Some(UserStatus::Unknown) | None => "unknown".to_string(),
    }
}

pub fn user_display_name(user: &UserProfile) -> String {
    let name = [user.first_name.as_deref(), user.last_name.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if !name.is_empty() {
        return name;
    }
    match user.username.as_deref() {
        Some(u) if !u.is_empty() => u.to_string(),
        _ => user.id.to_string(),
    }
}

fn title_or_id(title: Option<&str>, id: i64) -> String {
    match title {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => id.to_string(),
    }
}

/// Display name of a sender/chat entity; `Unknown` when there is none.
pub fn display_name(entity: Option<&Entity>) -> String {
    match entity {
        None => "Unknown".to_string(),
        Some(Entity::User(u)) => user_display_name(u),
        Some(Entity::Group(g)) => title_or_id(g.title.as_deref(), g.id),
        Some(Entity::Channel(c)) => title_or_id(c.title.as_deref(), c.id),
        Some(Entity::Other { id }) => id.to_string(),
    }
}

pub fn chat_type(entity: &Entity) -> &'static str {
    match entity {
        Entity::Channel(c) if c.megagroup => "group",
        Entity::Channel(_) => "channel",
        Entity::Group(_) => "group",
        Entity::User(u) if u.bot => "bot",
        Entity::User(_) => "user",
        Entity::Other { .. } => "unknown",
    }
}

/// First `max_chars` characters of `s` (no ellipsis).
pub fn preview(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

/// A message as emitted by the read/search/thread tools.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FormattedMessage {
    pub id: i32,
    pub sender_name: String,
    pub sender_id: Option<i64>,
    pub date: Option<String>,
    pub text: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_msg_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forwarded: Option<bool>,

    // Global search only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<i64>,
}

pub fn format_message(msg: &RemoteMessage) -> FormattedMessage {
    FormattedMessage {
        id: msg.id,
        sender_name: display_name(msg.sender.as_ref()),
        sender_id: msg.sender.as_ref().map(Entity::id),
        date: format_timestamp(msg.date),
        text: msg.text.clone().unwrap_or_default(),
        reply_to_msg_id: msg.reply_to_msg_id,
        media_type: media_type(msg.media.as_ref()),
        forwarded: msg.forwarded.then_some(true),
        chat_name: None,
        chat_id: None,
    }
}

/// User profile fields shared by contact search, chat info and user info.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FormattedUser {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub phone: Option<String>,
    pub bot: bool,
    pub status: String,
}

pub fn format_user(user: &UserProfile) -> FormattedUser {
    FormattedUser {
        id: user.id,
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        username: user.username.clone(),
        phone: user.phone.clone(),
        bot: user.bot,
        status: user_status(user.status.as_ref()),
    }
}
