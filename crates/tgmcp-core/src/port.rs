use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    domain::{ChatRef, Dialog, Entity, FullChat, ParseMode, RemoteMessage, SentMessage, UserProfile},
    Result,
};

/// History query passed to [`TelegramPort::messages`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HistoryQuery {
    /// Upper bound on messages fetched from the server.
    pub limit: usize,
    /// Only messages older than this id (`0` = from the newest).
    pub offset_id: i32,
    /// Server-side cutoff: only messages sent before this instant.
    pub max_date: Option<DateTime<Utc>>,
}

/// Newest-first message iterator.
///
/// Pulling is lazy so callers can stop early without fetching the rest.
#[async_trait]
pub trait MessageStream: Send {
    async fn next(&mut self) -> Result<Option<RemoteMessage>>;
}

/// Search scope for [`TelegramPort::search_messages`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchScope {
    Chat(ChatRef),
    Global,
}

/// Port for the authenticated Telegram user client.
///
/// The MTProto adapter lives in `tgmcp-telegram`; tests use an in-memory fake.
#[async_trait]
pub trait TelegramPort: Send + Sync {
    fn is_connected(&self) -> bool;

    async fn list_dialogs(&self, limit: usize, offset_id: i32) -> Result<Vec<Dialog>>;

    async fn get_entity(&self, chat: &ChatRef) -> Result<Entity>;

    /// Description and member count of a group/channel.
    async fn full_chat(&self, entity: &Entity) -> Result<FullChat>;

    /// Profile bio of a user.
    async fn user_bio(&self, user: &UserProfile) -> Result<Option<String>>;

    async fn messages(&self, chat: &ChatRef, query: HistoryQuery)
        -> Result<Box<dyn MessageStream>>;

    /// Text search; global results carry their origin chat in `RemoteMessage::chat`.
    async fn search_messages(
        &self,
        scope: &SearchScope,
        query: &str,
        from_user: Option<&Entity>,
        limit: usize,
    ) -> Result<Vec<RemoteMessage>>;

    async fn get_message(&self, chat: &ChatRef, id: i32) -> Result<Option<RemoteMessage>>;

    /// Replies to `id`, newest-first as the server returns them.
    async fn replies(&self, chat: &ChatRef, id: i32, limit: usize) -> Result<Vec<RemoteMessage>>;

    async fn send_message(
        &self,
        chat: &ChatRef,
        text: &str,
        reply_to: Option<i32>,
        parse_mode: Option<ParseMode>,
    ) -> Result<SentMessage>;

    async fn edit_message(
        &self,
        chat: &ChatRef,
        id: i32,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> Result<SentMessage>;

    async fn delete_message(&self, chat: &ChatRef, id: i32) -> Result<()>;

    async fn search_contacts(&self, query: &str, limit: usize) -> Result<Vec<UserProfile>>;
}
