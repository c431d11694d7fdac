//! Telegram adapter (grammers MTProto user client).
//!
//! This crate implements the `tgmcp-core` TelegramPort for an authorized user
//! account. Most requests go out as raw TL functions built from the entity the
//! caller resolved; the high-level client is used for login, username lookup,
//! dialog scans, global search and sending (it handles markdown/html entities).

use std::{
    collections::VecDeque,
    future::Future,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use async_trait::async_trait;
use grammers_client::{
    types::InputMessage, Client, Config as ClientConfig, InitParams, InvocationError,
};
use grammers_tl_types as tl;

pub mod cache;
pub mod convert;
pub mod session;

use cache::EntityCache;
use convert::PeerMap;
use tgmcp_core::{
    config::{Config, ENV_API_HASH, ENV_API_ID, ENV_SESSION_STRING},
    domain::{
        ChatRef, Dialog, Entity, FullChat, ParseMode, RemoteMessage, SentMessage, UserProfile,
    },
    errors::{Error, Rejection},
    formatting::display_name,
    port::{HistoryQuery, MessageStream, SearchScope, TelegramPort},
    utils::best_effort,
    Result,
};

/// Server-side cap on one dialogs/history/replies/search page.
const PAGE_MAX: usize = 100;

/// How far past `limit` a global search scans when results are filtered by
/// sender. Global search has no server-side sender filter.
const SENDER_SCAN_FACTOR: usize = 20;

fn page_limit(limit: usize) -> i32 {
    limit.min(PAGE_MAX) as i32
}

/// Drain an offset-paged listing until `limit` items or no next offset.
///
/// `fetch` gets the current offset and a page size of at most [`PAGE_MAX`] and
/// returns the page plus the offset of the following one, if any.
async fn collect_pages<T, O, F, Fut>(limit: usize, start: O, mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(O, i32) -> Fut,
    Fut: Future<Output = Result<(Vec<T>, Option<O>)>>,
{
    let mut out = Vec::new();
    let mut offset = start;
    while out.len() < limit {
        let (page, next) = fetch(offset, page_limit(limit - out.len())).await?;
        out.extend(page);
        match next {
            Some(next) => offset = next,
            None => break,
        }
    }
    out.truncate(limit);
    Ok(out)
}

/// Id-paged message listings continue below the last message of a full page.
fn next_message_offset(page: &[RemoteMessage], requested: i32) -> Option<i32> {
    if page.len() < usize::try_from(requested).unwrap_or(0) {
        return None;
    }
    page.last().map(|m| m.id)
}

/// Where the next `messages.getDialogs` page starts.
#[derive(Clone)]
struct DialogOffset {
    date: i32,
    id: i32,
    peer: tl::enums::InputPeer,
}

fn map_err(e: InvocationError) -> Error {
    if let InvocationError::Rpc(rpc) = &e {
        if let Some(r) = Rejection::from_rpc_name(&rpc.name) {
            return Error::Rejected(r);
        }
    }
    Error::External(e.to_string())
}

fn not_found(chat: &ChatRef) -> Error {
    Error::invalid(format!("Cannot find any entity corresponding to \"{chat}\""))
}

fn input_message(text: &str, parse_mode: Option<ParseMode>) -> InputMessage {
    match parse_mode {
        None => InputMessage::text(text),
        Some(ParseMode::Markdown) => InputMessage::markdown(text),
        Some(ParseMode::Html) => InputMessage::html(text),
    }
}

/// A live client plus the account it is logged in as.
#[derive(Clone)]
struct Live {
    client: Client,
    me: Entity,
}

/// Connection handle owned by the server.
///
/// `disconnected → connecting → connected | failed`. There is no reconnect: a
/// failed `connect` leaves the handle disconnected for good.
pub struct TelegramConnection {
    api_id: Option<i32>,
    api_hash: Option<String>,
    session_string: Option<String>,
    live: RwLock<Option<Live>>,
    entities: EntityCache,
}

impl TelegramConnection {
    pub fn new(config: &Config) -> Self {
        Self {
            api_id: config.api_id,
            api_hash: config.api_hash.clone(),
            session_string: config.session_string.clone(),
            live: RwLock::new(None),
            entities: EntityCache::default(),
        }
    }

    fn state(&self) -> RwLockReadGuard<'_, Option<Live>> {
        self.live.read().unwrap_or_else(|e| e.into_inner())
    }

    fn state_mut(&self) -> RwLockWriteGuard<'_, Option<Live>> {
        self.live.write().unwrap_or_else(|e| e.into_inner())
    }

    fn live(&self) -> Result<Live> {
        self.state()
            .clone()
            .ok_or_else(|| Error::External("not connected to Telegram".to_string()))
    }

    /// Connect and verify the session. `false` means the cause was logged.
    pub async fn connect(&self) -> bool {
        tracing::info!("Connecting to Telegram");
        match self.open().await {
            Ok(live) => {
                if let Entity::User(me) = &live.me {
                    tracing::info!(
                        "Connected as {} (@{})",
                        me.first_name.as_deref().unwrap_or_default(),
                        me.username.as_deref().unwrap_or_default()
                    );
                }
                *self.state_mut() = Some(live);
                true
            }
            Err(e) => {
                tracing::error!("Telegram connection failed: {e}");
                false
            }
        }
    }

    async fn open(&self) -> Result<Live> {
        let api_id = self
            .api_id
            .ok_or_else(|| Error::Config(format!("{ENV_API_ID} is missing or not a number")))?;
        let api_hash = self
            .api_hash
            .clone()
            .ok_or_else(|| Error::Config(format!("{ENV_API_HASH} is missing")))?;
        let token = self
            .session_string
            .as_deref()
            .ok_or_else(|| Error::Config(format!("{ENV_SESSION_STRING} is missing")))?;
        let session = session::decode_session(token)?;

        let client = Client::connect(ClientConfig {
            session,
            api_id,
            api_hash,
            params: InitParams::default(),
        })
        .await
        .map_err(|e| Error::External(format!("failed to reach Telegram: {e}")))?;

        if !client.is_authorized().await.map_err(map_err)? {
            return Err(Error::Auth(
                "session is not authorized; generate a new one with tgmcp-session".to_string(),
            ));
        }

        // Liveness check and our own identity for outgoing private messages.
        let me = client.get_me().await.map_err(map_err)?;
        Ok(Live {
            client,
            me: Entity::User(convert::user(&me.raw)),
        })
    }

    /// Drop the client. Safe to call repeatedly or before `connect`.
    pub fn disconnect(&self) {
        self.entities.clear();
        if self.state_mut().take().is_some() {
            tracing::info!("Disconnected from Telegram");
        }
    }

    async fn resolve(&self, live: &Live, chat: &ChatRef) -> Result<Entity> {
        match chat {
            ChatRef::Handle(h) if h.eq_ignore_ascii_case("me") || h.eq_ignore_ascii_case("self") => {
                Ok(live.me.clone())
            }
            ChatRef::Handle(h) => {
                if let Some(known) = self.entities.by_handle(h) {
                    return Ok(known);
                }
                self.resolve_username(live, chat, h).await
            }
            ChatRef::Id(id) => {
                if live.me.matches_id(*id) {
                    return Ok(live.me.clone());
                }
                if let Some(known) = self.entities.by_id(*id) {
                    return Ok(known);
                }
                // Access hashes for bare ids are only known through the dialog list.
                tracing::debug!("scanning dialogs for {id}");
                let mut dialogs = live.client.iter_dialogs();
                while let Some(dialog) = dialogs.next().await.map_err(map_err)? {
                    let entity = convert::entity(dialog.chat());
                    self.entities.remember(&entity);
                    if entity.matches_id(*id) {
                        return Ok(entity);
                    }
                }
                Err(not_found(chat))
            }
        }
    }

    async fn resolve_username(&self, live: &Live, chat: &ChatRef, handle: &str) -> Result<Entity> {
        match live.client.resolve_username(handle).await {
            Ok(Some(found)) => {
                let entity = convert::entity(&found);
                self.entities.remember(&entity);
                Ok(entity)
            }
            Ok(None) => Err(not_found(chat)),
            Err(InvocationError::Rpc(rpc)) if rpc.name.starts_with("USERNAME_") => {
                Err(not_found(chat))
            }
            Err(e) => Err(map_err(e)),
        }
    }

    async fn fetch_message(&self, live: &Live, entity: &Entity, id: i32) -> Result<Option<RemoteMessage>> {
        let ids: Vec<tl::enums::InputMessage> = vec![tl::types::InputMessageId { id }.into()];
        let page = match entity {
            Entity::Channel(c) => {
                live.client
                    .invoke(&tl::functions::channels::GetMessages {
                        channel: convert::input_channel(c),
                        id: ids,
                    })
                    .await
            }
            _ => {
                live.client
                    .invoke(&tl::functions::messages::GetMessages { id: ids })
                    .await
            }
        }
        .map_err(map_err)?;

        Ok(convert::message_in(
            convert::messages_page(page, Some(&live.me)),
            entity,
            id,
        ))
    }

    /// In-chat search, sender filter applied by the server.
    async fn search_chat(
        &self,
        live: &Live,
        chat: &Entity,
        query: &str,
        from_user: Option<&Entity>,
        limit: usize,
    ) -> Result<Vec<RemoteMessage>> {
        let peer = convert::input_peer(chat)?;
        let from_id = from_user.map(convert::input_peer).transpose()?;
        collect_pages(limit, 0, |offset_id, page_size| {
            let client = live.client.clone();
            let me = live.me.clone();
            let request = tl::functions::messages::Search {
                peer: peer.clone(),
                q: query.to_string(),
                from_id: from_id.clone(),
                saved_peer_id: None,
                saved_reaction: None,
                top_msg_id: None,
                filter: tl::types::InputMessagesFilterEmpty {}.into(),
                min_date: 0,
                max_date: 0,
                offset_id,
                add_offset: 0,
                limit: page_size,
                max_id: 0,
                min_id: 0,
                hash: 0,
            };
            async move {
                let page = convert::messages_page(
                    client.invoke(&request).await.map_err(map_err)?,
                    Some(&me),
                );
                let next = next_message_offset(&page, page_size);
                Ok((page, next))
            }
        })
        .await
    }
}

/// One `messages.getDialogs` page and the offset of the next one.
async fn dialogs_page(
    client: &Client,
    me: &Entity,
    offset: DialogOffset,
    limit: i32,
) -> Result<(Vec<Dialog>, Option<DialogOffset>)> {
    let request = tl::functions::messages::GetDialogs {
        exclude_pinned: false,
        folder_id: None,
        offset_date: offset.date,
        offset_id: offset.id,
        offset_peer: offset.peer,
        limit,
        hash: 0,
    };
    let (dialogs, messages, users, chats, complete) =
        match client.invoke(&request).await.map_err(map_err)? {
            tl::enums::messages::Dialogs::Dialogs(d) => (d.dialogs, d.messages, d.users, d.chats, true),
            tl::enums::messages::Dialogs::Slice(d) => (d.dialogs, d.messages, d.users, d.chats, false),
            tl::enums::messages::Dialogs::NotModified(_) => return Ok((Vec::new(), None)),
        };
    let peers = PeerMap::new(&users, &chats, Some(me));
    let raw: Vec<&tl::types::Dialog> = dialogs
        .iter()
        .filter_map(|d| match d {
            tl::enums::Dialog::Dialog(d) => Some(d),
            tl::enums::Dialog::Folder(_) => None,
        })
        .collect();

    let top = |d: &tl::types::Dialog| {
        messages
            .iter()
            .find(|m| convert::is_message_of(m, d.top_message, &d.peer))
    };

    let page = raw
        .iter()
        .copied()
        .filter_map(|d| {
            let entity = peers.get(&d.peer)?;
            Some(Dialog {
                id: entity.marked_id(),
                title: display_name(Some(&entity)),
                unread_count: d.unread_count,
                last_message: top(d).and_then(|m| peers.message(m)),
                entity,
            })
        })
        .collect();

    let full_page = dialogs.len() >= usize::try_from(limit).unwrap_or(0);
    let next = match raw.last().copied() {
        Some(last) if !complete && full_page => peers
            .get(&last.peer)
            .and_then(|e| convert::input_peer(&e).ok())
            .map(|peer| DialogOffset {
                date: top(last).map_or(0, convert::message_date),
                id: last.top_message,
                peer,
            }),
        _ => None,
    };
    Ok((page, next))
}

/// Lazily paged chat history, newest first.
///
/// Pages are fetched only when the buffer runs dry, so a caller that stops
/// early never requests the remaining pages.
struct HistoryStream {
    client: Client,
    me: Entity,
    peer: tl::enums::InputPeer,
    remaining: usize,
    offset_id: i32,
    offset_date: i32,
    buffer: VecDeque<RemoteMessage>,
    exhausted: bool,
}

impl HistoryStream {
    async fn fill(&mut self) -> Result<()> {
        let want = self.remaining.min(PAGE_MAX);
        let request = tl::functions::messages::GetHistory {
            peer: self.peer.clone(),
            offset_id: self.offset_id,
            offset_date: self.offset_date,
            add_offset: 0,
            limit: page_limit(want),
            max_id: 0,
            min_id: 0,
            hash: 0,
        };
        let page = convert::messages_page(
            self.client.invoke(&request).await.map_err(map_err)?,
            Some(&self.me),
        );

        if page.len() < want {
            self.exhausted = true;
        }
        if let Some(last) = page.last() {
            self.offset_id = last.id;
            self.offset_date = 0;
        }
        self.buffer.extend(page);
        Ok(())
    }
}

#[async_trait]
impl MessageStream for HistoryStream {
    async fn next(&mut self) -> Result<Option<RemoteMessage>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        if self.buffer.is_empty() && !self.exhausted {
            self.fill().await?;
        }
        let item = self.buffer.pop_front();
        if item.is_some() {
            self.remaining -= 1;
        }
        Ok(item)
    }
}

fn keep_hit(found: &mut Vec<RemoteMessage>, msg: RemoteMessage, from_user: Option<&Entity>) {
    let wanted = match from_user {
        Some(user) => msg.sender.as_ref().map(Entity::id) == Some(user.id()),
        None => true,
    };
    if wanted {
        found.push(msg);
    }
}

#[async_trait]
impl TelegramPort for TelegramConnection {
    fn is_connected(&self) -> bool {
        self.state().is_some()
    }

    async fn list_dialogs(&self, limit: usize, offset_id: i32) -> Result<Vec<Dialog>> {
        let live = self.live()?;
        let start = DialogOffset {
            date: 0,
            id: offset_id,
            peer: tl::enums::InputPeer::Empty,
        };
        let dialogs = collect_pages(limit, start, |offset, page_size| {
            let client = live.client.clone();
            let me = live.me.clone();
            async move { dialogs_page(&client, &me, offset, page_size).await }
        })
        .await?;

        for d in &dialogs {
            self.entities.remember(&d.entity);
        }
        Ok(dialogs)
    }

    async fn get_entity(&self, chat: &ChatRef) -> Result<Entity> {
        let live = self.live()?;
        self.resolve(&live, chat).await
    }

    async fn full_chat(&self, entity: &Entity) -> Result<FullChat> {
        let live = self.live()?;
        let full = match entity {
            Entity::Channel(c) => {
                live.client
                    .invoke(&tl::functions::channels::GetFullChannel {
                        channel: convert::input_channel(c),
                    })
                    .await
            }
            Entity::Group(g) => {
                live.client
                    .invoke(&tl::functions::messages::GetFullChat { chat_id: g.id })
                    .await
            }
            other => {
                return Err(Error::invalid(format!(
                    "{} is not a group or channel",
                    other.kind_name()
                )))
            }
        }
        .map_err(map_err)?;

        let tl::enums::messages::ChatFull::Full(full) = full;
        Ok(convert::full_chat(&full.full_chat))
    }

    async fn user_bio(&self, user: &UserProfile) -> Result<Option<String>> {
        let live = self.live()?;
        let tl::enums::users::UserFull::Full(full) = live
            .client
            .invoke(&tl::functions::users::GetFullUser {
                id: convert::input_user(user),
            })
            .await
            .map_err(map_err)?;
        let tl::enums::UserFull::Full(full) = full.full_user;
        Ok(full.about)
    }

    async fn messages(
        &self,
        chat: &ChatRef,
        query: HistoryQuery,
    ) -> Result<Box<dyn MessageStream>> {
        let live = self.live()?;
        let peer = convert::input_peer(&self.resolve(&live, chat).await?)?;
        let offset_date = query
            .max_date
            .map_or(0, |d| i32::try_from(d.timestamp()).unwrap_or(i32::MAX));

        Ok(Box::new(HistoryStream {
            client: live.client,
            me: live.me,
            peer,
            remaining: query.limit,
            offset_id: query.offset_id,
            offset_date,
            buffer: VecDeque::new(),
            exhausted: false,
        }))
    }

    async fn search_messages(
        &self,
        scope: &SearchScope,
        query: &str,
        from_user: Option<&Entity>,
        limit: usize,
    ) -> Result<Vec<RemoteMessage>> {
        let live = self.live()?;
        let found = match scope {
            SearchScope::Chat(chat) => {
                let entity = self.resolve(&live, chat).await?;
                self.search_chat(&live, &entity, query, from_user, limit).await?
            }
            SearchScope::Global => {
                let scan = match from_user {
                    Some(_) => limit.saturating_mul(SENDER_SCAN_FACTOR),
                    None => limit,
                };
                let mut found = Vec::new();
                let mut hits = live.client.search_all_messages().query(query).limit(scan);
                while found.len() < limit {
                    let Some(msg) = hits.next().await.map_err(map_err)? else {
                        break;
                    };
                    keep_hit(&mut found, convert::client_message(&msg), from_user);
                }
                found
            }
        };

        tracing::debug!("search {query:?}: {} hits", found.len());
        Ok(found)
    }

    async fn get_message(&self, chat: &ChatRef, id: i32) -> Result<Option<RemoteMessage>> {
        let live = self.live()?;
        let entity = self.resolve(&live, chat).await?;
        self.fetch_message(&live, &entity, id).await
    }

    async fn replies(&self, chat: &ChatRef, id: i32, limit: usize) -> Result<Vec<RemoteMessage>> {
        let live = self.live()?;
        let peer = convert::input_peer(&self.resolve(&live, chat).await?)?;
        collect_pages(limit, 0, |offset_id, page_size| {
            let client = live.client.clone();
            let me = live.me.clone();
            let request = tl::functions::messages::GetReplies {
                peer: peer.clone(),
                msg_id: id,
                offset_id,
                offset_date: 0,
                add_offset: 0,
                limit: page_size,
                max_id: 0,
                min_id: 0,
                hash: 0,
            };
            async move {
                let page = convert::messages_page(
                    client.invoke(&request).await.map_err(map_err)?,
                    Some(&me),
                );
                let next = next_message_offset(&page, page_size);
                Ok((page, next))
            }
        })
        .await
    }

    async fn send_message(
        &self,
        chat: &ChatRef,
        text: &str,
        reply_to: Option<i32>,
        parse_mode: Option<ParseMode>,
    ) -> Result<SentMessage> {
        let live = self.live()?;
        let target = convert::packed(&self.resolve(&live, chat).await?)?;
        let sent = live
            .client
            .send_message(target, input_message(text, parse_mode).reply_to(reply_to))
            .await
            .map_err(map_err)?;

        Ok(SentMessage {
            id: sent.id(),
            date: Some(sent.date()),
        })
    }

    async fn edit_message(
        &self,
        chat: &ChatRef,
        id: i32,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> Result<SentMessage> {
        let live = self.live()?;
        let entity = self.resolve(&live, chat).await?;
        live.client
            .edit_message(convert::packed(&entity)?, id, input_message(text, parse_mode))
            .await
            .map_err(map_err)?;

        // The edit call returns nothing; read the message back for its date.
        let date = best_effort("edited message date", self.fetch_message(&live, &entity, id))
            .await
            .flatten()
            .and_then(|m| m.date);
        Ok(SentMessage { id, date })
    }

    async fn delete_message(&self, chat: &ChatRef, id: i32) -> Result<()> {
        let live = self.live()?;
        let target = convert::packed(&self.resolve(&live, chat).await?)?;
        live.client
            .delete_messages(target, &[id])
            .await
            .map_err(map_err)?;
        Ok(())
    }

    async fn search_contacts(&self, query: &str, limit: usize) -> Result<Vec<UserProfile>> {
        let live = self.live()?;
        let tl::enums::contacts::Found::Found(found) = live
            .client
            .invoke(&tl::functions::contacts::Search {
                q: query.to_string(),
                limit: i32::try_from(limit).unwrap_or(i32::MAX),
            })
            .await
            .map_err(map_err)?;

        Ok(found
            .users
            .iter()
            .filter_map(|u| match u {
                tl::enums::User::User(u) => Some(convert::user(u)),
                tl::enums::User::Empty(_) => None,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline() -> TelegramConnection {
        TelegramConnection::new(&Config::default())
    }

    #[test]
    fn starts_disconnected_and_disconnect_is_idempotent() {
        let conn = offline();
        assert!(!conn.is_connected());
        conn.disconnect();
        conn.disconnect();
        assert!(!conn.is_connected());
    }

    #[tokio::test]
    async fn connect_fails_closed_without_credentials() {
        let conn = offline();
        assert!(!conn.connect().await);
        assert!(!conn.is_connected());
    }

    #[tokio::test]
    async fn connect_fails_closed_on_garbage_session() {
        let conn = TelegramConnection::new(&Config {
            api_id: Some(1),
            api_hash: Some("hash".to_string()),
            session_string: Some("%%%".to_string()),
            env_file: None,
        });
        assert!(!conn.connect().await);
        assert!(!conn.is_connected());
    }

    #[tokio::test]
    async fn calls_before_connect_are_errors() {
        let conn = offline();
        let err = conn.list_dialogs(5, 0).await.unwrap_err();
        assert!(matches!(err, Error::External(_)));
    }

    #[test]
    fn page_limit_is_capped() {
        assert_eq!(page_limit(5), 5);
        assert_eq!(page_limit(5_000), 100);
    }

    fn rpc(code: i32, name: &str) -> InvocationError {
        InvocationError::Rpc(
            tl::types::RpcError {
                error_code: code,
                error_message: name.to_string(),
            }
            .into(),
        )
    }

    #[test]
    fn known_rpc_errors_become_rejections() {
        assert!(matches!(
            map_err(rpc(400, "CHAT_ADMIN_REQUIRED")),
            Error::Rejected(Rejection::AdminRequired)
        ));
        assert!(matches!(
            map_err(rpc(403, "MESSAGE_AUTHOR_REQUIRED")),
            Error::Rejected(Rejection::MessageAuthorRequired)
        ));
    }

    #[test]
    fn other_rpc_errors_pass_through_unprefixed() {
        let err = map_err(rpc(400, "PEER_ID_INVALID"));
        let Error::External(text) = &err else {
            panic!("expected External, got {err:?}");
        };
        assert!(text.contains("PEER_ID_INVALID"), "{text}");
        assert!(!text.starts_with("telegram error"), "{text}");
    }

    /// Newest-first ids `total..=1`, served like an id-paged history.
    fn pager(
        total: i32,
        sizes: &std::sync::Mutex<Vec<i32>>,
        offset_id: i32,
        limit: i32,
    ) -> Result<(Vec<RemoteMessage>, Option<i32>)> {
        sizes.lock().unwrap().push(limit);
        let top = if offset_id == 0 { total } else { offset_id - 1 };
        let page: Vec<RemoteMessage> = (1..=top)
            .rev()
            .take(limit as usize)
            .map(|id| RemoteMessage {
                id,
                date: None,
                text: None,
                sender: None,
                reply_to_msg_id: None,
                media: None,
                forwarded: false,
                pinned: false,
                chat: None,
            })
            .collect();
        let next = next_message_offset(&page, limit);
        Ok((page, next))
    }

    #[tokio::test]
    async fn listings_page_past_one_server_page() {
        let sizes = std::sync::Mutex::new(Vec::new());
        let got = collect_pages(230, 0, |offset, limit| {
            let page = pager(1_000, &sizes, offset, limit);
            async move { page }
        })
        .await
        .unwrap();

        assert_eq!(got.len(), 230);
        assert_eq!(got.first().map(|m| m.id), Some(1_000));
        assert_eq!(got.last().map(|m| m.id), Some(771));
        assert_eq!(*sizes.lock().unwrap(), vec![100, 100, 30]);
    }

    #[tokio::test]
    async fn listings_stop_when_the_server_runs_out() {
        let sizes = std::sync::Mutex::new(Vec::new());
        let got = collect_pages(300, 0, |offset, limit| {
            let page = pager(150, &sizes, offset, limit);
            async move { page }
        })
        .await
        .unwrap();

        assert_eq!(got.len(), 150);
        assert_eq!(*sizes.lock().unwrap(), vec![100, 100]);
    }

    #[test]
    fn short_or_empty_pages_have_no_successor() {
        assert_eq!(next_message_offset(&[], 10), None);
    }
}
