//! In-memory [`TelegramPort`] used by unit tests. Records every remote call.

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::{
    domain::*,
    errors::{Error, Rejection},
    port::{HistoryQuery, MessageStream, SearchScope, TelegramPort},
    Result,
};

#[derive(Default)]
pub struct FakeTelegram {
    pub connected: bool,
    pub calls: Mutex<Vec<&'static str>>,

    pub dialogs: Vec<Dialog>,
    pub entities: Vec<Entity>,
    /// `None` makes `full_chat` fail.
    pub full_chat: Option<FullChat>,
    /// `None` makes `user_bio` fail.
    pub bio: Option<Option<String>>,
    /// Newest-first.
    pub history: Vec<RemoteMessage>,
    pub pulled: Arc<AtomicUsize>,
    pub last_query: Mutex<Option<HistoryQuery>>,
    pub search_results: Vec<RemoteMessage>,
    pub last_search: Mutex<Option<(SearchScope, String, Option<i64>, usize)>>,
    /// Newest-first.
    pub replies: Vec<RemoteMessage>,
    pub contacts: Vec<UserProfile>,
    pub sent: Mutex<Vec<(ChatRef, String, Option<i32>, Option<ParseMode>)>>,
    pub deleted: Mutex<Vec<(ChatRef, i32)>>,

    /// Returned by every write call when set.
    pub reject: Option<Rejection>,
    /// Returned by `get_entity` when set.
    pub entity_error: Option<String>,
}

impl FakeTelegram {
    pub fn connected() -> Self {
        Self {
            connected: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    fn write_guard(&self) -> Result<()> {
        match self.reject {
            Some(r) => Err(Error::Rejected(r)),
            None => Ok(()),
        }
    }
}

pub fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

pub fn user(id: i64, first: &str) -> UserProfile {
    UserProfile {
        id,
        access_hash: Some(id * 7),
        first_name: Some(first.to_string()),
        last_name: None,
        username: None,
        phone: None,
        bot: false,
        status: None,
    }
}

pub fn channel(id: i64, title: &str, megagroup: bool) -> Entity {
    Entity::Channel(ChannelInfo {
        id,
        access_hash: Some(id * 11),
        title: Some(title.to_string()),
        username: None,
        megagroup,
        participants_count: None,
    })
}

pub fn message(id: i32, secs: i64, text: &str) -> RemoteMessage {
    RemoteMessage {
        id,
        date: Some(ts(secs)),
        text: Some(text.to_string()),
        sender: Some(Entity::User(user(1, "Ann"))),
        reply_to_msg_id: None,
        media: None,
        forwarded: false,
        pinned: false,
        chat: None,
    }
}

pub fn dialog(entity: Entity, title: &str) -> Dialog {
    Dialog {
        id: entity.marked_id(),
        entity,
        title: title.to_string(),
        unread_count: 0,
        last_message: None,
    }
}

struct FakeStream {
    items: VecDeque<RemoteMessage>,
    pulled: Arc<AtomicUsize>,
}

#[async_trait]
impl MessageStream for FakeStream {
    async fn next(&mut self) -> Result<Option<RemoteMessage>> {
        let item = self.items.pop_front();
        if item.is_some() {
            self.pulled.fetch_add(1, Ordering::SeqCst);
        }
        Ok(item)
    }
}

#[async_trait]
impl TelegramPort for FakeTelegram {
    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn list_dialogs(&self, limit: usize, _offset_id: i32) -> Result<Vec<Dialog>> {
        self.record("list_dialogs");
        Ok(self.dialogs.iter().take(limit).cloned().collect())
    }

    async fn get_entity(&self, chat: &ChatRef) -> Result<Entity> {
        self.record("get_entity");
        if let Some(e) = &self.entity_error {
            return Err(Error::External(e.clone()));
        }
        let found = self.entities.iter().find(|e| match (chat, e) {
            (ChatRef::Id(id), e) => e.matches_id(*id),
            (ChatRef::Handle(h), Entity::User(u)) => u.username.as_deref() == Some(h),
            (ChatRef::Handle(h), Entity::Channel(c)) => c.username.as_deref() == Some(h),
            _ => false,
        });
        found.cloned().ok_or_else(|| {
            Error::invalid(format!(
                "Cannot find any entity corresponding to \"{chat}\""
            ))
        })
    }

    async fn full_chat(&self, _entity: &Entity) -> Result<FullChat> {
        self.record("full_chat");
        self.full_chat
            .clone()
            .ok_or_else(|| Error::External("full info unavailable".to_string()))
    }

    async fn user_bio(&self, _user: &UserProfile) -> Result<Option<String>> {
        self.record("user_bio");
        self.bio
            .clone()
            .ok_or_else(|| Error::External("bio unavailable".to_string()))
    }

    async fn messages(
        &self,
        _chat: &ChatRef,
        query: HistoryQuery,
    ) -> Result<Box<dyn MessageStream>> {
        self.record("messages");
        *self.last_query.lock().unwrap() = Some(query.clone());
        let items = self
            .history
            .iter()
            .filter(|m| query.offset_id == 0 || m.id < query.offset_id)
            .filter(|m| match (query.max_date, m.date) {
                (Some(max), Some(d)) => d < max,
                _ => true,
            })
            .take(query.limit)
            .cloned()
            .collect();
        Ok(Box::new(FakeStream {
            items,
            pulled: self.pulled.clone(),
        }))
    }

    async fn search_messages(
        &self,
        scope: &SearchScope,
        query: &str,
        from_user: Option<&Entity>,
        limit: usize,
    ) -> Result<Vec<RemoteMessage>> {
        self.record("search_messages");
        *self.last_search.lock().unwrap() = Some((
            scope.clone(),
            query.to_string(),
            from_user.map(Entity::id),
            limit,
        ));
        Ok(self
            .search_results
            .iter()
            .filter(|m| match from_user {
                Some(f) => m.sender.as_ref().map(Entity::id) == Some(f.id()),
                None => true,
            })
            .take(limit)
            .cloned()
            .collect())
    }

    async fn get_message(&self, _chat: &ChatRef, id: i32) -> Result<Option<RemoteMessage>> {
        self.record("get_message");
        Ok(self.history.iter().find(|m| m.id == id).cloned())
    }

    async fn replies(&self, _chat: &ChatRef, _id: i32, limit: usize) -> Result<Vec<RemoteMessage>> {
        self.record("replies");
        Ok(self.replies.iter().take(limit).cloned().collect())
    }

    async fn send_message(
        &self,
        chat: &ChatRef,
        text: &str,
        reply_to: Option<i32>,
        parse_mode: Option<ParseMode>,
    ) -> Result<SentMessage> {
        self.record("send_message");
        self.write_guard()?;
        self.sent
            .lock()
            .unwrap()
            .push((chat.clone(), text.to_string(), reply_to, parse_mode));
        Ok(SentMessage {
            id: 500,
            date: Some(ts(1_700_000_000)),
        })
    }

    async fn edit_message(
        &self,
        _chat: &ChatRef,
        id: i32,
        _text: &str,
        _parse_mode: Option<ParseMode>,
    ) -> Result<SentMessage> {
        self.record("edit_message");
        self.write_guard()?;
        Ok(SentMessage {
            id,
            date: Some(ts(1_700_000_000)),
        })
    }

    async fn delete_message(&self, chat: &ChatRef, id: i32) -> Result<()> {
        self.record("delete_message");
        self.write_guard()?;
        self.deleted.lock().unwrap().push((chat.clone(), id));
        Ok(())
    }

    async fn search_contacts(&self, _query: &str, _limit: usize) -> Result<Vec<UserProfile>> {
        self.record("search_contacts");
        Ok(self.contacts.clone())
    }
}
