//! Raw MTProto objects → `tgmcp-core` domain values, and back to input peers.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use grammers_client::types::Chat;
use grammers_session::{PackedChat, PackedType};
use grammers_tl_types as tl;

use tgmcp_core::{
    domain::{
        ChannelInfo, DocumentAttribute, Entity, FullChat, GroupInfo, Media, RemoteMessage,
        UserProfile, UserStatus,
    },
    Error, Result,
};

pub fn timestamp(secs: i32) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(i64::from(secs), 0)
}

pub fn user_status(status: &tl::enums::UserStatus) -> UserStatus {
    use tl::enums::UserStatus as S;
    match status {
        S::Online { .. } => UserStatus::Online,
        S::Offline(o) => UserStatus::Offline {
            was_online: timestamp(o.was_online),
        },
        S::Recently { .. } => UserStatus::Recently,
        S::LastWeek { .. } => UserStatus::LastWeek,
        S::LastMonth { .. } => UserStatus::LastMonth,
        S::Empty { .. } => UserStatus::Unknown,
    }
}

pub fn user(u: &tl::types::User) -> UserProfile {
    UserProfile {
        id: u.id,
        access_hash: u.access_hash,
        first_name: u.first_name.clone(),
        last_name: u.last_name.clone(),
        username: u.username.clone(),
        phone: u.phone.clone(),
        bot: u.bot,
        status: u.status.as_ref().map(user_status),
    }
}

pub fn channel(c: &tl::types::Channel) -> ChannelInfo {
    ChannelInfo {
        id: c.id,
        access_hash: c.access_hash,
        title: Some(c.title.clone()),
        username: c.username.clone(),
        megagroup: c.megagroup,
        participants_count: c.participants_count,
    }
}

pub fn user_entity(u: &tl::enums::User) -> Entity {
    match u {
        tl::enums::User::User(u) => Entity::User(user(u)),
        tl::enums::User::Empty(u) => Entity::Other { id: u.id },
    }
}

pub fn chat_entity(c: &tl::enums::Chat) -> Entity {
    use tl::enums::Chat as C;
    match c {
        C::Chat(c) => Entity::Group(GroupInfo {
            id: c.id,
            title: Some(c.title.clone()),
            participants_count: Some(c.participants_count),
        }),
        C::Forbidden(c) => Entity::Group(GroupInfo {
            id: c.id,
            title: Some(c.title.clone()),
            participants_count: None,
        }),
        C::Channel(c) => Entity::Channel(channel(c)),
        C::ChannelForbidden(c) => Entity::Channel(ChannelInfo {
            id: c.id,
            access_hash: Some(c.access_hash),
            title: Some(c.title.clone()),
            username: None,
            megagroup: c.megagroup,
            participants_count: None,
        }),
        C::Empty(c) => Entity::Other { id: c.id },
    }
}

/// Entity behind a high-level client chat.
pub fn entity(chat: &Chat) -> Entity {
    match chat {
        Chat::User(u) => Entity::User(user(&u.raw)),
        Chat::Group(g) => chat_entity(&g.raw),
        Chat::Channel(c) => Entity::Channel(channel(&c.raw)),
    }
}

fn document_attribute(attr: &tl::enums::DocumentAttribute) -> DocumentAttribute {
    use tl::enums::DocumentAttribute as A;
    match attr {
        A::Video(_) => DocumentAttribute::Video,
        A::Audio(a) => DocumentAttribute::Audio { voice: a.voice },
        A::Sticker(_) => DocumentAttribute::Sticker,
        A::Animated { .. } => DocumentAttribute::Animated,
        _ => DocumentAttribute::Other,
    }
}

pub fn media(media: &tl::enums::MessageMedia) -> Option<Media> {
    use tl::enums::MessageMedia as M;
    let kind = match media {
        M::Empty { .. } => return None,
        M::Photo(_) => Media::Photo,
        M::Document(d) => Media::Document(match &d.document {
            Some(tl::enums::Document::Document(doc)) => {
                Some(doc.attributes.iter().map(document_attribute).collect())
            }
            _ => None,
        }),
        M::WebPage(_) => Media::WebPage,
        M::Geo(_) => Media::Geo,
        M::Contact(_) => Media::Contact,
        M::Poll(_) => Media::Poll,
        _ => Media::Other,
    };
    Some(kind)
}

fn reply_to(header: Option<&tl::enums::MessageReplyHeader>) -> Option<i32> {
    match header? {
        tl::enums::MessageReplyHeader::Header(h) => h.reply_to_msg_id,
        _ => None,
    }
}

/// Build a message from its raw form plus already-resolved sender/chat.
pub fn message(
    raw: &tl::types::Message,
    sender: Option<Entity>,
    chat: Option<Entity>,
) -> RemoteMessage {
    RemoteMessage {
        id: raw.id,
        date: timestamp(raw.date),
        text: Some(raw.message.clone()),
        sender,
        reply_to_msg_id: reply_to(raw.reply_to.as_ref()),
        media: raw.media.as_ref().and_then(media),
        forwarded: raw.fwd_from.is_some(),
        pinned: raw.pinned,
        chat,
    }
}

/// Message from the high-level client, with origin chat attached.
pub fn client_message(msg: &grammers_client::types::Message) -> RemoteMessage {
    let sender = msg.sender().as_ref().map(|c| entity(c));
    message(&msg.raw, sender, Some(entity(&msg.chat())))
}

fn peer_key(peer: &tl::enums::Peer) -> (u8, i64) {
    match peer {
        tl::enums::Peer::User(p) => (0, p.user_id),
        tl::enums::Peer::Chat(p) => (1, p.chat_id),
        tl::enums::Peer::Channel(p) => (2, p.channel_id),
    }
}

pub fn same_peer(a: &tl::enums::Peer, b: &tl::enums::Peer) -> bool {
    peer_key(a) == peer_key(b)
}

/// Whether `raw` is message `id` of the chat `peer`.
pub fn is_message_of(raw: &tl::enums::Message, id: i32, peer: &tl::enums::Peer) -> bool {
    match raw {
        tl::enums::Message::Message(m) => m.id == id && same_peer(&m.peer_id, peer),
        tl::enums::Message::Service(m) => m.id == id && same_peer(&m.peer_id, peer),
        tl::enums::Message::Empty(_) => false,
    }
}

/// Send date of a raw message, `0` for empty slots.
pub fn message_date(raw: &tl::enums::Message) -> i32 {
    match raw {
        tl::enums::Message::Message(m) => m.date,
        tl::enums::Message::Service(m) => m.date,
        tl::enums::Message::Empty(_) => 0,
    }
}

/// Users and chats that came back alongside a raw response.
#[derive(Default)]
pub struct PeerMap {
    users: HashMap<i64, Entity>,
    chats: HashMap<i64, Entity>,
    me: Option<Entity>,
}

impl PeerMap {
    pub fn new(users: &[tl::enums::User], chats: &[tl::enums::Chat], me: Option<&Entity>) -> Self {
        Self {
            users: users
                .iter()
                .map(user_entity)
                .map(|e| (e.id(), e))
                .collect(),
            chats: chats
                .iter()
                .map(chat_entity)
                .map(|e| (e.id(), e))
                .collect(),
            me: me.cloned(),
        }
    }

    pub fn get(&self, peer: &tl::enums::Peer) -> Option<Entity> {
        match peer {
            tl::enums::Peer::User(p) => self.users.get(&p.user_id),
            tl::enums::Peer::Chat(p) => self.chats.get(&p.chat_id),
            tl::enums::Peer::Channel(p) => self.chats.get(&p.channel_id),
        }
        .cloned()
    }

    fn sender(
        &self,
        from: Option<&tl::enums::Peer>,
        peer: &tl::enums::Peer,
        out: bool,
    ) -> Option<Entity> {
        match from {
            Some(from) => self.get(from),
            // Private chats omit `from_id`: outgoing is us, incoming is the peer.
            None if out => self.me.clone(),
            None => self.get(peer),
        }
    }

    pub fn message(&self, raw: &tl::enums::Message) -> Option<RemoteMessage> {
        match raw {
            tl::enums::Message::Message(m) => {
                let sender = self.sender(m.from_id.as_ref(), &m.peer_id, m.out);
                Some(message(m, sender, self.get(&m.peer_id)))
            }
            tl::enums::Message::Service(m) => Some(RemoteMessage {
                id: m.id,
                date: timestamp(m.date),
                text: None,
                sender: self.sender(m.from_id.as_ref(), &m.peer_id, m.out),
                reply_to_msg_id: reply_to(m.reply_to.as_ref()),
                media: None,
                forwarded: false,
                pinned: false,
                chat: self.get(&m.peer_id),
            }),
            tl::enums::Message::Empty(_) => None,
        }
    }
}

/// Messages of a history/replies page, in server order.
pub fn messages_page(page: tl::enums::messages::Messages, me: Option<&Entity>) -> Vec<RemoteMessage> {
    use tl::enums::messages::Messages as M;
    let (messages, users, chats) = match page {
        M::Messages(p) => (p.messages, p.users, p.chats),
        M::Slice(p) => (p.messages, p.users, p.chats),
        M::ChannelMessages(p) => (p.messages, p.users, p.chats),
        M::NotModified(_) => return Vec::new(),
    };
    let peers = PeerMap::new(&users, &chats, me);
    messages.iter().filter_map(|m| peers.message(m)).collect()
}

/// Same kind and same bare id.
pub fn same_entity(a: &Entity, b: &Entity) -> bool {
    std::mem::discriminant(a) == std::mem::discriminant(b) && a.id() == b.id()
}

/// Message `id` of `chat` out of a by-id lookup.
///
/// `messages.getMessages` looks ids up across every private chat and basic
/// group of the account, so hits from other chats are dropped.
pub fn message_in(
    messages: Vec<RemoteMessage>,
    chat: &Entity,
    id: i32,
) -> Option<RemoteMessage> {
    messages
        .into_iter()
        .find(|m| m.id == id && m.chat.as_ref().is_some_and(|c| same_entity(c, chat)))
}

pub fn full_chat(full: &tl::enums::ChatFull) -> FullChat {
    match full {
        tl::enums::ChatFull::Full(c) => FullChat {
            about: Some(c.about.clone()),
            participants_count: match &c.participants {
                tl::enums::ChatParticipants::Participants(p) => {
                    i32::try_from(p.participants.len()).ok()
                }
                tl::enums::ChatParticipants::Forbidden(_) => None,
            },
        },
        tl::enums::ChatFull::ChannelFull(c) => FullChat {
            about: Some(c.about.clone()),
            participants_count: c.participants_count,
        },
    }
}

pub fn input_peer(entity: &Entity) -> Result<tl::enums::InputPeer> {
    Ok(match entity {
        Entity::User(u) => tl::types::InputPeerUser {
            user_id: u.id,
            access_hash: u.access_hash.unwrap_or(0),
        }
        .into(),
        Entity::Group(g) => tl::types::InputPeerChat { chat_id: g.id }.into(),
        Entity::Channel(c) => tl::types::InputPeerChannel {
            channel_id: c.id,
            access_hash: c.access_hash.unwrap_or(0),
        }
        .into(),
        Entity::Other { id } => return Err(unaddressable(*id)),
    })
}

pub fn input_user(u: &UserProfile) -> tl::enums::InputUser {
    tl::types::InputUser {
        user_id: u.id,
        access_hash: u.access_hash.unwrap_or(0),
    }
    .into()
}

pub fn input_channel(c: &ChannelInfo) -> tl::enums::InputChannel {
    tl::types::InputChannel {
        channel_id: c.id,
        access_hash: c.access_hash.unwrap_or(0),
    }
    .into()
}

/// Packed form the high-level client methods accept.
pub fn packed(entity: &Entity) -> Result<PackedChat> {
    let (ty, id, access_hash) = match entity {
        Entity::User(u) if u.bot => (PackedType::Bot, u.id, u.access_hash),
        Entity::User(u) => (PackedType::User, u.id, u.access_hash),
        Entity::Group(g) => (PackedType::Chat, g.id, None),
        Entity::Channel(c) if c.megagroup => (PackedType::Megagroup, c.id, c.access_hash),
        Entity::Channel(c) => (PackedType::Broadcast, c.id, c.access_hash),
        Entity::Other { id } => return Err(unaddressable(*id)),
    };
    Ok(PackedChat {
        ty,
        id,
        access_hash,
    })
}

fn unaddressable(id: i64) -> Error {
    Error::invalid(format!("Cannot find any entity corresponding to \"{id}\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peer_map_resolves_senders_by_peer_kind() {
        let users: Vec<tl::enums::User> = vec![tl::types::UserEmpty { id: 5 }.into()];
        let me = Entity::Other { id: 1 };
        let peers = PeerMap::new(&users, &[], Some(&me));

        let peer: tl::enums::Peer = tl::types::PeerUser { user_id: 5 }.into();
        let found = peers.sender(None, &peer, false).unwrap();
        assert_eq!(found.id(), 5);
        assert_eq!(peers.sender(None, &peer, true), Some(me));

        let missing: tl::enums::Peer = tl::types::PeerChannel { channel_id: 5 }.into();
        assert_eq!(peers.get(&missing), None);
    }

    #[test]
    fn peer_identity_includes_peer_kind() {
        let a: tl::enums::Peer = tl::types::PeerChat { chat_id: 3 }.into();
        let b: tl::enums::Peer = tl::types::PeerChat { chat_id: 3 }.into();
        let c: tl::enums::Peer = tl::types::PeerChannel { channel_id: 3 }.into();
        assert!(same_peer(&a, &b));
        assert!(!same_peer(&a, &c));
    }

    #[test]
    fn unmodelled_entities_cannot_be_addressed() {
        assert!(matches!(
            packed(&Entity::Other { id: 8 }),
            Err(Error::InvalidArgument(_))
        ));

        let group = Entity::Group(GroupInfo {
            id: 8,
            title: None,
            participants_count: None,
        });
        let p = packed(&group).unwrap();
        assert_eq!(p.id, 8);
        assert!(matches!(p.ty, PackedType::Chat));
    }

    fn group(id: i64) -> Entity {
        Entity::Group(GroupInfo {
            id,
            title: None,
            participants_count: None,
        })
    }

    fn found(id: i32, chat: Option<Entity>) -> RemoteMessage {
        RemoteMessage {
            id,
            date: timestamp(0),
            text: Some(format!("in {:?}", chat.as_ref().map(Entity::id))),
            sender: None,
            reply_to_msg_id: None,
            media: None,
            forwarded: false,
            pinned: false,
            chat,
        }
    }

    #[test]
    fn lookup_by_id_ignores_other_chats() {
        let ours = group(10);
        let page = vec![
            found(42, Some(Entity::Other { id: 999 })),
            found(42, Some(group(999))),
            found(42, None),
        ];
        assert_eq!(message_in(page.clone(), &ours, 42), None);

        let mut page = page;
        page.push(found(42, Some(group(10))));
        let hit = message_in(page, &ours, 42).unwrap();
        assert_eq!(hit.chat, Some(ours));
    }

    #[test]
    fn entity_identity_includes_kind() {
        let c = Entity::Channel(ChannelInfo {
            id: 10,
            access_hash: None,
            title: None,
            username: None,
            megagroup: true,
            participants_count: None,
        });
        assert!(same_entity(&group(10), &group(10)));
        assert!(!same_entity(&group(10), &c));
        assert!(!same_entity(&group(10), &group(11)));
    }

    #[test]
    fn empty_media_is_no_media() {
        assert_eq!(media(&tl::enums::MessageMedia::Empty), None);
        assert_eq!(
            timestamp(86_400).map(|t| t.to_rfc3339()),
            Some("1970-01-02T00:00:00+00:00".to_string())
        );
    }
}
