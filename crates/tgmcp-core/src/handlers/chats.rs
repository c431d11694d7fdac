use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::{
    domain::Entity,
    formatting::{chat_type, format_timestamp, preview, user_status},
    port::{HistoryQuery, TelegramPort},
    resolve::resolve_chat_ref,
    utils::{best_effort, opt_i32, opt_limit, opt_str, require, to_pretty_json},
    Result,
};

const LAST_MESSAGE_PREVIEW_CHARS: usize = 100;
const PINNED_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Serialize)]
struct ChatSummary {
    id: i64,
    title: String,
    #[serde(rename = "type")]
    kind: &'static str,
    unread_count: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_message_date: Option<String>,
}

pub async fn list_chats(port: &dyn TelegramPort, args: &Value) -> Result<String> {
    let limit = opt_limit(args, "limit", 20)?;
    let kind_filter = opt_str(args, "chat_type")?;
    let offset_id = opt_i32(args, "offset_id")?.unwrap_or(0);

    let dialogs = port.list_dialogs(limit, offset_id).await?;

    let mut results = Vec::new();
    for d in dialogs {
        let kind = chat_type(&d.entity);
        if kind_filter.is_some_and(|f| f != kind) {
            continue;
        }

        // Preview only for messages that carry text.
        let last = d
            .last_message
            .as_ref()
            .filter(|m| m.text.as_deref().is_some_and(|t| !t.is_empty()));

        results.push(ChatSummary {
            id: d.id,
            title: d.title,
            kind,
            unread_count: d.unread_count,
            last_message: last.and_then(|m| m.text.as_deref()).map(|t| preview(t, LAST_MESSAGE_PREVIEW_CHARS)),
            last_message_date: last.and_then(|m| format_timestamp(m.date)),
        });
    }

    to_pretty_json(&results)
}

pub async fn get_chat_info(port: &dyn TelegramPort, args: &Value) -> Result<String> {
    let chat = resolve_chat_ref("chat_id", require(args, "chat_id")?)?;
    let entity = port.get_entity(&chat).await?;

    let mut info = Map::new();
    info.insert("id".into(), json!(entity.id()));
    info.insert("type".into(), json!(chat_type(&entity)));

    match &entity {
        Entity::User(u) => {
            info.insert("first_name".into(), json!(u.first_name));
            info.insert("last_name".into(), json!(u.last_name));
            info.insert("username".into(), json!(u.username));
            info.insert("phone".into(), json!(u.phone));
            info.insert("bot".into(), json!(u.bot));
            info.insert("status".into(), json!(user_status(u.status.as_ref())));
        }
        Entity::Group(g) => {
            info.insert("title".into(), json!(g.title));
            if let Some(n) = g.participants_count.filter(|n| *n > 0) {
                info.insert("member_count".into(), json!(n));
            }
        }
        Entity::Channel(c) => {
            info.insert("title".into(), json!(c.title));
            info.insert("username".into(), json!(c.username));
            info.insert("megagroup".into(), json!(c.megagroup));
            if let Some(n) = c.participants_count.filter(|n| *n > 0) {
                info.insert("member_count".into(), json!(n));
            }
        }
        Entity::Other { .. } => {}
    }

    if matches!(entity, Entity::Group(_) | Entity::Channel(_)) {
        if let Some(full) = best_effort("full chat info", port.full_chat(&entity)).await {
            info.insert("description".into(), json!(full.about));
            if let Some(n) = full.participants_count.filter(|n| *n > 0) {
                info.insert("member_count".into(), json!(n));
            }
        }
    }

    // Pinned only if the newest message is the pinned one.
    let pinned = best_effort("pinned message", async {
        let query = HistoryQuery {
            limit: 1,
            ..HistoryQuery::default()
        };
        let mut stream = port.messages(&chat, query).await?;
        Ok::<_, crate::Error>(stream.next().await?.filter(|m| m.pinned))
    })
    .await
    .flatten();

    if let Some(msg) = pinned {
        info.insert(
            "pinned_message".into(),
            json!({
                "id": msg.id,
                "text": preview(msg.text.as_deref().unwrap_or(""), PINNED_PREVIEW_CHARS),
                "date": format_timestamp(msg.date),
            }),
        );
    }

    to_pretty_json(&Value::Object(info))
}
