use serde::Serialize;
use serde_json::Value;

use crate::{
    formatting::{display_name, format_message, FormattedMessage},
    port::{HistoryQuery, SearchScope, TelegramPort},
    resolve::{resolve_chat_ref, resolve_opt_chat_ref},
    utils::{opt_i32, opt_limit, opt_str, parse_day_utc, require, require_i32, require_str, to_pretty_json},
    Result,
};

#[derive(Debug, Serialize)]
struct ReadMessagesOutput<'a> {
    chat_id: &'a Value,
    message_count: usize,
    messages: Vec<FormattedMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    oldest_message_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pagination_hint: Option<String>,
}

/// Newest-first history with `offset_id` / `max_date` passed to the server and
/// `min_date` enforced here.
///
/// `min_date` stops at the first older message, which relies on the server
/// returning history in strictly decreasing date order.
pub async fn read_messages(port: &dyn TelegramPort, args: &Value) -> Result<String> {
    let raw_chat = require(args, "chat_id")?;
    let chat = resolve_chat_ref("chat_id", raw_chat)?;
    let limit = opt_limit(args, "limit", 20)?;
    let offset_id = opt_i32(args, "offset_id")?.unwrap_or(0);
    let min_date = opt_str(args, "min_date")?
        .map(|s| parse_day_utc("min_date", s))
        .transpose()?;
    let max_date = opt_str(args, "max_date")?
        .map(|s| parse_day_utc("max_date", s))
        .transpose()?;

    let query = HistoryQuery {
        limit,
        offset_id,
        max_date,
    };
    let mut stream = port.messages(&chat, query).await?;

    let mut messages = Vec::new();
    while messages.len() < limit {
        let Some(msg) = stream.next().await? else {
            break;
        };
        if let (Some(min), Some(date)) = (min_date, msg.date) {
            if date < min {
                break;
            }
        }
        messages.push(format_message(&msg));
    }

    let oldest = messages.last().map(|m| m.id);
    to_pretty_json(&ReadMessagesOutput {
        chat_id: raw_chat,
        message_count: messages.len(),
        messages,
        oldest_message_id: oldest,
        pagination_hint: oldest.map(|id| format!("To load older messages, use offset_id={id}")),
    })
}

#[derive(Debug, Serialize)]
struct SearchOutput<'a> {
    query: &'a str,
    result_count: usize,
    messages: Vec<FormattedMessage>,
}

pub async fn search_messages(port: &dyn TelegramPort, args: &Value) -> Result<String> {
    let query = require_str(args, "query")?;
    let limit = opt_limit(args, "limit", 20)?;
    let scope = match resolve_opt_chat_ref(args, "chat_id")? {
        Some(chat) => SearchScope::Chat(chat),
        None => SearchScope::Global,
    };

    let from_user = match resolve_opt_chat_ref(args, "from_user")? {
        Some(r) => Some(port.get_entity(&r).await?),
        None => None,
    };

    let found = port
        .search_messages(&scope, query, from_user.as_ref(), limit)
        .await?;

    let global = scope == SearchScope::Global;
    let messages = found
        .iter()
        .map(|m| {
            let mut out = format_message(m);
            if global {
                if let Some(chat) = &m.chat {
                    out.chat_name = Some(display_name(Some(chat)));
                    out.chat_id = Some(chat.marked_id());
                }
            }
            out
        })
        .collect::<Vec<_>>();

    to_pretty_json(&SearchOutput {
        query,
        result_count: messages.len(),
        messages,
    })
}

#[derive(Debug, Serialize)]
struct ThreadOutput {
    parent_message: FormattedMessage,
    reply_count: usize,
    replies: Vec<FormattedMessage>,
}

pub async fn read_thread(port: &dyn TelegramPort, args: &Value) -> Result<String> {
    let chat = resolve_chat_ref("chat_id", require(args, "chat_id")?)?;
    let message_id = require_i32(args, "message_id")?;
    let limit = opt_limit(args, "limit", 20)?;

    let Some(parent) = port.get_message(&chat, message_id).await? else {
        return Ok(format!("Message {message_id} not found."));
    };

    let mut replies = port
        .replies(&chat, message_id, limit)
        .await?
        .iter()
        .map(format_message)
        .collect::<Vec<_>>();
    // Server order is newest-first.
    replies.reverse();

    to_pretty_json(&ThreadOutput {
        parent_message: format_message(&parent),
        reply_count: replies.len(),
        replies,
    })
}
