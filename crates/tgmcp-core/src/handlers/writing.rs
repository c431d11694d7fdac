use serde::Serialize;
use serde_json::Value;

use crate::{
    domain::ParseMode,
    errors::Error,
    formatting::{format_timestamp, preview},
    port::TelegramPort,
    resolve::resolve_chat_ref,
    utils::{opt_i32, opt_str, require, require_i32, require_str, to_pretty_json},
    Result,
};

const EDIT_ECHO_CHARS: usize = 100;

#[derive(Debug, Serialize)]
struct WriteOutput<'a> {
    status: &'static str,
    message_id: i32,
    chat_id: &'a Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    new_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<Option<String>>,
}

fn parse_mode_arg(args: &Value) -> Result<Option<ParseMode>> {
    opt_str(args, "parse_mode")?
        .map(|s| {
            ParseMode::parse(s).ok_or_else(|| Error::invalid(format!("Unknown parse mode: {s}")))
        })
        .transpose()
}

pub async fn send_message(port: &dyn TelegramPort, args: &Value) -> Result<String> {
    let raw_chat = require(args, "chat_id")?;
    let chat = resolve_chat_ref("chat_id", raw_chat)?;
    let text = require_str(args, "text")?;
    let reply_to = opt_i32(args, "reply_to")?;
    let parse_mode = parse_mode_arg(args)?;

    let sent = port.send_message(&chat, text, reply_to, parse_mode).await?;

    to_pretty_json(&WriteOutput {
        status: "sent",
        message_id: sent.id,
        chat_id: raw_chat,
        new_text: None,
        date: Some(format_timestamp(sent.date)),
    })
}

pub async fn edit_message(port: &dyn TelegramPort, args: &Value) -> Result<String> {
    let raw_chat = require(args, "chat_id")?;
    let chat = resolve_chat_ref("chat_id", raw_chat)?;
    let message_id = require_i32(args, "message_id")?;
    let new_text = require_str(args, "new_text")?;
    let parse_mode = parse_mode_arg(args)?;

    let edited = port
        .edit_message(&chat, message_id, new_text, parse_mode)
        .await?;

    to_pretty_json(&WriteOutput {
        status: "edited",
        message_id: edited.id,
        chat_id: raw_chat,
        new_text: Some(preview(new_text, EDIT_ECHO_CHARS)),
        date: Some(format_timestamp(edited.date)),
    })
}

pub async fn delete_message(port: &dyn TelegramPort, args: &Value) -> Result<String> {
    let raw_chat = require(args, "chat_id")?;
    let chat = resolve_chat_ref("chat_id", raw_chat)?;
    let message_id = require_i32(args, "message_id")?;

    port.delete_message(&chat, message_id).await?;

    to_pretty_json(&WriteOutput {
        status: "deleted",
        message_id,
        chat_id: raw_chat,
        new_text: None,
        date: None,
    })
}
