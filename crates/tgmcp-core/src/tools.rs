//! Tool registry: the closed set of tools advertised over `tools/list`.

use std::str::FromStr;

use serde::Serialize;
use serde_json::{json, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ToolName {
    ListChats,
    GetChatInfo,
    ReadMessages,
    SearchMessages,
    ReadThread,
    SendMessage,
    EditMessage,
    DeleteMessage,
    SearchContacts,
    GetUserInfo,
}

/// Advertised tool descriptor (MCP `Tool`).
#[derive(Clone, Debug, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl ToolName {
    pub const ALL: [ToolName; 10] = [
        Self::ListChats,
        Self::GetChatInfo,
        Self::ReadMessages,
        Self::SearchMessages,
        Self::ReadThread,
        Self::SendMessage,
        Self::EditMessage,
        Self::DeleteMessage,
        Self::SearchContacts,
        Self::GetUserInfo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ListChats => "telegram_list_chats",
            Self::GetChatInfo => "telegram_get_chat_info",
            Self::ReadMessages => "telegram_read_messages",
            Self::SearchMessages => "telegram_search_messages",
            Self::ReadThread => "telegram_read_thread",
            Self::SendMessage => "telegram_send_message",
            Self::EditMessage => "telegram_edit_message",
            Self::DeleteMessage => "telegram_delete_message",
            Self::SearchContacts => "telegram_search_contacts",
            Self::GetUserInfo => "telegram_get_user_info",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::ListChats => "List all chats (DMs, groups, channels) with pagination. Returns chat ID, title, unread count, type, and last message preview.",
            Self::GetChatInfo => "Get detailed info about a specific chat. Returns title, type, member count, description, pinned message.",
            Self::ReadMessages => "Read messages from a chat in reverse chronological order (newest first). Returns message ID, sender, timestamp, text, media type, reply info.",
            Self::SearchMessages => "Search messages within a specific chat or globally across all chats. Returns matching messages with context.",
            Self::ReadThread => "Read replies to a specific message (thread). Returns the parent message and all replies.",
            Self::SendMessage => "Send a message to a chat. Supports reply_to and parse_mode (markdown/html).",
            Self::EditMessage => "Edit a previously sent message. You can only edit your own messages.",
            Self::DeleteMessage => "Delete a message. You can delete your own messages in any chat, or any message in groups where you're an admin.",
            Self::SearchContacts => "Search your Telegram contacts by name or username.",
            Self::GetUserInfo => "Get detailed profile info for a Telegram user.",
        }
    }

    pub fn input_schema(self) -> Value {
        let chat_id = json!({
            "type": ["integer", "string"],
            "description": "Chat ID (integer) or @username (string)"
        });
        let parse_mode = json!({
            "type": "string",
            "description": "Parse mode: 'markdown' or 'html' (optional)",
            "enum": ["markdown", "html"]
        });

        match self {
            Self::ListChats => json!({
                "type": "object",
                "properties": {
                    "limit": { "type": "integer", "description": "Max chats to return (default 20)", "default": 20 },
                    "chat_type": {
                        "type": "string",
                        "description": "Filter by type: 'user', 'group', 'channel', 'bot' (optional)",
                        "enum": ["user", "group", "channel", "bot"]
                    },
                    "offset_id": { "type": "integer", "description": "Offset dialog ID for pagination (optional)" }
                },
                "required": []
            }),
            Self::GetChatInfo => json!({
                "type": "object",
                "properties": { "chat_id": chat_id },
                "required": ["chat_id"]
            }),
            Self::ReadMessages => json!({
                "type": "object",
                "properties": {
                    "chat_id": chat_id,
                    "limit": { "type": "integer", "description": "Max messages to return (default 20)", "default": 20 },
                    "offset_id": { "type": "integer", "description": "Return messages older than this message ID (for pagination)" },
                    "min_date": { "type": "string", "description": "Only messages after this date (YYYY-MM-DD)" },
                    "max_date": { "type": "string", "description": "Only messages before this date (YYYY-MM-DD)" }
                },
                "required": ["chat_id"]
            }),
            Self::SearchMessages => json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Search text" },
                    "chat_id": {
                        "type": ["integer", "string"],
                        "description": "Chat ID to search in (optional, omit for global search)"
                    },
                    "limit": { "type": "integer", "description": "Max results (default 20)", "default": 20 },
                    "from_user": {
                        "type": ["integer", "string"],
                        "description": "Filter by sender ID or @username (optional)"
                    }
                },
                "required": ["query"]
            }),
            Self::ReadThread => json!({
                "type": "object",
                "properties": {
                    "chat_id": chat_id,
                    "message_id": { "type": "integer", "description": "ID of the parent message to read replies for" },
                    "limit": { "type": "integer", "description": "Max replies to return (default 20)", "default": 20 }
                },
                "required": ["chat_id", "message_id"]
            }),
            Self::SendMessage => json!({
                "type": "object",
                "properties": {
                    "chat_id": chat_id,
                    "text": { "type": "string", "description": "Message text to send" },
                    "reply_to": { "type": "integer", "description": "Message ID to reply to (optional)" },
                    "parse_mode": parse_mode
                },
                "required": ["chat_id", "text"]
            }),
            Self::EditMessage => json!({
                "type": "object",
                "properties": {
                    "chat_id": chat_id,
                    "message_id": { "type": "integer", "description": "ID of the message to edit" },
                    "new_text": { "type": "string", "description": "New text for the message" },
                    "parse_mode": parse_mode
                },
                "required": ["chat_id", "message_id", "new_text"]
            }),
            Self::DeleteMessage => json!({
                "type": "object",
                "properties": {
                    "chat_id": chat_id,
                    "message_id": { "type": "integer", "description": "ID of the message to delete" }
                },
                "required": ["chat_id", "message_id"]
            }),
            Self::SearchContacts => json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Search query (name or username)" },
                    "limit": { "type": "integer", "description": "Max results (default 10)", "default": 10 }
                },
                "required": ["query"]
            }),
            Self::GetUserInfo => json!({
                "type": "object",
                "properties": {
                    "user_id": { "type": ["integer", "string"], "description": "User ID (integer) or @username (string)" }
                },
                "required": ["user_id"]
            }),
        }
    }

    pub fn descriptor(self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.as_str(),
            description: self.description(),
            input_schema: self.input_schema(),
        }
    }
}

impl FromStr for ToolName {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|t| t.as_str() == s).ok_or(())
    }
}

/// Descriptors for every registered tool, in advertisement order.
pub fn list_tools() -> Vec<ToolDescriptor> {
    ToolName::ALL.into_iter().map(ToolName::descriptor).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_exactly_ten_unique_tools() {
        let tools = list_tools();
        assert_eq!(tools.len(), 10);
        let mut names = tools.iter().map(|t| t.name).collect::<Vec<_>>();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 10);
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for t in ToolName::ALL {
            assert_eq!(t.as_str().parse::<ToolName>(), Ok(t));
        }
        assert!("telegram_nope".parse::<ToolName>().is_err());
    }

    #[test]
    fn required_fields_are_declared_properties() {
        for t in ToolName::ALL {
            let schema = t.input_schema();
            assert_eq!(schema["type"], "object");
            let props = schema["properties"].as_object().unwrap();
            for req in schema["required"].as_array().unwrap() {
                let key = req.as_str().unwrap();
                assert!(props.contains_key(key), "{}: {key}", t.as_str());
            }
        }
    }

    #[test]
    fn descriptor_serializes_with_camel_case_schema_key() {
        let v = serde_json::to_value(ToolName::SendMessage.descriptor()).unwrap();
        assert_eq!(v["name"], "telegram_send_message");
        assert_eq!(
            v["inputSchema"]["properties"]["parse_mode"]["enum"],
            serde_json::json!(["markdown", "html"])
        );
    }
}
