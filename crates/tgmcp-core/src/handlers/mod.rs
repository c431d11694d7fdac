//! Tool handlers.
//!
//! Each handler normalizes its references, calls the [`TelegramPort`], shapes the
//! result through [`crate::formatting`] and returns one text payload (pretty JSON,
//! or a one-line diagnostic).

use serde_json::Value;

use crate::{port::TelegramPort, tools::ToolName, Result};

pub mod chats;
pub mod contacts;
pub mod messages;
pub mod writing;

impl ToolName {
    /// Run the handler for this tool.
    pub async fn invoke(self, port: &dyn TelegramPort, args: &Value) -> Result<String> {
        match self {
            Self::ListChats => chats::list_chats(port, args).await,
            Self::GetChatInfo => chats::get_chat_info(port, args).await,
            Self::ReadMessages => messages::read_messages(port, args).await,
            Self::SearchMessages => messages::search_messages(port, args).await,
            Self::ReadThread => messages::read_thread(port, args).await,
            Self::SendMessage => writing::send_message(port, args).await,
            Self::EditMessage => writing::edit_message(port, args).await,
            Self::DeleteMessage => writing::delete_message(port, args).await,
            Self::SearchContacts => contacts::search_contacts(port, args).await,
            Self::GetUserInfo => contacts::get_user_info(port, args).await,
        }
    }
}
