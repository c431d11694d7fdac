use std::fmt;

/// Remote-service rejections the dispatcher turns into stable one-line messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    AdminRequired,
    ChannelPrivate,
    MessageNotModified,
    MessageAuthorRequired,
}

impl Rejection {
    /// Map a Telegram RPC error name (e.g. `CHAT_ADMIN_REQUIRED`) to a known rejection.
    pub fn from_rpc_name(name: &str) -> Option<Self> {
        match name {
            "CHAT_ADMIN_REQUIRED" => Some(Self::AdminRequired),
            "CHANNEL_PRIVATE" => Some(Self::ChannelPrivate),
            "MESSAGE_NOT_MODIFIED" => Some(Self::MessageNotModified),
            "MESSAGE_AUTHOR_REQUIRED" => Some(Self::MessageAuthorRequired),
            _ => None,
        }
    }

    pub fn user_message(self) -> &'static str {
        match self {
            Self::AdminRequired => "Error: Admin privileges required for this action.",
            Self::ChannelPrivate => {
                "Error: This channel/group is private or you're not a member."
            }
            Self::MessageNotModified => "Error: Message content is the same, nothing to update.",
            Self::MessageAuthorRequired => "Error: You can only edit/delete your own messages.",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AdminRequired => "CHAT_ADMIN_REQUIRED",
            Self::ChannelPrivate => "CHANNEL_PRIVATE",
            Self::MessageNotModified => "MESSAGE_NOT_MODIFIED",
            Self::MessageAuthorRequired => "MESSAGE_AUTHOR_REQUIRED",
        };
        f.write_str(name)
    }
}

/// Core error type.
///
/// Adapter crates map their library errors into this type so the dispatcher can
/// tell value errors and known rejections apart from everything else.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    /// Bad argument shape or an unresolvable reference.
    #[error("{0}")]
    InvalidArgument(String),

    #[error("telegram rejected the request: {0}")]
    Rejected(Rejection),

    #[error("authorization failed: {0}")]
    Auth(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    External(String),
}

impl Error {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_rpc_names() {
        assert_eq!(
            Rejection::from_rpc_name("CHAT_ADMIN_REQUIRED"),
            Some(Rejection::AdminRequired)
        );
        assert_eq!(
            Rejection::from_rpc_name("MESSAGE_AUTHOR_REQUIRED"),
            Some(Rejection::MessageAuthorRequired)
        );
        assert_eq!(Rejection::from_rpc_name("FLOOD_WAIT"), None);
    }

    #[test]
    fn invalid_argument_displays_bare_message() {
        let e = Error::invalid("missing required argument: chat_id");
        assert_eq!(e.to_string(), "missing required argument: chat_id");
    }
}
