use std::sync::Arc;

use serde_json::Value;

use crate::{errors::Error, port::TelegramPort, tools::ToolName};

pub const NOT_CONNECTED: &str = "Not connected to Telegram. Please restart the server.";

/// Routes tool calls to handlers and turns every outcome into one text payload.
///
/// Calls never fail: known rejections become fixed messages, everything else
/// becomes `Error: <message>`.
#[derive(Clone)]
pub struct Dispatcher {
    port: Arc<dyn TelegramPort>,
}

impl Dispatcher {
    pub fn new(port: Arc<dyn TelegramPort>) -> Self {
        Self { port }
    }

    pub async fn call(&self, name: &str, args: &Value) -> String {
        if !self.port.is_connected() {
            return NOT_CONNECTED.to_string();
        }

        let Ok(tool) = name.parse::<ToolName>() else {
            return format!("Unknown tool: {name}");
        };

        match tool.invoke(self.port.as_ref(), args).await {
            Ok(text) => text,
            Err(e) => error_text(name, e),
        }
    }
}

fn error_text(tool: &str, e: Error) -> String {
    match e {
        Error::Rejected(r) => {
            tracing::info!("tool {tool} rejected by telegram: {r}");
            r.user_message().to_string()
        }
        Error::InvalidArgument(msg) => {
            tracing::warn!("tool {tool}: {msg}");
            format!("Error: {msg}")
        }
        other => {
            tracing::error!(tool, error = ?other, "tool {tool} failed: {other}");
            format!("Error: {other}")
        }
    }
}
