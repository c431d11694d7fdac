//! MCP over stdio: newline-delimited JSON-RPC 2.0.
//!
//! Requests are handled one at a time; notifications (no `id`) get no response.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::{dispatch::Dispatcher, tools::list_tools, Result};

pub const SERVER_NAME: &str = "telegram-mcp";

const INVALID_PARAMS: i64 = -32602;
const METHOD_NOT_FOUND: i64 = -32601;

#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    #[allow(dead_code)]
    pub jsonrpc: Option<String>,
    pub id: Option<Value>,
    pub method: String,
    pub params: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

fn respond_ok(id: Value, result: Value) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0",
        id,
        result: Some(result),
        error: None,
    }
}

fn respond_err(id: Value, code: i64, message: &str) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0",
        id,
        result: None,
        error: Some(json!({ "code": code, "message": message })),
    }
}

fn text_content(text: String) -> Value {
    json!({
        "content": [{ "type": "text", "text": text }],
        "isError": false
    })
}

pub async fn handle_rpc(dispatcher: &Dispatcher, req: RpcRequest) -> Option<RpcResponse> {
    let id = req.id?;

    match req.method.as_str() {
        "initialize" => {
            let proto = req
                .params
                .as_ref()
                .and_then(|p| p.get("protocolVersion"))
                .and_then(|v| v.as_str())
                .unwrap_or("2024-11-05");

            Some(respond_ok(
                id,
                json!({
                  "protocolVersion": proto,
                  "serverInfo": { "name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION") },
                  "capabilities": { "tools": {} }
                }),
            ))
        }

        "ping" => Some(respond_ok(id, json!({}))),

        "tools/list" => Some(respond_ok(id, json!({ "tools": list_tools() }))),

        "tools/call" => {
            let Some(params) = req.params.as_ref() else {
                return Some(respond_err(id, INVALID_PARAMS, "Missing params"));
            };
            let Some(name) = params.get("name").and_then(|v| v.as_str()) else {
                return Some(respond_err(id, INVALID_PARAMS, "Missing tool name"));
            };
            let args = match params.get("arguments") {
                None | Some(Value::Null) => json!({}),
                Some(v) => v.clone(),
            };

            tracing::debug!("tools/call {name}");
            let text = dispatcher.call(name, &args).await;
            Some(respond_ok(id, text_content(text)))
        }

        _ => Some(respond_err(id, METHOD_NOT_FOUND, "Method not found")),
    }
}

/// Serve requests from `input` until EOF, writing one response line per request.
pub async fn serve<R, W>(dispatcher: &Dispatcher, input: R, mut output: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let req = match serde_json::from_str::<RpcRequest>(&line) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("skipping malformed request line: {e}");
                continue;
            }
        };

        // Notifications have no id => no response.
        let Some(resp) = handle_rpc(dispatcher, req).await else {
            continue;
        };

        let out = serde_json::to_string(&resp)?;
        output.write_all(out.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::testing::*;

    fn request(id: Option<Value>, method: &str, params: Option<Value>) -> RpcRequest {
        RpcRequest {
            jsonrpc: Some("2.0".to_string()),
            id,
            method: method.to_string(),
            params,
        }
    }

    fn dispatcher(fake: FakeTelegram) -> Dispatcher {
        Dispatcher::new(Arc::new(fake))
    }

    #[tokio::test]
    async fn tools_list_advertises_ten_tools() {
        let d = dispatcher(FakeTelegram::connected());
        let resp = handle_rpc(&d, request(Some(json!(1)), "tools/list", None))
            .await
            .unwrap();
        let tools = resp.result.unwrap()["tools"].as_array().unwrap().clone();
        assert_eq!(tools.len(), 10);
        assert!(tools
            .iter()
            .any(|t| t["name"] == "telegram_read_thread" && t["inputSchema"].is_object()));
    }

    #[tokio::test]
    async fn initialize_echoes_protocol_version() {
        let d = dispatcher(FakeTelegram::connected());
        let resp = handle_rpc(
            &d,
            request(
                Some(json!("a")),
                "initialize",
                Some(json!({"protocolVersion": "2025-03-26"})),
            ),
        )
        .await
        .unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result["protocolVersion"], "2025-03-26");
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
        assert_eq!(resp.id, json!("a"));
    }

    #[tokio::test]
    async fn notifications_get_no_response() {
        let d = dispatcher(FakeTelegram::connected());
        assert!(
            handle_rpc(&d, request(None, "notifications/initialized", None))
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn tools_call_wraps_text_content() {
        let d = dispatcher(FakeTelegram::connected());
        let resp = handle_rpc(
            &d,
            request(
                Some(json!(7)),
                "tools/call",
                Some(json!({"name": "telegram_nope", "arguments": {}})),
            ),
        )
        .await
        .unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result["content"][0]["type"], "text");
        assert_eq!(result["content"][0]["text"], "Unknown tool: telegram_nope");
    }

    #[tokio::test]
    async fn malformed_calls_and_unknown_methods_are_rpc_errors() {
        let d = dispatcher(FakeTelegram::connected());
        let resp = handle_rpc(&d, request(Some(json!(1)), "tools/call", None))
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap()["code"], INVALID_PARAMS);

        let resp = handle_rpc(&d, request(Some(json!(2)), "resources/list", None))
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap()["code"], METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn serve_answers_requests_and_skips_noise() {
        let d = dispatcher(FakeTelegram::connected());
        let input = concat!(
            "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n",
            "\n",
            "not json\n",
            "{\"jsonrpc\":\"2.0\",\"method\":\"notifications/initialized\"}\n",
            "{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"tools/list\"}\n",
        );
        let mut out = Vec::new();
        serve(&d, input.as_bytes(), &mut out).await.unwrap();

        let lines = String::from_utf8(out).unwrap();
        let responses = lines
            .lines()
            .map(|l| serde_json::from_str::<Value>(l).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(responses[1]["id"], 2);
    }
}
