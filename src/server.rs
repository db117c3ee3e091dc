use crate::catalog::tool_catalog;
use crate::constants::{MCP_PROTOCOL_VERSION, MCP_SERVER_NAME, MCP_SERVER_VERSION};
use crate::protocol::{ErrorCode, JsonRpcRequest, JsonRpcResponse};
use crate::tools::MetaAdsTools;
use serde_json::{json, Value};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("stdio failure: {0}")]
    Io(#[from] std::io::Error),
}

pub struct McpServer {
    tools: MetaAdsTools,
}

impl McpServer {
    pub fn new(tools: MetaAdsTools) -> Self {
        Self { tools }
    }

    fn handle_initialize(&self) -> Value {
        json!({
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "capabilities": {"tools": {"listChanged": false}},
            "serverInfo": {"name": MCP_SERVER_NAME, "version": MCP_SERVER_VERSION},
        })
    }

    fn handle_tools_list(&self) -> Value {
        json!({ "tools": tool_catalog() })
    }

    async fn handle_tools_call(&self, id: Value, params: &Value) -> JsonRpcResponse {
        let name = params.get("name").and_then(Value::as_str).unwrap_or("");
        if name.is_empty() {
            return JsonRpcResponse::failure(id, ErrorCode::InvalidParams, "Missing tool name");
        }
        let args = params.get("arguments").cloned().unwrap_or(Value::Null);
        match self.tools.call(name, args).await {
            Some(text) => {
                let is_error = serde_json::from_str::<Value>(&text)
                    .map(|body| body.get("error").is_some())
                    .unwrap_or(false);
                if is_error {
                    debug!(tool = name, "tool returned an error body");
                }
                JsonRpcResponse::success(
                    id,
                    json!({
                        "content": [{"type": "text", "text": text}],
                        "isError": is_error,
                    }),
                )
            }
            None => JsonRpcResponse::failure(id, ErrorCode::InvalidParams, format!("Unknown tool: {}", name)),
        }
    }

    /// Handles one line of input. `None` means nothing is written back.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        let parsed: Value = match serde_json::from_str(trimmed) {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "unparseable request line");
                return Some(JsonRpcResponse::failure(Value::Null, ErrorCode::ParseError, "Parse error"));
            }
        };
        let request: JsonRpcRequest = match serde_json::from_value(parsed) {
            Ok(request) => request,
            Err(_) => {
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    ErrorCode::InvalidRequest,
                    "Invalid request",
                ))
            }
        };

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::failure(
                request.id.unwrap_or(Value::Null),
                ErrorCode::InvalidRequest,
                "Invalid request",
            ));
        }

        debug!(method = %request.method, "request");
        let method = request.method.as_str();
        if method.starts_with("notifications/") {
            return None;
        }
        let id = request.id?;
        match method {
            "initialize" => Some(JsonRpcResponse::success(id, self.handle_initialize())),
            "ping" => Some(JsonRpcResponse::success(id, json!({}))),
            "tools/list" => Some(JsonRpcResponse::success(id, self.handle_tools_list())),
            "tools/call" => Some(self.handle_tools_call(id, &request.params).await),
            _ => Some(JsonRpcResponse::failure(id, ErrorCode::MethodNotFound, "Method not found")),
        }
    }

    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<(), ServerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        let mut writer = BufWriter::new(writer);

        while let Some(line) = lines.next_line().await? {
            if let Some(response) = self.handle_line(&line).await {
                let payload = serde_json::to_string(&response).unwrap_or_default();
                writer.write_all(payload.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }
        Ok(())
    }

    pub async fn run_stdio(&self) -> Result<(), ServerError> {
        info!(name = MCP_SERVER_NAME, version = MCP_SERVER_VERSION, "serving on stdio");
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;
        info!("stdin closed, shutting down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facebook::HttpMethod;
    use crate::testing::FakeGraph;
    use std::sync::Arc;

    fn server_over(fake: FakeGraph) -> (McpServer, Arc<FakeGraph>) {
        let fake = Arc::new(fake);
        (McpServer::new(MetaAdsTools::new(fake.clone())), fake)
    }

    async fn roundtrip(server: &McpServer, line: &str) -> Value {
        let response = server.handle_line(line).await.expect("response expected");
        serde_json::to_value(&response).unwrap()
    }

    #[tokio::test]
    async fn initialize_reports_identity() {
        let (server, _) = server_over(FakeGraph::new());
        let out = roundtrip(&server, r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#).await;
        assert_eq!(out["result"]["protocolVersion"], MCP_PROTOCOL_VERSION);
        assert_eq!(out["result"]["serverInfo"]["name"], "meta-ads-mcp");
    }

    #[tokio::test]
    async fn tools_list_serves_the_catalog() {
        let (server, _) = server_over(FakeGraph::new());
        let out = roundtrip(&server, r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#).await;
        let tools = out["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), crate::tools::TOOL_NAMES.len());
        assert!(tools[0].get("inputSchema").is_some());
    }

    #[tokio::test]
    async fn tool_results_are_wrapped_as_text() {
        let (server, fake) = server_over(
            FakeGraph::new().on(HttpMethod::Get, "act_1/campaigns", json!({"data": [{"id": "9"}]})),
        );
        let out = roundtrip(
            &server,
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"get_campaigns","arguments":{"account_id":"act_1"}}}"#,
        )
        .await;
        assert_eq!(out["result"]["content"][0]["type"], "text");
        let text = out["result"]["content"][0]["text"].as_str().unwrap();
        let body: Value = serde_json::from_str(text).unwrap();
        assert_eq!(body["data"][0]["id"], "9");
        assert_eq!(out["result"]["isError"], false);
        assert_eq!(fake.call_count(), 1);
    }

    #[tokio::test]
    async fn tool_errors_stay_inside_the_result() {
        let (server, _) = server_over(FakeGraph::new());
        let out = roundtrip(
            &server,
            r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"get_campaigns","arguments":{}}}"#,
        )
        .await;
        assert!(out.get("error").is_none());
        assert_eq!(out["result"]["isError"], true);
        let text = out["result"]["content"][0]["text"].as_str().unwrap();
        assert_eq!(serde_json::from_str::<Value>(text).unwrap()["error"], "No account ID specified");
    }

    #[tokio::test]
    async fn protocol_errors_use_json_rpc_codes() {
        let (server, _) = server_over(FakeGraph::new());
        let out = roundtrip(&server, "{not json").await;
        assert_eq!(out["error"]["code"], -32700);
        let out = roundtrip(&server, r#"{"id":1}"#).await;
        assert_eq!(out["error"]["code"], -32600);
        let out = roundtrip(&server, r#"{"jsonrpc":"1.0","id":7,"method":"ping"}"#).await;
        assert_eq!(out["error"]["code"], -32600);
        assert_eq!(out["id"], 7);
        let out = roundtrip(&server, r#"{"jsonrpc":"2.0","id":5,"method":"resources/list"}"#).await;
        assert_eq!(out["error"]["code"], -32601);
        let out = roundtrip(
            &server,
            r#"{"jsonrpc":"2.0","id":6,"method":"tools/call","params":{"name":"nope"}}"#,
        )
        .await;
        assert_eq!(out["error"]["code"], -32602);
        assert_eq!(out["id"], 6);
    }

    #[tokio::test]
    async fn notifications_get_no_reply() {
        let (server, _) = server_over(FakeGraph::new());
        let line = r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#;
        assert!(server.handle_line(line).await.is_none());
        assert!(server.handle_line("   ").await.is_none());
    }

    #[tokio::test]
    async fn serve_writes_one_line_per_response() {
        let (server, _) = server_over(FakeGraph::new());
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
            "\n"
        );
        let mut output: Vec<u8> = Vec::new();
        server.serve(input.as_bytes(), &mut output).await.unwrap();
        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["id"], 1);
    }
}
