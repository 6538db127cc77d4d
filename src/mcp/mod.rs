//! MCP (Model Context Protocol) server for editor and assistant integration.
//!
//! Exposes tools: analyze_page, quick_audit, normalize_keywords.

use crate::analyzer::checks::quick_audit;
use crate::analyzer::keywords::{aggregate, NORMALIZED_KEYWORD_LIMIT};
use crate::{analyze_value, ContentInput, KeywordEntry};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, Write};
use tracing::{debug, info, warn};

const PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC error code for an unknown method
pub const METHOD_NOT_FOUND: i32 = -32601;
/// JSON-RPC error code for a line that is not a request
pub const PARSE_ERROR: i32 = -32700;

/// MCP JSON-RPC request
#[derive(Debug, Deserialize, Serialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    pub id: Option<serde_json::Value>,
    pub method: String,
    pub params: Option<serde_json::Value>,
}

/// MCP JSON-RPC response
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    fn success(id: Option<serde_json::Value>, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Option<serde_json::Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

/// Tool definition for MCP tools/list
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolDef {
    name: &'static str,
    description: &'static str,
    input_schema: InputSchema,
}

#[derive(Debug, Serialize)]
struct InputSchema {
    #[serde(rename = "type")]
    typ: &'static str,
    properties: serde_json::Value,
    required: Vec<&'static str>,
}

/// Properties shared by the tools that take a page
fn page_properties() -> serde_json::Value {
    serde_json::json!({
        "html": { "type": "string", "description": "Raw HTML content of the page" },
        "title": { "type": "string", "description": "Page title" },
        "excerptOrDescription": { "type": "string", "description": "Meta description or excerpt" },
        "siteBaseUrl": { "type": "string", "description": "Site base URL used to classify links" },
        "faviconExists": { "type": "boolean", "description": "Whether the site serves a favicon" }
    })
}

fn tool_defs() -> Vec<ToolDef> {
    vec![
        ToolDef {
            name: "analyze_page",
            description: "Score a page's on-page SEO (0-100) and return the full report",
            input_schema: InputSchema {
                typ: "object",
                properties: page_properties(),
                required: vec!["html", "title"],
            },
        },
        ToolDef {
            name: "quick_audit",
            description: "Run four pass/fail checks: title, meta description, single H1, image alt",
            input_schema: InputSchema {
                typ: "object",
                properties: page_properties(),
                required: vec!["html", "title"],
            },
        },
        ToolDef {
            name: "normalize_keywords",
            description: "Merge plural/singular keyword variants and return the top entries",
            input_schema: InputSchema {
                typ: "object",
                properties: serde_json::json!({
                    "keywords": {
                        "description": "Raw counts as {word: count} or [{word, count}]",
                        "oneOf": [{ "type": "object" }, { "type": "array" }]
                    },
                    "limit": { "type": "number", "description": "Maximum entries (default 15)" }
                }),
                required: vec!["keywords"],
            },
        },
    ]
}

/// Handle a single JSON-RPC request and return a response.
/// Extracted from `run_mcp_server` for testability.
pub fn handle_request(req: &JsonRpcRequest) -> JsonRpcResponse {
    let id = req.id.clone();
    match req.method.as_str() {
        "initialize" => JsonRpcResponse::success(
            id,
            serde_json::json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": {} },
                "serverInfo": { "name": "seoscope", "version": env!("CARGO_PKG_VERSION") }
            }),
        ),
        "tools/list" => JsonRpcResponse::success(id, serde_json::json!({ "tools": tool_defs() })),
        "tools/call" => {
            let (name, args) = req
                .params
                .as_ref()
                .and_then(|p| p.get("params").or(Some(p)))
                .map(|p| {
                    let name = p.get("name").and_then(|n| n.as_str()).unwrap_or("");
                    let args = p
                        .get("arguments")
                        .cloned()
                        .unwrap_or(serde_json::Value::Null);
                    (name, args)
                })
                .unwrap_or(("", serde_json::Value::Null));

            debug!(tool = name, "tools/call");
            let result = match name {
                "analyze_page" => run_analyze(&args),
                "quick_audit" => run_quick_audit(&args),
                "normalize_keywords" => run_normalize(&args),
                _ => Err(anyhow::anyhow!("Unknown tool: {}", name)),
            };

            let content = match result {
                Ok(val) => serde_json::json!({
                    "content": [{ "type": "text", "text": serde_json::to_string(&val).unwrap_or_else(|_| "{}".to_string()) }]
                }),
                Err(e) => serde_json::json!({
                    "content": [{ "type": "text", "text": format!("Error: {}", e) }],
                    "isError": true
                }),
            };
            JsonRpcResponse::success(id, content)
        }
        other => JsonRpcResponse::failure(id, METHOD_NOT_FOUND, format!("Method not found: {}", other)),
    }
}

/// Run the MCP server loop (stdin / stdout).
pub fn run_mcp_server() -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let reader = BufReader::new(stdin.lock());

    info!(component = "mcp", "server listening on stdio");
    for line in reader.lines() {
        let line = line.context("Failed to read request from stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<JsonRpcRequest>(&line) {
            // notifications get no reply
            Ok(req) if req.id.is_none() && req.method.starts_with("notifications/") => continue,
            Ok(req) => handle_request(&req),
            Err(e) => {
                warn!(component = "mcp", error = %e, "unparseable request");
                JsonRpcResponse::failure(None, PARSE_ERROR, format!("Parse error: {}", e))
            }
        };

        writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
        stdout.flush()?;
    }
    info!(component = "mcp", "stdin closed, shutting down");
    Ok(())
}

fn run_analyze(args: &serde_json::Value) -> anyhow::Result<serde_json::Value> {
    let report = analyze_value(args)?;
    let mut value = serde_json::to_value(&report)?;
    value["normalizedKeywords"] = serde_json::to_value(report.normalized_keywords())?;
    Ok(value)
}

fn run_quick_audit(args: &serde_json::Value) -> anyhow::Result<serde_json::Value> {
    let input = ContentInput::from_value(args)?;
    Ok(serde_json::to_value(quick_audit(&input))?)
}

fn run_normalize(args: &serde_json::Value) -> anyhow::Result<serde_json::Value> {
    let entries = parse_keyword_entries(args.get("keywords"))?;
    let limit = match args.get("limit") {
        None | Some(serde_json::Value::Null) => NORMALIZED_KEYWORD_LIMIT,
        Some(v) => v
            .as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| anyhow::anyhow!("Invalid input: `limit` must be a non-negative integer"))?,
    };
    Ok(serde_json::to_value(aggregate(&entries, limit))?)
}

/// Accept `{word: count}` (in insertion order) or `[{word, count}]` (in array order)
fn parse_keyword_entries(value: Option<&serde_json::Value>) -> anyhow::Result<Vec<KeywordEntry>> {
    let invalid_count = |word: &str| {
        anyhow::anyhow!(
            "Invalid input: count for `{}` must be a non-negative integer",
            word
        )
    };

    match value {
        Some(serde_json::Value::Object(map)) => map
            .iter()
            .map(|(word, count)| {
                let count = count
                    .as_u64()
                    .and_then(|c| u32::try_from(c).ok())
                    .ok_or_else(|| invalid_count(word))?;
                Ok(KeywordEntry {
                    word: word.clone(),
                    count,
                })
            })
            .collect(),
        Some(array @ serde_json::Value::Array(_)) => {
            serde_json::from_value(array.clone()).context("Invalid input: `keywords` entries must be {word, count}")
        }
        None | Some(serde_json::Value::Null) => {
            anyhow::bail!("Invalid input: `keywords` is required")
        }
        Some(_) => anyhow::bail!("Invalid input: `keywords` must be an object or an array"),
    }
}
