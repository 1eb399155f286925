//! Response normalization.
//!
//! The panel wraps results in several envelopes depending on the namespace
//! and API version. Each is reduced to the same [`ApiResponse`] shape, and a
//! reported failure becomes `PanelError::Remote`.

use cpc_error::{PanelError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::transport::HttpResponse;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: bool,
    pub message: String,
    /// Opaque payload; `Null` when the call returns nothing.
    pub data: Value,
}

impl ApiResponse {
    /// Shortcut for `data[key]`, `Null` when absent.
    pub fn get(&self, key: &str) -> &Value {
        &self.data[key]
    }
}

/// Parses a `/json-api/` response.
pub(crate) fn from_json(function: &str, response: &HttpResponse) -> Result<ApiResponse> {
    let http_status = Some(response.status);

    let body: Value = match serde_json::from_str(&response.body) {
        Ok(body) => body,
        Err(e) if response.is_success() => {
            return Err(PanelError::remote(
                function,
                http_status,
                format!("Malformed response: {}", e),
            ))
        }
        Err(_) => {
            return Err(PanelError::remote(
                function,
                http_status,
                status_fallback(response, &html_to_text(&response.body)),
            ))
        }
    };

    let envelope = body.as_object().ok_or_else(|| {
        PanelError::remote(function, http_status, "Malformed response: expected a JSON object")
    })?;

    let parsed = match parse_envelope(envelope) {
        Some(parsed) => parsed,
        None if response.is_success() => {
            return Err(PanelError::remote(
                function,
                http_status,
                "Malformed response: missing status envelope",
            ))
        }
        None => {
            let message = envelope
                .get("error")
                .or_else(|| envelope.get("reason"))
                .and_then(Value::as_str)
                .unwrap_or_default();
            return Err(PanelError::remote(
                function,
                http_status,
                status_fallback(response, message),
            ));
        }
    };

    if !parsed.status || !response.is_success() {
        let message = status_fallback(response, &parsed.message);
        return Err(PanelError::remote(function, http_status, message));
    }

    Ok(parsed)
}

/// Parses a `/scripts2/` response. These are HTML pages; the visible text
/// becomes the message and success follows the HTTP status.
pub(crate) fn from_whostmgr(function: &str, response: &HttpResponse) -> Result<ApiResponse> {
    let message = html_to_text(&response.body);
    if !response.is_success() {
        return Err(PanelError::remote(
            function,
            Some(response.status),
            status_fallback(response, &message),
        ));
    }
    Ok(ApiResponse {
        status: true,
        message,
        data: Value::Null,
    })
}

fn status_fallback(response: &HttpResponse, message: &str) -> String {
    if !message.is_empty() {
        message.to_string()
    } else if response.is_success() {
        "Request failed".to_string()
    } else {
        format!("HTTP {}", response.status)
    }
}

fn parse_envelope(envelope: &Map<String, Value>) -> Option<ApiResponse> {
    if let Some(cpanel) = envelope.get("cpanelresult") {
        return parse_cpanel(cpanel);
    }
    if let Some(metadata) = envelope.get("metadata") {
        return parse_whm(metadata, envelope);
    }
    parse_legacy(envelope)
}

/// API2 via `json-api/cpanel`: `{"cpanelresult": {"event": {"result": 1}, "data": ..}}`.
fn parse_cpanel(cpanel: &Value) -> Option<ApiResponse> {
    let cpanel = cpanel.as_object()?;
    let error = cpanel
        .get("error")
        .and_then(Value::as_str)
        .filter(|e| !e.is_empty());
    let event = cpanel.get("event");
    let result = event.and_then(|e| e.get("result")).and_then(truthy);

    let status = match (error, result) {
        (Some(_), _) => false,
        (None, Some(result)) => result,
        (None, None) => return None,
    };

    let message = error
        .or_else(|| event.and_then(|e| e.get("reason")).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string();

    Some(ApiResponse {
        status,
        message,
        data: cpanel.get("data").cloned().unwrap_or(Value::Null),
    })
}

/// WHM API 1: `{"metadata": {"result": 1, "reason": ".."}, "data": ..}`.
fn parse_whm(metadata: &Value, envelope: &Map<String, Value>) -> Option<ApiResponse> {
    let status = metadata.get("result").and_then(truthy)?;
    let message = metadata
        .get("reason")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Some(ApiResponse {
        status,
        message,
        data: envelope.get("data").cloned().unwrap_or(Value::Null),
    })
}

/// Pre-API 1 shapes: `{"result": [{"status": 1, "statusmsg": ".."}]}` or a
/// top-level `status`/`statusmsg` pair.
fn parse_legacy(envelope: &Map<String, Value>) -> Option<ApiResponse> {
    let holder = envelope
        .get("result")
        .and_then(Value::as_array)
        .and_then(|results| results.first())
        .and_then(Value::as_object)
        .filter(|first| first.contains_key("status"))
        .unwrap_or(envelope);

    let status = holder.get("status").and_then(truthy)?;
    let message = holder
        .get("statusmsg")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let mut data = envelope.clone();
    data.remove("status");
    data.remove("statusmsg");

    Some(ApiResponse {
        status,
        message,
        data: Value::Object(data),
    })
}

/// `1`, `"1"`, `true` and friends.
fn truthy(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        Value::String(s) => match s.trim() {
            "1" | "true" => Some(true),
            "0" | "false" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

const SKIPPED_BLOCKS: [&str; 3] = ["head", "script", "style"];

/// Visible text of an HTML page with whitespace collapsed.
pub(crate) fn html_to_text(html: &str) -> String {
    let lower = html.to_ascii_lowercase();
    let mut text = String::with_capacity(html.len());
    let mut pos = 0;

    while let Some(offset) = html[pos..].find('<') {
        let start = pos + offset;
        text.push_str(&html[pos..start]);
        text.push(' ');

        let mut resume = html[start..]
            .find('>')
            .map(|end| start + end + 1)
            .unwrap_or(html.len());

        if let Some(tag) = SKIPPED_BLOCKS
            .iter()
            .find(|tag| opens_tag(&lower[start + 1..], tag))
        {
            let close = format!("</{}", tag);
            resume = lower[start..]
                .find(&close)
                .and_then(|c| lower[start + c..].find('>').map(|e| start + c + e + 1))
                .unwrap_or(html.len());
        }

        pos = resume;
    }
    text.push_str(&html[pos..]);

    decode_entities(&text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn opens_tag(rest: &str, tag: &str) -> bool {
    rest.strip_prefix(tag)
        .and_then(|after| after.chars().next())
        .map(|c| c == '>' || c == '/' || c.is_whitespace())
        .unwrap_or(false)
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
