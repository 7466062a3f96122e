//! `quina check` — call a running server's results endpoint and summarise
//! what came back.

use anyhow::Context;
use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::StatusCode;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde_json::Value;
use std::fmt;

/// What the endpoint answered.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    pub status: StatusCode,
    pub body: CheckBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CheckBody {
    Json(Value),
    /// The body was not JSON.
    Raw(String),
}

/// GET `url` once. Fails only when no HTTP response arrives; error statuses
/// are reported, not raised.
pub async fn fetch(url: &str) -> anyhow::Result<CheckReport> {
    let uri: hyper::Uri = url.parse().with_context(|| format!("invalid URL {url:?}"))?;
    let client: Client<_, Empty<Bytes>> = Client::builder(TokioExecutor::new()).build_http();

    let response = client
        .get(uri)
        .await
        .with_context(|| format!("cannot reach {url}; is the server running (`quina serve`)?"))?;
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .context("reading response body")?
        .to_bytes();

    let body = match serde_json::from_slice::<Value>(&bytes) {
        Ok(json) => CheckBody::Json(json),
        Err(_) => CheckBody::Raw(String::from_utf8_lossy(&bytes).into_owned()),
    };
    Ok(CheckReport { status, body })
}

impl CheckReport {
    /// One line per finding about the latest and previous draws.
    pub fn summary(&self) -> Vec<String> {
        let CheckBody::Json(json) = &self.body else {
            return Vec::new();
        };

        let mut lines = Vec::new();
        match json.get("latest").filter(|v| !v.is_null()) {
            Some(latest) => {
                lines.push("latest result found".to_string());
                lines.push(format!("  draw:    {}", display(latest.get("drawNumber"))));
                lines.push(format!("  numbers: {}", display(latest.get("numbers"))));
            }
            None => lines.push("no latest result found".to_string()),
        }
        match json.get("previous").and_then(Value::as_array) {
            Some(previous) if !previous.is_empty() => {
                lines.push(format!("found {} previous results", previous.len()))
            }
            _ => lines.push("no previous results found".to_string()),
        }
        lines
    }
}

fn display(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "-".to_string(),
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "status: {}", self.status.as_u16())?;
        match &self.body {
            CheckBody::Json(json) => {
                let pretty = serde_json::to_string_pretty(json).map_err(|_| fmt::Error)?;
                writeln!(f, "response:\n{pretty}")?;
            }
            CheckBody::Raw(raw) => writeln!(f, "raw response:\n{raw}")?,
        }
        for line in self.summary() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
