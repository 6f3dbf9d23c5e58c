//! Transport-agnostic HTTP responses

use serde_json::Value;

/// Body of a response
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Empty,
    Json(Value),
    Binary(Vec<u8>),
}

/// Status, headers and body the transport layer writes back to the client
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: ResponseBody,
}

impl ApiResponse {
    /// JSON response with the given status
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: ResponseBody::Json(body),
        }
    }

    pub fn ok(body: Value) -> Self {
        Self::json(200, body)
    }

    pub fn created(body: Value) -> Self {
        Self::json(201, body)
    }

    pub fn empty(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: ResponseBody::Empty,
        }
    }

    /// Zip archive sent as a file download
    pub fn attachment(file_name: &str, bytes: Vec<u8>) -> Self {
        Self {
            status: 200,
            headers: vec![
                ("Content-Type".to_string(), "application/zip".to_string()),
                (
                    "Content-Disposition".to_string(),
                    format!(
                        "attachment; filename=\"{}\"",
                        file_name.replace('\\', "\\\\").replace('"', "\\\"")
                    ),
                ),
                ("Content-Length".to_string(), bytes.len().to_string()),
            ],
            body: ResponseBody::Binary(bytes),
        }
    }

    /// Value of a header, matched case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn json_body(&self) -> Option<&Value> {
        match &self.body {
            ResponseBody::Json(value) => Some(value),
            _ => None,
        }
    }
}
