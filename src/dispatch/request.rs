//! # Request Descriptor
//!
//! Normalized, immutable view of one inbound call, assembled once the
//! whole body has been received.

use std::collections::HashMap;

use axum::http::{HeaderMap, Method, Uri};

/// Normalized request handed to route handlers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestDescriptor {
    trimmed_path: String,
    query: HashMap<String, String>,
    method: String,
    headers: HashMap<String, String>,
    payload: String,
}

impl RequestDescriptor {
    /// Assemble a descriptor from already-decoded request parts
    pub fn new(
        method: &str,
        path: &str,
        query: Option<&str>,
        headers: HashMap<String, String>,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            trimmed_path: trim_path(path),
            query: query.map(parse_query).unwrap_or_default(),
            method: method.to_lowercase(),
            headers,
            payload: payload.into(),
        }
    }

    /// Assemble a descriptor from HTTP parts and a fully buffered body
    pub fn from_http(method: &Method, uri: &Uri, headers: &HeaderMap, body: &[u8]) -> Self {
        Self::new(
            method.as_str(),
            uri.path(),
            uri.query(),
            collect_headers(headers),
            String::from_utf8_lossy(body),
        )
    }

    /// Path with leading and trailing slashes removed
    pub fn trimmed_path(&self) -> &str {
        &self.trimmed_path
    }

    /// Query parameters, last value wins on duplicate keys
    pub fn query(&self) -> &HashMap<String, String> {
        &self.query
    }

    /// Lower-cased method token
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Header names are lower-case
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Raw request body text
    pub fn payload(&self) -> &str {
        &self.payload
    }
}

/// Strip every leading and trailing `/`
pub fn trim_path(path: &str) -> String {
    path.trim_matches('/').to_string()
}

/// Decode a query string; a repeated key keeps its last value
pub fn parse_query(query: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}

fn collect_headers(headers: &HeaderMap) -> HashMap<String, String> {
    let mut collected: HashMap<String, String> = HashMap::new();

    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        collected
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert_with(|| value.into_owned());
    }

    collected
}
