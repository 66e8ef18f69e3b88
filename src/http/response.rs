// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP response types

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use super::headers;
use crate::error::{Error, Result};
use crate::gedcomx::Document;

/// Final response of one logical call.
///
/// Intermediate redirect and throttle responses are never exposed; the
/// pipeline annotates this one with what happened along the way.
#[derive(Debug, Clone)]
pub struct Response {
    /// Response status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw response body
    pub body: Bytes,
    /// URL that produced this response
    pub url: Url,
    /// Parsed JSON body, absent for empty or non-JSON bodies
    pub data: Option<serde_json::Value>,
    /// Decoded document attached by the decoding middleware
    pub gedcomx: Option<Document>,
    /// Whether at least one redirect was followed
    pub redirected: bool,
    /// Whether at least one throttle cycle occurred
    pub throttled: bool,
    /// Number of throttle-triggered re-sends
    pub retries: u32,
    /// First URL of the redirect chain (only set when redirected)
    pub original_url: Option<Url>,
    /// URL of the final hop (only set when redirected)
    pub effective_url: Option<Url>,
    /// Response time in milliseconds, across all hops and waits
    pub response_time_ms: u64,
}

impl Response {
    /// Create a new response with no pipeline annotations
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes, url: Url) -> Self {
        Self {
            status,
            headers,
            body,
            url,
            data: None,
            gedcomx: None,
            redirected: false,
            throttled: false,
            retries: 0,
            original_url: None,
            effective_url: None,
            response_time_ms: 0,
        }
    }

    /// Check if status is success (2xx)
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Get status code as u16
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Get body as text
    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.body.to_vec()).map_err(|e| Error::Other(e.to_string()))
    }

    /// Get body as text, lossy conversion
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parse body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(Error::from)
    }

    /// Get a header value (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get content type
    pub fn content_type(&self) -> Option<&str> {
        self.header(headers::CONTENT_TYPE)
    }

    /// Check if content type is one of the JSON flavours the API serves
    pub fn is_json(&self) -> bool {
        self.content_type()
            .map(|ct| {
                let essence = ct.split(';').next().unwrap_or("").trim();
                essence == "application/json" || essence.ends_with("+json")
            })
            .unwrap_or(false)
    }

    /// Identifier of a created resource, present on 201 responses
    pub fn entity_id(&self) -> Option<&str> {
        if self.status == StatusCode::CREATED {
            self.header(headers::ENTITY_ID)
        } else {
            None
        }
    }

    /// Location header
    pub fn location(&self) -> Option<&str> {
        self.header(headers::LOCATION)
    }
}
