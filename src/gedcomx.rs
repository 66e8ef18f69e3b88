// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! GEDCOM-X body decoding
//!
//! Bodies are sorted into one of four shapes by their discriminating field
//! and decoded into a thin typed wrapper. Only the fields the client itself
//! looks at are typed; everything else is kept as raw JSON.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::FamilySearch;
use crate::error::Result;
use crate::http::{Request, Response};
use crate::middleware::{ResponseAction, ResponseMiddleware};

/// Body shapes the decoder distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    AtomFeed,
    OAuth2,
    Errors,
    Gedcomx,
}

impl Shape {
    /// Pick the shape of a JSON body. Anything unrecognized is generic GEDCOM-X.
    ///
    /// A discriminating field only counts when it carries a value; `null`,
    /// `false`, `0` and `""` are treated as absent.
    pub fn detect(value: &Value) -> Shape {
        if has_value(value, "entries") {
            Shape::AtomFeed
        } else if has_value(value, "access_token") {
            Shape::OAuth2
        } else if has_value(value, "errors") {
            Shape::Errors
        } else {
            Shape::Gedcomx
        }
    }
}

fn has_value(body: &Value, field: &str) -> bool {
    match body.get(field) {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// A decoded response body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Document {
    AtomFeed(AtomFeed),
    OAuth2(OAuth2),
    Errors(Errors),
    Gedcomx(Gedcomx),
}

impl Document {
    /// Decode along exactly one path, chosen by [`Shape::detect`]
    pub fn decode(value: &Value) -> Result<Document> {
        let value = value.clone();
        Ok(match Shape::detect(&value) {
            Shape::AtomFeed => Document::AtomFeed(serde_json::from_value(value)?),
            Shape::OAuth2 => Document::OAuth2(serde_json::from_value(value)?),
            Shape::Errors => Document::Errors(serde_json::from_value(value)?),
            Shape::Gedcomx => Document::Gedcomx(serde_json::from_value(value)?),
        })
    }

    pub fn shape(&self) -> Shape {
        match self {
            Document::AtomFeed(_) => Shape::AtomFeed,
            Document::OAuth2(_) => Shape::OAuth2,
            Document::Errors(_) => Shape::Errors,
            Document::Gedcomx(_) => Shape::Gedcomx,
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        match self {
            Document::OAuth2(oauth) => Some(&oauth.access_token),
            _ => None,
        }
    }

    pub fn persons(&self) -> &[Person] {
        match self {
            Document::Gedcomx(gx) => &gx.persons,
            _ => &[],
        }
    }

    pub fn entries(&self) -> &[Entry] {
        match self {
            Document::AtomFeed(feed) => &feed.entries,
            _ => &[],
        }
    }

    pub fn errors(&self) -> &[ErrorEntry] {
        match self {
            Document::Errors(errors) => &errors.errors,
            _ => &[],
        }
    }
}

/// OAuth2 token payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuth2 {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

/// Error list payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Errors {
    pub errors: Vec<ErrorEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEntry {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub stacktrace: Option<String>,
}

/// Atom feed payload, e.g. change history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomFeed {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub updated: Option<i64>,
    pub entries: Vec<Entry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub updated: Option<i64>,
    #[serde(default)]
    pub content: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Generic GEDCOM-X resource payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gedcomx {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub persons: Vec<Person>,
    #[serde(default)]
    pub relationships: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub living: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response middleware attaching the decoded document as `response.gedcomx`.
///
/// Bodies that fail to decode leave the response untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct GedcomxMiddleware;

#[async_trait]
impl ResponseMiddleware for GedcomxMiddleware {
    async fn handle(
        &self,
        _client: &FamilySearch,
        request: &Request,
        response: &mut Response,
    ) -> ResponseAction {
        if let Some(ref data) = response.data {
            match Document::decode(data) {
                Ok(document) => response.gedcomx = Some(document),
                Err(e) => {
                    tracing::warn!(url = %request.url, error = %e, "Could not decode GEDCOM-X body");
                }
            }
        }
        ResponseAction::Continue
    }
}
