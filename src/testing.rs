// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! In-memory transport for pipeline tests

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::StatusCode;

use crate::client::FamilySearch;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{RawResponse, Request, Transport};

/// One canned exchange
#[derive(Debug, Clone)]
pub enum Scripted {
    Reply {
        status: StatusCode,
        headers: HeaderMap,
        body: Bytes,
    },
    Fail(String),
}

impl Scripted {
    pub fn status(status: u16) -> Self {
        Scripted::Reply {
            status: StatusCode::from_u16(status).unwrap(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let Scripted::Reply { ref mut headers, .. } = self {
            headers.insert(
                HeaderName::try_from(name).unwrap(),
                HeaderValue::try_from(value).unwrap(),
            );
        }
        self
    }

    pub fn json(self, value: serde_json::Value) -> Self {
        let mut this = self.header("content-type", "application/x-fs-v1+json");
        if let Scripted::Reply { ref mut body, .. } = this {
            *body = Bytes::from(serde_json::to_vec(&value).unwrap());
        }
        this
    }
}

/// Replays scripted replies in order and records every request sent
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    replies: Arc<Mutex<VecDeque<Scripted>>>,
    sent: Arc<Mutex<Vec<Request>>>,
}

impl ScriptedTransport {
    pub fn new(replies: impl IntoIterator<Item = Scripted>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into_iter().collect())),
            sent: Arc::default(),
        }
    }

    pub fn sent(&self) -> Vec<Request> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &Request) -> Result<RawResponse> {
        self.sent.lock().push(request.clone());
        let reply = self.replies.lock().pop_front();
        match reply {
            Some(Scripted::Reply {
                status,
                headers,
                body,
            }) => Ok(RawResponse {
                status,
                headers,
                body,
                url: request.url.clone(),
            }),
            Some(Scripted::Fail(reason)) => Err(Error::transport(request.url.as_str(), reason)),
            None => Err(Error::transport(request.url.as_str(), "no scripted reply left")),
        }
    }
}

/// Client for `https://api.test` / `https://ident.test` over a scripted transport
pub fn scripted_client(config: ClientConfig, transport: &ScriptedTransport) -> FamilySearch {
    let config = config
        .platform_host("https://api.test")
        .ident_host("https://ident.test");
    FamilySearch::with_transport(config, transport.clone()).unwrap()
}
