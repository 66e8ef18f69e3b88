// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Middleware installed by the client, plus an opt-in logger

use async_trait::async_trait;
use reqwest::Method;

use super::{RequestAction, RequestMiddleware, ResponseAction, ResponseMiddleware};
use crate::client::FamilySearch;
use crate::http::{headers, Request, Response};

/// Attaches the pending-modification tags to every request
#[derive(Debug, Clone)]
pub struct FeatureTagMiddleware {
    value: String,
}

impl FeatureTagMiddleware {
    /// Create from the list of tags; `None` when there is nothing to send
    pub fn new<S: AsRef<str>>(modifications: &[S]) -> Option<Self> {
        if modifications.is_empty() {
            return None;
        }
        let value = modifications
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(",");
        Some(Self { value })
    }

    /// Header value sent
    pub fn value(&self) -> &str {
        &self.value
    }
}

#[async_trait]
impl RequestMiddleware for FeatureTagMiddleware {
    async fn handle(&self, _client: &FamilySearch, request: &mut Request) -> RequestAction {
        // An explicit per-request value wins
        if !request.has_header(headers::FEATURE_TAG) {
            request.set_header(headers::FEATURE_TAG, &self.value);
        }
        RequestAction::Continue
    }
}

/// Parses JSON bodies into `response.data`.
///
/// HEAD responses and successful DELETE responses never carry data.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBodyMiddleware;

impl JsonBodyMiddleware {
    fn body_expected(request: &Request, response: &Response) -> bool {
        if request.method == Method::HEAD {
            return false;
        }
        !(request.method == Method::DELETE && response.is_success())
    }
}

#[async_trait]
impl ResponseMiddleware for JsonBodyMiddleware {
    async fn handle(
        &self,
        _client: &FamilySearch,
        request: &Request,
        response: &mut Response,
    ) -> ResponseAction {
        if !Self::body_expected(request, response) {
            response.data = None;
            return ResponseAction::Continue;
        }
        if response.body.is_empty() || !response.is_json() {
            return ResponseAction::Continue;
        }

        match serde_json::from_slice(&response.body) {
            Ok(value) => response.data = Some(value),
            Err(e) => {
                tracing::warn!(url = %request.url, error = %e, "Response body is not valid JSON");
            }
        }
        ResponseAction::Continue
    }
}

/// Request/response logger
#[derive(Debug, Clone, Default)]
pub struct RequestLogger {
    /// Log request bodies
    pub log_bodies: bool,
    /// Log response bodies
    pub log_responses: bool,
    /// Filter by URL pattern
    pub url_filter: Option<String>,
}

impl RequestLogger {
    fn should_log(&self, request: &Request) -> bool {
        match self.url_filter {
            Some(ref filter) => request.url.as_str().contains(filter),
            None => true,
        }
    }
}

#[async_trait]
impl RequestMiddleware for RequestLogger {
    async fn handle(&self, _client: &FamilySearch, request: &mut Request) -> RequestAction {
        if !self.should_log(request) {
            return RequestAction::Continue;
        }

        tracing::info!(method = %request.method, url = %request.url, "Request");
        if self.log_bodies {
            if let Some(ref body) = request.body {
                tracing::debug!(body = ?String::from_utf8_lossy(body), "Request body");
            }
        }
        RequestAction::Continue
    }
}

#[async_trait]
impl ResponseMiddleware for RequestLogger {
    async fn handle(
        &self,
        _client: &FamilySearch,
        request: &Request,
        response: &mut Response,
    ) -> ResponseAction {
        if !self.should_log(request) {
            return ResponseAction::Continue;
        }

        tracing::info!(
            url = %request.url,
            status = %response.status,
            redirected = response.redirected,
            retries = response.retries,
            time_ms = response.response_time_ms,
            "Response"
        );
        if self.log_responses {
            tracing::debug!(body = %response.text_lossy(), "Response body");
        }
        ResponseAction::Continue
    }
}
