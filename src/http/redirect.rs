// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Redirect handling for one logical call

use reqwest::{Method, StatusCode};
use url::Url;

use super::request::Request;
use super::response::Response;
use super::transport::RawResponse;
use super::headers;
use crate::error::{Error, Result};

/// Outcome of inspecting one raw response
#[derive(Debug)]
pub enum RedirectStep {
    /// Re-issue this request
    Follow(Request),
    /// The response is final as far as redirects go
    Done,
}

/// Follows redirects and records the chain of URLs traversed
#[derive(Debug, Clone)]
pub struct RedirectHandler {
    max_redirects: usize,
    chain: Vec<Url>,
}

impl RedirectHandler {
    /// Start tracking a call that begins at `original`
    pub fn new(max_redirects: usize, original: &Url) -> Self {
        Self {
            max_redirects,
            chain: vec![original.clone()],
        }
    }

    /// Check whether a status code is one the handler follows
    pub fn is_redirect_status(status: StatusCode) -> bool {
        matches!(
            status,
            StatusCode::MOVED_PERMANENTLY
                | StatusCode::FOUND
                | StatusCode::SEE_OTHER
                | StatusCode::TEMPORARY_REDIRECT
                | StatusCode::PERMANENT_REDIRECT
        )
    }

    /// Decide whether `raw`, received for `request`, needs another hop.
    ///
    /// Fails once the hop bound is exceeded.
    pub fn step(&mut self, request: &Request, raw: &RawResponse) -> Result<RedirectStep> {
        if !request.follow_redirects || !Self::is_redirect_status(raw.status) {
            return Ok(RedirectStep::Done);
        }

        let Some(location) = raw
            .headers
            .get(headers::LOCATION)
            .and_then(|v| v.to_str().ok())
        else {
            tracing::debug!(status = %raw.status, url = %request.url, "Redirect without Location");
            return Ok(RedirectStep::Done);
        };

        let next_url = match request.url.join(location) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(location, error = %e, "Unusable redirect Location");
                return Ok(RedirectStep::Done);
            }
        };

        self.chain.push(next_url.clone());
        if self.hops() > self.max_redirects {
            return Err(Error::redirect_loop(
                next_url.as_str(),
                self.chain.iter().map(|u| u.to_string()).collect(),
            ));
        }

        tracing::debug!(
            status = %raw.status,
            from = %request.url,
            to = %next_url,
            hops = self.hops(),
            "Following redirect"
        );

        Ok(RedirectStep::Follow(Self::redirect_request(
            request, raw.status, next_url,
        )))
    }

    /// Build the request for the next hop
    fn redirect_request(request: &Request, status: StatusCode, next_url: Url) -> Request {
        let mut next = request.clone();

        let switch_to_get = match status {
            StatusCode::SEE_OTHER => request.method != Method::HEAD,
            StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND => request.method == Method::POST,
            _ => false,
        };
        if switch_to_get {
            next.method = Method::GET;
            next.body = None;
            next.remove_header(headers::CONTENT_TYPE);
            next.remove_header("content-length");
        }

        if next_url.origin() != request.url.origin() {
            next.remove_header(headers::AUTHORIZATION);
        }

        next.url = next_url;
        next
    }

    /// Number of redirects followed so far
    pub fn hops(&self) -> usize {
        self.chain.len() - 1
    }

    /// URLs traversed, starting with the original
    pub fn chain(&self) -> &[Url] {
        &self.chain
    }

    /// Whether any redirect was followed
    pub fn redirected(&self) -> bool {
        self.hops() > 0
    }

    /// Record the redirect outcome on the final response
    pub fn annotate(&self, response: &mut Response) {
        if !self.redirected() {
            return;
        }
        response.redirected = true;
        response.original_url = self.chain.first().cloned();
        response.effective_url = self.chain.last().cloned();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use reqwest::header::{HeaderMap, HeaderValue};

    fn raw(status: StatusCode, location: Option<&'static str>, url: &Url) -> RawResponse {
        let mut headers = HeaderMap::new();
        if let Some(location) = location {
            headers.insert("location", HeaderValue::from_static(location));
        }
        RawResponse {
            status,
            headers,
            body: Bytes::new(),
            url: url.clone(),
        }
    }

    fn follow(step: RedirectStep) -> Request {
        match step {
            RedirectStep::Follow(req) => req,
            RedirectStep::Done => panic!("Expected Follow"),
        }
    }

    #[test]
    fn test_non_redirect_is_done() {
        let req = Request::get("https://api.example.com/a").unwrap();
        let mut handler = RedirectHandler::new(5, &req.url);

        let step = handler.step(&req, &raw(StatusCode::OK, None, &req.url)).unwrap();
        assert!(matches!(step, RedirectStep::Done));
        assert!(!handler.redirected());
    }

    #[test]
    fn test_relative_location_resolved() {
        let req = Request::get("https://api.example.com/platform/tree/current-person").unwrap();
        let mut handler = RedirectHandler::new(5, &req.url);

        let next = follow(
            handler
                .step(
                    &req,
                    &raw(StatusCode::SEE_OTHER, Some("/platform/tree/persons/KWQS-BBQ"), &req.url),
                )
                .unwrap(),
        );

        assert_eq!(
            next.url.as_str(),
            "https://api.example.com/platform/tree/persons/KWQS-BBQ"
        );
        assert_eq!(handler.hops(), 1);

        let mut response = Response::new(StatusCode::OK, HeaderMap::new(), Bytes::new(), next.url.clone());
        handler.annotate(&mut response);
        assert!(response.redirected);
        assert_eq!(response.original_url.as_ref(), Some(&req.url));
        assert_eq!(response.effective_url.as_ref(), Some(&next.url));
    }

    #[test]
    fn test_see_other_switches_post_to_get() {
        let req = Request::post("https://api.example.com/a")
            .unwrap()
            .json(&serde_json::json!({"x": 1}))
            .unwrap();
        let mut handler = RedirectHandler::new(5, &req.url);

        let next = follow(
            handler
                .step(&req, &raw(StatusCode::SEE_OTHER, Some("/b"), &req.url))
                .unwrap(),
        );

        assert_eq!(next.method, Method::GET);
        assert!(next.body.is_none());
        assert!(!next.has_header("content-type"));
    }

    #[test]
    fn test_temporary_redirect_preserves_method_and_body() {
        let req = Request::post("https://api.example.com/a")
            .unwrap()
            .body("payload");
        let mut handler = RedirectHandler::new(5, &req.url);

        let next = follow(
            handler
                .step(&req, &raw(StatusCode::TEMPORARY_REDIRECT, Some("/b"), &req.url))
                .unwrap(),
        );

        assert_eq!(next.method, Method::POST);
        assert_eq!(next.body.as_deref(), Some(&b"payload"[..]));
    }

    #[test]
    fn test_method_rewrite_table() {
        use StatusCode as S;
        // (status, method sent, method of next hop); body and content-type
        // survive exactly when the method is not rewritten to GET
        let cases = [
            (S::MOVED_PERMANENTLY, Method::GET, Method::GET, true),
            (S::MOVED_PERMANENTLY, Method::POST, Method::GET, false),
            (S::MOVED_PERMANENTLY, Method::PUT, Method::PUT, true),
            (S::MOVED_PERMANENTLY, Method::HEAD, Method::HEAD, true),
            (S::FOUND, Method::GET, Method::GET, true),
            (S::FOUND, Method::POST, Method::GET, false),
            (S::FOUND, Method::PUT, Method::PUT, true),
            (S::FOUND, Method::HEAD, Method::HEAD, true),
            (S::SEE_OTHER, Method::GET, Method::GET, false),
            (S::SEE_OTHER, Method::POST, Method::GET, false),
            (S::SEE_OTHER, Method::PUT, Method::GET, false),
            (S::SEE_OTHER, Method::HEAD, Method::HEAD, true),
            (S::TEMPORARY_REDIRECT, Method::GET, Method::GET, true),
            (S::TEMPORARY_REDIRECT, Method::POST, Method::POST, true),
            (S::TEMPORARY_REDIRECT, Method::PUT, Method::PUT, true),
            (S::TEMPORARY_REDIRECT, Method::HEAD, Method::HEAD, true),
            (S::PERMANENT_REDIRECT, Method::GET, Method::GET, true),
            (S::PERMANENT_REDIRECT, Method::POST, Method::POST, true),
            (S::PERMANENT_REDIRECT, Method::PUT, Method::PUT, true),
            (S::PERMANENT_REDIRECT, Method::HEAD, Method::HEAD, true),
        ];

        for (status, method, expected, body_kept) in cases {
            let req = Request::new(method.clone(), "https://api.example.com/a")
                .unwrap()
                .header("content-type", "application/json")
                .body("payload");
            let mut handler = RedirectHandler::new(5, &req.url);

            let next = follow(handler.step(&req, &raw(status, Some("/b"), &req.url)).unwrap());

            assert_eq!(next.method, expected, "{} {}", status, method);
            assert_eq!(next.url.path(), "/b", "{} {}", status, method);
            if body_kept {
                assert_eq!(next.body.as_deref(), Some(&b"payload"[..]), "{} {}", status, method);
                assert_eq!(next.header_value("content-type"), Some("application/json"));
            } else {
                assert!(next.body.is_none(), "{} {}", status, method);
                assert!(!next.has_header("content-type"), "{} {}", status, method);
            }
        }
    }

    #[test]
    fn test_cross_origin_drops_authorization() {
        let req = Request::get("https://api.example.com/a")
            .unwrap()
            .header("authorization", "Bearer secret")
            .header("accept", "application/json");
        let mut handler = RedirectHandler::new(5, &req.url);

        let next = follow(
            handler
                .step(&req, &raw(StatusCode::FOUND, Some("https://other.example.org/b"), &req.url))
                .unwrap(),
        );

        assert!(!next.has_header("authorization"));
        assert_eq!(next.header_value("accept"), Some("application/json"));
    }

    #[test]
    fn test_missing_location_is_done() {
        let req = Request::get("https://api.example.com/a").unwrap();
        let mut handler = RedirectHandler::new(5, &req.url);

        let step = handler.step(&req, &raw(StatusCode::FOUND, None, &req.url)).unwrap();
        assert!(matches!(step, RedirectStep::Done));
    }

    #[test]
    fn test_follow_disabled() {
        let req = Request::get("https://api.example.com/a")
            .unwrap()
            .follow_redirects(false);
        let mut handler = RedirectHandler::new(5, &req.url);

        let step = handler
            .step(&req, &raw(StatusCode::FOUND, Some("/b"), &req.url))
            .unwrap();
        assert!(matches!(step, RedirectStep::Done));
    }

    #[test]
    fn test_hop_bound_is_fatal() {
        let mut req = Request::get("https://api.example.com/a").unwrap();
        let mut handler = RedirectHandler::new(2, &req.url);

        for _ in 0..2 {
            let location = if req.url.path() == "/a" { "/b" } else { "/a" };
            req = follow(
                handler
                    .step(&req, &raw(StatusCode::FOUND, Some(location), &req.url))
                    .unwrap(),
            );
        }

        let err = handler
            .step(&req, &raw(StatusCode::FOUND, Some("/b"), &req.url))
            .unwrap_err();
        assert!(matches!(err, Error::RedirectLoop { hops: 3, .. }));
        assert_eq!(err.redirect_chain().len(), 4);
    }
}
