// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Throttle detection and wait-and-retry

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;

use super::headers;
use super::request::Request;
use super::response::Response;
use super::transport::RawResponse;
use crate::error::{Error, Result};

/// Status the API uses to signal throttling
pub const THROTTLE_STATUS: StatusCode = StatusCode::TOO_MANY_REQUESTS;

/// Outcome of inspecting one raw response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleStep {
    /// Sleep, then re-send the identical request
    Wait(Duration),
    /// Not throttled, or throttled without a usable wait
    Done,
}

/// Counts throttle cycles for one logical call
#[derive(Debug, Clone)]
pub struct ThrottleController {
    max_retries: u32,
    retries: u32,
}

impl ThrottleController {
    /// Create a controller allowing at most `max_retries` re-sends
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            retries: 0,
        }
    }

    /// Decide whether `raw` is a throttle signal worth waiting out
    pub fn step(&mut self, request: &Request, raw: &RawResponse) -> Result<ThrottleStep> {
        if raw.status != THROTTLE_STATUS {
            return Ok(ThrottleStep::Done);
        }

        let Some(wait) = parse_retry_after(&raw.headers) else {
            tracing::warn!(url = %request.url, "Throttled without a usable Retry-After");
            return Ok(ThrottleStep::Done);
        };

        if self.retries >= self.max_retries {
            return Err(Error::ThrottleLimit {
                url: request.url.to_string(),
                retries: self.retries,
            });
        }

        self.retries += 1;
        tracing::warn!(
            method = %request.method,
            url = %request.url,
            wait_ms = wait.as_millis() as u64,
            retries = self.retries,
            "Throttled, waiting before retry"
        );
        Ok(ThrottleStep::Wait(wait))
    }

    /// Re-sends performed so far
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Record the throttle outcome on the final response
    pub fn annotate(&self, response: &mut Response) {
        response.retries = self.retries;
        response.throttled = self.retries > 0;
    }
}

/// Parse a `Retry-After` header as delta-seconds or an HTTP-date.
///
/// Dates in the past yield a zero wait.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(headers::RETRY_AFTER)?.to_str().ok()?.trim();

    if let Ok(secs) = value.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    if let Ok(secs) = value.parse::<f64>() {
        // Negative, non-finite and out-of-range values are undeterminable
        return Duration::try_from_secs_f64(secs).ok();
    }

    let date = DateTime::parse_from_rfc2822(value).ok()?;
    let delta = date.with_timezone(&Utc) - Utc::now();
    Some(delta.to_std().unwrap_or(Duration::ZERO))
}
