// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request and response middleware
//!
//! Request middleware runs before the access token is attached and the
//! request is sent. Response middleware runs once, on the final response,
//! after redirects and throttle retries are resolved.

mod builtin;
mod chain;

pub use builtin::{FeatureTagMiddleware, JsonBodyMiddleware, RequestLogger};
pub use chain::MiddlewareChain;

use async_trait::async_trait;

use crate::client::FamilySearch;
use crate::http::{Request, Response};

/// What a request middleware wants done next
#[derive(Debug, Clone)]
pub enum RequestAction {
    /// Continue with the (possibly modified) request
    Continue,
    /// Do not send; the call fails with the given reason
    Abort(String),
    /// Do not send; use this response instead
    Respond(Box<Response>),
}

/// What a response middleware wants done next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseAction {
    /// Run the next response middleware
    Continue,
    /// Skip the remaining response middleware
    Stop,
}

/// Hook run on every outgoing request
///
/// # Example
///
/// ```rust,no_run
/// use familysearch::{FamilySearch, Request, RequestAction};
///
/// # fn register(client: &FamilySearch) {
/// client.add_request_middleware(|_: &FamilySearch, request: &mut Request| {
///     request.set_header("x-trace", "on");
///     RequestAction::Continue
/// });
/// # }
/// ```
#[async_trait]
pub trait RequestMiddleware: Send + Sync {
    async fn handle(&self, client: &FamilySearch, request: &mut Request) -> RequestAction;
}

/// Hook run on every final response
#[async_trait]
pub trait ResponseMiddleware: Send + Sync {
    async fn handle(
        &self,
        client: &FamilySearch,
        request: &Request,
        response: &mut Response,
    ) -> ResponseAction;
}

#[async_trait]
impl<F> RequestMiddleware for F
where
    F: Fn(&FamilySearch, &mut Request) -> RequestAction + Send + Sync,
{
    async fn handle(&self, client: &FamilySearch, request: &mut Request) -> RequestAction {
        (self)(client, request)
    }
}

#[async_trait]
impl<F> ResponseMiddleware for F
where
    F: Fn(&FamilySearch, &Request, &mut Response) -> ResponseAction + Send + Sync,
{
    async fn handle(
        &self,
        client: &FamilySearch,
        request: &Request,
        response: &mut Response,
    ) -> ResponseAction {
        (self)(client, request, response)
    }
}
