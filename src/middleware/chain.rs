// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Ordered, append-only middleware lists

use std::sync::Arc;

use parking_lot::RwLock;

use super::{RequestAction, RequestMiddleware, ResponseAction, ResponseMiddleware};
use crate::client::FamilySearch;
use crate::http::{Request, Response};

/// Middleware chain - one list per phase, run in registration order
#[derive(Default)]
pub struct MiddlewareChain {
    request: RwLock<Vec<Arc<dyn RequestMiddleware>>>,
    response: RwLock<Vec<Arc<dyn ResponseMiddleware>>>,
}

impl MiddlewareChain {
    /// Create a new empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a request middleware
    pub fn add_request<M: RequestMiddleware + 'static>(&self, middleware: M) {
        self.request.write().push(Arc::new(middleware));
    }

    /// Append a response middleware
    pub fn add_response<M: ResponseMiddleware + 'static>(&self, middleware: M) {
        self.response.write().push(Arc::new(middleware));
    }

    /// Number of request middleware
    pub fn request_len(&self) -> usize {
        self.request.read().len()
    }

    /// Number of response middleware
    pub fn response_len(&self) -> usize {
        self.response.read().len()
    }

    /// Run the request phase. Stops at the first non-`Continue` action.
    pub async fn process_request(&self, client: &FamilySearch, request: &mut Request) -> RequestAction {
        // Snapshot so the lock is not held across awaits
        let middleware = self.request.read().clone();
        for m in middleware {
            match m.handle(client, request).await {
                RequestAction::Continue => continue,
                action => return action,
            }
        }
        RequestAction::Continue
    }

    /// Run the response phase. Stops early on `Stop`.
    pub async fn process_response(
        &self,
        client: &FamilySearch,
        request: &Request,
        response: &mut Response,
    ) {
        let middleware = self.response.read().clone();
        for m in middleware {
            if m.handle(client, request, response).await == ResponseAction::Stop {
                tracing::debug!(url = %request.url, "Response middleware stopped the chain");
                break;
            }
        }
    }
}

impl std::fmt::Debug for MiddlewareChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewareChain")
            .field("request", &self.request_len())
            .field("response", &self.response_len())
            .finish()
    }
}
