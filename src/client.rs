// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! FamilySearch client facade
//!
//! Every call runs the same pipeline:
//! request middleware, token injection, then a send loop that waits out
//! throttling and follows redirects, then response middleware on the single
//! final response.

use std::sync::Arc;
use std::time::Instant;

use reqwest::Method;
use url::Url;

use crate::auth::{self, AuthManager, Grant};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{
    headers, media_types, CredentialsMode, RedirectHandler, RedirectStep, ReqwestTransport,
    Request, RequestOptions, Response, ThrottleController, ThrottleStep, Transport,
};
use crate::middleware::{
    FeatureTagMiddleware, JsonBodyMiddleware, MiddlewareChain, RequestAction, RequestMiddleware,
    ResponseMiddleware,
};

/// FamilySearch API client.
///
/// Cloning is cheap; clones share the access token and middleware.
/// Dropping a call's future stops it at the next transport reply or
/// throttle wait.
#[derive(Clone)]
pub struct FamilySearch {
    inner: Arc<Inner>,
}

struct Inner {
    config: ClientConfig,
    platform_url: Url,
    transport: Arc<dyn Transport>,
    auth: AuthManager,
    middleware: MiddlewareChain,
}

impl FamilySearch {
    /// Create a client talking to the real API over reqwest
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Self::with_transport(config, transport)
    }

    /// Create a client over a custom transport
    pub fn with_transport<T: Transport + 'static>(config: ClientConfig, transport: T) -> Result<Self> {
        let platform_url = config.platform_url()?;
        config.ident_url()?;

        let middleware = MiddlewareChain::new();
        if let Some(feature_tags) = FeatureTagMiddleware::new(&config.pending_modifications) {
            middleware.add_request(feature_tags);
        }
        middleware.add_response(JsonBodyMiddleware);

        Ok(Self {
            inner: Arc::new(Inner {
                auth: AuthManager::new(config.access_token.clone()),
                config,
                platform_url,
                transport: Arc::new(transport),
                middleware,
            }),
        })
    }

    /// Get client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Get the auth manager
    pub fn auth(&self) -> &AuthManager {
        &self.inner.auth
    }

    /// Append a request middleware. It runs after the built-in ones.
    pub fn add_request_middleware<M: RequestMiddleware + 'static>(&self, middleware: M) {
        self.inner.middleware.add_request(middleware);
    }

    /// Append a response middleware. It runs after JSON body parsing.
    pub fn add_response_middleware<M: ResponseMiddleware + 'static>(&self, middleware: M) {
        self.inner.middleware.add_response(middleware);
    }

    /// Current access token
    pub fn access_token(&self) -> Option<String> {
        self.inner.auth.access_token()
    }

    /// Replace the access token
    pub fn set_access_token(&self, token: impl Into<String>) {
        self.inner.auth.set_access_token(token);
    }

    /// Forget the access token
    pub fn delete_access_token(&self) {
        self.inner.auth.delete_access_token();
    }

    /// Exchange a grant for an access token.
    ///
    /// On failure the raw response is returned and the stored token is
    /// left as it was.
    pub async fn authenticate(&self, grant: Grant) -> Result<Response> {
        let request = self.inner.auth.token_request(&self.inner.config, &grant)?;
        let response = self.execute(request).await?;

        if self.inner.auth.store_from_response(&response) {
            tracing::info!(grant = grant.grant_type(), "Authenticated");
        } else {
            tracing::info!(
                grant = grant.grant_type(),
                status = %response.status,
                "Authentication failed"
            );
        }
        Ok(response)
    }

    /// Authenticate with username and password
    pub async fn oauth_password(
        &self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Response> {
        self.authenticate(Grant::password(username, password)).await
    }

    /// Exchange an authorization code for an access token
    pub async fn oauth_token(&self, code: impl Into<String>) -> Result<Response> {
        self.authenticate(Grant::AuthorizationCode { code: code.into() })
            .await
    }

    /// Obtain an unauthenticated session token
    pub async fn oauth_unauthenticated_token(&self, ip_address: impl Into<String>) -> Result<Response> {
        self.authenticate(Grant::UnauthenticatedSession {
            ip_address: ip_address.into(),
        })
        .await
    }

    /// URL of the authorization page for the code flow
    pub fn oauth_redirect_url(&self, state: Option<&str>) -> Result<Url> {
        auth::redirect_url(&self.inner.config, state)
    }

    /// Revoke the stored token server-side, then forget it locally
    pub async fn oauth_unauthenticate(&self) -> Result<Response> {
        let request = self.inner.auth.revoke_request(&self.inner.config)?;
        let result = self.execute(request).await;
        self.inner.auth.delete_access_token();
        result
    }

    /// Execute a GET request
    pub async fn get(&self, path: &str, options: RequestOptions) -> Result<Response> {
        self.request(Method::GET, path, options).await
    }

    /// Execute a POST request
    pub async fn post(&self, path: &str, options: RequestOptions) -> Result<Response> {
        self.request(Method::POST, path, options).await
    }

    /// Execute a PUT request
    pub async fn put(&self, path: &str, options: RequestOptions) -> Result<Response> {
        self.request(Method::PUT, path, options).await
    }

    /// Execute a DELETE request
    pub async fn delete(&self, path: &str, options: RequestOptions) -> Result<Response> {
        self.request(Method::DELETE, path, options).await
    }

    /// Execute a HEAD request
    pub async fn head(&self, path: &str, options: RequestOptions) -> Result<Response> {
        self.request(Method::HEAD, path, options).await
    }

    /// Build and execute a request
    pub async fn request(&self, method: Method, path: &str, options: RequestOptions) -> Result<Response> {
        let request = self.build_request(method, path, &options)?;
        self.execute(request).await
    }

    /// Build a request without sending it
    pub fn build_request(&self, method: Method, path: &str, options: &RequestOptions) -> Result<Request> {
        let mut request = Request::from_url(method, self.resolve_url(path)?)
            .header(headers::ACCEPT, media_types::FS_JSON)
            .follow_redirects(options.follow_redirects);

        for (name, value) in &options.headers {
            request.set_header(name, value);
        }
        if let Some(ref body) = options.body {
            request = request.json(body)?;
        }
        Ok(request)
    }

    /// Resolve a path against the platform host; absolute URLs pass through
    pub fn resolve_url(&self, path: &str) -> Result<Url> {
        match Url::parse(path) {
            Ok(url) if url.has_host() => Ok(url),
            _ => Ok(self.inner.platform_url.join(path)?),
        }
    }

    /// Run a request through the whole pipeline
    pub async fn execute(&self, mut request: Request) -> Result<Response> {
        let start = Instant::now();

        match self.inner.middleware.process_request(self, &mut request).await {
            RequestAction::Continue => {}
            RequestAction::Abort(reason) => {
                tracing::debug!(url = %request.url, %reason, "Request aborted by middleware");
                return Err(Error::aborted(request.url.as_str(), reason));
            }
            RequestAction::Respond(response) => {
                let mut response = *response;
                self.inner
                    .middleware
                    .process_response(self, &request, &mut response)
                    .await;
                return Ok(response);
            }
        }

        if request.credentials == CredentialsMode::Include {
            self.inner.auth.authorize(&mut request);
        }

        let mut redirects = RedirectHandler::new(self.inner.config.max_redirects, &request.url);
        let mut throttle = ThrottleController::new(self.inner.config.max_throttled_retries);
        let mut current = request;

        let raw = loop {
            tracing::debug!(method = %current.method, url = %current.url, "Sending request");
            let raw = match self.inner.transport.send(&current).await {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(method = %current.method, url = %current.url, error = %e, "Transport failure");
                    return Err(e);
                }
            };

            if let ThrottleStep::Wait(wait) = throttle.step(&current, &raw)? {
                tokio::time::sleep(wait).await;
                continue;
            }
            match redirects.step(&current, &raw)? {
                RedirectStep::Follow(next) => current = next,
                RedirectStep::Done => break raw,
            }
        };

        let mut response = Response::new(raw.status, raw.headers, raw.body, raw.url);
        redirects.annotate(&mut response);
        throttle.annotate(&mut response);
        response.response_time_ms = start.elapsed().as_millis() as u64;

        self.inner
            .middleware
            .process_response(self, &current, &mut response)
            .await;
        Ok(response)
    }

    /// Execute independent requests concurrently
    pub async fn send_all(&self, requests: Vec<Request>) -> Vec<Result<Response>> {
        let futures: Vec<_> = requests.into_iter().map(|r| self.execute(r)).collect();
        futures::future::join_all(futures).await
    }
}

impl std::fmt::Debug for FamilySearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FamilySearch")
            .field("platform_url", &self.inner.platform_url.as_str())
            .field("authenticated", &self.inner.auth.is_authenticated())
            .field("middleware", &self.inner.middleware)
            .finish()
    }
}
