// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Client configuration

use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};
use crate::http::DEFAULT_USER_AGENT;

/// Path of the OAuth2 token endpoint on the ident host
pub const TOKEN_PATH: &str = "/cis-web/oauth2/v3/token";
/// Path of the OAuth2 authorization endpoint on the ident host
pub const AUTHORIZE_PATH: &str = "/cis-web/oauth2/v3/authorization";

/// Default bound on redirect hops per call
pub const DEFAULT_MAX_REDIRECTS: usize = 20;
/// Default bound on throttle re-sends per call
pub const DEFAULT_MAX_THROTTLED_RETRIES: u32 = 25;

/// API environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Production,
    Beta,
    Integration,
}

impl Environment {
    /// Host serving the OAuth2 endpoints
    pub fn ident_host(&self) -> &'static str {
        match self {
            Environment::Production => "https://ident.familysearch.org",
            Environment::Beta => "https://identbeta.familysearch.org",
            Environment::Integration => "https://identint.familysearch.org",
        }
    }

    /// Host serving the platform API
    pub fn platform_host(&self) -> &'static str {
        match self {
            Environment::Production => "https://api.familysearch.org",
            Environment::Beta => "https://apibeta.familysearch.org",
            Environment::Integration => "https://api-integ.familysearch.org",
        }
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Target environment
    pub environment: Environment,
    /// Application key, sent as the OAuth2 client id
    pub app_key: String,
    /// OAuth2 redirect URI for the authorization code flow
    pub redirect_uri: Option<String>,
    /// Access token to start with
    pub access_token: Option<String>,
    /// Change tags sent in the feature-tag header
    pub pending_modifications: Vec<String>,
    /// Maximum redirects to follow per call
    pub max_redirects: usize,
    /// Maximum throttle re-sends per call
    pub max_throttled_retries: u32,
    /// User agent string
    pub user_agent: String,
    /// Transport timeout per exchange
    pub timeout: Duration,
    /// Accept invalid certificates (dangerous!)
    pub accept_invalid_certs: bool,
    /// Proxy URL
    pub proxy: Option<String>,
    /// Override for the ident host
    pub ident_host: Option<String>,
    /// Override for the platform host
    pub platform_host: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            app_key: String::new(),
            redirect_uri: None,
            access_token: None,
            pending_modifications: Vec::new(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            max_throttled_retries: DEFAULT_MAX_THROTTLED_RETRIES,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            accept_invalid_certs: false,
            proxy: None,
            ident_host: None,
            platform_host: None,
        }
    }
}

impl ClientConfig {
    /// Create a config for the given app key
    pub fn new(app_key: impl Into<String>) -> Self {
        Self {
            app_key: app_key.into(),
            ..Default::default()
        }
    }

    /// Set environment
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Set redirect URI
    pub fn redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(uri.into());
        self
    }

    /// Start with an access token
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Set pending modifications
    pub fn pending_modifications<I, S>(mut self, modifications: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pending_modifications = modifications.into_iter().map(Into::into).collect();
        self
    }

    /// Set max redirects
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }

    /// Set max throttle retries
    pub fn max_throttled_retries(mut self, max: u32) -> Self {
        self.max_throttled_retries = max;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set proxy
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Accept invalid certificates
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Override the ident host
    pub fn ident_host(mut self, host: impl Into<String>) -> Self {
        self.ident_host = Some(host.into());
        self
    }

    /// Override the platform host
    pub fn platform_host(mut self, host: impl Into<String>) -> Self {
        self.platform_host = Some(host.into());
        self
    }

    /// Resolved ident host
    pub fn ident_url(&self) -> Result<Url> {
        parse_host(
            self.ident_host
                .as_deref()
                .unwrap_or(self.environment.ident_host()),
        )
    }

    /// Resolved platform host
    pub fn platform_url(&self) -> Result<Url> {
        parse_host(
            self.platform_host
                .as_deref()
                .unwrap_or(self.environment.platform_host()),
        )
    }

    /// Token endpoint
    pub fn token_url(&self) -> Result<Url> {
        Ok(self.ident_url()?.join(TOKEN_PATH)?)
    }

    /// Authorization endpoint
    pub fn authorize_url(&self) -> Result<Url> {
        Ok(self.ident_url()?.join(AUTHORIZE_PATH)?)
    }
}

fn parse_host(host: &str) -> Result<Url> {
    let url = Url::parse(host).map_err(|e| Error::Config(format!("Invalid host {}: {}", host, e)))?;
    if url.cannot_be_a_base() {
        return Err(Error::Config(format!("Host {} cannot be a base URL", host)));
    }
    Ok(url)
}
