// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for the FamilySearch client
//!
//! Only failures the pipeline cannot absorb surface here. Authentication
//! failures come back as ordinary error-status responses, and decode failures
//! are swallowed by the decoding middleware.

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the client pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed at the network level
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Transport failure not raised by reqwest itself
    #[error("Transport error for {url}: {reason}")]
    Transport { url: String, reason: String },

    /// Redirect chain exceeded the hop bound
    #[error("Redirect loop at {url} after {hops} hops")]
    RedirectLoop {
        url: String,
        hops: usize,
        redirect_chain: Vec<String>,
    },

    /// Server kept throttling past the retry bound
    #[error("Still throttled by {url} after {retries} retries")]
    ThrottleLimit { url: String, retries: u32 },

    /// A request middleware refused to let the request go out
    #[error("Request to {url} aborted by middleware: {reason}")]
    RequestAborted { url: String, reason: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a transport error
    pub fn transport(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Transport {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a redirect loop error carrying the traversed chain
    pub fn redirect_loop(url: impl Into<String>, redirect_chain: Vec<String>) -> Self {
        Error::RedirectLoop {
            url: url.into(),
            hops: redirect_chain.len().saturating_sub(1),
            redirect_chain,
        }
    }

    /// Create a middleware abort error
    pub fn aborted(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::RequestAborted {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a network error
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Transport { .. })
    }

    /// Check if a caller-level retry could succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Http(_) | Error::Transport { .. } | Error::ThrottleLimit { .. }
        )
    }

    /// Get URL if available
    pub fn url(&self) -> Option<&str> {
        match self {
            Error::Transport { url, .. } => Some(url),
            Error::RedirectLoop { url, .. } => Some(url),
            Error::ThrottleLimit { url, .. } => Some(url),
            Error::RequestAborted { url, .. } => Some(url),
            _ => None,
        }
    }

    /// Redirect chain of a loop error, empty otherwise
    pub fn redirect_chain(&self) -> &[String] {
        match self {
            Error::RedirectLoop { redirect_chain, .. } => redirect_chain,
            _ => &[],
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}
