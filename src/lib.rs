// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # familysearch - FamilySearch API client
//!
//! Async client for the FamilySearch genealogy platform. Every call goes
//! through one request pipeline that owns the cross-cutting concerns, so
//! callers only deal with final responses.
//!
//! ## Features
//!
//! - OAuth2: password, authorization code and unauthenticated session grants
//! - Bearer token injection with per-request override and opt-out
//! - Pluggable request/response middleware
//! - Throttle handling: honours `Retry-After` on 429 and re-sends
//! - Redirect following with loop protection and URL annotations
//! - JSON body parsing and GEDCOM X document decoding
//! - Pending-modification feature tags
//!
//! ## Example
//!
//! ```rust,no_run
//! use familysearch::{ClientConfig, Environment, FamilySearch, RequestOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FamilySearch::new(
//!         ClientConfig::new("a02j000000JBxOxAAL").environment(Environment::Integration),
//!     )?;
//!
//!     client.oauth_password("sdktester", "1234sdkpass").await?;
//!
//!     let response = client
//!         .get("/platform/tree/persons/L5C2-WYC", RequestOptions::new())
//!         .await?;
//!     println!("{} {:?}", response.status, response.data);
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod gedcomx;
pub mod http;
pub mod middleware;

#[cfg(test)]
mod testing;

// Re-exports for convenience

// Client
pub use client::FamilySearch;
pub use config::{ClientConfig, Environment};

// Auth
pub use auth::{AuthManager, Grant};

// Errors
pub use error::{Error, Result};

// HTTP
pub use http::{CredentialsMode, Request, RequestOptions, Response};
pub use http::{RawResponse, ReqwestTransport, Transport};

// Middleware
pub use middleware::{
    FeatureTagMiddleware, JsonBodyMiddleware, MiddlewareChain, RequestAction, RequestLogger,
    RequestMiddleware, ResponseAction, ResponseMiddleware,
};

// GEDCOM X
pub use gedcomx::{Document, GedcomxMiddleware, Shape};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
