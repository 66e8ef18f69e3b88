// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP layer of the FamilySearch client
//!
//! Request/response types, the transport seam, and the redirect and
//! throttle controllers that run between the middleware phases.

mod redirect;
mod request;
mod response;
mod throttle;
mod transport;

pub use redirect::{RedirectHandler, RedirectStep};
pub use request::{CredentialsMode, Request, RequestOptions};
pub use response::Response;
pub use throttle::{parse_retry_after, ThrottleController, ThrottleStep, THROTTLE_STATUS};
pub use transport::{RawResponse, ReqwestTransport, Transport};

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str = concat!("familysearch-rs/", env!("CARGO_PKG_VERSION"));

/// Header names used by the pipeline
pub mod headers {
    pub const ACCEPT: &str = "accept";
    pub const AUTHORIZATION: &str = "authorization";
    pub const CONTENT_TYPE: &str = "content-type";
    pub const LOCATION: &str = "location";
    pub const RETRY_AFTER: &str = "retry-after";
    pub const USER_AGENT: &str = "user-agent";
    /// Comma-separated pending modification tags
    pub const FEATURE_TAG: &str = "x-fs-feature-tag";
    /// Identifier of a freshly created resource
    pub const ENTITY_ID: &str = "x-entity-id";
}

/// Media types understood by the API
pub mod media_types {
    pub const JSON: &str = "application/json";
    pub const FS_JSON: &str = "application/x-fs-v1+json";
    pub const GEDCOMX_JSON: &str = "application/x-gedcomx-v1+json";
    pub const ATOM_JSON: &str = "application/x-gedcomx-atom+json";
    pub const FORM: &str = "application/x-www-form-urlencoded";
}
