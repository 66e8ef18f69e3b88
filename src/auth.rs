// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Access token ownership and OAuth2 grant requests

use parking_lot::RwLock;
use reqwest::Method;
use serde_json::Value;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{headers, media_types, CredentialsMode, Request, Response};

/// Grants accepted by the token endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grant {
    /// Resource owner password credentials
    Password { username: String, password: String },
    /// Code returned to the redirect URI after user consent
    AuthorizationCode { code: String },
    /// Anonymous session bound to the caller's IP address
    UnauthenticatedSession { ip_address: String },
}

impl Grant {
    pub fn password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Grant::Password {
            username: username.into(),
            password: password.into(),
        }
    }

    /// `grant_type` value sent for this grant
    pub fn grant_type(&self) -> &'static str {
        match self {
            Grant::Password { .. } => "password",
            Grant::AuthorizationCode { .. } => "authorization_code",
            Grant::UnauthenticatedSession { .. } => "unauthenticated_session",
        }
    }
}

/// Holds the one access token of a client.
///
/// Reads vastly outnumber writes; the lock is never held across an await.
#[derive(Debug, Default)]
pub struct AuthManager {
    token: RwLock<Option<String>>,
}

impl AuthManager {
    /// Create a manager, optionally seeded with a token
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: RwLock::new(token),
        }
    }

    /// Current access token
    pub fn access_token(&self) -> Option<String> {
        self.token.read().clone()
    }

    /// Replace the access token
    pub fn set_access_token(&self, token: impl Into<String>) {
        *self.token.write() = Some(token.into());
    }

    /// Forget the access token
    pub fn delete_access_token(&self) {
        *self.token.write() = None;
    }

    /// Whether a token is stored
    pub fn is_authenticated(&self) -> bool {
        self.token.read().is_some()
    }

    /// Attach `Authorization: Bearer <token>` unless the request opts out,
    /// already carries an Authorization header, or no token is stored.
    pub fn authorize(&self, request: &mut Request) {
        if request.credentials == CredentialsMode::Omit
            || request.has_header(headers::AUTHORIZATION)
        {
            return;
        }
        if let Some(ref token) = *self.token.read() {
            request.set_header(headers::AUTHORIZATION, format!("Bearer {}", token));
        }
    }

    /// Build the token endpoint request for a grant
    pub fn token_request(&self, config: &ClientConfig, grant: &Grant) -> Result<Request> {
        let mut fields: Vec<(&str, &str)> = vec![
            ("grant_type", grant.grant_type()),
            ("client_id", config.app_key.as_str()),
        ];
        match grant {
            Grant::Password { username, password } => {
                fields.push(("username", username.as_str()));
                fields.push(("password", password.as_str()));
            }
            Grant::AuthorizationCode { code } => {
                let redirect_uri = config.redirect_uri.as_deref().ok_or_else(|| {
                    Error::config("redirect_uri is required for the authorization code grant")
                })?;
                fields.push(("code", code.as_str()));
                fields.push(("redirect_uri", redirect_uri));
            }
            Grant::UnauthenticatedSession { ip_address } => {
                fields.push(("ip_address", ip_address.as_str()));
            }
        }

        Ok(Request::from_url(Method::POST, config.token_url()?)
            .header(headers::ACCEPT, media_types::JSON)
            .form(fields)
            .credentials(CredentialsMode::Omit))
    }

    /// Store the token carried by a successful token response.
    ///
    /// Returns whether a token was stored; failures leave state untouched.
    pub fn store_from_response(&self, response: &Response) -> bool {
        if !response.is_success() {
            return false;
        }
        let parsed;
        let data = match response.data {
            Some(ref data) => data,
            None => match serde_json::from_slice::<Value>(&response.body) {
                Ok(value) => {
                    parsed = value;
                    &parsed
                }
                Err(_) => return false,
            },
        };

        match extract_token(data) {
            Some(token) => {
                self.set_access_token(token);
                true
            }
            None => false,
        }
    }

    /// Token revocation request for the stored token
    pub fn revoke_request(&self, config: &ClientConfig) -> Result<Request> {
        let token = self
            .access_token()
            .ok_or_else(|| Error::other("No access token to revoke"))?;
        let mut url = config.token_url()?;
        url.query_pairs_mut().append_pair("token", &token);

        Ok(Request::from_url(Method::DELETE, url).credentials(CredentialsMode::Omit))
    }
}

/// Token in a token-endpoint body; `access_token` first, then legacy `token`
pub fn extract_token(data: &Value) -> Option<&str> {
    data.get("access_token")
        .or_else(|| data.get("token"))
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
}

/// Authorization endpoint URL the user agent should be sent to
pub fn redirect_url(config: &ClientConfig, state: Option<&str>) -> Result<Url> {
    let redirect_uri = config
        .redirect_uri
        .as_deref()
        .ok_or_else(|| Error::config("redirect_uri is required to build the OAuth redirect URL"))?;

    let mut url = config.authorize_url()?;
    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("response_type", "code")
            .append_pair("client_id", &config.app_key)
            .append_pair("redirect_uri", redirect_uri);
        if let Some(state) = state {
            query.append_pair("state", state);
        }
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use reqwest::header::HeaderMap;
    use reqwest::StatusCode;
    use serde_json::json;

    fn token_response(status: StatusCode, body: &'static str) -> Response {
        Response::new(
            status,
            HeaderMap::new(),
            Bytes::from(body),
            Url::parse("https://ident.familysearch.org/cis-web/oauth2/v3/token").unwrap(),
        )
    }

    #[test]
    fn test_authorize_injects_bearer() {
        let auth = AuthManager::new(Some("abc".to_string()));
        let mut req = Request::get("https://api.familysearch.org/platform/x").unwrap();
        auth.authorize(&mut req);
        assert_eq!(req.header_value("Authorization"), Some("Bearer abc"));
    }

    #[test]
    fn test_authorize_without_token_leaves_header_absent() {
        let auth = AuthManager::default();
        let mut req = Request::get("https://api.familysearch.org/platform/x").unwrap();
        auth.authorize(&mut req);
        assert!(!req.has_header("authorization"));
    }

    #[test]
    fn test_caller_override_wins() {
        let auth = AuthManager::new(Some("abc".to_string()));
        let mut req = Request::get("https://api.familysearch.org/platform/x")
            .unwrap()
            .header("Authorization", "Bearer mine");
        auth.authorize(&mut req);
        assert_eq!(req.header_value("authorization"), Some("Bearer mine"));
    }

    #[test]
    fn test_omit_credentials() {
        let auth = AuthManager::new(Some("abc".to_string()));
        let mut req = Request::get("https://api.familysearch.org/platform/x")
            .unwrap()
            .credentials(CredentialsMode::Omit);
        auth.authorize(&mut req);
        assert!(!req.has_header("authorization"));
    }

    #[test]
    fn test_password_token_request() {
        let config = ClientConfig::new("a02j000000JBxOxAAL");
        let req = AuthManager::default()
            .token_request(&config, &Grant::password("sdktester", "1234sdkpass"))
            .unwrap();

        assert_eq!(req.method, Method::POST);
        assert_eq!(req.url.path(), "/cis-web/oauth2/v3/token");
        assert_eq!(req.credentials, CredentialsMode::Omit);
        assert_eq!(
            req.body.as_deref(),
            Some(
                &b"grant_type=password&client_id=a02j000000JBxOxAAL&username=sdktester&password=1234sdkpass"[..]
            )
        );
    }

    #[test]
    fn test_authorization_code_needs_redirect_uri() {
        let grant = Grant::AuthorizationCode {
            code: "xyz".to_string(),
        };
        let auth = AuthManager::default();

        let err = auth
            .token_request(&ClientConfig::new("key"), &grant)
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let config = ClientConfig::new("key").redirect_uri("https://app.example.com/cb");
        let req = auth.token_request(&config, &grant).unwrap();
        let body = String::from_utf8(req.body.unwrap().to_vec()).unwrap();
        assert!(body.contains("grant_type=authorization_code"));
        assert!(body.contains("redirect_uri=https%3A%2F%2Fapp.example.com%2Fcb"));
    }

    #[test]
    fn test_store_from_success() {
        let auth = AuthManager::default();
        let stored = auth.store_from_response(&token_response(
            StatusCode::OK,
            r#"{"access_token":"USYS-1","token_type":"family_search"}"#,
        ));
        assert!(stored);
        assert_eq!(auth.access_token().as_deref(), Some("USYS-1"));
    }

    #[test]
    fn test_failure_keeps_previous_token() {
        let auth = AuthManager::new(Some("old".to_string()));

        assert!(!auth.store_from_response(&token_response(
            StatusCode::BAD_REQUEST,
            r#"{"error":"invalid_grant"}"#,
        )));
        assert!(!auth.store_from_response(&token_response(StatusCode::OK, "not json")));
        assert!(!auth.store_from_response(&token_response(StatusCode::OK, r#"{"token":""}"#)));

        assert_eq!(auth.access_token().as_deref(), Some("old"));
    }

    #[test]
    fn test_extract_legacy_token() {
        assert_eq!(extract_token(&json!({"token": "t"})), Some("t"));
        assert_eq!(
            extract_token(&json!({"access_token": "a", "token": "t"})),
            Some("a")
        );
        assert_eq!(extract_token(&json!({"errors": []})), None);
    }

    #[test]
    fn test_redirect_url() {
        let config = ClientConfig::new("key").redirect_uri("https://app.example.com/cb");
        let url = redirect_url(&config, Some("s1")).unwrap();

        assert_eq!(url.path(), "/cis-web/oauth2/v3/authorization");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("response_type".to_string(), "code".to_string())));
        assert!(pairs.contains(&("client_id".to_string(), "key".to_string())));
        assert!(pairs.contains(&("state".to_string(), "s1".to_string())));
    }

    #[test]
    fn test_revoke_request() {
        let auth = AuthManager::default();
        assert!(auth.revoke_request(&ClientConfig::new("key")).is_err());

        auth.set_access_token("abc");
        let req = auth.revoke_request(&ClientConfig::new("key")).unwrap();
        assert_eq!(req.method, Method::DELETE);
        assert_eq!(req.url.query(), Some("token=abc"));
    }
}
