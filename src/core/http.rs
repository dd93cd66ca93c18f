//! HTTP utilities for platform API communication

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, COOKIE};
use reqwest::Client;

use crate::config::ImportConfig;
use crate::credentials::Credentials;
use crate::error::{ImportError, Result};

/// Build request headers for an API call.
///
/// Session cookies become one `Cookie` header and an API token becomes a
/// bearer `Authorization` header; both are marked sensitive so they are kept
/// out of `Debug` output.
pub fn api_headers(credentials: &Credentials) -> Result<HeaderMap> {
    let mut h = HeaderMap::new();
    h.insert(ACCEPT, HeaderValue::from_static("application/json"));

    match credentials {
        Credentials::None => {}
        Credentials::ApiToken(_) => {
            let token = credentials.api_token().unwrap_or_default();
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ImportError::config("API token contains invalid characters"))?;
            value.set_sensitive(true);
            h.insert(AUTHORIZATION, value);
        }
        Credentials::SessionCookies(cookies) => {
            let cookie = cookies
                .iter()
                .map(|c| format!("{}={}", c.name, c.value()))
                .collect::<Vec<_>>()
                .join("; ");
            let mut value = HeaderValue::from_str(&cookie)
                .map_err(|_| ImportError::config("session cookie contains invalid characters"))?;
            value.set_sensitive(true);
            h.insert(COOKIE, value);
        }
    }

    Ok(h)
}

/// A client scoped to one import. Dropped (and its connections closed) when
/// the import returns.
pub fn build_api_client(config: &ImportConfig, credentials: &Credentials) -> Result<Client> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(api_headers(credentials)?)
        .timeout(config.http_timeout)
        .build()
        .map_err(|_| ImportError::config("failed to build HTTP client"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{Secret, SessionCookie};

    #[test]
    fn test_api_headers_without_credentials() {
        let headers = api_headers(&Credentials::None).unwrap();

        assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
        assert!(!headers.contains_key(COOKIE));
        assert!(!headers.contains_key(AUTHORIZATION));
    }

    #[test]
    fn test_api_headers_with_cookies() {
        let creds = Credentials::SessionCookies(vec![
            SessionCookie::new("SWID", "test_swid"),
            SessionCookie::new("espn_s2", "test_s2"),
        ]);
        let headers = api_headers(&creds).unwrap();

        let cookie = headers.get(COOKIE).unwrap();
        assert!(cookie.is_sensitive());
        assert_eq!(cookie, "SWID=test_swid; espn_s2=test_s2");
    }

    #[test]
    fn test_api_headers_with_token() {
        let creds = Credentials::ApiToken(Secret::new("abc123"));
        let headers = api_headers(&creds).unwrap();

        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc123");
        assert!(!format!("{:?}", headers).contains("abc123"));
    }

    #[test]
    fn test_api_headers_rejects_invalid_cookie() {
        let creds = Credentials::SessionCookies(vec![SessionCookie::new("a", "line\nbreak")]);
        let err = api_headers(&creds).unwrap_err();
        assert!(!err.to_string().contains("line"));
    }
}
