//! Absolute URL composition for stored images
//!
//! Image URLs are built from the scheme and host the client used for the
//! current request, so the same record yields a reachable URL whichever
//! address the server was contacted on.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, Uri},
};

/// Path prefix the file store is served under.
pub const UPLOADS_PREFIX: &str = "/uploads";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOrigin {
    pub scheme: String,
    pub host: String,
}

impl RequestOrigin {
    pub fn from_parts(uri: &Uri, headers: &HeaderMap) -> Self {
        let scheme = uri.scheme_str().unwrap_or("http").to_string();
        let host = headers
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .or_else(|| uri.authority().map(|authority| authority.as_str()))
            .unwrap_or("localhost")
            .to_string();

        Self { scheme, host }
    }

    pub fn image_url(&self, filename: &str) -> String {
        format!("{}://{}{}/{}", self.scheme, self.host, UPLOADS_PREFIX, filename)
    }
}

impl<S> FromRequestParts<S> for RequestOrigin
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(&parts.uri, &parts.headers))
    }
}
