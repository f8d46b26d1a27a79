//! Outbound requests, built fresh for every call.

use crate::errors::{FanoutError, Result};
use bytes::Bytes;
use http::Method;
use serde::Serialize;
use url::Url;

/// HTTP Basic credentials
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    /// Empty credentials send no Authorization header.
    pub fn is_empty(&self) -> bool {
        self.user.is_empty()
    }
}

/// One logical request, sent unchanged to every target it is dispatched to
#[derive(Clone, Debug)]
pub struct OutboundRequest {
    method: Method,
    path: String,
    body: Bytes,
    credentials: Option<Credentials>,
    query: Vec<(String, String)>,
}

impl OutboundRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: Bytes::new(),
            credentials: None,
            query: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Serialize `body` as the JSON request body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let bytes = serde_json::to_vec(body).map_err(FanoutError::Serialize)?;
        self.body = Bytes::from(bytes);
        Ok(self)
    }

    pub fn with_credentials(mut self, credentials: &Credentials) -> Self {
        self.credentials = (!credentials.is_empty()).then(|| credentials.clone());
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Build the full URL for this request against `base`.
    ///
    /// The base path and the request path are joined with exactly one `/`,
    /// and query pairs are appended in insertion order.
    pub fn target_url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        let path = format!(
            "{}/{}",
            base.path().trim_end_matches('/'),
            self.path.trim_start_matches('/')
        );
        url.set_path(&path);
        url.set_query(None);

        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }

        url
    }
}
