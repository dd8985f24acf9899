// FunimationLater - Rust client for the Funimation streaming API
// Copyright (C) 2025 FunimationLater contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! HTTP client for the FunimationLater API
//!
//! This module provides the transport layer every other API module goes through:
//! - URL building against a base host
//! - Default and caller-merged headers
//! - Form encoding for query strings and POST bodies
//! - Pluggable response parsing (XML by default)
//! - Translation of non-2xx responses into [`FunimationError::DetailedHttpError`]
//! - A newest-first record of the last five requests for diagnostics
//!
//! # Architecture
//!
//! ## Client Structure
//! The `HttpClient` wraps `reqwest::blocking::Client`. Calls block the current
//! thread until the round-trip completes; there are no retries. `get` and `post`
//! take `&mut self` since they append to the request history.
//!
//! ## URL Building
//! ```text
//! "https://other.host/x"  -> used verbatim, host ignored
//! "/shows"                -> host + "/shows"
//! "shows"                 -> host + "/" + "shows"
//! ```
//! A query is appended after `?` even when the uri is absolute.

use crate::api::history::{RequestHistory, RequestInfo};
use crate::api::response::{ResponseParser, XmlParser};
use crate::error::{FunimationError, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT_ENCODING, CONTENT_TYPE, USER_AGENT};
use reqwest::Method;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::Duration;
use url::form_urlencoded;

/// Default `User-Agent`, `<product>:<component>:v<version>`
pub const DEFAULT_USER_AGENT: &str = concat!("Rust:FunimationLater:v", env!("CARGO_PKG_VERSION"));

/// Default `Accept-Encoding`
pub const DEFAULT_ACCEPT_ENCODING: &str = "gzip, deflate";

/// Configuration for HttpClient
/// Provides a builder pattern for client customization
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub user_agent: String,
    /// `None` keeps the transport's own default
    pub timeout: Option<Duration>,
    pub enable_cookies: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
            enable_cookies: true,
        }
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }
}

/// Builder for ClientConfig
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    pub fn enable_cookies(mut self, enable: bool) -> Self {
        self.config.enable_cookies = enable;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}

/// Query string for [`HttpClient::get`]
///
/// Either already encoded (`"a=b&c=d"`) or key/value pairs to be form-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Encoded(String),
    Pairs(Vec<(String, String)>),
}

impl Query {
    /// Build from any scalar pairs (`&str`, `String`, numbers, ...)
    pub fn pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: ToString,
        V: ToString,
    {
        Query::Pairs(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    /// Encoded form, without the leading `?`
    pub fn encode(&self) -> String {
        match self {
            Query::Encoded(raw) => raw.clone(),
            Query::Pairs(pairs) => encode_pairs(pairs),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Query::Encoded(raw) => raw.is_empty(),
            Query::Pairs(pairs) => pairs.is_empty(),
        }
    }
}

impl From<&str> for Query {
    fn from(raw: &str) -> Self {
        Query::Encoded(raw.to_string())
    }
}

impl From<String> for Query {
    fn from(raw: String) -> Self {
        Query::Encoded(raw)
    }
}

impl<K: ToString, V: ToString> From<Vec<(K, V)>> for Query {
    fn from(pairs: Vec<(K, V)>) -> Self {
        Query::pairs(pairs)
    }
}

impl<K: ToString, V: ToString, const N: usize> From<[(K, V); N]> for Query {
    fn from(pairs: [(K, V); N]) -> Self {
        Query::pairs(pairs)
    }
}

impl<K: ToString, V: ToString> From<HashMap<K, V>> for Query {
    fn from(pairs: HashMap<K, V>) -> Self {
        Query::pairs(pairs)
    }
}

impl<K: ToString, V: ToString> From<BTreeMap<K, V>> for Query {
    fn from(pairs: BTreeMap<K, V>) -> Self {
        Query::pairs(pairs)
    }
}

/// `application/x-www-form-urlencoded` serialization of `pairs`
pub fn encode_pairs<K, V>(pairs: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().map(|(k, v)| (k.as_ref(), v.as_ref())))
        .finish()
}

/// Blocking HTTP client for the FunimationLater API
///
/// # Example
/// ```rust,no_run
/// use funimationlater::api::client::{HttpClient, Query};
///
/// # fn example() -> funimationlater::error::Result<()> {
/// let mut client = HttpClient::new("https://api-funimation.dadcdigital.com/xml")?;
/// client.add_headers([("Authorization", "Token abc123")])?;
///
/// let shows = client.get("/longlist/content/page/", Some(Query::from([("id", "shows")])))?;
/// let login = client.post("/auth/login/", &[("username", "me"), ("password", "secret")])?;
/// # Ok(())
/// # }
/// ```
pub struct HttpClient {
    /// Underlying HTTP client
    client: Client,
    /// Base URL for relative paths (e.g., https://api-funimation.dadcdigital.com/xml)
    host: String,
    /// Headers sent with every request
    headers: HeaderMap,
    parser: Box<dyn ResponseParser>,
    history: RequestHistory,
}

impl HttpClient {
    /// Create a client using the XML parser and default configuration
    pub fn new(host: impl Into<String>) -> Result<Self> {
        Self::with_parser(host, XmlParser)
    }

    /// Create a client using a custom response parser
    pub fn with_parser<P>(host: impl Into<String>, parser: P) -> Result<Self>
    where
        P: ResponseParser + 'static,
    {
        Self::with_config(host, parser, ClientConfig::default())
    }

    /// Create a client with a custom parser and configuration
    ///
    /// # Errors
    /// Returns error if the user agent is not a valid header value or the
    /// transport cannot be built
    pub fn with_config<P>(host: impl Into<String>, parser: P, config: ClientConfig) -> Result<Self>
    where
        P: ResponseParser + 'static,
    {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static(DEFAULT_ACCEPT_ENCODING));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).map_err(|e| FunimationError::InvalidHeader {
                name: USER_AGENT.to_string(),
                reason: e.to_string(),
            })?,
        );

        let mut client_builder = Client::builder().cookie_store(config.enable_cookies);
        if let Some(timeout) = config.timeout {
            client_builder = client_builder.timeout(timeout);
        }
        let client = client_builder.build()?;

        Ok(Self {
            client,
            host: host.into(),
            headers,
            parser: Box::new(parser),
            history: RequestHistory::new(),
        })
    }

    /// Get the base host
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Headers sent with every request
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Recent requests, newest first
    pub fn recent_requests(&self) -> &RequestHistory {
        &self.history
    }

    /// Send a GET request to `uri`, with an optional query string
    ///
    /// # Returns
    /// Whatever the configured parser produces for the body
    ///
    /// # Errors
    /// - `DetailedHttpError` on a non-2xx status
    /// - `UnknownResponse` if the body cannot be parsed
    /// - `Network` if no response was received
    pub fn get(&mut self, uri: &str, query: Option<Query>) -> Result<Value> {
        let uri = match query {
            Some(query) if !query.is_empty() => format!("{}?{}", uri, query.encode()),
            _ => uri.to_string(),
        };
        self.request(Method::GET, &uri, None)
    }

    /// Send a POST request to `uri` with `data` form-encoded as the body
    ///
    /// Same return and error contract as [`HttpClient::get`].
    pub fn post<K, V>(&mut self, uri: &str, data: &[(K, V)]) -> Result<Value>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.request(Method::POST, uri, Some(encode_pairs(data)))
    }

    /// Merge `headers` into the default header set
    ///
    /// Existing headers with the same name are overwritten; nothing is removed.
    /// Every pair is validated before any is applied, so a rejected call leaves
    /// the set unchanged.
    ///
    /// # Errors
    /// Returns `InvalidHeader` for a name or value that is not legal in HTTP
    pub fn add_headers<I, K, V>(&mut self, headers: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut validated = Vec::new();
        for (name, value) in headers {
            let (name, value) = (name.as_ref(), value.as_ref());
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                FunimationError::InvalidHeader {
                    name: name.to_string(),
                    reason: e.to_string(),
                }
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| {
                FunimationError::InvalidHeader {
                    name: name.to_string(),
                    reason: e.to_string(),
                }
            })?;
            validated.push((header_name, header_value));
        }

        for (name, value) in validated {
            self.headers.insert(name, value);
        }
        Ok(())
    }

    /// Drop a default header, returning its previous value
    pub fn remove_header(&mut self, name: HeaderName) -> Option<HeaderValue> {
        self.headers.remove(name)
    }

    /// Resolve `uri` against the host
    pub fn build_url(&self, uri: &str) -> String {
        if uri.starts_with("http") {
            uri.to_string()
        } else if uri.starts_with('/') {
            format!("{}{}", self.host, uri)
        } else {
            format!("{}/{}", self.host, uri)
        }
    }

    fn create_request(&self, method: Method, uri: &str) -> RequestInfo {
        let request = RequestInfo::new(method, self.build_url(uri), self.headers.clone());
        log::debug!("Calling {} on {}", request.method, request.url);
        request
    }

    /// Record, send, and hand the body to the parser
    fn request(&mut self, method: Method, uri: &str, body: Option<String>) -> Result<Value> {
        let info = self.create_request(method, uri);
        self.history.record(info.clone());

        let mut req_builder = self
            .client
            .request(info.method.clone(), info.url.as_str())
            .headers(info.headers.clone());
        if let Some(body) = body {
            req_builder = req_builder
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(body);
        }

        let response = req_builder.send()?;
        let status = response.status();

        if !status.is_success() {
            let headers = response.headers().clone();
            let body = response.text().unwrap_or_else(|e| {
                log::warn!("Could not read error body of {}: {}", info, e);
                String::new()
            });
            log::warn!("{} failed with status {}", info, status);
            return Err(FunimationError::DetailedHttpError {
                url: info.url,
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or_default().to_string(),
                headers,
                body,
            });
        }

        let bytes = response.bytes()?;
        self.parser.parse(&bytes, &info)
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<HttpClient: {}>", self.host)
    }
}

// ===== TESTS =====
