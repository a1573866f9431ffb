use std::{fmt, sync::Arc};

use futures::future::BoxFuture;
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use url::Url;

/// Per-request transport options.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HttpRequestOptions {
    /// Prefix the request URL with this proxy. Only honoured by transports
    /// that are subject to the browser's same-origin policy.
    pub cors_proxy: Option<String>,
}

/// An outgoing HTTP request.
#[derive(Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: Url,
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
    pub options: HttpRequestOptions,
}

impl HttpRequest {
    /// A `GET` request without headers or body.
    pub fn get(url: Url) -> Self {
        HttpRequest {
            url,
            method: Method::GET,
            headers: HeaderMap::new(),
            body: None,
            options: HttpRequestOptions::default(),
        }
    }

    /// Set the `User-Agent` header unless the caller already provided one.
    pub(crate) fn with_default_user_agent(mut self, user_agent: &str) -> Self {
        if !self.headers.contains_key(http::header::USER_AGENT) {
            match HeaderValue::from_str(user_agent) {
                Ok(value) => {
                    self.headers.insert(http::header::USER_AGENT, value);
                }
                Err(e) => {
                    tracing::warn!(
                        error = &e as &dyn std::error::Error,
                        user_agent,
                        "Ignoring a user agent that isn't a valid header value",
                    );
                }
            }
        }

        self
    }
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let HttpRequest {
            url,
            method,
            headers,
            body,
            options,
        } = self;

        f.debug_struct("HttpRequest")
            .field("url", &format_args!("{url}"))
            .field("method", method)
            .field("headers", headers)
            .field("body", &body.as_deref().map(String::from_utf8_lossy))
            .field("options", options)
            .finish()
    }
}

/// An incoming HTTP response.
#[derive(Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub body: Option<Vec<u8>>,
    pub redirected: bool,
    pub status: StatusCode,
    pub headers: HeaderMap,
}

impl HttpResponse {
    /// Whether the request completed with a `2xx` status.
    pub fn is_ok(&self) -> bool {
        self.status.is_success()
    }

    /// The body as (lossily decoded) UTF-8 text.
    pub fn body_text(&self) -> Option<String> {
        self.body
            .as_deref()
            .map(|body| String::from_utf8_lossy(body).into_owned())
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let HttpResponse {
            body,
            redirected,
            status,
            headers,
        } = self;

        f.debug_struct("HttpResponse")
            .field("body", &body.as_deref().map(String::from_utf8_lossy))
            .field("redirected", redirected)
            .field("status", status)
            .field("headers", headers)
            .finish()
    }
}

/// Something that can send a [`HttpRequest`] and resolve to a
/// [`HttpResponse`].
pub trait HttpClient: fmt::Debug {
    fn request(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse, anyhow::Error>>;
}

impl<D, C> HttpClient for D
where
    D: std::ops::Deref<Target = C> + fmt::Debug,
    C: HttpClient + ?Sized + 'static,
{
    fn request(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse, anyhow::Error>> {
        let client = &**self;
        client.request(request)
    }
}

/// A reference-counted [`HttpClient`] trait object.
pub type DynHttpClient = Arc<dyn HttpClient + Send + Sync>;
