use futures::future::BoxFuture;
use url::Url;

use crate::{
    client::{HttpClient, HttpRequest, HttpResponse},
    config::TransportConfig,
    environment::SharedFetch,
    TransportError,
};

/// A [`HttpClient`] that goes through the host's `fetch` function.
#[derive(Debug, Clone)]
pub struct FetchHttpClient {
    fetch: SharedFetch,
    user_agent: String,
}

impl FetchHttpClient {
    pub fn new(fetch: SharedFetch) -> Self {
        FetchHttpClient::with_config(fetch, &TransportConfig::default())
    }

    pub fn with_config(fetch: SharedFetch, config: &TransportConfig) -> Self {
        FetchHttpClient {
            fetch,
            user_agent: config.user_agent.clone(),
        }
    }

    /// The `fetch` function every request is delegated to.
    pub fn primitive(&self) -> &SharedFetch {
        &self.fetch
    }

    fn prepare(&self, request: HttpRequest) -> Result<HttpRequest, TransportError> {
        let mut request = request.with_default_user_agent(&self.user_agent);

        if let Some(proxy) = &request.options.cors_proxy {
            request.url = proxied_url(proxy, &request.url)?;
        }

        Ok(request)
    }
}

fn proxied_url(proxy: &str, url: &Url) -> Result<Url, TransportError> {
    let proxy = proxy.trim_end_matches('/');
    format!("{proxy}/{url}")
        .parse()
        .map_err(|source| TransportError::InvalidCorsProxy {
            proxy: proxy.to_string(),
            url: url.to_string(),
            source,
        })
}

impl HttpClient for FetchHttpClient {
    fn request(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse, anyhow::Error>> {
        let request = match self.prepare(request) {
            Ok(request) => request,
            Err(e) => return Box::pin(async move { Err(e.into()) }),
        };

        tracing::trace!(%request.url, %request.method, "Sending a request with fetch");
        self.fetch.fetch(request)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn cors_proxy_prefixes_the_url() {
        let url: Url = "https://example.com/data?x=1".parse().unwrap();

        let proxied = proxied_url("https://proxy.example/", &url).unwrap();

        assert_eq!(
            proxied.as_str(),
            "https://proxy.example/https://example.com/data?x=1"
        );
    }

    #[test]
    fn unparseable_cors_proxy_is_an_error() {
        let url: Url = "https://example.com/".parse().unwrap();

        let err = proxied_url("not a proxy", &url).unwrap_err();

        assert!(matches!(err, TransportError::InvalidCorsProxy { .. }));
    }
}
