use std::sync::Arc;

use anyhow::Context;
use futures::future::BoxFuture;

use crate::{
    client::{HttpRequest, HttpResponse},
    config::TransportConfig,
    environment::{ModuleLoader, SecureTransport, SharedSecureTransport, SECURE_TRANSPORT_MODULE},
    TransportError,
};

/// The native stand-in for a module loader: the only module it knows about
/// is [`SECURE_TRANSPORT_MODULE`].
#[derive(Debug, Clone, Default)]
pub struct NativeModuleLoader {
    config: TransportConfig,
}

impl NativeModuleLoader {
    pub fn new(config: TransportConfig) -> Self {
        NativeModuleLoader { config }
    }
}

impl ModuleLoader for NativeModuleLoader {
    fn load(&self, name: &str) -> Result<SharedSecureTransport, TransportError> {
        if name != SECURE_TRANSPORT_MODULE {
            return Err(TransportError::ModuleNotFound {
                name: name.to_string(),
            });
        }

        let transport =
            ReqwestTransport::new(&self.config).map_err(|e| TransportError::ModuleLoad {
                name: name.to_string(),
                source: e.into(),
            })?;

        Ok(Arc::new(transport))
    }
}

/// A [`SecureTransport`] that sends requests with [`reqwest`] over rustls.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());

        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(ReqwestTransport {
            client: builder.build()?,
        })
    }

    async fn send_async(&self, request: HttpRequest) -> Result<HttpResponse, anyhow::Error> {
        let HttpRequest {
            url,
            method,
            headers,
            body,
            options: _,
        } = request;

        let mut builder = self.client.request(method, url.clone()).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .with_context(|| format!("unable to send a request to \"{url}\""))?;

        let status = response.status();
        let redirected = response.url() != &url;
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .context("unable to read the response body")?;

        Ok(HttpResponse {
            body: Some(body.to_vec()),
            redirected,
            status,
            headers,
        })
    }
}

impl SecureTransport for ReqwestTransport {
    fn send(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse, anyhow::Error>> {
        Box::pin(self.send_async(request))
    }
}
