use futures::future::BoxFuture;

use crate::{
    client::{HttpClient, HttpRequest, HttpResponse},
    config::TransportConfig,
    environment::SharedSecureTransport,
};

/// A [`HttpClient`] backed by a secure-transport module loaded from the
/// host.
#[derive(Debug, Clone)]
pub struct NativeHttpClient {
    transport: SharedSecureTransport,
    user_agent: String,
}

impl NativeHttpClient {
    pub fn new(transport: SharedSecureTransport) -> Self {
        NativeHttpClient::with_config(transport, &TransportConfig::default())
    }

    pub fn with_config(transport: SharedSecureTransport, config: &TransportConfig) -> Self {
        NativeHttpClient {
            transport,
            user_agent: config.user_agent.clone(),
        }
    }

    /// The module every request is delegated to.
    pub fn transport(&self) -> &SharedSecureTransport {
        &self.transport
    }
}

impl HttpClient for NativeHttpClient {
    fn request(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse, anyhow::Error>> {
        let request = request.with_default_user_agent(&self.user_agent);
        tracing::trace!(
            %request.url,
            %request.method,
            "Sending a request with the native transport",
        );
        self.transport.send(request)
    }
}
