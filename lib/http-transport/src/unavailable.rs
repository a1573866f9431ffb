use futures::future::BoxFuture;

use crate::{
    client::{HttpClient, HttpRequest, HttpResponse},
    TransportError,
};

/// The [`HttpClient`] handed out when the host has no way to make requests.
///
/// Constructing it always succeeds; every request fails with
/// [`TransportError::Unavailable`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NoHttpClient;

impl HttpClient for NoHttpClient {
    fn request(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse, anyhow::Error>> {
        tracing::warn!(%request.url, %request.method, "No HTTP transport is available");
        Box::pin(async { Err(TransportError::Unavailable.into()) })
    }
}
