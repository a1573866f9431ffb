use std::fmt;

use futures::future::BoxFuture;

use crate::{
    ambient::AmbientEnvironment,
    client::{HttpClient, HttpRequest, HttpResponse},
    config::TransportConfig,
    environment::{Environment, SECURE_TRANSPORT_MODULE},
    fetch::FetchHttpClient,
    native::NativeHttpClient,
    unavailable::NoHttpClient,
};

/// Which transport a [`DefaultHttpClient`] ended up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    /// The host's `fetch` function.
    Fetch,
    /// A secure-transport module loaded from the host.
    Native,
    /// Nothing usable was found.
    Unavailable,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Fetch => f.write_str("fetch"),
            TransportKind::Native => f.write_str("native"),
            TransportKind::Unavailable => f.write_str("unavailable"),
        }
    }
}

/// The client returned by [`default_http_client()`].
#[derive(Debug, Clone)]
pub enum DefaultHttpClient {
    Fetch(FetchHttpClient),
    Native(NativeHttpClient),
    Unavailable(NoHttpClient),
}

impl DefaultHttpClient {
    pub fn kind(&self) -> TransportKind {
        match self {
            DefaultHttpClient::Fetch(_) => TransportKind::Fetch,
            DefaultHttpClient::Native(_) => TransportKind::Native,
            DefaultHttpClient::Unavailable(_) => TransportKind::Unavailable,
        }
    }

    /// Whether requests have any chance of succeeding.
    pub fn is_available(&self) -> bool {
        self.kind() != TransportKind::Unavailable
    }
}

impl HttpClient for DefaultHttpClient {
    fn request(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse, anyhow::Error>> {
        match self {
            DefaultHttpClient::Fetch(client) => client.request(request),
            DefaultHttpClient::Native(client) => client.request(request),
            DefaultHttpClient::Unavailable(client) => client.request(request),
        }
    }
}

type Probe = fn(&dyn Environment, &TransportConfig) -> Option<DefaultHttpClient>;

/// Probes in priority order. The first one to produce a client wins, so a
/// host with both `fetch` and a module loader always gets `fetch`.
const PROBES: &[(&str, Probe)] = &[("fetch", probe_fetch), ("module-loader", probe_module_loader)];

fn probe_fetch(env: &dyn Environment, config: &TransportConfig) -> Option<DefaultHttpClient> {
    let fetch = env.fetch()?;
    Some(DefaultHttpClient::Fetch(FetchHttpClient::with_config(fetch, config)))
}

fn probe_module_loader(
    env: &dyn Environment,
    config: &TransportConfig,
) -> Option<DefaultHttpClient> {
    let loader = env.module_loader()?;

    match loader.load(SECURE_TRANSPORT_MODULE) {
        Ok(transport) => Some(DefaultHttpClient::Native(NativeHttpClient::with_config(
            transport, config,
        ))),
        Err(e) => {
            tracing::debug!(
                error = &e as &dyn std::error::Error,
                module = SECURE_TRANSPORT_MODULE,
                "Unable to load the secure transport module",
            );
            None
        }
    }
}

/// Pick the best [`HttpClient`] for `env`.
///
/// This never fails. If nothing usable is found, the returned client fails
/// on its first request instead.
pub fn select_http_client(env: &dyn Environment) -> DefaultHttpClient {
    select_http_client_with_config(env, &TransportConfig::default())
}

/// Like [`select_http_client()`], passing `config` on to the chosen
/// transport.
#[tracing::instrument(level = "debug", skip_all)]
pub fn select_http_client_with_config(
    env: &dyn Environment,
    config: &TransportConfig,
) -> DefaultHttpClient {
    let client = PROBES
        .iter()
        .find_map(|(name, probe)| {
            let client = probe(env, config);
            tracing::debug!(probe = *name, matched = client.is_some(), "Probed the environment");
            client
        })
        .unwrap_or(DefaultHttpClient::Unavailable(NoHttpClient));

    tracing::info!(transport = %client.kind(), "Selected an HTTP transport");
    client
}

/// Try to instantiate a HTTP client that is suitable for the current platform.
pub fn default_http_client() -> DefaultHttpClient {
    default_http_client_with_config(&TransportConfig::default())
}

pub fn default_http_client_with_config(config: &TransportConfig) -> DefaultHttpClient {
    select_http_client_with_config(&AmbientEnvironment::with_config(config.clone()), config)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tracing_test::traced_test;

    use super::*;
    use crate::{
        environment::{ModuleLoader, SharedFetch, SharedModuleLoader, SharedSecureTransport},
        TransportError,
    };

    #[derive(Debug)]
    struct MissingModules;

    impl ModuleLoader for MissingModules {
        fn load(&self, name: &str) -> Result<SharedSecureTransport, TransportError> {
            Err(TransportError::ModuleNotFound {
                name: name.to_string(),
            })
        }
    }

    #[derive(Debug)]
    struct ServerHost;

    impl Environment for ServerHost {
        fn fetch(&self) -> Option<SharedFetch> {
            None
        }

        fn module_loader(&self) -> Option<SharedModuleLoader> {
            Some(Arc::new(MissingModules))
        }
    }

    #[test]
    #[traced_test]
    fn swallowed_load_failures_are_logged() {
        let client = select_http_client(&ServerHost);

        assert_eq!(client.kind(), TransportKind::Unavailable);
        assert!(logs_contain("Unable to load the secure transport module"));
        assert!(logs_contain("transport=unavailable"));
    }

    #[test]
    fn transport_kinds_have_short_names() {
        let names: Vec<_> = [
            TransportKind::Fetch,
            TransportKind::Native,
            TransportKind::Unavailable,
        ]
        .iter()
        .map(ToString::to_string)
        .collect();

        assert_eq!(names, ["fetch", "native", "unavailable"]);
    }
}
