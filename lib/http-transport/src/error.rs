/// Errors produced while locating or using a transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The host offers neither a `fetch` function nor a secure-transport
    /// module.
    #[error("No method available to perform HTTP request")]
    Unavailable,
    #[error("module \"{name}\" is not available in this environment")]
    ModuleNotFound { name: String },
    #[error("unable to load the \"{name}\" module")]
    ModuleLoad {
        name: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error("unable to route \"{url}\" through the CORS proxy \"{proxy}\"")]
    InvalidCorsProxy {
        proxy: String,
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl TransportError {
    /// Whether this error means no transport could be found at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, TransportError::Unavailable)
    }
}
