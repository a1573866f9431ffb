//! Pick an [`HttpClient`] that works in whatever environment the code ends
//! up running in.
//!
//! [`default_http_client()`] prefers the global `fetch` function of a
//! browser or web worker. Failing that it asks the host for its `"https"`
//! module, which on native targets is backed by `reqwest`. If neither is
//! around, it still hands back a client, but every request made with it
//! fails with [`TransportError::Unavailable`].

pub mod ambient;
mod client;
mod config;
pub mod environment;
mod error;
mod fetch;
mod logging;
mod native;
mod selector;
mod unavailable;

pub use crate::{
    ambient::AmbientEnvironment,
    client::{DynHttpClient, HttpClient, HttpRequest, HttpRequestOptions, HttpResponse},
    config::{TransportConfig, USER_AGENT},
    environment::Environment,
    error::TransportError,
    fetch::FetchHttpClient,
    logging::initialize_logger,
    native::NativeHttpClient,
    selector::{
        default_http_client, default_http_client_with_config, select_http_client,
        select_http_client_with_config, DefaultHttpClient, TransportKind,
    },
    unavailable::NoHttpClient,
};
