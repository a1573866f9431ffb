//! The primitives a host environment may provide, and the [`Environment`]
//! trait used to probe for them.

use std::{fmt, sync::Arc};

use futures::future::BoxFuture;

use crate::{
    client::{HttpRequest, HttpResponse},
    TransportError,
};

/// Name of the module a server-like host is asked for when no `fetch`
/// function is around.
pub const SECURE_TRANSPORT_MODULE: &str = "https";

/// A `fetch`-style function provided by the host, already bound to the
/// global scope it was taken from.
pub trait FetchPrimitive: fmt::Debug {
    fn fetch(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse, anyhow::Error>>;
}

/// A low-level module that can send requests over a secure connection.
pub trait SecureTransport: fmt::Debug {
    fn send(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse, anyhow::Error>>;
}

/// Resolves modules by name, the way a server-like runtime loads optional
/// dependencies.
pub trait ModuleLoader: fmt::Debug {
    fn load(&self, name: &str) -> Result<SharedSecureTransport, TransportError>;
}

pub type SharedFetch = Arc<dyn FetchPrimitive + Send + Sync>;
pub type SharedSecureTransport = Arc<dyn SecureTransport + Send + Sync>;
pub type SharedModuleLoader = Arc<dyn ModuleLoader + Send + Sync>;

/// A view of the host the code is running in.
///
/// Each method is a probe. Returning `None` means the host doesn't provide
/// that primitive.
pub trait Environment: fmt::Debug {
    /// A callable `fetch` function from a browser-like global scope.
    fn fetch(&self) -> Option<SharedFetch>;

    /// A module loader from a server-like runtime.
    fn module_loader(&self) -> Option<SharedModuleLoader>;
}

impl<E: Environment + ?Sized> Environment for &E {
    fn fetch(&self) -> Option<SharedFetch> {
        (**self).fetch()
    }

    fn module_loader(&self) -> Option<SharedModuleLoader> {
        (**self).module_loader()
    }
}
