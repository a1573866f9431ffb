//! Probes for the environment the code is actually running in.

use std::sync::Arc;

use crate::{
    config::TransportConfig,
    environment::{Environment, SharedFetch, SharedModuleLoader},
};

cfg_if::cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        mod web;
        pub use self::web::JsFetch;
    } else {
        pub mod reqwest;
        pub use self::reqwest::{NativeModuleLoader, ReqwestTransport};
    }
}

/// The host environment of the current process or thread.
///
/// Browsers and web workers expose their global `fetch` function. Native
/// targets can't call into JavaScript, but can always load the `"https"`
/// module backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct AmbientEnvironment {
    // Only the native module loader is configurable.
    #[cfg_attr(target_arch = "wasm32", allow(dead_code))]
    config: TransportConfig,
}

impl AmbientEnvironment {
    pub fn new() -> Self {
        AmbientEnvironment::default()
    }

    pub fn with_config(config: TransportConfig) -> Self {
        AmbientEnvironment { config }
    }
}

#[cfg(target_arch = "wasm32")]
impl Environment for AmbientEnvironment {
    fn fetch(&self) -> Option<SharedFetch> {
        let scope = utils::GlobalScope::try_current()?;
        scope.fetch()?;
        tracing::debug!(scope = scope.name(), "Found a fetch function");
        Some(Arc::new(JsFetch::new()))
    }

    fn module_loader(&self) -> Option<SharedModuleLoader> {
        // TODO: drive NodeJS' `https` module through `require` so wasm
        // builds hosted by Node get a native transport.
        if utils::global_function("require").is_some() {
            tracing::debug!("Found `require`, but loading modules from wasm isn't supported");
        } else {
            tracing::debug!("No module loader in this environment");
        }
        None
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Environment for AmbientEnvironment {
    fn fetch(&self) -> Option<SharedFetch> {
        None
    }

    fn module_loader(&self) -> Option<SharedModuleLoader> {
        Some(Arc::new(NativeModuleLoader::new(self.config.clone())))
    }
}
