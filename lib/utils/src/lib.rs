use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Window, WorkerGlobalScope};

/// Try to extract the most appropriate error message from a [`JsValue`],
/// falling back to a generic error message.
pub fn js_error(value: JsValue) -> anyhow::Error {
    if let Some(e) = value.dyn_ref::<js_sys::Error>() {
        anyhow::Error::msg(String::from(e.message()))
    } else if let Some(s) = value.dyn_ref::<js_sys::JsString>() {
        anyhow::Error::msg(String::from(s))
    } else if let Some(obj) = value.dyn_ref::<js_sys::Object>() {
        anyhow::Error::msg(String::from(obj.to_string()))
    } else {
        anyhow::anyhow!("An unknown error occurred: {value:?}")
    }
}

/// A strongly-typed wrapper around `globalThis`.
#[derive(Debug, Clone, PartialEq)]
pub enum GlobalScope {
    Window(Window),
    Worker(WorkerGlobalScope),
}

impl GlobalScope {
    /// The current global scope, or `None` when `globalThis` is neither a
    /// window nor a worker (e.g. NodeJS or a bare JS engine).
    pub fn try_current() -> Option<Self> {
        match js_sys::global().dyn_into::<Window>() {
            Ok(window) => Some(GlobalScope::Window(window)),
            Err(global) => global
                .dyn_into::<WorkerGlobalScope>()
                .ok()
                .map(GlobalScope::Worker),
        }
    }

    /// Look up the scope's `fetch` property, returning it only if it is
    /// callable.
    pub fn fetch(&self) -> Option<js_sys::Function> {
        self.function("fetch")
    }

    /// Look up a property of the scope, returning it only if it is callable.
    pub fn function(&self, name: &str) -> Option<js_sys::Function> {
        property_function(self.as_object(), name)
    }

    /// A short name for the kind of scope, used in log messages.
    pub fn name(&self) -> &'static str {
        match self {
            GlobalScope::Window(_) => "window",
            GlobalScope::Worker(_) => "worker",
        }
    }

    pub fn as_object(&self) -> &js_sys::Object {
        match self {
            GlobalScope::Window(w) => w,
            GlobalScope::Worker(w) => w,
        }
    }
}

/// Look up a callable property of `globalThis`, whatever kind of scope it
/// is (this also works outside of browsers, e.g. for NodeJS' `require`).
pub fn global_function(name: &str) -> Option<js_sys::Function> {
    property_function(&js_sys::global(), name)
}

fn property_function(obj: &js_sys::Object, name: &str) -> Option<js_sys::Function> {
    js_sys::Reflect::get(obj, &JsValue::from_str(name))
        .ok()
        .and_then(|value| value.dyn_into::<js_sys::Function>().ok())
}
