use std::borrow::Cow;

use futures::future::BoxFuture;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use utils::{js_error, GlobalScope};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::{
    client::{HttpRequest, HttpResponse},
    environment::FetchPrimitive,
    TransportError,
};

/// The global scope's `fetch` function.
///
/// No JS handles are stored, so this can be sent to other threads. The
/// function is looked up on the global scope of whichever thread sends the
/// request, and is invoked with that scope as `this`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsFetch {
    property: Cow<'static, str>,
}

impl JsFetch {
    pub fn new() -> Self {
        JsFetch::with_property("fetch")
    }

    /// Use a differently named function of the global scope instead of
    /// `fetch`.
    pub fn with_property(property: impl Into<Cow<'static, str>>) -> Self {
        JsFetch {
            property: property.into(),
        }
    }
}

impl Default for JsFetch {
    fn default() -> Self {
        JsFetch::new()
    }
}

impl FetchPrimitive for JsFetch {
    fn fetch(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse, anyhow::Error>> {
        let (tx, rx) = tokio::sync::oneshot::channel();
        let this = self.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let result = this.fetch_local(request).await;
            let _ = tx.send(result);
        });

        Box::pin(async move {
            match rx.await {
                Ok(result) => result,
                Err(_) => {
                    Err(TransportError::Fetch("the request was abandoned".to_string()).into())
                }
            }
        })
    }
}

impl JsFetch {
    async fn fetch_local(&self, request: HttpRequest) -> Result<HttpResponse, anyhow::Error> {
        let scope = GlobalScope::try_current().ok_or_else(|| {
            TransportError::Fetch("this thread has no browser global scope".to_string())
        })?;
        let function = scope.function(&self.property).ok_or_else(|| {
            TransportError::Fetch(format!("`{}` is not a function", self.property))
        })?;

        let js_request = js_request(&request)?;

        let promise = function
            .call1(scope.as_object(), &js_request)
            .map_err(js_error)?
            .dyn_into::<js_sys::Promise>()
            .map_err(|_| TransportError::Fetch("fetch didn't return a promise".to_string()))?;

        let response = JsFuture::from(promise)
            .await
            .map_err(js_error)?
            .dyn_into::<web_sys::Response>()
            .map_err(|_| TransportError::Fetch("fetch didn't resolve to a Response".to_string()))?;

        let status = StatusCode::from_u16(response.status())?;
        let redirected = response.redirected();
        let headers = header_map(&response.headers())?;

        let buffer = JsFuture::from(response.array_buffer().map_err(js_error)?)
            .await
            .map_err(js_error)?;
        let body = js_sys::Uint8Array::new(&buffer).to_vec();

        tracing::trace!(%status, redirected, body.len = body.len(), "Received a response");

        Ok(HttpResponse {
            body: Some(body),
            redirected,
            status,
            headers,
        })
    }
}

fn js_request(request: &HttpRequest) -> Result<web_sys::Request, anyhow::Error> {
    let init = web_sys::RequestInit::new();
    init.set_method(request.method.as_str());

    let headers = web_sys::Headers::new().map_err(js_error)?;
    for (name, value) in &request.headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        headers.append(name.as_str(), &value).map_err(js_error)?;
    }
    init.set_headers(&headers);

    if let Some(body) = &request.body {
        let body = js_sys::Uint8Array::from(body.as_slice());
        init.set_body(&body);
    }

    web_sys::Request::new_with_str_and_init(request.url.as_str(), &init).map_err(js_error)
}

fn header_map(headers: &web_sys::Headers) -> Result<HeaderMap, anyhow::Error> {
    let mut map = HeaderMap::new();

    let Some(entries) = js_sys::try_iter(headers).map_err(js_error)? else {
        return Ok(map);
    };

    for entry in entries {
        let entry: js_sys::Array = entry.map_err(js_error)?.unchecked_into();
        let (Some(name), Some(value)) = (entry.get(0).as_string(), entry.get(1).as_string())
        else {
            continue;
        };
        map.append(
            HeaderName::from_bytes(name.as_bytes())?,
            HeaderValue::from_str(&value)?,
        );
    }

    Ok(map)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use wasm_bindgen::JsValue;
    use wasm_bindgen_test::wasm_bindgen_test;

    use super::*;
    use crate::{environment::Environment, FetchHttpClient, HttpClient};

    wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

    fn install_global_function(name: &str, body: &str) {
        let function = js_sys::Function::new_with_args("request", body);
        js_sys::Reflect::set(&js_sys::global(), &JsValue::from_str(name), &function).unwrap();
    }

    #[wasm_bindgen_test]
    fn browser_environment_provides_fetch() {
        let env = crate::AmbientEnvironment::new();

        assert!(env.fetch().is_some());
        assert!(env.module_loader().is_none());
    }

    #[wasm_bindgen_test]
    fn requests_carry_method_headers_and_body() {
        let mut request = HttpRequest::get("https://example.com/upload".parse().unwrap());
        request.method = http::Method::POST;
        request
            .headers
            .insert(http::header::CONTENT_TYPE, "text/plain".parse().unwrap());
        request.body = Some(b"hi".to_vec());

        let js = js_request(&request).unwrap();

        assert_eq!(js.method(), "POST");
        assert_eq!(js.url(), "https://example.com/upload");
        assert_eq!(
            js.headers().get("content-type").unwrap().as_deref(),
            Some("text/plain")
        );
    }

    #[wasm_bindgen_test]
    fn empty_headers_produce_an_empty_map() {
        let headers = web_sys::Headers::new().unwrap();

        let map = header_map(&headers).unwrap();

        assert!(map.is_empty());
    }

    #[wasm_bindgen_test]
    async fn fetch_is_called_with_the_global_scope_as_this() {
        install_global_function(
            "fetchThatChecksThis",
            "return this === globalThis \
                ? Promise.resolve(new Response('ok')) \
                : Promise.reject('unbound')",
        );
        let client = FetchHttpClient::new(Arc::new(JsFetch::with_property("fetchThatChecksThis")));

        let response = client
            .request(HttpRequest::get("https://example.com/".parse().unwrap()))
            .await
            .unwrap();

        assert!(response.is_ok());
        assert_eq!(response.body_text().as_deref(), Some("ok"));
    }

    #[wasm_bindgen_test]
    async fn missing_function_is_a_fetch_error() {
        let client = FetchHttpClient::new(Arc::new(JsFetch::with_property("noSuchFetch")));

        let err = client
            .request(HttpRequest::get("https://example.com/".parse().unwrap()))
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<TransportError>(),
            Some(TransportError::Fetch(_))
        ));
    }

    #[wasm_bindgen_test]
    fn require_alone_does_not_provide_a_module_loader() {
        install_global_function("require", "throw new Error('no modules here')");
        let env = crate::AmbientEnvironment::new();

        let loader = env.module_loader();
        js_sys::Reflect::delete_property(&js_sys::global(), &JsValue::from_str("require")).unwrap();

        assert!(loader.is_none());
    }
}
