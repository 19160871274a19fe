//! HTTP 传输模块
//!
//! 使用 `web_sys::fetch` 实现核心库的 [`HttpClient`] 特性。
//! 只有“没有拿到响应”才返回错误，任何状态码都原样交给上层判断。

use async_trait::async_trait;
use emd_hunter::{ApiError, ApiResult, HttpClient, HttpRequest, HttpResponse};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

/// 基于 fetch 的 HTTP 客户端
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchHttpClient;

impl FetchHttpClient {
    fn build_request(req: &HttpRequest) -> Result<Request, ApiError> {
        let headers = Headers::new()
            .map_err(|e| ApiError::network(format!("Failed to create headers: {:?}", e)))?;

        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| ApiError::network(format!("Failed to set header {}: {:?}", key, e)))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());

        if let Some(body) = &req.body {
            opts.set_body(&JsValue::from_str(body));
        }

        Request::new_with_str_and_init(&req.url, &opts)
            .map_err(|e| ApiError::network(format!("{:?}", e)))
    }

    async fn read_text(response: &Response) -> String {
        let Ok(promise) = response.text() else {
            return String::new();
        };
        // 响应体读取失败按空响应体处理，状态码仍然有效
        JsFuture::from(promise)
            .await
            .ok()
            .and_then(|text| text.as_string())
            .unwrap_or_default()
    }
}

#[async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let request = Self::build_request(&req)?;

        let window =
            web_sys::window().ok_or_else(|| ApiError::network("window is not available"))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| ApiError::network(format!("{:?}", e)))?;

        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| ApiError::network(format!("Unexpected fetch result: {:?}", e)))?;

        let status = response.status();
        let body = Self::read_text(&response).await;

        Ok(HttpResponse { status, body })
    }
}
