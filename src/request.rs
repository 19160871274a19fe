use serde::{Serialize, de::DeserializeOwned};
use std::collections::HashMap;

use crate::error::{ApiError, ApiResult};

pub use emd_hunter_shared::protocol::HttpMethod;

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::VecDeque;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_headers(mut self, headers: &HashMap<String, String>) -> Self {
        self.headers
            .extend(headers.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    pub fn with_json<T: Serialize>(mut self, body: &T) -> ApiResult<Self> {
        let body = serde_json::to_string(body)
            .map_err(|e| ApiError::validation(format!("Could not encode request: {}", e)))?;
        self.body = Some(body);
        Ok(self.with_header("Content-Type", "application/json"))
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// 检查响应是否成功 (2xx)
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 解析 JSON 响应体；空响应体（如 204）按 `null` 处理
    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        let body = if self.body.trim().is_empty() {
            "null"
        } else {
            self.body.as_str()
        };
        serde_json::from_str(body).map_err(|e| {
            ApiError::backend("Unexpected response from server")
                .with_status(self.status)
                .in_op(format!("decode: {}", e))
        })
    }
}

/// HTTP 客户端特性 (Trait)
///
/// (?Send) 是因为浏览器环境下 fetch 的 Future 不是 Send 的。
/// 只有“没有收到响应”才返回 `Err`（`ApiErrorKind::Network`），任何状态码都以 `Ok` 返回。
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse>;
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

#[cfg(test)]
pub struct MockHttpClient {
    // ("METHOD url", 依次返回的 (Status, Body)；最后一个会一直重复)
    responses: RefCell<HashMap<String, VecDeque<Option<(u16, String)>>>>,
    // 记录发出的请求
    pub requests: RefCell<Vec<HttpRequest>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
        }
    }

    fn key(method: HttpMethod, url: &str) -> String {
        format!("{} {}", method.as_str(), url)
    }

    pub fn mock_response(&self, method: HttpMethod, url: &str, status: u16, body: serde_json::Value) {
        self.mock_raw(method, url, status, &body.to_string());
    }

    pub fn mock_raw(&self, method: HttpMethod, url: &str, status: u16, body: &str) {
        self.responses
            .borrow_mut()
            .entry(Self::key(method, url))
            .or_default()
            .push_back(Some((status, body.to_string())));
    }

    /// 模拟网络失败（没有响应）
    pub fn mock_network_error(&self, method: HttpMethod, url: &str) {
        self.responses
            .borrow_mut()
            .entry(Self::key(method, url))
            .or_default()
            .push_back(None);
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.borrow().last().cloned()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        self.requests.borrow_mut().push(req.clone());

        let mut responses = self.responses.borrow_mut();
        let next = match responses.get_mut(&Self::key(req.method, &req.url)) {
            Some(queue) if queue.len() > 1 => queue.pop_front().flatten(),
            Some(queue) => match queue.front() {
                Some(entry) => entry.clone(),
                None => Some((404, "Not Found".to_string())),
            },
            None => Some((404, "Not Found".to_string())),
        };

        match next {
            Some((status, body)) => Ok(HttpResponse { status, body }),
            None => Err(ApiError::network("connection refused")),
        }
    }
}
