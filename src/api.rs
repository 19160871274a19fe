use std::rc::Rc;

use emd_hunter_shared::protocol::ApiRequest;

use crate::config::AppConfig;
use crate::error::{ApiError, ApiResult, backend_message};
use crate::request::{HttpClient, HttpRequest};
use crate::session::AuthHeaders;

// =========================================================
// 接口调用器 (Endpoint Caller)
// =========================================================

/// 类型化接口调用器
///
/// 负责 URL 拼接、认证头、请求体编码，以及把响应映射为类型化结果或 [`ApiError`]。
/// 不持有会话状态，认证头由调用方传入。
#[derive(Clone)]
pub struct EmdApi {
    base_url: String,
    client: Rc<dyn HttpClient>,
}

impl EmdApi {
    pub fn new(base_url: &str, client: Rc<dyn HttpClient>) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn from_config(config: &AppConfig, client: Rc<dyn HttpClient>) -> Self {
        Self::new(&config.backend_url, client)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 发送一个类型化请求
    ///
    /// - 没有响应：`Network`
    /// - 非 2xx：后端消息（缺失时使用 `R::FAILURE_MESSAGE`），401/403 归类为 `Auth`
    /// - 2xx 但响应体无法解析：`Backend`
    pub async fn call<R: ApiRequest>(&self, request: &R, headers: &AuthHeaders) -> ApiResult<R::Response> {
        let path = request.path();
        let mut req = HttpRequest::new(&self.url(&path), R::METHOD);

        if R::REQUIRES_AUTH {
            req = req.with_headers(headers);
        }
        if R::METHOD.has_body() {
            req = req.with_json(request)?;
        }

        let res = self
            .client
            .send(req)
            .await
            .map_err(|e| e.in_op(format!("{} {}", R::METHOD.as_str(), path)))?;

        if !res.ok() {
            if res.status >= 500 {
                log_error!("[Api] {} {} -> {}", R::METHOD.as_str(), path, res.status);
            }
            let message =
                backend_message(&res.body).unwrap_or_else(|| R::FAILURE_MESSAGE.to_string());
            return Err(ApiError::from_status(res.status, message)
                .in_op(format!("{} {}", R::METHOD.as_str(), path)));
        }

        res.json::<R::Response>()
            .map_err(|e| e.in_op(format!("{} {}", R::METHOD.as_str(), path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiErrorKind;
    use crate::request::{HttpMethod, MockHttpClient};
    use emd_hunter_shared::protocol::{
        DeleteOpportunityRequest, HealthRequest, ListOpportunitiesRequest, LoginRequest,
    };
    use serde_json::json;

    const BASE: &str = "http://backend.test";

    fn setup() -> (Rc<MockHttpClient>, EmdApi) {
        let client = Rc::new(MockHttpClient::new());
        let api = EmdApi::new("http://backend.test/", client.clone());
        (client, api)
    }

    fn bearer(token: &str) -> AuthHeaders {
        let mut headers = AuthHeaders::new();
        headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        headers
    }

    #[tokio::test]
    async fn attaches_auth_header_only_when_required() {
        let (client, api) = setup();
        client.mock_response(HttpMethod::Get, &format!("{BASE}/api/opportunities"), 200, json!([]));
        client.mock_response(
            HttpMethod::Get,
            &format!("{BASE}/api/health"),
            200,
            json!({"status": "healthy"}),
        );

        let list = api.call(&ListOpportunitiesRequest, &bearer("abc")).await.unwrap();
        assert!(list.is_empty());
        let req = client.last_request().unwrap();
        assert_eq!(req.headers.get("Authorization").map(String::as_str), Some("Bearer abc"));
        assert!(req.body.is_none());

        let health = api.call(&HealthRequest, &bearer("abc")).await.unwrap();
        assert!(health.is_healthy());
        assert!(client.last_request().unwrap().headers.get("Authorization").is_none());
    }

    #[tokio::test]
    async fn posts_json_body() {
        let (client, api) = setup();
        client.mock_response(
            HttpMethod::Post,
            &format!("{BASE}/api/auth/login"),
            200,
            json!({"access_token": "jwt", "user": {"id": "u1", "name": "Hunter"}}),
        );

        let req = LoginRequest {
            email: "hunter@example.com".into(),
            password: "secret123".into(),
        };
        let auth = api.call(&req, &AuthHeaders::new()).await.unwrap();
        assert_eq!(auth.token, "jwt");

        let sent = client.last_request().unwrap();
        assert_eq!(sent.headers.get("Content-Type").map(String::as_str), Some("application/json"));
        let body: serde_json::Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["email"], "hunter@example.com");
    }

    #[tokio::test]
    async fn surfaces_backend_message_or_fallback() {
        let (client, api) = setup();
        let url = format!("{BASE}/api/opportunities");
        client.mock_response(HttpMethod::Get, &url, 500, json!({"detail": "Database unavailable"}));

        let err = api.call(&ListOpportunitiesRequest, &bearer("t")).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Backend);
        assert_eq!(err.message(), "Database unavailable");
        assert_eq!(err.status(), Some(500));

        let (client, api) = setup();
        client.mock_raw(HttpMethod::Get, &url, 502, "<html>Bad Gateway</html>");
        let err = api.call(&ListOpportunitiesRequest, &bearer("t")).await.unwrap_err();
        assert_eq!(err.message(), "Failed to load opportunities");
    }

    #[tokio::test]
    async fn classifies_auth_and_network_failures() {
        let (client, api) = setup();
        let url = format!("{BASE}/api/opportunities");
        client.mock_response(HttpMethod::Get, &url, 401, json!({"detail": "Token expired"}));
        let err = api.call(&ListOpportunitiesRequest, &bearer("t")).await.unwrap_err();
        assert!(err.is_auth());
        assert_eq!(err.message(), "Token expired");

        let (client, api) = setup();
        client.mock_network_error(HttpMethod::Get, &url);
        let err = api.call(&ListOpportunitiesRequest, &bearer("t")).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Network);
    }

    #[tokio::test]
    async fn empty_body_is_accepted_for_delete() {
        let (client, api) = setup();
        client.mock_raw(HttpMethod::Delete, &format!("{BASE}/api/opportunities/o1"), 204, "");

        let req = DeleteOpportunityRequest { id: "o1".into() };
        assert!(api.call(&req, &bearer("t")).await.is_ok());
    }

    #[tokio::test]
    async fn malformed_success_body_is_a_backend_error() {
        let (client, api) = setup();
        client.mock_raw(HttpMethod::Get, &format!("{BASE}/api/opportunities"), 200, "{\"oops\":");

        let err = api.call(&ListOpportunitiesRequest, &bearer("t")).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Backend);
        assert_eq!(err.message(), "Unexpected response from server");
    }
}
