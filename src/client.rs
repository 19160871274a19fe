use emd_hunter_shared::protocol::{
    AiAnalysisRequest, ApiRequest, CurrentUserRequest, DeleteOpportunityRequest,
    GetOpportunityRequest, HealthRequest, ListOpportunitiesRequest, SerpAnalysisRequest,
};
use emd_hunter_shared::{
    AiAnalysisResponse, DEFAULT_LOCATION, HealthStatus, KeywordMetrics, KeywordSearchResponse,
    NewOpportunity, Opportunity, SearchParams, SerpAnalysisResponse, SerpResult, UserIdentity,
};

use crate::api::EmdApi;
use crate::error::{ApiError, ApiResult};
use crate::session::SessionStore;

// =========================================================
// 业务接口门面 (API Client Facade)
// =========================================================

/// 业务接口门面
///
/// 每次调用都从 [`SessionStore`] 取认证头。401/403 会使当前令牌失效，
/// 由路由守卫把用户带回登录页。错误原样向上传递，不吞掉也不重试。
#[derive(Clone)]
pub struct ApiClient {
    api: EmdApi,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(api: EmdApi, session: SessionStore) -> Self {
        Self { api, session }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// 带认证的调用；`Auth` 错误时让请求所用的令牌失效
    async fn authed<R: ApiRequest>(&self, request: &R, op: &'static str) -> ApiResult<R::Response> {
        let token = self.session.token();
        let headers = self.session.get_auth_headers();

        self.api.call(request, &headers).await.map_err(|e| {
            if e.is_auth() {
                if let Some(token) = token.as_deref() {
                    self.session.expire(token);
                }
            }
            e.in_op(op)
        })
    }

    // --- Research ---

    /// 关键词搜索；种子词为空时直接返回 `Validation`，不发请求
    pub async fn search_keywords(&self, params: &SearchParams) -> ApiResult<KeywordSearchResponse> {
        let seed = params.seed_keyword.trim();
        if seed.is_empty() {
            return Err(ApiError::validation("Please enter a seed keyword"));
        }

        let request = SearchParams {
            seed_keyword: seed.to_string(),
            location_name: location_or_default(&params.location_name),
            ..params.clone()
        };
        self.authed(&request, "keywords.search").await
    }

    pub async fn analyze_serp(&self, keyword: &str, location: &str) -> ApiResult<SerpAnalysisResponse> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(ApiError::validation("Please enter a keyword"));
        }

        let request = SerpAnalysisRequest {
            keyword: keyword.to_string(),
            location_name: location_or_default(location),
        };
        self.authed(&request, "serp.analyze").await
    }

    /// AI 解读；`source = error` 作为正常响应返回，由视图决定如何展示
    pub async fn request_ai_analysis(
        &self,
        keyword: &str,
        serp_results: &[SerpResult],
        keyword_data: KeywordMetrics,
    ) -> ApiResult<AiAnalysisResponse> {
        let request = AiAnalysisRequest {
            keyword: keyword.trim().to_string(),
            serp_data: serp_results.to_vec(),
            keyword_data,
        };
        self.authed(&request, "ai.analyze").await
    }

    // --- Opportunities ---

    pub async fn list_opportunities(&self) -> ApiResult<Vec<Opportunity>> {
        self.authed(&ListOpportunitiesRequest, "opportunities.list").await
    }

    pub async fn save_opportunity(&self, payload: &NewOpportunity) -> ApiResult<Opportunity> {
        self.authed(payload, "opportunities.save").await
    }

    pub async fn get_opportunity(&self, id: &str) -> ApiResult<Opportunity> {
        let request = GetOpportunityRequest { id: id.to_string() };
        self.authed(&request, "opportunities.get").await
    }

    /// 删除是幂等的：后端 404（已不存在）视为成功
    pub async fn delete_opportunity(&self, id: &str) -> ApiResult<()> {
        let request = DeleteOpportunityRequest { id: id.to_string() };
        match self.authed(&request, "opportunities.delete").await {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => {
                log_info!("[Api] Opportunity {} already gone", id);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    // --- Account & status ---

    pub async fn current_user(&self) -> ApiResult<UserIdentity> {
        self.authed(&CurrentUserRequest, "auth.me").await
    }

    pub async fn health(&self) -> ApiResult<HealthStatus> {
        self.api
            .call(&HealthRequest, &Default::default())
            .await
            .map_err(|e| e.in_op("health"))
    }
}

fn location_or_default(location: &str) -> String {
    let location = location.trim();
    if location.is_empty() {
        DEFAULT_LOCATION.to_string()
    } else {
        location.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::error::ApiErrorKind;
    use crate::request::{HttpMethod, MockHttpClient};
    use crate::storage::{KeyValueStorage, MemoryStorage};
    use emd_hunter_shared::{DataSource, KillScore};
    use serde_json::json;
    use std::rc::Rc;

    const BASE: &str = "http://backend.test";

    struct Harness {
        http: Rc<MockHttpClient>,
        storage: Rc<MemoryStorage>,
        client: ApiClient,
    }

    fn signed_in() -> Harness {
        let http = Rc::new(MockHttpClient::new());
        let storage = Rc::new(MemoryStorage::new());
        storage.set("emd_hunter_token", "abc");
        storage.set("emd_hunter_user", r#"{"id":"u1","name":"Hunter"}"#);

        let config = AppConfig::new(BASE).unwrap();
        let api = EmdApi::from_config(&config, http.clone());
        let session = SessionStore::new(&config, api.clone(), storage.clone());
        session.rehydrate();
        Harness {
            http,
            storage,
            client: ApiClient::new(api, session),
        }
    }

    fn url(path: &str) -> String {
        format!("{BASE}{path}")
    }

    #[tokio::test]
    async fn blank_seed_never_reaches_network() {
        let h = signed_in();
        let params = SearchParams {
            seed_keyword: "   ".into(),
            ..Default::default()
        };

        let err = h.client.search_keywords(&params).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Validation);
        assert_eq!(err.message(), "Please enter a seed keyword");
        assert_eq!(h.http.request_count(), 0);
    }

    #[tokio::test]
    async fn search_sends_params_with_token() {
        let h = signed_in();
        h.http.mock_response(
            HttpMethod::Post,
            &url("/api/keywords/search"),
            200,
            json!({
                "keywords": [
                    {"keyword": "plumber phoenix", "search_volume": 880, "cpc": 32.5, "competition": 0.41}
                ],
                "source": "mock"
            }),
        );

        let params = SearchParams {
            seed_keyword: " plumber ".into(),
            location_name: String::new(),
            ..Default::default()
        };
        let res = h.client.search_keywords(&params).await.unwrap();
        assert!(res.source.is_mock());
        assert_eq!(res.keywords[0].search_volume, 880);

        let sent = h.http.last_request().unwrap();
        assert_eq!(sent.headers.get("Authorization").map(String::as_str), Some("Bearer abc"));
        let body: serde_json::Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["seed_keyword"], "plumber");
        assert_eq!(body["location_name"], "United States");
        assert_eq!(body["min_volume"], 200);
        assert!(body["max_cpc"].is_null());
    }

    #[tokio::test]
    async fn serp_analysis_keeps_kill_score() {
        let h = signed_in();
        h.http.mock_response(
            HttpMethod::Post,
            &url("/api/serp/analyze"),
            200,
            json!({
                "results": [{"rank": 1, "domain": "yelp.com", "url": "https://yelp.com", "title": "Yelp", "is_directory": true}],
                "kill_score": 72,
                "source": "dataforseo"
            }),
        );

        let res = h.client.analyze_serp("plumber phoenix", "").await.unwrap();
        assert_eq!(res.kill_score, KillScore::new(72.0));
        assert_eq!(res.source, DataSource::Live("dataforseo".into()));
    }

    #[tokio::test]
    async fn unauthorized_call_signs_out() {
        let h = signed_in();
        h.http.mock_response(
            HttpMethod::Get,
            &url("/api/opportunities"),
            401,
            json!({"detail": "Could not validate credentials"}),
        );

        let err = h.client.list_opportunities().await.unwrap_err();
        assert!(err.is_auth());
        assert!(!h.client.session().is_authenticated());
        assert!(h.storage.is_empty());
    }

    #[tokio::test]
    async fn backend_errors_do_not_touch_session() {
        let h = signed_in();
        h.http
            .mock_raw(HttpMethod::Post, &url("/api/opportunities"), 500, "oops");

        let payload = NewOpportunity {
            keyword: "plumber phoenix".into(),
            location: "United States".into(),
            search_volume: 500,
            cpc: 25.0,
            competition: 0.5,
            kill_score: KillScore::new(72.0),
            serp_results: vec![],
            ai_analysis: None,
        };
        let err = h.client.save_opportunity(&payload).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Backend);
        assert_eq!(err.message(), "Failed to save opportunity");
        assert!(h.client.session().is_authenticated());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let h = signed_in();
        let target = url("/api/opportunities/o1");
        h.http.mock_raw(HttpMethod::Delete, &target, 204, "");
        h.http
            .mock_response(HttpMethod::Delete, &target, 404, json!({"detail": "Opportunity not found"}));

        assert!(h.client.delete_opportunity("o1").await.is_ok());
        assert!(h.client.delete_opportunity("o1").await.is_ok());
        assert_eq!(h.http.request_count(), 2);
    }

    #[tokio::test]
    async fn delete_failure_is_surfaced() {
        let h = signed_in();
        h.http
            .mock_network_error(HttpMethod::Delete, &url("/api/opportunities/o1"));

        let err = h.client.delete_opportunity("o1").await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Network);
    }

    #[tokio::test]
    async fn get_opportunity_by_id() {
        let h = signed_in();
        h.http.mock_response(
            HttpMethod::Get,
            &url("/api/opportunities/o1"),
            200,
            json!({
                "id": "o1",
                "keyword": "plumber phoenix",
                "location": "United States",
                "search_volume": 880,
                "cpc": 32.5,
                "competition": 0.41,
                "kill_score": 72,
                "created_at": "2026-01-15T10:30:00+00:00"
            }),
        );

        let opportunity = h.client.get_opportunity("o1").await.unwrap();
        assert_eq!(opportunity.keyword, "plumber phoenix");
        assert_eq!(opportunity.kill_score, KillScore::new(72.0));
        assert!(opportunity.serp_results.is_empty());
        let sent = h.http.last_request().unwrap();
        assert_eq!(sent.headers.get("Authorization").map(String::as_str), Some("Bearer abc"));
    }

    #[tokio::test]
    async fn missing_opportunity_is_not_found() {
        let h = signed_in();
        h.http.mock_response(
            HttpMethod::Get,
            &url("/api/opportunities/gone"),
            404,
            json!({"detail": "Opportunity not found"}),
        );

        let err = h.client.get_opportunity("gone").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.kind, ApiErrorKind::Backend);
        assert_eq!(err.message(), "Opportunity not found");
        assert!(h.client.session().is_authenticated());
    }

    #[tokio::test]
    async fn ai_analysis_posts_serp_and_metrics() {
        let h = signed_in();
        h.http.mock_response(
            HttpMethod::Post,
            &url("/api/ai/analyze"),
            200,
            json!({"analysis": "AI analysis failed: quota", "source": "error"}),
        );

        let res = h
            .client
            .request_ai_analysis("plumber phoenix", &[], KeywordMetrics::placeholder("plumber phoenix"))
            .await
            .unwrap();
        assert!(res.source.is_error());

        let body: serde_json::Value =
            serde_json::from_str(h.http.last_request().unwrap().body.as_deref().unwrap()).unwrap();
        assert_eq!(body["keyword_data"]["search_volume"], 500);
        assert_eq!(body["serp_data"], json!([]));
    }

    #[tokio::test]
    async fn health_is_unauthenticated() {
        let h = signed_in();
        h.http.mock_response(
            HttpMethod::Get,
            &url("/api/health"),
            200,
            json!({"status": "healthy", "timestamp": "2025-03-04T05:06:07.123456+00:00"}),
        );

        let status = h.client.health().await.unwrap();
        assert!(status.is_healthy());
        assert!(status.timestamp.is_some());
        assert!(h.http.last_request().unwrap().headers.is_empty());
    }
}
