//! 针对真实后端的冒烟测试
//!
//! 需要设置 `EMD_HUNTER_BACKEND_URL`，运行方式：
//! `cargo test --test live_backend -- --ignored`

use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use emd_hunter::shared::SearchParams;
use emd_hunter::{
    ApiClient, ApiError, ApiResult, AppConfig, EmdApi, HttpClient, HttpMethod, HttpRequest,
    HttpResponse, MemoryStorage, SessionStore,
};

struct ReqwestHttpClient {
    inner: reqwest::Client,
}

#[async_trait::async_trait(?Send)]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let method = match req.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.inner.request(method, &req.url);
        for (key, value) in &req.headers {
            builder = builder.header(key, value);
        }
        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let res = builder
            .send()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;
        let status = res.status().as_u16();
        let body = res
            .text()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

#[tokio::test]
#[ignore]
async fn register_search_and_sign_out() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("skipping live test: {}", e);
            return;
        }
    };

    let http = Rc::new(ReqwestHttpClient {
        inner: reqwest::Client::new(),
    });
    let api = EmdApi::from_config(&config, http);
    let session = SessionStore::new(&config, api.clone(), Rc::new(MemoryStorage::new()));
    session.rehydrate();
    let client = ApiClient::new(api, session.clone());

    let health = client.health().await.expect("health endpoint");
    assert!(health.is_healthy());

    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_millis();
    let email = format!("smoke-{stamp}@example.com");
    let user = session
        .register(&email, "smoke-test-password", "Smoke Test")
        .await
        .expect("register");
    assert_eq!(user.first_name(), "Smoke");
    assert!(session.is_authenticated());

    let params = SearchParams {
        seed_keyword: "plumber".into(),
        ..Default::default()
    };
    let results = client.search_keywords(&params).await.expect("search");
    println!("{} keywords from {:?}", results.keywords.len(), results.source);

    let saved = client.list_opportunities().await.expect("list");
    assert!(saved.is_empty());

    session.logout();
    assert!(session.get_auth_headers().is_empty());
}
