use crate::{
    AiAnalysisResponse, AuthResponse, HealthStatus, KeywordMetrics, KeywordSearchResponse,
    NewOpportunity, Opportunity, SearchParams, SerpAnalysisResponse, SerpResult, UserIdentity,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned, de::IgnoredAny};
use std::borrow::Cow;

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// 是否携带 JSON 请求体
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post)
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The URL path (or template, see [`ApiRequest::path`]).
    const PATH: &'static str;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Whether the bearer token is attached.
    const REQUIRES_AUTH: bool = true;
    /// Shown to the user when the backend gives no message of its own.
    const FAILURE_MESSAGE: &'static str = "Request failed";

    /// Concrete path for this request. Endpoints with path parameters override it.
    fn path(&self) -> Cow<'static, str> {
        Cow::Borrowed(Self::PATH)
    }
}

// =========================================================
// Auth
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = AuthResponse;
    const PATH: &'static str = "/api/auth/login";
    const METHOD: HttpMethod = HttpMethod::Post;
    const REQUIRES_AUTH: bool = false;
    const FAILURE_MESSAGE: &'static str = "Login failed";
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl ApiRequest for RegisterRequest {
    type Response = AuthResponse;
    const PATH: &'static str = "/api/auth/register";
    const METHOD: HttpMethod = HttpMethod::Post;
    const REQUIRES_AUTH: bool = false;
    const FAILURE_MESSAGE: &'static str = "Registration failed";
}

/// Fetch the identity behind the current token
#[derive(Debug, Serialize, Deserialize)]
pub struct CurrentUserRequest;

impl ApiRequest for CurrentUserRequest {
    type Response = UserIdentity;
    const PATH: &'static str = "/api/auth/me";
    const METHOD: HttpMethod = HttpMethod::Get;
    const FAILURE_MESSAGE: &'static str = "Failed to load account";
}

// =========================================================
// Keyword / SERP / AI
// =========================================================

impl ApiRequest for SearchParams {
    type Response = KeywordSearchResponse;
    const PATH: &'static str = "/api/keywords/search";
    const METHOD: HttpMethod = HttpMethod::Post;
    const FAILURE_MESSAGE: &'static str = "Search failed";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerpAnalysisRequest {
    pub keyword: String,
    pub location_name: String,
}

impl ApiRequest for SerpAnalysisRequest {
    type Response = SerpAnalysisResponse;
    const PATH: &'static str = "/api/serp/analyze";
    const METHOD: HttpMethod = HttpMethod::Post;
    const FAILURE_MESSAGE: &'static str = "Analysis failed";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiAnalysisRequest {
    pub keyword: String,
    pub serp_data: Vec<SerpResult>,
    pub keyword_data: KeywordMetrics,
}

impl ApiRequest for AiAnalysisRequest {
    type Response = AiAnalysisResponse;
    const PATH: &'static str = "/api/ai/analyze";
    const METHOD: HttpMethod = HttpMethod::Post;
    const FAILURE_MESSAGE: &'static str = "AI analysis failed";
}

// =========================================================
// Opportunities
// =========================================================

/// List all saved opportunities of the current user
#[derive(Debug, Serialize, Deserialize)]
pub struct ListOpportunitiesRequest;

impl ApiRequest for ListOpportunitiesRequest {
    type Response = Vec<Opportunity>;
    const PATH: &'static str = "/api/opportunities";
    const METHOD: HttpMethod = HttpMethod::Get;
    const FAILURE_MESSAGE: &'static str = "Failed to load opportunities";
}

impl ApiRequest for NewOpportunity {
    type Response = Opportunity;
    const PATH: &'static str = "/api/opportunities";
    const METHOD: HttpMethod = HttpMethod::Post;
    const FAILURE_MESSAGE: &'static str = "Failed to save opportunity";
}

/// The id is encoded as a single path segment.
fn opportunity_path(id: &str) -> Cow<'static, str> {
    Cow::Owned(format!("/api/opportunities/{}", urlencoding::encode(id)))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetOpportunityRequest {
    pub id: String,
}

impl ApiRequest for GetOpportunityRequest {
    type Response = Opportunity;
    const PATH: &'static str = "/api/opportunities/{id}";
    const METHOD: HttpMethod = HttpMethod::Get;
    const FAILURE_MESSAGE: &'static str = "Opportunity not found";

    fn path(&self) -> Cow<'static, str> {
        opportunity_path(&self.id)
    }
}

/// Delete a saved opportunity.
/// The backend answers 204 or a JSON message; the body is ignored.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteOpportunityRequest {
    pub id: String,
}

impl ApiRequest for DeleteOpportunityRequest {
    type Response = IgnoredAny;
    const PATH: &'static str = "/api/opportunities/{id}";
    const METHOD: HttpMethod = HttpMethod::Delete;
    const FAILURE_MESSAGE: &'static str = "Failed to delete opportunity";

    fn path(&self) -> Cow<'static, str> {
        opportunity_path(&self.id)
    }
}

// =========================================================
// Misc
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthRequest;

impl ApiRequest for HealthRequest {
    type Response = HealthStatus;
    const PATH: &'static str = "/api/health";
    const METHOD: HttpMethod = HttpMethod::Get;
    const REQUIRES_AUTH: bool = false;
    const FAILURE_MESSAGE: &'static str = "Backend unavailable";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opportunity_id_stays_in_one_segment() {
        let get = GetOpportunityRequest { id: "o1".into() };
        assert_eq!(get.path(), "/api/opportunities/o1");

        let delete = DeleteOpportunityRequest {
            id: "../auth/me?x=1".into(),
        };
        assert_eq!(delete.path(), "/api/opportunities/..%2Fauth%2Fme%3Fx%3D1");
    }
}
