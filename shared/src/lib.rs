use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const DEFAULT_LOCATION: &str = "United States";

// =========================================================
// 身份 (Identity)
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl UserIdentity {
    /// 问候语使用的名字（取第一个单词）
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

/// 登录 / 注册接口的响应
///
/// 后端以 `access_token` 返回令牌，旧版本使用 `token`，两者都接受。
/// `user` 缺失时由调用方通过 `/api/auth/me` 补全。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub user: Option<UserIdentity>,
    #[serde(alias = "access_token")]
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

// =========================================================
// 数据来源 (Data Source)
// =========================================================

/// 后端返回的 `source` 字段
///
/// `"mock"` 表示演示数据，`"error"` 表示 AI 分析失败，
/// 其余取值（`"live"`、`"dataforseo"`、`"claude"` 等）均视为真实数据并保留提供方名称。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataSource {
    Live(String),
    Mock,
    Error,
}

impl DataSource {
    pub fn is_mock(&self) -> bool {
        matches!(self, DataSource::Mock)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, DataSource::Error)
    }
}

impl From<String> for DataSource {
    fn from(s: String) -> Self {
        match s.as_str() {
            "mock" => DataSource::Mock,
            "error" => DataSource::Error,
            _ => DataSource::Live(s),
        }
    }
}

impl From<DataSource> for String {
    fn from(source: DataSource) -> Self {
        match source {
            DataSource::Live(provider) => provider,
            DataSource::Mock => "mock".to_string(),
            DataSource::Error => "error".to_string(),
        }
    }
}

// =========================================================
// 关键词研究 (Keyword Research)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    pub seed_keyword: String,
    pub location_name: String,
    pub min_volume: u32,
    pub max_volume: u32,
    pub min_cpc: f64,
    pub max_cpc: Option<f64>,
    pub limit: u32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            seed_keyword: String::new(),
            location_name: DEFAULT_LOCATION.to_string(),
            min_volume: 200,
            max_volume: 1200,
            min_cpc: 10.0,
            max_cpc: None,
            limit: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordResult {
    pub keyword: String,
    pub search_volume: u64,
    pub cpc: f64,
    pub competition: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advertiser_competition: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordSearchResponse {
    #[serde(default)]
    pub keywords: Vec<KeywordResult>,
    pub source: DataSource,
}

// =========================================================
// SERP 分析 (SERP Analysis)
// =========================================================

/// Kill Score：后端计算的 0..=100 分值，客户端只展示，不做任何换算
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KillScore(f64);

impl KillScore {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for KillScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerpResult {
    pub rank: u32,
    pub domain: String,
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "domain_authority")]
    pub domain_rank: Option<u32>,
    #[serde(default)]
    pub backlinks: Option<u64>,
    #[serde(default)]
    pub is_directory: bool,
    #[serde(default)]
    pub is_replaceable: bool,
}

/// 排名条目的可替代性（由后端的分类标志决定）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultStanding {
    Directory,
    Replaceable,
    Strong,
}

impl SerpResult {
    pub fn standing(&self) -> ResultStanding {
        if self.is_directory {
            ResultStanding::Directory
        } else if self.is_replaceable {
            ResultStanding::Replaceable
        } else {
            ResultStanding::Strong
        }
    }
}

impl ResultStanding {
    pub fn label(&self) -> &'static str {
        match self {
            ResultStanding::Directory => "Directory",
            ResultStanding::Replaceable => "Replaceable",
            ResultStanding::Strong => "Strong",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerpAnalysisResponse {
    #[serde(default)]
    pub results: Vec<SerpResult>,
    pub kill_score: KillScore,
    pub source: DataSource,
}

impl SerpAnalysisResponse {
    pub fn replaceable_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_replaceable).count()
    }
}

// =========================================================
// AI 分析 (AI Analysis)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordMetrics {
    pub keyword: String,
    pub search_volume: u64,
    pub cpc: f64,
    pub competition: f64,
}

impl KeywordMetrics {
    /// SERP 页面没有关键词指标时使用的占位值
    pub fn placeholder(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            search_volume: 500,
            cpc: 25.0,
            competition: 0.5,
        }
    }
}

impl From<&KeywordResult> for KeywordMetrics {
    fn from(kw: &KeywordResult) -> Self {
        Self {
            keyword: kw.keyword.clone(),
            search_volume: kw.search_volume,
            cpc: kw.cpc,
            competition: kw.competition,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiAnalysisResponse {
    pub analysis: String,
    pub source: DataSource,
}

// =========================================================
// 机会 (Opportunities)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOpportunity {
    pub keyword: String,
    pub location: String,
    pub search_volume: u64,
    pub cpc: f64,
    pub competition: f64,
    pub kill_score: KillScore,
    pub serp_results: Vec<SerpResult>,
    pub ai_analysis: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: String,
    pub keyword: String,
    pub location: String,
    pub search_volume: u64,
    pub cpc: f64,
    pub competition: f64,
    pub kill_score: KillScore,
    #[serde(default)]
    pub serp_results: Vec<SerpResult>,
    #[serde(default)]
    pub ai_analysis: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_response_accepts_both_token_spellings() {
        let legacy: AuthResponse =
            serde_json::from_str(r#"{"user":{"id":"u1","name":"Hunter"},"token":"abc"}"#).unwrap();
        assert_eq!(legacy.token, "abc");
        assert_eq!(legacy.user.unwrap().email, "");

        let current: AuthResponse = serde_json::from_str(
            r#"{"access_token":"jwt","token_type":"bearer","user":{"id":"u2","name":"Ann Lee","email":"a@b.c","created_at":"2025-01-01T00:00:00+00:00"}}"#,
        )
        .unwrap();
        assert_eq!(current.token, "jwt");
        assert_eq!(current.user.unwrap().first_name(), "Ann");
    }

    #[test]
    fn data_source_keeps_provider_name() {
        let src: DataSource = serde_json::from_str(r#""dataforseo""#).unwrap();
        assert_eq!(src, DataSource::Live("dataforseo".into()));
        assert!(serde_json::from_str::<DataSource>(r#""mock""#).unwrap().is_mock());
        assert!(serde_json::from_str::<DataSource>(r#""error""#).unwrap().is_error());
        assert_eq!(serde_json::to_string(&DataSource::Mock).unwrap(), r#""mock""#);
    }

    #[test]
    fn serp_result_standing_prefers_directory_flag() {
        let json = r#"{"rank":1,"domain":"yelp.com","url":"https://yelp.com/x","title":"Yelp",
            "domain_authority":93,"is_directory":true,"is_replaceable":true}"#;
        let result: SerpResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.domain_rank, Some(93));
        assert_eq!(result.standing(), ResultStanding::Directory);
        assert_eq!(result.description, None);
    }

    #[test]
    fn kill_score_displays_received_value() {
        let resp: SerpAnalysisResponse =
            serde_json::from_str(r#"{"results":[],"kill_score":72,"source":"mock"}"#).unwrap();
        assert_eq!(resp.kill_score.to_string(), "72");
        assert_eq!(KillScore::new(64.5).to_string(), "64.5");
    }

    #[test]
    fn opportunity_parses_python_isoformat_timestamp() {
        let json = r#"{"id":"o1","keyword":"plumber phoenix","location":"United States",
            "search_volume":880,"cpc":32.5,"competition":0.41,"kill_score":67,
            "serp_results":[],"ai_analysis":null,
            "created_at":"2025-03-04T05:06:07.123456+00:00","user_id":"u1"}"#;
        let opp: Opportunity = serde_json::from_str(json).unwrap();
        assert_eq!(opp.created_at.format("%Y-%m-%d").to_string(), "2025-03-04");
        assert_eq!(opp.kill_score.value(), 67.0);
    }
}
