// =========================================================
// 运行时配置 (Runtime Configuration)
// =========================================================

use crate::error::ConfigError;

/// 后端地址的变量名（必填）
pub const BACKEND_URL_VAR: &str = "EMD_HUNTER_BACKEND_URL";
/// 持久化键名前缀的变量名（可选）
pub const STORAGE_NAMESPACE_VAR: &str = "EMD_HUNTER_STORAGE_NAMESPACE";

const DEFAULT_STORAGE_NAMESPACE: &str = "emd_hunter";

/// 应用配置
///
/// 后端地址缺失属于启动期配置错误，由调用方在启动时处理，而不是在请求时恢复。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// 不带结尾 `/` 的后端地址
    pub backend_url: String,
    /// 持久化会话时使用的键名前缀
    pub storage_namespace: String,
}

impl AppConfig {
    pub fn new(backend_url: &str) -> Result<Self, ConfigError> {
        let url = backend_url.trim();
        if url.is_empty() {
            return Err(ConfigError::MissingBackendUrl);
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidBackendUrl(url.to_string()));
        }

        Ok(Self {
            backend_url: url.trim_end_matches('/').to_string(),
            storage_namespace: DEFAULT_STORAGE_NAMESPACE.to_string(),
        })
    }

    pub fn with_storage_namespace(mut self, namespace: &str) -> Self {
        let namespace = namespace.trim();
        if !namespace.is_empty() {
            self.storage_namespace = namespace.to_string();
        }
        self
    }

    /// 从任意键值来源读取配置
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup(BACKEND_URL_VAR).ok_or(ConfigError::MissingBackendUrl)?;
        let config = Self::new(&url)?;

        Ok(match lookup(STORAGE_NAMESPACE_VAR) {
            Some(namespace) => config.with_storage_namespace(&namespace),
            None => config,
        })
    }

    /// 从进程环境变量读取配置
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 存储键：`<namespace>_<name>`
    pub fn storage_key(&self, name: &str) -> String {
        format!("{}_{}", self.storage_namespace, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_backend_url_is_a_startup_error() {
        assert_eq!(
            AppConfig::from_lookup(lookup(&[])),
            Err(ConfigError::MissingBackendUrl)
        );
        assert_eq!(
            AppConfig::from_lookup(lookup(&[(BACKEND_URL_VAR, "  ")])),
            Err(ConfigError::MissingBackendUrl)
        );
    }

    #[test]
    fn rejects_non_http_urls() {
        assert!(matches!(
            AppConfig::new("ftp://example.com"),
            Err(ConfigError::InvalidBackendUrl(_))
        ));
    }

    #[test]
    fn trims_trailing_slash_and_reads_namespace() {
        let config = AppConfig::from_lookup(lookup(&[
            (BACKEND_URL_VAR, "https://api.emdhunter.io/"),
            (STORAGE_NAMESPACE_VAR, "staging"),
        ]))
        .unwrap();
        assert_eq!(config.backend_url, "https://api.emdhunter.io");
        assert_eq!(config.storage_key("token"), "staging_token");

        let config = AppConfig::new("http://localhost:8001").unwrap();
        assert_eq!(config.storage_key("user"), "emd_hunter_user");
    }
}
