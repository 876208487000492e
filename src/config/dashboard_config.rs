// ==========================================
// 酒店预测看板 - 看板配置
// ==========================================
// 职责: 配置加载、环境变量覆写、校验
// 优先级: 默认值 < 配置文件 (JSON) < 环境变量
// ==========================================

use crate::domain::HotelType;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 支持的语言
pub const SUPPORTED_LOCALES: [&str; 3] = ["ko", "en", "zh-CN"];

/// 分页大小上限
pub const MAX_PAGE_SIZE: u32 = 100;

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    // 配置文件字段
    pub const API_BASE_URL: &str = "api_base_url";
    pub const REQUEST_TIMEOUT_SECS: &str = "request_timeout_secs";
    pub const BOOKING_PAGE_SIZE: &str = "booking_page_size";
    pub const DEFAULT_HOTEL_TYPE: &str = "default_hotel_type";
    pub const INITIAL_DATE: &str = "initial_date";
    pub const LOCALE: &str = "locale";

    // 环境变量
    pub const ENV_CONFIG_PATH: &str = "HOTEL_PREDICT_CONFIG";
    pub const ENV_API_URL: &str = "HOTEL_PREDICT_API_URL";
    pub const ENV_TIMEOUT_SECS: &str = "HOTEL_PREDICT_TIMEOUT_SECS";
    pub const ENV_PAGE_SIZE: &str = "HOTEL_PREDICT_PAGE_SIZE";
    pub const ENV_LOCALE: &str = "HOTEL_PREDICT_LOCALE";
}

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: path={path}, error={source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("配置文件解析失败: path={path}, error={source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("配置值无效: key={key}, value={value}")]
    InvalidValue { key: String, value: String },
}

impl ConfigError {
    fn invalid(key: &str, value: impl ToString) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

// ==========================================
// DashboardConfig
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// 预测服务根地址
    pub api_base_url: String,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 预约列表分页大小
    pub booking_page_size: u32,
    /// 初始酒店类型
    pub default_hotel_type: HotelType,
    /// 初始日期；为空时取第一个可用日期
    pub initial_date: Option<NaiveDate>,
    /// 通知语言
    pub locale: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 10,
            booking_page_size: 10,
            default_hotel_type: HotelType::Resort,
            initial_date: None,
            locale: "ko".to_string(),
        }
    }
}

impl DashboardConfig {
    /// 加载配置
    ///
    /// 1. 默认值
    /// 2. 配置文件: 显式指定的路径必须存在；用户配置目录下的文件存在时才读取
    /// 3. 环境变量覆写
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// 按给定的环境变量来源加载
    pub fn load_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match explicit_config_path(&lookup) {
            Some(path) => {
                tracing::info!(path = %path.display(), "加载指定的看板配置文件");
                Self::from_file(&path)?
            }
            None => match user_config_path() {
                Some(path) if path.exists() => {
                    tracing::info!(path = %path.display(), "加载看板配置文件");
                    Self::from_file(&path)?
                }
                _ => Self::default(),
            },
        };

        config.apply_overrides(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 文件读取（未出现的字段取默认值）
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// 应用覆写
    ///
    /// # 参数
    /// - `lookup`: 按环境变量名取值，便于测试注入
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(url) = value(config_keys::ENV_API_URL) {
            self.api_base_url = url;
        }

        if let Some(raw) = value(config_keys::ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = raw
                .parse()
                .map_err(|_| ConfigError::invalid(config_keys::ENV_TIMEOUT_SECS, &raw))?;
        }

        if let Some(raw) = value(config_keys::ENV_PAGE_SIZE) {
            self.booking_page_size = raw
                .parse()
                .map_err(|_| ConfigError::invalid(config_keys::ENV_PAGE_SIZE, &raw))?;
        }

        if let Some(locale) = value(config_keys::ENV_LOCALE) {
            self.locale = locale;
        }

        Ok(())
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::invalid(config_keys::API_BASE_URL, &self.api_base_url));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                config_keys::REQUEST_TIMEOUT_SECS,
                self.request_timeout_secs,
            ));
        }

        if self.booking_page_size == 0 || self.booking_page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::invalid(
                config_keys::BOOKING_PAGE_SIZE,
                self.booking_page_size,
            ));
        }

        if !SUPPORTED_LOCALES.contains(&self.locale.as_str()) {
            return Err(ConfigError::invalid(config_keys::LOCALE, &self.locale));
        }

        Ok(())
    }
}

/// 默认配置文件路径
///
/// 显式指定的路径优先，否则使用用户配置目录
pub fn default_config_path() -> Option<PathBuf> {
    explicit_config_path(|key| std::env::var(key).ok()).or_else(user_config_path)
}

fn explicit_config_path<F>(lookup: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(config_keys::ENV_CONFIG_PATH)
        .map(|path| path.trim().to_string())
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("hotel-predict").join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_is_valid() {
        let config = DashboardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_hotel_type, HotelType::Resort);
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"api_base_url": "http://forecast:9000", "default_hotel_type": "City Hotel", "initial_date": "2017-04-01"}}"#
        )
        .unwrap();

        let config = DashboardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.api_base_url, "http://forecast:9000");
        assert_eq!(config.default_hotel_type, HotelType::City);
        assert_eq!(config.initial_date, NaiveDate::from_ymd_opt(2017, 4, 1));
        // 未出现的字段取默认值
        assert_eq!(config.booking_page_size, 10);
    }

    #[test]
    fn test_from_file_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        match DashboardConfig::from_file(file.path()) {
            Err(ConfigError::Parse { .. }) => {}
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_explicit_config_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json").display().to_string();

        let result = DashboardConfig::load_with(|key| {
            (key == config_keys::ENV_CONFIG_PATH).then(|| missing.clone())
        });

        match result {
            Err(ConfigError::Io { path, .. }) => assert_eq!(path, missing),
            other => panic!("Expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_explicit_config_path_with_env_overrides() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"booking_page_size": 20, "locale": "en"}}"#).unwrap();
        let path = file.path().display().to_string();

        let config = DashboardConfig::load_with(|key| match key {
            config_keys::ENV_CONFIG_PATH => Some(path.clone()),
            config_keys::ENV_PAGE_SIZE => Some("30".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.booking_page_size, 30);
        assert_eq!(config.locale, "en");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (config_keys::ENV_API_URL, "http://10.0.0.5:8000"),
            (config_keys::ENV_PAGE_SIZE, "25"),
            (config_keys::ENV_LOCALE, " en "),
        ]
        .into_iter()
        .collect();

        let mut config = DashboardConfig::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.api_base_url, "http://10.0.0.5:8000");
        assert_eq!(config.booking_page_size, 25);
        assert_eq!(config.locale, "en");
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn test_env_override_invalid_number() {
        let mut config = DashboardConfig::default();
        let result = config.apply_overrides(|key| {
            (key == config_keys::ENV_TIMEOUT_SECS).then(|| "ten".to_string())
        });

        match result {
            Err(ConfigError::InvalidValue { key, value }) => {
                assert_eq!(key, config_keys::ENV_TIMEOUT_SECS);
                assert_eq!(value, "ten");
            }
            other => panic!("Expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = DashboardConfig::default();
        config.booking_page_size = 0;
        assert!(config.validate().is_err());

        let mut config = DashboardConfig::default();
        config.booking_page_size = MAX_PAGE_SIZE + 1;
        assert!(config.validate().is_err());

        let mut config = DashboardConfig::default();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = DashboardConfig::default();
        config.locale = "fr".to_string();
        assert!(config.validate().is_err());
    }
}
