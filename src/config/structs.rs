use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::{HashlinkerError, Result};
use crate::storage::AuthMode;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "hashlinker.toml";

/// 环境变量前缀，分隔符为 `__`（例如 `HL__SERVER__PORT=9090`）
pub const ENV_PREFIX: &str = "HL";

/// SHA-1 十六进制摘要长度，短码长度上限
pub const MAX_KEY_LENGTH: usize = 40;

/// 新增路由请求体默认上限（32 MiB）
pub const DEFAULT_MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// 服务运行模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RouteMode {
    /// Shared route store, add-route endpoint enabled
    #[default]
    Dynamic,
    /// Route table built once at startup, one resource per key
    Static,
}

impl std::fmt::Display for RouteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dynamic => write!(f, "dynamic"),
            Self::Static => write!(f, "static"),
        }
    }
}

impl std::str::FromStr for RouteMode {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dynamic" => Ok(Self::Dynamic),
            "static" => Ok(Self::Static),
            _ => Err(format!(
                "Invalid route mode: '{}'. Valid: dynamic, static",
                s
            )),
        }
    }
}

/// 静态配置（从 TOML 与环境变量加载，启动时使用）
///
/// - server: 监听地址、端口、worker 数量
/// - routes: 路由文件、密钥文件、短码长度、兜底地址
/// - auth: 新增路由的鉴权策略
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub routes: RoutesConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > 配置文件 > 默认值
    /// 未指定路径时读取当前目录下的 `hashlinker.toml`（可选）；
    /// 显式指定的路径必须存在。
    pub fn load(path: Option<&str>) -> Result<Self> {
        use ::config::{Config, Environment, File};

        let file_source = match path {
            Some(p) => File::with_name(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = Config::builder()
            .add_source(file_source)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: StaticConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 校验配置取值
    pub fn validate(&self) -> Result<()> {
        let key_length = self.routes.key_length;
        if key_length == 0 || key_length > MAX_KEY_LENGTH {
            return Err(HashlinkerError::configuration(format!(
                "routes.key_length must be between 1 and {}, got {}",
                MAX_KEY_LENGTH, key_length
            )));
        }

        if self.routes.fallback_url.trim().is_empty() {
            return Err(HashlinkerError::configuration(
                "routes.fallback_url must not be empty",
            ));
        }

        if self.routes.max_body_bytes == 0 {
            return Err(HashlinkerError::configuration(
                "routes.max_body_bytes must be greater than 0",
            ));
        }

        if !self.routes.post_path.starts_with('/') {
            return Err(HashlinkerError::configuration(format!(
                "routes.post_path must start with '/', got '{}'",
                self.routes.post_path
            )));
        }

        Ok(())
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| HashlinkerError::serialization(e.to_string()))?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

/// 路由配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutesConfig {
    #[serde(default = "default_config_path")]
    pub config_path: String,
    #[serde(default = "default_secrets_path")]
    pub secrets_path: String,
    #[serde(default = "default_key_length")]
    pub key_length: usize,
    #[serde(default = "default_fallback_url")]
    pub fallback_url: String,
    #[serde(default = "default_post_path")]
    pub post_path: String,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    #[serde(default)]
    pub mode: RouteMode,
}

/// 鉴权配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    #[serde(default)]
    pub mode: AuthMode,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions for static config
// ============================================================

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_workers() -> usize {
    num_cpus::get()
}

fn default_config_path() -> String {
    "/etc/routes.json".to_string()
}

fn default_secrets_path() -> String {
    "secrets.json".to_string()
}

fn default_key_length() -> usize {
    6
}

fn default_fallback_url() -> String {
    "https://brennanmacaig.com/notfound".to_string()
}

fn default_post_path() -> String {
    "/post/new-route".to_string()
}

fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            workers: default_workers(),
        }
    }
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            config_path: default_config_path(),
            secrets_path: default_secrets_path(),
            key_length: default_key_length(),
            fallback_url: default_fallback_url(),
            post_path: default_post_path(),
            max_body_bytes: default_max_body_bytes(),
            mode: RouteMode::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_legacy_constants() {
        let config = StaticConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.routes.config_path, "/etc/routes.json");
        assert_eq!(config.routes.secrets_path, "secrets.json");
        assert_eq!(config.routes.key_length, 6);
        assert_eq!(config.routes.post_path, "/post/new-route");
        assert_eq!(config.routes.mode, RouteMode::Dynamic);
        assert_eq!(config.auth.mode, AuthMode::Any);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_key_length() {
        let mut config = StaticConfig::default();
        config.routes.key_length = 0;
        assert!(config.validate().is_err());

        config.routes.key_length = MAX_KEY_LENGTH + 1;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, HashlinkerError::Configuration(_)));

        config.routes.key_length = MAX_KEY_LENGTH;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_paths() {
        let mut config = StaticConfig::default();
        config.routes.post_path = "post/new-route".to_string();
        assert!(config.validate().is_err());

        let mut config = StaticConfig::default();
        config.routes.fallback_url = "   ".to_string();
        assert!(config.validate().is_err());

        let mut config = StaticConfig::default();
        config.routes.max_body_bytes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_route_mode_parse() {
        assert_eq!("STATIC".parse::<RouteMode>().unwrap(), RouteMode::Static);
        assert_eq!("dynamic".parse::<RouteMode>().unwrap(), RouteMode::Dynamic);
        assert!("other".parse::<RouteMode>().is_err());
        assert_eq!(RouteMode::Static.to_string(), "static");
    }

    #[test]
    fn test_sample_config_round_trips() {
        let sample = toml::to_string_pretty(&StaticConfig::default()).unwrap();
        let parsed: StaticConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed.routes.key_length, 6);
        assert_eq!(parsed.routes.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
        assert_eq!(parsed.routes.fallback_url, default_fallback_url());
    }
}
