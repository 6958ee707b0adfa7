use crate::config::config::AppConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// 环境变量前缀，嵌套字段使用双下划线分隔，例如 `FINTWIN_SERVER__PORT`
pub const ENV_PREFIX: &str = "FINTWIN_";

/// 配置加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 从默认路径加载配置
    ///
    /// 优先级（后者覆盖前者）：
    /// 1. 环境默认值（`FINTWIN_ENVIRONMENT=production` 时使用生产默认值）
    /// 2. ./config.toml
    /// 3. `FINTWIN_` 前缀环境变量
    /// 4. `GROQ_API_KEY` / `SECRET_KEY` 兼容变量
    pub fn load() -> Result<AppConfig, figment::Error> {
        Self::load_from(default_config_path())
    }

    /// 从指定路径加载配置
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig, figment::Error> {
        let config: AppConfig = Self::figment(path.as_ref()).extract()?;
        Ok(Self::apply_legacy_env(config))
    }

    fn figment(path: &Path) -> Figment {
        let defaults = match std::env::var(format!("{ENV_PREFIX}ENVIRONMENT")).as_deref() {
            Ok("production") => AppConfig::production(),
            _ => AppConfig::development(),
        };

        Figment::from(Serialized::defaults(defaults))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// 兼容旧部署使用的裸环境变量
    fn apply_legacy_env(mut config: AppConfig) -> AppConfig {
        if !config.llm.has_api_key() {
            if let Ok(key) = std::env::var("GROQ_API_KEY") {
                if !key.trim().is_empty() {
                    config.llm.api_key = Some(key);
                }
            }
        }

        if std::env::var(format!("{ENV_PREFIX}SECURITY__JWT_SECRET")).is_err() {
            if let Ok(secret) = std::env::var("SECRET_KEY") {
                config.security.jwt_secret = secret;
            }
        }

        config
    }

    /// 验证配置
    pub fn validate(config: &AppConfig) -> Result<(), ConfigValidationError> {
        if config.server.port == 0 {
            return Err(ConfigValidationError::InvalidPort);
        }

        if config.security.jwt_secret.is_empty() {
            return Err(ConfigValidationError::MissingJwtSecret);
        }

        if config.security.jwt_expiry_seconds == 0 {
            return Err(ConfigValidationError::InvalidTokenExpiry);
        }

        if config.llm.base_url.is_empty() {
            return Err(ConfigValidationError::MissingLlmBaseUrl);
        }

        Ok(())
    }
}

/// 配置验证错误
#[derive(thiserror::Error, Debug)]
pub enum ConfigValidationError {
    #[error("服务端口无效，必须大于 0")]
    InvalidPort,

    #[error("JWT 签名密钥未配置")]
    MissingJwtSecret,

    #[error("令牌有效期无效，必须大于 0")]
    InvalidTokenExpiry,

    #[error("语言模型接口地址未配置")]
    MissingLlmBaseUrl,
}

/// 获取默认配置文件路径
pub fn default_config_path() -> PathBuf {
    PathBuf::from("config.toml")
}

/// 检查配置文件是否存在
pub fn config_exists() -> bool {
    default_config_path().exists()
}
