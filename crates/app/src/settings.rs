//! # 配置加载
//!
//! 按以下顺序叠加配置源，后者覆盖前者：
//! 1. `AppConfig::default()`
//! 2. 可选的 TOML 文件 (默认 `config/relay.toml`，可由 `RELAY_CONFIG` 指定)
//! 3. `RELAY__SECTION__KEY` 形式的环境变量
//! 4. 兼容旧部署的密钥环境变量 (`OPENAI_API_KEY` 等)

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use relay_core::config::AppConfig;

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config/relay.toml";

/// 指定配置文件路径的环境变量
pub const CONFIG_PATH_VAR: &str = "RELAY_CONFIG";

/// 旧部署使用的环境变量 → 配置键
const LEGACY_SECRET_VARS: [(&str, &str); 5] = [
    ("OPENAI_API_KEY", "completion.api_key"),
    ("KRX_API_KEY", "krx.api_key"),
    ("KRX_LOOKUP_API_KEY", "krx.lookup_api_key"),
    ("KIWOOM_APPKEY", "broker.app_key"),
    ("KIWOOM_SECRETKEY", "broker.app_secret"),
];

/// # Summary
/// 从进程环境加载配置。
pub fn load() -> Result<AppConfig, ConfigError> {
    let vars: HashMap<String, String> = std::env::vars().collect();
    let path = vars
        .get(CONFIG_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    load_from(&path, vars)
}

/// # Summary
/// 从给定文件路径与环境变量表加载配置。
///
/// # Logic
/// 1. 文件不存在时跳过。
/// 2. `RELAY__` 前缀变量按 `__` 拆分为嵌套键。
/// 3. 旧密钥变量非空时以最高优先级覆盖。
///
/// # Returns
/// 文件格式错误或值类型不符时返回 `config::ConfigError`。
/// 密钥是否齐全不在此检查，由 `AppConfig::validate` 负责。
pub fn load_from(path: &Path, vars: HashMap<String, String>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix("RELAY")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .source(Some(vars.clone())),
        );

    for (var, key) in LEGACY_SECRET_VARS {
        let value = vars.get(var).filter(|v| !v.trim().is_empty()).cloned();
        builder = builder.set_override_option(key, value)?;
    }

    builder.build()?.try_deserialize()
}
