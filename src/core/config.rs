// Файл: core/config.rs
// Параметры клиента: версия приложения, соли DS, таймауты.

use super::error::CoreError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "https://bbs-api.mihoyo.com";
pub const DEFAULT_APP_VERSION: &str = "2.35.2";
/// "2": мобильное приложение под Android.
pub const DEFAULT_CLIENT_TYPE: &str = "2";
pub const DEFAULT_SYS_VERSION: &str = "6.0.1";
pub const DEFAULT_CHANNEL: &str = "miyousheluodi";
pub const DEFAULT_DEVICE_MODEL: &str = "Mi 10";
pub const DEFAULT_REFERER: &str = "https://app.mihoyo.com";
pub const DEFAULT_USER_AGENT: &str = "okhttp/4.8.0";
// Соли привязаны к версии приложения: при смене app_version их нужно менять вместе.
pub const DEFAULT_DS_SALT: &str = "ZSHlXeQUBis52qD1kEgKt5lUYed4b7Bb";
pub const DEFAULT_DS2_SALT: &str = "t0qEgfub6cvueAPgR5m9aQWWVciEer7v";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_base: String,
    pub app_version: String,
    pub client_type: String,
    pub sys_version: String,
    pub channel: String,
    pub device_model: String,
    /// Фиксированный `x-rpc-device_id`. Если `None`, клиент генерирует UUID при создании.
    pub device_id: Option<String>,
    pub referer: String,
    pub user_agent: String,
    pub ds_salt: String,
    pub ds2_salt: String,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            app_version: DEFAULT_APP_VERSION.to_string(),
            client_type: DEFAULT_CLIENT_TYPE.to_string(),
            sys_version: DEFAULT_SYS_VERSION.to_string(),
            channel: DEFAULT_CHANNEL.to_string(),
            device_model: DEFAULT_DEVICE_MODEL.to_string(),
            device_id: None,
            referer: DEFAULT_REFERER.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            ds_salt: DEFAULT_DS_SALT.to_string(),
            ds2_salt: DEFAULT_DS2_SALT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Читает конфигурацию из JSON. Отсутствующие поля берутся из `Default`.
    pub fn from_json_str(text: &str) -> Result<Self, CoreError> {
        super::json::parse_json_from_text(text, "ClientConfig")
    }

    /// Переопределяет поля из переменных окружения `MHY_*`.
    /// Пустые значения игнорируются.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("MHY_API_BASE") {
            self.api_base = v;
        }
        if let Some(v) = get("MHY_APP_VERSION") {
            self.app_version = v;
        }
        if let Some(v) = get("MHY_DEVICE_ID") {
            self.device_id = Some(v);
        }
        if let Some(v) = get("MHY_DS_SALT") {
            self.ds_salt = v;
        }
        if let Some(v) = get("MHY_DS2_SALT") {
            self.ds2_salt = v;
        }
        self
    }
}
