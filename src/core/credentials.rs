// Файл: core/credentials.rs
// Источник cookie. Хранением и обновлением cookie занимается вызывающая сторона.

use super::error::CoreError;

/// Поставщик cookie для заголовка `cookie`.
pub trait CookieProvider: Send + Sync {
    /// Основная cookie-строка (ltoken/account_id и т.п.).
    fn cookie(&self) -> Result<String, CoreError>;

    /// Cookie со stoken, нужна для лайков.
    fn stoken_cookie(&self) -> Result<String, CoreError>;
}

/// Неизменяемые cookie, заданные заранее.
#[derive(Clone)]
pub struct StaticCookies {
    cookie: String,
    stoken_cookie: String,
}

impl StaticCookies {
    pub fn new(cookie: impl Into<String>, stoken_cookie: impl Into<String>) -> Self {
        Self {
            cookie: cookie.into(),
            stoken_cookie: stoken_cookie.into(),
        }
    }

    /// Собирает stoken-cookie вида `stuid=<uid>;stoken=<stoken>`.
    pub fn from_parts(cookie: impl Into<String>, stuid: &str, stoken: &str) -> Self {
        Self::new(cookie, format!("stuid={};stoken={}", stuid, stoken))
    }
}

// Содержимое cookie в Debug не выводим.
impl std::fmt::Debug for StaticCookies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCookies")
            .field("cookie_len", &self.cookie.len())
            .field("stoken_cookie_len", &self.stoken_cookie.len())
            .finish()
    }
}

impl CookieProvider for StaticCookies {
    fn cookie(&self) -> Result<String, CoreError> {
        non_empty(&self.cookie, "cookie")
    }

    fn stoken_cookie(&self) -> Result<String, CoreError> {
        non_empty(&self.stoken_cookie, "stoken cookie")
    }
}

fn non_empty(value: &str, what: &str) -> Result<String, CoreError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CoreError::Credential(format!("{} is empty", what)));
    }
    Ok(value.to_string())
}
