// Файл: core/error.rs
// Общие ошибки для всех модулей крейта.

use thiserror::Error;

/// Внутренняя ошибка ядра.
/// Провайдеры оборачивают её в собственный тип через `From<CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to parse URL: {0}")]
    UrlParse(#[from] url::ParseError),

    // Используется для ошибок serde_json::Error
    #[error("Failed to parse JSON response or payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Credential unavailable: {0}")]
    Credential(String),
}

impl CoreError {
    /// `true`, если сервер ответил статусом 4xx/5xx.
    pub fn is_http_status(&self) -> bool {
        matches!(self, CoreError::Network(e) if e.is_status())
    }
}
