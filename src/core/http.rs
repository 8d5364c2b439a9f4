// Файл: core/http.rs
// Фабрика HTTP-клиента и единственный транспортный хелпер.

use super::config::ClientConfig;
use super::error::CoreError;
use reqwest::{Client, Request};
use std::time::Duration;

/// Создаёт `reqwest::Client` с таймаутами из конфигурации.
/// Заголовки по умолчанию не ставятся: каждый запрос подписывается отдельно.
pub fn create_http_client(config: &ClientConfig) -> Result<Client, CoreError> {
    let timeout = Duration::from_secs(config.timeout_secs);

    let client = Client::builder()
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .timeout(timeout)
        .connect_timeout(timeout)
        .build()?;

    Ok(client)
}

/// Отправляет готовый запрос и возвращает тело ответа как текст.
/// Статусы 4xx/5xx превращаются в `CoreError::Network`.
pub async fn send_text(client: &Client, request: Request) -> Result<String, CoreError> {
    log::debug!("{}", describe_request(&request));

    let response_text = client
        .execute(request)
        .await?
        .error_for_status()?
        .text()
        .await?;

    Ok(response_text)
}

/// Строка для лога: метод и путь. Query и заголовки (cookie, DS) не выводятся.
pub fn describe_request(request: &Request) -> String {
    format!("HTTP {} {}", request.method(), request.url().path())
}
