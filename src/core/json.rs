// Файл: core/json.rs
// Унифицированный хелпер для парсинга JSON.

use super::error::CoreError;
use serde::{Deserialize, Deserializer};

/// Разбирает сырой текст ответа в структуру `T`.
/// `context` попадает только в лог (например, "getPostFull").
pub fn parse_json_from_text<T: for<'de> serde::Deserialize<'de>>(
    response_text: &str,
    context: &str,
) -> Result<T, CoreError> {
    serde_json::from_str(response_text).map_err(|e| {
        log::warn!("Failed to parse JSON for {}: {}", context, e);
        CoreError::from(e)
    })
}

/// Для `deserialize_with`: `null` в ответе API превращается в `T::default()`.
/// API присылает `null` вместо пустых строк, списков и объектов.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
