// Файл: core/mod.rs
// Общие утилиты: ошибки, конфигурация, cookie, подпись DS, HTTP и JSON.

pub mod config;
pub mod credentials;
pub mod ds;
pub mod error;
pub mod http;
pub mod json;

#[cfg(test)]
pub(crate) mod test_server;
