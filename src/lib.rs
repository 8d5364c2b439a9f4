//! Клиент мобильного API сообщества miHoYo (BBS): задания на монеты,
//! списки и чтение постов, лайки, репосты и отметка в разделах.
//!
//! ```no_run
//! use mhyapp::core::config::ClientConfig;
//! use mhyapp::core::credentials::StaticCookies;
//! use mhyapp::providers::bbs::{AppClient, Board};
//!
//! # async fn run() -> Result<(), mhyapp::providers::bbs::BbsError> {
//! mhyapp::init_logger();
//! let cookies = StaticCookies::from_parts("ltoken=...; ltuid=...", "10001", "stoken...");
//! let client = AppClient::with_cookies(ClientConfig::default().with_env_overrides(), cookies)?;
//!
//! for mission in client.get_tasks_incomplete_id_list().await? {
//!     println!("pending mission {}", mission.id());
//! }
//! let points = client.bbs_sign(Board::Genshin.gids()).await?;
//! println!("+{} points", points);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod providers;

pub use crate::core::config::ClientConfig;
pub use crate::core::credentials::{CookieProvider, StaticCookies};
pub use crate::core::error::CoreError;
pub use crate::providers::bbs::{AppClient, BbsError};

/// Подключает `env_logger` (уровень задаётся через `RUST_LOG`).
/// Повторный вызов ничего не делает.
pub fn init_logger() {
    // Логгер мог быть установлен приложением раньше, это не ошибка.
    let _ = env_logger::try_init();
}
