// Файл: providers/bbs/headers.rs
// Заголовки мобильного приложения. Собираются заново для каждого запроса:
// DS и имя устройства не должны повторяться между вызовами.

use super::models::BbsError;
use crate::core::config::ClientConfig;
use crate::core::credentials::CookieProvider;
use crate::core::ds;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;

pub const HEADER_DS: &str = "ds";
pub const HEADER_COOKIE: &str = "cookie";

pub struct HeaderBuilder {
    config: ClientConfig,
    device_id: String,
    cookies: Arc<dyn CookieProvider>,
}

impl HeaderBuilder {
    pub fn new(config: ClientConfig, cookies: Arc<dyn CookieProvider>) -> Self {
        let device_id = config.device_id.clone().unwrap_or_else(ds::new_device_id);
        Self {
            config,
            device_id,
            cookies,
        }
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Базовый набор заголовков с DS v1 и основной cookie.
    pub fn build(&self) -> Result<HeaderMap, BbsError> {
        let mut headers = HeaderMap::new();
        let c = &self.config;

        insert(&mut headers, "accept", "*/*")?;
        insert(&mut headers, HEADER_DS, &ds::generate_ds(&c.ds_salt))?;
        insert(&mut headers, "x-rpc-client_type", &c.client_type)?;
        insert(&mut headers, "x-rpc-app_version", &c.app_version)?;
        insert(&mut headers, "x-rpc-sys_version", &c.sys_version)?;
        insert(&mut headers, "x-rpc-channel", &c.channel)?;
        insert(&mut headers, "x-rpc-device_id", &self.device_id)?;
        insert(&mut headers, "x-rpc-device_name", &ds::random_device_name())?;
        insert(&mut headers, "x-rpc-device_model", &c.device_model)?;
        insert(&mut headers, "referer", &c.referer)?;
        insert(&mut headers, "user-agent", &c.user_agent)?;
        insert_secret(&mut headers, HEADER_COOKIE, &self.cookies.cookie()?)?;
        insert(&mut headers, "content-type", "application/json")?;

        Ok(headers)
    }

    /// Для лайков: cookie со stoken вместо основной, DS заново.
    pub fn build_with_stoken(&self) -> Result<HeaderMap, BbsError> {
        let mut headers = self.build()?;
        insert_secret(&mut headers, HEADER_COOKIE, &self.cookies.stoken_cookie()?)?;
        insert(&mut headers, HEADER_DS, &ds::generate_ds(&self.config.ds_salt))?;
        Ok(headers)
    }

    /// Для отметки в разделе: DS v2 по телу и query-строке.
    pub fn build_with_ds2(&self, body: &str, query: &str) -> Result<HeaderMap, BbsError> {
        let mut headers = self.build()?;
        insert(
            &mut headers,
            HEADER_DS,
            &ds::generate_ds2(&self.config.ds2_salt, body, query),
        )?;
        Ok(headers)
    }
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue, BbsError> {
    HeaderValue::from_str(value)
        .map_err(|e| BbsError::InvalidHeader(format!("invalid value for {}: {}", name, e)))
}

fn insert(headers: &mut HeaderMap, name: &'static str, value: &str) -> Result<(), BbsError> {
    headers.insert(HeaderName::from_static(name), header_value(name, value)?);
    Ok(())
}

fn insert_secret(headers: &mut HeaderMap, name: &'static str, value: &str) -> Result<(), BbsError> {
    let mut value = header_value(name, value)?;
    value.set_sensitive(true);
    headers.insert(HeaderName::from_static(name), value);
    Ok(())
}
