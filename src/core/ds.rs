// Файл: core/ds.rs
// Подпись запросов (заголовок DS) и случайные параметры устройства.
//
// Формат DS: "<t>,<r>,<md5>". t: unix-время в секундах,
// r: случайная строка (v1) или число (v2), md5: хеш строки с солью.

use md5::{Digest, Md5};
use rand::distributions::Alphanumeric;
use rand::Rng;
use uuid::Uuid;

const DS_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const DS_RANDOM_LEN: usize = 6;
const DS2_RANDOM_MIN: u32 = 100_001;
const DS2_RANDOM_MAX: u32 = 200_000;

pub fn md5_hex(input: &str) -> String {
    hex::encode(Md5::digest(input.as_bytes()))
}

/// DS v1: `md5("salt=<salt>&t=<t>&r=<r>")`.
pub fn compute_ds(salt: &str, t: i64, r: &str) -> String {
    let sign = md5_hex(&format!("salt={}&t={}&r={}", salt, t, r));
    format!("{},{},{}", t, r, sign)
}

/// DS v1 с текущим временем и случайной строкой из `[a-z0-9]`.
pub fn generate_ds(salt: &str) -> String {
    let mut rng = rand::thread_rng();
    let r: String = (0..DS_RANDOM_LEN)
        .map(|_| DS_CHARSET[rng.gen_range(0..DS_CHARSET.len())] as char)
        .collect();
    compute_ds(salt, unix_now(), &r)
}

/// DS v2: в хеш входят тело запроса и query-строка.
/// `body` должен совпадать байт в байт с тем, что уходит в сеть.
pub fn compute_ds2(salt: &str, t: i64, r: u32, body: &str, query: &str) -> String {
    let sign = md5_hex(&format!(
        "salt={}&t={}&r={}&b={}&q={}",
        salt, t, r, body, query
    ));
    format!("{},{},{}", t, r, sign)
}

pub fn generate_ds2(salt: &str, body: &str, query: &str) -> String {
    let r = rand::thread_rng().gen_range(DS2_RANDOM_MIN..DS2_RANDOM_MAX);
    compute_ds2(salt, unix_now(), r, body, query)
}

/// Случайное имя устройства длиной 5..=9 символов.
pub fn random_device_name() -> String {
    let mut rng = rand::thread_rng();
    let len = rng.gen_range(5..10);
    (&mut rng)
        .sample_iter(Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

pub fn new_device_id() -> String {
    Uuid::new_v4().to_string()
}

fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}
