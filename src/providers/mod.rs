// Файл: providers/mod.rs

pub mod bbs;
