//! Configuration access port trait.
//!
//! Typed getters over `[section] key` pairs. `get_string` distinguishes
//! missing keys from present ones; the numeric getters fall back to the
//! caller's default when the key is absent or unparseable.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
}
