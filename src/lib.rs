#[macro_use]
extern crate rust_i18n;

pub mod components;
pub mod config;
pub mod error;
#[cfg(feature = "web-interface")]
pub mod web;

// Initialize i18n
i18n!("locales", fallback = "en");

/// Switch the UI language, returning false for an unknown locale
pub fn set_ui_locale(locale: &str) -> bool {
    let known = available_locales!().iter().any(|l| *l == locale);
    if known {
        rust_i18n::set_locale(locale);
    }
    known
}
