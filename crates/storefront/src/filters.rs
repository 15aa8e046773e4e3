//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Returns the content hash for main.css, computed at build time.
///
/// Usage in templates: `{{ ""|css_hash }}`
#[askama::filter_fn]
pub fn css_hash(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(env!("CSS_HASH"))
}

/// Prefixes an amount with the currency label.
///
/// Usage in templates: `{{ total|ksh }}` renders `Ksh 1,200`.
#[askama::filter_fn]
pub fn ksh(amount: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format!("Ksh {amount}"))
}

/// Time before a toast is removed from the page, as an htmx interval.
///
/// Usage in templates: `{{ ""|toast_lifetime }}` renders `1800ms`.
#[askama::filter_fn]
pub fn toast_lifetime(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format!(
        "{}ms",
        duka_core::Notification::lifetime().as_millis()
    ))
}
