//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Returns the URL of the stylesheet.
///
/// The hash is computed at build time from the CSS file content.
///
/// Usage in templates: `{{ ""|css_href }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn css_href(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(asset_href("css", "main", "css", env!("CSS_HASH")))
}

/// Returns the URL of the page script.
///
/// Usage in templates: `{{ ""|js_href }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn js_href(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(asset_href("js", "app", "js", env!("JS_HASH")))
}

/// Hashed asset URL, or the plain file when the build found no asset.
fn asset_href(dir: &str, stem: &str, ext: &str, hash: &str) -> String {
    if hash.is_empty() {
        format!("/static/{dir}/{stem}.{ext}")
    } else {
        format!("/static/{dir}/derived/{stem}.{hash}.{ext}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_href_uses_hash() {
        assert_eq!(
            asset_href("css", "main", "css", "1a2b3c4d"),
            "/static/css/derived/main.1a2b3c4d.css"
        );
    }

    #[test]
    fn test_asset_href_falls_back_without_hash() {
        assert_eq!(asset_href("js", "app", "js", ""), "/static/js/app.js");
    }
}
