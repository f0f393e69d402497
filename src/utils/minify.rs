//! HTML minification for the preview document.
//!
//! The carrier is never minified: downstream tooling reads its metadata tags
//! line by line.

use crate::config::ProjectConfig;
use std::borrow::Cow;

/// Minify `html` if `[build] minify` is enabled.
///
/// Returns `Cow::Borrowed` if minify disabled, `Cow::Owned` if minified.
pub fn minify<'a>(html: &'a [u8], config: &ProjectConfig) -> Cow<'a, [u8]> {
    if config.build.minify {
        Cow::Owned(minify_html_inner(html))
    } else {
        Cow::Borrowed(html)
    }
}

/// Minify HTML content using `minify_html` crate.
fn minify_html_inner(html: &[u8]) -> Vec<u8> {
    let mut cfg = minify_html::Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.keep_comments = false;
    cfg.minify_css = true;
    cfg.minify_js = true;
    cfg.remove_bangs = false;
    cfg.remove_processing_instructions = true;
    minify_html::minify(html, &cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_minify(enabled: bool) -> ProjectConfig {
        let mut config = ProjectConfig::default();
        config.build.minify = enabled;
        config
    }

    #[test]
    fn test_minify_html_basic() {
        let html = b"<html>\n  <head>\n  </head>\n  <body>\n    <p>Try Falcon Free</p>\n  </body>\n</html>";
        let result = minify(html, &config_with_minify(true));
        let result_str = String::from_utf8_lossy(&result);

        assert!(!result_str.contains("\n  "));
        assert!(result_str.contains("<p>Try Falcon Free</p>"));
    }

    #[test]
    fn test_minify_html_enabled_vs_disabled() {
        let html = b"<html>\n  <body>\n  </body>\n</html>";

        let minified = minify(html, &config_with_minify(true));
        let not_minified = minify(html, &config_with_minify(false));

        assert!(minified.len() < not_minified.len());
        assert_eq!(&*not_minified, html);
        assert!(matches!(not_minified, Cow::Borrowed(_)));
    }

    #[test]
    fn test_minify_drops_comments() {
        let html = b"<p>a</p><!-- note --><p>b</p>";
        let result = minify(html, &config_with_minify(true));
        assert!(!String::from_utf8_lossy(&result).contains("note"));
    }
}
