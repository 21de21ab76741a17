//! Stylesheet URL rewriting against the image resolution pipeline.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::diagnostics::Diagnostic;
use crate::pipeline::AssetPipeline;

fn url_reference_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r"url\([^)]+\)").expect("invalid url reference regex"))
}

fn external_reference_patterns() -> &'static [Regex] {
  static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
  PATTERNS
    .get_or_init(|| {
      vec![
        Regex::new(r"(?i)^https?://").expect("invalid http(s) regex"),
        Regex::new(r"(?i)^data:").expect("invalid data URI regex"),
      ]
    })
    .as_slice()
}

/// Determine whether a stylesheet reference points outside the pipeline.
///
/// External URLs and data URIs cannot be fingerprinted and are left exactly
/// as written.
fn is_external_reference(value: &str) -> bool {
  external_reference_patterns()
    .iter()
    .any(|pattern| pattern.is_match(value))
}

/// Rewrite every `url(...)` reference in `stylesheet` to the resolved,
/// fingerprinted image request path.
///
/// Unresolvable references are reported through the diagnostics sink and
/// kept in root-relative normalized form; the stylesheet itself is always
/// produced.
pub(crate) fn rewrite_stylesheet_urls(
  stylesheet: &str,
  stylesheet_route: &str,
  pipeline: &AssetPipeline,
) -> String {
  url_reference_pattern()
    .replace_all(stylesheet, |caps: &Captures<'_>| {
      let reference = caps[0]
        .trim_start_matches("url(")
        .trim_end_matches(')')
        .trim()
        .trim_matches(|c| c == '\'' || c == '"')
        .to_string();

      if is_external_reference(&reference) {
        return format!("url('{reference}')");
      }

      match pipeline.image_request_path(&reference) {
        Ok(resolved) => format!("url('{resolved}')"),
        Err(_) => {
          pipeline.diagnostics().report(Diagnostic::ImageReference {
            reference: reference.clone(),
            stylesheet: stylesheet_route.to_string(),
          });
          let normalized = if reference.starts_with('/') {
            reference
          } else {
            format!("/{reference}")
          };
          format!("url('{normalized}')")
        }
      }
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn recognises_external_references() {
    assert!(is_external_reference("https://cdn.example.com/x.png"));
    assert!(is_external_reference("HTTP://cdn.example.com/x.png"));
    assert!(is_external_reference("data:image/png;base64,abc"));
    assert!(!is_external_reference("images/x.png"));
    assert!(!is_external_reference("/images/x.png"));
  }

  #[test]
  fn matches_quoted_and_bare_url_references() {
    let pattern = url_reference_pattern();
    let text = "a { background: url('x.png'); } b { background: url(y.png); }";
    let matches: Vec<&str> = pattern.find_iter(text).map(|m| m.as_str()).collect();
    assert_eq!(matches, vec!["url('x.png')", "url(y.png)"]);
  }
}
