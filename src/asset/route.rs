//! Route inputs and media-type extraction for requested assets.

use std::collections::BTreeMap;

use serde::Deserialize;

/// A requested asset route.
///
/// Stylesheets may be requested either as a plain path or as a single-key
/// map whose key is the media type and whose value is the path:
/// `{"print": "print.css"}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RouteInput {
  /// A plain slash-separated route.
  Plain(String),
  /// Media-type keyed stylesheet route.
  Tagged(BTreeMap<String, String>),
}

impl From<&str> for RouteInput {
  fn from(route: &str) -> Self {
    Self::Plain(route.to_string())
  }
}

impl From<String> for RouteInput {
  fn from(route: String) -> Self {
    Self::Plain(route)
  }
}

impl From<BTreeMap<String, String>> for RouteInput {
  fn from(map: BTreeMap<String, String>) -> Self {
    Self::Tagged(map)
  }
}

impl RouteInput {
  /// Whether this input carries an explicit media type.
  pub fn is_tagged(&self) -> bool {
    matches!(self, Self::Tagged(_))
  }

  /// Split the input into a route path and its media type.
  ///
  /// Plain routes default to media `"all"`.
  pub fn into_parts(self) -> (String, String) {
    match self {
      Self::Plain(route) => (route, "all".to_string()),
      Self::Tagged(map) => map
        .into_iter()
        .next()
        .map(|(media, route)| (route, media))
        .unwrap_or_else(|| (String::new(), "all".to_string())),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn plain_routes_default_to_all_media() {
    let (route, media) = RouteInput::from("screen.css").into_parts();
    assert_eq!(route, "screen.css");
    assert_eq!(media, "all");
  }

  #[test]
  fn tagged_routes_carry_their_media_type() {
    let mut map = BTreeMap::new();
    map.insert("print".to_string(), "print.css".to_string());

    let (route, media) = RouteInput::from(map).into_parts();
    assert_eq!(route, "print.css");
    assert_eq!(media, "print");
  }

  #[test]
  fn deserializes_both_input_shapes() {
    let plain: RouteInput = serde_json::from_str(r#""screen.css""#).unwrap();
    assert!(!plain.is_tagged());

    let tagged: RouteInput = serde_json::from_str(r#"{"print": "print.css"}"#).unwrap();
    assert!(tagged.is_tagged());
    let (route, media) = tagged.into_parts();
    assert_eq!((route.as_str(), media.as_str()), ("print.css", "print"));
  }
}
