//! Manifest records consumed by the server renderer and client loader.
//!
//! Pure projections of a fingerprinted asset; downstream rendering and
//! loading depend on this exact schema.

use serde::{Deserialize, Serialize};

/// Server-side manifest record describing one resolved asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerManifestEntry {
  /// Route exactly as requested.
  pub requested: String,
  /// Asset kind tag (`img`, `js`, `css`).
  #[serde(rename = "type")]
  pub kind: String,
  /// HTML snippet emitted by the server-side renderer.
  pub output: String,
  /// Served path relative to the output root.
  pub relative_path: String,
  /// Content fingerprint, when one has been computed.
  pub fingerprint: Option<String>,
  /// `<script>` tag referencing the unminified artifact. Scripts only.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub output_raw: Option<String>,
}

/// Minimal name-to-URL record consumed by the client-side loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientManifestEntry {
  /// Logical asset name (file name minus extension).
  pub name: String,
  /// Fully-qualified request path.
  pub path: String,
}
