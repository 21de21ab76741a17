//! Polymorphic asset wrapper owning fingerprinting and serialization.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::content::ContentRecord;
use crate::manifest::{ClientManifestEntry, ServerManifestEntry};
use crate::pipeline::AssetPipeline;
use crate::resolve::AssetKind;

use super::fingerprint::content_fingerprint;
use super::route::RouteInput;
use super::stylesheet::rewrite_stylesheet_urls;

/// Closed set of asset variants behind the common [`Asset`] interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetVariant {
  /// Image emitted verbatim.
  Image,
  /// Script with dual raw/processed artifacts.
  Script,
  /// Stylesheet with an associated media type.
  Style {
    /// Media attribute emitted in the generated `<link>` tag.
    media_type: String,
  },
}

impl AssetVariant {
  /// Directory tag used in generated paths.
  pub fn tag(&self) -> &'static str {
    match self {
      Self::Image => "img",
      Self::Script => "js",
      Self::Style { .. } => "css",
    }
  }

  /// The resolution category this variant belongs to.
  pub fn kind(&self) -> AssetKind {
    match self {
      Self::Image => AssetKind::Image,
      Self::Script => AssetKind::Script,
      Self::Style { .. } => AssetKind::Style,
    }
  }
}

/// A logical asset route wrapped with type-specific behaviour.
///
/// `actual` starts equal to the requested route and is rewritten exactly
/// once when a fingerprint is assigned.
#[derive(Debug, Clone)]
pub struct Asset {
  requested: String,
  actual: String,
  ext: String,
  file_name: String,
  logical_name: String,
  path_prefix: String,
  variant: AssetVariant,
  is_absolute_url: bool,
  serve_prefix: String,
  disk_path: Option<PathBuf>,
  fingerprint: Option<String>,
  content: Option<ContentRecord>,
}

impl Asset {
  /// Construct the matching asset variant for a route.
  ///
  /// `.js` routes become scripts, `.css` routes (and media-tagged inputs)
  /// become stylesheets, anything else an image.
  pub fn parse(route: impl Into<RouteInput>, serve_prefix: &str) -> Self {
    let input = route.into();
    let tagged = input.is_tagged();
    let (route, media_type) = input.into_parts();

    let ext = if tagged {
      "css".to_string()
    } else {
      route
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_string())
        .unwrap_or_default()
    };
    let variant = match ext.as_str() {
      "js" => AssetVariant::Script,
      "css" => AssetVariant::Style { media_type },
      _ => AssetVariant::Image,
    };

    Self::with_variant(route, ext, variant, serve_prefix)
  }

  fn with_variant(route: String, ext: String, variant: AssetVariant, serve_prefix: &str) -> Self {
    let file_name = route
      .rsplit_once('/')
      .map(|(_, file)| file.to_string())
      .unwrap_or_else(|| route.clone());
    let logical_name = match file_name.rsplit_once('.') {
      Some((name, _)) => name.to_string(),
      None => file_name.clone(),
    };
    let path_prefix = route
      .rsplit_once('/')
      .map(|(prefix, _)| prefix.to_string())
      .unwrap_or_default();
    let is_absolute_url = route.starts_with("http");

    Self {
      requested: route.clone(),
      actual: route,
      ext,
      file_name,
      logical_name,
      path_prefix,
      variant,
      is_absolute_url,
      serve_prefix: serve_prefix.to_string(),
      disk_path: None,
      fingerprint: None,
      content: None,
    }
  }

  /// Route exactly as requested.
  pub fn requested(&self) -> &str {
    &self.requested
  }

  /// Served route, rewritten once a fingerprint is assigned.
  pub fn actual(&self) -> &str {
    &self.actual
  }

  /// File name portion of the route.
  pub fn file_name(&self) -> &str {
    &self.file_name
  }

  /// File name minus its extension.
  pub fn logical_name(&self) -> &str {
    &self.logical_name
  }

  /// The asset's variant tag.
  pub fn variant(&self) -> &AssetVariant {
    &self.variant
  }

  /// Whether the route is an absolute `http(s)` URL emitted verbatim.
  pub fn is_absolute_url(&self) -> bool {
    self.is_absolute_url
  }

  /// Content fingerprint, when one has been computed.
  pub fn fingerprint(&self) -> Option<&str> {
    self.fingerprint.as_deref()
  }

  /// Loaded content, when it has been read.
  pub fn content(&self) -> Option<&ContentRecord> {
    self.content.as_ref()
  }

  /// Backing disk path, when one has been set.
  pub fn disk_path(&self) -> Option<&Path> {
    self.disk_path.as_deref()
  }

  /// Path of the served file relative to the output root.
  pub fn relative_path(&self) -> String {
    format!("{}/{}", self.variant.tag(), self.actual)
  }

  /// Fully-qualified request path including the serve prefix.
  ///
  /// Absolute URLs bypass resolution and fingerprinting entirely and are
  /// returned verbatim.
  pub fn request_path(&self) -> String {
    if self.is_absolute_url {
      return self.actual.clone();
    }
    format!("{}/{}/{}", self.serve_prefix, self.variant.tag(), self.actual)
  }

  /// Relative path of the unminified script artifact.
  pub fn relative_raw_path(&self) -> String {
    if self.path_prefix.is_empty() {
      format!("{}/{}", self.variant.tag(), self.raw_file_name())
    } else {
      format!(
        "{}/{}/{}",
        self.variant.tag(),
        self.path_prefix,
        self.raw_file_name()
      )
    }
  }

  /// Request path of the unminified script artifact.
  pub fn request_raw_path(&self) -> String {
    format!("{}/{}", self.serve_prefix, self.relative_raw_path())
  }

  fn raw_file_name(&self) -> String {
    match &self.fingerprint {
      Some(fingerprint) => format!("{}-{}_raw.{}", self.logical_name, fingerprint, self.ext),
      None => format!("{}_raw.{}", self.logical_name, self.ext),
    }
  }

  /// Store the backing disk path; when `compute_fingerprint` is set, read
  /// content through the variant's override and fingerprint the final bytes
  /// immediately.
  pub fn set_disk_path(
    &mut self,
    disk_path: impl Into<PathBuf>,
    compute_fingerprint: bool,
    pipeline: &AssetPipeline,
  ) -> Result<()> {
    self.disk_path = Some(disk_path.into());

    if compute_fingerprint {
      self.read_contents(pipeline)?;
      let record = self
        .content
        .as_ref()
        .ok_or_else(|| anyhow!("asset content missing after read"))?;
      let fingerprint = content_fingerprint(record.processed());
      self.set_fingerprint(&fingerprint);
    }
    Ok(())
  }

  /// Rewrite the served route to embed `fingerprint` between the base name
  /// and extension, preserving any directory prefix.
  ///
  /// Calling this more than once compounds the name; callers assign a
  /// fingerprint exactly once.
  pub fn set_fingerprint(&mut self, fingerprint: &str) {
    self.fingerprint = Some(fingerprint.to_string());
    let file_name = format!("{}-{}.{}", self.logical_name, fingerprint, self.ext);
    self.actual = if self.path_prefix.is_empty() {
      file_name
    } else {
      format!("{}/{}", self.path_prefix, file_name)
    };
  }

  /// Read content from the stored disk path through the variant's
  /// type-specific transform.
  ///
  /// Scripts produce dual raw/processed content per the compression policy;
  /// stylesheets have their `url(...)` references rewritten against the
  /// image pipeline; images are read verbatim.
  pub fn read_contents(&mut self, pipeline: &AssetPipeline) -> Result<()> {
    let disk_path = self
      .disk_path
      .clone()
      .ok_or_else(|| anyhow!("no disk path set for '{}'", self.requested))?;
    let bytes = fs::read(&disk_path)
      .with_context(|| format!("failed to read {}", disk_path.display()))?;

    let record = match &self.variant {
      AssetVariant::Image => ContentRecord::passthrough(bytes),
      AssetVariant::Script => pipeline.content_store().process(
        bytes,
        AssetKind::Script,
        &disk_path.display().to_string(),
      ),
      AssetVariant::Style { .. } => {
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let rewritten = rewrite_stylesheet_urls(&text, &self.actual, pipeline);
        ContentRecord::passthrough(rewritten.into_bytes())
      }
    };

    self.content = Some(record);
    Ok(())
  }

  /// Serialize the asset for markup contexts.
  ///
  /// Images return the bare request path, usable outside markup as well.
  pub fn to_html(&self) -> String {
    match &self.variant {
      AssetVariant::Image => self.request_path(),
      AssetVariant::Script => format!("<script src='{}'></script>", self.request_path()),
      AssetVariant::Style { media_type } => format!(
        "<link href='{}' rel='stylesheet' media='{}'>",
        self.request_path(),
        media_type
      ),
    }
  }

  /// `<script>` tag referencing the unminified artifact. Scripts only.
  pub fn to_html_raw(&self) -> String {
    format!("<script src='{}'></script>", self.request_raw_path())
  }

  /// Manifest record consumed by the server-side renderer.
  pub fn server_manifest_entry(&self) -> ServerManifestEntry {
    ServerManifestEntry {
      requested: self.requested.clone(),
      kind: self.variant.tag().to_string(),
      output: self.to_html(),
      relative_path: self.relative_path(),
      fingerprint: self.fingerprint.clone(),
      output_raw: matches!(self.variant, AssetVariant::Script).then(|| self.to_html_raw()),
    }
  }

  /// Manifest record consumed by the client-side loader.
  pub fn client_manifest_entry(&self) -> ClientManifestEntry {
    ClientManifestEntry {
      name: self.logical_name.clone(),
      path: self.request_path(),
    }
  }

  /// Write processed content under `base_path`, creating intermediate
  /// directories. Scripts also write the raw artifact alongside.
  pub fn write_contents(&self, base_path: &Path) -> Result<()> {
    let record = self
      .content
      .as_ref()
      .ok_or_else(|| anyhow!("no content loaded for '{}'", self.requested))?;

    write_file(&base_path.join(self.relative_path()), record.processed())?;
    if matches!(self.variant, AssetVariant::Script) {
      write_file(&base_path.join(self.relative_raw_path()), record.raw())?;
    }
    Ok(())
  }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
}
