//! Raw and processed content attached to resolved assets.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::assemble::ModuleAssembler;
use crate::diagnostics::{Diagnostic, DiagnosticsSink};
use crate::resolve::{AssetKind, ResolvedMeta};

/// Opaque script minifier supplied by the embedding application.
pub trait ScriptCompressor: Send + Sync {
  /// Compress script source text.
  fn compress(&self, source: &str) -> Result<String>;
}

/// Compressor returning its input unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCompressor;

impl ScriptCompressor for NoopCompressor {
  fn compress(&self, source: &str) -> Result<String> {
    Ok(source.to_string())
  }
}

/// Raw and processed byte content for one asset.
///
/// `raw` is the content as assembled or read from disk; `processed` is the
/// post-transform form. For non-script kinds the two are identical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRecord {
  raw: Vec<u8>,
  processed: Vec<u8>,
}

impl ContentRecord {
  /// Record whose processed form equals the raw form.
  pub fn passthrough(raw: Vec<u8>) -> Self {
    Self {
      processed: raw.clone(),
      raw,
    }
  }

  /// Record with distinct raw and processed forms.
  pub fn transformed(raw: Vec<u8>, processed: Vec<u8>) -> Self {
    Self { raw, processed }
  }

  /// Content as assembled or read from disk.
  pub fn raw(&self) -> &[u8] {
    &self.raw
  }

  /// Content after type-specific transforms.
  pub fn processed(&self) -> &[u8] {
    &self.processed
  }

  /// Raw content decoded as UTF-8 text.
  pub fn raw_text(&self) -> Cow<'_, str> {
    String::from_utf8_lossy(&self.raw)
  }

  /// Processed content decoded as UTF-8 text.
  pub fn processed_text(&self) -> Cow<'_, str> {
    String::from_utf8_lossy(&self.processed)
  }
}

/// Reads resolved assets into [`ContentRecord`]s, applying the script
/// compression policy.
pub struct ContentStore<'a> {
  compress_scripts: bool,
  compressor: &'a dyn ScriptCompressor,
  diagnostics: &'a dyn DiagnosticsSink,
}

impl<'a> ContentStore<'a> {
  /// Create a store with the given compression policy and collaborators.
  pub fn new(
    compress_scripts: bool,
    compressor: &'a dyn ScriptCompressor,
    diagnostics: &'a dyn DiagnosticsSink,
  ) -> Self {
    Self {
      compress_scripts,
      compressor,
      diagnostics,
    }
  }

  /// Load content for a resolved asset, composing assemblies on the fly.
  pub fn load(
    &self,
    meta: &ResolvedMeta,
    kind: AssetKind,
    assembler: &ModuleAssembler<'_>,
  ) -> Result<ContentRecord> {
    let raw = if meta.assembled {
      assembler.assemble(meta).into_bytes()
    } else {
      fs::read(&meta.main_file)
        .with_context(|| format!("failed to read {}", meta.main_file.display()))?
    };
    Ok(self.process(raw, kind, &meta.main_file.display().to_string()))
  }

  /// Apply type-specific transforms to raw content bytes.
  ///
  /// Scripts are compressed only when the policy allows it; a failing
  /// compressor falls back to the raw text so the asset stays usable.
  /// Styles and images pass through untransformed.
  pub fn process(&self, raw: Vec<u8>, kind: AssetKind, origin: &str) -> ContentRecord {
    if kind != AssetKind::Script || !self.compress_scripts {
      return ContentRecord::passthrough(raw);
    }

    let source = String::from_utf8_lossy(&raw).into_owned();
    match self.compressor.compress(&source) {
      Ok(compressed) => ContentRecord::transformed(raw, compressed.into_bytes()),
      Err(err) => {
        self.diagnostics.report(Diagnostic::Compression {
          file: origin.to_string(),
          message: format!("{err:#}"),
        });
        ContentRecord::passthrough(raw)
      }
    }
  }
}

/// A resolved asset's metadata paired with its loaded content.
#[derive(Debug, Clone)]
pub struct ResolvedContent {
  meta: ResolvedMeta,
  record: ContentRecord,
}

impl ResolvedContent {
  pub(crate) fn new(meta: ResolvedMeta, record: ContentRecord) -> Self {
    Self { meta, record }
  }

  /// Resolution metadata for the asset.
  pub fn meta(&self) -> &ResolvedMeta {
    &self.meta
  }

  /// Loaded raw and processed content.
  pub fn record(&self) -> &ContentRecord {
    &self.record
  }

  /// On-disk path of the file backing the asset.
  pub fn disk_path(&self) -> &Path {
    &self.meta.main_file
  }
}
