//! Structured reporting channel for recoverable pipeline failures.
//!
//! Content-transformation failures never abort a build, so they are surfaced
//! through an injected sink instead of a return value. The default sink
//! forwards to the `log` facade; tests swap in [`RecordingSink`] to assert on
//! exactly what was reported.

use std::fmt;
use std::sync::Mutex;

/// A recoverable failure observed while preparing an asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
  /// An assembly failed to compose and was replaced with an inert blob.
  AssemblyBuild {
    /// On-disk path of the assembly descriptor that failed.
    assembly: String,
    /// Human readable failure description.
    message: String,
  },
  /// Script compression failed and raw content was kept instead.
  Compression {
    /// File the compressor rejected.
    file: String,
    /// Human readable failure description.
    message: String,
  },
  /// A stylesheet `url(...)` reference could not be resolved to an image.
  ImageReference {
    /// The unresolved reference as written in the stylesheet.
    reference: String,
    /// Route of the stylesheet containing the reference.
    stylesheet: String,
  },
  /// An absolute disk path matched none of the configured search roots.
  UnmappedDiskPath {
    /// The path that could not be mapped to a logical route.
    path: String,
  },
}

impl fmt::Display for Diagnostic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::AssemblyBuild { assembly, message } => {
        write!(f, "Error building assembly '{assembly}': {message}")
      }
      Self::Compression { file, message } => {
        write!(f, "Error compressing file '{file}': {message}")
      }
      Self::ImageReference {
        reference,
        stylesheet,
      } => {
        write!(f, "Can't resolve image path '{reference}' in '{stylesheet}'")
      }
      Self::UnmappedDiskPath { path } => {
        write!(f, "Unable to find asset: {path}")
      }
    }
  }
}

/// Destination for [`Diagnostic`] reports.
pub trait DiagnosticsSink: Send + Sync {
  /// Record one diagnostic.
  fn report(&self, diagnostic: Diagnostic);
}

/// Default sink forwarding diagnostics to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticsSink for LogSink {
  fn report(&self, diagnostic: Diagnostic) {
    match diagnostic {
      Diagnostic::UnmappedDiskPath { .. } => log::warn!("{diagnostic}"),
      _ => log::error!("{diagnostic}"),
    }
  }
}

/// Sink capturing diagnostics in memory so callers can assert on them.
#[derive(Debug, Default)]
pub struct RecordingSink {
  records: Mutex<Vec<Diagnostic>>,
}

impl RecordingSink {
  /// Snapshot of everything reported so far.
  pub fn records(&self) -> Vec<Diagnostic> {
    self
      .records
      .lock()
      .expect("diagnostics lock poisoned")
      .clone()
  }
}

impl DiagnosticsSink for RecordingSink {
  fn report(&self, diagnostic: Diagnostic) {
    self
      .records
      .lock()
      .expect("diagnostics lock poisoned")
      .push(diagnostic);
  }
}
