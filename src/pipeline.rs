//! Orchestration tying resolution, assembly, content and the asset factory
//! together around one explicit configuration.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use crate::asset::{Asset, RouteInput};
use crate::assemble::{ModuleAssembler, PassthroughConverter, TemplateConverter};
use crate::config::PipelineConfig;
use crate::content::{ContentStore, NoopCompressor, ResolvedContent, ScriptCompressor};
use crate::diagnostics::{Diagnostic, DiagnosticsSink, LogSink};
use crate::resolve::{AssetIdentity, AssetKind, PathResolver, ResolveError, ResolvedMeta};

/// One independent asset pipeline instance.
///
/// Owns its resolution cache explicitly, so multiple pipelines can coexist
/// in one process. All I/O is synchronous and blocking; this is a build-time
/// batch tool, not a service.
pub struct AssetPipeline {
  config: PipelineConfig,
  resolver: PathResolver,
  compressor: Box<dyn ScriptCompressor>,
  converter: Box<dyn TemplateConverter>,
  diagnostics: Arc<dyn DiagnosticsSink>,
}

impl AssetPipeline {
  /// Create a pipeline with passthrough collaborators and log-backed
  /// diagnostics.
  pub fn new(config: PipelineConfig) -> Self {
    let resolver = PathResolver::new(config.search_roots.clone());
    Self {
      config,
      resolver,
      compressor: Box::new(NoopCompressor),
      converter: Box::new(PassthroughConverter),
      diagnostics: Arc::new(LogSink),
    }
  }

  /// Replace the script compression collaborator.
  pub fn with_compressor(mut self, compressor: impl ScriptCompressor + 'static) -> Self {
    self.compressor = Box::new(compressor);
    self
  }

  /// Replace the template conversion collaborator.
  pub fn with_converter(mut self, converter: impl TemplateConverter + 'static) -> Self {
    self.converter = Box::new(converter);
    self
  }

  /// Replace the diagnostics sink.
  pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticsSink>) -> Self {
    self.diagnostics = diagnostics;
    self
  }

  /// Pipeline configuration.
  pub fn config(&self) -> &PipelineConfig {
    &self.config
  }

  /// The resolver backing this pipeline.
  pub fn resolver(&self) -> &PathResolver {
    &self.resolver
  }

  /// Sink receiving recoverable-failure diagnostics.
  pub fn diagnostics(&self) -> &dyn DiagnosticsSink {
    self.diagnostics.as_ref()
  }

  /// Build an identity for a slash-separated route using the configured
  /// default locale.
  pub fn route_identity(&self, kind: AssetKind, route: &str) -> AssetIdentity {
    AssetIdentity::from_route(kind, route, &self.config.default_locale)
  }

  /// Resolve an identity to its backing file.
  pub fn resolve(&self, identity: &AssetIdentity) -> Result<ResolvedMeta, ResolveError> {
    self.resolver.resolve(identity)
  }

  /// Resolve an identity and load its content, composing assemblies and
  /// applying the compression policy.
  pub fn load(&self, identity: &AssetIdentity) -> Result<ResolvedContent> {
    let meta = self.resolver.resolve(identity)?;
    let assembler = self.assembler();
    let record = self.content_store().load(&meta, identity.kind, &assembler)?;
    Ok(ResolvedContent::new(meta, record))
  }

  /// Construct the matching asset variant for a requested route.
  pub fn parse_route(&self, route: impl Into<RouteInput>) -> Asset {
    Asset::parse(route, &self.config.serve_prefix)
  }

  /// Reverse-map an absolute disk path to a logical asset and eagerly
  /// fingerprint it.
  ///
  /// Returns `Ok(None)` plus a diagnostic when the path is not under any
  /// configured search root; the caller decides whether that is fatal.
  pub fn parse_disk_path(&self, disk_path: &Path) -> Result<Option<Asset>> {
    for root in &self.config.search_roots {
      let Ok(relative) = disk_path.strip_prefix(root) else {
        continue;
      };

      let mut components = relative.components();
      components.next(); // the kind directory segment
      let route = components.as_path().to_string_lossy().replace('\\', "/");
      if route.is_empty() {
        break;
      }

      let mut asset = self.parse_route(route.as_str());
      asset.set_disk_path(disk_path, true, self)?;
      return Ok(Some(asset));
    }

    self.diagnostics.report(Diagnostic::UnmappedDiskPath {
      path: disk_path.display().to_string(),
    });
    Ok(None)
  }

  /// Resolve an image route to its fingerprinted request path.
  ///
  /// Used by stylesheet `url(...)` rewriting; the referenced image is read
  /// and fingerprinted eagerly.
  pub(crate) fn image_request_path(&self, route: &str) -> Result<String> {
    let identity = self.route_identity(AssetKind::Image, route);
    let meta = self.resolver.resolve(&identity)?;

    let mut asset = self.parse_route(route);
    asset.set_disk_path(meta.main_file, true, self)?;
    Ok(asset.request_path())
  }

  pub(crate) fn content_store(&self) -> ContentStore<'_> {
    ContentStore::new(
      self.config.compress_scripts,
      self.compressor.as_ref(),
      self.diagnostics.as_ref(),
    )
  }

  pub(crate) fn assembler(&self) -> ModuleAssembler<'_> {
    ModuleAssembler::new(self.converter.as_ref(), self.diagnostics.as_ref())
  }
}
