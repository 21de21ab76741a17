#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod assemble;
pub mod asset;
pub mod config;
pub mod content;
pub mod diagnostics;
pub mod manifest;
pub mod pipeline;
pub mod resolve;

pub use asset::{Asset, AssetVariant, RouteInput, content_fingerprint};
pub use assemble::{AssemblyDescriptor, ModuleAssembler, PassthroughConverter, TemplateConverter};
pub use config::PipelineConfig;
pub use content::{ContentRecord, ContentStore, NoopCompressor, ResolvedContent, ScriptCompressor};
pub use diagnostics::{Diagnostic, DiagnosticsSink, LogSink, RecordingSink};
pub use manifest::{ClientManifestEntry, ServerManifestEntry};
pub use pipeline::AssetPipeline;
pub use resolve::{AssetIdentity, AssetKind, PathResolver, ResolveError, ResolvedMeta};
