//! Locating the file(s) that back a logical asset request.
//!
//! The identity types and the resolver itself are split so that candidate
//! path construction can be tested independently of filesystem probing.

mod identity;
mod resolver;

pub use identity::{AssetIdentity, AssetKind};
pub use resolver::{PathResolver, ResolveError, ResolvedMeta};
