//! Asset model: routes, variants, fingerprinting and manifest projection.

mod fingerprint;
mod model;
mod route;
mod stylesheet;

pub use fingerprint::content_fingerprint;
pub use model::{Asset, AssetVariant};
pub use route::RouteInput;
