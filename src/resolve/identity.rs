//! Logical coordinates identifying a requested asset.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Closed set of asset categories handled by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// Raster or vector images referenced by pages and stylesheets.
    Image,
    /// JavaScript sources, optionally composed from an assembly descriptor.
    Script,
    /// Stylesheets with an associated media type.
    Style,
}

impl AssetKind {
    /// Directory segment used for this kind under every search root.
    pub fn dir(self) -> &'static str {
        match self {
            Self::Image => "img",
            Self::Script => "js",
            Self::Style => "css",
        }
    }

    /// Classify a route by its file extension.
    pub fn from_ext(ext: &str) -> Self {
        match ext {
            "js" => Self::Script,
            "css" => Self::Style,
            _ => Self::Image,
        }
    }
}

/// The logical coordinates of a requested asset, independent of where it
/// lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetIdentity {
    /// Asset category.
    pub kind: AssetKind,
    /// Directory portion of the request, possibly empty.
    pub path_part: String,
    /// Base name without extension.
    pub name: String,
    /// File extension without the leading dot.
    pub ext: String,
    /// Requested locale.
    pub locale: String,
}

impl AssetIdentity {
    /// Create an identity with the default `"en"` locale.
    pub fn new(
        kind: AssetKind,
        path_part: impl Into<String>,
        name: impl Into<String>,
        ext: impl Into<String>,
    ) -> Self {
        Self::with_locale(kind, path_part, name, ext, "en")
    }

    /// Create an identity for a specific locale.
    pub fn with_locale(
        kind: AssetKind,
        path_part: impl Into<String>,
        name: impl Into<String>,
        ext: impl Into<String>,
        locale: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            path_part: path_part.into(),
            name: name.into(),
            ext: ext.into(),
            locale: locale.into(),
        }
    }

    /// Derive an identity from a slash-separated route such as
    /// `widgets/carousel.js`.
    pub fn from_route(kind: AssetKind, route: &str, locale: &str) -> Self {
        let (path_part, file) = match route.rsplit_once('/') {
            Some((prefix, file)) => (prefix, file),
            None => ("", route),
        };
        let (name, ext) = match file.rsplit_once('.') {
            Some((name, ext)) => (name, ext),
            None => (file, ""),
        };
        Self::with_locale(kind, path_part, name, ext, locale)
    }

    /// Relative path of the exact-file candidate. The rendered form doubles
    /// as the resolution cache key.
    pub fn exact_candidate(&self) -> PathBuf {
        self.candidate(&format!("{}.{}", self.name, self.ext))
    }

    /// Relative path of the index-file candidate.
    pub fn index_candidate(&self) -> PathBuf {
        self.module_dir().join(format!("index.{}", self.ext))
    }

    /// Relative path of the assembly descriptor candidate.
    pub fn assembly_candidate(&self) -> PathBuf {
        self.module_dir().join("assembly.json")
    }

    /// Relative directory holding the index or assembly form of this asset.
    pub fn module_dir(&self) -> PathBuf {
        self.candidate(&self.name)
    }

    fn candidate(&self, file: &str) -> PathBuf {
        let mut path = PathBuf::from(self.kind.dir());
        if !self.path_part.is_empty() {
            path.push(&self.path_part);
        }
        path.push(file);
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_all_three_candidate_forms() {
        let identity = AssetIdentity::new(AssetKind::Script, "widgets", "carousel", "js");

        assert_eq!(
            identity.exact_candidate(),
            PathBuf::from("js/widgets/carousel.js")
        );
        assert_eq!(
            identity.index_candidate(),
            PathBuf::from("js/widgets/carousel/index.js")
        );
        assert_eq!(
            identity.assembly_candidate(),
            PathBuf::from("js/widgets/carousel/assembly.json")
        );
    }

    #[test]
    fn omits_empty_path_part_from_candidates() {
        let identity = AssetIdentity::new(AssetKind::Image, "", "logo", "png");
        assert_eq!(identity.exact_candidate(), PathBuf::from("img/logo.png"));
    }

    #[test]
    fn derives_identity_from_nested_route() {
        let identity = AssetIdentity::from_route(AssetKind::Image, "icons/social/x.png", "fr");

        assert_eq!(identity.path_part, "icons/social");
        assert_eq!(identity.name, "x");
        assert_eq!(identity.ext, "png");
        assert_eq!(identity.locale, "fr");
    }

    #[test]
    fn derives_identity_from_bare_route() {
        let identity = AssetIdentity::from_route(AssetKind::Script, "app.js", "en");

        assert_eq!(identity.path_part, "");
        assert_eq!(identity.name, "app");
        assert_eq!(identity.ext, "js");
    }

    #[test]
    fn classifies_kinds_by_extension() {
        assert_eq!(AssetKind::from_ext("js"), AssetKind::Script);
        assert_eq!(AssetKind::from_ext("css"), AssetKind::Style);
        assert_eq!(AssetKind::from_ext("png"), AssetKind::Image);
        assert_eq!(AssetKind::from_ext("woff"), AssetKind::Image);
    }
}
