//! Search-root resolution with locale-scoped memoization.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::identity::AssetIdentity;

/// Where a logical asset request was matched on disk.
///
/// Entries are memoized per locale and never recomputed or invalidated: the
/// filesystem is assumed immutable for the lifetime of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMeta {
    /// Path of the file backing the asset (the descriptor for assemblies).
    pub main_file: PathBuf,
    /// Whether the match is an assembly descriptor rather than a plain or
    /// index file.
    pub assembled: bool,
    /// Base name of the requested asset.
    pub name: String,
    /// Directory portion of the request, possibly empty.
    pub path_part: String,
    /// Module directory containing the descriptor's fragments. Assemblies
    /// only.
    pub base_module_path: Option<PathBuf>,
    /// Search root the match was found under. Assemblies only.
    pub base_path: Option<PathBuf>,
    /// Locale the assembly was resolved for. Assemblies only.
    pub locale: Option<String>,
}

/// Failure to locate an asset under any configured search root.
#[derive(Debug)]
pub enum ResolveError {
    /// No search root contains any candidate form of the request.
    NotFound {
        /// The exact-file candidate that was probed.
        relative: String,
    },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { relative } => write!(f, "Unrecognized asset: {relative}"),
        }
    }
}

impl std::error::Error for ResolveError {}

/// Locates the file(s) backing a logical asset across ordered search roots.
///
/// Within one root the exact file wins over an index file, which wins over
/// an assembly descriptor; a match in an earlier root wins over any match in
/// a later one, regardless of kind. There is no backtracking: an assembly
/// hit in root one beats an exact hit in root two.
#[derive(Debug)]
pub struct PathResolver {
    search_roots: Vec<PathBuf>,
    cache: Mutex<HashMap<String, HashMap<String, ResolvedMeta>>>,
    probes: AtomicUsize,
}

impl PathResolver {
    /// Create a resolver over the given ordered search roots.
    pub fn new(search_roots: Vec<PathBuf>) -> Self {
        Self {
            search_roots,
            cache: Mutex::new(HashMap::new()),
            probes: AtomicUsize::new(0),
        }
    }

    /// Locate the file backing `identity`.
    ///
    /// Successful resolutions are memoized; the cache is consulted before
    /// any filesystem probing. The lock is held across the probe so that
    /// concurrent callers compute each key at most once.
    pub fn resolve(&self, identity: &AssetIdentity) -> Result<ResolvedMeta, ResolveError> {
        let check_path = identity.exact_candidate().to_string_lossy().into_owned();

        let mut cache = self.cache.lock().expect("resolution cache poisoned");
        let locale_cache = cache.entry(identity.locale.clone()).or_default();
        if let Some(meta) = locale_cache.get(&check_path) {
            return Ok(meta.clone());
        }

        let meta = self
            .probe_roots(identity)
            .ok_or(ResolveError::NotFound {
                relative: check_path.clone(),
            })?;
        locale_cache.insert(check_path, meta.clone());
        Ok(meta)
    }

    /// Number of filesystem existence checks performed so far.
    ///
    /// Memoized lookups perform none; useful for verifying cache behaviour.
    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::Relaxed)
    }

    fn probe_roots(&self, identity: &AssetIdentity) -> Option<ResolvedMeta> {
        let exact = identity.exact_candidate();
        let index = identity.index_candidate();
        let assembly = identity.assembly_candidate();

        for root in &self.search_roots {
            let full = root.join(&exact);
            if self.probe(&full) {
                return Some(plain_meta(identity, full));
            }

            let full = root.join(&index);
            if self.probe(&full) {
                return Some(plain_meta(identity, full));
            }

            let full = root.join(&assembly);
            if self.probe(&full) {
                return Some(ResolvedMeta {
                    main_file: full,
                    assembled: true,
                    name: identity.name.clone(),
                    path_part: identity.path_part.clone(),
                    base_module_path: Some(root.join(identity.module_dir())),
                    base_path: Some(root.clone()),
                    locale: Some(identity.locale.clone()),
                });
            }
        }

        None
    }

    fn probe(&self, path: &Path) -> bool {
        self.probes.fetch_add(1, Ordering::Relaxed);
        path.exists()
    }
}

fn plain_meta(identity: &AssetIdentity, main_file: PathBuf) -> ResolvedMeta {
    ResolvedMeta {
        main_file,
        assembled: false,
        name: identity.name.clone(),
        path_part: identity.path_part.clone(),
        base_module_path: None,
        base_path: None,
        locale: None,
    }
}
