//! TemplateStore - lazy, process-wide cache of example schedule templates
//!
//! The catalog is loaded from a JSON backing file on first access and
//! shared across concurrent pipeline invocations. Reads after population
//! take only the RwLock fast path; the load itself is serialized by a
//! separate mutex with a re-check, so at most one load ever runs.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::PatternKey;

/// Maximum templates returned by one retrieval
pub const MAX_RETRIEVED: usize = 5;

/// A read-only example schedule fragment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub subcategory: String,
    pub ordering_pattern: PatternKey,
    #[serde(default)]
    pub example: Vec<String>,
}

/// The parsed catalog. Immutable after publication.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateCatalog {
    #[serde(default)]
    pub templates: Vec<Template>,
}

/// Process-wide template catalog service
///
/// Inject an `Arc<TemplateStore>` into the prompt builder; do not reach
/// for ambient global state.
pub struct TemplateStore {
    path: PathBuf,
    cache: RwLock<Option<Arc<TemplateCatalog>>>,
    load_lock: Mutex<()>,
}

impl TemplateStore {
    /// Create a store backed by the given JSON catalog file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: RwLock::new(None),
            load_lock: Mutex::new(()),
        }
    }

    /// Get the catalog, loading and caching it on first access.
    ///
    /// Double-check discipline: the fast path returns the published Arc
    /// without touching the load lock; a miss takes the lock, re-checks,
    /// then loads and publishes.
    pub fn catalog(&self) -> Arc<TemplateCatalog> {
        if let Some(catalog) = self.read_cache() {
            return catalog;
        }

        let _guard = self.load_lock.lock().unwrap_or_else(|e| e.into_inner());

        // Another invocation may have loaded while we waited on the lock
        if let Some(catalog) = self.read_cache() {
            return catalog;
        }

        let catalog = Arc::new(self.load_catalog());
        *self
            .cache
            .write()
            .unwrap_or_else(|e| e.into_inner()) = Some(catalog.clone());
        catalog
    }

    /// Drop the cached catalog so the next access reloads from disk.
    /// Serialized under the same lock as loading.
    pub fn invalidate(&self) {
        let _guard = self.load_lock.lock().unwrap_or_else(|e| e.into_inner());
        *self.cache.write().unwrap_or_else(|e| e.into_inner()) = None;
        debug!("template cache invalidated");
    }

    /// Retrieve templates matching the subcategory and pattern exactly.
    ///
    /// Both conditions are hard requirements; pattern equality includes
    /// shape (single vs compound) and element order. Never errors: an
    /// unknown subcategory or pattern simply matches nothing.
    pub fn retrieve(&self, subcategory: &str, pattern: &PatternKey) -> Vec<Template> {
        let catalog = self.catalog();
        let matches: Vec<Template> = catalog
            .templates
            .iter()
            .filter(|t| t.subcategory == subcategory && &t.ordering_pattern == pattern)
            .take(MAX_RETRIEVED)
            .cloned()
            .collect();
        debug!(
            subcategory,
            pattern = %pattern,
            count = matches.len(),
            "template retrieval"
        );
        matches
    }

    fn read_cache(&self) -> Option<Arc<TemplateCatalog>> {
        self.cache
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Load the catalog from disk. Missing or malformed backing files
    /// yield an empty catalog rather than an error - retrieval just
    /// returns no matches.
    fn load_catalog(&self) -> TemplateCatalog {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "template catalog unreadable, using empty catalog");
                return TemplateCatalog::default();
            }
        };

        match serde_json::from_str::<TemplateCatalog>(&content) {
            Ok(catalog) => {
                debug!(
                    path = %self.path.display(),
                    count = catalog.templates.len(),
                    "template catalog loaded"
                );
                catalog
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "template catalog malformed, using empty catalog");
                TemplateCatalog::default()
            }
        }
    }
}
