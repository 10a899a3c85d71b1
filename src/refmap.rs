//! Reference resolver (C13): the one piece of shared mutable state across
//! the worker pool (§5). Tracks the rename chain
//! `original -> intermediate -> final` for every resource (image, table)
//! extracted from a document, so downstream phases can recover which
//! output file corresponds to which source element.
//!
//! A small struct behind a `Mutex`, persisted to disk between phases via
//! `export`/`import` — the donor has no direct analogue (no persistent
//! cross-phase naming map exists in its PDF-editing design), so this
//! module follows the distilled spec's API directly rather than a
//! specific donor file.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// What kind of resource a reference-map entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Image,
    Table,
}

/// One resource's rename chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceEntry {
    /// Name as it appeared in the source (e.g. a PDF XObject name).
    pub original: String,
    /// Name assigned at extraction time (`page{P}_img{N}.{ext}`, §4.8).
    pub intermediate: String,
    /// Final name after any downstream rename; `None` until renamed.
    pub r#final: Option<String>,
    /// Resource kind.
    pub resource_type: ResourceType,
    /// Chapter id this resource was placed under, if structural
    /// promotion has run.
    pub chapter_id: Option<String>,
}

/// Aggregate counts exposed alongside the map itself (§7 transparency).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceMapCounts {
    pub images: usize,
    pub tables: usize,
    pub renamed: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ReferenceMapSnapshot {
    entries: HashMap<String, ResourceEntry>,
    counts: ReferenceMapCounts,
}

/// Singleton map per pipeline run (§4.13, §5). All mutation goes through
/// a single lock so concurrent page workers never interleave writes.
#[derive(Debug, Default)]
pub struct ReferenceMap {
    inner: Mutex<ReferenceMapSnapshot>,
}

impl ReferenceMap {
    /// Create an empty reference map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a newly extracted resource under its intermediate name.
    pub fn add_resource(&self, original: &str, intermediate: &str, resource_type: ResourceType) {
        let mut snapshot = self.inner.lock().unwrap();
        snapshot.entries.insert(
            intermediate.to_string(),
            ResourceEntry {
                original: original.to_string(),
                intermediate: intermediate.to_string(),
                r#final: None,
                resource_type,
                chapter_id: None,
            },
        );
        match resource_type {
            ResourceType::Image => snapshot.counts.images += 1,
            ResourceType::Table => snapshot.counts.tables += 1,
        }
    }

    /// Record a resource's final name, found by its intermediate name.
    /// A resource not yet registered is a no-op (never panics mid-run).
    pub fn update_final_name(&self, intermediate: &str, r#final: &str) {
        let mut snapshot = self.inner.lock().unwrap();
        if let Some(entry) = snapshot.entries.get_mut(intermediate) {
            entry.r#final = Some(r#final.to_string());
            snapshot.counts.renamed += 1;
        }
    }

    /// Attach a chapter id to a resource, set once structural promotion
    /// has placed it.
    pub fn set_chapter_id(&self, intermediate: &str, chapter_id: &str) {
        let mut snapshot = self.inner.lock().unwrap();
        if let Some(entry) = snapshot.entries.get_mut(intermediate) {
            entry.chapter_id = Some(chapter_id.to_string());
        }
    }

    /// Current aggregate counts.
    pub fn counts(&self) -> ReferenceMapCounts {
        self.inner.lock().unwrap().counts
    }

    /// A consistent snapshot of every entry, in no particular order.
    pub fn entries(&self) -> Vec<ResourceEntry> {
        self.inner.lock().unwrap().entries.values().cloned().collect()
    }

    /// Serialize the current snapshot to `path` as JSON.
    pub fn export(&self, path: &Path) -> Result<()> {
        let snapshot = self.inner.lock().unwrap();
        let json = serde_json::to_string_pretty(&*snapshot)?;
        fs::write(path, json).map_err(|e| Error::ReferenceMapIOError(e.to_string()))
    }

    /// Load a snapshot from `path`, replacing the current contents.
    /// Per §4.13/§7, a failure here is non-fatal to the caller: image
    /// flow works by filename alone without the rename chain, so callers
    /// should log the returned error and continue rather than abort.
    pub fn import(&self, path: &Path) -> Result<()> {
        let json = fs::read_to_string(path).map_err(|e| Error::ReferenceMapIOError(e.to_string()))?;
        let snapshot: ReferenceMapSnapshot = serde_json::from_str(&json).map_err(|e| Error::ReferenceMapIOError(e.to_string()))?;
        *self.inner.lock().unwrap() = snapshot;
        Ok(())
    }
}
