//! The Core registry: the single root aggregating all loaded sites.
//!
//! Mutated only during load (site registration is mutually exclusive per
//! unit), read-only thereafter; safe for concurrent read-only use by
//! simultaneous top-level instantiations.

use std::sync::{Arc, Mutex};

use crate::collections::ConcurrentMap;
use crate::definition::{DefKind, Definition};
use crate::error::Error;
use crate::ident::{CantoPath, Ident};
use crate::Result;

/// Per-unit load outcome, kept in original input order for reporting.
#[derive(Debug, Clone)]
pub struct LoadRecord {
    pub unit: String,
    pub ok: bool,
    pub detail: Option<String>,
}

#[derive(Default)]
pub struct Core {
    sites: ConcurrentMap<Ident, Arc<Definition>>,
    site_order: Mutex<Vec<Ident>>,
    records: Mutex<Vec<LoadRecord>>,
}

impl Core {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fully parsed and initialized site. At most once per distinct
    /// unit name; a second registration is an error and is recorded as a
    /// failed unit without disturbing the first.
    pub fn register_site(&self, site: Arc<Definition>) -> Result<()> {
        if site.kind() != DefKind::Site {
            bail!("`{}` is not a site", site.name());
        }
        let name = site.name().clone();
        if self.sites.contains_key(&name) {
            let err = Error::DuplicateSite {
                name: name.as_str().to_string(),
            };
            self.push_record(LoadRecord {
                unit: name.as_str().to_string(),
                ok: false,
                detail: Some(err.to_string()),
            });
            return Err(err);
        }
        debug!("registering site `{}`", name);
        self.sites.insert(name.clone(), site);
        if let Ok(mut order) = self.site_order.lock() {
            order.push(name.clone());
        }
        self.push_record(LoadRecord {
            unit: name.as_str().to_string(),
            ok: true,
            detail: None,
        });
        Ok(())
    }

    /// Record a unit whose source could not be parsed. Does not abort other
    /// units; the failure shows up in `load_records` at its input position.
    pub fn record_failure(&self, unit: impl Into<String>, detail: impl Into<String>) {
        let unit = unit.into();
        let detail = detail.into();
        warn!("unit `{}` failed to load: {}", unit, detail);
        self.push_record(LoadRecord {
            unit,
            ok: false,
            detail: Some(detail),
        });
    }

    fn push_record(&self, record: LoadRecord) {
        if let Ok(mut records) = self.records.lock() {
            records.push(record);
        }
    }

    /// All load outcomes in original input order.
    pub fn load_records(&self) -> Vec<LoadRecord> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn site(&self, name: &Ident) -> Option<Arc<Definition>> {
        self.sites.get_cloned(name)
    }

    /// Registered sites in registration order.
    pub fn sites_in_order(&self) -> Vec<Arc<Definition>> {
        let order = self.site_order.lock().map(|o| o.clone()).unwrap_or_default();
        order
            .iter()
            .filter_map(|name| self.sites.get_cloned(name))
            .collect()
    }

    /// All top-level definitions carrying `tag` (e.g. "page"), in site
    /// registration order, declaration order within a site.
    pub fn definitions_of_type(&self, tag: &str) -> Vec<Arc<Definition>> {
        let mut found = vec![];
        for site in self.sites_in_order() {
            for def in site.children_in_order() {
                if def.has_type_tag(tag) {
                    found.push(def);
                }
            }
        }
        found
    }

    /// Look up a definition by dotted qualified name: the first segment names
    /// a site, the rest walk child scopes.
    pub fn lookup_qualified(&self, path: &CantoPath) -> Option<Arc<Definition>> {
        self.lookup_qualified_with_arity(path, 0)
    }

    /// Qualified lookup with the call site's argument count applied to the
    /// final segment. Intermediate segments are scope walks; arity is part of
    /// the match only where the name is actually called.
    pub fn lookup_qualified_with_arity(
        &self,
        path: &CantoPath,
        argc: usize,
    ) -> Option<Arc<Definition>> {
        let mut segments = path.segments.iter().peekable();
        let mut current = self.sites.get_cloned(segments.next()?)?;
        while let Some(segment) = segments.next() {
            let arity = if segments.peek().is_none() { argc } else { 0 };
            current = current.lookup_child(segment, arity)?;
        }
        if current.accepts_arity(argc) {
            Some(current)
        } else {
            None
        }
    }
}
