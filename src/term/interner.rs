//! Hash-consing of terms.
//!
//! One process-wide table maps canonical names to live term data, so
//! structurally equal terms share an allocation across every memory
//! instance. Entries are weak: a term nobody holds can be collected, and
//! dead entries are swept once the table grows past a high-water mark.

use std::sync::{Arc, OnceLock, Weak};

use dashmap::DashMap;

use super::TermData;

const PURGE_HIGH_WATER: usize = 1 << 14;

fn table() -> &'static DashMap<String, Weak<TermData>> {
    static TABLE: OnceLock<DashMap<String, Weak<TermData>>> = OnceLock::new();
    TABLE.get_or_init(DashMap::new)
}

/// Return the shared allocation for `data`, creating it if absent.
pub(crate) fn intern(data: TermData) -> Arc<TermData> {
    let table = table();
    if let Some(entry) = table.get(&data.name) {
        if let Some(existing) = entry.value().upgrade() {
            return existing;
        }
    }
    let arc = Arc::new(data);
    table.insert(arc.name.clone(), Arc::downgrade(&arc));
    if table.len() > PURGE_HIGH_WATER {
        table.retain(|_, weak| weak.strong_count() > 0);
    }
    arc
}
