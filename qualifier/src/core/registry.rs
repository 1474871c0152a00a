//! In-memory registry of qualified vendor ids.
//!
//! A [`Registry`] is an ordinary owned value. Share it through `Arc` when more
//! than one ledger or thread needs the same set; tests build a fresh one each.

use std::collections::BTreeSet;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{Result, anyhow};

use crate::core::types::VendorId;

/// Outcome of a single insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Insertion {
    /// False when the id was already present (the set is unchanged).
    pub newly_recorded: bool,
    /// Registry size after the insert.
    pub size: usize,
}

/// Set of recorded vendor ids. No duplicates, no eviction.
///
/// Inserts take the write lock for the whole read-modify-write; lookups take
/// the read lock and may run concurrently with each other.
#[derive(Debug, Default)]
pub struct Registry {
    ids: RwLock<BTreeSet<VendorId>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `id`. Re-inserting a present id is a no-op, not an error.
    pub fn insert(&self, id: VendorId) -> Result<Insertion> {
        let mut ids = self.write()?;
        let newly_recorded = ids.insert(id);
        Ok(Insertion {
            newly_recorded,
            size: ids.len(),
        })
    }

    pub fn contains(&self, id: &VendorId) -> Result<bool> {
        Ok(self.read()?.contains(id))
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }

    /// All recorded ids in ascending numeric order.
    ///
    /// Diagnostics only: no contract operation exposes this.
    pub fn snapshot(&self) -> Result<Vec<VendorId>> {
        Ok(self.read()?.iter().cloned().collect())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeSet<VendorId>>> {
        self.ids
            .read()
            .map_err(|_| anyhow!("registry lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeSet<VendorId>>> {
        self.ids
            .write()
            .map_err(|_| anyhow!("registry lock poisoned"))
    }
}
