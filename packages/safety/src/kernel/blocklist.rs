//! In-memory blocklist snapshot.
//!
//! The live banned-term list is editable by moderators and lives in the
//! hosted store. Each request gets handed a read-only snapshot of it;
//! refreshing the snapshot is the store's job, not the pipeline's.

use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;

use crate::common::normalize::fold_term;
use crate::kernel::traits::BaseBlocklist;

/// Read-only term-set snapshot. Terms are folded through input
/// normalization at construction so lookups and stored terms always
/// compare in the same form.
pub struct SnapshotBlocklist {
    terms: HashSet<String>,
}

impl SnapshotBlocklist {
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms = terms
            .into_iter()
            .map(|t| fold_term(t.as_ref()))
            .filter(|t| !t.is_empty())
            .collect();
        Self { terms }
    }

    /// An empty snapshot (nothing banned).
    pub fn empty() -> Self {
        Self {
            terms: HashSet::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[async_trait]
impl BaseBlocklist for SnapshotBlocklist {
    async fn lookup(&self, term: &str) -> Result<bool> {
        Ok(self.terms.contains(&fold_term(term)))
    }
}
