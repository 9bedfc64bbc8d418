use crate::bucket::reconcile_with_stats;
use crate::fingerprint::{compute_catalog_id, CatalogIdentity};
use crate::index::{group_by_unit_padded, sort_items};
use crate::merge::MergeStats;
use crate::natural::sort_by_collation;
use datcat_schema::{Item, ReconcileOptions};
use std::collections::BTreeMap;
use tracing::info;

/// An ordered collection of items plus the options that govern how it is
/// reconciled and presented.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    options: ReconcileOptions,
    items: Vec<Item>,
}

impl Catalog {
    pub fn new(options: ReconcileOptions) -> Self {
        Self {
            options,
            items: Vec::new(),
        }
    }

    pub fn from_items(items: Vec<Item>, options: ReconcileOptions) -> Self {
        Self { options, items }
    }

    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Item> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, item: Item) {
        self.items.push(item);
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = Item>) {
        self.items.extend(items);
    }

    /// Deduplicate into a new catalog with the same options.
    pub fn reconcile(&self) -> (Catalog, MergeStats) {
        let (items, stats) = reconcile_with_stats(&self.items);
        info!(
            "reconciled {} items into {} ({} duplicates)",
            stats.input,
            stats.output,
            stats.duplicates()
        );
        (Catalog::from_items(items, self.options.clone()), stats)
    }

    /// Items grouped by unit key, keys ascending, groups ordered.
    pub fn grouped(&self) -> BTreeMap<String, Vec<&Item>> {
        group_by_unit_padded(&self.items, self.options.renaming, self.options.pad_width)
    }

    /// All items in total order.
    pub fn sorted(&self) -> Vec<&Item> {
        let mut out: Vec<&Item> = self.items.iter().collect();
        sort_items(&mut out, self.options.renaming);
        out
    }

    /// Unit keys ordered by the configured collation.
    pub fn unit_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.grouped().into_keys().collect();
        sort_by_collation(&mut keys, self.options.collation);
        keys
    }

    pub fn fingerprint(&self) -> CatalogIdentity {
        compute_catalog_id(&self.grouped())
    }
}
