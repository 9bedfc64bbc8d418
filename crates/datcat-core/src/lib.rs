//! Catalog reconciliation engine for datcat.
//!
//! This crate ties the schema's item model to the reconciliation pipeline:
//! partial-hash identity ([`identity_equal`]), the cross-source merge with
//! provenance tie-breaking and duplicate classification ([`merge`]),
//! coarse-key bucketing ([`reconcile`]), deterministic unit grouping and item
//! ordering ([`group_by_unit`], [`sort_items`]), natural key ordering, and a
//! content fingerprint of the ordered result. Everything here is a pure,
//! synchronous, in-memory transform; nothing reads or writes files.

pub mod bucket;
pub mod catalog;
pub mod fingerprint;
pub mod index;
pub mod matcher;
pub mod merge;
pub mod natural;

pub use bucket::{bucket_by_coarse_key, coarse_key, reconcile, reconcile_with_stats, CoarseKey};
pub use catalog::Catalog;
pub use fingerprint::{compute_catalog_id, CatalogIdentity};
pub use index::{compare_items, group_by_unit, group_by_unit_padded, sort_items, unit_key};
pub use matcher::{classify_duplicate, identity_equal};
pub use merge::{merge, merge_into, merge_with_stats, scan_order, MergeStats};
pub use natural::{collate, natural_cmp, natural_cmp_reverse_numeric, sort_by_collation};
