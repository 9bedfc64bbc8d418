//! Coarse-key bucketing and the full reconcile pass built on it.

use crate::merge::{merge_with_stats, MergeStats};
use datcat_schema::Item;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Cheap `(size, primary digest)` pre-filter. A hint only: equal keys may
/// still fail full identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CoarseKey {
    pub size: i64,
    /// Hex of the first present digest class the variant uses, empty when none.
    pub digest: String,
}

impl fmt::Display for CoarseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.size, self.digest)
    }
}

pub fn coarse_key(item: &Item) -> CoarseKey {
    // Only classes the variant takes part in; a disk image built by hand may
    // still hold a stray crc32.
    let digest = item
        .digests()
        .map(|d| d.restricted_to(item.digest_classes()))
        .and_then(|d| d.primary().map(|(_, digest)| digest.to_hex()))
        .unwrap_or_default();
    CoarseKey {
        size: item.size(),
        digest,
    }
}

/// Bucket items by coarse key. Input order is preserved within a bucket.
pub fn bucket_by_coarse_key(items: &[Item]) -> BTreeMap<CoarseKey, Vec<&Item>> {
    let mut buckets: BTreeMap<CoarseKey, Vec<&Item>> = BTreeMap::new();
    for item in items {
        buckets.entry(coarse_key(item)).or_default().push(item);
    }
    buckets
}

/// Bucket, merge each bucket in key order, and concatenate.
pub fn reconcile(items: &[Item]) -> Vec<Item> {
    reconcile_with_stats(items).0
}

pub fn reconcile_with_stats(items: &[Item]) -> (Vec<Item>, MergeStats) {
    let buckets = bucket_by_coarse_key(items);
    let mut out = Vec::with_capacity(items.len());
    let mut stats = MergeStats::default();

    for bucket in buckets.values() {
        let (merged, bucket_stats) = merge_with_stats(bucket);
        stats.absorb(&bucket_stats);
        out.extend(merged);
    }

    debug!(
        buckets = buckets.len(),
        input = stats.input,
        output = stats.output,
        internal = stats.internal,
        external = stats.external,
        "reconciled catalog"
    );
    (out, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use datcat_schema::{Digest, DigestKind, DigestSet, ItemKind, ItemStatus, Unit, UNKNOWN_SIZE};

    fn digests(pairs: &[(DigestKind, &str)]) -> DigestSet {
        pairs.iter().fold(DigestSet::default(), |set, (kind, text)| {
            set.with(*kind, Digest::parse(*kind, text).unwrap().unwrap())
        })
    }

    #[test]
    fn key_uses_first_present_class() {
        let item = Item::file(
            "a",
            10,
            digests(&[(DigestKind::Sha1, "2"), (DigestKind::Md5, "1")]),
        );
        let key = coarse_key(&item);
        assert_eq!(key.size, 10);
        assert_eq!(key.digest, format!("{}1", "0".repeat(31)));
    }

    #[test]
    fn key_for_digestless_variants() {
        let key = coarse_key(&Item::sample("boom"));
        assert_eq!(key.size, UNKNOWN_SIZE);
        assert!(key.digest.is_empty());
        assert_eq!(key.to_string(), "-1:");
    }

    #[test]
    fn buckets_preserve_input_order_and_sort_keys() {
        let items = vec![
            Item::file("b", 20, digests(&[(DigestKind::Crc32, "1")])),
            Item::file("a", 10, digests(&[(DigestKind::Crc32, "1")])),
            Item::file("c", 20, digests(&[(DigestKind::Crc32, "1")])),
        ];
        let buckets = bucket_by_coarse_key(&items);
        let sizes: Vec<i64> = buckets.keys().map(|k| k.size).collect();
        assert_eq!(sizes, vec![10, 20]);
        let second = buckets.values().nth(1).unwrap();
        let names: Vec<&str> = second.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[test]
    fn reconcile_merges_within_buckets_only() {
        let items = vec![
            Item::file("x", 10, digests(&[(DigestKind::Crc32, "1"), (DigestKind::Md5, "a")]))
                .with_unit(Unit::new("g")),
            Item::file("x", 10, digests(&[(DigestKind::Crc32, "1"), (DigestKind::Sha1, "b")]))
                .with_unit(Unit::new("g")),
            // Same object but without crc32: lands in another bucket.
            Item::file("x", 10, digests(&[(DigestKind::Md5, "a")])).with_unit(Unit::new("g")),
        ];
        let (out, stats) = reconcile_with_stats(&items);
        assert_eq!(out.len(), 2);
        assert_eq!(stats.input, 3);
        assert_eq!(stats.output, 2);
        assert_eq!(stats.internal, 1);
    }

    #[test]
    fn disk_image_key_ignores_foreign_classes() {
        let disk = |crc: &str| Item {
            kind: ItemKind::DiskImage {
                digests: digests(&[(DigestKind::Crc32, crc), (DigestKind::Sha1, "ab")]),
                status: ItemStatus::None,
            },
            ..Item::disk_image("hdd", &DigestSet::default()).with_unit(Unit::new("pc"))
        };
        let items = vec![disk("11111111"), disk("22222222")];
        assert_eq!(coarse_key(&items[0]), coarse_key(&items[1]));
        assert_eq!(coarse_key(&items[0]).digest, format!("{}ab", "0".repeat(38)));
        assert_eq!(reconcile(&items).len(), 1);
    }

    #[test]
    fn reconcile_of_nothing_is_nothing() {
        let (out, stats) = reconcile_with_stats(&[]);
        assert!(out.is_empty());
        assert_eq!(stats.output, 0);
    }
}
