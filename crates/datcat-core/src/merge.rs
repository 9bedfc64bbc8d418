//! Reconciliation of items that may describe the same physical object.

use crate::matcher::{classify_duplicate, identity_equal};
use datcat_schema::{Digest, DupeType, Item, ItemKind};
use serde::Serialize;
use std::borrow::Borrow;
use std::cmp::Ordering;
use tracing::{debug, trace};

/// Counters collected over one or more merge passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    pub input: usize,
    pub output: usize,
    pub internal: usize,
    pub external: usize,
    pub nodump: usize,
    pub placeholders: usize,
    pub reassigned: usize,
}

impl MergeStats {
    pub fn duplicates(&self) -> usize {
        self.internal + self.external
    }

    pub fn absorb(&mut self, other: &MergeStats) {
        self.input += other.input;
        self.output += other.output;
        self.internal += other.internal;
        self.external += other.external;
        self.nodump += other.nodump;
        self.placeholders += other.placeholders;
        self.reassigned += other.reassigned;
    }

    fn record(&mut self, dupe: DupeType, reassigned: bool) {
        if dupe.is_external() {
            self.external += 1;
        } else {
            self.internal += 1;
        }
        if reassigned {
            self.reassigned += 1;
        }
    }
}

/// Deduplicate `items`, one representative per physical identity.
///
/// Inputs are never mutated; the result is a fresh collection.
pub fn merge<T: Borrow<Item>>(items: &[T]) -> Vec<Item> {
    merge_with_stats(items).0
}

/// Like [`merge`], also returning counters.
///
/// Passes repeat until one collapses nothing: digest backfill can give two
/// previously unrelated entries a shared class, and a later pass folds them.
/// The returned output is always a fixpoint, so merging it again is a no-op.
pub fn merge_with_stats<T: Borrow<Item>>(items: &[T]) -> (Vec<Item>, MergeStats) {
    let mut stats = MergeStats {
        input: items.len(),
        ..MergeStats::default()
    };
    if items.is_empty() {
        return (Vec::new(), stats);
    }

    let mut pass_stats = MergeStats::default();
    let mut current = merge_pass(items, &mut pass_stats);
    stats.absorb(&pass_stats);
    let mut passes = 1;

    loop {
        let mut next_stats = MergeStats::default();
        let next = merge_pass(&current, &mut next_stats);
        passes += 1;
        let collapsed = next.len() < current.len();
        stats.internal += next_stats.internal;
        stats.external += next_stats.external;
        stats.reassigned += next_stats.reassigned;
        current = next;
        if !collapsed {
            stats.nodump = next_stats.nodump;
            stats.placeholders = next_stats.placeholders;
            break;
        }
    }

    stats.output = current.len();
    debug!(
        input = stats.input,
        output = stats.output,
        duplicates = stats.duplicates(),
        passes,
        "merged items"
    );
    (current, stats)
}

/// Fold `incoming` into `existing`, returning a new record.
///
/// Absent digest classes are backfilled (present ones are never overwritten),
/// the duplicate classification is refreshed, and the displayed identity
/// moves to whichever side has the lower `(system_id, source_id)`. A clone
/// entry adopts its parent's unit when the parent does not lose on provenance.
pub fn merge_into(existing: &Item, incoming: &Item) -> Item {
    let mut merged = existing.clone();

    if let (Some(have), Some(new)) = (existing.digests(), incoming.digests()) {
        let filled = have
            .backfilled(new)
            .restricted_to(existing.digest_classes());
        if let ItemKind::File { digests, .. } | ItemKind::DiskImage { digests, .. } =
            &mut merged.kind
        {
            *digests = filled;
        }
    }

    merged.dupe_type = classify_duplicate(existing, incoming);

    if incoming.provenance.outranks(&existing.provenance) {
        merged.provenance = incoming.provenance.clone();
        merged.unit = incoming.unit.clone();
        merged.name.clone_from(&incoming.name);
    } else if !existing.provenance.outranks(&incoming.provenance)
        && merged.unit.derives_from(&incoming.unit.name)
    {
        merged.unit = incoming.unit.clone();
        merged.name.clone_from(&incoming.name);
    }

    merged
}

/// Canonical scan order: size, then digests class by class (absent first),
/// then provenance and names. Items still tied fall back to full content
/// comparison, so only identical items compare equal.
pub fn scan_order(a: &Item, b: &Item) -> Ordering {
    a.size()
        .cmp(&b.size())
        .then_with(|| digest_key(a).cmp(&digest_key(b)))
        .then_with(|| {
            (a.provenance.system_id, a.provenance.source_id)
                .cmp(&(b.provenance.system_id, b.provenance.source_id))
        })
        .then_with(|| a.unit.name.cmp(&b.unit.name))
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.variant().cmp(&b.variant()))
        .then_with(|| a.status().cmp(&b.status()))
        .then_with(|| a.cmp(b))
}

fn digest_key(item: &Item) -> [Option<&Digest>; 6] {
    item.digests().map_or([None; 6], |d| d.sort_key())
}

fn merge_pass<T: Borrow<Item>>(items: &[T], stats: &mut MergeStats) -> Vec<Item> {
    let mut ordered: Vec<&Item> = items.iter().map(Borrow::<Item>::borrow).collect();
    ordered.sort_by(|a, b| scan_order(a, b));

    let mut out: Vec<Item> = Vec::with_capacity(ordered.len());
    for item in ordered {
        if item.is_placeholder() {
            stats.placeholders += 1;
            out.push(item.clone());
            continue;
        }

        let position = if item.is_nodump() {
            // Only digestless nodump disk images can collapse, and only into
            // one another.
            out.iter()
                .position(|entry| entry.is_nodump() && identity_equal(entry, item))
        } else {
            out.iter().position(|entry| {
                !entry.is_nodump() && !entry.is_placeholder() && identity_equal(entry, item)
            })
        };

        match position {
            Some(pos) => {
                let merged = merge_into(&out[pos], item);
                let reassigned = merged.provenance != out[pos].provenance;
                trace!(
                    name = %merged.name,
                    unit = %merged.unit.name,
                    dupe = %merged.dupe_type,
                    "absorbed duplicate"
                );
                stats.record(merged.dupe_type, reassigned);
                out[pos] = merged;
            }
            None => {
                if item.is_nodump() {
                    stats.nodump += 1;
                }
                out.push(item.clone());
            }
        }
    }
    out
}
