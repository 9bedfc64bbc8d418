//! Regrouping reconciled items by owning unit, in a reproducible order.

use crate::merge::scan_order;
use datcat_schema::{Item, DEFAULT_PAD_WIDTH};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Grouping key for an item.
///
/// Without renaming this is the lower-cased unit name. With renaming it is
/// `<system_id>-<source_id>-<unit>`, ids zero-padded to `pad_width` so that
/// provenance orders numerically before the unit name is consulted.
pub fn unit_key(item: &Item, renaming: bool, pad_width: usize) -> String {
    let unit = item.unit.name.to_lowercase();
    if renaming {
        format!(
            "{:0width$}-{:0width$}-{unit}",
            item.provenance.system_id,
            item.provenance.source_id,
            width = pad_width
        )
    } else {
        unit
    }
}

/// Group items by unit key. Keys iterate in ascending order; each group is
/// ordered by [`sort_items`]. Items are borrowed, never modified.
pub fn group_by_unit(items: &[Item], renaming: bool) -> BTreeMap<String, Vec<&Item>> {
    group_by_unit_padded(items, renaming, DEFAULT_PAD_WIDTH)
}

/// [`group_by_unit`] with an explicit zero-pad width for provenance ids.
pub fn group_by_unit_padded(
    items: &[Item],
    renaming: bool,
    pad_width: usize,
) -> BTreeMap<String, Vec<&Item>> {
    let mut groups: BTreeMap<String, Vec<&Item>> = BTreeMap::new();
    for item in items {
        // Key is computed before insertion and never recomputed.
        let key = unit_key(item, renaming, pad_width);
        groups.entry(key).or_default().push(item);
    }
    for group in groups.values_mut() {
        sort_items(group, renaming);
    }
    groups
}

/// Order items by `(system_id, source_id, unit, name)`, or by `(unit, name)`
/// when renaming is enabled (the key already carries provenance). Remaining
/// ties fall back to [`scan_order`], which is total over item content.
pub fn sort_items<T: Borrow<Item>>(items: &mut [T], renaming: bool) {
    items.sort_by(|a, b| {
        compare_items(
            Borrow::<Item>::borrow(a),
            Borrow::<Item>::borrow(b),
            renaming,
        )
    });
}

pub fn compare_items(a: &Item, b: &Item, renaming: bool) -> Ordering {
    let primary = if renaming {
        Ordering::Equal
    } else {
        a.provenance
            .system_id
            .cmp(&b.provenance.system_id)
            .then_with(|| a.provenance.source_id.cmp(&b.provenance.source_id))
    };
    primary
        .then_with(|| a.unit.name.cmp(&b.unit.name))
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| scan_order(a, b))
}
