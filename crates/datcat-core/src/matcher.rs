//! Partial-hash identity between two items of the same variant.

use datcat_schema::{DigestKind, DigestSet, DupeType, Item, ItemKind, ItemStatus, DISK_IMAGE_CLASSES};

/// Decide whether `a` and `b` denote the same physical object.
///
/// Digest-bearing variants compare only the classes present on both sides:
/// any disagreement rejects, and at least one class must be mutually present.
/// Files additionally require equal sizes. Nodump entries never match, except
/// two digestless nodump disk images with the same name.
pub fn identity_equal(a: &Item, b: &Item) -> bool {
    match (&a.kind, &b.kind) {
        (
            ItemKind::File {
                size: size_a,
                digests: digests_a,
                status: status_a,
            },
            ItemKind::File {
                size: size_b,
                digests: digests_b,
                status: status_b,
            },
        ) => {
            if *status_a == ItemStatus::Nodump || *status_b == ItemStatus::Nodump {
                return false;
            }
            size_a == size_b && digests_agree(digests_a, digests_b, &DigestKind::ALL)
        }
        (
            ItemKind::DiskImage {
                digests: digests_a,
                status: status_a,
            },
            ItemKind::DiskImage {
                digests: digests_b,
                status: status_b,
            },
        ) => {
            let nodump_a = *status_a == ItemStatus::Nodump;
            let nodump_b = *status_b == ItemStatus::Nodump;
            if nodump_a
                && nodump_b
                && a.name == b.name
                && no_classes_present(digests_a, DISK_IMAGE_CLASSES)
                && no_classes_present(digests_b, DISK_IMAGE_CLASSES)
            {
                return true;
            }
            if nodump_a || nodump_b {
                return false;
            }
            digests_agree(digests_a, digests_b, DISK_IMAGE_CLASSES)
        }
        (ItemKind::Sample, ItemKind::Sample) | (ItemKind::ArchiveRef, ItemKind::ArchiveRef) => {
            a.name == b.name
        }
        (
            ItemKind::Release {
                region: region_a,
                language: language_a,
                date: date_a,
                is_default: default_a,
            },
            ItemKind::Release {
                region: region_b,
                language: language_b,
                date: date_b,
                is_default: default_b,
            },
        ) => {
            a.name == b.name
                && region_a == region_b
                && language_a == language_b
                && date_a == date_b
                && default_a == default_b
        }
        (
            ItemKind::BiosSet {
                description: description_a,
                is_default: default_a,
            },
            ItemKind::BiosSet {
                description: description_b,
                is_default: default_b,
            },
        ) => a.name == b.name && description_a == description_b && default_a == default_b,
        _ => false,
    }
}

/// Classify how `incoming` duplicates `existing`. Only meaningful once
/// [`identity_equal`] holds.
pub fn classify_duplicate(existing: &Item, incoming: &Item) -> DupeType {
    let external = !existing.provenance.same_origin(&incoming.provenance)
        || existing.dupe_type.is_external();
    let names_match = existing.unit.name == incoming.unit.name && existing.name == incoming.name;
    DupeType::classify(external, names_match)
}

fn digests_agree(a: &DigestSet, b: &DigestSet, classes: &[DigestKind]) -> bool {
    let mut mutual = 0usize;
    for kind in classes {
        if let (Some(x), Some(y)) = (a.get(*kind), b.get(*kind)) {
            if x != y {
                return false;
            }
            mutual += 1;
        }
    }
    mutual > 0
}

fn no_classes_present(set: &DigestSet, classes: &[DigestKind]) -> bool {
    classes.iter().all(|kind| set.get(*kind).is_none())
}
