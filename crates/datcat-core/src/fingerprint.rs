use datcat_schema::{Item, ItemKind};
use serde::Serialize;
use std::collections::BTreeMap;

/// Deterministic identity for a reconciled catalog, derived from its grouped,
/// ordered content.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CatalogIdentity {
    /// Full 64-character lowercase hex blake3 digest.
    pub catalog_id: String,
    /// First 12 characters of `catalog_id`, for display.
    pub short_id: String,
}

/// Hash a grouped catalog view.
///
/// Iteration follows the map's key order and each group's item order, so two
/// content-identical catalogs produce the same identity regardless of how
/// their items were originally supplied.
pub fn compute_catalog_id(groups: &BTreeMap<String, Vec<&Item>>) -> CatalogIdentity {
    let mut hasher = blake3::Hasher::new();

    for (key, items) in groups {
        hasher.update(format!("unit:{key}\n").as_bytes());
        for item in items {
            hash_item(&mut hasher, item);
        }
    }

    let catalog_id = hasher.finalize().to_hex().to_string();
    let short_id = catalog_id[..12].to_owned();

    CatalogIdentity {
        catalog_id,
        short_id,
    }
}

fn hash_item(hasher: &mut blake3::Hasher, item: &Item) {
    hasher.update(
        format!(
            "item:{}:{}:{}:{}\n",
            item.variant(),
            item.unit.name,
            item.name,
            item.dupe_type
        )
        .as_bytes(),
    );
    hasher.update(
        format!(
            "prov:{}:{}\n",
            item.provenance.system_id, item.provenance.source_id
        )
        .as_bytes(),
    );

    match &item.kind {
        ItemKind::File {
            size,
            digests,
            status,
        } => {
            hasher.update(format!("size:{size}\nstatus:{status}\n").as_bytes());
            for (kind, digest) in digests.present() {
                hasher.update(format!("{kind}:{digest}\n").as_bytes());
            }
        }
        ItemKind::DiskImage { digests, status } => {
            hasher.update(format!("status:{status}\n").as_bytes());
            for (kind, digest) in digests.present() {
                hasher.update(format!("{kind}:{digest}\n").as_bytes());
            }
        }
        ItemKind::Release {
            region,
            language,
            date,
            is_default,
        } => {
            hasher.update(
                format!(
                    "release:{}:{}:{}:{is_default}\n",
                    region.as_deref().unwrap_or(""),
                    language.as_deref().unwrap_or(""),
                    date.as_deref().unwrap_or("")
                )
                .as_bytes(),
            );
        }
        ItemKind::BiosSet {
            description,
            is_default,
        } => {
            hasher.update(format!("bios:{description}:{is_default}\n").as_bytes());
        }
        ItemKind::Sample | ItemKind::ArchiveRef => {}
    }
}
