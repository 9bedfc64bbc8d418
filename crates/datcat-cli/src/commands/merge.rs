use super::{format_digests, json_pretty, load_items, load_options, OptionOverrides, EXIT_SUCCESS};
use datcat_core::Catalog;
use std::path::{Path, PathBuf};

pub fn run(
    files: &[PathBuf],
    config: Option<&Path>,
    overrides: OptionOverrides,
    json: bool,
) -> Result<u8, String> {
    let options = load_options(config, overrides)?;
    let items = load_items(files)?;
    let (merged, stats) = Catalog::from_items(items, options).reconcile();

    let groups = merged.grouped();
    let keys = merged.unit_keys();

    if json {
        let units: Vec<_> = keys
            .iter()
            .map(|key| {
                serde_json::json!({
                    "key": key,
                    "items": groups.get(key).map(Vec::as_slice).unwrap_or_default(),
                })
            })
            .collect();
        let payload = serde_json::json!({
            "stats": stats,
            "fingerprint": merged.fingerprint(),
            "units": units,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        for key in &keys {
            let Some(items) = groups.get(key) else {
                continue;
            };
            println!("{key} ({} items)", items.len());
            for item in items {
                let digests = format_digests(item);
                if digests.is_empty() {
                    println!("  {} {}  [{}]", item.variant(), item.name, item.dupe_type);
                } else {
                    println!(
                        "  {} {}  {digests}  [{}]",
                        item.variant(),
                        item.name,
                        item.dupe_type
                    );
                }
            }
        }
        println!(
            "{} items in, {} out ({} internal, {} external duplicates)",
            stats.input, stats.output, stats.internal, stats.external
        );
    }

    Ok(EXIT_SUCCESS)
}
