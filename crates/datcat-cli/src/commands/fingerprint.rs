use super::{json_pretty, load_items, load_options, OptionOverrides, EXIT_SUCCESS};
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
    let (merged, _) = Catalog::from_items(items, options).reconcile();
    let identity = merged.fingerprint();

    if json {
        println!("{}", json_pretty(&identity)?);
    } else {
        println!("{}", identity.catalog_id);
    }
    Ok(EXIT_SUCCESS)
}
