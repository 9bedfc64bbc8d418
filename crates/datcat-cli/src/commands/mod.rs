pub mod completions;
pub mod fingerprint;
pub mod merge;
pub mod sort_names;

use datcat_schema::{parse_options_file, Collation, Item, ReconcileOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_INPUT_ERROR: u8 = 2;

/// Options file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "datcat.toml";

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

/// Flag overrides applied on top of the options file.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionOverrides {
    pub renaming: bool,
    pub collation: Option<Collation>,
}

pub fn load_options(
    config: Option<&Path>,
    overrides: OptionOverrides,
) -> Result<ReconcileOptions, String> {
    let mut options = match config {
        Some(path) => {
            parse_options_file(path).map_err(|e| format!("options error: {e}"))?
        }
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
            parse_options_file(DEFAULT_CONFIG_FILE).map_err(|e| format!("options error: {e}"))?
        }
        None => ReconcileOptions::default(),
    };
    if overrides.renaming {
        options.renaming = true;
    }
    if let Some(collation) = overrides.collation {
        options.collation = collation;
    }
    debug!(?options, "resolved reconcile options");
    Ok(options)
}

/// Read each file as a JSON array of items.
///
/// Items that carry no source id (`0`) are attributed to their file: the
/// 1-based file position becomes the source id and the file name its label.
pub fn load_items(paths: &[PathBuf]) -> Result<Vec<Item>, String> {
    let mut items = Vec::new();
    for (index, path) in paths.iter().enumerate() {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("input error: {}: {e}", path.display()))?;
        let parsed: Vec<Item> = serde_json::from_str(&content)
            .map_err(|e| format!("input error: {}: {e}", path.display()))?;
        debug!("loaded {} items from {}", parsed.len(), path.display());

        let source_id = u32::try_from(index + 1)
            .map_err(|_| format!("input error: too many input files ({})", paths.len()))?;
        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        items.extend(parsed.into_iter().map(|mut item| {
            if item.provenance.source_id == 0 {
                item.provenance.source_id = source_id;
                if item.provenance.source.is_empty() {
                    item.provenance.source.clone_from(&label);
                }
            }
            item
        }));
    }
    Ok(items)
}

pub fn format_digests(item: &Item) -> String {
    item.digests()
        .map(|set| {
            set.present()
                .map(|(kind, digest)| format!("{kind}={digest}"))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default()
}
