//! Item model, digest normalization, and reconcile options for datcat.
//!
//! This crate defines the schema layer: the canonical type-tagged catalog
//! [`Item`] and its variants, independently optional digests ([`DigestSet`])
//! with hex normalization at the parser boundary, dump status and duplicate
//! classification enums, provenance, and TOML-backed [`ReconcileOptions`].

pub mod digest;
pub mod item;
pub mod normalize;
pub mod options;

pub use digest::{Digest, DigestKind, DigestSet};
pub use item::{
    DupeType, Item, ItemKind, ItemStatus, ItemVariant, Provenance, Unit, DISK_IMAGE_CLASSES,
    PLACEHOLDER_NAME, UNKNOWN_SIZE,
};
pub use normalize::{normalize_digest_text, DigestError};
pub use options::{
    parse_options_file, parse_options_str, Collation, OptionsError, ReconcileOptions,
    DEFAULT_PAD_WIDTH,
};
