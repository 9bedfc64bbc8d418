use crate::digest::{DigestKind, DigestSet};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Item name used by the "this unit intentionally has no files" sentinel.
pub const PLACEHOLDER_NAME: &str = "null";

/// Size value meaning "unknown / not applicable". Distinct from an explicit `0`.
pub const UNKNOWN_SIZE: i64 = -1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    None,
    Good,
    BadDump,
    Nodump,
    Verified,
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemStatus::None => write!(f, "none"),
            ItemStatus::Good => write!(f, "good"),
            ItemStatus::BadDump => write!(f, "baddump"),
            ItemStatus::Nodump => write!(f, "nodump"),
            ItemStatus::Verified => write!(f, "verified"),
        }
    }
}

/// How an entry absorbed a duplicate during merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DupeType {
    #[default]
    None,
    /// Same provenance, digest identity only.
    InternalHash,
    /// Same provenance, unit and item name also matched.
    InternalAll,
    /// Different provenance, digest identity only.
    ExternalHash,
    /// Different provenance, unit and item name also matched.
    ExternalAll,
}

impl DupeType {
    pub fn classify(external: bool, names_match: bool) -> Self {
        match (external, names_match) {
            (true, true) => DupeType::ExternalAll,
            (true, false) => DupeType::ExternalHash,
            (false, true) => DupeType::InternalAll,
            (false, false) => DupeType::InternalHash,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, DupeType::None)
    }

    pub fn is_external(self) -> bool {
        matches!(self, DupeType::ExternalHash | DupeType::ExternalAll)
    }
}

impl fmt::Display for DupeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DupeType::None => write!(f, "none"),
            DupeType::InternalHash => write!(f, "internal_hash"),
            DupeType::InternalAll => write!(f, "internal_all"),
            DupeType::ExternalHash => write!(f, "external_hash"),
            DupeType::ExternalAll => write!(f, "external_all"),
        }
    }
}

/// Where an item came from. Lower ids are authoritative when merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Provenance {
    pub system_id: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub system: String,
    #[serde(default)]
    pub source_id: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,
}

impl Provenance {
    pub fn new(system_id: u32, source_id: u32) -> Self {
        Self {
            system_id,
            source_id,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_labels(mut self, system: &str, source: &str) -> Self {
        system.clone_into(&mut self.system);
        source.clone_into(&mut self.source);
        self
    }

    /// `true` when `self` should replace `other` as the displayed identity.
    pub fn outranks(&self, other: &Self) -> bool {
        (self.system_id, self.source_id) < (other.system_id, other.source_id)
    }

    pub fn same_origin(&self, other: &Self) -> bool {
        self.system_id == other.system_id && self.source_id == other.source_id
    }
}

/// The owning unit ("machine"/"game"). Only `name` is meaningful to grouping;
/// the rest is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Unit {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clone_of: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rom_of: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_of: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
}

impl Unit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn clone_of(mut self, parent: impl Into<String>) -> Self {
        self.clone_of = Some(parent.into());
        self
    }

    #[must_use]
    pub fn rom_of(mut self, parent: impl Into<String>) -> Self {
        self.rom_of = Some(parent.into());
        self
    }

    /// `true` when this unit is a clone of, or borrows roms from, `parent`.
    pub fn derives_from(&self, parent: &str) -> bool {
        self.clone_of.as_deref() == Some(parent) || self.rom_of.as_deref() == Some(parent)
    }
}

/// Discriminant of [`ItemKind`], used where only the variant matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemVariant {
    File,
    DiskImage,
    Sample,
    Release,
    BiosSet,
    ArchiveRef,
}

impl fmt::Display for ItemVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemVariant::File => write!(f, "file"),
            ItemVariant::DiskImage => write!(f, "disk_image"),
            ItemVariant::Sample => write!(f, "sample"),
            ItemVariant::Release => write!(f, "release"),
            ItemVariant::BiosSet => write!(f, "bios_set"),
            ItemVariant::ArchiveRef => write!(f, "archive_ref"),
        }
    }
}

/// Variant-specific payload. The derived order is by variant, then fields.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemKind {
    File {
        size: i64,
        #[serde(default)]
        digests: DigestSet,
        #[serde(default)]
        status: ItemStatus,
    },
    DiskImage {
        #[serde(default, deserialize_with = "disk_image_digests")]
        digests: DigestSet,
        #[serde(default)]
        status: ItemStatus,
    },
    Sample,
    Release {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        region: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        date: Option<String>,
        #[serde(default, rename = "default")]
        is_default: bool,
    },
    BiosSet {
        #[serde(default)]
        description: String,
        #[serde(default, rename = "default")]
        is_default: bool,
    },
    ArchiveRef,
}

/// Digest classes a disk image carries; anything else is dropped.
pub const DISK_IMAGE_CLASSES: &[DigestKind] = &[DigestKind::Md5, DigestKind::Sha1];

fn disk_image_digests<'de, D>(deserializer: D) -> Result<DigestSet, D::Error>
where
    D: Deserializer<'de>,
{
    DigestSet::deserialize(deserializer).map(|set| set.restricted_to(DISK_IMAGE_CLASSES))
}

/// A cataloged entity: one logical file, disk, sample, release, bios set or
/// archive reference, owned by a unit and tagged with its provenance.
///
/// `Ord` compares every field, so sorting by it never depends on input order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub unit: Unit,
    #[serde(default)]
    pub provenance: Provenance,
    #[serde(default, skip_serializing_if = "DupeType::is_none")]
    pub dupe_type: DupeType,
    #[serde(flatten)]
    pub kind: ItemKind,
}

impl Item {
    fn with_kind(name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            name: name.into(),
            unit: Unit::default(),
            provenance: Provenance::default(),
            dupe_type: DupeType::None,
            kind,
        }
    }

    pub fn file(name: impl Into<String>, size: i64, digests: DigestSet) -> Self {
        Self::with_kind(
            name,
            ItemKind::File {
                size,
                digests,
                status: ItemStatus::None,
            },
        )
    }

    pub fn disk_image(name: impl Into<String>, digests: &DigestSet) -> Self {
        Self::with_kind(
            name,
            ItemKind::DiskImage {
                digests: digests.restricted_to(DISK_IMAGE_CLASSES),
                status: ItemStatus::None,
            },
        )
    }

    pub fn sample(name: impl Into<String>) -> Self {
        Self::with_kind(name, ItemKind::Sample)
    }

    pub fn release(
        name: impl Into<String>,
        region: Option<String>,
        language: Option<String>,
        date: Option<String>,
        is_default: bool,
    ) -> Self {
        Self::with_kind(
            name,
            ItemKind::Release {
                region,
                language,
                date,
                is_default,
            },
        )
    }

    pub fn bios_set(name: impl Into<String>, description: impl Into<String>, is_default: bool) -> Self {
        Self::with_kind(
            name,
            ItemKind::BiosSet {
                description: description.into(),
                is_default,
            },
        )
    }

    pub fn archive_ref(name: impl Into<String>) -> Self {
        Self::with_kind(name, ItemKind::ArchiveRef)
    }

    /// The sentinel entry marking a unit that intentionally has no real files.
    pub fn placeholder(unit: Unit, provenance: Provenance) -> Self {
        Self::file(PLACEHOLDER_NAME, UNKNOWN_SIZE, DigestSet::default())
            .with_unit(unit)
            .with_provenance(provenance)
    }

    #[must_use]
    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    #[must_use]
    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = provenance;
        self
    }

    /// Set the dump status. No effect on variants that carry no status.
    #[must_use]
    pub fn with_status(mut self, new_status: ItemStatus) -> Self {
        if let ItemKind::File { status, .. } | ItemKind::DiskImage { status, .. } = &mut self.kind {
            *status = new_status;
        }
        self
    }

    pub fn variant(&self) -> ItemVariant {
        match self.kind {
            ItemKind::File { .. } => ItemVariant::File,
            ItemKind::DiskImage { .. } => ItemVariant::DiskImage,
            ItemKind::Sample => ItemVariant::Sample,
            ItemKind::Release { .. } => ItemVariant::Release,
            ItemKind::BiosSet { .. } => ItemVariant::BiosSet,
            ItemKind::ArchiveRef => ItemVariant::ArchiveRef,
        }
    }

    /// Size in bytes, or [`UNKNOWN_SIZE`] for variants without one.
    pub fn size(&self) -> i64 {
        match self.kind {
            ItemKind::File { size, .. } => size,
            _ => UNKNOWN_SIZE,
        }
    }

    pub fn digests(&self) -> Option<&DigestSet> {
        match &self.kind {
            ItemKind::File { digests, .. } | ItemKind::DiskImage { digests, .. } => Some(digests),
            _ => None,
        }
    }

    /// Digest classes this variant participates with.
    pub fn digest_classes(&self) -> &'static [DigestKind] {
        match self.kind {
            ItemKind::File { .. } => &DigestKind::ALL,
            ItemKind::DiskImage { .. } => DISK_IMAGE_CLASSES,
            _ => &[],
        }
    }

    pub fn status(&self) -> ItemStatus {
        match self.kind {
            ItemKind::File { status, .. } | ItemKind::DiskImage { status, .. } => status,
            _ => ItemStatus::None,
        }
    }

    pub fn is_nodump(&self) -> bool {
        self.status() == ItemStatus::Nodump
    }

    pub fn has_digests(&self) -> bool {
        self.digests().is_some_and(|d| !d.is_empty())
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.kind, ItemKind::File { size: UNKNOWN_SIZE, .. })
            && self.name == PLACEHOLDER_NAME
            && !self.has_digests()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::Digest;

    fn crc(text: &str) -> DigestSet {
        DigestSet::default().with(
            DigestKind::Crc32,
            Digest::parse(DigestKind::Crc32, text).unwrap().unwrap(),
        )
    }

    #[test]
    fn dupe_type_classification_table() {
        assert_eq!(DupeType::classify(true, true), DupeType::ExternalAll);
        assert_eq!(DupeType::classify(true, false), DupeType::ExternalHash);
        assert_eq!(DupeType::classify(false, true), DupeType::InternalAll);
        assert_eq!(DupeType::classify(false, false), DupeType::InternalHash);
        assert!(DupeType::ExternalHash.is_external());
        assert!(!DupeType::InternalAll.is_external());
    }

    #[test]
    fn provenance_ranking_uses_system_then_source() {
        assert!(Provenance::new(1, 9).outranks(&Provenance::new(2, 0)));
        assert!(Provenance::new(1, 0).outranks(&Provenance::new(1, 1)));
        assert!(!Provenance::new(1, 1).outranks(&Provenance::new(1, 1)));
    }

    #[test]
    fn disk_image_has_no_size_and_limited_classes() {
        let digests = crc("deadbeef").with(
            DigestKind::Sha1,
            Digest::parse(DigestKind::Sha1, "1").unwrap().unwrap(),
        );
        let disk = Item::disk_image("disk", &digests);
        assert_eq!(disk.size(), UNKNOWN_SIZE);
        let kept = disk.digests().unwrap();
        assert!(kept.crc32.is_none());
        assert!(kept.sha1.is_some());
    }

    #[test]
    fn placeholder_detection() {
        let blank = Item::placeholder(Unit::new("game"), Provenance::new(1, 0));
        assert!(blank.is_placeholder());
        assert!(!Item::file("null", 0, DigestSet::default()).is_placeholder());
        assert!(!Item::file("null", UNKNOWN_SIZE, crc("1")).is_placeholder());
    }

    #[test]
    fn status_only_applies_to_dump_variants() {
        let sample = Item::sample("boom").with_status(ItemStatus::Nodump);
        assert_eq!(sample.status(), ItemStatus::None);
        let file = Item::file("a.bin", 1, DigestSet::default()).with_status(ItemStatus::Nodump);
        assert!(file.is_nodump());
    }

    #[test]
    fn unit_parent_relationships() {
        let clone = Unit::new("sf2ce").clone_of("sf2");
        assert!(clone.derives_from("sf2"));
        assert!(!clone.derives_from("sf2ua"));
        assert!(Unit::new("x").rom_of("neogeo").derives_from("neogeo"));
    }

    #[test]
    fn json_shape_is_flat_and_tagged() {
        let item = Item::file("file.bin", 100, crc("deadbeef"))
            .with_unit(Unit::new("game1"))
            .with_provenance(Provenance::new(1, 2));
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "file");
        assert_eq!(json["size"], 100);
        assert_eq!(json["digests"]["crc32"], "deadbeef");
        assert_eq!(json["unit"]["name"], "game1");
        assert!(json.get("dupe_type").is_none());

        let back: Item = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn parses_minimal_json_items() {
        let items: Vec<Item> = serde_json::from_str(
            r#"[
                {"type":"disk_image","name":"hdd","unit":{"name":"pc"},"status":"nodump"},
                {"type":"sample","name":"boom","unit":{"name":"pc"}},
                {"type":"release","name":"Game (Europe)","unit":{"name":"pc"},"region":"EUR","default":true}
            ]"#,
        )
        .unwrap();
        assert_eq!(items[0].variant(), ItemVariant::DiskImage);
        assert!(items[0].is_nodump());
        assert_eq!(items[1].variant(), ItemVariant::Sample);
        assert!(matches!(
            items[2].kind,
            ItemKind::Release { is_default: true, .. }
        ));
        assert_eq!(items[2].provenance, Provenance::default());
    }

    #[test]
    fn parsed_disk_image_drops_foreign_classes() {
        let item: Item = serde_json::from_str(
            r#"{"type":"disk_image","name":"hdd","unit":{"name":"pc"},
                "digests":{"crc32":"11111111","sha256":"ab","sha1":"ab"}}"#,
        )
        .unwrap();
        let digests = item.digests().unwrap();
        assert!(digests.crc32.is_none());
        assert!(digests.sha256.is_none());
        assert_eq!(digests.sha1.as_ref().unwrap().to_hex(), format!("{}ab", "0".repeat(38)));

        let file: Item = serde_json::from_str(
            r#"{"type":"file","name":"a","unit":{"name":"pc"},"size":1,"digests":{"crc32":"1"}}"#,
        )
        .unwrap();
        assert!(file.digests().unwrap().crc32.is_some());
    }

    #[test]
    fn item_order_covers_variant_payloads() {
        let eur = Item::release("Game", Some("EUR".into()), None, None, false);
        let usa = Item::release("Game", Some("USA".into()), None, None, false);
        assert_eq!(eur.cmp(&usa), std::cmp::Ordering::Less);

        let described = Item::sample("boom").with_unit(Unit::new("pc").with_description("PC"));
        let bare = Item::sample("boom").with_unit(Unit::new("pc"));
        assert_ne!(described.cmp(&bare), std::cmp::Ordering::Equal);
    }
}
