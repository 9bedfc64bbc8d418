use crate::normalize::{normalize_digest_text, DigestError};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// The digest classes a catalog entry can carry.
///
/// Declaration order is significant: it is the canonical scan order used by
/// merge sorting and coarse-key derivation (fast digest first, then the
/// secure digests from shortest to longest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigestKind {
    Crc32,
    Md5,
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl DigestKind {
    pub const ALL: [DigestKind; 6] = [
        DigestKind::Crc32,
        DigestKind::Md5,
        DigestKind::Sha1,
        DigestKind::Sha256,
        DigestKind::Sha384,
        DigestKind::Sha512,
    ];

    /// Width of the digest in raw bytes.
    pub fn byte_len(self) -> usize {
        match self {
            DigestKind::Crc32 => 4,
            DigestKind::Md5 => 16,
            DigestKind::Sha1 => 20,
            DigestKind::Sha256 => 32,
            DigestKind::Sha384 => 48,
            DigestKind::Sha512 => 64,
        }
    }

    /// Width of the digest in lowercase hex characters.
    pub fn hex_len(self) -> usize {
        self.byte_len() * 2
    }
}

impl fmt::Display for DigestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigestKind::Crc32 => write!(f, "crc32"),
            DigestKind::Md5 => write!(f, "md5"),
            DigestKind::Sha1 => write!(f, "sha1"),
            DigestKind::Sha256 => write!(f, "sha256"),
            DigestKind::Sha384 => write!(f, "sha384"),
            DigestKind::Sha512 => write!(f, "sha512"),
        }
    }
}

/// A fixed-width digest value. Comparison is bytewise, which matches ordinal
/// comparison of the normalized lowercase hex form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digest(Vec<u8>);

impl Digest {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Parse and normalize hex text for the given class.
    ///
    /// Returns `Ok(None)` for text that denotes "unknown" (empty, `-`, `null`).
    pub fn parse(kind: DigestKind, text: &str) -> Result<Option<Self>, DigestError> {
        let Some(hex_text) = normalize_digest_text(kind, text)? else {
            return Ok(None);
        };
        let bytes = hex::decode(&hex_text).map_err(|_| DigestError::InvalidHex {
            kind,
            value: text.to_owned(),
        })?;
        Ok(Some(Self(bytes)))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Independently-optional digests for one item. Absence means "unknown".
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDigestSet")]
pub struct DigestSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crc32: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub md5: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha1: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha384: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha512: Option<Digest>,
}

impl DigestSet {
    pub fn get(&self, kind: DigestKind) -> Option<&Digest> {
        match kind {
            DigestKind::Crc32 => self.crc32.as_ref(),
            DigestKind::Md5 => self.md5.as_ref(),
            DigestKind::Sha1 => self.sha1.as_ref(),
            DigestKind::Sha256 => self.sha256.as_ref(),
            DigestKind::Sha384 => self.sha384.as_ref(),
            DigestKind::Sha512 => self.sha512.as_ref(),
        }
    }

    fn slot_mut(&mut self, kind: DigestKind) -> &mut Option<Digest> {
        match kind {
            DigestKind::Crc32 => &mut self.crc32,
            DigestKind::Md5 => &mut self.md5,
            DigestKind::Sha1 => &mut self.sha1,
            DigestKind::Sha256 => &mut self.sha256,
            DigestKind::Sha384 => &mut self.sha384,
            DigestKind::Sha512 => &mut self.sha512,
        }
    }

    #[must_use]
    pub fn with(mut self, kind: DigestKind, digest: Digest) -> Self {
        *self.slot_mut(kind) = Some(digest);
        self
    }

    /// Parse one class from text and set it. Unknown text leaves the class absent.
    pub fn set_hex(&mut self, kind: DigestKind, text: &str) -> Result<(), DigestError> {
        *self.slot_mut(kind) = Digest::parse(kind, text)?;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        DigestKind::ALL.iter().all(|k| self.get(*k).is_none())
    }

    /// Present classes in canonical order.
    pub fn present(&self) -> impl Iterator<Item = (DigestKind, &Digest)> + '_ {
        DigestKind::ALL
            .into_iter()
            .filter_map(move |k| self.get(k).map(|d| (k, d)))
    }

    /// First present class in canonical order.
    pub fn primary(&self) -> Option<(DigestKind, &Digest)> {
        self.present().next()
    }

    /// Classes present on both sides.
    pub fn mutual_classes<'a>(&'a self, other: &'a Self) -> impl Iterator<Item = DigestKind> + 'a {
        DigestKind::ALL
            .into_iter()
            .filter(move |k| self.get(*k).is_some() && other.get(*k).is_some())
    }

    /// Copy in every class absent here but present in `other`. Present classes
    /// are never overwritten.
    #[must_use]
    pub fn backfilled(&self, other: &Self) -> Self {
        let mut out = self.clone();
        for kind in DigestKind::ALL {
            let slot = out.slot_mut(kind);
            if slot.is_none() {
                *slot = other.get(kind).cloned();
            }
        }
        out
    }

    /// Drop every class outside `kinds`.
    #[must_use]
    pub fn restricted_to(&self, kinds: &[DigestKind]) -> Self {
        let mut out = Self::default();
        for (kind, digest) in self.present() {
            if kinds.contains(&kind) {
                *out.slot_mut(kind) = Some(digest.clone());
            }
        }
        out
    }

    /// Sort key in canonical class order; absent sorts before present.
    pub fn sort_key(&self) -> [Option<&Digest>; 6] {
        DigestKind::ALL.map(|k| self.get(k))
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDigestSet {
    #[serde(default)]
    crc32: Option<String>,
    #[serde(default)]
    md5: Option<String>,
    #[serde(default)]
    sha1: Option<String>,
    #[serde(default)]
    sha256: Option<String>,
    #[serde(default)]
    sha384: Option<String>,
    #[serde(default)]
    sha512: Option<String>,
}

impl TryFrom<RawDigestSet> for DigestSet {
    type Error = DigestError;

    fn try_from(raw: RawDigestSet) -> Result<Self, Self::Error> {
        let mut out = DigestSet::default();
        let fields = [
            (DigestKind::Crc32, raw.crc32),
            (DigestKind::Md5, raw.md5),
            (DigestKind::Sha1, raw.sha1),
            (DigestKind::Sha256, raw.sha256),
            (DigestKind::Sha384, raw.sha384),
            (DigestKind::Sha512, raw.sha512),
        ];
        for (kind, value) in fields {
            if let Some(text) = value {
                out.set_hex(kind, &text)?;
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digest(kind: DigestKind, text: &str) -> Digest {
        Digest::parse(kind, text).unwrap().unwrap()
    }

    #[test]
    fn backfill_never_overwrites_present_classes() {
        let a = DigestSet::default()
            .with(DigestKind::Crc32, digest(DigestKind::Crc32, "deadbeef"))
            .with(DigestKind::Md5, digest(DigestKind::Md5, &"a".repeat(32)));
        let b = DigestSet::default()
            .with(DigestKind::Md5, digest(DigestKind::Md5, &"b".repeat(32)))
            .with(DigestKind::Sha1, digest(DigestKind::Sha1, &"c".repeat(40)));

        let merged = a.backfilled(&b);
        assert_eq!(merged.md5, a.md5);
        assert_eq!(merged.sha1, b.sha1);
        assert_eq!(merged.crc32, a.crc32);
        assert!(merged.sha256.is_none());
    }

    #[test]
    fn mutual_classes_only_lists_shared_presence() {
        let a = DigestSet::default()
            .with(DigestKind::Crc32, digest(DigestKind::Crc32, "1"))
            .with(DigestKind::Md5, digest(DigestKind::Md5, "2"));
        let b = DigestSet::default()
            .with(DigestKind::Crc32, digest(DigestKind::Crc32, "1"))
            .with(DigestKind::Sha1, digest(DigestKind::Sha1, "3"));
        let mutual: Vec<_> = a.mutual_classes(&b).collect();
        assert_eq!(mutual, vec![DigestKind::Crc32]);
    }

    #[test]
    fn primary_follows_canonical_order() {
        let set = DigestSet::default()
            .with(DigestKind::Sha1, digest(DigestKind::Sha1, "3"))
            .with(DigestKind::Md5, digest(DigestKind::Md5, "2"));
        assert_eq!(set.primary().map(|(k, _)| k), Some(DigestKind::Md5));
        assert!(DigestSet::default().primary().is_none());
    }

    #[test]
    fn restricted_to_drops_other_classes() {
        let set = DigestSet::default()
            .with(DigestKind::Crc32, digest(DigestKind::Crc32, "1"))
            .with(DigestKind::Sha1, digest(DigestKind::Sha1, "3"));
        let only_sha1 = set.restricted_to(&[DigestKind::Md5, DigestKind::Sha1]);
        assert!(only_sha1.crc32.is_none());
        assert!(only_sha1.sha1.is_some());
    }

    #[test]
    fn serializes_as_lowercase_hex_and_skips_absent() {
        let set = DigestSet::default().with(DigestKind::Crc32, digest(DigestKind::Crc32, "DEADBEEF"));
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"{"crc32":"deadbeef"}"#);
    }

    #[test]
    fn deserialize_normalizes_width_and_case() {
        let set: DigestSet = serde_json::from_str(r#"{"crc32":"ABC","md5":"null"}"#).unwrap();
        assert_eq!(set.crc32.unwrap().to_hex(), "00000abc");
        assert!(set.md5.is_none());
    }

    #[test]
    fn deserialize_rejects_bad_hex() {
        let result: Result<DigestSet, _> = serde_json::from_str(r#"{"sha1":"xyz"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn hex_order_matches_byte_order() {
        let lo = digest(DigestKind::Crc32, "0000ffff");
        let hi = digest(DigestKind::Crc32, "00010000");
        assert!(lo < hi);
        assert!(lo.to_hex() < hi.to_hex());
    }
}
