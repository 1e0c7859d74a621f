//! Field identity.
//!
//! Field ids are strings on the wire (`"text_3"`, `"invoice_total"`) and
//! interned handles in memory. Interned strings are never freed, which
//! bounds memory by the number of distinct ids an editing process sees;
//! new ids come from a per-template [`IdAllocator`] rather than a global
//! counter, so that number grows only with fields actually created.

use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Interned field id: `Copy`, and compares in O(1).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldId(Spur);

impl FieldId {
    pub fn intern(s: &str) -> Self {
        FieldId(INTERNER.get_or_intern(s))
    }

    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// The numeric suffix of a generated-style id: `qr_code_12` -> 12.
    fn sequence(&self) -> Option<u64> {
        let (_, tail) = self.as_str().rsplit_once('_')?;
        if tail.is_empty() || !tail.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        tail.parse().ok()
    }
}

impl fmt::Debug for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(FieldId::intern(&s))
    }
}

/// Hands out `<prefix>_<n>` ids for one template.
///
/// Seeded past the largest numeric suffix already in use, so a generated
/// id can never equal an existing one: any existing `<p>_<m>` has `m` below
/// the next sequence number, and ids without a numeric suffix cannot
/// match the generated shape.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn seeded<'a>(existing: impl IntoIterator<Item = &'a FieldId>) -> Self {
        let next = existing
            .into_iter()
            .filter_map(FieldId::sequence)
            .max()
            .map_or(0, |n| n.saturating_add(1));
        Self { next }
    }

    pub fn allocate(&mut self, prefix: &str) -> FieldId {
        let n = self.next;
        self.next += 1;
        FieldId::intern(&format!("{prefix}_{n}"))
    }
}
