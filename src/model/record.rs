//! Author record and sort key definitions

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

/// A single author entry as served by the data source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: i64,
    pub author: String,
    pub signature_status: String,
    pub signature_date: String,
}

impl Record {
    pub fn new(
        id: i64,
        author: impl Into<String>,
        signature_status: impl Into<String>,
        signature_date: impl Into<String>,
    ) -> Self {
        Self {
            id,
            author: author.into(),
            signature_status: signature_status.into(),
            signature_date: signature_date.into(),
        }
    }

    /// Lowercased concatenation of all four fields, used for filtering
    pub fn search_text(&self) -> String {
        format!(
            "{}{}{}{}",
            self.id, self.author, self.signature_status, self.signature_date
        )
        .to_lowercase()
    }
}

/// Column a table can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Id,
    Author,
    SignatureStatus,
    SignatureDate,
}

impl SortKey {
    pub fn all() -> [SortKey; 4] {
        [
            SortKey::Id,
            SortKey::Author,
            SortKey::SignatureStatus,
            SortKey::SignatureDate,
        ]
    }

    /// Column header label
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Id => "Id",
            SortKey::Author => "Author",
            SortKey::SignatureStatus => "Signature Status",
            SortKey::SignatureDate => "Signature Date",
        }
    }

    /// Field name as it appears in the JSON payload
    pub fn field_name(&self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::Author => "author",
            SortKey::SignatureStatus => "signatureStatus",
            SortKey::SignatureDate => "signatureDate",
        }
    }

    /// Accessor for the field this key sorts on
    pub fn value<'a>(&self, record: &'a Record) -> Cow<'a, str> {
        match self {
            SortKey::Id => Cow::Owned(record.id.to_string()),
            SortKey::Author => Cow::Borrowed(&record.author),
            SortKey::SignatureStatus => Cow::Borrowed(&record.signature_status),
            SortKey::SignatureDate => Cow::Borrowed(&record.signature_date),
        }
    }

    /// Next key in column order, `None` after the last column
    pub fn next(current: Option<SortKey>) -> Option<SortKey> {
        let keys = SortKey::all();
        match current {
            None => Some(keys[0]),
            Some(key) => {
                let idx = keys.iter().position(|k| *k == key).unwrap_or(0);
                keys.get(idx + 1).copied()
            }
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.field_name())
    }
}

/// Sort direction; `None` means the filtered order is kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    Desc,
    #[default]
    None,
}

impl SortDirection {
    /// Cycle asc -> desc -> none -> asc
    pub fn cycle(&self) -> SortDirection {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::None,
            SortDirection::None => SortDirection::Asc,
        }
    }

    pub fn indicator(&self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
            SortDirection::None => "",
        }
    }
}

/// Active sort column and direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub active: Option<SortKey>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(active: Option<SortKey>, direction: SortDirection) -> Self {
        Self { active, direction }
    }

    /// Whether sorting changes the order at all
    pub fn is_active(&self) -> bool {
        self.active.is_some() && self.direction != SortDirection::None
    }

    /// Compare two records under this sort state
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        let Some(key) = self.active else {
            return Ordering::Equal;
        };
        let ordering = compare_values(&key.value(a), &key.value(b));
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
            SortDirection::None => Ordering::Equal,
        }
    }
}

/// Numeric reading of a cell. Blank text counts as zero.
fn as_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Numeric comparison when both operands parse as finite numbers,
/// lexicographic string comparison when neither does.
///
/// A number always orders before a non-numeric string, which keeps this a
/// total order for columns that mix both.
pub fn compare_values(a: &str, b: &str) -> Ordering {
    match (as_number(a), as_number(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}
