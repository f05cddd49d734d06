//! Click-to-sort tables
//!
//! Each header click flips the table between ascending and descending
//! order on that column. Rows are compared on the trimmed text of the
//! sorted cell using [`crate::collate::compare`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::collate;

/// Direction of the last sort applied to a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Order for the next click: descending only right after ascending
    pub fn toggled(previous: Option<SortOrder>) -> SortOrder {
        match previous {
            Some(SortOrder::Asc) => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }

    /// Parse a stored `data-sort-order` value; anything unknown counts as unset
    pub fn parse_stored(value: Option<&str>) -> Option<SortOrder> {
        value.and_then(|v| v.parse().ok())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order '{}'", other)),
        }
    }
}

/// A table row, as far as sorting cares: the text of each cell
pub trait Row {
    fn cell(&self, index: usize) -> Option<&str>;
}

impl Row for Vec<String> {
    fn cell(&self, index: usize) -> Option<&str> {
        self.get(index).map(String::as_str)
    }
}

impl Row for Vec<&str> {
    fn cell(&self, index: usize) -> Option<&str> {
        self.get(index).copied()
    }
}

impl<const N: usize> Row for [&str; N] {
    fn cell(&self, index: usize) -> Option<&str> {
        self.get(index).copied()
    }
}

/// Position of the first header whose sort key is `key`.
///
/// Headers without a sort key never match.
pub fn column_index<S: AsRef<str>>(header_keys: &[Option<S>], key: &str) -> Option<usize> {
    header_keys
        .iter()
        .position(|h| matches!(h, Some(k) if k.as_ref() == key))
}

/// Result of one sort request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOutcome<R> {
    pub rows: Vec<R>,
    /// Order to store on the table; unchanged when the key was not found
    pub order: Option<SortOrder>,
}

/// New row order (as indices into `rows`) for a click on `column_key`.
///
/// Returns `None` when no header carries that key.
pub fn sort_permutation<R: Row, S: AsRef<str>>(
    rows: &[R],
    column_key: &str,
    header_keys: &[Option<S>],
    previous: Option<SortOrder>,
) -> Option<(Vec<usize>, SortOrder)> {
    let Some(column) = column_index(header_keys, column_key) else {
        tracing::debug!(column_key, "Sort key not found among table headers");
        return None;
    };

    let order = SortOrder::toggled(previous);
    let texts: Vec<&str> = rows
        .iter()
        .map(|row| row.cell(column).unwrap_or("").trim())
        .collect();

    let mut indices: Vec<usize> = (0..rows.len()).collect();
    // sort_by is stable: equal texts keep their current relative order
    indices.sort_by(|&a, &b| {
        let ord = collate::compare(texts[a], texts[b]);
        match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });

    Some((indices, order))
}

/// Sort `rows` for a click on `column_key`.
///
/// An unknown key leaves both the rows and the order untouched.
pub fn sort_rows<R: Row, S: AsRef<str>>(
    rows: Vec<R>,
    column_key: &str,
    header_keys: &[Option<S>],
    previous: Option<SortOrder>,
) -> SortOutcome<R> {
    match sort_permutation(&rows, column_key, header_keys, previous) {
        Some((indices, order)) => SortOutcome {
            rows: reorder(rows, &indices),
            order: Some(order),
        },
        None => SortOutcome {
            rows,
            order: previous,
        },
    }
}

fn reorder<R>(rows: Vec<R>, indices: &[usize]) -> Vec<R> {
    let mut slots: Vec<Option<R>> = rows.into_iter().map(Some).collect();
    indices.iter().filter_map(|&i| slots[i].take()).collect()
}

/// Column header of a sortable table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    pub label: String,
    /// `data-sort` key; headers without one are not clickable
    pub sort_key: Option<String>,
}

impl Header {
    pub fn sortable(label: impl Into<String>, sort_key: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            sort_key: Some(sort_key.into()),
        }
    }

    pub fn plain(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            sort_key: None,
        }
    }
}

/// A table that remembers the direction of its last sort
#[derive(Debug, Clone)]
pub struct SortableTable<R> {
    headers: Vec<Header>,
    rows: Vec<R>,
    last_sort_order: Option<SortOrder>,
}

impl<R: Row> SortableTable<R> {
    pub fn new(headers: Vec<Header>, rows: Vec<R>) -> Self {
        Self {
            headers,
            rows,
            last_sort_order: None,
        }
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn last_sort_order(&self) -> Option<SortOrder> {
        self.last_sort_order
    }

    /// Keys of the headers that can be clicked
    pub fn sort_keys(&self) -> impl Iterator<Item = &str> {
        self.headers.iter().filter_map(|h| h.sort_key.as_deref())
    }

    /// Handle a header click. Returns `false` if no header has `key`.
    pub fn sort_by(&mut self, key: &str) -> bool {
        let header_keys: Vec<Option<&str>> =
            self.headers.iter().map(|h| h.sort_key.as_deref()).collect();

        match sort_permutation(&self.rows, key, &header_keys, self.last_sort_order) {
            Some((indices, order)) => {
                let rows = std::mem::take(&mut self.rows);
                self.rows = reorder(rows, &indices);
                self.last_sort_order = Some(order);
                true
            }
            None => false,
        }
    }

    pub fn into_rows(self) -> Vec<R> {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn keys() -> Vec<Option<&'static str>> {
        vec![Some("title"), None, Some("year")]
    }

    #[test]
    fn test_toggle() {
        assert_eq!(SortOrder::toggled(None), SortOrder::Asc);
        assert_eq!(SortOrder::toggled(Some(SortOrder::Asc)), SortOrder::Desc);
        assert_eq!(SortOrder::toggled(Some(SortOrder::Desc)), SortOrder::Asc);
    }

    #[test]
    fn test_parse_stored() {
        assert_eq!(SortOrder::parse_stored(Some("asc")), Some(SortOrder::Asc));
        assert_eq!(SortOrder::parse_stored(Some("desc")), Some(SortOrder::Desc));
        assert_eq!(SortOrder::parse_stored(Some("sideways")), None);
        assert_eq!(SortOrder::parse_stored(None), None);
    }

    #[test]
    fn test_column_index_skips_unkeyed_headers() {
        assert_eq!(column_index(&keys(), "year"), Some(2));
        assert_eq!(column_index(&keys(), "artist"), None);
        assert_eq!(column_index(&[Some("a"), Some("a")], "a"), Some(0));
    }

    #[test]
    fn test_numeric_sort_then_reverse() {
        let rows = vec![["A", "x", "10"], ["B", "x", "2"], ["C", "x", "1"]];

        let asc = sort_rows(rows, "year", &keys(), None);
        assert_eq!(asc.order, Some(SortOrder::Asc));
        let years: Vec<&str> = asc.rows.iter().map(|r| r[2]).collect();
        assert_eq!(years, vec!["1", "2", "10"]);

        let desc = sort_rows(asc.rows, "year", &keys(), asc.order);
        assert_eq!(desc.order, Some(SortOrder::Desc));
        let years: Vec<&str> = desc.rows.iter().map(|r| r[2]).collect();
        assert_eq!(years, vec!["10", "2", "1"]);
    }

    #[test]
    fn test_unknown_key_is_noop() {
        let rows = vec![["b", "", "2"], ["a", "", "1"]];
        let outcome = sort_rows(rows.clone(), "missing", &keys(), Some(SortOrder::Asc));
        assert_eq!(outcome.rows, rows);
        assert_eq!(outcome.order, Some(SortOrder::Asc));
    }

    #[test]
    fn test_cells_are_trimmed_and_missing_cells_sort_empty() {
        let rows: Vec<Vec<String>> = vec![
            vec!["  나무 ".to_string()],
            vec![],
            vec!["가을".to_string()],
        ];
        let (indices, _) = sort_permutation(&rows, "title", &[Some("title")], None).unwrap();
        assert_eq!(indices, vec![1, 2, 0]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let rows = vec![["same", "1"], ["other", "2"], ["same", "3"]];
        let outcome = sort_rows(rows, "k", &[Some("k"), None], None);
        let ids: Vec<&str> = outcome.rows.iter().map(|r| r[1]).collect();
        assert_eq!(ids, vec!["2", "1", "3"]);
    }

    #[test]
    fn test_sortable_table_tracks_order() {
        let mut table = SortableTable::new(
            vec![Header::sortable("작품명", "title"), Header::plain("작가")],
            vec![vec!["하늘", "김"], vec!["가을", "이"], vec!["나무", "박"]],
        );
        assert_eq!(table.sort_keys().collect::<Vec<_>>(), vec!["title"]);

        assert!(table.sort_by("title"));
        assert_eq!(table.last_sort_order(), Some(SortOrder::Asc));
        assert_eq!(table.rows()[0][0], "가을");

        assert!(table.sort_by("title"));
        assert_eq!(table.last_sort_order(), Some(SortOrder::Desc));
        assert_eq!(table.rows()[0][0], "하늘");

        assert!(!table.sort_by("작가"));
        assert_eq!(table.last_sort_order(), Some(SortOrder::Desc));
    }
}
