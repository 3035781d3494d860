//! Filter rows for a unit.
//!
//! While a unit is being edited its filter list may hold blank rows (the
//! technician adds a row, then types into it). Blank rows are dropped by
//! [`FilterList::compact`] when the draft is committed, so a committed
//! [`UnitRecord`](super::UnitRecord) never carries one.

use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// One replacement-filter entry: a size like `20x20x1` and how many.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterEntry {
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub quantity: String,
}

impl FilterEntry {
    pub fn new(size: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            size: size.into(),
            quantity: quantity.into(),
        }
    }

    /// Both size and quantity are filled in.
    pub fn is_complete(&self) -> bool {
        !self.size.trim().is_empty() && !self.quantity.trim().is_empty()
    }

    /// Report line, e.g. `2x - 20x20x1`.
    pub fn display_line(&self) -> String {
        format!("{}x - {}", self.quantity, self.size)
    }
}

/// Editable field of a filter row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Size,
    Quantity,
}

/// Ordered, editable list of filter rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterList {
    rows: Vec<FilterEntry>,
}

impl FilterList {
    pub fn new() -> Self {
        Self::default()
    }

    /// A list holding a single blank row, as a fresh unit form starts.
    pub fn with_blank_row() -> Self {
        let mut list = Self::new();
        list.add_row();
        list
    }

    /// Append an empty row.
    pub fn add_row(&mut self) {
        self.rows.push(FilterEntry::default());
    }

    /// Set one field of the row at `index`.
    pub fn edit_row(
        &mut self,
        index: usize,
        field: FilterField,
        value: impl Into<String>,
    ) -> Result<(), ReportError> {
        let len = self.rows.len();
        let row = self
            .rows
            .get_mut(index)
            .ok_or(ReportError::FilterIndex { index, len })?;
        match field {
            FilterField::Size => row.size = value.into(),
            FilterField::Quantity => row.quantity = value.into(),
        }
        Ok(())
    }

    /// Remove the row at `index`; later rows shift left.
    pub fn remove_row(&mut self, index: usize) -> Result<FilterEntry, ReportError> {
        if index >= self.rows.len() {
            return Err(ReportError::FilterIndex {
                index,
                len: self.rows.len(),
            });
        }
        Ok(self.rows.remove(index))
    }

    /// Complete rows only, in their original order.
    pub fn compact(&self) -> Vec<FilterEntry> {
        self.rows
            .iter()
            .filter(|row| row.is_complete())
            .cloned()
            .collect()
    }

    pub fn rows(&self) -> &[FilterEntry] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<Vec<FilterEntry>> for FilterList {
    fn from(rows: Vec<FilterEntry>) -> Self {
        Self { rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_row_appends_blank() {
        let mut list = FilterList::new();
        list.add_row();
        list.add_row();
        assert_eq!(list.len(), 2);
        assert!(list.rows().iter().all(|r| *r == FilterEntry::default()));
    }

    #[test]
    fn test_edit_row() {
        let mut list = FilterList::with_blank_row();
        list.edit_row(0, FilterField::Size, "20x20x1").unwrap();
        list.edit_row(0, FilterField::Quantity, "2").unwrap();
        assert_eq!(list.rows()[0], FilterEntry::new("20x20x1", "2"));
    }

    #[test]
    fn test_edit_row_out_of_range() {
        let mut list = FilterList::with_blank_row();
        let err = list.edit_row(3, FilterField::Size, "16x25x2").unwrap_err();
        assert!(matches!(err, ReportError::FilterIndex { index: 3, len: 1 }));
    }

    #[test]
    fn test_remove_row_shifts_left() {
        let mut list = FilterList::from(vec![
            FilterEntry::new("a", "1"),
            FilterEntry::new("b", "2"),
            FilterEntry::new("c", "3"),
        ]);
        let removed = list.remove_row(1).unwrap();
        assert_eq!(removed.size, "b");
        assert_eq!(list.rows()[0].size, "a");
        assert_eq!(list.rows()[1].size, "c");
        assert!(list.remove_row(2).is_err());
    }

    #[test]
    fn test_compact_drops_blank_rows_and_keeps_order() {
        let list = FilterList::from(vec![
            FilterEntry::new("20x20x1", "2"),
            FilterEntry::new("", "4"),
            FilterEntry::new("16x25x1", ""),
            FilterEntry::default(),
            FilterEntry::new("   ", "1"),
            FilterEntry::new("24x24x2", "6"),
        ]);
        let compacted = list.compact();
        assert_eq!(
            compacted,
            vec![
                FilterEntry::new("20x20x1", "2"),
                FilterEntry::new("24x24x2", "6"),
            ]
        );
        // Compaction never touches the editable rows
        assert_eq!(list.len(), 6);
    }

    #[test]
    fn test_whitespace_only_counts_as_blank() {
        assert!(!FilterEntry::new("20x20x1", " ").is_complete());
        assert!(!FilterEntry::new("\t", "2").is_complete());
        assert!(FilterEntry::new(" 20x20x1 ", "2").is_complete());
    }

    #[test]
    fn test_display_line() {
        assert_eq!(FilterEntry::new("20x20x1", "2").display_line(), "2x - 20x20x1");
    }
}
