//! # Unit Records
//!
//! One [`UnitRecord`] per piece of HVAC equipment inspected at the client site.
//!
//! Committed records are never edited field by field. Changes go through a
//! [`UnitDraft`], a separate editable copy that may hold transient state
//! (blank filter rows, half-typed fields). [`UnitDraft::commit`] validates the
//! draft and produces a whole new record, which the collection swaps in.
//!
//! ```
//! use hvac_report::unit::{FilterField, UnitDraft, UnitField};
//!
//! let mut draft = UnitDraft::new();
//! draft.set_field(UnitField::Location, "Rooftop 1");
//! draft.filters.edit_row(0, FilterField::Size, "20x20x1")?;
//! draft.filters.edit_row(0, FilterField::Quantity, "2")?;
//! draft.filters.add_row(); // left blank, dropped at commit
//!
//! let unit = draft.commit()?;
//! assert_eq!(unit.filters.len(), 1);
//! # Ok::<(), hvac_report::ReportError>(())
//! ```

pub mod collection;
pub mod filters;

pub use collection::UnitCollection;
pub use filters::{FilterEntry, FilterField, FilterList};

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::ReportError;

// ============================================================================
// IDENTITY
// ============================================================================

/// Identity of a unit, assigned once when the unit is first committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(Uuid);

impl UnitId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UnitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// FIELDS
// ============================================================================

/// How the unit's blower is driven.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriveType {
    #[default]
    #[serde(rename = "belt")]
    Belt,
    #[serde(rename = "dd")]
    DirectDrive,
}

impl DriveType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Belt => "Belt Drive",
            Self::DirectDrive => "Direct Drive",
        }
    }
}

/// Free-form client details printed at the top of the report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
}

/// Text fields of a unit that can be edited in a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitField {
    Location,
    AreaServed,
    ModelNumber,
    SerialNumber,
}

// ============================================================================
// COMMITTED RECORD
// ============================================================================

/// A committed unit.
///
/// Optional text fields use the empty string for "not recorded".
/// `images` holds portable-encoded photos (see [`crate::encoder`]) in print order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub id: UnitId,
    pub location: String,
    #[serde(default)]
    pub area_served: String,
    #[serde(default)]
    pub model_number: String,
    #[serde(default)]
    pub serial_number: String,
    #[serde(default)]
    pub drive_type: DriveType,
    #[serde(default)]
    pub economizer: bool,
    #[serde(default)]
    pub filters: Vec<FilterEntry>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl UnitRecord {
    /// Start an edit of this record.
    pub fn edit(&self) -> UnitDraft {
        UnitDraft::from_record(self)
    }

    /// "Yes" or "No".
    pub fn economizer_label(&self) -> &'static str {
        if self.economizer { "Yes" } else { "No" }
    }
}

// ============================================================================
// DRAFT
// ============================================================================

/// An uncommitted, editable copy of a unit.
///
/// Dropping a draft discards it; nothing reaches the collection until
/// [`commit`](Self::commit).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitDraft {
    id: Option<UnitId>,
    pub location: String,
    pub area_served: String,
    pub model_number: String,
    pub serial_number: String,
    pub drive_type: DriveType,
    pub economizer: bool,
    pub filters: FilterList,
    images: Vec<String>,
}

impl UnitDraft {
    /// Draft for a unit that does not exist yet: one blank filter row,
    /// belt drive, no economizer.
    pub fn new() -> Self {
        Self {
            filters: FilterList::with_blank_row(),
            ..Default::default()
        }
    }

    /// Draft editing an existing record.
    pub fn from_record(record: &UnitRecord) -> Self {
        Self {
            id: Some(record.id),
            location: record.location.clone(),
            area_served: record.area_served.clone(),
            model_number: record.model_number.clone(),
            serial_number: record.serial_number.clone(),
            drive_type: record.drive_type,
            economizer: record.economizer,
            filters: FilterList::from(record.filters.clone()),
            images: record.images.clone(),
        }
    }

    /// Id of the record being edited, `None` for a new unit.
    pub fn id(&self) -> Option<UnitId> {
        self.id
    }

    pub fn set_field(&mut self, field: UnitField, value: impl Into<String>) {
        let value = value.into();
        match field {
            UnitField::Location => self.location = value,
            UnitField::AreaServed => self.area_served = value,
            UnitField::ModelNumber => self.model_number = value,
            UnitField::SerialNumber => self.serial_number = value,
        }
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    /// Append encoded photos after the existing ones, keeping their order.
    pub fn append_images(&mut self, images: impl IntoIterator<Item = String>) {
        self.images.extend(images);
    }

    /// Remove the photo at `index`; remaining photos keep their order.
    pub fn remove_image(&mut self, index: usize) -> Option<String> {
        (index < self.images.len()).then(|| self.images.remove(index))
    }

    /// Validate and build the committed record.
    ///
    /// Blank filter rows are dropped here and only here. A new unit gets its
    /// id now; an edited unit keeps the id it had.
    pub fn commit(self) -> Result<UnitRecord, ReportError> {
        if self.location.trim().is_empty() {
            return Err(ReportError::Validation(
                "Please provide a location for the unit.".to_string(),
            ));
        }

        Ok(UnitRecord {
            id: self.id.unwrap_or_default(),
            filters: self.filters.compact(),
            location: self.location,
            area_served: self.area_served,
            model_number: self.model_number,
            serial_number: self.serial_number,
            drive_type: self.drive_type,
            economizer: self.economizer,
            images: self.images,
        })
    }
}
