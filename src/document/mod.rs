//! # Report Document
//!
//! The logical description of a service report, assembled from the client
//! details and the unit collection. It says *what* the report contains; a
//! [`SurfaceRenderer`](crate::render::SurfaceRenderer) decides how it looks.
//!
//! ```text
//! ┌───────────────────────────────┐
//! │ HVAC Service Report           │  header (title, date)
//! │ Client Information            │  client block
//! ├───────────────────────────────┤
//! │ Unit: Rooftop 1               │  one section per unit
//! │   fields                      │
//! │   Filters: 2x - 20x20x1       │  omitted when empty
//! │   Maintenance Photos [] []    │  omitted when empty
//! ├───────────────────────────────┤
//! │ footer                        │
//! └───────────────────────────────┘
//! ```
//!
//! [`assemble`] is a pure function: the same client, units and date always
//! produce the same document, so two exports of an unchanged session are
//! identical.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::unit::{ClientInfo, UnitId, UnitRecord};

pub const REPORT_TITLE: &str = "HVAC Service Report";
pub const CLIENT_HEADING: &str = "Client Information";
pub const FILTERS_HEADING: &str = "Filters:";
pub const PHOTOS_HEADING: &str = "Maintenance Photos";

const FOOTER_LINES: [&str; 2] = ["Thank you for your business.", "Generated by HVAC Service Reporter"];

/// A labelled value, e.g. `Model #: 48TCED`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub label: String,
    pub value: String,
}

impl Field {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub title: String,
    pub date: NaiveDate,
}

impl Header {
    /// `Date: 2026-10-19`
    pub fn date_line(&self) -> String {
        format!("Date: {}", self.date.format("%Y-%m-%d"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientBlock {
    pub heading: String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterBlock {
    pub heading: String,
    /// Display lines, e.g. `2x - 20x20x1`
    pub items: Vec<String>,
}

/// One embedded photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageBlock {
    /// Portable-encoded image data
    pub data: String,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoBlock {
    pub heading: String,
    pub images: Vec<ImageBlock>,
}

/// Everything printed for one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSection {
    pub unit_id: UnitId,
    pub heading: String,
    pub fields: Vec<Field>,
    pub filters: Option<FilterBlock>,
    pub photos: Option<PhotoBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub header: Header,
    pub client: ClientBlock,
    pub sections: Vec<UnitSection>,
    pub footer: Vec<String>,
}

impl ReportDocument {
    /// Total number of photos across all sections.
    pub fn image_count(&self) -> usize {
        self.sections
            .iter()
            .filter_map(|s| s.photos.as_ref())
            .map(|p| p.images.len())
            .sum()
    }

    /// Canonical JSON form, used to compare two assemblies.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Build the report for `units` in collection order, dated `date`.
pub fn assemble<'a>(
    client: &ClientInfo,
    units: impl IntoIterator<Item = &'a UnitRecord>,
    date: NaiveDate,
) -> ReportDocument {
    ReportDocument {
        header: Header {
            title: REPORT_TITLE.to_string(),
            date,
        },
        client: ClientBlock {
            heading: CLIENT_HEADING.to_string(),
            fields: vec![
                Field::new("Client Name", client.name.as_str()),
                Field::new("Address", client.address.as_str()),
            ],
        },
        sections: units.into_iter().map(unit_section).collect(),
        footer: FOOTER_LINES.iter().map(|l| l.to_string()).collect(),
    }
}

/// [`assemble`] dated with the local current date.
pub fn assemble_today<'a>(
    client: &ClientInfo,
    units: impl IntoIterator<Item = &'a UnitRecord>,
) -> ReportDocument {
    assemble(client, units, chrono::Local::now().date_naive())
}

fn unit_section(unit: &UnitRecord) -> UnitSection {
    let fields = vec![
        Field::new("Area Served", unit.area_served.as_str()),
        Field::new("Model #", unit.model_number.as_str()),
        Field::new("Serial #", unit.serial_number.as_str()),
        Field::new("Drive Type", unit.drive_type.label()),
        Field::new("Economizer", unit.economizer_label()),
    ];

    // Committed records are already compacted; filter again so a record
    // built by hand can never print a blank line.
    let items: Vec<String> = unit
        .filters
        .iter()
        .filter(|f| f.is_complete())
        .map(|f| f.display_line())
        .collect();
    let filters = (!items.is_empty()).then(|| FilterBlock {
        heading: FILTERS_HEADING.to_string(),
        items,
    });

    let photos = (!unit.images.is_empty()).then(|| PhotoBlock {
        heading: PHOTOS_HEADING.to_string(),
        images: unit
            .images
            .iter()
            .enumerate()
            .map(|(i, data)| ImageBlock {
                data: data.clone(),
                caption: format!("Unit {} - {}", unit.location, i + 1),
            })
            .collect(),
    });

    UnitSection {
        unit_id: unit.id,
        heading: format!("Unit: {}", unit.location),
        fields,
        filters,
        photos,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::{FilterEntry, FilterField, UnitDraft, UnitField};
    use pretty_assertions::assert_eq;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn rooftop() -> UnitRecord {
        let mut draft = UnitDraft::new();
        draft.set_field(UnitField::Location, "Rooftop 1");
        draft.filters.edit_row(0, FilterField::Size, "20x20x1").unwrap();
        draft.filters.edit_row(0, FilterField::Quantity, "2").unwrap();
        draft.commit().unwrap()
    }

    #[test]
    fn test_single_unit_without_images() {
        let unit = rooftop();
        let doc = assemble(&ClientInfo::default(), [&unit], date());

        assert_eq!(doc.sections.len(), 1);
        let section = &doc.sections[0];
        assert_eq!(section.heading, "Unit: Rooftop 1");
        assert_eq!(
            section.filters,
            Some(FilterBlock {
                heading: "Filters:".to_string(),
                items: vec!["2x - 20x20x1".to_string()],
            })
        );
        assert_eq!(section.photos, None);
        assert_eq!(doc.image_count(), 0);
    }

    #[test]
    fn test_field_summary() {
        let mut draft = rooftop().edit();
        draft.set_field(UnitField::ModelNumber, "48TCED");
        draft.drive_type = crate::unit::DriveType::DirectDrive;
        draft.economizer = true;
        let unit = draft.commit().unwrap();

        let doc = assemble(&ClientInfo::default(), [&unit], date());
        let values: Vec<(&str, &str)> = doc.sections[0]
            .fields
            .iter()
            .map(|f| (f.label.as_str(), f.value.as_str()))
            .collect();
        assert_eq!(
            values,
            vec![
                ("Area Served", ""),
                ("Model #", "48TCED"),
                ("Serial #", ""),
                ("Drive Type", "Direct Drive"),
                ("Economizer", "Yes"),
            ]
        );
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let mut unit = rooftop();
        unit.filters = vec![FilterEntry::new("", "3")];
        let doc = assemble(&ClientInfo::default(), [&unit], date());
        assert_eq!(doc.sections[0].filters, None);
        assert_eq!(doc.sections[0].photos, None);
    }

    #[test]
    fn test_images_in_unit_order() {
        let mut draft = rooftop().edit();
        draft.append_images(["data:a;base64,".to_string(), "data:b;base64,".to_string()]);
        let unit = draft.commit().unwrap();

        let doc = assemble(&ClientInfo::default(), [&unit], date());
        let photos = doc.sections[0].photos.as_ref().unwrap();
        assert_eq!(photos.heading, "Maintenance Photos");
        assert_eq!(photos.images[0].data, "data:a;base64,");
        assert_eq!(photos.images[1].caption, "Unit Rooftop 1 - 2");
    }

    #[test]
    fn test_empty_collection_still_has_header() {
        let client = ClientInfo {
            name: "Acme Foods".to_string(),
            address: "1 Main St".to_string(),
        };
        let doc = assemble(&client, std::iter::empty(), date());
        assert!(doc.sections.is_empty());
        assert_eq!(doc.header.title, "HVAC Service Report");
        assert_eq!(doc.header.date_line(), "Date: 2026-10-19");
        assert_eq!(doc.client.fields[0].value, "Acme Foods");
        assert_eq!(doc.footer.len(), 2);
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let units = [rooftop(), rooftop()];
        let client = ClientInfo::default();
        let first = assemble(&client, &units, date()).to_json().unwrap();
        let second = assemble(&client, &units, date()).to_json().unwrap();
        assert_eq!(first, second);
    }
}
