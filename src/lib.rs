//! # HVAC Report - Inspection Records to Printable Reports
//!
//! A library for recording HVAC equipment inspections at a client site and
//! turning them into a single paginated A4 service report. It provides:
//!
//! - **Unit records**: drafts, validation, and an ordered unit collection
//! - **Photo encoding**: self-contained portable image strings, batch uploads
//! - **Report assembly**: a deterministic document description of the visit
//! - **Pagination**: slicing one tall rendered surface into A4 pages
//! - **Output**: a bitmap-font raster renderer and a PDF page serializer
//!
//! ## Quick Start
//!
//! ```no_run
//! use hvac_report::{
//!     Session,
//!     pdf::PdfWriter,
//!     render::RasterRenderer,
//!     unit::{FilterField, UnitDraft, UnitField},
//! };
//!
//! let mut session = Session::default();
//! session.client_mut().name = "Acme Foods".to_string();
//!
//! // Record a unit
//! let mut draft = UnitDraft::new();
//! draft.set_field(UnitField::Location, "Rooftop 1");
//! draft.filters.edit_row(0, FilterField::Size, "20x20x1")?;
//! draft.filters.edit_row(0, FilterField::Quantity, "2")?;
//! session.add_unit(draft)?;
//!
//! // Export the report
//! let date = chrono::Local::now().date_naive();
//! let report = session.export(date, &RasterRenderer::default(), &PdfWriter::default())?;
//! std::fs::write(&report.file_name, &report.bytes)?;
//!
//! # Ok::<(), hvac_report::ReportError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`unit`] | Unit records, drafts, filter lists, the unit collection |
//! | [`encoder`] | Portable image encoding and batch uploads |
//! | [`document`] | Report document assembly |
//! | [`render`] | Surface renderer trait and the raster renderer |
//! | [`paginate`] | Page planning and surface slicing |
//! | [`pdf`] | Page serializer trait and the PDF writer |
//! | [`session`] | Session context and export jobs |
//! | [`input`] | JSON site visit input |
//! | [`page`] | Page formats and report configuration |
//! | [`error`] | Error types |

pub mod document;
pub mod encoder;
pub mod error;
pub mod input;
pub mod page;
pub mod paginate;
pub mod pdf;
pub mod render;
pub mod session;
pub mod unit;

// Re-exports for convenience
pub use error::ReportError;
pub use page::ReportConfig;
pub use session::{ExportArtifact, Session};
