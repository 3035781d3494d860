//! # Report Tests
//!
//! End-to-end checks of the export pipeline: input file → session → PDF.
//!
//! ## Test Coverage
//!
//! - **Pipeline**: a realistic visit with photos exports to a loadable PDF whose
//!   page count matches the rendered surface.
//! - **Reproducibility**: exporting an unchanged session twice gives identical bytes.
//! - **Isolation**: failed exports leave the session usable and unchanged.

use chrono::NaiveDate;
use hvac_report::document::{FilterBlock, assemble};
use hvac_report::input::ReportInput;
use hvac_report::paginate::{self, Paginator};
use hvac_report::pdf::PdfWriter;
use hvac_report::render::{RasterRenderer, SurfaceRenderer};
use hvac_report::unit::{ClientInfo, FilterField, UnitDraft, UnitField};
use hvac_report::{ReportConfig, ReportError, Session, encoder};
use image::{ImageFormat, Rgb, RgbImage};
use pretty_assertions::assert_eq;
use std::io::Cursor;
use std::path::Path;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn visit_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

fn png_bytes(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb(color));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

/// Write a visit file with three units and photo fixtures into `dir`.
fn write_visit(dir: &Path) -> std::path::PathBuf {
    std::fs::create_dir(dir.join("photos")).unwrap();
    for (name, color) in [("front", [200, 40, 40]), ("plate", [40, 200, 40]), ("coil", [40, 40, 200])] {
        std::fs::write(dir.join(format!("photos/{}.png", name)), png_bytes(320, 240, color)).unwrap();
    }

    let json = r#"{
        "client": {"name": "Acme Foods", "address": "1 Main St, Springfield"},
        "units": [
            {
                "location": "Rooftop 1",
                "area_served": "Sales floor",
                "model_number": "48TCED08",
                "serial_number": "2419G20145",
                "drive_type": "belt",
                "economizer": true,
                "filters": [
                    {"size": "20x20x1", "quantity": "2"},
                    {"size": "", "quantity": ""}
                ],
                "photos": ["photos/front.png", "photos/plate.png", "photos/coil.png"]
            },
            {
                "location": "Rooftop 2",
                "drive_type": "dd",
                "filters": [{"size": "16x25x2", "quantity": "4"}],
                "photos": ["photos/front.png"]
            },
            {"location": "Walk-in cooler"}
        ]
    }"#;
    let path = dir.join("visit.json");
    std::fs::write(&path, json).unwrap();
    path
}

async fn load_visit(dir: &Path) -> Session {
    let path = write_visit(dir);
    let loaded = ReportInput::load(&path)
        .unwrap()
        .into_session(hvac_report::input::base_dir(&path), ReportConfig::default())
        .await
        .unwrap();
    assert!(loaded.failures.is_empty());
    loaded.session
}

// ============================================================================
// PIPELINE
// ============================================================================

#[tokio::test]
async fn test_visit_exports_to_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let session = load_visit(dir.path()).await;
    assert_eq!(session.units().len(), 3);

    let renderer = RasterRenderer::default();
    let artifact = session
        .export(visit_date(), &renderer, &PdfWriter::default())
        .unwrap();

    assert_eq!(artifact.file_name, "hvac-service-report.pdf");
    assert_eq!(artifact.document.sections.len(), 3);
    assert_eq!(artifact.document.image_count(), 4);
    assert_eq!(
        artifact.document.sections[0].filters,
        Some(FilterBlock {
            heading: "Filters:".to_string(),
            items: vec!["2x - 20x20x1".to_string()],
        })
    );
    assert_eq!(artifact.document.sections[2].filters, None);
    assert_eq!(artifact.document.sections[2].photos, None);

    // Page count follows the rendered surface height
    let surface = renderer.render(&artifact.document).unwrap();
    let config = ReportConfig::default();
    let expected = paginate::plan(surface.height() as f64, config.page_height_px() as f64)
        .unwrap()
        .len();
    assert_eq!(artifact.page_count, expected);

    let pdf = lopdf::Document::load_mem(&artifact.bytes).unwrap();
    assert_eq!(pdf.get_pages().len(), artifact.page_count);
}

#[tokio::test]
async fn test_export_twice_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let session = load_visit(dir.path()).await;

    let renderer = RasterRenderer::default();
    let writer = PdfWriter::default();
    let first = session.export(visit_date(), &renderer, &writer).unwrap();
    let second = session.export(visit_date(), &renderer, &writer).unwrap();
    assert_eq!(first.bytes, second.bytes);
}

#[test]
fn test_empty_session_exports_one_page() {
    let session = Session::default();
    let artifact = session
        .export(visit_date(), &RasterRenderer::default(), &PdfWriter::default())
        .unwrap();
    assert_eq!(artifact.page_count, 1);
    assert!(artifact.document.sections.is_empty());
}

#[test]
fn test_long_report_spans_pages_in_order() {
    let mut session = Session::default();
    let photo = encoder::encode(&png_bytes(400, 600, [90, 90, 90]));
    for i in 1..=6 {
        let mut draft = UnitDraft::new();
        draft.set_field(UnitField::Location, format!("RTU-{}", i));
        draft.filters.edit_row(0, FilterField::Size, "20x25x2").unwrap();
        draft.filters.edit_row(0, FilterField::Quantity, "3").unwrap();
        draft.append_images(vec![photo.clone(), photo.clone()]);
        session.add_unit(draft).unwrap();
    }

    let doc = assemble(session.client(), session.units(), visit_date());
    let surface = RasterRenderer::default().render(&doc).unwrap();
    let pages = Paginator::for_config(session.config())
        .unwrap()
        .paginate(&surface)
        .unwrap();

    assert!(pages.len() > 1);
    let rows: u32 = pages.iter().map(|p| p.content_rows()).sum();
    assert_eq!(rows, surface.height());
    for (i, page) in pages.iter().enumerate() {
        assert_eq!(page.index, i);
        assert_eq!(page.top, i as u32 * pages.page_height_px);
    }
}

// ============================================================================
// ISOLATION
// ============================================================================

#[test]
fn test_bad_photo_fails_export_without_touching_session() {
    let mut session = Session::default();
    session.set_client(ClientInfo {
        name: "Acme Foods".to_string(),
        address: String::new(),
    });
    let mut draft = UnitDraft::new();
    draft.set_field(UnitField::Location, "Boiler room");
    draft.append_images(vec![encoder::encode(b"not a picture")]);
    session.add_unit(draft).unwrap();
    let before = session.state().clone();

    let err = session
        .export(visit_date(), &RasterRenderer::default(), &PdfWriter::default())
        .unwrap_err();
    assert!(matches!(err, ReportError::Render(_)));
    assert_eq!(session.state(), &before);
    assert!(!session.is_exporting());
}

#[tokio::test]
async fn test_missing_photo_is_reported_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.png"), png_bytes(10, 10, [1, 2, 3])).unwrap();
    let input = ReportInput::from_json(
        r#"{"units": [{"location": "RTU-1", "photos": ["a.png", "gone.png"]}]}"#,
    )
    .unwrap();

    let loaded = input
        .into_session(dir.path(), ReportConfig::default())
        .await
        .unwrap();
    assert_eq!(loaded.session.units().as_slice()[0].images.len(), 1);
    assert_eq!(loaded.failures.len(), 1);
    assert!(loaded.failures[0].path.ends_with("gone.png"));
}
