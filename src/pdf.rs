//! # PDF Output
//!
//! Serializes a [`PageSet`] into a PDF, one page per slice.
//!
//! Each slice becomes a Flate-compressed DeviceRGB image drawn across the full
//! page width and anchored at the top edge. A slice with fewer rows than a
//! full page is drawn proportionally shorter and the rest of the page stays
//! blank:
//!
//! ```text
//! ┌───────────────┐  ← MediaBox top (841.89 pt on A4)
//! │ /Im0 (rows)   │
//! │               │  drawn height = rows / page_rows × page height
//! ├───────────────┤
//! │   (blank)     │
//! └───────────────┘
//! ```
//!
//! No creation or modification dates are written, so the same pages always
//! serialize to the same bytes.

use flate2::Compression;
use flate2::write::ZlibEncoder;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use rayon::prelude::*;
use std::io::Write;
use tracing::debug;

use crate::document::REPORT_TITLE;
use crate::error::ReportError;
use crate::page::{PageFormat, ReportConfig};
use crate::paginate::{Page, PageSet};

const PRODUCER: &str = "hvac-report";
const IMAGE_NAME: &str = "Im0";

/// Turns pages into the bytes of the final file.
pub trait PageSerializer {
    fn serialize(&self, pages: &PageSet) -> Result<Vec<u8>, ReportError>;
}

/// The built-in serializer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfWriter {
    format: PageFormat,
}

impl PdfWriter {
    pub fn new(format: PageFormat) -> Self {
        Self { format }
    }

    pub fn for_config(config: &ReportConfig) -> Self {
        Self::new(config.format)
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new(PageFormat::A4_PORTRAIT)
    }
}

impl PageSerializer for PdfWriter {
    fn serialize(&self, pages: &PageSet) -> Result<Vec<u8>, ReportError> {
        if pages.page_height_px == 0 {
            return Err(ReportError::Export("Page set has zero page height".to_string()));
        }

        // Compression dominates; do it for all pages up front
        let compressed = pages
            .pages
            .par_iter()
            .map(|page| {
                if page.content_rows() == 0 {
                    Ok(None)
                } else {
                    deflate(page.image.as_raw()).map(Some)
                }
            })
            .collect::<Result<Vec<_>, ReportError>>()?;

        let page_w = self.format.width_pt();
        let page_h = self.format.height_pt();

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut kids = Vec::with_capacity(pages.len());

        for (page, data) in pages.pages.iter().zip(compressed) {
            let (resources, content) = match data {
                Some(data) => {
                    let image_id = doc.add_object(image_stream(page, data));
                    let drawn_h = page_h * page.content_rows() as f32 / pages.page_height_px as f32;
                    (
                        dictionary! {
                            "XObject" => dictionary! { IMAGE_NAME => image_id },
                        },
                        draw_image(page_w, drawn_h, page_h - drawn_h),
                    )
                }
                None => (dictionary! {}, Content { operations: vec![] }),
            };

            let content = content
                .encode()
                .map_err(|e| ReportError::Export(format!("Failed to encode page content: {}", e)))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, content));

            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), Object::Real(page_w), Object::Real(page_h)],
                "Resources" => resources,
                "Contents" => content_id,
            });
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(REPORT_TITLE),
            "Producer" => Object::string_literal(PRODUCER),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);

        let mut output = Vec::new();
        doc.save_to(&mut output)
            .map_err(|e| ReportError::Export(format!("Failed to write PDF: {}", e)))?;

        debug!("Serialized {} page(s) into {} bytes", count, output.len());
        Ok(output)
    }
}

fn image_stream(page: &Page, data: Vec<u8>) -> Stream {
    Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => page.image.width() as i64,
            "Height" => page.image.height() as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "FlateDecode",
        },
        data,
    )
}

/// `q w 0 0 h 0 y cm /Im0 Do Q`
fn draw_image(width: f32, height: f32, y: f32) -> Content {
    Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Real(width),
                    0.into(),
                    0.into(),
                    Object::Real(height),
                    0.into(),
                    Object::Real(y),
                ],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ],
    }
}

fn deflate(raw: &[u8]) -> Result<Vec<u8>, ReportError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(raw)
        .map_err(|e| ReportError::Export(format!("Failed to compress page: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| ReportError::Export(format!("Failed to compress page: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paginate::Paginator;
    use image::{Rgb, RgbImage};

    fn page_set(width: u32, height: u32, page_height: u32) -> PageSet {
        let surface = RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 7]));
        Paginator::new(width, page_height)
            .unwrap()
            .paginate(&surface)
            .unwrap()
    }

    #[test]
    fn test_one_pdf_page_per_slice() {
        let pages = page_set(40, 100, 30);
        assert_eq!(pages.len(), 4);

        let bytes = PdfWriter::default().serialize(&pages).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 4);
    }

    #[test]
    fn test_media_box_is_a4() {
        let bytes = PdfWriter::default().serialize(&page_set(10, 10, 10)).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
        let page = doc.get_dictionary(page_id).unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        let height = media_box[3].as_float().unwrap();
        assert!((height - 841.89).abs() < 0.01, "{}", height);
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let pages = page_set(64, 90, 40);
        let writer = PdfWriter::default();
        assert_eq!(writer.serialize(&pages).unwrap(), writer.serialize(&pages).unwrap());
    }

    #[test]
    fn test_empty_page_has_no_image() {
        let pages = page_set(10, 0, 10);
        assert_eq!(pages.len(), 1);

        let bytes = PdfWriter::default().serialize(&pages).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
        let has_image = doc.objects.values().any(|obj| {
            obj.as_stream()
                .ok()
                .and_then(|s| s.dict.get(b"Subtype").ok())
                .and_then(|s| s.as_name().ok())
                == Some(b"Image".as_slice())
        });
        assert!(!has_image);
    }

    #[test]
    fn test_image_round_trips_through_flate() {
        let pages = page_set(8, 4, 4);
        let raw = pages.pages[0].image.as_raw().clone();

        let bytes = PdfWriter::default().serialize(&pages).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let image = doc
            .objects
            .values()
            .filter_map(|obj| obj.as_stream().ok())
            .find(|s| s.dict.get(b"Subtype").and_then(|o| o.as_name()).ok() == Some(b"Image".as_slice()))
            .unwrap();
        assert_eq!(image.decompressed_content().unwrap(), raw);
    }
}
