//! # Rendering Module
//!
//! Turns a [`ReportDocument`] into one tall raster surface.
//!
//! ## Modules
//!
//! - [`font`]: Spleen bitmap glyphs for report text
//! - [`raster`]: The built-in top-to-bottom report layout
//!
//! ## Usage Example
//!
//! ```
//! use hvac_report::document;
//! use hvac_report::render::{RasterRenderer, SurfaceRenderer};
//! use hvac_report::unit::ClientInfo;
//!
//! let doc = document::assemble_today(&ClientInfo::default(), std::iter::empty());
//! let surface = RasterRenderer::default().render(&doc)?;
//! assert_eq!(surface.width(), 1240);
//! # Ok::<(), hvac_report::ReportError>(())
//! ```

pub mod font;
pub mod raster;

pub use raster::RasterRenderer;

use image::RgbImage;

use crate::document::ReportDocument;
use crate::error::ReportError;

/// A rendered report: one continuous RGB raster, as tall as the content.
pub type Surface = RgbImage;

/// Flattens a report description into a single surface.
///
/// Implementations must not depend on anything but `doc`, so the same
/// document always renders to the same pixels.
pub trait SurfaceRenderer {
    fn render(&self, doc: &ReportDocument) -> Result<Surface, ReportError>;
}
