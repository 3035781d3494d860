//! # Page Configuration
//!
//! This module defines the physical page formats a report can be laid out on
//! and the raster resolution the report surface is rendered at.
//!
//! ## Supported Formats
//!
//! | Format | Size (mm) | Size (pt) | Pixels at 150 DPI |
//! |--------|-----------|-----------|-------------------|
//! | A4 portrait | 210 × 297 | 595.28 × 841.89 | 1240 × 1754 |
//!
//! ## Usage
//!
//! ```
//! use hvac_report::page::ReportConfig;
//!
//! let config = ReportConfig::A4;
//! println!("Page: {}x{} px", config.page_width_px(), config.page_height_px());
//! ```

/// Fixed file name of the exported report.
pub const REPORT_FILE_NAME: &str = "hvac-service-report.pdf";

/// PDF points per inch.
const POINTS_PER_INCH: f32 = 72.0;

const MM_PER_INCH: f32 = 25.4;

/// # Page Format
///
/// A physical sheet size in millimeters.
///
/// ## Calculations
///
/// ```text
/// points = mm / 25.4 * 72
/// pixels = mm / 25.4 * dpi
///
/// For A4 at 150 DPI:
///   width  = 210 / 25.4 * 150 ≈ 1240 px
///   height = 297 / 25.4 * 150 ≈ 1754 px
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFormat {
    /// Format name
    pub name: &'static str,

    /// Sheet width in millimeters
    pub width_mm: f32,

    /// Sheet height in millimeters
    pub height_mm: f32,
}

impl PageFormat {
    /// ISO 216 A4, portrait orientation.
    pub const A4_PORTRAIT: Self = Self {
        name: "A4 portrait",
        width_mm: 210.0,
        height_mm: 297.0,
    };

    /// Sheet width in PDF points.
    #[inline]
    pub fn width_pt(&self) -> f32 {
        mm_to_pt(self.width_mm)
    }

    /// Sheet height in PDF points.
    #[inline]
    pub fn height_pt(&self) -> f32 {
        mm_to_pt(self.height_mm)
    }
}

impl Default for PageFormat {
    fn default() -> Self {
        Self::A4_PORTRAIT
    }
}

#[inline]
fn mm_to_pt(mm: f32) -> f32 {
    mm / MM_PER_INCH * POINTS_PER_INCH
}

/// # Report Configuration
///
/// Everything the export pipeline needs to know about its output target.
///
/// - **format**: physical sheet the pages are printed on
/// - **dpi**: resolution the report surface is rendered at
/// - **margin_mm**: blank border kept around the report content
/// - **file_name**: name of the exported document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportConfig {
    pub format: PageFormat,
    pub dpi: u16,
    pub margin_mm: f32,
    pub file_name: &'static str,
}

impl ReportConfig {
    /// A4 portrait at 150 DPI with 10mm margins.
    pub const A4: Self = Self {
        format: PageFormat::A4_PORTRAIT,
        dpi: 150,
        margin_mm: 10.0,
        file_name: REPORT_FILE_NAME,
    };

    /// Calculate pixels per millimeter
    ///
    /// ## Example
    ///
    /// ```
    /// use hvac_report::page::ReportConfig;
    ///
    /// let config = ReportConfig::A4;
    /// assert!((config.px_per_mm() - 5.905).abs() < 0.01);
    /// ```
    #[inline]
    pub fn px_per_mm(&self) -> f32 {
        self.dpi as f32 / MM_PER_INCH
    }

    /// Convert millimeters to pixels
    #[inline]
    pub fn mm_to_px(&self, mm: f32) -> u32 {
        (mm * self.px_per_mm()).round() as u32
    }

    /// Page width in pixels; the report surface is rendered at this width.
    #[inline]
    pub fn page_width_px(&self) -> u32 {
        self.mm_to_px(self.format.width_mm)
    }

    /// Page height in pixels; the paginator cuts the surface at this height.
    #[inline]
    pub fn page_height_px(&self) -> u32 {
        self.mm_to_px(self.format.height_mm)
    }

    /// Margin in pixels
    #[inline]
    pub fn margin_px(&self) -> u32 {
        self.mm_to_px(self.margin_mm)
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self::A4
    }
}

// ============================================================================
// TESTS
// ============================================================================
