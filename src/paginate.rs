//! # Page Splitting
//!
//! Cuts one tall report surface into page-sized slices.
//!
//! ## Algorithm
//!
//! The surface is first scaled uniformly so its width equals the page width.
//! Its height then becomes `H * pageWidth / W`. Slices are taken from the top,
//! one page height at a time, until no height remains:
//!
//! ```text
//!  scaled surface        pages
//! ┌────────────┐ 0     ┌────────────┐
//! │            │       │  page 0    │ 297
//! │            │ 297   ├────────────┤
//! │            │       │  page 1    │ 297
//! │            │ 594   ├────────────┤
//! │            │       │  page 2    │ 297
//! │            │ 891   ├────────────┤
//! │            │       │  page 3    │ 109 (rest of the page left blank)
//! └────────────┘ 1000  └────────────┘
//! ```
//!
//! Slices are contiguous, never overlap, and their heights sum to the scaled
//! height. A surface that is an exact multiple of the page height gets no
//! trailing blank page. An empty surface still yields one page.
//!
//! ## Example
//!
//! ```
//! use hvac_report::paginate;
//!
//! let heights: Vec<f64> = paginate::plan(1000.0, 297.0)?
//!     .iter()
//!     .map(|s| s.height)
//!     .collect();
//! assert_eq!(heights, vec![297.0, 297.0, 297.0, 109.0]);
//! # Ok::<(), hvac_report::ReportError>(())
//! ```

use image::imageops::{self, FilterType};
use image::RgbImage;
use std::borrow::Cow;
use std::num::NonZeroU32;
use tracing::debug;

use crate::error::ReportError;
use crate::page::ReportConfig;
use crate::render::Surface;

// ============================================================================
// PLANNING
// ============================================================================

/// One page of a real-valued plan, in scaled-surface units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSlice {
    pub index: usize,
    /// Distance from the top of the scaled surface
    pub offset: f64,
    /// Content height on this page, at most one page height
    pub height: f64,
}

/// Height of a `width`×`height` surface once scaled to `page_width`.
pub fn scaled_height(width: f64, height: f64, page_width: f64) -> Result<f64, ReportError> {
    if !(width > 0.0 && width.is_finite()) {
        return Err(ReportError::Render(format!(
            "Surface width must be positive, got {}",
            width
        )));
    }
    if !(page_width > 0.0 && page_width.is_finite()) {
        return Err(ReportError::Render(format!(
            "Page width must be positive, got {}",
            page_width
        )));
    }
    if !(height >= 0.0 && height.is_finite()) {
        return Err(ReportError::Render(format!(
            "Surface height must not be negative, got {}",
            height
        )));
    }
    Ok(height * page_width / width)
}

/// Slice a surface of `scaled_height` into pages of `page_height`.
pub fn plan(scaled_height: f64, page_height: f64) -> Result<Vec<PageSlice>, ReportError> {
    if !(page_height > 0.0 && page_height.is_finite()) {
        return Err(ReportError::Render(format!(
            "Page height must be positive, got {}",
            page_height
        )));
    }
    if !(scaled_height >= 0.0 && scaled_height.is_finite()) {
        return Err(ReportError::Render(format!(
            "Surface height must not be negative, got {}",
            scaled_height
        )));
    }

    let mut slices = Vec::new();
    let mut remaining = scaled_height;
    while remaining > 0.0 {
        let index = slices.len();
        let offset = index as f64 * page_height;
        let left = scaled_height - offset;
        let height = page_height.min(left);
        slices.push(PageSlice {
            index,
            offset,
            height,
        });
        // Exactly zero once the last slice takes everything that is left
        remaining = left - height;
    }

    if slices.is_empty() {
        slices.push(PageSlice {
            index: 0,
            offset: 0.0,
            height: 0.0,
        });
    }
    Ok(slices)
}

/// One page of an integer plan, in pixel rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSlice {
    pub index: usize,
    pub top: u32,
    pub rows: u32,
}

/// Integer form of [`plan`], used to cut the raster.
pub fn plan_rows(total_rows: u32, rows_per_page: NonZeroU32) -> Vec<RowSlice> {
    let per_page = rows_per_page.get();
    let count = total_rows.div_ceil(per_page).max(1);

    (0..count)
        .map(|i| {
            let top = i * per_page;
            RowSlice {
                index: i as usize,
                top,
                rows: per_page.min(total_rows - top),
            }
        })
        .collect()
}

// ============================================================================
// RASTER PAGINATION
// ============================================================================

/// A page cut from the surface. Its image is page width wide and holds only
/// the content rows; the rest of the page is blank.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub index: usize,
    /// First scaled-surface row on this page
    pub top: u32,
    pub image: RgbImage,
}

impl Page {
    pub fn content_rows(&self) -> u32 {
        self.image.height()
    }
}

/// Ordered pages plus the pixel size of a full page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSet {
    pub page_width_px: u32,
    pub page_height_px: u32,
    pub pages: Vec<Page>,
}

impl PageSet {
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter()
    }
}

/// Slices rendered surfaces into pages of a fixed pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_width_px: u32,
    page_height_px: NonZeroU32,
}

impl Paginator {
    pub fn new(page_width_px: u32, page_height_px: u32) -> Result<Self, ReportError> {
        let page_height_px = NonZeroU32::new(page_height_px)
            .filter(|_| page_width_px > 0)
            .ok_or_else(|| {
                ReportError::Render(format!(
                    "Page size must be non-zero, got {}x{}",
                    page_width_px, page_height_px
                ))
            })?;
        Ok(Self {
            page_width_px,
            page_height_px,
        })
    }

    pub fn for_config(config: &ReportConfig) -> Result<Self, ReportError> {
        Self::new(config.page_width_px(), config.page_height_px())
    }

    /// Scale `surface` to the page width and cut it into pages.
    ///
    /// The surface itself is never modified.
    pub fn paginate(&self, surface: &Surface) -> Result<PageSet, ReportError> {
        if surface.width() == 0 {
            return Err(ReportError::Render("Surface has zero width".to_string()));
        }

        let width = self.page_width_px;
        let scaled: Cow<'_, RgbImage> = if surface.width() == width {
            Cow::Borrowed(surface)
        } else {
            let height = scaled_height(
                surface.width() as f64,
                surface.height() as f64,
                width as f64,
            )?
            .round() as u32;
            if height == 0 {
                Cow::Owned(RgbImage::new(width, 0))
            } else {
                Cow::Owned(imageops::resize(surface, width, height, FilterType::Triangle))
            }
        };

        let slices = plan_rows(scaled.height(), self.page_height_px);
        debug!(
            "Paginating {}x{} surface into {} page(s) of {}x{}",
            scaled.width(),
            scaled.height(),
            slices.len(),
            width,
            self.page_height_px
        );

        let pages = slices
            .into_iter()
            .map(|slice| Page {
                index: slice.index,
                top: slice.top,
                image: imageops::crop_imm(&*scaled, 0, slice.top, width, slice.rows)
                    .to_image(),
            })
            .collect();

        Ok(PageSet {
            page_width_px: width,
            page_height_px: self.page_height_px.get(),
            pages,
        })
    }
}
