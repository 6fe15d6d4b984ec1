//! Paginated document export of a rendered dashboard region.
//!
//! Capturing pixels is the host's job, behind [`Rasterizer`]. This module
//! decides which region to capture, how the image is laid over A4 pages
//! and which metadata the document carries. Encoding the final file is left
//! to whatever consumes the [`DocumentPlan`].

use serde::Serialize;

use crate::error::ExportError;

pub const A4_WIDTH_MM: f64 = 210.0;
pub const A4_PAGE_HEIGHT_MM: f64 = 295.0;

pub const DASHBOARD_ELEMENT_ID: &str = "dashboard-content";
pub const TABLE_ELEMENT_ID: &str = "data-table";

/// A region of the rendered dashboard that can be exported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportRegion {
    Dashboard,
    Table,
    Chart { element_id: String, title: String },
}

impl ExportRegion {
    #[must_use]
    pub fn chart(element_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self::Chart {
            element_id: element_id.into(),
            title: title.into(),
        }
    }

    /// Resolve a fixed region by its element id.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::UnknownRegion`] for anything other than the
    /// dashboard or table ids. Charts need a title, so use [`ExportRegion::chart`].
    pub fn from_element_id(id: &str) -> Result<Self, ExportError> {
        match id {
            DASHBOARD_ELEMENT_ID => Ok(Self::Dashboard),
            TABLE_ELEMENT_ID => Ok(Self::Table),
            other => Err(ExportError::UnknownRegion(other.to_string())),
        }
    }

    #[must_use]
    pub fn element_id(&self) -> &str {
        match self {
            Self::Dashboard => DASHBOARD_ELEMENT_ID,
            Self::Table => TABLE_ELEMENT_ID,
            Self::Chart { element_id, .. } => element_id.as_str(),
        }
    }

    #[must_use]
    pub fn file_name(&self) -> String {
        match self {
            Self::Dashboard => "admybrand-insights-dashboard.pdf".to_string(),
            Self::Table => "campaign-performance-table.pdf".to_string(),
            Self::Chart { title, .. } => format!("{}-chart.pdf", slug(title)),
        }
    }
}

/// Lowercase and collapse each run of whitespace into a single `-`.
fn slug(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut in_gap = false;
    for ch in title.chars() {
        if ch.is_whitespace() {
            if !in_gap {
                out.push('-');
                in_gap = true;
            }
        } else {
            out.extend(ch.to_lowercase());
            in_gap = false;
        }
    }
    out
}

/// Pixels captured from one region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    pub width_px: u32,
    pub height_px: u32,
    pub png: Vec<u8>,
}

/// Host hook that renders an element of the dashboard into an image.
pub trait Rasterizer {
    /// `Ok(None)` means no element with `element_id` is currently rendered.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Rasterize`] when the host fails to capture.
    fn capture(&self, element_id: &str) -> Result<Option<CapturedImage>, ExportError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentMetadata {
    pub title: String,
    pub subject: String,
    pub author: String,
    pub creator: String,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            title: "ADmyBRAND Insights Dashboard Report".to_string(),
            subject: "Analytics Dashboard Export".to_string(),
            author: "ADmyBRAND Insights".to_string(),
            creator: "ADmyBRAND Analytics Platform".to_string(),
        }
    }
}

/// Where the captured image sits on one page, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PagePlacement {
    pub y_offset_mm: f64,
    pub width_mm: f64,
    pub height_mm: f64,
}

/// Place an image of `width_px` × `height_px` across A4 pages.
///
/// The image is scaled to the page width and drawn on every page, shifted up
/// by one page height each time. Pages keep being added while the remaining
/// height is non-negative. Returns no pages for a zero width.
#[must_use]
pub fn layout_a4(width_px: u32, height_px: u32) -> Vec<PagePlacement> {
    if width_px == 0 {
        return Vec::new();
    }
    let height_mm = f64::from(height_px) * A4_WIDTH_MM / f64::from(width_px);
    let place = |y_offset_mm| PagePlacement {
        y_offset_mm,
        width_mm: A4_WIDTH_MM,
        height_mm,
    };

    let mut pages = vec![place(0.0)];
    let mut height_left = height_mm - A4_PAGE_HEIGHT_MM;
    while height_left >= 0.0 {
        pages.push(place(height_left - height_mm));
        height_left -= A4_PAGE_HEIGHT_MM;
    }
    pages
}

/// Everything needed to encode the exported document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentPlan {
    pub file_name: String,
    pub metadata: DocumentMetadata,
    pub image: CapturedImage,
    pub pages: Vec<PagePlacement>,
}

pub struct DocumentExporter<R> {
    rasterizer: R,
    metadata: DocumentMetadata,
}

impl<R: Rasterizer> DocumentExporter<R> {
    #[must_use]
    pub fn new(rasterizer: R) -> Self {
        Self {
            rasterizer,
            metadata: DocumentMetadata::default(),
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: DocumentMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Capture `region` and lay it out for a paginated document.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::MissingTarget`] when the region is not rendered,
    /// [`ExportError::EmptyCapture`] for a zero-sized image, and passes
    /// rasterizer failures through. Every failure is logged.
    pub fn export(&self, region: &ExportRegion) -> Result<DocumentPlan, ExportError> {
        self.plan(region).inspect_err(|e| {
            tracing::error!(
                error = %e,
                element_id = region.element_id(),
                "export: document failed"
            );
        })
    }

    fn plan(&self, region: &ExportRegion) -> Result<DocumentPlan, ExportError> {
        let element_id = region.element_id();
        let image = self
            .rasterizer
            .capture(element_id)?
            .ok_or_else(|| ExportError::MissingTarget(element_id.to_string()))?;
        if image.width_px == 0 || image.height_px == 0 {
            return Err(ExportError::EmptyCapture(element_id.to_string()));
        }

        let pages = layout_a4(image.width_px, image.height_px);
        let file_name = region.file_name();
        tracing::info!(
            element_id,
            pages = pages.len(),
            file = %file_name,
            "export: document laid out"
        );
        Ok(DocumentPlan {
            file_name,
            metadata: self.metadata.clone(),
            image,
            pages,
        })
    }
}
