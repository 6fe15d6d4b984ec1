//! Export adapters: tabular CSV and paginated document capture.
//!
//! Adapters only read what they are handed. A failed export leaves the
//! session untouched and can simply be retried.

pub mod csv;
pub mod document;

use insights_core::CampaignRecord;

use crate::error::ExportError;

pub use self::csv::{to_csv, CsvExporter, CSV_FILE_NAME, CSV_HEADER};
pub use self::document::{
    layout_a4, CapturedImage, DocumentExporter, DocumentMetadata, DocumentPlan, ExportRegion,
    PagePlacement, Rasterizer,
};

/// A finished export ready to hand to a download or a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Serializes a set of rows into a downloadable artifact.
pub trait ExportAdapter {
    /// # Errors
    ///
    /// Returns [`ExportError`] when the rows cannot be serialized.
    fn export(&self, records: &[CampaignRecord]) -> Result<ExportArtifact, ExportError>;
}
