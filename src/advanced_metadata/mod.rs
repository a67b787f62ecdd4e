//! Extractores de metadata específicos de cada formato.
//!
//! Cada extractor reporta sus fallos esperados dentro de su propia estructura
//! (`error`). Un `Err` indica un fallo no previsto y lo convierte el
//! coordinador en `{"error": "extraction failed: ..."}`.

mod image;
mod office;
mod pdf;

use crate::error::{ExtractError, Result};
use crate::metadata::DetectedType;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use self::image::{
    GpsCoordinates, ImageExtractor, ImageMetadata, extract_image_metadata, gps_to_decimal,
};
pub use self::office::{DocxExtractor, DocxMetadata, extract_docx_metadata};
pub use self::pdf::{PdfExtractor, PdfMetadata, extract_pdf_metadata};

pub trait FormatExtractor: Sync {
    fn extract(&self, path: &Path) -> Result<ExtractedMetadata>;
}

/// Metadata propia del formato detectado.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtractedMetadata {
    Image(ImageMetadata),
    Pdf(PdfMetadata),
    Docx(DocxMetadata),
    Failed { error: String },
    Empty(NoMetadata),
}

impl ExtractedMetadata {
    pub fn empty() -> Self {
        Self::Empty(NoMetadata {})
    }

    pub fn failed(error: &ExtractError) -> Self {
        Self::Failed {
            error: format!("extraction failed: {error}"),
        }
    }

    /// Mensaje de error en el nivel superior de la metadata, si existe.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Image(metadata) => metadata.error.as_deref(),
            Self::Pdf(metadata) => metadata.error.as_deref(),
            Self::Docx(metadata) => metadata.error.as_deref(),
            Self::Failed { error } => Some(error),
            Self::Empty(_) => None,
        }
    }
}

/// Se serializa como `{}` para tipos sin extractor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoMetadata {}

static IMAGE_EXTRACTOR: ImageExtractor = ImageExtractor;
static PDF_EXTRACTOR: PdfExtractor = PdfExtractor;
static DOCX_EXTRACTOR: DocxExtractor = DocxExtractor;

/// Tabla de despacho por tipo; `Unknown` no tiene extractor.
pub fn extractor_for(kind: DetectedType) -> Option<&'static dyn FormatExtractor> {
    match kind {
        DetectedType::Image => Some(&IMAGE_EXTRACTOR),
        DetectedType::Pdf => Some(&PDF_EXTRACTOR),
        DetectedType::Docx => Some(&DOCX_EXTRACTOR),
        DetectedType::Unknown => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_type_has_no_extractor() {
        assert!(extractor_for(DetectedType::Unknown).is_none());
        assert!(extractor_for(DetectedType::Image).is_some());
        assert!(extractor_for(DetectedType::Pdf).is_some());
        assert!(extractor_for(DetectedType::Docx).is_some());
    }

    #[test]
    fn empty_metadata_serializes_as_empty_object() -> std::result::Result<(), Box<dyn std::error::Error>> {
        assert_eq!(serde_json::to_string(&ExtractedMetadata::empty())?, "{}");
        Ok(())
    }

    #[test]
    fn failure_is_prefixed() {
        let error = ExtractError::Panicked("índice fuera de rango".to_string());
        let metadata = ExtractedMetadata::failed(&error);
        assert_eq!(
            metadata.error(),
            Some("extraction failed: extractor panicked: índice fuera de rango")
        );
    }
}
