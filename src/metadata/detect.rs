//! Clasificación del archivo según su extensión.

use serde::{Deserialize, Serialize};
use std::path::Path;

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "tif", "tiff"];
const PDF_EXTENSION: &str = "pdf";
const DOCX_EXTENSION: &str = "docx";

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectedType {
    Image,
    Pdf,
    Docx,
    Unknown,
}

impl DetectedType {
    pub fn label(self) -> &'static str {
        match self {
            DetectedType::Image => "image",
            DetectedType::Pdf => "pdf",
            DetectedType::Docx => "docx",
            DetectedType::Unknown => "unknown",
        }
    }
}

/// Extensión en minúsculas y sin punto; vacía si la ruta no tiene.
pub fn normalized_extension(path: &Path) -> String {
    path.extension()
        .map(|value| value.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Determina el tipo sólo por la extensión; nunca inspecciona el contenido.
pub fn detect_file_type(path: &Path) -> DetectedType {
    let extension = normalized_extension(path);
    if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        DetectedType::Image
    } else if extension == PDF_EXTENSION {
        DetectedType::Pdf
    } else if extension == DOCX_EXTENSION {
        DetectedType::Docx
    } else {
        DetectedType::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_known_extensions_case_insensitively() {
        assert_eq!(detect_file_type(Path::new("foto.JPG")), DetectedType::Image);
        assert_eq!(detect_file_type(Path::new("scan.TiFf")), DetectedType::Image);
        assert_eq!(detect_file_type(Path::new("a/b/informe.PDF")), DetectedType::Pdf);
        assert_eq!(detect_file_type(Path::new("carta.docx")), DetectedType::Docx);
    }

    #[test]
    fn unrecognized_extensions_degrade_to_unknown() {
        assert_eq!(detect_file_type(Path::new("notas.txt")), DetectedType::Unknown);
        assert_eq!(detect_file_type(Path::new("sin_extension")), DetectedType::Unknown);
        assert_eq!(detect_file_type(Path::new("viejo.doc")), DetectedType::Unknown);
        assert_eq!(detect_file_type(Path::new(".pdf")), DetectedType::Unknown);
    }

    #[test]
    fn extension_is_lowercased_without_dot() {
        assert_eq!(normalized_extension(Path::new("IMG_0001.JPEG")), "jpeg");
        assert_eq!(normalized_extension(Path::new("archivo")), "");
    }
}
