//! Extracción de metadata en PDFs mediante lectura del diccionario Info.

use super::{ExtractedMetadata, FormatExtractor};
use crate::error::Result;
use lopdf::{Dictionary, Document, Object};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

const MAX_REFERENCE_DEPTH: usize = 8;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfMetadata {
    pub info: BTreeMap<String, String>,
    pub pages: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct PdfExtractor;

impl FormatExtractor for PdfExtractor {
    fn extract(&self, path: &Path) -> Result<ExtractedMetadata> {
        Ok(ExtractedMetadata::Pdf(extract_pdf_metadata(path)))
    }
}

/// Copia el diccionario Info y cuenta las páginas; un PDF ilegible deja `error`.
pub fn extract_pdf_metadata(path: &Path) -> PdfMetadata {
    let doc = match Document::load(path) {
        Ok(doc) => doc,
        Err(error) => {
            warn!(path = %path.display(), %error, "no se pudo leer el PDF");
            return PdfMetadata {
                error: Some(error.to_string()),
                ..PdfMetadata::default()
            };
        }
    };

    let info = info_dictionary(&doc)
        .map(|dict| {
            dict.iter()
                .map(|(key, value)| (clean_key(key), object_to_string(&doc, value, 0)))
                .collect()
        })
        .unwrap_or_default();
    let pages = doc.get_pages().len() as u64;
    debug!(path = %path.display(), pages, "PDF leído");

    PdfMetadata {
        info,
        pages,
        error: None,
    }
}

fn info_dictionary(doc: &Document) -> Option<&Dictionary> {
    match doc.trailer.get(b"Info").ok()? {
        Object::Reference(reference) => doc.get_dictionary(*reference).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

fn clean_key(key: &[u8]) -> String {
    let key = String::from_utf8_lossy(key);
    key.strip_prefix('/').unwrap_or(&key).to_string()
}

fn object_to_string(doc: &Document, obj: &Object, depth: usize) -> String {
    match obj {
        Object::String(bytes, _) => decode_text_string(bytes),
        Object::Name(name) => String::from_utf8_lossy(name).into_owned(),
        Object::Integer(value) => value.to_string(),
        Object::Real(value) => value.to_string(),
        Object::Boolean(value) => value.to_string(),
        Object::Null => "null".to_string(),
        Object::Array(items) => {
            let items: Vec<String> = items
                .iter()
                .map(|item| object_to_string(doc, item, depth + 1))
                .collect();
            format!("[{}]", items.join(", "))
        }
        Object::Reference(reference) if depth < MAX_REFERENCE_DEPTH => doc
            .get_object(*reference)
            .map(|inner| object_to_string(doc, inner, depth + 1))
            .unwrap_or_else(|_| format!("{} {} R", reference.0, reference.1)),
        Object::Reference(reference) => format!("{} {} R", reference.0, reference.1),
        other => format!("{other:?}"),
    }
}

/// Cadenas de texto PDF: UTF-16BE con BOM o bytes de un solo octeto.
fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{StringFormat, dictionary};
    use tempfile::tempdir;

    fn sample_pdf(pages: usize) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let page_ids: Vec<Object> = (0..pages)
            .map(|_| {
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                })
                .into()
            })
            .collect();

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => page_ids,
                "Count" => pages as i64,
                "MediaBox" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(595), Object::Integer(842)],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    #[test]
    fn reads_info_dictionary_and_page_count() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("informe.pdf");

        let mut doc = sample_pdf(3);
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal("Informe Anual"),
            "Author" => Object::string_literal("María Pérez"),
            "Trapped" => Object::Name(b"False".to_vec()),
            "Version" => 2_i64,
        });
        doc.trailer.set("Info", info_id);
        doc.save(&path)?;

        let metadata = extract_pdf_metadata(&path);
        assert_eq!(metadata.error, None);
        assert_eq!(metadata.pages, 3);
        assert_eq!(metadata.info.get("Title").map(String::as_str), Some("Informe Anual"));
        assert_eq!(metadata.info.get("Author").map(String::as_str), Some("María Pérez"));
        assert_eq!(metadata.info.get("Trapped").map(String::as_str), Some("False"));
        assert_eq!(metadata.info.get("Version").map(String::as_str), Some("2"));
        Ok(())
    }

    #[test]
    fn document_without_info_has_empty_mapping() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("vacio.pdf");
        sample_pdf(1).save(&path)?;

        let metadata = extract_pdf_metadata(&path);
        assert!(metadata.info.is_empty());
        assert_eq!(metadata.pages, 1);
        assert!(metadata.error.is_none());
        Ok(())
    }

    #[test]
    fn truncated_pdf_reports_error() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let complete = dir.path().join("completo.pdf");
        sample_pdf(2).save(&complete)?;

        let bytes = std::fs::read(&complete)?;
        let truncated = dir.path().join("truncado.pdf");
        std::fs::write(&truncated, &bytes[..bytes.len() / 3])?;

        let metadata = extract_pdf_metadata(&truncated);
        assert!(metadata.info.is_empty());
        assert_eq!(metadata.pages, 0);
        assert!(metadata.error.is_some_and(|message| !message.is_empty()));
        Ok(())
    }

    #[test]
    fn decodes_utf16_text_strings() {
        let bytes = [0xFE, 0xFF, 0x00, 0x54, 0x00, 0xED, 0x00, 0x74];
        assert_eq!(decode_text_string(&bytes), "Tít");
        assert_eq!(decode_text_string(b"plain"), "plain");
    }

    #[test]
    fn arrays_and_hex_strings_become_text() {
        let doc = Document::with_version("1.5");
        let array = Object::Array(vec![
            Object::Integer(1),
            Object::String(b"ab".to_vec(), StringFormat::Hexadecimal),
        ]);
        assert_eq!(object_to_string(&doc, &array, 0), "[1, ab]");
        assert_eq!(clean_key(b"/Producer"), "Producer");
        assert_eq!(clean_key(b"Creator"), "Creator");
    }
}
