//! Coordina los extractores y arma el registro final.

use super::detect::{DetectedType, detect_file_type, normalized_extension};
use super::filesystem::{self, FsProbe};
use super::hashing::{HashDigests, file_hashes};
use super::mime::mime_type;
use super::report::{FileInfo, MetadataRecord};
use crate::advanced_metadata::{ExtractedMetadata, FormatExtractor, extractor_for};
use crate::error::ExtractError;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::{debug, error, warn};

/// Extrae toda la metadata disponible de `path`.
///
/// Nunca falla: cada componente registra su propio error como dato y el resto
/// del registro se completa igualmente.
pub fn extract(path: impl AsRef<Path>) -> MetadataRecord {
    let path = path.as_ref();
    debug!(path = %path.display(), "extrayendo metadata");

    let name = path
        .file_name()
        .map(|value| value.to_string_lossy().into_owned())
        .unwrap_or_default();

    let detected_type = detect_file_type(path);
    debug!(path = %path.display(), kind = detected_type.label(), "tipo detectado");

    let (fs_attributes, hashes, extracted_metadata) = match filesystem::probe(path) {
        Ok(info) => (
            FsProbe::Attributes(info),
            file_hashes(path),
            extract_format(detected_type, path),
        ),
        // Sin archivo no se hashea ni se decodifica nada.
        Err(missing @ ExtractError::NotFound(_)) => {
            warn!(path = %path.display(), error = %missing, "el archivo no existe");
            let message = missing.to_string();
            (
                FsProbe::Failed {
                    error: message.clone(),
                },
                HashDigests::failed(message),
                match extractor_for(detected_type) {
                    Some(_) => ExtractedMetadata::failed(&missing),
                    None => ExtractedMetadata::empty(),
                },
            )
        }
        Err(probe_error) => {
            warn!(path = %path.display(), error = %probe_error, "no se pudo sondear el archivo");
            (
                FsProbe::Failed {
                    error: probe_error.to_string(),
                },
                file_hashes(path),
                extract_format(detected_type, path),
            )
        }
    };

    MetadataRecord {
        file_info: FileInfo {
            path: path.display().to_string(),
            name,
            extension: normalized_extension(path),
            mime_type: mime_type(path),
            size_bytes: fs_attributes.size_bytes(),
            fs_attributes,
            hashes,
        },
        detected_type,
        extracted_metadata,
    }
}

fn extract_format(detected_type: DetectedType, path: &Path) -> ExtractedMetadata {
    match extractor_for(detected_type) {
        Some(extractor) => run_guarded(extractor, path),
        None => ExtractedMetadata::empty(),
    }
}

/// Ejecuta el extractor aislando errores no previstos y pánicos del decodificador.
pub(crate) fn run_guarded(extractor: &dyn FormatExtractor, path: &Path) -> ExtractedMetadata {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| extractor.extract(path)))
        .unwrap_or_else(|payload| Err(ExtractError::Panicked(panic_message(payload.as_ref()))));

    match outcome {
        Ok(metadata) => metadata,
        Err(extract_error) => {
            error!(path = %path.display(), error = %extract_error, "la extracción falló");
            ExtractedMetadata::failed(&extract_error)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
