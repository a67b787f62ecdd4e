//! Extracción forense de metadata para imágenes, PDF y documentos DOCX.
//!
//! `extract` produce un único [`MetadataRecord`] por archivo con atributos del
//! sistema de archivos, hashes MD5/SHA-1/SHA-256 y la metadata propia del formato.

pub mod advanced_metadata;
pub mod error;
pub mod formatting;
pub mod metadata;
pub mod upload;

pub use error::{ExtractError, Result};
pub use metadata::{DetectedType, MetadataRecord, extract};
