//! Registro normalizado que se entrega por cada archivo analizado.

use super::detect::DetectedType;
use super::filesystem::FsProbe;
use super::hashing::HashDigests;
use crate::advanced_metadata::ExtractedMetadata;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    pub path: String,
    pub name: String,
    pub extension: String,
    pub mime_type: Option<String>,
    pub size_bytes: Option<u64>,
    pub fs_attributes: FsProbe,
    pub hashes: HashDigests,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub file_info: FileInfo,
    pub detected_type: DetectedType,
    pub extracted_metadata: ExtractedMetadata,
}

impl MetadataRecord {
    /// Error del sondeo del sistema de archivos; la CLI lo trata como fatal.
    pub fn probe_error(&self) -> Option<&str> {
        self.file_info.fs_attributes.error()
    }
}
