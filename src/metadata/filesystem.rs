//! Atributos del sistema de archivos: ruta real, tamaño y marcas de tiempo.

use crate::error::{ExtractError, Result};
use crate::formatting::format_optional_time;
use serde::{Deserialize, Serialize};
use std::fs::{self, Metadata};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSystemInfo {
    pub name: String,
    pub path: String,
    pub size_bytes: u64,
    pub created: Option<String>,
    pub modified: Option<String>,
}

/// Resultado del sondeo; el error se conserva como dato en lugar de descartarse.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FsProbe {
    Attributes(FileSystemInfo),
    Failed { error: String },
}

impl FsProbe {
    pub fn size_bytes(&self) -> Option<u64> {
        match self {
            FsProbe::Attributes(info) => Some(info.size_bytes),
            FsProbe::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FsProbe::Attributes(_) => None,
            FsProbe::Failed { error } => Some(error),
        }
    }
}

/// Lee los atributos de `path`; falla con `NotFound` si la ruta no existe.
pub fn probe(path: &Path) -> Result<FileSystemInfo> {
    let metadata = fs::metadata(path).map_err(|error| ExtractError::io(path, error))?;
    let canonical = fs::canonicalize(path).map_err(|error| ExtractError::io(path, error))?;

    let name = path
        .file_name()
        .map(|value| value.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(FileSystemInfo {
        name,
        path: canonical.display().to_string(),
        size_bytes: metadata.len(),
        created: created_time(&metadata),
        modified: format_optional_time(metadata.modified().ok()),
    })
}

#[cfg(unix)]
fn created_time(metadata: &Metadata) -> Option<String> {
    use crate::formatting::format_unix_timestamp;
    use std::os::unix::fs::MetadataExt;

    format_optional_time(metadata.created().ok())
        .or_else(|| format_unix_timestamp(metadata.ctime(), metadata.ctime_nsec()))
}

#[cfg(not(unix))]
fn created_time(metadata: &Metadata) -> Option<String> {
    format_optional_time(metadata.created().ok())
}
