//! Serialización JSON del registro de metadata.

use super::report::MetadataRecord;
use crate::error::{ExtractError, Result};
use std::fs;
use std::path::Path;

/// JSON con sangría de dos espacios; los caracteres no ASCII se emiten tal cual.
pub fn to_pretty_json(record: &MetadataRecord) -> Result<String> {
    Ok(serde_json::to_string_pretty(record)?)
}

pub fn to_compact_json(record: &MetadataRecord) -> Result<String> {
    Ok(serde_json::to_string(record)?)
}

pub fn write_json(record: &MetadataRecord, path: &Path) -> Result<()> {
    let json = to_pretty_json(record)?;
    fs::write(path, json).map_err(|error| ExtractError::io(path, error))
}
